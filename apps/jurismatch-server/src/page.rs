//! Server-rendered audit page
//!
//! Layout follows the report view's display order: notices, contract
//! summary metrics, critical findings, attention findings, final opinion.
//! All model-provided text is HTML-escaped.

use audit_engine::present::{
    FindingCard, FixStyle, Notice, ReportView, Tone, FINAL_OPINION_HEADING,
};

pub const PAGE_TITLE: &str = "JurisMatch | Auditoria Imobiliária AI";
pub const BUSY_TEXT: &str =
    "O JurisMatch está lendo as cláusulas e consultando a Lei 8.245/91...";

/// What one page render shows besides the input form
#[derive(Debug, Default, Clone)]
pub struct PageModel {
    pub notices: Vec<Notice>,
    pub report: Option<ReportView>,
}

const STYLE: &str = r#"
  body { margin: 0; font-family: system-ui, sans-serif; background: #f0f2f6; color: #262730; }
  .layout { display: flex; min-height: 100vh; }
  aside { width: 280px; padding: 24px; background: #ffffff; border-right: 1px solid #e0e0e0; }
  main { flex: 1; padding: 32px 48px; max-width: 1100px; }
  fieldset { border: 1px solid #e0e0e0; border-radius: 10px; margin-bottom: 16px; background: #fff; }
  textarea { width: 100%; height: 300px; }
  button { background: #ff4b4b; color: #fff; border: 0; border-radius: 8px; padding: 10px 18px; font-size: 1rem; cursor: pointer; }
  button:disabled { opacity: 0.6; }
  .notice { padding: 10px; border-radius: 8px; margin: 8px 0; }
  .notice.error { background: #ffe3e3; }
  .notice.warning { background: #fff6d6; }
  .notice.success { background: #dff5e3; }
  .notice.info { background: #e3eefc; }
  .metrics { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; }
  .metric-card { background: #fff; border: 1px solid #e0e0e0; padding: 15px; border-radius: 10px; box-shadow: 0 2px 4px rgba(0,0,0,0.05); }
  .metric-card .label { font-size: 0.85rem; color: #6b6f76; }
  .metric-card .value { font-size: 1.4rem; }
  .illegal { font-weight: bold; }
  details.card { background: #fff; border: 1px solid #e0e0e0; border-radius: 8px; margin: 8px 0; padding: 8px 12px; }
  details.card summary { cursor: pointer; font-weight: 600; }
  pre { background: #f6f8fa; padding: 10px; border-radius: 6px; white-space: pre-wrap; }
  #busy { margin-top: 12px; }
"#;

/// Render the full page
pub fn render_page(model: &PageModel) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(PAGE_TITLE)));
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n<div class=\"layout\">\n");

    render_sidebar(&mut html);

    html.push_str("<main>\n");
    html.push_str("<h1>Auditoria de Contratos de Locação 🇧🇷</h1>\n");
    html.push_str(
        "<p>Carregue seu contrato (PDF) ou cole o texto para uma análise de compliance imediata.</p>\n",
    );

    render_form(&mut html);

    for notice in &model.notices {
        render_notice(&mut html, notice);
    }

    if let Some(report) = &model.report {
        render_report(&mut html, report);
    }

    html.push_str("</main>\n</div>\n</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String) {
    html.push_str("<aside>\n<h2>⚖️ JurisMatch</h2>\n<hr>\n");
    html.push_str(
        "<label for=\"api_key\">OpenAI API Key</label>\n\
         <input id=\"api_key\" name=\"api_key\" form=\"audit-form\" type=\"password\" \
         autocomplete=\"off\" title=\"Insira sua chave para processar\">\n",
    );
    html.push_str("<h3>Sobre</h3>\n");
    render_notice(
        html,
        &Notice::new(
            Tone::Info,
            "Este agente utiliza IA para identificar riscos na Lei do Inquilinato (8.245/91).",
        ),
    );
    html.push_str("</aside>\n");
}

fn render_form(html: &mut String) {
    html.push_str(&format!(
        "<form id=\"audit-form\" method=\"post\" action=\"/audit\" enctype=\"multipart/form-data\" \
         onsubmit=\"document.getElementById('busy').hidden=false;this.querySelector('button').disabled=true;\">\n\
         <fieldset>\n<legend>📂 Upload de PDF</legend>\n\
         <label for=\"contract_pdf\">Arraste seu contrato aqui</label>\n\
         <input id=\"contract_pdf\" name=\"contract_pdf\" type=\"file\" accept=\"application/pdf,.pdf\">\n\
         </fieldset>\n\
         <fieldset>\n<legend>📝 Colar Texto</legend>\n\
         <label for=\"contract_text\">Cole o texto do contrato aqui</label>\n\
         <textarea id=\"contract_text\" name=\"contract_text\"></textarea>\n\
         </fieldset>\n\
         <button type=\"submit\">🔍 Iniciar Auditoria Jurídica</button>\n\
         <div id=\"busy\" hidden>⏳ {}</div>\n\
         </form>\n",
        escape_html(BUSY_TEXT)
    ));
}

fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Error => "error",
        Tone::Warning => "warning",
        Tone::Success => "success",
        Tone::Info => "info",
    }
}

fn render_notice(html: &mut String, notice: &Notice) {
    html.push_str(&format!(
        "<div class=\"notice {}\">{}</div>\n",
        tone_class(notice.tone),
        escape_html(&notice.text)
    ));
}

fn render_metric(html: &mut String, label: &str, value: &str, marker: Option<&str>) {
    html.push_str(&format!(
        "<div class=\"metric-card\"><div class=\"label\">{}</div><div class=\"value\">{}</div>",
        escape_html(label),
        escape_html(value)
    ));
    if let Some(marker) = marker {
        html.push_str(&format!("<div class=\"illegal\">{}</div>", escape_html(marker)));
    }
    html.push_str("</div>\n");
}

fn render_card(html: &mut String, card: &FindingCard) {
    html.push_str(&format!(
        "<details class=\"card\"{}>\n<summary>{}</summary>\n",
        if card.expanded { " open" } else { "" },
        escape_html(&card.title)
    ));

    if let Some(body) = &card.body {
        html.push_str(&format!("<p>{}</p>\n", escape_html(body)));
    }

    if let Some(fix) = &card.fix {
        match fix.style {
            FixStyle::CodeBlock => {
                html.push_str(&format!("<pre><code>{}</code></pre>\n", escape_html(&fix.text)));
            }
            FixStyle::InfoNote => {
                render_notice(html, &Notice::new(Tone::Info, fix.text.clone()));
            }
        }
    }

    html.push_str("</details>\n");
}

fn render_report(html: &mut String, report: &ReportView) {
    html.push_str("<hr>\n<section id=\"summary\">\n<h2>📋 Resumo do Contrato</h2>\n");
    html.push_str("<div class=\"metrics\">\n");
    let summary = &report.summary;
    render_metric(html, "Valor", &summary.rent, None);
    render_metric(html, "Índice", &summary.adjustment_index, None);
    render_metric(html, "Garantias", &summary.guarantees, summary.guarantee_marker());
    render_metric(html, "Locatário", &summary.tenant, None);
    html.push_str("</div>\n</section>\n");

    html.push_str("<section id=\"risks\">\n<h2>🚨 Análise de Risco &amp; Compliance</h2>\n");
    render_notice(html, &report.critical_notice);
    for card in &report.critical {
        render_card(html, card);
    }

    if let Some(notice) = &report.attention_notice {
        render_notice(html, notice);
        for card in &report.attention {
            render_card(html, card);
        }
    }
    html.push_str("</section>\n");

    html.push_str(&format!(
        "<section id=\"opinion\">\n<h3>{}</h3>\n",
        escape_html(FINAL_OPINION_HEADING)
    ));
    render_notice(html, &Notice::new(Tone::Info, report.final_opinion.clone()));
    html.push_str("</section>\n");
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
