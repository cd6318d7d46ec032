//! Risk classification and the view model rendered by the shell.
//!
//! Display policy:
//! 1. Critical findings first, always: a count banner when there are any,
//!    a reassuring notice when there are none. Cards start expanded.
//! 2. Attention findings next, only when present. Cards start collapsed.
//! 3. Conformant findings are grouped but never listed.
//! 4. The final opinion closes the report.
//!
//! The double-guarantee marker is derived from the summary alone and does
//! not look at what the model put in the findings.

use serde::Serialize;
use shared_types::{AuditReport, ContractSummary, RiskItem, RiskLevel};

pub const ILLEGAL_MARKER: &str = "🔴 ILEGAL";
pub const NO_CRITICAL_NOTICE: &str = "Nenhum risco crítico de nulidade encontrado.";
pub const FINAL_OPINION_HEADING: &str = "⚖️ Parecer Final do Auditor IA";

/// Findings split by level, each group in the order the model returned them
#[derive(Debug, Clone, PartialEq)]
pub struct RiskGroups<'a> {
    pub critical: Vec<&'a RiskItem>,
    pub attention: Vec<&'a RiskItem>,
    pub conformant: Vec<&'a RiskItem>,
}

/// Stable partition of `items` by [`RiskLevel`].
pub fn partition_risks(items: &[RiskItem]) -> RiskGroups<'_> {
    let mut groups = RiskGroups {
        critical: Vec::new(),
        attention: Vec::new(),
        conformant: Vec::new(),
    };

    for item in items {
        match item.level {
            RiskLevel::Critical => groups.critical.push(item),
            RiskLevel::Attention => groups.attention.push(item),
            RiskLevel::Conformant => groups.conformant.push(item),
        }
    }

    groups
}

/// Visual treatment of a notice or banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Error,
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub tone: Tone,
    pub text: String,
}

impl Notice {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixStyle {
    /// Preformatted block, used for replacement clause text
    CodeBlock,
    /// Informational note prefixed with "Sugestão:"
    InfoNote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixNote {
    pub style: FixStyle,
    pub text: String,
}

/// One expandable finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingCard {
    pub level: RiskLevel,
    pub title: String,
    pub expanded: bool,
    pub body: Option<String>,
    pub fix: Option<FixNote>,
}

impl FindingCard {
    fn critical(item: &RiskItem) -> Self {
        let title = match item.problem() {
            Some(problem) => format!("🔴 {}: {}", item.topic, problem),
            None => format!("🔴 {}", item.topic),
        };

        Self {
            level: RiskLevel::Critical,
            title,
            expanded: true,
            body: item.problem().map(|p| format!("Análise: {}", p)),
            fix: item.fix().map(|f| FixNote {
                style: FixStyle::CodeBlock,
                text: f.to_string(),
            }),
        }
    }

    fn attention(item: &RiskItem) -> Self {
        Self {
            level: RiskLevel::Attention,
            title: format!("🟡 {}", item.topic),
            expanded: false,
            body: item.problem().map(str::to_string),
            fix: item.fix().map(|f| FixNote {
                style: FixStyle::InfoNote,
                text: format!("Sugestão: {}", f),
            }),
        }
    }
}

/// Headline metrics of the contract summary, already formatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryView {
    pub rent: String,
    pub adjustment_index: String,
    pub guarantees: String,
    pub guarantee_labels: Vec<String>,
    /// More than one guarantee type: void under Lei 8.245/91 art. 37
    pub illegal_guarantee: bool,
    pub landlord: String,
    /// First name only, to fit the metric tile
    pub tenant: String,
}

impl SummaryView {
    pub fn from_summary(summary: &ContractSummary) -> Self {
        Self {
            rent: format_brl(summary.rent_amount),
            adjustment_index: summary.adjustment_index.clone(),
            guarantees: summary.guarantees_found.join(", "),
            guarantee_labels: summary.guarantees_found.clone(),
            illegal_guarantee: summary.has_double_guarantee(),
            landlord: summary.landlord.clone(),
            tenant: first_name(&summary.tenant),
        }
    }

    /// Marker shown beside the guarantees metric, if any
    pub fn guarantee_marker(&self) -> Option<&'static str> {
        self.illegal_guarantee.then_some(ILLEGAL_MARKER)
    }
}

/// Everything the shell needs to render one audit result, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportView {
    pub summary: SummaryView,
    pub critical_notice: Notice,
    pub critical: Vec<FindingCard>,
    pub attention_notice: Option<Notice>,
    pub attention: Vec<FindingCard>,
    /// Grouped for completeness; never rendered as a list
    pub conformant_topics: Vec<String>,
    pub final_opinion: String,
}

impl ReportView {
    pub fn from_report(report: &AuditReport) -> Self {
        let groups = partition_risks(&report.risk_items);

        let critical_notice = if groups.critical.is_empty() {
            Notice::new(Tone::Success, NO_CRITICAL_NOTICE)
        } else {
            Notice::new(Tone::Error, critical_banner(groups.critical.len()))
        };

        let attention_notice = (!groups.attention.is_empty())
            .then(|| Notice::new(Tone::Warning, attention_banner(groups.attention.len())));

        Self {
            summary: SummaryView::from_summary(&report.summary),
            critical_notice,
            critical: groups.critical.iter().map(|i| FindingCard::critical(i)).collect(),
            attention_notice,
            attention: groups.attention.iter().map(|i| FindingCard::attention(i)).collect(),
            conformant_topics: groups.conformant.iter().map(|i| i.topic.clone()).collect(),
            final_opinion: report.final_opinion.clone(),
        }
    }
}

pub fn critical_banner(count: usize) -> String {
    if count == 1 {
        "⚠️ 1 PONTO CRÍTICO ENCONTRADO (RISCO DE NULIDADE)".to_string()
    } else {
        format!("⚠️ {} PONTOS CRÍTICOS ENCONTRADOS (RISCO DE NULIDADE)", count)
    }
}

pub fn attention_banner(count: usize) -> String {
    if count == 1 {
        "⚠️ 1 Ponto de Atenção Comercial".to_string()
    } else {
        format!("⚠️ {} Pontos de Atenção Comercial", count)
    }
}

/// Format an amount as "R$ 12,345.67": two decimals, comma-grouped
/// thousands.
pub fn format_brl(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("R$ {}{}.{}", sign, grouped, frac_part)
}

fn first_name(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .next()
        .unwrap_or("—")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn item(topic: &str, level: RiskLevel, problem: Option<&str>, fix: Option<&str>) -> RiskItem {
        RiskItem {
            topic: topic.to_string(),
            level,
            problem_description: problem.map(str::to_string),
            suggested_fix: fix.map(str::to_string),
        }
    }

    fn summary(guarantees: &[&str]) -> ContractSummary {
        ContractSummary {
            landlord: "Roberto Nunes".to_string(),
            tenant: "Juliana Prado Rocha".to_string(),
            rent_amount: 2500.0,
            adjustment_index: "IGP-M".to_string(),
            guarantees_found: guarantees.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn report(items: Vec<RiskItem>, guarantees: &[&str]) -> AuditReport {
        AuditReport {
            summary: summary(guarantees),
            risk_items: items,
            final_opinion: "Recomenda-se revisar a cláusula de multa.".to_string(),
        }
    }

    #[test]
    fn test_mixed_levels_are_grouped() {
        let r = report(
            vec![
                item("Multa", RiskLevel::Critical, Some("Multa de 12 aluguéis"), None),
                item("Prazo", RiskLevel::Conformant, None, None),
                item("Reajuste", RiskLevel::Attention, Some("IGP-M volátil"), None),
            ],
            &["caução"],
        );

        let groups = partition_risks(&r.risk_items);
        let topics = |g: &[&RiskItem]| g.iter().map(|i| i.topic.clone()).collect::<Vec<_>>();
        assert_eq!(topics(&groups.critical), vec!["Multa"]);
        assert_eq!(topics(&groups.attention), vec!["Reajuste"]);
        assert_eq!(topics(&groups.conformant), vec!["Prazo"]);

        let view = ReportView::from_report(&r);
        assert_eq!(view.critical_notice.tone, Tone::Error);
        assert!(view.critical_notice.text.contains("1 PONTO CRÍTICO"));
        assert_eq!(view.critical.len(), 1);
        assert_eq!(view.attention.len(), 1);
        assert_eq!(view.conformant_topics, vec!["Prazo"]);
    }

    #[test]
    fn test_no_critical_items_shows_reassurance() {
        let view = ReportView::from_report(&report(
            vec![item("Prazo", RiskLevel::Conformant, None, None)],
            &["fiança"],
        ));

        assert_eq!(view.critical_notice, Notice::new(Tone::Success, NO_CRITICAL_NOTICE));
        assert!(view.critical.is_empty());
        assert_eq!(view.attention_notice, None);
        assert!(view.attention.is_empty());
    }

    #[test]
    fn test_critical_card_is_expanded_with_code_block_fix() {
        let view = ReportView::from_report(&report(
            vec![item(
                "Multa",
                RiskLevel::Critical,
                Some("Multa integral sem proporcionalidade"),
                Some("A multa será proporcional ao tempo restante."),
            )],
            &[],
        ));

        let card = &view.critical[0];
        assert_eq!(card.title, "🔴 Multa: Multa integral sem proporcionalidade");
        assert!(card.expanded);
        assert_eq!(card.body.as_deref(), Some("Análise: Multa integral sem proporcionalidade"));
        assert_eq!(
            card.fix,
            Some(FixNote {
                style: FixStyle::CodeBlock,
                text: "A multa será proporcional ao tempo restante.".to_string(),
            })
        );
    }

    #[test]
    fn test_attention_card_is_collapsed_with_info_fix() {
        let view = ReportView::from_report(&report(
            vec![item(
                "Reajuste",
                RiskLevel::Attention,
                Some("Índice IGP-M"),
                Some("Usar IPCA"),
            )],
            &[],
        ));

        let card = &view.attention[0];
        assert_eq!(card.title, "🟡 Reajuste");
        assert!(!card.expanded);
        assert_eq!(card.body.as_deref(), Some("Índice IGP-M"));
        assert_eq!(card.fix.as_ref().map(|f| f.style), Some(FixStyle::InfoNote));
        assert_eq!(card.fix.as_ref().map(|f| f.text.as_str()), Some("Sugestão: Usar IPCA"));
        assert_eq!(
            view.attention_notice.map(|n| n.text),
            Some("⚠️ 1 Ponto de Atenção Comercial".to_string())
        );
    }

    #[test]
    fn test_missing_texts_produce_no_body_or_fix() {
        let view = ReportView::from_report(&report(
            vec![item("Garantia", RiskLevel::Critical, Some(""), None)],
            &[],
        ));

        let card = &view.critical[0];
        assert_eq!(card.title, "🔴 Garantia");
        assert_eq!(card.body, None);
        assert_eq!(card.fix, None);
    }

    #[test]
    fn test_double_guarantee_marker_ignores_risk_items() {
        // No finding mentions the guarantee; the marker comes from the summary
        let view = ReportView::from_report(&report(
            vec![item("Prazo", RiskLevel::Conformant, None, None)],
            &["fiança", "caução"],
        ));

        assert_eq!(view.summary.guarantees, "fiança, caução");
        assert_eq!(view.summary.guarantee_labels, vec!["fiança", "caução"]);
        assert_eq!(view.summary.guarantee_marker(), Some(ILLEGAL_MARKER));
    }

    #[test]
    fn test_banners_pluralize() {
        assert_eq!(critical_banner(1), "⚠️ 1 PONTO CRÍTICO ENCONTRADO (RISCO DE NULIDADE)");
        assert_eq!(critical_banner(3), "⚠️ 3 PONTOS CRÍTICOS ENCONTRADOS (RISCO DE NULIDADE)");
        assert_eq!(attention_banner(2), "⚠️ 2 Pontos de Atenção Comercial");
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0.00");
        assert_eq!(format_brl(950.5), "R$ 950.50");
        assert_eq!(format_brl(2500.0), "R$ 2,500.00");
        assert_eq!(format_brl(1234567.891), "R$ 1,234,567.89");
        assert_eq!(format_brl(999.999), "R$ 1,000.00");
    }

    #[test]
    fn test_tenant_metric_uses_first_name() {
        let view = SummaryView::from_summary(&summary(&[]));
        assert_eq!(view.tenant, "Juliana");

        let mut s = summary(&[]);
        s.tenant = "   ".to_string();
        assert_eq!(SummaryView::from_summary(&s).tenant, "—");
    }

    fn level_strategy() -> impl Strategy<Value = RiskLevel> {
        prop_oneof![
            Just(RiskLevel::Critical),
            Just(RiskLevel::Attention),
            Just(RiskLevel::Conformant),
        ]
    }

    fn items_strategy() -> impl Strategy<Value = Vec<RiskItem>> {
        prop::collection::vec(level_strategy(), 0..20).prop_map(|levels| {
            levels
                .into_iter()
                .enumerate()
                .map(|(i, level)| RiskItem {
                    topic: format!("Cláusula {}", i),
                    level,
                    problem_description: Some(format!("Problema {}", i)),
                    suggested_fix: None,
                })
                .collect()
        })
    }

    proptest! {
        /// Property: critical ++ attention ++ conformant is a permutation of
        /// the input and each group keeps its original relative order
        #[test]
        fn partition_is_stable(items in items_strategy()) {
            let groups = partition_risks(&items);

            let concatenated: Vec<&RiskItem> = groups
                .critical
                .iter()
                .chain(groups.attention.iter())
                .chain(groups.conformant.iter())
                .copied()
                .collect();
            prop_assert_eq!(concatenated.len(), items.len());

            for (group, level) in [
                (&groups.critical, RiskLevel::Critical),
                (&groups.attention, RiskLevel::Attention),
                (&groups.conformant, RiskLevel::Conformant),
            ] {
                let expected: Vec<&RiskItem> = items.iter().filter(|i| i.level == level).collect();
                prop_assert_eq!(group, &expected);
            }
        }

        /// Property: the ILLEGAL marker appears iff more than one guarantee
        #[test]
        fn illegal_marker_iff_multiple_guarantees(
            guarantees in prop::collection::vec("[a-zç ]{1,15}", 0..5),
            items in items_strategy(),
        ) {
            let labels: Vec<&str> = guarantees.iter().map(String::as_str).collect();
            let view = ReportView::from_report(&report(items, &labels));
            prop_assert_eq!(view.summary.guarantee_marker().is_some(), guarantees.len() > 1);
        }

        /// Property: building the view twice yields identical output
        #[test]
        fn view_is_idempotent(items in items_strategy()) {
            let r = report(items, &["caução"]);
            let first = ReportView::from_report(&r);
            let second = ReportView::from_report(&r);
            prop_assert_eq!(first, second);
        }
    }
}
