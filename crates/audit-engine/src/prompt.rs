//! Fixed instructions sent with every audit request

/// Model snapshot that supports strict structured outputs
pub const DEFAULT_MODEL: &str = "gpt-4o-2024-08-06";

/// Auditor persona and legal framework
pub const SYSTEM_PROMPT: &str = "\
Você é o JurisMatch Senior Auditor, especialista na Lei do Inquilinato Brasileira (Lei 8.245/91).
Analise o contrato buscando nulidades (dupla garantia, multas abusivas) e riscos comerciais (IGP-M).
Seja rigoroso.";

/// User message embedding the contract text verbatim
pub fn user_message(contract_text: &str) -> String {
    format!("Analise este contrato:\n\n{}", contract_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_embeds_text_verbatim() {
        let text = "CLÁUSULA 5ª  -  Multa de\n3 aluguéis.";
        let msg = user_message(text);
        assert!(msg.starts_with("Analise este contrato:\n\n"));
        assert!(msg.ends_with(text));
    }

    #[test]
    fn test_system_prompt_names_the_legal_framework() {
        assert!(SYSTEM_PROMPT.contains("8.245/91"));
        assert!(SYSTEM_PROMPT.contains("dupla garantia"));
        assert!(SYSTEM_PROMPT.contains("multas abusivas"));
        assert!(SYSTEM_PROMPT.contains("IGP-M"));
    }
}
