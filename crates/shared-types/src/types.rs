use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Severity the auditor assigns to a clause.
///
/// Variants must stay undocumented: documented variants turn the generated
/// schema into a `oneOf` of constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum RiskLevel {
    // Clause is likely void under Lei 8.245/91
    #[serde(rename = "CRITICO")]
    Critical,
    // Commercially unfavourable but not void
    #[serde(rename = "ATENCAO")]
    Attention,
    #[serde(rename = "CONFORME")]
    Conformant,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [
        RiskLevel::Critical,
        RiskLevel::Attention,
        RiskLevel::Conformant,
    ];

    /// Wire value used in the structured-output schema
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "CRITICO",
            RiskLevel::Attention => "ATENCAO",
            RiskLevel::Conformant => "CONFORME",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RiskItem {
    #[serde(rename = "topico")]
    #[schemars(description = "O tópico analisado (ex: Garantia, Multa)")]
    pub topic: String,
    #[serde(rename = "status")]
    pub level: RiskLevel,
    #[serde(rename = "descricao_problema")]
    pub problem_description: Option<String>,
    #[serde(rename = "sugestao_correcao")]
    pub suggested_fix: Option<String>,
}

impl RiskItem {
    /// Problem text, treating an empty string as absent
    pub fn problem(&self) -> Option<&str> {
        non_empty(self.problem_description.as_deref())
    }

    /// Suggested fix, treating an empty string as absent
    pub fn fix(&self) -> Option<&str> {
        non_empty(self.suggested_fix.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContractSummary {
    #[serde(rename = "locador")]
    pub landlord: String,
    #[serde(rename = "locatario")]
    pub tenant: String,
    /// Monthly rent in BRL
    #[serde(rename = "valor_aluguel")]
    pub rent_amount: f64,
    /// e.g. "IGP-M", "IPCA"
    #[serde(rename = "indice_reajuste")]
    pub adjustment_index: String,
    #[serde(rename = "garantias_encontradas")]
    pub guarantees_found: Vec<String>,
}

impl ContractSummary {
    /// Lei 8.245/91 art. 37 allows a single guarantee type per lease.
    pub fn has_double_guarantee(&self) -> bool {
        self.guarantees_found.len() > 1
    }
}

/// Completed audit returned by the model. Never mutated after decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditReport {
    #[serde(rename = "resumo")]
    pub summary: ContractSummary,
    #[serde(rename = "analise_riscos")]
    pub risk_items: Vec<RiskItem>,
    #[serde(rename = "parecer_final")]
    pub final_opinion: String,
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(topic: &str, level: RiskLevel) -> RiskItem {
        RiskItem {
            topic: topic.to_string(),
            level,
            problem_description: None,
            suggested_fix: None,
        }
    }

    #[test]
    fn test_risk_level_uses_portuguese_wire_values() {
        let json = serde_json::to_string(&RiskLevel::ALL).unwrap();
        assert_eq!(json, r#"["CRITICO","ATENCAO","CONFORME"]"#);

        for level in RiskLevel::ALL {
            let quoted = format!("\"{}\"", level.as_str());
            let parsed: RiskLevel = serde_json::from_str(&quoted).unwrap();
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn test_risk_level_rejects_unknown_value() {
        assert!(serde_json::from_str::<RiskLevel>(r#""ALTO""#).is_err());
        assert!(serde_json::from_str::<RiskLevel>(r#""critico""#).is_err());
    }

    #[test]
    fn test_risk_item_field_names() {
        let parsed: RiskItem = serde_json::from_str(
            r#"{"topico":"Multa","status":"CRITICO","descricao_problema":"Multa de 12 alugueis","sugestao_correcao":null}"#,
        )
        .unwrap();

        assert_eq!(parsed.topic, "Multa");
        assert_eq!(parsed.level, RiskLevel::Critical);
        assert_eq!(parsed.problem(), Some("Multa de 12 alugueis"));
        assert_eq!(parsed.fix(), None);
    }

    #[test]
    fn test_empty_optional_texts_are_absent() {
        let mut conformant = item("Prazo", RiskLevel::Conformant);
        conformant.problem_description = Some(String::new());
        conformant.suggested_fix = Some("   ".to_string());

        assert_eq!(conformant.problem(), None);
        assert_eq!(conformant.fix(), None);
    }

    #[test]
    fn test_double_guarantee_detection() {
        let mut summary = ContractSummary {
            landlord: "Maria Souza".to_string(),
            tenant: "João Lima".to_string(),
            rent_amount: 2500.0,
            adjustment_index: "IGP-M".to_string(),
            guarantees_found: vec!["caução".to_string()],
        };
        assert!(!summary.has_double_guarantee());

        summary.guarantees_found.push("fiança".to_string());
        assert!(summary.has_double_guarantee());

        summary.guarantees_found.clear();
        assert!(!summary.has_double_guarantee());
    }
}
