//! Structured-output schema for [`AuditReport`] and the decoder that
//! enforces it on model responses.
//!
//! The schema is derived from the serde types with `schemars` and then
//! rewritten into the strict structured-output dialect. The same schema is
//! sent to the model and checked locally with `jsonschema` before serde
//! sees the payload, so a response that drifts from the contract fails
//! loudly instead of half-deserializing.

use schemars::schema_for;
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::types::AuditReport;

/// Name the schema is registered under in the `response_format` block
pub const SCHEMA_NAME: &str = "RelatorioAuditoria";

/// Keywords the strict dialect rejects or that carry no meaning for the model
const STRIPPED_KEYWORDS: [&str; 4] = ["$schema", "title", "format", "default"];

/// JSON Schema of the audit report, in the strict-mode dialect
/// (every property required, no extra properties, nullable optionals,
/// no `$ref`).
pub fn audit_report_schema() -> Value {
    let mut root = schema_for!(AuditReport).to_value();

    let defs = root
        .as_object_mut()
        .and_then(|obj| obj.remove("$defs"))
        .and_then(|defs| match defs {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_default();

    strictify(&mut root, &defs);
    root
}

/// Inline `$defs` references and tighten every object schema in place.
fn strictify(node: &mut Value, defs: &Map<String, Value>) {
    match node {
        Value::Object(obj) => {
            if let Some(target) = obj
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/$defs/"))
                .and_then(|name| defs.get(name))
            {
                let mut inlined = target.clone();
                obj.remove("$ref");
                if let Value::Object(inlined_obj) = &mut inlined {
                    // Siblings of the reference (e.g. a field description) win
                    for (key, value) in std::mem::take(obj) {
                        inlined_obj.insert(key, value);
                    }
                }
                *node = inlined;
                strictify(node, defs);
                return;
            }

            for keyword in STRIPPED_KEYWORDS {
                obj.remove(keyword);
            }

            if let Some(names) = obj
                .get("properties")
                .and_then(Value::as_object)
                .map(|props| props.keys().cloned().map(Value::String).collect::<Vec<_>>())
            {
                obj.insert("required".to_string(), Value::Array(names));
                obj.insert("additionalProperties".to_string(), Value::Bool(false));
            }

            for (key, child) in obj.iter_mut() {
                match (key.as_str(), child) {
                    // Keys of `properties` are field names, not keywords
                    ("properties", Value::Object(props)) => {
                        for prop in props.values_mut() {
                            strictify(prop, defs);
                        }
                    }
                    (_, child) => strictify(child, defs),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                strictify(item, defs);
            }
        }
        _ => {}
    }
}

/// Validate a parsed JSON value against [`audit_report_schema`].
pub fn validate_report_value(instance: &Value) -> Result<(), SchemaError> {
    let schema = audit_report_schema();
    let validator =
        jsonschema::validator_for(&schema).map_err(|e| SchemaError::Compile(format!("{e}")))?;

    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::SchemaViolation { errors })
    }
}

/// Decode the model's message content into an [`AuditReport`].
///
/// Steps: JSON parse, schema validation, serde deserialization, then the
/// value checks the schema dialect cannot express.
pub fn decode_report(content: &str) -> Result<AuditReport, SchemaError> {
    let value: Value = serde_json::from_str(content)?;
    validate_report_value(&value)?;

    let report: AuditReport = serde_json::from_value(value)?;

    let rent = report.summary.rent_amount;
    if !rent.is_finite() || rent < 0.0 {
        return Err(SchemaError::InvalidValue(format!(
            "valor_aluguel must be a non-negative amount (found: {rent})"
        )));
    }

    Ok(report)
}
