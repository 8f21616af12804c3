//! TOML decisions file — review actions applied headlessly.
//!
//! Each `[[decision]]` entry targets one field by its absolute address.
//! Addresses that do not resolve in the loaded document are collected as
//! warnings rather than aborting the run.

use serde::Deserialize;
use serde_json::Value;

use fieldloom_engine::{coerce_edit, ReviewSession};

#[derive(Debug, Deserialize)]
pub struct DecisionsFile {
    #[serde(default)]
    pub decision: Vec<Decision>,
    /// Section labels whose fields are dropped wholesale.
    #[serde(default)]
    pub delete_sections: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Decision {
    /// Absolute field address, e.g. "units[0].volume".
    pub path: String,
    /// Replacement value. Strings go through manual-edit coercion.
    #[serde(default)]
    pub value: Option<toml::Value>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Approve the current value without changing it.
    #[serde(default)]
    pub resolve: bool,
    /// Adopt the n-th alternative (0-based) and resolve.
    #[serde(default)]
    pub choose_alternative: Option<usize>,
    /// Remove the field from the output entirely.
    #[serde(default)]
    pub delete: bool,
}

impl DecisionsFile {
    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }
}

/// Apply every decision to the session. Returns warnings for entries that
/// did not land.
pub fn apply(session: &mut ReviewSession, decisions: &DecisionsFile) -> Vec<String> {
    let mut warnings = Vec::new();

    for decision in &decisions.decision {
        let Some(field) = session.fields().iter().find(|f| f.path == decision.path) else {
            warnings.push(format!("no field at '{}'", decision.path));
            continue;
        };
        let id = field.id;
        let alternative_count = field.alternatives.len();

        if decision.delete {
            session.delete_field(id);
            continue;
        }

        if let Some(index) = decision.choose_alternative {
            if index < alternative_count {
                session.choose_alternative(id, index);
            } else {
                warnings.push(format!(
                    "'{}' has {} alternative(s), index {} ignored",
                    decision.path, alternative_count, index
                ));
            }
        }

        // An explicit value wins over a chosen alternative.
        if let Some(value) = &decision.value {
            session.set_value(id, to_json(value), true);
        } else if decision.resolve {
            if let Some(current) = session.field(id).map(|f| f.value.clone()) {
                session.set_value(id, current, true);
            }
        }

        if let Some(comment) = &decision.comment {
            session.set_comment(id, comment);
        }
    }

    for section in &decisions.delete_sections {
        if session.fields().iter().any(|f| f.section == *section) {
            session.delete_section(section);
        } else {
            warnings.push(format!("no section named '{section}'"));
        }
    }

    warnings
}

fn to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => coerce_edit(s),
        toml::Value::Integer(i) => Value::from(*i),
        toml::Value::Float(f) => Value::from(*f),
        toml::Value::Boolean(b) => Value::from(*b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.iter().map(to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(key, child)| (key.clone(), to_json(child)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> ReviewSession {
        let doc = json!({
            "metadata": {"title": {"value": "T", "confidence": "High"}},
            "units": [{
                "id": "U-1",
                "volume": {
                    "value": "500 L",
                    "confidence": "Low",
                    "alternatives": [
                        {"source": "E1", "value": "500 L"},
                        {"source": "E2", "value": "600 L"}
                    ]
                }
            }],
            "streams": [
                {"id": "S-1", "flow_rate": {"value": "12.5 kg/h", "confidence": "Low"}}
            ]
        });
        ReviewSession::new(doc, "doc.json").unwrap()
    }

    #[test]
    fn parse_decisions_toml() {
        let text = r#"
delete_sections = ["Stream: S-1"]

[[decision]]
path = "units[0].volume"
choose_alternative = 1
comment = "table value is authoritative"

[[decision]]
path = "metadata.title"
resolve = true
"#;
        let file = DecisionsFile::from_toml(text).unwrap();
        assert_eq!(file.decision.len(), 2);
        assert_eq!(file.decision[0].choose_alternative, Some(1));
        assert!(file.decision[1].resolve);
        assert_eq!(file.delete_sections, vec!["Stream: S-1"]);
    }

    #[test]
    fn parse_rejects_malformed_toml() {
        assert!(DecisionsFile::from_toml("[[decision\npath=").is_err());
    }

    #[test]
    fn apply_value_edit_resolves() {
        let mut s = session();
        let file = DecisionsFile::from_toml(
            r#"
[[decision]]
path = "units[0].volume"
value = "550 L"
"#,
        )
        .unwrap();
        let warnings = apply(&mut s, &file);
        assert!(warnings.is_empty());
        let field = s.fields().iter().find(|f| f.path == "units[0].volume").unwrap();
        assert_eq!(field.value, json!("550 L"));
        assert!(field.resolved);
    }

    #[test]
    fn apply_string_values_are_coerced() {
        let mut s = session();
        let file = DecisionsFile::from_toml(
            r#"
[[decision]]
path = "units[0].volume"
value = "42"
"#,
        )
        .unwrap();
        apply(&mut s, &file);
        let field = s.fields().iter().find(|f| f.path == "units[0].volume").unwrap();
        assert_eq!(field.value, json!(42));
    }

    #[test]
    fn apply_choose_alternative_and_delete() {
        let mut s = session();
        let file = DecisionsFile::from_toml(
            r#"
delete_sections = ["Stream: S-1"]

[[decision]]
path = "units[0].volume"
choose_alternative = 1

[[decision]]
path = "metadata.title"
delete = true
"#,
        )
        .unwrap();
        let warnings = apply(&mut s, &file);
        assert!(warnings.is_empty());

        let volume = s.fields().iter().find(|f| f.path == "units[0].volume").unwrap();
        assert_eq!(volume.value, json!("600 L"));
        assert!(volume.resolved);
        assert!(s.fields().iter().all(|f| f.path != "metadata.title"));
        assert!(s.fields().iter().all(|f| f.section != "Stream: S-1"));
    }

    #[test]
    fn apply_reports_unknown_targets() {
        let mut s = session();
        let file = DecisionsFile::from_toml(
            r#"
delete_sections = ["Unit: nope"]

[[decision]]
path = "units[9].volume"
resolve = true

[[decision]]
path = "units[0].volume"
choose_alternative = 7
"#,
        )
        .unwrap();
        let warnings = apply(&mut s, &file);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("units[9].volume"));
        assert!(warnings[1].contains("index 7 ignored"));
        assert!(warnings[2].contains("Unit: nope"));
    }
}
