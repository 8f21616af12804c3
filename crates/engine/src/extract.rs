//! Field discovery.
//!
//! Schema-free recursive walk over an extraction document. Any object node
//! carrying both `value` and `confidence` is a field; everything else is
//! structure. Section labels come from the well-known top-level containers
//! (`metadata`, `units`, `streams`, `chemicals`, `utilities`), which each
//! get a dedicated entry point because the labels are domain-specific.

use regex::Regex;
use serde_json::{Map, Value};

use crate::model::{AgentContribution, Confidence, FieldId, FieldRecord, SourceRef};
use crate::path;

/// Metadata members of a field object. Never treated as nested structure.
const RESERVED_KEYS: [&str; 4] = ["confidence", "source_details", "alternatives", "comment"];

/// Discover every field in `document`, in document order.
///
/// A document may be wrapped in a singleton array; only element 0 is
/// inspected and all addresses gain a `[0].` prefix. A root that is neither
/// an object nor an array yields no fields.
pub fn extract(document: &Value) -> Vec<FieldRecord> {
    let (root, root_prefix) = match document {
        Value::Array(items) => match items.first() {
            Some(first) => (first, "[0]"),
            None => return Vec::new(),
        },
        other => (other, ""),
    };
    let Some(root_obj) = root.as_object() else {
        return Vec::new();
    };

    let mut walker = Walker { fields: Vec::new(), next_id: 0 };

    if let Some(meta) = root_obj.get("metadata") {
        walker.traverse(meta, "Metadata", &path::join(root_prefix, "metadata"), "");
    }

    for (container, kind) in [("units", "Unit"), ("streams", "Stream"), ("chemicals", "Chemical")] {
        if let Some(Value::Array(items)) = root_obj.get(container) {
            let container_path = path::join(root_prefix, container);
            for (idx, element) in items.iter().enumerate() {
                let section = match element.get("id").and_then(Value::as_str) {
                    Some(id) => format!("{kind}: {id}"),
                    None => format!("{kind}: Unknown {kind}"),
                };
                walker.element_members(element, &section, &path::join_index(&container_path, idx));
            }
        }
    }

    // utilities is one level deeper: a mapping from utility type to an
    // array of elements.
    if let Some(Value::Object(groups)) = root_obj.get("utilities") {
        let utilities_path = path::join(root_prefix, "utilities");
        for (util_type, group) in groups {
            let Value::Array(items) = group else { continue };
            let group_path = path::join(&utilities_path, util_type);
            for (idx, element) in items.iter().enumerate() {
                let id = element.get("id").and_then(Value::as_str).unwrap_or(util_type);
                let section = format!("Utility: {id}");
                walker.element_members(element, &section, &path::join_index(&group_path, idx));
            }
        }
    }

    walker.fields
}

/// Parse a 1-based page number out of a free-text location string.
///
/// `"Page 4, Table 2"` → 4. Missing or unparsable locations default to 1.
pub fn parse_page_number(location: Option<&str>) -> u32 {
    let Some(location) = location else { return 1 };
    let re = Regex::new(r"(?i)page\s+(\d+)").unwrap();
    re.captures(location)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(1)
}

fn is_field_object(obj: &Map<String, Value>) -> bool {
    obj.contains_key("value") && obj.contains_key("confidence")
}

fn source_ref(details: &Map<String, Value>) -> SourceRef {
    let location = details.get("location").and_then(Value::as_str).map(str::to_owned);
    SourceRef {
        page: parse_page_number(location.as_deref()),
        location,
        kind: details.get("type").and_then(Value::as_str).map(str::to_owned),
        snippet: details
            .get("snippet")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
    }
}

struct Walker {
    fields: Vec<FieldRecord>,
    next_id: u32,
}

impl Walker {
    /// Generic descent. Field objects stop the walk and emit a record.
    fn traverse(&mut self, node: &Value, section: &str, path: &str, key: &str) {
        match node {
            Value::Object(obj) => {
                if is_field_object(obj) {
                    self.emit(obj, section, path, key);
                    return;
                }
                for (name, child) in obj {
                    if RESERVED_KEYS.contains(&name.as_str()) {
                        continue;
                    }
                    self.traverse(child, section, &path::join(path, name), &path::join(key, name));
                }
            }
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    self.traverse(
                        item,
                        section,
                        &path::join_index(path, idx),
                        &path::join_index(key, idx),
                    );
                }
            }
            _ => {}
        }
    }

    /// Descend into every member of a container element except its `id`.
    fn element_members(&mut self, element: &Value, section: &str, elem_path: &str) {
        let Some(obj) = element.as_object() else { return };
        for (name, child) in obj {
            if name == "id" {
                continue;
            }
            self.traverse(child, section, &path::join(elem_path, name), name);
        }
    }

    fn emit(&mut self, obj: &Map<String, Value>, section: &str, path: &str, key: &str) {
        let alternatives = obj
            .get("alternatives")
            .and_then(Value::as_array)
            .map(|alts| {
                alts.iter()
                    .map(|alt| AgentContribution {
                        agent: alt
                            .get("source")
                            .and_then(Value::as_str)
                            .unwrap_or("Unknown Agent")
                            .to_owned(),
                        value: alt.get("value").cloned().unwrap_or(Value::Null),
                        source: alt
                            .get("source_details")
                            .and_then(Value::as_object)
                            .map(source_ref),
                    })
                    .collect()
            })
            .unwrap_or_default();

        // Source for the current value lives under the confidence object
        // (typical for medium-confidence fields).
        let source = obj
            .get("confidence")
            .and_then(Value::as_object)
            .and_then(|conf| conf.get("source_details"))
            .and_then(Value::as_object)
            .map(source_ref);

        let comment = obj
            .get("comment")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);

        let label = key.rsplit('.').next().unwrap_or(key).to_owned();

        self.fields.push(FieldRecord {
            id: FieldId::from_raw(self.next_id),
            section: section.to_owned(),
            path: path.to_owned(),
            key: key.to_owned(),
            label,
            value: obj.get("value").cloned().unwrap_or(Value::Null),
            confidence: Confidence::normalize(obj.get("confidence")),
            alternatives,
            resolved: false,
            source,
            comment,
        });
        self.next_id += 1;
    }
}
