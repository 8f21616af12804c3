//! Faithful export.
//!
//! Produces a brand-new document from the retained original plus the live
//! field list: untouched structure is preserved byte-for-byte, reviewer
//! deletions and edits are applied, emptied container elements are dropped,
//! and clean mode strips working metadata as a final pass.

use std::collections::HashSet;

use serde_json::Value;

use crate::extract::extract;
use crate::model::FieldRecord;
use crate::mutate;
use crate::path::{self, Step};

/// Members stripped everywhere by a clean export.
const WORKING_KEYS: [&str; 3] = ["alternatives", "reviewed", "comment"];

/// Reconcile `original` with the reviewer's `fields` into a new document.
///
/// The original is never mutated. Given identical inputs the output
/// re-serializes byte-identically.
pub fn reconcile(original: &Value, fields: &[FieldRecord], clean: bool) -> Value {
    let mut output = original.clone();

    // Re-derive the baseline: the live list may have dropped entries, and
    // comparing against a fresh parse of the original is the only reliable
    // record of what used to exist. Comparison is by address, never by id.
    let baseline = extract(original);
    let current_paths: HashSet<&str> = fields.iter().map(|f| f.path.as_str()).collect();

    for field in &baseline {
        if !current_paths.contains(field.path.as_str()) {
            mutate::delete_member(&mut output, &field.path);
        }
    }

    // Value and annotation writes run before pruning so the element indices
    // baked into field addresses still match the copy.
    for field in fields {
        if !clean {
            if let Some(comment) = field.comment.as_deref().filter(|c| !c.is_empty()) {
                mutate::set_value(
                    &mut output,
                    &path::join(&field.path, "comment"),
                    Value::String(comment.to_owned()),
                );
            }
        }
        if field.resolved {
            mutate::set_value(
                &mut output,
                &path::join(&field.path, "value"),
                field.value.clone(),
            );
            if !clean {
                mutate::set_value(
                    &mut output,
                    &path::join(&field.path, "reviewed"),
                    Value::Bool(true),
                );
            }
        }
    }

    let field_steps: Vec<Vec<Step>> = fields.iter().map(|f| path::parse(&f.path)).collect();
    prune_containers(&mut output, &field_steps);

    if clean {
        strip_members(&mut output, &WORKING_KEYS);
    }

    output
}

/// Drop every `units`/`streams`/`chemicals`/`utilities.<type>` element with
/// no surviving field address under its prefix.
fn prune_containers(output: &mut Value, field_steps: &[Vec<Step>]) {
    let root_steps: Vec<Step> = match output {
        Value::Array(_) => vec![Step::Index(0)],
        _ => Vec::new(),
    };
    let root = match output {
        Value::Array(items) => match items.first_mut() {
            Some(first) => first,
            None => return,
        },
        other => other,
    };
    let Value::Object(root_obj) = root else { return };

    for container in ["units", "streams", "chemicals"] {
        if let Some(Value::Array(items)) = root_obj.get_mut(container) {
            let mut base = root_steps.clone();
            base.push(Step::Member(container.to_owned()));
            retain_claimed(items, &base, field_steps);
        }
    }

    if let Some(Value::Object(groups)) = root_obj.get_mut("utilities") {
        for (util_type, group) in groups.iter_mut() {
            let Value::Array(items) = group else { continue };
            let mut base = root_steps.clone();
            base.push(Step::Member("utilities".to_owned()));
            base.push(Step::Member(util_type.clone()));
            retain_claimed(items, &base, field_steps);
        }
    }
}

fn retain_claimed(items: &mut Vec<Value>, base: &[Step], field_steps: &[Vec<Step>]) {
    let keep: Vec<bool> = (0..items.len())
        .map(|index| {
            let mut prefix = base.to_vec();
            prefix.push(Step::Index(index));
            field_steps.iter().any(|steps| path::is_prefix(&prefix, steps))
        })
        .collect();
    let mut keep = keep.into_iter();
    items.retain(|_| keep.next().unwrap_or(false));
}

fn strip_members(node: &mut Value, keys: &[&str]) {
    match node {
        Value::Array(items) => {
            for item in items {
                strip_members(item, keys);
            }
        }
        Value::Object(map) => {
            for key in keys {
                map.remove(*key);
            }
            for (_, child) in map.iter_mut() {
                strip_members(child, keys);
            }
        }
        _ => {}
    }
}
