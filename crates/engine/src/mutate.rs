//! Address-driven document mutation.
//!
//! Both operations take engine-generated addresses and degrade to a no-op
//! on anything that does not resolve; addresses from a different document
//! shape are not an error condition worth surfacing.

use serde_json::{Map, Value};

use crate::path::{self, Step};

/// Assign `value` at `path`, creating missing intermediate objects.
///
/// Arrays are assumed pre-sized by the source document: an index step that
/// does not resolve is dropped silently, and intermediate array elements
/// are never created.
pub fn set_value(document: &mut Value, path: &str, value: Value) {
    let steps = path::parse(path);
    let Some((last, parents)) = steps.split_last() else {
        return;
    };

    let mut current = document;
    for step in parents {
        match step {
            Step::Index(index) => {
                current = match current.get_mut(*index) {
                    Some(child) => child,
                    None => return,
                };
            }
            Step::Member(name) => {
                let Value::Object(map) = current else { return };
                let slot = map.entry(name.clone()).or_insert(Value::Null);
                if slot.is_null() {
                    *slot = Value::Object(Map::new());
                }
                if !slot.is_object() && !slot.is_array() {
                    // A scalar in the way: the address does not fit this
                    // document, leave it untouched.
                    return;
                }
                current = slot;
            }
        }
    }

    match last {
        Step::Member(name) => {
            if let Value::Object(map) = current {
                map.insert(name.clone(), value);
            }
        }
        Step::Index(index) => {
            if let Some(slot) = current.get_mut(*index) {
                *slot = value;
            }
        }
    }
}

/// Remove the member addressed by `path`.
///
/// A final index step is a deliberate no-op: splicing an array would shift
/// every sibling's address. Unresolvable intermediate steps are skipped
/// silently.
pub fn delete_member(document: &mut Value, path: &str) {
    let steps = path::parse(path);
    let Some((last, parents)) = steps.split_last() else {
        return;
    };

    let mut current = document;
    for step in parents {
        current = match step {
            Step::Index(index) => match current.get_mut(*index) {
                Some(child) => child,
                None => return,
            },
            Step::Member(name) => match current.get_mut(name.as_str()) {
                Some(child) => child,
                None => return,
            },
        };
    }

    if let Step::Member(name) = last {
        if let Value::Object(map) = current {
            map.remove(name);
        }
    }
}
