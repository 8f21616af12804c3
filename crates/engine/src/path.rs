//! Structural addresses.
//!
//! An address is a dotted path with bracketed sequence indices, e.g.
//! `units[0].design_input_specs.temperature`. Addresses are always
//! engine-generated through `join`/`join_index`; `parse` reads them back.
//! Malformed text degrades to an empty step list, never an error.

/// One step of an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Descend into a named object member.
    Member(String),
    /// Descend into a sequence index.
    Index(usize),
}

/// Tokenize an absolute path into steps.
///
/// Accepts a leading `.`. Bracketed all-digit tokens become `Index`; any
/// other token becomes `Member`. Empty tokens are dropped.
pub fn parse(path: &str) -> Vec<Step> {
    let path = path.strip_prefix('.').unwrap_or(path);
    let mut steps = Vec::new();
    let mut rest = path;

    while !rest.is_empty() {
        if let Some(open) = rest.strip_prefix('[') {
            match open.find(']') {
                Some(end) => {
                    push_bracketed(&mut steps, &open[..end]);
                    rest = &open[end + 1..];
                }
                None => {
                    // Unterminated bracket: salvage the remainder as one token.
                    push_bracketed(&mut steps, open);
                    rest = "";
                }
            }
        } else {
            let end = rest.find(['.', '[', ']']).unwrap_or(rest.len());
            let token = &rest[..end];
            if !token.is_empty() {
                steps.push(Step::Member(token.to_owned()));
            }
            rest = &rest[end..];
            if rest.starts_with(['.', ']']) {
                rest = &rest[1..];
            }
        }
    }

    steps
}

fn push_bracketed(steps: &mut Vec<Step>, token: &str) {
    if token.is_empty() {
        return;
    }
    match token.parse::<usize>() {
        Ok(index) => steps.push(Step::Index(index)),
        Err(_) => steps.push(Step::Member(token.to_owned())),
    }
}

/// Append a member step, producing canonical path text.
pub fn join(prefix: &str, member: &str) -> String {
    if prefix.is_empty() {
        member.to_owned()
    } else {
        format!("{prefix}.{member}")
    }
}

/// Append an index step, producing canonical path text.
pub fn join_index(prefix: &str, index: usize) -> String {
    format!("{prefix}[{index}]")
}

/// True when `steps` begins with every step of `prefix`.
///
/// Step-wise comparison, so `units[1]` is not a prefix of `units[10].flow`.
pub fn is_prefix(prefix: &[Step], steps: &[Step]) -> bool {
    steps.len() >= prefix.len() && prefix.iter().zip(steps).all(|(a, b)| a == b)
}
