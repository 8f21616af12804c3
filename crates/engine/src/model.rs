use serde::Serialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Normalized confidence tier of an extracted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Normalize a raw `confidence` member into a tier.
    ///
    /// Accepts a bare string or an object with a `level` member, matched
    /// case-insensitively. Anything absent or unrecognized is `Low`.
    pub fn normalize(raw: Option<&Value>) -> Self {
        let level = match raw {
            Some(Value::String(s)) => s.as_str(),
            Some(Value::Object(map)) => match map.get("level").and_then(Value::as_str) {
                Some(level) => level,
                None => return Self::Low,
            },
            _ => return Self::Low,
        };
        match level.to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Where in the source material a value was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRef {
    /// 1-based page number parsed from the location text.
    pub page: u32,
    /// Full raw location string, e.g. "Page 4, Fermentation section".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Source kind, e.g. "text", "figure", "table".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Verbatim snippet for substring matching in a viewer.
    pub snippet: String,
}

/// One agent's candidate value for a field.
#[derive(Debug, Clone, Serialize)]
pub struct AgentContribution {
    pub agent: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Identifier for a field within one parse.
///
/// Assigned in traversal order. Re-parsing the same document yields a fresh
/// identifier space, so cross-parse comparisons must use the address, never
/// the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FieldId(u32);

impl FieldId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "field-{}", self.0)
    }
}

/// One reviewable field discovered in a document.
#[derive(Debug, Clone, Serialize)]
pub struct FieldRecord {
    pub id: FieldId,
    /// Human-facing grouping, e.g. "Metadata", "Unit: SFR-101".
    pub section: String,
    /// Absolute address in the document, e.g. "units[0].volume".
    pub path: String,
    /// Relative display key. Never used for addressing.
    pub key: String,
    /// Last segment of the display key.
    pub label: String,
    /// Currently selected value.
    pub value: Value,
    pub confidence: Confidence,
    pub alternatives: Vec<AgentContribution>,
    /// Human approval flag. User state, never derived from the document.
    pub resolved: bool,
    /// Source for the current value, when the document carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// ---------------------------------------------------------------------------
// Viewer hand-off
// ---------------------------------------------------------------------------

/// Context handed to a source viewer when a field or alternative is
/// selected. The engine supplies page + snippet only; highlight geometry is
/// the viewer's problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionContext {
    pub field: FieldId,
    pub page: u32,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub agent: String,
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Resolved counts for one confidence tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierProgress {
    pub total: usize,
    pub resolved: usize,
    /// Rounded percentage. An empty tier reports 100.
    pub percent: u8,
}

/// Review progress over the whole field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub resolved: usize,
    /// Rounded percentage. An empty list reports 0.
    pub percent: u8,
    pub low: TierProgress,
    pub medium: TierProgress,
}
