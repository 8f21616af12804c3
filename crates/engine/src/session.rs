//! Review-session state.
//!
//! A session owns the retained original document and the live field list.
//! Review actions mutate the field list only; the document itself is not
//! touched until `export` reconciles the two into a fresh output value.
//! Unknown field ids are ignored, matching the lenient posture of the
//! address layer.

use serde_json::Value;

use crate::error::ParseError;
use crate::extract::extract;
use crate::model::{
    Confidence, FieldId, FieldRecord, Progress, SelectionContext, SourceRef, TierProgress,
};
use crate::reconcile::reconcile;

pub struct ReviewSession {
    file_name: String,
    original: Value,
    fields: Vec<FieldRecord>,
}

impl ReviewSession {
    /// Parse raw JSON text into a session.
    ///
    /// This is the one user-visible failure point: malformed JSON or a
    /// scalar root aborts with no partial field list.
    pub fn from_json(json: &str, file_name: impl Into<String>) -> Result<Self, ParseError> {
        let document: Value =
            serde_json::from_str(json).map_err(|e| ParseError::Json(e.to_string()))?;
        Self::new(document, file_name)
    }

    /// Build a session from an already-parsed document.
    pub fn new(document: Value, file_name: impl Into<String>) -> Result<Self, ParseError> {
        if !document.is_object() && !document.is_array() {
            return Err(ParseError::NotADocument);
        }
        let fields = extract(&document);
        Ok(Self {
            file_name: file_name.into(),
            original: document,
            fields,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The retained original. Never mutated for the session's lifetime.
    pub fn original(&self) -> &Value {
        &self.original
    }

    pub fn fields(&self) -> &[FieldRecord] {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> Option<&FieldRecord> {
        self.fields.iter().find(|f| f.id == id)
    }

    fn field_mut(&mut self, id: FieldId) -> Option<&mut FieldRecord> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    /// Overwrite a field's value and resolution flag.
    pub fn set_value(&mut self, id: FieldId, value: Value, resolved: bool) {
        if let Some(field) = self.field_mut(id) {
            field.value = value;
            field.resolved = resolved;
        }
    }

    /// Attach a reviewer comment. An empty string clears it.
    pub fn set_comment(&mut self, id: FieldId, comment: &str) {
        if let Some(field) = self.field_mut(id) {
            field.comment = if comment.is_empty() {
                None
            } else {
                Some(comment.to_owned())
            };
        }
    }

    /// Adopt an alternative's value and mark the field resolved.
    pub fn choose_alternative(&mut self, id: FieldId, index: usize) {
        let Some(field) = self.field_mut(id) else { return };
        let Some(value) = field.alternatives.get(index).map(|alt| alt.value.clone()) else {
            return;
        };
        field.value = value;
        field.resolved = true;
    }

    /// Drop a field from review. The export pass turns this into a
    /// structural deletion.
    pub fn delete_field(&mut self, id: FieldId) {
        self.fields.retain(|f| f.id != id);
    }

    /// Drop every field belonging to a section.
    pub fn delete_section(&mut self, section: &str) {
        self.fields.retain(|f| f.section != section);
    }

    /// Viewer context for a field's current value, when it has a source.
    pub fn selection_context(&self, id: FieldId) -> Option<SelectionContext> {
        let field = self.field(id)?;
        let source = field.source.as_ref()?;
        Some(context(id, source, "Current Value"))
    }

    /// Viewer context for one of a field's alternatives.
    pub fn alternative_context(&self, id: FieldId, index: usize) -> Option<SelectionContext> {
        let field = self.field(id)?;
        let alt = field.alternatives.get(index)?;
        let source = alt.source.as_ref()?;
        Some(context(id, source, &alt.agent))
    }

    pub fn progress(&self) -> Progress {
        let total = self.fields.len();
        let resolved = self.fields.iter().filter(|f| f.resolved).count();
        let percent = if total == 0 {
            0
        } else {
            percent_of(resolved, total)
        };
        Progress {
            total,
            resolved,
            percent,
            low: self.tier_progress(Confidence::Low),
            medium: self.tier_progress(Confidence::Medium),
        }
    }

    fn tier_progress(&self, tier: Confidence) -> TierProgress {
        let total = self.fields.iter().filter(|f| f.confidence == tier).count();
        let resolved = self
            .fields
            .iter()
            .filter(|f| f.confidence == tier && f.resolved)
            .count();
        // An empty tier counts as fully reviewed.
        let percent = if total == 0 {
            100
        } else {
            percent_of(resolved, total)
        };
        TierProgress { total, resolved, percent }
    }

    /// Reconcile the retained original with the live field list.
    pub fn export(&self, clean: bool) -> Value {
        reconcile(&self.original, &self.fields, clean)
    }
}

fn context(field: FieldId, source: &SourceRef, agent: &str) -> SelectionContext {
    SelectionContext {
        field,
        page: source.page,
        snippet: source.snippet.clone(),
        location: source.location.clone(),
        kind: source.kind.clone(),
        agent: agent.to_owned(),
    }
}

fn percent_of(part: usize, whole: usize) -> u8 {
    ((part as f64 / whole as f64) * 100.0).round() as u8
}

/// Best-effort coercion of a manual text edit.
///
/// Numeric parse first, then a JSON parse when the text looks like a
/// structure, else the raw text. Never fails.
pub fn coerce_edit(text: &str) -> Value {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::from(n);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                if let Some(n) = serde_json::Number::from_f64(f) {
                    return Value::Number(n);
                }
            }
        }
    }
    if text.starts_with('{') || text.starts_with('[') {
        if let Ok(value) = serde_json::from_str(text) {
            return value;
        }
    }
    Value::String(text.to_owned())
}
