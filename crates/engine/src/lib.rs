//! `fieldloom-engine` — structural reconciliation engine for multi-agent
//! extraction documents.
//!
//! Pure engine crate: receives parsed JSON documents, returns flat field
//! lists and reconciled exports. No CLI or IO dependencies.

pub mod error;
pub mod extract;
pub mod model;
pub mod mutate;
pub mod path;
pub mod reconcile;
pub mod session;

pub use error::ParseError;
pub use extract::extract;
pub use model::{
    AgentContribution, Confidence, FieldId, FieldRecord, Progress, SelectionContext, SourceRef,
    TierProgress,
};
pub use reconcile::reconcile;
pub use session::{coerce_edit, ReviewSession};
