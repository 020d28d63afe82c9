//! Protocol lifecycle: validated changes, numbering and the transition engine that
//! keeps the status history in step with the protocol row.

pub mod changeset;
pub mod engine;
pub mod numbering;
pub mod store;

pub use changeset::{NewProtocol, ProtocolChangeSet, ProtocolDefaults, ProtocolDraft, ProtocolPatch, ProtocolUpdate};
pub use engine::{TransitionEngine, TransitionOutcome};
pub use store::{NewProtocolRecord, PgTransitionStore, TransitionStore};
