//! Stored record structs for every resource kind.
//!
//! Records are deserialized from the `_source` of a search hit. They are
//! populated by the external ingestion pipeline and never written here.
//! Unknown fields are ignored; a missing required field is a data-integrity
//! problem surfaced by the response shaper.

mod resources;
mod values;

pub use resources::{AgentRecord, CollectionRecord, ObjectRecord, TermRecord};
pub use values::{
    DateExpression, Extent, ExternalIdentifier, Language, Note, Reference, RightsGranted,
    RightsStatement, Subnote, SubnoteContent,
};
