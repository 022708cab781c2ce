//! Response shapes returned as JSON by the API.
//!
//! A resource renders either as a [`ListItem`] (summary, used in paged list
//! responses) or as a [`DetailDocument`] (every stored attribute plus the
//! synthesized `uri`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::records::{AgentRecord, CollectionRecord, DateExpression, ObjectRecord, TermRecord};

/// Summary rendering of a resource in a list response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ListItem {
    pub uri: String,
    pub title: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Present for agents, collections and objects; empty when none are stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<DateExpression>>,
}

/// Placeholder for a hit whose stored document could not be shaped.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InvalidEntry {
    pub id: String,
    pub error: String,
}

/// One entry of a list page.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum ListEntry {
    Item(ListItem),
    Invalid(InvalidEntry),
}

/// Full rendering of a stored record with its synthesized uri.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Detail<T> {
    pub uri: String,
    #[serde(flatten)]
    pub record: T,
}

/// A detail rendering for any resource kind.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum DetailDocument {
    Agent(Detail<AgentRecord>),
    Collection(Detail<CollectionRecord>),
    Object(Detail<ObjectRecord>),
    Term(Detail<TermRecord>),
}

impl DetailDocument {
    #[must_use]
    pub fn uri(&self) -> &str {
        match self {
            Self::Agent(d) => &d.uri,
            Self::Collection(d) => &d.uri,
            Self::Object(d) => &d.uri,
            Self::Term(d) => &d.uri,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Agent(d) => &d.record.id,
            Self::Collection(d) => &d.record.id,
            Self::Object(d) => &d.record.id,
            Self::Term(d) => &d.record.id,
        }
    }
}

/// A paged list response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Page<T> {
    /// Total number of matching documents across all pages.
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}
