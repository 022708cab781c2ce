use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::values::{
    DateExpression, Extent, ExternalIdentifier, Language, Note, Reference, RightsStatement,
};

/// A person, organization or family.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AgentRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub agent_type: String,
    pub external_identifiers: Vec<ExternalIdentifier>,
    pub description: Option<String>,
    pub dates: Option<Vec<DateExpression>>,
    pub notes: Option<Vec<Note>>,
    pub collections: Option<Vec<Reference>>,
    pub objects: Option<Vec<Reference>>,
}

/// An intellectually significant group of archival records.
///
/// Collections form a hierarchy through `ancestors` and `children`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CollectionRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub collection_type: String,
    pub external_identifiers: Vec<ExternalIdentifier>,
    pub level: String,
    pub languages: Option<Vec<Language>>,
    pub extents: Vec<Extent>,
    pub dates: Option<Vec<DateExpression>>,
    pub notes: Option<Vec<Note>>,
    pub rights_statements: Option<Vec<RightsStatement>>,
    pub agents: Option<Vec<Reference>>,
    pub creators: Option<Vec<Reference>>,
    pub terms: Option<Vec<Reference>>,
    pub ancestors: Option<Vec<Reference>>,
    pub children: Option<Vec<Reference>>,
}

/// A group of archival records with no children.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ObjectRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub object_type: String,
    pub external_identifiers: Vec<ExternalIdentifier>,
    pub languages: Option<Vec<Language>>,
    pub extents: Option<Vec<Extent>>,
    pub dates: Option<Vec<DateExpression>>,
    pub notes: Option<Vec<Note>>,
    pub rights_statements: Option<Vec<RightsStatement>>,
    pub agents: Option<Vec<Reference>>,
    pub terms: Option<Vec<Reference>>,
    pub ancestors: Option<Vec<Reference>>,
}

/// A subject, geographic area, genre or other controlled term.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TermRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub term_type: String,
    pub external_identifiers: Vec<ExternalIdentifier>,
    pub collections: Option<Vec<Reference>>,
    pub objects: Option<Vec<Reference>>,
}
