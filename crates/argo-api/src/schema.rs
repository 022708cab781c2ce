//! Machine-readable description of the API served at `/schema/`.

use argo_core::ResourceKind;
use argo_core::records::{AgentRecord, CollectionRecord, ObjectRecord, TermRecord};
use argo_core::responses::{Detail, ListEntry, Page};
use argo_search::query::RESERVED_PARAMETERS;
use argo_search::{FilterField, OrderingField};
use schemars::schema_for;
use serde::Serialize;
use serde_json::Value;

use crate::resources::{ResourceConfig, ResourceRegistry};

#[derive(Debug, Clone, Serialize)]
pub struct ApiSchema {
    pub title: &'static str,
    pub version: &'static str,
    pub reserved_parameters: &'static [&'static str],
    pub resources: Vec<ResourceSchema>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceSchema {
    pub name: &'static str,
    pub kind: ResourceKind,
    pub description: &'static str,
    pub list_route: String,
    pub detail_route: String,
    pub list_path: String,
    pub detail_path: String,
    pub filters: &'static [FilterField],
    pub search_fields: &'static [&'static str],
    pub ordering: &'static [OrderingField],
    /// JSON Schema of a list response page.
    pub list_schema: Value,
    /// JSON Schema of a detail response.
    pub detail_schema: Value,
}

impl ResourceSchema {
    fn describe(config: &ResourceConfig) -> Self {
        let kind = config.kind;
        Self {
            name: kind.plural(),
            kind,
            description: config.description,
            list_route: kind.list_route(),
            detail_route: kind.detail_route(),
            list_path: kind.list_path(),
            detail_path: format!("{}{{id}}/", kind.list_path()),
            filters: config.fields.filters,
            search_fields: config.fields.search_fields,
            ordering: config.fields.ordering,
            list_schema: schema_for!(Page<ListEntry>).to_value(),
            detail_schema: detail_schema(kind),
        }
    }
}

fn detail_schema(kind: ResourceKind) -> Value {
    match kind {
        ResourceKind::Agent => schema_for!(Detail<AgentRecord>),
        ResourceKind::Collection => schema_for!(Detail<CollectionRecord>),
        ResourceKind::Object => schema_for!(Detail<ObjectRecord>),
        ResourceKind::Term => schema_for!(Detail<TermRecord>),
    }
    .to_value()
}

/// Describe every registered resource.
#[must_use]
pub fn api_schema(registry: &ResourceRegistry) -> ApiSchema {
    ApiSchema {
        title: "Argo",
        version: env!("CARGO_PKG_VERSION"),
        reserved_parameters: RESERVED_PARAMETERS,
        resources: registry.iter().map(ResourceSchema::describe).collect(),
    }
}
