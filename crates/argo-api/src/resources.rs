//! Static per-resource configuration and the validated registry.

use argo_core::{CoreError, ResourceKind};
use argo_search::{FilterField, OrderingField, ResourceFields};
use serde::Serialize;

/// Everything the API declares about one resource kind.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResourceConfig {
    pub kind: ResourceKind,
    pub description: &'static str,
    #[serde(flatten)]
    pub fields: ResourceFields,
}

pub const AGENTS: ResourceConfig = ResourceConfig {
    kind: ResourceKind::Agent,
    description: "Returns data about agents, including people, organizations and families.",
    fields: ResourceFields {
        filters: &[
            FilterField::string("id", "id"),
            FilterField::string("title", "title.keyword"),
            FilterField::string("description", "description.keyword"),
            FilterField::string("type", "type"),
            FilterField::number("start_date", "dates.begin"),
            FilterField::number("end_date", "dates.end"),
        ],
        search_fields: &["title", "description", "notes.subnotes.content"],
        ordering: &[
            OrderingField::string("title", "title.keyword"),
            OrderingField::string("type", "type.keyword"),
            OrderingField::number("start_date", "dates.begin"),
            OrderingField::number("end_date", "dates.end"),
        ],
    },
};

pub const COLLECTIONS: ResourceConfig = ResourceConfig {
    kind: ResourceKind::Collection,
    description: "Returns data about collections, or intellectually significant groups of \
                  archival records.",
    fields: ResourceFields {
        filters: &[
            FilterField::string("id", "id"),
            FilterField::string("title", "title.keyword"),
            FilterField::number("start_date", "dates.begin"),
            FilterField::number("end_date", "dates.end"),
            FilterField::string("level", "level.keyword"),
        ],
        search_fields: &["title", "notes.subnotes.content"],
        ordering: &[
            OrderingField::string("title", "title.keyword"),
            OrderingField::string("level", "level.keyword"),
            OrderingField::number("start_date", "dates.begin"),
            OrderingField::number("end_date", "dates.end"),
        ],
    },
};

pub const OBJECTS: ResourceConfig = ResourceConfig {
    kind: ResourceKind::Object,
    description: "Returns data about objects, or groups of archival records which have no \
                  children.",
    fields: ResourceFields {
        filters: &[
            FilterField::string("id", "id"),
            FilterField::string("title", "title.keyword"),
            FilterField::number("start_date", "dates.begin"),
            FilterField::number("end_date", "dates.end"),
        ],
        search_fields: &["title", "notes.subnotes.content"],
        ordering: &[
            OrderingField::string("title", "title.keyword"),
            OrderingField::number("start_date", "dates.begin"),
            OrderingField::number("end_date", "dates.end"),
        ],
    },
};

pub const TERMS: ResourceConfig = ResourceConfig {
    kind: ResourceKind::Term,
    description: "Returns data about terms, including subjects, geographic areas and more.",
    fields: ResourceFields {
        filters: &[
            FilterField::string("id", "id"),
            FilterField::string("title", "title.keyword"),
            FilterField::string("type", "type"),
        ],
        search_fields: &["title", "type"],
        ordering: &[OrderingField::string("title", "title.keyword")],
    },
};

const fn slot(kind: ResourceKind) -> usize {
    match kind {
        ResourceKind::Agent => 0,
        ResourceKind::Collection => 1,
        ResourceKind::Object => 2,
        ResourceKind::Term => 3,
    }
}

/// The configurations of all resource kinds, validated.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ResourceRegistry {
    resources: [ResourceConfig; 4],
}

impl ResourceRegistry {
    /// The registry of the four built-in resources.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if a built-in declaration is invalid.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::new([AGENTS, COLLECTIONS, OBJECTS, TERMS])
    }

    /// Validate and register one configuration per kind, in
    /// [`ResourceKind::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] naming the resource at fault.
    pub fn new(resources: [ResourceConfig; 4]) -> Result<Self, CoreError> {
        for (expected, config) in ResourceKind::ALL.into_iter().zip(&resources) {
            if config.kind != expected {
                return Err(CoreError::Validation(format!(
                    "expected the {expected} resource in position {}, found {}",
                    slot(expected),
                    config.kind
                )));
            }
            config.fields.validate().map_err(|e| {
                CoreError::Validation(format!("{}: {e}", config.kind.plural()))
            })?;
        }
        Ok(Self { resources })
    }

    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> &ResourceConfig {
        &self.resources[slot(kind)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceConfig> {
        self.resources.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_registry_is_valid() {
        let registry = ResourceRegistry::builtin().unwrap();
        let kinds: Vec<ResourceKind> = registry.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, ResourceKind::ALL.to_vec());
        assert!(registry.get(ResourceKind::Collection).fields.filter("level").is_some());
        assert!(registry.get(ResourceKind::Object).fields.filter("level").is_none());
    }

    #[test]
    fn misplaced_resource_is_rejected() {
        let err = ResourceRegistry::new([COLLECTIONS, AGENTS, OBJECTS, TERMS]).unwrap_err();
        assert!(err.to_string().contains("agent"), "{err}");
    }

    #[test]
    fn invalid_fields_name_the_resource() {
        let broken = ResourceConfig {
            fields: ResourceFields {
                search_fields: &[],
                ..TERMS.fields
            },
            ..TERMS
        };
        let err = ResourceRegistry::new([AGENTS, COLLECTIONS, OBJECTS, broken]).unwrap_err();
        assert!(err.to_string().contains("terms"), "{err}");
    }

    #[test]
    fn registry_serializes_field_maps() {
        let value = serde_json::to_value(ResourceRegistry::builtin().unwrap()).unwrap();
        assert_eq!(value[0]["kind"], "agent");
        assert_eq!(value[1]["filters"][4]["name"], "level");
        assert_eq!(value[1]["filters"][4]["field"], "level.keyword");
        assert_eq!(value[3]["ordering"][0]["field"], "title.keyword");
        assert_eq!(value[2]["filters"][2]["lookups"][5], "range");
    }
}
