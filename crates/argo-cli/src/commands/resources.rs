use anyhow::Context;
use argo_api::{ResourceConfig, ResourceRegistry};
use argo_config::ArgoConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct ResourceRow {
    pub resource: &'static str,
    pub path: String,
    pub index: String,
    pub filters: String,
    pub ordering: String,
    pub search: String,
}

impl ResourceRow {
    fn describe(resource: &ResourceConfig, config: &ArgoConfig) -> Self {
        let fields = &resource.fields;
        Self {
            resource: resource.kind.plural(),
            path: resource.kind.list_path(),
            index: config.indices.name_for(resource.kind),
            filters: fields
                .filters
                .iter()
                .map(|f| f.name)
                .collect::<Vec<_>>()
                .join(", "),
            ordering: fields
                .ordering
                .iter()
                .map(|o| o.name)
                .collect::<Vec<_>>()
                .join(", "),
            search: fields.search_fields.join(", "),
        }
    }
}

/// Rows describing every registered resource.
pub fn rows(config: &ArgoConfig) -> anyhow::Result<Vec<ResourceRow>> {
    let registry = ResourceRegistry::builtin().context("invalid resource declarations")?;
    Ok(registry
        .iter()
        .map(|resource| ResourceRow::describe(resource, config))
        .collect())
}

pub fn handle(config: &ArgoConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&rows(config)?, flags.format)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rows_apply_index_prefix() {
        let mut config = ArgoConfig::default();
        config.indices.prefix = "argo_".into();

        let rows = rows(&config).expect("builtin resources are valid");
        let names: Vec<&str> = rows.iter().map(|r| r.resource).collect();
        assert_eq!(names, vec!["agents", "collections", "objects", "terms"]);
        assert_eq!(rows[1].index, "argo_collections");
        assert_eq!(rows[1].path, "/collections/");
        assert!(rows[1].filters.contains("level"));
        assert_eq!(rows[3].ordering, "title");
    }
}
