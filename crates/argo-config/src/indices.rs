//! Logical index names per resource kind.

use argo_core::ResourceKind;
use serde::{Deserialize, Serialize};

fn agents() -> String {
    ResourceKind::Agent.plural().to_string()
}

fn collections() -> String {
    ResourceKind::Collection.plural().to_string()
}

fn objects() -> String {
    ResourceKind::Object.plural().to_string()
}

fn terms() -> String {
    ResourceKind::Term.plural().to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Prepended verbatim to every index name (e.g. `argo_`).
    #[serde(default)]
    pub prefix: String,

    #[serde(default = "agents")]
    pub agents: String,

    #[serde(default = "collections")]
    pub collections: String,

    #[serde(default = "objects")]
    pub objects: String,

    #[serde(default = "terms")]
    pub terms: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            agents: agents(),
            collections: collections(),
            objects: objects(),
            terms: terms(),
        }
    }
}

impl IndexConfig {
    /// Full index name backing `kind`.
    #[must_use]
    pub fn name_for(&self, kind: ResourceKind) -> String {
        let name = match kind {
            ResourceKind::Agent => &self.agents,
            ResourceKind::Collection => &self.collections,
            ResourceKind::Object => &self.objects,
            ResourceKind::Term => &self.terms,
        };
        format!("{}{name}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plural_names() {
        let config = IndexConfig::default();
        for kind in ResourceKind::ALL {
            assert_eq!(config.name_for(kind), kind.plural());
        }
    }

    #[test]
    fn prefix_is_prepended() {
        let config = IndexConfig {
            prefix: "argo_".into(),
            terms: "vocab".into(),
            ..Default::default()
        };
        assert_eq!(config.name_for(ResourceKind::Term), "argo_vocab");
        assert_eq!(config.name_for(ResourceKind::Agent), "argo_agents");
    }
}
