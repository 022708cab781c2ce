//! The four top-level resource kinds and their naming conventions.
//!
//! Every kind has a plural route segment (`agents`), a basename used for
//! route names (`agent` → `agent-detail`), and a default index name equal to
//! the plural.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// A top-level addressable resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Agent,
    Collection,
    Object,
    Term,
}

impl ResourceKind {
    /// All kinds, in the order they are registered and listed.
    pub const ALL: [Self; 4] = [Self::Agent, Self::Collection, Self::Object, Self::Term];

    /// Plural route segment and default index name.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Agent => "agents",
            Self::Collection => "collections",
            Self::Object => "objects",
            Self::Term => "terms",
        }
    }

    /// Singular basename used to build route names.
    #[must_use]
    pub const fn basename(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Collection => "collection",
            Self::Object => "object",
            Self::Term => "term",
        }
    }

    /// Route name of the list endpoint, e.g. `agent-list`.
    #[must_use]
    pub fn list_route(self) -> String {
        format!("{}-list", self.basename())
    }

    /// Route name of the detail endpoint, e.g. `agent-detail`.
    #[must_use]
    pub fn detail_route(self) -> String {
        format!("{}-detail", self.basename())
    }

    /// Path of the list endpoint, e.g. `/agents/`.
    #[must_use]
    pub fn list_path(self) -> String {
        format!("/{}/", self.plural())
    }

    /// Synthesized uri of a single resource, e.g. `/agents/ag-1/`.
    ///
    /// The identifier is percent-encoded so that it always forms a single
    /// path segment.
    #[must_use]
    pub fn detail_uri(self, id: &str) -> String {
        format!("/{}/{}/", self.plural(), urlencoding::encode(id))
    }

    /// Whether list items of this kind carry their date expressions.
    #[must_use]
    pub const fn is_dated(self) -> bool {
        !matches!(self, Self::Term)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.basename())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    /// Accepts either the plural or the basename.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.plural() == s || kind.basename() == s)
            .ok_or_else(|| CoreError::UnknownResource(s.to_string()))
    }
}
