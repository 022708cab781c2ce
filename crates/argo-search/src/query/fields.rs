//! Declared filter, search and ordering fields of a resource.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use argo_core::CoreError;
use serde::Serialize;

/// A comparison operator permitted on a filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    Term,
    Terms,
    In,
    Exclude,
    Exists,
    Prefix,
    Startswith,
    Endswith,
    Contains,
    Wildcard,
    Range,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Lookup {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Term => "term",
            Self::Terms => "terms",
            Self::In => "in",
            Self::Exclude => "exclude",
            Self::Exists => "exists",
            Self::Prefix => "prefix",
            Self::Startswith => "startswith",
            Self::Endswith => "endswith",
            Self::Contains => "contains",
            Self::Wildcard => "wildcard",
            Self::Range => "range",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lookup {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "term" => Self::Term,
            "terms" => Self::Terms,
            "in" => Self::In,
            "exclude" => Self::Exclude,
            "exists" => Self::Exists,
            "prefix" => Self::Prefix,
            "startswith" => Self::Startswith,
            "endswith" => Self::Endswith,
            "contains" => Self::Contains,
            "wildcard" => Self::Wildcard,
            "range" => Self::Range,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            _ => return Err(()),
        })
    }
}

/// Lookups available on keyword (exact-string) fields.
pub const STRING_LOOKUPS: &[Lookup] = &[
    Lookup::Term,
    Lookup::Terms,
    Lookup::In,
    Lookup::Exclude,
    Lookup::Exists,
    Lookup::Prefix,
    Lookup::Startswith,
    Lookup::Endswith,
    Lookup::Contains,
    Lookup::Wildcard,
];

/// Lookups available on numeric fields, including dates indexed as epoch values.
pub const NUMBER_LOOKUPS: &[Lookup] = &[
    Lookup::Term,
    Lookup::Terms,
    Lookup::In,
    Lookup::Exclude,
    Lookup::Exists,
    Lookup::Range,
    Lookup::Gt,
    Lookup::Gte,
    Lookup::Lt,
    Lookup::Lte,
];

/// How values of an index field compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Number,
}

impl FieldKind {
    #[must_use]
    pub const fn lookups(self) -> &'static [Lookup] {
        match self {
            Self::String => STRING_LOOKUPS,
            Self::Number => NUMBER_LOOKUPS,
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Number)
    }
}

/// A request-level filter name bound to an index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterField {
    pub name: &'static str,
    pub field: &'static str,
    pub kind: FieldKind,
    pub lookups: &'static [Lookup],
}

impl FilterField {
    #[must_use]
    pub const fn string(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            field,
            kind: FieldKind::String,
            lookups: STRING_LOOKUPS,
        }
    }

    #[must_use]
    pub const fn number(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            field,
            kind: FieldKind::Number,
            lookups: NUMBER_LOOKUPS,
        }
    }

    #[must_use]
    pub fn allows(&self, lookup: Lookup) -> bool {
        self.lookups.contains(&lookup)
    }
}

/// An `ordering` name bound to a sort-capable index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderingField {
    pub name: &'static str,
    pub field: &'static str,
    pub kind: FieldKind,
}

impl OrderingField {
    #[must_use]
    pub const fn string(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            field,
            kind: FieldKind::String,
        }
    }

    #[must_use]
    pub const fn number(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            field,
            kind: FieldKind::Number,
        }
    }
}

/// Everything a resource declares about how it can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceFields {
    pub filters: &'static [FilterField],
    pub search_fields: &'static [&'static str],
    pub ordering: &'static [OrderingField],
}

impl ResourceFields {
    #[must_use]
    pub fn filter(&self, name: &str) -> Option<&FilterField> {
        self.filters.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn ordering_field(&self, name: &str) -> Option<&OrderingField> {
        self.ordering.iter().find(|o| o.name == name)
    }

    /// Check the declaration for mistakes that would make requests ambiguous.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = HashSet::new();
        for filter in self.filters {
            if filter.name.is_empty() || filter.field.is_empty() {
                return Err(CoreError::Validation(
                    "filter fields need a name and an index field".into(),
                ));
            }
            if filter.name.contains("__") {
                return Err(CoreError::Validation(format!(
                    "filter name '{}' must not contain '__'",
                    filter.name
                )));
            }
            if filter.lookups.is_empty() {
                return Err(CoreError::Validation(format!(
                    "filter '{}' permits no lookups",
                    filter.name
                )));
            }
            if !seen.insert(filter.name) {
                return Err(CoreError::Validation(format!(
                    "filter '{}' is declared twice",
                    filter.name
                )));
            }
        }

        if self.search_fields.is_empty() || self.search_fields.iter().any(|f| f.is_empty()) {
            return Err(CoreError::Validation(
                "at least one non-empty search field is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for ordering in self.ordering {
            if ordering.name.is_empty() || ordering.field.is_empty() {
                return Err(CoreError::Validation(
                    "ordering fields need a name and an index field".into(),
                ));
            }
            if ordering.name.starts_with('-') || ordering.name.contains(',') {
                return Err(CoreError::Validation(format!(
                    "ordering name '{}' must not start with '-' or contain ','",
                    ordering.name
                )));
            }
            if !seen.insert(ordering.name) {
                return Err(CoreError::Validation(format!(
                    "ordering '{}' is declared twice",
                    ordering.name
                )));
            }
        }
        Ok(())
    }
}
