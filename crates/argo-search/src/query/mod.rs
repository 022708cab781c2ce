//! Structured search queries and their Elasticsearch rendering.
//!
//! A [`SearchQuery`] is backend-neutral: [`QueryBuilder`] produces it from
//! request parameters, [`SearchQuery::to_request_body`] renders it as query
//! DSL for Elasticsearch, and the in-memory backend evaluates it directly.

mod builder;
mod fields;

pub use builder::{PageLimits, QueryBuilder, RESERVED_PARAMETERS};
pub use fields::{
    FieldKind, FilterField, Lookup, NUMBER_LOOKUPS, OrderingField, ResourceFields, STRING_LOOKUPS,
};

use serde_json::{Map, Value, json};

/// Bounds of a range predicate. Absent bounds are open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bounds {
    pub gt: Option<String>,
    pub gte: Option<String>,
    pub lt: Option<String>,
    pub lte: Option<String>,
}

impl Bounds {
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (key, bound) in [
            ("gt", &self.gt),
            ("gte", &self.gte),
            ("lt", &self.lt),
            ("lte", &self.lte),
        ] {
            if let Some(bound) = bound {
                map.insert(key.to_string(), Value::String(bound.clone()));
            }
        }
        Value::Object(map)
    }
}

/// The condition a single filter applies to its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Exact value.
    Term(String),
    /// Any of the values.
    Terms(Vec<String>),
    /// None of the values.
    Exclude(Vec<String>),
    /// Field present (`true`) or absent (`false`).
    Exists(bool),
    Prefix(String),
    /// Pattern with `*` and `?` metacharacters.
    Wildcard(String),
    Range(Bounds),
}

/// One filter clause. All filters of a query must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Index field path, e.g. `title.keyword` or `dates.begin`.
    pub field: String,
    /// Values compare as numbers or dates rather than strings.
    pub numeric: bool,
    pub predicate: Predicate,
}

impl Filter {
    /// Whether this filter renders under `must_not` rather than `filter`.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        matches!(
            self.predicate,
            Predicate::Exclude(_) | Predicate::Exists(false)
        )
    }

    fn clause(&self) -> Value {
        let field = self.field.as_str();
        match &self.predicate {
            Predicate::Term(value) => json!({ "term": { field: value } }),
            Predicate::Terms(values) | Predicate::Exclude(values) => {
                json!({ "terms": { field: values } })
            }
            Predicate::Exists(_) => json!({ "exists": { "field": field } }),
            Predicate::Prefix(value) => json!({ "prefix": { field: value } }),
            Predicate::Wildcard(pattern) => {
                json!({ "wildcard": { field: { "value": pattern } } })
            }
            Predicate::Range(bounds) => json!({ "range": { field: bounds.to_value() } }),
        }
    }
}

/// Free-text match across several fields; any field may match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    pub query: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
    pub numeric: bool,
}

/// A backend-neutral search request against one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub filters: Vec<Filter>,
    pub text: Option<TextSearch>,
    /// Empty means relevance order, or insertion order without a text query.
    pub sort: Vec<SortKey>,
    /// 1-based page number the offset was derived from.
    pub page: usize,
    pub from: usize,
    pub size: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            text: None,
            sort: Vec::new(),
            page: 1,
            from: 0,
            size: PageLimits::default().default_size,
        }
    }
}

impl SearchQuery {
    /// Exact identifier lookup for detail requests.
    ///
    /// Asks for two hits so that a duplicated identifier is observable.
    #[must_use]
    pub fn by_id(id: &str) -> Self {
        Self {
            filters: vec![Filter {
                field: "_id".to_string(),
                numeric: false,
                predicate: Predicate::Term(id.to_string()),
            }],
            size: 2,
            ..Self::default()
        }
    }

    /// Render as an Elasticsearch `_search` request body.
    #[must_use]
    pub fn to_request_body(&self) -> Value {
        let filter: Vec<Value> = self
            .filters
            .iter()
            .filter(|f| !f.is_negated())
            .map(Filter::clause)
            .collect();
        let must_not: Vec<Value> = self
            .filters
            .iter()
            .filter(|f| f.is_negated())
            .map(Filter::clause)
            .collect();
        let must: Vec<Value> = self
            .text
            .iter()
            .map(|text| {
                let should: Vec<Value> = text
                    .fields
                    .iter()
                    .map(|field| json!({ "match": { field.as_str(): text.query } }))
                    .collect();
                json!({ "bool": { "should": should, "minimum_should_match": 1 } })
            })
            .collect();

        let query = if filter.is_empty() && must_not.is_empty() && must.is_empty() {
            json!({ "match_all": {} })
        } else {
            let mut bool_query = Map::new();
            for (key, clauses) in [("filter", filter), ("must_not", must_not), ("must", must)] {
                if !clauses.is_empty() {
                    bool_query.insert(key.to_string(), Value::Array(clauses));
                }
            }
            json!({ "bool": bool_query })
        };

        let mut body = json!({
            "query": query,
            "from": self.from,
            "size": self.size,
            "track_total_hits": true,
        });
        if !self.sort.is_empty() {
            let sort: Vec<Value> = self
                .sort
                .iter()
                .map(|key| {
                    let order = if key.descending { "desc" } else { "asc" };
                    json!({ key.field.as_str(): { "order": order } })
                })
                .collect();
            body["sort"] = Value::Array(sort);
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_query_matches_all() {
        let body = SearchQuery::default().to_request_body();
        assert_eq!(
            body,
            json!({
                "query": { "match_all": {} },
                "from": 0,
                "size": 20,
                "track_total_hits": true
            })
        );
    }

    #[test]
    fn by_id_requests_two_hits() {
        let body = SearchQuery::by_id("ag-1").to_request_body();
        assert_eq!(body["size"], json!(2));
        assert_eq!(
            body["query"],
            json!({ "bool": { "filter": [ { "term": { "_id": "ag-1" } } ] } })
        );
    }

    #[test]
    fn negated_filters_render_under_must_not() {
        let query = SearchQuery {
            filters: vec![
                Filter {
                    field: "level.keyword".into(),
                    numeric: false,
                    predicate: Predicate::Exclude(vec!["item".into(), "file".into()]),
                },
                Filter {
                    field: "dates.end".into(),
                    numeric: true,
                    predicate: Predicate::Exists(false),
                },
                Filter {
                    field: "title.keyword".into(),
                    numeric: false,
                    predicate: Predicate::Wildcard("*Papers*".into()),
                },
            ],
            ..SearchQuery::default()
        };
        assert_eq!(
            query.to_request_body()["query"],
            json!({
                "bool": {
                    "filter": [
                        { "wildcard": { "title.keyword": { "value": "*Papers*" } } }
                    ],
                    "must_not": [
                        { "terms": { "level.keyword": ["item", "file"] } },
                        { "exists": { "field": "dates.end" } }
                    ]
                }
            })
        );
    }

    #[test]
    fn range_renders_only_present_bounds() {
        let query = SearchQuery {
            filters: vec![Filter {
                field: "dates.begin".into(),
                numeric: true,
                predicate: Predicate::Range(Bounds {
                    gte: Some("1900".into()),
                    ..Bounds::default()
                }),
            }],
            ..SearchQuery::default()
        };
        assert_eq!(
            query.to_request_body()["query"]["bool"]["filter"][0],
            json!({ "range": { "dates.begin": { "gte": "1900" } } })
        );
    }

    #[test]
    fn text_search_is_or_combined_across_fields() {
        let query = SearchQuery {
            text: Some(TextSearch {
                query: "photograph".into(),
                fields: vec!["title".into(), "notes.subnotes.content".into()],
            }),
            sort: vec![SortKey {
                field: "title.keyword".into(),
                descending: true,
                numeric: false,
            }],
            ..SearchQuery::default()
        };
        let body = query.to_request_body();
        assert_eq!(
            body["query"],
            json!({
                "bool": {
                    "must": [{
                        "bool": {
                            "should": [
                                { "match": { "title": "photograph" } },
                                { "match": { "notes.subnotes.content": "photograph" } }
                            ],
                            "minimum_should_match": 1
                        }
                    }]
                }
            })
        );
        assert_eq!(body["sort"], json!([{ "title.keyword": { "order": "desc" } }]));
    }
}
