//! Translation of request parameters into a [`SearchQuery`].

use argo_config::ServerConfig;

use super::fields::{FilterField, Lookup, ResourceFields};
use super::{Bounds, Filter, Predicate, SearchQuery, SortKey, TextSearch};
use crate::error::QueryError;
use crate::ordinal::ordinal;

/// Parameter names that never refer to filters.
pub const RESERVED_PARAMETERS: &[&str] = &["query", "ordering", "page", "page_size", "format"];

const VALUE_SEPARATOR: &str = "__";

/// Page size default and ceiling, plus the deepest reachable document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: usize,
    pub max_size: usize,
    pub max_window: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: 20,
            max_size: 100,
            max_window: 10_000,
        }
    }
}

impl From<&ServerConfig> for PageLimits {
    fn from(server: &ServerConfig) -> Self {
        Self {
            default_size: server.default_page_size,
            max_size: server.max_page_size,
            max_window: server.max_result_window,
        }
    }
}

/// Builds queries for one resource's declared fields.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    fields: &'a ResourceFields,
    limits: PageLimits,
}

impl<'a> QueryBuilder<'a> {
    #[must_use]
    pub const fn new(fields: &'a ResourceFields, limits: PageLimits) -> Self {
        Self { fields, limits }
    }

    /// Translate request parameters, in request order, into a query.
    ///
    /// Filters combine with AND, repeated keys included. For `query`,
    /// `ordering`, `page` and `page_size` the last occurrence wins.
    ///
    /// # Errors
    ///
    /// Returns the first [`QueryError`] found; no partial query is produced.
    pub fn build(&self, params: &[(String, String)]) -> Result<SearchQuery, QueryError> {
        let mut filters = Vec::new();
        let mut text = None;
        let mut sort = Vec::new();
        let mut page = 1;
        let mut size = self.limits.default_size;

        for (key, value) in params {
            match key.as_str() {
                "query" => text = self.text_search(value),
                "ordering" => sort = self.sort_keys(value)?,
                "page" => page = parse_positive(key, value)?,
                "page_size" => size = parse_positive(key, value)?.min(self.limits.max_size),
                "format" => check_format(value)?,
                _ => filters.push(self.filter(key, value)?),
            }
        }

        let from = (page - 1)
            .checked_mul(size)
            .filter(|from| from.saturating_add(size) <= self.limits.max_window)
            .ok_or(QueryError::PageBeyondWindow {
                page,
                window: self.limits.max_window,
            })?;

        Ok(SearchQuery {
            filters,
            text,
            sort,
            page,
            from,
            size,
        })
    }

    fn text_search(&self, value: &str) -> Option<TextSearch> {
        let query = value.trim();
        if query.is_empty() {
            return None;
        }
        Some(TextSearch {
            query: query.to_string(),
            fields: self
                .fields
                .search_fields
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
    }

    fn sort_keys(&self, value: &str) -> Result<Vec<SortKey>, QueryError> {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| -> Result<SortKey, QueryError> {
                let (descending, name) = part
                    .strip_prefix('-')
                    .map_or((false, part), |name| (true, name));
                let ordering =
                    self.fields
                        .ordering_field(name)
                        .ok_or_else(|| QueryError::UnknownOrdering {
                            field: name.to_string(),
                        })?;
                Ok(SortKey {
                    field: ordering.field.to_string(),
                    descending,
                    numeric: ordering.kind.is_numeric(),
                })
            })
            .collect()
    }

    fn filter(&self, key: &str, value: &str) -> Result<Filter, QueryError> {
        let (name, lookup_name) = key.split_once(VALUE_SEPARATOR).unwrap_or((key, "term"));
        let field = self
            .fields
            .filter(name)
            .ok_or_else(|| QueryError::UnknownFilter {
                parameter: key.to_string(),
            })?;
        let lookup = lookup_name
            .parse::<Lookup>()
            .ok()
            .filter(|lookup| field.allows(*lookup))
            .ok_or_else(|| QueryError::LookupNotAllowed {
                parameter: key.to_string(),
                field: name.to_string(),
                lookup: lookup_name.to_string(),
            })?;

        let checker = ValueChecker { key, field };
        let predicate = match lookup {
            Lookup::Term => Predicate::Term(checker.single(value)?),
            Lookup::Terms | Lookup::In => Predicate::Terms(checker.many(value)?),
            Lookup::Exclude => Predicate::Exclude(checker.many(value)?),
            Lookup::Exists => Predicate::Exists(checker.flag(value)?),
            Lookup::Prefix | Lookup::Startswith => Predicate::Prefix(checker.single(value)?),
            Lookup::Endswith => {
                Predicate::Wildcard(format!("*{}", escape_wildcard(&checker.single(value)?)))
            }
            Lookup::Contains => {
                Predicate::Wildcard(format!("*{}*", escape_wildcard(&checker.single(value)?)))
            }
            Lookup::Wildcard => Predicate::Wildcard(checker.single(value)?),
            Lookup::Range => Predicate::Range(checker.range(value)?),
            Lookup::Gt => Predicate::Range(Bounds {
                gt: Some(checker.single(value)?),
                ..Bounds::default()
            }),
            Lookup::Gte => Predicate::Range(Bounds {
                gte: Some(checker.single(value)?),
                ..Bounds::default()
            }),
            Lookup::Lt => Predicate::Range(Bounds {
                lt: Some(checker.single(value)?),
                ..Bounds::default()
            }),
            Lookup::Lte => Predicate::Range(Bounds {
                lte: Some(checker.single(value)?),
                ..Bounds::default()
            }),
        };

        Ok(Filter {
            field: field.field.to_string(),
            numeric: field.kind.is_numeric(),
            predicate,
        })
    }
}

/// Validates raw values for one filter parameter.
struct ValueChecker<'a> {
    key: &'a str,
    field: &'a FilterField,
}

impl ValueChecker<'_> {
    fn invalid(&self, reason: impl Into<String>) -> QueryError {
        QueryError::InvalidValue {
            parameter: self.key.to_string(),
            reason: reason.into(),
        }
    }

    fn single(&self, value: &str) -> Result<String, QueryError> {
        if value.is_empty() {
            return Err(self.invalid("value must not be empty"));
        }
        if self.field.kind.is_numeric() && ordinal(value).is_none() {
            return Err(self.invalid(format!(
                "'{value}' is not a number or a date (YYYY, YYYY-MM or YYYY-MM-DD)"
            )));
        }
        Ok(value.to_string())
    }

    fn many(&self, value: &str) -> Result<Vec<String>, QueryError> {
        value
            .split(VALUE_SEPARATOR)
            .map(|part| self.single(part))
            .collect()
    }

    fn flag(&self, value: &str) -> Result<bool, QueryError> {
        match value {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(self.invalid(format!("expected 'true' or 'false', got '{other}'"))),
        }
    }

    fn range(&self, value: &str) -> Result<Bounds, QueryError> {
        let Some((lower, upper)) = value.split_once(VALUE_SEPARATOR) else {
            return Err(self.invalid("range needs two bounds separated by '__'"));
        };
        if upper.contains(VALUE_SEPARATOR) {
            return Err(self.invalid("range takes exactly two bounds"));
        }
        if lower.is_empty() && upper.is_empty() {
            return Err(self.invalid("range needs at least one bound"));
        }
        let bound = |raw: &str| -> Result<Option<String>, QueryError> {
            if raw.is_empty() {
                Ok(None)
            } else {
                self.single(raw).map(Some)
            }
        };
        Ok(Bounds {
            gte: bound(lower)?,
            lte: bound(upper)?,
            ..Bounds::default()
        })
    }
}

fn parse_positive(parameter: &str, value: &str) -> Result<usize, QueryError> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| QueryError::InvalidPage {
            parameter: parameter.to_string(),
            value: value.to_string(),
        })
}

fn check_format(value: &str) -> Result<(), QueryError> {
    if value == "json" {
        Ok(())
    } else {
        Err(QueryError::InvalidValue {
            parameter: "format".to_string(),
            reason: format!("unsupported format '{value}'; only 'json' is available"),
        })
    }
}

/// Escape wildcard metacharacters so user text matches literally.
fn escape_wildcard(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FilterField, OrderingField};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const FIELDS: ResourceFields = ResourceFields {
        filters: &[
            FilterField::string("id", "id"),
            FilterField::string("title", "title.keyword"),
            FilterField::number("start_date", "dates.begin"),
        ],
        search_fields: &["title", "notes.subnotes.content"],
        ordering: &[
            OrderingField::string("title", "title.keyword"),
            OrderingField::number("start_date", "dates.begin"),
        ],
    };

    fn build(params: &[(&str, &str)]) -> Result<SearchQuery, QueryError> {
        let owned: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        QueryBuilder::new(&FIELDS, PageLimits::default()).build(&owned)
    }

    fn only_predicate(params: &[(&str, &str)]) -> Predicate {
        let mut query = build(params).expect("valid query");
        assert_eq!(query.filters.len(), 1);
        query.filters.remove(0).predicate
    }

    #[test]
    fn no_parameters_is_first_default_page() {
        let query = build(&[]).unwrap();
        assert_eq!(query, SearchQuery::default());
    }

    #[test]
    fn bare_filter_name_is_exact_term_on_mapped_field() {
        let query = build(&[("title", "Rockefeller Family Papers")]).unwrap();
        assert_eq!(
            query.filters,
            vec![Filter {
                field: "title.keyword".into(),
                numeric: false,
                predicate: Predicate::Term("Rockefeller Family Papers".into()),
            }]
        );
    }

    #[rstest]
    #[case("title__contains", "50%*off", Predicate::Wildcard("*50%\\*off*".into()))]
    #[case("title__endswith", "Papers", Predicate::Wildcard("*Papers".into()))]
    #[case("title__startswith", "Rock", Predicate::Prefix("Rock".into()))]
    #[case("title__wildcard", "Rock*Papers", Predicate::Wildcard("Rock*Papers".into()))]
    #[case("title__in", "a__b", Predicate::Terms(vec!["a".into(), "b".into()]))]
    #[case("title__exclude", "a", Predicate::Exclude(vec!["a".into()]))]
    #[case("title__exists", "false", Predicate::Exists(false))]
    fn string_lookups(#[case] key: &str, #[case] value: &str, #[case] expected: Predicate) {
        assert_eq!(only_predicate(&[(key, value)]), expected);
    }

    #[test]
    fn range_with_open_upper_bound() {
        assert_eq!(
            only_predicate(&[("start_date__range", "1900-01-01__")]),
            Predicate::Range(Bounds {
                gte: Some("1900-01-01".into()),
                ..Bounds::default()
            })
        );
    }

    #[test]
    fn comparison_lookup_on_date_field() {
        let query = build(&[("start_date__gt", "1950")]).unwrap();
        assert!(query.filters[0].numeric);
        assert_eq!(
            query.filters[0].predicate,
            Predicate::Range(Bounds {
                gt: Some("1950".into()),
                ..Bounds::default()
            })
        );
    }

    #[rstest]
    #[case("start_date__range", "1900")]
    #[case("start_date__range", "1900__1950__2000")]
    #[case("start_date__range", "__")]
    #[case("start_date__gt", "last year")]
    #[case("title__exists", "yes")]
    #[case("title", "")]
    #[case("title__in", "a____b")]
    fn malformed_values_are_rejected(#[case] key: &str, #[case] value: &str) {
        let err = build(&[(key, value)]).unwrap_err();
        assert!(
            matches!(&err, QueryError::InvalidValue { parameter, .. } if parameter == key),
            "{err:?}"
        );
    }

    #[test]
    fn unknown_filter_names_the_parameter() {
        let err = build(&[("colour", "red")]).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownFilter {
                parameter: "colour".into()
            }
        );
    }

    #[rstest]
    #[case("start_date__contains", "contains")]
    #[case("title__gt", "gt")]
    #[case("title__between", "between")]
    fn lookup_outside_field_family_is_rejected(#[case] key: &str, #[case] lookup: &str) {
        let err = build(&[(key, "x")]).unwrap_err();
        assert!(
            matches!(&err, QueryError::LookupNotAllowed { lookup: l, .. } if l == lookup),
            "{err:?}"
        );
        assert_eq!(err.parameter(), key);
    }

    #[test]
    fn repeated_and_multiple_filters_all_apply() {
        let query = build(&[
            ("title__contains", "Papers"),
            ("title__startswith", "Rock"),
            ("start_date__gte", "1900"),
        ])
        .unwrap();
        assert_eq!(query.filters.len(), 3);
    }

    #[test]
    fn blank_query_is_no_text_constraint() {
        assert_eq!(build(&[("query", "  ")]).unwrap().text, None);
        let text = build(&[("query", "photograph")]).unwrap().text.unwrap();
        assert_eq!(text.fields, vec!["title", "notes.subnotes.content"]);
    }

    #[test]
    fn ordering_maps_names_to_sort_fields() {
        let query = build(&[("ordering", "-start_date,title")]).unwrap();
        assert_eq!(
            query.sort,
            vec![
                SortKey {
                    field: "dates.begin".into(),
                    descending: true,
                    numeric: true,
                },
                SortKey {
                    field: "title.keyword".into(),
                    descending: false,
                    numeric: false,
                },
            ]
        );
    }

    #[test]
    fn unknown_ordering_is_rejected() {
        let err = build(&[("ordering", "-level")]).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownOrdering {
                field: "level".into()
            }
        );
        assert_eq!(err.parameter(), "ordering");
    }

    #[test]
    fn pagination_offsets_and_caps() {
        let query = build(&[("page", "3"), ("page_size", "10")]).unwrap();
        assert_eq!((query.page, query.from, query.size), (3, 20, 10));

        let capped = build(&[("page_size", "1000")]).unwrap();
        assert_eq!(capped.size, 100);
    }

    #[rstest]
    #[case("page", "0")]
    #[case("page", "two")]
    #[case("page_size", "-5")]
    fn bad_pagination_is_rejected(#[case] key: &str, #[case] value: &str) {
        let err = build(&[(key, value)]).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidPage {
                parameter: key.into(),
                value: value.into()
            }
        );
    }

    #[rstest]
    #[case("500", "20", true)]
    #[case("501", "20", false)]
    #[case("600", "20", false)]
    #[case("100", "100", true)]
    #[case("101", "100", false)]
    fn pages_stop_at_the_result_window(
        #[case] page: &str,
        #[case] page_size: &str,
        #[case] reachable: bool,
    ) {
        let result = build(&[("page", page), ("page_size", page_size)]);
        if reachable {
            let query = result.unwrap();
            assert!(query.from + query.size <= 10_000);
        } else {
            let err = result.unwrap_err();
            assert_eq!(
                err,
                QueryError::PageBeyondWindow {
                    page: page.parse().unwrap(),
                    window: 10_000
                }
            );
            assert_eq!(err.parameter(), "page");
        }
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        let page = usize::MAX.to_string();
        let err = build(&[("page", page.as_str())]).unwrap_err();
        assert_eq!(err.parameter(), "page");
    }

    #[test]
    fn only_json_format_is_accepted() {
        assert!(build(&[("format", "json")]).is_ok());
        assert_eq!(build(&[("format", "api")]).unwrap_err().parameter(), "format");
    }

    #[test]
    fn limits_follow_server_config() {
        let server = ServerConfig {
            default_page_size: 5,
            max_page_size: 7,
            ..ServerConfig::default()
        };
        let limits = PageLimits::from(&server);
        assert_eq!(
            limits,
            PageLimits {
                default_size: 5,
                max_size: 7,
                max_window: 10_000
            }
        );
    }
}
