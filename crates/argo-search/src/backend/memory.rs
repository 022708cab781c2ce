//! In-process backend over JSON documents.
//!
//! Evaluates [`SearchQuery`] with the same observable semantics as the
//! Elasticsearch mapping the API expects:
//! - a field path matches if any value reached through nested arrays matches
//! - a trailing `.keyword` selects the exact value of the parent field
//! - number-family fields compare dates as epoch milliseconds
//! - text search scores by query-token overlap per field
//! - multi-valued sort fields use their minimum ascending and maximum
//!   descending; documents missing the field sort last

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{Hit, SearchBackend, SearchResults};
use crate::error::SearchError;
use crate::ordinal::{ordinal, ordinal_of};
use crate::query::{Bounds, Filter, Predicate, SearchQuery, SortKey, TextSearch};

#[derive(Debug, Clone)]
struct StoredDocument {
    id: String,
    source: Value,
}

/// Documents grouped by index name, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    indices: BTreeMap<String, Vec<StoredDocument>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index. Existing indices are left untouched.
    pub fn create_index(&mut self, index: &str) {
        self.indices.entry(index.to_string()).or_default();
    }

    /// Append a document, creating the index if needed.
    ///
    /// Identifiers are not deduplicated, so a corrupted index with repeated
    /// ids can be reproduced.
    pub fn insert(&mut self, index: &str, id: &str, source: Value) {
        self.indices
            .entry(index.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.to_string(),
                source,
            });
    }

    #[must_use]
    pub fn with_document(mut self, index: &str, id: &str, source: Value) -> Self {
        self.insert(index, id, source);
        self
    }

    /// Number of documents in `index`, or `None` if it does not exist.
    #[must_use]
    pub fn document_count(&self, index: &str) -> Option<usize> {
        self.indices.get(index).map(Vec::len)
    }

    /// Load `{dir}/{index}/*.json`.
    ///
    /// Each file holds one document object or an array of them. A document's
    /// id is its `id` field, falling back to the file stem. Files are read in
    /// name order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Fixtures`] if the directory or a file cannot be
    /// read or parsed.
    pub fn from_fixtures_dir(dir: &Path) -> Result<Self, SearchError> {
        let mut backend = Self::new();
        for index_dir in sorted_entries(dir)? {
            if !index_dir.is_dir() {
                continue;
            }
            let Some(index) = index_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            backend.create_index(index);

            for file in sorted_entries(&index_dir)? {
                if file.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let text = fs::read_to_string(&file).map_err(|e| fixture_error(&file, &e))?;
                let parsed: Value =
                    serde_json::from_str(&text).map_err(|e| fixture_error(&file, &e))?;
                let stem = file
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default();
                let documents = match parsed {
                    Value::Array(items) => items,
                    other => vec![other],
                };
                for source in documents {
                    let id = match source.get("id") {
                        Some(Value::String(id)) => id.clone(),
                        Some(Value::Number(n)) => n.to_string(),
                        _ => stem.to_string(),
                    };
                    backend.insert(index, &id, source);
                }
            }
        }
        tracing::debug!(
            dir = %dir.display(),
            indices = backend.indices.len(),
            "loaded fixture documents"
        );
        Ok(backend)
    }

    fn execute(&self, index: &str, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        let documents = self
            .indices
            .get(index)
            .ok_or_else(|| SearchError::IndexNotFound(index.to_string()))?;

        let mut matched: Vec<(&StoredDocument, Option<f64>)> = documents
            .iter()
            .filter(|doc| query.filters.iter().all(|f| filter_matches(doc, f)))
            .filter_map(|doc| match &query.text {
                None => Some((doc, None)),
                Some(text) => {
                    let score = text_score(doc, text);
                    (score > 0.0).then_some((doc, Some(score)))
                }
            })
            .collect();

        if !query.sort.is_empty() {
            matched.sort_by(|(a, _), (b, _)| compare_by_keys(a, b, &query.sort));
        } else if query.text.is_some() {
            matched.sort_by(|(_, a), (_, b)| {
                b.unwrap_or_default().total_cmp(&a.unwrap_or_default())
            });
        }

        let total = matched.len() as u64;
        let hits = matched
            .into_iter()
            .skip(query.from)
            .take(query.size)
            .map(|(doc, score)| Hit {
                id: doc.id.clone(),
                source: doc.source.clone(),
                score,
            })
            .collect();
        Ok(SearchResults { total, hits })
    }
}

impl SearchBackend for MemoryBackend {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        Ok(self.indices.contains_key(index))
    }

    async fn search(&self, index: &str, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        let results = self.execute(index, query)?;
        tracing::debug!(
            index,
            total = results.total,
            returned = results.hits.len(),
            "search complete"
        );
        Ok(results)
    }
}

fn fixture_error(path: &Path, err: &dyn std::fmt::Display) -> SearchError {
    SearchError::Fixtures(format!("{}: {err}", path.display()))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, SearchError> {
    let mut paths = fs::read_dir(dir)
        .map_err(|e| fixture_error(dir, &e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| fixture_error(dir, &e))?;
    paths.sort();
    Ok(paths)
}

// ── Field access ───────────────────────────────────────────────────

/// All non-null scalar values reachable at a dotted field path.
fn values_at<'a>(doc: &'a StoredDocument, field: &str) -> Vec<Value> {
    if field == "_id" {
        return vec![Value::String(doc.id.clone())];
    }
    let path = field.strip_suffix(".keyword").unwrap_or(field);
    let mut current: Vec<&'a Value> = vec![&doc.source];
    for segment in path.split('.') {
        current = current
            .into_iter()
            .flat_map(flatten)
            .filter_map(|value| value.get(segment))
            .collect();
    }
    current
        .into_iter()
        .flat_map(flatten)
        .filter(|value| !value.is_null())
        .cloned()
        .collect()
}

fn flatten(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(flatten).collect(),
        other => vec![other],
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ── Filters ────────────────────────────────────────────────────────

fn filter_matches(doc: &StoredDocument, filter: &Filter) -> bool {
    let values = values_at(doc, &filter.field);
    let equals = |wanted: &str| {
        values.iter().any(|value| {
            if filter.numeric {
                matches!((ordinal_of(value), ordinal(wanted)), (Some(a), Some(b)) if a == b)
            } else {
                as_text(value).is_some_and(|s| s == wanted)
            }
        })
    };

    match &filter.predicate {
        Predicate::Term(wanted) => equals(wanted),
        Predicate::Terms(wanted) => wanted.iter().any(|w| equals(w)),
        Predicate::Exclude(unwanted) => !unwanted.iter().any(|w| equals(w)),
        Predicate::Exists(expected) => values.is_empty() != *expected,
        Predicate::Prefix(prefix) => values
            .iter()
            .filter_map(as_text)
            .any(|s| s.starts_with(prefix.as_str())),
        Predicate::Wildcard(pattern) => values
            .iter()
            .filter_map(as_text)
            .any(|s| wildcard_matches(pattern, &s)),
        Predicate::Range(bounds) => values
            .iter()
            .any(|value| in_range(value, bounds, filter.numeric)),
    }
}

fn in_range(value: &Value, bounds: &Bounds, numeric: bool) -> bool {
    let compare = |bound: &str| -> Option<Ordering> {
        if numeric {
            ordinal_of(value)?.partial_cmp(&ordinal(bound)?)
        } else {
            Some(as_text(value)?.as_str().cmp(bound))
        }
    };
    let check = |bound: &Option<String>, accept: fn(Ordering) -> bool| {
        bound
            .as_deref()
            .is_none_or(|b| compare(b).is_some_and(accept))
    };
    check(&bounds.gt, Ordering::is_gt)
        && check(&bounds.gte, Ordering::is_ge)
        && check(&bounds.lt, Ordering::is_lt)
        && check(&bounds.lte, Ordering::is_le)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    AnySequence,
    AnyChar,
    Literal(char),
}

fn tokenize_pattern(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '*' => Token::AnySequence,
            '?' => Token::AnyChar,
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            other => Token::Literal(other),
        });
    }
    tokens
}

/// Match `text` against a pattern where `*` is any sequence, `?` any single
/// character and `\` escapes the next character.
fn wildcard_matches(pattern: &str, text: &str) -> bool {
    let tokens = tokenize_pattern(pattern);
    let text: Vec<char> = text.chars().collect();
    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(Token::AnySequence) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(Token::AnyChar) => {
                p += 1;
                t += 1;
            }
            Some(Token::Literal(c)) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    backtrack = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }
    tokens[p..].iter().all(|token| *token == Token::AnySequence)
}

// ── Text search ────────────────────────────────────────────────────

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn text_score(doc: &StoredDocument, text: &TextSearch) -> f64 {
    let wanted = tokens(&text.query);
    text.fields
        .iter()
        .map(|field| {
            let present: Vec<String> = values_at(doc, field)
                .iter()
                .filter_map(as_text)
                .flat_map(|s| tokens(&s))
                .collect();
            wanted.iter().filter(|w| present.contains(w)).count() as f64
        })
        .sum()
}

// ── Sorting ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, PartialOrd)]
enum SortValue {
    Number(f64),
    Text(String),
}

fn sort_value(doc: &StoredDocument, key: &SortKey) -> Option<SortValue> {
    let values = values_at(doc, &key.field);
    let pick_number = |a: f64, b: f64| {
        let keep_b = if key.descending { b > a } else { b < a };
        if keep_b { b } else { a }
    };
    if key.numeric {
        values
            .iter()
            .filter_map(ordinal_of)
            .reduce(pick_number)
            .map(SortValue::Number)
    } else {
        let texts = values.iter().filter_map(as_text);
        let picked = if key.descending {
            texts.max()
        } else {
            texts.min()
        };
        picked.map(SortValue::Text)
    }
}

fn compare_by_keys(a: &StoredDocument, b: &StoredDocument, keys: &[SortKey]) -> Ordering {
    keys.iter()
        .map(|key| match (sort_value(a, key), sort_value(b, key)) {
            (Some(x), Some(y)) => {
                let ordering = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                if key.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn doc(source: Value) -> StoredDocument {
        StoredDocument {
            id: source["id"].as_str().unwrap_or("x").to_string(),
            source,
        }
    }

    fn filter(field: &str, numeric: bool, predicate: Predicate) -> Filter {
        Filter {
            field: field.into(),
            numeric,
            predicate,
        }
    }

    #[rstest]
    #[case("*Papers*", "Rockefeller Family Papers", true)]
    #[case("Rock*", "Rockefeller", true)]
    #[case("R?ck*", "Rockefeller", true)]
    #[case("*Papers", "Papers of John", false)]
    #[case("*50%\\*off*", "now 50%*off today", true)]
    #[case("*50%\\*off*", "now 50% off today", false)]
    #[case("", "", true)]
    #[case("*", "", true)]
    fn wildcard_patterns(#[case] pattern: &str, #[case] text: &str, #[case] expected: bool) {
        assert_eq!(wildcard_matches(pattern, text), expected);
    }

    #[test]
    fn paths_reach_through_arrays_and_keyword_suffix() {
        let d = doc(json!({
            "id": "c-1",
            "title": "Series 1",
            "notes": [
                { "subnotes": [ { "content": ["first"] }, { "content": "second" } ] },
                { "subnotes": [] }
            ]
        }));
        assert_eq!(
            values_at(&d, "notes.subnotes.content"),
            vec![json!("first"), json!("second")]
        );
        assert_eq!(values_at(&d, "title.keyword"), vec![json!("Series 1")]);
        assert_eq!(values_at(&d, "_id"), vec![json!("c-1")]);
        assert!(values_at(&d, "dates.begin").is_empty());
    }

    #[test]
    fn numeric_range_compares_dates() {
        let d = doc(json!({ "dates": [ { "begin": "1923-05-01", "end": null } ] }));
        let range = |gte: &str, lte: &str| {
            filter(
                "dates.begin",
                true,
                Predicate::Range(Bounds {
                    gte: Some(gte.into()),
                    lte: Some(lte.into()),
                    ..Bounds::default()
                }),
            )
        };
        assert!(filter_matches(&d, &range("1900", "1950")));
        assert!(!filter_matches(&d, &range("1924", "1950")));
        assert!(!filter_matches(
            &d,
            &filter("dates.end", true, Predicate::Exists(true))
        ));
    }

    #[test]
    fn exact_term_does_not_match_substrings() {
        let d = doc(json!({ "level": "subseries" }));
        assert!(!filter_matches(
            &d,
            &filter("level.keyword", false, Predicate::Term("series".into()))
        ));
        assert!(filter_matches(
            &d,
            &filter(
                "level.keyword",
                false,
                Predicate::Exclude(vec!["series".into()])
            )
        ));
    }

    #[test]
    fn text_score_counts_token_overlap_per_field() {
        let d = doc(json!({
            "title": "Photograph of the Rockefeller estate",
            "notes": [ { "subnotes": [ { "content": ["A photograph album."] } ] } ]
        }));
        let search = TextSearch {
            query: "Photograph estate".into(),
            fields: vec!["title".into(), "notes.subnotes.content".into()],
        };
        assert!((text_score(&d, &search) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn descending_sort_uses_maximum_and_puts_missing_last() {
        let a = doc(json!({ "id": "a", "dates": [ { "begin": "1900" }, { "begin": "1990" } ] }));
        let b = doc(json!({ "id": "b", "dates": [ { "begin": "1950" } ] }));
        let c = doc(json!({ "id": "c" }));
        let key = SortKey {
            field: "dates.begin".into(),
            descending: true,
            numeric: true,
        };
        let mut docs = [&c, &b, &a];
        docs.sort_by(|x, y| compare_by_keys(x, y, std::slice::from_ref(&key)));
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let ascending = SortKey {
            descending: false,
            ..key
        };
        docs.sort_by(|x, y| compare_by_keys(x, y, std::slice::from_ref(&ascending)));
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
