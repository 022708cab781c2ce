use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An identifier assigned to a resource by an external system.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExternalIdentifier {
    pub identifier: String,
    pub source: String,
}

/// A date expression with its normalized bounds.
///
/// `begin`, `end` and `label` are rendered exactly as stored. `end` is null
/// for open or indeterminate ranges.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DateExpression {
    pub expression: String,
    pub begin: String,
    pub end: Option<String>,
    pub label: String,
    /// `single`, `inclusive` (range) or `bulk`.
    #[serde(rename = "type")]
    pub date_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Extent {
    #[serde(deserialize_with = "number_or_numeric_string")]
    #[schemars(with = "f64")]
    pub value: f64,
    #[serde(rename = "type")]
    pub extent_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Language {
    pub expression: String,
    pub identifier: String,
}

/// Subnote content, always rendered as a list.
///
/// The index may store content either as a list or as a single scalar.
/// Normalization rule:
/// - a list is kept as-is,
/// - a string becomes a one-element list holding the whole string,
/// - null becomes an empty list,
/// - any other scalar becomes a one-element list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "Value")]
pub struct SubnoteContent(pub Vec<Value>);

impl From<Value> for SubnoteContent {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self(items),
            Value::Null => Self(Vec::new()),
            scalar => Self(vec![scalar]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Subnote {
    #[serde(rename = "type")]
    pub subnote_type: String,
    #[serde(default)]
    #[schemars(with = "Vec<Value>")]
    pub content: SubnoteContent,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Note {
    #[serde(rename = "type")]
    pub note_type: String,
    pub title: String,
    pub source: String,
    pub subnotes: Vec<Subnote>,
}

/// A single act granted or restricted by a rights statement.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RightsGranted {
    pub act: String,
    pub begin: String,
    pub end: String,
    pub restriction: String,
    pub notes: Option<Vec<Note>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RightsStatement {
    pub determination_date: String,
    #[serde(rename = "type")]
    pub statement_type: String,
    pub rights_type: String,
    pub begin: String,
    pub end: String,
    pub copyright_status: Option<String>,
    pub other_basis: Option<String>,
    pub jurisdiction: Option<String>,
    pub notes: Option<Vec<Note>>,
    pub rights_granted: Vec<RightsGranted>,
}

/// A denormalized pointer to another resource.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Reference {
    pub title: String,
    pub identifier: String,
    pub order: Option<i64>,
    #[serde(rename = "type")]
    pub reference_type: Option<String>,
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}
