//! Shaping of stored documents into list and detail responses.
//!
//! Each [`ResourceKind`] selects a [`Shaper`]: a pair of plain functions, one
//! per response shape. Shaping is pure; a document that does not fit its
//! shape yields a [`ShapeError`] for that document alone.

use argo_core::ResourceKind;
use argo_core::records::{
    AgentRecord, CollectionRecord, DateExpression, ObjectRecord, Reference, TermRecord,
};
use argo_core::responses::{Detail, DetailDocument, InvalidEntry, ListEntry, ListItem};
use argo_search::Hit;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A stored document did not match the shape of its resource kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("document `{id}` cannot be shaped: {message}")]
pub struct ShapeError {
    pub id: String,
    pub message: String,
}

type ListFn = fn(&Hit) -> Result<ListItem, ShapeError>;
type DetailFn = fn(&Hit) -> Result<DetailDocument, ShapeError>;

/// List and detail shaping functions for one resource kind.
#[derive(Debug, Clone, Copy)]
pub struct Shaper {
    pub kind: ResourceKind,
    list: ListFn,
    detail: DetailFn,
}

impl Shaper {
    #[must_use]
    pub const fn for_kind(kind: ResourceKind) -> Self {
        let (list, detail): (ListFn, DetailFn) = match kind {
            ResourceKind::Agent => (agent_summary, agent_detail),
            ResourceKind::Collection => (collection_summary, collection_detail),
            ResourceKind::Object => (object_summary, object_detail),
            ResourceKind::Term => (term_summary, term_detail),
        };
        Self { kind, list, detail }
    }

    /// Render a hit in list shape.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if the document lacks a field of the list shape.
    pub fn list_item(&self, hit: &Hit) -> Result<ListItem, ShapeError> {
        (self.list)(hit)
    }

    /// Render a hit in list shape, substituting an error entry on failure.
    #[must_use]
    pub fn list_entry(&self, hit: &Hit) -> ListEntry {
        match self.list_item(hit) {
            Ok(item) => ListEntry::Item(item),
            Err(e) => {
                tracing::warn!(resource = self.kind.plural(), id = %e.id, error = %e.message, "skipping malformed document");
                ListEntry::Invalid(InvalidEntry {
                    id: e.id,
                    error: e.message,
                })
            }
        }
    }

    /// Render a hit in detail shape.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if the document does not deserialize into the
    /// stored record of this kind.
    pub fn detail(&self, hit: &Hit) -> Result<DetailDocument, ShapeError> {
        (self.detail)(hit)
    }
}

fn parse<T: DeserializeOwned>(hit: &Hit) -> Result<T, ShapeError> {
    T::deserialize(&hit.source).map_err(|e| ShapeError {
        id: hit.id.clone(),
        message: e.to_string(),
    })
}

/// Order references by `order` when any entry carries one.
///
/// The sort is stable: entries sharing an order, and entries without one
/// (placed after the ordered ones), keep their stored order.
pub fn sort_references(references: &mut Option<Vec<Reference>>) {
    if let Some(references) = references
        && references.iter().any(|r| r.order.is_some())
    {
        references.sort_by_key(|r| (r.order.is_none(), r.order));
    }
}

// ── List shape ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Summary {
    title: String,
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(default)]
    dates: Option<Vec<DateExpression>>,
}

fn summary(kind: ResourceKind, hit: &Hit) -> Result<ListItem, ShapeError> {
    let summary: Summary = parse(hit)?;
    Ok(ListItem {
        uri: kind.detail_uri(&hit.id),
        title: summary.title,
        resource_type: summary.resource_type,
        dates: kind
            .is_dated()
            .then(|| summary.dates.unwrap_or_default()),
    })
}

fn agent_summary(hit: &Hit) -> Result<ListItem, ShapeError> {
    summary(ResourceKind::Agent, hit)
}

fn collection_summary(hit: &Hit) -> Result<ListItem, ShapeError> {
    summary(ResourceKind::Collection, hit)
}

fn object_summary(hit: &Hit) -> Result<ListItem, ShapeError> {
    summary(ResourceKind::Object, hit)
}

fn term_summary(hit: &Hit) -> Result<ListItem, ShapeError> {
    summary(ResourceKind::Term, hit)
}

// ── Detail shape ───────────────────────────────────────────────────

fn detail<T>(kind: ResourceKind, hit: &Hit, record: T) -> Detail<T> {
    Detail {
        uri: kind.detail_uri(&hit.id),
        record,
    }
}

fn agent_detail(hit: &Hit) -> Result<DetailDocument, ShapeError> {
    let mut record: AgentRecord = parse(hit)?;
    sort_references(&mut record.collections);
    sort_references(&mut record.objects);
    Ok(DetailDocument::Agent(detail(ResourceKind::Agent, hit, record)))
}

fn collection_detail(hit: &Hit) -> Result<DetailDocument, ShapeError> {
    let mut record: CollectionRecord = parse(hit)?;
    for references in [
        &mut record.agents,
        &mut record.creators,
        &mut record.terms,
        &mut record.ancestors,
        &mut record.children,
    ] {
        sort_references(references);
    }
    Ok(DetailDocument::Collection(detail(
        ResourceKind::Collection,
        hit,
        record,
    )))
}

fn object_detail(hit: &Hit) -> Result<DetailDocument, ShapeError> {
    let mut record: ObjectRecord = parse(hit)?;
    for references in [&mut record.agents, &mut record.terms, &mut record.ancestors] {
        sort_references(references);
    }
    Ok(DetailDocument::Object(detail(ResourceKind::Object, hit, record)))
}

fn term_detail(hit: &Hit) -> Result<DetailDocument, ShapeError> {
    let mut record: TermRecord = parse(hit)?;
    sort_references(&mut record.collections);
    sort_references(&mut record.objects);
    Ok(DetailDocument::Term(detail(ResourceKind::Term, hit, record)))
}
