//! Error types for query translation and backend access.

/// A request parameter could not be translated into a query.
///
/// Every variant names the offending parameter so callers can report it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The parameter is neither a reserved name nor a declared filter.
    #[error("unknown filter field '{parameter}'")]
    UnknownFilter { parameter: String },

    /// The filter exists but does not permit the requested lookup.
    #[error("lookup '{lookup}' is not allowed for filter field '{field}'")]
    LookupNotAllowed {
        parameter: String,
        field: String,
        lookup: String,
    },

    /// The value cannot be used with the lookup.
    #[error("invalid value for '{parameter}': {reason}")]
    InvalidValue { parameter: String, reason: String },

    /// `ordering` names a field that is not declared as orderable.
    #[error("unknown ordering field '{field}'")]
    UnknownOrdering { field: String },

    /// `page` or `page_size` is not a positive integer.
    #[error("invalid {parameter} '{value}': expected a positive integer")]
    InvalidPage { parameter: String, value: String },

    /// The page ends past the deepest document the backend will return.
    #[error("page {page} is beyond the result window of {window} documents")]
    PageBeyondWindow { page: usize, window: usize },
}

impl QueryError {
    /// Name of the request parameter that caused the error.
    #[must_use]
    pub fn parameter(&self) -> &str {
        match self {
            Self::UnknownFilter { parameter }
            | Self::LookupNotAllowed { parameter, .. }
            | Self::InvalidValue { parameter, .. }
            | Self::InvalidPage { parameter, .. } => parameter,
            Self::UnknownOrdering { .. } => "ordering",
            Self::PageBeyondWindow { .. } => "page",
        }
    }
}

/// Errors from executing queries against a search backend.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The backend could not be reached or did not answer in time.
    #[error("search backend unavailable: {0}")]
    Unavailable(String),

    /// HTTP transport error other than connection failure or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("search backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The backend response could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),

    /// The index bound to a resource does not exist.
    #[error("index `{0}` does not exist")]
    IndexNotFound(String),

    /// A detail lookup matched no document.
    #[error("no document in `{index}` matches id `{id}`")]
    NoMatch { index: String, id: String },

    /// A detail lookup matched more than one document.
    #[error("{count} documents in `{index}` match id `{id}`; expected a single result")]
    AmbiguousMatch {
        index: String,
        id: String,
        count: usize,
    },

    /// Fixture documents could not be loaded.
    #[error("fixture error: {0}")]
    Fixtures(String),
}

impl SearchError {
    /// Classify a transport error: connection failures and timeouts become
    /// [`SearchError::Unavailable`].
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_errors_name_the_ordering_parameter() {
        let err = QueryError::UnknownOrdering {
            field: "colour".into(),
        };
        assert_eq!(err.parameter(), "ordering");
        assert_eq!(err.to_string(), "unknown ordering field 'colour'");
    }

    #[test]
    fn lookup_errors_keep_the_raw_parameter() {
        let err = QueryError::LookupNotAllowed {
            parameter: "start_date__contains".into(),
            field: "start_date".into(),
            lookup: "contains".into(),
        };
        assert_eq!(err.parameter(), "start_date__contains");
    }
}
