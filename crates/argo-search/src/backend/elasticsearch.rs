//! Elasticsearch client backend.

use argo_config::ElasticsearchConfig;
use serde::Deserialize;
use serde_json::Value;

use super::{Hit, SearchBackend, SearchResults};
use crate::error::SearchError;
use crate::http::check_response;
use crate::query::SearchQuery;

#[derive(Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Deserialize)]
struct HitsEnvelope {
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// `hits.total` is a bare integer before Elasticsearch 7 and an object after.
#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Relation { value: u64 },
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source", default)]
    source: Value,
}

/// Parse a `_search` response body.
pub(crate) fn parse_search_response(body: &str) -> Result<SearchResults, SearchError> {
    let data: SearchResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Parse(e.to_string()))?;
    let hits: Vec<Hit> = data
        .hits
        .hits
        .into_iter()
        .map(|h| Hit {
            id: h.id,
            source: h.source,
            score: h.score,
        })
        .collect();
    let total = match data.hits.total {
        Some(TotalHits::Count(n) | TotalHits::Relation { value: n }) => n,
        None => hits.len() as u64,
    };
    Ok(SearchResults { total, hits })
}

/// HTTP client for one Elasticsearch cluster.
///
/// Hosts are tried in configured order; the next host is used only when a
/// connection cannot be established.
#[derive(Debug, Clone)]
pub struct ElasticsearchBackend {
    http: reqwest::Client,
    hosts: Vec<String>,
    credentials: Option<(String, String)>,
}

impl ElasticsearchBackend {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying client cannot be built.
    pub fn new(config: &ElasticsearchConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("argo/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        let hosts = config
            .hosts
            .iter()
            .map(|h| h.trim().trim_end_matches('/').to_string())
            .filter(|h| !h.is_empty())
            .collect();
        let credentials = config
            .has_credentials()
            .then(|| (config.username.clone(), config.password.clone()));
        Ok(Self {
            http,
            hosts,
            credentials,
        })
    }

    #[must_use]
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Send a request to the first reachable host.
    async fn send<F>(&self, build: F) -> Result<reqwest::Response, SearchError>
    where
        F: Fn(&str) -> reqwest::RequestBuilder,
    {
        let mut last_failure = None;
        for host in &self.hosts {
            let mut request = build(host);
            if let Some((username, password)) = &self.credentials {
                request = request.basic_auth(username, Some(password));
            }
            match request.send().await {
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_connect() => {
                    tracing::warn!(host, %e, "search host unreachable, trying next");
                    last_failure = Some(e.to_string());
                }
                Err(e) => return Err(SearchError::from_transport(e)),
            }
        }
        Err(SearchError::Unavailable(
            last_failure.unwrap_or_else(|| "no search hosts configured".to_string()),
        ))
    }
}

impl SearchBackend for ElasticsearchBackend {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let path = urlencoding::encode(index);
        let resp = self
            .send(|host| self.http.head(format!("{host}/{path}")))
            .await?;
        match check_response(resp, index).await {
            Ok(_) => Ok(true),
            Err(SearchError::IndexNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn search(&self, index: &str, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        let path = urlencoding::encode(index);
        let body = query.to_request_body();
        tracing::debug!(index, %body, "executing search");

        let resp = self
            .send(|host| {
                self.http
                    .post(format!("{host}/{path}/_search"))
                    .json(&body)
            })
            .await?;
        let resp = check_response(resp, index).await?;
        let text = resp.text().await.map_err(SearchError::from_transport)?;
        let results = parse_search_response(&text)?;

        tracing::debug!(
            index,
            total = results.total,
            returned = results.hits.len(),
            "search complete"
        );
        Ok(results)
    }
}
