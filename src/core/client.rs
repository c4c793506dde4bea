use crate::core::envelope::{unwrap_all_tasks, unwrap_envelope};
use crate::domain::model::RawApiItem;
use crate::utils::error::{EtlError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};

pub const DEFAULT_API_BASE: &str = "https://api.dataforseo.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum KeywordEndpoint {
    SearchVolume,
    KeywordSuggestions,
    KeywordIdeas,
    KeywordsForSite,
    BulkKeywordDifficulty,
}

impl KeywordEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            KeywordEndpoint::SearchVolume => "/v3/keywords_data/google_ads/search_volume/live",
            KeywordEndpoint::KeywordSuggestions => {
                "/v3/dataforseo_labs/google/keyword_suggestions/live"
            }
            KeywordEndpoint::KeywordIdeas => "/v3/dataforseo_labs/google/keyword_ideas/live",
            KeywordEndpoint::KeywordsForSite => "/v3/dataforseo_labs/google/keywords_for_site/live",
            KeywordEndpoint::BulkKeywordDifficulty => {
                "/v3/dataforseo_labs/google/bulk_keyword_difficulty/live"
            }
        }
    }

    /// Whether the endpoint is seeded by a domain rather than keywords.
    pub fn needs_target(&self) -> bool {
        matches!(self, KeywordEndpoint::KeywordsForSite)
    }

    fn accepts_limit(&self) -> bool {
        matches!(
            self,
            KeywordEndpoint::KeywordSuggestions
                | KeywordEndpoint::KeywordIdeas
                | KeywordEndpoint::KeywordsForSite
        )
    }

    /// Request body for this endpoint: a one-task array, as the vendor expects.
    pub fn payload(&self, query: &KeywordQuery) -> Value {
        let mut task = Map::new();
        match self {
            KeywordEndpoint::KeywordSuggestions => {
                let seed = query.keywords.first().cloned().unwrap_or_default();
                task.insert("keyword".to_string(), Value::String(seed));
            }
            KeywordEndpoint::KeywordsForSite => {
                let target = query.target.clone().unwrap_or_default();
                task.insert("target".to_string(), Value::String(target));
            }
            KeywordEndpoint::SearchVolume
            | KeywordEndpoint::KeywordIdeas
            | KeywordEndpoint::BulkKeywordDifficulty => {
                task.insert("keywords".to_string(), json!(query.keywords));
            }
        }
        task.insert("location_code".to_string(), json!(query.location_code));
        task.insert("language_code".to_string(), json!(query.language_code));
        if self.accepts_limit() {
            task.insert("limit".to_string(), json!(query.limit));
        }
        Value::Array(vec![Value::Object(task)])
    }
}

impl std::fmt::Display for KeywordEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            KeywordEndpoint::SearchVolume => "search-volume",
            KeywordEndpoint::KeywordSuggestions => "keyword-suggestions",
            KeywordEndpoint::KeywordIdeas => "keyword-ideas",
            KeywordEndpoint::KeywordsForSite => "keywords-for-site",
            KeywordEndpoint::BulkKeywordDifficulty => "bulk-keyword-difficulty",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordQuery {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default = "default_location_code")]
    pub location_code: u32,
    #[serde(default = "default_language_code")]
    pub language_code: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

pub fn default_location_code() -> u32 {
    2840
}

pub fn default_language_code() -> String {
    "en".to_string()
}

pub fn default_limit() -> u32 {
    100
}

impl Default for KeywordQuery {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            target: None,
            location_code: default_location_code(),
            language_code: default_language_code(),
            limit: default_limit(),
        }
    }
}

/// Failure of one HTTP exchange, cloneable so every coalesced caller gets it.
#[derive(Debug, Clone)]
enum RequestFailure {
    Transport(Arc<reqwest::Error>),
    Status { path: String, status: StatusCode },
    Decode { path: String, reason: String },
}

impl From<RequestFailure> for EtlError {
    fn from(failure: RequestFailure) -> Self {
        match failure {
            RequestFailure::Transport(e) => EtlError::ApiError(e),
            RequestFailure::Status { path, status } => EtlError::ApiRequestError {
                message: format!("{} returned HTTP {}", path, status),
            },
            RequestFailure::Decode { path, reason } => EtlError::InvalidResponse {
                message: format!("{}: {}", path, reason),
            },
        }
    }
}

type SharedResponse = std::result::Result<Value, RequestFailure>;

/// DataForSEO REST client. Identical requests issued while one is still in
/// flight share its response instead of hitting the API again.
pub struct DataForSeoClient {
    client: Client,
    base_url: String,
    login: String,
    password: String,
    in_flight: Mutex<HashMap<String, Arc<OnceCell<SharedResponse>>>>,
}

impl DataForSeoClient {
    pub fn new(
        base_url: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            login: login.into(),
            password: password.into(),
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    #[cfg(test)]
    async fn in_flight_requests(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    pub async fn post_task(&self, path: &str, payload: &Value) -> Result<Value> {
        let request_key = format!("{} {}", path, payload);

        let cell = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(&request_key) {
                Some(existing) => {
                    tracing::debug!("Joining in-flight request to {}", path);
                    Arc::clone(existing)
                }
                None => {
                    let cell = Arc::new(OnceCell::new());
                    in_flight.insert(request_key.clone(), Arc::clone(&cell));
                    cell
                }
            }
        };

        let response = cell
            .get_or_init(|| self.send(path, payload))
            .await
            .clone();

        {
            let mut in_flight = self.in_flight.lock().await;
            if in_flight
                .get(&request_key)
                .is_some_and(|current| Arc::ptr_eq(current, &cell))
            {
                in_flight.remove(&request_key);
            }
        }

        response.map_err(EtlError::from)
    }

    async fn send(&self, path: &str, payload: &Value) -> SharedResponse {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.login, Some(&self.password))
            .json(payload)
            .send()
            .await
            .map_err(|e| RequestFailure::Transport(Arc::new(e)))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(RequestFailure::Status {
                path: path.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RequestFailure::Transport(Arc::new(e)))?;
        serde_json::from_slice(&body).map_err(|e| RequestFailure::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Query one keyword endpoint and return its raw, not yet normalized, items.
    pub async fn fetch_keywords(
        &self,
        endpoint: KeywordEndpoint,
        query: &KeywordQuery,
        all_tasks: bool,
    ) -> Result<Vec<RawApiItem>> {
        let envelope = self.post_task(endpoint.path(), &endpoint.payload(query)).await?;
        let items = if all_tasks {
            unwrap_all_tasks(&envelope)
        } else {
            unwrap_envelope(&envelope)
        };
        tracing::info!("{}: fetched {} raw items", endpoint, items.len());
        Ok(items)
    }
}
