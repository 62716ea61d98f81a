/// LaunchDate backend clients
use crate::domain::raw::extract_items;
use crate::errors::{ApiError, ApiResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Record collections exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Rockets,
    Launches,
    LaunchBases,
    Companies,
    News,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Self::Rockets,
        Self::Launches,
        Self::LaunchBases,
        Self::Companies,
        Self::News,
    ];

    /// Versioned path of the collection endpoint
    pub const fn path(self) -> &'static str {
        match self {
            Self::Rockets => "/api/v1/rockets",
            Self::Launches => "/api/v1/rocket-launches",
            Self::LaunchBases => "/api/v1/launch-bases",
            Self::Companies => "/api/v1/companies",
            Self::News => "/api/v1/news",
        }
    }

    /// Singular noun used in messages
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Rockets => "rocket",
            Self::Launches => "launch",
            Self::LaunchBases => "launch site",
            Self::Companies => "company",
            Self::News => "news article",
        }
    }
}

/// Read-only access to raw catalog records
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &'static str;

    /// Every record of a collection
    async fn fetch_all(&self, collection: Collection) -> ApiResult<Vec<Value>>;

    /// One record by id; `None` when the backend does not know it
    async fn fetch_one(&self, collection: Collection, id: &str) -> ApiResult<Option<Value>>;
}

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("launchdate/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// REST client for the LaunchDate backend
pub struct LaunchApiClient {
    http_client: HttpClient,
    base_url: String,
}

impl LaunchApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: Collection) -> ApiResult<Url> {
        let raw = format!("{}{}", self.base_url, collection.path());
        Url::parse(&raw)
            .map_err(|e| ApiError::Config(format!("invalid backend URL '{raw}': {e}")))
    }

    /// Record URL with the id pushed as a single escaped path segment
    fn record_url(&self, collection: Collection, id: &str) -> ApiResult<Url> {
        let mut url = self.collection_url(collection)?;
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::Config(format!("backend URL '{}' cannot take a path", self.base_url))
            })?
            .push(id);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> ApiResult<Option<Value>> {
        let endpoint = url.path().to_string();
        debug!(%url, "fetching");

        let resp = self.http_client.get_client().get(url.clone()).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            warn!(%url, status = %resp.status(), "backend request failed");
            return Err(ApiError::UpstreamStatus {
                endpoint,
                status: resp.status().as_u16(),
            });
        }

        let json = resp.json().await?;
        Ok(Some(json))
    }
}

#[async_trait]
impl CatalogSource for LaunchApiClient {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn fetch_all(&self, collection: Collection) -> ApiResult<Vec<Value>> {
        match self.get_json(self.collection_url(collection)?).await? {
            Some(json) => Ok(extract_items(json)),
            None => Err(ApiError::UpstreamStatus {
                endpoint: collection.path().to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
            }),
        }
    }

    async fn fetch_one(&self, collection: Collection, id: &str) -> ApiResult<Option<Value>> {
        // dot segments would be dropped by the URL and address the collection
        if matches!(id, "" | "." | "..") || id.contains('/') {
            return Ok(None);
        }
        self.get_json(self.record_url(collection, id)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode as AxumStatus, routing::get, Json, Router};
    use serde_json::json;

    /// Serve a fake backend on an ephemeral port and return its base URL
    async fn mock_backend() -> String {
        let app = Router::new()
            .route(
                "/api/v1/rockets",
                get(|| async { Json(json!([{"id": 1, "name": "Falcon 9"}])) }),
            )
            .route(
                "/api/v1/rocket-launches",
                get(|| async { Json(json!({"items": [{"id": 1}, {"id": 2}]})) }),
            )
            .route(
                "/api/v1/rocket-launches/:id",
                get(|Path(id): Path<String>| async move {
                    if id == "7" {
                        Ok(Json(json!({"id": 7, "name": "Crew-8"})))
                    } else {
                        Err(AxumStatus::NOT_FOUND)
                    }
                }),
            )
            .route(
                "/api/v1/news",
                get(|| async { AxumStatus::SERVICE_UNAVAILABLE }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn client(base: &str) -> LaunchApiClient {
        LaunchApiClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_collection_paths() {
        assert_eq!(Collection::Launches.path(), "/api/v1/rocket-launches");
        assert_eq!(Collection::LaunchBases.path(), "/api/v1/launch-bases");
        assert_eq!(Collection::ALL.len(), 5);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        assert_eq!(client("http://localhost:8080/").base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_fetch_all_bare_array() {
        let base = mock_backend().await;
        let items = client(&base).fetch_all(Collection::Rockets).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "Falcon 9");
    }

    #[tokio::test]
    async fn test_fetch_all_wrapped_items() {
        let base = mock_backend().await;
        let items = client(&base).fetch_all(Collection::Launches).await.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_one_found_and_missing() {
        let base = mock_backend().await;
        let api = client(&base);
        let found = api.fetch_one(Collection::Launches, "7").await.unwrap();
        assert_eq!(found.unwrap()["name"], "Crew-8");
        let missing = api.fetch_one(Collection::Launches, "8").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_reserved_characters_stay_inside_the_id() {
        let base = mock_backend().await;
        let api = client(&base);
        for id in ["7?anything", "7#frag", "7%3F", "..", ".", "7/8"] {
            let found = api.fetch_one(Collection::Launches, id).await.unwrap();
            assert!(found.is_none(), "{id} resolved to a record");
        }
    }

    #[test]
    fn test_record_url_escapes_id() {
        let api = client("http://localhost:8080");
        let url = api.record_url(Collection::Launches, "7?x#y").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/rocket-launches/7%3Fx%23y");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_surfaced() {
        let base = mock_backend().await;
        let err = client(&base).fetch_all(Collection::News).await.unwrap_err();
        assert!(matches!(err, ApiError::UpstreamStatus { status: 503, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_external_error() {
        // port 9 (discard) on localhost is not expected to serve HTTP
        let err = client("http://127.0.0.1:9")
            .fetch_all(Collection::Rockets)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ExternalApi(_)));
    }
}
