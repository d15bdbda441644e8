//! Realtime Trains HTTP client.
//!
//! Provides async methods for the search and service detail endpoints.
//! Handles Basic authentication, the request timeout, a cap on simultaneous
//! upstream requests, and classification of upstream failures.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{ServiceUid, StationCode};

use super::auth::Credentials;
use super::error::{SetupError, UpstreamError};
use super::types::{ServiceDetail, StationSearch};

/// Default base URL for the Realtime Trains API.
pub const DEFAULT_BASE_URL: &str = "https://api.rtt.io/api/v1";

/// Default maximum concurrent upstream requests.
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How much of an upstream body to keep inside an error value.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Configuration for the upstream client.
#[derive(Debug, Clone)]
pub struct RttConfig {
    /// Basic Auth credentials
    pub credentials: Credentials,
    /// Base URL for the API, without the `/json` suffix
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RttConfig {
    /// Create a new config with the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Realtime Trains API client.
///
/// Cheap to clone; clones share the connection pool and the request limiter,
/// so the cap on simultaneous upstream requests holds across all gateway
/// requests.
#[derive(Debug, Clone)]
pub struct RttClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl RttClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RttConfig) -> Result<Self, SetupError> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&config.credentials.header_value()?)
            .map_err(|_| SetupError::InvalidHeader)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Absolute URL for a path under the JSON API.
    fn url(&self, path: &str) -> String {
        format!("{}/json/{}", self.base_url, path)
    }

    /// GET a path and return the body of a 2xx response.
    async fn fetch_body(&self, path: &str) -> Result<String, UpstreamError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| UpstreamError::LimiterClosed)?;

        let url = self.url(path);
        debug!(%url, "upstream request");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), "upstream returned error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        Ok(response.text().await?)
    }

    /// GET a path and decode the JSON body as `T`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        let body = self.fetch_body(path).await?;
        decode(path, &body)
    }

    /// Services calling at a station.
    pub async fn station_search(
        &self,
        station: &StationCode,
    ) -> Result<StationSearch, UpstreamError> {
        self.fetch_json(&format!("search/{station}")).await
    }

    /// Services calling at `from` and then at `to`.
    pub async fn route_search(
        &self,
        from: &StationCode,
        to: &StationCode,
    ) -> Result<StationSearch, UpstreamError> {
        self.fetch_json(&format!("search/{from}/to/{to}")).await
    }

    /// Full itinerary of one service run on `date`.
    ///
    /// A 404, an empty body, or a body without a `serviceUid` (the upstream
    /// answers `{"error": ...}` for unknown or withdrawn schedules) all
    /// become `DetailUnavailable`.
    pub async fn service_detail(
        &self,
        uid: &ServiceUid,
        date: NaiveDate,
    ) -> Result<ServiceDetail, UpstreamError> {
        let path = format!("service/{}/{}", uid, date.format("%Y/%m/%d"));

        let body = match self.fetch_body(&path).await {
            Err(UpstreamError::Status { status: 404, .. }) => {
                return Err(UpstreamError::DetailUnavailable {
                    uid: uid.to_string(),
                    reason: "not found upstream",
                });
            }
            other => other?,
        };

        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(UpstreamError::DetailUnavailable {
                uid: uid.to_string(),
                reason: "empty response",
            });
        }

        let detail: ServiceDetail = decode(&path, &body)?;

        if detail.service_uid.as_ref().is_none() {
            warn!(uid = %uid, body = %body, "detail response has no schedule");
            return Err(UpstreamError::DetailUnavailable {
                uid: uid.to_string(),
                reason: "no schedule in response",
            });
        }

        check_run_date(uid, &detail, date);

        Ok(detail)
    }
}

/// Decode a JSON body, logging the raw body on failure.
fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, UpstreamError> {
    serde_json::from_str(body).map_err(|e| {
        warn!(path, error = %e, body, "failed to decode upstream response");
        UpstreamError::Malformed {
            message: e.to_string(),
            body: truncate(body),
        }
    })
}

/// The upstream may hand back a neighbouring run (services that cross
/// midnight) or a date in an unexpected format. Neither is fatal; the detail
/// is returned as sent.
fn check_run_date(uid: &ServiceUid, detail: &ServiceDetail, requested: NaiveDate) {
    let Some(run_date) = detail.run_date.as_deref() else {
        return;
    };
    match NaiveDate::parse_from_str(run_date, "%Y-%m-%d") {
        Ok(d) if d == requested => {}
        Ok(d) => {
            debug!(uid = %uid, run_date = %d, %requested, "detail is for a different run date");
        }
        Err(_) => {
            warn!(uid = %uid, run_date, "unexpected run date format");
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    const STATION_SEARCH: &str = include_str!("../../data/fixtures/search_kgx.json");
    const DETAIL: &str = include_str!("../../data/fixtures/service_g12345.json");

    fn config(base_url: &str) -> RttConfig {
        RttConfig::new(Credentials::new("alice", "secret")).with_base_url(base_url)
    }

    fn client(base_url: &str) -> RttClient {
        RttClient::new(config(base_url)).unwrap()
    }

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn config_builder() {
        let config = config("http://localhost:8080")
            .with_max_concurrent(3)
            .with_timeout(60);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 3);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = RttConfig::new(Credentials::new("alice", "secret"));

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn empty_credentials_fail_fast() {
        let config = RttConfig::new(Credentials::new("alice", ""));
        assert!(matches!(
            RttClient::new(config),
            Err(SetupError::Credentials(_))
        ));
    }

    #[test]
    fn url_joins_base_and_path() {
        let client = client("http://localhost:8080/api/v1/");
        assert_eq!(
            client.url("search/KGX"),
            "http://localhost:8080/api/v1/json/search/KGX"
        );
    }

    #[tokio::test]
    async fn station_search_sends_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/json/search/KGX")
            .match_header("authorization", "Basic YWxpY2U6c2VjcmV0")
            .with_header("content-type", "application/json")
            .with_body(STATION_SEARCH)
            .create_async()
            .await;

        let search = client(&server.url())
            .station_search(&code("KGX"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(search.services().len(), 2);
    }

    #[tokio::test]
    async fn route_search_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/json/search/KGX/to/EDB")
            .with_body(r#"{"location":{"crs":"KGX"},"services":null}"#)
            .create_async()
            .await;

        let search = client(&server.url())
            .route_search(&code("KGX"), &code("EDB"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(search.services().is_empty());
    }

    #[tokio::test]
    async fn service_detail_path_uses_date() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/json/service/G12345/2024/03/15")
            .with_body(DETAIL)
            .create_async()
            .await;

        let uid = ServiceUid::new("G12345".to_string()).unwrap();
        let detail = client(&server.url())
            .service_detail(&uid, date())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(detail.service_uid.as_deref(), Some("G12345"));
        assert_eq!(detail.locations().len(), 4);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/json/search/KGX")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let err = client(&server.url())
            .station_search(&code("KGX"))
            .await
            .unwrap_err();

        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn malformed_body_is_reported_and_logged() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/json/search/KGX")
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let err = client(&server.url())
            .station_search(&code("KGX"))
            .await
            .unwrap_err();

        match err {
            UpstreamError::Malformed { body, .. } => assert_eq!(body, "<html>oops</html>"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(logs_contain("failed to decode upstream response"));
        assert!(logs_contain("<html>oops</html>"));
    }

    #[tokio::test]
    async fn missing_detail_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/json/service/G00001/2024/03/15")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/json/service/G00002/2024/03/15")
            .with_body(r#"{"error":"No schedule found"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/json/service/G00003/2024/03/15")
            .with_body("null")
            .create_async()
            .await;

        let client = client(&server.url());
        for (uid, reason) in [
            ("G00001", "not found upstream"),
            ("G00002", "no schedule in response"),
            ("G00003", "empty response"),
        ] {
            let uid = ServiceUid::new(uid.to_string()).unwrap();
            match client.service_detail(&uid, date()).await {
                Err(UpstreamError::DetailUnavailable { reason: r, .. }) => assert_eq!(r, reason),
                other => panic!("unexpected result for {uid}: {other:?}"),
            }
        }
    }

    /// Address of a listener that accepts connections and never answers.
    async fn silent_upstream() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let client = RttClient::new(config(&silent_upstream().await).with_timeout(1)).unwrap();

        let err = client.station_search(&code("KGX")).await.unwrap_err();

        assert!(matches!(err, UpstreamError::Unreachable(_)));
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn connection_refused_is_unreachable() {
        // Nothing listens on port 1
        let err = client("http://127.0.0.1:1")
            .station_search(&code("KGX"))
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Unreachable(_)));
        assert!(!err.is_timeout());
    }
}
