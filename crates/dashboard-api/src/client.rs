//! HTTP client for the dashboard REST API.
//!
//! [`DashboardApi`] is the seam the application depends on; [`DashboardClient`]
//! implements it over `reqwest`. Requests are single-shot: no retry, no
//! caching, no version check on writes (last write wins).

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::types::{CardsResponse, Dashboard, DashboardsResponse, UpdateRequest, UpdateResponse, Widget};

/// Public backend of the hosted dashboard service.
pub const DEFAULT_BASE_URL: &str = "https://v3-tjof.onrender.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations the dashboard views need from the backend.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Lists the dashboards owned by `username`, in backend order.
    ///
    /// Returns [`ApiError::Rejected`] when the backend reports `success: false`.
    async fn list_dashboards(&self, username: &str) -> Result<Vec<Dashboard>, ApiError>;

    /// Fetches the widget list of a dashboard.
    ///
    /// A response without `dashboard_items.widgets` yields an empty list.
    async fn fetch_widgets(&self, dashboard_id: &str) -> Result<Vec<Widget>, ApiError>;

    /// Replaces the stored widget list of a dashboard with `widgets`.
    ///
    /// Returns [`ApiError::Rejected`] when the backend reports `success: false`.
    async fn update_widgets(
        &self,
        dashboard_id: &str,
        widgets: &[Widget],
    ) -> Result<UpdateResponse, ApiError>;
}

/// `reqwest`-backed implementation of [`DashboardApi`].
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DashboardClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `base_url` is not an absolute
    /// URL that can carry path segments, or [`ApiError::Network`] if the
    /// underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET /api/dashboards?username={username}`
    pub fn dashboards_url(&self, username: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["api", "dashboards"])?;
        url.query_pairs_mut().append_pair("username", username);
        Ok(url)
    }

    /// `GET /api/get_cards/{dashboard_id}`
    pub fn cards_url(&self, dashboard_id: &str) -> Result<Url, ApiError> {
        self.endpoint(&["api", "get_cards", dashboard_id])
    }

    /// `POST /api/update_card`
    pub fn update_url(&self) -> Result<Url, ApiError> {
        self.endpoint(&["api", "update_card"])
    }
}

#[async_trait]
impl DashboardApi for DashboardClient {
    async fn list_dashboards(&self, username: &str) -> Result<Vec<Dashboard>, ApiError> {
        let url = self.dashboards_url(username)?;
        tracing::debug!(%url, "fetching dashboards");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        parse_dashboards(&read_body(response).await?)
    }

    async fn fetch_widgets(&self, dashboard_id: &str) -> Result<Vec<Widget>, ApiError> {
        let url = self.cards_url(dashboard_id)?;
        tracing::debug!(%url, "fetching widgets");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        parse_cards(&read_body(response).await?)
    }

    async fn update_widgets(
        &self,
        dashboard_id: &str,
        widgets: &[Widget],
    ) -> Result<UpdateResponse, ApiError> {
        let url = self.update_url()?;
        tracing::debug!(%url, dashboard_id, count = widgets.len(), "saving widgets");
        let body = UpdateRequest {
            dashboard_id,
            widgets,
        };
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        parse_update(&read_body(response).await?)
    }
}

/// Maps the HTTP status to a result and reads the body of 2xx responses.
async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status().as_u16();

    match status {
        200..=299 => response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string())),
        500..=599 => Err(ApiError::Server(status)),
        _ => Err(ApiError::Unexpected(status)),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Parses a dashboards listing body into dashboards in backend order.
pub fn parse_dashboards(body: &str) -> Result<Vec<Dashboard>, ApiError> {
    let response: DashboardsResponse = decode(body)?;
    if !response.success {
        return Err(ApiError::Rejected {
            message: response.message,
        });
    }
    Ok(response.dashboards.into_values().collect())
}

/// Parses a `get_cards` body into its widget list.
pub fn parse_cards(body: &str) -> Result<Vec<Widget>, ApiError> {
    let response: CardsResponse = decode(body)?;
    Ok(response.into_widgets())
}

/// Parses an `update_card` body, turning `success: false` into an error.
pub fn parse_update(body: &str) -> Result<UpdateResponse, ApiError> {
    let response: UpdateResponse = decode(body)?;
    if response.success {
        Ok(response)
    } else {
        Err(ApiError::Rejected {
            message: response.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> DashboardClient {
        DashboardClient::new(base, DEFAULT_TIMEOUT).expect("valid base url")
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(DEFAULT_BASE_URL, "https://v3-tjof.onrender.com");
    }

    #[test]
    fn test_dashboards_url_carries_username() {
        let url = client(DEFAULT_BASE_URL)
            .dashboards_url("user3")
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://v3-tjof.onrender.com/api/dashboards?username=user3"
        );
    }

    #[test]
    fn test_cards_url_encodes_dashboard_id() {
        let url = client("http://localhost:8080/")
            .cards_url("a b/c")
            .expect("url");
        assert_eq!(url.as_str(), "http://localhost:8080/api/get_cards/a%20b%2Fc");
    }

    #[test]
    fn test_base_url_path_prefix_is_kept() {
        let url = client("http://localhost:8080/backend/")
            .update_url()
            .expect("url");
        assert_eq!(url.as_str(), "http://localhost:8080/backend/api/update_card");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(
            DashboardClient::new("not a url", DEFAULT_TIMEOUT),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            DashboardClient::new("mailto:someone@example.com", DEFAULT_TIMEOUT),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_parse_dashboards_failure_is_rejected() {
        let result = parse_dashboards(r#"{"success": false, "message": "no such user"}"#);
        assert_eq!(
            result,
            Err(ApiError::Rejected {
                message: Some("no such user".to_string())
            })
        );
    }

    #[test]
    fn test_parse_dashboards_success() {
        let body = r#"{"success": true, "dashboards": {"d1": {"dashboard_id": "d1", "dashboard_name": "Sales"}}}"#;
        let dashboards = parse_dashboards(body).expect("should parse");
        assert_eq!(dashboards.len(), 1);
        assert_eq!(dashboards[0].display_name(), Some("Sales"));
    }

    #[test]
    fn test_parse_cards_malformed_is_decode_error() {
        assert!(matches!(parse_cards("<html>"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_parse_update_failure_is_rejected() {
        assert!(matches!(
            parse_update(r#"{"success": false}"#),
            Err(ApiError::Rejected { message: None })
        ));
        let ok = parse_update(r#"{"success": true, "message": "saved"}"#).expect("success");
        assert_eq!(ok.message.as_deref(), Some("saved"));
    }
}
