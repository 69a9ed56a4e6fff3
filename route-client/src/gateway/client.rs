//! Routing backend HTTP client.
//!
//! Thin reqwest wrapper around the three backend surfaces: location
//! search, segmented route computation, and the legacy polyline route API.
//! Status-code triage happens here; conversion to domain types does not.

use reqwest::header::{HeaderMap, HeaderValue};

use super::error::GatewayError;
use super::types::{
    LegacyRouteResponse, LocationHit, RouteRequestBody, RoutesResponse, SearchResponse,
};
use crate::geometry::Coordinate;

/// Default base URL for the routes endpoint.
const DEFAULT_ROUTES_URL: &str = "http://localhost:50060/routeplanner/routes";

/// Default base URL for the location search endpoint.
const DEFAULT_SEARCH_URL: &str = "http://localhost:50091/routeplanner/location/search";

/// Configuration for the routing client.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// URL of the segmented routes endpoint.
    pub routes_url: String,
    /// URL of the location search endpoint.
    pub search_url: String,
    /// URL of the legacy polyline route endpoint, if deployed.
    pub legacy_routes_url: Option<String>,
    /// Client variant sent with every request.
    pub variant: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self {
            routes_url: DEFAULT_ROUTES_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            legacy_routes_url: None,
            variant: "dweb".to_string(),
            timeout_secs: 30,
        }
    }

    /// Set the routes endpoint URL.
    pub fn with_routes_url(mut self, url: impl Into<String>) -> Self {
        self.routes_url = url.into();
        self
    }

    /// Set the search endpoint URL.
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    /// Set the legacy polyline route endpoint URL.
    pub fn with_legacy_routes_url(mut self, url: impl Into<String>) -> Self {
        self.legacy_routes_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP client for the routing backend.
#[derive(Debug, Clone)]
pub struct RoutingClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl RoutingClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        let variant = HeaderValue::from_str(&config.variant).map_err(|_| GatewayError::Api {
            status: 0,
            message: "Invalid variant header value".to_string(),
        })?;
        headers.insert("variant", variant);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Search for locations matching a free-text query.
    ///
    /// Empty queries, unsuccessful envelopes and empty result sets all
    /// yield an empty hit list, not an error. Duplicate hits (same
    /// location id) are dropped, keeping the first occurrence.
    pub async fn search(&self, query: &str) -> Result<Vec<LocationHit>, GatewayError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .http
            .get(&self.config.search_url)
            .query(&[("q", query)])
            .send()
            .await?;

        let body = read_success_body(response).await?;

        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| GatewayError::Json {
                message: format!("{e} (body: {})", truncate(&body)),
            })?;

        if !parsed.success {
            tracing::debug!(query, "search backend reported no success");
            return Ok(Vec::new());
        }

        Ok(dedup_hits(parsed.data))
    }

    /// Request segmented routes between two referenced locations.
    pub async fn fetch_routes(
        &self,
        body: &RouteRequestBody,
    ) -> Result<RoutesResponse, GatewayError> {
        let response = self
            .http
            .post(&self.config.routes_url)
            .json(body)
            .send()
            .await?;

        let body = read_success_body(response).await?;

        serde_json::from_str(&body).map_err(|e| GatewayError::Json {
            message: format!("{e} (body: {})", truncate(&body)),
        })
    }

    /// Request a route from the legacy polyline API for raw coordinates.
    pub async fn fetch_legacy_routes(
        &self,
        points: &[Coordinate],
        profile: &str,
    ) -> Result<LegacyRouteResponse, GatewayError> {
        let url = self
            .config
            .legacy_routes_url
            .as_deref()
            .ok_or(GatewayError::Api {
                status: 0,
                message: "legacy route endpoint not configured".to_string(),
            })?;

        let mut query: Vec<(&str, String)> = points
            .iter()
            .map(|p| ("point", format!("{},{}", p.lat, p.lng)))
            .collect();
        query.push(("profile", profile.to_string()));

        let response = self.http.get(url).query(&query).send().await?;

        let body = read_success_body(response).await?;

        serde_json::from_str(&body).map_err(|e| GatewayError::Json {
            message: format!("{e} (body: {})", truncate(&body)),
        })
    }
}

/// Map non-success statuses to errors and return the body text otherwise.
async fn read_success_body(response: reqwest::Response) -> Result<String, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(response.text().await?)
}

/// Keep the first hit per location id.
fn dedup_hits(hits: Vec<LocationHit>) -> Vec<LocationHit> {
    let mut seen = std::collections::HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.id.clone()))
        .collect()
}

fn truncate(body: &str) -> String {
    body.chars().take(500).collect()
}
