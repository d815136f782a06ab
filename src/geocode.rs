//! Nominatim geocoding client
//!
//! Resolves a free-text place name to coordinates via a Nominatim-compatible
//! place-search endpoint. One attempt per request: a navigation command that
//! fails is reported to the user rather than retried. A response with zero
//! candidates is a distinct outcome from a transport failure.

use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::Deserialize;
use url::Url;

/// Default place-search endpoint.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default timeout for lookup requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent, required by the Nominatim usage policy.
const DEFAULT_USER_AGENT: &str = concat!("vocamap/", env!("CARGO_PKG_VERSION"));

/// A resolved coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodeFix {
    pub lat: f64,
    pub lon: f64,
}

/// Error types for geocode lookups.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("connection failed: {0}")]
    Transport(String),

    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    #[error("server returned status {status}")]
    ServerStatus { status: u16 },

    #[error("failed to parse response: {0}")]
    Parse(String),
}

/// Resolver of free-text destinations.
///
/// `Ok(None)` means the service had no match for the destination, which is
/// user-recoverable (retry with different phrasing) and distinct from a
/// transport failure.
pub trait Geocoder: Send + Sync {
    fn resolve<'a>(
        &'a self,
        destination: &'a str,
    ) -> BoxFuture<'a, Result<Option<GeocodeFix>, GeocodeError>>;
}

/// One candidate from the search endpoint. Nominatim serialises coordinates
/// as decimal-degree strings.
#[derive(Debug, Deserialize)]
struct SearchCandidate {
    lat: String,
    lon: String,
}

impl SearchCandidate {
    fn into_fix(self) -> Result<GeocodeFix, GeocodeError> {
        let lat = self
            .lat
            .parse::<f64>()
            .map_err(|e| GeocodeError::Parse(format!("bad latitude '{}': {}", self.lat, e)))?;
        let lon = self
            .lon
            .parse::<f64>()
            .map_err(|e| GeocodeError::Parse(format!("bad longitude '{}': {}", self.lon, e)))?;
        Ok(GeocodeFix { lat, lon })
    }
}

/// HTTP geocoding client for a Nominatim-compatible search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NominatimClient {
    /// Create a client against the public Nominatim instance with defaults.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT)
    }

    /// Create a client with full configuration.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Search endpoint base (e.g. "https://nominatim.openstreetmap.org")
    /// * `timeout_secs` - Request timeout in seconds
    /// * `user_agent` - User-Agent header value sent with every request
    pub fn with_config(base_url: &str, timeout_secs: u64, user_agent: &str) -> Self {
        let timeout = Duration::from_secs(timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        }
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn lookup(&self, destination: &str) -> Result<Option<GeocodeFix>, GeocodeError> {
        let url = Url::parse(&self.base_url)
            .and_then(|base| base.join("search"))
            .map_err(|e| GeocodeError::Transport(format!("invalid base url: {}", e)))?;

        tracing::debug!("Geocoding '{}' via {}", destination, url);

        let response = self
            .client
            .get(url)
            .query(&[("format", "json"), ("q", destination)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodeError::Timeout(self.timeout.as_secs())
                } else {
                    GeocodeError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(GeocodeError::ServerStatus {
                status: response.status().as_u16(),
            });
        }

        let candidates: Vec<SearchCandidate> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        // First candidate wins; alternate matches are not disambiguated.
        let Some(first) = candidates.into_iter().next() else {
            tracing::debug!("No geocode match for '{}'", destination);
            return Ok(None);
        };

        let fix = first.into_fix()?;
        tracing::debug!(
            "Geocoded '{}' to ({:.4}, {:.4})",
            destination,
            fix.lat,
            fix.lon
        );
        Ok(Some(fix))
    }
}

impl Geocoder for NominatimClient {
    fn resolve<'a>(
        &'a self,
        destination: &'a str,
    ) -> BoxFuture<'a, Result<Option<GeocodeFix>, GeocodeError>> {
        Box::pin(self.lookup(destination))
    }
}
