//! Request transport.
//!
//! A [`Transport`] turns an endpoint plus request parameters into a raw
//! response body. It knows nothing about the payload.

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::client::PassioConfig;
use super::error::TransportError;

/// Request parameters, sent as the JSON request body.
pub type Params = Map<String, Value>;

/// Longest response body echoed back in a status error.
const STATUS_BODY_PREVIEW: usize = 500;

/// The fixed upstream endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Systems,
    Routes,
    Stops,
    Vehicles,
    Alerts,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Systems,
        Endpoint::Routes,
        Endpoint::Stops,
        Endpoint::Vehicles,
        Endpoint::Alerts,
    ];

    /// Path and fixed query string, relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Systems => "/mapGetData.php?getSystems=2&sortMode=1&credentials=1",
            Endpoint::Routes => "/mapGetData.php?getRoutes=1",
            Endpoint::Stops => "/mapGetData.php?getStops=2",
            Endpoint::Vehicles => "/mapGetData.php?getBuses=2",
            Endpoint::Alerts => "/goServices.php?getAlertMessages=1",
        }
    }

    /// Short lowercase name, also used for fixture file names.
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Systems => "systems",
            Endpoint::Routes => "routes",
            Endpoint::Stops => "stops",
            Endpoint::Vehicles => "vehicles",
            Endpoint::Alerts => "alerts",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sends one request and returns the unparsed body.
///
/// Implementations perform exactly one round trip per call and never retry.
pub trait Transport {
    fn send(&self, endpoint: Endpoint, params: &Params) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, endpoint: Endpoint, params: &Params) -> Result<String, TransportError> {
        (**self).send(endpoint, params)
    }
}

/// Blocking HTTP transport against the live API.
///
/// Holds one pooled connection client; no state carries between requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &PassioConfig) -> Result<Self, TransportError> {
        let agent = HeaderValue::from_str(&config.user_agent).map_err(|_| {
            TransportError::InvalidHeader {
                header: "User-Agent",
                value: config.user_agent.clone(),
            }
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, agent);

        let http = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for an endpoint.
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl Transport for HttpTransport {
    fn send(&self, endpoint: Endpoint, params: &Params) -> Result<String, TransportError> {
        let url = self.url(endpoint);
        debug!(%endpoint, %url, "sending request");

        let request = self.http.post(&url);
        // The systems listing takes no body at all.
        let request = if params.is_empty() {
            request
        } else {
            request.json(params)
        };

        let response = request.send()?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: body.chars().take(STATUS_BODY_PREVIEW).collect(),
            });
        }

        let body = response.text()?;
        debug!(%endpoint, bytes = body.len(), "received response");
        trace!(%endpoint, %body, "response body");

        Ok(body)
    }
}
