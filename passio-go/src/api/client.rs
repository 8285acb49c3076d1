//! Passio GO client facade.
//!
//! Every method is one fresh round trip: build the request parameters, send,
//! decode, check the upstream error envelope, unwrap the collection, normalize
//! its shape, then build entities. Nothing is cached between calls.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{Alert, Route, Stop, System, SystemId, Vehicle};
use crate::wiring::{StopNetwork, parse_route_sequences};

use super::convert::{build_alert, build_all, build_route, build_stop, build_system, build_vehicle};
use super::error::{PassioError, ShapeError};
use super::normalize::{kind_of, normalize, normalize_entries};
use super::transport::{Endpoint, HttpTransport, Params, Transport};

/// Default base URL for the Passio GO API.
pub const DEFAULT_BASE_URL: &str = "https://passiogo.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("passio-go/", env!("CARGO_PKG_VERSION"));

/// Longest body preview kept in a decode error.
const JSON_BODY_PREVIEW: usize = 500;

/// Placeholder key the vehicles endpoint uses for "no bus".
const PLACEHOLDER_VEHICLE_KEY: &str = "-1";

/// Configuration for the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassioConfig {
    /// Base URL for the API (defaults to production Passio GO)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sent as the `User-Agent` header
    pub user_agent: String,
}

impl PassioConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set a custom base URL (for testing or a proxy).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }
}

impl Default for PassioConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Passio GO API client.
///
/// Generic over its [`Transport`] so tests and offline tools can serve canned
/// bodies; the default talks HTTP.
#[derive(Debug, Clone)]
pub struct PassioClient<T = HttpTransport> {
    transport: T,
}

impl PassioClient<HttpTransport> {
    /// Create an HTTP client with the given configuration.
    pub fn new(config: &PassioConfig) -> Result<Self, PassioError> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: Transport> PassioClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Every transit system the API knows about.
    pub fn list_systems(&self) -> Result<Vec<System>, PassioError> {
        let body = self.fetch(Endpoint::Systems, Params::new())?;
        let records = normalize("all", into_envelope("systems", body)?.member("all"))?;

        let systems = build_all(None, &records, build_system);
        debug!(count = systems.len(), "built systems");
        Ok(systems)
    }

    /// Look a system up by id.
    ///
    /// Fetches the full listing; an unknown id is `None`.
    pub fn system_by_id(&self, id: SystemId) -> Result<Option<System>, PassioError> {
        Ok(self
            .list_systems()?
            .into_iter()
            .find(|system| system.id == id))
    }

    /// Routes of one system.
    pub fn routes(&self, system: SystemId) -> Result<Vec<Route>, PassioError> {
        let mut params = system_params("systemSelected0", system);
        params.insert("amount".into(), Value::from(1));

        let body = self.fetch(Endpoint::Routes, params)?;
        // Routes arrive either wrapped in `all` or as the bare collection.
        let collection = match body {
            Value::Object(mut map) if map.contains_key("all") => {
                map.shift_remove("all").unwrap_or(Value::Null)
            }
            other => other,
        };
        let records = normalize("routes", collection)?;

        let routes = build_all(Some(system), &records, |r| build_route(r, system));
        debug!(%system, count = routes.len(), "built routes");
        Ok(routes)
    }

    /// Stops of one system, wired to the routes serving them, together with
    /// each route's stop sequence.
    pub fn stop_network(&self, system: SystemId) -> Result<StopNetwork, PassioError> {
        let mut params = system_params("s0", system);
        params.insert("sA".into(), Value::from(1));

        let body = self.fetch(Endpoint::Stops, params)?;
        let mut envelope = into_envelope("stops", body)?;
        let records = normalize("stops", envelope.member("stops"))?;
        let table = normalize_entries("routes", envelope.member("routes"))?;

        let stops = build_all(Some(system), &records, |r| build_stop(r, system));
        let sequences = parse_route_sequences(table);
        debug!(
            %system,
            stops = stops.len(),
            routes = sequences.len(),
            "built stop network"
        );
        Ok(StopNetwork::new(system, stops, sequences))
    }

    /// Stops of one system.
    pub fn stops(&self, system: SystemId) -> Result<Vec<Stop>, PassioError> {
        Ok(self.stop_network(system)?.into_stops())
    }

    /// A route's stops in traversal order.
    ///
    /// Fetches the stop network of the route's system.
    pub fn route_stops(&self, route: &Route) -> Result<Vec<Stop>, PassioError> {
        let network = self.stop_network(route.system_id)?;
        Ok(network.stops_for_route(route).into_iter().cloned().collect())
    }

    /// Vehicles currently reported for one system.
    pub fn vehicles(&self, system: SystemId) -> Result<Vec<Vehicle>, PassioError> {
        let mut params = system_params("s0", system);
        params.insert("sA".into(), Value::from(1));

        let body = self.fetch(Endpoint::Vehicles, params)?;
        let entries = normalize_entries("buses", into_envelope("vehicles", body)?.member("buses"))?;

        let records: Vec<Value> = entries
            .into_iter()
            .filter(|(key, _)| key.as_deref() != Some(PLACEHOLDER_VEHICLE_KEY))
            .filter_map(|(_, value)| unwrap_singleton(value))
            .collect();

        let vehicles = build_all(Some(system), &records, |r| build_vehicle(r, system));
        debug!(%system, count = vehicles.len(), "built vehicles");
        Ok(vehicles)
    }

    /// Service alerts for one system.
    pub fn system_alerts(&self, system: SystemId) -> Result<Vec<Alert>, PassioError> {
        let mut params = system_params("systemSelected0", system);
        params.insert("amount".into(), Value::from(1));
        params.insert("routesAmount".into(), Value::from(0));

        let body = self.fetch(Endpoint::Alerts, params)?;
        let records = normalize("msgs", into_envelope("alerts", body)?.member("msgs"))?;

        let alerts = build_all(Some(system), &records, |r| build_alert(r, system));
        debug!(%system, count = alerts.len(), "built alerts");
        Ok(alerts)
    }

    /// One round trip: send, decode, and reject an upstream error envelope.
    fn fetch(&self, endpoint: Endpoint, params: Params) -> Result<Value, PassioError> {
        let body = self.transport.send(endpoint, &params)?;
        let mut value = decode(&body)?;
        check_upstream_error(&mut value)?;
        Ok(value)
    }
}

/// Parameters carrying a system id under `key`, as a string.
fn system_params(key: &str, system: SystemId) -> Params {
    let mut params = Params::new();
    params.insert(key.into(), Value::String(system.to_string()));
    params
}

fn decode(body: &str) -> Result<Value, PassioError> {
    serde_json::from_str(body).map_err(|e| PassioError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(JSON_BODY_PREVIEW).collect()),
    })
}

/// Fail on a non-empty `error` field; drop an empty one.
fn check_upstream_error(value: &mut Value) -> Result<(), PassioError> {
    let Value::Object(map) = value else {
        return Ok(());
    };
    let Some(error) = map.shift_remove("error") else {
        return Ok(());
    };

    let message = match error {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s).filter(|s| !s.trim().is_empty()),
        other => Some(other.to_string()),
    };

    match message {
        Some(message) => Err(PassioError::Upstream(message)),
        None => Ok(()),
    }
}

/// The top-level object of a response.
struct Envelope(Map<String, Value>);

impl Envelope {
    /// Take a member out, `null` if absent.
    fn member(&mut self, key: &str) -> Value {
        self.0.shift_remove(key).unwrap_or(Value::Null)
    }
}

/// Read a response body as an envelope object.
///
/// `null` and an empty list stand for "nothing"; any other non-object is a
/// shape error.
fn into_envelope(endpoint: &'static str, body: Value) -> Result<Envelope, ShapeError> {
    match body {
        Value::Object(map) => Ok(Envelope(map)),
        Value::Null => Ok(Envelope(Map::new())),
        Value::Array(items) if items.is_empty() => Ok(Envelope(Map::new())),
        other => Err(ShapeError {
            collection: endpoint,
            found: kind_of(&other),
        }),
    }
}

/// Vehicle entries hold their record in a one-element list.
fn unwrap_singleton(value: Value) -> Option<Value> {
    match value {
        Value::Array(items) => items.into_iter().next(),
        record => Some(record),
    }
}

/// Convenience accessors scoped to one system.
impl System {
    pub fn routes<T: Transport>(&self, client: &PassioClient<T>) -> Result<Vec<Route>, PassioError> {
        client.routes(self.id)
    }

    pub fn stops<T: Transport>(&self, client: &PassioClient<T>) -> Result<Vec<Stop>, PassioError> {
        client.stops(self.id)
    }

    pub fn stop_network<T: Transport>(
        &self,
        client: &PassioClient<T>,
    ) -> Result<StopNetwork, PassioError> {
        client.stop_network(self.id)
    }

    pub fn vehicles<T: Transport>(
        &self,
        client: &PassioClient<T>,
    ) -> Result<Vec<Vehicle>, PassioError> {
        client.vehicles(self.id)
    }

    pub fn system_alerts<T: Transport>(
        &self,
        client: &PassioClient<T>,
    ) -> Result<Vec<Alert>, PassioError> {
        client.system_alerts(self.id)
    }
}

impl Route {
    /// This route's stops in traversal order.
    pub fn stops<T: Transport>(&self, client: &PassioClient<T>) -> Result<Vec<Stop>, PassioError> {
        client.route_stops(self)
    }
}

/// List every system using a default HTTP client.
pub fn list_systems() -> Result<Vec<System>, PassioError> {
    PassioClient::new(&PassioConfig::default())?.list_systems()
}

/// Look a system up by id using a default HTTP client.
pub fn system_by_id(id: SystemId) -> Result<Option<System>, PassioError> {
    PassioClient::new(&PassioConfig::default())?.system_by_id(id)
}
