//! Fixture transport for running without API access.
//!
//! Serves canned response bodies as if they were live API responses, and
//! records every request it receives.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::domain::SystemId;

use super::error::TransportError;
use super::lenient;
use super::transport::{Endpoint, Params, Transport};

/// One request as the fixture transport saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub endpoint: Endpoint,
    pub params: Params,
}

/// Transport that answers from in-memory bodies.
///
/// A body registered for a specific system wins over the endpoint's generic
/// body.
#[derive(Debug, Default)]
pub struct FixtureTransport {
    bodies: HashMap<(Endpoint, Option<SystemId>), String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FixtureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for every request to `endpoint`.
    pub fn with_body(mut self, endpoint: Endpoint, body: impl Into<String>) -> Self {
        self.bodies.insert((endpoint, None), body.into());
        self
    }

    /// Serve `body` for requests to `endpoint` about `system`.
    pub fn with_system_body(
        mut self,
        endpoint: Endpoint,
        system: SystemId,
        body: impl Into<String>,
    ) -> Self {
        self.bodies.insert((endpoint, Some(system)), body.into());
        self
    }

    /// Load bodies from a directory.
    ///
    /// Expects files named `{endpoint}.json` (e.g. `routes.json`) or
    /// `{endpoint}_{system}.json` (e.g. `vehicles_1270.json`). Other files are
    /// ignored.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TransportError> {
        let dir = dir.as_ref();
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| TransportError::FixtureIo { path, source }
        };

        let mut transport = Self::new();
        for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
            let path = entry.map_err(io_error(dir))?.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(parse_fixture_name)
            else {
                debug!(path = %path.display(), "ignoring unrecognised fixture file");
                continue;
            };

            let body = std::fs::read_to_string(&path).map_err(io_error(&path))?;
            debug!(endpoint = %key.0, system = ?key.1, path = %path.display(), "loaded fixture");
            transport.bodies.insert(key, body);
        }

        Ok(transport)
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log().clone()
    }

    pub fn request_count(&self) -> usize {
        self.log().len()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<RecordedRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `routes` or `routes_1270` to its lookup key.
fn parse_fixture_name(stem: &str) -> Option<(Endpoint, Option<SystemId>)> {
    let (name, system) = match stem.split_once('_') {
        Some((name, system)) => (name, Some(SystemId::new(system.parse().ok()?))),
        None => (stem, None),
    };
    let endpoint = Endpoint::ALL.into_iter().find(|e| e.name() == name)?;
    Some((endpoint, system))
}

/// The system a request is about, from whichever parameter carries it.
fn requested_system(params: &Params) -> Option<SystemId> {
    ["s0", "systemSelected0"]
        .iter()
        .find_map(|key| params.get(*key))
        .and_then(lenient::as_integer)
        .and_then(|id| u32::try_from(id).ok())
        .map(SystemId::new)
}

impl Transport for FixtureTransport {
    fn send(&self, endpoint: Endpoint, params: &Params) -> Result<String, TransportError> {
        self.log().push(RecordedRequest {
            endpoint,
            params: params.clone(),
        });

        let system = requested_system(params);
        system
            .and_then(|id| self.bodies.get(&(endpoint, Some(id))))
            .or_else(|| self.bodies.get(&(endpoint, None)))
            .cloned()
            .ok_or(TransportError::MissingFixture { endpoint, system })
    }
}
