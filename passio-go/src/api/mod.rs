//! Passio GO API client.
//!
//! This module talks to the Passio GO transit tracking API and turns its
//! responses into the types in [`crate::domain`].
//!
//! Key characteristics of the API:
//! - Every request is a `POST` with a JSON body; there is no authentication
//! - The same collection may arrive as a list or as a mapping keyed by
//!   synthetic ids, so every collection goes through [`normalize`]
//! - Scalars are loosely typed (ids as numbers or strings, flags as `0`/`1`),
//!   see [`lenient`]
//! - Errors may be reported in-band through an `error` field of a 200 response

mod client;
mod convert;
mod error;
mod fixture;
pub mod lenient;
mod normalize;
mod transport;
mod types;


pub use client::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, PassioClient, PassioConfig,
    list_systems, system_by_id,
};
pub use convert::{
    EntityKind, MalformedRecord, build_alert, build_all, build_route, build_stop, build_system,
    build_vehicle, parse_timestamp,
};
pub use error::{PassioError, ShapeError, TransportError};
pub use fixture::{FixtureTransport, RecordedRequest};
pub use normalize::{Collection, kind_of, normalize, normalize_entries};
pub use transport::{Endpoint, HttpTransport, Params, Transport};
pub use types::{AlertRecord, RouteRecord, StopRecord, SystemRecord, VehicleRecord};
