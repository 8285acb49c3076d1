//! Passio GO transit client.
//!
//! A synchronous client for the Passio GO real-time transit API: list transit
//! systems, then fetch a system's routes, stops, live vehicles and service
//! alerts as typed entities.
//!
//! ```no_run
//! use passio_go::{PassioClient, PassioConfig, SystemId};
//!
//! let client = PassioClient::new(&PassioConfig::default())?;
//! for vehicle in client.vehicles(SystemId::new(1270))? {
//!     println!("{} on {:?}", vehicle.name, vehicle.route_name);
//! }
//! # Ok::<(), passio_go::PassioError>(())
//! ```

pub mod api;
pub mod domain;
pub mod export;
pub mod wiring;

pub use api::{PassioClient, PassioConfig, PassioError, list_systems, system_by_id};
pub use domain::{Alert, Route, Stop, System, SystemId, Vehicle};
