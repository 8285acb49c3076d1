//! Transit domain types.
//!
//! Every entity is an immutable snapshot of one fetch. Cross-entity links are
//! carried as ids, never as embedded objects; optional upstream fields are
//! `Option`s and are never filled with sentinel values.

mod alert;
pub mod geo;
mod ids;
mod route;
mod stop;
mod system;
mod vehicle;

pub use alert::Alert;
pub use geo::{Located, has_valid_coordinates, with_valid_coordinates};
pub use ids::{AlertId, RouteId, StopId, SystemId, VehicleId};
pub use route::Route;
pub use stop::{RoutePositions, Stop};
pub use system::System;
pub use vehicle::Vehicle;
