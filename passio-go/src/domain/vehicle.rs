//! Live vehicle type.

use super::geo::Located;
use super::{Route, RouteId, SystemId, VehicleId};

/// A vehicle position report from one poll.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub system_id: SystemId,
    pub name: String,
    /// Correlation key against [`Route::id`]; not resolved eagerly.
    pub route_id: Option<RouteId>,
    pub route_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Heading in degrees, within [0, 360).
    pub heading: Option<f64>,
    pub speed: Option<f64>,
    /// Passenger load as a percentage of capacity.
    pub passenger_load: Option<f64>,
    pub out_of_service: Option<bool>,
    pub vehicle_type: Option<String>,
    pub color: Option<String>,
    pub created: Option<String>,
    pub trip_id: Option<String>,
    pub more: Option<String>,
}

impl Vehicle {
    /// Create a vehicle with only the required fields set.
    pub fn new(id: impl Into<VehicleId>, system_id: SystemId, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            system_id,
            name: name.into(),
            route_id: None,
            route_name: None,
            latitude: None,
            longitude: None,
            heading: None,
            speed: None,
            passenger_load: None,
            out_of_service: None,
            vehicle_type: None,
            color: None,
            created: None,
            trip_id: None,
            more: None,
        }
    }

    /// Whether this vehicle reports itself as running the given route.
    pub fn is_on_route(&self, route: &Route) -> bool {
        self.route_id.as_ref() == Some(&route.id)
    }

    /// Only an explicit out-of-service report takes a vehicle out of service.
    pub fn is_in_service(&self) -> bool {
        self.out_of_service != Some(true)
    }
}

impl Located for Vehicle {
    fn coordinates(&self) -> (Option<f64>, Option<f64>) {
        (self.latitude, self.longitude)
    }
}
