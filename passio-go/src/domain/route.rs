//! Route type.

use super::geo::Located;
use super::{RouteId, SystemId};

/// A named line served by one system.
///
/// The stop sequence is not embedded; it comes from the stops endpoint and is
/// resolved through [`crate::wiring::StopNetwork`].
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: RouteId,
    /// The system this route was fetched for.
    pub system_id: SystemId,
    pub name: String,
    pub short_name: Option<String>,
    /// Display color (`groupColor`).
    pub color: Option<String>,
    /// Short service-time label, e.g. "7am - 11pm".
    pub service_time_short: Option<String>,
    pub service_time: Option<String>,
    pub full_name: Option<String>,
    pub original_name: Option<String>,
    pub group_id: Option<RouteId>,
    /// Alternate id (`myid`) some systems key their stop tables by.
    pub alt_id: Option<RouteId>,
    pub timezone: Option<String>,
    pub distance: Option<f64>,
    pub archived: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Route {
    /// Create a route with only the required fields set.
    pub fn new(id: impl Into<RouteId>, system_id: SystemId, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            system_id,
            name: name.into(),
            short_name: None,
            color: None,
            service_time_short: None,
            service_time: None,
            full_name: None,
            original_name: None,
            group_id: None,
            alt_id: None,
            timezone: None,
            distance: None,
            archived: None,
            latitude: None,
            longitude: None,
        }
    }

    /// Every id the upstream may key this route's stop table by, most specific
    /// first.
    ///
    /// The group id is not one of them: groups are numbered separately from
    /// routes, so a group id may equal some other route's id.
    pub fn reference_ids(&self) -> impl Iterator<Item = &RouteId> {
        std::iter::once(&self.id).chain(self.alt_id.as_ref())
    }
}

impl Located for Route {
    fn coordinates(&self) -> (Option<f64>, Option<f64>) {
        (self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_ids_exclude_group() {
        let mut route = Route::new("77", SystemId::new(1270), "Bursley-Baits");
        route.alt_id = Some(RouteId::from("4077"));
        route.group_id = Some(RouteId::from("12"));

        let ids: Vec<&str> = route.reference_ids().map(RouteId::as_str).collect();
        assert_eq!(ids, vec!["77", "4077"]);
    }

    #[test]
    fn reference_ids_skip_absent() {
        let route = Route::new("77", SystemId::new(1270), "Bursley-Baits");
        assert_eq!(route.reference_ids().count(), 1);
    }
}
