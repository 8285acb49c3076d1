//! Stop type and its route back-references.

use std::collections::BTreeMap;

use super::geo::Located;
use super::{RouteId, StopId, SystemId};

/// Where a stop sits in one route's stop sequence.
///
/// A stop visited more than once on a loop carries every index, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePositions(Vec<usize>);

impl RoutePositions {
    pub fn new(mut positions: Vec<usize>) -> Self {
        positions.sort_unstable();
        positions.dedup();
        Self(positions)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// First index along the route, if the position is known.
    pub fn first(&self) -> Option<usize> {
        self.0.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Union of two position lists.
    pub fn merge(&mut self, other: &RoutePositions) {
        self.0.extend_from_slice(&other.0);
        self.0.sort_unstable();
        self.0.dedup();
    }
}

/// A fixed boarding location.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub system_id: SystemId,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Catchment radius in metres.
    pub radius: Option<f64>,
    /// Serving routes. Keys are weak references: the Route itself may not have
    /// been fetched.
    pub routes: BTreeMap<RouteId, RoutePositions>,
}

impl Stop {
    /// Create a stop with only the required fields set.
    pub fn new(id: impl Into<StopId>, system_id: SystemId, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            system_id,
            name: name.into(),
            latitude: None,
            longitude: None,
            radius: None,
            routes: BTreeMap::new(),
        }
    }

    /// Whether the given route id is recorded as serving this stop.
    pub fn is_served_by(&self, route: &RouteId) -> bool {
        self.routes.contains_key(route)
    }

    pub fn route_ids(&self) -> impl Iterator<Item = &RouteId> {
        self.routes.keys()
    }
}

impl Located for Stop {
    fn coordinates(&self) -> (Option<f64>, Option<f64>) {
        (self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_sorted_and_unique() {
        let positions = RoutePositions::new(vec![7, 0, 7, 3]);
        assert_eq!(positions.as_slice(), &[0, 3, 7]);
        assert_eq!(positions.first(), Some(0));
    }

    #[test]
    fn merge_is_a_union() {
        let mut positions = RoutePositions::new(vec![1, 4]);
        positions.merge(&RoutePositions::new(vec![4, 9]));
        assert_eq!(positions.as_slice(), &[1, 4, 9]);
    }

    #[test]
    fn served_by_uses_route_keys() {
        let mut stop = Stop::new("71434", SystemId::new(1270), "Pierpont Commons");
        stop.routes
            .insert(RouteId::from("77"), RoutePositions::new(vec![2]));

        assert!(stop.is_served_by(&RouteId::from("77")));
        assert!(!stop.is_served_by(&RouteId::from("88")));
    }
}
