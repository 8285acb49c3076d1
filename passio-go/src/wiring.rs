//! Cross-entity references.
//!
//! All links are by id. A route's stop sequence comes from the side table the
//! stops endpoint returns next to the stops; a stop's serving routes are
//! derived from the same table; a vehicle's route is a plain string key the
//! caller matches against routes it fetched separately.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::debug;

use crate::api::lenient;
use crate::domain::{Route, RouteId, RoutePositions, Stop, StopId, SystemId, Vehicle};

/// One route's stops in traversal order, from the stops endpoint side table.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSequence {
    /// The key the side table files this route under: the route's `id`, or
    /// its `myid` on some operators.
    pub route_id: RouteId,
    pub name: Option<String>,
    pub color: Option<String>,
    /// Stop ids in physical order along the route. A stop served twice (a
    /// loop) appears twice.
    pub stops: Vec<StopId>,
}

impl RouteSequence {
    /// Every index at which `stop` appears.
    pub fn positions_of(&self, stop: &StopId) -> Vec<usize> {
        self.stops
            .iter()
            .enumerate()
            .filter(|(_, id)| *id == stop)
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Parse the stops endpoint's `routes` side table.
///
/// Each value is `[name, color, entry, entry, ...]` where an entry is either
/// `0` (a placeholder) or an array whose second element is a stop id. Entries
/// keep their source order. Entries without a route key cannot be attributed
/// and are dropped.
pub fn parse_route_sequences(table: Vec<(Option<String>, Value)>) -> Vec<RouteSequence> {
    table
        .into_iter()
        .filter_map(|(key, value)| {
            let Some(route_id) = key else {
                debug!("dropping route table entry without a route key");
                return None;
            };
            let Value::Array(items) = value else {
                debug!(route = %route_id, "dropping non-list route table entry");
                return None;
            };

            let mut items = items.into_iter();
            let name = items.next().as_ref().and_then(lenient::as_text);
            let color = items.next().as_ref().and_then(lenient::as_text);
            let stops = items.filter_map(|entry| sequence_stop(&entry)).collect();

            Some(RouteSequence {
                route_id: RouteId::from(route_id),
                name,
                color,
                stops,
            })
        })
        .collect()
}

fn sequence_stop(entry: &Value) -> Option<StopId> {
    match entry {
        Value::Array(fields) => fields.get(1).and_then(lenient::as_text).map(StopId::from),
        _ => None,
    }
}

/// Every route in `sequences` that visits `stop`, with the indices it visits
/// it at.
pub fn positions_in(sequences: &[RouteSequence], stop: &StopId) -> BTreeMap<RouteId, RoutePositions> {
    sequences
        .iter()
        .filter_map(|sequence| {
            let positions = sequence.positions_of(stop);
            (!positions.is_empty())
                .then(|| (sequence.route_id.clone(), RoutePositions::new(positions)))
        })
        .collect()
}

/// Attach side-table positions to freshly built stops.
///
/// Back-references already on a stop are kept; positions for the same route
/// are merged.
pub fn wire_stops(stops: Vec<Stop>, sequences: &[RouteSequence]) -> Vec<Stop> {
    stops
        .into_iter()
        .map(|mut stop| {
            for (route_id, positions) in positions_in(sequences, &stop.id) {
                stop.routes.entry(route_id).or_default().merge(&positions);
            }
            stop
        })
        .collect()
}

/// The stops of one system together with its route sequences, from a single
/// stops fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct StopNetwork {
    pub system_id: SystemId,
    pub stops: Vec<Stop>,
    pub sequences: Vec<RouteSequence>,
}

impl StopNetwork {
    /// Build a network, wiring side-table positions into the stops.
    pub fn new(system_id: SystemId, stops: Vec<Stop>, sequences: Vec<RouteSequence>) -> Self {
        let stops = wire_stops(stops, &sequences);
        Self {
            system_id,
            stops,
            sequences,
        }
    }

    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stops.iter().find(|stop| &stop.id == id)
    }

    /// The side-table sequence for a route.
    ///
    /// The table may file a route under its `id` or its `myid`; they are tried
    /// in that order.
    pub fn sequence_for(&self, route: &Route) -> Option<&RouteSequence> {
        route.reference_ids().find_map(|reference| {
            self.sequences
                .iter()
                .find(|sequence| &sequence.route_id == reference)
        })
    }

    /// A route's stops in traversal order, exactly as the side table lists
    /// them. Ids the stop table does not know are skipped.
    pub fn stops_for_route(&self, route: &Route) -> Vec<&Stop> {
        let Some(sequence) = self.sequence_for(route) else {
            return Vec::new();
        };

        let by_id: HashMap<&StopId, &Stop> =
            self.stops.iter().map(|stop| (&stop.id, stop)).collect();

        sequence
            .stops
            .iter()
            .filter_map(|id| {
                let stop = by_id.get(id).copied();
                if stop.is_none() {
                    debug!(route = %route.id, stop = %id, "route references unknown stop");
                }
                stop
            })
            .collect()
    }

    pub fn into_stops(self) -> Vec<Stop> {
        self.stops
    }
}

/// Vehicles reporting the given route, in source order.
pub fn vehicles_on_route<'a>(vehicles: &'a [Vehicle], route: &RouteId) -> Vec<&'a Vehicle> {
    vehicles
        .iter()
        .filter(|vehicle| vehicle.route_id.as_ref() == Some(route))
        .collect()
}

/// Vehicles whose route id names none of `routes`.
///
/// Vehicles without a route id are not dangling and are not returned.
pub fn vehicles_with_unknown_route<'a>(vehicles: &'a [Vehicle], routes: &[Route]) -> Vec<&'a Vehicle> {
    vehicles
        .iter()
        .filter(|vehicle| {
            vehicle
                .route_id
                .as_ref()
                .is_some_and(|id| !routes.iter().any(|route| &route.id == id))
        })
        .collect()
}
