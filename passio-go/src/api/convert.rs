//! Conversion from normalized records to domain entities.
//!
//! One builder per entity kind. A builder sees exactly one record (already
//! unwrapped from whatever collection shape carried it) and either returns the
//! entity or explains why the record is unusable. Collection-level policy
//! lives in [`build_all`]: unusable records are logged and skipped, so one bad
//! vehicle never blanks out a fleet.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::geo::{checked_latitude, checked_longitude};
use crate::domain::{
    Alert, AlertId, Route, RouteId, RoutePositions, Stop, StopId, System, SystemId, Vehicle,
    VehicleId,
};

use super::lenient;
use super::normalize::kind_of;
use super::types::{AlertRecord, RouteRecord, StopRecord, SystemRecord, VehicleRecord};

/// Which builder rejected a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    System,
    Route,
    Stop,
    Vehicle,
    Alert,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::System => "system",
            EntityKind::Route => "route",
            EntityKind::Stop => "stop",
            EntityKind::Vehicle => "vehicle",
            EntityKind::Alert => "alert",
        })
    }
}

/// A record that cannot become an entity.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedRecord {
    /// The record is not a JSON object
    #[error("{kind} record is not an object (found {found})")]
    NotAnObject {
        kind: EntityKind,
        found: &'static str,
    },

    /// A required identifying field is absent or empty
    #[error("{kind} record is missing required field `{field}`")]
    MissingField {
        kind: EntityKind,
        field: &'static str,
    },

    /// A required field is present but unusable
    #[error("{kind} record has invalid `{field}`: {value}")]
    InvalidField {
        kind: EntityKind,
        field: &'static str,
        value: String,
    },

    /// The record contradicts itself
    #[error("{kind} record {id} is inconsistent: {reason}")]
    Inconsistent {
        kind: EntityKind,
        id: String,
        reason: &'static str,
    },
}

impl MalformedRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            MalformedRecord::NotAnObject { kind, .. }
            | MalformedRecord::MissingField { kind, .. }
            | MalformedRecord::InvalidField { kind, .. }
            | MalformedRecord::Inconsistent { kind, .. } => *kind,
        }
    }
}

/// Decode one record into its DTO.
fn decode<'a, T: Deserialize<'a>>(kind: EntityKind, record: &'a Value) -> Result<T, MalformedRecord> {
    if !record.is_object() {
        return Err(MalformedRecord::NotAnObject {
            kind,
            found: kind_of(record),
        });
    }
    // Every DTO field is optional and lenient, so only the object check can fail.
    T::deserialize(record).map_err(|_| MalformedRecord::NotAnObject {
        kind,
        found: kind_of(record),
    })
}

fn required<T>(kind: EntityKind, field: &'static str, value: Option<T>) -> Result<T, MalformedRecord> {
    value.ok_or(MalformedRecord::MissingField { kind, field })
}

/// Reject a record whose own `userId` names a system other than the one it
/// was fetched for.
fn check_owner(
    kind: EntityKind,
    id: &str,
    owner: Option<i64>,
    system: SystemId,
) -> Result<(), MalformedRecord> {
    match owner {
        Some(owner) if owner != i64::from(system.get()) => Err(MalformedRecord::Inconsistent {
            kind,
            id: id.to_string(),
            reason: "record belongs to another system",
        }),
        _ => Ok(()),
    }
}

/// Build a [`System`] from a systems listing entry.
pub fn build_system(record: &Value) -> Result<System, MalformedRecord> {
    const KIND: EntityKind = EntityKind::System;
    let dto: SystemRecord = decode(KIND, record)?;

    let raw_id = required(KIND, "id", dto.id)?;
    let id = u32::try_from(raw_id).map_err(|_| MalformedRecord::InvalidField {
        kind: KIND,
        field: "id",
        value: raw_id.to_string(),
    })?;
    let name = required(KIND, "name", dto.fullname.or(dto.name))?;

    Ok(System {
        id: SystemId::new(id),
        name,
        homepage: dto.homepage,
        support_email: dto.go_support_email,
        email: dto.email,
        username: dto.username,
        agency_name: dto.go_agency_name,
        color: dto.go_color,
        shared_code: dto.go_shared_code,
        test_mode: dto.go_test_mode,
        route_planner_enabled: dto.go_route_planner_enabled,
        has_logo: dto.logo,
        requires_authentication: dto.go_authentication_type,
    })
}

/// Build a [`Route`] fetched for `system`.
///
/// Some operators leave `name` blank and only fill the short or full name; the
/// first of `name`, `fullname`, `shortName` present is the display name.
pub fn build_route(record: &Value, system: SystemId) -> Result<Route, MalformedRecord> {
    const KIND: EntityKind = EntityKind::Route;
    let dto: RouteRecord = decode(KIND, record)?;

    let id = required(KIND, "id", dto.id)?;
    check_owner(KIND, &id, dto.user_id, system)?;
    let name = required(
        KIND,
        "name",
        dto.name
            .clone()
            .or_else(|| dto.fullname.clone())
            .or_else(|| dto.short_name.clone()),
    )?;

    Ok(Route {
        id: RouteId::from(id),
        system_id: system,
        name,
        short_name: dto.short_name,
        color: dto.group_color,
        service_time_short: dto.service_time_short,
        service_time: dto.service_time,
        full_name: dto.fullname,
        original_name: dto.name_orig,
        group_id: dto.group_id.map(RouteId::from),
        alt_id: dto.myid.map(RouteId::from),
        timezone: dto.timezone,
        distance: dto.distance,
        archived: dto.archive,
        latitude: dto.latitude.and_then(checked_latitude),
        longitude: dto.longitude.and_then(checked_longitude),
    })
}

/// Build a [`Stop`] fetched for `system`.
///
/// Only the back-references carried on the record itself are attached here;
/// positions from the route side table are merged by
/// [`crate::wiring::wire_stops`].
pub fn build_stop(record: &Value, system: SystemId) -> Result<Stop, MalformedRecord> {
    const KIND: EntityKind = EntityKind::Stop;
    let dto: StopRecord = decode(KIND, record)?;

    let id = required(KIND, "id", dto.id)?;
    check_owner(KIND, &id, dto.user_id, system)?;
    let name = required(KIND, "name", dto.name)?;

    Ok(Stop {
        id: StopId::from(id),
        system_id: system,
        name,
        latitude: dto.latitude.and_then(checked_latitude),
        longitude: dto.longitude.and_then(checked_longitude),
        radius: dto.radius,
        routes: dto
            .routes_and_positions
            .as_ref()
            .map(record_positions)
            .unwrap_or_default(),
    })
}

/// Read a record's own `routesAndPositions` mapping.
///
/// Every route id is kept, even when its positions are unreadable.
fn record_positions(value: &Value) -> BTreeMap<RouteId, RoutePositions> {
    let Value::Object(map) = value else {
        return BTreeMap::new();
    };

    map.iter()
        .map(|(route_id, positions)| {
            let positions = match positions {
                Value::Array(items) => items.iter().filter_map(as_position).collect(),
                single => as_position(single).into_iter().collect(),
            };
            (RouteId::from(route_id.as_str()), RoutePositions::new(positions))
        })
        .collect()
}

fn as_position(value: &Value) -> Option<usize> {
    lenient::as_integer(value).and_then(|n| usize::try_from(n).ok())
}

/// Build a [`Vehicle`] fetched for `system`.
pub fn build_vehicle(record: &Value, system: SystemId) -> Result<Vehicle, MalformedRecord> {
    const KIND: EntityKind = EntityKind::Vehicle;
    let dto: VehicleRecord = decode(KIND, record)?;

    let id = required(KIND, "id", dto.id.or(dto.bus_id))?;
    let name = required(KIND, "name", dto.name.or(dto.bus_name))?;

    Ok(Vehicle {
        id: VehicleId::from(id),
        system_id: system,
        name,
        route_id: dto.route_id.map(RouteId::from),
        route_name: dto.route_name.or(dto.route),
        latitude: dto.latitude.and_then(checked_latitude),
        longitude: dto.longitude.and_then(checked_longitude),
        heading: dto.calculated_course.map(normalize_heading),
        speed: dto.speed,
        passenger_load: dto.pax_load100.or(dto.pax_load),
        out_of_service: dto.out_of_service,
        vehicle_type: dto.bus_type,
        color: dto.color,
        created: dto.created,
        trip_id: dto.trip_id,
        more: dto.more,
    })
}

/// Fold a course in degrees into [0, 360).
fn normalize_heading(course: f64) -> f64 {
    let heading = course.rem_euclid(360.0);
    // rem_euclid rounds tiny negative courses up to exactly 360
    if heading >= 360.0 { 0.0 } else { heading }
}

/// Build an [`Alert`] fetched for `system`.
pub fn build_alert(record: &Value, system: SystemId) -> Result<Alert, MalformedRecord> {
    const KIND: EntityKind = EntityKind::Alert;
    let dto: AlertRecord = decode(KIND, record)?;

    let id = required(KIND, "id", dto.id)?;
    check_owner(KIND, &id, dto.user_id, system)?;
    let name = required(KIND, "name", dto.name)?;

    // An unreadable current field still falls back to the legacy one.
    let active_from = first_timestamp(dto.date_time_from.as_deref(), dto.from.as_deref());
    let active_to = first_timestamp(dto.date_time_to.as_deref(), dto.to.as_deref());

    if let (Some(from), Some(to)) = (active_from, active_to)
        && from > to
    {
        return Err(MalformedRecord::Inconsistent {
            kind: KIND,
            id,
            reason: "active window ends before it starts",
        });
    }

    Ok(Alert {
        id: AlertId::from(id),
        system_id: system,
        name,
        important: dto.important,
        active_from,
        active_to,
        html: dto.html,
        description: dto.gtfs_alert_description_text,
        header: dto.gtfs_alert_header_text,
        url: dto.gtfs_alert_url,
        route_id: dto.route_id.map(RouteId::from),
        archived: dto.archive,
        created: dto.created.as_deref().and_then(parse_timestamp),
        cause_id: dto.gtfs_alert_cause_id,
        effect_id: dto.gtfs_alert_effect_id,
        author: dto.author,
    })
}

/// Parse an upstream timestamp.
///
/// The API sends operator-local `YYYY-MM-DD HH:MM:SS`; RFC 3339 values keep
/// their wall-clock time.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local()))
}

fn first_timestamp(current: Option<&str>, legacy: Option<&str>) -> Option<NaiveDateTime> {
    current
        .and_then(parse_timestamp)
        .or_else(|| legacy.and_then(parse_timestamp))
}

/// Run a builder over every record, skipping the ones it rejects.
///
/// Each rejection is logged with the owning system (if any) and the reason.
pub fn build_all<T>(
    system: Option<SystemId>,
    records: &[Value],
    build: impl Fn(&Value) -> Result<T, MalformedRecord>,
) -> Vec<T> {
    let mut built = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        match build(record) {
            Ok(entity) => built.push(entity),
            Err(e) => {
                warn!(
                    kind = %e.kind(),
                    system = ?system,
                    index,
                    error = %e,
                    "skipping malformed record"
                );
            }
        }
    }

    built
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    const UMICH: SystemId = SystemId::new(1270);

    #[test]
    fn system_from_listing_entry() {
        let system = build_system(&json!({
            "id": "1270",
            "fullname": "University of Michigan",
            "homepage": "https://ltp.umich.edu",
            "goSupportEmail": "support@umich.edu",
            "goTestMode": "0"
        }))
        .unwrap();

        assert_eq!(system.id, UMICH);
        assert_eq!(system.name, "University of Michigan");
        assert_eq!(system.support_email.as_deref(), Some("support@umich.edu"));
        assert_eq!(system.test_mode, Some(false));
        assert_eq!(system.color, None);
    }

    #[test]
    fn system_name_falls_back_to_name_field() {
        let system = build_system(&json!({"id": 5, "name": "Campus Shuttle"})).unwrap();
        assert_eq!(system.name, "Campus Shuttle");
    }

    #[test]
    fn system_requires_id_and_name() {
        let err = build_system(&json!({"fullname": "Nowhere"})).unwrap_err();
        assert_eq!(
            err,
            MalformedRecord::MissingField {
                kind: EntityKind::System,
                field: "id"
            }
        );

        let err = build_system(&json!({"id": 9, "fullname": ""})).unwrap_err();
        assert_eq!(
            err,
            MalformedRecord::MissingField {
                kind: EntityKind::System,
                field: "name"
            }
        );
    }

    #[test]
    fn negative_system_id_is_invalid() {
        let err = build_system(&json!({"id": -4, "fullname": "Broken"})).unwrap_err();
        assert!(matches!(err, MalformedRecord::InvalidField { field: "id", .. }));
    }

    #[test]
    fn route_fields() {
        let route = build_route(
            &json!({
                "id": 77,
                "name": "Northwood",
                "shortName": "NW",
                "groupColor": "#00274C",
                "serviceTimeShort": "7am - 11pm",
                "myid": "4077",
                "groupId": "12"
            }),
            UMICH,
        )
        .unwrap();

        assert_eq!(route.id, "77");
        assert_eq!(route.system_id, UMICH);
        assert_eq!(route.short_name.as_deref(), Some("NW"));
        assert_eq!(route.color.as_deref(), Some("#00274C"));
        assert_eq!(route.service_time_short.as_deref(), Some("7am - 11pm"));
        assert_eq!(route.alt_id, Some(RouteId::from("4077")));
        assert_eq!(route.group_id, Some(RouteId::from("12")));
    }

    #[test]
    fn route_name_falls_back_to_short_name() {
        let route = build_route(&json!({"id": 77, "shortName": "A"}), UMICH).unwrap();
        assert_eq!(route.name, "A");
        assert_eq!(route.short_name.as_deref(), Some("A"));
    }

    #[test]
    fn route_without_any_name_is_malformed() {
        let err = build_route(&json!({"id": 77}), UMICH).unwrap_err();
        assert_eq!(
            err,
            MalformedRecord::MissingField {
                kind: EntityKind::Route,
                field: "name"
            }
        );
    }

    /// Regression fixture for swapped coordinates: latitude and longitude are
    /// distinguishable by sign and magnitude.
    #[test]
    fn coordinates_map_to_matching_attributes() {
        let vehicle = build_vehicle(
            &json!({
                "busId": 3021,
                "busName": "3021",
                "latitude": 42.2776,
                "longitude": -83.7409
            }),
            UMICH,
        )
        .unwrap();
        assert_eq!(vehicle.latitude, Some(42.2776));
        assert_eq!(vehicle.longitude, Some(-83.7409));

        let stop = build_stop(
            &json!({
                "id": "71434",
                "name": "Pierpont Commons",
                "latitude": "42.2913",
                "longitude": "-83.7172"
            }),
            UMICH,
        )
        .unwrap();
        assert_eq!(stop.latitude, Some(42.2913));
        assert_eq!(stop.longitude, Some(-83.7172));

        let route = build_route(
            &json!({"id": 1, "name": "Loop", "latitude": 12.5, "longitude": 101.25}),
            UMICH,
        )
        .unwrap();
        assert_eq!(route.latitude, Some(12.5));
        assert_eq!(route.longitude, Some(101.25));
    }

    #[test]
    fn missing_and_non_numeric_fields_are_absent_not_zero() {
        let vehicle = build_vehicle(
            &json!({
                "id": "3021",
                "name": "3021",
                "latitude": null,
                "calculatedCourse": "",
                "speed": "fast",
                "paxLoad": "n/a"
            }),
            UMICH,
        )
        .unwrap();

        assert_eq!(vehicle.latitude, None);
        assert_eq!(vehicle.longitude, None);
        assert_eq!(vehicle.heading, None);
        assert_eq!(vehicle.speed, None);
        assert_eq!(vehicle.passenger_load, None);
        assert_eq!(vehicle.out_of_service, None);
    }

    #[test]
    fn out_of_range_coordinates_are_dropped() {
        let stop = build_stop(
            &json!({"id": "1", "name": "Bad", "latitude": 142.0, "longitude": -83.7}),
            UMICH,
        )
        .unwrap();

        assert_eq!(stop.latitude, None);
        assert_eq!(stop.longitude, Some(-83.7));
    }

    #[test]
    fn vehicle_prefers_current_field_names() {
        let vehicle = build_vehicle(
            &json!({
                "id": "A1",
                "busId": "B2",
                "name": "Alpha",
                "busName": "Bravo",
                "routeId": 77,
                "routeName": "Northwood",
                "route": "Old Northwood",
                "paxLoad": 0.4,
                "paxLoad100": 40
            }),
            UMICH,
        )
        .unwrap();

        assert_eq!(vehicle.id, VehicleId::from("A1"));
        assert_eq!(vehicle.name, "Alpha");
        assert_eq!(vehicle.route_id, Some(RouteId::from("77")));
        assert_eq!(vehicle.route_name.as_deref(), Some("Northwood"));
        assert_eq!(vehicle.passenger_load, Some(40.0));
    }

    #[test]
    fn vehicle_heading_is_normalized() {
        let heading = |course: Value| {
            build_vehicle(&json!({"id": "1", "name": "1", "calculatedCourse": course}), UMICH)
                .unwrap()
                .heading
        };

        assert_eq!(heading(json!(90)), Some(90.0));
        assert_eq!(heading(json!(360)), Some(0.0));
        assert_eq!(heading(json!(-90)), Some(270.0));
        assert_eq!(heading(json!("359")), Some(359.0));
    }

    #[test]
    fn vehicle_without_id_is_malformed() {
        let err = build_vehicle(&json!({"busName": "Ghost"}), UMICH).unwrap_err();
        assert_eq!(err.kind(), EntityKind::Vehicle);
        assert!(matches!(err, MalformedRecord::MissingField { field: "id", .. }));
    }

    #[test]
    fn non_object_record_is_malformed() {
        let err = build_stop(&json!([1, 2]), UMICH).unwrap_err();
        assert_eq!(
            err,
            MalformedRecord::NotAnObject {
                kind: EntityKind::Stop,
                found: "list"
            }
        );
    }

    #[test]
    fn stop_keeps_its_own_route_positions() {
        let stop = build_stop(
            &json!({
                "id": "71434",
                "name": "Pierpont Commons",
                "routesAndPositions": {"77": [5, 0], "88": 3, "99": "?"}
            }),
            UMICH,
        )
        .unwrap();

        assert_eq!(stop.routes.len(), 3);
        assert_eq!(stop.routes[&RouteId::from("77")].as_slice(), &[0, 5]);
        assert_eq!(stop.routes[&RouteId::from("88")].as_slice(), &[3]);
        assert!(stop.routes[&RouteId::from("99")].is_empty());
    }

    #[test]
    fn alert_window_and_bodies() {
        let alert = build_alert(
            &json!({
                "id": 5521,
                "name": "Detour on State St",
                "important": 1,
                "dateTimeFrom": "2024-09-02 08:00:00",
                "dateTimeTo": "2024-09-04 18:00:00",
                "html": "<p>Use Thayer St.</p>",
                "gtfsAlertDescriptionText": "Use Thayer St."
            }),
            UMICH,
        )
        .unwrap();

        let day = |d| NaiveDate::from_ymd_opt(2024, 9, d).unwrap();
        assert_eq!(alert.id, AlertId::from("5521"));
        assert!(alert.is_important());
        assert_eq!(alert.active_from, day(2).and_hms_opt(8, 0, 0));
        assert_eq!(alert.active_to, day(4).and_hms_opt(18, 0, 0));
        assert_eq!(alert.html.as_deref(), Some("<p>Use Thayer St.</p>"));
        assert_eq!(alert.description.as_deref(), Some("Use Thayer St."));
    }

    #[test]
    fn alert_reads_legacy_window_fields() {
        let alert = build_alert(
            &json!({"id": "1", "name": "Snow", "from": "2024-01-10 06:00:00"}),
            UMICH,
        )
        .unwrap();

        assert!(alert.active_from.is_some());
        assert!(alert.active_to.is_none());
    }

    #[test]
    fn alert_window_falls_back_when_current_field_is_unreadable() {
        let alert = build_alert(
            &json!({
                "id": "3",
                "name": "Game day",
                "dateTimeFrom": "Sep 2, 2024 8:00am",
                "from": "2024-09-02 08:00:00",
                "dateTimeTo": "2024-09-02 20:00:00",
                "to": "garbage"
            }),
            UMICH,
        )
        .unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        assert_eq!(alert.active_from, day.and_hms_opt(8, 0, 0));
        assert_eq!(alert.active_to, day.and_hms_opt(20, 0, 0));
    }

    #[test]
    fn records_owned_by_another_system_are_inconsistent() {
        let err = build_route(&json!({"id": 5, "name": "Foreign", "userId": "76"}), UMICH)
            .unwrap_err();
        assert_eq!(
            err,
            MalformedRecord::Inconsistent {
                kind: EntityKind::Route,
                id: "5".to_string(),
                reason: "record belongs to another system"
            }
        );

        let err = build_stop(&json!({"id": "9", "name": "Franklin St", "userId": 76}), UMICH)
            .unwrap_err();
        assert!(matches!(
            err,
            MalformedRecord::Inconsistent { kind: EntityKind::Stop, .. }
        ));

        let err = build_alert(&json!({"id": "4", "name": "Snow", "userId": "76"}), UMICH)
            .unwrap_err();
        assert!(matches!(
            err,
            MalformedRecord::Inconsistent { kind: EntityKind::Alert, .. }
        ));
    }

    #[test]
    fn records_owned_by_the_requested_system_build() {
        let route = build_route(&json!({"id": 77, "name": "Northwood", "userId": "1270"}), UMICH)
            .unwrap();
        assert_eq!(route.system_id, UMICH);

        let stop = build_stop(&json!({"id": "1", "name": "CCTC", "userId": 1270}), UMICH).unwrap();
        assert_eq!(stop.system_id, UMICH);

        let alert = build_alert(&json!({"id": "2", "name": "Detour", "userId": 1270}), UMICH)
            .unwrap();
        assert_eq!(alert.system_id, UMICH);
    }

    #[test]
    fn inverted_alert_window_is_malformed() {
        let err = build_alert(
            &json!({
                "id": "7",
                "name": "Backwards",
                "dateTimeFrom": "2024-09-04 18:00:00",
                "dateTimeTo": "2024-09-02 08:00:00"
            }),
            UMICH,
        )
        .unwrap_err();

        assert!(matches!(err, MalformedRecord::Inconsistent { .. }));
    }

    #[test]
    fn timestamp_formats() {
        assert!(parse_timestamp("2024-09-02 08:00:00").is_some());
        assert!(parse_timestamp("2024-09-02T08:00:00").is_some());
        assert_eq!(
            parse_timestamp("2024-09-02T08:00:00-04:00"),
            parse_timestamp("2024-09-02 08:00:00")
        );
        assert!(parse_timestamp("next tuesday").is_none());
    }

    #[test]
    fn build_all_skips_malformed_records() {
        let records = vec![
            json!({"busId": 1, "busName": "One"}),
            json!({"busName": "No id"}),
            json!("garbage"),
            json!({"busId": 2, "busName": "Two"}),
        ];

        let vehicles = build_all(Some(UMICH), &records, |r| build_vehicle(r, UMICH));

        let names: Vec<&str> = vehicles.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two"]);
    }

    #[test]
    fn malformed_record_display() {
        let err = MalformedRecord::MissingField {
            kind: EntityKind::Vehicle,
            field: "id",
        };
        assert_eq!(err.to_string(), "vehicle record is missing required field `id`");
    }
}
