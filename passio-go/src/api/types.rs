//! Passio Go API record DTOs.
//!
//! One struct per record kind, decoded from a single normalized record. Every
//! field is optional and decoded leniently (see [`super::lenient`]): whether a
//! record is usable is decided by the builders in [`super::convert`], not by
//! deserialization.

use serde::Deserialize;
use serde_json::Value;

use super::lenient;

/// Entry of the systems listing (`getSystems`, under `all`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRecord {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub id: Option<i64>,

    /// Display name as the listing sends it.
    #[serde(default, deserialize_with = "lenient::text")]
    pub fullname: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub homepage: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub go_support_email: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub go_agency_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub go_color: Option<String>,

    #[serde(default, deserialize_with = "lenient::integer")]
    pub go_shared_code: Option<i64>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub go_test_mode: Option<bool>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub go_route_planner_enabled: Option<bool>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub logo: Option<bool>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub go_authentication_type: Option<bool>,
}

/// Entry of the routes listing (`getRoutes`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,

    /// Owning system, as reported by the route itself.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub user_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub short_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub fullname: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub name_orig: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub group_color: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub group_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub myid: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub service_time: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub service_time_short: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub timezone: Option<String>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub distance: Option<f64>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub archive: Option<bool>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub latitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub longitude: Option<f64>,
}

/// Entry of the stops table (`getStops`, under `stops`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::integer")]
    pub user_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub latitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub longitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub radius: Option<f64>,

    /// Route id → position(s), when the record carries its own back-references.
    #[serde(default)]
    pub routes_and_positions: Option<Value>,
}

/// Entry of the vehicles table (`getBuses`, under `buses`).
///
/// The upstream has used two naming schemes for the same fields; both are
/// read and reconciled by the builder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub bus_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub bus_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub bus_type: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub route_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub route_name: Option<String>,

    /// Older name for `routeName`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub route: Option<String>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub latitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub longitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub calculated_course: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub speed: Option<f64>,

    #[serde(default, deserialize_with = "lenient::number")]
    pub pax_load: Option<f64>,

    /// Load already scaled to a percentage.
    #[serde(default, deserialize_with = "lenient::number")]
    pub pax_load100: Option<f64>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub out_of_service: Option<bool>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub color: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub created: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub trip_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub more: Option<String>,
}

/// Entry of the alert messages (`getAlertMessages`, under `msgs`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::integer")]
    pub user_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub route_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub html: Option<String>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub important: Option<bool>,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub archive: Option<bool>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub date_time_from: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub date_time_to: Option<String>,

    /// Older name for `dateTimeFrom`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub from: Option<String>,

    /// Older name for `dateTimeTo`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub to: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub created: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub gtfs_alert_header_text: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub gtfs_alert_description_text: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub gtfs_alert_url: Option<String>,

    #[serde(default, deserialize_with = "lenient::integer")]
    pub gtfs_alert_cause_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient::integer")]
    pub gtfs_alert_effect_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub author: Option<String>,
}
