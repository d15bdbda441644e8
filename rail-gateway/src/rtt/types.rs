//! Realtime Trains API response DTOs.
//!
//! These types map directly to the upstream JSON and are re-encoded as the
//! gateway's own responses. Every known field is a [`Nullable`]: the upstream
//! leaves some fields out (arrival times at an origin, line codes at most
//! calls) and sends others as `null`, and each form is written back as it
//! arrived. Fields the gateway does not know about land in `extra` and are
//! written back out unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::nullable::Nullable;

/// Response from `search/{station}` and `search/{station}/to/{toStation}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSearch {
    /// The station the search was made at.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub location: Nullable<StationLocation>,

    /// The station searched towards, present on route searches.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub filter: Nullable<Value>,

    /// Matching services. The upstream sends `null` when nothing matches.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub services: Nullable<Vec<ServiceSummary>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StationSearch {
    /// Matching services, treating `null` as empty.
    pub fn services(&self) -> &[ServiceSummary] {
        self.services.as_deref().unwrap_or_default()
    }
}

/// Station metadata at the head of a search response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationLocation {
    /// Human-readable station name.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,

    /// CRS code.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub crs: Nullable<String>,

    /// TIPLOC code.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub tiploc: Nullable<String>,

    /// Country code, e.g. "gb".
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub country: Nullable<String>,

    /// Data system, e.g. "nr".
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub system: Nullable<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One service matched by a station or route search.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    /// The service's call at the searched station.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub location_detail: Nullable<CallingPoint>,

    /// Unique identifier of this service run.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub service_uid: Nullable<String>,

    /// Date of the run (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub run_date: Nullable<String>,

    /// Headcode, e.g. "1S12".
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub train_identity: Nullable<String>,

    /// Headcode currently in use, if different from the planned one.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub running_identity: Nullable<String>,

    /// Operator ATOC code.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub atoc_code: Nullable<String>,

    /// Operator name.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub atoc_name: Nullable<String>,

    /// "train", "bus" or "ship".
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub service_type: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub is_passenger: Nullable<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full itinerary of one service, from `service/{uid}/{yyyy}/{mm}/{dd}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetail {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub service_uid: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub run_date: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub service_type: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub is_passenger: Nullable<bool>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub train_identity: Nullable<String>,

    /// Traction type, e.g. "EMU", "HST".
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub power_type: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub train_class: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub atoc_code: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub atoc_name: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub performance_monitored: Nullable<bool>,

    /// Where the service starts.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub origin: Nullable<Vec<Endpoint>>,

    /// Where the service terminates.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub destination: Nullable<Vec<Endpoint>>,

    /// Calling and passing points, in running order.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub locations: Nullable<Vec<CallingPoint>>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub realtime_activated: Nullable<bool>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub running_identity: Nullable<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceDetail {
    /// Calling points, treating an absent list as empty.
    pub fn locations(&self) -> &[CallingPoint] {
        self.locations.as_deref().unwrap_or_default()
    }
}

/// Origin or destination of a service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub tiploc: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub description: Nullable<String>,

    /// Working timetable time (HHMMSS).
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub working_time: Nullable<String>,

    /// Public timetable time (HHMM).
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub public_time: Nullable<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A service's call (or pass) at one location.
///
/// Used both for the `locationDetail` of a search result and for each entry
/// of a detail response's `locations`. Times are upstream "HHMM" strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallingPoint {
    /// Whether live tracking data exists for this call.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub realtime_activated: Nullable<bool>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub tiploc: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub crs: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub description: Nullable<String>,

    /// Public timetable arrival.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub gbtt_booked_arrival: Nullable<String>,

    /// Public timetable departure.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub gbtt_booked_departure: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub origin: Nullable<Vec<Endpoint>>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub destination: Nullable<Vec<Endpoint>>,

    /// Whether the service stops here at all.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub is_call: Nullable<bool>,

    /// Whether the stop is advertised to passengers.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub is_public_call: Nullable<bool>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub realtime_arrival: Nullable<String>,

    /// True once the arrival time is an actual rather than a forecast.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub realtime_arrival_actual: Nullable<bool>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub realtime_departure: Nullable<String>,

    /// True once the departure time is an actual rather than a forecast.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub realtime_departure_actual: Nullable<bool>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub platform: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub platform_confirmed: Nullable<bool>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub platform_changed: Nullable<bool>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub line: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub line_confirmed: Nullable<bool>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub path: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub path_confirmed: Nullable<bool>,

    /// "CALL", "ORIGIN", "DESTINATION", "CANCELLED_CALL", ...
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub display_as: Nullable<String>,

    /// Where the train currently is relative to this location, e.g. "AT_PLAT".
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub service_location: Nullable<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
