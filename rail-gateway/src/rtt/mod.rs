//! Realtime Trains API client.
//!
//! The upstream exposes three JSON endpoints under `{base}/json/`:
//! - `search/{station}`: services calling at a station
//! - `search/{station}/to/{toStation}`: services calling at both, in order
//! - `service/{uid}/{yyyy}/{mm}/{dd}`: the full itinerary of one run
//!
//! The search endpoints only carry timing for the searched station, so a
//! stop-by-stop itinerary needs one detail request per service.

mod auth;
mod client;
mod error;
mod nullable;
mod types;

pub use auth::{Credentials, CredentialsError, basic_auth_token};
pub use client::{DEFAULT_BASE_URL, RttClient, RttConfig};
pub use error::{SetupError, UpstreamError};
pub use nullable::Nullable;
pub use types::{
    CallingPoint, Endpoint, ServiceDetail, ServiceSummary, StationLocation, StationSearch,
};
