//! Validated identifiers used to address the upstream API.
//!
//! Values taken from request paths are parsed into these types before any
//! upstream URL is built, so code that receives them can splice them into a
//! path without further checks.

mod service_uid;
mod station;

pub use service_uid::{InvalidServiceUid, ServiceUid};
pub use station::{InvalidStationCode, StationCode};
