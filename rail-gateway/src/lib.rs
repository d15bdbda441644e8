//! UK rail service lookup gateway.
//!
//! Exposes flat REST endpoints over the Realtime Trains API: station
//! searches are passed through, and route searches are expanded into the
//! full itinerary of every matching service.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod rtt;
pub mod web;
