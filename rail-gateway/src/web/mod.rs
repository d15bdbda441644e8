//! Web layer for the rail gateway.
//!
//! Two read-only endpoints over the upstream search API:
//! - `GET /services/{station}`
//! - `GET /services/{station}/to/{toStation}`

mod cors;
mod dto;
mod error;
mod routes;
mod state;

pub use dto::ErrorResponse;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
