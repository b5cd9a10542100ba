//! HTTP surface — one endpoint per user action.

mod error;
pub mod routes;

pub use routes::{AppState, history_routes};
