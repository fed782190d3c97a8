//! Dashboard overview: status and source breakdowns, a 30-day creation
//! trend, and the most recently created applications.

pub mod aggregation;
pub mod handlers;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::summary_overview))
}
