//! Per-user singletons: profile and settings. Both are keyed by `user_id`
//! and written with an upsert, so PUT works whether or not a row exists.

pub mod handlers;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::get_profile).put(handlers::upsert_profile),
    )
}

pub fn settings_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::get_settings).put(handlers::upsert_settings),
    )
}
