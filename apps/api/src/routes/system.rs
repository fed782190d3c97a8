use axum::Json;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Pong {
    pub ok: bool,
    /// Server time in Unix milliseconds.
    pub ts: i64,
}

/// GET /api/v1/system/ping
pub async fn ping() -> Json<Pong> {
    Json(Pong {
        ok: true,
        ts: Utc::now().timestamp_millis(),
    })
}
