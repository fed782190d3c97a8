use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::activity;
use super::inputs::{CreateApplication, UpdateApplication};
use super::Applications;
use crate::errors::AppError;
use crate::extract::ValidatedJson;
use crate::models::application::{
    ActivityKind, ApplicationActivityRow, ApplicationRow, ApplicationStatus,
};
use crate::records::{get_query, insert_query, update_query, Resource};
use crate::state::AppState;

/// POST /api/v1/applications
pub async fn create_application(
    State(state): State<AppState>,
    ValidatedJson(mut input): ValidatedJson<CreateApplication>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    input.resolve_applied_at(Utc::now());
    let payload = activity::create_payload(&input)?;

    let mut tx = state.db.begin().await?;
    let row = insert_query::<Applications>(input)
        .build_query_as::<ApplicationRow>()
        .fetch_one(&mut *tx)
        .await?;
    activity::record(&mut tx, row.id, ActivityKind::Create, payload).await?;
    tx.commit().await?;

    info!("Created application {} ({} @ {})", row.id, row.role, row.company);
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/v1/applications/:id
pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(patch): ValidatedJson<UpdateApplication>,
) -> Result<Json<ApplicationRow>, AppError> {
    let requested_status = patch.status;

    let mut tx = state.db.begin().await?;

    // Row lock keeps concurrent status changes from logging a stale `from`.
    let previous: Option<ApplicationStatus> =
        sqlx::query_scalar("SELECT status FROM applications WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let previous = previous.ok_or_else(|| AppError::not_found(Applications::NAME, id))?;

    let mut qb = update_query::<Applications>(id, patch)
        .unwrap_or_else(|| get_query::<Applications>(id));
    let row = qb
        .build_query_as::<ApplicationRow>()
        .fetch_one(&mut *tx)
        .await?;

    if let Some(payload) = activity::status_change(previous, requested_status) {
        activity::record(&mut tx, id, ActivityKind::StatusChange, payload).await?;
        info!("Application {id} moved {previous:?} -> {:?}", row.status);
    }
    tx.commit().await?;

    info!("Updated application {id}");
    Ok(Json(row))
}

/// GET /api/v1/applications/:id/activity
pub async fn application_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationActivityRow>>, AppError> {
    let rows = activity::list_query(id)
        .build_query_as::<ApplicationActivityRow>()
        .fetch_all(&state.db)
        .await?;
    Ok(Json(rows))
}
