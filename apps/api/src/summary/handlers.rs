use axum::{extract::State, Json};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::aggregation::{
    daily_trend, source_counts, status_counts, DailyCount, SourceCount, StatusCount, TrendWindow,
};
use crate::errors::AppError;
use crate::extract::ValidatedQuery;
use crate::models::application::{ApplicationSource, ApplicationStatus};
use crate::state::AppState;

const DEFAULT_LATEST: i64 = 5;

#[derive(Debug, Deserialize, Validate)]
pub struct SummaryQuery {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    /// Caller's offset from UTC, used to place day boundaries in the trend.
    #[validate(custom(function = "validate_utc_offset"))]
    pub utc_offset_minutes: Option<i32>,
    #[validate(range(min = 1, max = 50))]
    pub latest_limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LatestApplication {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SummaryOverview {
    pub total: i64,
    pub status_counts: Vec<StatusCount>,
    pub source_counts: Vec<SourceCount>,
    pub recent_trend: Vec<DailyCount>,
    pub recent_count: i64,
    pub latest: Vec<LatestApplication>,
}

/// Real-world offsets span UTC-12:00 to UTC+14:00.
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

fn validate_utc_offset(minutes: i32) -> Result<(), ValidationError> {
    if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
        let mut err = ValidationError::new("utc_offset_minutes");
        err.message = Some("utc_offset_minutes must be within +/-840".into());
        return Err(err);
    }
    Ok(())
}

fn offset_from_minutes(minutes: Option<i32>) -> Result<FixedOffset, AppError> {
    let minutes = minutes.unwrap_or(0);
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            AppError::Validation(format!("utc_offset_minutes out of range: {minutes}"))
        })
}

async fn grouped_by_status(
    db: &PgPool,
    user_id: &str,
) -> Result<Vec<(ApplicationStatus, i64)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT status, COUNT(*) FROM applications WHERE user_id = $1 GROUP BY status",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

async fn grouped_by_source(
    db: &PgPool,
    user_id: &str,
) -> Result<Vec<(ApplicationSource, i64)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT source, COUNT(*) FROM applications WHERE user_id = $1 GROUP BY source",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

async fn created_within(
    db: &PgPool,
    user_id: &str,
    window: &TrendWindow,
) -> Result<Vec<DateTime<Utc>>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT created_at FROM applications \
         WHERE user_id = $1 AND created_at >= $2 AND created_at < $3",
    )
    .bind(user_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(db)
    .await
}

async fn latest_created(
    db: &PgPool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<LatestApplication>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, company, role, status, created_at, updated_at FROM applications \
         WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
}

/// GET /api/v1/summary
pub async fn summary_overview(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<SummaryQuery>,
) -> Result<Json<SummaryOverview>, AppError> {
    let offset = offset_from_minutes(params.utc_offset_minutes)?;
    let window = TrendWindow::ending_today(Utc::now(), offset);
    let user_id = params.user_id.as_str();

    let (by_status, by_source, created, latest) = tokio::try_join!(
        grouped_by_status(&state.db, user_id),
        grouped_by_source(&state.db, user_id),
        created_within(&state.db, user_id, &window),
        latest_created(&state.db, user_id, params.latest_limit.unwrap_or(DEFAULT_LATEST)),
    )?;

    let status_counts = status_counts(&by_status);
    let recent_trend = daily_trend(&created, &window, offset);

    Ok(Json(SummaryOverview {
        total: status_counts.iter().map(|c| c.count).sum(),
        status_counts,
        source_counts: source_counts(&by_source),
        recent_count: recent_trend.iter().map(|b| b.count).sum(),
        recent_trend,
        latest,
    }))
}
