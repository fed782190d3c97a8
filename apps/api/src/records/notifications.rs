use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::Resource;
use crate::db::query::{Assignments, Conditions, PgQuery, Values};
use crate::errors::AppError;
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::state::AppState;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "notification_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    #[default]
    Info,
    Reminder,
    Alert,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NotificationFilter {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub kind: Option<NotificationKind>,
    #[serde(default)]
    pub unread: bool,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateNotification {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    #[serde(default)]
    pub kind: NotificationKind,
    #[validate(length(min = 1, message = "message required"))]
    pub message: String,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateNotification {
    pub kind: Option<NotificationKind>,
    #[validate(length(min = 1, message = "message cannot be empty"))]
    pub message: Option<String>,
    pub read: Option<bool>,
}

/// Identifies whose notifications a bulk operation touches.
#[derive(Debug, Deserialize, Validate)]
pub struct UserScope {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
}

pub struct Notifications;

impl Resource for Notifications {
    const TABLE: &'static str = "notifications";
    const NAME: &'static str = "Notification";
    const ORDER_BY: &'static str = "created_at DESC";
    const COLUMNS: &'static [&'static str] = &["user_id", "kind", "message", "read"];

    type Row = NotificationRow;
    type Filter = NotificationFilter;
    type Create = CreateNotification;
    type Update = UpdateNotification;

    fn limit(filter: &NotificationFilter) -> Option<i64> {
        filter.limit
    }

    fn push_filters(filter: NotificationFilter, conditions: &mut Conditions<'_>) {
        conditions
            .eq("user_id", filter.user_id)
            .eq_some("kind", filter.kind);
        if filter.unread {
            conditions.raw("NOT read");
        }
    }

    fn bind_values(input: CreateNotification, values: &mut Values<'_>) {
        values
            .bind(input.user_id)
            .bind(input.kind)
            .bind(input.message)
            .bind(input.read);
    }

    fn push_assignments(patch: UpdateNotification, set: &mut Assignments<'_>) {
        set.set_some("kind", patch.kind)
            .set_some("message", patch.message)
            .set_some("read", patch.read);
    }
}

fn mark_read_query(id: Uuid) -> PgQuery {
    let mut qb =
        PgQuery::new("UPDATE notifications SET read = TRUE, updated_at = NOW() WHERE id = ");
    qb.push_bind(id).push(" RETURNING *");
    qb
}

fn mark_all_read_query(user_id: String) -> PgQuery {
    let mut qb = PgQuery::new("UPDATE notifications SET read = TRUE, updated_at = NOW()");
    Conditions::new(&mut qb).eq("user_id", user_id).raw("NOT read");
    qb
}

fn unread_count_query(user_id: String) -> PgQuery {
    let mut qb = PgQuery::new("SELECT COUNT(*) FROM notifications");
    Conditions::new(&mut qb).eq("user_id", user_id).raw("NOT read");
    qb
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationRow>, AppError> {
    let row = mark_read_query(id)
        .build_query_as::<NotificationRow>()
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(Notifications::NAME, id))?;
    Ok(Json(row))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    ValidatedJson(scope): ValidatedJson<UserScope>,
) -> Result<Json<Value>, AppError> {
    let user_id = scope.user_id;
    let result = mark_all_read_query(user_id.clone())
        .build()
        .execute(&state.db)
        .await?;
    info!(
        "Marked {} notifications read for {user_id}",
        result.rows_affected()
    );
    Ok(Json(json!({ "updated": result.rows_affected() })))
}

pub async fn unread_count(
    State(state): State<AppState>,
    ValidatedQuery(scope): ValidatedQuery<UserScope>,
) -> Result<Json<Value>, AppError> {
    let (count,): (i64,) = unread_count_query(scope.user_id)
        .build_query_as()
        .fetch_one(&state.db)
        .await?;
    Ok(Json(json!({ "count": count })))
}

pub fn routes() -> Router<AppState> {
    super::routes::<Notifications>()
        .route("/:id/read", post(mark_read))
        .route("/read-all", post(mark_all_read))
        .route("/unread-count", get(unread_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::list_query;
    use crate::records::test_support::assert_insert_binds_all_columns;

    #[test]
    fn test_unread_filter_is_a_fixed_predicate() {
        let filter: NotificationFilter =
            serde_json::from_str(r#"{"user_id": "u1", "unread": true}"#).unwrap();
        assert_eq!(
            list_query::<Notifications>(filter).sql(),
            "SELECT * FROM notifications WHERE user_id = $1 AND NOT read ORDER BY created_at DESC"
        );
    }

    #[test]
    fn test_bulk_queries_scope_to_unread_rows_of_user() {
        assert_eq!(
            mark_all_read_query("u1".into()).sql(),
            "UPDATE notifications SET read = TRUE, updated_at = NOW() \
             WHERE user_id = $1 AND NOT read"
        );
        assert_eq!(
            unread_count_query("u1".into()).sql(),
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT read"
        );
        assert_eq!(
            mark_read_query(Uuid::nil()).sql(),
            "UPDATE notifications SET read = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *"
        );
    }

    #[test]
    fn test_new_notification_defaults_unread_info() {
        let input: CreateNotification =
            serde_json::from_str(r#"{"user_id": "u1", "message": "Follow up with Globex"}"#)
                .unwrap();
        assert_eq!(input.kind, NotificationKind::Info);
        assert!(!input.read);
        assert_insert_binds_all_columns::<Notifications>(input);
    }
}
