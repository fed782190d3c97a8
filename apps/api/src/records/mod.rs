//! Generic CRUD over per-user record tables.
//!
//! Each domain (goals, planner tasks, contacts, ...) implements [`Resource`]
//! once: its table, its column list, its list filters and how its inputs bind.
//! The query builders and Axum handlers in this module are shared by all of
//! them, and [`routes`] mounts the standard five endpoints for a resource.

pub mod achievements;
pub mod calendar;
pub mod contacts;
pub mod goals;
pub mod interviews;
pub mod metrics;
pub mod notifications;
pub mod planner;
pub mod resume;
pub mod roadmap;
pub mod skills;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::db::query::{Assignments, Conditions, PgQuery, Values};
use crate::errors::AppError;
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::state::AppState;

pub trait Resource: Send + Sync + 'static {
    /// Table backing the resource.
    const TABLE: &'static str;
    /// Singular display name used in not-found messages.
    const NAME: &'static str;
    /// ORDER BY clause for list queries.
    const ORDER_BY: &'static str;
    /// Insert columns, in the order `bind_values` binds them.
    const COLUMNS: &'static [&'static str];

    type Row: for<'r> FromRow<'r, PgRow> + Serialize + Send + Unpin + 'static;
    type Filter: DeserializeOwned + Validate + Send + 'static;
    type Create: DeserializeOwned + Validate + Send + 'static;
    type Update: DeserializeOwned + Validate + Send + 'static;

    fn limit(filter: &Self::Filter) -> Option<i64>;
    fn push_filters(filter: Self::Filter, conditions: &mut Conditions<'_>);
    fn bind_values(input: Self::Create, values: &mut Values<'_>);
    fn push_assignments(patch: Self::Update, set: &mut Assignments<'_>);
}

// ────────────────────────────────────────────────────────────────────────────
// Query builders
// ────────────────────────────────────────────────────────────────────────────

pub fn list_query<R: Resource>(filter: R::Filter) -> PgQuery {
    let limit = R::limit(&filter);
    let mut qb = PgQuery::new(format!("SELECT * FROM {}", R::TABLE));
    R::push_filters(filter, &mut Conditions::new(&mut qb));
    qb.push(" ORDER BY ").push(R::ORDER_BY);
    if let Some(limit) = limit {
        qb.push(" LIMIT ").push_bind(limit);
    }
    qb
}

pub fn get_query<R: Resource>(id: Uuid) -> PgQuery {
    let mut qb = PgQuery::new(format!("SELECT * FROM {} WHERE id = ", R::TABLE));
    qb.push_bind(id);
    qb
}

pub fn insert_query<R: Resource>(input: R::Create) -> PgQuery {
    let mut qb = PgQuery::new(format!(
        "INSERT INTO {} ({}) VALUES (",
        R::TABLE,
        R::COLUMNS.join(", ")
    ));
    R::bind_values(input, &mut Values::new(&mut qb));
    qb.push(") RETURNING *");
    qb
}

/// `None` when the patch carries no fields; callers return the current row.
pub fn update_query<R: Resource>(id: Uuid, patch: R::Update) -> Option<PgQuery> {
    let mut qb = PgQuery::new(format!("UPDATE {} SET ", R::TABLE));
    let mut set = Assignments::new(&mut qb);
    R::push_assignments(patch, &mut set);
    if set.is_empty() {
        return None;
    }
    set.touch();
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
    Some(qb)
}

pub fn delete_query<R: Resource>(id: Uuid) -> PgQuery {
    let mut qb = PgQuery::new(format!("DELETE FROM {} WHERE id = ", R::TABLE));
    qb.push_bind(id).push(" RETURNING *");
    qb
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

pub async fn list<R: Resource>(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<R::Filter>,
) -> Result<Json<Vec<R::Row>>, AppError> {
    let rows = list_query::<R>(filter)
        .build_query_as::<R::Row>()
        .fetch_all(&state.db)
        .await?;
    Ok(Json(rows))
}

pub async fn get_one<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<R::Row>, AppError> {
    let row = get_query::<R>(id)
        .build_query_as::<R::Row>()
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(R::NAME, id))?;
    Ok(Json(row))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<R::Create>,
) -> Result<(StatusCode, Json<R::Row>), AppError> {
    let row = insert_query::<R>(input)
        .build_query_as::<R::Row>()
        .fetch_one(&state.db)
        .await?;
    info!("Created {} in {}", R::NAME, R::TABLE);
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(patch): ValidatedJson<R::Update>,
) -> Result<Json<R::Row>, AppError> {
    let mut qb = update_query::<R>(id, patch).unwrap_or_else(|| get_query::<R>(id));
    let row = qb
        .build_query_as::<R::Row>()
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(R::NAME, id))?;
    info!("Updated {} {id}", R::NAME);
    Ok(Json(row))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<R::Row>, AppError> {
    let row = delete_query::<R>(id)
        .build_query_as::<R::Row>()
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(R::NAME, id))?;
    info!("Deleted {} {id}", R::NAME);
    Ok(Json(row))
}

/// Standard list/create/get/update/delete routes, to be nested under a prefix.
pub fn routes<R: Resource>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route(
            "/:id",
            get(get_one::<R>).patch(update::<R>).delete(delete::<R>),
        )
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Number of distinct `$n` placeholders in a built statement.
    pub fn placeholder_count(sql: &str) -> usize {
        (1..)
            .take_while(|n| sql.contains(&format!("${n}")))
            .count()
    }

    /// Every insert must bind exactly one value per declared column.
    pub fn assert_insert_binds_all_columns<R: Resource>(input: R::Create) {
        let qb = insert_query::<R>(input);
        let sql = qb.sql();
        assert!(sql.starts_with(&format!("INSERT INTO {} (", R::TABLE)), "{sql}");
        assert_eq!(placeholder_count(sql), R::COLUMNS.len(), "{sql}");
        assert!(sql.ends_with(") RETURNING *"), "{sql}");
    }
}
