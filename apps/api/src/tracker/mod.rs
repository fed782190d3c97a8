//! Job applications and their activity log.

pub mod activity;
pub mod handlers;
pub mod inputs;

use axum::{routing::get, Router};
use chrono::Utc;

use crate::db::query::{Assignments, Conditions, Values};
use crate::models::application::ApplicationRow;
use crate::records::{self, Resource};
use crate::state::AppState;
use inputs::{ApplicationFilter, CreateApplication, UpdateApplication};

pub struct Applications;

impl Resource for Applications {
    const TABLE: &'static str = "applications";
    const NAME: &'static str = "Application";
    const ORDER_BY: &'static str = "applied_at DESC, created_at DESC";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "company",
        "role",
        "status",
        "source",
        "location",
        "url",
        "notes",
        "applied_at",
    ];

    type Row = ApplicationRow;
    type Filter = ApplicationFilter;
    type Create = CreateApplication;
    type Update = UpdateApplication;

    fn limit(filter: &ApplicationFilter) -> Option<i64> {
        filter.limit
    }

    fn push_filters(filter: ApplicationFilter, conditions: &mut Conditions<'_>) {
        conditions
            .eq_some("user_id", filter.user_id)
            .eq_some("status", filter.status)
            .eq_some("source", filter.source);
    }

    fn bind_values(input: CreateApplication, values: &mut Values<'_>) {
        values
            .bind(input.user_id)
            .bind(input.company)
            .bind(input.role)
            .bind(input.status)
            .bind(input.source)
            .bind(input.location)
            .bind(input.url)
            .bind(input.notes)
            .bind(input.applied_at.unwrap_or_else(Utc::now));
    }

    fn push_assignments(patch: UpdateApplication, set: &mut Assignments<'_>) {
        set.set_some("company", patch.company)
            .set_some("role", patch.role)
            .set_some("status", patch.status)
            .set_some("source", patch.source)
            .set_some("location", patch.location)
            .set_some("url", patch.url)
            .set_some("notes", patch.notes)
            .set_some("applied_at", patch.applied_at);
    }
}

/// Mounted under `/api/v1/applications`. Create and update go through the
/// transactional handlers so each write lands together with its activity.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(records::list::<Applications>).post(handlers::create_application),
        )
        .route(
            "/:id",
            get(records::get_one::<Applications>)
                .patch(handlers::update_application)
                .delete(records::delete::<Applications>),
        )
        .route("/:id/activity", get(handlers::application_activity))
}
