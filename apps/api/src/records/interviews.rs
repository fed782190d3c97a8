use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::Resource;
use crate::db::query::{Assignments, Conditions, Values};
use crate::patch::nullable;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "interview_stage", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewStage {
    #[default]
    Screen,
    Technical,
    Onsite,
    Final,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub user_id: String,
    pub application_id: Option<Uuid>,
    pub company: String,
    pub role: String,
    pub stage: InterviewStage,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InterviewFilter {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub application_id: Option<Uuid>,
    pub stage: Option<InterviewStage>,
    /// Only interviews scheduled from now on.
    #[serde(default)]
    pub upcoming: bool,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateInterview {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub application_id: Option<Uuid>,
    #[validate(length(min = 1, message = "company required"))]
    pub company: String,
    #[serde(alias = "title")]
    #[validate(length(min = 1, message = "role required"))]
    pub role: String,
    #[serde(default)]
    pub stage: InterviewStage,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateInterview {
    #[serde(default, deserialize_with = "nullable")]
    pub application_id: Option<Option<Uuid>>,
    #[validate(length(min = 1, message = "company cannot be empty"))]
    pub company: Option<String>,
    #[serde(alias = "title")]
    #[validate(length(min = 1, message = "role cannot be empty"))]
    pub role: Option<String>,
    pub stage: Option<InterviewStage>,
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

pub struct Interviews;

impl Resource for Interviews {
    const TABLE: &'static str = "interviews";
    const NAME: &'static str = "Interview";
    const ORDER_BY: &'static str = "scheduled_at ASC";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "application_id",
        "company",
        "role",
        "stage",
        "scheduled_at",
        "notes",
    ];

    type Row = InterviewRow;
    type Filter = InterviewFilter;
    type Create = CreateInterview;
    type Update = UpdateInterview;

    fn limit(filter: &InterviewFilter) -> Option<i64> {
        filter.limit
    }

    fn push_filters(filter: InterviewFilter, conditions: &mut Conditions<'_>) {
        conditions
            .eq("user_id", filter.user_id)
            .eq_some("application_id", filter.application_id)
            .eq_some("stage", filter.stage);
        if filter.upcoming {
            conditions.raw("scheduled_at >= NOW()");
        }
    }

    fn bind_values(input: CreateInterview, values: &mut Values<'_>) {
        values
            .bind(input.user_id)
            .bind(input.application_id)
            .bind(input.company)
            .bind(input.role)
            .bind(input.stage)
            .bind(input.scheduled_at)
            .bind(input.notes);
    }

    fn push_assignments(patch: UpdateInterview, set: &mut Assignments<'_>) {
        set.set_some("application_id", patch.application_id)
            .set_some("company", patch.company)
            .set_some("role", patch.role)
            .set_some("stage", patch.stage)
            .set_some("scheduled_at", patch.scheduled_at)
            .set_some("notes", patch.notes);
    }
}
