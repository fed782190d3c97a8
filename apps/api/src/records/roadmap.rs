use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::goals::ProgressStatus;
use super::Resource;
use crate::db::query::{Assignments, Conditions, Values};
use crate::patch::nullable;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MilestoneRow {
    pub id: Uuid,
    pub user_id: String,
    pub milestone: String,
    pub status: ProgressStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MilestoneFilter {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub status: Option<ProgressStatus>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateMilestone {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "milestone required"))]
    pub milestone: String,
    #[serde(default)]
    pub status: ProgressStatus,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateMilestone {
    #[validate(length(min = 1, message = "milestone cannot be empty"))]
    pub milestone: Option<String>,
    pub status: Option<ProgressStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<NaiveDate>>,
}

pub struct Milestones;

impl Resource for Milestones {
    const TABLE: &'static str = "roadmap_milestones";
    const NAME: &'static str = "Milestone";
    const ORDER_BY: &'static str = "due_date ASC NULLS LAST, created_at DESC";
    const COLUMNS: &'static [&'static str] = &["user_id", "milestone", "status", "due_date"];

    type Row = MilestoneRow;
    type Filter = MilestoneFilter;
    type Create = CreateMilestone;
    type Update = UpdateMilestone;

    fn limit(filter: &MilestoneFilter) -> Option<i64> {
        filter.limit
    }

    fn push_filters(filter: MilestoneFilter, conditions: &mut Conditions<'_>) {
        conditions
            .eq("user_id", filter.user_id)
            .eq_some("status", filter.status);
    }

    fn bind_values(input: CreateMilestone, values: &mut Values<'_>) {
        values
            .bind(input.user_id)
            .bind(input.milestone)
            .bind(input.status)
            .bind(input.due_date);
    }

    fn push_assignments(patch: UpdateMilestone, set: &mut Assignments<'_>) {
        set.set_some("milestone", patch.milestone)
            .set_some("status", patch.status)
            .set_some("due_date", patch.due_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::assert_insert_binds_all_columns;
    use crate::records::update_query;

    #[test]
    fn test_insert_binds_all_columns() {
        let input: CreateMilestone = serde_json::from_str(
            r#"{"user_id": "u1", "milestone": "Finish portfolio", "status": "IN_PROGRESS"}"#,
        )
        .unwrap();
        assert_insert_binds_all_columns::<Milestones>(input);
    }

    #[test]
    fn test_status_update_targets_id() {
        let patch = UpdateMilestone {
            status: Some(ProgressStatus::Done),
            ..Default::default()
        };
        let qb = update_query::<Milestones>(Uuid::nil(), patch).unwrap();
        assert_eq!(
            qb.sql(),
            "UPDATE roadmap_milestones SET status = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING *"
        );
    }
}
