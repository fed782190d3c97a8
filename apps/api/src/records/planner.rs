use chrono::{DateTime, NaiveDate, Utc};
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
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlannerTaskRow {
    pub id: Uuid,
    pub user_id: String,
    pub task: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PlannerFilter {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub status: Option<TaskStatus>,
    /// Only tasks due on or before this date.
    pub due_before: Option<NaiveDate>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreatePlannerTask {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "task required"))]
    pub task: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdatePlannerTask {
    #[validate(length(min = 1, message = "task cannot be empty"))]
    pub task: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<NaiveDate>>,
}

pub struct PlannerTasks;

impl Resource for PlannerTasks {
    const TABLE: &'static str = "planner_tasks";
    const NAME: &'static str = "Planner task";
    const ORDER_BY: &'static str = "due_date ASC NULLS LAST, created_at DESC";
    const COLUMNS: &'static [&'static str] = &["user_id", "task", "status", "due_date"];

    type Row = PlannerTaskRow;
    type Filter = PlannerFilter;
    type Create = CreatePlannerTask;
    type Update = UpdatePlannerTask;

    fn limit(filter: &PlannerFilter) -> Option<i64> {
        filter.limit
    }

    fn push_filters(filter: PlannerFilter, conditions: &mut Conditions<'_>) {
        conditions
            .eq("user_id", filter.user_id)
            .eq_some("status", filter.status)
            .cmp_some("due_date", "<=", filter.due_before);
    }

    fn bind_values(input: CreatePlannerTask, values: &mut Values<'_>) {
        values
            .bind(input.user_id)
            .bind(input.task)
            .bind(input.status)
            .bind(input.due_date);
    }

    fn push_assignments(patch: UpdatePlannerTask, set: &mut Assignments<'_>) {
        set.set_some("task", patch.task)
            .set_some("status", patch.status)
            .set_some("due_date", patch.due_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::assert_insert_binds_all_columns;
    use crate::records::{list_query, update_query};

    #[test]
    fn test_list_with_due_before_and_limit() {
        let filter = PlannerFilter {
            user_id: "u1".into(),
            status: None,
            due_before: NaiveDate::from_ymd_opt(2025, 10, 1),
            limit: Some(20),
        };
        let qb = list_query::<PlannerTasks>(filter);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM planner_tasks WHERE user_id = $1 AND due_date <= $2 \
             ORDER BY due_date ASC NULLS LAST, created_at DESC LIMIT $3"
        );
    }

    #[test]
    fn test_insert_binds_all_columns() {
        let input: CreatePlannerTask = serde_json::from_str(
            r#"{"user_id": "u1", "task": "Prep system design", "due_date": "2025-10-01"}"#,
        )
        .unwrap();
        assert_insert_binds_all_columns::<PlannerTasks>(input);
    }

    #[test]
    fn test_empty_patch_builds_nothing() {
        assert!(update_query::<PlannerTasks>(Uuid::nil(), UpdatePlannerTask::default()).is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let parsed = serde_json::from_str::<UpdatePlannerTask>(r#"{"priority": 1}"#);
        assert!(parsed.is_err());
    }
}
