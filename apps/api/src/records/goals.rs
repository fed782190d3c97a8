use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::Resource;
use crate::db::query::{Assignments, Conditions, Values};
use crate::patch::nullable;

/// Progress of a goal or roadmap milestone.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "progress_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    #[default]
    Planned,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GoalRow {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub status: ProgressStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GoalFilter {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub status: Option<ProgressStatus>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateGoal {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "title required"))]
    pub title: String,
    #[serde(default)]
    pub status: ProgressStatus,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateGoal {
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,
    pub status: Option<ProgressStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<NaiveDate>>,
}

pub struct Goals;

impl Resource for Goals {
    const TABLE: &'static str = "goals";
    const NAME: &'static str = "Goal";
    const ORDER_BY: &'static str = "due_date ASC NULLS LAST, created_at DESC";
    const COLUMNS: &'static [&'static str] = &["user_id", "title", "status", "due_date"];

    type Row = GoalRow;
    type Filter = GoalFilter;
    type Create = CreateGoal;
    type Update = UpdateGoal;

    fn limit(filter: &GoalFilter) -> Option<i64> {
        filter.limit
    }

    fn push_filters(filter: GoalFilter, conditions: &mut Conditions<'_>) {
        conditions
            .eq("user_id", filter.user_id)
            .eq_some("status", filter.status);
    }

    fn bind_values(input: CreateGoal, values: &mut Values<'_>) {
        values
            .bind(input.user_id)
            .bind(input.title)
            .bind(input.status)
            .bind(input.due_date);
    }

    fn push_assignments(patch: UpdateGoal, set: &mut Assignments<'_>) {
        set.set_some("title", patch.title)
            .set_some("status", patch.status)
            .set_some("due_date", patch.due_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::assert_insert_binds_all_columns;
    use crate::records::{list_query, update_query};

    fn filter(status: Option<ProgressStatus>) -> GoalFilter {
        GoalFilter {
            user_id: "u1".into(),
            status,
            limit: None,
        }
    }

    #[test]
    fn test_list_filters_by_user_and_status() {
        let qb = list_query::<Goals>(filter(Some(ProgressStatus::Done)));
        assert_eq!(
            qb.sql(),
            "SELECT * FROM goals WHERE user_id = $1 AND status = $2 \
             ORDER BY due_date ASC NULLS LAST, created_at DESC"
        );
    }

    #[test]
    fn test_insert_binds_all_columns() {
        let input: CreateGoal =
            serde_json::from_str(r#"{"user_id": "u1", "title": "Land a staff role"}"#).unwrap();
        assert_eq!(input.status, ProgressStatus::Planned);
        assert_insert_binds_all_columns::<Goals>(input);
    }

    #[test]
    fn test_clearing_due_date() {
        let patch: UpdateGoal = serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        let qb = update_query::<Goals>(Uuid::nil(), patch).expect("patch has a field");
        assert_eq!(
            qb.sql(),
            "UPDATE goals SET due_date = $1, updated_at = NOW() WHERE id = $2 RETURNING *"
        );
    }

    #[test]
    fn test_empty_title_rejected() {
        let input = CreateGoal {
            user_id: "u1".into(),
            title: String::new(),
            status: ProgressStatus::Planned,
            due_date: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_in_progress_wire_name() {
        let status: ProgressStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(status, ProgressStatus::InProgress);
    }
}
