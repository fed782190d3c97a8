use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::Resource;
use crate::db::query::{Assignments, Conditions, Values};

/// One labelled block of a resume, e.g. section "Summary" with its text.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeSectionRow {
    pub id: Uuid,
    pub user_id: String,
    pub section: String,
    pub value: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResumeFilter {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub section: Option<String>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateResumeSection {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "section required"))]
    pub section: String,
    pub value: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub position: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateResumeSection {
    #[validate(length(min = 1, message = "section cannot be empty"))]
    pub section: Option<String>,
    pub value: Option<String>,
    #[validate(range(min = 0))]
    pub position: Option<i32>,
}

pub struct ResumeSections;

impl Resource for ResumeSections {
    const TABLE: &'static str = "resume_sections";
    const NAME: &'static str = "Resume section";
    const ORDER_BY: &'static str = "position ASC, created_at ASC";
    const COLUMNS: &'static [&'static str] = &["user_id", "section", "value", "position"];

    type Row = ResumeSectionRow;
    type Filter = ResumeFilter;
    type Create = CreateResumeSection;
    type Update = UpdateResumeSection;

    fn limit(filter: &ResumeFilter) -> Option<i64> {
        filter.limit
    }

    fn push_filters(filter: ResumeFilter, conditions: &mut Conditions<'_>) {
        conditions
            .eq("user_id", filter.user_id)
            .eq_some("section", filter.section);
    }

    fn bind_values(input: CreateResumeSection, values: &mut Values<'_>) {
        values
            .bind(input.user_id)
            .bind(input.section)
            .bind(input.value)
            .bind(input.position);
    }

    fn push_assignments(patch: UpdateResumeSection, set: &mut Assignments<'_>) {
        set.set_some("section", patch.section)
            .set_some("value", patch.value)
            .set_some("position", patch.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::list_query;
    use crate::records::test_support::assert_insert_binds_all_columns;

    #[test]
    fn test_sections_listed_in_position_order() {
        let filter = ResumeFilter {
            user_id: "u1".into(),
            section: None,
            limit: None,
        };
        assert!(list_query::<ResumeSections>(filter)
            .sql()
            .ends_with("ORDER BY position ASC, created_at ASC"));
    }

    #[test]
    fn test_negative_position_rejected() {
        let patch = UpdateResumeSection {
            position: Some(-1),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_insert_binds_all_columns() {
        let input: CreateResumeSection = serde_json::from_str(
            r#"{"user_id": "u1", "section": "Summary", "value": "Backend engineer"}"#,
        )
        .unwrap();
        assert_insert_binds_all_columns::<ResumeSections>(input);
    }
}
