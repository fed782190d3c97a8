use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::Resource;
use crate::db::query::{Assignments, Conditions, Values};
use crate::patch::nullable;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AchievementRow {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub category: Option<String>,
    pub awarded_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AchievementFilter {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub category: Option<String>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateAchievement {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "title required"))]
    pub title: String,
    pub category: Option<String>,
    pub awarded_at: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAchievement {
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub awarded_at: Option<Option<NaiveDate>>,
}

pub struct Achievements;

impl Resource for Achievements {
    const TABLE: &'static str = "achievements";
    const NAME: &'static str = "Achievement";
    const ORDER_BY: &'static str = "created_at DESC";
    const COLUMNS: &'static [&'static str] = &["user_id", "title", "category", "awarded_at"];

    type Row = AchievementRow;
    type Filter = AchievementFilter;
    type Create = CreateAchievement;
    type Update = UpdateAchievement;

    fn limit(filter: &AchievementFilter) -> Option<i64> {
        filter.limit
    }

    fn push_filters(filter: AchievementFilter, conditions: &mut Conditions<'_>) {
        conditions
            .eq("user_id", filter.user_id)
            .eq_some("category", filter.category);
    }

    fn bind_values(input: CreateAchievement, values: &mut Values<'_>) {
        values
            .bind(input.user_id)
            .bind(input.title)
            .bind(input.category)
            .bind(input.awarded_at);
    }

    fn push_assignments(patch: UpdateAchievement, set: &mut Assignments<'_>) {
        set.set_some("title", patch.title)
            .set_some("category", patch.category)
            .set_some("awarded_at", patch.awarded_at);
    }
}
