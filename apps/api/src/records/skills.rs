use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::Resource;
use crate::db::query::{Assignments, Conditions, Values};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "skill_level", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub level: SkillLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SkillFilter {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub level: Option<SkillLevel>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateSkill {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "name required"))]
    pub name: String,
    #[serde(default)]
    pub level: SkillLevel,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateSkill {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    pub level: Option<SkillLevel>,
}

pub struct Skills;

impl Resource for Skills {
    const TABLE: &'static str = "skills";
    const NAME: &'static str = "Skill";
    const ORDER_BY: &'static str = "created_at DESC";
    const COLUMNS: &'static [&'static str] = &["user_id", "name", "level"];

    type Row = SkillRow;
    type Filter = SkillFilter;
    type Create = CreateSkill;
    type Update = UpdateSkill;

    fn limit(filter: &SkillFilter) -> Option<i64> {
        filter.limit
    }

    fn push_filters(filter: SkillFilter, conditions: &mut Conditions<'_>) {
        conditions
            .eq("user_id", filter.user_id)
            .eq_some("level", filter.level);
    }

    fn bind_values(input: CreateSkill, values: &mut Values<'_>) {
        values
            .bind(input.user_id)
            .bind(input.name)
            .bind(input.level);
    }

    fn push_assignments(patch: UpdateSkill, set: &mut Assignments<'_>) {
        set.set_some("name", patch.name)
            .set_some("level", patch.level);
    }
}
