use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::Resource;
use crate::db::query::{Assignments, Conditions, Values};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MetricRow {
    pub id: Uuid,
    pub user_id: String,
    pub kpi: String,
    pub value: f64,
    pub period: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MetricFilter {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub kpi: Option<String>,
    pub period: Option<String>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateMetric {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "kpi required"))]
    pub kpi: String,
    pub value: f64,
    #[validate(length(min = 1, message = "period required"))]
    pub period: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateMetric {
    #[validate(length(min = 1, message = "kpi cannot be empty"))]
    pub kpi: Option<String>,
    pub value: Option<f64>,
    #[validate(length(min = 1, message = "period cannot be empty"))]
    pub period: Option<String>,
}

pub struct Metrics;

impl Resource for Metrics {
    const TABLE: &'static str = "metrics";
    const NAME: &'static str = "Metric";
    const ORDER_BY: &'static str = "created_at DESC";
    const COLUMNS: &'static [&'static str] = &["user_id", "kpi", "value", "period"];

    type Row = MetricRow;
    type Filter = MetricFilter;
    type Create = CreateMetric;
    type Update = UpdateMetric;

    fn limit(filter: &MetricFilter) -> Option<i64> {
        filter.limit
    }

    fn push_filters(filter: MetricFilter, conditions: &mut Conditions<'_>) {
        conditions
            .eq("user_id", filter.user_id)
            .eq_some("kpi", filter.kpi)
            .eq_some("period", filter.period);
    }

    fn bind_values(input: CreateMetric, values: &mut Values<'_>) {
        values
            .bind(input.user_id)
            .bind(input.kpi)
            .bind(input.value)
            .bind(input.period);
    }

    fn push_assignments(patch: UpdateMetric, set: &mut Assignments<'_>) {
        set.set_some("kpi", patch.kpi)
            .set_some("value", patch.value)
            .set_some("period", patch.period);
    }
}
