use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::Resource;
use crate::db::query::{Assignments, Conditions, Values};
use crate::patch::nullable;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CalendarEventRow {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `from` is inclusive and `to` exclusive, both on `starts_at`.
#[derive(Debug, Deserialize, Validate)]
pub struct CalendarFilter {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_event_span"))]
pub struct CreateCalendarEvent {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "title required"))]
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

fn validate_event_span(event: &CreateCalendarEvent) -> Result<(), ValidationError> {
    match event.ends_at {
        Some(ends_at) if ends_at < event.starts_at => {
            let mut err = ValidationError::new("event_span");
            err.message = Some("ends_at must not be before starts_at".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateCalendarEvent {
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub ends_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
}

pub struct CalendarEvents;

impl Resource for CalendarEvents {
    const TABLE: &'static str = "calendar_events";
    const NAME: &'static str = "Calendar event";
    const ORDER_BY: &'static str = "starts_at ASC";
    const COLUMNS: &'static [&'static str] =
        &["user_id", "title", "starts_at", "ends_at", "location"];

    type Row = CalendarEventRow;
    type Filter = CalendarFilter;
    type Create = CreateCalendarEvent;
    type Update = UpdateCalendarEvent;

    fn limit(filter: &CalendarFilter) -> Option<i64> {
        filter.limit
    }

    fn push_filters(filter: CalendarFilter, conditions: &mut Conditions<'_>) {
        conditions
            .eq("user_id", filter.user_id)
            .cmp_some("starts_at", ">=", filter.from)
            .cmp_some("starts_at", "<", filter.to);
    }

    fn bind_values(input: CreateCalendarEvent, values: &mut Values<'_>) {
        values
            .bind(input.user_id)
            .bind(input.title)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.location);
    }

    fn push_assignments(patch: UpdateCalendarEvent, set: &mut Assignments<'_>) {
        set.set_some("title", patch.title)
            .set_some("starts_at", patch.starts_at)
            .set_some("ends_at", patch.ends_at)
            .set_some("location", patch.location);
    }
}
