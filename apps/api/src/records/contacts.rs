use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

use super::Resource;
use crate::db::query::{Assignments, Conditions, Values};
use crate::patch::nullable;

/// Where a networking contact stands in the outreach cycle.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "contact_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactStatus {
    #[default]
    New,
    Contacted,
    FollowUp,
    Connected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub status: ContactStatus,
    pub last_contacted: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContactFilter {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub status: Option<ContactStatus>,
    pub company: Option<String>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateContact {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "name required"))]
    pub name: String,
    pub company: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[serde(default)]
    pub status: ContactStatus,
    pub last_contacted: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_contact_patch"))]
pub struct UpdateContact {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    pub status: Option<ContactStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_contacted: Option<Option<DateTime<Utc>>>,
}

fn validate_contact_patch(patch: &UpdateContact) -> Result<(), ValidationError> {
    match &patch.email {
        Some(Some(email)) if !email.validate_email() => {
            let mut err = ValidationError::new("email");
            err.message = Some("email must be a valid address".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

pub struct Contacts;

impl Resource for Contacts {
    const TABLE: &'static str = "contacts";
    const NAME: &'static str = "Contact";
    const ORDER_BY: &'static str = "created_at DESC";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "name",
        "company",
        "email",
        "status",
        "last_contacted",
    ];

    type Row = ContactRow;
    type Filter = ContactFilter;
    type Create = CreateContact;
    type Update = UpdateContact;

    fn limit(filter: &ContactFilter) -> Option<i64> {
        filter.limit
    }

    fn push_filters(filter: ContactFilter, conditions: &mut Conditions<'_>) {
        conditions
            .eq("user_id", filter.user_id)
            .eq_some("status", filter.status)
            .eq_some("company", filter.company);
    }

    fn bind_values(input: CreateContact, values: &mut Values<'_>) {
        values
            .bind(input.user_id)
            .bind(input.name)
            .bind(input.company)
            .bind(input.email)
            .bind(input.status)
            .bind(input.last_contacted);
    }

    fn push_assignments(patch: UpdateContact, set: &mut Assignments<'_>) {
        set.set_some("name", patch.name)
            .set_some("company", patch.company)
            .set_some("email", patch.email)
            .set_some("status", patch.status)
            .set_some("last_contacted", patch.last_contacted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::assert_insert_binds_all_columns;

    #[test]
    fn test_invalid_email_rejected_on_create_and_patch() {
        let create: CreateContact = serde_json::from_str(
            r#"{"user_id": "u1", "name": "Dana", "email": "dana-at-globex"}"#,
        )
        .unwrap();
        assert!(create.validate().is_err());

        let patch: UpdateContact = serde_json::from_str(r#"{"email": "nope"}"#).unwrap();
        assert!(patch.validate().is_err());

        let cleared: UpdateContact = serde_json::from_str(r#"{"email": null}"#).unwrap();
        assert!(cleared.validate().is_ok());
    }

    #[test]
    fn test_follow_up_wire_name() {
        assert_eq!(
            serde_json::to_string(&ContactStatus::FollowUp).unwrap(),
            "\"FOLLOW_UP\""
        );
    }

    #[test]
    fn test_insert_binds_all_columns() {
        let input: CreateContact = serde_json::from_str(
            r#"{"user_id": "u1", "name": "Dana", "company": "Globex", "email": "dana@globex.com"}"#,
        )
        .unwrap();
        assert!(input.validate().is_ok());
        assert_insert_binds_all_columns::<Contacts>(input);
    }
}
