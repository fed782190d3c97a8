use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::application::{ApplicationSource, ApplicationStatus};
use crate::patch::{check_url, nullable};

/// Query string for `GET /api/v1/applications`. Every filter is optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ApplicationFilter {
    #[validate(length(min = 1, message = "user_id cannot be empty"))]
    pub user_id: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub source: Option<ApplicationSource>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

/// Body of `POST /api/v1/applications`. Serialized as-is into the CREATE
/// activity payload, after defaults and the `title` alias are applied.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateApplication {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "company required"))]
    pub company: String,
    #[serde(alias = "title")]
    #[validate(length(min = 1, message = "role required"))]
    pub role: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub source: ApplicationSource,
    pub location: Option<String>,
    #[validate(url(message = "url must be an absolute URL"))]
    pub url: Option<String>,
    pub notes: Option<String>,
    pub applied_at: Option<DateTime<Utc>>,
}

impl CreateApplication {
    /// Fills in `applied_at` when the caller left it out, so the stored row and
    /// the CREATE activity carry the same timestamp.
    pub fn resolve_applied_at(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        *self.applied_at.get_or_insert(now)
    }
}

/// Body of `PATCH /api/v1/applications/:id`. Absent fields are left alone;
/// `location`, `url` and `notes` may be cleared with an explicit `null`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_application_patch"))]
pub struct UpdateApplication {
    #[validate(length(min = 1, message = "company cannot be empty"))]
    pub company: Option<String>,
    #[serde(alias = "title")]
    #[validate(length(min = 1, message = "role cannot be empty"))]
    pub role: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub source: Option<ApplicationSource>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    pub applied_at: Option<DateTime<Utc>>,
}

fn validate_application_patch(patch: &UpdateApplication) -> Result<(), ValidationError> {
    check_url("url", &patch.url)
}
