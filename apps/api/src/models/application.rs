use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle stage of a tracked application.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "application_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    /// Older clients send `INTERVIEW`.
    #[serde(alias = "INTERVIEW")]
    Interviewing,
    Offer,
    Rejected,
    Withdrawn,
    Hired,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
        ApplicationStatus::Hired,
    ];
}

/// Where the application originated.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "application_source", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationSource {
    JobBoard,
    Referral,
    CompanyWebsite,
    Recruiter,
    #[default]
    Other,
}

impl ApplicationSource {
    pub const ALL: [ApplicationSource; 5] = [
        ApplicationSource::JobBoard,
        ApplicationSource::Referral,
        ApplicationSource::CompanyWebsite,
        ApplicationSource::Recruiter,
        ApplicationSource::Other,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "application_activity_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Create,
    StatusChange,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: String,
    pub company: String,
    pub role: String,
    pub status: ApplicationStatus,
    pub source: ApplicationSource,
    pub location: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationActivityRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub kind: ActivityKind,
    pub payload: Option<Value>,
    pub created_at: DateTime<Utc>,
}
