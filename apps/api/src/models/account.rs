use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-user settings. `updated_at` is `None` when nothing has been stored yet
/// and the defaults are being reported.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSettings {
    pub user_id: String,
    pub timezone: String,
    pub email_notifications: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserSettings {
    pub fn defaults(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            email_notifications: true,
            updated_at: None,
        }
    }
}
