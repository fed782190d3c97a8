use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::errors::AppError;
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::models::account::{ProfileRow, UserSettings};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UserQuery {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
}

/// Full replacement of a profile; omitted fields are stored as NULL.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProfileInput {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    #[validate(url(message = "avatar_url must be an absolute URL"))]
    pub avatar_url: Option<String>,
}

/// Omitted fields keep their stored value, or the default on first write.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SettingsInput {
    #[validate(length(min = 1, message = "user_id required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "timezone cannot be empty"))]
    pub timezone: Option<String>,
    pub email_notifications: Option<bool>,
}

const UPSERT_PROFILE: &str = r#"
    INSERT INTO profiles (user_id, name, email, headline, location, avatar_url)
    VALUES ($1, $2, $3, $4, $5, $6)
    ON CONFLICT (user_id) DO UPDATE SET
        name = EXCLUDED.name,
        email = EXCLUDED.email,
        headline = EXCLUDED.headline,
        location = EXCLUDED.location,
        avatar_url = EXCLUDED.avatar_url,
        updated_at = NOW()
    RETURNING *
"#;

const UPSERT_SETTINGS: &str = r#"
    INSERT INTO user_settings (user_id, timezone, email_notifications)
    VALUES ($1, COALESCE($2, 'UTC'), COALESCE($3, TRUE))
    ON CONFLICT (user_id) DO UPDATE SET
        timezone = COALESCE($2, user_settings.timezone),
        email_notifications = COALESCE($3, user_settings.email_notifications),
        updated_at = NOW()
    RETURNING user_id, timezone, email_notifications, updated_at
"#;

/// GET /api/v1/profile
///
/// Responds with `null` when the user has never saved a profile.
pub async fn get_profile(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<UserQuery>,
) -> Result<Json<Option<ProfileRow>>, AppError> {
    let profile = sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(&params.user_id)
        .fetch_optional(&state.db)
        .await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile
pub async fn upsert_profile(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ProfileInput>,
) -> Result<Json<ProfileRow>, AppError> {
    let profile = sqlx::query_as::<_, ProfileRow>(UPSERT_PROFILE)
        .bind(input.user_id)
        .bind(input.name)
        .bind(input.email)
        .bind(input.headline)
        .bind(input.location)
        .bind(input.avatar_url)
        .fetch_one(&state.db)
        .await?;
    info!("Saved profile for {}", profile.user_id);
    Ok(Json(profile))
}

/// GET /api/v1/settings
pub async fn get_settings(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<UserQuery>,
) -> Result<Json<UserSettings>, AppError> {
    let stored = sqlx::query_as::<_, UserSettings>(
        "SELECT user_id, timezone, email_notifications, updated_at \
         FROM user_settings WHERE user_id = $1",
    )
    .bind(&params.user_id)
    .fetch_optional(&state.db)
    .await?;
    Ok(Json(
        stored.unwrap_or_else(|| UserSettings::defaults(&params.user_id)),
    ))
}

/// PUT /api/v1/settings
pub async fn upsert_settings(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SettingsInput>,
) -> Result<Json<UserSettings>, AppError> {
    let settings = sqlx::query_as::<_, UserSettings>(UPSERT_SETTINGS)
        .bind(input.user_id)
        .bind(input.timezone)
        .bind(input.email_notifications)
        .fetch_one(&state.db)
        .await?;
    info!("Saved settings for {}", settings.user_id);
    Ok(Json(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::DEFAULT_TIMEZONE;

    #[test]
    fn test_defaults_when_nothing_stored() {
        let settings = UserSettings::defaults("demo-user");
        assert_eq!(settings.timezone, DEFAULT_TIMEZONE);
        assert!(settings.email_notifications);
        assert!(settings.updated_at.is_none());
    }

    #[test]
    fn test_settings_reject_blank_timezone() {
        let input: SettingsInput =
            serde_json::from_str(r#"{"user_id": "u1", "timezone": ""}"#).unwrap();
        assert!(input.validate().is_err());

        let partial: SettingsInput =
            serde_json::from_str(r#"{"user_id": "u1", "email_notifications": false}"#).unwrap();
        assert!(partial.validate().is_ok());
        assert!(partial.timezone.is_none());
    }

    #[test]
    fn test_profile_validation() {
        let bad: ProfileInput = serde_json::from_str(
            r#"{"user_id": "u1", "email": "not-an-email", "avatar_url": "img.png"}"#,
        )
        .unwrap();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("avatar_url"));

        let ok: ProfileInput = serde_json::from_str(
            r#"{"user_id": "u1", "name": "Demo", "email": "demo@careeros.dev"}"#,
        )
        .unwrap();
        assert!(ok.validate().is_ok());
    }
}
