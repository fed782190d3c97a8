//! Audit trail for applications: one CREATE entry per insert and one
//! STATUS_CHANGE entry per update that actually moves the status.

use anyhow::Context;
use serde_json::{json, Value};
use sqlx::PgConnection;
use uuid::Uuid;

use super::inputs::CreateApplication;
use crate::db::query::{Conditions, PgQuery};
use crate::models::application::{ActivityKind, ApplicationStatus};

pub fn create_payload(input: &CreateApplication) -> anyhow::Result<Value> {
    let data = serde_json::to_value(input).context("Failed to serialize application input")?;
    Ok(json!({ "data": data }))
}

/// `None` unless the patch sets a status different from the stored one.
pub fn status_change(from: ApplicationStatus, to: Option<ApplicationStatus>) -> Option<Value> {
    match to {
        Some(to) if to != from => Some(json!({ "from": from, "to": to })),
        _ => None,
    }
}

pub async fn record(
    conn: &mut PgConnection,
    application_id: Uuid,
    kind: ActivityKind,
    payload: Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO application_activity (application_id, kind, payload) VALUES ($1, $2, $3)",
    )
    .bind(application_id)
    .bind(kind)
    .bind(payload)
    .execute(conn)
    .await?;
    Ok(())
}

pub fn list_query(application_id: Uuid) -> PgQuery {
    let mut qb = PgQuery::new("SELECT * FROM application_activity");
    Conditions::new(&mut qb).eq("application_id", application_id);
    qb.push(" ORDER BY created_at DESC");
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationSource;

    #[test]
    fn test_create_payload_wraps_input() {
        let mut input: CreateApplication = serde_json::from_str(
            r#"{"user_id": "demo-user", "company": "Acme", "role": "SWE", "source": "JOB_BOARD"}"#,
        )
        .unwrap();
        assert_eq!(input.source, ApplicationSource::JobBoard);
        let applied_at = input.resolve_applied_at(chrono::Utc::now());

        let payload = create_payload(&input).unwrap();
        assert_eq!(payload["data"]["company"], "Acme");
        assert_eq!(payload["data"]["status"], "APPLIED");
        assert_eq!(payload["data"]["source"], "JOB_BOARD");
        assert_eq!(payload["data"]["applied_at"], serde_json::to_value(applied_at).unwrap());
        assert!(!payload["data"]["applied_at"].is_null());
    }

    #[test]
    fn test_status_change_only_on_real_transition() {
        use ApplicationStatus::*;

        assert_eq!(status_change(Applied, None), None);
        assert_eq!(status_change(Applied, Some(Applied)), None);
        assert_eq!(
            status_change(Applied, Some(Interviewing)),
            Some(json!({ "from": "APPLIED", "to": "INTERVIEWING" }))
        );
    }

    #[test]
    fn test_list_query_newest_first() {
        assert_eq!(
            list_query(Uuid::nil()).sql(),
            "SELECT * FROM application_activity WHERE application_id = $1 ORDER BY created_at DESC"
        );
    }
}
