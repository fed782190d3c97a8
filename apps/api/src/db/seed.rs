//! Demo data for local development, enabled with `SEED_DEMO_DATA=true`.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use crate::models::application::{
    ActivityKind, ApplicationRow, ApplicationSource, ApplicationStatus,
};
use crate::records::insert_query;
use crate::tracker::{activity, inputs::CreateApplication, Applications};

pub const DEMO_USER: &str = "demo-user";

pub fn demo_applications() -> Vec<CreateApplication> {
    [
        ("Acme", "SWE", ApplicationStatus::Applied, ApplicationSource::JobBoard, "Applied via board"),
        ("Globex", "FE Dev", ApplicationStatus::Interviewing, ApplicationSource::Referral, "Phone screen done"),
        ("Initech", "BE Dev", ApplicationStatus::Offer, ApplicationSource::Recruiter, "Offer pending"),
    ]
    .into_iter()
    .map(|(company, role, status, source, notes)| CreateApplication {
        user_id: DEMO_USER.to_string(),
        company: company.to_string(),
        role: role.to_string(),
        status,
        source,
        location: None,
        url: None,
        notes: Some(notes.to_string()),
        applied_at: None,
    })
    .collect()
}

/// Inserts the demo applications, each with its CREATE activity, unless the
/// demo user already has data. Returns how many applications were written.
pub async fn seed_demo_data(pool: &PgPool) -> Result<usize> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE user_id = $1")
        .bind(DEMO_USER)
        .fetch_one(pool)
        .await
        .context("Failed to check for existing demo data")?;

    if existing > 0 {
        info!("Demo data already present ({existing} applications), skipping seed");
        return Ok(0);
    }

    let demo = demo_applications();
    let count = demo.len();

    let mut tx = pool.begin().await?;
    let now = Utc::now();
    for mut input in demo {
        input.resolve_applied_at(now);
        let payload = activity::create_payload(&input)?;
        let row = insert_query::<Applications>(input)
            .build_query_as::<ApplicationRow>()
            .fetch_one(&mut *tx)
            .await
            .context("Failed to insert demo application")?;
        activity::record(&mut tx, row.id, ActivityKind::Create, payload).await?;
    }
    tx.commit().await.context("Failed to commit demo data")?;

    info!("Seeded {count} demo applications for {DEMO_USER}");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_demo_applications_are_valid_and_cover_the_pipeline() {
        let demo = demo_applications();
        assert_eq!(demo.len(), 3);
        assert!(demo.iter().all(|a| a.user_id == DEMO_USER && a.validate().is_ok()));

        let rows: Vec<_> = demo
            .iter()
            .map(|a| (a.company.as_str(), a.role.as_str(), a.source, a.notes.as_deref()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Acme", "SWE", ApplicationSource::JobBoard, Some("Applied via board")),
                ("Globex", "FE Dev", ApplicationSource::Referral, Some("Phone screen done")),
                ("Initech", "BE Dev", ApplicationSource::Recruiter, Some("Offer pending")),
            ]
        );

        let statuses: Vec<_> = demo.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            vec![
                ApplicationStatus::Applied,
                ApplicationStatus::Interviewing,
                ApplicationStatus::Offer
            ]
        );
    }
}
