//! End-to-end pipeline tests against a real SQLite-backed profile store.
//!
//! Each test seeds the demo dataset into a fresh temporary database, then
//! drives questions through a full session: interpretation, planning,
//! aggregation, and view building.

use argonaut_engine::config::InterpreterConfig;
use argonaut_engine::db::{seed_demo, Database};
use argonaut_engine::interpreter::Interpreter;
use argonaut_engine::session::{Role, Session, SubmitOutcome};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sdk::errors::ExplorerError;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 6, 15, 12, 0, 0).unwrap()
}

async fn seeded_session() -> (TempDir, Session) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("argo.db")).await.unwrap();
    seed_demo(&db).await.unwrap();

    let interpreter = Interpreter::new(&InterpreterConfig::default()).unwrap();
    let session = Session::new(interpreter, Arc::new(db.store()), Duration::from_secs(5));
    (temp_dir, session)
}

#[tokio::test]
async fn test_march_salinity_question_end_to_end() {
    let (_tmp, session) = seeded_session().await;

    let outcome = session
        .submit("Show me salinity profiles near the equator in March 2023", now())
        .await
        .unwrap();
    let view = match outcome {
        SubmitOutcome::Answered(view) => view,
        other => panic!("expected an answer, got {other:?}"),
    };

    assert_eq!(view.kpis.profile_count, 52);
    assert_eq!(view.kpis.float_count, 17);
    assert_eq!(view.kpis.unit, "PSU");
    assert!(view.kpis.max_depth_m.unwrap() >= 2000.0);

    // Demo profiles cover March 1-30, so the timeline ends on the 30th with
    // the full count
    let last = view.timeline.last().unwrap();
    assert_eq!(last.day, NaiveDate::from_ymd_opt(2023, 3, 30).unwrap());
    assert_eq!(last.cumulative, 52);
    assert!(view
        .timeline
        .windows(2)
        .all(|w| w[0].cumulative <= w[1].cumulative));

    assert_eq!(view.markers.len(), 52);
    assert_eq!(view.rows.len(), 52);
    assert!(view
        .rows
        .windows(2)
        .all(|w| w[0].timestamp <= w[1].timestamp));

    assert!(view.summary.contains("52 ARGO salinity profiles"));
    assert!(view.summary.contains("17 floats"));

    assert!(view.generated_sql.starts_with("WITH filtered AS ("));
    assert!(view.generated_sql.contains("latitude BETWEEN -5 AND 5"));
    assert!(view
        .generated_sql
        .contains("time_utc >= '2023-03-01' AND time_utc < '2023-04-01'"));
    assert!(view.generated_sql.ends_with("SELECT * FROM filtered LIMIT 200;"));
}

#[tokio::test]
async fn test_temperature_question_uses_other_depth_curve() {
    let (_tmp, session) = seeded_session().await;

    let outcome = session
        .submit("temperature in the indian ocean in 2023", now())
        .await
        .unwrap();
    let view = match outcome {
        SubmitOutcome::Answered(view) => view,
        other => panic!("expected an answer, got {other:?}"),
    };

    assert_eq!(view.kpis.profile_count, 52);
    assert_eq!(view.kpis.unit, "°C");
    // Surface water is warmest; the representative curve must reflect the
    // temperature levels, not salinity
    assert_eq!(view.depth_series.len(), 7);
    assert!(view.depth_series[0].value > 20.0);
    assert!(view.depth_series.last().unwrap().value < 5.0);
}

#[tokio::test]
async fn test_question_outside_data_returns_empty_answer() {
    let (_tmp, session) = seeded_session().await;

    let outcome = session
        .submit("salinity near the equator in March 2019", now())
        .await
        .unwrap();
    let view = match outcome {
        SubmitOutcome::Answered(view) => view,
        other => panic!("expected an answer, got {other:?}"),
    };

    assert_eq!(view.kpis.profile_count, 0);
    assert!(view.summary.starts_with("No ARGO salinity profiles"));
    // Empty window still renders a full zero timeline
    assert_eq!(view.timeline.len(), 31);
    assert!(view.timeline.iter().all(|p| p.cumulative == 0));
}

#[tokio::test]
async fn test_unrelated_text_is_rejected_with_explanation() {
    let (_tmp, session) = seeded_session().await;

    let err = session
        .submit("what should I cook for dinner", now())
        .await
        .unwrap_err();
    assert!(matches!(err, ExplorerError::UnparsableQuery(_)));

    let history = session.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].role, Role::Assistant);
    assert!(history[1].view.is_none());
}

#[tokio::test]
async fn test_conversation_accumulates_turns_in_order() {
    let (_tmp, session) = seeded_session().await;

    session
        .submit("salinity near the equator in March 2023", now())
        .await
        .unwrap();
    session
        .submit("temperature in the indian ocean in 2023", now())
        .await
        .unwrap();

    let history = session.history().await;
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].text, "salinity near the equator in March 2023");
    assert_eq!(history[2].text, "temperature in the indian ocean in 2023");
    assert!(history[1].view.is_some());
    assert!(history[3].view.is_some());
}

#[tokio::test]
async fn test_row_limit_is_honored_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("argo.db")).await.unwrap();
    seed_demo(&db).await.unwrap();

    let config = InterpreterConfig {
        default_limit: 10,
        ..InterpreterConfig::default()
    };
    let interpreter = Interpreter::new(&config).unwrap();
    let session = Session::new(interpreter, Arc::new(db.store()), Duration::from_secs(5));

    let outcome = session
        .submit("salinity near the equator in March 2023", now())
        .await
        .unwrap();
    let view = match outcome {
        SubmitOutcome::Answered(view) => view,
        other => panic!("expected an answer, got {other:?}"),
    };

    assert_eq!(view.kpis.profile_count, 10);
    assert!(view.generated_sql.ends_with("LIMIT 10;"));
}
