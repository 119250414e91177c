mod support;

use std::io::Write;

use oee_rust::db::{RepositoryConfig, RepositoryFactory};
use oee_rust::models::{Ratio, ShiftWindow};
use oee_rust::services::{bucketize, production_summary, OeeError};
use support::{at, day_shift_repository};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn test_day_shift_hourly_rollup() {
    let repo = day_shift_repository();

    let summary = bucketize(&repo, "LINE-1", at(8, 0), at(10, 30), 4)
        .await
        .unwrap();

    assert_eq!(summary.unit, "LINE-1");
    assert_eq!(summary.buckets.len(), 3);

    let first = &summary.buckets[0];
    assert_eq!(first.total_count, 120);
    assert_eq!(first.fail_count, 20);
    assert_close(first.performance.value().unwrap(), 1.0);

    let second = &summary.buckets[1];
    assert_eq!(second.total_count, 40);
    assert_eq!(second.performance, Ratio::NotApplicable);
    assert_eq!(second.oee, Ratio::NotApplicable);

    let third = &summary.buckets[2];
    assert_eq!(third.bucket_end, at(10, 30));
    assert_eq!(third.total_count, 60);
    assert_close(third.quality, 0.75);
    assert_close(third.performance.value().unwrap(), 1.0);

    assert_eq!(summary.total_success_count, 100 + 40 + 45);
    assert_eq!(summary.total_count, 220);
    assert_close(summary.average_performance.value().unwrap(), 1.0);
    assert_close(summary.total_oee.value().unwrap(), 185.0 / 220.0);
}

#[tokio::test]
async fn test_full_final_hour_halves_performance() {
    let repo = day_shift_repository();

    let summary = bucketize(&repo, "LINE-1", at(10, 0), at(11, 0), 1)
        .await
        .unwrap();
    assert_close(summary.buckets[0].performance.value().unwrap(), 0.5);
}

#[tokio::test]
async fn test_flat_query_over_shift() {
    let repo = day_shift_repository();

    let models = production_summary(&repo, "LINE-1", at(8, 0), at(10, 30))
        .await
        .unwrap();

    assert_eq!(models.len(), 2);
    let a = &models[0];
    assert_eq!(a.model, "A");
    assert_eq!(a.total_count, 180);
    // 180 units * 30 s over 9000 s
    assert_close(a.performance.value().unwrap(), 0.6);

    let b = &models[1];
    assert_eq!(b.model, "B");
    assert_eq!(b.performance, Ratio::NotApplicable);
}

#[tokio::test]
async fn test_unknown_unit_is_empty_not_error() {
    let repo = day_shift_repository();

    let summary = bucketize(&repo, "PRESS-9", at(8, 0), at(10, 0), 2)
        .await
        .unwrap();
    assert_eq!(summary.total_count, 0);
    assert_eq!(summary.total_quality, 0.0);
    assert_eq!(summary.total_oee, Ratio::NotApplicable);
    assert!(summary.buckets.iter().all(|b| b.total_count == 0));
}

#[tokio::test]
async fn test_outage_propagates() {
    let repo = day_shift_repository();
    repo.set_healthy(false);

    let err = production_summary(&repo, "LINE-1", at(8, 0), at(9, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, OeeError::DataSourceUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_shift_window_drives_hourly_query() {
    let repo = day_shift_repository();
    let shift = ShiftWindow::at(at(10, 30));
    assert_eq!(shift.start_time, at(8, 0));

    let elapsed = shift.elapsed().unwrap();
    let summary = bucketize(&repo, "LINE-1", elapsed.start(), elapsed.end(), 3)
        .await
        .unwrap();
    assert_eq!(summary.buckets.len(), 3);
}

#[tokio::test]
async fn test_seeded_repository_from_config_file() {
    let mut seed = tempfile::NamedTempFile::new().unwrap();
    write!(
        seed,
        r#"[
            {{"unit": "LINE-7", "recorded_at": "2024-03-01T08:00:00", "model": "X", "passed": true, "target_rate": 2.0}},
            {{"unit": "LINE-7", "recorded_at": "2024-03-01T08:30:00", "model": "X", "passed": false, "target_rate": 2.0}}
        ]"#
    )
    .unwrap();

    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        config_file,
        "[repository]\ntype = \"local\"\n\n[local]\nseed_file = {:?}",
        seed.path().display().to_string()
    )
    .unwrap();

    let config = RepositoryConfig::from_file(config_file.path()).unwrap();
    let repo = RepositoryFactory::from_config(&config).await.unwrap();

    let units = oee_rust::db::list_units(repo.as_ref()).await.unwrap();
    assert_eq!(units, vec!["LINE-7"]);

    let summary = bucketize(repo.as_ref(), "LINE-7", at(8, 0), at(9, 0), 1)
        .await
        .unwrap();
    assert_close(summary.total_quality, 0.5);
    assert_close(summary.total_oee.value().unwrap(), 0.5);
}

#[tokio::test]
async fn test_bundled_fixture_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/records.json");
    let repo = oee_rust::db::LocalRepository::from_json_file(path).unwrap();
    assert_eq!(repo.record_count(), 270);

    let summary = bucketize(&repo, "LINE-1", at(8, 0), at(10, 0), 2)
        .await
        .unwrap();
    assert_close(summary.buckets[0].performance.value().unwrap(), 1.0);
    assert_eq!(summary.buckets[1].performance, Ratio::NotApplicable);
    assert_eq!(summary.total_count, 240);
}
