use super::*;
use crate::report::{FixedClock, partition_key};
use crate::store::{ArtifactStore, MemoryArtifactStore};
use crate::testing::FakePage;
use chrono::{TimeZone, Utc};
use uihealth_config::SeverityConfig;
use uihealth_protocols::Expectation;

const BASE: &str = "http://127.0.0.1:8050";

struct Harness {
    page: Arc<FakePage>,
    screenshots: Arc<MemoryArtifactStore>,
    reports: Arc<MemoryArtifactStore>,
    runner: StructuralRunner,
}

fn harness(page: FakePage) -> Harness {
    let page = Arc::new(page);
    let screenshots = Arc::new(MemoryArtifactStore::new());
    let reports = Arc::new(MemoryArtifactStore::new());
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap());

    let runner = StructuralRunner::new(
        page.clone(),
        SeverityClassifier::from_config(&SeverityConfig::default()).unwrap(),
        EvidenceCapturer::new(screenshots.clone(), true),
        ReportAggregator::with_clock(BASE, Arc::new(clock)),
        ReportWriter::new(reports.clone(), "ui_health_report.json"),
    );

    Harness {
        page,
        screenshots,
        reports,
        runner,
    }
}

fn signals() -> PageTarget {
    PageTarget::new("/signals").expect(Expectation::exists("#signals-table"))
}

#[tokio::test(start_paused = true)]
async fn test_healthy_page() {
    let h = harness(FakePage::new().with("#signals-table", 1));
    let result = h.runner.check_page(&signals()).await;

    assert!(result.ok);
    assert_eq!(result.path, "/signals");
    assert_eq!(result.url, "http://127.0.0.1:8050/signals");
    assert!(result.warnings.is_empty());
    assert!(result.errors.is_empty());
    assert_eq!(h.screenshots.keys(), vec!["signals.png"]);
}

#[tokio::test(start_paused = true)]
async fn test_table_never_renders() {
    let h = harness(FakePage::new());
    let result = h.runner.check_page(&signals()).await;

    assert!(!result.ok);
    assert_eq!(result.errors, vec!["missing #signals-table".to_string()]);
    assert_eq!(h.page.count_calls("#signals-table"), 5);
    assert!(result.ms >= 1200);
    // Evidence is captured regardless of the verdict.
    assert_eq!(h.page.screenshots_taken(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_alert_banner_comes_first() {
    let h = harness(FakePage::new().with("#signals-table", 1).with(".alert-danger", 1));
    let result = h.runner.check_page(&signals()).await;

    assert!(!result.ok);
    assert_eq!(result.errors[0], "alert-danger visible");
}

#[tokio::test(start_paused = true)]
async fn test_text_drift_keeps_page_ok() {
    let h = harness(FakePage::new().with_text("h3", "Risque"));
    let target = PageTarget::new("/risk").expect(Expectation::text_contains("h3", "Risk"));
    let result = h.runner.check_page(&target).await;

    assert!(result.ok);
    assert_eq!(result.warnings, vec!["text 'Risk' not found in h3".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_navigation_timeout_is_single_error() {
    let h = harness(FakePage::new().timing_out_on("http://127.0.0.1:8050/signals"));
    let result = h.runner.check_page(&signals()).await;

    assert!(!result.ok);
    assert_eq!(
        result.errors,
        vec!["Navigation to http://127.0.0.1:8050/signals timed out after 15000 ms".to_string()]
    );
    assert!(result.warnings.is_empty());
    assert_eq!(h.page.count_calls("#signals-table"), 0);
    assert_eq!(h.page.count_calls(".alert-danger"), 0);
    assert_eq!(h.page.screenshots_taken(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_query_failure_stops_page_without_screenshot() {
    let h = harness(
        FakePage::new()
            .failing_query("#signals-table", "Execution context was destroyed")
            .with("#other", 1),
    );
    let target = signals().expect(Expectation::exists("#other"));
    let result = h.runner.check_page(&target).await;

    assert!(!result.ok);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("Execution context was destroyed"));
    assert_eq!(h.page.count_calls("#other"), 0);
    assert_eq!(h.page.screenshots_taken(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_screenshot_failure_fails_page() {
    let h = harness(FakePage::new().with("#signals-table", 1).failing_screenshots());
    let result = h.runner.check_page(&signals()).await;

    assert!(!result.ok);
    assert_eq!(result.errors, vec!["Screenshot failed: capture failed".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_run_keeps_registry_order_through_failures() {
    let h = harness(
        FakePage::new()
            .with_text("h3", "Dashboard")
            .with("#signals-table", 1)
            .refusing("http://127.0.0.1:8050/portfolio", "net::ERR_CONNECTION_REFUSED"),
    );
    let registry = vec![
        PageTarget::new("/").expect(Expectation::text_contains("h3", "Dashboard")),
        PageTarget::new("/portfolio").expect(Expectation::exists("#port-proposal")),
        signals(),
    ];

    let outcome = h.runner.run(&registry).await.unwrap();
    let report = &outcome.report;

    assert_eq!(report.results.len(), 3);
    let paths: Vec<_> = report.results.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["/", "/portfolio", "/signals"]);
    assert!(report.results[0].ok);
    assert!(!report.results[1].ok);
    assert!(report.results[2].ok);
    assert!(!report.ok);
    assert_eq!(report.base, BASE);
    assert_eq!(
        h.page.visited(),
        vec![
            "http://127.0.0.1:8050/",
            "http://127.0.0.1:8050/portfolio",
            "http://127.0.0.1:8050/signals",
        ]
    );
    assert_eq!(h.screenshots.keys(), vec!["root.png", "signals.png"]);
}

#[tokio::test(start_paused = true)]
async fn test_run_persists_dated_report() {
    let h = harness(FakePage::new().with("#signals-table", 1));
    let outcome = h.runner.run(&[signals()]).await.unwrap();

    let key = format!("{}/ui_health_report.json", partition_key(&outcome.report.asof));
    assert_eq!(outcome.location, format!("memory://{}", key));
    assert_eq!(h.reports.keys(), vec![key.clone()]);

    let bytes = h.reports.get(&key).await.unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["results"][0]["path"], "/signals");
}

#[tokio::test(start_paused = true)]
async fn test_from_config_uses_probe_budget() {
    let mut config = Config::default();
    config.probe.max_attempts = 2;
    let page = Arc::new(FakePage::new());
    let runner = StructuralRunner::from_config(&config, page.clone()).unwrap();
    assert_eq!(runner.evaluator.policy().max_attempts, 2);
    assert_eq!(runner.navigation_timeout, Duration::from_millis(15_000));
}
