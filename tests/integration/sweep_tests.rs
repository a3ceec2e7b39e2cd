//! End-to-end sweeps against the simulated site

use crate::support::{episode_hrefs, harness, test_config, SimulatedSite, LISTING};
use episode_sweeper::config::RunMode;
use episode_sweeper::crawler::{sweep, MAX_ITERATIONS};
use episode_sweeper::output::Outcome;
use episode_sweeper::session::{encode_blob, export_blob, read_store, StoredCookie};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn session_blob() -> String {
    encode_blob(&[StoredCookie::new("session", "abc").with_domain("reader.example.com")])
        .expect("cookies serialize")
}

#[tokio::test]
async fn test_empty_listing_finishes_without_reading() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut h = harness(&config, RunMode::Unattended, Some(session_blob()));
    let mut site = SimulatedSite::once(Vec::new());

    let report = sweep(&mut h.coordinator, &mut site).await;

    assert_eq!(report.outcome, Outcome::NoUnread);
    assert!(report.episodes.is_empty());
    assert_eq!(report.scans, 1);
    assert!(site.episode_visits().is_empty());
    assert_eq!(site.quit_calls, 1);
}

#[tokio::test]
async fn test_reads_each_unread_episode_once() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut h = harness(&config, RunMode::Unattended, Some(session_blob()));
    let mut site = SimulatedSite::once(episode_hrefs(1, 3));

    let report = sweep(&mut h.coordinator, &mut site).await;

    assert_eq!(report.outcome, Outcome::NoUnread);
    assert_eq!(report.scans, 2);
    assert_eq!(report.iterations, 1);
    assert_eq!(
        site.episode_visits(),
        vec![
            "https://reader.example.com/episode/1-0",
            "https://reader.example.com/episode/1-1",
            "https://reader.example.com/episode/1-2",
        ]
    );
    assert_eq!(report.episodes[0].title, "Episode 1");
    assert_eq!(site.page_turns, 6);

    // Settle delays alone add up to well over half a minute
    let total: Duration = h.sleeper.recorded().iter().sum();
    assert!(total >= Duration::from_secs(40), "slept only {:?}", total);
}

#[tokio::test]
async fn test_listing_that_never_empties_stops_at_cap() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut h = harness(&config, RunMode::Unattended, Some(session_blob()));
    let mut site = SimulatedSite::new(Box::new(|scan| episode_hrefs(scan, 7)));

    let report = sweep(&mut h.coordinator, &mut site).await;

    assert_eq!(report.outcome, Outcome::IterationCap);
    assert_eq!(report.iterations, MAX_ITERATIONS);
    assert_eq!(report.scans, MAX_ITERATIONS);
    assert_eq!(report.episodes.len(), 42);
    assert_eq!(site.quit_calls, 1);
}

#[tokio::test]
async fn test_stale_badges_are_not_read_twice() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut h = harness(&config, RunMode::Unattended, Some(session_blob()));
    let mut site = SimulatedSite::always(vec![
        "/episode/a".to_string(),
        "https://reader.example.com/episode/b".to_string(),
        "/episode/a".to_string(),
    ]);

    let report = sweep(&mut h.coordinator, &mut site).await;

    assert_eq!(report.outcome, Outcome::NoUnread);
    assert_eq!(report.scans, 2);
    assert_eq!(
        site.episode_visits(),
        vec![
            "https://reader.example.com/episode/a",
            "https://reader.example.com/episode/b",
        ]
    );
}

#[tokio::test]
async fn test_unattended_without_session_gives_up_at_listing() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut h = harness(&config, RunMode::Unattended, None);
    let mut site = SimulatedSite::once(episode_hrefs(1, 3));

    let report = sweep(&mut h.coordinator, &mut site).await;

    assert_eq!(report.outcome, Outcome::SessionUnavailable);
    assert!(report.episodes.is_empty());
    assert_eq!(site.visits, vec![LISTING.to_string()]);
    assert!(h.operator.calls.lock().unwrap().is_empty());
    assert!(!Path::new(&config.session.cookie_store).exists());
    assert_eq!(site.quit_calls, 1);
}

#[tokio::test]
async fn test_unattended_never_writes_store() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut h = harness(&config, RunMode::Unattended, Some(session_blob()));
    let mut site = SimulatedSite::once(episode_hrefs(1, 2));

    let report = sweep(&mut h.coordinator, &mut site).await;

    assert_eq!(report.episodes.len(), 2);
    assert!(!Path::new(&config.session.cookie_store).exists());
}

#[tokio::test]
async fn test_manual_login_session_feeds_unattended_run() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    // First run: nobody has logged in yet, the operator does it by hand
    let mut h = harness(&config, RunMode::Interactive, None);
    let mut site = SimulatedSite::once(episode_hrefs(1, 1));
    site.cookies = vec![StoredCookie::new("session", "typed-in")];

    let report = sweep(&mut h.coordinator, &mut site).await;

    assert_eq!(report.outcome, Outcome::NoUnread);
    assert_eq!(*h.operator.calls.lock().unwrap(), vec![LISTING.to_string()]);
    let store = Path::new(&config.session.cookie_store);
    assert_eq!(read_store(store).unwrap()[0].value, "typed-in");

    // Second run: the exported store restores the session with no operator
    let blob = export_blob(store).unwrap();
    let mut h = harness(&config, RunMode::Unattended, Some(blob));
    let mut site = SimulatedSite::once(episode_hrefs(1, 2));

    let report = sweep(&mut h.coordinator, &mut site).await;

    assert_eq!(report.outcome, Outcome::NoUnread);
    assert_eq!(report.episodes.len(), 2);
    assert_eq!(site.cookies[0].value, "typed-in");
    assert!(h.operator.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_interactive_run_reuses_local_store() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    episode_sweeper::session::write_store(
        Path::new(&config.session.cookie_store),
        &[StoredCookie::new("session", "saved")],
    )
    .unwrap();

    let mut h = harness(&config, RunMode::Interactive, None);
    let mut site = SimulatedSite::once(Vec::new());

    let report = sweep(&mut h.coordinator, &mut site).await;

    assert_eq!(report.outcome, Outcome::NoUnread);
    assert!(h.operator.calls.lock().unwrap().is_empty());
    assert_eq!(
        h.coordinator.session().restored_from(),
        Some(episode_sweeper::CookieSource::LocalStore)
    );
}

#[tokio::test]
async fn test_browser_failure_aborts_and_still_quits() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut h = harness(&config, RunMode::Unattended, Some(session_blob()));
    let mut site = SimulatedSite::new(Box::new(|scan| episode_hrefs(scan, 2)));
    site.fail_on_scan = Some(2);

    let report = sweep(&mut h.coordinator, &mut site).await;

    match &report.outcome {
        Outcome::Aborted(reason) => assert!(reason.contains("simulated failure")),
        other => panic!("expected abort, got {:?}", other),
    }
    assert_eq!(report.episodes.len(), 2);
    assert_eq!(site.quit_calls, 1);
}
