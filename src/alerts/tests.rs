use chrono::{Duration, TimeZone, Utc};

use super::*;
use crate::error_handling::PersistenceError;
use crate::models::{MonitorKind, Status};

fn result(domain: &str, monitor: MonitorKind, status: Status) -> CheckResult {
    CheckResult::new(domain, monitor, status, format!("{monitor} is {status}"))
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn window() -> Duration {
    Duration::hours(24)
}

#[test]
fn test_new_issue_creates_record_and_digest() {
    let mut issues = IssueMap::new();
    let results = vec![
        result("example.com", MonitorKind::Ssl, Status::Critical),
        result("example.com", MonitorKind::Domain, Status::Ok),
    ];

    let digests = evaluate(&results, &mut issues, t0(), window());

    assert_eq!(digests.len(), 1);
    assert_eq!(digests[0].domain, "example.com");
    assert_eq!(digests[0].entries.len(), 1);
    assert_eq!(digests[0].entries[0].count, 1);
    let record = &issues["example.com:ssl"];
    assert_eq!(record.count, 1);
    assert_eq!(record.first_seen, t0());
    assert_eq!(record.last_sent, t0());
    assert!(!issues.contains_key("example.com:domain"));
}

#[test]
fn test_second_run_without_elapsed_time_snoozes_everything() {
    let mut issues = IssueMap::new();
    let results = vec![
        result("a.com", MonitorKind::Ssl, Status::Warning),
        result("b.com", MonitorKind::Dns, Status::Error),
    ];

    let first = evaluate(&results, &mut issues, t0(), window());
    let snapshot = issues.clone();
    let second = evaluate(&results, &mut issues, t0(), window());

    assert_eq!(first.len(), 2);
    assert!(second.is_empty());
    assert_eq!(issues, snapshot);
}

#[test]
fn test_resend_boundary() {
    let results = vec![result("example.com", MonitorKind::Ssl, Status::Critical)];

    let mut issues = IssueMap::new();
    evaluate(&results, &mut issues, t0(), window());
    let later = t0() + Duration::hours(24) + Duration::seconds(1);
    let digests = evaluate(&results, &mut issues, later, window());
    assert_eq!(digests.len(), 1);
    assert_eq!(digests[0].entries[0].count, 2);
    assert_eq!(digests[0].entries[0].annotation(), "Repeated 2×");
    assert_eq!(issues["example.com:ssl"].last_sent, later);
    assert_eq!(issues["example.com:ssl"].first_seen, t0());

    let mut issues = IssueMap::new();
    evaluate(&results, &mut issues, t0(), window());
    let earlier = t0() + Duration::hours(24) - Duration::seconds(1);
    let digests = evaluate(&results, &mut issues, earlier, window());
    assert!(digests.is_empty());
    assert_eq!(issues["example.com:ssl"].count, 1);
    assert_eq!(issues["example.com:ssl"].last_sent, t0());
}

#[test]
fn test_exactly_window_is_snoozed() {
    let results = vec![result("example.com", MonitorKind::Dns, Status::Warning)];
    let mut issues = IssueMap::new();
    evaluate(&results, &mut issues, t0(), window());
    let digests = evaluate(&results, &mut issues, t0() + window(), window());
    assert!(digests.is_empty());
}

#[test]
fn test_resolved_then_recurring_is_new() {
    let mut issues = IssueMap::new();
    let failing = vec![result("example.com", MonitorKind::Blacklist, Status::Critical)];
    let passing = vec![result("example.com", MonitorKind::Blacklist, Status::Ok)];

    evaluate(&failing, &mut issues, t0(), window());
    let resolved = evaluate(&passing, &mut issues, t0() + Duration::hours(1), window());
    assert!(resolved.is_empty());
    assert!(issues.is_empty());

    let digests = evaluate(&failing, &mut issues, t0() + Duration::hours(2), window());
    assert_eq!(digests.len(), 1);
    assert_eq!(digests[0].entries[0].count, 1);
    assert_eq!(digests[0].entries[0].annotation(), "New");
}

#[test]
fn test_absent_pair_is_resolved() {
    let mut issues = IssueMap::new();
    evaluate(
        &[
            result("a.com", MonitorKind::Ssl, Status::Critical),
            result("b.com", MonitorKind::Ssl, Status::Critical),
        ],
        &mut issues,
        t0(),
        window(),
    );

    evaluate(
        &[result("a.com", MonitorKind::Ssl, Status::Critical)],
        &mut issues,
        t0() + Duration::minutes(5),
        window(),
    );

    assert!(issues.contains_key("a.com:ssl"));
    assert!(!issues.contains_key("b.com:ssl"));
}

#[test]
fn test_latest_result_per_pair_wins() {
    let mut issues = IssueMap::new();
    let results = vec![
        result("example.com", MonitorKind::Ssl, Status::Critical),
        result("example.com", MonitorKind::Ssl, Status::Ok),
    ];
    let digests = evaluate(&results, &mut issues, t0(), window());
    assert!(digests.is_empty());
    assert!(issues.is_empty());
}

#[test]
fn test_digests_grouped_per_domain_in_result_order() {
    let mut issues = IssueMap::new();
    let results = vec![
        result("b.com", MonitorKind::Ssl, Status::Warning),
        result("a.com", MonitorKind::Dns, Status::Warning),
        result("ok.com", MonitorKind::Ssl, Status::Ok),
        result("b.com", MonitorKind::Security, Status::Critical),
        result("b.com", MonitorKind::Domain, Status::Error),
    ];

    let digests = evaluate(&results, &mut issues, t0(), window());

    let domains: Vec<&str> = digests.iter().map(|d| d.domain.as_str()).collect();
    assert_eq!(domains, vec!["b.com", "a.com"]);
    let b_monitors: Vec<MonitorKind> = digests[0].entries.iter().map(|e| e.monitor).collect();
    assert_eq!(
        b_monitors,
        vec![MonitorKind::Security, MonitorKind::Domain, MonitorKind::Ssl]
    );
    assert_eq!(digests[0].level(), AlertLevel::Critical);
    assert_eq!(digests[1].level(), AlertLevel::Warning);
    assert!(digests.iter().all(|d| !d.entries.is_empty()));
}

#[test]
fn test_mixed_snoozed_and_resend_in_one_domain() {
    let mut issues = IssueMap::new();
    let results = vec![
        result("example.com", MonitorKind::Ssl, Status::Warning),
        result("example.com", MonitorKind::Dns, Status::Warning),
    ];
    evaluate(&results, &mut issues, t0(), window());
    // Only the ssl record is old enough to resend
    if let Some(record) = issues.get_mut("example.com:ssl") {
        record.last_sent = t0() - Duration::hours(30);
    }

    let digests = evaluate(&results, &mut issues, t0() + Duration::hours(1), window());
    assert_eq!(digests.len(), 1);
    assert_eq!(digests[0].entries.len(), 1);
    assert_eq!(digests[0].entries[0].monitor, MonitorKind::Ssl);
    assert_eq!(issues.len(), 2);
}

struct FailingStore;

impl IssueStore for FailingStore {
    fn load(&self) -> Result<IssueMap, PersistenceError> {
        Err(PersistenceError::Locked("state.json".into()))
    }

    fn save(&self, _issues: &IssueMap) -> Result<(), PersistenceError> {
        Err(PersistenceError::Locked("state.json".into()))
    }
}

#[test]
fn test_manager_survives_store_failures() {
    let manager = AlertManager::new(FailingStore, 24);
    let digests = manager.process_at(
        &[result("example.com", MonitorKind::Ssl, Status::Critical)],
        t0(),
    );
    assert_eq!(digests.len(), 1);
}

#[test]
fn test_manager_saves_even_without_alerts() {
    let mut open = IssueMap::new();
    evaluate(
        &[result("example.com", MonitorKind::Ssl, Status::Critical)],
        &mut open,
        t0(),
        window(),
    );
    let manager = AlertManager::new(MemoryStore::new(open), 24);

    let digests = manager.process_at(
        &[result("example.com", MonitorKind::Ssl, Status::Ok)],
        t0() + Duration::hours(1),
    );

    assert!(digests.is_empty());
    assert!(manager.store().snapshot().is_empty());
}

#[test]
fn test_manager_persists_across_cycles_with_json_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let results = vec![result("example.com", MonitorKind::Dns, Status::Warning)];

    let first = AlertManager::new(JsonFileStore::new(&path), 24).process_at(&results, t0());
    let second = AlertManager::new(JsonFileStore::new(&path), 24)
        .process_at(&results, t0() + Duration::hours(2));
    let third = AlertManager::new(JsonFileStore::new(&path), 24)
        .process_at(&results, t0() + Duration::hours(25));

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(third[0].entries[0].count, 2);
}

#[test]
fn test_manager_treats_corrupt_store_as_cold_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();

    let manager = AlertManager::new(JsonFileStore::new(&path), 24);
    let digests = manager.process_at(
        &[result("example.com", MonitorKind::Ssl, Status::Critical)],
        t0(),
    );

    assert_eq!(digests.len(), 1);
    let saved = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(saved["example.com:ssl"].count, 1);
}

#[test]
fn test_unusable_resend_window_falls_back_to_default() {
    for hours in [0, -5, i64::MAX] {
        let manager = AlertManager::new(MemoryStore::default(), hours);
        assert_eq!(manager.resend_after(), Duration::hours(24), "hours = {hours}");
    }
    assert_eq!(AlertManager::new(MemoryStore::default(), 6).resend_after(), Duration::hours(6));
}

#[test]
fn test_zero_window_does_not_resend_every_cycle() {
    let manager = AlertManager::new(MemoryStore::default(), 0);
    let results = vec![result("example.com", MonitorKind::Ssl, Status::Critical)];

    assert_eq!(manager.process_at(&results, t0()).len(), 1);
    assert!(manager.process_at(&results, t0() + Duration::hours(1)).is_empty());
}
