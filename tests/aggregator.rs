//! End-to-end aggregation through the public API with scripted adapters.

mod helpers;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use domain_watch::checks::CheckAdapter;
use domain_watch::domain::TargetSelector;
use domain_watch::scan::DNS_RESOLUTION_FAILED;
use domain_watch::{Aggregator, MonitorKind, Status};

use helpers::{static_resolver, ScriptedAdapter};

#[tokio::test]
async fn test_cycle_results_follow_policy_and_order() {
    let resolver = static_resolver(&[
        ("www.shop.example.com", "192.0.2.1"),
        ("example.org", "192.0.2.2"),
    ]);
    let expiry = ScriptedAdapter::new(MonitorKind::Domain, Status::Ok);
    let ssl = ScriptedAdapter::new(MonitorKind::Ssl, Status::Warning);
    let blacklist = ScriptedAdapter::new(MonitorKind::Blacklist, Status::Ok);
    let adapters: Vec<Arc<dyn CheckAdapter>> =
        vec![expiry.clone(), ssl.clone(), blacklist.clone()];

    let aggregator = Aggregator::new(TargetSelector::new(resolver), adapters);
    let domains = vec![
        "https://Shop.Example.com:8443/login".to_string(),
        "example.org".to_string(),
        "gone.test".to_string(),
    ];
    let results = aggregator.run(&domains, &CancellationToken::new()).await;

    assert_eq!(results.len(), 9);
    let labels: Vec<&str> = results.iter().map(|r| r.domain.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "shop.example.com",
            "shop.example.com",
            "shop.example.com",
            "example.org",
            "example.org",
            "example.org",
            "gone.test",
            "gone.test",
            "gone.test",
        ]
    );

    assert_eq!(
        expiry.targets.lock().unwrap().clone(),
        vec!["example.com", "example.org", "gone.test"]
    );
    // gone.test has no connectable host, so ssl never ran for it
    assert_eq!(
        ssl.targets.lock().unwrap().clone(),
        vec!["www.shop.example.com", "example.org"]
    );
    assert_eq!(
        blacklist.targets.lock().unwrap().clone(),
        vec!["shop.example.com", "example.org", "gone.test"]
    );

    assert!(results[0].message.starts_with("(Parent: example.com) "));
    let gone_ssl = &results[7];
    assert_eq!(gone_ssl.monitor, MonitorKind::Ssl);
    assert_eq!(gone_ssl.status, Status::Critical);
    assert_eq!(gone_ssl.message, DNS_RESOLUTION_FAILED);

    let stats = aggregator.stats();
    assert_eq!(stats.total(), 9);
    assert_eq!(stats.status_count(Status::Critical), 1);
}

#[tokio::test]
async fn test_adapter_fault_is_isolated() {
    let resolver = static_resolver(&[("explode.example.net", "192.0.2.9")]);
    let blacklist = ScriptedAdapter::new(MonitorKind::Blacklist, Status::Ok);
    let adapters: Vec<Arc<dyn CheckAdapter>> = vec![blacklist];

    let aggregator = Aggregator::new(TargetSelector::new(resolver), adapters);
    let domains = vec!["explode.example.net".to_string(), "fine.example.net".to_string()];
    let results = aggregator.run(&domains, &CancellationToken::new()).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].status, Status::Error);
    assert_eq!(results[0].domain, "explode.example.net");
    assert_eq!(results[1].status, Status::Ok);
    assert_eq!(aggregator.stats().adapter_failures(), 1);
}
