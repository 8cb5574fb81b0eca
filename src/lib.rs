//! domain_watch library: periodic domain health auditing with deduplicated alerts
//!
//! Each cycle checks every configured domain for registration expiry, TLS
//! certificate health, SPF/DMARC records, HTTP security posture and RBL
//! listings, writes a report, and turns non-ok results into per-domain alert
//! digests that are rate-limited through a persisted issue store.
//!
//! # Example
//!
//! ```no_run
//! use domain_watch::{run_scan, ScanConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScanConfig {
//!     domains: vec!["example.com".to_string()],
//!     notify: true,
//!     ..Default::default()
//! };
//!
//! let report = run_scan(config).await?;
//! println!("{} checks, {} alert digests", report.results.len(), report.digests.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod alerts;
mod app;
pub mod checks;
pub mod config;
pub mod dns;
pub mod domain;
pub mod error_handling;
pub mod initialization;
pub mod models;
pub mod notify;
pub mod report;
pub mod scan;
mod tls;
mod whois;

// Re-export public API
pub use alerts::{AlertDigest, AlertManager, IssueStore, JsonFileStore};
pub use config::{LogFormat, LogLevel, ScanConfig};
pub use models::{CheckResult, MonitorKind, Status};
pub use run::{run_demo, run_scan, CycleReport};
pub use scan::Aggregator;
pub use whois::{WhoisClient, WhoisRecord, WhoisServiceSource, WhoisSource};

// Internal run module (contains the cycle orchestration)
mod run {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{Context, Result};
    use chrono::Utc;
    use log::{error, info, warn};
    use tokio_util::sync::CancellationToken;

    use crate::alerts::{AlertDigest, AlertManager, JsonFileStore};
    use crate::app::{demo_results, ping_heartbeat, print_scan_statistics, upload_results};
    use crate::checks::{build_adapters, CheckContext};
    use crate::config::ScanConfig;
    use crate::domain::TargetSelector;
    use crate::error_handling::{PersistenceError, ScanStats};
    use crate::initialization::*;
    use crate::models::CheckResult;
    use crate::notify::NotificationFanOut;
    use crate::report::{FileReporter, ReportEmitter};
    use crate::scan::Aggregator;
    use crate::whois::WhoisClient;

    /// Outcome of one cycle.
    #[derive(Debug, Clone)]
    pub struct CycleReport {
        /// Ordered results, one per domain and enabled monitor
        pub results: Vec<CheckResult>,
        /// Report artifacts written
        pub report_paths: Vec<PathBuf>,
        /// Digests selected for notification (empty unless notifying)
        pub digests: Vec<AlertDigest>,
        /// Successful channel deliveries
        pub deliveries: usize,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs one full scan cycle.
    ///
    /// Scans every configured domain, writes the report, pings the heartbeat,
    /// uploads the results, and (with `notify`) runs the alert pass and sends
    /// the resulting digests.
    ///
    /// # Errors
    ///
    /// Returns an error if shared resources cannot be initialized. Check
    /// failures, report write failures, notification failures and issue-store
    /// problems never fail the cycle.
    pub async fn run_scan(config: ScanConfig) -> Result<CycleReport> {
        let start_time = Instant::now();
        if config.domains.is_empty() {
            warn!("No domains configured");
        }

        let client = init_client().context("Failed to initialize HTTP client")?;
        let insecure_client =
            init_insecure_client().context("Failed to initialize HTTP client")?;
        let resolver =
            init_resolver(client.clone()).context("Failed to initialize DNS resolver")?;

        let ctx = CheckContext {
            client: client.clone(),
            insecure_client,
            resolver: Arc::clone(&resolver),
            rbl_transport: init_system_transport(),
            whois: WhoisClient::default(),
        };
        let adapters = build_adapters(&config.monitors, &ctx);
        info!(
            "Scanning {} domain(s) with monitors: {}",
            config.domains.len(),
            config
                .monitors
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let aggregator = Aggregator::new(TargetSelector::new(resolver), adapters)
            .with_concurrency(config.concurrency);
        let cancel: CancellationToken = init_cancellation();
        let results = aggregator.run(&config.domains, &cancel).await;

        let (report_paths, digests, deliveries) = publish(&config, &results, &client).await;

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        print_scan_statistics(&aggregator.stats(), elapsed_seconds);

        Ok(CycleReport {
            results,
            report_paths,
            digests,
            deliveries,
            elapsed_seconds,
        })
    }

    /// Hands the cycle's results to the report emitter, the hooks and (with
    /// `notify`) the alert pass. Each consumer runs regardless of how the
    /// others fared.
    async fn publish(
        config: &ScanConfig,
        results: &[CheckResult],
        client: &reqwest::Client,
    ) -> (Vec<PathBuf>, Vec<AlertDigest>, usize) {
        let reporter = FileReporter::new(&config.report_dir, config.report_formats.clone());
        let report_paths = match reporter.emit(results) {
            Ok(paths) => paths,
            Err(e) => {
                error!("Failed to write report: {e:#}");
                Vec::new()
            }
        };

        if let Some(url) = &config.heartbeat_url {
            ping_heartbeat(client, url).await;
        }
        if let Some(url) = &config.api_url {
            upload_results(client, url, results).await;
        }

        let (digests, deliveries) = if config.notify {
            alert_and_notify(config, results, client).await
        } else {
            (Vec::new(), 0)
        };
        (report_paths, digests, deliveries)
    }

    /// Writes a report from mock results. No network, state or notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written.
    pub async fn run_demo(config: ScanConfig) -> Result<CycleReport> {
        let start_time = Instant::now();
        info!("🚀 Running in DEMO mode. Generating mock data...");

        let results = demo_results(Utc::now());
        let stats = ScanStats::new();
        results.iter().for_each(|r| stats.record(r));

        let reporter = FileReporter::new(&config.report_dir, config.report_formats.clone());
        let report_paths = reporter
            .emit(&results)
            .context("Failed to write demo report")?;

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        print_scan_statistics(&stats, elapsed_seconds);

        Ok(CycleReport {
            results,
            report_paths,
            digests: Vec::new(),
            deliveries: 0,
            elapsed_seconds,
        })
    }

    /// Runs the alert pass under the store lock and fans out the digests.
    async fn alert_and_notify(
        config: &ScanConfig,
        results: &[CheckResult],
        client: &reqwest::Client,
    ) -> (Vec<AlertDigest>, usize) {
        let store = JsonFileStore::new(&config.state_file);
        let _lock = match store.lock() {
            Ok(lock) => lock,
            Err(e @ PersistenceError::Locked(_)) => {
                warn!("Skipping alerts: {e}");
                return (Vec::new(), 0);
            }
            Err(e) => {
                warn!("Skipping alerts, could not lock issue store: {e}");
                return (Vec::new(), 0);
            }
        };

        let manager = AlertManager::new(store, config.resend_after_hours);
        let digests = manager.process(results);
        if digests.is_empty() {
            info!("No new or repeating issues to notify");
            return (digests, 0);
        }

        let fan_out = NotificationFanOut::from_settings(&config.notifications, client);
        if fan_out.is_empty() {
            warn!(
                "{} alert digest(s) produced but no notification channel is configured",
                digests.len()
            );
            return (digests, 0);
        }
        let deliveries = fan_out.send_all(&digests).await;
        info!(
            "Sent {} digest(s) with {} delivery(ies) via {}",
            digests.len(),
            deliveries,
            fan_out.channel_names().join(", ")
        );
        (digests, deliveries)
    }

}
