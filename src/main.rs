//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_watch` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Config file loading
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use domain_watch::config::{load_file_config, Opt};
use domain_watch::initialization::{init_crypto_provider, init_logger_with};
use domain_watch::{run_demo, run_scan, ScanConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Notification secrets may live in .env; try the current directory first,
    // then the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();

    let log_level = opt.log_level.clone();
    let log_format = opt.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let outcome = if opt.demo {
        run_demo(ScanConfig::from_parts(&opt, Default::default())).await
    } else {
        match load_file_config(&opt.config) {
            Ok(file) => run_scan(ScanConfig::from_parts(&opt, file)).await,
            Err(e) => Err(anyhow::Error::new(e)),
        }
    };

    match outcome {
        Ok(report) => {
            println!(
                "✅ Ran {} check{} in {:.1}s ({} alert digest{}, {} delivered)",
                report.results.len(),
                if report.results.len() == 1 { "" } else { "s" },
                report.elapsed_seconds,
                report.digests.len(),
                if report.digests.len() == 1 { "" } else { "s" },
                report.deliveries
            );
            for path in &report.report_paths {
                println!("Report saved in {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("domain_watch error: {:#}", e);
            process::exit(1);
        }
    }
}
