//! Post-cycle HTTP hooks: dead man's switch ping and result upload.
//!
//! Both are best-effort. Failures are logged and never fail the cycle.

use crate::models::CheckResult;

/// GETs the heartbeat URL. Returns whether the ping was accepted.
pub async fn ping_heartbeat(client: &reqwest::Client, url: &str) -> bool {
    match client.get(url).send().await.and_then(|r| r.error_for_status()) {
        Ok(_) => {
            log::info!("Heartbeat ping sent.");
            true
        }
        Err(e) => {
            log::error!("Failed to send heartbeat: {e}");
            false
        }
    }
}

/// POSTs the full result sequence as a JSON array. Returns whether it was accepted.
pub async fn upload_results(client: &reqwest::Client, url: &str, results: &[CheckResult]) -> bool {
    match client
        .post(url)
        .json(results)
        .send()
        .await
        .and_then(|r| r.error_for_status())
    {
        Ok(_) => {
            log::info!("JSON report uploaded to {url}");
            true
        }
        Err(e) => {
            log::error!("Failed to upload JSON report: {e}");
            false
        }
    }
}
