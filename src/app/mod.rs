//! Cycle-level helpers used by the library entry points.
//!
//! This module provides the demo data generator, the post-cycle heartbeat and
//! API upload hooks, and end-of-cycle statistics logging.

pub mod demo;
pub mod hooks;
pub mod statistics;

// Re-export public API
pub use demo::demo_results;
pub use hooks::{ping_heartbeat, upload_results};
pub use statistics::print_scan_statistics;
