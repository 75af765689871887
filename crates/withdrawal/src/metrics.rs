//! Metrics for status resolution and output polling.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the binary
//! installs a recorder.

use crate::types::{ProtocolPath, WithdrawalStatus};
use metrics::{counter, describe_counter};

/// Handle for recording withdrawal metrics.
///
/// Metric descriptions are registered with the global registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!(
            "withdrawal_status_resolved_total",
            "Total withdrawal statuses resolved, by status"
        );
        describe_counter!(
            "withdrawal_output_poll_ticks_total",
            "Total output lookups made while waiting, by protocol path"
        );
        describe_counter!(
            "withdrawal_output_found_total",
            "Total waits that ended with an output covering the target block"
        );
    }

    /// Record a resolved status.
    pub fn record_status(&self, status: WithdrawalStatus) {
        counter!("withdrawal_status_resolved_total", "status" => status.as_str()).increment(1);
    }

    /// Record one output lookup made by the waiter.
    pub fn record_poll_tick(&self, path: ProtocolPath) {
        let path = match path {
            ProtocolPath::Legacy => "legacy",
            ProtocolPath::FaultProof => "fault-proof",
        };
        counter!("withdrawal_output_poll_ticks_total", "path" => path).increment(1);
    }

    pub fn record_output_found(&self) {
        counter!("withdrawal_output_found_total").increment(1);
    }
}
