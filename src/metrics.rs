// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for nsd-rpcd.
//!
//! This module provides metrics collection with the namespace prefix `nsd_rpcd_`.
//!
//! # Metrics Categories
//!
//! - **Control Metrics** - Track NSD control commands, their outcomes and latency
//! - **Operation Metrics** - Track zone operations by result code
//! - **Zone File Metrics** - Track zone files written and removed
//!
//! # Example
//!
//! ```rust,no_run
//! use nsd_rpcd::metrics::{gather_metrics, record_control_command};
//!
//! record_control_command("reload", "success", std::time::Duration::from_millis(12));
//! println!("{}", gather_metrics().unwrap());
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all nsd-rpcd metrics
const METRICS_NAMESPACE: &str = "nsd_rpcd";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Control Metrics
// ============================================================================

/// Total number of NSD control commands by command and status
///
/// Labels:
/// - `command`: Wire command (e.g., `addzone`, `reload`)
/// - `status`: Outcome (`success`, `error` for an `error ` response, `failure` for a channel fault)
pub static CONTROL_COMMANDS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_control_commands_total"),
        "Total number of NSD control commands by command and status",
    );
    let counter = CounterVec::new(opts, &["command", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of NSD control round-trips in seconds
///
/// Labels:
/// - `command`: Wire command
pub static CONTROL_COMMAND_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_control_command_duration_seconds"),
        "Duration of NSD control round-trips in seconds by command",
    )
    .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]);
    let histogram = HistogramVec::new(opts, &["command"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Operation Metrics
// ============================================================================

/// Total number of zone operations by operation and result code
///
/// Labels:
/// - `operation`: RPC method name (e.g., `addZone`)
/// - `code`: Result code (`1000`, `2302`, ...)
pub static OPERATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_operations_total"),
        "Total number of zone operations by operation and result code",
    );
    let counter = CounterVec::new(opts, &["operation", "code"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Zone File Metrics
// ============================================================================

/// Total number of zone files written
pub static ZONE_FILES_WRITTEN_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new(
        format!("{METRICS_NAMESPACE}_zone_files_written_total"),
        "Total number of zone files written",
    )
    .unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Total number of zone files removed
pub static ZONE_FILES_REMOVED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    let counter = IntCounter::new(
        format!("{METRICS_NAMESPACE}_zone_files_removed_total"),
        "Total number of zone files removed",
    )
    .unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a control command round-trip
///
/// # Arguments
/// * `command` - Wire command that was sent
/// * `status` - `success`, `error` or `failure`
/// * `duration` - Duration of the round-trip
pub fn record_control_command(command: &str, status: &str, duration: Duration) {
    CONTROL_COMMANDS_TOTAL
        .with_label_values(&[command, status])
        .inc();
    CONTROL_COMMAND_DURATION_SECONDS
        .with_label_values(&[command])
        .observe(duration.as_secs_f64());
}

/// Record the result code of a zone operation
pub fn record_operation(operation: &str, code: u16) {
    let code = code.to_string();
    OPERATIONS_TOTAL
        .with_label_values(&[operation, code.as_str()])
        .inc();
}

pub fn record_zone_file_written() {
    ZONE_FILES_WRITTEN_TOTAL.inc();
}

pub fn record_zone_file_removed() {
    ZONE_FILES_REMOVED_TOTAL.inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Returns
/// Prometheus-formatted metrics as a String
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
