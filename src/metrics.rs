//! Operation counters for monitoring.
//!
//! Counters cover the CRUD surface and the keep-alive self-ping. There is no
//! exporter endpoint; an installed recorder picks these up.

use metrics::{counter, describe_counter};
use tracing::debug;

// === Metric Name Constants ===

/// Successful keep-alive pings counter metric name.
pub const METRIC_KEEP_ALIVE_PINGS: &str = "keep_alive_pings_total";
/// Failed keep-alive pings counter metric name.
pub const METRIC_KEEP_ALIVE_PING_FAILURES: &str = "keep_alive_ping_failures_total";
/// Products created counter metric name.
pub const METRIC_PRODUCTOS_CREATED: &str = "productos_created_total";
/// Products updated counter metric name.
pub const METRIC_PRODUCTOS_UPDATED: &str = "productos_updated_total";
/// Products deleted counter metric name.
pub const METRIC_PRODUCTOS_DELETED: &str = "productos_deleted_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_KEEP_ALIVE_PINGS,
        "Total number of successful keep-alive pings"
    );
    describe_counter!(
        METRIC_KEEP_ALIVE_PING_FAILURES,
        "Total number of failed keep-alive pings"
    );
    describe_counter!(METRIC_PRODUCTOS_CREATED, "Total number of products created");
    describe_counter!(METRIC_PRODUCTOS_UPDATED, "Total number of products updated");
    describe_counter!(
        METRIC_PRODUCTOS_DELETED,
        "Total number of products deleted (individually or in bulk)"
    );

    debug!("Metrics initialized");
}

/// Increment the successful keep-alive ping counter.
pub fn inc_pings_ok() {
    counter!(METRIC_KEEP_ALIVE_PINGS).increment(1);
}

/// Increment the failed keep-alive ping counter.
pub fn inc_pings_failed() {
    counter!(METRIC_KEEP_ALIVE_PING_FAILURES).increment(1);
}

/// Increment the products-created counter.
pub fn inc_productos_created() {
    counter!(METRIC_PRODUCTOS_CREATED).increment(1);
}

/// Increment the products-updated counter.
pub fn inc_productos_updated() {
    counter!(METRIC_PRODUCTOS_UPDATED).increment(1);
}

/// Increment the products-deleted counter by `count`.
pub fn inc_productos_deleted(count: u64) {
    counter!(METRIC_PRODUCTOS_DELETED).increment(count);
}
