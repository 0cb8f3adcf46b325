//! Utility functions.

use serde::Serialize;
use tokio::signal;

/// Wait for SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Process memory usage in MiB.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MemoryUsage {
    /// Resident set size.
    pub used: u64,
    /// Total virtual size.
    pub total: u64,
}

/// Current process memory in MiB, when the platform exposes it.
///
/// Reads `VmRSS`/`VmSize` from `/proc/self/status`, which are reported in
/// KiB independent of the kernel's page size.
#[cfg(target_os = "linux")]
pub fn memory_usage_mb() -> Option<MemoryUsage> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;

    let mut used_kib = None;
    let mut total_kib = None;
    for line in status.lines() {
        if let Some(value) = line.strip_prefix("VmRSS:") {
            used_kib = parse_kib(value);
        } else if let Some(value) = line.strip_prefix("VmSize:") {
            total_kib = parse_kib(value);
        }
    }

    Some(MemoryUsage {
        used: used_kib? / 1024,
        total: total_kib? / 1024,
    })
}

/// Parse a `/proc/self/status` field value of the form `"   12345 kB"`.
#[cfg(target_os = "linux")]
fn parse_kib(value: &str) -> Option<u64> {
    value.trim().trim_end_matches("kB").trim().parse().ok()
}

/// Current process memory in MiB, when the platform exposes it.
#[cfg(not(target_os = "linux"))]
pub fn memory_usage_mb() -> Option<MemoryUsage> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_os = "linux")]
    fn memory_usage_is_readable() {
        let usage = memory_usage_mb().expect("/proc/self/status should be readable on linux");
        assert!(usage.used <= usage.total);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn parse_kib_handles_status_field_values() {
        assert_eq!(parse_kib("\t  123456 kB"), Some(123456));
        assert_eq!(parse_kib(" 0 kB"), Some(0));
        assert_eq!(parse_kib("garbage"), None);
    }
}
