//! Podhost metrics recorder with pre-defined metrics.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};

/// Pre-defined metrics for the Podhost service.
///
/// All metrics follow the naming convention: `podhost_<category>_<metric>_<unit>`
pub struct PodhostMetrics;

impl PodhostMetrics {
    /// Register all metric descriptions.
    pub fn register() {
        // Routing metrics
        describe_counter!(
            "podhost_routing_decisions_total",
            "Requests routed, by decision and resolution"
        );
        describe_counter!(
            "podhost_forged_tenant_header_total",
            "Client-supplied tenant headers stripped before routing"
        );

        // Directory metrics
        describe_histogram!(
            "podhost_directory_lookup_seconds",
            "Tenant directory lookup latency"
        );
        describe_counter!(
            "podhost_directory_lookup_total",
            "Tenant directory lookups, by outcome"
        );
        describe_counter!(
            "podhost_directory_reload_total",
            "Catalog reloads, by outcome"
        );
        describe_gauge!(
            "podhost_directory_hostnames",
            "Hostnames in the active directory snapshot"
        );

        // API metrics
        describe_counter!("podhost_api_request_total", "Total number of API requests");
        describe_histogram!("podhost_api_request_latency_seconds", "API request latency");
    }

    // ==================== Routing Metrics ====================

    /// Record a routing decision.
    pub fn routing_decision(decision: &'static str, resolution: &'static str) {
        counter!(
            "podhost_routing_decisions_total",
            "decision" => decision,
            "resolution" => resolution
        )
        .increment(1);
    }

    /// Record stripped client-supplied tenant headers.
    pub fn forged_header_stripped(count: u64) {
        counter!("podhost_forged_tenant_header_total").increment(count);
    }

    // ==================== Directory Metrics ====================

    /// Record a directory lookup and its latency.
    pub fn directory_lookup(outcome: &'static str, latency_seconds: f64) {
        counter!("podhost_directory_lookup_total", "outcome" => outcome).increment(1);
        histogram!("podhost_directory_lookup_seconds", "outcome" => outcome)
            .record(latency_seconds);
    }

    /// Record a catalog reload.
    pub fn directory_reload(success: bool) {
        let outcome = if success { "success" } else { "failure" };
        counter!("podhost_directory_reload_total", "outcome" => outcome).increment(1);
    }

    /// Set the number of hostnames in the active snapshot.
    #[allow(clippy::cast_precision_loss)]
    pub fn directory_hostnames(count: usize) {
        gauge!("podhost_directory_hostnames").set(count as f64);
    }

    // ==================== API Metrics ====================

    /// Record a completed API request.
    pub fn api_request(method: &str, status: u16, latency_seconds: f64) {
        counter!(
            "podhost_api_request_total",
            "method" => method.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
        histogram!(
            "podhost_api_request_latency_seconds",
            "method" => method.to_string()
        )
        .record(latency_seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Without an installed recorder these calls are no-ops; they must not panic.

    #[test]
    fn test_routing_metrics() {
        PodhostMetrics::routing_decision("rewrite", "resolved");
        PodhostMetrics::routing_decision("unresolved", "not_found");
        PodhostMetrics::forged_header_stripped(2);
    }

    #[test]
    fn test_directory_metrics() {
        PodhostMetrics::directory_lookup("resolved", 0.000_2);
        PodhostMetrics::directory_reload(true);
        PodhostMetrics::directory_reload(false);
        PodhostMetrics::directory_hostnames(4);
    }

    #[test]
    fn test_api_metrics() {
        PodhostMetrics::api_request("GET", 200, 0.003);
    }
}
