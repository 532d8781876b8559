//! Prometheus metrics for the HTTP API.
//!
//! [`ApiMetrics`] owns a dedicated [`Registry`] that the `/metrics`
//! endpoint encodes into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

use crate::RpcError;

pub struct ApiMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Votes applied.
    pub votes_cast: IntCounter,
    /// Votes refused because the voter already voted in the pair.
    pub votes_rejected: IntCounter,
    pub candidates_created: IntCounter,
    pub candidates_deleted: IntCounter,
    /// Ledger entries stripped by candidate deletions.
    pub ledger_entries_removed: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Drifted tallies found by the most recent audit.
    pub audit_drifts: IntGauge,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let votes_cast = register_int_counter_with_registry!(
            Opts::new("ballot_votes_cast_total", "Total votes applied"),
            registry
        )?;
        let votes_rejected = register_int_counter_with_registry!(
            Opts::new(
                "ballot_votes_rejected_total",
                "Total votes refused because the pair was already voted"
            ),
            registry
        )?;
        let candidates_created = register_int_counter_with_registry!(
            Opts::new("ballot_candidates_created_total", "Total candidates created"),
            registry
        )?;
        let candidates_deleted = register_int_counter_with_registry!(
            Opts::new("ballot_candidates_deleted_total", "Total candidates deleted"),
            registry
        )?;
        let ledger_entries_removed = register_int_counter_with_registry!(
            Opts::new(
                "ballot_ledger_entries_removed_total",
                "Total ledger entries stripped by candidate deletions"
            ),
            registry
        )?;
        let audit_drifts = register_int_gauge_with_registry!(
            Opts::new(
                "ballot_audit_drifts",
                "Tallies disagreeing with the ledgers at the last audit"
            ),
            registry
        )?;

        Ok(Self {
            registry,
            votes_cast,
            votes_rejected,
            candidates_created,
            candidates_deleted,
            ledger_entries_removed,
            audit_drifts,
        })
    }

    /// Render every registered metric in the text exposition format.
    pub fn encode(&self) -> Result<String, RpcError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|e| RpcError::Internal(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| RpcError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let metrics = ApiMetrics::new().unwrap();
        metrics.votes_cast.inc();
        metrics.votes_cast.inc();
        let text = metrics.encode().unwrap();
        assert!(text.contains("ballot_votes_cast_total 2"));
        assert!(text.contains("ballot_candidates_deleted_total 0"));
    }
}
