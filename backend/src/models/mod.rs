//! Domain entities for the patch planner.
//!
//! All types here are request-scoped values: they are constructed from
//! caller-supplied input plus the read-only catalog, consumed within one
//! optimization call, and never mutated after construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A time-bounded, budget-constrained execution slot for patches.
///
/// Windows are totally ordered by their position in the catalog sequence;
/// that position is used as a proxy for chronological order in dependency
/// ordering constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    pub id: String,
    pub title: String,
    /// Window start as an ISO-8601 timestamp (wire format).
    pub start_iso: String,
    /// Window end as an ISO-8601 timestamp (wire format).
    pub end_iso: String,
    /// Total minutes of downtime this window can absorb.
    pub downtime_budget_minutes: u32,
    /// Total engineering cost this window can absorb.
    pub eng_cost_budget: f64,
}

impl MaintenanceWindow {
    /// Parsed start timestamp, if `start_iso` is valid RFC 3339.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.start_iso)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Parsed end timestamp, if `end_iso` is valid RFC 3339.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.end_iso)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// A discrete unit of remediation work against one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patch {
    pub id: String,
    pub name: String,
    pub asset: String,
    /// Business criticality of the asset, 1 (low) to 5 (critical).
    pub asset_criticality: u8,

    // security + exploitability signals
    pub cve: String,
    /// CVSS base severity, 0 to 10.
    pub cvss: f64,
    /// Probability-of-exploitation proxy, 0 to 1.
    pub epss_like: f64,
    /// Known-exploited-vulnerability flag.
    #[serde(default)]
    pub kev: bool,

    // ops signals
    pub downtime_minutes: u32,
    pub eng_cost: f64,
    /// Chance the patch itself causes an incident/outage, 0 to 1.
    pub change_risk: f64,

    /// Patch ids that must be scheduled no later than this one.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Relative importance of the three objective terms.
///
/// Callers may submit raw, unnormalized values (e.g. slider positions);
/// the planner normalizes them to sum to 1 before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationWeights {
    pub risk: f64,
    pub cost: f64,
    pub outage: f64,
}

/// Derived per-patch score under a set of normalized weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchScore {
    pub patch_id: String,
    pub risk_reduction: f64,
    pub eng_cost: f64,
    pub outage_risk: f64,
    pub weighted_total: f64,
}

/// A patch placed into a specific window by a successful solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledPatch {
    pub patch_id: String,
    pub window_id: String,
    /// 1-based position within the window, dependency-consistent.
    pub order_in_window: usize,
    pub score: PatchScore,
    /// Human-readable rationale strings, most significant first.
    pub why: Vec<String>,
}

/// Outcome reported by the MILP backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    Optimal,
    /// An incumbent solution exists but optimality was not proven.
    Feasible,
    Infeasible,
}

/// Per-window totals across its scheduled patches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowSummary {
    pub risk_reduction_total: f64,
    pub eng_cost_total: f64,
    pub outage_risk_total: f64,
    pub downtime_minutes_total: f64,
}

/// Full result of one optimization run.
///
/// An infeasible solve still yields a well-formed result: empty schedule,
/// every patch deferred with best-effort notes, zeroed window summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResult {
    pub status: SolveStatus,
    /// Weights after normalization, summing to 1.
    pub weights: OptimizationWeights,
    pub scheduled: Vec<ScheduledPatch>,
    /// Unscheduled patches, sorted by `weighted_total` descending.
    pub deferred: Vec<PatchScore>,
    pub window_summaries: BTreeMap<String, WindowSummary>,
    /// Short notes per deferred patch id.
    pub deferred_notes: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_patch() -> Patch {
        Patch {
            id: "p1".to_string(),
            name: "Kernel update".to_string(),
            asset: "db-core-01".to_string(),
            asset_criticality: 5,
            cve: "CVE-2024-0001".to_string(),
            cvss: 9.8,
            epss_like: 0.8,
            kev: true,
            downtime_minutes: 30,
            eng_cost: 2.0,
            change_risk: 0.3,
            depends_on: vec![],
        }
    }

    #[test]
    fn test_window_timestamp_parsing() {
        let window = MaintenanceWindow {
            id: "w1".to_string(),
            title: "Saturday night".to_string(),
            start_iso: "2025-03-01T22:00:00Z".to_string(),
            end_iso: "2025-03-02T02:00:00Z".to_string(),
            downtime_budget_minutes: 120,
            eng_cost_budget: 10.0,
        };
        let start = window.start().unwrap();
        let end = window.end().unwrap();
        assert!(start < end);
    }

    #[test]
    fn test_window_timestamp_parse_failure() {
        let window = MaintenanceWindow {
            id: "w1".to_string(),
            title: "bad".to_string(),
            start_iso: "not-a-timestamp".to_string(),
            end_iso: "also-bad".to_string(),
            downtime_budget_minutes: 0,
            eng_cost_budget: 0.0,
        };
        assert!(window.start().is_none());
        assert!(window.end().is_none());
    }

    #[test]
    fn test_patch_deserialization_defaults() {
        let json = r#"{
            "id": "p9", "name": "x", "asset": "a", "asset_criticality": 3,
            "cve": "CVE-2024-9999", "cvss": 5.0, "epss_like": 0.1,
            "downtime_minutes": 10, "eng_cost": 1.0, "change_risk": 0.2
        }"#;
        let patch: Patch = serde_json::from_str(json).unwrap();
        assert!(!patch.kev);
        assert!(patch.depends_on.is_empty());
    }

    #[test]
    fn test_solve_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SolveStatus::Optimal).unwrap(),
            "\"optimal\""
        );
        assert_eq!(
            serde_json::to_string(&SolveStatus::Infeasible).unwrap(),
            "\"infeasible\""
        );
    }

    #[test]
    fn test_patch_round_trip() {
        let patch = sample_patch();
        let json = serde_json::to_string(&patch).unwrap();
        let back: Patch = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, patch.id);
        assert_eq!(back.kev, patch.kev);
        assert_eq!(back.depends_on, patch.depends_on);
    }
}
