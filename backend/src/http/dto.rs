//! Data Transfer Objects for the HTTP API.
//!
//! Wire field names match the original frontend contract; the core domain
//! types already derive Serialize/Deserialize and are re-exported here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use crate::models::{
    MaintenanceWindow, OptimizationWeights, OptimizeResult, Patch, PatchScore, ScheduledPatch,
    SolveStatus, WindowSummary,
};

/// Request body for `POST /api/optimize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub weights: OptimizationWeights,
    /// Restrict scheduling to the first N windows.
    #[serde(default)]
    pub max_windows: Option<usize>,
    /// Patch ids that must be scheduled.
    #[serde(default)]
    pub force_include: Vec<String>,
    /// Patch ids that must not be scheduled.
    #[serde(default)]
    pub force_exclude: Vec<String>,
}

/// Response body for `POST /api/optimize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub status: SolveStatus,
    pub weights_normalized: OptimizationWeights,
    pub scheduled: Vec<ScheduledPatch>,
    pub deferred: Vec<PatchScore>,
    pub window_summaries: BTreeMap<String, WindowSummary>,
    #[serde(default)]
    pub deferred_notes: BTreeMap<String, Vec<String>>,
}

impl From<OptimizeResult> for OptimizeResponse {
    fn from(result: OptimizeResult) -> Self {
        Self {
            status: result.status,
            weights_normalized: result.weights,
            scheduled: result.scheduled,
            deferred: result.deferred,
            window_summaries: result.window_summaries,
            deferred_notes: result.deferred_notes,
        }
    }
}

/// Response for `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Response for `GET /api/version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimize_request_defaults() {
        let req: OptimizeRequest =
            serde_json::from_str(r#"{"weights": {"risk": 1, "cost": 0, "outage": 0}}"#).unwrap();
        assert!(req.max_windows.is_none());
        assert!(req.force_include.is_empty());
        assert!(req.force_exclude.is_empty());
    }

    #[test]
    fn test_optimize_response_field_names() {
        let result = OptimizeResult {
            status: SolveStatus::Optimal,
            weights: OptimizationWeights {
                risk: 1.0,
                cost: 0.0,
                outage: 0.0,
            },
            scheduled: vec![],
            deferred: vec![],
            window_summaries: BTreeMap::new(),
            deferred_notes: BTreeMap::new(),
        };
        let response: OptimizeResponse = result.into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"weights_normalized\""));
        assert!(json.contains("\"status\":\"optimal\""));
    }
}
