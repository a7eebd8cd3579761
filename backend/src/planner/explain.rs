//! Human-readable rationale for scheduled and deferred patches.
//!
//! These notes do not try to explain the MILP; they state the most likely
//! human reason in a fixed priority order.

use std::collections::HashSet;

use crate::models::{MaintenanceWindow, OptimizationWeights, Patch};
use crate::planner::graph::DependencyGraph;
use crate::planner::scoring;

/// Exploit-likelihood level above which a note is emitted.
const HIGH_EPSS: f64 = 0.50;
/// Criticality level at or above which a note is emitted.
const HIGH_CRITICALITY: u8 = 4;

/// Rationale strings for a patch placed into `window`, most significant first.
pub fn scheduled_rationale(
    patch: &Patch,
    graph: &DependencyGraph,
    window: &MaintenanceWindow,
    used_downtime: u32,
    used_cost: f64,
) -> Vec<String> {
    let mut why = Vec::new();

    // signal-based story
    if patch.kev {
        why.push("Known/assumed exploited (KEV-style boost).".to_string());
    }
    if patch.epss_like >= HIGH_EPSS {
        why.push(format!(
            "High exploit-likelihood (epss_like={:.2}).",
            patch.epss_like
        ));
    }
    if patch.asset_criticality >= HIGH_CRITICALITY {
        why.push(format!(
            "High business criticality (criticality={}/5).",
            patch.asset_criticality
        ));
    }

    // constraint story (dependencies)
    let prereqs: Vec<&str> = patch
        .depends_on
        .iter()
        .map(String::as_str)
        .filter(|d| graph.contains(d))
        .collect();
    if !prereqs.is_empty() {
        why.push(format!("Requires prerequisites: {}", prereqs.join(", ")));
    }

    let dependents = graph.dependents_of(&patch.id);
    if !dependents.is_empty() {
        why.push(format!(
            "Enables follow-up patches: {}",
            dependents.join(", ")
        ));
    }

    // budget fit / operational note
    why.push(format!(
        "Fits window budgets: {}/{} min downtime, {:.1}/{:.1} eng cost.",
        used_downtime, window.downtime_budget_minutes, used_cost, window.eng_cost_budget
    ));

    why
}

/// Short notes for a deferred patch, in strict priority order.
///
/// Structural reasons (manual exclusion, missing prerequisites, budgets) can
/// stack; the weight-driven heuristics only apply when no structural reason
/// matched.
pub fn deferred_notes(
    patch: &Patch,
    weights: &OptimizationWeights,
    graph: &DependencyGraph,
    selected_ids: &HashSet<&str>,
    force_exclude: &HashSet<&str>,
    max_downtime: u32,
    max_cost: f64,
) -> Vec<String> {
    let mut notes = Vec::new();

    if force_exclude.contains(patch.id.as_str()) {
        notes.push("Manually excluded.".to_string());
    }

    let missing: Vec<&str> = patch
        .depends_on
        .iter()
        .map(String::as_str)
        .filter(|d| graph.contains(d) && !selected_ids.contains(d))
        .collect();
    if !missing.is_empty() {
        notes.push(format!("Missing prerequisites: {}", missing.join(", ")));
    }

    if patch.downtime_minutes > max_downtime {
        notes.push(format!(
            "Downtime ({} min) exceeds every window budget.",
            patch.downtime_minutes
        ));
    }
    if patch.eng_cost > max_cost {
        notes.push(format!(
            "Cost ({}) exceeds every window budget.",
            patch.eng_cost
        ));
    }

    // Weight-driven hints, only when no structural reason applies.
    if notes.is_empty() {
        if weights.outage >= 0.45 && scoring::outage_risk(patch) >= 35.0 {
            notes.push("Deferred because outage impact is heavily weighted right now.".to_string());
        } else if weights.cost >= 0.45 && patch.eng_cost >= 4.0 {
            notes.push(
                "Deferred because engineering cost is heavily weighted right now.".to_string(),
            );
        } else {
            notes.push("Lower composite priority under current weights + budgets.".to_string());
        }
    }

    notes
}
