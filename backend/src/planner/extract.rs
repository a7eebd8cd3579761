//! Converts raw solver output into the grouped, ordered schedule.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{
    MaintenanceWindow, OptimizationWeights, OptimizeResult, Patch, PatchScore, ScheduledPatch,
    WindowSummary,
};
use crate::planner::graph::DependencyGraph;
use crate::planner::solver::SolverOutcome;
use crate::planner::{explain, OptimizeOptions};

/// Build the final result from solver output.
///
/// Selected patches are grouped by their assigned window (the first window
/// flagged for a patch, since at most one can be active), ordered inside
/// each window by dependency precedence, then explained. Summaries are
/// emitted for every window, including empty ones.
pub fn extract(
    windows: &[MaintenanceWindow],
    patches: &[Patch],
    weights: &OptimizationWeights,
    graph: &DependencyGraph,
    outcome: &SolverOutcome,
    opts: &OptimizeOptions,
) -> OptimizeResult {
    let patch_by_id: HashMap<&str, &Patch> = patches.iter().map(|p| (p.id.as_str(), p)).collect();

    // Group scheduled patches by window, in catalog order.
    let mut by_window: Vec<Vec<String>> = vec![Vec::new(); windows.len()];
    let mut deferred: Vec<PatchScore> = Vec::new();
    let mut selected_ids: HashSet<&str> = HashSet::new();

    for (p, patch) in patches.iter().enumerate() {
        if outcome.selected[p] {
            selected_ids.insert(patch.id.as_str());
            if let Some(w) = outcome.assign[p].iter().position(|&v| v) {
                by_window[w].push(patch.id.clone());
            }
        } else {
            deferred.push(PatchScore::compute(patch, weights));
        }
    }

    // Dependency-consistent order inside each window.
    let ordered: Vec<Vec<String>> = by_window
        .iter()
        .map(|ids| graph.order_subset(ids))
        .collect();

    // Budgets actually used per window, quoted in the rationale text.
    let used_downtime: Vec<u32> = ordered
        .iter()
        .map(|ids| {
            ids.iter()
                .filter_map(|id| patch_by_id.get(id.as_str()))
                .map(|p| p.downtime_minutes)
                .sum()
        })
        .collect();
    let used_cost: Vec<f64> = ordered
        .iter()
        .map(|ids| {
            ids.iter()
                .filter_map(|id| patch_by_id.get(id.as_str()))
                .map(|p| p.eng_cost)
                .sum()
        })
        .collect();

    let mut scheduled = Vec::new();
    let mut window_summaries = BTreeMap::new();

    for (w, window) in windows.iter().enumerate() {
        let mut summary = WindowSummary::default();

        for (order, id) in ordered[w].iter().enumerate() {
            let Some(&patch) = patch_by_id.get(id.as_str()) else {
                continue;
            };
            let score = PatchScore::compute(patch, weights);
            let why = explain::scheduled_rationale(
                patch,
                graph,
                window,
                used_downtime[w],
                used_cost[w],
            );

            summary.risk_reduction_total += score.risk_reduction;
            summary.eng_cost_total += score.eng_cost;
            summary.outage_risk_total += score.outage_risk;
            summary.downtime_minutes_total += f64::from(patch.downtime_minutes);

            scheduled.push(ScheduledPatch {
                patch_id: patch.id.clone(),
                window_id: window.id.clone(),
                order_in_window: order + 1,
                score,
                why,
            });
        }

        window_summaries.insert(window.id.clone(), summary);
    }

    // Deferred notes, then surface the highest-value deferrals first.
    let max_downtime = windows
        .iter()
        .map(|w| w.downtime_budget_minutes)
        .max()
        .unwrap_or(0);
    let max_cost = windows
        .iter()
        .map(|w| w.eng_cost_budget)
        .fold(0.0_f64, f64::max);
    let force_exclude: HashSet<&str> = opts.force_exclude.iter().map(String::as_str).collect();

    let mut deferred_notes = BTreeMap::new();
    for score in &deferred {
        let Some(&patch) = patch_by_id.get(score.patch_id.as_str()) else {
            continue;
        };
        deferred_notes.insert(
            patch.id.clone(),
            explain::deferred_notes(
                patch,
                weights,
                graph,
                &selected_ids,
                &force_exclude,
                max_downtime,
                max_cost,
            ),
        );
    }

    deferred.sort_by(|a, b| {
        b.weighted_total
            .partial_cmp(&a.weighted_total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    OptimizeResult {
        status: outcome.status,
        weights: *weights,
        scheduled,
        deferred,
        window_summaries,
        deferred_notes,
    }
}
