//! Patch scheduling engine.
//!
//! The pipeline runs per request over the read-only catalog:
//! normalize weights → build dependency graph → reject cycles → build MILP
//! model → solve → extract schedule → explain. Every stage consumes the
//! previous stage's output and produces a new value; nothing is shared or
//! mutated across concurrent requests.

pub mod explain;
pub mod extract;
pub mod graph;
pub mod model;
pub mod scoring;
pub mod solver;

use tracing::{debug, info};

use crate::models::{MaintenanceWindow, OptimizationWeights, OptimizeResult, Patch};
use graph::DependencyGraph;

/// Errors that abort an optimization request.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Declared dependencies form a cycle; the dependency set is rejected
    /// instead of propagating a silently-wrong ordering.
    #[error("cyclic dependency detected involving patch '{0}'")]
    CyclicDependency(String),
    /// The MILP backend failed. Not retried; fatal for this request.
    #[error("solver backend failure: {0}")]
    Solver(String),
}

/// Caller-supplied knobs beyond the weights.
#[derive(Debug, Clone, Default)]
pub struct OptimizeOptions {
    /// Restrict scheduling to the first N windows of the catalog.
    pub max_windows: Option<usize>,
    /// Patch ids that must be scheduled (hard constraint).
    pub force_include: Vec<String>,
    /// Patch ids that must not be scheduled (hard constraint).
    pub force_exclude: Vec<String>,
}

/// Solve the patch planning problem and explain the outcome.
///
/// Deterministic for identical inputs. An infeasible model (e.g. from
/// conflicting forced decisions) still returns a well-formed result with an
/// empty schedule; only cyclic dependency sets and backend failures error.
pub fn optimize_schedule(
    windows: &[MaintenanceWindow],
    patches: &[Patch],
    weights: &OptimizationWeights,
    opts: &OptimizeOptions,
) -> Result<OptimizeResult, PlannerError> {
    let weights = scoring::normalize_weights(weights);

    let windows = match opts.max_windows {
        Some(n) => &windows[..n.min(windows.len())],
        None => windows,
    };

    let graph = DependencyGraph::build(patches);
    if let Some(id) = graph.find_cycle() {
        return Err(PlannerError::CyclicDependency(id));
    }

    debug!(
        windows = windows.len(),
        patches = patches.len(),
        "building schedule model"
    );
    let model = model::build_model(windows, patches, &weights, opts);
    let outcome = solver::solve(model)?;

    let result = extract::extract(windows, patches, &weights, &graph, &outcome, opts);
    info!(
        status = ?result.status,
        scheduled = result.scheduled.len(),
        deferred = result.deferred.len(),
        "optimization finished"
    );
    Ok(result)
}
