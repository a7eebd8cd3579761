//! Solver capability boundary.
//!
//! The planner only builds the model; the actual search is delegated to the
//! MILP backend selected at compile time through `good_lp`'s feature flags
//! (pure-Rust `microlp` by default, Coin-OR CBC optionally). The call is
//! synchronous and is not retried here.

use good_lp::{default_solver, ResolutionError, Solution, SolverModel};
use tracing::debug;

use crate::models::SolveStatus;
use crate::planner::model::ScheduleModel;
use crate::planner::PlannerError;

/// Rounding policy for backends that report binary variables as floats.
pub const BINARY_THRESHOLD: f64 = 0.5;

/// Concrete 0/1 assignment returned by the backend.
pub struct SolverOutcome {
    pub status: SolveStatus,
    /// `selected[p]` by catalog position.
    pub selected: Vec<bool>,
    /// `assign[p][w]` by catalog position.
    pub assign: Vec<Vec<bool>>,
}

/// Run the backend on a formulated model.
///
/// Infeasible (and unbounded, which the formulation cannot produce with a
/// finite catalog) maps to an empty-selection outcome rather than an error;
/// backend failures are fatal for the request.
pub fn solve(model: ScheduleModel) -> Result<SolverOutcome, PlannerError> {
    let ScheduleModel {
        vars,
        objective,
        constraints,
        assign,
        selected,
    } = model;

    let n_constraints = constraints.len();
    let mut problem = vars.maximise(objective).using(default_solver);
    for c in constraints {
        problem = problem.with(c);
    }

    match problem.solve() {
        Ok(solution) => {
            let selected_vals: Vec<bool> = selected
                .iter()
                .map(|&v| solution.value(v) >= BINARY_THRESHOLD)
                .collect();
            let assign_vals: Vec<Vec<bool>> = assign
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|&v| solution.value(v) >= BINARY_THRESHOLD)
                        .collect()
                })
                .collect();
            debug!(
                constraints = n_constraints,
                scheduled = selected_vals.iter().filter(|s| **s).count(),
                "solver returned a solution"
            );
            Ok(SolverOutcome {
                status: SolveStatus::Optimal,
                selected: selected_vals,
                assign: assign_vals,
            })
        }
        Err(ResolutionError::Infeasible) | Err(ResolutionError::Unbounded) => {
            debug!(constraints = n_constraints, "model is infeasible");
            Ok(SolverOutcome {
                status: SolveStatus::Infeasible,
                selected: vec![false; selected.len()],
                assign: assign.iter().map(|row| vec![false; row.len()]).collect(),
            })
        }
        Err(e) => Err(PlannerError::Solver(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaintenanceWindow, OptimizationWeights, Patch};
    use crate::planner::model::build_model;
    use crate::planner::OptimizeOptions;

    fn window(id: &str, downtime: u32, cost: f64) -> MaintenanceWindow {
        MaintenanceWindow {
            id: id.to_string(),
            title: id.to_string(),
            start_iso: "2025-03-01T22:00:00Z".to_string(),
            end_iso: "2025-03-02T02:00:00Z".to_string(),
            downtime_budget_minutes: downtime,
            eng_cost_budget: cost,
        }
    }

    fn patch(id: &str, downtime: u32) -> Patch {
        Patch {
            id: id.to_string(),
            name: format!("patch {id}"),
            asset: "host".to_string(),
            asset_criticality: 4,
            cve: "CVE-2024-0000".to_string(),
            cvss: 8.0,
            epss_like: 0.6,
            kev: false,
            downtime_minutes: downtime,
            eng_cost: 1.0,
            change_risk: 0.1,
            depends_on: vec![],
        }
    }

    fn weights() -> OptimizationWeights {
        OptimizationWeights {
            risk: 1.0,
            cost: 0.0,
            outage: 0.0,
        }
    }

    #[test]
    fn test_solve_selects_profitable_patch() {
        let windows = vec![window("w1", 60, 5.0)];
        let patches = vec![patch("p1", 30)];
        let model = build_model(&windows, &patches, &weights(), &OptimizeOptions::default());
        let outcome = solve(model).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.selected, vec![true]);
        assert_eq!(outcome.assign, vec![vec![true]]);
    }

    #[test]
    fn test_solve_defers_over_budget_patch() {
        let windows = vec![window("w1", 20, 5.0)];
        let patches = vec![patch("p1", 30)];
        let model = build_model(&windows, &patches, &weights(), &OptimizeOptions::default());
        let outcome = solve(model).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.selected, vec![false]);
    }

    #[test]
    fn test_infeasible_forced_inclusion() {
        // Forcing in a patch that cannot fit any window.
        let windows = vec![window("w1", 10, 5.0)];
        let patches = vec![patch("p1", 30)];
        let opts = OptimizeOptions {
            force_include: vec!["p1".to_string()],
            ..Default::default()
        };
        let model = build_model(&windows, &patches, &weights(), &opts);
        let outcome = solve(model).unwrap();
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert_eq!(outcome.selected, vec![false]);
    }
}
