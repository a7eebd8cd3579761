//! MILP formulation of the patch planning problem.
//!
//! Decision variables:
//! - `assign[p][w]` — binary, patch `p` lands in window `w`
//! - `selected[p]` — binary, patch `p` is scheduled in some window
//!
//! Windows only matter for feasibility (budgets, dependency ordering); the
//! objective is linear in `selected`, so *which* window a patch lands in
//! never changes the objective value.

use std::collections::{HashMap, HashSet};

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};

use crate::models::{MaintenanceWindow, OptimizationWeights, Patch};
use crate::planner::scoring;
use crate::planner::OptimizeOptions;

/// A fully formulated model, ready to hand to the solver backend.
pub struct ScheduleModel {
    pub vars: ProblemVariables,
    pub objective: Expression,
    pub constraints: Vec<Constraint>,
    /// `assign[p][w]`, indexed by catalog position.
    pub assign: Vec<Vec<Variable>>,
    /// `selected[p]`, indexed by catalog position.
    pub selected: Vec<Variable>,
}

/// Build variables, constraints and objective for the given catalog slice.
pub fn build_model(
    windows: &[MaintenanceWindow],
    patches: &[Patch],
    weights: &OptimizationWeights,
    opts: &OptimizeOptions,
) -> ScheduleModel {
    let patch_index: HashMap<&str, usize> = patches
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.as_str(), i))
        .collect();

    let mut vars = ProblemVariables::new();
    let assign: Vec<Vec<Variable>> = patches
        .iter()
        .map(|_| windows.iter().map(|_| vars.add(variable().binary())).collect())
        .collect();
    let selected: Vec<Variable> = patches.iter().map(|_| vars.add(variable().binary())).collect();

    let mut constraints = Vec::new();

    // Each patch is either assigned to exactly one window or not scheduled.
    for (p, patch_row) in assign.iter().enumerate() {
        let mut assigned = Expression::from(0.0);
        for &var in patch_row {
            assigned += var;
        }
        constraints.push(constraint!(assigned == selected[p]));
    }

    // Window budgets.
    for (w, window) in windows.iter().enumerate() {
        let mut downtime = Expression::from(0.0);
        let mut cost = Expression::from(0.0);
        for (p, patch) in patches.iter().enumerate() {
            downtime += f64::from(patch.downtime_minutes) * assign[p][w];
            cost += patch.eng_cost * assign[p][w];
        }
        constraints.push(constraint!(downtime <= f64::from(window.downtime_budget_minutes)));
        constraints.push(constraint!(cost <= window.eng_cost_budget));
    }

    // Dependencies:
    // - selection: can't schedule A unless B is scheduled
    // - ordering: window index of A must be >= window index of B
    for (a, patch) in patches.iter().enumerate() {
        for dep in &patch.depends_on {
            let Some(&b) = patch_index.get(dep.as_str()) else {
                continue; // dangling dependency, treated as satisfied
            };
            constraints.push(constraint!(selected[a] <= selected[b]));

            let mut order_a = Expression::from(0.0);
            let mut order_b = Expression::from(0.0);
            for w in 0..windows.len() {
                order_a += (w as f64) * assign[a][w];
                order_b += (w as f64) * assign[b][w];
            }
            constraints.push(constraint!(order_a >= order_b));
        }
    }

    // Forced decisions are hard constraints and may make the model infeasible.
    let force_include: HashSet<&str> = opts.force_include.iter().map(String::as_str).collect();
    let force_exclude: HashSet<&str> = opts.force_exclude.iter().map(String::as_str).collect();
    for (p, patch) in patches.iter().enumerate() {
        if force_include.contains(patch.id.as_str()) {
            constraints.push(constraint!(selected[p] == 1.0));
        }
        if force_exclude.contains(patch.id.as_str()) {
            constraints.push(constraint!(selected[p] == 0.0));
        }
    }

    // Objective: maximize weighted risk reduction net of cost and outage risk.
    let mut objective = Expression::from(0.0);
    for (p, patch) in patches.iter().enumerate() {
        let gain = weights.risk * scoring::risk_reduction(patch)
            - weights.cost * patch.eng_cost
            - weights.outage * scoring::outage_risk(patch);
        objective += gain * selected[p];
    }

    ScheduleModel {
        vars,
        objective,
        constraints,
        assign,
        selected,
    }
}
