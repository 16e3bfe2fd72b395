use std::time::Instant;

use tracing::{debug, trace};

use crate::config::{Inference, SolverConfig, ValueOrder, VariableOrder};
use crate::csp::{Assignment, Csp, Value, VarId};
use crate::stats::{SearchStats, SolveStatus};

use super::heuristics::value::{DefaultValueHeuristic, LcvHeuristic, ValueHeuristic};
use super::heuristics::variable::{
    DefaultHeuristic, DomWdegHeuristic, MrvHeuristic, VariableHeuristic,
};
use super::propagation::{
    ac3_after_assignment, ac3_full, blamed_assigned_vars, forward_check, Wipeout,
};
use super::Domains;

/// What a failed recursion frame reports to its parent.
struct Backjump<V: VarId> {
    /// The variable whose remaining candidates should still be tried.
    /// `None` means the whole tree is exhausted — the root has no solution.
    target: Option<V>,
    /// Accumulated blame, merged upward as the jump unwinds.
    conflict_set: Vec<V>,
}

enum StepResult<V: VarId, D: Value> {
    Solved(Assignment<V, D>),
    Failed(Backjump<V>),
    BudgetExceeded,
}

/// Chronological and conflict-directed backjumping backtracking search.
/// Inference (none/FC/MAC) and both heuristics are pluggable.
pub struct BacktrackingSearch<V: VarId, D: Value> {
    variable_heuristic: Box<dyn VariableHeuristic<V, D>>,
    value_heuristic: Box<dyn ValueHeuristic<V, D>>,
}

impl<V: VarId, D: Value> BacktrackingSearch<V, D> {
    pub fn new(config: &SolverConfig) -> Self {
        let variable_heuristic: Box<dyn VariableHeuristic<V, D>> = match config.variable_order {
            VariableOrder::Default => Box::new(DefaultHeuristic),
            VariableOrder::Mrv => Box::new(MrvHeuristic),
            VariableOrder::DomWdeg => Box::new(DomWdegHeuristic),
        };
        let value_heuristic: Box<dyn ValueHeuristic<V, D>> = match config.value_order {
            ValueOrder::Default => Box::new(DefaultValueHeuristic),
            ValueOrder::Lcv => Box::new(LcvHeuristic),
        };
        Self {
            variable_heuristic,
            value_heuristic,
        }
    }

    pub fn solve(
        &self,
        csp: &Csp<V, D>,
        config: &SolverConfig,
        stats: &mut SearchStats,
    ) -> (Option<Assignment<V, D>>, Vec<u32>) {
        self.solve_with_weights(csp, config, csp.initial_weights(), stats)
    }

    /// Like [`Self::solve`], but seeds constraint weights from `weights`
    /// instead of the CSP's all-ones template. Used by [`crate::weighted::WeightedCsp`]
    /// to carry dom/wdeg weights forward across consecutive solves.
    pub fn solve_with_weights(
        &self,
        csp: &Csp<V, D>,
        config: &SolverConfig,
        mut weights: Vec<u32>,
        stats: &mut SearchStats,
    ) -> (Option<Assignment<V, D>>, Vec<u32>) {
        let start = Instant::now();
        let deadline = config.time_limit.map(|limit| start + limit);
        let mut domains: Domains<V, D> = csp.clone_domains();
        let mut assignment = Assignment::new();

        if config.inference == Inference::Mac {
            let (_, wipeout) = ac3_full(csp, &mut domains, &assignment, stats);
            if wipeout.is_some() {
                debug!("root arc-consistency check failed, problem is unsolvable");
                stats.status = SolveStatus::Unsolvable;
                stats.runtime_seconds = start.elapsed().as_secs_f64();
                return (None, weights);
            }
        }

        let result = self.search(
            csp,
            config,
            &mut domains,
            &mut assignment,
            &mut weights,
            stats,
            deadline,
        );

        stats.runtime_seconds = start.elapsed().as_secs_f64();
        match result {
            StepResult::Solved(solution) => {
                stats.status = SolveStatus::Solved;
                (Some(solution), weights)
            }
            StepResult::Failed(_) => {
                stats.status = SolveStatus::Unsolvable;
                (None, weights)
            }
            StepResult::BudgetExceeded => {
                stats.status = SolveStatus::BudgetExceeded;
                (None, weights)
            }
        }
    }

    fn deepest<'a>(&self, assignment: &Assignment<V, D>, conflict_set: &'a [V]) -> Option<&'a V> {
        conflict_set
            .iter()
            .max_by_key(|v| assignment.position_of(v).unwrap_or(0))
    }

    #[allow(clippy::too_many_arguments)]
    fn search(
        &self,
        csp: &Csp<V, D>,
        config: &SolverConfig,
        domains: &mut Domains<V, D>,
        assignment: &mut Assignment<V, D>,
        weights: &mut [u32],
        stats: &mut SearchStats,
        deadline: Option<Instant>,
    ) -> StepResult<V, D> {
        if assignment.len() == csp.variables().len() {
            return StepResult::Solved(assignment.clone());
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            return StepResult::BudgetExceeded;
        }

        let Some(x) = self
            .variable_heuristic
            .select(csp, domains, assignment, weights)
        else {
            return StepResult::Solved(assignment.clone());
        };

        let values = self.value_heuristic.order(csp, domains, assignment, &x);
        let mut conflict_set: Vec<V> = Vec::new();

        for v in values {
            if let Some(cid) = first_violated_constraint(csp, assignment, &x, &v, stats) {
                if config.use_cbj {
                    conflict_set.extend(blamed_assigned_vars(csp, cid, &x, assignment));
                }
                continue;
            }

            let saved_domain = domains[&x].clone();
            domains.insert(x.clone(), crate::csp::Domain::new([v.clone()]));
            assignment.push(x.clone(), v.clone());
            stats.assignments += 1;

            let (trail, wipeout) = run_inference(csp, config, domains, assignment, &x, stats);

            if let Some(Wipeout { constraint, .. }) = wipeout {
                if config.variable_order == VariableOrder::DomWdeg {
                    weights[constraint] += 1;
                }
                if config.use_cbj {
                    conflict_set.extend(blamed_assigned_vars(csp, constraint, &x, assignment));
                }
                trail.undo(domains);
                domains.insert(x.clone(), saved_domain);
                assignment.pop();
                stats.backtracks += 1;
                continue;
            }

            match self.search(csp, config, domains, assignment, weights, stats, deadline) {
                StepResult::Solved(solution) => return StepResult::Solved(solution),
                StepResult::BudgetExceeded => return StepResult::BudgetExceeded,
                StepResult::Failed(bj) => {
                    trail.undo(domains);
                    domains.insert(x.clone(), saved_domain);
                    assignment.pop();
                    stats.backtracks += 1;

                    match bj.target {
                        Some(target) if target != x => {
                            conflict_set.extend(bj.conflict_set.into_iter().filter(|v| v != &x));
                            return StepResult::Failed(Backjump {
                                target: Some(target),
                                conflict_set,
                            });
                        }
                        Some(_) => {
                            conflict_set.extend(bj.conflict_set.into_iter().filter(|v| v != &x));
                        }
                        None => {
                            return StepResult::Failed(Backjump {
                                target: None,
                                conflict_set: bj.conflict_set,
                            });
                        }
                    }
                }
            }
        }

        trace!(?x, "exhausted candidates");

        let target = if config.use_cbj {
            self.deepest(assignment, &conflict_set)
                .cloned()
                .or_else(|| assignment.last().cloned())
        } else {
            assignment.last().cloned()
        };

        StepResult::Failed(Backjump {
            target,
            conflict_set,
        })
    }
}

/// Checks `x = v` against every constraint of `x` whose scope is already
/// fully bound once `x` is included. Returns the id of the first violated
/// constraint found, if any.
fn first_violated_constraint<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    assignment: &Assignment<V, D>,
    x: &V,
    v: &D,
    stats: &mut SearchStats,
) -> Option<crate::csp::ConstraintId> {
    for &cid in csp.constraints_of(x) {
        let constraint = &csp.constraints()[cid];
        let scope = constraint.scope();
        let fully_bound = scope
            .iter()
            .all(|s| s == x || assignment.contains(s));
        if !fully_bound {
            continue;
        }

        let mut probe = Assignment::new();
        for s in scope {
            if s == x {
                probe.push(s.clone(), v.clone());
            } else if let Some(val) = assignment.get(s) {
                probe.push(s.clone(), val.clone());
            }
        }

        stats.constraint_checks += 1;
        if !constraint.is_satisfied(&probe) {
            return Some(cid);
        }
    }
    None
}

fn run_inference<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    config: &SolverConfig,
    domains: &mut Domains<V, D>,
    assignment: &Assignment<V, D>,
    x: &V,
    stats: &mut SearchStats,
) -> (super::propagation::Trail<V, D>, Option<Wipeout<V>>) {
    match config.inference {
        Inference::None => (super::propagation::Trail::new(), None),
        Inference::Fc => forward_check(csp, domains, assignment, x, stats),
        Inference::Mac => ac3_after_assignment(csp, domains, assignment, x, stats),
        Inference::MinConflicts => (super::propagation::Trail::new(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::constraint::{all_different, Constraint, NotEqual};
    use crate::csp::Domain;
    use crate::stats::SolveStatus;
    use std::collections::HashMap as StdHashMap;

    fn trivial_sat() -> Csp<&'static str, i32> {
        let variables = vec!["A", "B"];
        let mut domains = StdHashMap::new();
        domains.insert("A", Domain::new([1, 2]));
        domains.insert("B", Domain::new([1, 2]));
        let constraints: Vec<Box<dyn Constraint<&str, i32>>> =
            vec![Box::new(NotEqual::new("A", "B"))];
        Csp::new(variables, domains, constraints).unwrap()
    }

    #[test]
    fn two_vars_not_equal_solves_without_backtracking() {
        let csp = trivial_sat();
        let mut stats = SearchStats::new();
        let search = BacktrackingSearch::new(&SolverConfig::default());
        let (solution, _) = search.solve(&csp, &SolverConfig::default(), &mut stats);
        assert!(solution.is_some());
        assert_eq!(stats.backtracks, 0);
        assert!(stats.constraint_checks <= 3);
    }

    #[test]
    fn all_different_over_three_binary_values_is_unsolvable() {
        let variables = vec!["A", "B", "C"];
        let mut domains = StdHashMap::new();
        for v in &variables {
            domains.insert(*v, Domain::new([0, 1]));
        }
        let constraints = all_different(&variables);
        let csp = Csp::new(variables, domains, constraints).unwrap();

        let mut stats = SearchStats::new();
        let config = SolverConfig::default();
        let search = BacktrackingSearch::new(&config);
        let (solution, _) = search.solve(&csp, &config, &mut stats);
        assert!(solution.is_none());
        assert_eq!(stats.status, SolveStatus::Unsolvable);
    }

    fn k4(k: u32) -> Csp<u32, u32> {
        let variables: Vec<u32> = (0..4).collect();
        let mut domains = StdHashMap::new();
        for &v in &variables {
            domains.insert(v, Domain::new(0..k));
        }
        let mut constraints: Vec<Box<dyn Constraint<u32, u32>>> = Vec::new();
        for i in 0..4 {
            for j in (i + 1)..4 {
                constraints.push(Box::new(NotEqual::new(i, j)));
            }
        }
        Csp::new(variables, domains, constraints).unwrap()
    }

    #[test]
    fn k4_unsatisfiable_cbj_backtracks_at_most_chronological() {
        let csp = k4(3);

        let chronological_config = SolverConfig {
            use_cbj: false,
            ..SolverConfig::default()
        };
        let mut chronological_stats = SearchStats::new();
        let search = BacktrackingSearch::new(&chronological_config);
        let (solution, _) =
            search.solve(&csp, &chronological_config, &mut chronological_stats);
        assert!(solution.is_none());

        let cbj_config = SolverConfig {
            use_cbj: true,
            ..SolverConfig::default()
        };
        let mut cbj_stats = SearchStats::new();
        let search = BacktrackingSearch::new(&cbj_config);
        let (solution, _) = search.solve(&csp, &cbj_config, &mut cbj_stats);
        assert!(solution.is_none());

        assert!(cbj_stats.backtracks <= chronological_stats.backtracks);
    }

    #[test]
    fn determinism_same_seed_same_stats() {
        let csp = k4(4);
        let config = SolverConfig {
            variable_order: VariableOrder::DomWdeg,
            use_cbj: true,
            ..SolverConfig::default()
        };
        let search = BacktrackingSearch::new(&config);

        let mut stats_a = SearchStats::new();
        let (solution_a, _) = search.solve(&csp, &config, &mut stats_a);
        let mut stats_b = SearchStats::new();
        let (solution_b, _) = search.solve(&csp, &config, &mut stats_b);

        assert_eq!(solution_a.is_some(), solution_b.is_some());
        assert_eq!(stats_a.backtracks, stats_b.backtracks);
        assert_eq!(stats_a.assignments, stats_b.assignments);
        assert_eq!(stats_a.constraint_checks, stats_b.constraint_checks);
    }

    #[test]
    fn weights_are_non_decreasing_over_a_solve() {
        let csp = k4(3);
        let config = SolverConfig {
            variable_order: VariableOrder::DomWdeg,
            ..SolverConfig::default()
        };
        let mut stats = SearchStats::new();
        let search = BacktrackingSearch::new(&config);
        let (_, final_weights) = search.solve(&csp, &config, &mut stats);
        for &w in &final_weights {
            assert!(w >= 1);
        }
    }

    #[test]
    fn soundness_every_solution_satisfies_every_constraint() {
        let csp = trivial_sat();
        let config = SolverConfig::default();
        let mut stats = SearchStats::new();
        let search = BacktrackingSearch::new(&config);
        let (solution, _) = search.solve(&csp, &config, &mut stats);
        let solution = solution.unwrap();
        for constraint in csp.constraints() {
            assert!(constraint.is_satisfied(&solution));
        }
    }

    #[test]
    fn completeness_agrees_with_exhaustive_enumeration() {
        // k4(3) is unsatisfiable: 3 colors can't properly color 4 mutually
        // adjacent vertices. Brute force over every 3^4 coloring confirms it.
        let csp = k4(3);
        let brute_force_solvable = (0u32..3u32.pow(4)).any(|packed| {
            let colors = [packed % 3, (packed / 3) % 3, (packed / 9) % 3, (packed / 27) % 3];
            (0..4).all(|i| {
                ((i + 1)..4).all(|j| colors[i] != colors[j])
            })
        });
        assert!(!brute_force_solvable);

        let config = SolverConfig::default();
        let mut stats = SearchStats::new();
        let search = BacktrackingSearch::new(&config);
        let (solution, _) = search.solve(&csp, &config, &mut stats);
        assert!(solution.is_none());
        assert_eq!(stats.status, SolveStatus::Unsolvable);
    }

    #[test]
    fn cbj_safeness_agrees_with_chronological_on_satisfiability() {
        for k in [2, 3, 4] {
            let csp = k4(k);
            let chronological = SolverConfig {
                use_cbj: false,
                ..SolverConfig::default()
            };
            let cbj = SolverConfig {
                use_cbj: true,
                ..SolverConfig::default()
            };
            let mut stats_a = SearchStats::new();
            let search_a = BacktrackingSearch::new(&chronological);
            let (solution_a, _) = search_a.solve(&csp, &chronological, &mut stats_a);

            let mut stats_b = SearchStats::new();
            let search_b = BacktrackingSearch::new(&cbj);
            let (solution_b, _) = search_b.solve(&csp, &cbj, &mut stats_b);

            assert_eq!(solution_a.is_some(), solution_b.is_some());
        }
    }
}

