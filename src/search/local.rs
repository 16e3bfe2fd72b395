//! Min-conflicts local search: repeatedly repairs the most conflicted
//! variable instead of exploring a systematic search tree.

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::SolverConfig;
use crate::csp::{Assignment, Csp, Value, VarId};
use crate::stats::{SearchStats, SolveStatus};

use super::propagation::elapsed_seconds;

/// Counts how many of `var`'s constraints would be violated if it were bound
/// to `value`, given every other variable's value comes from `assignment`
/// when bound, ignored otherwise.
fn violations_for<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    assignment: &Assignment<V, D>,
    var: &V,
    value: &D,
) -> usize {
    csp.constraints_of(var)
        .iter()
        .filter(|&&cid| {
            let constraint = &csp.constraints()[cid];
            let scope = constraint.scope();
            let mut probe = Assignment::new();
            for s in scope {
                if s == var {
                    probe.push(s.clone(), value.clone());
                } else if let Some(v) = assignment.get(s) {
                    probe.push(s.clone(), v.clone());
                } else {
                    return false;
                }
            }
            !constraint.is_satisfied(&probe)
        })
        .count()
}

fn is_conflicted<V: VarId, D: Value>(csp: &Csp<V, D>, assignment: &Assignment<V, D>, var: &V) -> bool {
    let value = assignment.get(var).expect("local search keeps a total assignment");
    violations_for(csp, assignment, var, value) > 0
}

fn total_violations<V: VarId, D: Value>(csp: &Csp<V, D>, assignment: &Assignment<V, D>) -> usize {
    csp.constraints()
        .iter()
        .filter(|c| !c.is_satisfied(assignment))
        .count()
}

/// Picks the value(s) of `var`'s original domain that minimize `violations_for`,
/// breaking ties uniformly at random.
fn best_values_for<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    assignment: &Assignment<V, D>,
    var: &V,
    rng: &mut ChaCha8Rng,
) -> D {
    let domain = csp.original_domain(var);
    let mut best_count = usize::MAX;
    let mut best_values: Vec<D> = Vec::new();

    for value in domain.iter() {
        let count = violations_for(csp, assignment, var, value);
        match count.cmp(&best_count) {
            std::cmp::Ordering::Less => {
                best_count = count;
                best_values.clear();
                best_values.push(value.clone());
            }
            std::cmp::Ordering::Equal => best_values.push(value.clone()),
            std::cmp::Ordering::Greater => {}
        }
    }

    best_values
        .choose(rng)
        .cloned()
        .expect("original domain is non-empty")
}

fn initial_assignment<V: VarId, D: Value>(csp: &Csp<V, D>, rng: &mut ChaCha8Rng) -> Assignment<V, D> {
    let mut assignment = Assignment::new();
    for var in csp.variables() {
        let value = best_values_for(csp, &assignment, var, rng);
        assignment.push(var.clone(), value);
    }
    assignment
}

/// Greedy-initialize then randomly repair conflicted variables, falling back
/// to the fewest-violations assignment seen if the step or time budget runs
/// out before a full repair.
pub struct MinConflictsSearch;

impl MinConflictsSearch {
    pub fn solve<V: VarId, D: Value>(
        &self,
        csp: &Csp<V, D>,
        config: &SolverConfig,
        stats: &mut SearchStats,
    ) -> Option<Assignment<V, D>> {
        let start = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut assignment = initial_assignment(csp, &mut rng);

        let mut best_assignment = assignment.clone();
        let mut best_violations = total_violations(csp, &assignment);

        if best_violations == 0 {
            stats.status = SolveStatus::Solved;
            stats.runtime_seconds = elapsed_seconds(start);
            return Some(assignment);
        }

        for _ in 0..config.max_steps {
            if let Some(limit) = config.time_limit {
                if start.elapsed() >= limit {
                    debug!("min-conflicts hit its time limit");
                    stats.status = SolveStatus::BudgetExceeded;
                    stats.runtime_seconds = elapsed_seconds(start);
                    return Some(best_assignment);
                }
            }

            let conflicted: Vec<&V> = csp
                .variables()
                .iter()
                .filter(|v| is_conflicted(csp, &assignment, *v))
                .collect();

            let Some(&x) = conflicted.choose(&mut rng) else {
                stats.status = SolveStatus::Solved;
                stats.runtime_seconds = elapsed_seconds(start);
                return Some(assignment);
            };

            stats.local_steps += 1;
            let value = best_values_for(csp, &assignment, x, &mut rng);
            assignment.set(x, value);

            let violations = total_violations(csp, &assignment);
            if violations == 0 {
                stats.status = SolveStatus::Solved;
                stats.runtime_seconds = elapsed_seconds(start);
                return Some(assignment);
            }
            if violations < best_violations {
                best_violations = violations;
                best_assignment = assignment.clone();
            }
        }

        debug!("min-conflicts exhausted its step budget without a solution");
        stats.status = SolveStatus::BudgetExceeded;
        stats.runtime_seconds = elapsed_seconds(start);
        Some(best_assignment)
    }
}
