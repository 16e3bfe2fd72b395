use std::collections::VecDeque;
use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, trace};

use crate::csp::{Assignment, ConstraintId, Csp, Value, VarId};
use crate::stats::SearchStats;

use super::{Domains, Removal};

/// Builds a minimal probe assignment containing exactly `scope`'s variables,
/// pulling values from `extra` first and falling back to `assignment`.
///
/// Used instead of cloning the whole (potentially large) current assignment
/// for every `is_satisfied` check during propagation.
fn probe_for_scope<V: VarId, D: Value>(
    scope: &[V],
    assignment: &Assignment<V, D>,
    extra: &[(V, D)],
) -> Option<Assignment<V, D>> {
    let mut probe = Assignment::new();
    for v in scope {
        if let Some((_, val)) = extra.iter().find(|(ev, _)| ev == v) {
            probe.push(v.clone(), val.clone());
        } else if let Some(val) = assignment.get(v) {
            probe.push(v.clone(), val.clone());
        }
        // else: v is unbound by both sources; leave it out of the probe.
    }
    Some(probe)
}

/// An undo log of domain removals, replayed in reverse to restore exactly
/// the state before the corresponding forward step.
#[derive(Debug, Default)]
pub struct Trail<V: VarId, D: Value> {
    removed: Vec<Removal<V, D>>,
}

impl<V: VarId, D: Value> Trail<V, D> {
    pub fn new() -> Self {
        Self { removed: Vec::new() }
    }

    pub fn record(&mut self, var: V, value: D) {
        self.removed.push(Removal { var, value });
    }

    pub fn len(&self) -> usize {
        self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }

    pub fn extend(&mut self, other: Trail<V, D>) {
        self.removed.extend(other.removed);
    }

    /// Re-inserts every removed `(var, value)` pair, in reverse order. Order
    /// doesn't matter for correctness (insertion is commutative), but LIFO
    /// mirrors how the trail was built.
    pub fn undo(self, domains: &mut Domains<V, D>) {
        for removal in self.removed.into_iter().rev() {
            domains.get_mut(&removal.var).unwrap().insert(removal.value);
        }
    }
}

/// A variable whose current domain became empty during propagation, and the
/// constraint whose revision emptied it.
#[derive(Debug, Clone)]
pub struct Wipeout<V: VarId> {
    pub var: V,
    pub constraint: ConstraintId,
}

/// The assigned variables in `constraint`'s scope other than `branching_var`
/// — the blame set attributed to `conflict_set[branching_var]` when a
/// wipeout (from FC or MAC) is reported while `branching_var` is being
/// explored.
pub fn blamed_assigned_vars<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    constraint: ConstraintId,
    branching_var: &V,
    assignment: &Assignment<V, D>,
) -> Vec<V> {
    csp.constraints()[constraint]
        .scope()
        .iter()
        .filter(|v| *v != branching_var && assignment.contains(v))
        .cloned()
        .collect()
}

/// Forward checking: after assigning `x`, prunes every unassigned neighbor's
/// domain of values inconsistent with the new binding.
pub fn forward_check<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    domains: &mut Domains<V, D>,
    assignment: &Assignment<V, D>,
    x: &V,
    stats: &mut SearchStats,
) -> (Trail<V, D>, Option<Wipeout<V>>) {
    let mut trail = Trail::new();
    let mut neighbors: Vec<&V> = csp.neighbors(x).iter().collect();
    neighbors.sort_by_key(|v| csp.var_order(v));

    for y in neighbors {
        if assignment.contains(y) {
            continue;
        }

        let candidates: Vec<D> = domains[y].iter().cloned().collect();
        let mut last_removal_constraint: Option<ConstraintId> = None;

        for b in candidates {
            let mut ruled_out = false;
            for &cid in csp.constraints_of(y) {
                let constraint = &csp.constraints()[cid];
                let scope = constraint.scope();
                let other_bound = scope.iter().all(|v| v == y || assignment.contains(v) || v == x);
                if !other_bound {
                    continue;
                }
                let Some(probe) = probe_for_scope(scope, assignment, &[(y.clone(), b.clone())])
                else {
                    continue;
                };
                stats.constraint_checks += 1;
                let entry = stats.per_constraint.entry(cid).or_default();
                entry.revisions += 1;
                if !constraint.is_satisfied(&probe) {
                    ruled_out = true;
                    last_removal_constraint = Some(cid);
                    entry.prunings += 1;
                    break;
                }
            }
            if ruled_out {
                domains.get_mut(y).unwrap().remove(&b);
                trail.record(y.clone(), b);
                stats.propagations += 1;
            }
        }

        if domains[y].is_empty() {
            let constraint = last_removal_constraint
                .expect("a value can only be removed if some constraint ruled it out");
            trace!(?y, "forward checking wiped out domain");
            return (trail, Some(Wipeout { var: y.clone(), constraint }));
        }
    }

    (trail, None)
}

/// A FIFO worklist of directed arcs, deduplicated so an arc already pending
/// is never queued twice. Ordering is deterministic FIFO, not the priority
/// scheduling some constraint-propagation worklists use elsewhere.
struct ArcWorklist<V: VarId> {
    queue: VecDeque<(V, V)>,
    members: HashSet<(V, V)>,
}

impl<V: VarId> ArcWorklist<V> {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            members: HashSet::new(),
        }
    }

    fn push(&mut self, arc: (V, V)) {
        if self.members.insert(arc.clone()) {
            self.queue.push_back(arc);
        }
    }

    fn pop(&mut self) -> Option<(V, V)> {
        let arc = self.queue.pop_front()?;
        self.members.remove(&arc);
        Some(arc)
    }
}

/// Revises the arc `(xi, xj)`: removes every value of `xi`'s current domain
/// that has no support in `xj`'s current domain under the binary
/// constraints directly between them. Returns the number of values removed
/// and, if any were, the id of the last constraint that ruled one out (used
/// as "the" constraint between `xi` and `xj` for blame purposes).
fn revise<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    domains: &mut Domains<V, D>,
    xi: &V,
    xj: &V,
    stats: &mut SearchStats,
) -> (usize, Option<ConstraintId>) {
    let constraints = csp.binary_constraints_between(xi, xj);
    if constraints.is_empty() {
        return (0, None);
    }

    let candidates: Vec<D> = domains[xi].iter().cloned().collect();
    let xj_values: Vec<D> = domains[xj].iter().cloned().collect();
    let mut removed = 0;
    let mut last_constraint = None;

    for a in candidates {
        let mut supported = false;
        for b in &xj_values {
            let b = b.clone();
            let mut all_ok = true;
            for &cid in &constraints {
                let constraint = &csp.constraints()[cid];
                let Some(probe) =
                    probe_for_scope(constraint.scope(), &Assignment::new(), &[(xi.clone(), a.clone()), (xj.clone(), b.clone())])
                else {
                    continue;
                };
                stats.constraint_checks += 1;
                if !constraint.is_satisfied(&probe) {
                    all_ok = false;
                    break;
                }
            }
            if all_ok {
                supported = true;
                break;
            }
        }
        if !supported {
            domains.get_mut(xi).unwrap().remove(&a);
            removed += 1;
            last_constraint = constraints.last().copied();
        }
    }

    if removed > 0 {
        for &cid in &constraints {
            let entry = stats.per_constraint.entry(cid).or_default();
            entry.revisions += 1;
            entry.prunings += 1;
        }
    }

    (removed, last_constraint)
}

fn run_ac3<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    domains: &mut Domains<V, D>,
    mut worklist: ArcWorklist<V>,
    assigned: &Assignment<V, D>,
    stats: &mut SearchStats,
) -> (Trail<V, D>, Option<Wipeout<V>>) {
    let mut trail = Trail::new();

    while let Some((xi, xj)) = worklist.pop() {
        let before: Vec<D> = domains[&xi].iter().cloned().collect();
        let (removed, blamed) = revise(csp, domains, &xi, &xj, stats);

        if removed == 0 {
            continue;
        }

        let after: HashSet<&D> = domains[&xi].iter().collect();
        for a in before {
            if !after.contains(&a) {
                trail.record(xi.clone(), a);
                stats.propagations += 1;
            }
        }

        if domains[&xi].is_empty() {
            let constraint = blamed.expect("a removal always has a blamed constraint");
            trace!(?xi, ?xj, "AC-3 wiped out domain");
            return (trail, Some(Wipeout { var: xi, constraint }));
        }

        let mut further: Vec<&V> = csp
            .neighbors(&xi)
            .iter()
            .filter(|xk| **xk != xj && !assigned.contains(xk))
            .collect();
        further.sort_by_key(|v| csp.var_order(v));
        for xk in further {
            worklist.push((xk.clone(), xi.clone()));
        }
    }

    debug!("AC-3 reached a fixpoint");
    (trail, None)
}

/// Full AC-3 over every binary arc in the CSP, used once at the root before
/// search begins, to establish arc consistency before any variable is bound.
pub fn ac3_full<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    domains: &mut Domains<V, D>,
    assigned: &Assignment<V, D>,
    stats: &mut SearchStats,
) -> (Trail<V, D>, Option<Wipeout<V>>) {
    let mut worklist = ArcWorklist::new();
    let mut vars: Vec<&V> = csp.variables().iter().collect();
    vars.sort_by_key(|v| csp.var_order(v));
    for xi in &vars {
        let mut neighbors: Vec<&V> = csp.neighbors(xi).iter().collect();
        neighbors.sort_by_key(|v| csp.var_order(v));
        for xj in neighbors {
            worklist.push(((*xi).clone(), xj.clone()));
        }
    }
    run_ac3(csp, domains, worklist, assigned, stats)
}

/// MAC's incremental re-propagation after binding `x = v`: seeds the
/// worklist with every arc `(y, x)` for unassigned neighbors `y`.
pub fn ac3_after_assignment<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    domains: &mut Domains<V, D>,
    assignment: &Assignment<V, D>,
    x: &V,
    stats: &mut SearchStats,
) -> (Trail<V, D>, Option<Wipeout<V>>) {
    let mut worklist = ArcWorklist::new();
    let mut neighbors: Vec<&V> = csp.neighbors(x).iter().collect();
    neighbors.sort_by_key(|v| csp.var_order(v));
    for y in neighbors {
        if !assignment.contains(y) {
            worklist.push((y.clone(), x.clone()));
        }
    }
    run_ac3(csp, domains, worklist, assignment, stats)
}

/// Walltime measurement helper shared by both searchers.
pub fn elapsed_seconds(start: Instant) -> f64 {
    start.elapsed().as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::constraint::NotEqual;
    use crate::csp::{Csp, Domain};
    use std::collections::HashMap as StdHashMap;

    fn chain_csp(n: usize) -> Csp<u32, u32> {
        let variables: Vec<u32> = (0..n as u32).collect();
        let mut domains = StdHashMap::new();
        for &v in &variables {
            domains.insert(v, Domain::new(0..n as u32));
        }
        let mut constraints: Vec<Box<dyn crate::csp::Constraint<u32, u32>>> = Vec::new();
        for w in variables.windows(2) {
            constraints.push(Box::new(NotEqual::new(w[0], w[1])));
        }
        Csp::new(variables, domains, constraints).unwrap()
    }

    #[test]
    fn undo_restores_the_domain_snapshot_before_the_forward_step() {
        let csp = chain_csp(4);
        let mut domains = csp.clone_domains();
        let before: StdHashMap<u32, Domain<u32>> = domains.clone();

        let mut assignment = Assignment::new();
        assignment.push(0, 1);
        let mut stats = SearchStats::new();
        let (trail, _) = forward_check(&csp, &mut domains, &assignment, &0, &mut stats);

        assert_ne!(domains, before);
        trail.undo(&mut domains);
        assert_eq!(domains, before);
    }

    #[test]
    fn ac3_fixpoint_every_value_has_support_in_every_neighbor() {
        let csp = chain_csp(5);
        let mut domains = csp.clone_domains();
        let assignment = Assignment::new();
        let mut stats = SearchStats::new();

        let (_, wipeout) = ac3_full(&csp, &mut domains, &assignment, &mut stats);
        assert!(wipeout.is_none());

        for &xi in csp.variables() {
            for xj in csp.neighbors(&xi) {
                let constraints = csp.binary_constraints_between(&xi, xj);
                for a in domains[&xi].iter() {
                    let supported = domains[xj].iter().any(|b| {
                        let mut probe = Assignment::new();
                        probe.push(xi, a.clone());
                        probe.push(*xj, b.clone());
                        constraints
                            .iter()
                            .all(|&cid| csp.constraints()[cid].is_satisfied(&probe))
                    });
                    assert!(supported, "value {a:?} of {xi} has no support in {xj}");
                }
            }
        }
    }
}
