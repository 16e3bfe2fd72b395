//! Value-ordering heuristics: in what order to try a chosen variable's
//! remaining candidate values.

use crate::csp::{Assignment, Csp, Value, VarId};
use crate::search::Domains;

/// Produces the order in which `var`'s current candidate values should be
/// tried. Implementations are pure functions of the current search state.
pub trait ValueHeuristic<V: VarId, D: Value> {
    fn order(
        &self,
        csp: &Csp<V, D>,
        domains: &Domains<V, D>,
        assignment: &Assignment<V, D>,
        var: &V,
    ) -> Vec<D>;
}

/// The domain's intrinsic (sorted) order, unchanged.
pub struct DefaultValueHeuristic;

impl<V: VarId, D: Value> ValueHeuristic<V, D> for DefaultValueHeuristic {
    fn order(
        &self,
        _csp: &Csp<V, D>,
        domains: &Domains<V, D>,
        _assignment: &Assignment<V, D>,
        var: &V,
    ) -> Vec<D> {
        domains[var].iter().cloned().collect()
    }
}

/// Counts how many candidate values would be ruled out of `neighbor`'s
/// current domain if `var = value` were assigned, under the binary
/// constraints directly between them.
fn ruled_out_count<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    domains: &Domains<V, D>,
    var: &V,
    value: &D,
    neighbor: &V,
) -> usize {
    let constraints = csp.binary_constraints_between(var, neighbor);
    if constraints.is_empty() {
        return 0;
    }

    domains[neighbor]
        .iter()
        .filter(|candidate| {
            let mut probe = Assignment::new();
            probe.push(var.clone(), value.clone());
            probe.push(neighbor.clone(), (*candidate).clone());
            constraints
                .iter()
                .any(|&cid| !csp.constraints()[cid].is_satisfied(&probe))
        })
        .count()
}

/// Least-constraining value: tries the candidate that rules out the fewest
/// values from unassigned neighbors' current domains first, tie-broken by
/// the domain's sorted order.
pub struct LcvHeuristic;

impl<V: VarId, D: Value> ValueHeuristic<V, D> for LcvHeuristic {
    fn order(
        &self,
        csp: &Csp<V, D>,
        domains: &Domains<V, D>,
        assignment: &Assignment<V, D>,
        var: &V,
    ) -> Vec<D> {
        let neighbors: Vec<&V> = csp
            .neighbors(var)
            .iter()
            .filter(|n| !assignment.contains(n))
            .collect();

        let mut candidates: Vec<D> = domains[var].iter().cloned().collect();
        candidates.sort_by_key(|value| {
            let ruled_out: usize = neighbors
                .iter()
                .map(|n| ruled_out_count(csp, domains, var, value, n))
                .sum();
            ruled_out
        });
        candidates
    }
}
