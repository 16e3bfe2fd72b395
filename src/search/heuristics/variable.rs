//! Variable-selection heuristics: which unassigned variable to branch on
//! next.

use crate::csp::{Assignment, Csp, Value, VarId};
use crate::search::Domains;

/// Picks the next variable to assign. Implementations are pure functions of
/// the current search state — they never mutate anything.
pub trait VariableHeuristic<V: VarId, D: Value> {
    fn select(
        &self,
        csp: &Csp<V, D>,
        domains: &Domains<V, D>,
        assignment: &Assignment<V, D>,
        weights: &[u32],
    ) -> Option<V>;
}

fn unassigned<'a, V: VarId, D: Value>(
    csp: &'a Csp<V, D>,
    assignment: &Assignment<V, D>,
) -> impl Iterator<Item = &'a V> {
    csp.variables().iter().filter(move |v| !assignment.contains(v))
}

/// First unassigned variable in CSP declaration order. Also the universal
/// final tie-break for every other heuristic here.
pub struct DefaultHeuristic;

impl<V: VarId, D: Value> VariableHeuristic<V, D> for DefaultHeuristic {
    fn select(
        &self,
        csp: &Csp<V, D>,
        _domains: &Domains<V, D>,
        assignment: &Assignment<V, D>,
        _weights: &[u32],
    ) -> Option<V> {
        unassigned(csp, assignment).next().cloned()
    }
}

fn future_degree<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    assignment: &Assignment<V, D>,
    var: &V,
) -> usize {
    csp.neighbors(var)
        .iter()
        .filter(|n| !assignment.contains(n))
        .count()
}

/// Minimum remaining values, tie-broken by maximum (future) degree, then by
/// CSP declaration order for determinism.
pub struct MrvHeuristic;

impl<V: VarId, D: Value> VariableHeuristic<V, D> for MrvHeuristic {
    fn select(
        &self,
        csp: &Csp<V, D>,
        domains: &Domains<V, D>,
        assignment: &Assignment<V, D>,
        _weights: &[u32],
    ) -> Option<V> {
        unassigned(csp, assignment)
            .min_by_key(|v| {
                let v: &V = *v;
                let domain_len = domains[v].len();
                let degree = future_degree(csp, assignment, v);
                (domain_len, std::cmp::Reverse(degree), csp.var_order(v))
            })
            .cloned()
    }
}

/// The weighted degree of `var`: the sum of weights of constraints incident
/// to it that still have at least two unbound variables in scope.
fn wdeg<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    assignment: &Assignment<V, D>,
    weights: &[u32],
    var: &V,
) -> u64 {
    csp.constraints_of(var)
        .iter()
        .filter(|&&cid| {
            csp.constraints()[cid]
                .scope()
                .iter()
                .filter(|v| !assignment.contains(v))
                .count()
                >= 2
        })
        .map(|&cid| weights[cid] as u64)
        .sum()
}

/// dom/wdeg: minimizes `|current domain| / wdeg`, treating a zero `wdeg` as
/// `+infinity` (never preferred unless every candidate is at infinity, in
/// which case this falls back to MRV).
pub struct DomWdegHeuristic;

impl<V: VarId, D: Value> VariableHeuristic<V, D> for DomWdegHeuristic {
    fn select(
        &self,
        csp: &Csp<V, D>,
        domains: &Domains<V, D>,
        assignment: &Assignment<V, D>,
        weights: &[u32],
    ) -> Option<V> {
        let candidates: Vec<&V> = unassigned(csp, assignment).collect();
        if candidates.is_empty() {
            return None;
        }

        let any_finite = candidates
            .iter()
            .any(|v| wdeg(csp, assignment, weights, *v) > 0);

        if !any_finite {
            return MrvHeuristic.select(csp, domains, assignment, weights);
        }

        let ratio = |v: &V| -> f64 {
            let w = wdeg(csp, assignment, weights, v);
            if w == 0 {
                f64::INFINITY
            } else {
                domains[v].len() as f64 / w as f64
            }
        };

        candidates
            .into_iter()
            .min_by(|a, b| {
                let a: &V = *a;
                let b: &V = *b;
                ratio(a)
                    .partial_cmp(&ratio(b))
                    .unwrap()
                    .then_with(|| csp.var_order(a).cmp(&csp.var_order(b)))
            })
            .cloned()
    }
}
