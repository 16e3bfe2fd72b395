pub mod assignment;
pub mod constraint;
pub mod domain;
pub mod value;

use std::collections::{HashMap, HashSet};

pub use assignment::Assignment;
pub use constraint::Constraint;
pub use domain::Domain;
pub use value::{VarId, Value};

use crate::error::{Result, SolverError};

/// A numeric identifier for a single constraint within a [`Csp`].
pub type ConstraintId = usize;

/// A constraint satisfaction problem: variables, their original domains, and
/// the constraints relating them, plus the neighbor/incidence indices and
/// constraint weights derived at construction time.
///
/// Built once by an external problem builder and treated as read-mostly
/// during search: `weights` here is only ever the *initial* template (all
/// 1s) that each solve clones into its own mutable state; nothing about an
/// existing `Csp` changes once constructed.
pub struct Csp<V: VarId, D: Value> {
    variables: Vec<V>,
    var_order: HashMap<V, usize>,
    domains: HashMap<V, Domain<D>>,
    constraints: Vec<Box<dyn Constraint<V, D>>>,
    neighbors: HashMap<V, HashSet<V>>,
    constraints_of: HashMap<V, Vec<ConstraintId>>,
    weights: Vec<u32>,
}

impl<V: VarId, D: Value> Csp<V, D> {
    /// Constructs a CSP, validating the `MalformedCSP` conditions: every
    /// constraint's scope must be a subset of `variables`, and every
    /// variable must have a non-empty original domain.
    pub fn new(
        variables: Vec<V>,
        domains: HashMap<V, Domain<D>>,
        constraints: Vec<Box<dyn Constraint<V, D>>>,
    ) -> Result<Self> {
        let known: HashSet<&V> = variables.iter().collect();

        for var in &variables {
            let domain = domains
                .get(var)
                .filter(|d| !d.is_empty())
                .is_some();
            if !domain {
                return Err(SolverError::EmptyDomain(format!("{var:?}")).into());
            }
        }

        for constraint in &constraints {
            for var in constraint.scope() {
                if !known.contains(var) {
                    return Err(SolverError::UnknownScopeVariable(format!("{var:?}")).into());
                }
            }
        }

        let mut var_order = HashMap::with_capacity(variables.len());
        for (idx, var) in variables.iter().enumerate() {
            var_order.insert(var.clone(), idx);
        }

        let mut neighbors: HashMap<V, HashSet<V>> =
            variables.iter().map(|v| (v.clone(), HashSet::new())).collect();
        let mut constraints_of: HashMap<V, Vec<ConstraintId>> =
            variables.iter().map(|v| (v.clone(), Vec::new())).collect();

        for (id, constraint) in constraints.iter().enumerate() {
            let scope = constraint.scope();
            for var in scope {
                constraints_of.get_mut(var).unwrap().push(id);
            }
            for i in 0..scope.len() {
                for j in 0..scope.len() {
                    if i != j {
                        neighbors.get_mut(&scope[i]).unwrap().insert(scope[j].clone());
                    }
                }
            }
        }

        let weights = vec![1u32; constraints.len()];

        Ok(Self {
            variables,
            var_order,
            domains,
            constraints,
            neighbors,
            constraints_of,
            weights,
        })
    }

    pub fn variables(&self) -> &[V] {
        &self.variables
    }

    /// The variable's position in declaration order; the ultimate
    /// determinism tie-break used by every heuristic.
    pub fn var_order(&self, var: &V) -> usize {
        self.var_order[var]
    }

    pub fn original_domain(&self, var: &V) -> &Domain<D> {
        &self.domains[var]
    }

    pub fn constraints(&self) -> &[Box<dyn Constraint<V, D>>] {
        &self.constraints
    }

    pub fn neighbors(&self, var: &V) -> &HashSet<V> {
        &self.neighbors[var]
    }

    pub fn constraints_of(&self, var: &V) -> &[ConstraintId] {
        &self.constraints_of[var]
    }

    pub fn initial_weights(&self) -> Vec<u32> {
        self.weights.clone()
    }

    /// A fresh, mutable copy of the original domains — the starting point
    /// for a search's `current_domains`.
    pub fn clone_domains(&self) -> HashMap<V, Domain<D>> {
        self.domains.clone()
    }

    /// Binary constraints (arity exactly 2) whose scope contains both `xi`
    /// and `xj`, in declaration order. Used by AC-3, which is only ever
    /// defined over binary arcs.
    pub fn binary_constraints_between(&self, xi: &V, xj: &V) -> Vec<ConstraintId> {
        self.constraints_of(xi)
            .iter()
            .copied()
            .filter(|&id| {
                let scope = self.constraints[id].scope();
                scope.len() == 2 && scope.contains(xj)
            })
            .collect()
    }
}
