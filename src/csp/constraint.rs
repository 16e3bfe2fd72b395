use std::fmt;
use std::marker::PhantomData;

use super::assignment::Assignment;
use super::value::{Value, VarId};

/// A rule that must hold over some subset of the CSP's variables.
///
/// The engine never introspects a constraint beyond this capability set: the
/// variables it ranges over (`scope`) and whether a (possibly partial)
/// assignment satisfies it (`is_satisfied`). AC-3's arc revision needs
/// simultaneous support across every binary constraint between a pair of
/// variables, which isn't expressible as a per-constraint method, so it
/// walks `is_satisfied` directly rather than through a trait hook.
pub trait Constraint<V: VarId, D: Value>: fmt::Debug {
    /// The variables this constraint ranges over, in declaration order.
    /// Always non-empty.
    fn scope(&self) -> &[V];

    /// Whether this constraint is satisfied by `assignment`, considering
    /// only the variables in `scope` that are bound. A constraint that
    /// ranges over unbound variables is vacuously satisfied with respect to
    /// them; callers are responsible for only trusting this check once the
    /// relevant variables are all bound.
    fn is_satisfied(&self, assignment: &Assignment<V, D>) -> bool;

    /// A short, human-readable tag for statistics reporting. Purely
    /// cosmetic: never consulted for correctness.
    fn name(&self) -> &'static str {
        "Constraint"
    }
}

/// `a != b`.
#[derive(Debug, Clone)]
pub struct NotEqual<V: VarId, D: Value> {
    vars: [V; 2],
    _value: PhantomData<D>,
}

impl<V: VarId, D: Value> NotEqual<V, D> {
    pub fn new(a: V, b: V) -> Self {
        Self {
            vars: [a, b],
            _value: PhantomData,
        }
    }
}

impl<V: VarId, D: Value> Constraint<V, D> for NotEqual<V, D> {
    fn scope(&self) -> &[V] {
        &self.vars
    }

    fn is_satisfied(&self, assignment: &Assignment<V, D>) -> bool {
        match (assignment.get(&self.vars[0]), assignment.get(&self.vars[1])) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        }
    }

    fn name(&self) -> &'static str {
        "NotEqual"
    }
}

/// `a == b`.
#[derive(Debug, Clone)]
pub struct Equal<V: VarId, D: Value> {
    vars: [V; 2],
    _value: PhantomData<D>,
}

impl<V: VarId, D: Value> Equal<V, D> {
    pub fn new(a: V, b: V) -> Self {
        Self {
            vars: [a, b],
            _value: PhantomData,
        }
    }
}

impl<V: VarId, D: Value> Constraint<V, D> for Equal<V, D> {
    fn scope(&self) -> &[V] {
        &self.vars
    }

    fn is_satisfied(&self, assignment: &Assignment<V, D>) -> bool {
        match (assignment.get(&self.vars[0]), assignment.get(&self.vars[1])) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    fn name(&self) -> &'static str {
        "Equal"
    }
}

/// A user-provided predicate over an arbitrary scope.
///
/// Any rule that doesn't fit the built-in kinds can be expressed as a closure
/// over the bound subset of its scope.
pub struct Predicate<V: VarId, D: Value> {
    scope: Vec<V>,
    name: &'static str,
    predicate: Box<dyn Fn(&Assignment<V, D>) -> bool + Send + Sync>,
}

impl<V: VarId, D: Value> Predicate<V, D> {
    pub fn new(
        name: &'static str,
        scope: Vec<V>,
        predicate: impl Fn(&Assignment<V, D>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            scope,
            name,
            predicate: Box::new(predicate),
        }
    }
}

impl<V: VarId, D: Value> fmt::Debug for Predicate<V, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish()
    }
}

impl<V: VarId, D: Value> Constraint<V, D> for Predicate<V, D> {
    fn scope(&self) -> &[V] {
        &self.scope
    }

    fn is_satisfied(&self, assignment: &Assignment<V, D>) -> bool {
        (self.predicate)(assignment)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Builds an AllDifferent constraint over `vars` as pairwise `NotEqual`
/// constraints: propagation and dom/wdeg are defined at binary granularity
/// throughout this engine, so AllDifferent is never a distinct n-ary
/// propagator, just a convenience builder.
pub fn all_different<V: VarId, D: Value>(vars: &[V]) -> Vec<Box<dyn Constraint<V, D>>> {
    let mut constraints: Vec<Box<dyn Constraint<V, D>>> = Vec::new();
    for i in 0..vars.len() {
        for j in (i + 1)..vars.len() {
            constraints.push(Box::new(NotEqual::new(vars[i].clone(), vars[j].clone())));
        }
    }
    constraints
}
