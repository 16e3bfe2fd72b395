use std::collections::HashMap;

use super::value::{Value, VarId};

/// A partial or total mapping from variables to values, insertion-ordered.
///
/// The order doubles as "the current search path": the last entry is always
/// the most recently assigned variable, which is exactly what chronological
/// backtracking and CBJ's blame-tracking need.
#[derive(Debug, Clone, Default)]
pub struct Assignment<V: VarId, D: Value> {
    order: Vec<V>,
    values: HashMap<V, D>,
}

impl<V: VarId, D: Value> Assignment<V, D> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            values: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, var: &V) -> Option<&D> {
        self.values.get(var)
    }

    pub fn contains(&self, var: &V) -> bool {
        self.values.contains_key(var)
    }

    /// Binds `var` to `value`, appending it to the path.
    ///
    /// Panics if `var` is already bound; the searcher never re-assigns a
    /// variable without first removing it.
    pub fn push(&mut self, var: V, value: D) {
        assert!(
            self.values.insert(var.clone(), value).is_none(),
            "variable assigned twice without an intervening unassign"
        );
        self.order.push(var);
    }

    /// Overwrites the value of an already-bound variable in place, leaving
    /// its position in the path unchanged. Used by local search, which
    /// repairs one variable at a time rather than following a search path.
    ///
    /// Panics if `var` is not already bound.
    pub fn set(&mut self, var: &V, value: D) {
        let slot = self
            .values
            .get_mut(var)
            .expect("variable must already be bound to use set");
        *slot = value;
    }

    /// Unbinds the most recently assigned variable, returning it.
    pub fn pop(&mut self) -> Option<(V, D)> {
        let var = self.order.pop()?;
        let value = self.values.remove(&var)?;
        Some((var, value))
    }

    /// The variable most recently assigned, i.e. the current path's parent
    /// frame. `None` at the root.
    pub fn last(&self) -> Option<&V> {
        self.order.last()
    }

    /// The position of `var` in the assignment order, used to find the
    /// "deepest" variable in a conflict set for CBJ.
    pub fn position_of(&self, var: &V) -> Option<usize> {
        self.order.iter().position(|v| v == var)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&V, &D)> {
        self.order.iter().map(move |v| (v, &self.values[v]))
    }

    pub fn path(&self) -> &[V] {
        &self.order
    }
}
