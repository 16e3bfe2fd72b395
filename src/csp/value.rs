use std::fmt::Debug;
use std::hash::Hash;

/// A variable identifier.
///
/// Opaque, hashable, and totally ordered within a CSP so that heuristic
/// tie-breaking is reproducible. Typically a small integer or a tuple like
/// `(row, col)`.
pub trait VarId: Clone + Eq + Hash + Ord + Debug + 'static {}
impl<T> VarId for T where T: Clone + Eq + Hash + Ord + Debug + 'static {}

/// A domain value.
///
/// Opaque, hashable, and totally ordered within a domain for the same reason
/// as [`VarId`].
pub trait Value: Clone + Eq + Hash + Ord + Debug + 'static {}
impl<T> Value for T where T: Clone + Eq + Hash + Ord + Debug + 'static {}
