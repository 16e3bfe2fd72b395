pub mod backtracking;
pub mod heuristics;
pub mod local;
pub mod propagation;

use std::collections::HashMap;

use crate::csp::{Domain, Value, VarId};

/// The mutable domain map a search state reduces and restores as it walks
/// the tree. Kept as a plain type alias — there is deliberately no
/// persistent/copy-on-write wrapper here; see `DESIGN.md` for why.
pub type Domains<V, D> = HashMap<V, Domain<D>>;

/// A single domain value removed during propagation, recorded so it can be
/// restored on backtrack.
#[derive(Debug, Clone)]
pub struct Removal<V: VarId, D: Value> {
    pub var: V,
    pub value: D,
}
