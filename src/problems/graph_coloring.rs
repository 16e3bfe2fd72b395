//! Graph coloring CSPs: a vertex per variable, `k` colors per domain, a
//! `NotEqual` constraint per edge. Parameterized as `(n, p, k)` plus an RNG
//! seed for the random graph.

use std::collections::HashMap;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::csp::constraint::{Constraint, NotEqual};
use crate::csp::{Csp, Domain};
use crate::error::{Result, SolverError};

pub type Vertex = u32;
pub type Color = u32;

/// The external, serializable description of a random-graph coloring
/// instance: the `(n, p, k)` plus seed parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub n: usize,
    pub edge_probability: f64,
    pub k: u32,
    pub seed: u64,
}

impl Instance {
    pub fn build(&self) -> Result<Csp<Vertex, Color>> {
        random_graph(self.n, self.edge_probability, self.k, self.seed)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SolverError::InvalidConfig(format!("failed to serialize instance: {e}")).into())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SolverError::InvalidConfig(format!("failed to parse instance: {e}")).into())
    }
}

/// A random Erdős–Rényi graph on `n` vertices with edge probability `p`,
/// `k` colors per vertex, generated deterministically from `seed`: vertices
/// are visited in index order, each candidate edge `(i, j)` with `i < j`
/// decided by one RNG draw.
pub fn random_graph(n: usize, p: f64, k: u32, seed: u64) -> Result<Csp<Vertex, Color>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let edges: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .filter(|_| rng.gen_bool(p))
        .collect();
    build(n, k, &edges)
}

/// The complete graph `K_n`: every pair of vertices adjacent. Used for the
/// classic K4/k=3 unsatisfiable case.
pub fn complete_graph(n: usize, k: u32) -> Result<Csp<Vertex, Color>> {
    let edges: Vec<(usize, usize)> = (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))).collect();
    build(n, k, &edges)
}

fn build(n: usize, k: u32, edges: &[(usize, usize)]) -> Result<Csp<Vertex, Color>> {
    let variables: Vec<Vertex> = (0..n as Vertex).collect();
    let mut domains = HashMap::with_capacity(n);
    for &v in &variables {
        domains.insert(v, Domain::new(0..k));
    }

    let constraints: Vec<Box<dyn Constraint<Vertex, Color>>> = edges
        .iter()
        .map(|&(i, j)| -> Box<dyn Constraint<Vertex, Color>> {
            Box::new(NotEqual::new(i as Vertex, j as Vertex))
        })
        .collect();

    Csp::new(variables, domains, constraints)
}
