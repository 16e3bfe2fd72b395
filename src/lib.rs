//! A generic, modular constraint satisfaction problem (CSP) solver.
//!
//! The core is problem-agnostic: a [`Csp`] is built from variables, their
//! original domains, and a list of [`Constraint`]s, then handed to
//! [`solver::solve`] along with a [`SolverConfig`] selecting an inference
//! level, heuristics, and search algorithm.
//!
//! # Core concepts
//!
//! - **[`Csp`]**: the problem container — variables, domains, constraints,
//!   and the neighbor/incidence indices derived from them.
//! - **[`Constraint`]**: a rule over some subset of the variables. The crate
//!   ships [`csp::constraint::NotEqual`], [`csp::constraint::Equal`], an
//!   [`csp::constraint::all_different`] builder, and a
//!   [`csp::constraint::Predicate`] escape hatch for custom rules.
//! - **[`SolverConfig`]**: selects the inference level (none/FC/MAC/
//!   min-conflicts), variable and value heuristics, and whether to use
//!   conflict-directed backjumping.
//! - **[`solver::solve`]**: the single entry point, returning a total
//!   assignment (or `None`) plus [`SearchStats`].
//!
//! # Example: a two-variable problem
//!
//! `A != B`, `A` ranges over `{1, 2}`, `B` is fixed to `1`. The solver must
//! deduce `A = 2`.
//!
//! ```
//! use quandary::config::SolverConfig;
//! use quandary::csp::constraint::{Constraint, NotEqual};
//! use quandary::csp::{Csp, Domain};
//! use quandary::solver;
//! use std::collections::HashMap;
//!
//! let a = "A";
//! let b = "B";
//! let variables = vec![a, b];
//!
//! let mut domains = HashMap::new();
//! domains.insert(a, Domain::new([1, 2]));
//! domains.insert(b, Domain::new([1]));
//!
//! let constraints: Vec<Box<dyn Constraint<&str, i32>>> = vec![Box::new(NotEqual::new(a, b))];
//!
//! let csp = Csp::new(variables, domains, constraints).unwrap();
//! let (solution, stats) = solver::solve(&csp, &SolverConfig::default()).unwrap();
//!
//! let solution = solution.unwrap();
//! assert_eq!(*solution.get(&a).unwrap(), 2);
//! assert_eq!(stats.backtracks, 0);
//! ```

pub mod config;
pub mod csp;
pub mod error;
pub mod problems;
pub mod search;
pub mod solver;
pub mod stats;
pub mod weighted;

pub use config::{Inference, SolverConfig, ValueOrder, VariableOrder};
pub use csp::{Assignment, Constraint, Csp, Domain, Value, VarId};
pub use error::{Error, Result, SolverError};
pub use stats::SearchStats;
pub use weighted::WeightedCsp;
