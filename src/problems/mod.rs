//! Thin CSP builders for external problem shapes: Sudoku and graph coloring.
//! These hold no solving logic; they just assemble a [`crate::csp::Csp`] and
//! hand it to [`crate::solver::solve`].

pub mod graph_coloring;
pub mod sudoku;
