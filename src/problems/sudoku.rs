//! Sudoku as a binary CSP: each `AllDifferent` group (row, column, box) is
//! exploded into pairwise `NotEqual` constraints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::csp::constraint::{all_different, Constraint};
use crate::csp::{Assignment, Csp, Domain};
use crate::error::{Result, SolverError};

/// A Sudoku cell's row-major index, `0..81`.
pub type Cell = u8;

/// The external, serializable description of a Sudoku instance: its
/// 81-character puzzle string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub puzzle: String,
}

impl Instance {
    pub fn build(&self) -> Result<Csp<Cell, u8>> {
        parse(&self.puzzle)
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

/// Parses the 81-character external format (`'0'` or `'.'` for an empty
/// cell, `'1'..='9'` otherwise) into a solvable CSP.
pub fn parse(puzzle: &str) -> Result<Csp<Cell, u8>> {
    if puzzle.chars().count() != 81 {
        return Err(SolverError::InvalidConfig(format!(
            "sudoku puzzle must have exactly 81 characters, got {}",
            puzzle.chars().count()
        ))
        .into());
    }

    let variables: Vec<Cell> = (0..81).collect();
    let mut domains = HashMap::with_capacity(81);

    for (i, ch) in puzzle.chars().enumerate() {
        let cell = i as Cell;
        let domain = match ch {
            '0' | '.' => Domain::new(1..=9u8),
            d if d.is_ascii_digit() && d != '0' => Domain::new([d.to_digit(10).unwrap() as u8]),
            other => {
                return Err(SolverError::InvalidConfig(format!(
                    "invalid sudoku character {other:?} at position {i}"
                ))
                .into())
            }
        };
        domains.insert(cell, domain);
    }

    let mut constraints: Vec<Box<dyn Constraint<Cell, u8>>> = Vec::new();

    for row in 0..9u8 {
        let vars: Vec<Cell> = (0..9u8).map(|col| row * 9 + col).collect();
        constraints.extend(all_different(&vars));
    }
    for col in 0..9u8 {
        let vars: Vec<Cell> = (0..9u8).map(|row| row * 9 + col).collect();
        constraints.extend(all_different(&vars));
    }
    for block_row in 0..3u8 {
        for block_col in 0..3u8 {
            let vars: Vec<Cell> = (0..3u8)
                .flat_map(|r| {
                    (0..3u8).map(move |c| (block_row * 3 + r) * 9 + (block_col * 3 + c))
                })
                .collect();
            constraints.extend(all_different(&vars));
        }
    }

    Csp::new(variables, domains, constraints)
}

/// Renders a solved assignment back into the 81-character format.
pub fn format_solution(assignment: &Assignment<Cell, u8>) -> String {
    (0..81u8)
        .map(|cell| {
            assignment
                .get(&cell)
                .and_then(|&v| char::from_digit(v as u32, 10))
                .unwrap_or('0')
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        assert!(parse("123").is_err());
    }

    #[test]
    fn instance_round_trips_through_json() {
        let puzzle = "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
        let instance = Instance { puzzle: puzzle.to_string() };
        let json = instance.to_json().unwrap();
        let parsed = Instance::from_json(&json).unwrap();
        let csp = parsed.build().unwrap();
        assert_eq!(csp.variables().len(), 81);
    }

    #[test]
    fn every_clue_cell_is_a_singleton() {
        let puzzle = "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
        let csp = parse(puzzle).unwrap();
        assert!(csp.original_domain(&0).is_singleton());
        assert_eq!(*csp.original_domain(&0).singleton_value().unwrap(), 5);
        assert_eq!(csp.original_domain(&2).len(), 9);
    }

    #[test]
    fn easy_puzzle_solves_with_mac_and_mrv_with_no_backtracks() {
        use crate::config::{Inference, SolverConfig, VariableOrder};
        use crate::search::backtracking::BacktrackingSearch;
        use crate::stats::SearchStats;

        let puzzle = "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
        let csp = parse(puzzle).unwrap();

        let config = SolverConfig {
            inference: Inference::Mac,
            variable_order: VariableOrder::Mrv,
            ..SolverConfig::default()
        };
        let mut stats = SearchStats::new();
        let search = BacktrackingSearch::new(&config);
        let (solution, _) = search.solve(&csp, &config, &mut stats);

        let solution = solution.expect("the classic easy puzzle has a unique solution");
        for constraint in csp.constraints() {
            assert!(constraint.is_satisfied(&solution));
        }
        assert_eq!(stats.backtracks, 0);
    }
}
