//! The single solver entry point: dispatches to the configured algorithm
//! family and returns a total assignment (or `None`) plus stats.

use crate::config::{Inference, SolverConfig};
use crate::csp::{Assignment, Csp, Value, VarId};
use crate::error::Result;
use crate::search::backtracking::BacktrackingSearch;
use crate::search::local::MinConflictsSearch;
use crate::stats::SearchStats;

/// Solves `csp` under `config`, returning either a complete, constraint-satisfying
/// assignment or `None`, alongside statistics for the run.
///
/// `config.inference == MinConflicts` selects the local searcher; every other
/// value selects systematic backtracking, with `config.use_cbj` choosing
/// between chronological backtracking and conflict-directed backjumping.
pub fn solve<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    config: &SolverConfig,
) -> Result<(Option<Assignment<V, D>>, SearchStats)> {
    config.validate()?;

    let mut stats = SearchStats::new();

    if config.inference == Inference::MinConflicts {
        let solution = MinConflictsSearch.solve(csp, config, &mut stats);
        return Ok((solution, stats));
    }

    let search = BacktrackingSearch::new(config);
    let (solution, _weights) = search.solve(csp, config, &mut stats);
    Ok((solution, stats))
}

/// Like [`solve`], but seeds dom/wdeg constraint weights from `weights`
/// instead of the CSP's all-ones template, and hands back the weights as
/// left at the end of the run. Ignored when `config.inference ==
/// MinConflicts`, which has no weights to carry.
pub fn solve_with_weights<V: VarId, D: Value>(
    csp: &Csp<V, D>,
    config: &SolverConfig,
    weights: Vec<u32>,
) -> Result<(Option<Assignment<V, D>>, SearchStats, Vec<u32>)> {
    config.validate()?;

    let mut stats = SearchStats::new();

    if config.inference == Inference::MinConflicts {
        let solution = MinConflictsSearch.solve(csp, config, &mut stats);
        return Ok((solution, stats, weights));
    }

    let search = BacktrackingSearch::new(config);
    let (solution, weights) = search.solve_with_weights(csp, config, weights, &mut stats);
    Ok((solution, stats, weights))
}
