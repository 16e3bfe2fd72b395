use std::collections::HashMap;

use prettytable::{Cell, Row, Table};

use crate::csp::{ConstraintId, Csp, Value, VarId};

/// The outcome of a `solve()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Solved,
    Unsolvable,
    BudgetExceeded,
}

/// Per-constraint telemetry, purely for reporting: how many times a
/// constraint was revised, how many of those revisions actually pruned a
/// domain, and how long they took.
#[derive(Debug, Default, Clone, Copy)]
pub struct PerConstraintStats {
    pub revisions: u64,
    pub prunings: u64,
    pub time_spent_micros: u64,
}

/// Statistics for a single `solve()` call.
#[derive(Debug, Clone)]
pub struct SearchStats {
    pub runtime_seconds: f64,
    pub backtracks: u64,
    pub assignments: u64,
    pub constraint_checks: u64,
    pub propagations: u64,
    pub local_steps: u64,
    pub status: SolveStatus,
    /// Ambient enrichment beyond the required fields above: a breakdown by
    /// constraint id, for an optional human-readable report.
    pub per_constraint: HashMap<ConstraintId, PerConstraintStats>,
}

impl SearchStats {
    pub fn new() -> Self {
        Self {
            runtime_seconds: 0.0,
            backtracks: 0,
            assignments: 0,
            constraint_checks: 0,
            propagations: 0,
            local_steps: 0,
            status: SolveStatus::Unsolvable,
            per_constraint: HashMap::new(),
        }
    }
}

impl Default for SearchStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders a per-constraint breakdown as a table, sorted by total time
/// spent. Purely diagnostic; never consulted by the solver itself.
pub fn render_table<V: VarId, D: Value>(stats: &SearchStats, csp: &Csp<V, D>) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Constraint"),
        Cell::new("ID"),
        Cell::new("Revisions"),
        Cell::new("Prunings"),
        Cell::new("Time/Call (us)"),
        Cell::new("Total Time (ms)"),
    ]));

    let mut rows: Vec<(&ConstraintId, &PerConstraintStats)> = stats.per_constraint.iter().collect();
    rows.sort_by_key(|(_, s)| std::cmp::Reverse(s.time_spent_micros));

    for (id, s) in rows {
        let avg = if s.revisions > 0 {
            s.time_spent_micros as f64 / s.revisions as f64
        } else {
            0.0
        };
        table.add_row(Row::new(vec![
            Cell::new(csp.constraints()[*id].name()),
            Cell::new(&id.to_string()),
            Cell::new(&s.revisions.to_string()),
            Cell::new(&s.prunings.to_string()),
            Cell::new(&format!("{avg:.2}")),
            Cell::new(&format!("{:.2}", s.time_spent_micros as f64 / 1000.0)),
        ]));
    }

    table.to_string()
}
