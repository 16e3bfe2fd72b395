//! Carries dom/wdeg constraint weights forward across consecutive solves of
//! the same CSP shape. A plain `solve()` call always starts from the CSP's
//! all-ones template; this wrapper is the explicit opt-in for an experiment
//! harness that wants warm-started weights instead.
use crate::config::SolverConfig;
use crate::csp::{Assignment, Csp, Value, VarId};
use crate::error::Result;
use crate::solver::solve_with_weights;
use crate::stats::SearchStats;

/// A CSP paired with the weights its most recent solve left behind.
pub struct WeightedCsp<'a, V: VarId, D: Value> {
    csp: &'a Csp<V, D>,
    weights: Vec<u32>,
}

impl<'a, V: VarId, D: Value> WeightedCsp<'a, V, D> {
    /// Starts from `csp`'s fresh, all-ones weight template.
    pub fn new(csp: &'a Csp<V, D>) -> Self {
        Self {
            weights: csp.initial_weights(),
            csp,
        }
    }

    /// Solves with the currently-held weights, then stores whatever the run
    /// left them at for the next call.
    pub fn solve(&mut self, config: &SolverConfig) -> Result<(Option<Assignment<V, D>>, SearchStats)> {
        let weights = std::mem::take(&mut self.weights);
        let (solution, stats, weights) = solve_with_weights(self.csp, config, weights)?;
        self.weights = weights;
        Ok((solution, stats))
    }

    /// The weights as left by the most recent solve (or the all-ones
    /// template if `solve` hasn't been called yet).
    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    /// Discards accumulated weights, resetting to the CSP's template.
    pub fn reset(&mut self) {
        self.weights = self.csp.initial_weights();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VariableOrder;
    use crate::csp::constraint::NotEqual;
    use crate::csp::Domain;
    use std::collections::HashMap;

    fn k4(k: u32) -> Csp<u32, u32> {
        let variables: Vec<u32> = (0..4).collect();
        let mut domains = HashMap::new();
        for &v in &variables {
            domains.insert(v, Domain::new(0..k));
        }
        let mut constraints: Vec<Box<dyn crate::csp::Constraint<u32, u32>>> = Vec::new();
        for i in 0..4 {
            for j in (i + 1)..4 {
                constraints.push(Box::new(NotEqual::new(i, j)));
            }
        }
        Csp::new(variables, domains, constraints).unwrap()
    }

    #[test]
    fn weights_carry_forward_across_solves() {
        let csp = k4(3);
        let mut weighted = WeightedCsp::new(&csp);
        assert!(weighted.weights().iter().all(|&w| w == 1));

        let config = SolverConfig {
            variable_order: VariableOrder::DomWdeg,
            ..SolverConfig::default()
        };
        weighted.solve(&config).unwrap();
        let after_first = weighted.weights().to_vec();

        weighted.solve(&config).unwrap();
        let after_second = weighted.weights().to_vec();

        for (a, b) in after_first.iter().zip(after_second.iter()) {
            assert!(b >= a, "weights must never decrease across solves");
        }
    }

    #[test]
    fn reset_restores_the_all_ones_template() {
        let csp = k4(3);
        let mut weighted = WeightedCsp::new(&csp);
        let config = SolverConfig {
            variable_order: VariableOrder::DomWdeg,
            ..SolverConfig::default()
        };
        weighted.solve(&config).unwrap();
        weighted.reset();
        assert!(weighted.weights().iter().all(|&w| w == 1));
    }
}
