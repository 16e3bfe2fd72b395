use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};

/// The algorithm family used to search for a solution.
///
/// Modeled as a first-class field rather than folding `min_conflicts` into
/// the same axis as the propagation levels: it picks an entirely different
/// searcher, not just a different inference level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inference {
    /// No propagation beyond checking newly-bound constraints.
    None,
    /// Forward checking.
    Fc,
    /// Maintaining arc consistency (AC-3 after every assignment).
    Mac,
    /// Min-conflicts local search instead of systematic backtracking.
    MinConflicts,
}

/// Variable-selection heuristic. Ignored when `inference == MinConflicts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableOrder {
    /// First unassigned variable in CSP declaration order.
    Default,
    /// Minimum remaining values, tie-broken by degree then CSP order.
    Mrv,
    /// Minimum domain-size-over-weighted-degree ratio.
    DomWdeg,
}

/// Value-ordering heuristic. Ignored when `inference == MinConflicts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueOrder {
    /// The domain's intrinsic (sorted) order.
    Default,
    /// Least constraining value.
    Lcv,
}

/// Configuration for a single `solve()` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub inference: Inference,
    pub variable_order: VariableOrder,
    pub value_order: ValueOrder,
    pub use_cbj: bool,
    pub max_steps: u64,
    #[serde(with = "duration_secs_opt")]
    pub time_limit: Option<Duration>,
    pub seed: u64,
}

impl Default for SolverConfig {
    /// Forward checking + MRV is the classic "good default" combination;
    /// MAC is strictly more expensive per node so it stays opt-in.
    fn default() -> Self {
        Self {
            inference: Inference::Fc,
            variable_order: VariableOrder::Mrv,
            value_order: ValueOrder::Default,
            use_cbj: false,
            max_steps: 10_000,
            time_limit: None,
            seed: 0,
        }
    }
}

impl SolverConfig {
    /// Raises `InvalidConfig` when the budget is unworkable: a zero
    /// local-search step budget has no hope of making progress.
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(SolverError::InvalidConfig(
                "max_steps must be a positive integer".to_string(),
            )
            .into());
        }
        Ok(())
    }

    /// Serializes to the JSON form a CLI or config file would round-trip.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SolverError::InvalidConfig(format!("failed to serialize config: {e}")).into())
    }

    /// Parses a config from JSON, then validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SolverError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let config = SolverConfig {
            inference: Inference::Mac,
            variable_order: VariableOrder::DomWdeg,
            value_order: ValueOrder::Lcv,
            use_cbj: true,
            max_steps: 5_000,
            time_limit: Some(Duration::from_secs(30)),
            seed: 42,
        };
        let json = config.to_json().unwrap();
        let parsed = SolverConfig::from_json(&json).unwrap();
        assert_eq!(parsed.inference, config.inference);
        assert_eq!(parsed.variable_order, config.variable_order);
        assert_eq!(parsed.use_cbj, config.use_cbj);
        assert_eq!(parsed.seed, config.seed);
        assert_eq!(parsed.time_limit, config.time_limit);
    }

    #[test]
    fn from_json_rejects_a_zero_step_budget() {
        let json = SolverConfig { max_steps: 0, ..SolverConfig::default() }
            .to_json()
            .unwrap();
        assert!(SolverConfig::from_json(&json).is_err());
    }
}

mod duration_secs_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let secs: Option<f64> = Option::deserialize(d)?;
        Ok(secs.map(Duration::from_secs_f64))
    }
}
