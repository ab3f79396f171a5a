//! Configuration types for the planner.

use pyo3::prelude::*;

/// Name of the deadline-aware strategy (the default).
pub const STRATEGY_ENHANCED_CPM: &str = "enhanced_cpm";
/// Name of the cheapest-resource strategy.
pub const STRATEGY_CRITICAL_PATH: &str = "critical_path";

/// Configuration for strategy selection and cost modeling.
#[pyclass]
#[derive(Clone, Debug)]
pub struct PlannerConfig {
    /// Planning strategy: "enhanced_cpm" or "critical_path"
    #[pyo3(get, set)]
    pub strategy: String,
    /// Add the projected parent-to-child data transfer time to every cost
    #[pyo3(get, set)]
    pub include_transfer_cost: bool,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Initial position of the per-depth cursor used for non-critical tasks
    #[pyo3(get, set)]
    pub noncritical_start_index: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            strategy: STRATEGY_ENHANCED_CPM.to_string(),
            include_transfer_cost: false,
            verbosity: 0,
            noncritical_start_index: 1,
        }
    }
}

#[pymethods]
impl PlannerConfig {
    #[new]
    #[pyo3(signature = (
        strategy=None,
        include_transfer_cost=None,
        verbosity=None,
        noncritical_start_index=None
    ))]
    fn new(
        strategy: Option<String>,
        include_transfer_cost: Option<bool>,
        verbosity: Option<u8>,
        noncritical_start_index: Option<usize>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            strategy: strategy.unwrap_or(defaults.strategy),
            include_transfer_cost: include_transfer_cost
                .unwrap_or(defaults.include_transfer_cost),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            noncritical_start_index: noncritical_start_index
                .unwrap_or(defaults.noncritical_start_index),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "PlannerConfig(strategy={:?}, include_transfer_cost={}, verbosity={})",
            self.strategy, self.include_transfer_cost, self.verbosity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.strategy, "enhanced_cpm");
        assert!(!config.include_transfer_cost);
        assert_eq!(config.verbosity, 0);
        assert_eq!(config.noncritical_start_index, 1);
    }

    #[test]
    fn test_new_falls_back_to_defaults() {
        let config = PlannerConfig::new(Some("critical_path".to_string()), None, Some(2), None);
        assert_eq!(config.strategy, STRATEGY_CRITICAL_PATH);
        assert!(!config.include_transfer_cost);
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.noncritical_start_index, 1);
    }
}
