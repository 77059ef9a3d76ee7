// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module defines the configuration of the solvers: a plain struct
//! enumerating every recognized option along with its default value.

use std::{cmp::Ordering, sync::Arc, time::Duration};

use derive_builder::Builder;

use crate::{BestBoundRanking, Callback, Cutoff, DepthFirstRanking, Error, NoCutoff, NodeRanking, OpenNode, TimeBudget, Tolerances, VarId};

/// The rule used to pick the next open node to explore
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum NodeSelection {
    /// Open node with the lowest bound first
    #[default]
    BestBound,
    /// Deepest open node first
    DepthFirst,
}
impl NodeRanking for NodeSelection {
    fn compare(&self, a: &OpenNode, b: &OpenNode) -> Ordering {
        match self {
            NodeSelection::BestBound  => BestBoundRanking.compare(a, b),
            NodeSelection::DepthFirst => DepthFirstRanking.compare(a, b),
        }
    }
}

/// The configuration of a solve.
///
/// # Example
/// ```
/// # use bnp::*;
/// use std::time::Duration;
///
/// let config = ConfigBuilder::default()
///     .smoothing_factor(0.3)
///     .farkas_pricing(true)
///     .time_limit(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// assert!(config.validate().is_ok());
/// assert_eq!(NodeSelection::BestBound, config.node_selection);
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct Config {
    pub node_selection: NodeSelection,
    /// The variables eligible for branching. `None` means all integer and
    /// binary variables of the formulation.
    #[builder(setter(strip_option))]
    pub branching_candidates: Option<Vec<VarId>>,
    /// Global wall clock budget of the solve
    #[builder(setter(strip_option))]
    pub time_limit: Option<Duration>,
    /// Maximum number of nodes to explore
    #[builder(setter(strip_option))]
    pub node_limit: Option<usize>,
    /// Time budget of each individual relaxation solve
    #[builder(setter(strip_option))]
    pub relaxation_time_limit: Option<Duration>,
    /// Maximum number of master solves of one column generation run
    pub column_generation_iteration_limit: usize,
    /// Wentges smoothing factor in [0, 1). Zero disables the stabilization.
    pub smoothing_factor: f64,
    /// Use Farkas pricing rather than artificial variables to cope with an
    /// infeasible restricted master
    pub farkas_pricing: bool,
    /// Initial penalty of the artificial variables
    pub artificial_cost: f64,
    /// Factor applied to the penalty each time artificials remain at
    /// convergence
    pub artificial_cost_growth: f64,
    /// How many times the penalty may be increased before the node is
    /// deemed infeasible
    pub infeasibility_repair_limit: usize,
    /// Size of a column pool which triggers a clean-up. `None` disables it.
    #[builder(setter(strip_option))]
    pub clean_up_threshold: Option<usize>,
    /// Fraction of the threshold which is kept after a clean-up
    pub clean_up_ratio: f64,
    /// Maximum number of pricing problems solved concurrently
    pub max_parallel_subproblems: usize,
    /// Enforce branching decisions with rows of the master rather than in
    /// the pricing problems
    pub branching_on_master: bool,
    /// Solve the restricted master with binary column weights after
    /// convergence to find incumbents
    pub integer_master_heuristic: bool,
    /// Maximum number of times a node is re-solved because callbacks
    /// returned violated cuts
    pub max_cut_rounds: usize,
    /// Number of tree workers, which is also the size of the batches of
    /// nodes processed together. The search only depends on this number,
    /// not on the timing of the workers.
    pub threads: usize,
    /// Nodes shallower than this depth are explored sequentially
    pub parallel_depth: usize,
    pub callbacks: Vec<Arc<dyn Callback + Send + Sync>>,
    pub tolerances: Tolerances,
    /// 0 = silent, 1 = summary, 2 = progress every `log_frequency` events,
    /// 3 = every event
    pub verbosity: u8,
    pub log_frequency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            node_selection                   : NodeSelection::BestBound,
            branching_candidates             : None,
            time_limit                       : None,
            node_limit                       : None,
            relaxation_time_limit            : None,
            column_generation_iteration_limit: 10_000,
            smoothing_factor                 : 0.0,
            farkas_pricing                   : false,
            artificial_cost                  : 1e6,
            artificial_cost_growth           : 10.0,
            infeasibility_repair_limit       : 3,
            clean_up_threshold               : None,
            clean_up_ratio                   : 0.66,
            max_parallel_subproblems         : 1,
            branching_on_master              : false,
            integer_master_heuristic         : false,
            max_cut_rounds                   : 5,
            threads                          : num_cpus::get(),
            parallel_depth                   : 0,
            callbacks                        : vec![],
            tolerances                       : Tolerances::default(),
            verbosity                        : 0,
            log_frequency                    : 100,
        }
    }
}

impl Config {
    /// Rejects the configurations holding out of range values
    pub fn validate(&self) -> Result<(), Error> {
        fn fail<T>(msg: String) -> Result<T, Error> {
            Err(Error::Configuration(msg))
        }
        if !(0.0..1.0).contains(&self.smoothing_factor) {
            return fail(format!("smoothing factor must lie in [0, 1), got {}", self.smoothing_factor));
        }
        if !(self.artificial_cost.is_finite() && self.artificial_cost > 0.0) {
            return fail(format!("artificial cost must be positive and finite, got {}", self.artificial_cost));
        }
        if !(self.artificial_cost_growth.is_finite() && self.artificial_cost_growth > 1.0) {
            return fail(format!("artificial cost growth must be greater than 1, got {}", self.artificial_cost_growth));
        }
        if self.clean_up_threshold == Some(0) {
            return fail("clean-up threshold must be positive".to_string());
        }
        if !(self.clean_up_ratio > 0.0 && self.clean_up_ratio < 1.0) {
            return fail(format!("clean-up ratio must lie in (0, 1), got {}", self.clean_up_ratio));
        }
        if self.column_generation_iteration_limit == 0 {
            return fail("column generation iteration limit must be positive".to_string());
        }
        if self.max_parallel_subproblems == 0 {
            return fail("max parallel subproblems must be positive".to_string());
        }
        if self.threads == 0 {
            return fail("at least one thread is required".to_string());
        }
        if self.log_frequency == 0 {
            return fail("log frequency must be positive".to_string());
        }
        let t = self.tolerances;
        if [t.integrality, t.reduced_cost, t.feasibility, t.improvement].iter().any(|x| !(x.is_finite() && *x >= 0.0)) {
            return fail(format!("tolerances must be non negative: {:?}", t));
        }
        Ok(())
    }

    /// The cutoff enforcing the global time limit. The budget starts running
    /// when this method is called.
    pub fn cutoff(&self) -> Box<dyn Cutoff + Send + Sync> {
        match self.time_limit {
            Some(budget) => Box::new(TimeBudget::new(budget)),
            None         => Box::new(NoCutoff),
        }
    }
}

#[cfg(test)]
mod test_config {
    use std::time::Duration;

    use crate::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.farkas_pricing);
        assert_eq!(0.0, config.smoothing_factor);
        assert!(config.threads >= 1);
    }
    #[test]
    fn builder_uses_the_defaults_for_missing_fields() {
        let config = ConfigBuilder::default().threads(2).build().unwrap();
        assert_eq!(2, config.threads);
        assert_eq!(Config::default().artificial_cost, config.artificial_cost);
        assert!(config.clean_up_threshold.is_none());
    }
    #[test]
    fn smoothing_factor_must_be_below_one() {
        let config = ConfigBuilder::default().smoothing_factor(1.0).build().unwrap();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
        let config = ConfigBuilder::default().smoothing_factor(-0.1).build().unwrap();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }
    #[test]
    fn clean_up_parameters_are_checked() {
        let config = ConfigBuilder::default().clean_up_threshold(0).build().unwrap();
        assert!(config.validate().is_err());
        let config = ConfigBuilder::default().clean_up_ratio(1.5).build().unwrap();
        assert!(config.validate().is_err());
    }
    #[test]
    fn zero_threads_is_rejected() {
        let config = ConfigBuilder::default().threads(0).build().unwrap();
        assert!(config.validate().is_err());
    }
    #[test]
    fn cutoff_follows_the_time_limit() {
        let config = Config::default();
        assert!(config.cutoff().deadline().is_none());
        let config = ConfigBuilder::default().time_limit(Duration::from_secs(5)).build().unwrap();
        let cutoff = config.cutoff();
        assert!(cutoff.deadline().is_some());
        assert!(!cutoff.must_stop());
    }
    #[test]
    fn node_selection_delegates_to_the_rankings() {
        let shallow = OpenNode { id: NodeId(0), bound: 1.0, depth: 1 };
        let deep    = OpenNode { id: NodeId(1), bound: 5.0, depth: 4 };
        assert_eq!(std::cmp::Ordering::Greater, NodeSelection::BestBound.compare(&shallow, &deep));
        assert_eq!(std::cmp::Ordering::Greater, NodeSelection::DepthFirst.compare(&deep, &shallow));
    }
}
