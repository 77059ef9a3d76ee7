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

//! This module provides the implementation of a sequential branch-and-bound
//! solver: the nodes are processed one at a time, in the order dictated by
//! the node selection rule of the configuration.

use tracing::{info, warn};

use crate::{BranchingRule, Completion, Config, Error, Fringe, MostFractional, NodeRelaxation, NodeSummary, Reason, Solution, Solver, VarId};

use super::{branching_candidates, explore::Explorer, SearchState};

/// The sequential branch-and-bound solver.
///
/// # Example
/// ```
/// # use bnp::*;
/// // min -x - y st. 2x + 2y <= 3 with x, y binary
/// let mut f = Formulation::new("example");
/// let x = f.add_var("x", 0.0, 1.0, VarKind::Binary);
/// let y = f.add_var("y", 0.0, 1.0, VarKind::Binary);
/// f.add_ctr(Constraint::le("c", LinExpr::new().term(x, 2.0).term(y, 2.0), 3.0)).unwrap();
/// f.set_objective(LinExpr::new().term(x, -1.0).term(y, -1.0)).unwrap();
///
/// let config = Config::default();
/// let lp     = HighsSolver::default();
/// let relax  = DirectRelaxation::new(&f, &lp, &config).unwrap();
/// let mut solver = SequentialSolver::new(&relax, config).unwrap();
///
/// let completion = solver.minimize().unwrap();
/// assert_eq!(SolutionStatus::Optimal, completion.status);
/// assert!((completion.best_value.unwrap() + 1.0).abs() < 1e-9);
/// ```
pub struct SequentialSolver<'a> {
    relaxation: &'a (dyn NodeRelaxation + Send + Sync),
    branching : Box<dyn BranchingRule + Send + Sync>,
    config    : Config,
    candidates: Vec<VarId>,
    state     : SearchState,
    primal    : Option<(f64, Solution)>,
    best_bound: f64,
}

impl <'a> SequentialSolver<'a> {
    pub fn new(relaxation: &'a (dyn NodeRelaxation + Send + Sync), config: Config) -> Result<Self, Error> {
        config.validate()?;
        let candidates = branching_candidates(relaxation, &config)?;
        let state = SearchState::new(&config);
        Ok(SequentialSolver {
            relaxation,
            branching : Box::new(MostFractional),
            config,
            candidates,
            state,
            primal    : None,
            best_bound: f64::NEG_INFINITY,
        })
    }
    /// Replaces the branching rule
    pub fn with_branching(mut self, branching: Box<dyn BranchingRule + Send + Sync>) -> Self {
        self.branching = branching;
        self
    }

    fn maybe_log(&self) {
        let state = &self.state;
        if self.config.verbosity >= 2 && state.explored % self.config.log_frequency == 0 {
            info!(explored = state.explored, open = state.fringe.len(), best = ?state.best_value(), bound = state.best_bound(), "progress");
        }
    }
}

impl Solver for SequentialSolver<'_> {
    fn minimize(&mut self) -> Result<Completion, Error> {
        self.state.reset(self.primal.clone());
        let cutoff   = self.config.cutoff();
        let explorer = Explorer {
            relaxation: self.relaxation,
            branching : self.branching.as_ref(),
            cutoff    : cutoff.as_ref(),
            config    : &self.config,
            candidates: &self.candidates,
        };

        let reason = loop {
            if cutoff.must_stop() {
                break Some(Reason::TimeLimit);
            }
            if self.config.node_limit.map_or(false, |limit| self.state.explored >= limit) {
                break Some(Reason::NodeLimit);
            }
            let Some(open) = self.state.pop() else {
                break None;
            };
            let task = self.state.task(open);
            self.state.explored += 1;

            let outcome = explorer.explore(&task, self.state.best_value());
            self.relaxation.synchronize();
            match outcome {
                Ok(explored) => {
                    if let Some(reason) = self.state.apply(task.id, explored) {
                        break Some(reason);
                    }
                },
                Err(e) if e.is_recoverable() && task.depth > 0 => {
                    warn!(node = task.id.0, error = %e, "node relaxation failed, the node is discarded");
                    self.state.discard(task.id);
                },
                Err(e) => return Err(e),
            }

            self.maybe_log();
        };

        let completion  = self.state.complete(reason);
        self.best_bound = self.state.best_bound();
        if self.config.verbosity >= 1 {
            info!(status = %completion.status, reason = %completion.reason, best = ?completion.best_value,
                bound = self.best_bound, explored = self.state.explored, "search completed");
        }
        Ok(completion)
    }

    fn best_value(&self) -> Option<f64> {
        self.state.best_value()
    }
    fn best_solution(&self) -> Option<Solution> {
        self.state.best.as_ref().map(|(_, s)| s.clone())
    }
    fn best_bound(&self) -> f64 {
        self.best_bound
    }
    fn set_primal(&mut self, value: f64, solution: Solution) {
        if self.primal.as_ref().map_or(true, |(v, _)| value < *v) {
            self.primal = Some((value, solution.clone()));
        }
        self.state.maybe_update_best(value, solution);
    }
    fn explored(&self) -> usize {
        self.state.explored
    }
    fn nodes(&self) -> Vec<NodeSummary> {
        self.state.tree.summaries()
    }
}

#[cfg(test)]
mod test_sequential {
    use crate::*;

    /// max 5x + 4y st. 6x + 4y <= 24 ; x + 2y <= 6 (as a minimization).
    /// The integer optimum is -20 (x = 4, y = 0)
    fn formulation() -> Formulation {
        let mut f = Formulation::new("sequential");
        let x = f.add_var("x", 0.0, 10.0, VarKind::Integer);
        let y = f.add_var("y", 0.0, 10.0, VarKind::Integer);
        f.add_ctr(Constraint::le("c1", LinExpr::new().term(x, 6.0).term(y, 4.0), 24.0)).unwrap();
        f.add_ctr(Constraint::le("c2", LinExpr::new().term(x, 1.0).term(y, 2.0), 6.0)).unwrap();
        f.set_objective(LinExpr::new().term(x, -5.0).term(y, -4.0)).unwrap();
        f
    }

    fn solve(config: Config) -> (Completion, Vec<NodeSummary>, Option<Solution>, f64) {
        let f = formulation();
        let lp = HighsSolver::default();
        let relax = DirectRelaxation::new(&f, &lp, &config).unwrap();
        let mut solver = SequentialSolver::new(&relax, config).unwrap();
        let completion = solver.minimize().unwrap();
        (completion, solver.nodes(), solver.best_solution(), solver.best_bound())
    }

    #[test]
    fn finds_the_integer_optimum() {
        let (completion, nodes, solution, bound) = solve(Config::default());
        assert_eq!(SolutionStatus::Optimal, completion.status);
        assert_eq!(Reason::Exhausted, completion.reason);
        assert!((completion.best_value.unwrap() + 20.0).abs() < 1e-6);
        let x = solution.unwrap();
        assert!((x[0] - 4.0).abs() < 1e-6);
        assert!((bound + 20.0).abs() < 1e-6);
        assert!(nodes.len() > 1);
    }
    #[test]
    fn children_bounds_never_decrease() {
        let (_, nodes, _, _) = solve(Config::default());
        for node in nodes.iter() {
            if let Some(parent) = node.parent {
                assert!(node.bound >= nodes[parent.0].bound - 1e-9);
            }
        }
    }
    #[test]
    fn depth_first_reaches_the_same_optimum() {
        let config = ConfigBuilder::default().node_selection(NodeSelection::DepthFirst).build().unwrap();
        let (completion, _, _, _) = solve(config);
        assert!((completion.best_value.unwrap() + 20.0).abs() < 1e-6);
    }
    #[test]
    fn node_limit_stops_the_search() {
        let config = ConfigBuilder::default().node_limit(1).build().unwrap();
        let (completion, nodes, _, bound) = solve(config);
        assert_eq!(Reason::NodeLimit, completion.reason);
        assert!(!completion.is_exact());
        assert!((bound + 21.0).abs() < 1e-6);
        assert!(nodes.iter().skip(1).all(|n| n.status == NodeStatus::Interrupted));
    }
    #[test]
    fn elapsed_time_budget_yields_an_unknown_status() {
        let config = ConfigBuilder::default().time_limit(std::time::Duration::ZERO).build().unwrap();
        let (completion, _, _, _) = solve(config);
        assert_eq!(Reason::TimeLimit, completion.reason);
        assert_eq!(SolutionStatus::Unknown, completion.status);
    }
    #[test]
    fn infeasible_problem_is_proved_so() {
        let mut f = formulation();
        f.add_ctr(Constraint::ge("c3", LinExpr::from_term(VarId(0), 1.0), 4.5)).unwrap();
        f.add_ctr(Constraint::le("c4", LinExpr::from_term(VarId(0), 1.0), 4.8)).unwrap();
        let lp = HighsSolver::default();
        let relax = DirectRelaxation::new(&f, &lp, &Config::default()).unwrap();
        let mut solver = SequentialSolver::new(&relax, Config::default()).unwrap();
        let completion = solver.minimize().unwrap();
        assert_eq!(SolutionStatus::Infeasible, completion.status);
        assert!(completion.is_exact());
        assert!(solver.best_solution().is_none());
    }
    #[test]
    fn initial_primal_is_kept_when_nothing_better_exists() {
        let f = formulation();
        let lp = HighsSolver::default();
        let relax = DirectRelaxation::new(&f, &lp, &Config::default()).unwrap();
        let mut solver = SequentialSolver::new(&relax, Config::default()).unwrap();
        solver.set_primal(-20.0, vec![4.0, 0.0]);
        let completion = solver.minimize().unwrap();
        assert_eq!(Some(-20.0), completion.best_value);
        assert_eq!(Some(vec![4.0, 0.0]), solver.best_solution());
        assert_eq!(0.0, solver.gap());
    }
    #[test]
    fn unknown_branching_candidate_is_rejected() {
        let f = formulation();
        let lp = HighsSolver::default();
        let relax = DirectRelaxation::new(&f, &lp, &Config::default()).unwrap();
        let config = ConfigBuilder::default().branching_candidates(vec![VarId(9)]).build().unwrap();
        assert!(matches!(SequentialSolver::new(&relax, config), Err(Error::Configuration(_))));
    }
}
