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

//! This module provides the branch-and-bound solvers. Both of them process
//! the nodes the same way (see `explore`) and keep track of the search with
//! a `SearchState`; they only differ in the way nodes are scheduled.
mod tree;
mod explore;
mod sequential;
mod parallel;

pub use tree::*;
pub use sequential::*;
pub use parallel::*;

use crate::{Completion, Config, Error, Fringe, NodeId, NodeRelaxation, NodeSelection, NodeStatus, OpenNode, Reason, SimpleFringe, Solution, SolutionStatus, Tolerances, VarId};

use explore::{Explored, Task, Verdict};

/// The default solver: nodes are processed by a pool of threads.
pub type DefaultSolver<'a> = ParallelSolver<'a>;

/// The bookkeeping of one search: the tree, the open nodes and the
/// incumbent.
pub(crate) struct SearchState {
    pub tree     : SearchTree,
    pub fringe   : SimpleFringe<NodeSelection>,
    pub best     : Option<(f64, Solution)>,
    pub explored : usize,
    /// Set when some node could not be closed because of the column
    /// generation iteration limit
    pub iteration_limited: bool,
    tolerances   : Tolerances,
}

impl SearchState {
    pub fn new(config: &Config) -> Self {
        SearchState {
            tree      : SearchTree::new(),
            fringe    : SimpleFringe::new(config.node_selection),
            best      : None,
            explored  : 0,
            iteration_limited: false,
            tolerances: config.tolerances,
        }
    }

    /// Forgets everything but the given incumbent and creates the root node
    pub fn reset(&mut self, primal: Option<(f64, Solution)>) {
        self.tree.clear();
        self.fringe.clear();
        self.best = primal;
        self.explored = 0;
        self.iteration_limited = false;
        let root = self.tree.root();
        self.fringe.push(OpenNode { id: root, bound: f64::NEG_INFINITY, depth: 0 });
    }

    pub fn best_value(&self) -> Option<f64> {
        self.best.as_ref().map(|(v, _)| *v)
    }

    /// Replaces the incumbent when `value` improves it by more than the
    /// improvement tolerance.
    pub fn maybe_update_best(&mut self, value: f64, solution: Solution) -> bool {
        let improves = self.best_value().map_or(true, |b| value < b - self.tolerances.improvement);
        if improves {
            self.best = Some((value, solution));
        }
        improves
    }

    /// Returns true when the given bound cannot lead to a better solution
    pub fn is_pruned(&self, bound: f64) -> bool {
        self.best_value().map_or(false, |b| bound >= b - self.tolerances.improvement)
    }

    /// Pops the next node worth exploring. The nodes which are pruned by the
    /// incumbent are closed on the way.
    pub fn pop(&mut self) -> Option<OpenNode> {
        while let Some(open) = self.fringe.pop() {
            if self.is_pruned(open.bound) {
                self.tree.close(open.id, NodeStatus::Pruned, open.bound);
            } else {
                return Some(open);
            }
        }
        None
    }

    pub fn task(&self, open: OpenNode) -> Task {
        let (changes, cuts) = self.tree.path(open.id);
        Task { id: open.id, depth: open.depth, changes, cuts, bound: open.bound }
    }

    /// Applies the verdict of a processed node. Returns the reason why the
    /// search must stop (if it must).
    pub fn apply(&mut self, id: NodeId, explored: Explored) -> Option<Reason> {
        for (value, solution) in explored.candidates {
            self.maybe_update_best(value, solution);
        }
        self.tree.get_mut(id).cuts = explored.cuts;
        match explored.verdict {
            Verdict::Pruned(bound) => self.tree.close(id, NodeStatus::Pruned, bound),
            Verdict::Infeasible => self.tree.close(id, NodeStatus::Infeasible, f64::INFINITY),
            Verdict::Integer(bound) => self.tree.close(id, NodeStatus::SolvedInteger, bound),
            Verdict::Branch { bound, branching } => {
                self.tree.close(id, NodeStatus::SolvedFractional, bound);
                if !self.is_pruned(bound) {
                    for change in branching.children() {
                        let child = self.tree.add_child(id, change, bound);
                        let depth = self.tree.get(child).depth;
                        self.fringe.push(OpenNode { id: child, bound, depth });
                    }
                }
            },
            Verdict::Interrupted { bound, reason } => {
                self.tree.close(id, NodeStatus::Interrupted, bound);
                match reason {
                    Reason::IterationLimit => self.iteration_limited = true,
                    other => return Some(other),
                }
            },
        }
        None
    }

    /// A node whose relaxation failed in a recoverable way is deemed
    /// infeasible.
    pub fn discard(&mut self, id: NodeId) {
        self.tree.close(id, NodeStatus::Infeasible, f64::INFINITY);
    }

    /// The lowest bound that is proved so far
    pub fn best_bound(&self) -> f64 {
        let open = self.fringe.min_bound().unwrap_or(f64::INFINITY);
        self.tree.unproved_bound()
            .min(open)
            .min(self.best_value().unwrap_or(f64::INFINITY))
    }

    /// Closes the search and summarizes its outcome
    pub fn complete(&mut self, reason: Option<Reason>) -> Completion {
        let reason = match reason {
            Some(reason) => {
                self.fringe.clear();
                self.tree.interrupt_open();
                reason
            },
            None if self.iteration_limited => Reason::IterationLimit,
            None => Reason::Exhausted,
        };
        let best_value = self.best_value();
        let status = match (best_value.is_some(), reason == Reason::Exhausted) {
            (true,  true)  => SolutionStatus::Optimal,
            (true,  false) => SolutionStatus::BestKnown,
            (false, true)  => SolutionStatus::Infeasible,
            (false, false) => SolutionStatus::Unknown,
        };
        Completion { status, reason, best_value }
    }
}

/// The variables eligible for branching
pub(crate) fn branching_candidates(relaxation: &dyn NodeRelaxation, config: &Config) -> Result<Vec<VarId>, Error> {
    let formulation = relaxation.formulation();
    match &config.branching_candidates {
        None => Ok(formulation.integer_vars()),
        Some(candidates) => {
            if let Some(v) = candidates.iter().find(|v| v.0 >= formulation.nb_vars()) {
                return Err(Error::Configuration(format!("unknown branching candidate {}", v.0)));
            }
            Ok(candidates.clone())
        }
    }
}

#[cfg(test)]
mod test_search_state {
    use crate::*;
    use crate::implementation::solver::SearchState;
    use crate::implementation::solver::explore::{Explored, Verdict};

    fn explored(verdict: Verdict) -> Explored {
        Explored { verdict, cuts: vec![], candidates: vec![] }
    }

    #[test]
    fn reset_posts_the_root() {
        let mut state = SearchState::new(&Config::default());
        state.reset(None);
        assert_eq!(1, state.tree.len());
        assert_eq!(1, state.fringe.len());
        assert_eq!(f64::NEG_INFINITY, state.best_bound());
    }
    #[test]
    fn incumbent_must_strictly_improve() {
        let mut state = SearchState::new(&Config::default());
        state.reset(None);
        assert!(state.maybe_update_best(10.0, vec![1.0]));
        assert!(!state.maybe_update_best(10.0 - 1e-9, vec![2.0]));
        assert!(state.maybe_update_best(9.0, vec![3.0]));
        assert_eq!(Some(9.0), state.best_value());
    }
    #[test]
    fn branching_creates_two_children_with_the_parent_bound() {
        let mut state = SearchState::new(&Config::default());
        state.reset(None);
        let root = state.pop().unwrap();
        let branching = Branching { var: VarId(0), value: 0.5 };
        assert!(state.apply(root.id, explored(Verdict::Branch { bound: 3.0, branching })).is_none());
        assert_eq!(3, state.tree.len());
        assert_eq!(2, state.fringe.len());
        assert_eq!(NodeStatus::SolvedFractional, state.tree.get(root.id).status);
        assert_eq!(3.0, state.best_bound());
        let child = state.pop().unwrap();
        assert_eq!(3.0, child.bound);
        assert_eq!(1, child.depth);
    }
    #[test]
    fn open_nodes_are_pruned_by_a_better_incumbent() {
        let mut state = SearchState::new(&Config::default());
        state.reset(None);
        let root = state.pop().unwrap();
        let branching = Branching { var: VarId(0), value: 0.5 };
        state.apply(root.id, explored(Verdict::Branch { bound: 3.0, branching }));
        state.maybe_update_best(3.0, vec![0.0]);
        assert!(state.pop().is_none());
        let completion = state.complete(None);
        assert_eq!(SolutionStatus::Optimal, completion.status);
        assert_eq!(Reason::Exhausted, completion.reason);
        assert_eq!(3.0, state.best_bound());
    }
    #[test]
    fn time_limit_interrupts_the_search() {
        let mut state = SearchState::new(&Config::default());
        state.reset(None);
        let root = state.pop().unwrap();
        let reason = state.apply(root.id, explored(Verdict::Interrupted { bound: 1.0, reason: Reason::TimeLimit }));
        assert_eq!(Some(Reason::TimeLimit), reason);
        let completion = state.complete(reason);
        assert_eq!(SolutionStatus::Unknown, completion.status);
        assert_eq!(1.0, state.best_bound());
    }
    #[test]
    fn iteration_limit_only_weakens_the_proof() {
        let mut state = SearchState::new(&Config::default());
        state.reset(None);
        let root = state.pop().unwrap();
        let mut e = explored(Verdict::Interrupted { bound: 1.0, reason: Reason::IterationLimit });
        e.candidates.push((2.0, vec![1.0]));
        assert!(state.apply(root.id, e).is_none());
        let completion = state.complete(None);
        assert_eq!(Reason::IterationLimit, completion.reason);
        assert_eq!(SolutionStatus::BestKnown, completion.status);
        assert_eq!(Some(2.0), completion.best_value);
    }
    #[test]
    fn exhausted_search_without_solution_is_infeasible() {
        let mut state = SearchState::new(&Config::default());
        state.reset(None);
        let root = state.pop().unwrap();
        state.apply(root.id, explored(Verdict::Infeasible));
        let completion = state.complete(None);
        assert_eq!(SolutionStatus::Infeasible, completion.status);
        assert_eq!(f64::INFINITY, state.best_bound());
    }
}
