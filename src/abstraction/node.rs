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

//! This module defines the `NodeRelaxation` trait: the abstraction of the
//! procedure computing the bound of one branch-and-bound node. It is
//! implemented by a plain LP relaxation as well as by column generation over
//! a Dantzig-Wolfe reformulation.

use crate::{BoundChange, Constraint, Cutoff, Error, Formulation, NodeId};

/// The description of a node to solve, relative to the root formulation.
#[derive(Debug, Clone, Copy)]
pub struct NodeSpec<'a> {
    pub id           : NodeId,
    pub depth        : usize,
    /// All the bound changes on the path from the root to this node (in that
    /// order)
    pub bound_changes: &'a [BoundChange],
    /// All the cuts which apply to this node
    pub cuts         : &'a [Constraint],
    /// The bound of the parent node
    pub parent_bound : f64,
}

/// The status of a solved node
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OutcomeStatus {
    /// The relaxation was solved to optimality
    Solved,
    /// The relaxation admits no solution
    Infeasible,
    /// The relaxation was not solved to optimality but its bound is proved
    /// to be no better than the incumbent
    PrunedByBound,
    /// The deadline elapsed before the relaxation could be solved
    TimeLimit,
    /// Column generation hit its iteration limit. The bound is valid and the
    /// solution is feasible for the relaxation, but the bound is not tight
    IterationLimit,
}

/// The result of solving the relaxation of a node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeOutcome {
    pub status    : OutcomeStatus,
    /// A valid lower bound on the value of any solution of the node
    pub bound     : f64,
    /// The relaxation solution, expressed in the original space
    pub solution  : Option<Vec<f64>>,
    /// Integer solutions found as a by-product of the relaxation (e.g. with
    /// the integer master heuristic). They still need to be checked.
    pub candidates: Vec<Vec<f64>>,
}
impl NodeOutcome {
    pub fn with_status(status: OutcomeStatus, bound: f64) -> Self {
        NodeOutcome { status, bound, solution: None, candidates: vec![] }
    }
}

/// Counters describing the work performed by a node relaxation
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct RelaxationStats {
    /// The number of restricted master (or LP) solves
    pub iterations: usize,
    /// The number of columns which were generated and accepted
    pub columns   : usize,
    /// The number of subproblems which have been solved
    pub pricings  : usize,
}

/// The procedure computing the bound of a branch-and-bound node.
pub trait NodeRelaxation {
    /// The original formulation being solved
    fn formulation(&self) -> &Formulation;
    /// Solves the relaxation of the given node. An error is returned when
    /// the relaxation solver fails in a way that does not prove anything
    /// about the node, or when some algorithmic invariant is broken.
    fn solve(&self, node: &NodeSpec, incumbent: Option<f64>, cutoff: &dyn Cutoff) -> Result<NodeOutcome, Error>;
    /// The work performed so far
    fn stats(&self) -> RelaxationStats {
        RelaxationStats::default()
    }
    /// Publishes what the nodes solved since the last call have learned and
    /// what is shared with the nodes solved afterwards (e.g. the column
    /// pools). It is only called while no node is being solved; until then,
    /// the nodes solved concurrently do not see each other's contributions.
    /// The contributions are published in the order of the node ids.
    fn synchronize(&self) {}
}
