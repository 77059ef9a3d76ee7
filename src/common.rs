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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client code is likely to work with.

use std::fmt;

// ----------------------------------------------------------------------------
// --- IDENTIFIERS ------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a variable of some formulation. Each variable is
/// identified with an integer ranging from 0 until `formulation.nb_vars()`.
/// A `VarId` is only meaningful w.r.t. the formulation that declared it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VarId(pub usize);
impl VarId {
    #[inline]
    /// This function returns the id (numeric value) of the variable.
    ///
    /// # Examples:
    /// ```
    /// # use bnp::VarId;
    /// assert_eq!(0, VarId(0).id());
    /// assert_eq!(3, VarId(3).id());
    /// ```
    pub fn id(self) -> usize {
        self.0
    }
}

/// This type denotes a constraint of some formulation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct CtrId(pub usize);
impl CtrId {
    #[inline]
    pub fn id(self) -> usize {
        self.0
    }
}

/// The index of a node in the arena of the branch-and-bound tree.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub usize);
impl NodeId {
    #[inline]
    pub fn id(self) -> usize {
        self.0
    }
}

// ----------------------------------------------------------------------------
// --- DECOMPOSITION ----------------------------------------------------------
// ----------------------------------------------------------------------------
/// The partition a constraint belongs to in a Dantzig-Wolfe decomposition.
/// Subproblem tags need not be contiguous: each distinct tag value yields
/// one subproblem and subproblems are ordered by increasing tag.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Partition {
    Master,
    Subproblem(usize),
}

// ----------------------------------------------------------------------------
// --- BRANCHING --------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A local override of the bounds of one variable of the original
/// formulation. The node of a branch-and-bound tree is characterized by
/// the list of all the overrides collected on the path from the root.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundChange {
    pub var: VarId,
    pub lb : f64,
    pub ub : f64,
}
impl BoundChange {
    /// Creates an override imposing `var <= ub`
    pub fn upper(var: VarId, ub: f64) -> Self {
        BoundChange { var, lb: f64::NEG_INFINITY, ub }
    }
    /// Creates an override imposing `var >= lb`
    pub fn lower(var: VarId, lb: f64) -> Self {
        BoundChange { var, lb, ub: f64::INFINITY }
    }
    /// Tightens the given bounds with this override and returns the result.
    pub fn tighten(&self, (lb, ub): (f64, f64)) -> (f64, f64) {
        (lb.max(self.lb), ub.min(self.ub))
    }
}
impl fmt::Display for BoundChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lb.is_finite(), self.ub.is_finite()) {
            (true, true)  => write!(f, "{} <= x{} <= {}", self.lb, self.var.0, self.ub),
            (true, false) => write!(f, "x{} >= {}", self.var.0, self.lb),
            (false, true) => write!(f, "x{} <= {}", self.var.0, self.ub),
            (false,false) => write!(f, "x{} free", self.var.0),
        }
    }
}

// ----------------------------------------------------------------------------
// --- OPEN NODES -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The light weight handle of a branch-and-bound node which still needs to be
/// explored. This is what gets stored on the fringe: the full node data lives
/// in the arena of the tree.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OpenNode {
    /// The position of the node in the arena
    pub id   : NodeId,
    /// A lower bound on the value of any solution in the subtree of the node
    /// (the bound of its parent, until the node is solved)
    pub bound: f64,
    /// The number of branchings between the root and this node
    pub depth: usize,
}

/// The life cycle of a node of the branch-and-bound tree
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NodeStatus {
    /// The node waits on the fringe
    Open,
    /// The relaxation was solved and its solution is fractional: the node
    /// has been branched on
    SolvedFractional,
    /// The relaxation was solved and its solution is integral
    SolvedInteger,
    /// The relaxation admits no feasible solution
    Infeasible,
    /// The bound of the node is no better than the incumbent
    Pruned,
    /// The exploration of the node was interrupted by some limit
    Interrupted,
}

/// A summary of one node of the branch-and-bound tree
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NodeSummary {
    pub id    : NodeId,
    pub parent: Option<NodeId>,
    pub depth : usize,
    pub status: NodeStatus,
    pub bound : f64,
}

// ----------------------------------------------------------------------------
// --- TOLERANCES -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The numerical tolerances used throughout the search.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerances {
    /// A value within this distance of an integer is considered integral
    pub integrality: f64,
    /// A column is only improving if its reduced cost is below `-reduced_cost`
    pub reduced_cost: f64,
    /// Slack allowed when checking that a candidate satisfies the constraints
    pub feasibility: f64,
    /// An incumbent is only replaced if the candidate improves it by more
    /// than this amount. It is also the margin used for pruning by bound.
    pub improvement: f64,
}
impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            integrality : 1e-6,
            reduced_cost: 1e-6,
            feasibility : 1e-6,
            improvement : 1e-6,
        }
    }
}

/// Returns the distance between `x` and its nearest integer.
#[inline]
pub fn fractionality(x: f64) -> f64 {
    (x - x.round()).abs()
}

// ----------------------------------------------------------------------------
// --- Results ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The status of the best solution known at the end of a solve.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SolutionStatus {
    /// The best value is proved optimal
    Optimal,
    /// A feasible solution is known, but the search was interrupted before
    /// optimality could be proved
    BestKnown,
    /// The problem was proved to admit no feasible solution
    Infeasible,
    /// The search was interrupted before any feasible solution was found
    Unknown,
}
impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal    => write!(f, "Optimal"),
            SolutionStatus::BestKnown  => write!(f, "BestKnown"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unknown    => write!(f, "Unknown"),
        }
    }
}

/// A reason explaining why the search stopped
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Reason {
    /// All open nodes were explored
    Exhausted,
    /// The configured time budget is elapsed
    TimeLimit,
    /// The configured maximum number of nodes has been explored
    NodeLimit,
    /// Some node hit its column generation iteration limit: its bound is
    /// valid but the subtree was not proved optimal
    IterationLimit,
}
impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Exhausted      => write!(f, "Exhausted"),
            Reason::TimeLimit      => write!(f, "TimeLimit"),
            Reason::NodeLimit      => write!(f, "NodeLimit"),
            Reason::IterationLimit => write!(f, "IterationLimit"),
        }
    }
}

/// The outcome of a call to `Solver::minimize`
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub status: SolutionStatus,
    pub reason: Reason,
    /// if present the value of the best solution that was found
    pub best_value: Option<f64>,
}
impl Completion {
    /// Is the given solution exact (proved optimal, or the problem proved
    /// infeasible) or is it an approximation ?
    pub fn is_exact(&self) -> bool {
        self.reason == Reason::Exhausted
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_common {
    use crate::*;

    #[test]
    fn test_var_id() {
        assert_eq!(0, VarId(0).id());
        assert_eq!(1, VarId(1).id());
        assert_eq!(2, CtrId(2).id());
        assert_eq!(3, NodeId(3).id());
    }

    #[test]
    fn tighten_keeps_the_most_restrictive_bounds() {
        let up = BoundChange::upper(VarId(0), 3.0);
        assert_eq!((0.0, 3.0), up.tighten((0.0, 10.0)));
        assert_eq!((0.0, 2.0), up.tighten((0.0, 2.0)));
        let lo = BoundChange::lower(VarId(0), 4.0);
        assert_eq!((4.0, 10.0), lo.tighten((0.0, 10.0)));
        assert_eq!((5.0, 10.0), lo.tighten((5.0, 10.0)));
    }

    #[test]
    fn fractionality_is_the_distance_to_nearest_integer() {
        assert!((fractionality(0.5) - 0.5).abs() < 1e-12);
        assert!((fractionality(2.25) - 0.25).abs() < 1e-12);
        assert!((fractionality(-1.75) - 0.25).abs() < 1e-12);
        assert!(fractionality(3.0) < 1e-12);
    }

    #[test]
    fn only_exhausted_searches_are_exact() {
        let c = Completion { status: SolutionStatus::Optimal, reason: Reason::Exhausted, best_value: Some(1.0) };
        assert!(c.is_exact());
        let c = Completion { status: SolutionStatus::BestKnown, reason: Reason::TimeLimit, best_value: Some(1.0) };
        assert!(!c.is_exact());
    }
}
