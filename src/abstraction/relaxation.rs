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

//! This module defines the contract of the engine which is used to solve the
//! linear (or integer) relaxation of a formulation. The branch-and-price core
//! never solves an LP by itself: it always delegates that task to some
//! `RelaxationSolver`.

use std::time::Instant;

use crate::Formulation;

/// What the relaxation solver is asked to do
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RequestKind {
    /// Solve the continuous relaxation (integrality requirements are ignored)
    /// and report the dual values of the constraints
    Lp,
    /// Solve the formulation with its integrality requirements
    Integer,
}

/// The status of a relaxation solve
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RelaxationStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// The deadline elapsed. The primal values (if any) are those of the best
    /// solution found before the deadline.
    TimeLimit,
    Error,
}

/// The outcome of a call to `RelaxationSolver::solve`.
///
/// # Sign conventions
/// All formulations are minimized. The duals `y` are such that the reduced
/// cost of a variable `j` is `c_j - sum_i y_i a_ij`. Hence, in an optimal
/// solution, the dual of a `<=` row is non positive and the dual of a `>=`
/// row is non negative.
///
/// When an LP is infeasible, `farkas` (if present) holds a certificate `y`
/// (one value per constraint) such that `y.b > 0` and `y.A_j <= 0` for every
/// column `j` of the formulation which is not bounded from above. A new
/// column `a` can only restore the feasibility of the LP if `y.a > 0`.
///
/// When an LP (or the continuous relaxation of an integer problem) is
/// unbounded, `ray` (if present) holds a direction `d` (one value per
/// variable) such that `c.d < 0` and `x + t d` remains feasible for every
/// feasible `x` and `t >= 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationResult {
    pub status   : RelaxationStatus,
    /// The objective value. Only present when the status is `Optimal` (or
    /// when a time limited integer solve found some solution)
    pub objective: Option<f64>,
    /// One value per variable (empty when no solution is known)
    pub primal   : Vec<f64>,
    /// One value per constraint (empty unless an LP was solved to optimality)
    pub duals    : Vec<f64>,
    /// A Farkas certificate of infeasibility, one value per constraint
    pub farkas   : Option<Vec<f64>>,
    /// An improving direction of unboundedness, one value per variable
    pub ray      : Option<Vec<f64>>,
}
impl RelaxationResult {
    /// A result that carries no information beyond its status
    pub fn with_status(status: RelaxationStatus) -> Self {
        RelaxationResult { status, objective: None, primal: vec![], duals: vec![], farkas: None, ray: None }
    }
    pub fn is_optimal(&self) -> bool {
        self.status == RelaxationStatus::Optimal
    }
}

/// This is the abstraction of an external LP/MIP engine.
///
/// # Contract
/// * The formulation is never modified.
/// * When a `deadline` is given, the solver returns no later than (roughly)
///   that instant with a status `TimeLimit` if it could not finish.
/// * Numerical trouble is reported with the status `Error`, never with a
///   panic.
pub trait RelaxationSolver {
    fn solve(&self, formulation: &Formulation, kind: RequestKind, deadline: Option<Instant>) -> RelaxationResult;
}
