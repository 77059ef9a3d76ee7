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

//! This module defines the `Solver` trait.

use crate::{Completion, Error, NodeSummary};

/// A solution assigns one value to each variable of the original formulation
pub type Solution = Vec<f64>;

/// This is the solver abstraction. It is implemented by the structures that
/// implement the branch-and-bound search (whatever the procedure used to
/// compute the bounds of the nodes).
pub trait Solver {
    /// This method orders the solver to search for the optimal solution among
    /// all possibilities. It returns a structure standing for the outcome of
    /// the attempted minimization. Such a `Completion` tells whether the best
    /// value was proved optimal, and if not, the reason why the search was
    /// interrupted. Four cases are to be distinguished:
    ///
    /// * When the status is `Optimal`, the `best_value` is the minimum value
    ///   of the objective function.
    /// * When the status is `BestKnown`, the `best_value` is the best value
    ///   of the objective function that was known at the time of cutoff.
    /// * When the status is `Infeasible`, the problem admits no solution.
    /// * When the status is `Unknown`, no feasible solution was found before
    ///   the cutoff occurred.
    ///
    /// An error is only returned in case the root node cannot be solved, or
    /// when some algorithmic invariant is violated.
    fn minimize(&mut self) -> Result<Completion, Error>;
    /// This method returns the value of the objective function for the best
    /// solution that has been found. It returns `None` when no solution exists
    /// to the problem.
    fn best_value(&self) -> Option<f64>;
    /// This method returns the best solution to the optimization problem.
    /// It returns `None` when no feasible solution is known.
    fn best_solution(&self) -> Option<Solution>;
    /// Returns the best lower bound that has been proved so far.
    /// In case where no bound has been computed, it returns -inf.
    fn best_bound(&self) -> f64;
    /// Returns the value of the incumbent or +inf if there is none.
    fn best_upper_bound(&self) -> f64 {
        self.best_value().unwrap_or(f64::INFINITY)
    }
    /// Sets a primal (best known value and solution) of the problem.
    fn set_primal(&mut self, value: f64, solution: Solution);
    /// Returns the number of nodes that have been explored so far.
    fn explored(&self) -> usize;
    /// Returns a summary of every node which was created
    fn nodes(&self) -> Vec<NodeSummary>;

    /// Computes the optimality gap
    fn gap(&self) -> f64 {
        let ub = self.best_upper_bound();
        let lb = self.best_bound();
        if !ub.is_finite() || !lb.is_finite() {
            1.0
        } else {
            let aub = ub.abs();
            let alb = lb.abs();
            let u = aub.max(alb);
            let l = aub.min(alb);

            if u == 0.0 { 0.0 } else { ((u - l) / u).max(0.0) }
        }
    }
}
