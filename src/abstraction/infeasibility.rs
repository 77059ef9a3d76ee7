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

//! This module defines the strategy used to restore the feasibility of a
//! restricted master problem which does not (yet) hold enough columns.

use crate::RelaxationResult;

/// An infeasibility strategy decides how the column generation copes with a
/// restricted master that cannot satisfy its constraints.
pub trait InfeasibilityStrategy {
    /// The penalty cost of the artificial variables which must be added to
    /// the master (one per row). `None` means no artificial is used at all.
    fn initial_penalty(&self) -> Option<f64>;
    /// Given the result of an infeasible master, returns the prices that must
    /// be used to look for a feasibility restoring column. `None` means the
    /// infeasibility cannot be repaired by pricing.
    fn restoring_prices(&self, master: &RelaxationResult) -> Option<Vec<f64>>;
    /// When artificial variables are still in use at convergence, this method
    /// returns the increased penalty to retry with. `attempt` counts the
    /// escalations that were already performed. `None` means the master must
    /// be deemed infeasible.
    fn escalate(&self, penalty: f64, attempt: usize) -> Option<f64>;
}
