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

//! This module provides the two strategies coping with an infeasible
//! restricted master.

use crate::{InfeasibilityStrategy, RelaxationResult};

/// Every master row receives artificial variables with a large penalty cost
/// so that the master is always feasible. When artificials are still used
/// once column generation has converged, the penalty is multiplied by
/// `growth` (at most `limit` times) before the master is deemed infeasible.
#[derive(Debug, Clone, Copy)]
pub struct ArtificialCost {
    pub penalty: f64,
    pub growth : f64,
    pub limit  : usize,
}
impl ArtificialCost {
    pub fn new(penalty: f64, growth: f64, limit: usize) -> Self {
        ArtificialCost { penalty, growth, limit }
    }
}
impl InfeasibilityStrategy for ArtificialCost {
    fn initial_penalty(&self) -> Option<f64> {
        Some(self.penalty)
    }
    fn restoring_prices(&self, _master: &RelaxationResult) -> Option<Vec<f64>> {
        None
    }
    fn escalate(&self, penalty: f64, attempt: usize) -> Option<f64> {
        if attempt < self.limit {
            Some(penalty * self.growth)
        } else {
            None
        }
    }
}

/// No artificial variable is used. When the master is infeasible, the
/// subproblems are priced against its Farkas certificate (with zero original
/// costs) so as to find a column that destroys the certificate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FarkasPricing;
impl InfeasibilityStrategy for FarkasPricing {
    fn initial_penalty(&self) -> Option<f64> {
        None
    }
    fn restoring_prices(&self, master: &RelaxationResult) -> Option<Vec<f64>> {
        master.farkas.clone()
    }
    fn escalate(&self, _penalty: f64, _attempt: usize) -> Option<f64> {
        None
    }
}
