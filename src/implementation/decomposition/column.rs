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

//! This module defines the columns of the master problem: the solutions of
//! the pricing subproblems, along with their projection on the master.

use crate::{Error, LinExpr, Reformulation, VarId};

/// A solution of one subproblem, seen as a variable of the master problem.
///
/// Most columns are extreme points of the subproblem domain: their weights
/// sum to one in the convexity row of the subproblem. When the domain of a
/// subproblem is unbounded, its extreme rays are columns as well; these do
/// not take part in the convexity row.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// A sequence number, unique within the pool of the subproblem
    pub id          : u64,
    /// The index of the subproblem which generated the column
    pub subproblem  : usize,
    /// The value of each subproblem variable
    pub values      : Vec<f64>,
    /// The same solution expressed on the original variables (non zeroes only)
    pub support     : Vec<(VarId, f64)>,
    /// The cost of the column in the original objective
    pub cost        : f64,
    /// The reduced cost of the column when it was generated
    pub reduced_cost: f64,
    /// The coefficient of the column in each master constraint of the
    /// reformulation (in the order of `Reformulation::master_ctrs`)
    pub coefficients: Vec<f64>,
    /// True iff `values` is a direction (extreme ray) rather than a point
    pub ray         : bool,
}

impl Column {
    /// Creates the column standing for the solution `values` of subproblem `k`
    pub fn new(reformulation: &Reformulation, k: usize, values: Vec<f64>, reduced_cost: f64) -> Self {
        Self::build(reformulation, k, values, reduced_cost, false)
    }
    /// Creates the column standing for the direction `ray` along which the
    /// domain of subproblem `k` is unbounded
    pub fn ray(reformulation: &Reformulation, k: usize, ray: Vec<f64>, reduced_cost: f64) -> Self {
        Self::build(reformulation, k, ray, reduced_cost, true)
    }

    fn build(reformulation: &Reformulation, k: usize, values: Vec<f64>, reduced_cost: f64, ray: bool) -> Self {
        let original = reformulation.original();
        let support: Vec<(VarId, f64)> = reformulation.subproblems()[k].to_original.iter()
            .zip(values.iter())
            .filter(|(_, x)| **x != 0.0)
            .map(|(v, x)| (*v, *x))
            .collect();
        let cost = support.iter().map(|(v, x)| original.objective().coef(*v) * x).sum();
        let coefficients = reformulation.master_ctrs().iter()
            .map(|c| {
                let expr = &original.ctr(*c).expr;
                support.iter().map(|(v, x)| expr.coef(*v) * x).sum()
            })
            .collect();
        Column { id: 0, subproblem: k, values, support, cost, reduced_cost, coefficients, ray }
    }

    /// The coefficient of the column in a row expressed on the original
    /// variables
    pub fn project(&self, expr: &LinExpr) -> f64 {
        self.support.iter().map(|(v, x)| expr.coef(*v) * x).sum()
    }

    /// Checks that the coefficients of the column are the exact projection of
    /// its subproblem solution on the master constraints.
    pub fn verify(&self, reformulation: &Reformulation) -> Result<(), Error> {
        let original = reformulation.original();
        let ctrs = reformulation.master_ctrs();
        if ctrs.len() != self.coefficients.len() {
            return Err(Error::InvariantViolation(
                format!("column {} has {} coefficients for {} master constraints", self.id, self.coefficients.len(), ctrs.len())));
        }
        for (c, coef) in ctrs.iter().zip(self.coefficients.iter()) {
            let expected = self.project(&original.ctr(*c).expr);
            if (expected - coef).abs() > 1e-9 * (1.0 + expected.abs()) {
                return Err(Error::InvariantViolation(
                    format!("column {} of subproblem {} has coefficient {} instead of {} in {}",
                        self.id, self.subproblem, coef, expected, original.ctr(*c).name)));
            }
        }
        let sp = &reformulation.subproblems()[self.subproblem];
        let cost: f64 = sp.to_original.iter().zip(self.values.iter())
            .map(|(v, x)| original.objective().coef(*v) * x)
            .sum();
        if (cost - self.cost).abs() > 1e-9 * (1.0 + cost.abs()) {
            return Err(Error::InvariantViolation(
                format!("column {} of subproblem {} costs {} instead of {}", self.id, self.subproblem, self.cost, cost)));
        }
        Ok(())
    }
}
