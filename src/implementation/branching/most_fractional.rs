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

//! This module provides the most fractional (a.k.a. most infeasible)
//! branching rule.

use crate::{Branching, BranchingContext, BranchingRule, fractionality};

/// Branches on the candidate whose relaxation value is the farthest from its
/// nearest integer. Ties are broken in favor of the lowest variable index.
///
/// A candidate is eligible when its value is fractional (beyond the
/// integrality tolerance) and its domain at the node is not a single value.
///
/// # Example
/// ```
/// # use bnp::*;
/// let mut f = Formulation::new("f");
/// let x = f.add_var("x", 0.0, 10.0, VarKind::Integer);
/// let y = f.add_var("y", 0.0, 10.0, VarKind::Integer);
/// let context = BranchingContext {
///     formulation: &f,
///     solution   : &[2.4, 3.5],
///     candidates : &[x, y],
///     bounds     : &[(0.0, 10.0), (0.0, 10.0)],
///     tolerance  : 1e-6,
/// };
/// let branching = MostFractional.select(&context).unwrap();
/// assert_eq!(y, branching.var);
/// let [down, up] = branching.children();
/// assert_eq!(3.0, down.ub);
/// assert_eq!(4.0, up.lb);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct MostFractional;

impl BranchingRule for MostFractional {
    fn select(&self, context: &BranchingContext) -> Option<Branching> {
        let mut best: Option<(f64, Branching)> = None;
        for var in context.candidates.iter().copied() {
            let (lb, ub) = context.bounds[var.0];
            if ub - lb < 1.0 - context.tolerance {
                continue;
            }
            let value = context.solution[var.0];
            let frac  = fractionality(value);
            if frac <= context.tolerance {
                continue;
            }
            let better = match best {
                None => true,
                Some((f, b)) => frac > f || (frac == f && var < b.var),
            };
            if better {
                best = Some((frac, Branching { var, value }));
            }
        }
        best.map(|(_, b)| b)
    }
}

#[cfg(test)]
mod test_most_fractional {
    use crate::*;

    fn formulation(n: usize) -> Formulation {
        let mut f = Formulation::new("f");
        for i in 0..n {
            f.add_var(format!("x{}", i), 0.0, 1.0, VarKind::Binary);
        }
        f
    }
    fn select(f: &Formulation, solution: &[f64], candidates: &[VarId], bounds: &[(f64, f64)]) -> Option<Branching> {
        MostFractional.select(&BranchingContext { formulation: f, solution, candidates, bounds, tolerance: 1e-6 })
    }

    #[test]
    fn it_picks_the_value_closest_to_one_half() {
        let f = formulation(3);
        let b = select(&f, &[0.2, 0.45, 0.9], &[VarId(0), VarId(1), VarId(2)], &[(0.0, 1.0); 3]).unwrap();
        assert_eq!(VarId(1), b.var);
    }
    #[test]
    fn ties_go_to_the_lowest_index() {
        let f = formulation(3);
        let b = select(&f, &[0.0, 0.5, 0.5], &[VarId(2), VarId(1), VarId(0)], &[(0.0, 1.0); 3]).unwrap();
        assert_eq!(VarId(1), b.var);
    }
    #[test]
    fn integral_solutions_yield_no_branching() {
        let f = formulation(3);
        assert!(select(&f, &[0.0, 1.0, 1.0 - 1e-9], &[VarId(0), VarId(1), VarId(2)], &[(0.0, 1.0); 3]).is_none());
    }
    #[test]
    fn non_candidates_and_fixed_variables_are_not_eligible() {
        let f = formulation(3);
        let bounds = [(0.0, 1.0), (1.0, 1.0), (0.0, 1.0)];
        assert!(select(&f, &[0.5, 0.5, 0.5], &[VarId(1)], &bounds).is_none());
        let b = select(&f, &[0.5, 0.5, 0.3], &[VarId(1), VarId(2)], &bounds).unwrap();
        assert_eq!(VarId(2), b.var);
    }
    #[test]
    fn children_split_the_domain_around_the_value() {
        let b = Branching { var: VarId(4), value: 2.3 };
        let [down, up] = b.children();
        assert_eq!(BoundChange::upper(VarId(4), 2.0), down);
        assert_eq!(BoundChange::lower(VarId(4), 3.0), up);
    }
}
