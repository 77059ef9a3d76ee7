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

//! A primal heuristic which rounds the relaxation solution of a node.

use crate::{Callback, CallbackAction, CallbackContext, VarId};

/// Rounds the candidate variables of the node solution to their nearest
/// integer (within the bounds of the node) and proposes the result as an
/// incumbent candidate. The solver checks the feasibility of the proposal.
#[derive(Debug, Default, Clone)]
pub struct RoundingHeuristic {
    /// The variables to round. `None` means all integer and binary
    /// variables.
    candidates: Option<Vec<VarId>>,
}
impl RoundingHeuristic {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_candidates(candidates: Vec<VarId>) -> Self {
        RoundingHeuristic { candidates: Some(candidates) }
    }
}

impl Callback for RoundingHeuristic {
    fn name(&self) -> &str {
        "rounding"
    }

    fn on_node_solved(&self, context: &CallbackContext) -> Vec<CallbackAction> {
        let tol = context.tolerances.integrality;
        let all;
        let candidates = match &self.candidates {
            Some(c) => c.as_slice(),
            None    => { all = context.formulation.integer_vars(); all.as_slice() },
        };

        let mut rounded  = context.solution.to_vec();
        let mut changed  = false;
        for var in candidates.iter().copied() {
            let x = rounded[var.0];
            let (lb, ub) = context.bounds[var.0];
            let r = x.round().clamp(lb, ub);
            if (r - x).abs() > tol {
                changed = true;
            }
            rounded[var.0] = r;
        }
        if changed {
            vec![CallbackAction::Candidate(rounded)]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod test_rounding {
    use crate::*;

    fn context<'a>(f: &'a Formulation, bounds: &'a [(f64, f64)], solution: &'a [f64]) -> CallbackContext<'a> {
        CallbackContext {
            formulation: f,
            node       : NodeId(0),
            depth      : 0,
            bounds,
            solution,
            bound      : 0.0,
            incumbent  : None,
            tolerances : Tolerances::default(),
        }
    }

    fn formulation() -> Formulation {
        let mut f = Formulation::new("rounding");
        f.add_var("x", 0.0, 1.0, VarKind::Binary);
        f.add_var("y", 0.0, 5.0, VarKind::Integer);
        f.add_var("z", 0.0, 5.0, VarKind::Continuous);
        f
    }

    #[test]
    fn integer_variables_are_rounded() {
        let f = formulation();
        let bounds = [(0.0, 1.0), (0.0, 5.0), (0.0, 5.0)];
        let actions = RoundingHeuristic::new().on_node_solved(&context(&f, &bounds, &[0.7, 2.4, 1.5]));
        assert_eq!(vec![CallbackAction::Candidate(vec![1.0, 2.0, 1.5])], actions);
    }
    #[test]
    fn rounding_stays_within_the_node_bounds() {
        let f = formulation();
        let bounds = [(0.0, 0.0), (3.0, 5.0), (0.0, 5.0)];
        let actions = RoundingHeuristic::new().on_node_solved(&context(&f, &bounds, &[0.7, 2.4, 1.5]));
        assert_eq!(vec![CallbackAction::Candidate(vec![0.0, 3.0, 1.5])], actions);
    }
    #[test]
    fn integral_solution_yields_nothing() {
        let f = formulation();
        let bounds = [(0.0, 1.0), (0.0, 5.0), (0.0, 5.0)];
        let actions = RoundingHeuristic::new().on_node_solved(&context(&f, &bounds, &[1.0, 2.0, 1.5]));
        assert!(actions.is_empty());
    }
    #[test]
    fn only_the_given_candidates_are_rounded() {
        let f = formulation();
        let bounds = [(0.0, 1.0), (0.0, 5.0), (0.0, 5.0)];
        let heuristic = RoundingHeuristic::with_candidates(vec![VarId(1)]);
        let actions = heuristic.on_node_solved(&context(&f, &bounds, &[0.7, 2.4, 1.5]));
        assert_eq!(vec![CallbackAction::Candidate(vec![0.7, 2.0, 1.5])], actions);
        assert_eq!("rounding", heuristic.name());
    }
}
