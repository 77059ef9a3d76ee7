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

//! This module provides the `DirectRelaxation`: the node relaxation which
//! simply solves the LP relaxation of the original formulation (with the
//! bounds and cuts of the node) through the relaxation solver.

use std::time::Duration;

use parking_lot::Mutex;

use crate::{relaxation_deadline, Config, Cutoff, Error, Formulation, NodeOutcome, NodeRelaxation, NodeSpec, OutcomeStatus, RelaxationSolver, RelaxationStats, RelaxationStatus, RequestKind};

/// Plain LP based branch-and-bound relaxation
pub struct DirectRelaxation<'a> {
    formulation: Formulation,
    solver     : &'a (dyn RelaxationSolver + Send + Sync),
    time_limit : Option<Duration>,
    stats      : Mutex<RelaxationStats>,
}

impl <'a> DirectRelaxation<'a> {
    pub fn new(formulation: &Formulation, solver: &'a (dyn RelaxationSolver + Send + Sync), config: &Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(DirectRelaxation {
            formulation: formulation.clone(),
            solver,
            time_limit : config.relaxation_time_limit,
            stats      : Mutex::new(RelaxationStats::default()),
        })
    }

    /// The LP of a node: the original formulation with tightened bounds and
    /// the node cuts
    fn node_lp(&self, node: &NodeSpec) -> Result<Formulation, Error> {
        let mut lp = self.formulation.clone();
        for change in node.bound_changes {
            if change.var.0 >= lp.nb_vars() {
                return Err(Error::Model(format!("bound change on unknown variable {}", change.var.0)));
            }
            let v = lp.var(change.var);
            let (lb, ub) = change.tighten((v.lb, v.ub));
            lp.set_bounds(change.var, lb, ub);
        }
        for cut in node.cuts {
            lp.add_ctr(cut.clone())?;
        }
        Ok(lp)
    }
}

impl NodeRelaxation for DirectRelaxation<'_> {
    fn formulation(&self) -> &Formulation {
        &self.formulation
    }

    fn solve(&self, node: &NodeSpec, _incumbent: Option<f64>, cutoff: &dyn Cutoff) -> Result<NodeOutcome, Error> {
        if cutoff.must_stop() {
            return Ok(NodeOutcome::with_status(OutcomeStatus::TimeLimit, node.parent_bound));
        }
        let lp  = self.node_lp(node)?;
        let res = self.solver.solve(&lp, RequestKind::Lp, relaxation_deadline(cutoff, self.time_limit));
        self.stats.lock().iterations += 1;

        match res.status {
            RelaxationStatus::Optimal => {
                let Some(z) = res.objective else {
                    return Err(Error::Solver { status: res.status, context: format!("lp of node {} has no objective", node.id.0) });
                };
                Ok(NodeOutcome {
                    status    : OutcomeStatus::Solved,
                    bound     : z.max(node.parent_bound),
                    solution  : Some(res.primal),
                    candidates: vec![],
                })
            },
            RelaxationStatus::Infeasible => Ok(NodeOutcome::with_status(OutcomeStatus::Infeasible, f64::INFINITY)),
            RelaxationStatus::TimeLimit  => Ok(NodeOutcome::with_status(OutcomeStatus::TimeLimit, node.parent_bound)),
            status => Err(Error::Solver { status, context: format!("lp of node {}", node.id.0) }),
        }
    }

    fn stats(&self) -> RelaxationStats {
        *self.stats.lock()
    }
}

#[cfg(test)]
mod test_direct {
    use crate::*;

    /// max 5x + 4y st. 6x + 4y <= 24 ; x + 2y <= 6 (as a minimization)
    fn lp() -> Formulation {
        let mut f = Formulation::new("direct");
        let x = f.add_var("x", 0.0, 10.0, VarKind::Integer);
        let y = f.add_var("y", 0.0, 10.0, VarKind::Integer);
        f.add_ctr(Constraint::le("c1", LinExpr::new().term(x, 6.0).term(y, 4.0), 24.0)).unwrap();
        f.add_ctr(Constraint::le("c2", LinExpr::new().term(x, 1.0).term(y, 2.0), 6.0)).unwrap();
        f.set_objective(LinExpr::new().term(x, -5.0).term(y, -4.0)).unwrap();
        f
    }

    fn spec<'a>(changes: &'a [BoundChange], cuts: &'a [Constraint]) -> NodeSpec<'a> {
        NodeSpec { id: NodeId(0), depth: 0, bound_changes: changes, cuts, parent_bound: f64::NEG_INFINITY }
    }

    #[test]
    fn root_lp_is_solved() {
        let f = lp();
        let solver = HighsSolver::default();
        let relax  = DirectRelaxation::new(&f, &solver, &Config::default()).unwrap();
        let outcome = relax.solve(&spec(&[], &[]), None, &NoCutoff).unwrap();
        assert_eq!(OutcomeStatus::Solved, outcome.status);
        assert!((outcome.bound + 21.0).abs() < 1e-6);
        let x = outcome.solution.unwrap();
        assert!((x[0] - 3.0).abs() < 1e-6);
        assert!((x[1] - 1.5).abs() < 1e-6);
        assert_eq!(1, relax.stats().iterations);
    }
    #[test]
    fn bound_changes_and_cuts_are_applied() {
        let f = lp();
        let solver = HighsSolver::default();
        let relax  = DirectRelaxation::new(&f, &solver, &Config::default()).unwrap();
        let changes = [BoundChange::upper(VarId(1), 1.0)];
        let outcome = relax.solve(&spec(&changes, &[]), None, &NoCutoff).unwrap();
        let x = outcome.solution.unwrap();
        assert!(x[1] <= 1.0 + 1e-9);

        let cuts = [Constraint::le("cut", LinExpr::new().term(VarId(0), 1.0), 2.0)];
        let outcome = relax.solve(&spec(&[], &cuts), None, &NoCutoff).unwrap();
        let x = outcome.solution.unwrap();
        assert!(x[0] <= 2.0 + 1e-9);
    }
    #[test]
    fn empty_domain_is_infeasible() {
        let f = lp();
        let solver = HighsSolver::default();
        let relax  = DirectRelaxation::new(&f, &solver, &Config::default()).unwrap();
        let changes = [BoundChange::upper(VarId(0), 2.0), BoundChange::lower(VarId(0), 3.0)];
        let outcome = relax.solve(&spec(&changes, &[]), None, &NoCutoff).unwrap();
        assert_eq!(OutcomeStatus::Infeasible, outcome.status);
    }
    #[test]
    fn unknown_variable_is_a_model_error() {
        let f = lp();
        let solver = HighsSolver::default();
        let relax  = DirectRelaxation::new(&f, &solver, &Config::default()).unwrap();
        let changes = [BoundChange::upper(VarId(7), 2.0)];
        assert!(matches!(relax.solve(&spec(&changes, &[]), None, &NoCutoff), Err(Error::Model(_))));
    }
}
