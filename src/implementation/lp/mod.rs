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
//! This module provides the `HighsSolver`: the implementation of the
//! `RelaxationSolver` contract on top of the HiGHS engine (driven through
//! `good_lp`). HiGHS computes the primal and dual solutions. The
//! certificates column generation needs when an LP has no optimum (Farkas
//! duals and improving rays) are obtained from small auxiliary LPs solved by
//! the same engine, see `certificates`.
mod certificates;

use std::time::Instant;

use good_lp::{constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable};
use good_lp::solvers::{DualValues, SolutionWithDual};
use good_lp::solvers::highs::highs;
use tracing::debug;

use crate::{Constraint, Error, Formulation, LinExpr, RelaxationResult, RelaxationSolver, RelaxationStatus, RequestKind, Sense};

/// Why HiGHS could not be asked (or could not answer) a question
#[derive(Debug)]
pub(crate) enum Failure {
    Engine(ResolutionError),
    Model(Error),
}
impl From<ResolutionError> for Failure {
    fn from(e: ResolutionError) -> Self {
        Failure::Engine(e)
    }
}
impl From<Error> for Failure {
    fn from(e: Error) -> Self {
        Failure::Model(e)
    }
}

/// The primal values (one per variable) and the duals (one per constraint,
/// empty for integer problems) of a solved formulation
type Solved = (Vec<f64>, Vec<f64>);

/// The LP/MIP engine used by the branch-and-price.
///
/// # Example
/// ```
/// # use bnp::*;
/// // min -x - y  st. x + 2y <= 4 ; 3x + y <= 6
/// let mut f = Formulation::new("lp");
/// let x = f.add_var("x", 0.0, f64::INFINITY, VarKind::Continuous);
/// let y = f.add_var("y", 0.0, f64::INFINITY, VarKind::Continuous);
/// f.add_ctr(Constraint::le("c1", LinExpr::new().term(x, 1.0).term(y, 2.0), 4.0)).unwrap();
/// f.add_ctr(Constraint::le("c2", LinExpr::new().term(x, 3.0).term(y, 1.0), 6.0)).unwrap();
/// f.set_objective(LinExpr::new().term(x, -1.0).term(y, -1.0)).unwrap();
///
/// let res = HighsSolver::default().solve(&f, RequestKind::Lp, None);
/// assert_eq!(RelaxationStatus::Optimal, res.status);
/// assert!((res.objective.unwrap() + 2.8).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HighsSolver {
    /// A value within this distance of an integer is considered integral
    integrality: f64,
    /// A phase one objective above this value proves infeasibility; a ray
    /// whose slope is below its opposite is improving
    feasibility: f64,
}
impl Default for HighsSolver {
    fn default() -> Self {
        HighsSolver { integrality: 1e-6, feasibility: 1e-7 }
    }
}
impl HighsSolver {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_integrality(mut self, integrality: f64) -> Self {
        self.integrality = integrality;
        self
    }
    pub fn with_feasibility(mut self, feasibility: f64) -> Self {
        self.feasibility = feasibility;
        self
    }

    /// Hands the formulation to HiGHS. The integrality requirements are only
    /// passed on when `integral` is set; the duals are only read otherwise.
    pub(crate) fn run(&self, f: &Formulation, integral: bool, deadline: Option<Instant>) -> Result<Solved, Failure> {
        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = f.vars().iter()
            .map(|v| {
                let mut def = variable();
                if v.lb.is_finite() {
                    def = def.min(v.lb);
                }
                if v.ub.is_finite() {
                    def = def.max(v.ub);
                }
                if integral && v.kind.is_integral() {
                    def = def.integer();
                }
                vars.add(def)
            })
            .collect();

        let mut problem = vars.minimise(expression(f.objective(), &xs))
            .using(highs)
            .set_option("mip_rel_gap", 0.0);
        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            problem = problem.set_option("time_limit", remaining.as_secs_f64());
        }
        let rows: Vec<_> = f.ctrs().iter()
            .map(|c| problem.add_constraint(row(c, &xs)))
            .collect();

        let mut solution = problem.solve()?;
        let primal: Vec<f64> = xs.iter().map(|x| solution.value(*x)).collect();
        let duals = if integral {
            vec![]
        } else {
            let dual = solution.compute_dual();
            rows.into_iter().map(|r| dual.dual(r)).collect()
        };
        Ok((primal, duals))
    }

    /// Packs the answer of HiGHS. A solve which ended past the deadline is a
    /// time limit; its solution is kept when it is feasible.
    fn solved(&self, f: &Formulation, integral: bool, (mut primal, duals): Solved, deadline: Option<Instant>) -> RelaxationResult {
        if integral {
            for (v, x) in f.vars().iter().zip(primal.iter_mut()) {
                if v.kind.is_integral() && (*x - x.round()).abs() <= self.integrality {
                    *x = x.round();
                }
            }
        }
        if expired(deadline) {
            let mut res = RelaxationResult::with_status(RelaxationStatus::TimeLimit);
            if integral && f.is_feasible(&primal, self.integrality) {
                res.objective = Some(f.evaluate_objective(&primal));
                res.primal    = primal;
            }
            return res;
        }
        RelaxationResult {
            status   : RelaxationStatus::Optimal,
            objective: Some(f.evaluate_objective(&primal)),
            primal,
            duals,
            farkas   : None,
            ray      : None,
        }
    }

    /// HiGHS found no optimum: tells an infeasible problem from an unbounded
    /// one and attaches the matching certificate.
    fn diagnose(&self, f: &Formulation, kind: RequestKind, deadline: Option<Instant>) -> Result<RelaxationResult, Failure> {
        if let Some(y) = certificates::farkas(self, f, deadline)? {
            let mut res = RelaxationResult::with_status(RelaxationStatus::Infeasible);
            if kind == RequestKind::Lp {
                res.farkas = Some(y);
            }
            return Ok(res);
        }
        match certificates::improving_ray(self, f, deadline)? {
            Some(d) => {
                let mut res = RelaxationResult::with_status(RelaxationStatus::Unbounded);
                res.ray = Some(d);
                Ok(res)
            },
            // the continuous relaxation has an optimum but no integer point
            None if kind == RequestKind::Integer => Ok(RelaxationResult::with_status(RelaxationStatus::Infeasible)),
            None => Ok(RelaxationResult::with_status(RelaxationStatus::Error)),
        }
    }
}

impl RelaxationSolver for HighsSolver {
    fn solve(&self, formulation: &Formulation, kind: RequestKind, deadline: Option<Instant>) -> RelaxationResult {
        if expired(deadline) {
            return RelaxationResult::with_status(RelaxationStatus::TimeLimit);
        }
        if formulation.vars().iter().any(|v| v.lb > v.ub) {
            return RelaxationResult::with_status(RelaxationStatus::Infeasible);
        }
        let integral = kind == RequestKind::Integer && formulation.vars().iter().any(|v| v.kind.is_integral());
        let outcome = match self.run(formulation, integral, deadline) {
            Ok(solved) => Ok(self.solved(formulation, integral, solved, deadline)),
            Err(_) if expired(deadline) => Ok(RelaxationResult::with_status(RelaxationStatus::TimeLimit)),
            Err(_) => self.diagnose(formulation, kind, deadline),
        };
        match outcome {
            Ok(res) => res,
            Err(_) if expired(deadline) => RelaxationResult::with_status(RelaxationStatus::TimeLimit),
            Err(failure) => {
                debug!(formulation = formulation.name(), ?failure, "highs failure");
                RelaxationResult::with_status(RelaxationStatus::Error)
            },
        }
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.map_or(false, |d| Instant::now() >= d)
}

fn expression(expr: &LinExpr, xs: &[Variable]) -> Expression {
    let mut e = Expression::with_capacity(expr.terms().len());
    for (v, a) in expr.terms() {
        e.add_mul(*a, xs[v.0]);
    }
    e + expr.constant()
}

fn row(c: &Constraint, xs: &[Variable]) -> good_lp::Constraint {
    let lhs = expression(&c.expr, xs);
    match c.sense {
        Sense::Le => constraint::leq(lhs, c.rhs),
        Sense::Ge => constraint::geq(lhs, c.rhs),
        Sense::Eq => constraint::eq(lhs, c.rhs),
    }
}
