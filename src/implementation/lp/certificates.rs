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
//! The certificates of an LP without optimum. Both are read from auxiliary
//! LPs which always have one:
//!
//! * the phase one LP gives every row a slack absorbing its violation and
//!   minimizes the total slack. When that total is positive, its duals are a
//!   Farkas certificate of the original LP.
//! * the ray LP minimizes the objective over the recession cone of the
//!   feasible region, intersected with the unit box. A negative optimum is
//!   an improving direction of unboundedness.
//!
//! Integrality requirements are ignored in both cases.

use std::time::Instant;

use crate::{Constraint, CtrId, Formulation, LinExpr, Sense, VarKind};

use super::{Failure, HighsSolver};

/// Returns the Farkas certificate of `f`, or None when its continuous
/// relaxation is feasible.
pub(super) fn farkas(solver: &HighsSolver, f: &Formulation, deadline: Option<Instant>) -> Result<Option<Vec<f64>>, Failure> {
    let mut aux = Formulation::new(format!("phase1({})", f.name()));
    for v in f.vars() {
        aux.add_var(v.name.clone(), v.lb, v.ub, VarKind::Continuous);
    }
    for c in f.ctrs() {
        aux.add_ctr(c.clone())?;
    }
    for (r, c) in f.ctrs().iter().enumerate() {
        let slacks: &[f64] = match c.sense {
            Sense::Le => &[-1.0],
            Sense::Ge => &[1.0],
            Sense::Eq => &[1.0, -1.0],
        };
        for s in slacks {
            aux.add_column(format!("slack[{}]", r), 0.0, f64::INFINITY, VarKind::Continuous, 1.0, &[(CtrId(r), *s)])?;
        }
    }

    let (primal, mut duals) = solver.run(&aux, false, deadline)?;
    if aux.evaluate_objective(&primal) > solver.feasibility {
        duals.truncate(f.nb_ctrs());
        Ok(Some(duals))
    } else {
        Ok(None)
    }
}

/// Returns a direction `d` along which the objective of `f` decreases
/// without bound, or None when there is no such direction.
pub(super) fn improving_ray(solver: &HighsSolver, f: &Formulation, deadline: Option<Instant>) -> Result<Option<Vec<f64>>, Failure> {
    let mut aux = Formulation::new(format!("ray({})", f.name()));
    for v in f.vars() {
        let lb = if v.lb.is_finite() { 0.0 } else { -1.0 };
        let ub = if v.ub.is_finite() { 0.0 } else { 1.0 };
        aux.add_var(v.name.clone(), lb, ub, VarKind::Continuous);
    }
    for c in f.ctrs() {
        aux.add_ctr(Constraint::new(c.name.clone(), c.expr.clone(), c.sense, 0.0))?;
    }
    let slope = f.objective().terms().iter()
        .fold(LinExpr::new(), |e, (v, a)| e.term(*v, *a));
    aux.set_objective(slope)?;

    let (d, _) = solver.run(&aux, false, deadline)?;
    if aux.evaluate_objective(&d) < -solver.feasibility {
        Ok(Some(d))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod test_certificates {
    use crate::*;
    use super::*;

    #[test]
    fn a_feasible_lp_has_no_farkas_certificate() {
        let mut f = Formulation::new("lp");
        let x = f.add_var("x", 0.0, 1.0, VarKind::Continuous);
        f.add_ctr(Constraint::ge("c", LinExpr::from_term(x, 1.0), 0.5)).unwrap();
        assert_eq!(None, farkas(&HighsSolver::default(), &f, None).unwrap());
    }
    #[test]
    fn the_certificate_of_a_violated_bound_points_at_its_row() {
        // x >= 2 with x in [0, 1]
        let mut f = Formulation::new("lp");
        let x = f.add_var("x", 0.0, 1.0, VarKind::Continuous);
        f.add_ctr(Constraint::ge("c", LinExpr::from_term(x, 1.0), 2.0)).unwrap();
        let y = farkas(&HighsSolver::default(), &f, None).unwrap().unwrap();
        assert_eq!(1, y.len());
        assert!(y[0] > 1e-9);
    }
    #[test]
    fn a_bounded_lp_has_no_improving_ray() {
        let mut f = Formulation::new("lp");
        let x = f.add_var("x", 0.0, f64::INFINITY, VarKind::Continuous);
        let y = f.add_var("y", 0.0, f64::INFINITY, VarKind::Continuous);
        f.add_ctr(Constraint::le("c", LinExpr::new().term(x, 1.0).term(y, 1.0), 4.0)).unwrap();
        f.set_objective(LinExpr::new().term(x, -1.0).term(y, 2.0)).unwrap();
        assert_eq!(None, improving_ray(&HighsSolver::default(), &f, None).unwrap());
    }
    #[test]
    fn the_ray_stays_in_the_recession_cone() {
        // min -x + 0.5y  s.t. x - y <= 0 with x in [0, inf), y in [0, inf)
        let mut f = Formulation::new("lp");
        let x = f.add_var("x", 0.0, f64::INFINITY, VarKind::Continuous);
        let y = f.add_var("y", 0.0, f64::INFINITY, VarKind::Continuous);
        f.add_ctr(Constraint::le("c", LinExpr::new().term(x, 1.0).term(y, -1.0), 0.0)).unwrap();
        f.set_objective(LinExpr::new().term(x, -1.0).term(y, 0.5)).unwrap();
        let d = improving_ray(&HighsSolver::default(), &f, None).unwrap().unwrap();
        assert!((d[0] - 1.0).abs() < 1e-6);
        assert!((d[1] - 1.0).abs() < 1e-6);
    }
}
