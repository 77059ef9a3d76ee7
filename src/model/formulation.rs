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

//! This module defines the `Formulation`: the algebraic representation of an
//! optimization problem (variables, linear constraints and a linear objective
//! to minimize). Formulations never alias each other: whenever a link between
//! two formulations is needed (e.g. between a subproblem variable and the
//! original variable it stands for), it is represented as an explicit map of
//! ids.

use std::fmt;

use crate::{CtrId, Error, LinExpr, VarId, fractionality};

/// The domain of a variable
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VarKind {
    Continuous,
    Integer,
    Binary,
}
impl VarKind {
    /// Returns true iff the variable must take an integer value
    pub fn is_integral(self) -> bool {
        !matches!(self, VarKind::Continuous)
    }
}

/// The relational sense of a constraint
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}
impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sense::Le => write!(f, "<="),
            Sense::Ge => write!(f, ">="),
            Sense::Eq => write!(f, "=="),
        }
    }
}

/// A decision variable. Its value is not stored here: relaxation values are
/// returned by the solvers as dense vectors indexed by `VarId`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub lb  : f64,
    pub ub  : f64,
    pub kind: VarKind,
}

/// A linear constraint `expr <sense> rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name : String,
    pub expr : LinExpr,
    pub sense: Sense,
    pub rhs  : f64,
}
impl Constraint {
    /// Creates a new constraint. The constant part of `expr` (if any) is
    /// moved to the right hand side.
    pub fn new<S: Into<String>>(name: S, mut expr: LinExpr, sense: Sense, rhs: f64) -> Self {
        let rhs = rhs - expr.constant();
        expr.add_constant(-expr.constant());
        Constraint { name: name.into(), expr, sense, rhs }
    }
    pub fn le<S: Into<String>>(name: S, expr: LinExpr, rhs: f64) -> Self {
        Self::new(name, expr, Sense::Le, rhs)
    }
    pub fn ge<S: Into<String>>(name: S, expr: LinExpr, rhs: f64) -> Self {
        Self::new(name, expr, Sense::Ge, rhs)
    }
    pub fn eq<S: Into<String>>(name: S, expr: LinExpr, rhs: f64) -> Self {
        Self::new(name, expr, Sense::Eq, rhs)
    }
    /// By how much is this constraint violated by the given values (0 when
    /// it is satisfied)
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::Le => (lhs - self.rhs).max(0.0),
            Sense::Ge => (self.rhs - lhs).max(0.0),
            Sense::Eq => (lhs - self.rhs).abs(),
        }
    }
}

/// An optimization problem to be *minimized*.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Formulation {
    name     : String,
    vars     : Vec<Variable>,
    ctrs     : Vec<Constraint>,
    objective: LinExpr,
}

impl Formulation {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Formulation { name: name.into(), ..Default::default() }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Declares a new variable and returns its handle. The bounds of a
    /// binary variable are intersected with [0, 1].
    pub fn add_var<S: Into<String>>(&mut self, name: S, lb: f64, ub: f64, kind: VarKind) -> VarId {
        let (lb, ub) = match kind {
            VarKind::Binary => (lb.max(0.0), ub.min(1.0)),
            _ => (lb, ub),
        };
        let id = VarId(self.vars.len());
        self.vars.push(Variable { name: name.into(), lb, ub, kind });
        id
    }
    /// Declares a new variable together with its objective coefficient and
    /// its coefficients in existing constraints. This is how the columns
    /// of a master problem are added.
    pub fn add_column<S: Into<String>>(&mut self, name: S, lb: f64, ub: f64, kind: VarKind, obj: f64, entries: &[(CtrId, f64)]) -> Result<VarId, Error> {
        if let Some((c, _)) = entries.iter().find(|(c, _)| c.0 >= self.ctrs.len()) {
            return Err(Error::Model(format!("column references undeclared constraint {} in {}", c.0, self.name)));
        }
        let var = self.add_var(name, lb, ub, kind);
        if obj != 0.0 {
            self.objective.push_new_term(var, obj);
        }
        for (c, coef) in entries.iter().copied() {
            if coef != 0.0 {
                self.ctrs[c.0].expr.push_new_term(var, coef);
            }
        }
        Ok(var)
    }
    /// Adds a constraint and returns its handle. It fails when the
    /// constraint references variables that were not declared in this
    /// formulation.
    pub fn add_ctr(&mut self, ctr: Constraint) -> Result<CtrId, Error> {
        self.check_expr(&ctr.expr, &ctr.name)?;
        let id = CtrId(self.ctrs.len());
        self.ctrs.push(ctr);
        Ok(id)
    }
    /// Sets (or replaces) the objective function
    pub fn set_objective(&mut self, objective: LinExpr) -> Result<(), Error> {
        self.check_expr(&objective, "objective")?;
        self.objective = objective;
        Ok(())
    }
    /// Changes the objective coefficient of one variable
    pub fn set_obj_coef(&mut self, var: VarId, coef: f64) {
        self.objective.set_coef(var, coef);
    }
    pub fn set_bounds(&mut self, var: VarId, lb: f64, ub: f64) {
        let v = &mut self.vars[var.0];
        v.lb = lb;
        v.ub = ub;
    }
    pub fn set_kind(&mut self, var: VarId, kind: VarKind) {
        self.vars[var.0].kind = kind;
    }

    fn check_expr(&self, expr: &LinExpr, what: &str) -> Result<(), Error> {
        match expr.terms().iter().find(|(v, _)| v.0 >= self.vars.len()) {
            Some((v, _)) => Err(Error::Model(format!("{} references undeclared variable {} in {}", what, v.0, self.name))),
            None => Ok(()),
        }
    }

    pub fn nb_vars(&self) -> usize {
        self.vars.len()
    }
    pub fn nb_ctrs(&self) -> usize {
        self.ctrs.len()
    }
    pub fn var(&self, id: VarId) -> &Variable {
        &self.vars[id.0]
    }
    pub fn ctr(&self, id: CtrId) -> &Constraint {
        &self.ctrs[id.0]
    }
    pub fn vars(&self) -> &[Variable] {
        &self.vars
    }
    pub fn ctrs(&self) -> &[Constraint] {
        &self.ctrs
    }
    pub fn objective(&self) -> &LinExpr {
        &self.objective
    }
    pub fn var_ids(&self) -> impl Iterator<Item = VarId> {
        (0..self.vars.len()).map(VarId)
    }
    pub fn ctr_ids(&self) -> impl Iterator<Item = CtrId> {
        (0..self.ctrs.len()).map(CtrId)
    }
    /// The ids of all the integer and binary variables
    pub fn integer_vars(&self) -> Vec<VarId> {
        self.var_ids().filter(|v| self.vars[v.0].kind.is_integral()).collect()
    }
    /// The dense vector of objective coefficients
    pub fn obj_coefs(&self) -> Vec<f64> {
        let mut c = vec![0.0; self.vars.len()];
        for (v, coef) in self.objective.terms() {
            c[v.0] += coef;
        }
        c
    }
    pub fn evaluate_objective(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }
    /// Returns true iff all integer variables take an integral value
    pub fn is_integral(&self, values: &[f64], tolerance: f64) -> bool {
        self.vars.iter().zip(values.iter())
            .all(|(v, x)| !v.kind.is_integral() || fractionality(*x) <= tolerance)
    }
    /// Returns true iff the given values satisfy the bounds, the integrality
    /// requirements and all constraints of this formulation.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.vars.len()
            && self.vars.iter().zip(values.iter()).all(|(v, x)| *x >= v.lb - tolerance && *x <= v.ub + tolerance)
            && self.is_integral(values, tolerance)
            && self.ctrs.iter().all(|c| c.violation(values) <= tolerance)
    }
}


#[cfg(test)]
mod test_formulation {
    use crate::*;

    fn small() -> (Formulation, VarId, VarId) {
        let mut f = Formulation::new("small");
        let x = f.add_var("x", 0.0, 4.0, VarKind::Integer);
        let y = f.add_var("y", -3.0, 9.0, VarKind::Binary);
        f.add_ctr(Constraint::le("c0", LinExpr::new().term(x, 1.0).term(y, 1.0), 4.0)).unwrap();
        f.set_objective(LinExpr::new().term(x, -1.0).term(y, -2.0)).unwrap();
        (f, x, y)
    }

    #[test]
    fn binary_bounds_are_clamped() {
        let (f, _, y) = small();
        assert_eq!(0.0, f.var(y).lb);
        assert_eq!(1.0, f.var(y).ub);
    }

    #[test]
    fn constraints_may_not_reference_undeclared_variables() {
        let (mut f, _, _) = small();
        let bad = Constraint::ge("bad", LinExpr::from_term(VarId(42), 1.0), 0.0);
        assert!(matches!(f.add_ctr(bad), Err(Error::Model(_))));
        assert!(matches!(f.set_objective(LinExpr::from_term(VarId(2), 1.0)), Err(Error::Model(_))));
        assert_eq!(1, f.nb_ctrs());
    }

    #[test]
    fn the_constant_of_a_constraint_moves_to_the_rhs() {
        let c = Constraint::le("c", LinExpr::from_term(VarId(0), 1.0).with_constant(2.0), 5.0);
        assert_eq!(3.0, c.rhs);
        assert_eq!(0.0, c.expr.constant());
    }

    #[test]
    fn add_column_extends_objective_and_rows() {
        let (mut f, _, _) = small();
        let z = f.add_column("z", 0.0, f64::INFINITY, VarKind::Continuous, 7.0, &[(CtrId(0), 2.0)]).unwrap();
        assert_eq!(7.0, f.objective().coef(z));
        assert_eq!(2.0, f.ctr(CtrId(0)).expr.coef(z));
        assert!(f.add_column("w", 0.0, 1.0, VarKind::Continuous, 0.0, &[(CtrId(3), 1.0)]).is_err());
    }

    #[test]
    fn feasibility_checks_bounds_integrality_and_rows() {
        let (f, _, _) = small();
        assert!(f.is_feasible(&[3.0, 1.0], 1e-6));
        assert!(!f.is_feasible(&[3.5, 0.0], 1e-6));
        assert!(!f.is_feasible(&[4.0, 1.0], 1e-6));
        assert!(!f.is_feasible(&[5.0, 0.0], 1e-6));
        assert_eq!(-5.0, f.evaluate_objective(&[3.0, 1.0]));
    }

    #[test]
    fn violation_depends_on_the_sense() {
        let e = LinExpr::from_term(VarId(0), 1.0);
        assert_eq!(1.0, Constraint::le("a", e.clone(), 2.0).violation(&[3.0]));
        assert_eq!(0.0, Constraint::ge("b", e.clone(), 2.0).violation(&[3.0]));
        assert_eq!(1.0, Constraint::eq("c", e, 2.0).violation(&[3.0]));
    }
}
