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

//! This module provides the restricted master problem of a node: an LP over
//! the linking variables and the columns known so far, with one convexity
//! row per subproblem and (optionally) artificial variables. The columns
//! which are extreme rays of a subproblem are not part of the convexity row.

use std::{sync::Arc, time::Instant};

use fxhash::FxHashSet;

use crate::{Column, Constraint, CtrId, Error, Formulation, LinExpr, LocalReformulation, Reformulation, RelaxationResult, RelaxationSolver, RequestKind, Sense, VarId, VarKind};

/// The restricted master problem.
///
/// Its constraints are laid out as follows: first the rows of the local
/// reformulation (expressed on the original variables), then one convexity
/// row per subproblem. The duals returned by the LP solver follow the same
/// layout.
#[derive(Debug, Clone)]
pub struct RestrictedMaster<'a> {
    reformulation: &'a Reformulation,
    lp           : Formulation,
    rows         : Vec<Constraint>,
    nb_static    : usize,
    bounds       : Vec<(f64, f64)>,
    convexity    : Vec<CtrId>,
    linking      : Vec<(VarId, VarId)>,
    columns      : Vec<(VarId, Arc<Column>)>,
    in_master    : FxHashSet<(usize, u64)>,
    artificials  : Vec<VarId>,
    penalty      : Option<f64>,
}

impl <'a> RestrictedMaster<'a> {
    /// Creates a master holding no column. The artificials are only created
    /// when a penalty is given.
    pub fn new(reformulation: &'a Reformulation, local: &LocalReformulation, penalty: Option<f64>) -> Result<Self, Error> {
        Self::build(reformulation, local.rows.clone(), local.nb_static_rows(), local.bounds.clone(), penalty)
    }

    fn build(reformulation: &'a Reformulation, rows: Vec<Constraint>, nb_static: usize, bounds: Vec<(f64, f64)>, penalty: Option<f64>) -> Result<Self, Error> {
        let original = reformulation.original();
        let mut lp = Formulation::new(format!("master({})", original.name()));
        for row in rows.iter() {
            lp.add_ctr(Constraint::new(row.name.clone(), LinExpr::new(), row.sense, row.rhs))?;
        }
        let mut convexity = Vec::with_capacity(reformulation.nb_subproblems());
        for sp in reformulation.subproblems() {
            convexity.push(lp.add_ctr(Constraint::eq(format!("convexity[{}]", sp.tag), LinExpr::new(), 1.0))?);
        }

        let mut linking = Vec::with_capacity(reformulation.linking_vars().len());
        for var in reformulation.linking_vars().iter().copied() {
            let entries: Vec<(CtrId, f64)> = rows.iter().enumerate()
                .map(|(r, row)| (CtrId(r), row.expr.coef(var)))
                .filter(|(_, a)| *a != 0.0)
                .collect();
            let v = original.var(var);
            let (lb, ub) = bounds[var.0];
            let id = lp.add_column(v.name.clone(), lb, ub, v.kind, original.objective().coef(var), &entries)?;
            linking.push((var, id));
        }

        let mut master = RestrictedMaster {
            reformulation, lp, rows, nb_static, bounds, convexity, linking,
            columns    : vec![],
            in_master  : FxHashSet::default(),
            artificials: vec![],
            penalty,
        };
        if let Some(penalty) = penalty {
            master.add_artificials(penalty)?;
        }
        Ok(master)
    }

    fn add_artificials(&mut self, penalty: f64) -> Result<(), Error> {
        for r in 0..self.lp.nb_ctrs() {
            let ctr = CtrId(r);
            let coefs: &[f64] = match self.lp.ctr(ctr).sense {
                Sense::Le => &[-1.0],
                Sense::Ge => &[1.0],
                Sense::Eq => &[1.0, -1.0],
            };
            for coef in coefs {
                let name = format!("artificial[{}]{}", r, if *coef > 0.0 { "+" } else { "-" });
                let var = self.lp.add_column(name, 0.0, f64::INFINITY, VarKind::Continuous, penalty, &[(ctr, *coef)])?;
                self.artificials.push(var);
            }
        }
        Ok(())
    }

    pub fn formulation(&self) -> &Formulation {
        &self.lp
    }
    pub fn nb_rows(&self) -> usize {
        self.rows.len()
    }
    pub fn nb_columns(&self) -> usize {
        self.columns.len()
    }
    pub fn columns(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.columns.iter().map(|(_, c)| c)
    }

    /// The coefficient of a column in the given row of the master
    fn coefficient(&self, column: &Column, r: usize) -> f64 {
        if r < self.nb_static {
            column.coefficients[r]
        } else {
            column.project(&self.rows[r].expr)
        }
    }

    /// Adds a column to the master. Returns false if the column was already
    /// part of it.
    pub fn add_column(&mut self, column: Arc<Column>) -> Result<bool, Error> {
        if !self.in_master.insert((column.subproblem, column.id)) {
            return Ok(false);
        }
        let mut entries: Vec<(CtrId, f64)> = (0..self.rows.len())
            .map(|r| (CtrId(r), self.coefficient(&column, r)))
            .filter(|(_, a)| *a != 0.0)
            .collect();
        if !column.ray {
            entries.push((self.convexity[column.subproblem], 1.0));
        }
        let name = format!("{}[{}][{}]", if column.ray { "mu" } else { "lambda" }, column.subproblem, column.id);
        let var  = self.lp.add_column(name, 0.0, f64::INFINITY, VarKind::Continuous, column.cost, &entries)?;
        self.columns.push((var, column));
        Ok(true)
    }

    /// Rebuilds the master with only the columns satisfying `keep`
    pub fn retain<F>(&mut self, keep: F) -> Result<(), Error>
        where F: Fn(&Column) -> bool
    {
        let columns = std::mem::take(&mut self.columns);
        let mut rebuilt = Self::build(self.reformulation, self.rows.clone(), self.nb_static, self.bounds.clone(), self.penalty)?;
        for (_, column) in columns {
            if keep(&column) {
                rebuilt.add_column(column)?;
            }
        }
        *self = rebuilt;
        Ok(())
    }

    /// Changes the penalty of all artificial variables
    pub fn set_penalty(&mut self, penalty: f64) {
        self.penalty = Some(penalty);
        for a in self.artificials.iter().copied() {
            self.lp.set_obj_coef(a, penalty);
        }
    }

    pub fn solve(&self, solver: &dyn RelaxationSolver, deadline: Option<Instant>) -> RelaxationResult {
        solver.solve(&self.lp, RequestKind::Lp, deadline)
    }

    /// The total value of the artificial variables in a master solution
    pub fn artificial_value(&self, primal: &[f64]) -> f64 {
        self.artificials.iter().map(|a| primal[a.0]).sum()
    }

    /// The dual of the convexity row of subproblem `k`
    pub fn convexity_dual(&self, duals: &[f64], k: usize) -> f64 {
        duals[self.convexity[k].0]
    }

    /// The objective coefficient of every original variable in the pricing
    /// problems for the given master prices: `c_j - sum_r p_r a_rj` (or
    /// `- sum_r p_r a_rj` when the original costs must be ignored, which is
    /// the case in Farkas pricing).
    pub fn pricing_costs(&self, prices: &[f64], with_costs: bool) -> Vec<f64> {
        let original = self.reformulation.original();
        let mut costs = if with_costs { original.obj_coefs() } else { vec![0.0; original.nb_vars()] };
        for (row, p) in self.rows.iter().zip(prices.iter()) {
            if *p != 0.0 {
                for (v, a) in row.expr.terms() {
                    costs[v.0] -= p * a;
                }
            }
        }
        costs
    }

    /// The reduced cost of a column w.r.t. the given duals
    pub fn reduced_cost(&self, column: &Column, duals: &[f64]) -> f64 {
        let contribution: f64 = (0..self.rows.len())
            .map(|r| duals[r] * self.coefficient(column, r))
            .sum();
        if column.ray {
            column.cost - contribution
        } else {
            column.cost - contribution - self.convexity_dual(duals, column.subproblem)
        }
    }

    /// The ids of the columns of each subproblem with a positive weight
    pub fn active_columns(&self, primal: &[f64], tolerance: f64) -> Vec<FxHashSet<u64>> {
        let mut active = vec![FxHashSet::default(); self.reformulation.nb_subproblems()];
        for (var, column) in self.columns.iter() {
            if primal[var.0] > tolerance {
                active[column.subproblem].insert(column.id);
            }
        }
        active
    }

    /// Expresses a master solution on the original variables: the linking
    /// variables keep their value and the subproblem variables take the
    /// convex combination of the columns.
    pub fn project(&self, primal: &[f64]) -> Vec<f64> {
        let mut x = vec![0.0; self.reformulation.original().nb_vars()];
        for (original, var) in self.linking.iter() {
            x[original.0] = primal[var.0];
        }
        for (var, column) in self.columns.iter() {
            let weight = primal[var.0];
            if weight != 0.0 {
                for (v, value) in column.support.iter() {
                    x[v.0] += weight * value;
                }
            }
        }
        x
    }

    /// Solves the master with binary point weights, integer ray weights and
    /// no artificial. When a solution is found, it is returned in the
    /// original space.
    pub fn integer_solution(&self, solver: &dyn RelaxationSolver, deadline: Option<Instant>) -> Option<Vec<f64>> {
        let mut ip = self.lp.clone();
        for (var, column) in self.columns.iter() {
            if column.ray {
                ip.set_kind(*var, VarKind::Integer);
            } else {
                ip.set_kind(*var, VarKind::Binary);
                ip.set_bounds(*var, 0.0, 1.0);
            }
        }
        for a in self.artificials.iter() {
            ip.set_bounds(*a, 0.0, 0.0);
        }
        let res = solver.solve(&ip, RequestKind::Integer, deadline);
        if res.objective.is_some() && res.primal.len() == ip.nb_vars() {
            Some(self.project(&res.primal))
        } else {
            None
        }
    }
}
