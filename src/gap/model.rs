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

//! This module turns a GAP instance into a formulation along with the
//! decomposition that yields one knapsack pricing subproblem per agent.

use crate::{Constraint, CtrId, Decomposition, Error, Formulation, GapInstance, LinExpr, Partition, VarId, VarKind};

/// The compact formulation of a GAP instance
///
/// ```text
/// min  sum_ij c_ij x_ij
/// s.t. sum_j r_ij x_ij <= b_i    for every agent i   (subproblem i)
///      sum_i x_ij       = 1      for every job j     (master)
///      x_ij binary
/// ```
#[derive(Debug, Clone)]
pub struct GapModel {
    pub formulation  : Formulation,
    pub decomposition: Decomposition,
    /// x[agent][job]
    x         : Vec<Vec<VarId>>,
    knapsack  : Vec<CtrId>,
    assignment: Vec<CtrId>,
}

impl GapModel {
    pub fn new(instance: &GapInstance) -> Result<Self, Error> {
        let n_agents = instance.n_agents();
        let n_jobs   = instance.n_jobs();

        let mut formulation = Formulation::new("gap");
        let x = (0..n_agents)
            .map(|i| (0..n_jobs)
                .map(|j| formulation.add_var(format!("x_{}_{}", i, j), 0.0, 1.0, VarKind::Binary))
                .collect::<Vec<_>>())
            .collect::<Vec<_>>();

        let mut objective = LinExpr::new();
        for (i, row) in x.iter().enumerate() {
            for (j, var) in row.iter().enumerate() {
                objective.add_term(*var, instance.cost(i, j));
            }
        }
        formulation.set_objective(objective)?;

        let mut decomposition = Decomposition::new();
        let mut knapsack = Vec::with_capacity(n_agents);
        for (i, row) in x.iter().enumerate() {
            let expr = row.iter().enumerate()
                .fold(LinExpr::new(), |e, (j, var)| e.term(*var, instance.resource_consumption(i, j)));
            let ctr  = formulation.add_ctr(Constraint::le(format!("knapsack_{}", i), expr, instance.capacity(i)))?;
            decomposition.tag(ctr, Partition::Subproblem(i));
            knapsack.push(ctr);
        }
        let mut assignment = Vec::with_capacity(n_jobs);
        for j in 0..n_jobs {
            let expr = x.iter().fold(LinExpr::new(), |e, row| e.term(row[j], 1.0));
            let ctr  = formulation.add_ctr(Constraint::eq(format!("assignment_{}", j), expr, 1.0))?;
            decomposition.tag(ctr, Partition::Master);
            assignment.push(ctr);
        }

        Ok(GapModel { formulation, decomposition, x, knapsack, assignment })
    }
    /// The variable telling whether `job` is assigned to `agent`
    pub fn x(&self, agent: usize, job: usize) -> VarId {
        self.x[agent][job]
    }
    pub fn knapsack_ctrs(&self) -> &[CtrId] {
        &self.knapsack
    }
    pub fn assignment_ctrs(&self) -> &[CtrId] {
        &self.assignment
    }
    /// Decodes a solution: the agent of each job (if any agent is selected
    /// with a value above one half).
    pub fn assignment(&self, solution: &[f64]) -> Vec<Option<usize>> {
        let n_jobs = self.assignment.len();
        (0..n_jobs)
            .map(|j| self.x.iter().position(|row| solution[row[j].0] > 0.5))
            .collect()
    }
}
