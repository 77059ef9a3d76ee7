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

//! # BNP
//! BNP is a generic framework to solve mixed integer linear programs with
//! branch-and-price. You describe your problem as a `Formulation` (variables,
//! linear constraints and a linear objective to minimize) and tag each of its
//! constraints with a `Partition` telling whether it belongs to the master
//! problem or to one of the pricing subproblems. The framework then performs
//! the Dantzig-Wolfe reformulation of the problem, solves the linear
//! relaxation of every branch-and-bound node by column generation and
//! branches on the original variables until an optimal solution is proved.
//!
//! ## Side benefit
//! The same branch-and-bound tree can be driven by a plain LP relaxation
//! (`DirectRelaxation`), which makes it easy to compare both approaches. And
//! the nodes of the tree are processed in parallel, exploiting all of your
//! hardware.
//!
//! ## Quick Example
//! The following solves a tiny generalized assignment problem: three jobs
//! must be assigned to two agents. Each agent has a capacity (the knapsack
//! constraints form one pricing subproblem per agent) and every job must be
//! assigned exactly once (these constraints stay in the master).
//!
//! ```
//! # use bnp::*;
//! let mut f = Formulation::new("tiny gap");
//! let cost     = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
//! let weight   = [[1.0, 1.0, 1.0], [2.0, 2.0, 2.0]];
//! let capacity = [2.0, 4.0];
//!
//! let x: Vec<Vec<VarId>> = (0..2).map(|i| (0..3)
//!         .map(|j| f.add_var(format!("x_{}_{}", i, j), 0.0, 1.0, VarKind::Binary))
//!         .collect())
//!     .collect();
//!
//! let mut objective = LinExpr::new();
//! for i in 0..2 { for j in 0..3 { objective.add_term(x[i][j], cost[i][j]); } }
//! f.set_objective(objective).unwrap();
//!
//! let mut decomposition = Decomposition::new();
//! for i in 0..2 {
//!     let expr = (0..3).fold(LinExpr::new(), |e, j| e.term(x[i][j], weight[i][j]));
//!     let ctr  = f.add_ctr(Constraint::le(format!("knapsack_{}", i), expr, capacity[i])).unwrap();
//!     decomposition.tag(ctr, Partition::Subproblem(i));
//! }
//! for j in 0..3 {
//!     let expr = LinExpr::new().term(x[0][j], 1.0).term(x[1][j], 1.0);
//!     let ctr  = f.add_ctr(Constraint::eq(format!("assignment_{}", j), expr, 1.0)).unwrap();
//!     decomposition.tag(ctr, Partition::Master);
//! }
//!
//! // The LP (and MIP) engine used to solve the master and the subproblems
//! let lp     = HighsSolver::default();
//! let config = ConfigBuilder::default()
//!     .smoothing_factor(0.3)
//!     .threads(2)
//!     .build()
//!     .unwrap();
//! let relaxation = ColumnGeneration::new(&f, &decomposition, &lp, &config).unwrap();
//! let mut solver = DefaultSolver::new(&relaxation, config).unwrap();
//!
//! let completion = solver.minimize().unwrap();
//! assert_eq!(SolutionStatus::Optimal, completion.status);
//! assert!((completion.best_value.unwrap() - 9.0).abs() < 1e-6);
//! ```
//!
//! ## Pluggable policies
//! Every policy of the solver is a trait from the abstraction layer:
//! `NodeRanking` (node selection), `BranchingRule`, `BranchingEnforcement`
//! (in the subproblems or with master rows), `Stabilization` (dual
//! smoothing), `InfeasibilityStrategy` (artificial variables or Farkas
//! pricing), `Callback` (heuristics and cutting planes) and
//! `RelaxationSolver` (the external LP/MIP engine).

mod common;
mod errors;
mod model;
mod config;
mod abstraction;
mod implementation;
mod gap;

pub use common::*;
pub use errors::*;
pub use model::*;
pub use config::*;
pub use abstraction::*;
pub use implementation::*;
pub use gap::*;
