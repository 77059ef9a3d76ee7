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

//! This module provides the processing of one node of the branch-and-bound
//! tree. It is shared by the sequential and parallel solvers: the processing
//! itself does not touch any shared state, it only reports a verdict which
//! the solvers apply to their tree, fringe and incumbent.

use tracing::debug;

use crate::{BoundChange, Branching, BranchingContext, BranchingRule, CallbackAction, CallbackContext, Config, Constraint, Cutoff, Error, NodeId, NodeRelaxation, NodeSpec, OutcomeStatus, Reason, VarId};

/// A node waiting to be processed
#[derive(Debug, Clone)]
pub(crate) struct Task {
    pub id     : NodeId,
    pub depth  : usize,
    /// The bound changes on the path from the root
    pub changes: Vec<BoundChange>,
    /// The cuts which apply to the node
    pub cuts   : Vec<Constraint>,
    /// The bound inherited from the parent
    pub bound  : f64,
}

/// What must become of a processed node
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Verdict {
    /// The bound of the node is no better than the incumbent
    Pruned(f64),
    Infeasible,
    /// The relaxation solution is integral: it is part of the candidates
    Integer(f64),
    /// The node must be split in two
    Branch { bound: f64, branching: Branching },
    /// The node could not be closed with a proof
    Interrupted { bound: f64, reason: Reason },
}

/// The result of the processing of one node
#[derive(Debug, Clone)]
pub(crate) struct Explored {
    pub verdict   : Verdict,
    /// The cuts added at this node (they apply to the whole subtree)
    pub cuts      : Vec<Constraint>,
    /// The feasible solutions found while processing the node, along with
    /// their value
    pub candidates: Vec<(f64, Vec<f64>)>,
}

/// Everything needed to process a node
pub(crate) struct Explorer<'a> {
    pub relaxation: &'a (dyn NodeRelaxation + Send + Sync),
    pub branching : &'a (dyn BranchingRule + Send + Sync),
    pub cutoff    : &'a (dyn Cutoff + Send + Sync),
    pub config    : &'a Config,
    /// The variables eligible for branching
    pub candidates: &'a [VarId],
}

impl Explorer<'_> {
    /// The bounds of the original variables at a node
    pub fn bounds(&self, changes: &[BoundChange]) -> Vec<(f64, f64)> {
        let mut bounds: Vec<(f64, f64)> = self.relaxation.formulation().vars().iter().map(|v| (v.lb, v.ub)).collect();
        for change in changes {
            if let Some(b) = bounds.get_mut(change.var.0) {
                *b = change.tighten(*b);
            }
        }
        bounds
    }

    /// Returns the value of the given solution when it is feasible for the
    /// original formulation
    fn check(&self, values: &[f64]) -> Option<f64> {
        let f = self.relaxation.formulation();
        if f.is_feasible(values, self.config.tolerances.feasibility) {
            Some(f.evaluate_objective(values))
        } else {
            None
        }
    }

    fn can_prune(&self, bound: f64, incumbent: Option<f64>) -> bool {
        incumbent.map_or(false, |ub| bound >= ub - self.config.tolerances.improvement)
    }

    /// Processes one node. `incumbent` is the value of the best known
    /// solution when the processing starts.
    pub fn explore(&self, task: &Task, incumbent: Option<f64>) -> Result<Explored, Error> {
        let tol        = self.config.tolerances;
        let formulation = self.relaxation.formulation();
        let bounds     = self.bounds(&task.changes);
        let mut best   = incumbent;
        let mut result = Explored { verdict: Verdict::Infeasible, cuts: vec![], candidates: vec![] };
        let mut rounds = 0;

        loop {
            let mut cuts = task.cuts.clone();
            cuts.extend(result.cuts.iter().cloned());
            let spec = NodeSpec {
                id           : task.id,
                depth        : task.depth,
                bound_changes: &task.changes,
                cuts         : &cuts,
                parent_bound : task.bound,
            };
            let outcome = self.relaxation.solve(&spec, best, self.cutoff)?;

            for candidate in outcome.candidates {
                if let Some(value) = self.check(&candidate) {
                    best = Some(best.map_or(value, |b| b.min(value)));
                    result.candidates.push((value, candidate));
                }
            }

            let bound = outcome.bound.max(task.bound);
            let solution = match (outcome.status, outcome.solution) {
                (OutcomeStatus::Infeasible, _) => {
                    result.verdict = Verdict::Infeasible;
                    return Ok(result);
                },
                (OutcomeStatus::PrunedByBound, _) => {
                    result.verdict = Verdict::Pruned(bound);
                    return Ok(result);
                },
                (OutcomeStatus::TimeLimit, _) => {
                    result.verdict = Verdict::Interrupted { bound, reason: Reason::TimeLimit };
                    return Ok(result);
                },
                (OutcomeStatus::IterationLimit, None) => {
                    result.verdict = Verdict::Interrupted { bound, reason: Reason::IterationLimit };
                    return Ok(result);
                },
                (OutcomeStatus::Solved, None) => {
                    return Err(Error::InvariantViolation(format!("node {} was solved without solution", task.id.0)));
                },
                (_, Some(solution)) => solution,
            };
            let converged = outcome.status == OutcomeStatus::Solved;

            if self.can_prune(bound, best) {
                result.verdict = Verdict::Pruned(bound);
                return Ok(result);
            }

            if formulation.is_integral(&solution, tol.integrality) {
                let value = formulation.evaluate_objective(&solution);
                result.candidates.push((value, solution));
                result.verdict = if converged {
                    Verdict::Integer(bound)
                } else {
                    Verdict::Interrupted { bound, reason: Reason::IterationLimit }
                };
                return Ok(result);
            }

            // callbacks
            let context = CallbackContext {
                formulation,
                node      : task.id,
                depth     : task.depth,
                bounds    : &bounds,
                solution  : &solution,
                bound,
                incumbent : best,
                tolerances: tol,
            };
            let mut new_cuts = 0;
            for callback in self.config.callbacks.iter() {
                for action in callback.on_node_solved(&context) {
                    match action {
                        CallbackAction::Candidate(candidate) => {
                            if let Some(value) = self.check(&candidate) {
                                if self.config.verbosity >= 3 {
                                    debug!(node = task.id.0, callback = callback.name(), value, "candidate");
                                }
                                best = Some(best.map_or(value, |b| b.min(value)));
                                result.candidates.push((value, candidate));
                            }
                        },
                        CallbackAction::Cut(cut) => {
                            if !cuts.contains(&cut) && !result.cuts.contains(&cut) {
                                if self.config.verbosity >= 3 {
                                    debug!(node = task.id.0, callback = callback.name(), cut = cut.name.as_str(), "cut");
                                }
                                result.cuts.push(cut);
                                new_cuts += 1;
                            }
                        },
                    }
                }
            }

            if self.can_prune(bound, best) {
                result.verdict = Verdict::Pruned(bound);
                return Ok(result);
            }
            if new_cuts > 0 && rounds < self.config.max_cut_rounds {
                rounds += 1;
                continue;
            }

            let context = BranchingContext {
                formulation,
                solution  : &solution,
                candidates: self.candidates,
                bounds    : &bounds,
                tolerance : tol.integrality,
            };
            let Some(branching) = self.branching.select(&context) else {
                return Err(Error::Configuration(
                    format!("the solution of node {} is fractional but no branching candidate is eligible", task.id.0)));
            };
            result.verdict = Verdict::Branch { bound, branching };
            return Ok(result);
        }
    }
}
