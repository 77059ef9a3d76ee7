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

//! This module provides the column generation engine: the `NodeRelaxation`
//! which computes the bound of a node by solving the restricted master and
//! the pricing problems of a Dantzig-Wolfe reformulation until no improving
//! column is found.

use std::time::Duration;

use fxhash::FxHashSet;
use parking_lot::Mutex;
use tracing::debug;

use crate::{relaxation_deadline, ArtificialCost, BranchingEnforcement, Column, ColumnPool, Config, Cutoff, Decomposition, DualStabilization, Error, FarkasPricing, Formulation, InfeasibilityStrategy, LocalReformulation, NoStabilization, NodeId, NodeOutcome, NodeRelaxation, NodeSpec, OnMaster, OnPricing, OutcomeStatus, Reformulation, RelaxationSolver, RelaxationStats, RelaxationStatus, StagedPool, Tolerances, WentgesSmoothing};

use super::{master::RestrictedMaster, pricing::{price_all, set_pricing_objectives, Priced}};

/// Column generation over a Dantzig-Wolfe reformulation.
///
/// The column pools (one per subproblem) are shared by all the nodes of the
/// tree, hence the columns generated at some node are made available to the
/// nodes solved afterwards. Whenever a pooled column is inconsistent with
/// the bounds of a node, it is simply not loaded in the master of that node.
///
/// A node works on a private copy of the pools; its changes are staged and
/// only published by `synchronize`, in the order of the node ids.
///
/// When a pricing problem is unbounded, its improving ray becomes a column
/// of the master which takes no part in the convexity row.
pub struct ColumnGeneration<'a> {
    reformulation   : Reformulation,
    solver          : &'a (dyn RelaxationSolver + Send + Sync),
    enforcement     : Box<dyn BranchingEnforcement + Send + Sync>,
    infeasibility   : Box<dyn InfeasibilityStrategy + Send + Sync>,
    smoothing_factor: f64,
    iteration_limit : usize,
    time_limit      : Option<Duration>,
    clean_up        : Option<(usize, f64)>,
    max_parallel    : usize,
    integer_master  : bool,
    tolerances      : Tolerances,
    verbosity       : u8,
    log_frequency   : usize,
    pools           : Vec<Mutex<ColumnPool>>,
    staged          : Mutex<Vec<(NodeId, Vec<StagedPool>)>>,
    stats           : Mutex<RelaxationStats>,
}

/// Why a pricing round could not be used
enum PricingFailure {
    Infeasible,
    TimeLimit,
}

impl <'a> ColumnGeneration<'a> {
    pub fn new(original: &Formulation, decomposition: &Decomposition, solver: &'a (dyn RelaxationSolver + Send + Sync), config: &Config) -> Result<Self, Error> {
        config.validate()?;
        let reformulation = Reformulation::new(original, decomposition)?;
        let enforcement: Box<dyn BranchingEnforcement + Send + Sync> = if config.branching_on_master {
            Box::new(OnMaster)
        } else {
            Box::new(OnPricing)
        };
        let infeasibility: Box<dyn InfeasibilityStrategy + Send + Sync> = if config.farkas_pricing {
            Box::new(FarkasPricing)
        } else {
            Box::new(ArtificialCost::new(config.artificial_cost, config.artificial_cost_growth, config.infeasibility_repair_limit))
        };
        let pools = (0..reformulation.nb_subproblems()).map(|_| Mutex::new(ColumnPool::new())).collect();
        Ok(ColumnGeneration {
            reformulation,
            solver,
            enforcement,
            infeasibility,
            smoothing_factor: config.smoothing_factor,
            iteration_limit : config.column_generation_iteration_limit,
            time_limit      : config.relaxation_time_limit,
            clean_up        : config.clean_up_threshold.map(|t| (t, config.clean_up_ratio)),
            max_parallel    : config.max_parallel_subproblems,
            integer_master  : config.integer_master_heuristic,
            tolerances      : config.tolerances,
            verbosity       : config.verbosity,
            log_frequency   : config.log_frequency,
            pools,
            staged          : Mutex::new(vec![]),
            stats           : Mutex::new(RelaxationStats::default()),
        })
    }
    /// Replaces the way branching decisions are enforced
    pub fn with_enforcement(mut self, enforcement: Box<dyn BranchingEnforcement + Send + Sync>) -> Self {
        self.enforcement = enforcement;
        self
    }
    /// Replaces the strategy coping with infeasible restricted masters
    pub fn with_infeasibility(mut self, infeasibility: Box<dyn InfeasibilityStrategy + Send + Sync>) -> Self {
        self.infeasibility = infeasibility;
        self
    }
    pub fn reformulation(&self) -> &Reformulation {
        &self.reformulation
    }
    /// The number of columns held in the pool of each subproblem
    pub fn pool_sizes(&self) -> Vec<usize> {
        self.pools.iter().map(|p| p.lock().len()).collect()
    }
    /// Checks the coefficients of every pooled column
    pub fn verify_pools(&self) -> Result<(), Error> {
        for pool in self.pools.iter() {
            for column in pool.lock().columns() {
                column.verify(&self.reformulation)?;
            }
        }
        Ok(())
    }

    fn stabilization(&self) -> Box<dyn DualStabilization> {
        if self.smoothing_factor > 0.0 {
            Box::new(WentgesSmoothing::new(self.smoothing_factor))
        } else {
            Box::new(NoStabilization)
        }
    }

    /// Loads the pooled columns which are consistent with the node
    fn seed(&self, master: &mut RestrictedMaster, local: &LocalReformulation, pools: &[StagedPool]) -> Result<(), Error> {
        for pool in pools.iter() {
            for column in pool.columns().filter(|c| local.admits(c, self.tolerances.feasibility)) {
                master.add_column(column.clone())?;
            }
        }
        Ok(())
    }

    /// Sets the pricing objectives for the given prices and solves all
    /// the pricing problems.
    fn price(&self, master: &RestrictedMaster, local: &mut LocalReformulation, prices: &[f64], farkas: bool, cutoff: &dyn Cutoff, stats: &mut RelaxationStats) -> Result<Result<Vec<Priced>, PricingFailure>, Error> {
        let costs = master.pricing_costs(prices, !farkas);
        set_pricing_objectives(&self.reformulation, &mut local.subproblems, &costs)?;
        let convexity: Vec<f64> = (0..self.reformulation.nb_subproblems())
            .map(|k| master.convexity_dual(prices, k))
            .collect();
        let deadline = relaxation_deadline(cutoff, self.time_limit);
        let priced = price_all(&local.subproblems, &convexity, self.solver, deadline, self.max_parallel);
        stats.pricings += priced.len();

        for p in priced.iter() {
            match p.status {
                RelaxationStatus::Optimal    => {},
                RelaxationStatus::Unbounded if p.ray => {},
                RelaxationStatus::Infeasible => return Ok(Err(PricingFailure::Infeasible)),
                RelaxationStatus::TimeLimit  => return Ok(Err(PricingFailure::TimeLimit)),
                status => return Err(Error::Solver {
                    status,
                    context: format!("pricing problem of subproblem {}", self.reformulation.subproblems()[p.subproblem].tag),
                }),
            }
        }
        Ok(Ok(priced))
    }

    /// Turns the improving pricing solutions into columns and adds them to
    /// the pools and the master. Returns the number of columns added to the
    /// master.
    fn accept(&self, master: &mut RestrictedMaster, local: &LocalReformulation, priced: &[Priced], pools: &mut [StagedPool]) -> Result<usize, Error> {
        let mut improving: Vec<&Priced> = priced.iter()
            .filter(|p| p.reduced_cost < -self.tolerances.reduced_cost)
            .collect();
        improving.sort_by(|a, b| a.reduced_cost.total_cmp(&b.reduced_cost).then(a.subproblem.cmp(&b.subproblem)));

        let mut added = 0;
        for p in improving {
            let column = if p.ray {
                Column::ray(&self.reformulation, p.subproblem, p.values.clone(), p.reduced_cost)
            } else {
                Column::new(&self.reformulation, p.subproblem, p.values.clone(), p.reduced_cost)
            };
            column.verify(&self.reformulation)?;
            let (column, _) = pools[p.subproblem].insert(column);
            if local.admits(&column, self.tolerances.feasibility) && master.add_column(column)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Evicts the useless columns of the pools which grew too large. Returns
    /// true when the master has been rebuilt.
    fn clean_up(&self, master: &mut RestrictedMaster, primal: &[f64], duals: &[f64], pools: &mut [StagedPool]) -> Result<bool, Error> {
        let active = master.active_columns(primal, 0.0);
        let mut evicted = FxHashSet::default();
        for (k, pool) in pools.iter_mut().enumerate() {
            pool.mark_active(&active[k]);
            if let Some((threshold, ratio)) = self.clean_up {
                if pool.len() > threshold {
                    let ids = pool.clean_up(threshold, ratio, &active[k], |c| master.reduced_cost(c, duals), self.tolerances.reduced_cost);
                    if self.verbosity >= 2 {
                        debug!(subproblem = k, evicted = ids.len(), remaining = pool.len(), "column pool clean-up");
                    }
                    evicted.extend(ids.into_iter().map(|id| (k, id)));
                }
            }
        }
        if !master.columns().any(|c| evicted.contains(&(c.subproblem, c.id))) {
            return Ok(false);
        }
        master.retain(|c| !evicted.contains(&(c.subproblem, c.id)))?;
        Ok(true)
    }

    /// The Lagrangian bound of the master: valid when every pricing problem
    /// was solved to optimality with the raw duals. An improving ray leaves
    /// the Lagrangian dual unbounded.
    fn lagrangian(z: f64, priced: &[Priced]) -> f64 {
        if priced.iter().any(|p| p.ray) {
            return f64::NEG_INFINITY;
        }
        z + priced.iter().map(|p| p.reduced_cost.min(0.0)).sum::<f64>()
    }

    fn can_prune(&self, bound: f64, incumbent: Option<f64>) -> bool {
        incumbent.map_or(false, |ub| bound >= ub - self.tolerances.improvement)
    }

    fn run(&self, node: &NodeSpec, incumbent: Option<f64>, cutoff: &dyn Cutoff, stats: &mut RelaxationStats, pools: &mut [StagedPool]) -> Result<NodeOutcome, Error> {
        let tol = self.tolerances;
        let mut local = self.reformulation.localize(node.bound_changes, node.cuts, self.enforcement.as_ref())?;
        let mut penalty = self.infeasibility.initial_penalty();
        let mut master  = RestrictedMaster::new(&self.reformulation, &local, penalty)?;
        self.seed(&mut master, &local, pools)?;

        let mut stabilization = self.stabilization();
        let mut escalations   = 0;
        let mut iterations    = 0;
        let mut lagrangian    = f64::NEG_INFINITY;
        let mut last_primal: Option<Vec<f64>> = None;

        loop {
            let bound = lagrangian.max(node.parent_bound);
            if cutoff.must_stop() {
                return Ok(NodeOutcome::with_status(OutcomeStatus::TimeLimit, bound));
            }
            if iterations >= self.iteration_limit {
                let mut outcome = NodeOutcome::with_status(OutcomeStatus::IterationLimit, bound);
                outcome.solution = last_primal
                    .filter(|p| master.artificial_value(p) <= tol.feasibility)
                    .map(|p| master.project(&p));
                return Ok(outcome);
            }
            iterations += 1;
            stats.iterations += 1;

            let deadline = relaxation_deadline(cutoff, self.time_limit);
            let res = master.solve(self.solver, deadline);
            match res.status {
                RelaxationStatus::Optimal => {},
                RelaxationStatus::TimeLimit => {
                    return Ok(NodeOutcome::with_status(OutcomeStatus::TimeLimit, bound));
                },
                RelaxationStatus::Infeasible => {
                    let Some(ray) = self.infeasibility.restoring_prices(&res) else {
                        return Ok(NodeOutcome::with_status(OutcomeStatus::Infeasible, f64::INFINITY));
                    };
                    let priced = match self.price(&master, &mut local, &ray, true, cutoff, stats)? {
                        Ok(priced) => priced,
                        Err(PricingFailure::Infeasible) => return Ok(NodeOutcome::with_status(OutcomeStatus::Infeasible, f64::INFINITY)),
                        Err(PricingFailure::TimeLimit)  => return Ok(NodeOutcome::with_status(OutcomeStatus::TimeLimit, bound)),
                    };
                    let added = self.accept(&mut master, &local, &priced, pools)?;
                    stats.columns += added;
                    if self.verbosity >= 3 {
                        debug!(node = node.id.0, iteration = iterations, added, "farkas pricing");
                    }
                    if added == 0 {
                        return Ok(NodeOutcome::with_status(OutcomeStatus::Infeasible, f64::INFINITY));
                    }
                    continue;
                },
                status => {
                    return Err(Error::Solver { status, context: format!("restricted master of node {}", node.id.0) });
                }
            }

            let Some(z) = res.objective else {
                return Err(Error::Solver { status: res.status, context: format!("restricted master of node {} has no objective", node.id.0) });
            };
            let primal = res.primal;
            let duals  = res.duals;

            if self.clean_up(&mut master, &primal, &duals, pools)? {
                last_primal = None;
                continue;
            }

            let prices   = stabilization.stabilize(&duals);
            let smoothed = stabilization.is_active()
                && prices.iter().zip(duals.iter()).any(|(p, y)| (p - y).abs() > 1e-12);

            let mut priced = match self.price(&master, &mut local, &prices, false, cutoff, stats)? {
                Ok(priced) => priced,
                Err(PricingFailure::Infeasible) => return Ok(NodeOutcome::with_status(OutcomeStatus::Infeasible, f64::INFINITY)),
                Err(PricingFailure::TimeLimit)  => return Ok(NodeOutcome::with_status(OutcomeStatus::TimeLimit, bound)),
            };
            let mut added = self.accept(&mut master, &local, &priced, pools)?;
            let mut raw_pricing = !smoothed;

            if added == 0 && smoothed {
                // mispricing: confirm with the raw duals
                priced = match self.price(&master, &mut local, &duals, false, cutoff, stats)? {
                    Ok(priced) => priced,
                    Err(PricingFailure::Infeasible) => return Ok(NodeOutcome::with_status(OutcomeStatus::Infeasible, f64::INFINITY)),
                    Err(PricingFailure::TimeLimit)  => return Ok(NodeOutcome::with_status(OutcomeStatus::TimeLimit, bound)),
                };
                added = self.accept(&mut master, &local, &priced, pools)?;
                raw_pricing = true;
                stabilization.reset();
            }
            stats.columns += added;

            if raw_pricing {
                lagrangian = lagrangian.max(Self::lagrangian(z, &priced));
                if self.can_prune(lagrangian, incumbent) {
                    if self.verbosity >= 3 {
                        debug!(node = node.id.0, iteration = iterations, bound = lagrangian, "pruned by lagrangian bound");
                    }
                    return Ok(NodeOutcome::with_status(OutcomeStatus::PrunedByBound, lagrangian.max(node.parent_bound)));
                }
            }

            if self.verbosity >= 3 || (self.verbosity >= 2 && iterations % self.log_frequency == 0) {
                debug!(node = node.id.0, iteration = iterations, master = z, lagrangian, added, columns = master.nb_columns(), "column generation");
            }

            if added > 0 {
                last_primal = Some(primal);
                continue;
            }

            // no improving column: the master is optimal
            let artificials = master.artificial_value(&primal);
            if let Some(p) = penalty {
                if artificials > tol.feasibility {
                    match self.infeasibility.escalate(p, escalations) {
                        Some(np) => {
                            escalations += 1;
                            penalty = Some(np);
                            master.set_penalty(np);
                            stabilization.reset();
                            if self.verbosity >= 3 {
                                debug!(node = node.id.0, penalty = np, artificials, "artificial cost escalation");
                            }
                            continue;
                        },
                        None => return Ok(NodeOutcome::with_status(OutcomeStatus::Infeasible, f64::INFINITY)),
                    }
                }
            }

            let solution = master.project(&primal);
            let mut candidates = vec![];
            if self.integer_master && !self.reformulation.original().is_integral(&solution, tol.integrality) {
                let deadline = relaxation_deadline(cutoff, self.time_limit);
                if let Some(candidate) = master.integer_solution(self.solver, deadline) {
                    candidates.push(candidate);
                }
            }
            return Ok(NodeOutcome {
                status  : OutcomeStatus::Solved,
                bound   : z.max(node.parent_bound),
                solution: Some(solution),
                candidates,
            });
        }
    }
}

impl NodeRelaxation for ColumnGeneration<'_> {
    fn formulation(&self) -> &Formulation {
        self.reformulation.original()
    }

    fn solve(&self, node: &NodeSpec, incumbent: Option<f64>, cutoff: &dyn Cutoff) -> Result<NodeOutcome, Error> {
        let mut stats = RelaxationStats::default();
        let mut pools: Vec<StagedPool> = self.pools.iter().map(|p| StagedPool::new(&p.lock())).collect();
        let outcome = self.run(node, incumbent, cutoff, &mut stats, &mut pools);
        self.staged.lock().push((node.id, pools));
        let mut total = self.stats.lock();
        total.iterations += stats.iterations;
        total.columns    += stats.columns;
        total.pricings   += stats.pricings;
        outcome
    }

    fn stats(&self) -> RelaxationStats {
        *self.stats.lock()
    }

    fn synchronize(&self) {
        let mut staged = std::mem::take(&mut *self.staged.lock());
        staged.sort_unstable_by_key(|(id, _)| *id);
        for (_, pools) in staged {
            for (shared, pool) in self.pools.iter().zip(pools) {
                shared.lock().replay(pool);
            }
        }
    }
}

#[cfg(test)]
mod test_engine {
    use crate::*;

    /// min 3x0 + x1 + 2x2 + 5x3 st. x0 + x1 <= 1 ; x2 + x3 <= 1 ; x0 + x2 >= 1
    fn instance() -> (Formulation, Decomposition) {
        let mut f = Formulation::new("cover");
        let x: Vec<VarId> = (0..4).map(|i| f.add_var(format!("x{}", i), 0.0, 1.0, VarKind::Binary)).collect();
        let k0 = f.add_ctr(Constraint::le("k0", LinExpr::new().term(x[0], 1.0).term(x[1], 1.0), 1.0)).unwrap();
        let k1 = f.add_ctr(Constraint::le("k1", LinExpr::new().term(x[2], 1.0).term(x[3], 1.0), 1.0)).unwrap();
        let m  = f.add_ctr(Constraint::ge("m", LinExpr::new().term(x[0], 1.0).term(x[2], 1.0), 1.0)).unwrap();
        f.set_objective(LinExpr::new().term(x[0], 3.0).term(x[1], 1.0).term(x[2], 2.0).term(x[3], 5.0)).unwrap();
        let d = Decomposition::new()
            .with(k0, Partition::Subproblem(0))
            .with(k1, Partition::Subproblem(1))
            .with(m,  Partition::Master);
        (f, d)
    }

    fn root(changes: &[BoundChange]) -> NodeSpec<'_> {
        NodeSpec { id: NodeId(0), depth: 0, bound_changes: changes, cuts: &[], parent_bound: f64::NEG_INFINITY }
    }

    fn solve_root(config: Config) -> NodeOutcome {
        let (f, d) = instance();
        let solver = HighsSolver::default();
        let cg = ColumnGeneration::new(&f, &d, &solver, &config).unwrap();
        cg.solve(&root(&[]), None, &NoCutoff).unwrap()
    }

    #[test]
    fn root_relaxation_converges_with_artificial_costs() {
        let outcome = solve_root(Config::default());
        assert_eq!(OutcomeStatus::Solved, outcome.status);
        assert!((outcome.bound - 2.0).abs() < 1e-6);
        let x = outcome.solution.unwrap();
        assert!((x[2] - 1.0).abs() < 1e-6);
    }
    #[test]
    fn farkas_pricing_reaches_the_same_bound() {
        let config = ConfigBuilder::default().farkas_pricing(true).build().unwrap();
        let outcome = solve_root(config);
        assert_eq!(OutcomeStatus::Solved, outcome.status);
        assert!((outcome.bound - 2.0).abs() < 1e-6);
    }
    #[test]
    fn smoothing_does_not_change_the_bound() {
        for alpha in [0.3, 0.8] {
            let config = ConfigBuilder::default().smoothing_factor(alpha).build().unwrap();
            let outcome = solve_root(config);
            assert_eq!(OutcomeStatus::Solved, outcome.status);
            assert!((outcome.bound - 2.0).abs() < 1e-6);
        }
    }
    #[test]
    fn node_without_any_feasible_column_is_infeasible() {
        let (f, d) = instance();
        let solver  = HighsSolver::default();
        let changes = [BoundChange::upper(VarId(0), 0.0), BoundChange::upper(VarId(2), 0.0)];
        for farkas in [false, true] {
            for on_master in [false, true] {
                let config = ConfigBuilder::default()
                    .farkas_pricing(farkas)
                    .branching_on_master(on_master)
                    .build().unwrap();
                let cg = ColumnGeneration::new(&f, &d, &solver, &config).unwrap();
                let outcome = cg.solve(&root(&changes), None, &NoCutoff).unwrap();
                assert_eq!(OutcomeStatus::Infeasible, outcome.status, "farkas={} on_master={}", farkas, on_master);
            }
        }
    }
    #[test]
    fn both_enforcements_yield_the_same_child_bound() {
        let (f, d) = instance();
        let solver  = HighsSolver::default();
        let changes = [BoundChange::upper(VarId(2), 0.0)];
        for on_master in [false, true] {
            let config = ConfigBuilder::default().branching_on_master(on_master).build().unwrap();
            let cg = ColumnGeneration::new(&f, &d, &solver, &config).unwrap();
            let outcome = cg.solve(&root(&changes), None, &NoCutoff).unwrap();
            assert_eq!(OutcomeStatus::Solved, outcome.status);
            assert!((outcome.bound - 3.0).abs() < 1e-6);
        }
    }
    #[test]
    fn node_is_pruned_as_soon_as_the_lagrangian_bound_reaches_the_incumbent() {
        let (f, d) = instance();
        let solver = HighsSolver::default();
        let cg = ColumnGeneration::new(&f, &d, &solver, &Config::default()).unwrap();
        let outcome = cg.solve(&root(&[]), Some(1.5), &NoCutoff).unwrap();
        assert_eq!(OutcomeStatus::PrunedByBound, outcome.status);
        assert!(outcome.bound >= 1.5 - 1e-6);
    }
    #[test]
    fn pooled_columns_are_reused_by_later_nodes() {
        let (f, d) = instance();
        let solver = HighsSolver::default();
        let cg = ColumnGeneration::new(&f, &d, &solver, &Config::default()).unwrap();
        cg.solve(&root(&[]), None, &NoCutoff).unwrap();
        cg.synchronize();
        let first = cg.stats();
        assert!(first.iterations > 0);
        assert!(first.columns > 0);
        assert!(cg.pool_sizes().iter().all(|s| *s > 0));
        assert!(cg.verify_pools().is_ok());

        let again = cg.solve(&root(&[]), None, &NoCutoff).unwrap();
        assert!((again.bound - 2.0).abs() < 1e-6);
        assert!(cg.stats().columns - first.columns < first.columns);
    }
    #[test]
    fn iteration_limit_is_reported_as_such() {
        let config = ConfigBuilder::default().column_generation_iteration_limit(1).build().unwrap();
        let outcome = solve_root(config);
        assert_eq!(OutcomeStatus::IterationLimit, outcome.status);
    }
    #[test]
    fn elapsed_time_budget_interrupts_the_node() {
        let (f, d) = instance();
        let solver = HighsSolver::default();
        let cg = ColumnGeneration::new(&f, &d, &solver, &Config::default()).unwrap();
        let cutoff = TimeBudget::new(std::time::Duration::ZERO);
        let outcome = cg.solve(&root(&[]), None, &cutoff).unwrap();
        assert_eq!(OutcomeStatus::TimeLimit, outcome.status);
    }
    #[test]
    fn clean_up_keeps_the_pools_small() {
        let config = ConfigBuilder::default().clean_up_threshold(1).clean_up_ratio(0.5).build().unwrap();
        let outcome = solve_root(config);
        assert_eq!(OutcomeStatus::Solved, outcome.status);
        assert!((outcome.bound - 2.0).abs() < 1e-6);
    }
    #[test]
    fn integer_master_heuristic_proposes_candidates() {
        let config = ConfigBuilder::default().integer_master_heuristic(true).build().unwrap();
        let outcome = solve_root(config);
        // the root solution is already integral: nothing to propose
        assert!(outcome.candidates.is_empty());
    }
    #[test]
    fn invalid_configuration_is_rejected() {
        let (f, d) = instance();
        let solver = HighsSolver::default();
        let config = ConfigBuilder::default().smoothing_factor(2.0).build().unwrap();
        assert!(matches!(ColumnGeneration::new(&f, &d, &solver, &config), Err(Error::Configuration(_))));
    }
    #[test]
    fn columns_stay_private_to_the_node_until_synchronized() {
        let (f, d) = instance();
        let solver = HighsSolver::default();
        let cg = ColumnGeneration::new(&f, &d, &solver, &Config::default()).unwrap();
        cg.solve(&root(&[]), None, &NoCutoff).unwrap();
        assert!(cg.pool_sizes().iter().all(|s| *s == 0));
        cg.synchronize();
        assert!(cg.pool_sizes().iter().all(|s| *s > 0));
    }
    #[test]
    fn unbounded_pricing_problems_contribute_rays() {
        // min -x + 0.5y st. x - y <= 0 (subproblem) ; x <= 3 (master)
        let mut f = Formulation::new("cone");
        let x = f.add_var("x", 0.0, f64::INFINITY, VarKind::Continuous);
        let y = f.add_var("y", 0.0, f64::INFINITY, VarKind::Continuous);
        let k = f.add_ctr(Constraint::le("k", LinExpr::new().term(x, 1.0).term(y, -1.0), 0.0)).unwrap();
        let m = f.add_ctr(Constraint::le("m", LinExpr::new().term(x, 1.0), 3.0)).unwrap();
        f.set_objective(LinExpr::new().term(x, -1.0).term(y, 0.5)).unwrap();
        let d = Decomposition::new()
            .with(k, Partition::Subproblem(0))
            .with(m, Partition::Master);
        let solver = HighsSolver::default();
        for farkas in [false, true] {
            let config = ConfigBuilder::default().farkas_pricing(farkas).build().unwrap();
            let cg = ColumnGeneration::new(&f, &d, &solver, &config).unwrap();
            let outcome = cg.solve(&root(&[]), None, &NoCutoff).unwrap();
            assert_eq!(OutcomeStatus::Solved, outcome.status, "farkas={}", farkas);
            assert!((outcome.bound + 1.5).abs() < 1e-6, "farkas={} bound={}", farkas, outcome.bound);
            let sol = outcome.solution.unwrap();
            assert!((sol[0] - 3.0).abs() < 1e-6);
            assert!((sol[1] - 3.0).abs() < 1e-6);
        }
    }
}
