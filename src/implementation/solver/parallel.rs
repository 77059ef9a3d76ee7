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

//! This module provides the implementation of a parallel branch-and-bound
//! solver. The open nodes are processed in batches: a pool of worker threads
//! fetches the nodes of the current batch and processes them without holding
//! any lock. Once every node of the batch has been processed, the verdicts
//! are applied to the shared state in the order the nodes were popped, and
//! the next batch is formed.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};
use tracing::{info, warn};

use crate::{BranchingRule, Completion, Config, Cutoff, Error, Fringe, MostFractional, NodeId, NodeRelaxation, NodeSummary, Reason, Solution, Solver, VarId};

use super::{branching_candidates, explore::{Explored, Explorer, Task}, SearchState};

/// A node of the current batch and the result of its processing
struct Slot {
    id     : NodeId,
    depth  : usize,
    outcome: Option<Result<Explored, Error>>,
}

/// The state of the search which is shared among the workers and may only
/// be accessed in mutual exclusion.
struct Critical {
    state    : SearchState,
    /// The number of nodes currently being processed
    ongoing  : usize,
    /// Why the search had to stop (if it had to)
    abort    : Option<Reason>,
    /// The fatal error which aborted the search
    error    : Option<Error>,
    /// The nodes of the current batch
    batch    : Vec<Slot>,
    /// The nodes of the current batch which no worker has fetched yet
    pending  : VecDeque<(usize, Task)>,
    /// The value of the incumbent when the current batch was formed
    incumbent: Option<f64>,
}

struct Shared<'a> {
    relaxation: &'a (dyn NodeRelaxation + Send + Sync),
    branching : &'a (dyn BranchingRule + Send + Sync),
    cutoff    : &'a (dyn Cutoff + Send + Sync),
    config    : &'a Config,
    candidates: &'a [VarId],
    critical  : Mutex<Critical>,
    monitor   : Condvar,
}

/// The workload a thread can get from the shared state
enum WorkLoad {
    /// There is no work left to be done: the problem is solved
    Complete,
    /// The search was aborted (limit or fatal error)
    Aborted,
    /// There is no work left to be done for now: the thread must wait
    Starvation,
    /// The node to process
    WorkItem { slot: usize, task: Task, incumbent: Option<f64> },
}

/// The parallel branch-and-bound solver.
///
/// A batch holds up to `threads` nodes, except for the nodes shallower than
/// `parallel_depth` which are processed alone, so that the top of the tree
/// is explored sequentially. All the nodes of a batch are processed against
/// the incumbent known when the batch was formed, and their verdicts are
/// applied in a fixed order. Hence, for a given number of threads, the
/// search does not depend on the timing of the threads.
///
/// # Example
/// ```
/// # use bnp::*;
/// // min -x - y st. 2x + 2y <= 3 with x, y binary
/// let mut f = Formulation::new("example");
/// let x = f.add_var("x", 0.0, 1.0, VarKind::Binary);
/// let y = f.add_var("y", 0.0, 1.0, VarKind::Binary);
/// f.add_ctr(Constraint::le("c", LinExpr::new().term(x, 2.0).term(y, 2.0), 3.0)).unwrap();
/// f.set_objective(LinExpr::new().term(x, -1.0).term(y, -1.0)).unwrap();
///
/// let config = ConfigBuilder::default().threads(4).build().unwrap();
/// let lp     = HighsSolver::default();
/// let relax  = DirectRelaxation::new(&f, &lp, &config).unwrap();
/// let mut solver = ParallelSolver::new(&relax, config).unwrap();
///
/// let completion = solver.minimize().unwrap();
/// assert!(completion.is_exact());
/// assert!((completion.best_value.unwrap() + 1.0).abs() < 1e-9);
/// ```
pub struct ParallelSolver<'a> {
    relaxation: &'a (dyn NodeRelaxation + Send + Sync),
    branching : Box<dyn BranchingRule + Send + Sync>,
    config    : Config,
    candidates: Vec<VarId>,
    state     : SearchState,
    primal    : Option<(f64, Solution)>,
    best_bound: f64,
}

impl <'a> ParallelSolver<'a> {
    pub fn new(relaxation: &'a (dyn NodeRelaxation + Send + Sync), config: Config) -> Result<Self, Error> {
        config.validate()?;
        let candidates = branching_candidates(relaxation, &config)?;
        let state = SearchState::new(&config);
        Ok(ParallelSolver {
            relaxation,
            branching : Box::new(MostFractional),
            config,
            candidates,
            state,
            primal    : None,
            best_bound: f64::NEG_INFINITY,
        })
    }
    /// Replaces the branching rule
    pub fn with_branching(mut self, branching: Box<dyn BranchingRule + Send + Sync>) -> Self {
        self.branching = branching;
        self
    }
    /// Sets the number of threads used by the solver
    pub fn with_nb_threads(mut self, nb_threads: usize) -> Self {
        self.config.threads = nb_threads.max(1);
        self
    }

    /// Processes the given node and stores its outcome in its slot
    fn process_one_node(shared: &Shared, explorer: &Explorer, slot: usize, task: Task, incumbent: Option<f64>) {
        let outcome = explorer.explore(&task, incumbent);
        let mut critical = shared.critical.lock();
        if let Some(s) = critical.batch.get_mut(slot) {
            s.outcome = Some(outcome);
        }
    }

    /// Applies the verdicts of the current batch in the order the nodes were
    /// popped, then lets the relaxation publish what these nodes learned.
    fn apply_batch(shared: &Shared, critical: &mut Critical) {
        let batch = std::mem::take(&mut critical.batch);
        for Slot { id, depth, outcome } in batch {
            match outcome {
                Some(Ok(explored)) => {
                    if let Some(reason) = critical.state.apply(id, explored) {
                        Self::abort_search(critical, reason);
                    }
                },
                Some(Err(e)) if e.is_recoverable() && depth > 0 => {
                    warn!(node = id.0, error = %e, "node relaxation failed, the node is discarded");
                    critical.state.discard(id);
                },
                Some(Err(e)) => {
                    // the reason is irrelevant: the error is reported instead
                    critical.error.get_or_insert(e);
                    Self::abort_search(critical, Reason::Exhausted);
                },
                // a worker died while processing the node
                None => {
                    critical.error.get_or_insert(Error::InvariantViolation(format!("node {} was never processed", id.0)));
                    Self::abort_search(critical, Reason::Exhausted);
                },
            }
            Self::maybe_log(shared.config, &critical.state);
        }
        shared.relaxation.synchronize();
    }

    /// Pops the nodes of the next batch. Returns false when there is no open
    /// node left.
    fn next_batch(shared: &Shared, critical: &mut Critical) -> bool {
        let mut size = shared.config.threads.max(1);
        if let Some(limit) = shared.config.node_limit {
            size = size.min(limit.saturating_sub(critical.state.explored));
        }
        critical.incumbent = critical.state.best_value();
        while critical.batch.len() < size {
            let Some(open) = critical.state.pop() else {
                break;
            };
            // The top of the tree is explored sequentially
            let alone = open.depth < shared.config.parallel_depth;
            if alone && !critical.batch.is_empty() {
                critical.state.fringe.push(open);
                break;
            }
            let slot = critical.batch.len();
            let task = critical.state.task(open);
            critical.batch.push(Slot { id: task.id, depth: task.depth, outcome: None });
            critical.pending.push_back((slot, task));
            critical.state.explored += 1;
            if alone {
                break;
            }
        }
        !critical.batch.is_empty()
    }

    fn abort_search(critical: &mut Critical, reason: Reason) {
        if critical.abort.is_none() {
            critical.abort = Some(reason);
        }
    }

    /// Acknowledges that a thread finished processing its node.
    fn notify_node_finished(shared: &Shared) {
        let mut critical = shared.critical.lock();
        critical.ongoing -= 1;
        shared.monitor.notify_all();
    }

    /// Consults the shared state to fetch a workload. Depending on the current
    /// state, the workload can either be:
    ///
    ///   + Complete, when the problem is solved and all threads should stop
    ///   + Aborted, when some limit was reached or a fatal error occurred
    ///   + Starvation, when there is no node available for processing at the
    ///     time being (but some nodes of the batch are still being processed
    ///     and thus the next batch cannot be formed yet).
    ///   + WorkItem, when the thread successfully obtained a node to process.
    fn get_workload(shared: &Shared) -> WorkLoad {
        let mut critical = shared.critical.lock();

        // Is the current batch over ?
        if critical.pending.is_empty() && critical.ongoing == 0 && !critical.batch.is_empty() {
            Self::apply_batch(shared, &mut critical);
        }

        // Do we need to stop ?
        if critical.abort.is_some() {
            shared.monitor.notify_all();
            return WorkLoad::Aborted;
        }

        if critical.pending.is_empty() {
            // Nothing to do yet ? => Wait for the batch to be over
            if critical.ongoing > 0 {
                shared.monitor.wait(&mut critical);
                return WorkLoad::Starvation;
            }
            if shared.cutoff.must_stop() {
                Self::abort_search(&mut critical, Reason::TimeLimit);
                shared.monitor.notify_all();
                return WorkLoad::Aborted;
            }
            if shared.config.node_limit.map_or(false, |limit| critical.state.explored >= limit) {
                Self::abort_search(&mut critical, Reason::NodeLimit);
                shared.monitor.notify_all();
                return WorkLoad::Aborted;
            }
            // Are we done ?
            if !Self::next_batch(shared, &mut critical) {
                shared.monitor.notify_all();
                return WorkLoad::Complete;
            }
            shared.monitor.notify_all();
        }

        let Some((slot, task)) = critical.pending.pop_front() else {
            return WorkLoad::Starvation;
        };
        critical.ongoing += 1;
        WorkLoad::WorkItem { slot, task, incumbent: critical.incumbent }
    }

    /// Depending on the verbosity configuration and the number of nodes that
    /// have been processed, logs the current progress of the search.
    fn maybe_log(config: &Config, state: &SearchState) {
        if config.verbosity >= 2 && state.explored % config.log_frequency == 0 {
            info!(explored = state.explored, open = state.fringe.len(), best = ?state.best_value(), bound = state.best_bound(), "progress");
        }
    }
}

impl Solver for ParallelSolver<'_> {
    /// Spawns `threads` workers; each of which continually gets a workload
    /// and processes it until the search is over.
    fn minimize(&mut self) -> Result<Completion, Error> {
        let mut state = std::mem::replace(&mut self.state, SearchState::new(&self.config));
        state.reset(self.primal.clone());

        let cutoff = self.config.cutoff();
        let shared = Shared {
            relaxation: self.relaxation,
            branching : self.branching.as_ref(),
            cutoff    : cutoff.as_ref(),
            config    : &self.config,
            candidates: &self.candidates,
            critical  : Mutex::new(Critical {
                state,
                ongoing  : 0,
                abort    : None,
                error    : None,
                batch    : vec![],
                pending  : VecDeque::new(),
                incumbent: None,
            }),
            monitor   : Condvar::new(),
        };

        std::thread::scope(|s| {
            for _ in 0..shared.config.threads {
                let shared = &shared;
                s.spawn(move || {
                    let explorer = Explorer {
                        relaxation: shared.relaxation,
                        branching : shared.branching,
                        cutoff    : shared.cutoff,
                        config    : shared.config,
                        candidates: shared.candidates,
                    };
                    loop {
                        match Self::get_workload(shared) {
                            WorkLoad::Complete   => break,
                            WorkLoad::Aborted    => break,
                            WorkLoad::Starvation => continue,
                            WorkLoad::WorkItem { slot, task, incumbent } => {
                                Self::process_one_node(shared, &explorer, slot, task, incumbent);
                                Self::notify_node_finished(shared);
                            }
                        }
                    }
                });
            }
        });

        let Critical { state, abort, error, .. } = shared.critical.into_inner();
        self.state = state;
        if let Some(e) = error {
            return Err(e);
        }
        let completion  = self.state.complete(abort);
        self.best_bound = self.state.best_bound();
        if self.config.verbosity >= 1 {
            info!(status = %completion.status, reason = %completion.reason, best = ?completion.best_value,
                bound = self.best_bound, explored = self.state.explored, "search completed");
        }
        Ok(completion)
    }

    fn best_value(&self) -> Option<f64> {
        self.state.best_value()
    }
    fn best_solution(&self) -> Option<Solution> {
        self.state.best.as_ref().map(|(_, s)| s.clone())
    }
    fn best_bound(&self) -> f64 {
        self.best_bound
    }
    fn set_primal(&mut self, value: f64, solution: Solution) {
        if self.primal.as_ref().map_or(true, |(v, _)| value < *v) {
            self.primal = Some((value, solution.clone()));
        }
        self.state.maybe_update_best(value, solution);
    }
    fn explored(&self) -> usize {
        self.state.explored
    }
    fn nodes(&self) -> Vec<NodeSummary> {
        self.state.tree.summaries()
    }
}
