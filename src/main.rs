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

//! This is the benchmark harness: it solves a generalized assignment instance
//! with one of three methods and appends the outcome to a CSV log.
//!
//! ```text
//! bnp <path_to_instance> <method> [with_heuristics] [smoothing_factor] [farkas_pricing] [branching_on_master]
//! ```

use std::{path::PathBuf, sync::Arc, time::{Duration, Instant}};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, Level};

use bnp::*;

/// The way the instance gets solved
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    /// The integer mode of the LP/MIP adapter on the compact formulation
    External,
    /// Branch-and-bound with LP relaxations of the compact formulation
    Bab,
    /// Branch-and-price on the Dantzig-Wolfe reformulation
    Bap,
}
impl Method {
    fn label(self) -> &'static str {
        match self {
            Method::External => "external",
            Method::Bab      => "bab",
            Method::Bap      => "bap",
        }
    }
}

/// This structure uses `clap-derive` annotations and define the arguments that can
/// be passed on to the executable solver.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path to the instance file
    instance: PathBuf,
    /// The solution method
    #[arg(value_enum)]
    method: Method,
    /// Use primal heuristics: rounding for bab, integer master for bap (true|false)
    #[arg(value_parser = parse_bool)]
    with_heuristics: Option<bool>,
    /// The Wentges smoothing factor in [0, 1)
    smoothing_factor: Option<f64>,
    /// Use Farkas pricing rather than artificial variables (true|false)
    #[arg(value_parser = parse_bool)]
    farkas_pricing: Option<bool>,
    /// Enforce the branching decisions in the master (true|false)
    #[arg(value_parser = parse_bool)]
    branching_on_master: Option<bool>,
    /// The maximum amount of time (in seconds) you would like this solver to run
    #[arg(short, long, default_value_t = 600)]
    time_limit: u64,
    /// The number of concurrent threads (defaults to the number of cpus)
    #[arg(long)]
    threads: Option<usize>,
    /// 0 = silent, 1 = summary, 2 = progress, 3 = column generation traces
    #[arg(short, long, default_value_t = 1)]
    verbosity: u8,
    /// The CSV file the outcome is appended to
    #[arg(short, long, default_value = "results_GAP.csv")]
    output: PathBuf,
}

/// Booleans are spelled out: anything but `true` or `false` is rejected
fn parse_bool(text: &str) -> Result<bool, String> {
    match text {
        "true"  => Ok(true),
        "false" => Ok(false),
        other   => Err(format!("expected true|false for boolean values, got '{}'", other)),
    }
}

/// The parameters of the method, once the optional arguments have been checked
#[derive(Debug, Clone, Copy, Default)]
struct Settings {
    with_heuristics    : bool,
    smoothing_factor   : f64,
    farkas_pricing     : bool,
    branching_on_master: bool,
    clean_up           : usize,
}
impl Settings {
    fn from_args(args: &Args) -> Result<Self, Error> {
        match args.method {
            Method::External => Ok(Settings::default()),
            Method::Bab => {
                let with_heuristics = args.with_heuristics
                    .ok_or_else(|| Error::Configuration("method bab expects argument 3: with_heuristics".to_string()))?;
                Ok(Settings { with_heuristics, ..Settings::default() })
            },
            Method::Bap => match (args.with_heuristics, args.smoothing_factor, args.farkas_pricing, args.branching_on_master) {
                (Some(with_heuristics), Some(smoothing_factor), Some(farkas_pricing), Some(branching_on_master)) =>
                    Ok(Settings { with_heuristics, smoothing_factor, farkas_pricing, branching_on_master, clean_up: 1500 }),
                _ => Err(Error::Configuration(
                    "method bap expects arguments 3, 4, 5, 6: with_heuristics smoothing_factor farkas_pricing branching_on_master".to_string())),
            },
        }
    }
}

/// What is reported about a solve
struct Outcome {
    status   : SolutionStatus,
    reason   : Reason,
    objective: f64,
}
impl From<Completion> for Outcome {
    fn from(completion: Completion) -> Self {
        Outcome {
            status   : completion.status,
            reason   : completion.reason,
            objective: completion.best_value.unwrap_or(f64::INFINITY),
        }
    }
}

fn solve_external(model: &GapModel, time_limit: Duration) -> Result<Outcome, Error> {
    let deadline = Instant::now() + time_limit;
    let result   = HighsSolver::default().solve(&model.formulation, RequestKind::Integer, Some(deadline));
    let objective = result.objective.unwrap_or(f64::INFINITY);
    match result.status {
        RelaxationStatus::Optimal    => Ok(Outcome { status: SolutionStatus::Optimal, reason: Reason::Exhausted, objective }),
        RelaxationStatus::Infeasible => Ok(Outcome { status: SolutionStatus::Infeasible, reason: Reason::Exhausted, objective }),
        RelaxationStatus::TimeLimit  => {
            let status = if result.objective.is_some() { SolutionStatus::BestKnown } else { SolutionStatus::Unknown };
            Ok(Outcome { status, reason: Reason::TimeLimit, objective })
        },
        status => Err(Error::Solver { status, context: "external solve".to_string() }),
    }
}

fn search(relaxation: &(dyn NodeRelaxation + Send + Sync), config: Config) -> Result<Outcome, Error> {
    let verbosity  = config.verbosity;
    let mut solver = DefaultSolver::new(relaxation, config)?;
    let completion = solver.minimize()?;
    if verbosity >= 1 {
        let stats = relaxation.stats();
        info!(explored = solver.explored(), gap = solver.gap(), bound = solver.best_bound(),
            iterations = stats.iterations, columns = stats.columns, "search statistics");
    }
    Ok(completion.into())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = match args.verbosity {
        0     => Level::WARN,
        1 | 2 => Level::INFO,
        _     => Level::DEBUG,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let settings = Settings::from_args(&args)?;
    let instance = read_instance(&args.instance)
        .with_context(|| format!("could not read instance {}", args.instance.display()))?;
    let model    = GapModel::new(&instance)?;
    let time_limit = Duration::from_secs(args.time_limit);
    info!(method = args.method.label(), time_limit = args.time_limit, "solve");

    let mut builder = ConfigBuilder::default();
    builder.time_limit(time_limit).verbosity(args.verbosity);
    if let Some(threads) = args.threads {
        builder.threads(threads);
    }

    let lp    = HighsSolver::default();
    let start = Instant::now();
    let outcome = match args.method {
        Method::External => solve_external(&model, time_limit)?,
        Method::Bab => {
            if settings.with_heuristics {
                builder.callbacks(vec![Arc::new(RoundingHeuristic::new())]);
            }
            let config     = builder.build()?;
            let relaxation = DirectRelaxation::new(&model.formulation, &lp, &config)?;
            search(&relaxation, config)?
        },
        Method::Bap => {
            builder
                .smoothing_factor(settings.smoothing_factor)
                .farkas_pricing(settings.farkas_pricing)
                .branching_on_master(settings.branching_on_master)
                .clean_up_threshold(settings.clean_up)
                .integer_master_heuristic(settings.with_heuristics);
            let config     = builder.build()?;
            let relaxation = ColumnGeneration::new(&model.formulation, &model.decomposition, &lp, &config)?;
            search(&relaxation, config)?
        },
    };
    let time = start.elapsed().as_secs_f64();
    info!(status = %outcome.status, reason = %outcome.reason, objective = outcome.objective, time, "done");

    let record = ResultRecord {
        instance           : args.instance.display().to_string(),
        method             : args.method.label().to_string(),
        with_heuristics    : settings.with_heuristics,
        smoothing_factor   : settings.smoothing_factor,
        farkas_pricing     : settings.farkas_pricing,
        clean_up           : settings.clean_up,
        branching_on_master: settings.branching_on_master,
        n_agents           : instance.n_agents(),
        n_jobs             : instance.n_jobs(),
        status             : outcome.status,
        reason             : outcome.reason,
        objective          : outcome.objective,
        time,
    };
    append_result(&args.output, &record)
        .with_context(|| format!("could not write to {}", args.output.display()))?;
    Ok(())
}
