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

use std::{path::PathBuf, time::{Duration, Instant}};

use bnp::*;
use rand::{rngs::StdRng, SeedableRng};

fn locate(id: &str) -> PathBuf {
    PathBuf::new()
        .join(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/gap/")
        .join(id)
}

fn model(id: &str) -> GapModel {
    let instance = read_instance(locate(id)).expect("could not read instance");
    GapModel::new(&instance).expect("could not build the model")
}

fn base() -> ConfigBuilder {
    let mut builder = ConfigBuilder::default();
    builder.threads(1);
    builder
}

/// Solves the instance by branch-and-price and checks the pools on the way
fn bap(model: &GapModel, config: Config) -> (Completion, Vec<NodeSummary>) {
    let lp         = HighsSolver::default();
    let relaxation = ColumnGeneration::new(&model.formulation, &model.decomposition, &lp, &config).unwrap();
    let mut solver = DefaultSolver::new(&relaxation, config).unwrap();
    let completion = solver.minimize().unwrap();
    relaxation.verify_pools().unwrap();
    if let Some(solution) = solver.best_solution() {
        assert!(model.formulation.is_feasible(&solution, 1e-6));
        assert!(model.formulation.is_integral(&solution, 1e-6));
    }
    (completion, solver.nodes())
}

fn bab(model: &GapModel, config: Config) -> (Completion, Vec<NodeSummary>) {
    let lp         = HighsSolver::default();
    let relaxation = DirectRelaxation::new(&model.formulation, &lp, &config).unwrap();
    let mut solver = DefaultSolver::new(&relaxation, config).unwrap();
    let completion = solver.minimize().unwrap();
    (completion, solver.nodes())
}

fn assert_optimal(completion: &Completion, expected: f64) {
    assert_eq!(SolutionStatus::Optimal, completion.status);
    assert_eq!(Reason::Exhausted, completion.reason);
    let value = completion.best_value.expect("no solution");
    assert!((value - expected).abs() < 1e-6, "expected {} got {}", expected, value);
}

fn assert_monotonic(nodes: &[NodeSummary]) {
    for node in nodes {
        if let Some(parent) = node.parent {
            let parent = &nodes[parent.id()];
            assert!(node.bound >= parent.bound - 1e-6,
                "node {} has bound {} below its parent bound {}", node.id.id(), node.bound, parent.bound);
        }
    }
}

const INSTANCES: [(&str, f64); 4] = [
    ("gap_2_6.txt", 185.0),
    ("gap_2_8.txt", 187.0),
    ("gap_3_6.txt", 160.0),
    ("gap_3_8.txt", 179.0),
];

#[test]
fn branch_and_price_finds_the_optimum() {
    for (id, optimum) in INSTANCES {
        let (completion, nodes) = bap(&model(id), base().build().unwrap());
        assert_optimal(&completion, optimum);
        assert_monotonic(&nodes);
    }
}

#[test]
fn branch_and_bound_finds_the_optimum() {
    for (id, optimum) in INSTANCES {
        let (completion, nodes) = bab(&model(id), base().build().unwrap());
        assert_optimal(&completion, optimum);
        assert_monotonic(&nodes);
    }
}

#[test]
fn branch_and_bound_with_rounding() {
    for (id, optimum) in INSTANCES {
        let config = base()
            .callbacks(vec![std::sync::Arc::new(RoundingHeuristic::new())])
            .build().unwrap();
        let (completion, _) = bab(&model(id), config);
        assert_optimal(&completion, optimum);
    }
}

#[test]
fn external_solve_finds_the_optimum() {
    for (id, optimum) in INSTANCES {
        let model  = model(id);
        let result = HighsSolver::default().solve(&model.formulation, RequestKind::Integer, None);
        assert_eq!(RelaxationStatus::Optimal, result.status);
        assert!((result.objective.unwrap() - optimum).abs() < 1e-6);
    }
}

#[test]
fn farkas_pricing_and_artificial_costs_agree() {
    for (id, optimum) in INSTANCES {
        let model = model(id);
        let (farkas, _)     = bap(&model, base().farkas_pricing(true).build().unwrap());
        let (artificial, _) = bap(&model, base().farkas_pricing(false).build().unwrap());
        assert_optimal(&farkas, optimum);
        assert_eq!(farkas.best_value, artificial.best_value);
    }
}

#[test]
fn smoothing_never_changes_the_optimum() {
    let model = model("gap_3_6.txt");
    for alpha in [0.0, 0.3, 0.8] {
        let (completion, nodes) = bap(&model, base().smoothing_factor(alpha).build().unwrap());
        assert_optimal(&completion, 160.0);
        assert_monotonic(&nodes);
    }
}

#[test]
fn smoothing_never_changes_the_root_bound() {
    let model = model("gap_2_8.txt");
    let root_bound = |alpha: f64| {
        let config = base().smoothing_factor(alpha).node_limit(1).build().unwrap();
        let (_, nodes) = bap(&model, config);
        nodes[0].bound
    };
    let reference = root_bound(0.0);
    assert!(reference <= 187.0 + 1e-6);
    for alpha in [0.3, 0.8] {
        assert!((root_bound(alpha) - reference).abs() < 1e-6);
    }
}

#[test]
fn branching_in_master_and_in_pricing_both_converge() {
    for (id, optimum) in INSTANCES {
        let model = model(id);
        for farkas in [false, true] {
            let config = base().branching_on_master(true).farkas_pricing(farkas).build().unwrap();
            let (completion, nodes) = bap(&model, config);
            assert_optimal(&completion, optimum);
            assert_monotonic(&nodes);
        }
    }
}

#[test]
fn pool_clean_up_and_integer_master_keep_the_optimum() {
    for (id, optimum) in INSTANCES {
        let config = base()
            .clean_up_threshold(10)
            .integer_master_heuristic(true)
            .smoothing_factor(0.3)
            .build().unwrap();
        let (completion, _) = bap(&model(id), config);
        assert_optimal(&completion, optimum);
    }
}

#[test]
fn concurrent_pricing_and_tree_search() {
    for (id, optimum) in INSTANCES {
        let config = ConfigBuilder::default()
            .threads(4)
            .max_parallel_subproblems(3)
            .build().unwrap();
        let (completion, nodes) = bap(&model(id), config);
        assert_optimal(&completion, optimum);
        assert_monotonic(&nodes);
    }
}

#[test]
fn solves_are_deterministic() {
    let model = model("gap_3_8.txt");
    let config = base().smoothing_factor(0.3).build().unwrap();
    let (first, first_nodes)   = bap(&model, config.clone());
    let (second, second_nodes) = bap(&model, config);
    assert_eq!(first, second);
    assert_eq!(first_nodes.len(), second_nodes.len());
}

#[test]
fn several_threads_are_deterministic() {
    for id in ["gap_3_8.txt", "gap_2_8.txt"] {
        let model = model(id);
        for farkas in [false, true] {
            let config = ConfigBuilder::default().threads(4).farkas_pricing(farkas).build().unwrap();
            let (first, first_nodes) = bap(&model, config.clone());
            for _ in 0..4 {
                let (again, nodes) = bap(&model, config.clone());
                assert_eq!(first, again);
                assert_eq!(first_nodes, nodes, "{} farkas = {}", id, farkas);
            }
        }
    }
}

#[test]
fn sequential_and_single_threaded_solvers_agree() {
    let model  = model("gap_2_8.txt");
    let config = base().build().unwrap();
    let lp     = HighsSolver::default();

    let relaxation = ColumnGeneration::new(&model.formulation, &model.decomposition, &lp, &config).unwrap();
    let mut sequential = SequentialSolver::new(&relaxation, config.clone()).unwrap();
    let expected = sequential.minimize().unwrap();

    let relaxation = ColumnGeneration::new(&model.formulation, &model.decomposition, &lp, &config).unwrap();
    let mut parallel = ParallelSolver::new(&relaxation, config).unwrap();
    assert_eq!(expected, parallel.minimize().unwrap());
    assert_eq!(sequential.explored(), parallel.explored());
}

#[test]
fn infeasible_instance_is_reported() {
    let model = model("gap_infeasible.txt");
    let (completion, _) = bab(&model, base().build().unwrap());
    assert_eq!(SolutionStatus::Infeasible, completion.status);
    for farkas in [false, true] {
        let (completion, _) = bap(&model, base().farkas_pricing(farkas).build().unwrap());
        assert_eq!(SolutionStatus::Infeasible, completion.status);
        assert_eq!(Reason::Exhausted, completion.reason);
        assert_eq!(None, completion.best_value);
    }
}

#[test]
fn time_limit_is_honored() {
    // far too large to be solved within the limit
    let instance = generate_chu_beasley_c(10, 60, &mut StdRng::seed_from_u64(2023)).unwrap();
    let model    = GapModel::new(&instance).unwrap();
    let limit    = Duration::from_secs(1);
    for threads in [1, 4] {
        let config = base().threads(threads).time_limit(limit).build().unwrap();
        let start  = Instant::now();
        let (completion, nodes) = bap(&model, config);
        let elapsed = start.elapsed();
        assert_eq!(Reason::TimeLimit, completion.reason);
        assert_ne!(SolutionStatus::Optimal, completion.status);
        assert!(elapsed <= limit + Duration::from_millis(1500), "threads = {} elapsed = {:?}", threads, elapsed);
        assert!(nodes.iter().any(|n| n.status == NodeStatus::Interrupted));
    }
}

#[test]
fn decomposition_covers_every_constraint_once() {
    let model = model("gap_3_8.txt");
    let reformulation = Reformulation::new(&model.formulation, &model.decomposition).unwrap();
    let mut seen = vec![0; model.formulation.nb_ctrs()];
    for c in reformulation.master_ctrs() {
        seen[c.id()] += 1;
    }
    for sp in reformulation.subproblems() {
        for c in sp.constraints.iter() {
            seen[c.id()] += 1;
        }
    }
    assert!(seen.iter().all(|n| *n == 1));
}

#[test]
fn untagged_constraint_is_an_invariant_violation() {
    let model = model("gap_2_6.txt");
    let mut decomposition = Decomposition::new();
    for c in model.knapsack_ctrs() {
        decomposition.tag(*c, Partition::Subproblem(c.id()));
    }
    let lp = HighsSolver::default();
    let config = base().build().unwrap();
    let result = ColumnGeneration::new(&model.formulation, &decomposition, &lp, &config);
    assert!(matches!(result, Err(Error::InvariantViolation(_))));
}

/// Two agents, four jobs which may also be outsourced. The outsourcing
/// variables only appear in the master (they are linking variables).
/// The optimum (23) outsources job 0 and assigns jobs 1 and 3 to the second
/// agent and job 2 to the first one.
fn outsourcing() -> (Formulation, Decomposition) {
    let cost     = [[4.0, 6.0, 5.0, 7.0], [6.0, 4.0, 7.0, 5.0]];
    let weight   = [[3.0, 4.0, 3.0, 5.0], [4.0, 3.0, 5.0, 3.0]];
    let capacity = [5.0, 6.0];
    let outsource= [9.0, 10.0, 11.0, 8.0];

    let mut f = Formulation::new("outsourcing");
    let x: Vec<Vec<VarId>> = (0..2)
        .map(|i| (0..4).map(|j| f.add_var(format!("x_{}_{}", i, j), 0.0, 1.0, VarKind::Binary)).collect())
        .collect();
    let y: Vec<VarId> = (0..4).map(|j| f.add_var(format!("y_{}", j), 0.0, 1.0, VarKind::Binary)).collect();

    let mut objective = LinExpr::new();
    for i in 0..2 {
        for j in 0..4 {
            objective.add_term(x[i][j], cost[i][j]);
        }
    }
    for j in 0..4 {
        objective.add_term(y[j], outsource[j]);
    }
    f.set_objective(objective).unwrap();

    let mut decomposition = Decomposition::new();
    for i in 0..2 {
        let expr = (0..4).fold(LinExpr::new(), |e, j| e.term(x[i][j], weight[i][j]));
        let ctr  = f.add_ctr(Constraint::le(format!("capacity_{}", i), expr, capacity[i])).unwrap();
        decomposition.tag(ctr, Partition::Subproblem(i));
    }
    for j in 0..4 {
        let expr = LinExpr::new().term(x[0][j], 1.0).term(x[1][j], 1.0).term(y[j], 1.0);
        let ctr  = f.add_ctr(Constraint::eq(format!("assignment_{}", j), expr, 1.0)).unwrap();
        decomposition.tag(ctr, Partition::Master);
    }
    (f, decomposition)
}

#[test]
fn linking_variables_converge_to_the_optimum() {
    let (f, decomposition) = outsourcing();
    let lp = HighsSolver::default();
    for (farkas, on_master) in [(false, false), (true, false), (false, true), (true, true)] {
        let config = base().farkas_pricing(farkas).branching_on_master(on_master).build().unwrap();
        let relaxation = ColumnGeneration::new(&f, &decomposition, &lp, &config).unwrap();
        assert_eq!(4, relaxation.reformulation().linking_vars().len());

        let mut solver = DefaultSolver::new(&relaxation, config).unwrap();
        let completion = solver.minimize().unwrap();
        assert_optimal(&completion, 23.0);

        let solution = solver.best_solution().unwrap();
        assert!((solution[8] - 1.0).abs() < 1e-6);
        assert!(solution[9..].iter().all(|v| v.abs() < 1e-6));
        assert_monotonic(&solver.nodes());
    }
}
