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

//! This module solves the pricing problems of one column generation
//! iteration. The subproblems are independent from one another, which is why
//! up to `max_parallel` of them are solved at the same time.

use std::time::Instant;

use crate::{Error, Formulation, LinExpr, Reformulation, RelaxationSolver, RelaxationStatus, RequestKind, VarId};

/// The outcome of one pricing problem
#[derive(Debug, Clone, PartialEq)]
pub struct Priced {
    /// The index of the subproblem
    pub subproblem  : usize,
    pub status      : RelaxationStatus,
    /// The reduced cost of the best column of the subproblem (objective of
    /// the pricing problem minus the dual of the convexity row). For a ray,
    /// the slope of the pricing objective along the ray.
    pub reduced_cost: f64,
    /// The best solution of the subproblem, or an improving ray when the
    /// subproblem is unbounded (local variable space)
    pub values      : Vec<f64>,
    pub ray         : bool,
}

/// Sets the objective of every local subproblem to the pricing costs given
/// on the original variables.
pub fn set_pricing_objectives(reformulation: &Reformulation, subproblems: &mut [Formulation], costs: &[f64]) -> Result<(), Error> {
    for (sp, formulation) in reformulation.subproblems().iter().zip(subproblems.iter_mut()) {
        let objective = sp.to_original.iter().enumerate()
            .filter(|(_, v)| costs[v.0] != 0.0)
            .fold(LinExpr::new(), |expr, (i, v)| expr.term(VarId(i), costs[v.0]));
        formulation.set_objective(objective)?;
    }
    Ok(())
}

/// Solves every pricing problem. `convexity` holds the dual of the
/// convexity row of each subproblem. The results are ordered by subproblem.
pub fn price_all(
    subproblems : &[Formulation],
    convexity   : &[f64],
    solver      : &(dyn RelaxationSolver + Send + Sync),
    deadline    : Option<Instant>,
    max_parallel: usize,
) -> Vec<Priced>
{
    let width = max_parallel.max(1);
    let mut results = Vec::with_capacity(subproblems.len());
    for (c, chunk) in subproblems.chunks(width).enumerate() {
        let base = c * width;
        if chunk.len() == 1 {
            results.push(price_one(base, &chunk[0], convexity[base], solver, deadline));
            continue;
        }
        std::thread::scope(|s| {
            let handles: Vec<_> = chunk.iter().enumerate()
                .map(|(i, sp)| {
                    let k  = base + i;
                    let mu = convexity[k];
                    (k, s.spawn(move || price_one(k, sp, mu, solver, deadline)))
                })
                .collect();
            for (k, handle) in handles {
                match handle.join() {
                    Ok(priced) => results.push(priced),
                    Err(_)     => results.push(Priced {
                        subproblem  : k,
                        status      : RelaxationStatus::Error,
                        reduced_cost: f64::INFINITY,
                        values      : vec![],
                        ray         : false,
                    }),
                }
            }
        });
    }
    results
}

fn price_one(k: usize, subproblem: &Formulation, mu: f64, solver: &dyn RelaxationSolver, deadline: Option<Instant>) -> Priced {
    let res = solver.solve(subproblem, RequestKind::Integer, deadline);
    if let (RelaxationStatus::Unbounded, Some(d)) = (res.status, res.ray.as_ref()) {
        let slope: f64 = subproblem.objective().terms().iter().map(|(v, c)| c * d[v.0]).sum();
        return Priced { subproblem: k, status: res.status, reduced_cost: slope, values: d.clone(), ray: true };
    }
    let reduced_cost = res.objective.map(|z| z - mu).unwrap_or(f64::INFINITY);
    Priced { subproblem: k, status: res.status, reduced_cost, values: res.primal, ray: false }
}

#[cfg(test)]
mod test_pricing {
    use crate::*;
    use crate::implementation::colgen::pricing::*;

    fn knapsacks() -> (Formulation, Reformulation) {
        let mut f = Formulation::new("pricing");
        let x: Vec<VarId> = (0..4).map(|i| f.add_var(format!("x{}", i), 0.0, 1.0, VarKind::Binary)).collect();
        let k0 = f.add_ctr(Constraint::le("k0", LinExpr::new().term(x[0], 1.0).term(x[1], 1.0), 1.0)).unwrap();
        let k1 = f.add_ctr(Constraint::le("k1", LinExpr::new().term(x[2], 1.0).term(x[3], 1.0), 1.0)).unwrap();
        let m  = f.add_ctr(Constraint::ge("m", LinExpr::new().term(x[0], 1.0).term(x[2], 1.0), 1.0)).unwrap();
        f.set_objective(LinExpr::new().term(x[0], 3.0).term(x[1], 1.0).term(x[2], 2.0).term(x[3], 5.0)).unwrap();
        let d = Decomposition::new()
            .with(k0, Partition::Subproblem(0))
            .with(k1, Partition::Subproblem(1))
            .with(m,  Partition::Master);
        let r = Reformulation::new(&f, &d).unwrap();
        (f, r)
    }

    #[test]
    fn pricing_objectives_are_expressed_on_the_local_variables() {
        let (_, r) = knapsacks();
        let mut sps: Vec<Formulation> = r.subproblems().iter().map(|s| s.formulation.clone()).collect();
        set_pricing_objectives(&r, &mut sps, &[-1.0, 0.0, 2.0, 4.0]).unwrap();
        assert_eq!(-1.0, sps[0].objective().coef(VarId(0)));
        assert_eq!( 0.0, sps[0].objective().coef(VarId(1)));
        assert_eq!( 2.0, sps[1].objective().coef(VarId(0)));
        assert_eq!( 4.0, sps[1].objective().coef(VarId(1)));
    }

    #[test]
    fn reduced_cost_subtracts_the_convexity_dual() {
        let (_, r) = knapsacks();
        let mut sps: Vec<Formulation> = r.subproblems().iter().map(|s| s.formulation.clone()).collect();
        set_pricing_objectives(&r, &mut sps, &[-1.0, 0.0, 2.0, 4.0]).unwrap();
        let solver = HighsSolver::default();
        let priced = price_all(&sps, &[0.5, -1.0], &solver, None, 1);
        assert_eq!(2, priced.len());
        assert_eq!(RelaxationStatus::Optimal, priced[0].status);
        assert!((priced[0].reduced_cost - (-1.5)).abs() < 1e-9);
        assert!((priced[0].values[0] - 1.0).abs() < 1e-9);
        assert!((priced[1].reduced_cost - 1.0).abs() < 1e-9);
    }

    #[test]
    fn parallel_pricing_yields_the_same_results_in_the_same_order() {
        let (_, r) = knapsacks();
        let mut sps: Vec<Formulation> = r.subproblems().iter().map(|s| s.formulation.clone()).collect();
        set_pricing_objectives(&r, &mut sps, &[-1.0, -2.0, -3.0, 4.0]).unwrap();
        let solver = HighsSolver::default();
        let sequential = price_all(&sps, &[0.0, 0.0], &solver, None, 1);
        let parallel   = price_all(&sps, &[0.0, 0.0], &solver, None, 4);
        assert_eq!(sequential, parallel);
        assert_eq!(0, parallel[0].subproblem);
        assert_eq!(1, parallel[1].subproblem);
    }

    #[test]
    fn infeasible_subproblem_is_reported() {
        let (_, r) = knapsacks();
        let mut sps: Vec<Formulation> = r.subproblems().iter().map(|s| s.formulation.clone()).collect();
        sps[1].set_bounds(VarId(0), 1.0, 1.0);
        sps[1].set_bounds(VarId(1), 1.0, 1.0);
        let solver = HighsSolver::default();
        let priced = price_all(&sps, &[0.0, 0.0], &solver, None, 2);
        assert_eq!(RelaxationStatus::Infeasible, priced[1].status);
        assert_eq!(f64::INFINITY, priced[1].reduced_cost);
    }

    #[test]
    fn an_unbounded_subproblem_yields_a_ray() {
        let mut f = Formulation::new("cone");
        let x = f.add_var("x", 0.0, f64::INFINITY, VarKind::Continuous);
        let y = f.add_var("y", 0.0, f64::INFINITY, VarKind::Continuous);
        let k = f.add_ctr(Constraint::le("k", LinExpr::new().term(x, 1.0).term(y, -1.0), 0.0)).unwrap();
        let m = f.add_ctr(Constraint::le("m", LinExpr::new().term(x, 1.0), 3.0)).unwrap();
        f.set_objective(LinExpr::new().term(x, -1.0).term(y, 0.5)).unwrap();
        let d = Decomposition::new()
            .with(k, Partition::Subproblem(0))
            .with(m, Partition::Master);
        let r = Reformulation::new(&f, &d).unwrap();

        let mut sps: Vec<Formulation> = r.subproblems().iter().map(|s| s.formulation.clone()).collect();
        set_pricing_objectives(&r, &mut sps, &[-1.0, 0.5]).unwrap();
        let priced = price_all(&sps, &[10.0], &HighsSolver::default(), None, 1);
        assert_eq!(RelaxationStatus::Unbounded, priced[0].status);
        assert!(priced[0].ray);
        // the convexity dual plays no part in the slope of a ray
        let d = &priced[0].values;
        assert!((priced[0].reduced_cost - (-d[0] + 0.5 * d[1])).abs() < 1e-9);
        assert!(priced[0].reduced_cost < -1e-9);
    }
}
