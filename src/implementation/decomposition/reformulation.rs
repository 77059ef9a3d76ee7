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

//! This module provides the Dantzig-Wolfe reformulation of a formulation:
//! given a decomposition tag for each constraint, it splits the constraints
//! into one master partition and one subproblem per distinct subproblem tag.
//! Each variable belongs to the (unique) subproblem whose constraints mention
//! it, or is a linking variable which stays in the master.

use fxhash::FxHashMap;

use crate::{BoundChange, BranchingEnforcement, Column, Constraint, CtrId, Error, Formulation, LinExpr, Partition, VarId};

/// The decomposition tag of every constraint of a formulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decomposition {
    tags: FxHashMap<CtrId, Partition>,
}
impl Decomposition {
    pub fn new() -> Self {
        Self::default()
    }
    /// Tags all the constraints of `formulation` with the given function
    pub fn from_fn<F>(formulation: &Formulation, mut tag: F) -> Self
        where F: FnMut(CtrId, &Constraint) -> Partition
    {
        let tags = formulation.ctr_ids()
            .map(|c| (c, tag(c, formulation.ctr(c))))
            .collect();
        Decomposition { tags }
    }
    pub fn tag(&mut self, ctr: CtrId, partition: Partition) {
        self.tags.insert(ctr, partition);
    }
    pub fn with(mut self, ctr: CtrId, partition: Partition) -> Self {
        self.tag(ctr, partition);
        self
    }
    pub fn partition_of(&self, ctr: CtrId) -> Option<Partition> {
        self.tags.get(&ctr).copied()
    }
}

/// One pricing subproblem of the reformulation
#[derive(Debug, Clone)]
pub struct Subproblem {
    /// The decomposition tag which gave rise to this subproblem
    pub tag        : usize,
    /// The formulation of the subproblem. Its objective is empty: it gets set
    /// to the reduced costs each time the subproblem is priced.
    pub formulation: Formulation,
    /// The original variable standing behind each subproblem variable
    pub to_original: Vec<VarId>,
    /// The original constraints making up this subproblem
    pub constraints: Vec<CtrId>,
}

/// The Dantzig-Wolfe reformulation of some original formulation.
#[derive(Debug, Clone)]
pub struct Reformulation {
    original   : Formulation,
    /// The partition of every original constraint
    partition  : Vec<Partition>,
    master_ctrs: Vec<CtrId>,
    subproblems: Vec<Subproblem>,
    /// For each original variable, its subproblem and local id (if any)
    owner      : Vec<Option<(usize, VarId)>>,
    linking    : Vec<VarId>,
}

impl Reformulation {
    /// Builds the reformulation of `original`. It fails with an invariant
    /// violation when some constraint has no tag, or when a variable appears
    /// in the constraints of two different subproblems.
    pub fn new(original: &Formulation, decomposition: &Decomposition) -> Result<Self, Error> {
        if let Some(ctr) = decomposition.tags.keys().find(|c| c.0 >= original.nb_ctrs()) {
            return Err(Error::InvariantViolation(format!("tag on unknown constraint {}", ctr.0)));
        }
        let mut partition = Vec::with_capacity(original.nb_ctrs());
        for ctr in original.ctr_ids() {
            match decomposition.partition_of(ctr) {
                Some(p) => partition.push(p),
                None => return Err(Error::InvariantViolation(
                    format!("constraint {} ({}) has no decomposition tag", ctr.0, original.ctr(ctr).name))),
            }
        }

        let mut tags: Vec<usize> = partition.iter()
            .filter_map(|p| match p { Partition::Subproblem(t) => Some(*t), Partition::Master => None })
            .collect();
        tags.sort_unstable();
        tags.dedup();
        let index_of: FxHashMap<usize, usize> = tags.iter().enumerate().map(|(i, t)| (*t, i)).collect();

        // which subproblem owns which variable
        let mut owner_of: Vec<Option<usize>> = vec![None; original.nb_vars()];
        let mut constraints = vec![vec![]; tags.len()];
        for (ctr, p) in original.ctr_ids().zip(partition.iter()) {
            if let Partition::Subproblem(t) = p {
                let k = index_of[t];
                constraints[k].push(ctr);
                for (v, _) in original.ctr(ctr).expr.terms() {
                    match owner_of[v.0] {
                        Some(other) if other != k => return Err(Error::InvariantViolation(
                            format!("variable {} appears in subproblems {} and {}", original.var(*v).name, tags[other], tags[k]))),
                        _ => owner_of[v.0] = Some(k),
                    }
                }
            }
        }

        let mut owner = vec![None; original.nb_vars()];
        let mut linking = vec![];
        let mut subproblems: Vec<Subproblem> = tags.iter().zip(constraints)
            .map(|(tag, constraints)| Subproblem {
                tag: *tag,
                formulation: Formulation::new(format!("{}[{}]", original.name(), tag)),
                to_original: vec![],
                constraints,
            })
            .collect();
        for var in original.var_ids() {
            match owner_of[var.0] {
                None => linking.push(var),
                Some(k) => {
                    let sp = &mut subproblems[k];
                    let v  = original.var(var);
                    let local = sp.formulation.add_var(v.name.clone(), v.lb, v.ub, v.kind);
                    sp.to_original.push(var);
                    owner[var.0] = Some((k, local));
                }
            }
        }
        for sp in subproblems.iter_mut() {
            for ctr in sp.constraints.iter() {
                let c = original.ctr(*ctr);
                let expr = c.expr.map_vars(|v| owner[v.0].map(|(_, local)| local));
                sp.formulation.add_ctr(Constraint::new(c.name.clone(), expr, c.sense, c.rhs))?;
            }
        }

        let master_ctrs = original.ctr_ids().filter(|c| partition[c.0] == Partition::Master).collect();
        Ok(Reformulation { original: original.clone(), partition, master_ctrs, subproblems, owner, linking })
    }

    pub fn original(&self) -> &Formulation {
        &self.original
    }
    pub fn partition(&self) -> &[Partition] {
        &self.partition
    }
    pub fn master_ctrs(&self) -> &[CtrId] {
        &self.master_ctrs
    }
    pub fn subproblems(&self) -> &[Subproblem] {
        &self.subproblems
    }
    pub fn nb_subproblems(&self) -> usize {
        self.subproblems.len()
    }
    /// The subproblem index and local id of an original variable, if it is
    /// not a linking variable
    pub fn owner(&self, var: VarId) -> Option<(usize, VarId)> {
        self.owner[var.0]
    }
    pub fn linking_vars(&self) -> &[VarId] {
        &self.linking
    }

    /// Returns the version of this reformulation which applies to a node
    /// characterized by the given bound changes and cuts.
    pub fn localize(&self, changes: &[BoundChange], cuts: &[Constraint], enforcement: &dyn BranchingEnforcement) -> Result<LocalReformulation, Error> {
        let mut local = LocalReformulation {
            bounds     : self.original.vars().iter().map(|v| (v.lb, v.ub)).collect(),
            subproblems: self.subproblems.iter().map(|s| s.formulation.clone()).collect(),
            rows       : self.master_ctrs.iter().map(|c| self.original.ctr(*c).clone()).collect(),
            owner      : self.owner.clone(),
            nb_static  : self.master_ctrs.len(),
        };
        local.rows.extend(cuts.iter().cloned());
        for change in changes {
            if change.var.0 >= self.original.nb_vars() {
                return Err(Error::Model(format!("bound change on unknown variable {}", change.var.0)));
            }
            local.bounds[change.var.0] = change.tighten(local.bounds[change.var.0]);
            enforcement.enforce(change, &mut local)?;
        }
        Ok(local)
    }
}

/// The reformulation as it applies to one node of the branch-and-bound tree.
#[derive(Debug, Clone)]
pub struct LocalReformulation {
    /// The bounds of every original variable at the node. The master uses
    /// them for the linking variables.
    pub bounds     : Vec<(f64, f64)>,
    /// The local copy of each subproblem
    pub subproblems: Vec<Formulation>,
    /// The rows of the master expressed on the original variables: first the
    /// master constraints of the original formulation, then the cuts and the
    /// rows added by branching.
    pub rows       : Vec<Constraint>,
    owner          : Vec<Option<(usize, VarId)>>,
    nb_static      : usize,
}
impl LocalReformulation {
    /// The subproblem index and local id of an original variable
    pub fn owner(&self, var: VarId) -> Option<(usize, VarId)> {
        self.owner[var.0]
    }
    /// The number of leading rows which are original master constraints
    pub fn nb_static_rows(&self) -> usize {
        self.nb_static
    }
    /// Adds a row `var <= ub` or `var >= lb` to the master
    pub fn add_bound_row(&mut self, change: &BoundChange) {
        let name = format!("branch({})", change);
        let expr = LinExpr::from_term(change.var, 1.0);
        if change.ub.is_finite() {
            self.rows.push(Constraint::le(name.clone(), expr.clone(), change.ub));
        }
        if change.lb.is_finite() {
            self.rows.push(Constraint::ge(name, expr, change.lb));
        }
    }
    /// Tightens the bounds of an original variable in the subproblem owning it
    pub fn tighten_subproblem(&mut self, change: &BoundChange) {
        if let Some((k, local)) = self.owner(change.var) {
            let v = self.subproblems[k].var(local);
            let (lb, ub) = change.tighten((v.lb, v.ub));
            self.subproblems[k].set_bounds(local, lb, ub);
        }
    }
    /// Returns true iff the given column is consistent with the bounds of the
    /// local copy of its subproblem: a point must lie within the bounds, a
    /// ray may only move along the directions in which they are infinite.
    pub fn admits(&self, column: &Column, tolerance: f64) -> bool {
        let vars = self.subproblems[column.subproblem].vars().iter();
        if column.ray {
            vars.zip(column.values.iter())
                .all(|(v, d)| (*d <= tolerance || v.ub == f64::INFINITY) && (*d >= -tolerance || v.lb == f64::NEG_INFINITY))
        } else {
            vars.zip(column.values.iter())
                .all(|(v, x)| *x >= v.lb - tolerance && *x <= v.ub + tolerance)
        }
    }
}
