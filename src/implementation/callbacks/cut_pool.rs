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

//! A cutting plane callback returning the known valid inequalities which are
//! violated by the node solution.

use crate::{Callback, CallbackAction, CallbackContext, Constraint};

#[derive(Debug, Default, Clone)]
pub struct CutPool {
    cuts: Vec<Constraint>,
}
impl CutPool {
    pub fn new(cuts: Vec<Constraint>) -> Self {
        CutPool { cuts }
    }
    pub fn add(&mut self, cut: Constraint) {
        self.cuts.push(cut);
    }
    pub fn len(&self) -> usize {
        self.cuts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }
}

impl Callback for CutPool {
    fn name(&self) -> &str {
        "cut pool"
    }

    fn on_node_solved(&self, context: &CallbackContext) -> Vec<CallbackAction> {
        self.cuts.iter()
            .filter(|c| c.violation(context.solution) > context.tolerances.feasibility)
            .cloned()
            .map(CallbackAction::Cut)
            .collect()
    }
}

#[cfg(test)]
mod test_cut_pool {
    use crate::*;

    #[test]
    fn only_violated_cuts_are_returned() {
        let mut f = Formulation::new("cuts");
        let x = f.add_var("x", 0.0, 1.0, VarKind::Binary);
        let y = f.add_var("y", 0.0, 1.0, VarKind::Binary);
        let a = Constraint::le("a", LinExpr::new().term(x, 1.0).term(y, 1.0), 1.0);
        let b = Constraint::ge("b", LinExpr::new().term(x, 1.0), 0.25);
        let pool = CutPool::new(vec![a.clone(), b]);
        assert_eq!(2, pool.len());

        let bounds   = [(0.0, 1.0), (0.0, 1.0)];
        let solution = [0.5, 0.75];
        let context  = CallbackContext {
            formulation: &f,
            node       : NodeId(3),
            depth      : 2,
            bounds     : &bounds,
            solution   : &solution,
            bound      : 0.0,
            incumbent  : Some(1.0),
            tolerances : Tolerances::default(),
        };
        assert_eq!(vec![CallbackAction::Cut(a)], pool.on_node_solved(&context));
    }
    #[test]
    fn empty_pool_returns_nothing() {
        let f = Formulation::new("empty");
        let context = CallbackContext {
            formulation: &f,
            node       : NodeId(0),
            depth      : 0,
            bounds     : &[],
            solution   : &[],
            bound      : 0.0,
            incumbent  : None,
            tolerances : Tolerances::default(),
        };
        assert!(CutPool::default().on_node_solved(&context).is_empty());
        assert!(CutPool::default().is_empty());
    }
}
