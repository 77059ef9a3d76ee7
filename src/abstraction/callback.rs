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

//! This module defines the callbacks which are invoked once the relaxation of
//! a node has been solved (and before the node gets branched on).

use std::fmt::Debug;

use crate::{Constraint, Formulation, NodeId, Tolerances};

/// What a callback gets to see about the node which has just been solved.
#[derive(Debug, Clone, Copy)]
pub struct CallbackContext<'a> {
    /// The original formulation
    pub formulation: &'a Formulation,
    pub node       : NodeId,
    pub depth      : usize,
    /// The bounds of every original variable at this node
    pub bounds     : &'a [(f64, f64)],
    /// The relaxation solution of the node, in the original space
    pub solution   : &'a [f64],
    /// The relaxation bound of the node
    pub bound      : f64,
    /// The value of the incumbent (if there is any)
    pub incumbent  : Option<f64>,
    pub tolerances : Tolerances,
}

/// What a callback may propose
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackAction {
    /// A solution (one value per original variable) which is hopefully
    /// feasible. It is checked before being considered as an incumbent.
    Candidate(Vec<f64>),
    /// A constraint which is valid for every integer solution of the node's
    /// subtree. The relaxation of the node is solved again before branching.
    Cut(Constraint),
}

/// A heuristic or cutting plane procedure. Callbacks never mutate any global
/// state: all they can do is return actions.
pub trait Callback: Debug {
    /// A short name used in the logs
    fn name(&self) -> &str;
    fn on_node_solved(&self, context: &CallbackContext) -> Vec<CallbackAction>;
}
