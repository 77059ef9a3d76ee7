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

//! This module defines the abstractions related to branching: the rule which
//! picks the variable to branch on, and the way a branching decision is
//! enforced in a decomposed formulation.

use crate::{BoundChange, Error, Formulation, LocalReformulation, VarId};

/// Everything a branching rule may look at to take its decision.
#[derive(Debug, Clone, Copy)]
pub struct BranchingContext<'a> {
    /// The original (compact) formulation
    pub formulation: &'a Formulation,
    /// The relaxation solution of the node, expressed in the original space
    pub solution   : &'a [f64],
    /// The variables which are eligible for branching
    pub candidates : &'a [VarId],
    /// The bounds of every original variable at the node
    pub bounds     : &'a [(f64, f64)],
    /// A value within this distance of an integer is considered integral
    pub tolerance  : f64,
}

/// The decision to split the domain of `var` around its fractional `value`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branching {
    pub var  : VarId,
    pub value: f64,
}
impl Branching {
    /// The bound changes of the two children: `var <= floor(value)` and then
    /// `var >= ceil(value)`.
    pub fn children(&self) -> [BoundChange; 2] {
        [
            BoundChange::upper(self.var, self.value.floor()),
            BoundChange::lower(self.var, self.value.ceil()),
        ]
    }
}

/// A branching rule selects the variable on which to branch given the
/// (fractional) relaxation solution of a node. It returns `None` when no
/// eligible candidate has a fractional value.
pub trait BranchingRule {
    fn select(&self, context: &BranchingContext) -> Option<Branching>;
}

/// This trait encapsulates the way a bound change on an original variable is
/// enforced in the reformulation of a node. Whatever the policy, the feasible
/// region of a child must be a subset of the one of its parent.
pub trait BranchingEnforcement {
    fn enforce(&self, change: &BoundChange, local: &mut LocalReformulation) -> Result<(), Error>;
}
