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

//! This module provides the two ways of enforcing a branching decision in a
//! decomposed formulation.
//!
//! Whatever the policy, the bounds of the linking variables are enforced
//! directly in the master (the local reformulation takes care of that).

use crate::{BoundChange, BranchingEnforcement, Error, LocalReformulation};

/// Enforces the bound change with an additional master row expressed on the
/// original variable. The dual of that row flows into the pricing problems.
/// The columns and the subproblems are left untouched: the master row alone
/// makes the columns which are inconsistent with the decision useless.
#[derive(Debug, Default, Clone, Copy)]
pub struct OnMaster;
impl BranchingEnforcement for OnMaster {
    fn enforce(&self, change: &BoundChange, local: &mut LocalReformulation) -> Result<(), Error> {
        if local.owner(change.var).is_some() {
            local.add_bound_row(change);
        }
        Ok(())
    }
}

/// Enforces the bound change in the local copy of the subproblem owning the
/// variable. Pricing can then only produce consistent columns, and the
/// existing columns which violate the new bound are disabled at the node.
#[derive(Debug, Default, Clone, Copy)]
pub struct OnPricing;
impl BranchingEnforcement for OnPricing {
    fn enforce(&self, change: &BoundChange, local: &mut LocalReformulation) -> Result<(), Error> {
        local.tighten_subproblem(change);
        Ok(())
    }
}
