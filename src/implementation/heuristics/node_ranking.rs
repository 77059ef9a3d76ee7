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

//! This module provides the node rankings that are used to set the ordering
//! of the solver fringe. In both of them, the ties are broken by the id of
//! the nodes (the oldest node goes first) so that the exploration order is
//! deterministic.

use std::cmp::Ordering;

use crate::{NodeRanking, OpenNode};

/// Selects the open node with the lowest bound first. This is the rule that
/// makes the global bound of the search monotonically improve.
///
/// # Example
/// ```
/// # use bnp::*;
/// let a = OpenNode { id: NodeId(0), bound: 10.0, depth: 1 };
/// let b = OpenNode { id: NodeId(1), bound:  5.0, depth: 3 };
/// let c = OpenNode { id: NodeId(2), bound:  5.0, depth: 2 };
///
/// let mut fringe = SimpleFringe::new(BestBoundRanking);
/// fringe.push(a);
/// fringe.push(b);
/// fringe.push(c);
///
/// assert_eq!(NodeId(1), fringe.pop().unwrap().id); // lowest bound, oldest
/// assert_eq!(NodeId(2), fringe.pop().unwrap().id);
/// assert_eq!(NodeId(0), fringe.pop().unwrap().id);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct BestBoundRanking;
impl NodeRanking for BestBoundRanking {
    fn compare(&self, a: &OpenNode, b: &OpenNode) -> Ordering {
        b.bound.total_cmp(&a.bound)
            .then_with(|| b.id.cmp(&a.id))
    }
}

/// Selects the deepest open node first (lowest bound among the deepest ones).
/// It finds feasible solutions early at the expense of a weaker global bound.
#[derive(Debug, Default, Clone, Copy)]
pub struct DepthFirstRanking;
impl NodeRanking for DepthFirstRanking {
    fn compare(&self, a: &OpenNode, b: &OpenNode) -> Ordering {
        a.depth.cmp(&b.depth)
            .then_with(|| b.bound.total_cmp(&a.bound))
            .then_with(|| b.id.cmp(&a.id))
    }
}
