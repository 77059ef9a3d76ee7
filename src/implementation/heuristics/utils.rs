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

//! This module provides some utilities to use a node ranking in a generic
//! data structure expecting a `Compare`.

use std::cmp::Ordering;

use compare::Compare;

use crate::{NodeRanking, OpenNode};

/// This is a thin wrapper to convert a `NodeRanking` into a `Compare` object
/// as is sometimes required (e.g. to configure the order in a binary heap).
#[derive(Debug, Clone, Copy)]
pub struct CompareNode<X: NodeRanking>(X);
impl <X: NodeRanking> CompareNode<X> {
    /// Creates a new instance
    pub fn new(x: X) -> Self {
        Self(x)
    }
}
impl <X: NodeRanking> Compare<OpenNode> for CompareNode<X> {
    fn compare(&self, l: &OpenNode, r: &OpenNode) -> Ordering {
        self.0.compare(l, r)
    }
}
