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

//! This module defines the abstraction of a dual stabilization scheme.

/// A dual stabilization transforms the sequence of dual vectors produced by
/// the restricted master into the sequence of prices which are fed to the
/// pricing subproblems. It holds a state which lives for the duration of one
/// column generation run.
pub trait DualStabilization {
    /// Forgets everything about the previous iterations
    fn reset(&mut self);
    /// Returns the prices to use for pricing given the raw duals of the
    /// restricted master at the current iteration.
    fn stabilize(&mut self, raw: &[f64]) -> Vec<f64>;
    /// Returns true iff the prices returned by `stabilize` may differ from
    /// the raw duals. When that is the case, a pricing round which fails to
    /// find an improving column must be confirmed with the raw duals.
    fn is_active(&self) -> bool;
}
