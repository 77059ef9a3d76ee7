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

//! This module defines the linear expressions manipulated by formulations.

use crate::VarId;

/// A linear expression `sum_i coef_i * var_i + constant`. A variable appears
/// at most once in the terms of an expression; the terms are kept in their
/// insertion order so that anything derived from an expression is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinExpr {
    pub fn new() -> Self {
        Self::default()
    }
    /// Creates the expression `coef * var`
    pub fn from_term(var: VarId, coef: f64) -> Self {
        let mut e = Self::new();
        e.add_term(var, coef);
        e
    }
    /// Builder-style variant of `add_term`
    pub fn term(mut self, var: VarId, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }
    /// Builder-style variant of `add_constant`
    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant += constant;
        self
    }
    /// Adds `coef * var` to this expression (merging it with any existing
    /// term on the same variable)
    pub fn add_term(&mut self, var: VarId, coef: f64) {
        if let Some(t) = self.terms.iter_mut().find(|(v, _)| *v == var) {
            t.1 += coef;
        } else {
            self.terms.push((var, coef));
        }
    }
    /// Appends a term on a variable which is known not to be part of the
    /// expression yet (e.g. a freshly created column).
    pub(crate) fn push_new_term(&mut self, var: VarId, coef: f64) {
        debug_assert!(self.terms.iter().all(|(v, _)| *v != var));
        self.terms.push((var, coef));
    }
    /// Replaces the coefficient of `var` in this expression
    pub fn set_coef(&mut self, var: VarId, coef: f64) {
        if let Some(t) = self.terms.iter_mut().find(|(v, _)| *v == var) {
            t.1 = coef;
        } else {
            self.terms.push((var, coef));
        }
    }
    pub fn add_constant(&mut self, constant: f64) {
        self.constant += constant;
    }
    pub fn constant(&self) -> f64 {
        self.constant
    }
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }
    /// Returns the coefficient of `var` in this expression (0 when absent)
    pub fn coef(&self, var: VarId) -> f64 {
        self.terms.iter().find(|(v, _)| *v == var).map(|(_, c)| *c).unwrap_or(0.0)
    }
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
    /// Evaluates the expression given the value of each variable (indexed
    /// by variable id).
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms.iter().fold(self.constant, |acc, (v, c)| acc + c * values[v.0])
    }
    /// Rewrites this expression by applying the `map` function to each of
    /// its variables. Terms whose variable maps to `None` are dropped.
    pub fn map_vars<F>(&self, mut map: F) -> LinExpr
        where F: FnMut(VarId) -> Option<VarId>
    {
        let mut out = LinExpr::new().with_constant(self.constant);
        for (v, c) in self.terms.iter() {
            if let Some(w) = map(*v) {
                out.add_term(w, *c);
            }
        }
        out
    }
}
