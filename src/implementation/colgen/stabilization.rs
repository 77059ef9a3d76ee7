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

//! This module provides the dual stabilization schemes.

use crate::DualStabilization;

/// The prices are the raw duals of the master.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStabilization;
impl DualStabilization for NoStabilization {
    fn reset(&mut self) {}
    fn stabilize(&mut self, raw: &[f64]) -> Vec<f64> {
        raw.to_vec()
    }
    fn is_active(&self) -> bool {
        false
    }
}

/// Wentges smoothing: the prices are a convex combination of the previous
/// prices and of the current duals of the master,
/// `p_t = alpha * p_{t-1} + (1 - alpha) * y_t`.
///
/// With `alpha = 0`, the prices are the raw duals.
///
/// # Example
/// ```
/// # use bnp::*;
/// let mut smoothing = WentgesSmoothing::new(0.5);
/// assert_eq!(vec![2.0, 4.0], smoothing.stabilize(&[2.0, 4.0]));
/// assert_eq!(vec![1.0, 3.0], smoothing.stabilize(&[0.0, 2.0]));
/// ```
#[derive(Debug, Clone)]
pub struct WentgesSmoothing {
    alpha   : f64,
    previous: Option<Vec<f64>>,
}
impl WentgesSmoothing {
    /// Creates a new smoothing with the given factor (in [0, 1))
    pub fn new(alpha: f64) -> Self {
        WentgesSmoothing { alpha, previous: None }
    }
}
impl DualStabilization for WentgesSmoothing {
    fn reset(&mut self) {
        self.previous = None;
    }
    fn stabilize(&mut self, raw: &[f64]) -> Vec<f64> {
        let prices: Vec<f64> = match self.previous.as_ref() {
            Some(prev) if prev.len() == raw.len() => prev.iter().zip(raw.iter())
                .map(|(p, y)| self.alpha * p + (1.0 - self.alpha) * y)
                .collect(),
            _ => raw.to_vec(),
        };
        self.previous = Some(prices.clone());
        prices
    }
    fn is_active(&self) -> bool {
        self.alpha > 0.0
    }
}

#[cfg(test)]
mod test_stabilization {
    use crate::*;

    #[test]
    fn no_stabilization_returns_the_raw_duals() {
        let mut s = NoStabilization;
        assert_eq!(vec![1.0, -2.0], s.stabilize(&[1.0, -2.0]));
        assert_eq!(vec![3.0, 4.0], s.stabilize(&[3.0, 4.0]));
        assert!(!s.is_active());
    }
    #[test]
    fn a_zero_factor_is_inactive_and_returns_the_raw_duals() {
        let mut s = WentgesSmoothing::new(0.0);
        s.stabilize(&[1.0, 1.0]);
        assert_eq!(vec![3.0, 4.0], s.stabilize(&[3.0, 4.0]));
        assert!(!s.is_active());
    }
    #[test]
    fn smoothing_is_a_convex_combination_with_the_previous_prices() {
        let mut s = WentgesSmoothing::new(0.8);
        assert!(s.is_active());
        assert_eq!(vec![10.0], s.stabilize(&[10.0]));
        let p = s.stabilize(&[0.0]);
        assert!((p[0] - 8.0).abs() < 1e-12);
        let p = s.stabilize(&[0.0]);
        assert!((p[0] - 6.4).abs() < 1e-12);
    }
    #[test]
    fn reset_forgets_the_history() {
        let mut s = WentgesSmoothing::new(0.3);
        s.stabilize(&[10.0]);
        s.reset();
        assert_eq!(vec![1.0], s.stabilize(&[1.0]));
    }
    #[test]
    fn a_change_of_dimension_restarts_from_the_raw_duals() {
        let mut s = WentgesSmoothing::new(0.3);
        s.stabilize(&[10.0]);
        assert_eq!(vec![1.0, 2.0], s.stabilize(&[1.0, 2.0]));
    }
}
