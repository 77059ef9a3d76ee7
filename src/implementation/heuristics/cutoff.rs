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

//! This module provides the implementation of various cutoff heuristics that
//! can be used to tune the behavior of a solver.

use std::time::{Duration, Instant};

use crate::Cutoff;

/// _This is the default cutoff heuristic._ It imposes that the search goes
/// proves optimality before to stop.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoCutoff;
impl Cutoff for NoCutoff {
    fn must_stop(&self) -> bool {false}
}

/// This cutoff allows one to specify a maximum time budget to solve the problem.
/// Once the time budget is elapsed, the optimization stops and the best solution
/// that has been found (so far) is returned.
///
/// The budget starts running when the cutoff is created. Because the deadline
/// is known, every relaxation solve performed during the search is bounded by
/// it as well.
///
/// # Example
/// ```
/// # use bnp::*;
/// use std::time::Duration;
///
/// let cutoff = TimeBudget::new(Duration::from_secs(60));
/// assert!(!cutoff.must_stop());
/// assert!(cutoff.deadline().is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    start : Instant,
    budget: Duration,
}
impl TimeBudget {
    pub fn new(budget: Duration) -> Self {
        TimeBudget { start: Instant::now(), budget }
    }
}
impl Cutoff for TimeBudget {
    fn must_stop(&self) -> bool {
        self.start.elapsed() >= self.budget
    }
    fn deadline(&self) -> Option<Instant> {
        self.start.checked_add(self.budget)
    }
}

/// The deadline of one relaxation solve: the earliest of the global deadline
/// (if any) and the end of the per-call budget (if any).
pub fn relaxation_deadline(cutoff: &dyn Cutoff, budget: Option<Duration>) -> Option<Instant> {
    let call = budget.and_then(|b| Instant::now().checked_add(b));
    match (cutoff.deadline(), call) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod test_cutoff {
    use std::time::Duration;

    use crate::*;

    #[test]
    fn no_cutoff_never_stops() {
        assert!(!NoCutoff.must_stop());
        assert!(NoCutoff.deadline().is_none());
    }
    #[test]
    fn time_budget_stops_once_the_budget_is_elapsed() {
        let cutoff = TimeBudget::new(Duration::from_millis(10));
        assert!(!cutoff.must_stop());
        std::thread::sleep(Duration::from_millis(20));
        assert!(cutoff.must_stop());
    }
    #[test]
    fn relaxation_deadline_is_the_earliest_of_both() {
        assert!(relaxation_deadline(&NoCutoff, None).is_none());
        let global = TimeBudget::new(Duration::from_secs(3600));
        let both   = relaxation_deadline(&global, Some(Duration::from_secs(1))).unwrap();
        assert!(both < global.deadline().unwrap());
        let only   = relaxation_deadline(&global, None).unwrap();
        assert_eq!(global.deadline().unwrap(), only);
        assert!(relaxation_deadline(&NoCutoff, Some(Duration::from_secs(1))).is_some());
    }
    #[test]
    fn a_zero_budget_is_immediately_elapsed() {
        let cutoff = TimeBudget::new(Duration::ZERO);
        assert!(cutoff.must_stop());
    }
}
