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

//! This module generates random GAP instances following the scheme of
//! Chu and Beasley (1997), type C: resource consumptions are drawn in
//! [5, 25], costs in [10, 50] and the capacity of each agent is 80% of its
//! average load.

use rand::Rng;

use crate::{Error, GapInstance};

/// Generates a type C instance with the given number of agents and jobs.
pub fn generate_chu_beasley_c<R: Rng>(n_agents: usize, n_jobs: usize, rng: &mut R) -> Result<GapInstance, Error> {
    if n_agents == 0 || n_jobs == 0 {
        return Err(Error::Configuration("an instance needs at least one agent and one job".to_string()));
    }
    let resource = (0..n_agents)
        .map(|_| (0..n_jobs).map(|_| rng.gen_range(5..=25) as f64).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let cost = (0..n_agents)
        .map(|_| (0..n_jobs).map(|_| rng.gen_range(10..=50) as f64).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let capacity = resource.iter()
        .map(|row| (0.8 * row.iter().sum::<f64>() / n_agents as f64).floor())
        .collect();
    GapInstance::new(cost, resource, capacity)
}
