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

//! This module defines the GAP instances along with their text format. An
//! instance file is a sequence of whitespace separated numbers:
//!
//! ```text
//! n_agents n_jobs
//! n_agents rows of n_jobs costs
//! n_agents rows of n_jobs resource consumptions
//! n_agents capacities
//! ```

use std::{fmt, fs, path::Path, str::{FromStr, SplitWhitespace}};

use crate::Error;

/// An instance of the generalized assignment problem: every job must be
/// assigned to exactly one agent, the jobs assigned to an agent may not
/// consume more than its capacity and the total assignment cost is to be
/// minimized.
#[derive(Debug, Clone, PartialEq)]
pub struct GapInstance {
    cost    : Vec<Vec<f64>>,
    resource: Vec<Vec<f64>>,
    capacity: Vec<f64>,
}

impl GapInstance {
    /// Creates a new instance. All matrices are indexed by `[agent][job]`.
    pub fn new(cost: Vec<Vec<f64>>, resource: Vec<Vec<f64>>, capacity: Vec<f64>) -> Result<Self, Error> {
        let n_agents = capacity.len();
        let n_jobs   = cost.first().map_or(0, |row| row.len());
        if cost.len() != n_agents || resource.len() != n_agents {
            return Err(Error::InstanceFormat(format!(
                "expected {} rows of costs and consumptions, got {} and {}", n_agents, cost.len(), resource.len())));
        }
        if cost.iter().chain(resource.iter()).any(|row| row.len() != n_jobs) {
            return Err(Error::InstanceFormat(format!("every row must have {} entries", n_jobs)));
        }
        Ok(GapInstance { cost, resource, capacity })
    }
    pub fn n_agents(&self) -> usize {
        self.capacity.len()
    }
    pub fn n_jobs(&self) -> usize {
        self.cost.first().map_or(0, |row| row.len())
    }
    pub fn cost(&self, agent: usize, job: usize) -> f64 {
        self.cost[agent][job]
    }
    pub fn resource_consumption(&self, agent: usize, job: usize) -> f64 {
        self.resource[agent][job]
    }
    pub fn capacity(&self, agent: usize) -> f64 {
        self.capacity[agent]
    }
}

/// This function is used to read a GAP instance from file. It returns either
/// the instance if everything went on well or an error describing the problem.
pub fn read_instance<P: AsRef<Path>>(fname: P) -> Result<GapInstance, Error> {
    fs::read_to_string(fname)?.parse()
}

/// Walks through the numbers of an instance file, keeping track of the
/// position of each token for the error messages.
struct Tokens<'a> {
    inner   : SplitWhitespace<'a>,
    position: usize,
}
impl <'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens { inner: text.split_whitespace(), position: 0 }
    }
    fn next_token(&mut self, what: &str) -> Result<&'a str, Error> {
        self.position += 1;
        self.inner.next().ok_or_else(|| Error::InstanceFormat(
            format!("token {}: unexpected end of file while reading {}", self.position, what)))
    }
    fn next_usize(&mut self, what: &str) -> Result<usize, Error> {
        let token = self.next_token(what)?;
        token.parse::<usize>().map_err(|_| Error::InstanceFormat(
            format!("token {}: expected a non negative integer for {}, got '{}'", self.position, what, token)))
    }
    fn next_f64(&mut self, what: &str) -> Result<f64, Error> {
        let token = self.next_token(what)?;
        match token.parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(x),
            _ => Err(Error::InstanceFormat(
                format!("token {}: expected a number for {}, got '{}'", self.position, what, token))),
        }
    }
    fn matrix(&mut self, rows: usize, cols: usize, what: &str) -> Result<Vec<Vec<f64>>, Error> {
        (0..rows).map(|_| (0..cols).map(|_| self.next_f64(what)).collect()).collect()
    }
}

impl FromStr for GapInstance {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        let mut tokens = Tokens::new(text);
        let n_agents = tokens.next_usize("the number of agents")?;
        let n_jobs   = tokens.next_usize("the number of jobs")?;
        if n_agents == 0 || n_jobs == 0 {
            return Err(Error::InstanceFormat("an instance needs at least one agent and one job".to_string()));
        }
        let cost     = tokens.matrix(n_agents, n_jobs, "a cost")?;
        let resource = tokens.matrix(n_agents, n_jobs, "a resource consumption")?;
        let capacity = (0..n_agents).map(|_| tokens.next_f64("a capacity")).collect::<Result<Vec<_>, _>>()?;
        if let Some(extra) = tokens.inner.next() {
            return Err(Error::InstanceFormat(format!("token {}: unexpected trailing '{}'", tokens.position + 1, extra)));
        }
        GapInstance::new(cost, resource, capacity)
    }
}

impl fmt::Display for GapInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.n_agents(), self.n_jobs())?;
        for row in self.cost.iter().chain(self.resource.iter()) {
            let row = row.iter().map(|x| x.to_string()).collect::<Vec<_>>();
            writeln!(f, "{}", row.join(" "))?;
        }
        let capacity = self.capacity.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        writeln!(f, "{}", capacity.join(" "))
    }
}

#[cfg(test)]
mod test_instance {
    use std::io::Write;

    use crate::*;

    const TINY: &str = "2 3\n 1 2 3\n 4 5 6\n 1 1 1\n 2 2 2\n 2 4\n";

    #[test]
    fn parse_reads_every_section() {
        let instance: GapInstance = TINY.parse().unwrap();
        assert_eq!(2, instance.n_agents());
        assert_eq!(3, instance.n_jobs());
        assert_eq!(6.0, instance.cost(1, 2));
        assert_eq!(2.0, instance.resource_consumption(1, 0));
        assert_eq!(4.0, instance.capacity(1));
    }
    #[test]
    fn display_writes_a_parsable_instance() {
        let instance: GapInstance = TINY.parse().unwrap();
        let again: GapInstance = instance.to_string().parse().unwrap();
        assert_eq!(instance, again);
    }
    #[test]
    fn truncated_file_names_the_missing_token() {
        let err = "2 3\n 1 2 3\n 4 5 6\n 1 1 1\n 2 2 2\n 2".parse::<GapInstance>().unwrap_err();
        match err {
            Error::InstanceFormat(msg) => assert!(msg.contains("token 16"), "{}", msg),
            other => panic!("unexpected error {:?}", other),
        }
    }
    #[test]
    fn garbage_is_rejected() {
        let err = "2 three".parse::<GapInstance>().unwrap_err();
        match err {
            Error::InstanceFormat(msg) => assert!(msg.contains("token 2") && msg.contains("three")),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(matches!("0 3".parse::<GapInstance>(), Err(Error::InstanceFormat(_))));
        assert!(matches!(format!("{} 7", TINY).parse::<GapInstance>(), Err(Error::InstanceFormat(_))));
    }
    #[test]
    fn inconsistent_dimensions_are_rejected() {
        let err = GapInstance::new(vec![vec![1.0, 2.0]], vec![vec![1.0]], vec![3.0]);
        assert!(matches!(err, Err(Error::InstanceFormat(_))));
    }
    #[test]
    fn read_instance_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", TINY).unwrap();
        let instance = read_instance(file.path()).unwrap();
        assert_eq!(3, instance.n_jobs());
        assert!(matches!(read_instance("/this/file/does/not/exist"), Err(Error::Io(_))));
    }
}
