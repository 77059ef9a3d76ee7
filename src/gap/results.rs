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

//! This module appends the outcome of a solve to a CSV log.

use std::{fs::OpenOptions, io::Write, path::Path};

use crate::{Error, Reason, SolutionStatus};

/// The column names of the result log
pub const RESULT_HEADER: &str = "instance,method,with_heuristics,smoothing_factor,farkas_pricing,clean_up,branching_on_master,n_agents,n_jobs,status,reason,objective,time";

/// One row of the result log
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub instance           : String,
    pub method             : String,
    pub with_heuristics    : bool,
    pub smoothing_factor   : f64,
    pub farkas_pricing     : bool,
    pub clean_up           : usize,
    pub branching_on_master: bool,
    pub n_agents           : usize,
    pub n_jobs             : usize,
    pub status             : SolutionStatus,
    pub reason             : Reason,
    /// The best objective value (+inf when no solution is known)
    pub objective          : f64,
    /// Elapsed time in seconds
    pub time               : f64,
}

impl ResultRecord {
    pub fn to_csv(&self) -> String {
        format!("{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.instance,
            self.method,
            self.with_heuristics,
            self.smoothing_factor,
            self.farkas_pricing,
            self.clean_up,
            self.branching_on_master,
            self.n_agents,
            self.n_jobs,
            self.status,
            self.reason,
            self.objective,
            self.time)
    }
}

/// Appends `record` to the CSV file at `path`. The header is written first
/// when the file is new (or empty).
pub fn append_result<P: AsRef<Path>>(path: P, record: &ResultRecord) -> Result<(), Error> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if file.metadata()?.len() == 0 {
        writeln!(file, "{}", RESULT_HEADER)?;
    }
    writeln!(file, "{}", record.to_csv())?;
    Ok(())
}

#[cfg(test)]
mod test_results {
    use crate::*;

    fn record(objective: f64) -> ResultRecord {
        ResultRecord {
            instance           : "instances/n2_10.txt".to_string(),
            method             : "bap".to_string(),
            with_heuristics    : true,
            smoothing_factor   : 0.3,
            farkas_pricing     : false,
            clean_up           : 1500,
            branching_on_master: true,
            n_agents           : 2,
            n_jobs             : 10,
            status             : SolutionStatus::Optimal,
            reason             : Reason::Exhausted,
            objective,
            time               : 1.5,
        }
    }

    #[test]
    fn fields_are_written_in_order() {
        assert_eq!("instances/n2_10.txt,bap,true,0.3,false,1500,true,2,10,Optimal,Exhausted,42,1.5", record(42.0).to_csv());
        assert!(record(f64::INFINITY).to_csv().contains(",inf,"));
    }
    #[test]
    fn header_is_written_once() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        append_result(&path, &record(1.0)).unwrap();
        append_result(&path, &record(2.0)).unwrap();

        let text  = std::fs::read_to_string(&path).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(3, lines.len());
        assert_eq!(RESULT_HEADER, lines[0]);
        assert!(lines[1].ends_with(",1,1.5"));
        assert!(lines[2].ends_with(",2,1.5"));
        assert_eq!(13, lines[1].split(',').count());
    }
}
