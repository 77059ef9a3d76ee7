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

//! Writes random GAP instances (Chu and Beasley, type C) to a destination
//! folder. Files are named `instance_n<agents>_<jobs>__<k>.txt`.

use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use bnp::generate_chu_beasley_c;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The folder where the instances are written
    destination: PathBuf,
    /// The sizes of the instances, as `agents:jobs`
    #[arg(short, long, value_parser = parse_size, default_values = ["4:60", "4:80"])]
    sizes: Vec<(usize, usize)>,
    /// The number of instances per size
    #[arg(short, long, default_value_t = 20)]
    count: usize,
    /// The seed of the random number generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn parse_size(text: &str) -> Result<(usize, usize), String> {
    let (agents, jobs) = text.split_once(':')
        .ok_or_else(|| format!("expected agents:jobs, got '{}'", text))?;
    let agents = agents.parse::<usize>().map_err(|e| format!("agents: {}", e))?;
    let jobs   = jobs.parse::<usize>().map_err(|e| format!("jobs: {}", e))?;
    Ok((agents, jobs))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    fs::create_dir_all(&args.destination)
        .with_context(|| format!("could not create {}", args.destination.display()))?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    for (n_agents, n_jobs) in args.sizes.iter().copied() {
        for k in 0..args.count {
            let instance = generate_chu_beasley_c(n_agents, n_jobs, &mut rng)?;
            let fname    = args.destination.join(format!("instance_n{}_{}__{}.txt", n_agents, n_jobs, k));
            fs::write(&fname, instance.to_string())
                .with_context(|| format!("could not write {}", fname.display()))?;
        }
    }
    Ok(())
}
