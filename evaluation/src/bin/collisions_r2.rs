// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Worst-case 32-bit collision study on the unique tokens of the text
//! stream (R2): many trials with fresh parameters per trial, reporting the
//! maximum collision count ever observed for the multiply-vector-shift
//! family against the rapidhash reference.
//!
//! A cheap-family hash that is fine on average can still have parameter
//! draws that collapse structured keys; tracking the max across trials
//! surfaces exactly those draws.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use evaluation::fatal_exit;
use sketchmark::data::data_path;
use sketchmark::data::word_tokens;
use sketchmark::data::DEFAULT_TOKEN_FILE;
use sketchmark::data::TOKEN_TAKE;
use sketchmark::entropy::EntropyPool;
use sketchmark::hash::draw_coeffs;
use sketchmark::hash::HashBytes;
use sketchmark::hash::MultiplyShiftVec;
use sketchmark::hash::Rapid32;
use sketchmark::Error;

#[derive(Parser)]
#[command(about = "Max collision count over the unique R2 tokens, many trials")]
struct Args {
    /// UTF-8 token source file.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Trials, each with fresh hash parameters.
    #[arg(long, default_value_t = 50_000)]
    trials: usize,

    /// Output CSV path.
    #[arg(long, default_value = "r2_collision_max.csv")]
    out: PathBuf,

    /// Suppress the per-1000-trial progress lines.
    #[arg(long)]
    quiet: bool,
}

/// Collision count of a hash assignment: items minus distinct values.
fn collisions<H: HashBytes>(h: &H, uniq: &[&[u8]], scratch: &mut Vec<u32>) -> u32 {
    scratch.clear();
    scratch.extend(uniq.iter().map(|item| h.hash_bytes(item)));
    if scratch.is_empty() {
        return 0;
    }
    scratch.sort_unstable();
    let distinct = 1 + scratch.windows(2).filter(|w| w[0] != w[1]).count();
    (scratch.len() - distinct) as u32
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        fatal_exit(err);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let file = args
        .file
        .unwrap_or_else(|| data_path(DEFAULT_TOKEN_FILE));
    let records = word_tokens(&file, TOKEN_TAKE)?;

    // Unique non-empty tokens only: repeats would show up as collisions of
    // the key content, not the hash.
    let mut uniq: Vec<&[u8]> = records.stream().filter(|r| !r.is_empty()).collect();
    uniq.sort_unstable();
    uniq.dedup();
    if !args.quiet {
        println!(
            "R2 items: {} | unique keys: {} | trials: {}",
            records.len(),
            uniq.len(),
            args.trials
        );
    }

    let pool = EntropyPool::global()?;
    let mut scratch = Vec::with_capacity(uniq.len());
    let mut max_msvec = 0u32;
    let mut argmax_msvec = 0usize;
    let mut max_rapid = 0u32;
    let mut argmax_rapid = 0usize;

    for trial in 1..=args.trials {
        let msvec = MultiplyShiftVec::new(draw_coeffs(pool), true);
        let rapid = Rapid32::new(pool.u64());

        let c_msvec = collisions(&msvec, &uniq, &mut scratch);
        let c_rapid = collisions(&rapid, &uniq, &mut scratch);
        if c_msvec > max_msvec {
            max_msvec = c_msvec;
            argmax_msvec = trial;
        }
        if c_rapid > max_rapid {
            max_rapid = c_rapid;
            argmax_rapid = trial;
        }

        if !args.quiet && (trial % 1000 == 0 || trial == args.trials) {
            println!(
                "Trial {trial}/{} | max_MSVec={max_msvec} (at {argmax_msvec}) \
                 | max_RapidHash32={max_rapid} (at {argmax_rapid})",
                args.trials
            );
        }
    }

    println!("MAX collisions over {} trials (unique keys only):", args.trials);
    println!("  MSVec       : {max_msvec} (trial {argmax_msvec})");
    println!("  RapidHash32 : {max_rapid} (trial {argmax_rapid})");

    let csv = format!(
        "dataset,unique_keys,trials,max_collisions_msvec,trial_msvec,\
         max_collisions_rapidhash32,trial_rapidhash32\n\
         R2,{},{},{max_msvec},{argmax_msvec},{max_rapid},{argmax_rapid}\n",
        uniq.len(),
        args.trials
    );
    fs::write(&args.out, csv).map_err(|e| {
        Error::output("cannot write collision CSV")
            .with_context("path", args.out.display())
            .set_source(e)
    })?;
    println!("Wrote: {}", args.out.display());
    Ok(())
}
