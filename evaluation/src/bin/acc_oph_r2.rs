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

//! OPH Jaccard accuracy between the first and second half of the tokenised
//! text stream (R2). The halves share the common vocabulary of the
//! document, so the true Jaccard sits well away from both 0 and 1.

use std::path::PathBuf;

use clap::Parser;

use evaluation::default_threads;
use evaluation::driver::run_accuracy;
use evaluation::driver::RunConfig;
use evaluation::fatal_exit;
use evaluation::runs::oph_jaccard_bytes;
use evaluation::runs::oph_relerr;
use evaluation::truth;
use sketchmark::data::data_path;
use sketchmark::data::split_halves;
use sketchmark::data::word_tokens;
use sketchmark::data::DEFAULT_TOKEN_FILE;
use sketchmark::data::TOKEN_TAKE;
use sketchmark::entropy::EntropyPool;
use sketchmark::hash::draw_coeffs;
use sketchmark::hash::MultiplyShiftVec;
use sketchmark::hash::Rapid32;
use sketchmark::hash::TabOnVec;
use sketchmark::hash::TornadoOnVecD1;
use sketchmark::hash::TornadoOnVecD2;
use sketchmark::hash::TornadoOnVecD3;
use sketchmark::hash::TornadoOnVecD4;
use sketchmark::hash::LANE_COEFFS;
use sketchmark::Error;

#[derive(Parser)]
#[command(about = "OPH Jaccard accuracy between the halves of the R2 token stream")]
struct Args {
    /// UTF-8 token source file.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Number of tokens taken from the file.
    #[arg(long, default_value_t = TOKEN_TAKE)]
    items: usize,

    /// OPH bin count.
    #[arg(long = "K", default_value_t = 200)]
    bins: u32,

    /// Repetitions.
    #[arg(long = "R", default_value_t = 1_000)]
    reps: usize,

    /// Output CSV path.
    #[arg(long, default_value = "oph_r2_relerr.csv")]
    out: PathBuf,

    /// Worker threads (default: hardware concurrency).
    #[arg(long)]
    threads: Option<usize>,
}

struct RepSeeds {
    coeffs: [u64; LANE_COEFFS],
    rapid_seed: u64,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        fatal_exit(err);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let threads = args.threads.unwrap_or_else(default_threads);
    let file = args
        .file
        .unwrap_or_else(|| data_path(DEFAULT_TOKEN_FILE));
    println!("OPH accuracy on the R2 halves");
    println!(
        "  file={}  items={}  K={}  R={}  threads={threads}",
        file.display(),
        args.items,
        args.bins,
        args.reps
    );
    println!("Writing: {}", args.out.display());

    let base = word_tokens(&file, args.items)?;
    let (first, second) = split_halves(&base);
    let a_items: Vec<&[u8]> = first.stream().collect();
    let b_items: Vec<&[u8]> = second.stream().collect();
    let j_true = truth::jaccard_bytes(&a_items, &b_items);

    let pool = EntropyPool::global()?;
    let params: Vec<RepSeeds> = (0..args.reps)
        .map(|_| RepSeeds {
            coeffs: draw_coeffs(pool),
            rapid_seed: pool.u64(),
        })
        .collect();

    let cfg = RunConfig {
        reps: args.reps,
        threads,
        out: args.out.clone(),
    };
    run_accuracy(&cfg, &params, |r, seeds: &RepSeeds, buf| {
        let msvec = MultiplyShiftVec::new(seeds.coeffs, true);
        let rapid = Rapid32::new(seeds.rapid_seed);
        let tab = TabOnVec::new(seeds.coeffs, pool);
        let tor1 = TornadoOnVecD1::new(seeds.coeffs, pool);
        let tor2 = TornadoOnVecD2::new(seeds.coeffs, pool);
        let tor3 = TornadoOnVecD3::new(seeds.coeffs, pool);
        let tor4 = TornadoOnVecD4::new(seeds.coeffs, pool);

        let rep = r + 1;
        let m = args.bins;
        let mut emit = |name: &str, j_est: f64| {
            buf.row(name, rep, oph_relerr(j_est, j_true));
        };
        emit("MSVec", oph_jaccard_bytes(&msvec, &a_items, &b_items, m));
        emit("TabOnMSVec", oph_jaccard_bytes(&tab, &a_items, &b_items, m));
        emit("TornadoOnMSVecD1", oph_jaccard_bytes(&tor1, &a_items, &b_items, m));
        emit("TornadoOnMSVecD2", oph_jaccard_bytes(&tor2, &a_items, &b_items, m));
        emit("TornadoOnMSVecD3", oph_jaccard_bytes(&tor3, &a_items, &b_items, m));
        emit("TornadoOnMSVecD4", oph_jaccard_bytes(&tor4, &a_items, &b_items, m));
        emit("RapidHash32", oph_jaccard_bytes(&rapid, &a_items, &b_items, m));
    })?;

    println!("Done.");
    Ok(())
}
