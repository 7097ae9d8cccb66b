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

//! Pure hashing throughput of the variable-length families over the
//! sampled SHA-1 stream (R1, 20-byte keys).

use std::hint::black_box;
use std::path::PathBuf;

use clap::Parser;

use evaluation::fatal_exit;
use evaluation::speed::collapse_by_median;
use evaluation::speed::run_shuffled_rounds;
use evaluation::speed::speed_row;
use evaluation::speed::time_loops;
use evaluation::speed::write_speed_csv;
use evaluation::speed::SpeedJob;
use sketchmark::data::data_path;
use sketchmark::data::sample_sha1;
use sketchmark::data::DEFAULT_SHA1_FILE;
use sketchmark::data::SHA1_POOL_ITEMS;
use sketchmark::data::SHA1_STREAM_ITEMS;
use sketchmark::entropy::EntropyPool;
use sketchmark::hash::draw_coeffs;
use sketchmark::hash::HashBytes;
use sketchmark::hash::MultiplyShiftVec;
use sketchmark::hash::Rapid32;
use sketchmark::hash::TabOnVec;
use sketchmark::hash::TornadoOnVecD1;
use sketchmark::hash::TornadoOnVecD2;
use sketchmark::hash::TornadoOnVecD3;
use sketchmark::hash::TornadoOnVecD4;
use sketchmark::Error;

#[derive(Parser)]
#[command(about = "Hashing throughput on the R1 sampled SHA-1 stream")]
struct Args {
    /// SHA-1 input file (one 40-hex digest per line).
    #[arg(long)]
    file: Option<PathBuf>,

    /// Timed passes over the key buffer per measurement.
    #[arg(long, default_value_t = 1_000)]
    loops: usize,

    /// Shuffled repetitions of the full job list.
    #[arg(long, default_value_t = 10)]
    rounds: usize,

    /// Output CSV path.
    #[arg(long, default_value = "r1_speed.csv")]
    out: PathBuf,
}

fn hash_job<'a, H: HashBytes>(
    name: &'static str,
    h: &'a H,
    items: &'a [&'a [u8]],
    loops: usize,
) -> SpeedJob<'a> {
    SpeedJob {
        name,
        run: Box::new(move || {
            let (secs, sink) = time_loops(loops, |sink| {
                for item in items {
                    *sink ^= black_box(h.hash_bytes(item));
                }
            });
            speed_row(name, items.len() * loops, secs, sink)
        }),
    }
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
        .unwrap_or_else(|| data_path(DEFAULT_SHA1_FILE));
    let records = sample_sha1(&file, SHA1_POOL_ITEMS, SHA1_STREAM_ITEMS)?;
    let items: Vec<&[u8]> = records.stream().collect();
    let n = items.len();
    println!(
        "R1 items: {n}  loops={}  rounds={}",
        args.loops, args.rounds
    );

    let pool = EntropyPool::global()?;
    let coeffs = draw_coeffs(pool);
    let msvec = MultiplyShiftVec::new(coeffs, true);
    let tab = TabOnVec::new(coeffs, pool);
    let tor1 = TornadoOnVecD1::new(coeffs, pool);
    let tor2 = TornadoOnVecD2::new(coeffs, pool);
    let tor3 = TornadoOnVecD3::new(coeffs, pool);
    let tor4 = TornadoOnVecD4::new(coeffs, pool);
    let rapid = Rapid32::from_entropy(pool);

    let mut jobs = vec![
        hash_job("MSVec", &msvec, &items, args.loops),
        hash_job("TabOnMSVec", &tab, &items, args.loops),
        hash_job("TornadoOnMSVecD1", &tor1, &items, args.loops),
        hash_job("TornadoOnMSVecD2", &tor2, &items, args.loops),
        hash_job("TornadoOnMSVecD3", &tor3, &items, args.loops),
        hash_job("TornadoOnMSVecD4", &tor4, &items, args.loops),
        hash_job("RapidHash32", &rapid, &items, args.loops),
    ];

    let rows = run_shuffled_rounds(&mut jobs, args.rounds);
    let rows = collapse_by_median(&rows);
    write_speed_csv(&args.out, &rows, args.loops, n, &[])?;
    println!("Wrote: {}", args.out.display());
    Ok(())
}
