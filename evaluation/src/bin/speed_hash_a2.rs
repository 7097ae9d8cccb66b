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

//! Pure hashing throughput on the sampled binary-integer stream (A2):
//! hashes per second and nanoseconds per hash for each fixed-width family.

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
use sketchmark::data::sample_binary;
use sketchmark::data::BINARY_POOL_ITEMS;
use sketchmark::data::BINARY_STREAM_ITEMS;
use sketchmark::data::DEFAULT_BINARY_FILE;
use sketchmark::entropy::EntropyPool;
use sketchmark::hash::Hash32;
use sketchmark::hash::MultiplyShift;
use sketchmark::hash::Rapid32;
use sketchmark::hash::SimpleTab32;
use sketchmark::hash::TornadoTab32D1;
use sketchmark::hash::TornadoTab32D2;
use sketchmark::hash::TornadoTab32D3;
use sketchmark::hash::TornadoTab32D4;
use sketchmark::Error;

#[derive(Parser)]
#[command(about = "Hashing throughput on the A2 sampled binary stream")]
struct Args {
    /// Raw little-endian u32 input file.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Timed passes over the key buffer per measurement.
    #[arg(long, default_value_t = 1_000)]
    loops: usize,

    /// Shuffled repetitions of the full job list.
    #[arg(long, default_value_t = 10)]
    rounds: usize,

    /// Output CSV path.
    #[arg(long, default_value = "a2_speed.csv")]
    out: PathBuf,
}

fn hash_job<'a, H: Hash32>(
    name: &'static str,
    h: &'a H,
    keys: &'a [u32],
    loops: usize,
) -> SpeedJob<'a> {
    SpeedJob {
        name,
        run: Box::new(move || {
            let (secs, sink) = time_loops(loops, |sink| {
                for &x in keys {
                    *sink ^= black_box(h.hash(x));
                }
            });
            speed_row(name, keys.len() * loops, secs, sink)
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
        .unwrap_or_else(|| data_path(DEFAULT_BINARY_FILE));
    let keys = sample_binary(&file, BINARY_POOL_ITEMS, BINARY_STREAM_ITEMS)?.to_u32_keys();
    let n = keys.len();
    println!(
        "A2 items: {n}  loops={}  rounds={}",
        args.loops, args.rounds
    );

    let pool = EntropyPool::global()?;
    let ms = MultiplyShift::from_entropy(pool);
    let stab = SimpleTab32::from_entropy(pool);
    let tor1 = TornadoTab32D1::from_entropy(pool);
    let tor2 = TornadoTab32D2::from_entropy(pool);
    let tor3 = TornadoTab32D3::from_entropy(pool);
    let tor4 = TornadoTab32D4::from_entropy(pool);
    let rapid = Rapid32::from_entropy(pool);

    let mut jobs = vec![
        hash_job("MS", &ms, &keys, args.loops),
        hash_job("SimpleTab32", &stab, &keys, args.loops),
        hash_job("Tornado32_D1", &tor1, &keys, args.loops),
        hash_job("Tornado32_D2", &tor2, &keys, args.loops),
        hash_job("Tornado32_D3", &tor3, &keys, args.loops),
        hash_job("Tornado32_D4", &tor4, &keys, args.loops),
        hash_job("RapidHash32", &rapid, &keys, args.loops),
    ];

    let rows = run_shuffled_rounds(&mut jobs, args.rounds);
    let rows = collapse_by_median(&rows);
    write_speed_csv(&args.out, &rows, args.loops, n, &[])?;
    println!("Wrote: {}", args.out.display());
    Ok(())
}
