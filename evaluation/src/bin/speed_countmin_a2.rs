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

//! Count-Min insertion throughput on the sampled binary-integer stream
//! (A2). Every family serves directly as the per-row hasher, so each
//! insert performs `depth` hash calls plus the counter updates.

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
use sketchmark::sketch::CountMin;
use sketchmark::Error;

#[derive(Parser)]
#[command(about = "Count-Min insertion throughput on the A2 sampled binary stream")]
struct Args {
    /// Raw little-endian u32 input file.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Counter columns per row.
    #[arg(long, default_value_t = 32_768)]
    width: usize,

    /// Rows (independent hashers of the measured family).
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Timed passes over the key buffer per measurement.
    #[arg(long, default_value_t = 1_000)]
    loops: usize,

    /// Shuffled repetitions of the full job list.
    #[arg(long, default_value_t = 10)]
    rounds: usize,

    /// Output CSV path.
    #[arg(long, default_value = "a2_speed_cm.csv")]
    out: PathBuf,
}

fn insert_job<'a, H: Hash32 + Clone>(
    name: &'static str,
    row_hashers: Vec<H>,
    keys: &'a [u32],
    width: usize,
    loops: usize,
) -> SpeedJob<'a>
where
    H: 'a,
{
    SpeedJob {
        name,
        run: Box::new(move || {
            let mut cms = CountMin::new(width, row_hashers.len());
            for (d, h) in row_hashers.iter().enumerate() {
                cms.set_row(d, h.clone());
            }
            let probe = keys[0];
            let (secs, sink) = time_loops(loops, |sink| {
                cms.clear();
                for &x in keys {
                    cms.add(x, 1);
                }
                *sink ^= black_box(cms.estimate(probe));
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
        "A2 items: {n}  loops={}  rounds={}  W={}  D={}",
        args.loops, args.rounds, args.width, args.depth
    );

    let pool = EntropyPool::global()?;
    let depth = args.depth;

    let ms_rows: Vec<MultiplyShift> =
        (0..depth).map(|_| MultiplyShift::from_entropy(pool)).collect();
    let stab_rows: Vec<SimpleTab32> =
        (0..depth).map(|_| SimpleTab32::from_entropy(pool)).collect();
    let tor1_rows: Vec<TornadoTab32D1> =
        (0..depth).map(|_| TornadoTab32D1::from_entropy(pool)).collect();
    let tor2_rows: Vec<TornadoTab32D2> =
        (0..depth).map(|_| TornadoTab32D2::from_entropy(pool)).collect();
    let tor3_rows: Vec<TornadoTab32D3> =
        (0..depth).map(|_| TornadoTab32D3::from_entropy(pool)).collect();
    let tor4_rows: Vec<TornadoTab32D4> =
        (0..depth).map(|_| TornadoTab32D4::from_entropy(pool)).collect();
    let rapid_rows: Vec<Rapid32> =
        (0..depth).map(|_| Rapid32::from_entropy(pool)).collect();

    let mut jobs = vec![
        insert_job("MS", ms_rows, &keys, args.width, args.loops),
        insert_job("SimpleTab32", stab_rows, &keys, args.width, args.loops),
        insert_job("Tornado32_D1", tor1_rows, &keys, args.width, args.loops),
        insert_job("Tornado32_D2", tor2_rows, &keys, args.width, args.loops),
        insert_job("Tornado32_D3", tor3_rows, &keys, args.width, args.loops),
        insert_job("Tornado32_D4", tor4_rows, &keys, args.width, args.loops),
        insert_job("RapidHash32", rapid_rows, &keys, args.width, args.loops),
    ];

    let rows = run_shuffled_rounds(&mut jobs, args.rounds);
    let rows = collapse_by_median(&rows);
    let extra = [
        ("width", args.width.to_string()),
        ("depth", args.depth.to_string()),
    ];
    write_speed_csv(&args.out, &rows, args.loops, n, &extra)?;
    println!("Wrote: {}", args.out.display());
    Ok(())
}
