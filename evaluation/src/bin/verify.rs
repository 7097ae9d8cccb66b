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

//! Harness self-checks: provider determinism, stream counts and widths,
//! split completeness, Bottom-k variant behaviour, OPH sanity, and (when
//! the external input files are present) reload equivalence with raw-buffer
//! checksums. Exits non-zero on the first failed check.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use evaluation::fatal_exit;
use evaluation::truth;
use sketchmark::data::data_path;
use sketchmark::data::mixed_skew;
use sketchmark::data::paired_skew;
use sketchmark::data::sample_binary;
use sketchmark::data::sample_sha1;
use sketchmark::data::skewed;
use sketchmark::data::split_fixed;
use sketchmark::data::split_halves;
use sketchmark::data::word_tokens;
use sketchmark::data::BINARY_POOL_ITEMS;
use sketchmark::data::BINARY_STREAM_ITEMS;
use sketchmark::data::DEFAULT_BINARY_FILE;
use sketchmark::data::DEFAULT_SHA1_FILE;
use sketchmark::data::DEFAULT_TOKEN_FILE;
use sketchmark::data::SHA1_POOL_ITEMS;
use sketchmark::data::SHA1_STREAM_ITEMS;
use sketchmark::data::TOKEN_TAKE;
use sketchmark::entropy::EntropyPool;
use sketchmark::hash::Hash32;
use sketchmark::hash::MultiplyShift;
use sketchmark::sketch::jaccard;
use sketchmark::sketch::BottomK;
use sketchmark::sketch::MultiBottomK;
use sketchmark::sketch::Oph;
use sketchmark::Error;

#[derive(Parser)]
#[command(about = "Self-checks over the dataset providers and sketches")]
struct Args {
    /// Generated-stream length used by the checks.
    #[arg(long, default_value_t = 100_000)]
    items: usize,

    /// Split seed for the partition checks.
    #[arg(long = "split-seed", value_parser = evaluation::parse_u64_flag, default_value = "123456789")]
    split_seed: u64,

    /// Raw little-endian u32 input file (checked only when present).
    #[arg(long)]
    binary_file: Option<PathBuf>,

    /// SHA-1 input file (checked only when present).
    #[arg(long)]
    sha1_file: Option<PathBuf>,

    /// Token input file (checked only when present).
    #[arg(long)]
    token_file: Option<PathBuf>,
}

fn check(name: &str, ok: bool) {
    if ok {
        println!("  ok: {name}");
    } else {
        eprintln!("FAILED: {name}");
        process::exit(2);
    }
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        fatal_exit(err);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let n = args.items;
    println!("Generated providers (items={n}):");

    let base = skewed(n);
    check("skewed stream emits the advertised count", base.len() == n);
    check(
        "skewed records are 4 bytes wide",
        base.stream().all(|r| r.len() == 4),
    );
    check("skewed rebuild is byte-identical", base == skewed(n));
    check("mixed rebuild is byte-identical", mixed_skew(n) == mixed_skew(n));

    let paired = paired_skew(n);
    check("paired rebuild is byte-identical", paired == paired_skew(n));

    let (group_a, group_b) = split_fixed(&paired, args.split_seed);
    check(
        "split group sizes sum to the base size",
        group_a.len() + group_b.len() == paired.len(),
    );
    {
        let mut merged = group_a.to_u32_keys();
        merged.extend(group_b.to_u32_keys());
        merged.sort_unstable();
        let mut expected = paired.to_u32_keys();
        expected.sort_unstable();
        check("split preserves every occurrence", merged == expected);
    }
    {
        let (again_a, again_b) = split_fixed(&paired, args.split_seed);
        check(
            "same seed reproduces the same partition",
            again_a == group_a && again_b == group_b,
        );
    }

    println!("Sketches:");
    {
        // The paired half duplicates every key, so the two Bottom-k
        // variants must diverge: only the dedup variant matches truth.
        let keys = paired.to_u32_keys();
        let d_true = truth::distinct_u32(&keys) as f64;
        let pool = EntropyPool::global()?;
        let h = MultiplyShift::from_entropy(pool);

        let mut dedup = BottomK::new(1_024);
        let mut multi = MultiBottomK::new(1_024);
        for &key in &keys {
            dedup.push(h.hash(key));
            multi.push(h.hash(key));
        }
        let dedup_err = (dedup.estimate() - d_true).abs() / d_true;
        check("dedup Bottom-k tracks the distinct count", dedup_err < 0.25);
        check(
            "multiset Bottom-k overestimates on duplicated keys",
            multi.estimate() > dedup.estimate(),
        );

        let mut oph_a = Oph::new(256);
        let mut oph_b = Oph::new(256);
        for &key in &keys {
            oph_a.push(h.hash(key));
            oph_b.push(h.hash(key));
        }
        check("OPH self-similarity is exactly 1", jaccard(&oph_a, &oph_b) == 1.0);

        let empty_a = Oph::new(64);
        let empty_b = Oph::new(64);
        check("empty OPH sketches compare equal", jaccard(&empty_a, &empty_b) == 1.0);
    }

    println!("File-backed providers:");
    let binary_file = args
        .binary_file
        .unwrap_or_else(|| data_path(DEFAULT_BINARY_FILE));
    if binary_file.is_file() {
        let first = sample_binary(&binary_file, BINARY_POOL_ITEMS, BINARY_STREAM_ITEMS)?;
        let second = sample_binary(&binary_file, BINARY_POOL_ITEMS, BINARY_STREAM_ITEMS)?;
        check("binary sample reload is identical", first == second);
        println!(
            "  binary sample: {} items, fnv1a32=0x{:08x}",
            first.len(),
            truth::fnv1a32(first.bytes())
        );
    } else {
        println!("  skipped binary sample ({} not present)", binary_file.display());
    }

    let sha1_file = args
        .sha1_file
        .unwrap_or_else(|| data_path(DEFAULT_SHA1_FILE));
    if sha1_file.is_file() {
        let first = sample_sha1(&sha1_file, SHA1_POOL_ITEMS, SHA1_STREAM_ITEMS)?;
        let second = sample_sha1(&sha1_file, SHA1_POOL_ITEMS, SHA1_STREAM_ITEMS)?;
        check("SHA-1 sample reload is identical", first == second);
        check(
            "SHA-1 records are 20 bytes wide",
            first.stream().all(|r| r.len() == 20),
        );
        let items: Vec<&[u8]> = first.stream().collect();
        let (left, right) = split_fixed(&first, args.split_seed);
        let left_items: Vec<&[u8]> = left.stream().collect();
        let right_items: Vec<&[u8]> = right.stream().collect();
        println!(
            "  SHA-1 sample: {} items, {} distinct, split Jaccard={:.6}",
            first.len(),
            truth::distinct_bytes(&items),
            truth::jaccard_bytes(&left_items, &right_items)
        );
    } else {
        println!("  skipped SHA-1 sample ({} not present)", sha1_file.display());
    }

    let token_file = args
        .token_file
        .unwrap_or_else(|| data_path(DEFAULT_TOKEN_FILE));
    if token_file.is_file() {
        let first = word_tokens(&token_file, TOKEN_TAKE)?;
        let second = word_tokens(&token_file, TOKEN_TAKE)?;
        check("token reload is identical", first == second);
        let (left, right) = split_halves(&first);
        check(
            "token halves cover the stream",
            left.len() + right.len() == first.len(),
        );
        let left_items: Vec<&[u8]> = left.stream().collect();
        let right_items: Vec<&[u8]> = right.stream().collect();
        println!(
            "  tokens: {} items, halves Jaccard={:.6}",
            first.len(),
            truth::jaccard_bytes(&left_items, &right_items)
        );
    } else {
        println!("  skipped tokens ({} not present)", token_file.display());
    }

    println!("verify: OK");
    Ok(())
}
