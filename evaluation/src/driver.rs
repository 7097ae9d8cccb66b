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

//! The repetition engine of the accuracy drivers.
//!
//! Work is partitioned statically: worker `t` of `T` runs repetitions
//! `r ≡ t (mod T)`. Parameter seeds are pre-drawn sequentially before the
//! workers launch, so an experiment is bit-identical for a given entropy
//! pool and repetition count regardless of the thread count. Each worker
//! stages its CSV rows in a thread-local string and flushes once, under the
//! output mutex, when its stripe completes; rows within a repetition stay
//! adjacent, ordering across repetitions is left to the `(function, rep)`
//! columns.

use std::fmt::Write as _;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::thread;

use sketchmark::Error;

/// A progress line is printed every this many completed repetitions.
pub const PROGRESS_STEP: usize = 1000;

/// Parameters shared by every accuracy driver.
pub struct RunConfig {
    pub reps: usize,
    pub threads: usize,
    pub out: PathBuf,
}

/// Thread-local staging buffer for accuracy CSV rows.
pub struct CsvBuffer {
    rows: String,
}

impl CsvBuffer {
    fn new() -> Self {
        Self {
            rows: String::new(),
        }
    }

    /// Appends one `function,rep,relerr` row. Repetitions are reported
    /// 1-based; relative errors print with fixed 8 decimal places.
    pub fn row(&mut self, function: &str, rep: usize, relerr: f64) {
        writeln!(self.rows, "{function},{rep},{relerr:.8}").expect("string write");
    }
}

/// Runs `rep_body` for every repetition across the worker pool and streams
/// the staged rows to `cfg.out`.
///
/// `params` holds the pre-drawn per-repetition seeds (`params[r]` belongs to
/// repetition `r`); drawing them up front keeps workers off the entropy pool
/// for everything except tabulation table population. I/O failures inside a
/// worker are fatal and terminate the process.
pub fn run_accuracy<P, F>(cfg: &RunConfig, params: &[P], rep_body: F) -> Result<(), Error>
where
    P: Sync,
    F: Fn(usize, &P, &mut CsvBuffer) + Sync,
{
    assert_eq!(params.len(), cfg.reps, "one parameter set per repetition");
    let threads = cfg.threads.max(1);

    let file = File::create(&cfg.out).map_err(|e| {
        Error::output("cannot open output file")
            .with_context("path", cfg.out.display())
            .set_source(e)
    })?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(b"function,rep,relerr\n")
        .map_err(|e| Error::output("cannot write CSV header").set_source(e))?;
    let writer = Mutex::new(writer);

    let done = AtomicUsize::new(0);
    thread::scope(|scope| {
        for t in 0..threads {
            let writer = &writer;
            let done = &done;
            let rep_body = &rep_body;
            scope.spawn(move || {
                let mut buf = CsvBuffer::new();
                let mut r = t;
                while r < cfg.reps {
                    rep_body(r, &params[r], &mut buf);
                    progress(done, cfg.reps);
                    r += threads;
                }
                let mut out = writer.lock().expect("output mutex");
                out.write_all(buf.rows.as_bytes())
                    .expect("flush worker CSV rows");
            });
        }
    });
    println!();

    let mut writer = writer.into_inner().expect("output mutex");
    writer
        .flush()
        .map_err(|e| Error::output("cannot flush output file").set_source(e))?;
    Ok(())
}

fn progress(done: &AtomicUsize, reps: usize) {
    let n = done.fetch_add(1, Ordering::Relaxed) + 1;
    if n % PROGRESS_STEP == 0 || n == reps {
        // The stdout lock doubles as the console mutex.
        let mut console = std::io::stdout().lock();
        let pct = 100.0 * n as f64 / reps as f64;
        write!(console, "  rep {n} / {reps}  ({pct:.1}%)\r").ok();
        console.flush().ok();
    }
}
