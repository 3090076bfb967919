// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The `gantry` command line interface.
//!
//! Three subcommands cover the full workflow:
//!
//! - `gantry run`: drive a policy through a manifest, writing the move log.
//! - `gantry check`: replay a move log against its manifest.
//! - `gantry gen`: generate a random, arrival-sorted manifest.

use clap::{Parser, Subcommand, ValueEnum};
use gantry_model::manifest::ManifestLoader;
use gantry_replay::validator::ReplayValidator;
use gantry_sim::policy::{
    baseline::BaselinePolicy, priority::PriorityPolicy, RetrievalPolicy,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};

#[derive(Parser)]
#[command(name = "gantry", version, about = "Storage-yard simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs a retrieval policy over a manifest and writes the move log.
    Run {
        /// Path of the item manifest.
        manifest: PathBuf,
        /// The retrieval policy to run.
        #[arg(long, value_enum, default_value_t = PolicyKind::Priority)]
        policy: PolicyKind,
        /// Yard width in columns.
        #[arg(long, default_value_t = 34)]
        width: usize,
        /// Path the move log is written to.
        #[arg(long, short, default_value = "moves.log")]
        output: PathBuf,
        /// Rejects manifests not sorted by arrival start.
        #[arg(long)]
        strict_order: bool,
    },
    /// Replays a move log against its manifest and reports the outcome.
    Check {
        /// Path of the item manifest.
        manifest: PathBuf,
        /// Path of the move log to replay.
        log: PathBuf,
        /// Prints the yard after every replayed event.
        #[arg(long)]
        show: bool,
    },
    /// Generates a random manifest, sorted by arrival start.
    Gen {
        /// Number of items to generate.
        #[arg(long, default_value_t = 100)]
        count: usize,
        /// Seed of the random generator.
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Path the manifest is written to; stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyKind {
    /// Footprint buckets, fixed sweep order.
    Baseline,
    /// Priority-driven digging with reserved lanes.
    Priority,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Run {
            manifest,
            policy,
            width,
            output,
            strict_order,
        } => run(&manifest, policy, width, &output, strict_order),
        Command::Check {
            manifest,
            log,
            show,
        } => check(&manifest, &log, show),
        Command::Gen {
            count,
            seed,
            output,
        } => gen(count, seed, output.as_deref()),
    }
}

fn run(
    manifest: &std::path::Path,
    kind: PolicyKind,
    width: usize,
    output: &std::path::Path,
    strict_order: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let items = ManifestLoader::new()
        .fail_on_unsorted(strict_order)
        .from_path(manifest)?;
    let writer = BufWriter::new(File::create(output)?);

    let mut policy: Box<dyn RetrievalPolicy> = match kind {
        PolicyKind::Baseline => Box::new(BaselinePolicy::new(width, writer)?),
        PolicyKind::Priority => Box::new(PriorityPolicy::new(width, writer)?),
    };

    let arrivals = items.len();
    for item in items {
        policy.handle_arrival(item)?;
    }
    policy.finish()?;

    println!("Policy:    {}", policy.name());
    println!("Arrivals:  {}", arrivals);
    println!("Clock:     {}", policy.clock());
    println!("Cash:      {}", policy.cash());
    println!("Remaining: {}", policy.yard().len());
    println!("{}", policy.stats());
    Ok(())
}

fn check(
    manifest: &std::path::Path,
    log: &std::path::Path,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let items = ManifestLoader::new().from_path(manifest)?;
    let validator = ReplayValidator::new(&items)?;
    let reader = BufReader::new(File::open(log)?);

    let report = if show {
        validator.validate_with(reader, |yard, event| {
            println!("-- {}", event);
            println!("{}", yard);
        })?
    } else {
        validator.validate(reader)?
    };

    println!("Log is valid.");
    println!("Policy:    {}", report.policy);
    println!("Width:     {}", report.width);
    println!("Events:    {}", report.events);
    println!("Cash:      {}", report.final_cash);
    println!("Remaining: {}", report.remaining);
    Ok(())
}

fn gen(
    count: usize,
    seed: u64,
    output: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut lines = String::new();
    lines.push_str("# id size value arrival_start arrival_end delivery_start delivery_end\n");

    let mut arrival_start: i64 = 0;
    for id in 1..=count {
        arrival_start += rng.gen_range(0..3);
        let arrival_end = arrival_start + rng.gen_range(3..10);
        let delivery_start = arrival_start + rng.gen_range(1..15);
        let delivery_end = delivery_start + rng.gen_range(1..20);
        let size: usize = rng.gen_range(1..=4);
        let value: i64 = rng.gen_range(0..100);
        lines.push_str(&format!(
            "{} {} {} {} {} {} {}\n",
            id, size, value, arrival_start, arrival_end, delivery_start, delivery_end
        ));
    }

    match output {
        Some(path) => {
            let mut file = BufWriter::new(File::create(path)?);
            file.write_all(lines.as_bytes())?;
            file.flush()?;
        }
        None => print!("{}", lines),
    }
    Ok(())
}
