// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end over the transcript store.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use scrollback::filter::CascadeFilter;
use scrollback::{load_log, load_run, Result};

mod cli;
use cli::{Cli, Commands};

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Inspect { file } => inspect(Path::new(&file)),
        Commands::Filter {
            file,
            query,
            ladder,
        } => filter(Path::new(&file), &query, &ladder),
        Commands::Replay { file } => replay(Path::new(&file)),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn inspect(file: &Path) -> Result<()> {
    let store = load_log(file)?;
    for &entry in store.entries() {
        let marker = if entry.outgoing() { '>' } else { '<' };
        println!("{} {}", marker, store.rendered(entry));
    }
    println!();
    println!(
        "{} records ({} bytes), counters: {} out / {} in",
        store.len(),
        store.data().len(),
        store.counter_out(),
        store.counter_in()
    );
    Ok(())
}

fn filter(file: &Path, query: &str, ladder: &[usize]) -> Result<()> {
    let store = load_log(file)?;
    let mut filter = CascadeFilter::new(ladder);
    filter.update(store.data(), store.entries(), query, false);

    let visible = filter.current(store.entries());
    for &entry in visible {
        println!("{}", store.rendered(entry));
    }
    eprintln!("{} of {} records match {:?}", visible.len(), store.len(), query);
    Ok(())
}

fn replay(file: &Path) -> Result<()> {
    let mut queue = load_run(file)?;
    // The queue drains from its back; print in execution order.
    while let Some(cmd) = queue.pop() {
        println!("{cmd}");
    }
    Ok(())
}
