// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the scrollback command-line interface.
//!
//! Three subcommands for working with transcript files outside the host
//! process: `inspect` to dump records and restored counters, `filter` to run
//! the cascade against a query, and `replay` to show what a run file would
//! queue.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "scrollback",
    about = "Inspect and filter console transcript files",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a transcript's records and its restored sequence counters
    Inspect {
        /// Path to a .log transcript file
        file: String,
    },

    /// Load a transcript and print the records matching a query
    Filter {
        /// Path to a .log transcript file
        file: String,

        /// Filter query (matched case-insensitively, ASCII folding)
        query: String,

        /// Ladder of minimum-query-length thresholds for the cascade
        #[arg(long, value_delimiter = ',', default_value = "3,4,6")]
        ladder: Vec<usize>,
    },

    /// Parse a run file and print its commands in execution order
    Replay {
        /// Path to a .log or plain-text script file
        file: String,
    },
}
