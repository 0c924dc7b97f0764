// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Transcript persistence: flat line-oriented text, one record per line.
//!
//! The format is exactly what the log pane shows:
//! `[YYYY-MM-DD HH:MM:SS]<seq><dir> <message>` with `<dir>` being `>` for
//! commands and `<` for replies. There is no escaping — a message containing
//! a newline or a stray direction marker will misparse on reload. That is a
//! known format limitation, not something this module tries to paper over.
//!
//! Sequence counters are not stored separately: they live inside the rendered
//! prefix, so a reload re-derives them by reading the number after the `]` on
//! the *last* line of each direction. The counters are monotonic sequence
//! numbers, so the last observed value is authoritative no matter how many
//! load/save/filter cycles the file has been through.
//!
//! Loading always builds into a scratch store that is returned by value; on
//! any failure the caller's store is untouched.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::store::LogStore;
use crate::text::trimmed_line;

/// Write the whole transcript, one rendered record per line.
pub fn save_log(store: &LogStore, path: &Path) -> Result<()> {
    let file = File::create(path).inspect_err(|e| {
        log::error!("unable to open {} for writing: {}", path.display(), e);
    })?;
    let mut out = BufWriter::new(file);
    for &entry in store.entries() {
        out.write_all(store.rendered(entry).as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Read a transcript back into a fresh store.
///
/// One record per non-empty line; the direction is the first `>` or `<`
/// found, and the message starts two bytes past it (marker plus the space).
/// Lines with no marker are skipped with a diagnostic rather than failing
/// the load.
pub fn load_log(path: &Path) -> Result<LogStore> {
    let file = File::open(path).inspect_err(|e| {
        log::error!("unable to open {} for reading: {}", path.display(), e);
    })?;

    let mut store = LogStore::new();
    let mut last_out = None;
    let mut last_in = None;

    for line in BufReader::new(file).lines() {
        let line = line?;
        let row = trimmed_line(&line);
        if row.is_empty() {
            continue;
        }
        let Some(marker) = row.find(['>', '<']) else {
            log::warn!("skipping transcript line without direction marker: {:?}", row);
            continue;
        };
        let outgoing = row.as_bytes()[marker] == b'>';
        store.push_parsed(row, outgoing, marker + 2);

        let at = store.len() - 1;
        if outgoing {
            last_out = Some(at);
        } else {
            last_in = Some(at);
        }
    }

    let counter_out = last_out.and_then(|i| embedded_sequence(&store, i)).unwrap_or(0);
    let counter_in = last_in.and_then(|i| embedded_sequence(&store, i)).unwrap_or(0);
    store.set_counters(counter_in, counter_out);
    Ok(store)
}

/// The sequence number embedded in a record's prompt: the digits right after
/// the first `]`.
fn embedded_sequence(store: &LogStore, at: usize) -> Option<u32> {
    let (prompt, _) = store.extract(store.entries()[at]);
    let after = prompt.iter().position(|&b| b == b']')? + 1;
    let digits: &[u8] = &prompt[after..];
    let len = digits.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    std::str::from_utf8(&digits[..len]).ok()?.parse().ok()
}

/// Parse a run file into a command queue.
///
/// `.log` files replay only their command lines (text after the `> `
/// marker); anything else runs every non-empty trimmed line. The returned
/// list is reversed because the scheduler drains the queue from its back —
/// line 1 executes first.
pub fn load_run(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).inspect_err(|e| {
        log::error!("unable to open {} for reading: {}", path.display(), e);
    })?;

    let from_log = path.extension().is_some_and(|ext| ext == "log");
    let mut commands = Vec::new();

    for line in BufReader::new(file).lines() {
        let line = line?;
        if from_log {
            if let Some(marker) = line.find('>') {
                let rest = &line[(marker + 2).min(line.len())..];
                commands.push(trimmed_line(rest).to_string());
            }
        } else {
            let row = trimmed_line(&line);
            if !row.is_empty() {
                commands.push(row.to_string());
            }
        }
    }

    commands.reverse();
    Ok(commands)
}
