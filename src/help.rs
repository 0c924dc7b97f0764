// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Help-file ingestion: structured command-reference documents in, sorted
//! [`HelpStore`]s and the auto-completion name list out.
//!
//! A help document is a JSON array of records, each with a list of `names`
//! and optional `params` / `brief` / `details` text. Records carrying a
//! `version` field are file metadata and are skipped. Ingestion is
//! all-or-nothing per file: a record with no usable name aborts that file and
//! discards its partial store, while files already loaded stay intact.
//!
//! The completion list is rebuilt from every category's names at once,
//! sorted and deduplicated — the same name appearing in two categories is
//! merged silently.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};
use crate::store::HelpStore;
use crate::text::trimmed;

/// Help file names inside the data directory, one per category.
pub const HELP_HOST_FILE: &str = "help_host.json";
pub const HELP_GUI_FILE: &str = "help_gui.json";
pub const HELP_ALIAS_FILE: &str = "help_alias.json";

/// One record of a help document, as produced by the external loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HelpRecord {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brief: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Version stanza marker; a record carrying it is metadata, not a command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_json::Value>,
}

/// All three help categories plus the completion list built from them.
#[derive(Debug, Default, Clone)]
pub struct HelpCatalog {
    pub host: HelpStore,
    pub gui: HelpStore,
    pub alias: HelpStore,
    pub completions: Vec<String>,
}

/// Build one category store from parsed records.
///
/// Every valid name is also pushed onto `completions` individually, so
/// multi-named commands complete under each of their spellings. Entries are
/// sorted by name segment before the store is returned.
pub fn build_help_store(
    records: &[HelpRecord],
    completions: &mut Vec<String>,
) -> Result<HelpStore> {
    let mut store = HelpStore::new();
    let mut gathered = Vec::new();

    for record in records {
        if record.version.is_some() {
            continue;
        }
        let names: Vec<&str> = record
            .names
            .iter()
            .map(|n| trimmed(n))
            .filter(|n| !n.is_empty())
            .collect();
        store.append(
            &names,
            record.params.as_deref().unwrap_or(""),
            record.brief.as_deref().unwrap_or(""),
            record.details.as_deref().unwrap_or(""),
        )?;
        gathered.extend(names.iter().map(|n| (*n).to_string()));
    }

    store.sort_by_name();
    completions.extend(gathered);
    Ok(store)
}

/// Load one help file. Completions are merged only if the whole file parses
/// and ingests; on failure the error carries the path and nothing leaks.
pub fn load_help_file(path: &Path, completions: &mut Vec<String>) -> Result<HelpStore> {
    let mut fresh = Vec::new();
    let loaded = (|| -> Result<HelpStore> {
        let file = File::open(path)?;
        let records: Vec<HelpRecord> = serde_json::from_reader(BufReader::new(file))?;
        build_help_store(&records, &mut fresh)
    })();

    match loaded {
        Ok(store) => {
            completions.extend(fresh);
            Ok(store)
        }
        Err(e) => {
            log::error!("unable to load help file {}: {}", path.display(), e);
            Err(ConsoleError::Ingest {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        }
    }
}

/// Load the full catalog from a data directory.
///
/// The host and GUI references are mandatory — a broken one means a broken
/// installation, so the whole load fails. The alias file is user data and
/// may be missing on first run; that just means no aliases yet.
pub fn load_help_files(dir: &Path) -> Result<HelpCatalog> {
    let mut completions = Vec::new();
    let host = load_help_file(&dir.join(HELP_HOST_FILE), &mut completions)?;
    let gui = load_help_file(&dir.join(HELP_GUI_FILE), &mut completions)?;
    let alias = match load_help_file(&dir.join(HELP_ALIAS_FILE), &mut completions) {
        Ok(store) => store,
        Err(e) => {
            log::warn!("starting without aliases: {}", e);
            HelpStore::new()
        }
    };
    finish_completions(&mut completions);
    Ok(HelpCatalog {
        host,
        gui,
        alias,
        completions,
    })
}

/// Sort and deduplicate the completion list after any category changed.
pub fn finish_completions(completions: &mut Vec<String>) {
    completions.sort();
    completions.dedup();
}

/// Persist a store back to a help document. Used for the alias category,
/// whose records have a single name each, so the names segment maps back to
/// a one-element list.
pub fn save_help_file(store: &HelpStore, path: &Path) -> Result<()> {
    let records: Vec<HelpRecord> = store
        .entries()
        .iter()
        .map(|&entry| {
            let (names, params, brief, details) = store.extract(entry);
            let text = |bytes: &[u8]| String::from_utf8_lossy(bytes).into_owned();
            let optional = |bytes: &[u8]| {
                if bytes.is_empty() {
                    None
                } else {
                    Some(text(bytes))
                }
            };
            HelpRecord {
                names: vec![text(names)],
                params: optional(params),
                brief: optional(brief),
                details: optional(details),
                version: None,
            }
        })
        .collect();

    let file = File::create(path).inspect_err(|e| {
        log::error!("unable to open {} for writing: {}", path.display(), e);
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records)?;
    Ok(())
}
