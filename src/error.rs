// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the console library.
//!
//! Only two things are hard failures here: I/O and a structurally invalid
//! help record (which aborts its whole file). Everything else — oversized
//! segments, unparseable transcript lines — is a logged diagnostic and the
//! operation keeps going.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A help record that cannot be indexed at all (e.g. no usable name).
    #[error("help record rejected: {0}")]
    Record(String),

    /// A help file that failed to load; earlier files stay intact.
    #[error("unable to load help file {path}: {reason}")]
    Ingest { path: String, reason: String },
}
