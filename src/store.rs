// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Record stores: one append-only byte arena plus its ordered index entries.
//!
//! Two concrete stores share the same contract. [`LogStore`] holds the
//! transcript — prompt-prefixed command/reply records with per-direction
//! sequence counters. [`HelpStore`] holds command-reference records with four
//! segments each, and is the one store that supports mid-arena removal (the
//! alias subsystem deletes records in place, see [`HelpStore::remove`]).
//!
//! `extract` is the single accessor for record text. Filtering, rendering,
//! persistence, and alias lookup all go through it rather than recomputing
//! offsets, and the slices it returns borrow the arena — valid until the next
//! mutating call, which the borrow checker enforces for free.

use std::borrow::Cow;

use chrono::NaiveDateTime;

use crate::error::{ConsoleError, Result};
use crate::index::{
    HelpIndex, LogIndex, RecordIndex, HELP_BRIEF_MAX, HELP_DETAILS_MAX, HELP_NAMES_MAX,
    HELP_PARAMS_MAX, LOG_END_MAX, LOG_MID_MAX,
};
use crate::text::{clip_segment, trimmed, trimmed_line};

/// Timestamp layout of the rendered prompt prefix.
pub const PROMPT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// LOG STORE
// ============================================================================

/// The scrolling transcript: every command issued and every reply received,
/// in arrival order.
#[derive(Debug, Default, Clone)]
pub struct LogStore {
    data: Vec<u8>,
    index: Vec<LogIndex>,
    counter_in: u32,
    counter_out: u32,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogIndex] {
        &self.index
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// How many incoming (reply) records have ever been appended.
    pub fn counter_in(&self) -> u32 {
        self.counter_in
    }

    /// How many outgoing (command) records have ever been appended.
    pub fn counter_out(&self) -> u32 {
        self.counter_out
    }

    /// Append one record, stamped with the current local time.
    pub fn append(&mut self, outgoing: bool, msg: &str) -> LogIndex {
        self.append_at(outgoing, msg, chrono::Local::now().naive_local())
    }

    /// Append one record with an explicit timestamp.
    ///
    /// Renders the `[time]<seq><dir> ` prompt, bumps the matching direction
    /// counter, clips the message to field capacity and pushes both into the
    /// arena back-to-back.
    pub fn append_at(&mut self, outgoing: bool, msg: &str, when: NaiveDateTime) -> LogIndex {
        let seq = if outgoing {
            self.counter_out += 1;
            self.counter_out
        } else {
            self.counter_in += 1;
            self.counter_in
        };
        let marker = if outgoing { '>' } else { '<' };
        let prompt = format!("[{}]{}{} ", when.format(PROMPT_TIME_FORMAT), seq, marker);

        let msg = clip_segment(trimmed(msg), LOG_END_MAX - prompt.len(), "log message");

        let entry = LogIndex::new(
            self.data.len() as u32,
            outgoing,
            prompt.len(),
            prompt.len() + msg.len(),
        );
        self.data.extend_from_slice(prompt.as_bytes());
        self.data.extend_from_slice(msg.as_bytes());
        self.index.push(entry);
        entry
    }

    /// Borrowed views of the two segments: `(prompt, message)`.
    pub fn extract(&self, entry: LogIndex) -> (&[u8], &[u8]) {
        let begin = entry.begin();
        (
            &self.data[begin..begin + entry.mid()],
            &self.data[begin + entry.mid()..begin + entry.end()],
        )
    }

    /// Full rendered text of one record, for persistence and display.
    pub fn rendered(&self, entry: LogIndex) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data[entry.span()])
    }

    /// Drop everything: arena, index, counters. Irreversible.
    pub fn clear(&mut self) {
        self.data.clear();
        self.index.clear();
        self.counter_in = 0;
        self.counter_out = 0;
    }

    /// Push an already-rendered line reloaded from a transcript file.
    ///
    /// The on-disk format cannot describe a prompt longer than the `mid`
    /// field or a line longer than the `end` field, but a hand-edited file
    /// can; both get clamped rather than rejected.
    pub(crate) fn push_parsed(&mut self, row: &str, outgoing: bool, mid: usize) {
        let row = clip_segment(row, LOG_END_MAX, "transcript line");
        let mid = mid.min(row.len()).min(LOG_MID_MAX);
        let entry = LogIndex::new(self.data.len() as u32, outgoing, mid, row.len());
        self.data.extend_from_slice(row.as_bytes());
        self.index.push(entry);
    }

    pub(crate) fn set_counters(&mut self, counter_in: u32, counter_out: u32) {
        self.counter_in = counter_in;
        self.counter_out = counter_out;
    }
}

// ============================================================================
// HELP STORE
// ============================================================================

/// Command-reference records: names, parameter signature, brief, details.
#[derive(Debug, Default, Clone)]
pub struct HelpStore {
    data: Vec<u8>,
    index: Vec<HelpIndex>,
}

impl HelpStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HelpIndex] {
        &self.index
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Append one record. The first non-empty trimmed name is the primary
    /// name; any further names join the same segment separated by a single
    /// space (that is how the reference pane displays them). A record with no
    /// usable name is rejected whole.
    pub fn append(
        &mut self,
        names: &[&str],
        params: &str,
        brief: &str,
        details: &str,
    ) -> Result<HelpIndex> {
        let mut names_seg = String::new();
        for name in names {
            let name = trimmed(name);
            if name.is_empty() {
                continue;
            }
            if !names_seg.is_empty() {
                names_seg.push(' ');
            }
            names_seg.push_str(name);
        }
        if names_seg.is_empty() {
            return Err(ConsoleError::Record("missing valid 'names'".into()));
        }

        let names_seg = clip_segment(&names_seg, HELP_NAMES_MAX, "help names");
        let params = clip_segment(trimmed(params), HELP_PARAMS_MAX, "help params");
        let brief = clip_segment(trimmed(brief), HELP_BRIEF_MAX, "help brief");
        let details = clip_segment(trimmed_line(details), HELP_DETAILS_MAX, "help details");

        let entry = HelpIndex::new(
            self.data.len() as u32,
            names_seg.len(),
            params.len(),
            brief.len(),
            details.len(),
        );
        self.data.extend_from_slice(names_seg.as_bytes());
        self.data.extend_from_slice(params.as_bytes());
        self.data.extend_from_slice(brief.as_bytes());
        self.data.extend_from_slice(details.as_bytes());
        self.index.push(entry);
        Ok(entry)
    }

    /// Borrowed views of the four segments:
    /// `(names, params, brief, details)`. Empty optional segments come back
    /// as empty slices.
    pub fn extract(&self, entry: HelpIndex) -> (&[u8], &[u8], &[u8], &[u8]) {
        let begin = entry.begin();
        let [names, params, brief, details] = entry.offsets();
        (
            &self.data[begin..begin + names],
            &self.data[begin + names..begin + params],
            &self.data[begin + params..begin + brief],
            &self.data[begin + brief..begin + details],
        )
    }

    /// The names segment alone; sort key and alias lookup key.
    pub fn name_of(&self, entry: HelpIndex) -> &[u8] {
        let begin = entry.begin();
        &self.data[begin..begin + entry.names_len()]
    }

    /// Sort entries by a case-sensitive comparison of their name segments.
    pub fn sort_by_name(&mut self) {
        let data = &self.data;
        self.index.sort_unstable_by(|a, b| {
            let na = &data[a.begin()..a.begin() + a.names_len()];
            let nb = &data[b.begin()..b.begin() + b.names_len()];
            na.cmp(nb)
        });
    }

    /// Splice one record out of the arena.
    ///
    /// Erases exactly the record's byte span, drops its index entry, and
    /// slides the `begin` of every later entry back by the removed length.
    /// Callers observe either the pre- or the post-removal store, never a
    /// half-repaired one.
    pub fn remove(&mut self, pos: usize) {
        let entry = self.index.remove(pos);
        let removed = entry.len();
        self.data.drain(entry.span());
        for later in &mut self.index[pos..] {
            later.shift_back(removed);
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.index.clear();
    }
}
