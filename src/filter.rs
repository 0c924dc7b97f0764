// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The cascading incremental filter: search-as-you-type over a record store
//! without rescanning the whole arena on every keystroke.
//!
//! The trick is a ladder of query-length thresholds (the observed tuning is
//! `[3, 4, 6]`). Nothing is filtered below 3 characters. At 3 characters the
//! first tier scans the full index once and caches the matching subset. At 4
//! characters the second tier scans *that subset*, not the store. Past 6
//! characters the last tier re-filters only on further edits, again over the
//! tier above it. Each tier remembers the query prefix it was computed for,
//! so backspacing within a tier is free and a 10k-record transcript only
//! pays a full scan when the first three characters change.
//!
//! The filter never owns the store. `update` takes the arena and index by
//! reference and `current` hands the renderer either the source slice or a
//! cached tier — no transient allocations to track.

use crate::index::RecordIndex;
use crate::text::{clip_to_boundary, contains_folded, trimmed, uppercase_ascii};

/// The ladder every view in the console uses.
pub const DEFAULT_LADDER: [usize; 3] = [3, 4, 6];

/// Capacity of the live query buffer, matching the GUI input field.
pub const QUERY_BUFFER_MAX: usize = 255;

/// Tiered filter state for one record store.
#[derive(Debug, Clone)]
pub struct CascadeFilter<I> {
    /// Live query text, owned here so slash-commands can set it and the
    /// text-input collaborator can read it back.
    pub buffer: String,
    thresholds: Vec<usize>,
    /// Query prefix each tier was last computed for.
    prefixes: Vec<String>,
    /// Cached matching subset per tier.
    tiers: Vec<Vec<I>>,
    /// Which tier is authoritative; `None` means the unfiltered source.
    current: Option<usize>,
}

impl<I: RecordIndex> CascadeFilter<I> {
    /// Build a filter over an ascending ladder of minimum query lengths.
    pub fn new(thresholds: &[usize]) -> Self {
        assert!(!thresholds.is_empty(), "filter ladder cannot be empty");
        assert!(
            thresholds.windows(2).all(|w| w[0] < w[1]),
            "filter ladder must be strictly ascending"
        );
        Self {
            buffer: String::new(),
            thresholds: thresholds.to_vec(),
            prefixes: vec![String::new(); thresholds.len()],
            tiers: vec![Vec::new(); thresholds.len()],
            current: None,
        }
    }

    /// Forget all cached tiers and fall back to the unfiltered view.
    ///
    /// Must be called whenever the backing store mutates out-of-band
    /// (reload, clear, splice): a cached subset holds entries whose offsets
    /// may no longer be valid.
    pub fn clear(&mut self) {
        self.current = None;
        for prefix in &mut self.prefixes {
            prefix.clear();
        }
        for tier in &mut self.tiers {
            tier.clear();
        }
    }

    /// Re-evaluate the ladder against a (possibly unchanged) query.
    ///
    /// `force` recomputes every tier even on a cache hit — used right after
    /// an append so a brand-new record is correctly included or excluded
    /// instead of riding a stale cache.
    pub fn update(&mut self, data: &[u8], source: &[I], query: &str, force: bool) {
        let text = uppercase_ascii(trimmed(query));

        self.current = None;
        if text.len() < self.thresholds[0] || source.len() < 2 {
            return;
        }

        for i in 0..self.tiers.len() {
            if text.len() >= self.thresholds[i] {
                let cut = if i + 1 == self.tiers.len() {
                    text.len()
                } else {
                    self.thresholds[i].min(text.len())
                };
                let prefix = clip_to_boundary(&text, cut);

                if force || self.prefixes[i] != prefix {
                    let narrowed: Vec<I> = {
                        let scan: &[I] = match self.current {
                            None => source,
                            Some(level) => &self.tiers[level],
                        };
                        scan.iter()
                            .copied()
                            .filter(|entry| {
                                contains_folded(&data[entry.span()], prefix.as_bytes())
                            })
                            .collect()
                    };
                    self.prefixes[i] = prefix.to_string();
                    self.tiers[i] = narrowed;
                }
                self.current = Some(i);
            }
        }
    }

    /// The authoritative view for rendering: the full source or the current
    /// tier's cached subset.
    pub fn current<'a>(&'a self, source: &'a [I]) -> &'a [I] {
        match self.current {
            None => source,
            Some(level) => &self.tiers[level],
        }
    }

    /// Whether a filter is actually narrowing the view right now.
    pub fn is_filtered(&self) -> bool {
        self.current.is_some()
    }
}
