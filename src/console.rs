// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The console context: every store, filter, and queue in one place.
//!
//! [`Console`] is constructed once at startup and passed to whoever needs it
//! — input handling, rendering, persistence. There are no ambient globals;
//! ownership and initialization order stay explicit and testable.
//!
//! Everything runs on one logical thread. External happenings (a submitted
//! line, a timer tick, a filter edit) arrive as [`Event`]s and each dispatch
//! runs to completion before the next, so no operation ever observes another
//! one mid-flight. The host process itself is behind the [`Executor`] trait:
//! the console hands it a command string and gets back the host's reply
//! text, if it produced any.
//!
//! Slash-commands are handled here rather than in the host: transcript
//! load/save/clear, script runs, filter presets, and the alias subsystem
//! (the one place that splices records out of the middle of an arena).

use std::path::PathBuf;

use crate::error::Result;
use crate::filter::{CascadeFilter, DEFAULT_LADDER, QUERY_BUFFER_MAX};
use crate::help::{
    finish_completions, load_help_files, save_help_file, HelpCatalog, HELP_ALIAS_FILE,
};
use crate::index::{HelpIndex, LogIndex};
use crate::settings::Settings;
use crate::store::{HelpStore, LogStore};
use crate::text::{clip_to_boundary, trimmed, uppercase_ascii};
use crate::transcript::{load_log, load_run, save_log};

/// Settings file name inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";
/// Transcript loaded at startup and targeted by bare `/save`/`/load` names.
pub const DEFAULT_LOG_FILE: &str = "default.log";

/// The host side of command execution.
///
/// `execute` runs one command in the host process and returns its last log
/// message — the text the transcript records as the reply. A host that
/// prints nothing returns `None`.
pub trait Executor {
    fn execute(&mut self, command: &str) -> Option<String>;
}

/// Which view a filter edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTarget {
    Log,
    Host,
    Gui,
    Alias,
}

/// External happenings, dispatched one at a time.
#[derive(Debug, Clone)]
pub enum Event {
    /// A line submitted from the input field.
    Submit(String),
    /// One scheduler tick: run the next queued command, if any.
    Tick,
    /// A filter input changed.
    FilterChanged(FilterTarget, String),
}

/// The whole console state.
pub struct Console {
    pub log: LogStore,
    pub log_filter: CascadeFilter<LogIndex>,

    pub host_help: HelpStore,
    pub host_filter: CascadeFilter<HelpIndex>,
    pub gui_help: HelpStore,
    pub gui_filter: CascadeFilter<HelpIndex>,
    pub alias_help: HelpStore,
    pub alias_filter: CascadeFilter<HelpIndex>,

    /// Sorted, deduplicated names from every help category plus aliases.
    pub completions: Vec<String>,

    pub settings: Settings,

    /// Renderer flag: copy the visible log on the next frame.
    pub log_to_clipboard: bool,

    /// Queued script commands, drained from the back — one per tick.
    commands: Vec<String>,
    data_dir: PathBuf,
    history: usize,
    last_recall: String,
}

impl Console {
    /// An empty console rooted at a data directory. Help files, settings and
    /// the default transcript are loaded separately (see [`Console::setup`]).
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            log: LogStore::new(),
            log_filter: CascadeFilter::new(&DEFAULT_LADDER),
            host_help: HelpStore::new(),
            host_filter: CascadeFilter::new(&DEFAULT_LADDER),
            gui_help: HelpStore::new(),
            gui_filter: CascadeFilter::new(&DEFAULT_LADDER),
            alias_help: HelpStore::new(),
            alias_filter: CascadeFilter::new(&DEFAULT_LADDER),
            completions: Vec::new(),
            settings: Settings::default(),
            log_to_clipboard: false,
            commands: Vec::new(),
            data_dir: data_dir.into(),
            history: 0,
            last_recall: String::new(),
        }
    }

    /// Full startup: settings and help references must load (a broken one
    /// means a broken installation); a missing default transcript is fine.
    pub fn setup(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut console = Self::new(data_dir);
        console.settings = Settings::load(&console.data_dir.join(SETTINGS_FILE))?;
        console.reload_help()?;
        match load_log(&console.data_dir.join(DEFAULT_LOG_FILE)) {
            Ok(store) => console.log = store,
            Err(e) => log::warn!("starting with an empty transcript: {}", e),
        }
        Ok(console)
    }

    /// Replace the help catalog wholesale (initial load or `/reload`-style
    /// flows). Filters are cleared since every cached entry went stale.
    pub fn attach_help(&mut self, catalog: HelpCatalog) {
        self.host_help = catalog.host;
        self.gui_help = catalog.gui;
        self.alias_help = catalog.alias;
        self.completions = catalog.completions;
        self.host_filter.clear();
        self.gui_filter.clear();
        self.alias_filter.clear();
    }

    pub fn reload_help(&mut self) -> Result<()> {
        let catalog = load_help_files(&self.data_dir)?;
        self.attach_help(catalog);
        Ok(())
    }

    pub fn save_settings(&self) -> Result<()> {
        self.settings.save(&self.data_dir.join(SETTINGS_FILE))
    }

    pub fn reload_settings(&mut self) -> Result<()> {
        self.settings = Settings::load(&self.data_dir.join(SETTINGS_FILE))?;
        Ok(())
    }

    /// Dispatch one external event to completion.
    pub fn dispatch(&mut self, event: Event, host: &mut dyn Executor) {
        match event {
            Event::Submit(text) => self.submit(&text, host),
            Event::Tick => {
                self.tick(host);
            }
            Event::FilterChanged(target, text) => self.set_filter(target, &text),
        }
    }

    /// How many script commands are still queued.
    pub fn queued(&self) -> usize {
        self.commands.len()
    }

    /// Run the next queued command. Returns whether more remain — the
    /// embedder keeps its timer alive while this is true.
    pub fn tick(&mut self, host: &mut dyn Executor) -> bool {
        if let Some(cmd) = self.commands.pop() {
            self.submit(&cmd, host);
        }
        !self.commands.is_empty()
    }

    /// Handle one submitted line: record it, route it, record the reply,
    /// and force-refresh the log filter so the new records are classified
    /// under the live query instead of riding a stale cache.
    pub fn submit(&mut self, raw: &str, host: &mut dyn Executor) {
        let cmd = trimmed(raw);
        if cmd.is_empty() {
            return;
        }
        self.log.append(true, cmd);

        let mut pending = cmd.to_string();
        let mut reply = String::new();

        if pending.starts_with('/') {
            reply = self.gui_command(&pending).unwrap_or_default();
            pending.clear();
        } else if pending.starts_with('.') && pending.len() > 1 {
            match self.expand_alias(&pending) {
                Some(expanded) => pending = expanded,
                None => {
                    reply = "Unable to execute an alias.".to_string();
                    pending.clear();
                }
            }
        }

        if !reply.is_empty() {
            self.log.append(false, &reply);
            pending.clear();
        }

        if !pending.is_empty() {
            if let Some(result) = host.execute(&pending) {
                if !result.is_empty() {
                    self.log.append(false, &result);
                }
            }
        }

        self.history = self.log.len();
        self.last_recall.clear();
        self.refresh_log_filter();
    }

    /// Apply a filter edit to one view.
    pub fn set_filter(&mut self, target: FilterTarget, text: &str) {
        let text = clip_to_boundary(text, QUERY_BUFFER_MAX).to_string();
        match target {
            FilterTarget::Log => {
                self.log_filter.buffer = text.clone();
                self.log_filter
                    .update(self.log.data(), self.log.entries(), &text, false);
            }
            FilterTarget::Host => {
                self.host_filter.buffer = text.clone();
                self.host_filter
                    .update(self.host_help.data(), self.host_help.entries(), &text, false);
            }
            FilterTarget::Gui => {
                self.gui_filter.buffer = text.clone();
                self.gui_filter
                    .update(self.gui_help.data(), self.gui_help.entries(), &text, false);
            }
            FilterTarget::Alias => {
                self.alias_filter.buffer = text.clone();
                self.alias_filter.update(
                    self.alias_help.data(),
                    self.alias_help.entries(),
                    &text,
                    false,
                );
            }
        }
    }

    /// Prefix completion over the shared name list. Word fragments shorter
    /// than two characters are ignored — completing those is noise.
    pub fn complete(&self, word: &str) -> Vec<&str> {
        let prefix = uppercase_ascii(trimmed(word));
        if prefix.len() < 2 {
            return Vec::new();
        }
        self.completions
            .iter()
            .filter(|name| uppercase_ascii(name).starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }

    /// Recall the previous outgoing command, skipping adjacent duplicates.
    pub fn history_prev(&mut self) -> Option<String> {
        self.navigate_history(-1)
    }

    /// Recall the next outgoing command.
    pub fn history_next(&mut self) -> Option<String> {
        self.navigate_history(1)
    }

    fn navigate_history(&mut self, step: isize) -> Option<String> {
        if self.log.is_empty() {
            return None;
        }
        let last = self.log.len() as isize - 1;
        let mut i = (self.history as isize).saturating_add(step).clamp(0, last);
        while (0..=last).contains(&i) {
            let entry = self.log.entries()[i as usize];
            if entry.outgoing() {
                let (_, msg) = self.log.extract(entry);
                let msg = String::from_utf8_lossy(msg).into_owned();
                if msg != self.last_recall {
                    self.history = i as usize;
                    self.last_recall = msg.clone();
                    return Some(msg);
                }
            }
            i += step;
        }
        // Nothing earlier/later: stick with the current valid choice.
        let entry = *self.log.entries().get(self.history)?;
        if entry.outgoing() {
            let (_, msg) = self.log.extract(entry);
            return Some(String::from_utf8_lossy(msg).into_owned());
        }
        None
    }

    // ------------------------------------------------------------------
    // slash-commands
    // ------------------------------------------------------------------

    /// Handle a `/` command. Returns the reply to record, if any.
    fn gui_command(&mut self, cmd: &str) -> Option<String> {
        if let Some(param) = match_param(cmd, "/run ") {
            return self.run_file(param);
        }
        if cmd == "/run-enough" {
            self.commands.clear();
            return None;
        }
        if cmd == "/copy" {
            self.log_to_clipboard = true;
            return None;
        }
        if cmd == "/clear" {
            self.log.clear();
            self.log_filter.clear();
            self.history = 0;
            self.last_recall.clear();
            return None;
        }
        if let Some(param) = match_param(cmd, "/load ") {
            return self.load_transcript(param);
        }
        if let Some(param) = match_param(cmd, "/save ") {
            let path = self.data_dir.join(format!("{param}.log"));
            if let Err(e) = save_log(&self.log, &path) {
                log::warn!("transcript save failed: {}", e);
            }
            return None;
        }
        if let Some(param) = match_param(cmd, "/filter-alias") {
            self.set_filter(FilterTarget::Alias, param);
            return None;
        }
        if let Some(param) = match_param(cmd, "/filter-host") {
            self.set_filter(FilterTarget::Host, param);
            return None;
        }
        if let Some(param) = match_param(cmd, "/filter-gui") {
            self.set_filter(FilterTarget::Gui, param);
            return None;
        }
        if let Some(param) = match_param(cmd, "/filter") {
            self.set_filter(FilterTarget::Log, param);
            return None;
        }
        if let Some(param) = match_param(cmd, "/alias-delete ") {
            if !param.is_empty() && self.delete_alias(param) {
                return None;
            }
            return Some("Unable to delete an alias.".to_string());
        }
        if let Some(param) = match_param(cmd, "/alias ") {
            if self.create_alias(param) {
                return None;
            }
            return Some("Unable to create an alias.".to_string());
        }
        Some("Unknown GUI command.".to_string())
    }

    fn run_file(&mut self, param: &str) -> Option<String> {
        match load_run(&self.data_dir.join(param)) {
            Ok(queue) if !queue.is_empty() => {
                self.commands = queue;
                None
            }
            _ => Some("Unable to run script file.".to_string()),
        }
    }

    fn load_transcript(&mut self, param: &str) -> Option<String> {
        match load_log(&self.data_dir.join(format!("{param}.log"))) {
            Ok(store) => {
                self.log = store;
                self.history = 0;
                self.last_recall.clear();
                self.log_filter.clear();
                None
            }
            Err(_) => Some("Unable to load log file.".to_string()),
        }
    }

    // ------------------------------------------------------------------
    // aliases
    // ------------------------------------------------------------------

    /// Create `.name` from `name body...`. The body's `<placeholder>` spans
    /// become the parameter signature. Fails on a malformed definition or a
    /// name collision.
    fn create_alias(&mut self, param: &str) -> bool {
        let Some(split) = param.find(' ') else {
            return false;
        };
        let name = format!(".{}", &param[..split]);
        let body = trimmed(&param[split..]);
        if body.is_empty() || self.completions.iter().any(|c| c == &name) {
            return false;
        }

        let placeholders = extract_placeholders(body);
        if self
            .alias_help
            .append(&[&name], &placeholders, body, "")
            .is_err()
        {
            return false;
        }

        self.completions.push(name);
        finish_completions(&mut self.completions);
        self.refresh_alias_filter();
        self.persist_aliases();
        true
    }

    /// Delete `.name`, splicing its record out of the alias arena.
    fn delete_alias(&mut self, param: &str) -> bool {
        let name = format!(".{param}");
        let Some(pos) = self
            .alias_help
            .entries()
            .iter()
            .position(|&e| self.alias_help.name_of(e) == name.as_bytes())
        else {
            return false;
        };

        self.alias_help.remove(pos);
        self.completions.retain(|c| c != &name);
        self.refresh_alias_filter();
        self.persist_aliases();
        true
    }

    /// Expand a `.alias` invocation into its stored body, substituting
    /// `<placeholder>` spans with the call's arguments in order. `None`
    /// means unknown alias or arity mismatch.
    fn expand_alias(&self, cmd: &str) -> Option<String> {
        let actuals: Vec<&str> = cmd.split(' ').filter(|s| !s.is_empty()).collect();
        let head = *actuals.first()?;

        let mut params = String::new();
        let mut body = String::new();
        for &entry in self.alias_help.entries() {
            let (names, p, b, _) = self.alias_help.extract(entry);
            if names == head.as_bytes() {
                params = String::from_utf8_lossy(p).into_owned();
                body = String::from_utf8_lossy(b).into_owned();
                break;
            }
        }

        if !params.is_empty() {
            let args = &actuals[1..];
            let arity = params.split(' ').filter(|s| !s.is_empty()).count();
            if args.len() != arity {
                return None;
            }
            body = substitute_placeholders(&body, args);
        }

        if body.is_empty() {
            None
        } else {
            Some(body)
        }
    }

    fn persist_aliases(&self) {
        let path = self.data_dir.join(HELP_ALIAS_FILE);
        if let Err(e) = save_help_file(&self.alias_help, &path) {
            log::warn!("unable to persist aliases: {}", e);
        }
    }

    /// Splice and create both invalidate cached offsets; clear every tier
    /// and re-apply the live query in one go.
    fn refresh_alias_filter(&mut self) {
        self.alias_filter.clear();
        let query = self.alias_filter.buffer.clone();
        self.alias_filter.update(
            self.alias_help.data(),
            self.alias_help.entries(),
            &query,
            true,
        );
    }

    fn refresh_log_filter(&mut self) {
        let query = self.log_filter.buffer.clone();
        self.log_filter
            .update(self.log.data(), self.log.entries(), &query, true);
    }
}

/// `strip_prefix` plus the surrounding-space trim every slash-command wants.
fn match_param<'a>(cmd: &'a str, prefix: &str) -> Option<&'a str> {
    cmd.strip_prefix(prefix).map(trimmed)
}

/// Collect the `<...>` spans of an alias body, space-separated, in order.
fn extract_placeholders(body: &str) -> String {
    let mut out = String::new();
    let mut rest = body;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&rest[open..=open + close]);
        rest = &rest[open + close + 1..];
    }
    out
}

/// Replace successive `<...>` spans with `args`, in order.
fn substitute_placeholders(body: &str, args: &[&str]) -> String {
    let mut out = String::new();
    let mut rest = body;
    let mut args = args.iter();
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let Some(arg) = args.next() else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str(arg);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}
