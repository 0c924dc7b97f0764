//! Full console startup and command flow against a real data directory.

use std::path::Path;

use scrollback::help::{HELP_ALIAS_FILE, HELP_GUI_FILE, HELP_HOST_FILE};
use scrollback::{Console, Event, Executor, FilterTarget, HelpRecord, Settings};

use super::common::messages;

struct EchoHost {
    calls: Vec<String>,
}

impl Executor for EchoHost {
    fn execute(&mut self, command: &str) -> Option<String> {
        self.calls.push(command.to_string());
        Some(format!("ran: {command}"))
    }
}

fn write_help(dir: &Path, file: &str, names: &[&str]) {
    let records: Vec<HelpRecord> = names
        .iter()
        .map(|n| HelpRecord {
            names: vec![(*n).to_string()],
            brief: Some(format!("{n} brief")),
            ..HelpRecord::default()
        })
        .collect();
    std::fs::write(dir.join(file), serde_json::to_string(&records).unwrap()).unwrap();
}

fn seed_data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    Settings::default()
        .save(&dir.path().join("settings.json"))
        .unwrap();
    write_help(dir.path(), HELP_HOST_FILE, &["AddItem", "ToggleGodMode", "tgm"]);
    write_help(dir.path(), HELP_GUI_FILE, &["/clear", "/save", "/load"]);
    dir
}

#[test]
fn setup_loads_settings_help_and_tolerates_missing_transcript() {
    let dir = seed_data_dir();
    let console = Console::setup(dir.path()).unwrap();

    assert_eq!(console.settings, Settings::default());
    assert_eq!(console.host_help.len(), 3);
    assert_eq!(console.gui_help.len(), 3);
    assert!(console.alias_help.is_empty());
    assert!(console.log.is_empty());
    // Completions merge both categories, sorted.
    assert_eq!(
        console.completions,
        vec!["/clear", "/load", "/save", "AddItem", "ToggleGodMode", "tgm"]
    );
}

#[test]
fn setup_fails_without_a_host_reference() {
    let dir = tempfile::tempdir().unwrap();
    Settings::default()
        .save(&dir.path().join("settings.json"))
        .unwrap();
    assert!(Console::setup(dir.path()).is_err());
}

#[test]
fn session_survives_a_save_load_cycle() {
    let dir = seed_data_dir();
    let mut console = Console::setup(dir.path()).unwrap();
    let mut host = EchoHost { calls: Vec::new() };

    console.dispatch(Event::Submit("tgm".to_string()), &mut host);
    console.dispatch(Event::Submit("tcl".to_string()), &mut host);
    console.dispatch(Event::Submit("/save session".to_string()), &mut host);

    // A fresh console reloads the very same session.
    let mut restored = Console::setup(dir.path()).unwrap();
    restored.dispatch(Event::Submit("/load session".to_string()), &mut host);
    let lines = messages(&restored.log);
    assert!(lines.contains(&"tgm".to_string()));
    assert!(lines.contains(&"ran: tgm".to_string()));
    assert!(lines.contains(&"tcl".to_string()));
    assert_eq!(restored.log.counter_out(), 3); // tgm, tcl, /save session
    assert_eq!(restored.log.counter_in(), 2);
}

#[test]
fn aliases_survive_a_help_reload() {
    let dir = seed_data_dir();
    let mut console = Console::setup(dir.path()).unwrap();
    let mut host = EchoHost { calls: Vec::new() };

    console.dispatch(
        Event::Submit("/alias give player.additem <id> <count>".to_string()),
        &mut host,
    );
    assert!(dir.path().join(HELP_ALIAS_FILE).exists());

    // Simulate a restart: a brand-new console picks the alias up from disk.
    let mut fresh = Console::setup(dir.path()).unwrap();
    assert_eq!(fresh.alias_help.len(), 1);
    assert!(fresh.completions.iter().any(|c| c == ".give"));

    fresh.dispatch(Event::Submit(".give f 100".to_string()), &mut host);
    assert_eq!(host.calls, vec!["player.additem f 100"]);
}

#[test]
fn filter_events_are_per_view() {
    let dir = seed_data_dir();
    let mut console = Console::setup(dir.path()).unwrap();
    let mut host = EchoHost { calls: Vec::new() };

    console.dispatch(
        Event::FilterChanged(FilterTarget::Host, "addit".to_string()),
        &mut host,
    );
    let visible = console.host_filter.current(console.host_help.entries());
    assert_eq!(visible.len(), 1);
    assert_eq!(console.host_help.name_of(visible[0]), b"AddItem");

    // The GUI view keeps its own, untouched state.
    assert!(!console.gui_filter.is_filtered());
    assert_eq!(
        console.gui_filter.current(console.gui_help.entries()).len(),
        3
    );
}

#[test]
fn completion_spans_help_and_aliases() {
    let dir = seed_data_dir();
    let mut console = Console::setup(dir.path()).unwrap();
    let mut host = EchoHost { calls: Vec::new() };

    console.dispatch(
        Event::Submit("/alias addmoney player.additem f <n>".to_string()),
        &mut host,
    );

    assert_eq!(console.complete("ADDI"), vec!["AddItem"]);
    assert_eq!(console.complete(".add"), vec![".addmoney"]);
    assert_eq!(console.complete("togg"), vec!["ToggleGodMode"]);
}
