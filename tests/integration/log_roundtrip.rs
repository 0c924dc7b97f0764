//! Transcript round-trip and the cascade ladder, end to end.

use super::common::{build_help, build_log, messages, stamp};
use scrollback::{load_log, save_log, CascadeFilter, LogStore, DEFAULT_LADDER};

#[test]
fn transcript_scenario_counters_survive_reload() {
    let mut store = LogStore::new();
    assert_eq!((store.counter_in(), store.counter_out()), (0, 0));

    store.append_at(true, "help", stamp(0));
    assert_eq!(store.counter_out(), 1);

    store.append_at(false, "no match", stamp(1));
    assert_eq!(store.counter_in(), 1);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("default.log");
    save_log(&store, &path).unwrap();

    let reloaded = load_log(&path).unwrap();
    assert_eq!(reloaded.len(), 2);
    for (&a, &b) in store.entries().iter().zip(reloaded.entries()) {
        assert_eq!(store.rendered(a), reloaded.rendered(b));
    }
    assert_eq!(reloaded.counter_in(), 1);
    assert_eq!(reloaded.counter_out(), 1);
}

#[test]
fn repeated_save_load_cycles_are_stable() {
    let mut store = build_log(&[
        (true, "tgm"),
        (false, "God mode on"),
        (true, "player.additem f 100"),
        (false, "Item added"),
    ]);

    let dir = tempfile::tempdir().unwrap();
    for round in 0..3 {
        let path = dir.path().join(format!("round{round}.log"));
        save_log(&store, &path).unwrap();
        let reloaded = load_log(&path).unwrap();
        assert_eq!(messages(&reloaded), messages(&store));
        assert_eq!(reloaded.counter_in(), store.counter_in());
        assert_eq!(reloaded.counter_out(), store.counter_out());
        store = reloaded;
    }
}

#[test]
fn help_ladder_scenario() {
    let help = build_help(&[
        ("ADD", "", "adds a thing"),
        ("ADDITEM", "<id>", "adds an item"),
        ("REMOVE", "", "removes a thing"),
    ]);
    let mut filter = CascadeFilter::new(&DEFAULT_LADDER);

    // Below the first threshold: full, unfiltered view.
    filter.update(help.data(), help.entries(), "AD", false);
    assert_eq!(filter.current(help.entries()).len(), 3);

    // Tier 0 at three characters.
    filter.update(help.data(), help.entries(), "ADD", false);
    let names: Vec<&[u8]> = filter
        .current(help.entries())
        .iter()
        .map(|&e| help.name_of(e))
        .collect();
    assert_eq!(names, vec![&b"ADD"[..], b"ADDITEM"]);

    // Tier 1 narrows tier 0's subset, not the store.
    filter.update(help.data(), help.entries(), "ADDI", false);
    let names: Vec<&[u8]> = filter
        .current(help.entries())
        .iter()
        .map(|&e| help.name_of(e))
        .collect();
    assert_eq!(names, vec![&b"ADDITEM"[..]]);
}

#[test]
fn filtered_view_survives_reload_only_after_clear() {
    let store = build_log(&[
        (true, "player.additem f 100"),
        (true, "tgm"),
        (true, "player.additem a 5"),
    ]);
    let mut filter = CascadeFilter::new(&DEFAULT_LADDER);
    filter.update(store.data(), store.entries(), "additem", false);
    assert_eq!(filter.current(store.entries()).len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("view.log");
    save_log(&store, &path).unwrap();
    let reloaded = load_log(&path).unwrap();

    // The store was replaced out-of-band: clear, then re-apply.
    filter.clear();
    assert_eq!(filter.current(reloaded.entries()).len(), 3);
    filter.update(reloaded.data(), reloaded.entries(), "additem", false);
    assert_eq!(filter.current(reloaded.entries()).len(), 2);
}
