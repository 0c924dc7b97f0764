//! The cascade must be indistinguishable from a direct scan, no matter how
//! the query and the store got into their current state.

use proptest::prelude::*;

use scrollback::index::RecordIndex;
use scrollback::text::{contains_folded, trimmed, uppercase_ascii};
use scrollback::{CascadeFilter, HelpIndex, HelpStore, DEFAULT_LADDER};

use super::common::stamp;

/// One step of live usage: an edit to the query, or a store append followed
/// by the forced refresh the console performs.
#[derive(Debug, Clone)]
enum Step {
    Type(char),
    Backspace,
    Append(String),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => proptest::char::range('a', 'z').prop_map(Step::Type),
        2 => Just(Step::Backspace),
        1 => proptest::string::string_regex("[a-z]{1,12}")
            .unwrap()
            .prop_map(Step::Append),
    ]
}

fn seed_store() -> HelpStore {
    let mut store = HelpStore::new();
    for name in ["add", "additem", "addspell", "remove", "removeall", "tgm"] {
        store
            .append(&[name], "", &format!("{name} brief text"), "")
            .unwrap();
    }
    store
}

/// What the ladder actually applies for a query of this length.
fn effective_prefix(query: &str) -> Option<String> {
    let text = uppercase_ascii(trimmed(query));
    if text.len() < DEFAULT_LADDER[0] {
        return None;
    }
    let last = *DEFAULT_LADDER.last().unwrap();
    if text.len() >= last {
        return Some(text);
    }
    let crossed = DEFAULT_LADDER
        .iter()
        .rev()
        .find(|&&t| text.len() >= t)
        .unwrap();
    Some(text[..*crossed].to_string())
}

fn direct_scan(store: &HelpStore, query: &str) -> Vec<HelpIndex> {
    match effective_prefix(query) {
        None => store.entries().to_vec(),
        Some(_) if store.len() < 2 => store.entries().to_vec(),
        Some(folded) => store
            .entries()
            .iter()
            .copied()
            .filter(|e| contains_folded(&store.data()[e.span()], folded.as_bytes()))
            .collect(),
    }
}

proptest! {
    #[test]
    fn cascade_view_always_equals_direct_scan(steps in proptest::collection::vec(step_strategy(), 0..40)) {
        let mut store = seed_store();
        let mut filter = CascadeFilter::new(&DEFAULT_LADDER);
        let mut query = String::new();

        for step in steps {
            match step {
                Step::Type(c) => {
                    query.push(c);
                    filter.update(store.data(), store.entries(), &query, false);
                }
                Step::Backspace => {
                    query.pop();
                    filter.update(store.data(), store.entries(), &query, false);
                }
                Step::Append(name) => {
                    store.append(&[&name], "", "", "").unwrap();
                    // Same force-refresh the console runs after an append.
                    filter.update(store.data(), store.entries(), &query, true);
                }
            }

            let visible = filter.current(store.entries());
            let expected = direct_scan(&store, &query);
            prop_assert_eq!(visible.len(), expected.len());
            for (a, b) in visible.iter().zip(&expected) {
                prop_assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn log_stores_filter_identically(queries in proptest::collection::vec("[a-z]{0,8}", 1..6)) {
        use scrollback::LogStore;

        let mut store = LogStore::new();
        for (i, name) in ["additem", "addspell", "removeitem", "tgm", "tcl"].iter().enumerate() {
            store.append_at(i % 2 == 0, &format!("player.{name}"), stamp(i as u32));
        }

        let mut filter = CascadeFilter::new(&DEFAULT_LADDER);
        for query in &queries {
            filter.update(store.data(), store.entries(), query, false);

            let expected: Vec<_> = match effective_prefix(query) {
                None => store.entries().to_vec(),
                Some(folded) => store
                    .entries()
                    .iter()
                    .copied()
                    .filter(|e| contains_folded(&store.data()[e.span()], folded.as_bytes()))
                    .collect(),
            };
            let visible = filter.current(store.entries());
            prop_assert_eq!(visible.len(), expected.len());
        }
    }
}
