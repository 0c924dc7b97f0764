//! Arena splice invariants: removal shifts coordinates, never content.

use proptest::prelude::*;

use scrollback::index::RecordIndex;
use scrollback::{CascadeFilter, HelpStore, DEFAULT_LADDER};

fn record_strategy() -> impl Strategy<Value = (String, String, String)> {
    (
        proptest::string::string_regex("[a-z.]{1,20}").unwrap(),
        proptest::string::string_regex("(<[a-z]{1,6}> ?){0,3}").unwrap(),
        proptest::string::string_regex("[a-z0-9 .]{0,60}").unwrap(),
    )
}

fn extract_all(store: &HelpStore) -> Vec<(Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>)> {
    store
        .entries()
        .iter()
        .map(|&e| {
            let (n, p, b, d) = store.extract(e);
            (n.to_vec(), p.to_vec(), b.to_vec(), d.to_vec())
        })
        .collect()
}

proptest! {
    #[test]
    fn removal_preserves_surviving_records(
        records in proptest::collection::vec(record_strategy(), 1..16),
        removals in proptest::collection::vec(any::<prop::sample::Index>(), 1..8),
    ) {
        let mut store = HelpStore::new();
        for (name, params, brief) in &records {
            store.append(&[name], params, brief, "").unwrap();
        }

        for removal in removals {
            if store.is_empty() {
                break;
            }
            let pos = removal.index(store.len());
            let before = extract_all(&store);
            let removed_len = store.entries()[pos].len();
            let arena_before = store.data().len();

            store.remove(pos);

            // Arena shrank by exactly the removed record.
            prop_assert_eq!(store.data().len(), arena_before - removed_len);

            // Every survivor still reads back byte-identical.
            let after = extract_all(&store);
            let mut expected = before;
            expected.remove(pos);
            prop_assert_eq!(after, expected);

            // Offsets stay ordered and in bounds.
            let mut prev = 0;
            for entry in store.entries() {
                prop_assert!(entry.begin() >= prev);
                prop_assert!(entry.span().end <= store.data().len());
                prev = entry.begin();
            }
        }
    }

    #[test]
    fn filter_recovers_after_splice(
        removal in any::<prop::sample::Index>(),
    ) {
        let mut store = HelpStore::new();
        for name in ["additem", "addspell", "addperk", "remove"] {
            store.append(&[name], "", "", "").unwrap();
        }

        let mut filter = CascadeFilter::new(&DEFAULT_LADDER);
        filter.update(store.data(), store.entries(), "add", false);

        let pos = removal.index(store.len());
        store.remove(pos);

        // The alias subsystem's contract: clear, then force-refresh.
        filter.clear();
        filter.update(store.data(), store.entries(), "add", true);

        let expected = store
            .entries()
            .iter()
            .filter(|e| {
                let (n, _, _, _) = store.extract(**e);
                n.starts_with(b"add")
            })
            .count();
        prop_assert_eq!(filter.current(store.entries()).len(), expected);
    }
}
