// Integration tests for symbol alphabet invariants.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

#[test]
fn card_symbols_are_unique_and_non_empty() {
    let mut seen = HashSet::new();
    for s in memory_match::CARD_SYMBOLS {
        assert!(!s.is_empty(), "empty entry in CARD_SYMBOLS");
        assert!(seen.insert(*s), "duplicate symbol '{}' in CARD_SYMBOLS", s);
    }
}

#[test]
fn alphabet_covers_the_default_board() {
    assert!(memory_match::DEFAULT_PAIR_COUNT >= 1);
    assert!(memory_match::CARD_SYMBOLS.len() >= memory_match::DEFAULT_PAIR_COUNT);
}
