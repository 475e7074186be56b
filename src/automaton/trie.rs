//! Trie construction: a prefix-sharing automaton over a word list.

use crate::types::{State, Symbol};

use super::Automaton;

/// Builds a deterministic trie automaton from `words`.
///
/// Shared prefixes share states and edges; the final state of each word is
/// accepting. Suffixes are not shared (run [`Automaton::minimize`] for that).
pub fn build_trie<W: AsRef<str>>(words: &[W]) -> Automaton<State> {
    let mut fsa = Automaton::new();
    fsa.set_start(State::ZERO);
    for word in words {
        insert_word(&mut fsa, word.as_ref());
    }
    fsa
}

/// Inserts one word, following existing edges where they exist and creating
/// fresh states where they do not.
///
/// A well-formed prefix structure only ever has one target per
/// (state, symbol). If several targets are found (the automaton was seeded
/// with conflicting edges before insertion), the walk splits off an explicit
/// secondary state and re-attaches the surplus branches beneath it, leaving
/// every previously recognizable word recognizable.
pub fn insert_word(fsa: &mut Automaton<State>, word: &str) {
    let mut current = fsa.start().unwrap_or(State::ZERO);
    if fsa.start().is_none() {
        fsa.set_start(current);
    }
    for ch in word.chars() {
        let sym = Symbol::Char(ch);
        let targets: Vec<State> = fsa.targets(current, sym).to_vec();
        current = match targets.as_slice() {
            [] => fsa.add_transition_new(current, sym),
            [only] => *only,
            [_, surplus @ ..] => {
                let split = fsa.add_transition_new(current, sym);
                for &branch in surplus {
                    fsa.add_transition(split, sym, branch);
                }
                split
            }
        };
    }
    fsa.mark_accepting(current);
}
