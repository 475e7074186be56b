/*! Spelling correction with weighted finite-state automata.

Builds a deterministic lexicon automaton from a word list (a trie with
suffixes merged by DFA minimization), lifts it to an identity transducer and
composes it with a weighted character-edit error model, so that misspellings
can be corrected by searching for low-cost transduction paths.

The edit weights themselves come from an external estimator as a JSON
confusion table; see [`weights`].

# Usage example

```
use fstspell::automaton::build_trie;

let lexicon = build_trie(&["walk", "walks", "wall"]).minimize().unwrap();
assert!(lexicon.recognize("walk"));
assert!(!lexicon.recognize("wark"));
```

The full correction pipeline lives in [`speller::Speller`].

*/

#![warn(missing_docs)]
pub mod automaton;
pub mod speller;
pub mod transducer;
pub mod types;
pub mod weights;

pub use crate::automaton::Automaton;
pub use crate::transducer::Transducer;
pub use crate::types::{State, Symbol, Weight};
