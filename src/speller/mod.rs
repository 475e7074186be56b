//! Spelling correction: a lexicon automaton composed with an error model.

use serde::{Deserialize, Serialize};

use crate::automaton::{build_trie, Automaton, AutomatonError};
use crate::speller::suggestion::Suggestion;
use crate::transducer::{compose, ComposeError, Transducer};
use crate::types::{State, Weight};
use crate::weights::{WeightError, WeightTable};

mod mutator;
pub mod suggestion;

pub use self::mutator::mutator_from_weights;

/// Error raised while assembling a speller.
#[derive(Debug, thiserror::Error)]
pub enum SpellerError {
    /// Minimizing the lexicon failed.
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
    /// Composing the lexicon with the error model failed.
    #[error(transparent)]
    Compose(#[from] ComposeError),
    /// The weight table was unusable.
    #[error(transparent)]
    Weights(#[from] WeightError),
}

/// Limits applied when querying a speller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpellerConfig {
    /// keep only this many best suggestions
    pub n_best: Option<usize>,
    /// drop suggestions heavier than this
    pub max_weight: Option<Weight>,
}

impl SpellerConfig {
    /// the stock configuration: ten best, no weight cap
    pub const fn default() -> SpellerConfig {
        SpellerConfig {
            n_best: Some(10),
            max_weight: None,
        }
    }
}

/// A speller: a minimized lexicon automaton plus a correction transducer.
///
/// The correction transducer is built once: the lexicon trie is minimized,
/// lifted to an identity transducer, composed with the error-model mutator
/// (lexicon words in, weighted corruptions out) and inverted, so that
/// queries run misspelling in, lexicon word out.
pub struct Speller {
    lexicon: Automaton<State>,
    corrector: Transducer<(State, State)>,
}

impl Speller {
    /// Assembles a speller from a word list and an edit-weight table.
    pub fn new<W: AsRef<str>>(words: &[W], weights: &WeightTable) -> Result<Speller, SpellerError> {
        let lexicon = build_trie(words).minimize()?;
        let lexical = Transducer::from_automaton(&lexicon);
        let mutator = mutator_from_weights(weights)?;
        let corrector = compose(&lexical, &mutator)?.invert();
        log::debug!(
            "speller: lexicon {} states, corrector {} states / {} edges",
            lexicon.state_count(),
            corrector.state_count(),
            corrector.edge_count()
        );
        Ok(Speller { lexicon, corrector })
    }

    /// Whether `word` is in the lexicon.
    pub fn is_correct(&self, word: &str) -> bool {
        self.lexicon.recognize(word)
    }

    /// The minimized lexicon automaton.
    pub fn lexicon(&self) -> &Automaton<State> {
        &self.lexicon
    }

    /// Suggests corrections for `word` with the stock configuration.
    pub fn suggest(&self, word: &str) -> Vec<Suggestion> {
        self.suggest_with_config(word, &SpellerConfig::default())
    }

    /// Suggests corrections for `word`, cheapest first.
    ///
    /// An unknown symbol in `word` simply yields no suggestions.
    pub fn suggest_with_config(&self, word: &str, config: &SpellerConfig) -> Vec<Suggestion> {
        let mut suggestions: Vec<Suggestion> = self
            .corrector
            .transduce(word)
            .into_iter()
            .map(|(value, weight)| Suggestion::new(value, weight))
            .filter(|s| config.max_weight.map_or(true, |max| s.weight() <= max))
            .collect();
        suggestions.sort();
        if let Some(n_best) = config.n_best {
            suggestions.truncate(n_best);
        }
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // uniform confusion counts over a small alphabet, with a heavy
    // preference for identity
    fn table() -> WeightTable {
        let alphabet = "walkstn";
        let mut json = String::from("{");
        let mut rows: Vec<String> = Vec::new();
        for from in alphabet.chars() {
            let cells: Vec<String> = alphabet
                .chars()
                .map(|to| format!("\"{}\": {}", to, if from == to { 20 } else { 1 }))
                .collect();
            rows.push(format!("\"{}\": {{{}}}", from, cells.join(", ")));
        }
        let insertions: Vec<String> = alphabet
            .chars()
            .map(|to| format!("\"{}\": 1", to))
            .collect();
        rows.push(format!("\"\": {{{}}}", insertions.join(", ")));
        json.push_str(&rows.join(", "));
        json.push('}');
        WeightTable::from_json_str(&json).unwrap()
    }

    fn speller() -> Speller {
        let words = ["walk", "walks", "wall", "walls", "want", "wants", "talk"];
        Speller::new(&words, &table()).unwrap()
    }

    #[test]
    fn correct_words_are_recognized() {
        let speller = speller();
        assert!(speller.is_correct("walk"));
        assert!(speller.is_correct("talk"));
        assert!(!speller.is_correct("wark"));
        assert!(!speller.is_correct(""));
    }

    #[test]
    fn a_correct_word_suggests_itself_first() {
        let speller = speller();
        let suggestions = speller.suggest("walk");
        assert_eq!(suggestions[0].value(), "walk");
        assert_eq!(suggestions[0].weight(), Weight::ZERO);
    }

    #[test]
    fn substitution_typo_finds_the_word() {
        let speller = speller();
        let suggestions = speller.suggest("walt");
        let values: Vec<&str> = suggestions.iter().map(|s| s.value()).collect();
        assert!(values.contains(&"walk"), "got {:?}", values);
        assert!(values.contains(&"wall"), "got {:?}", values);
    }

    #[test]
    fn extra_character_typo_finds_the_word() {
        let speller = speller();
        let suggestions = speller.suggest("waalk");
        let values: Vec<&str> = suggestions.iter().map(|s| s.value()).collect();
        assert!(values.contains(&"walk"), "got {:?}", values);
    }

    #[test]
    fn missing_character_typo_finds_the_word() {
        let speller = speller();
        let suggestions = speller.suggest("wak");
        let values: Vec<&str> = suggestions.iter().map(|s| s.value()).collect();
        assert!(values.contains(&"walk"), "got {:?}", values);
    }

    #[test]
    fn suggestions_come_cheapest_first() {
        let speller = speller();
        let suggestions = speller.suggest("walt");
        for pair in suggestions.windows(2) {
            assert!(pair[0].weight() <= pair[1].weight());
        }
    }

    #[test]
    fn unknown_symbol_yields_no_suggestions() {
        let speller = speller();
        assert!(speller.suggest("zzz").is_empty());
    }

    #[test]
    fn n_best_caps_the_suggestion_list() {
        let speller = speller();
        let config = SpellerConfig {
            n_best: Some(1),
            max_weight: None,
        };
        let suggestions = speller.suggest_with_config("walt", &config);
        assert_eq!(suggestions.len(), 1);
    }

    #[test]
    fn max_weight_drops_expensive_suggestions() {
        let speller = speller();
        let config = SpellerConfig {
            n_best: None,
            max_weight: Some(Weight::ZERO),
        };
        let suggestions = speller.suggest_with_config("walk", &config);
        assert!(suggestions.iter().all(|s| s.weight() == Weight::ZERO));
        assert!(suggestions.iter().any(|s| s.value() == "walk"));
    }
}
