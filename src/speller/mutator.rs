//! The error-model transducer ("mutator").
//!
//! A single-state transducer whose self-loop edges rewrite one character
//! into another at the cost the weight table assigns: substitutions (`a:b`),
//! deletions (`a:ε`) and insertions (`ε:a`). Composed against an identity
//! lexicon transducer it maps each lexicon word onto its weighted
//! corruptions.

use itertools::iproduct;

use crate::transducer::Transducer;
use crate::types::{State, Symbol};
use crate::weights::{WeightError, WeightTable};

/// Builds the error-model transducer over the weight table's alphabet.
///
/// Every (source, target) pair with a row in the table becomes a self-loop
/// on the single accepting state; zero-cost edges are kept (a free identity
/// edge is what lets correct characters pass through unpunished).
pub fn mutator_from_weights(table: &WeightTable) -> Result<Transducer<State>, WeightError> {
    let mut mutator = Transducer::new();
    let hub = State::ZERO;
    mutator.set_start(hub);
    mutator.mark_accepting(hub);

    let sources: Vec<Symbol> = table.sources().collect();
    let alphabet = table.alphabet();
    for (&from, &to) in iproduct!(&sources, &alphabet) {
        if from.is_epsilon() && to.is_epsilon() {
            continue;
        }
        let weight = table.cost(from, to)?;
        mutator.add_transition_full(hub, from, hub, to, weight);
    }
    log::debug!(
        "mutator: {} edges over an alphabet of {}",
        mutator.edge_count(),
        alphabet.len()
    );
    Ok(mutator)
}
