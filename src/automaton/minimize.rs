//! DFA minimization by right-language partition refinement.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::types::{State, StateId, Symbol};

use super::{Automaton, AutomatonError};

impl<S: StateId> Automaton<S> {
    /// Collapses states with equal right languages, returning a new
    /// automaton over block-id states.
    ///
    /// Starts from the two-block partition (accepting / non-accepting) and
    /// refines each block by the blocks its members reach, symbol by symbol,
    /// until a pass produces no new blocks. Blocks of the result are
    /// renumbered canonically by breadth-first discovery from the start
    /// block, so minimizing twice yields the same automaton as minimizing
    /// once.
    ///
    /// The input must be deterministic.
    pub fn minimize(&self) -> Result<Automaton<State>, AutomatonError> {
        if !self.is_deterministic() {
            return Err(AutomatonError::NotDeterministic);
        }
        let start = match self.start() {
            Some(s) => s,
            None => return Ok(Automaton::new()),
        };

        // Per-state transition maps, ordered by symbol so block signatures
        // compare consistently.
        let mut moves: HashMap<S, BTreeMap<Symbol, S>> = HashMap::new();
        for state in self.states() {
            moves.insert(state, BTreeMap::new());
        }
        for (from, sym, to) in self.transitions() {
            moves.entry(from).or_default().insert(sym, to);
        }

        let mut states: Vec<S> = self.states().collect();
        states.sort();

        let mut partition: Vec<Vec<S>> = Vec::new();
        for accepting in [false, true] {
            let block: Vec<S> = states
                .iter()
                .copied()
                .filter(|&s| self.is_accepting(s) == accepting)
                .collect();
            if !block.is_empty() {
                partition.push(block);
            }
        }

        loop {
            let block_of = block_index(&partition);
            let mut next: Vec<Vec<S>> = Vec::new();
            for block in &partition {
                let mut groups: BTreeMap<Vec<(Symbol, usize)>, Vec<S>> = BTreeMap::new();
                for &state in block {
                    let signature: Vec<(Symbol, usize)> = moves[&state]
                        .iter()
                        .map(|(&sym, to)| (sym, block_of[to]))
                        .collect();
                    groups.entry(signature).or_default().push(state);
                }
                next.extend(groups.into_values());
            }
            if next.len() == partition.len() {
                break;
            }
            log::debug!(
                "minimize: refined {} blocks into {}",
                partition.len(),
                next.len()
            );
            partition = next;
        }

        let block_of = block_index(&partition);

        // Block-level transition maps, via an arbitrary member (all members
        // of a block agree up to block identity at the fixpoint).
        let block_moves: Vec<BTreeMap<Symbol, usize>> = partition
            .iter()
            .map(|block| {
                moves[&block[0]]
                    .iter()
                    .map(|(&sym, to)| (sym, block_of[to]))
                    .collect()
            })
            .collect();

        // Canonical numbering by breadth-first discovery from the start.
        let mut number: HashMap<usize, u32> = HashMap::new();
        let mut order: Vec<usize> = Vec::new();
        let mut queue = std::collections::VecDeque::new();
        number.insert(block_of[&start], 0);
        order.push(block_of[&start]);
        queue.push_back(block_of[&start]);
        while let Some(block) = queue.pop_front() {
            for &target in block_moves[block].values() {
                if !number.contains_key(&target) {
                    number.insert(target, order.len() as u32);
                    order.push(target);
                    queue.push_back(target);
                }
            }
        }

        let mut minimized = Automaton::new();
        minimized.set_start(State(0));
        for &block in &order {
            let from = State(number[&block]);
            for (&sym, &target) in &block_moves[block] {
                minimized.add_transition(from, sym, State(number[&target]));
            }
            if self.is_accepting(partition[block][0]) {
                minimized.mark_accepting(from);
            }
        }
        log::debug!(
            "minimize: {} states down to {}",
            self.state_count(),
            minimized.state_count()
        );
        Ok(minimized)
    }
}

fn block_index<S: StateId>(partition: &[Vec<S>]) -> HashMap<S, usize> {
    let mut index = HashMap::new();
    for (i, block) in partition.iter().enumerate() {
        for &state in block {
            index.insert(state, i);
        }
    }
    index
}
