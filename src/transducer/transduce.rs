//! Weighted transduction: all outputs reachable over a full input string.

use hashbrown::HashSet;
use smol_str::SmolStr;

use crate::types::{StateId, Symbol, Weight};

use super::Transducer;

/// A partial path through the transducer during search.
struct PathNode<S> {
    state: S,
    output: String,
    weight: Weight,
    /// Position of the next unread input symbol.
    pos: usize,
    /// States entered through epsilon edges since the last consumed symbol.
    /// Epsilon edges never re-enter one of these, which bounds every epsilon
    /// chain by the state count and keeps the search finite even in the
    /// presence of epsilon cycles (an error model composed against a lexicon
    /// legitimately produces epsilon self-loops).
    eps_seen: Vec<S>,
}

impl<S: StateId> Transducer<S> {
    /// Returns every (output string, total weight) pair reachable from the
    /// start state by consuming all of `input` and ending in an accepting
    /// state.
    ///
    /// Paths are explored with a stack frontier: each live path is expanded
    /// both through the transition matching its next unread symbol
    /// (advancing the read position) and through any epsilon transition
    /// (position unchanged). A path that has consumed the whole input is
    /// collected iff its state is accepting. Duplicate (output, weight)
    /// pairs are collapsed; the order of the returned pairs carries no
    /// meaning.
    pub fn transduce(&self, input: &str) -> Vec<(SmolStr, Weight)> {
        let start = match self.start() {
            Some(s) => s,
            None => return vec![],
        };
        let symbols: Vec<Symbol> = input.chars().map(Symbol::Char).collect();

        let mut collected: HashSet<(SmolStr, u32)> = HashSet::new();
        let mut frontier = vec![PathNode {
            state: start,
            output: String::new(),
            weight: Weight::ZERO,
            pos: 0,
            eps_seen: Vec::new(),
        }];
        let mut expansions = 0usize;

        while let Some(path) = frontier.pop() {
            if path.pos == symbols.len() {
                if self.is_accepting(path.state) {
                    collected.insert((SmolStr::new(&path.output), path.weight.to_bits()));
                }
                continue;
            }
            expansions += 1;
            for arc in self.transitions(path.state, symbols[path.pos]) {
                let mut output = path.output.clone();
                arc.output().push_onto(&mut output);
                frontier.push(PathNode {
                    state: arc.target(),
                    output,
                    weight: path.weight + arc.weight(),
                    pos: path.pos + 1,
                    eps_seen: Vec::new(),
                });
            }
            for arc in self.transitions(path.state, Symbol::Epsilon) {
                if path.eps_seen.contains(&arc.target()) {
                    continue;
                }
                let mut output = path.output.clone();
                arc.output().push_onto(&mut output);
                let mut eps_seen = path.eps_seen.clone();
                eps_seen.push(arc.target());
                frontier.push(PathNode {
                    state: arc.target(),
                    output,
                    weight: path.weight + arc.weight(),
                    pos: path.pos,
                    eps_seen,
                });
            }
        }

        log::trace!(
            "transduce: {} expansions, {} distinct outputs",
            expansions,
            collected.len()
        );
        collected
            .into_iter()
            .map(|(output, bits)| (output, Weight::from_bits(bits)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::build_trie;
    use crate::types::State;

    fn sym(c: char) -> Symbol {
        Symbol::Char(c)
    }

    fn sorted(mut results: Vec<(SmolStr, Weight)>) -> Vec<(SmolStr, Weight)> {
        results.sort_by(|a, b| a.0.cmp(&b.0));
        results
    }

    #[test]
    fn identity_transducer_maps_lexicon_words_to_themselves() {
        let trie = build_trie(&["walk", "walks", "wall"]);
        let fst = Transducer::from_automaton(&trie);

        assert_eq!(fst.transduce("walk"), vec![("walk".into(), Weight::ZERO)]);
        assert!(fst.transduce("wak").is_empty());
        assert!(fst.transduce("wal").is_empty());
    }

    #[test]
    fn weighted_branches_are_all_reported() {
        let mut fst = Transducer::new();
        fst.add_transition_full(State(0), sym('a'), State(0), sym('f'), Weight(5.0));
        fst.add_transition_full(State(0), sym('d'), State(2), sym('f'), Weight(3.0));
        fst.add_transition_full(State(0), sym('a'), State(1), sym('b'), Weight(1.0));
        fst.add_transition_full(State(1), sym('a'), State(2), sym('c'), Weight(2.0));
        fst.add_transition_full(State(1), sym('d'), State(2), sym('e'), Weight(3.0));
        fst.mark_accepting(State(2));

        let results = sorted(fst.transduce("ad"));
        assert_eq!(
            results,
            vec![("be".into(), Weight(4.0)), ("ff".into(), Weight(8.0))]
        );
    }

    #[test]
    fn epsilon_edges_fire_without_consuming_input() {
        // a : x, then an epsilon edge emitting y before the accepting state
        let mut fst = Transducer::new();
        fst.add_transition_full(State(0), sym('a'), State(1), sym('x'), Weight(1.0));
        fst.add_transition_full(State(1), Symbol::Epsilon, State(2), sym('y'), Weight(0.5));
        fst.add_transition_full(State(2), sym('b'), State(3), sym('z'), Weight(1.0));
        fst.mark_accepting(State(3));

        assert_eq!(fst.transduce("ab"), vec![("xyz".into(), Weight(2.5))]);
    }

    #[test]
    fn epsilon_self_loop_terminates() {
        let mut fst = Transducer::new();
        fst.add_transition_full(State(0), Symbol::Epsilon, State(0), sym('x'), Weight(1.0));
        fst.add_transition(State(0), sym('a'), State(1));
        fst.mark_accepting(State(1));

        // the loop may fire at most once per chain position; the plain path
        // and the one-insertion path both land in the accepting state
        let results = sorted(fst.transduce("a"));
        assert_eq!(
            results,
            vec![("a".into(), Weight::ZERO), ("xa".into(), Weight(1.0))]
        );
    }

    #[test]
    fn empty_input_accepted_only_at_accepting_start() {
        let mut fst = Transducer::new();
        fst.add_transition(State(0), sym('a'), State(1));
        assert!(fst.transduce("").is_empty());
        fst.mark_accepting(State(0));
        assert_eq!(fst.transduce(""), vec![("".into(), Weight::ZERO)]);
    }

    #[test]
    fn unknown_symbol_yields_no_results() {
        let fst = Transducer::from_automaton(&build_trie(&["ab"]));
        assert!(fst.transduce("aq").is_empty());
    }
}
