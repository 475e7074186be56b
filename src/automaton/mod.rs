//! Finite-state automata over character symbols.

mod minimize;
mod trie;

pub use self::trie::build_trie;

use hashbrown::{HashMap, HashSet};

use crate::types::{State, StateId, Symbol};

/// Error raised when an automaton operation's precondition is violated.
#[derive(Debug, thiserror::Error)]
pub enum AutomatonError {
    /// `minimize` was called on a non-deterministic automaton.
    #[error("minimization requires a deterministic automaton")]
    NotDeterministic,
}

/// A finite-state automaton.
///
/// Transitions are kept as a map from source state and symbol to the list of
/// target states. No sink state is materialized: an undefined transition
/// rejects immediately. The automaton tracks its own determinism; the flag
/// drops to `false` the first time a second target is added for the same
/// (state, symbol) pair.
#[derive(Clone, Debug)]
pub struct Automaton<S: StateId = State> {
    transitions: HashMap<S, HashMap<Symbol, Vec<S>>>,
    start: Option<S>,
    accepting: HashSet<S>,
    states: HashSet<S>,
    deterministic: bool,
}

impl<S: StateId> Default for Automaton<S> {
    fn default() -> Self {
        Automaton::new()
    }
}

impl<S: StateId> Automaton<S> {
    /// Creates an empty automaton with no start state.
    pub fn new() -> Automaton<S> {
        Automaton {
            transitions: HashMap::new(),
            start: None,
            accepting: HashSet::new(),
            states: HashSet::new(),
            deterministic: true,
        }
    }

    /// Adds a transition from `from` to `to` on `sym` and returns `to`.
    ///
    /// The source of the first transition added becomes the start state
    /// unless one was set before. Adding a second distinct target for the
    /// same (state, symbol) pair makes the automaton non-deterministic.
    pub fn add_transition(&mut self, from: S, sym: Symbol, to: S) -> S {
        if self.start.is_none() {
            self.start = Some(from);
        }
        self.states.insert(from);
        self.states.insert(to);
        let targets = self
            .transitions
            .entry(from)
            .or_default()
            .entry(sym)
            .or_default();
        if !targets.contains(&to) {
            targets.push(to);
            if targets.len() > 1 {
                self.deterministic = false;
            }
        }
        to
    }

    /// Sets the start state, overriding first-transition-wins assignment.
    pub fn set_start(&mut self, state: S) {
        self.states.insert(state);
        self.start = Some(state);
    }

    /// The start state, if any transition or explicit assignment defined one.
    pub fn start(&self) -> Option<S> {
        self.start
    }

    /// Marks a state as accepting.
    pub fn mark_accepting(&mut self, state: S) {
        self.states.insert(state);
        self.accepting.insert(state);
    }

    /// Whether `state` is in the accepting set.
    pub fn is_accepting(&self, state: S) -> bool {
        self.accepting.contains(&state)
    }

    /// Whether every (state, symbol) pair has at most one target.
    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    /// The states reachable from `from` on `sym`. Empty if undefined.
    pub fn targets(&self, from: S, sym: Symbol) -> &[S] {
        self.transitions
            .get(&from)
            .and_then(|by_sym| by_sym.get(&sym))
            .map_or(&[], Vec::as_slice)
    }

    /// Iterates over every state referenced by the automaton.
    pub fn states(&self) -> impl Iterator<Item = S> + '_ {
        self.states.iter().copied()
    }

    /// Number of states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Iterates over the accepting states.
    pub fn accepting_states(&self) -> impl Iterator<Item = S> + '_ {
        self.accepting.iter().copied()
    }

    /// Iterates over every transition as a (source, symbol, target) triple.
    pub fn transitions(&self) -> impl Iterator<Item = (S, Symbol, S)> + '_ {
        self.transitions.iter().flat_map(|(&from, by_sym)| {
            by_sym
                .iter()
                .flat_map(move |(&sym, targets)| targets.iter().map(move |&to| (from, sym, to)))
        })
    }

    /// Number of distinct transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions
            .values()
            .flat_map(|by_sym| by_sym.values())
            .map(Vec::len)
            .sum()
    }

    /// Recognizes `input`, returning whether the automaton accepts it.
    ///
    /// A deterministic automaton is walked symbol by symbol, rejecting as
    /// soon as a step is undefined. A non-deterministic automaton is searched
    /// with a stack of (state, input position) items; the answer does not
    /// depend on exploration order.
    pub fn recognize(&self, input: &str) -> bool {
        if self.deterministic {
            self.recognize_dfa(input)
        } else {
            self.recognize_nfa(input)
        }
    }

    fn recognize_dfa(&self, input: &str) -> bool {
        let mut state = match self.start {
            Some(s) => s,
            None => return false,
        };
        for ch in input.chars() {
            match self.targets(state, Symbol::Char(ch)).first() {
                Some(&next) => state = next,
                None => return false,
            }
        }
        self.accepting.contains(&state)
    }

    fn recognize_nfa(&self, input: &str) -> bool {
        let start = match self.start {
            Some(s) => s,
            None => return false,
        };
        let symbols: Vec<Symbol> = input.chars().map(Symbol::Char).collect();
        let mut agenda = vec![(start, 0usize)];
        while let Some((state, pos)) = agenda.pop() {
            if pos == symbols.len() {
                if self.accepting.contains(&state) {
                    return true;
                }
                continue;
            }
            for &next in self.targets(state, symbols[pos]) {
                agenda.push((next, pos + 1));
            }
        }
        false
    }
}

impl Automaton<State> {
    /// Adds a transition from `from` on `sym` to a freshly allocated state,
    /// returning the new state.
    pub fn add_transition_new(&mut self, from: State, sym: Symbol) -> State {
        // from must be counted before allocating, or it could be handed back
        self.states.insert(from);
        let to = self.fresh_state();
        self.add_transition(from, sym, to)
    }

    fn fresh_state(&self) -> State {
        let mut id = self.states.len() as u32;
        while self.states.contains(&State(id)) {
            id += 1;
        }
        State(id)
    }
}

/// Structural equality up to transition ordering.
impl<S: StateId> PartialEq for Automaton<S> {
    fn eq(&self, other: &Self) -> bool {
        if self.start != other.start || self.accepting != other.accepting {
            return false;
        }
        if self.transition_count() != other.transition_count() {
            return false;
        }
        self.transitions()
            .all(|(from, sym, to)| other.targets(from, sym).contains(&to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> Symbol {
        Symbol::Char(c)
    }

    #[test]
    fn dfa_recognize() {
        let mut fsa = Automaton::new();
        let s1 = fsa.add_transition_new(State(0), sym('a'));
        let s2 = fsa.add_transition_new(s1, sym('b'));
        fsa.mark_accepting(s2);

        assert!(fsa.is_deterministic());
        assert!(fsa.recognize("ab"));
        assert!(!fsa.recognize("a"));
        assert!(!fsa.recognize("abb"));
        assert!(!fsa.recognize(""));
    }

    #[test]
    fn first_transition_sets_start() {
        let mut fsa = Automaton::new();
        assert_eq!(fsa.start(), None);
        fsa.add_transition(State(7), sym('x'), State(8));
        assert_eq!(fsa.start(), Some(State(7)));
        // first write wins
        fsa.add_transition(State(8), sym('y'), State(9));
        assert_eq!(fsa.start(), Some(State(7)));
    }

    #[test]
    fn second_target_flips_determinism() {
        let mut fsa = Automaton::new();
        fsa.add_transition(State(0), sym('a'), State(1));
        assert!(fsa.is_deterministic());
        // same edge again is not a second target
        fsa.add_transition(State(0), sym('a'), State(1));
        assert!(fsa.is_deterministic());
        fsa.add_transition(State(0), sym('a'), State(2));
        assert!(!fsa.is_deterministic());
    }

    #[test]
    fn nfa_recognize_explores_all_branches() {
        // two paths on 'a' from the start, only one of which leads anywhere
        let mut fsa = Automaton::new();
        fsa.add_transition(State(0), sym('a'), State(1));
        fsa.add_transition(State(0), sym('a'), State(2));
        fsa.add_transition(State(2), sym('b'), State(3));
        fsa.mark_accepting(State(3));

        assert!(!fsa.is_deterministic());
        assert!(fsa.recognize("ab"));
        assert!(!fsa.recognize("a"));
        assert!(!fsa.recognize("b"));
    }

    #[test]
    fn unknown_symbol_rejects() {
        let mut fsa = Automaton::new();
        fsa.add_transition(State(0), sym('a'), State(1));
        fsa.mark_accepting(State(1));
        assert!(!fsa.recognize("z"));
    }

    #[test]
    fn empty_string_accepted_iff_start_accepting() {
        let mut fsa = Automaton::new();
        fsa.add_transition(State(0), sym('a'), State(1));
        assert!(!fsa.recognize(""));
        fsa.mark_accepting(State(0));
        assert!(fsa.recognize(""));
    }

    #[test]
    fn move_returns_empty_for_undefined() {
        let fsa: Automaton = Automaton::new();
        assert!(fsa.targets(State(0), sym('a')).is_empty());
    }
}
