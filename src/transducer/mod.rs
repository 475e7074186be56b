//! Weighted finite-state transducers.

mod compose;
mod transduce;

pub use self::compose::{compose, ComposeError};

use hashbrown::{HashMap, HashSet};

use crate::automaton::Automaton;
use crate::types::{State, StateId, Symbol, Weight};

/// One outgoing transducer edge: output symbol, target state and weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolTransition<S: StateId> {
    output: Symbol,
    target: S,
    weight: Weight,
}

impl<S: StateId> SymbolTransition<S> {
    /// Creates a transition record.
    pub fn new(output: Symbol, target: S, weight: Weight) -> SymbolTransition<S> {
        SymbolTransition {
            output,
            target,
            weight,
        }
    }

    /// The emitted symbol.
    #[inline(always)]
    pub fn output(&self) -> Symbol {
        self.output
    }

    /// The target state.
    #[inline(always)]
    pub fn target(&self) -> S {
        self.target
    }

    /// The transition cost.
    #[inline(always)]
    pub fn weight(&self) -> Weight {
        self.weight
    }
}

/// A weighted finite-state transducer.
///
/// Each edge pairs an input symbol with an output symbol and a cost.
/// Epsilon on the input side consumes nothing; epsilon on the output side
/// emits nothing.
#[derive(Clone, Debug)]
pub struct Transducer<S: StateId = State> {
    transitions: HashMap<S, HashMap<Symbol, Vec<SymbolTransition<S>>>>,
    start: Option<S>,
    accepting: HashSet<S>,
    states: HashSet<S>,
    input_symbols: HashSet<Symbol>,
}

impl<S: StateId> Default for Transducer<S> {
    fn default() -> Self {
        Transducer::new()
    }
}

impl<S: StateId> Transducer<S> {
    /// Creates an empty transducer with no start state.
    pub fn new() -> Transducer<S> {
        Transducer {
            transitions: HashMap::new(),
            start: None,
            accepting: HashSet::new(),
            states: HashSet::new(),
            input_symbols: HashSet::new(),
        }
    }

    /// Lifts an automaton into an identity transducer: every edge maps its
    /// symbol to itself with weight 0. Start state and accepting set carry
    /// over.
    pub fn from_automaton(fsa: &Automaton<S>) -> Transducer<S> {
        let mut fst = Transducer::new();
        for (from, sym, to) in fsa.transitions() {
            fst.add_transition(from, sym, to);
        }
        if let Some(start) = fsa.start() {
            fst.set_start(start);
        }
        for state in fsa.accepting_states() {
            fst.mark_accepting(state);
        }
        fst
    }

    /// Adds an identity transition (`input` in, `input` out, weight 0) and
    /// returns the target.
    pub fn add_transition(&mut self, from: S, input: Symbol, to: S) -> S {
        self.add_transition_full(from, input, to, input, Weight::ZERO)
    }

    /// Adds a transition with explicit output symbol and weight, returning
    /// the target. The source of the first transition becomes the start
    /// state unless one was set before.
    pub fn add_transition_full(
        &mut self,
        from: S,
        input: Symbol,
        to: S,
        output: Symbol,
        weight: Weight,
    ) -> S {
        if self.start.is_none() {
            self.start = Some(from);
        }
        self.states.insert(from);
        self.states.insert(to);
        self.input_symbols.insert(input);
        let transition = SymbolTransition::new(output, to, weight);
        let arcs = self
            .transitions
            .entry(from)
            .or_default()
            .entry(input)
            .or_default();
        if !arcs.contains(&transition) {
            arcs.push(transition);
        }
        to
    }

    /// Sets the start state explicitly.
    pub fn set_start(&mut self, state: S) {
        self.states.insert(state);
        self.start = Some(state);
    }

    /// The start state, if any.
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

    /// Iterates over the transitions leaving `from` on `input`.
    pub fn transitions(
        &self,
        from: S,
        input: Symbol,
    ) -> impl Iterator<Item = &SymbolTransition<S>> {
        self.transitions
            .get(&from)
            .and_then(|by_sym| by_sym.get(&input))
            .into_iter()
            .flatten()
    }

    /// Iterates over all transitions leaving `from`, on any input symbol.
    pub fn transitions_any(&self, from: S) -> impl Iterator<Item = (Symbol, &SymbolTransition<S>)> {
        self.transitions.get(&from).into_iter().flat_map(|by_sym| {
            by_sym
                .iter()
                .flat_map(|(&input, arcs)| arcs.iter().map(move |arc| (input, arc)))
        })
    }

    /// Iterates over every edge as a (source, input, transition) triple.
    pub fn edges(&self) -> impl Iterator<Item = (S, Symbol, &SymbolTransition<S>)> {
        self.transitions.iter().flat_map(|(&from, by_sym)| {
            by_sym
                .iter()
                .flat_map(move |(&input, arcs)| arcs.iter().map(move |arc| (from, input, arc)))
        })
    }

    /// Iterates over every state referenced by the transducer.
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

    /// The input alphabet observed so far.
    pub fn input_symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.input_symbols.iter().copied()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.transitions
            .values()
            .flat_map(|by_sym| by_sym.values())
            .map(Vec::len)
            .sum()
    }

    /// Returns a new transducer with input and output symbols swapped on
    /// every edge. Start state, accepting set and weights are unchanged;
    /// inverting twice reproduces the original.
    pub fn invert(&self) -> Transducer<S> {
        let mut inverted = Transducer::new();
        for (from, input, arc) in self.edges() {
            inverted.add_transition_full(from, arc.output(), arc.target(), input, arc.weight());
        }
        if let Some(start) = self.start {
            inverted.set_start(start);
        }
        for &state in &self.accepting {
            inverted.mark_accepting(state);
        }
        inverted
    }
}

impl Transducer<State> {
    /// Adds an identity transition from `from` on `input` to a freshly
    /// allocated state, returning the new state.
    pub fn add_transition_new(&mut self, from: State, input: Symbol) -> State {
        self.states.insert(from);
        let to = self.fresh_state();
        self.add_transition(from, input, to)
    }

    fn fresh_state(&self) -> State {
        let mut id = self.states.len() as u32;
        while self.states.contains(&State(id)) {
            id += 1;
        }
        State(id)
    }
}

/// Structural equality up to edge ordering.
impl<S: StateId> PartialEq for Transducer<S> {
    fn eq(&self, other: &Self) -> bool {
        if self.start != other.start || self.accepting != other.accepting {
            return false;
        }
        if self.edge_count() != other.edge_count() {
            return false;
        }
        self.edges()
            .all(|(from, input, arc)| other.transitions(from, input).any(|o| o == arc))
    }
}
