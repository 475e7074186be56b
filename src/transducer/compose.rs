//! Transducer composition over a synchronized symbol stream.

use hashbrown::{HashMap, HashSet};
use itertools::iproduct;

use crate::types::{StateId, Symbol, Weight};

use super::Transducer;

/// Error raised when a composition precondition is violated.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// The left operand has an epsilon input transition.
    #[error("left operand of compose must be epsilon-free on the input side")]
    EpsilonInLeft,
    /// The left operand carries a nonzero weight.
    #[error("left operand of compose must be unweighted")]
    WeightedLeft,
    /// An operand has no start state.
    #[error("compose operands must have start states")]
    NoStartState,
}

/// Composes two transducers, synchronizing `m1`'s output symbols with
/// `m2`'s input symbols.
///
/// States of the product are pairs of operand states. `m1` acts as an
/// unweighted lexical mask and must be epsilon-free on its input side;
/// `m2` may carry epsilons and weights, which are copied verbatim onto the
/// product edges. Every state of `m1` is given a virtual epsilon self-loop
/// so that `m2`'s epsilon moves can fire without advancing `m1`. Unreachable
/// product states are pruned by a forward traversal from the product start,
/// and the accepting set (the cross product of the operands' accepting
/// states) is restricted to the reachable subset.
pub fn compose<S1: StateId, S2: StateId>(
    m1: &Transducer<S1>,
    m2: &Transducer<S2>,
) -> Result<Transducer<(S1, S2)>, ComposeError> {
    for (_, input, arc) in m1.edges() {
        if input.is_epsilon() {
            return Err(ComposeError::EpsilonInLeft);
        }
        if arc.weight() != Weight::ZERO {
            return Err(ComposeError::WeightedLeft);
        }
    }
    let start = match (m1.start(), m2.start()) {
        (Some(s1), Some(s2)) => (s1, s2),
        _ => return Err(ComposeError::NoStartState),
    };

    // m1's edges plus a virtual epsilon self-loop on each of its states
    let left: Vec<(S1, Symbol, Symbol, S1)> = m1
        .edges()
        .map(|(from, input, arc)| (from, input, arc.output(), arc.target()))
        .chain(m1.states().map(|s| (s, Symbol::Epsilon, Symbol::Epsilon, s)))
        .collect();
    let right: Vec<(S2, Symbol, Symbol, S2, Weight)> = m2
        .edges()
        .map(|(from, input, arc)| (from, input, arc.output(), arc.target(), arc.weight()))
        .collect();

    #[allow(clippy::type_complexity)]
    let mut product: Vec<((S1, S2), Symbol, (S1, S2), Symbol, Weight)> = Vec::new();
    let mut outgoing: HashMap<(S1, S2), Vec<(S1, S2)>> = HashMap::new();
    for (&(f1, in1, out1, t1), &(f2, in2, out2, t2, w)) in iproduct!(&left, &right) {
        if out1 != in2 {
            continue;
        }
        let from = (f1, f2);
        let to = (t1, t2);
        product.push((from, in1, to, out2, w));
        outgoing.entry(from).or_default().push(to);
    }

    let mut reachable: HashSet<(S1, S2)> = HashSet::new();
    reachable.insert(start);
    let mut queue = vec![start];
    while let Some(state) = queue.pop() {
        for &next in outgoing.get(&state).into_iter().flatten() {
            if reachable.insert(next) {
                queue.push(next);
            }
        }
    }

    let mut composed = Transducer::new();
    composed.set_start(start);
    for (from, input, to, output, weight) in product {
        if reachable.contains(&from) {
            composed.add_transition_full(from, input, to, output, weight);
        }
    }
    let right_accepting: Vec<S2> = m2.accepting_states().collect();
    for (a1, &a2) in iproduct!(m1.accepting_states().collect::<Vec<_>>(), &right_accepting) {
        if reachable.contains(&(a1, a2)) {
            composed.mark_accepting((a1, a2));
        }
    }
    log::debug!(
        "compose: {} reachable of {} product states, {} edges kept",
        reachable.len(),
        m1.state_count() * m2.state_count(),
        composed.edge_count()
    );
    Ok(composed)
}
