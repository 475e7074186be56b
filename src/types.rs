//! Shared primitive types: states, symbols and weights.

use std::fmt;
use std::hash::Hash;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Bound satisfied by anything usable as a state identifier.
///
/// Primitive machines use [`State`]. Composition produces `(S1, S2)` pair
/// states, which satisfy the bound through the blanket impl.
pub trait StateId: Copy + Eq + Ord + Hash + fmt::Debug {}

impl<T> StateId for T where T: Copy + Eq + Ord + Hash + fmt::Debug {}

/// State identifier of a primitive (non-composed) automaton or transducer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[serde(transparent)]
pub struct State(pub u32);

impl State {
    pub(crate) const ZERO: Self = State(0);
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transition label: a character, or epsilon (nothing consumed/emitted).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// The empty-string marker.
    Epsilon,
    /// An ordinary character.
    Char(char),
}

impl Symbol {
    /// Whether this is the epsilon symbol.
    #[inline(always)]
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    /// Appends the symbol to an output string. Epsilon appends nothing.
    #[inline(always)]
    pub(crate) fn push_onto(&self, out: &mut String) {
        if let Symbol::Char(c) = self {
            out.push(*c);
        }
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::Char(c)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "ε"),
            Symbol::Char(c) => write!(f, "{}", c),
        }
    }
}

/// Transition cost. Lower is better; paths accumulate by addition.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Weight(pub f32);

impl Weight {
    /// The zero weight, carried by identity and unweighted transitions.
    pub const ZERO: Self = Weight(0.0);

    #[inline(always)]
    pub(crate) fn to_bits(self) -> u32 {
        self.0.to_bits()
    }

    #[inline(always)]
    pub(crate) fn from_bits(bits: u32) -> Self {
        Weight(f32::from_bits(bits))
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Weight {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Weight(self.0 + rhs.0)
    }
}

impl Sub for Weight {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Weight(self.0 - rhs.0)
    }
}
