//! Character-edit weight tables supplied by the external cost estimator.
//!
//! The estimator ships a JSON object mapping source character to target
//! character to an observed edit count; the empty-string key stands for
//! epsilon (insertions and deletions). This module only consumes such
//! tables, it never produces them.

use std::collections::BTreeSet;
use std::io::Read;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::types::{Symbol, Weight};

/// Error raised while loading or querying a weight table.
#[derive(Debug, thiserror::Error)]
pub enum WeightError {
    /// No entries exist for the requested source symbol.
    #[error("no weight entries for source symbol '{0}'")]
    MissingWeight(Symbol),
    /// A table key was neither a single character nor the empty string.
    #[error("weight table key {0:?} is not a single character or empty")]
    BadSymbolKey(SmolStr),
    /// The table could not be parsed.
    #[error("malformed weight table: {0}")]
    Json(#[from] serde_json::Error),
}

/// How to cost an identity substitution (`a` to `a`).
///
/// The estimator upstream leaves open whether identity should be free even
/// when the corpus never witnessed it; both readings are supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityCost {
    /// Identity always costs zero.
    Free,
    /// Identity is costed from the counts like any other pair.
    Estimated,
}

/// Edit counts keyed by (source symbol, target symbol), with smoothed cost
/// lookup.
#[derive(Clone, Debug)]
pub struct WeightTable {
    counts: HashMap<Symbol, HashMap<Symbol, u64>>,
    identity: IdentityCost,
}

impl WeightTable {
    /// Builds a table from raw string-keyed counts, as found in the JSON
    /// interchange format.
    pub fn from_counts(
        raw: HashMap<SmolStr, HashMap<SmolStr, u64>>,
    ) -> Result<WeightTable, WeightError> {
        let mut counts = HashMap::new();
        for (source, row) in raw {
            let source = symbol_key(&source)?;
            let mut converted = HashMap::new();
            for (target, count) in row {
                converted.insert(symbol_key(&target)?, count);
            }
            counts.insert(source, converted);
        }
        Ok(WeightTable {
            counts,
            identity: IdentityCost::Free,
        })
    }

    /// Parses a table from its JSON interchange form.
    pub fn from_json_str(json: &str) -> Result<WeightTable, WeightError> {
        WeightTable::from_counts(serde_json::from_str(json)?)
    }

    /// Reads and parses a table from a JSON stream.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<WeightTable, WeightError> {
        WeightTable::from_counts(serde_json::from_reader(reader)?)
    }

    /// Replaces the identity-substitution policy.
    pub fn with_identity_cost(mut self, identity: IdentityCost) -> WeightTable {
        self.identity = identity;
        self
    }

    /// The source symbols that have a row of counts.
    pub fn sources(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.counts.keys().copied()
    }

    /// Every symbol mentioned anywhere in the table, epsilon included,
    /// in a stable order.
    pub fn alphabet(&self) -> Vec<Symbol> {
        let mut symbols: BTreeSet<Symbol> = BTreeSet::new();
        for (&source, row) in &self.counts {
            symbols.insert(source);
            symbols.extend(row.keys().copied());
        }
        symbols.into_iter().collect()
    }

    /// The smoothed cost of editing `from` into `to`.
    ///
    /// Costs are `1 − p` with add-one smoothing over the row:
    /// `p = (count + 1) / (row total + row length)`. A missing row is a
    /// loud error; a missing cell within a present row takes the smoothing
    /// default (count 0). Identity pairs cost zero under
    /// [`IdentityCost::Free`].
    pub fn cost(&self, from: Symbol, to: Symbol) -> Result<Weight, WeightError> {
        if from == to && self.identity == IdentityCost::Free {
            return Ok(Weight::ZERO);
        }
        let row = self
            .counts
            .get(&from)
            .ok_or(WeightError::MissingWeight(from))?;
        let count = row.get(&to).copied().unwrap_or(0);
        let total: u64 = row.values().sum();
        let p = (count as f32 + 1.0) / (total as f32 + row.len() as f32);
        Ok(Weight(1.0 - p))
    }
}

fn symbol_key(key: &str) -> Result<Symbol, WeightError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(Symbol::Epsilon),
        (Some(c), None) => Ok(Symbol::Char(c)),
        _ => Err(WeightError::BadSymbolKey(key.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> Symbol {
        Symbol::Char(c)
    }

    const TABLE: &str = r#"{
        "a": {"a": 8, "e": 2},
        "e": {"e": 9, "a": 1},
        "": {"s": 4}
    }"#;

    #[test]
    fn parses_json_counts() {
        let table = WeightTable::from_json_str(TABLE).unwrap();
        let mut sources: Vec<Symbol> = table.sources().collect();
        sources.sort();
        assert_eq!(sources, vec![Symbol::Epsilon, sym('a'), sym('e')]);
        assert!(table.alphabet().contains(&sym('s')));
    }

    #[test]
    fn laplace_smoothed_cost() {
        let table = WeightTable::from_json_str(TABLE).unwrap();
        // row "a": total 10, two cells: p(a -> e) = (2 + 1) / (10 + 2)
        let cost = table.cost(sym('a'), sym('e')).unwrap();
        assert!((cost.0 - 0.75).abs() < 1e-6);
    }

    #[test]
    fn missing_cell_takes_smoothing_default() {
        let table = WeightTable::from_json_str(TABLE).unwrap();
        // count 0: p = 1 / 12
        let cost = table.cost(sym('a'), Symbol::Epsilon).unwrap();
        assert!((cost.0 - (1.0 - 1.0 / 12.0)).abs() < 1e-6);
    }

    #[test]
    fn missing_row_fails_loudly() {
        let table = WeightTable::from_json_str(TABLE).unwrap();
        assert!(matches!(
            table.cost(sym('z'), sym('a')),
            Err(WeightError::MissingWeight(_))
        ));
    }

    #[test]
    fn identity_policy() {
        let table = WeightTable::from_json_str(TABLE).unwrap();
        assert_eq!(table.cost(sym('a'), sym('a')).unwrap(), Weight::ZERO);

        let estimated = table.with_identity_cost(IdentityCost::Estimated);
        // p(a -> a) = (8 + 1) / (10 + 2)
        let cost = estimated.cost(sym('a'), sym('a')).unwrap();
        assert!((cost.0 - 0.25).abs() < 1e-6);
    }

    #[test]
    fn multi_character_key_is_rejected() {
        let result = WeightTable::from_json_str(r#"{"ab": {"a": 1}}"#);
        assert!(matches!(result, Err(WeightError::BadSymbolKey(_))));
    }

    #[test]
    fn identity_without_a_row_is_free_by_default() {
        let table = WeightTable::from_json_str(TABLE).unwrap();
        assert_eq!(table.cost(sym('z'), sym('z')).unwrap(), Weight::ZERO);
    }
}
