use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::Hash;

use crate::{FirstSets, Grammar, Symbol};

/// LR(1) item
///
/// An item refers to its rule by index into the grammar's rule list. Two items are equal
/// when rule, dot position and lookahead are all equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item<T>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    pub rule_idx: usize,
    pub pos: usize,
    pub lookahead: T,
}

/// A deduplicated set of items, i.e. one automaton state.
///
/// Using BTreeSet here, as it implements Hash and compares independently of insertion order.
pub type ItemSet<T> = BTreeSet<Item<T>>;

impl<T> Item<T>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    pub fn new(rule_idx: usize, lookahead: T) -> Self {
        Item {
            rule_idx,
            pos: 0,
            lookahead,
        }
    }

    pub fn next_symbol<'g, N>(&self, grammar: &'g Grammar<T, N>) -> Option<&'g Symbol<T, N>>
    where
        N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    {
        grammar.rules[self.rule_idx].rhs.get(self.pos)
    }

    pub fn is_pos_at_end<N>(&self, grammar: &Grammar<T, N>) -> bool
    where
        N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    {
        self.pos == grammar.rules[self.rule_idx].rhs.len()
    }

    /// The same item with the dot moved one symbol to the right.
    pub fn advance(&self) -> Self {
        Item {
            pos: self.pos + 1,
            ..self.clone()
        }
    }

    /// Lookahead set propagated to items spawned by this one
    ///
    /// At the end of the rule this is the item's own lookahead. Otherwise it is
    /// FIRST(beta), where beta follows the symbol after the dot, plus the item's own
    /// lookahead if beta can derive ε.
    pub fn lookahead_set<N>(
        &self,
        grammar: &Grammar<T, N>,
        first_sets: &FirstSets<T, N>,
    ) -> BTreeSet<T>
    where
        N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    {
        let rhs = &grammar.rules[self.rule_idx].rhs;
        if self.pos >= rhs.len() {
            let mut set = BTreeSet::new();
            set.insert(self.lookahead.clone());
            return set;
        }
        first_sets.lookahead(&rhs[self.pos + 1..], &self.lookahead)
    }

    pub fn augmented_rule_string<N>(&self, grammar: &Grammar<T, N>) -> String
    where
        N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    {
        let rule = &grammar.rules[self.rule_idx];
        let mut result = format!("{} → ", rule.lhs);
        for p in 0..=rule.rhs.len() {
            if p == self.pos {
                result.push_str(" • ");
            }
            if p < rule.rhs.len() {
                result.push_str(&format!(" {} ", rule.rhs[p]));
            }
        }
        result
    }

    pub fn lookahead_string(&self) -> String {
        format!("{}", self.lookahead)
    }

    pub fn describe<N>(&self, grammar: &Grammar<T, N>) -> String
    where
        N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    {
        format!(
            "{} {{{}}}",
            self.augmented_rule_string(grammar),
            self.lookahead_string()
        )
    }
}

/// Symbols that appear right after the dot of some item in `items`, in first-seen order.
pub(crate) fn dot_symbols<T, N>(grammar: &Grammar<T, N>, items: &ItemSet<T>) -> Vec<Symbol<T, N>>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    let mut seen = HashSet::new();
    let mut symbols = Vec::new();
    for item in items.iter() {
        if let Some(symbol) = item.next_symbol(grammar) {
            if seen.insert(symbol) {
                symbols.push(symbol.clone());
            }
        }
    }
    symbols
}
