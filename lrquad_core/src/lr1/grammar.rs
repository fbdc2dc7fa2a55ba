use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;

use crate::{GenerationError, Rule, Symbol};

/// A context-free grammar whose rule 0 is the start rule.
#[derive(Debug, Clone)]
pub struct Grammar<T, N>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    pub start: N,
    pub end: T,
    pub nonterminals: BTreeSet<N>,
    pub terminals: BTreeSet<T>,
    pub rules: Vec<Rule<T, N>>,
}

impl<T, N> Grammar<T, N>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    /// Build a grammar from its rule list, collecting the terminal and nonterminal sets.
    ///
    /// `end` is the end-of-input marker. Every nonterminal that appears on a right-hand side
    /// must have at least one rule.
    pub fn new(end: T, rules: Vec<Rule<T, N>>) -> Result<Self, GenerationError<T, N>> {
        let start = match rules.first() {
            Some(rule) => rule.lhs.clone(),
            None => return Err(GenerationError::MissingStartRule),
        };

        let nonterminals: BTreeSet<N> = rules.iter().map(|rule| rule.lhs.clone()).collect();
        let mut terminals = BTreeSet::new();
        terminals.insert(end.clone());

        for rule in rules.iter() {
            for symbol in rule.rhs.iter() {
                match symbol {
                    Symbol::Terminal(t) => {
                        terminals.insert(t.clone());
                    }
                    Symbol::Nonterminal(n) => {
                        if !nonterminals.contains(n) {
                            return Err(GenerationError::UndefinedNonterminal(n.clone()));
                        }
                    }
                }
            }
        }

        Ok(Grammar {
            start,
            end,
            nonterminals,
            terminals,
            rules,
        })
    }

    pub fn start_rule(&self) -> &Rule<T, N> {
        &self.rules[0]
    }

    /// All rules defining `nonterminal`, together with their indices.
    pub fn rules_for<'g>(
        &'g self,
        nonterminal: &'g N,
    ) -> impl Iterator<Item = (usize, &'g Rule<T, N>)> + 'g {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.lhs == *nonterminal)
    }

    pub fn is_terminal(&self, symbol: &Symbol<T, N>) -> bool {
        match symbol {
            Symbol::Terminal(t) => self.terminals.contains(t),
            Symbol::Nonterminal(_) => false,
        }
    }

    pub fn is_nonterminal(&self, symbol: &Symbol<T, N>) -> bool {
        match symbol {
            Symbol::Terminal(_) => false,
            Symbol::Nonterminal(n) => self.nonterminals.contains(n),
        }
    }
}
