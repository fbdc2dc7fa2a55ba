use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::Hash;

use crate::{Grammar, Symbol};

/// FIRST set of a symbol or symbol sequence
///
/// `nullable` plays the role of the empty marker: it is set when the sequence can derive ε.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct First<T>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    pub terminals: BTreeSet<T>,
    pub nullable: bool,
}

impl<T> First<T>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    /// FIRST of the empty sequence.
    pub fn epsilon() -> Self {
        First {
            terminals: BTreeSet::new(),
            nullable: true,
        }
    }

    fn nothing() -> Self {
        First {
            terminals: BTreeSet::new(),
            nullable: false,
        }
    }

    /// Merge `other` into `self`, returning whether anything was added.
    fn absorb(&mut self, other: &First<T>) -> bool {
        let before = self.terminals.len();
        self.terminals.extend(other.terminals.iter().cloned());
        let mut changed = self.terminals.len() != before;
        if other.nullable && !self.nullable {
            self.nullable = true;
            changed = true;
        }
        changed
    }
}

/// FIRST sets of every nonterminal of a grammar
///
/// Computed once by iterating all rules until no set grows. Left-recursive rules simply
/// contribute nothing new on later rounds, so no recursion guard is needed.
#[derive(Debug, Clone)]
pub struct FirstSets<T, N>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    sets: BTreeMap<N, First<T>>,
}

impl<T, N> FirstSets<T, N>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    pub fn compute(grammar: &Grammar<T, N>) -> Self {
        let mut sets: BTreeMap<N, First<T>> = grammar
            .nonterminals
            .iter()
            .map(|n| (n.clone(), First::nothing()))
            .collect();

        loop {
            let mut changed = false;
            for rule in grammar.rules.iter() {
                let derived = sequence_first(&sets, &rule.rhs);
                if let Some(first) = sets.get_mut(&rule.lhs) {
                    changed |= first.absorb(&derived);
                }
            }
            if !changed {
                break;
            }
        }

        FirstSets { sets }
    }

    /// FIRST of a single symbol. A terminal is its own FIRST set.
    pub fn of_symbol(&self, symbol: &Symbol<T, N>) -> First<T> {
        sequence_first(&self.sets, std::slice::from_ref(symbol))
    }

    /// FIRST of a symbol sequence.
    pub fn of_sequence(&self, symbols: &[Symbol<T, N>]) -> First<T> {
        sequence_first(&self.sets, symbols)
    }

    /// Lookahead terminals for the suffix `beta` of an item whose own lookahead is `inherited`.
    pub fn lookahead(&self, beta: &[Symbol<T, N>], inherited: &T) -> BTreeSet<T> {
        let first = self.of_sequence(beta);
        let mut lookahead = first.terminals;
        if first.nullable {
            lookahead.insert(inherited.clone());
        }
        lookahead
    }
}

fn sequence_first<T, N>(sets: &BTreeMap<N, First<T>>, symbols: &[Symbol<T, N>]) -> First<T>
where
    T: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
    N: fmt::Debug + fmt::Display + Ord + Clone + Eq + Hash,
{
    let mut first = First::epsilon();
    for symbol in symbols {
        match symbol {
            Symbol::Terminal(t) => {
                first.terminals.insert(t.clone());
                first.nullable = false;
                return first;
            }
            Symbol::Nonterminal(n) => match sets.get(n) {
                Some(n_first) => {
                    first.terminals.extend(n_first.terminals.iter().cloned());
                    if !n_first.nullable {
                        first.nullable = false;
                        return first;
                    }
                }
                None => {
                    first.nullable = false;
                    return first;
                }
            },
        }
    }
    first
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Rule;

    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum T {
        A,
        C,
        D,
        Plus,
        End,
    }

    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum N {
        Z,
        X,
        Y,
        E,
    }

    impl fmt::Display for T {
        fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
            write!(f, "{:?}", self)
        }
    }

    impl fmt::Display for N {
        fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
            write!(f, "{:?}", self)
        }
    }

    fn t(t: T) -> Symbol<T, N> {
        Symbol::Terminal(t)
    }

    fn n(n: N) -> Symbol<T, N> {
        Symbol::Nonterminal(n)
    }

    fn set(terminals: &[T]) -> BTreeSet<T> {
        terminals.iter().cloned().collect()
    }

    fn nullable_grammar() -> Grammar<T, N> {
        // Z → d | X Y Z
        // Y → ε | c
        // X → Y | a
        let rules = vec![
            Rule { lhs: N::Z, rhs: vec![t(T::D)] },
            Rule { lhs: N::Z, rhs: vec![n(N::X), n(N::Y), n(N::Z)] },
            Rule { lhs: N::Y, rhs: vec![] },
            Rule { lhs: N::Y, rhs: vec![t(T::C)] },
            Rule { lhs: N::X, rhs: vec![n(N::Y)] },
            Rule { lhs: N::X, rhs: vec![t(T::A)] },
        ];
        Grammar::new(T::End, rules).unwrap()
    }

    #[test]
    fn test_nullable_nonterminals() {
        let first_sets = FirstSets::compute(&nullable_grammar());

        let x = first_sets.of_symbol(&n(N::X));
        assert!(x.nullable);
        assert_eq!(x.terminals, set(&[T::A, T::C]));

        let z = first_sets.of_symbol(&n(N::Z));
        assert!(!z.nullable);
        assert_eq!(z.terminals, set(&[T::A, T::C, T::D]));
    }

    #[test]
    fn test_terminal_is_own_first_set() {
        let first_sets = FirstSets::compute(&nullable_grammar());
        let first = first_sets.of_symbol(&t(T::D));
        assert!(!first.nullable);
        assert_eq!(first.terminals, set(&[T::D]));
    }

    #[test]
    fn test_left_recursion_terminates() {
        // E → E + A | A
        let rules = vec![
            Rule { lhs: N::E, rhs: vec![n(N::E), t(T::Plus), t(T::A)] },
            Rule { lhs: N::E, rhs: vec![t(T::A)] },
        ];
        let grammar = Grammar::new(T::End, rules).unwrap();
        let first_sets = FirstSets::compute(&grammar);
        assert_eq!(first_sets.of_symbol(&n(N::E)).terminals, set(&[T::A]));
    }

    #[test]
    fn test_lookahead_inherits_through_nullable_suffix() {
        let first_sets = FirstSets::compute(&nullable_grammar());
        assert_eq!(
            first_sets.lookahead(&[n(N::Y)], &T::End),
            set(&[T::C, T::End])
        );
        assert_eq!(first_sets.lookahead(&[n(N::Y), t(T::D)], &T::End), set(&[T::C, T::D]));
        assert_eq!(first_sets.lookahead(&[], &T::Plus), set(&[T::Plus]));
    }
}
