mod grammar;
pub use self::grammar::Grammar;

mod rule;
pub use self::rule::Rule;

mod parse_table;
pub use self::parse_table::ParseTable;

mod collection;
pub use self::collection::{closure, goto, CanonicalCollection};

mod item;
pub use self::item::{Item, ItemSet};

mod first;
pub use self::first::{First, FirstSets};

mod symbol;
pub use self::symbol::Symbol;

mod action;
pub use self::action::Action;
