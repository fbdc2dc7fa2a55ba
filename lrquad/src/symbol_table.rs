use std::collections::HashMap;
use std::fmt;

use crate::error::TranslateError;
use crate::grammar::{Nonterminal, Terminal};
use crate::tree::{Node, SyntaxTree};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicType {
    Int,
    Double,
    Boolean,
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            BasicType::Int => "int",
            BasicType::Double => "double",
            BasicType::Boolean => "boolean",
        };
        write!(f, "{}", name)
    }
}

/// Declared type of a variable
///
/// `int[2][3] a;` declares an array of 2 elements, each an array of 3 ints. `size` is `None`
/// for the unsized `type[]` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Basic(BasicType),
    Array {
        element: Box<DeclaredType>,
        size: Option<usize>,
    },
}

impl DeclaredType {
    pub fn is_array(&self) -> bool {
        matches!(self, DeclaredType::Array { .. })
    }

    pub fn as_array(&self) -> Option<(&DeclaredType, Option<usize>)> {
        match self {
            DeclaredType::Array { element, size } => Some((element, *size)),
            DeclaredType::Basic(_) => None,
        }
    }

    fn initial_value(&self) -> Value {
        match self {
            DeclaredType::Array { .. } => Value::Array(Vec::new()),
            DeclaredType::Basic(_) => Value::Undefined,
        }
    }

    fn write_dimensions(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeclaredType::Basic(_) => Ok(()),
            DeclaredType::Array { element, size } => {
                match size {
                    Some(size) => write!(f, "[{}]", size)?,
                    None => write!(f, "[]")?,
                }
                element.write_dimensions(f)
            }
        }
    }

    fn basic(&self) -> BasicType {
        match self {
            DeclaredType::Basic(basic) => *basic,
            DeclaredType::Array { element, .. } => element.basic(),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.basic())?;
        self.write_dimensions(f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub identifier: String,
    pub declared: DeclaredType,
    pub value: Value,
}

/// Declared variables in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every `decl` of `tree`, in source order.
    ///
    /// Scoping is flat: a declaration in a nested block is visible everywhere.
    pub fn from_tree(tree: &SyntaxTree) -> Result<Self, TranslateError> {
        let mut decls = Vec::new();
        tree.walk(&mut |node| {
            if node.is(Nonterminal::Decl) {
                decls.push(node);
            }
        });

        let mut table = SymbolTable::new();
        for decl in decls {
            match decl.children.as_slice() {
                [ty, id, _] => table.declare(&id.value, declared_type(ty)?)?,
                _ => return Err(TranslateError::MalformedNode(Nonterminal::Decl)),
            }
        }
        Ok(table)
    }

    pub fn declare(
        &mut self,
        identifier: &str,
        declared: DeclaredType,
    ) -> Result<(), TranslateError> {
        if self.index.contains_key(identifier) {
            return Err(TranslateError::Redeclared(identifier.to_owned()));
        }
        self.index.insert(identifier.to_owned(), self.entries.len());
        self.entries.push(SymbolEntry {
            identifier: identifier.to_owned(),
            value: declared.initial_value(),
            declared,
        });
        Ok(())
    }

    pub fn get(&self, identifier: &str) -> Option<&SymbolEntry> {
        self.index.get(identifier).map(|&idx| &self.entries[idx])
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut SymbolEntry> {
        match self.index.get(identifier) {
            Some(&idx) => self.entries.get_mut(idx),
            None => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for entry in self.entries.iter() {
            writeln!(f, "{} : {} = {}", entry.identifier, entry.declared, entry.value)?;
        }
        Ok(())
    }
}

/// Read the declared type off a `type` node.
fn declared_type(node: &Node) -> Result<DeclaredType, TranslateError> {
    let mut sizes = Vec::new();
    let basic = collect_dimensions(node, &mut sizes)?;
    // The innermost `array` node holds the leftmost bracket pair.
    Ok(sizes
        .into_iter()
        .rev()
        .fold(DeclaredType::Basic(basic), |element, size| {
            DeclaredType::Array {
                element: Box::new(element),
                size,
            }
        }))
}

fn collect_dimensions(
    node: &Node,
    sizes: &mut Vec<Option<usize>>,
) -> Result<BasicType, TranslateError> {
    let malformed = || TranslateError::MalformedNode(Nonterminal::Type);
    let child = match node.children.as_slice() {
        [child] => child,
        _ => return Err(malformed()),
    };

    match child.terminal() {
        Some(Terminal::Int) => return Ok(BasicType::Int),
        Some(Terminal::Double) => return Ok(BasicType::Double),
        Some(Terminal::Boolean) => return Ok(BasicType::Boolean),
        Some(_) => return Err(malformed()),
        None => {}
    }

    let (element, size) = match child.children.as_slice() {
        [element, _, size, _] => {
            let size = size
                .value
                .parse::<usize>()
                .map_err(|_| TranslateError::InvalidArraySize(size.value.clone()))?;
            (element, Some(size))
        }
        [element, _, _] => (element, None),
        _ => return Err(TranslateError::MalformedNode(Nonterminal::Array)),
    };
    let basic = collect_dimensions(element, sizes)?;
    sizes.push(size);
    Ok(basic)
}
