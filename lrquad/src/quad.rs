use std::fmt;
use std::str::FromStr;

use crate::error::RuntimeError;
use crate::grammar::Terminal;

/// Quadruple operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Index,
    Label,
    Jmp,
    JFalse,
    JTrue,
    Param,
    Call,
    Fetch,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Assign => "=",
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::And => "&&",
            Op::Or => "||",
            Op::Not => "!",
            Op::Index => "[]",
            Op::Label => "label",
            Op::Jmp => "jmp",
            Op::JFalse => "jfalse",
            Op::JTrue => "jtrue",
            Op::Param => "param",
            Op::Call => "call",
            Op::Fetch => "fetch",
        }
    }

    pub fn from_name(name: &str) -> Option<Op> {
        let op = match name {
            "=" => Op::Assign,
            "+" => Op::Add,
            "-" => Op::Sub,
            "*" => Op::Mul,
            "/" => Op::Div,
            "%" => Op::Mod,
            "==" => Op::Eq,
            "!=" => Op::Ne,
            "<" => Op::Lt,
            "<=" => Op::Le,
            ">" => Op::Gt,
            ">=" => Op::Ge,
            "&&" => Op::And,
            "||" => Op::Or,
            "!" => Op::Not,
            "[]" => Op::Index,
            "label" => Op::Label,
            "jmp" => Op::Jmp,
            "jfalse" => Op::JFalse,
            "jtrue" => Op::JTrue,
            "param" => Op::Param,
            "call" => Op::Call,
            "fetch" => Op::Fetch,
            _ => return None,
        };
        Some(op)
    }

    /// The operator computed by an operator terminal in an expression.
    pub fn for_terminal(terminal: Terminal) -> Option<Op> {
        let op = match terminal {
            Terminal::Plus => Op::Add,
            Terminal::Minus => Op::Sub,
            Terminal::Star => Op::Mul,
            Terminal::Slash => Op::Div,
            Terminal::Percent => Op::Mod,
            Terminal::Eq => Op::Eq,
            Terminal::Ne => Op::Ne,
            Terminal::Lt => Op::Lt,
            Terminal::Le => Op::Le,
            Terminal::Gt => Op::Gt,
            Terminal::Ge => Op::Ge,
            Terminal::And => Op::And,
            Terminal::Or => Op::Or,
            Terminal::Not => Op::Not,
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An argument or result slot of a quadruple
///
/// In listings, temporaries print as `%T1`, labels as `@L1` and constants as `#3.5`; names
/// print as themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Name(String),
    Temp(usize),
    Const(String),
    Label(usize),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Name(name) => write!(f, "{}", name),
            Operand::Temp(n) => write!(f, "%T{}", n),
            Operand::Const(literal) => write!(f, "#{}", literal),
            Operand::Label(n) => write!(f, "@L{}", n),
        }
    }
}

impl FromStr for Operand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numbered = |digits: &str| {
            digits
                .parse::<usize>()
                .map_err(|_| format!("invalid operand '{}'", s))
        };

        if let Some(digits) = s.strip_prefix("%T") {
            Ok(Operand::Temp(numbered(digits)?))
        } else if let Some(digits) = s.strip_prefix("@L") {
            Ok(Operand::Label(numbered(digits)?))
        } else if let Some(literal) = s.strip_prefix('#') {
            if literal.is_empty() {
                return Err("empty constant".to_owned());
            }
            Ok(Operand::Const(literal.to_owned()))
        } else if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            Ok(Operand::Name(s.to_owned()))
        } else {
            Err(format!("invalid operand '{}'", s))
        }
    }
}

/// A four-address instruction `(op, arg1, arg2, result)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quadruple {
    pub op: Op,
    pub arg1: Option<Operand>,
    pub arg2: Option<Operand>,
    pub result: Option<Operand>,
}

impl Quadruple {
    pub fn new(
        op: Op,
        arg1: Option<Operand>,
        arg2: Option<Operand>,
        result: Option<Operand>,
    ) -> Self {
        Quadruple {
            op,
            arg1,
            arg2,
            result,
        }
    }

    /// Placeholder naming the value of a leaf; never survives into a finished program.
    pub fn fetch(operand: Operand) -> Self {
        Quadruple::new(Op::Fetch, None, None, Some(operand))
    }

    pub fn label(label: usize) -> Self {
        Quadruple::new(Op::Label, None, None, Some(Operand::Label(label)))
    }

    pub fn jump(label: usize) -> Self {
        Quadruple::new(Op::Jmp, None, None, Some(Operand::Label(label)))
    }

    pub fn branch(op: Op, condition: Operand, label: usize) -> Self {
        Quadruple::new(op, Some(condition), None, Some(Operand::Label(label)))
    }

    pub fn is_fetch(&self) -> bool {
        self.op == Op::Fetch
    }
}

fn write_slot(f: &mut fmt::Formatter, slot: &Option<Operand>) -> fmt::Result {
    match slot {
        Some(operand) => write!(f, "{}", operand),
        None => write!(f, "_"),
    }
}

impl fmt::Display for Quadruple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, ", self.op)?;
        write_slot(f, &self.arg1)?;
        write!(f, ", ")?;
        write_slot(f, &self.arg2)?;
        write!(f, ", ")?;
        write_slot(f, &self.result)?;
        write!(f, ")")
    }
}

impl FromStr for Quadruple {
    type Err = RuntimeError;

    /// Parse one listing line; the error's line number is 0 and filled in by `parse_listing`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: String| RuntimeError::MalformedListing { line: 0, reason };

        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| malformed("expected '(op, arg1, arg2, result)'".to_owned()))?;
        let fields: Vec<&str> = inner.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(malformed(format!("expected 4 fields, found {}", fields.len())));
        }

        let op = Op::from_name(fields[0])
            .ok_or_else(|| RuntimeError::UnknownInstruction(fields[0].to_owned()))?;
        let slot = |field: &str| -> Result<Option<Operand>, RuntimeError> {
            match field {
                "_" => Ok(None),
                _ => field.parse().map(Some).map_err(malformed),
            }
        };

        Ok(Quadruple::new(
            op,
            slot(fields[1])?,
            slot(fields[2])?,
            slot(fields[3])?,
        ))
    }
}

/// Render a program one quadruple per line.
pub fn write_listing(program: &[Quadruple]) -> String {
    program.iter().map(|quad| format!("{}\n", quad)).collect()
}

/// Parse a listing written by `write_listing`. Blank lines and lines starting with `;` are
/// skipped.
pub fn parse_listing(text: &str) -> Result<Vec<Quadruple>, RuntimeError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with(';')
        })
        .map(|(idx, line)| {
            line.parse::<Quadruple>().map_err(|err| match err {
                RuntimeError::MalformedListing { reason, .. } => RuntimeError::MalformedListing {
                    line: idx + 1,
                    reason,
                },
                other => other,
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use matches::assert_matches;

    #[test]
    fn test_display() {
        let quad = Quadruple::new(
            Op::Add,
            Some(Operand::Name("x".to_owned())),
            Some(Operand::Const("2".to_owned())),
            Some(Operand::Temp(3)),
        );
        assert_eq!(quad.to_string(), "(+, x, #2, %T3)");
        assert_eq!(Quadruple::jump(4).to_string(), "(jmp, _, _, @L4)");
    }

    #[test]
    fn test_listing_round_trip() {
        let program = vec![
            Quadruple::label(1),
            Quadruple::new(
                Op::Lt,
                Some(Operand::Name("i".to_owned())),
                Some(Operand::Const("3".to_owned())),
                Some(Operand::Temp(1)),
            ),
            Quadruple::branch(Op::JFalse, Operand::Temp(1), 2),
            Quadruple::new(
                Op::Call,
                Some(Operand::Name("print".to_owned())),
                Some(Operand::Const("0".to_owned())),
                None,
            ),
            Quadruple::jump(1),
            Quadruple::label(2),
        ];
        let listing = write_listing(&program);
        assert_eq!(parse_listing(&listing).unwrap(), program);
    }

    #[test]
    fn test_listing_skips_comments() {
        let program = parse_listing("; header\n\n(=, #1, _, x)\n").unwrap();
        assert_eq!(
            program,
            vec![Quadruple::new(
                Op::Assign,
                Some(Operand::Const("1".to_owned())),
                None,
                Some(Operand::Name("x".to_owned())),
            )]
        );
    }

    #[test]
    fn test_listing_errors() {
        assert_matches!(
            parse_listing("(=, #1, _, x)\n(goto, _, _, @L1)"),
            Err(RuntimeError::UnknownInstruction(ref op)) if op == "goto"
        );
        assert_matches!(
            parse_listing("(=, #1, _, x)\n(+, a, b)"),
            Err(RuntimeError::MalformedListing { line: 2, .. })
        );
        assert_matches!(
            parse_listing("(+, a b, c, d)"),
            Err(RuntimeError::MalformedListing { line: 1, .. })
        );
    }

    #[test]
    fn test_operator_terminals() {
        assert_eq!(Op::for_terminal(Terminal::Percent), Some(Op::Mod));
        assert_eq!(Op::for_terminal(Terminal::Not), Some(Op::Not));
        assert_eq!(Op::for_terminal(Terminal::Assign), None);
    }
}
