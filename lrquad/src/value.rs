use std::fmt;

/// A runtime value held by a variable, an array element or a temporary
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Number(f64),
    Bool(bool),
    Array(Vec<Value>),
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Array(_) => "array",
        }
    }

    /// Parse a constant literal: `true`, `false` or a number.
    pub fn from_literal(literal: &str) -> Option<Value> {
        match literal {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => literal.parse::<f64>().ok().map(Value::Number),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Array(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(Value::from_literal("true"), Some(Value::Bool(true)));
        assert_eq!(Value::from_literal("2.5"), Some(Value::Number(2.5)));
        assert_eq!(Value::from_literal("7."), Some(Value::Number(7.0)));
        assert_eq!(Value::from_literal("x"), None);
    }

    #[test]
    fn test_display() {
        let value = Value::Array(vec![
            Value::Number(7.0),
            Value::Undefined,
            Value::Number(0.5),
            Value::Bool(false),
        ]);
        assert_eq!(value.to_string(), "[7, undefined, 0.5, false]");
    }
}
