use std::fmt::{self, Display};

/// Result of evaluating a node. Values compare structurally; there are no shared
/// `true`/`false`/`null` instances to compare by identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Null,
}

/// Type tag used in evaluation error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer,
    Boolean,
    Null,
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Integer(_) => ValueType::Integer,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Null => ValueType::Null,
        }
    }

    /// Everything except `false` and `null` counts as true.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(int) => write!(f, "{}", int),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Integer => write!(f, "INTEGER"),
            ValueType::Boolean => write!(f, "BOOLEAN"),
            ValueType::Null => write!(f, "NULL"),
        }
    }
}
