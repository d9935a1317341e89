use crate::{
    eval::value::ValueType,
    parser::ast::{Ident, Infix, Prefix},
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unknown operator: {operator}{operand}")]
    UnknownPrefixOperator {
        operator: Prefix,
        operand: ValueType,
    },
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: ValueType,
        operator: Infix,
        right: ValueType,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: ValueType,
        operator: Infix,
        right: ValueType,
    },
    #[error("division by zero: {0} / 0")]
    DivisionByZero(i64),
    #[error("integer overflow: {left} {operator} {right}")]
    IntegerOverflow {
        left: i64,
        operator: Infix,
        right: i64,
    },
    #[error("integer overflow: -({0})")]
    NegationOverflow(i64),
    #[error("expression too deep (limit {limit})")]
    TooDeeplyNested { limit: usize },
    #[error("identifier not found: {0}")]
    UnboundIdentifier(Ident),
    #[error("{0} is not supported without a binding environment")]
    Unsupported(&'static str),
}
