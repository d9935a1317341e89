use crate::{eval::error::EvalError, parser::error::ParseError};
use std::fmt::{self, Display};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Not produced by the current scanner, which turns unknown input into `Illegal`
    /// tokens. Kept so `lex_input` can grow rejecting rules.
    #[error("lexing failed: {0}")]
    Lex(String),
    #[error("parser errors:\n{0}")]
    Parse(ParseErrors),
    #[error("ERROR: {0}")]
    Eval(#[from] EvalError),
}

/// Every syntax error found in one source, in detection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrors(pub Vec<ParseError>);

impl Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0
            .iter()
            .try_for_each(|error| writeln!(f, "\t{}", error))
    }
}

impl From<Vec<ParseError>> for Error {
    fn from(errors: Vec<ParseError>) -> Self {
        Error::Parse(ParseErrors(errors))
    }
}
