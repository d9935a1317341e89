use crate::lexer::token::TokenKind;
use thiserror::Error;

/// A syntax error recorded while parsing. None of them stop the parse except
/// `TooDeeplyNested`, which skips the rest of the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected next token to be {expected}, got {found} instead")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
    },
    #[error("no prefix parse function for {0} found")]
    NoPrefixParseFn(TokenKind),
    #[error("could not parse {0:?} as integer")]
    InvalidInteger(String),
    #[error("expression too deep (limit {limit})")]
    TooDeeplyNested { limit: usize },
}
