pub mod config;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod repl;

pub use config::{Config, Mode};
pub use error::{Error, ParseErrors};
pub use eval::{error::EvalError, evaluate, value::Value, Evaluator};
pub use parser::{ast::Program, error::ParseError, Parser};

use lexer::Lexer;

/// Lexes and parses `source`. Fails unless the whole input is free of syntax errors.
pub fn parse(source: &str, config: &Config) -> Result<Program, Error> {
    let tokens = Lexer::new().lex_input(source).map_err(Error::Lex)?;

    let mut parser = Parser::with_max_depth(tokens, config.max_depth);
    let program = parser.parse_program();

    if !parser.errors().is_empty() {
        return Err(parser.errors().to_vec().into());
    }

    Ok(program)
}

/// Parses and evaluates `source` as one program.
pub fn run(source: &str, config: &Config) -> Result<Value, Error> {
    let program = parse(source, config)?;

    Ok(Evaluator::with_max_depth(config.max_depth).eval(&program)?)
}
