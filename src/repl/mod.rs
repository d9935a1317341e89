use std::io::{self, BufRead, Write};

use crate::{
    config::{Config, Mode},
    error::Error,
    eval::Evaluator,
};

pub const PROMPT: &str = ">> ";

/// Reads one program per line from `input` until it runs dry, writing the prompt
/// and each line's result to `output`.
pub fn start<R: BufRead, W: Write>(mut input: R, mut output: W, config: &Config) -> io::Result<()> {
    let mut buffer = String::new();
    let mut evaluator = Evaluator::with_max_depth(config.max_depth);

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        buffer.clear();
        if input.read_line(&mut buffer)? == 0 {
            return Ok(());
        }

        if buffer.trim().is_empty() {
            continue;
        }

        let program = match crate::parse(&buffer, config) {
            Ok(program) => program,
            Err(Error::Parse(errors)) => {
                writeln!(output, "parser errors:")?;
                write!(output, "{}", errors)?;
                continue;
            }
            Err(e) => {
                writeln!(output, "{}", e)?;
                continue;
            }
        };

        match config.mode {
            Mode::Ast => writeln!(output, "{}", program)?,
            Mode::Eval => match evaluator.eval(&program) {
                Ok(value) => writeln!(output, "{}", value)?,
                Err(e) => writeln!(output, "ERROR: {}", e)?,
            },
        }
    }
}
