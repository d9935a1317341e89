/// Nesting depth accepted by the parser and the evaluator unless the host asks otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What the read-loop prints for each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Evaluate the line and print the resulting value.
    Eval,
    /// Print the parsed program in its fully parenthesised form.
    Ast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub max_depth: usize,
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            mode: Mode::Eval,
        }
    }
}
