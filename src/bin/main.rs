use clap::Parser;
use libmonkey::{config::DEFAULT_MAX_DEPTH, repl, Config, Mode};
use std::{
    env, fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
};

/// Interpreter for the Monkey programming language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Evaluate this file as one program instead of starting the REPL.
    file: Option<PathBuf>,

    /// Print the parsed program instead of evaluating it.
    #[arg(short, long)]
    ast: bool,

    /// Deepest expression nesting accepted by the parser and the evaluator.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = Config {
        max_depth: args.max_depth,
        mode: if args.ast { Mode::Ast } else { Mode::Eval },
    };

    match args.file {
        Some(path) => run_file(&path, &config),
        None => run_repl(&config),
    }
}

fn run_file(path: &Path, config: &Config) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match config.mode {
        Mode::Ast => libmonkey::parse(&source, config).map(|program| program.to_string()),
        Mode::Eval => libmonkey::run(&source, config).map(|value| value.to_string()),
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.to_string().trim_end());
            ExitCode::FAILURE
        }
    }
}

fn run_repl(config: &Config) -> ExitCode {
    let greeting = match env::var("USER").or_else(|_| env::var("USERNAME")) {
        Ok(user) => format!("Hello {}! This is the Monkey programming language!", user),
        Err(_) => "Hello! This is the Monkey programming language!".to_string(),
    };
    println!("{}", greeting);
    println!("Feel free to type in commands");

    let stdin = io::stdin();
    if let Err(e) = repl::start(stdin.lock(), io::stdout(), config) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
