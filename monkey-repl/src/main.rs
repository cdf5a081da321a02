mod error;
mod repl;
mod runner;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::RunnerError;

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum Mode {
    /// Evaluate the input and print the result
    Eval,
    /// Print the parsed program in its canonical form
    Ast,
    /// Print the token stream
    Tokens,
}

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, value_enum, default_value_t = Mode::Eval)]
    mode: Mode,
    /// Source file to run once instead of starting the REPL
    path: Option<PathBuf>,
}

fn main() -> Result<(), RunnerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.path {
        None => repl::start(cli.mode),
        Some(path) => runner::execute(&path, cli.mode),
    }
}
