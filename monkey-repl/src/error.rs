use std::io;
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("could not read {}: {source}", path.display())]
    ReadSource { path: PathBuf, source: io::Error },
    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),
}
