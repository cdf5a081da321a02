use std::fs;
use std::path::Path;

use log::info;

use crate::error::RunnerError;
use crate::repl::evaluator::{AstEvaluator, Evaluator, InterpreterEvaluator, TokenEvaluator};
use crate::repl::printer::{AstPrinter, InterpreterPrinter, Printer, TokenPrinter};
use crate::Mode;

pub fn execute(path: &Path, mode: Mode) -> Result<(), RunnerError> {
    let source = fs::read_to_string(path).map_err(|source| RunnerError::ReadSource {
        path: path.to_owned(),
        source,
    })?;
    info!("running {} ({} bytes)", path.display(), source.len());

    println!("{}", render(&source, mode));
    Ok(())
}

/// Runs `source` as a single program in a fresh environment.
pub fn render(source: &str, mode: Mode) -> String {
    match mode {
        Mode::Eval => InterpreterPrinter.render(&InterpreterEvaluator::new().evaluate(source)),
        Mode::Ast => AstPrinter.render(&AstEvaluator.evaluate(source)),
        Mode::Tokens => TokenPrinter.render(&TokenEvaluator.evaluate(source)),
    }
}
