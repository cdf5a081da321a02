pub mod evaluator;
pub mod printer;
mod reader;

use log::debug;
use rustyline::DefaultEditor;

use evaluator::{AstEvaluator, Evaluator, InterpreterEvaluator, TokenEvaluator};
use printer::{AstPrinter, InterpreterPrinter, Printer, TokenPrinter};
use reader::{ReadOutput, Reader};

use crate::error::RunnerError;
use crate::Mode;

struct Repl<E: Evaluator, P: Printer> {
    reader: Reader,
    evaluator: E,
    printer: P,
}

impl<O, E: Evaluator<Object = O>, P: Printer<Object = O>> Repl<E, P> {
    fn run(mut self) -> Result<(), RunnerError> {
        loop {
            match self.reader.read()? {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Value(line) => {
                    let result = self.evaluator.evaluate(&line);
                    self.printer.print(result)
                }
            }
        }
        Ok(())
    }
}

pub fn start(mode: Mode) -> Result<(), RunnerError> {
    let rl = DefaultEditor::new()?;
    debug!("starting repl in {:?} mode", mode);

    match mode {
        Mode::Eval => Repl {
            reader: Reader::new(rl),
            evaluator: InterpreterEvaluator::new(),
            printer: InterpreterPrinter,
        }
        .run(),
        Mode::Ast => Repl {
            reader: Reader::new(rl),
            evaluator: AstEvaluator,
            printer: AstPrinter,
        }
        .run(),
        Mode::Tokens => Repl {
            reader: Reader::new(rl),
            evaluator: TokenEvaluator,
            printer: TokenPrinter,
        }
        .run(),
    }
}
