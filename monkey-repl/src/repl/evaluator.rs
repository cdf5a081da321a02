use monkey_core::ast::Program;
use monkey_core::lexer::{Lexer, Token};
use monkey_core::parser::{self, ParseError};
use monkey_interpreter::environment::Environment;
use monkey_interpreter::evaluator;
use monkey_interpreter::object::Object;

pub trait Evaluator {
    type Object;

    fn evaluate(&mut self, input: &str) -> Self::Object;
}

/// Evaluates every line against the same root environment, so bindings
/// survive from one line to the next.
#[derive(Default)]
pub struct InterpreterEvaluator {
    environment: Environment,
}

impl InterpreterEvaluator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Evaluator for InterpreterEvaluator {
    type Object = Result<Object, Vec<ParseError>>;

    fn evaluate(&mut self, input: &str) -> Self::Object {
        let program = parser::parse(input)?;
        Ok(evaluator::eval_program(&program, &self.environment))
    }
}

pub struct AstEvaluator;

impl Evaluator for AstEvaluator {
    type Object = Result<Program, Vec<ParseError>>;

    fn evaluate(&mut self, input: &str) -> Self::Object {
        parser::parse(input)
    }
}

pub struct TokenEvaluator;

impl Evaluator for TokenEvaluator {
    type Object = Vec<Token>;

    fn evaluate(&mut self, input: &str) -> Self::Object {
        Lexer::new(input).collect()
    }
}
