use monkey_core::ast::Program;
use monkey_core::lexer::Token;
use monkey_core::parser::ParseError;
use monkey_interpreter::object::Object;

pub trait Printer {
    type Object;

    fn render(&self, object: &Self::Object) -> String;

    fn print(&mut self, object: Self::Object) {
        println!("{}", self.render(&object));
    }
}

fn render_parse_errors(errors: &[ParseError]) -> String {
    let mut rendered = String::from("parser errors:");
    for error in errors {
        rendered.push_str("\n\t");
        rendered.push_str(&error.to_string());
    }
    rendered
}

pub struct InterpreterPrinter;

impl Printer for InterpreterPrinter {
    type Object = Result<Object, Vec<ParseError>>;

    fn render(&self, object: &Self::Object) -> String {
        match object {
            Ok(object) => object.inspect(),
            Err(errors) => render_parse_errors(errors),
        }
    }
}

pub struct AstPrinter;

impl Printer for AstPrinter {
    type Object = Result<Program, Vec<ParseError>>;

    fn render(&self, object: &Self::Object) -> String {
        match object {
            Ok(program) => program.to_string(),
            Err(errors) => render_parse_errors(errors),
        }
    }
}

pub struct TokenPrinter;

impl Printer for TokenPrinter {
    type Object = Vec<Token>;

    fn render(&self, tokens: &Self::Object) -> String {
        tokens
            .iter()
            .map(Token::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
