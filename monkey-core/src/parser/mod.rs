pub mod error;
pub mod expressions;
pub mod statements;

use log::debug;

use crate::ast::{Identifier, Program};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
pub use error::ParseError;
use statements::parse_statement;

/// Pratt parser over a [`Lexer`]. `current` is the token most recently
/// consumed, `peek` the one after it.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let peek = lexer.next_token();
        Self {
            lexer,
            current: Token::eof(),
            peek,
            errors: Vec::new(),
        }
    }

    pub(crate) fn next_token(&mut self) -> Token {
        let next = self.lexer.next_token();
        let token = std::mem::replace(&mut self.peek, next);
        self.current = token.clone();
        token
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.peek
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    pub(crate) fn next_if(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek_is(kind) {
            Some(self.next_token())
        } else {
            None
        }
    }

    pub(crate) fn expect_token(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.next_token();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(ParseError::unexpected_token(kind, token))
        }
    }

    pub(crate) fn parse_identifier(&mut self) -> Result<Identifier, ParseError> {
        let token = self.expect_token(TokenKind::Ident)?;
        Ok(Identifier {
            name: token.literal.clone(),
            token,
        })
    }

    /// Parses statements until end of input. A statement that fails to parse
    /// is recorded in [`Parser::errors`] and skipped up to the next `;` at the
    /// same nesting depth.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.peek_is(TokenKind::Eof) {
            match parse_statement(self) {
                Ok(statement) => statements.push(statement),
                Err(err) => {
                    self.record_error(err);
                    self.synchronize(false);
                }
            }
        }

        Program { statements }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ParseError::to_string).collect()
    }

    pub(crate) fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub(crate) fn record_error(&mut self, err: ParseError) {
        debug!("syntax error: {}", err);
        self.errors.push(err);
    }

    /// Skips tokens until the last consumed one is a `;` outside any braces
    /// opened while skipping. Inside a block it also stops in front of the
    /// `}` that closes it.
    pub(crate) fn synchronize(&mut self, in_block: bool) {
        let mut depth = 0usize;
        loop {
            if depth == 0 && self.current_is(TokenKind::SemiColon) {
                return;
            }
            if self.peek_is(TokenKind::Eof) {
                return;
            }
            if in_block && depth == 0 && self.peek_is(TokenKind::RBrace) {
                return;
            }
            match self.next_token().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }
}

pub fn parse(input: &str) -> Result<Program, Vec<ParseError>> {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();
    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(parser.errors)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Statement;
    use crate::lexer::Lexer;

    fn test_parsing(tests: Vec<(&str, &str)>) {
        for (input, expected) in tests {
            let program = super::parse(input).unwrap();

            assert_eq!(program.to_string(), expected)
        }
    }

    fn test_errors(tests: Vec<(&str, Vec<&str>)>) {
        for (input, expected) in tests {
            let mut parser = super::Parser::new(Lexer::new(input));
            parser.parse_program();

            assert_eq!(parser.error_messages(), expected, "input: {}", input)
        }
    }

    #[test]
    fn test_let_statements() {
        let tests = vec![
            ("let x = 5;", "let x = 5;"),
            ("let y = true;", "let y = true;"),
            ("let foobar = y;", "let foobar = y;"),
            ("let x = 5; let y = x", "let x = 5;let y = x;"),
        ];

        test_parsing(tests);

        let program = super::parse("let x = 5; let y = 10; let foobar = 838383;").unwrap();
        let names = program
            .statements
            .iter()
            .map(|statement| match statement {
                Statement::Let(statement) => statement.identifier.name.to_string(),
                other => panic!("expected let statement, got {:?}", other),
            })
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["x", "y", "foobar"]);
    }

    #[test]
    fn test_return_statements() {
        let tests = vec![
            ("return 5;", "return 5;"),
            ("return 10; return x", "return 10;return x;"),
            ("return add(1, 2);", "return add(1, 2);"),
        ];

        test_parsing(tests);
    }

    #[test]
    fn test_expression_1() {
        let tests = vec![
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c", "(a + (b * c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
            ),
            ("true", "true"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("3 < 5 == true", "((3 < 5) == true)"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_expression_precedence() {
        let tests = vec![
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("2 / (5 + 5)", "(2 / (5 + 5))"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_literals() {
        let tests = vec![
            ("foobar;", "foobar"),
            ("5;", "5"),
            ("\"hello world\";", "\"hello world\""),
            ("[1, 2 * 2, 3 + 3]", "[1, (2 * 2), (3 + 3)]"),
            ("[]", "[]"),
            ("{}", "{}"),
            (
                "{\"one\": 1, \"two\": 2}",
                "{\"one\": 1, \"two\": 2}",
            ),
            (
                "{\"one\": 0 + 1, true: 10 - 8}",
                "{\"one\": (0 + 1), true: (10 - 8)}",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_call_expression() {
        let tests = vec![
            ("add(1, 2 * 3, 4 + 5);", "add(1, (2 * 3), (4 + 5))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g))",
            ),
            ("fn(x) { x }(5)", "fn(x) { x }(5)"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_index_expression() {
        let tests = vec![
            ("myArray[1 + 1]", "(myArray[(1 + 1)])"),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_conditional() {
        let tests = vec![
            ("if (x < y) { x }", "if (x < y) { x }"),
            ("if (x < y) { x } else { y }", "if (x < y) { x } else { y }"),
            ("if (x) { let a = 1; a }", "if x { let a = 1;a }"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_function() {
        let tests = vec![
            ("fn(x, y) { x + y; }", "fn(x, y) { (x + y) }"),
            ("fn() {};", "fn() {  }"),
            ("fn(x, y, z) { return x; }", "fn(x, y, z) { return x; }"),
            (
                "let getName = fn(person) { person[\"name\"]; };",
                "let getName = fn(person) { (person[\"name\"]) };",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_statements_without_semicolons() {
        let tests = vec![(
            "let f = fn(n) { if (n < 2) { 1 } else { n } } f(3)",
            "let f = fn(n) { if (n < 2) { 1 } else { n } };f(3)",
        )];

        test_parsing(tests)
    }

    #[test]
    fn test_parse_errors() {
        let tests = vec![
            (
                "let x 5; let = 10; let 838383;",
                vec![
                    "expected next token to be =, got INT instead",
                    "expected next token to be IDENT, got = instead",
                    "expected next token to be IDENT, got INT instead",
                ],
            ),
            ("(1 + 2", vec!["expected next token to be ), got EOF instead"]),
            ("let x = ;", vec!["no prefix parse function for ; found"]),
            ("5 + @", vec!["no prefix parse function for ILLEGAL found"]),
            (
                "92233720368547758070",
                vec!["could not parse \"92233720368547758070\" as integer"],
            ),
            ("fn(1) { }", vec!["expected next token to be IDENT, got INT instead"]),
            ("if (x) { x", vec!["expected next token to be }, got EOF instead"]),
            ("[1, 2 3]", vec!["expected next token to be ], got INT instead"]),
            ("{1 2}", vec!["expected next token to be :, got INT instead"]),
            ("if x { x }", vec!["expected next token to be (, got IDENT instead"]),
            ("if (x { x }", vec!["expected next token to be ), got { instead"]),
        ];

        test_errors(tests)
    }

    #[test]
    fn test_parsing_continues_after_error() {
        let mut parser = super::Parser::new(Lexer::new("let = 1; let y = 2; y"));
        let program = parser.parse_program();

        assert_eq!(parser.errors().len(), 1);
        assert_eq!(program.to_string(), "let y = 2;y");
    }

    #[test]
    fn test_recovery_inside_blocks() {
        let tests = vec![
            (
                "let f = fn() { let = 1; 2 }; let y = 3; y",
                vec!["expected next token to be IDENT, got = instead"],
                "let f = fn() { 2 };let y = 3;y",
            ),
            (
                "let f = fn() { if (x) { let 1; } else { 2 } }; f",
                vec!["expected next token to be IDENT, got INT instead"],
                "let f = fn() { if x {  } else { 2 } };f",
            ),
            (
                "fn() { 1 + }; 2",
                vec!["no prefix parse function for } found"],
                "fn() {  }2",
            ),
            (
                "let = fn() { 1; 2 }; 3",
                vec!["expected next token to be IDENT, got = instead"],
                "3",
            ),
        ];

        for (input, errors, rendered) in tests {
            let mut parser = super::Parser::new(Lexer::new(input));
            let program = parser.parse_program();

            assert_eq!(parser.error_messages(), errors, "input: {}", input);
            assert_eq!(program.to_string(), rendered, "input: {}", input);
        }
    }
}
