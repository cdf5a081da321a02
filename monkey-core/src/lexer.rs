pub use crate::token::{Token, TokenKind};
use crate::token::lookup_keyword;

#[derive(Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self { input, iter }
    }

    /// Scans the next token. Once the input is exhausted every call returns
    /// an `Eof` token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some((idx, ch)) = self.iter.next() else {
            return Token::eof();
        };

        match ch {
            '=' => {
                if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                    Token::new(TokenKind::Equal, "==")
                } else {
                    Token::new(TokenKind::Assign, "=")
                }
            }
            '!' => {
                if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                    Token::new(TokenKind::NotEqual, "!=")
                } else {
                    Token::new(TokenKind::Bang, "!")
                }
            }
            '+' => Token::new(TokenKind::Plus, "+"),
            '-' => Token::new(TokenKind::Minus, "-"),
            '*' => Token::new(TokenKind::Asterisk, "*"),
            '/' => Token::new(TokenKind::Slash, "/"),
            '<' => Token::new(TokenKind::LessThan, "<"),
            '>' => Token::new(TokenKind::GreaterThan, ">"),
            ',' => Token::new(TokenKind::Comma, ","),
            ':' => Token::new(TokenKind::Colon, ":"),
            ';' => Token::new(TokenKind::SemiColon, ";"),
            '(' => Token::new(TokenKind::LParen, "("),
            ')' => Token::new(TokenKind::RParen, ")"),
            '{' => Token::new(TokenKind::LBrace, "{"),
            '}' => Token::new(TokenKind::RBrace, "}"),
            '[' => Token::new(TokenKind::LBracket, "["),
            ']' => Token::new(TokenKind::RBracket, "]"),
            '"' => self.read_string(idx),
            c if Lexer::is_letter(c) => self.read_identifier(idx),
            c if c.is_ascii_digit() => self.read_number(idx),
            c => Token::new(TokenKind::Illegal, c.to_string()),
        }
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_whitespace(ch: char) -> bool {
        matches!(ch, ' ' | '\t' | '\r' | '\n')
    }

    fn skip_whitespace(&mut self) {
        while self.iter.next_if(|(_, ch)| Self::is_whitespace(*ch)).is_some() {}
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| Self::is_letter(*ch)).is_some() {}

        let end = self.next_idx();
        let ident = &self.input[start..end];
        match lookup_keyword(ident) {
            Some(kind) => Token::new(kind, ident),
            None => Token::new(TokenKind::Ident, ident),
        }
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        let end = self.next_idx();
        Token::new(TokenKind::Int, &self.input[start..end])
    }

    // `start` points at the opening quote
    fn read_string(&mut self, start: usize) -> Token {
        loop {
            match self.iter.next() {
                Some((end, '"')) => return Token::new(TokenKind::String, &self.input[start + 1..end]),
                None => return Token::new(TokenKind::Illegal, &self.input[start..]),
                _ => {}
            }
        }
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

/// Yields every token up to, but not including, the `Eof` token.
impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        match token.kind {
            TokenKind::Eof => None,
            _ => Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Lexer, Token, TokenKind};

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input).map(|token| token.kind).collect()
    }

    #[test]
    fn test_single_characters() {
        let input = "=+(){},;";

        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Assign,
                TokenKind::Plus,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Comma,
                TokenKind::SemiColon
            ]
        );
    }

    #[test]
    fn test_program() {
        let input = "let five = 5;
    let ten = 10;
    let add = fn(x, y) {
    x + y;
    };
    let result = add(five, ten);
    ";
        let expected_output = vec![
            Token::new(TokenKind::Let, "let"),
            Token::new(TokenKind::Ident, "five"),
            Token::new(TokenKind::Assign, "="),
            Token::new(TokenKind::Int, "5"),
            Token::new(TokenKind::SemiColon, ";"),
            Token::new(TokenKind::Let, "let"),
            Token::new(TokenKind::Ident, "ten"),
            Token::new(TokenKind::Assign, "="),
            Token::new(TokenKind::Int, "10"),
            Token::new(TokenKind::SemiColon, ";"),
            Token::new(TokenKind::Let, "let"),
            Token::new(TokenKind::Ident, "add"),
            Token::new(TokenKind::Assign, "="),
            Token::new(TokenKind::Function, "fn"),
            Token::new(TokenKind::LParen, "("),
            Token::new(TokenKind::Ident, "x"),
            Token::new(TokenKind::Comma, ","),
            Token::new(TokenKind::Ident, "y"),
            Token::new(TokenKind::RParen, ")"),
            Token::new(TokenKind::LBrace, "{"),
            Token::new(TokenKind::Ident, "x"),
            Token::new(TokenKind::Plus, "+"),
            Token::new(TokenKind::Ident, "y"),
            Token::new(TokenKind::SemiColon, ";"),
            Token::new(TokenKind::RBrace, "}"),
            Token::new(TokenKind::SemiColon, ";"),
            Token::new(TokenKind::Let, "let"),
            Token::new(TokenKind::Ident, "result"),
            Token::new(TokenKind::Assign, "="),
            Token::new(TokenKind::Ident, "add"),
            Token::new(TokenKind::LParen, "("),
            Token::new(TokenKind::Ident, "five"),
            Token::new(TokenKind::Comma, ","),
            Token::new(TokenKind::Ident, "ten"),
            Token::new(TokenKind::RParen, ")"),
            Token::new(TokenKind::SemiColon, ";"),
        ];

        let output = Lexer::new(input).collect::<Vec<_>>();
        assert_eq!(output, expected_output)
    }

    #[test]
    fn test_operators() {
        let input = "
    !-/*5;\r
    5 <\t10\t> 5;
\t10 == 10;\r\n\t\t10 != 9;
    ";

        let expected_output = vec![
            TokenKind::Bang,
            TokenKind::Minus,
            TokenKind::Slash,
            TokenKind::Asterisk,
            TokenKind::Int,
            TokenKind::SemiColon,
            TokenKind::Int,
            TokenKind::LessThan,
            TokenKind::Int,
            TokenKind::GreaterThan,
            TokenKind::Int,
            TokenKind::SemiColon,
            TokenKind::Int,
            TokenKind::Equal,
            TokenKind::Int,
            TokenKind::SemiColon,
            TokenKind::Int,
            TokenKind::NotEqual,
            TokenKind::Int,
            TokenKind::SemiColon,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_keywords() {
        let input = "if (5 < 10) {
    return true;
    } else {
    return false;
    }";

        let expected_output = vec![
            TokenKind::If,
            TokenKind::LParen,
            TokenKind::Int,
            TokenKind::LessThan,
            TokenKind::Int,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::True,
            TokenKind::SemiColon,
            TokenKind::RBrace,
            TokenKind::Else,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::False,
            TokenKind::SemiColon,
            TokenKind::RBrace,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_strings_arrays_and_hashes() {
        let input = r#""foobar" "foo bar" [1, 2]; {"foo": "bar"}"#;

        let expected_output = vec![
            Token::new(TokenKind::String, "foobar"),
            Token::new(TokenKind::String, "foo bar"),
            Token::new(TokenKind::LBracket, "["),
            Token::new(TokenKind::Int, "1"),
            Token::new(TokenKind::Comma, ","),
            Token::new(TokenKind::Int, "2"),
            Token::new(TokenKind::RBracket, "]"),
            Token::new(TokenKind::SemiColon, ";"),
            Token::new(TokenKind::LBrace, "{"),
            Token::new(TokenKind::String, "foo"),
            Token::new(TokenKind::Colon, ":"),
            Token::new(TokenKind::String, "bar"),
            Token::new(TokenKind::RBrace, "}"),
        ];

        assert_eq!(Lexer::new(input).collect::<Vec<_>>(), expected_output)
    }

    #[test]
    fn test_identifiers_and_numbers_are_maximal_runs() {
        let input = "foo_bar123 -42";

        let expected_output = vec![
            Token::new(TokenKind::Ident, "foo_bar"),
            Token::new(TokenKind::Int, "123"),
            Token::new(TokenKind::Minus, "-"),
            Token::new(TokenKind::Int, "42"),
        ];

        assert_eq!(Lexer::new(input).collect::<Vec<_>>(), expected_output)
    }

    #[test]
    fn test_illegal_characters() {
        let input = "a @ é \"open";

        let expected_output = vec![
            Token::new(TokenKind::Ident, "a"),
            Token::new(TokenKind::Illegal, "@"),
            Token::new(TokenKind::Illegal, "é"),
            Token::new(TokenKind::Illegal, "\"open"),
        ];

        assert_eq!(Lexer::new(input).collect::<Vec<_>>(), expected_output)
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new(" x ");

        assert_eq!(lexer.next_token(), Token::new(TokenKind::Ident, "x"));
        for _ in 0..3 {
            assert_eq!(lexer.next_token(), Token::eof());
        }
    }
}
