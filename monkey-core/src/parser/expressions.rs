use std::rc::Rc;

use super::error::ParseError;
use super::statements::parse_statement;
use crate::ast::{BlockStatement, Expression, InfixOperationKind, PrefixOperationKind};
use crate::parser::Parser;
use crate::token::{Token, TokenKind};

#[derive(PartialOrd, PartialEq, Debug, Clone, Copy)]
pub enum Precedence {
    Lowest = 0,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

pub fn precedence_of(token: TokenKind) -> Precedence {
    match token {
        TokenKind::Equal => Precedence::Equals,
        TokenKind::NotEqual => Precedence::Equals,
        TokenKind::LessThan => Precedence::LessGreater,
        TokenKind::GreaterThan => Precedence::LessGreater,
        TokenKind::Plus => Precedence::Sum,
        TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk => Precedence::Product,
        TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

pub fn parse_expression(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    let token = parser.next_token();
    let Some(prefix_parse_function) = prefix_parsing_function(token.kind) else {
        return Err(ParseError::NoPrefixFunction(token));
    };
    let mut left_expression = prefix_parse_function(token, parser)?;

    while !parser.peek_is(TokenKind::SemiColon) && precedence < precedence_of(parser.peek().kind)
    {
        let Some(infix_parse_function) = infix_parsing_function(parser.peek().kind) else {
            break;
        };
        let token = parser.next_token();
        left_expression = infix_parse_function(left_expression, token, parser)?;
    }

    Ok(left_expression)
}

type PrefixFunction = fn(Token, &mut Parser) -> Result<Expression, ParseError>;

type InfixFunction = fn(Expression, Token, &mut Parser) -> Result<Expression, ParseError>;

pub fn prefix_parsing_function(token: TokenKind) -> Option<PrefixFunction> {
    match token {
        TokenKind::Ident => Some(parse_identifier),
        TokenKind::Int => Some(parse_integer_literal),
        TokenKind::String => Some(parse_string_literal),
        TokenKind::True | TokenKind::False => Some(parse_boolean_literal),
        TokenKind::Bang | TokenKind::Minus => Some(parse_prefix_operation),
        TokenKind::LParen => Some(parse_grouped_expression),
        TokenKind::LBracket => Some(parse_array_literal),
        TokenKind::LBrace => Some(parse_hash_literal),
        TokenKind::If => Some(parse_if_expression),
        TokenKind::Function => Some(parse_function_literal),
        _ => None,
    }
}

pub fn infix_parsing_function(token: TokenKind) -> Option<InfixFunction> {
    match token {
        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::LessThan
        | TokenKind::GreaterThan
        | TokenKind::Equal
        | TokenKind::NotEqual
        | TokenKind::Asterisk
        | TokenKind::Slash => Some(parse_infix_operation),
        TokenKind::LParen => Some(parse_call_expression),
        TokenKind::LBracket => Some(parse_index_expression),
        _ => None,
    }
}

fn parse_identifier(token: Token, _parser: &mut Parser) -> Result<Expression, ParseError> {
    Ok(Expression::Identifier(crate::ast::Identifier {
        name: token.literal.clone(),
        token,
    }))
}

fn parse_integer_literal(token: Token, _parser: &mut Parser) -> Result<Expression, ParseError> {
    let value = token
        .literal
        .parse()
        .map_err(|_| ParseError::InvalidInteger(token.literal.clone()))?;
    Ok(Expression::IntegerLiteral { token, value })
}

fn parse_string_literal(token: Token, _parser: &mut Parser) -> Result<Expression, ParseError> {
    Ok(Expression::StringLiteral {
        value: token.literal.clone(),
        token,
    })
}

fn parse_boolean_literal(token: Token, _parser: &mut Parser) -> Result<Expression, ParseError> {
    Ok(Expression::BooleanLiteral {
        value: token.kind == TokenKind::True,
        token,
    })
}

fn parse_prefix_operation(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    let operator = match token.kind {
        TokenKind::Bang => PrefixOperationKind::Bang,
        _ => PrefixOperationKind::Minus,
    };
    let right = parse_expression(parser, Precedence::Prefix)?;

    Ok(Expression::PrefixOperation {
        token,
        operator,
        right: Box::new(right),
    })
}

fn parse_grouped_expression(_token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    let expression = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

/// Parses `element (, element)* ,? terminator`; the opening delimiter has
/// already been consumed.
fn parse_sequence<T>(
    parser: &mut Parser,
    parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
    terminator: TokenKind,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();

    loop {
        if parser.next_if(terminator).is_some() {
            return Ok(elements);
        }
        elements.push(parse_element(parser)?);

        let next = parser.next_token();
        match next.kind {
            TokenKind::Comma => continue,
            kind if kind == terminator => return Ok(elements),
            _ => return Err(ParseError::unexpected_token(terminator, next)),
        }
    }
}

fn parse_array_literal(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    let elements = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::RBracket,
    )?;
    Ok(Expression::ArrayLiteral { token, elements })
}

fn parse_hash_literal(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    let pairs = parse_sequence(
        parser,
        |parser| {
            let key = parse_expression(parser, Precedence::Lowest)?;
            parser.expect_token(TokenKind::Colon)?;
            let value = parse_expression(parser, Precedence::Lowest)?;
            Ok((key, value))
        },
        TokenKind::RBrace,
    )?;
    Ok(Expression::HashLiteral { token, pairs })
}

fn parse_if_expression(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let condition = Box::new(parse_expression(parser, Precedence::Lowest)?);
    parser.expect_token(TokenKind::RParen)?;

    let consequence = parse_block_statement(parser)?;

    let alternative = if parser.next_if(TokenKind::Else).is_some() {
        Some(parse_block_statement(parser)?)
    } else {
        None
    };

    Ok(Expression::IfExpression {
        token,
        condition,
        consequence,
        alternative,
    })
}

/// Parses `{ statement* }`, including both braces. A statement that fails
/// inside the block is recorded and skipped without leaving the block.
fn parse_block_statement(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    let token = parser.expect_token(TokenKind::LBrace)?;
    let mut statements = Vec::new();

    loop {
        if parser.next_if(TokenKind::RBrace).is_some() {
            return Ok(BlockStatement { token, statements });
        }
        if parser.peek_is(TokenKind::Eof) {
            let eof = parser.next_token();
            return Err(ParseError::unexpected_token(TokenKind::RBrace, eof));
        }
        match parse_statement(parser) {
            Ok(statement) => statements.push(statement),
            Err(err) => {
                // the offending token was this block's closing brace
                let closed = parser.current_is(TokenKind::RBrace);
                parser.record_error(err);
                if closed {
                    return Ok(BlockStatement { token, statements });
                }
                parser.synchronize(true);
            }
        }
    }
}

fn parse_function_literal(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_sequence(
        parser,
        |parser| parser.parse_identifier(),
        TokenKind::RParen,
    )?;

    let body = parse_block_statement(parser)?;

    Ok(Expression::FunctionLiteral {
        token,
        parameters,
        body: Rc::new(body),
    })
}

fn parse_infix_operation(
    left: Expression,
    token: Token,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    use InfixOperationKind as InfixKind;

    let operator = match token.kind {
        TokenKind::Plus => InfixKind::Plus,
        TokenKind::Minus => InfixKind::Minus,
        TokenKind::LessThan => InfixKind::LessThan,
        TokenKind::GreaterThan => InfixKind::GreaterThan,
        TokenKind::Equal => InfixKind::Equal,
        TokenKind::NotEqual => InfixKind::NotEqual,
        TokenKind::Asterisk => InfixKind::Multiply,
        _ => InfixKind::Divide,
    };
    let right = parse_expression(parser, precedence_of(token.kind))?;

    Ok(Expression::InfixOperation {
        token,
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn parse_call_expression(
    left: Expression,
    token: Token,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    let arguments = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        TokenKind::RParen,
    )?;

    Ok(Expression::CallExpression {
        token,
        function: Box::new(left),
        arguments,
    })
}

fn parse_index_expression(
    left: Expression,
    token: Token,
    parser: &mut Parser,
) -> Result<Expression, ParseError> {
    let index = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RBracket)?;

    Ok(Expression::IndexExpression {
        token,
        left: Box::new(left),
        index: Box::new(index),
    })
}
