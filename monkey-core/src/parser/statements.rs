use crate::ast::{ExpressionStatement, LetStatement, ReturnStatement, Statement};
use crate::parser::expressions::{parse_expression, Precedence};
use crate::parser::{ParseError, Parser};
use crate::token::TokenKind;

/// Parses one statement and the optional `;` that ends it.
pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let statement = match parser.peek().kind {
        TokenKind::Let => Statement::Let(parse_let_statement(parser)?),
        TokenKind::Return => Statement::Return(parse_return_statement(parser)?),
        _ => Statement::Expression(parse_expression_statement(parser)?),
    };
    parser.next_if(TokenKind::SemiColon);

    Ok(statement)
}

fn parse_let_statement(parser: &mut Parser) -> Result<LetStatement, ParseError> {
    let token = parser.expect_token(TokenKind::Let)?;
    let identifier = parser.parse_identifier()?;
    parser.expect_token(TokenKind::Assign)?;
    let value = parse_expression(parser, Precedence::Lowest)?;

    Ok(LetStatement {
        token,
        identifier,
        value,
    })
}

fn parse_return_statement(parser: &mut Parser) -> Result<ReturnStatement, ParseError> {
    let token = parser.expect_token(TokenKind::Return)?;
    let value = parse_expression(parser, Precedence::Lowest)?;

    Ok(ReturnStatement { token, value })
}

fn parse_expression_statement(parser: &mut Parser) -> Result<ExpressionStatement, ParseError> {
    let token = parser.peek().clone();
    let expression = parse_expression(parser, Precedence::Lowest)?;

    Ok(ExpressionStatement { token, expression })
}
