use std::fmt::Display;
use std::rc::Rc;

use crate::token::Token;

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
}

#[derive(Debug, PartialEq, Clone)]
pub struct LetStatement {
    pub token: Token,
    pub identifier: Identifier,
    pub value: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ExpressionStatement {
    pub token: Token,
    pub expression: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral {
        token: Token,
        value: i64,
    },
    StringLiteral {
        token: Token,
        value: Rc<str>,
    },
    BooleanLiteral {
        token: Token,
        value: bool,
    },
    ArrayLiteral {
        token: Token,
        elements: Vec<Expression>,
    },
    HashLiteral {
        token: Token,
        pairs: Vec<(Expression, Expression)>,
    },
    PrefixOperation {
        token: Token,
        operator: PrefixOperationKind,
        right: Box<Expression>,
    },
    InfixOperation {
        token: Token,
        operator: InfixOperationKind,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    IfExpression {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    FunctionLiteral {
        token: Token,
        parameters: Vec<Identifier>,
        body: Rc<BlockStatement>,
    },
    CallExpression {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    IndexExpression {
        token: Token,
        left: Box<Expression>,
        index: Box<Expression>,
    },
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InfixOperationKind {
    Plus,
    Minus,
    LessThan,
    GreaterThan,
    Equal,
    NotEqual,
    Multiply,
    Divide,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum PrefixOperationKind {
    Minus,
    Bang,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Identifier {
    pub token: Token,
    pub name: Rc<str>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(Statement::token_literal)
            .unwrap_or("")
    }
}

impl Statement {
    pub fn token(&self) -> &Token {
        match self {
            Statement::Let(statement) => &statement.token,
            Statement::Return(statement) => &statement.token,
            Statement::Expression(statement) => &statement.token,
        }
    }

    pub fn token_literal(&self) -> &str {
        &self.token().literal
    }
}

impl Expression {
    pub fn token(&self) -> &Token {
        use Expression::*;
        match self {
            Identifier(ident) => &ident.token,
            IntegerLiteral { token, .. }
            | StringLiteral { token, .. }
            | BooleanLiteral { token, .. }
            | ArrayLiteral { token, .. }
            | HashLiteral { token, .. }
            | PrefixOperation { token, .. }
            | InfixOperation { token, .. }
            | IfExpression { token, .. }
            | FunctionLiteral { token, .. }
            | CallExpression { token, .. }
            | IndexExpression { token, .. } => token,
        }
    }

    pub fn token_literal(&self) -> &str {
        &self.token().literal
    }
}

impl Display for LetStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "let {} = {};", self.identifier, self.value)
    }
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "return {};", self.value)
    }
}

impl Display for ExpressionStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression)
    }
}

/// Renders the statements only; the surrounding braces belong to the
/// construct that owns the block.
impl Display for BlockStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn write_separated<T: Display>(
    f: &mut std::fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
) -> std::fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Expression::*;
        match self {
            Identifier(ident) => write!(f, "{}", ident),
            IntegerLiteral { value, .. } => write!(f, "{}", value),
            StringLiteral { value, .. } => write!(f, "\"{}\"", value),
            BooleanLiteral { value, .. } => write!(f, "{}", value),
            ArrayLiteral { elements, .. } => {
                write!(f, "[")?;
                write_separated(f, elements)?;
                write!(f, "]")
            }
            HashLiteral { pairs, .. } => {
                write!(f, "{{")?;
                write_separated(
                    f,
                    pairs.iter().map(|(key, value)| format!("{}: {}", key, value)),
                )?;
                write!(f, "}}")
            }
            PrefixOperation {
                operator, right, ..
            } => write!(f, "({}{})", operator.to_str(), right),
            InfixOperation {
                operator,
                left,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator.to_str(), right),
            IfExpression {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if {} {{ {} }}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {{ {} }}", alternative)?;
                }
                Ok(())
            }
            FunctionLiteral {
                parameters, body, ..
            } => {
                write!(f, "fn(")?;
                write_separated(f, parameters)?;
                write!(f, ") {{ {} }}", body)
            }
            CallExpression {
                function,
                arguments,
                ..
            } => {
                write!(f, "{}(", function)?;
                write_separated(f, arguments)?;
                write!(f, ")")
            }
            IndexExpression { left, index, .. } => write!(f, "({}[{}])", left, index),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Statement::*;
        match self {
            Let(statement) => write!(f, "{}", statement),
            Return(statement) => write!(f, "{}", statement),
            Expression(statement) => write!(f, "{}", statement),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl PrefixOperationKind {
    pub fn to_str(&self) -> &'static str {
        use PrefixOperationKind::*;
        match self {
            Minus => "-",
            Bang => "!",
        }
    }
}

impl InfixOperationKind {
    pub fn to_str(&self) -> &'static str {
        use InfixOperationKind::*;
        match self {
            Plus => "+",
            Minus => "-",
            LessThan => "<",
            GreaterThan => ">",
            Equal => "==",
            NotEqual => "!=",
            Multiply => "*",
            Divide => "/",
        }
    }
}
