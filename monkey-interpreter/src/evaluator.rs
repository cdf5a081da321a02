use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, trace};
use monkey_core::ast;
use monkey_core::ast::{Expression, InfixOperationKind, PrefixOperationKind};

use crate::builtins;
use crate::environment::Environment;
use crate::object::{HashPair, Object, ObjectType, RuntimeError, NULL};

/// Evaluates `$object` and returns it from the enclosing function if it is an
/// error or a `return` value.
macro_rules! propagate {
    ($object:expr) => {{
        let object = $object;
        if object.is_unwinding() {
            return object;
        }
        object
    }};
}

/// Any AST node that can be evaluated against an environment.
pub trait Evaluate {
    fn evaluate(&self, environment: &Environment) -> Object;
}

impl Evaluate for ast::Program {
    fn evaluate(&self, environment: &Environment) -> Object {
        eval_program(self, environment)
    }
}

impl Evaluate for ast::Statement {
    fn evaluate(&self, environment: &Environment) -> Object {
        eval_statement(self, environment)
    }
}

impl Evaluate for ast::BlockStatement {
    fn evaluate(&self, environment: &Environment) -> Object {
        eval_block_statement(self, environment)
    }
}

impl Evaluate for Expression {
    fn evaluate(&self, environment: &Environment) -> Object {
        eval_expression(self, environment)
    }
}

pub fn eval(node: &impl Evaluate, environment: &Environment) -> Object {
    node.evaluate(environment)
}

/// Runs the statements in order. A top-level `return` ends the program with
/// its unwrapped value; an error ends it with the error.
pub fn eval_program(program: &ast::Program, environment: &Environment) -> Object {
    let mut output = NULL;
    for statement in &program.statements {
        output = eval_statement(statement, environment);

        match output {
            Object::ReturnValue(value) => return *value,
            Object::Error(ref message) => {
                debug!("evaluation stopped: {}", message);
                return output;
            }
            _ => {}
        };
    }
    output
}

fn eval_statement(statement: &ast::Statement, environment: &Environment) -> Object {
    match statement {
        ast::Statement::Expression(statement) => eval_expression(&statement.expression, environment),
        ast::Statement::Return(statement) => eval_return_statement(statement, environment),
        ast::Statement::Let(statement) => eval_let_statement(statement, environment),
    }
}

fn eval_let_statement(statement: &ast::LetStatement, environment: &Environment) -> Object {
    let value = propagate!(eval_expression(&statement.value, environment));
    environment.set(statement.identifier.name.clone(), value);
    NULL
}

fn eval_return_statement(statement: &ast::ReturnStatement, environment: &Environment) -> Object {
    let value = propagate!(eval_expression(&statement.value, environment));
    Object::ReturnValue(Box::new(value))
}

/// Unlike [`eval_program`], a `ReturnValue` stays wrapped so that it keeps
/// unwinding through every enclosing block.
fn eval_block_statement(block: &ast::BlockStatement, environment: &Environment) -> Object {
    let mut result = NULL;
    for statement in &block.statements {
        result = eval_statement(statement, environment);
        if result.is_unwinding() {
            return result;
        }
    }
    result
}

fn eval_expression(expression: &Expression, environment: &Environment) -> Object {
    match expression {
        Expression::IntegerLiteral { value, .. } => Object::integer(*value),
        Expression::BooleanLiteral { value, .. } => Object::boolean(*value),
        Expression::StringLiteral { value, .. } => Object::string(value.clone()),
        Expression::ArrayLiteral { elements, .. } => match eval_expressions(elements, environment)
        {
            Ok(elements) => Object::array(elements),
            Err(error) => error,
        },
        Expression::HashLiteral { pairs, .. } => eval_hash_literal(pairs, environment),
        Expression::Identifier(identifier) => eval_identifier(identifier, environment),
        Expression::PrefixOperation {
            operator, right, ..
        } => {
            let right = propagate!(eval_expression(right, environment));
            eval_prefix_operation(*operator, right)
        }
        Expression::InfixOperation {
            operator,
            left,
            right,
            ..
        } => {
            let left = propagate!(eval_expression(left, environment));
            let right = propagate!(eval_expression(right, environment));
            eval_infix_operation(*operator, left, right)
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
            ..
        } => {
            let condition = propagate!(eval_expression(condition, environment));
            if condition.is_truthy() {
                eval_block_statement(consequence, environment)
            } else if let Some(alternative) = alternative {
                eval_block_statement(alternative, environment)
            } else {
                NULL
            }
        }
        Expression::FunctionLiteral {
            parameters, body, ..
        } => Object::function(parameters.clone(), Rc::clone(body), environment.clone()),
        Expression::CallExpression {
            function,
            arguments,
            ..
        } => {
            let function = propagate!(eval_expression(function, environment));
            match eval_expressions(arguments, environment) {
                Ok(arguments) => apply_function(function, arguments),
                Err(error) => error,
            }
        }
        Expression::IndexExpression { left, index, .. } => {
            let left = propagate!(eval_expression(left, environment));
            let index = propagate!(eval_expression(index, environment));
            eval_index_expression(left, index)
        }
    }
}

/// Evaluates left to right, stopping at the first error or `return` value.
fn eval_expressions(
    expressions: &[Expression],
    environment: &Environment,
) -> Result<Vec<Object>, Object> {
    let mut result = Vec::with_capacity(expressions.len());
    for expression in expressions {
        let object = eval_expression(expression, environment);
        if object.is_unwinding() {
            return Err(object);
        }
        result.push(object);
    }
    Ok(result)
}

fn eval_identifier(identifier: &ast::Identifier, environment: &Environment) -> Object {
    if let Some(value) = environment.get(&identifier.name) {
        return value;
    }
    match builtins::lookup(&identifier.name) {
        Some(builtin) => Object::Builtin(builtin),
        None => RuntimeError::IdentifierNotFound(identifier.name.clone()).into(),
    }
}

fn eval_hash_literal(pairs: &[(Expression, Expression)], environment: &Environment) -> Object {
    let mut hash = BTreeMap::new();
    for (key, value) in pairs {
        let key = propagate!(eval_expression(key, environment));
        let Some(hashed_key) = key.hash_key() else {
            return RuntimeError::UnusableAsHashKey(key.type_tag()).into();
        };
        let value = propagate!(eval_expression(value, environment));
        hash.insert(hashed_key, HashPair { key, value });
    }
    Object::hash(hash)
}

fn apply_function(function: Object, arguments: Vec<Object>) -> Object {
    match function {
        Object::Function(function) => {
            if function.parameters.len() != arguments.len() {
                return RuntimeError::WrongArgumentCount {
                    expected: function.parameters.len(),
                    actual: arguments.len(),
                }
                .into();
            }
            trace!("applying fn with {} argument(s)", arguments.len());

            // Chained to the defining scope, not the caller's.
            let new_environment = Environment::new_enclosed(&function.env);
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                new_environment.set(parameter.name.clone(), argument);
            }

            match eval_block_statement(&function.body, &new_environment) {
                Object::ReturnValue(value) => *value,
                object => object,
            }
        }
        Object::Builtin(builtin) => {
            trace!("calling builtin `{}`", builtin.name);
            (builtin.func)(&arguments)
        }
        other => RuntimeError::NotAFunction(other.type_tag()).into(),
    }
}

fn eval_prefix_operation(operator: PrefixOperationKind, right: Object) -> Object {
    match (operator, &right) {
        (PrefixOperationKind::Bang, _) => Object::boolean(!right.is_truthy()),
        (PrefixOperationKind::Minus, Object::Integer(value)) => {
            Object::integer(value.wrapping_neg())
        }
        (PrefixOperationKind::Minus, _) => RuntimeError::UnknownPrefixOperator {
            operator: operator.to_str(),
            right: right.type_tag(),
        }
        .into(),
    }
}

fn eval_infix_operation(operator: InfixOperationKind, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_operation(operator, *left, *right)
        }
        (Object::String(left), Object::String(right)) => {
            eval_string_infix_operation(operator, left, right)
        }
        _ if operator == InfixOperationKind::Equal => Object::boolean(left.is_identical(&right)),
        _ if operator == InfixOperationKind::NotEqual => {
            Object::boolean(!left.is_identical(&right))
        }
        _ if left.type_tag() != right.type_tag() => RuntimeError::TypeMismatch {
            left: left.type_tag(),
            operator: operator.to_str(),
            right: right.type_tag(),
        }
        .into(),
        _ => RuntimeError::UnknownInfixOperator {
            left: left.type_tag(),
            operator: operator.to_str(),
            right: right.type_tag(),
        }
        .into(),
    }
}

fn eval_integer_infix_operation(operator: InfixOperationKind, left: i64, right: i64) -> Object {
    match operator {
        InfixOperationKind::Plus => Object::integer(left.wrapping_add(right)),
        InfixOperationKind::Minus => Object::integer(left.wrapping_sub(right)),
        InfixOperationKind::Multiply => Object::integer(left.wrapping_mul(right)),
        InfixOperationKind::Divide if right == 0 => RuntimeError::DivisionByZero.into(),
        InfixOperationKind::Divide => Object::integer(left.wrapping_div(right)),
        InfixOperationKind::LessThan => Object::boolean(left < right),
        InfixOperationKind::GreaterThan => Object::boolean(left > right),
        InfixOperationKind::Equal => Object::boolean(left == right),
        InfixOperationKind::NotEqual => Object::boolean(left != right),
    }
}

fn eval_string_infix_operation(operator: InfixOperationKind, left: &str, right: &str) -> Object {
    match operator {
        InfixOperationKind::Plus => Object::string(format!("{}{}", left, right)),
        _ => RuntimeError::UnknownInfixOperator {
            left: ObjectType::String,
            operator: operator.to_str(),
            right: ObjectType::String,
        }
        .into(),
    }
}

fn eval_index_expression(left: Object, index: Object) -> Object {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(index)) => usize::try_from(*index)
            .ok()
            .and_then(|index| elements.get(index))
            .cloned()
            .unwrap_or(NULL),
        (Object::Hash(pairs), _) => match index.hash_key() {
            // equal keys hash equally, but a colliding key must not match
            Some(key) => pairs
                .get(&key)
                .filter(|pair| pair.key.is_identical(&index))
                .map(|pair| pair.value.clone())
                .unwrap_or(NULL),
            None => RuntimeError::UnusableAsHashKey(index.type_tag()).into(),
        },
        _ => RuntimeError::IndexNotSupported(left.type_tag()).into(),
    }
}
