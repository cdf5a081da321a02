use std::collections::BTreeMap;
use std::fmt::Display;
use std::rc::Rc;

use monkey_core::ast;
use thiserror::Error;

use crate::environment::Environment;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    Array,
    Hash,
    Function,
    Builtin,
    ReturnValue,
    Error,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Null,
    Array(Rc<Vec<Object>>),
    Hash(Rc<BTreeMap<HashKey, HashPair>>),
    Function(Rc<Function>),
    Builtin(Builtin),
    /// Wraps the value of a `return` while it unwinds enclosing blocks.
    ReturnValue(Box<Object>),
    Error(Rc<str>),
}

pub const NULL: Object = Object::Null;
pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);

impl Object {
    pub fn null() -> Object {
        NULL
    }
    pub fn boolean(value: bool) -> Object {
        if value {
            TRUE
        } else {
            FALSE
        }
    }
    pub fn integer(value: i64) -> Object {
        Object::Integer(value)
    }
    pub fn string(value: impl Into<Rc<str>>) -> Object {
        Object::String(value.into())
    }
    pub fn array(elements: Vec<Object>) -> Object {
        Object::Array(Rc::new(elements))
    }
    pub fn hash(pairs: BTreeMap<HashKey, HashPair>) -> Object {
        Object::Hash(Rc::new(pairs))
    }
    pub fn function(
        parameters: Vec<ast::Identifier>,
        body: Rc<ast::BlockStatement>,
        env: Environment,
    ) -> Object {
        Object::Function(Rc::new(Function {
            parameters,
            body,
            env,
        }))
    }
    pub fn error(message: impl Into<Rc<str>>) -> Object {
        Object::Error(message.into())
    }

    pub fn type_tag(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Null => ObjectType::Null,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
        }
    }

    pub fn inspect(&self) -> String {
        self.to_string()
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    /// Errors and `return` values both stop evaluation of whatever encloses
    /// them until a function call or the program boundary is reached.
    pub fn is_unwinding(&self) -> bool {
        matches!(self, Object::ReturnValue(_) | Object::Error(_))
    }

    /// `false` and `null` are falsy, everything else (including `0`) is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Boolean(false) | Object::Null)
    }

    /// Identity comparison used by `==` and `!=` outside of integers and
    /// strings. Shared values are identical only if they are the same
    /// allocation.
    pub fn is_identical(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Integer(left), Object::Integer(right)) => left == right,
            (Object::Boolean(left), Object::Boolean(right)) => left == right,
            (Object::String(left), Object::String(right)) => left == right,
            (Object::Null, Object::Null) => true,
            (Object::Array(left), Object::Array(right)) => Rc::ptr_eq(left, right),
            (Object::Hash(left), Object::Hash(right)) => Rc::ptr_eq(left, right),
            (Object::Function(left), Object::Function(right)) => Rc::ptr_eq(left, right),
            (Object::Builtin(left), Object::Builtin(right)) => left == right,
            _ => false,
        }
    }

    /// `None` for variants that cannot be used as hash keys.
    pub fn hash_key(&self) -> Option<HashKey> {
        let value = match self {
            Object::Integer(value) => *value as u64,
            Object::Boolean(value) => u64::from(*value),
            Object::String(value) => fnv1a(value.as_bytes()),
            _ => return None,
        };
        Some(HashKey {
            object_type: self.type_tag(),
            value,
        })
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct HashKey {
    pub object_type: ObjectType,
    pub value: u64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

pub struct Function {
    pub parameters: Vec<ast::Identifier>,
    pub body: Rc<ast::BlockStatement>,
    pub env: Environment,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters
            && self.body == other.body
            && self.env.ptr_eq(&other.env)
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters.len())
            .field("ptr", &(self as *const Function as usize))
            .finish()
    }
}

pub type BuiltinFunction = fn(&[Object]) -> Object;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFunction,
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ObjectType::*;
        let name = match self {
            Integer => "INTEGER",
            Boolean => "BOOLEAN",
            String => "STRING",
            Null => "NULL",
            Array => "ARRAY",
            Hash => "HASH",
            Function => "FUNCTION",
            Builtin => "BUILTIN",
            ReturnValue => "RETURN_VALUE",
            Error => "ERROR",
        };
        write!(f, "{}", name)
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Object::Hash(pairs) => {
                write!(f, "{{")?;
                for (i, pair) in pairs.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                write!(f, "}}")
            }
            Object::Function(function) => {
                write!(
                    f,
                    "fn({}) {{ {} }}",
                    function
                        .parameters
                        .iter()
                        .map(|id| id.name.as_ref())
                        .collect::<Box<[&str]>>()
                        .join(", "),
                    function.body
                )
            }
            Object::Builtin(_) => write!(f, "builtin function"),
            Object::ReturnValue(value) => write!(f, "{}", value),
            Object::Error(message) => write!(f, "ERROR: {}", message),
        }
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum RuntimeError {
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: ObjectType,
        operator: &'static str,
        right: ObjectType,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: ObjectType,
        operator: &'static str,
        right: ObjectType,
    },
    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator {
        operator: &'static str,
        right: ObjectType,
    },
    #[error("identifier not found: {0}")]
    IdentifierNotFound(Rc<str>),
    #[error("not a function: {0}")]
    NotAFunction(ObjectType),
    #[error("unusable as hash key: {0}")]
    UnusableAsHashKey(ObjectType),
    #[error("index operator not supported: {0}")]
    IndexNotSupported(ObjectType),
    #[error("division by zero")]
    DivisionByZero,
    #[error("wrong number of arguments: want={expected}, got={actual}")]
    WrongArgumentCount { expected: usize, actual: usize },
    #[error("wrong number of arguments. got={actual}, want={expected}")]
    BuiltinArgumentCount { expected: usize, actual: usize },
    #[error("argument to `{function}` not supported, got {actual}")]
    UnsupportedArgument {
        function: &'static str,
        actual: ObjectType,
    },
    #[error("argument to `{function}` must be {expected}, got {actual}")]
    WrongArgumentType {
        function: &'static str,
        expected: ObjectType,
        actual: ObjectType,
    },
}

impl From<RuntimeError> for Object {
    fn from(error: RuntimeError) -> Self {
        Object::error(error.to_string())
    }
}
