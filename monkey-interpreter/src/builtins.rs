use crate::object::{Builtin, Object, ObjectType, RuntimeError, NULL};

fn wrong_number_of_arguments(expected: usize, actual: usize) -> Object {
    RuntimeError::BuiltinArgumentCount { expected, actual }.into()
}

fn must_be_array(function: &'static str, actual: &Object) -> Object {
    RuntimeError::WrongArgumentType {
        function,
        expected: ObjectType::Array,
        actual: actual.type_tag(),
    }
    .into()
}

fn builtin_len(args: &[Object]) -> Object {
    let [argument] = args else {
        return wrong_number_of_arguments(1, args.len());
    };
    match argument {
        Object::String(s) => Object::integer(s.len() as i64),
        Object::Array(arr) => Object::integer(arr.len() as i64),
        other => RuntimeError::UnsupportedArgument {
            function: "len",
            actual: other.type_tag(),
        }
        .into(),
    }
}

fn builtin_first(args: &[Object]) -> Object {
    let [argument] = args else {
        return wrong_number_of_arguments(1, args.len());
    };
    match argument {
        Object::Array(arr) => arr.first().cloned().unwrap_or(NULL),
        other => must_be_array("first", other),
    }
}

fn builtin_last(args: &[Object]) -> Object {
    let [argument] = args else {
        return wrong_number_of_arguments(1, args.len());
    };
    match argument {
        Object::Array(arr) => arr.last().cloned().unwrap_or(NULL),
        other => must_be_array("last", other),
    }
}

fn builtin_rest(args: &[Object]) -> Object {
    let [argument] = args else {
        return wrong_number_of_arguments(1, args.len());
    };
    match argument {
        Object::Array(arr) if arr.is_empty() => NULL,
        Object::Array(arr) => Object::array(arr[1..].to_vec()),
        other => must_be_array("rest", other),
    }
}

// Copies the elements; arrays reachable from other bindings are never
// modified.
fn builtin_push(args: &[Object]) -> Object {
    let [array, value] = args else {
        return wrong_number_of_arguments(2, args.len());
    };
    match array {
        Object::Array(arr) => {
            let mut new_arr = arr.to_vec();
            new_arr.push(value.clone());
            Object::array(new_arr)
        }
        other => must_be_array("push", other),
    }
}

const BUILTINS: [Builtin; 5] = [
    Builtin {
        name: "len",
        func: builtin_len,
    },
    Builtin {
        name: "first",
        func: builtin_first,
    },
    Builtin {
        name: "last",
        func: builtin_last,
    },
    Builtin {
        name: "rest",
        func: builtin_rest,
    },
    Builtin {
        name: "push",
        func: builtin_push,
    },
];

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.iter().find(|builtin| builtin.name == name).copied()
}
