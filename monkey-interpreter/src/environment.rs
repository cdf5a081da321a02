use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Object;

#[derive(Default)]
struct EnvironmentCore {
    store: HashMap<Rc<str>, Object>,
    outer: Option<Environment>,
}

/// Shared handle to a scope. Clones refer to the same bindings, so a binding
/// set through one handle is visible through every other.
#[derive(Clone, Default)]
pub struct Environment {
    environment: Rc<RefCell<EnvironmentCore>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope whose lookups fall back to `outer`.
    pub fn new_enclosed(outer: &Environment) -> Environment {
        Environment {
            environment: Rc::new(RefCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: Some(outer.clone()),
            })),
        }
    }

    pub fn get(&self, key: &str) -> Option<Object> {
        let env = self.environment.borrow();
        match env.store.get(key) {
            Some(value) => Some(value.clone()),
            None => env.outer.as_ref().and_then(|outer| outer.get(key)),
        }
    }

    pub fn set(&self, key: Rc<str>, value: Object) {
        self.environment.borrow_mut().store.insert(key, value);
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.environment, &other.environment)
    }
}

// Bindings may hold closures over this same environment, so only the names
// are printed.
impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let env = self.environment.borrow();
        let mut names = env.store.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("enclosed", &env.outer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Environment;
    use crate::object::Object;

    #[test]
    fn test_enclosed_lookup() {
        let outer = Environment::new();
        outer.set("x".into(), Object::integer(1));
        outer.set("y".into(), Object::integer(2));

        let inner = Environment::new_enclosed(&outer);
        inner.set("x".into(), Object::integer(10));

        assert_eq!(inner.get("x"), Some(Object::integer(10)));
        assert_eq!(inner.get("y"), Some(Object::integer(2)));
        assert_eq!(outer.get("x"), Some(Object::integer(1)));
        assert_eq!(inner.get("z"), None);
    }

    #[test]
    fn test_later_outer_bindings_are_visible() {
        let outer = Environment::new();
        let inner = Environment::new_enclosed(&outer);

        assert_eq!(inner.get("late"), None);
        outer.set("late".into(), Object::boolean(true));
        assert_eq!(inner.get("late"), Some(Object::boolean(true)));
    }

    #[test]
    fn test_clones_share_bindings() {
        let env = Environment::new();
        let alias = env.clone();
        alias.set("shared".into(), Object::string("value"));

        assert!(env.ptr_eq(&alias));
        assert_eq!(env.get("shared"), Some(Object::string("value")));
        assert!(!env.ptr_eq(&Environment::new()));
    }
}
