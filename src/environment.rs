use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;

/// Shared handle to a scope.  Closures, bound methods and active frames all
/// hold one; a mutation through any handle is visible through every other.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope: bindings plus a link to the enclosing scope.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError::new(name, format!("Undefined variable '{}'.", name.lexeme))
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap a fresh child of `enclosing` in a shared handle.
    pub fn child_of(enclosing: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(enclosing))))
    }

    /// Bind `name` in this scope, shadowing any previous binding here.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("define '{}' = {}", name, value);
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Overwrite an existing binding, searching outward.  Never creates one.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }

    /// The scope exactly `distance` links out from `env`.
    pub fn ancestor(env: &EnvRef, distance: usize) -> Option<EnvRef> {
        let mut current = Rc::clone(env);

        for _ in 0..distance {
            let next = current.borrow().enclosing.clone()?;
            current = next;
        }

        Some(current)
    }

    /// Read `name` directly from the scope `distance` links out, without searching.
    pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value, RuntimeError> {
        Self::ancestor(env, distance)
            .and_then(|scope| scope.borrow().values.get(&name.lexeme).cloned())
            .ok_or_else(|| undefined(name))
    }

    pub fn assign_at(
        env: &EnvRef,
        distance: usize,
        name: &Token,
        value: Value,
    ) -> Result<(), RuntimeError> {
        let scope = Self::ancestor(env, distance).ok_or_else(|| undefined(name))?;
        let mut scope = scope.borrow_mut();

        match scope.values.get_mut(&name.lexeme) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(undefined(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Token {
        Token::synthetic(name, 1)
    }

    #[test]
    fn lookup_walks_the_chain() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::child_of(&global);

        assert_eq!(inner.borrow().get(&ident("a")).unwrap(), Value::Number(1.0));
        assert!(inner.borrow().get(&ident("b")).is_err());
    }

    #[test]
    fn assign_never_creates_a_binding() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
        let err = global
            .borrow_mut()
            .assign(&ident("missing"), Value::Nil)
            .unwrap_err();

        assert_eq!(err.message, "Undefined variable 'missing'.");
        assert!(global.borrow().get(&ident("missing")).is_err());
    }

    #[test]
    fn assignment_through_child_is_visible_in_parent() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("n", Value::Number(0.0));
        let a = Environment::child_of(&global);
        let b = Environment::child_of(&global);

        a.borrow_mut().assign(&ident("n"), Value::Number(5.0)).unwrap();

        assert_eq!(b.borrow().get(&ident("n")).unwrap(), Value::Number(5.0));
    }

    #[test]
    fn get_at_skips_shadowing_scopes() {
        let global: EnvRef = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("x", Value::String("outer".into()));
        let inner = Environment::child_of(&global);
        inner.borrow_mut().define("x", Value::String("inner".into()));

        assert_eq!(
            Environment::get_at(&inner, 1, &ident("x")).unwrap(),
            Value::String("outer".into())
        );

        Environment::assign_at(&inner, 0, &ident("x"), Value::Bool(true)).unwrap();
        assert_eq!(
            Environment::get_at(&inner, 0, &ident("x")).unwrap(),
            Value::Bool(true)
        );
        assert!(Environment::get_at(&inner, 3, &ident("x")).is_err());
    }
}
