// Lexical environment chain. A scope is a heap object: closures capture
// scope references, so a scope routinely outlives its textual region.
// The root scope is the global frame; bare assignment searches outward and
// creates a global only when it reaches the root unbound.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use ahash::RandomState;

use crate::lua_value::{LuaValue, MultiValue};

#[derive(Clone)]
pub struct Scope {
    inner: Rc<RefCell<ScopeInner>>,
}

struct ScopeInner {
    bindings: HashMap<String, LuaValue, RandomState>,
    parent: Option<Scope>,
    /// Set on closure-invocation scopes; other scopes inherit through the
    /// parent chain (empty at the root).
    varargs: Option<MultiValue>,
}

impl Scope {
    pub fn new_root() -> Self {
        Scope {
            inner: Rc::new(RefCell::new(ScopeInner {
                bindings: HashMap::with_hasher(RandomState::new()),
                parent: None,
                varargs: None,
            })),
        }
    }

    /// A fresh scope whose parent is `self`.
    pub fn child(&self) -> Self {
        Scope {
            inner: Rc::new(RefCell::new(ScopeInner {
                bindings: HashMap::with_hasher(RandomState::new()),
                parent: Some(self.clone()),
                varargs: None,
            })),
        }
    }

    /// Nearest binding walking parent pointers; nil when unbound anywhere.
    pub fn get(&self, name: &str) -> LuaValue {
        let mut current = self.clone();
        loop {
            if let Some(v) = current.inner.borrow().bindings.get(name) {
                return v.clone();
            }
            let parent = current.inner.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => return LuaValue::Nil,
            }
        }
    }

    /// Bind or rebind `name` in this scope only.
    pub fn set_local(&self, name: &str, value: LuaValue) {
        self.inner
            .borrow_mut()
            .bindings
            .insert(name.to_string(), value);
    }

    /// Bind `name` at the root scope.
    pub fn set_global(&self, name: &str, value: LuaValue) {
        let mut current = self.clone();
        loop {
            let parent = current.inner.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => break,
            }
        }
        current.set_local(name, value);
    }

    /// Bare assignment: rebind the nearest enclosing declaration, falling
    /// back to a new global at the root.
    pub fn set(&self, name: &str, value: LuaValue) {
        let mut current = self.clone();
        loop {
            let bound_here = current.inner.borrow().bindings.contains_key(name);
            if bound_here {
                current.set_local(name, value);
                return;
            }
            let parent = current.inner.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => {
                    current.set_local(name, value);
                    return;
                }
            }
        }
    }

    /// The varargs of the nearest enclosing closure invocation, empty at
    /// the root.
    pub fn varargs(&self) -> MultiValue {
        let mut current = self.clone();
        loop {
            if let Some(va) = current.inner.borrow().varargs.clone() {
                return va;
            }
            let parent = current.inner.borrow().parent.clone();
            match parent {
                Some(p) => current = p,
                None => return MultiValue::empty(),
            }
        }
    }

    pub fn set_varargs(&self, varargs: MultiValue) {
        self.inner.borrow_mut().varargs = Some(varargs);
    }

    pub fn parent(&self) -> Option<Scope> {
        self.inner.borrow().parent.clone()
    }

    // ===== GC support =====

    pub(crate) fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }

    pub(crate) fn downgrade(&self) -> WeakScope {
        WeakScope {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Visit every value held by this scope (bindings and varargs).
    pub(crate) fn for_each_ref(&self, f: &mut dyn FnMut(&LuaValue)) {
        let inner = self.inner.borrow();
        for v in inner.bindings.values() {
            f(v);
        }
        if let Some(va) = &inner.varargs {
            for v in va.iter() {
                f(v);
            }
        }
    }

    /// Drop all contents and the parent link. Used by the collector to
    /// dismantle unreachable reference cycles through captured scopes.
    pub(crate) fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.bindings.clear();
        inner.varargs = None;
        inner.parent = None;
    }
}

pub(crate) struct WeakScope {
    inner: Weak<RefCell<ScopeInner>>,
}

impl WeakScope {
    pub(crate) fn upgrade(&self) -> Option<Scope> {
        self.inner.upgrade().map(|inner| Scope { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_walks_chain() {
        let root = Scope::new_root();
        root.set_local("x", LuaValue::number(1.0));
        let child = root.child();
        assert_eq!(child.get("x"), LuaValue::number(1.0));
        assert_eq!(child.get("y"), LuaValue::Nil);
    }

    #[test]
    fn test_set_local_shadows() {
        let root = Scope::new_root();
        root.set_local("x", LuaValue::number(1.0));
        let child = root.child();
        child.set_local("x", LuaValue::number(2.0));
        assert_eq!(child.get("x"), LuaValue::number(2.0));
        assert_eq!(root.get("x"), LuaValue::number(1.0));
    }

    #[test]
    fn test_set_rebinds_nearest_declaration() {
        let root = Scope::new_root();
        let mid = root.child();
        mid.set_local("x", LuaValue::number(1.0));
        let leaf = mid.child();
        leaf.set("x", LuaValue::number(5.0));
        assert_eq!(mid.get("x"), LuaValue::number(5.0));
        // The write landed on the declaration, not on the leaf.
        assert_eq!(leaf.get("x"), LuaValue::number(5.0));
        assert_eq!(root.get("x"), LuaValue::Nil);
    }

    #[test]
    fn test_set_unbound_creates_global() {
        let root = Scope::new_root();
        let leaf = root.child().child();
        leaf.set("g", LuaValue::number(7.0));
        assert_eq!(root.get("g"), LuaValue::number(7.0));
    }

    #[test]
    fn test_varargs_inherited() {
        let root = Scope::new_root();
        assert!(root.varargs().is_empty());
        let call_scope = root.child();
        call_scope.set_varargs(MultiValue::single(LuaValue::number(9.0)));
        let block_scope = call_scope.child();
        assert_eq!(block_scope.varargs().first(), LuaValue::number(9.0));
    }
}
