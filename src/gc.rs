// Cycle reclamation for the Rc-managed object graph.
//
// Tables, closures and scopes are reference counted, and scripts routinely
// build cycles (a table holding a closure whose captured scope binds the
// table, metatable loops, self-referential tables). Plain Rc never frees
// those. The registry keeps weak references to every table the interpreter
// allocates and every scope captured by a closure; `collect` marks the
// graph reachable from the given roots and then clears the *contents* of
// unreachable registered objects. Removing their outgoing edges collapses
// the cycles, and the ordinary Rc drops do the rest.
//
// Only objects allocated through the interpreter participate. The caller
// names the complete root set; host-held values outside it must be included
// by the caller.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use log::debug;

use crate::lua_interp::{Scope, WeakScope};
use crate::lua_value::{LuaFunction, LuaTable, LuaValue};

pub struct GcRegistry {
    tables: Vec<Weak<RefCell<LuaTable>>>,
    scopes: Vec<WeakScope>,
}

/// Work items for the mark phase.
enum Mark {
    Value(LuaValue),
    Scope(Scope),
}

impl GcRegistry {
    pub fn new() -> Self {
        GcRegistry {
            tables: Vec::new(),
            scopes: Vec::new(),
        }
    }

    pub(crate) fn track_table(&mut self, table: &Rc<RefCell<LuaTable>>) {
        self.tables.push(Rc::downgrade(table));
    }

    pub(crate) fn track_scope(&mut self, scope: &Scope) {
        self.scopes.push(scope.downgrade());
    }

    /// Number of live tracked objects.
    pub fn tracked(&self) -> usize {
        self.tables.iter().filter(|w| w.strong_count() > 0).count()
            + self.scopes.iter().filter(|w| w.upgrade().is_some()).count()
    }

    /// Mark everything reachable from `roots`, then dismantle unreachable
    /// registered objects. Returns the number of objects cleared.
    pub fn collect(&mut self, roots: &[Scope]) -> usize {
        let mut marked_tables: HashSet<usize> = HashSet::new();
        let mut marked_scopes: HashSet<usize> = HashSet::new();
        let mut marked_functions: HashSet<usize> = HashSet::new();

        let mut work: Vec<Mark> = roots.iter().cloned().map(Mark::Scope).collect();
        while let Some(item) = work.pop() {
            match item {
                Mark::Scope(scope) => {
                    if !marked_scopes.insert(scope.ptr_id()) {
                        continue;
                    }
                    scope.for_each_ref(&mut |v| work.push(Mark::Value(v.clone())));
                    if let Some(parent) = scope.parent() {
                        work.push(Mark::Scope(parent));
                    }
                }
                Mark::Value(value) => match value {
                    LuaValue::Table(t) => {
                        if !marked_tables.insert(Rc::as_ptr(&t) as *const () as usize) {
                            continue;
                        }
                        let table = t.borrow();
                        table.for_each_ref(&mut |v| work.push(Mark::Value(v.clone())));
                        if let Some(mt) = table.metatable() {
                            work.push(Mark::Value(LuaValue::table_ref(mt)));
                        }
                    }
                    LuaValue::Function(f) => {
                        if !marked_functions.insert(Rc::as_ptr(&f) as *const () as usize) {
                            continue;
                        }
                        if let LuaFunction::Closure(closure) = f.as_ref() {
                            work.push(Mark::Scope(closure.scope.clone()));
                        }
                    }
                    _ => {}
                },
            }
        }

        // Sweep: clear the contents of unreachable registered objects and
        // prune dead registry entries.
        let mut cleared = 0usize;
        let mut seen: HashSet<usize> = HashSet::new();

        self.tables.retain(|weak| {
            let Some(table) = weak.upgrade() else {
                return false;
            };
            let id = Rc::as_ptr(&table) as *const () as usize;
            if marked_tables.contains(&id) {
                return true;
            }
            if seen.insert(id) {
                table.borrow_mut().clear();
                cleared += 1;
            }
            false
        });

        self.scopes.retain(|weak| {
            let Some(scope) = weak.upgrade() else {
                return false;
            };
            if marked_scopes.contains(&scope.ptr_id()) {
                return true;
            }
            if seen.insert(scope.ptr_id()) {
                scope.clear();
                cleared += 1;
            }
            false
        });

        debug!(
            "gc: cleared {} unreachable objects, {} still tracked",
            cleared,
            self.tables.len() + self.scopes.len()
        );
        cleared
    }
}

impl Default for GcRegistry {
    fn default() -> Self {
        GcRegistry::new()
    }
}
