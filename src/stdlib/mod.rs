// Library registration: a clean way to expose Rust functions to scripts.
// Modules named "_G" register their entries directly in the target scope;
// any other module gets its own table bound under the module name.

pub mod basic;

use crate::lua_interp::{LuaInterpreter, Scope};
use crate::lua_value::{HostFunction, LuaFunction, LuaValue};

/// Functions that create values when the module loads.
pub type ValueInitializer = fn(&mut LuaInterpreter) -> LuaValue;

pub enum LibraryEntry {
    Function(HostFunction),
    Value(ValueInitializer),
}

pub struct LibraryModule {
    pub name: &'static str,
    pub entries: Vec<(&'static str, LibraryEntry)>,
}

impl LibraryModule {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Vec::new(),
        }
    }

    pub fn with_function(mut self, name: &'static str, func: HostFunction) -> Self {
        self.entries.push((name, LibraryEntry::Function(func)));
        self
    }

    pub fn with_value(mut self, name: &'static str, init: ValueInitializer) -> Self {
        self.entries.push((name, LibraryEntry::Value(init)));
        self
    }
}

/// Builder for library modules.
#[macro_export]
macro_rules! lib_module {
    ($name:expr, {
        $($item_name:expr => $item:expr),* $(,)?
    }) => {{
        let mut module = $crate::stdlib::LibraryModule::new($name);
        $(
            module.entries.push((
                $item_name,
                $crate::stdlib::LibraryEntry::Function($item),
            ));
        )*
        module
    }};
}

/// Load a module into `scope`.
pub fn load_module(interp: &mut LuaInterpreter, scope: &Scope, module: LibraryModule) {
    if module.name == "_G" {
        for (name, entry) in module.entries {
            let value = resolve_entry(interp, entry);
            scope.set_local(name, value);
        }
        return;
    }

    let table = interp.create_table();
    for (name, entry) in module.entries {
        let value = resolve_entry(interp, entry);
        table.borrow_mut().set_field(name, value);
    }
    scope.set_local(module.name, LuaValue::table_ref(table));
}

fn resolve_entry(interp: &mut LuaInterpreter, entry: LibraryEntry) -> LuaValue {
    match entry {
        LibraryEntry::Function(func) => LuaValue::function(LuaFunction::Host(func)),
        LibraryEntry::Value(init) => init(interp),
    }
}

/// Open every standard library into `scope`.
pub fn open_libs(interp: &mut LuaInterpreter, scope: &Scope) {
    load_module(interp, scope, basic::create_basic_lib());
}
