// Tree-walking Lua interpreter
// Evaluates a parsed AST against a dynamically typed value universe with
// metatable dispatch, multi-value returns and lexical scoping.

#[cfg(test)]
mod test;

pub mod ast;
pub mod gc;
pub mod lua_interp;
pub mod lua_value;
pub mod parser;
#[cfg(feature = "serde")]
pub mod serde;
pub mod stdlib;

pub use lua_interp::{
    ControlSignal, InterpreterLimits, LuaError, LuaEvent, LuaInterpreter, LuaResult, Scope,
};
pub use lua_value::{
    HostFunction, LuaClosure, LuaFunction, LuaString, LuaTable, LuaValue, MultiValue,
};
pub use parser::{parse, LuaParseError};

/// Main entry point for executing Lua code: a fresh interpreter with the
/// standard libraries open, returning the chunk's first result value.
pub fn execute(source: &str) -> LuaResult<LuaValue> {
    let mut interp = LuaInterpreter::new();
    let scope = interp.new_root_scope();
    stdlib::open_libs(&mut interp, &scope);
    let results = interp.execute_string(source, &scope)?;
    Ok(results.first())
}

/// Execute Lua code against an existing interpreter and scope.
pub fn execute_with(
    interp: &mut LuaInterpreter,
    scope: &Scope,
    source: &str,
) -> LuaResult<MultiValue> {
    interp.execute_string(source, scope)
}
