mod test_control_flow;
mod test_metamethods;
mod test_operators;
mod test_scope;

use crate::lua_value::MultiValue;
use crate::{stdlib, LuaInterpreter, LuaResult};

/// Run a chunk in a fresh interpreter with the standard libraries open.
pub(crate) fn run(source: &str) -> LuaResult<MultiValue> {
    let mut interp = LuaInterpreter::new();
    let scope = interp.new_root_scope();
    stdlib::open_libs(&mut interp, &scope);
    interp.execute_string(source, &scope)
}
