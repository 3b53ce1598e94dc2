// Lua function values: either a host (Rust) callable or a closure over an
// AST body and the scope captured at definition time.

use std::rc::Rc;

use crate::ast::FunctionBody;
use crate::lua_interp::{LuaInterpreter, LuaResult, Scope};

use super::MultiValue;

/// Rust function callable from Lua. Receives the interpreter (so it can
/// re-enter evaluation, e.g. `pcall`) and the argument list, and returns a
/// result list.
pub type HostFunction = fn(&mut LuaInterpreter, MultiValue) -> LuaResult<MultiValue>;

pub enum LuaFunction {
    Host(HostFunction),
    Closure(LuaClosure),
}

/// A closure: shared function prototype plus the environment it was
/// defined in. Closures created in the same scope observe each other's
/// mutations to captured variables.
pub struct LuaClosure {
    pub proto: Rc<FunctionBody>,
    pub scope: Scope,
}

impl LuaFunction {
    pub fn is_host(&self) -> bool {
        matches!(self, LuaFunction::Host(_))
    }

    pub fn is_closure(&self) -> bool {
        matches!(self, LuaFunction::Closure(_))
    }

    pub fn as_closure(&self) -> Option<&LuaClosure> {
        match self {
            LuaFunction::Closure(c) => Some(c),
            _ => None,
        }
    }
}

impl std::fmt::Debug for LuaFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LuaFunction::Host(_) => write!(f, "host function"),
            LuaFunction::Closure(c) => write!(
                f,
                "closure({} params{})",
                c.proto.params.len(),
                if c.proto.is_vararg { ", vararg" } else { "" }
            ),
        }
    }
}
