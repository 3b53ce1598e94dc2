// Control signals carried alongside statement results. A non-Normal signal
// short-circuits the enclosing block and propagates outward until absorbed:
// Break by the innermost loop, Return by the innermost function call.

use crate::lua_value::MultiValue;

#[derive(Debug, Clone)]
pub enum ControlSignal {
    Normal,
    Break,
    Return(MultiValue),
}

impl ControlSignal {
    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, ControlSignal::Normal)
    }
}
