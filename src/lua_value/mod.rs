// Dynamic value universe: tagged values, tables, functions, string payloads
// and multi-value lists.

mod lua_function;
mod lua_string;
mod lua_table;
mod lua_value;
mod multi_value;

pub use lua_function::{HostFunction, LuaClosure, LuaFunction};
pub use lua_string::LuaString;
pub use lua_table::LuaTable;
pub use lua_value::{format_number, LuaValue};
pub use multi_value::MultiValue;
