// Basic library (_G global functions)
// Implements: print, type, assert, error, tonumber, tostring, select,
// ipairs, pairs, next, pcall, xpcall, getmetatable, setmetatable,
// rawget, rawset, rawlen, rawequal, unpack

use std::cell::RefCell;
use std::rc::Rc;

use crate::lib_module;
use crate::lua_interp::{coerce_number, LuaError, LuaInterpreter, LuaResult};
use crate::lua_value::{LuaTable, LuaValue, MultiValue};

use super::LibraryModule;

pub fn create_basic_lib() -> LibraryModule {
    lib_module!("_G", {
        "print" => lua_print,
        "type" => lua_type,
        "assert" => lua_assert,
        "error" => lua_error,
        "tonumber" => lua_tonumber,
        "tostring" => lua_tostring,
        "select" => lua_select,
        "ipairs" => lua_ipairs,
        "pairs" => lua_pairs,
        "next" => lua_next,
        "pcall" => lua_pcall,
        "xpcall" => lua_xpcall,
        "getmetatable" => lua_getmetatable,
        "setmetatable" => lua_setmetatable,
        "rawget" => lua_rawget,
        "rawset" => lua_rawset,
        "rawlen" => lua_rawlen,
        "rawequal" => lua_rawequal,
        "unpack" => lua_unpack,
    })
    .with_value("_VERSION", |_| LuaValue::str("Lua 5.1"))
}

fn bad_argument(func: &str, index: usize, expected: &str, got: &LuaValue) -> LuaError {
    LuaError::type_error(format!(
        "bad argument #{} to '{}' ({} expected, got {})",
        index,
        func,
        expected,
        got.type_name()
    ))
}

fn require_table(
    func: &str,
    index: usize,
    value: &LuaValue,
) -> LuaResult<Rc<RefCell<LuaTable>>> {
    value
        .as_table()
        .ok_or_else(|| bad_argument(func, index, "table", value))
}

/// print(...) - Print values to stdout, tab separated
fn lua_print(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let output: Vec<String> = args.iter().map(|v| v.to_string()).collect();
    println!("{}", output.join("\t"));
    Ok(MultiValue::empty())
}

/// type(v) - Return the type of a value as a string
fn lua_type(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    Ok(MultiValue::single(LuaValue::str(args.first().type_name())))
}

/// assert(v [, message, ...]) - Raise an error if v is false or nil
fn lua_assert(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    if args.first().is_truthy() {
        // All arguments pass through on success.
        return Ok(args);
    }
    let message = args.get(1);
    if message.is_nil() {
        Err(LuaError::user(LuaValue::str("assertion failed!")))
    } else {
        Err(LuaError::user(message))
    }
}

/// error(v) - Raise an error carrying an arbitrary value
fn lua_error(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    Err(LuaError::user(args.first()))
}

/// tonumber(v [, base]) - Convert to a number, nil on failure
fn lua_tonumber(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let value = args.first();
    let base = args.get(1);

    if base.is_nil() {
        let result = match coerce_number(&value) {
            Some(n) => LuaValue::number(n),
            None => LuaValue::Nil,
        };
        return Ok(MultiValue::single(result));
    }

    let base = base
        .as_number()
        .filter(|b| (2.0..=36.0).contains(b))
        .ok_or_else(|| {
            LuaError::type_error("bad argument #2 to 'tonumber' (base out of range)")
        })? as u32;
    let text = match value.as_string() {
        Some(s) => s.clone(),
        None => return Err(bad_argument("tonumber", 1, "string", &value)),
    };
    let result = text
        .as_str()
        .and_then(|s| i64::from_str_radix(s.trim(), base).ok())
        .map(|i| LuaValue::number(i as f64))
        .unwrap_or(LuaValue::Nil);
    Ok(MultiValue::single(result))
}

/// tostring(v) - Convert any value to a string
fn lua_tostring(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    Ok(MultiValue::single(LuaValue::str(&args.first().to_string())))
}

/// select('#', ...) or select(n, ...) - Argument count or tail
fn lua_select(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let selector = args.first();
    if let Some(s) = selector.as_string() {
        if s.as_bytes() == b"#" {
            return Ok(MultiValue::single(LuaValue::number(
                (args.len().saturating_sub(1)) as f64,
            )));
        }
    }
    let n = selector
        .as_number()
        .filter(|n| n.fract() == 0.0)
        .ok_or_else(|| bad_argument("select", 1, "number", &selector))?;
    let rest_len = args.len().saturating_sub(1);
    let start = if n < 0.0 {
        let back = (-n) as usize;
        if back > rest_len {
            return Err(LuaError::type_error(
                "bad argument #1 to 'select' (index out of range)",
            ));
        }
        rest_len - back + 1
    } else if n >= 1.0 {
        n as usize
    } else {
        return Err(LuaError::type_error(
            "bad argument #1 to 'select' (index out of range)",
        ));
    };
    Ok(args.from_index(start))
}

/// The stateless array iterator behind ipairs.
fn inext(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let table = require_table("ipairs iterator", 1, &args.first())?;
    let i = args.get(1).as_number().unwrap_or(0.0) as i64 + 1;
    let value = table.borrow().get_int(i);
    if value.is_nil() {
        Ok(MultiValue::single(LuaValue::Nil))
    } else {
        Ok(MultiValue::multiple(vec![
            LuaValue::number(i as f64),
            value,
        ]))
    }
}

/// ipairs(t) - Iterate t[1], t[2], ... until the first nil
fn lua_ipairs(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let table = args.first();
    require_table("ipairs", 1, &table)?;
    Ok(MultiValue::multiple(vec![
        LuaValue::function(crate::lua_value::LuaFunction::Host(inext)),
        table,
        LuaValue::number(0.0),
    ]))
}

/// pairs(t) - Iterate all key/value pairs via next
fn lua_pairs(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let table = args.first();
    require_table("pairs", 1, &table)?;
    Ok(MultiValue::multiple(vec![
        LuaValue::function(crate::lua_value::LuaFunction::Host(lua_next)),
        table,
        LuaValue::Nil,
    ]))
}

/// next(t [, key]) - The key/value pair after key, nil at the end
fn lua_next(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let table = require_table("next", 1, &args.first())?;
    let key = args.get(1);
    let entry = table.borrow().next(&key)?;
    match entry {
        Some((k, v)) => Ok(MultiValue::multiple(vec![k, v])),
        None => Ok(MultiValue::single(LuaValue::Nil)),
    }
}

/// pcall(f, ...) - Protected call: (true, results...) or (false, error)
fn lua_pcall(interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let func = args.first();
    match interp.call(&func, args.from_index(1)) {
        Ok(results) => Ok(results.prepended(LuaValue::boolean(true))),
        Err(err) => Ok(MultiValue::multiple(vec![
            LuaValue::boolean(false),
            err.to_value(),
        ])),
    }
}

/// xpcall(f, handler, ...) - Protected call with an error handler
fn lua_xpcall(interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let func = args.first();
    let handler = args.get(1);
    match interp.call(&func, args.from_index(2)) {
        Ok(results) => Ok(results.prepended(LuaValue::boolean(true))),
        Err(err) => {
            let handled = interp.call(&handler, MultiValue::single(err.to_value()))?;
            Ok(MultiValue::multiple(vec![
                LuaValue::boolean(false),
                handled.first(),
            ]))
        }
    }
}

/// getmetatable(v) - The metatable, honoring __metatable protection
fn lua_getmetatable(interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let value = args.first();
    let result = match interp.metatable_of(&value) {
        Some(mt) => {
            let protected = mt.borrow().get_field("__metatable");
            if protected.is_nil() {
                LuaValue::table_ref(mt)
            } else {
                protected
            }
        }
        None => LuaValue::Nil,
    };
    Ok(MultiValue::single(result))
}

/// setmetatable(t, mt) - Set or clear the metatable of a table
fn lua_setmetatable(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let value = args.first();
    let table = require_table("setmetatable", 1, &value)?;
    let mt = args.get(1);
    let new_meta = match &mt {
        LuaValue::Nil => None,
        LuaValue::Table(m) => Some(m.clone()),
        other => return Err(bad_argument("setmetatable", 2, "nil or table", other)),
    };
    {
        let current = table.borrow().metatable();
        if let Some(current) = current {
            if !current.borrow().get_field("__metatable").is_nil() {
                return Err(LuaError::type_error("cannot change a protected metatable"));
            }
        }
    }
    table.borrow_mut().set_metatable(new_meta);
    Ok(MultiValue::single(value))
}

/// rawget(t, k) - Read without metamethods
fn lua_rawget(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let table = require_table("rawget", 1, &args.first())?;
    let value = table.borrow().raw_get(&args.get(1));
    Ok(MultiValue::single(value))
}

/// rawset(t, k, v) - Write without metamethods, returns t
fn lua_rawset(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let target = args.first();
    let table = require_table("rawset", 1, &target)?;
    table.borrow_mut().raw_set(args.get(1), args.get(2))?;
    Ok(MultiValue::single(target))
}

/// rawlen(v) - Length without metamethods
fn lua_rawlen(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let value = args.first();
    let len = match &value {
        LuaValue::Table(t) => t.borrow().len() as f64,
        LuaValue::String(s) => s.len() as f64,
        other => return Err(bad_argument("rawlen", 1, "table or string", other)),
    };
    Ok(MultiValue::single(LuaValue::number(len)))
}

/// rawequal(a, b) - Equality without metamethods
fn lua_rawequal(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let equal = args.first().raw_equal(&args.get(1));
    Ok(MultiValue::single(LuaValue::boolean(equal)))
}

/// unpack(t [, i [, j]]) - Return t[i] .. t[j] as multiple values
fn lua_unpack(_interp: &mut LuaInterpreter, args: MultiValue) -> LuaResult<MultiValue> {
    let table = require_table("unpack", 1, &args.first())?;
    let i = match args.get(1).as_number() {
        Some(n) => n as i64,
        None => 1,
    };
    let j = match args.get(2).as_number() {
        Some(n) => n as i64,
        None => table.borrow().len(),
    };
    let mut out = MultiValue::empty();
    for index in i..=j {
        out.push(table.borrow().get_int(index));
    }
    Ok(out)
}
