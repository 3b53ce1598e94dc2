// Operator semantics and metatable dispatch.
//
// Every binary and unary operator tries the primitive implementation first
// and consults the metatable on type mismatch, searching the left operand's
// metatable before the right one's. Metatables are read at the moment of
// dispatch; reassigning one mid-operation never changes an in-flight
// dispatch.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::BinaryOperator;
use crate::lua_value::{format_number, LuaString, LuaTable, LuaValue, MultiValue};

use super::lua_limits::MAX_TAG_LOOP;
use super::{LuaError, LuaInterpreter, LuaResult};

/// Metamethod keys, one per dispatchable event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuaEvent {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Unm,
    Concat,
    Len,
    Eq,
    Lt,
    Le,
    Index,
    NewIndex,
    Call,
}

impl LuaEvent {
    pub const fn name(self) -> &'static str {
        match self {
            LuaEvent::Add => "__add",
            LuaEvent::Sub => "__sub",
            LuaEvent::Mul => "__mul",
            LuaEvent::Div => "__div",
            LuaEvent::Mod => "__mod",
            LuaEvent::Pow => "__pow",
            LuaEvent::Unm => "__unm",
            LuaEvent::Concat => "__concat",
            LuaEvent::Len => "__len",
            LuaEvent::Eq => "__eq",
            LuaEvent::Lt => "__lt",
            LuaEvent::Le => "__le",
            LuaEvent::Index => "__index",
            LuaEvent::NewIndex => "__newindex",
            LuaEvent::Call => "__call",
        }
    }
}

/// The metatable of a value: tables carry their own, strings share the
/// interpreter-wide string metatable, everything else has none.
pub(crate) fn get_metatable(
    interp: &LuaInterpreter,
    value: &LuaValue,
) -> Option<Rc<RefCell<LuaTable>>> {
    match value {
        LuaValue::Table(t) => t.borrow().metatable(),
        LuaValue::String(_) => interp.string_metatable(),
        _ => None,
    }
}

/// Raw lookup of `event` in the metatable of `value`, nil-filtered.
pub(crate) fn get_metamethod(
    interp: &LuaInterpreter,
    value: &LuaValue,
    event: LuaEvent,
) -> Option<LuaValue> {
    let mt = get_metatable(interp, value)?;
    let handler = mt.borrow().raw_get(&LuaValue::str(event.name()));
    if handler.is_nil() {
        None
    } else {
        Some(handler)
    }
}

fn binary_metamethod(
    interp: &LuaInterpreter,
    left: &LuaValue,
    right: &LuaValue,
    event: LuaEvent,
) -> Option<LuaValue> {
    get_metamethod(interp, left, event).or_else(|| get_metamethod(interp, right, event))
}

fn call_metamethod(
    interp: &mut LuaInterpreter,
    handler: LuaValue,
    args: Vec<LuaValue>,
) -> LuaResult<LuaValue> {
    Ok(interp.call_value(handler, MultiValue::multiple(args))?.first())
}

// ===== Numeric and string coercion =====

/// Parse a Lua numeric literal at runtime: decimal float syntax or `0x`
/// hexadecimal, surrounding whitespace ignored.
pub(crate) fn parse_lua_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let parsed = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok().map(|i| i as f64)
    } else if rest.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        // The leading-character check rejects the "inf"/"NaN" spellings
        // Rust accepts but Lua does not.
        rest.parse::<f64>().ok()
    } else {
        None
    };
    parsed.map(|n| if negative { -n } else { n })
}

/// Arithmetic coercion: numbers pass through, numeric strings parse.
pub(crate) fn coerce_number(value: &LuaValue) -> Option<f64> {
    match value {
        LuaValue::Number(n) => Some(*n),
        LuaValue::String(s) => s.as_str().and_then(parse_lua_number),
        _ => None,
    }
}

/// String coercion for concatenation: strings pass through, numbers format.
fn coerce_concat_bytes(value: &LuaValue) -> Option<Vec<u8>> {
    match value {
        LuaValue::String(s) => Some(s.as_bytes().to_vec()),
        LuaValue::Number(n) => Some(format_number(*n).into_bytes()),
        _ => None,
    }
}

// ===== Arithmetic =====

fn apply_arith(op: BinaryOperator, a: f64, b: f64) -> f64 {
    match op {
        BinaryOperator::Addition => a + b,
        BinaryOperator::Subtraction => a - b,
        BinaryOperator::Multiplication => a * b,
        BinaryOperator::Division => a / b,
        // Lua modulo: result takes the sign of the divisor.
        BinaryOperator::Modulo => a - (a / b).floor() * b,
        BinaryOperator::Power => a.powf(b),
        _ => unreachable!("not an arithmetic operator"),
    }
}

fn arith_event(op: BinaryOperator) -> LuaEvent {
    match op {
        BinaryOperator::Addition => LuaEvent::Add,
        BinaryOperator::Subtraction => LuaEvent::Sub,
        BinaryOperator::Multiplication => LuaEvent::Mul,
        BinaryOperator::Division => LuaEvent::Div,
        BinaryOperator::Modulo => LuaEvent::Mod,
        BinaryOperator::Power => LuaEvent::Pow,
        _ => unreachable!("not an arithmetic operator"),
    }
}

/// The error for a failed arithmetic dispatch: a string that would not
/// parse is an arithmetic (coercion) failure, anything else is a type
/// mismatch.
fn arith_error(left: &LuaValue, right: &LuaValue) -> LuaError {
    for v in [left, right] {
        if coerce_number(v).is_none() {
            if v.is_string() {
                return LuaError::arithmetic(
                    "attempt to perform arithmetic on a non-numeric string",
                );
            }
            return LuaError::type_error(format!(
                "attempt to perform arithmetic on a {} value",
                v.type_name()
            ));
        }
    }
    LuaError::type_error("attempt to perform arithmetic")
}

pub(crate) fn arith(
    interp: &mut LuaInterpreter,
    op: BinaryOperator,
    left: &LuaValue,
    right: &LuaValue,
) -> LuaResult<LuaValue> {
    if let (Some(a), Some(b)) = (coerce_number(left), coerce_number(right)) {
        return Ok(LuaValue::number(apply_arith(op, a, b)));
    }
    match binary_metamethod(interp, left, right, arith_event(op)) {
        Some(handler) => call_metamethod(interp, handler, vec![left.clone(), right.clone()]),
        None => Err(arith_error(left, right)),
    }
}

pub(crate) fn unary_minus(interp: &mut LuaInterpreter, value: &LuaValue) -> LuaResult<LuaValue> {
    if let Some(n) = coerce_number(value) {
        return Ok(LuaValue::number(-n));
    }
    match get_metamethod(interp, value, LuaEvent::Unm) {
        // __unm receives the operand twice, mirroring binary handlers.
        Some(handler) => call_metamethod(interp, handler, vec![value.clone(), value.clone()]),
        None => Err(arith_error(value, value)),
    }
}

// ===== Concatenation =====

pub(crate) fn concat(
    interp: &mut LuaInterpreter,
    left: &LuaValue,
    right: &LuaValue,
) -> LuaResult<LuaValue> {
    if let (Some(mut a), Some(b)) = (coerce_concat_bytes(left), coerce_concat_bytes(right)) {
        a.extend_from_slice(&b);
        return Ok(LuaValue::string(LuaString::from_bytes(a)));
    }
    match binary_metamethod(interp, left, right, LuaEvent::Concat) {
        Some(handler) => call_metamethod(interp, handler, vec![left.clone(), right.clone()]),
        None => {
            let bad = if coerce_concat_bytes(left).is_none() {
                left
            } else {
                right
            };
            Err(LuaError::type_error(format!(
                "attempt to concatenate a {} value",
                bad.type_name()
            )))
        }
    }
}

// ===== Length =====

pub(crate) fn length(interp: &mut LuaInterpreter, value: &LuaValue) -> LuaResult<LuaValue> {
    match value {
        LuaValue::String(s) => Ok(LuaValue::number(s.len() as f64)),
        LuaValue::Table(t) => match get_metamethod(interp, value, LuaEvent::Len) {
            Some(handler) => call_metamethod(interp, handler, vec![value.clone()]),
            None => Ok(LuaValue::number(t.borrow().len() as f64)),
        },
        other => match get_metamethod(interp, other, LuaEvent::Len) {
            Some(handler) => call_metamethod(interp, handler, vec![other.clone()]),
            None => Err(LuaError::type_error(format!(
                "attempt to get length of a {} value",
                other.type_name()
            ))),
        },
    }
}

// ===== Equality and ordering =====

pub(crate) fn equals(
    interp: &mut LuaInterpreter,
    left: &LuaValue,
    right: &LuaValue,
) -> LuaResult<bool> {
    if left.raw_equal(right) {
        return Ok(true);
    }
    // __eq fires only between two distinct tables carrying the same
    // metamethod; everything else already has its answer.
    if let (LuaValue::Table(_), LuaValue::Table(_)) = (left, right) {
        let lhs_handler = get_metamethod(interp, left, LuaEvent::Eq);
        let rhs_handler = get_metamethod(interp, right, LuaEvent::Eq);
        if let (Some(h1), Some(h2)) = (lhs_handler, rhs_handler) {
            if h1.raw_equal(&h2) {
                let result = call_metamethod(interp, h1, vec![left.clone(), right.clone()])?;
                return Ok(result.is_truthy());
            }
        }
    }
    Ok(false)
}

fn compare_error(left: &LuaValue, right: &LuaValue) -> LuaError {
    LuaError::type_error(format!(
        "attempt to compare {} with {}",
        left.type_name(),
        right.type_name()
    ))
}

pub(crate) fn less_than(
    interp: &mut LuaInterpreter,
    left: &LuaValue,
    right: &LuaValue,
) -> LuaResult<bool> {
    match (left, right) {
        (LuaValue::Number(a), LuaValue::Number(b)) => Ok(a < b),
        (LuaValue::String(a), LuaValue::String(b)) => Ok(a.as_bytes() < b.as_bytes()),
        _ => match binary_metamethod(interp, left, right, LuaEvent::Lt) {
            Some(handler) => {
                let result = call_metamethod(interp, handler, vec![left.clone(), right.clone()])?;
                Ok(result.is_truthy())
            }
            None => Err(compare_error(left, right)),
        },
    }
}

pub(crate) fn less_or_equal(
    interp: &mut LuaInterpreter,
    left: &LuaValue,
    right: &LuaValue,
) -> LuaResult<bool> {
    match (left, right) {
        (LuaValue::Number(a), LuaValue::Number(b)) => Ok(a <= b),
        (LuaValue::String(a), LuaValue::String(b)) => Ok(a.as_bytes() <= b.as_bytes()),
        _ => {
            if let Some(handler) = binary_metamethod(interp, left, right, LuaEvent::Le) {
                let result = call_metamethod(interp, handler, vec![left.clone(), right.clone()])?;
                return Ok(result.is_truthy());
            }
            // a <= b falls back to not (b < a) through __lt.
            if let Some(handler) = binary_metamethod(interp, left, right, LuaEvent::Lt) {
                let result = call_metamethod(interp, handler, vec![right.clone(), left.clone()])?;
                return Ok(result.is_falsy());
            }
            Err(compare_error(left, right))
        }
    }
}

// ===== Indexing =====

/// Indexed read `obj[key]`, following the `__index` chain: a function
/// handler is called with `(obj, key)`, a table handler is re-indexed.
/// The chain is bounded, so metatable cycles terminate with an error.
pub(crate) fn index(
    interp: &mut LuaInterpreter,
    obj: &LuaValue,
    key: &LuaValue,
) -> LuaResult<LuaValue> {
    if key.is_invalid_key() {
        return Err(LuaError::invalid_key(format!(
            "table index is {}",
            if key.is_nil() { "nil" } else { "NaN" }
        )));
    }

    let mut current = obj.clone();
    for _ in 0..MAX_TAG_LOOP {
        if let Some(t) = current.as_table() {
            let stored = t.borrow().raw_get(key);
            if !stored.is_nil() {
                return Ok(stored);
            }
            match get_metamethod(interp, &current, LuaEvent::Index) {
                None => return Ok(LuaValue::Nil),
                Some(handler) if handler.is_function() => {
                    return call_metamethod(interp, handler, vec![current.clone(), key.clone()]);
                }
                Some(next) => current = next,
            }
        } else {
            match get_metamethod(interp, &current, LuaEvent::Index) {
                None => {
                    return Err(LuaError::type_error(format!(
                        "attempt to index a {} value",
                        current.type_name()
                    )));
                }
                Some(handler) if handler.is_function() => {
                    return call_metamethod(interp, handler, vec![current.clone(), key.clone()]);
                }
                Some(next) => current = next,
            }
        }
    }
    Err(LuaError::type_error("'__index' chain too long; possible loop"))
}

/// Indexed write `obj[key] = value`, following the `__newindex` chain.
/// A present key is overwritten directly; writing nil removes the key.
pub(crate) fn new_index(
    interp: &mut LuaInterpreter,
    obj: &LuaValue,
    key: &LuaValue,
    value: LuaValue,
) -> LuaResult<()> {
    if key.is_invalid_key() {
        return Err(LuaError::invalid_key(format!(
            "table index is {}",
            if key.is_nil() { "nil" } else { "NaN" }
        )));
    }

    let mut current = obj.clone();
    for _ in 0..MAX_TAG_LOOP {
        if let Some(t) = current.as_table() {
            let present = !t.borrow().raw_get(key).is_nil();
            if present {
                return t.borrow_mut().raw_set(key.clone(), value);
            }
            match get_metamethod(interp, &current, LuaEvent::NewIndex) {
                None => return t.borrow_mut().raw_set(key.clone(), value),
                Some(handler) if handler.is_function() => {
                    interp.call_value(
                        handler,
                        MultiValue::multiple(vec![current.clone(), key.clone(), value]),
                    )?;
                    return Ok(());
                }
                Some(next) => current = next,
            }
        } else {
            match get_metamethod(interp, &current, LuaEvent::NewIndex) {
                None => {
                    return Err(LuaError::type_error(format!(
                        "attempt to index a {} value",
                        current.type_name()
                    )));
                }
                Some(handler) if handler.is_function() => {
                    interp.call_value(
                        handler,
                        MultiValue::multiple(vec![current.clone(), key.clone(), value]),
                    )?;
                    return Ok(());
                }
                Some(next) => current = next,
            }
        }
    }
    Err(LuaError::type_error(
        "'__newindex' chain too long; possible loop",
    ))
}
