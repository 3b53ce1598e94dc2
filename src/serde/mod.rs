// Bridge between Lua values and serde_json values (feature "serde").
//
// Tables with a pure array shape become JSON arrays, everything else
// becomes an object with stringified keys. Functions and reference cycles
// are not serializable.

use std::collections::HashSet;
use std::rc::Rc;

use serde_json::{Map, Number, Value};

use crate::lua_interp::{LuaError, LuaInterpreter, LuaResult};
use crate::lua_value::{LuaValue, MultiValue};

pub fn to_json(value: &LuaValue) -> LuaResult<Value> {
    let mut visiting = HashSet::new();
    to_json_inner(value, &mut visiting)
}

fn to_json_inner(value: &LuaValue, visiting: &mut HashSet<usize>) -> LuaResult<Value> {
    match value {
        LuaValue::Nil => Ok(Value::Null),
        LuaValue::Boolean(b) => Ok(Value::Bool(*b)),
        LuaValue::Number(n) => Number::from_f64(*n)
            .map(Value::Number)
            .ok_or_else(|| LuaError::type_error("cannot serialize NaN or infinity")),
        LuaValue::String(s) => Ok(Value::String(s.to_text().into_owned())),
        LuaValue::Table(t) => {
            let id = Rc::as_ptr(t) as *const () as usize;
            if !visiting.insert(id) {
                return Err(LuaError::type_error("cannot serialize a cyclic table"));
            }
            let table = t.borrow();
            let len = table.len();

            let result = if len > 0 && is_pure_array(&table, len) {
                let mut array = Vec::with_capacity(len as usize);
                for i in 1..=len {
                    array.push(to_json_inner(&table.get_int(i), visiting)?);
                }
                Ok(Value::Array(array))
            } else {
                let mut object = Map::new();
                let mut key = LuaValue::Nil;
                while let Some((k, v)) = table.next(&key)? {
                    object.insert(k.to_string(), to_json_inner(&v, visiting)?);
                    key = k;
                }
                Ok(Value::Object(object))
            };

            visiting.remove(&id);
            result
        }
        LuaValue::Function(_) => Err(LuaError::type_error("cannot serialize a function value")),
    }
}

fn is_pure_array(table: &crate::lua_value::LuaTable, len: i64) -> bool {
    // Array shape: iteration yields exactly the keys 1..=len.
    let mut count = 0i64;
    let mut key = LuaValue::Nil;
    while let Ok(Some((k, _))) = table.next(&key) {
        count += 1;
        match k.as_number() {
            Some(n) if n.fract() == 0.0 && n >= 1.0 && n <= len as f64 => {}
            _ => return false,
        }
        key = k;
    }
    count == len
}

pub fn from_json(interp: &mut LuaInterpreter, value: &Value) -> LuaValue {
    match value {
        Value::Null => LuaValue::Nil,
        Value::Bool(b) => LuaValue::boolean(*b),
        Value::Number(n) => LuaValue::number(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => LuaValue::str(s),
        Value::Array(items) => {
            let table = interp.create_table();
            for (i, item) in items.iter().enumerate() {
                let converted = from_json(interp, item);
                table.borrow_mut().set_int(i as i64 + 1, converted);
            }
            LuaValue::table_ref(table)
        }
        Value::Object(entries) => {
            let table = interp.create_table();
            for (key, item) in entries {
                let converted = from_json(interp, item);
                table.borrow_mut().set_field(key, converted);
            }
            LuaValue::table_ref(table)
        }
    }
}

/// Convert a result list, useful for handing script output to JSON APIs.
pub fn results_to_json(results: &MultiValue) -> LuaResult<Vec<Value>> {
    results.iter().map(to_json).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stdlib;

    fn eval(source: &str) -> LuaValue {
        let mut interp = LuaInterpreter::new();
        let scope = interp.new_root_scope();
        stdlib::open_libs(&mut interp, &scope);
        interp
            .execute_string(source, &scope)
            .expect("script should run")
            .first()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(to_json(&LuaValue::Nil).unwrap(), Value::Null);
        assert_eq!(to_json(&LuaValue::boolean(true)).unwrap(), Value::Bool(true));
        assert_eq!(
            to_json(&LuaValue::str("hi")).unwrap(),
            Value::String("hi".to_string())
        );
        assert!(to_json(&LuaValue::number(f64::NAN)).is_err());
    }

    #[test]
    fn test_array_shape() {
        let value = eval("return {1, 2, 3}");
        let json = to_json(&value).unwrap();
        assert_eq!(json, serde_json::json!([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_object_shape() {
        let value = eval("return {x = 1, nested = {true}}");
        let json = to_json(&value).unwrap();
        assert_eq!(json["x"], serde_json::json!(1.0));
        assert_eq!(json["nested"], serde_json::json!([true]));
    }

    #[test]
    fn test_cycle_rejected() {
        let value = eval("local t = {} t.me = t return t");
        assert!(to_json(&value).is_err());
    }

    #[test]
    fn test_function_rejected() {
        let value = eval("return function() end");
        assert!(to_json(&value).is_err());
    }

    #[test]
    fn test_from_json_round_trip() {
        let mut interp = LuaInterpreter::new();
        let json = serde_json::json!({"name": "x", "items": [1, 2], "ok": true});
        let value = from_json(&mut interp, &json);
        let table = value.as_table().expect("object becomes a table");
        assert_eq!(table.borrow().get_field("name"), LuaValue::str("x"));
        assert_eq!(table.borrow().get_field("ok"), LuaValue::boolean(true));
        let items = table.borrow().get_field("items");
        let items = items.as_table().expect("array becomes a table");
        assert_eq!(items.borrow().len(), 2);

        let back = to_json(&value).unwrap();
        assert_eq!(back["name"], json["name"]);
        assert_eq!(back["ok"], json["ok"]);
    }
}
