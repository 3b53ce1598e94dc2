// Tests for metatable-driven dispatch.
use super::run;
use crate::LuaValue;

#[test]
fn test_arith_metamethods() {
    let result = run(r#"
        local mt = {
            __add = function(a, b) return "add" end,
            __sub = function(a, b) return "sub" end,
            __mul = function(a, b) return "mul" end,
            __div = function(a, b) return "div" end,
            __mod = function(a, b) return "mod" end,
            __pow = function(a, b) return "pow" end,
        }
        local t = setmetatable({}, mt)
        assert(t + 1 == "add")
        assert(1 + t == "add")
        assert(t - 1 == "sub")
        assert(t * 2 == "mul")
        assert(t / 2 == "div")
        assert(t % 2 == "mod")
        assert(t ^ 2 == "pow")
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_add_receives_operands() {
    let result = run(r#"
        local mt = {__add = function(a, b) return a.v + b end}
        local t = setmetatable({v = 40}, mt)
        assert(t + 2 == 42)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_unm_metamethod() {
    let result = run(r#"
        local t = setmetatable({v = 3}, {__unm = function(self) return -self.v end})
        assert(-t == -3)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_concat_metamethod() {
    let result = run(r#"
        local t = setmetatable({}, {__concat = function(a, b) return "cat" end})
        assert(t .. "x" == "cat")
        assert("x" .. t == "cat")
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_len_metamethod() {
    let result = run(r#"
        local t = setmetatable({1, 2}, {__len = function() return 7 end})
        assert(#t == 7)
        local plain = setmetatable({1, 2}, {})
        assert(#plain == 2)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_index_function() {
    let result = run(r#"
        local mt = {__index = function(_, k) return "Z" .. k end}
        local t = setmetatable({}, mt)
        return t.foo
    "#)
    .unwrap();
    assert_eq!(result.first(), LuaValue::str("Zfoo"));
}

#[test]
fn test_index_table_chain() {
    let result = run(r#"
        local grandparent = {inherited = "deep"}
        local parent = setmetatable({shallow = "near"}, {__index = grandparent})
        local t = setmetatable({own = "mine"}, {__index = parent})
        assert(t.own == "mine")
        assert(t.shallow == "near")
        assert(t.inherited == "deep")
        assert(t.missing == nil)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_index_not_consulted_for_present_keys() {
    let result = run(r#"
        local calls = 0
        local t = setmetatable({present = 1}, {
            __index = function() calls = calls + 1 return "fallback" end,
        })
        assert(t.present == 1)
        assert(calls == 0)
        assert(t.absent == "fallback")
        assert(calls == 1)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_writes_bypass_index() {
    let result = run(r#"
        local parent = {x = 1}
        local t = setmetatable({}, {__index = parent})
        t.x = 2
        assert(rawget(t, "x") == 2)
        assert(parent.x == 1)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_newindex_function() {
    let result = run(r#"
        local log = {}
        local t = setmetatable({}, {
            __newindex = function(_, k, v) rawset(log, k, v) end,
        })
        t.a = 1
        assert(log.a == 1)
        assert(rawget(t, "a") == nil)
        -- Present keys are overwritten directly, without dispatch.
        rawset(t, "b", 1)
        t.b = 2
        assert(rawget(t, "b") == 2)
        assert(log.b == nil)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_newindex_table() {
    let result = run(r#"
        local store = {}
        local t = setmetatable({}, {__newindex = store})
        t.x = 5
        assert(store.x == 5)
        assert(rawget(t, "x") == nil)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_call_metamethod() {
    let result = run(r#"
        local t = setmetatable({base = 10}, {
            __call = function(self, x) return self.base + x end,
        })
        assert(t(32) == 42)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_eq_metamethod() {
    let result = run(r#"
        local mt = {__eq = function(a, b) return a.id == b.id end}
        local a = setmetatable({id = 1}, mt)
        local b = setmetatable({id = 1}, mt)
        local c = setmetatable({id = 2}, mt)
        assert(a == b)
        assert(a ~= c)
        assert(not rawequal(a, b))
        -- Identity still wins without consulting the metamethod.
        assert(a == a)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_eq_requires_shared_metamethod() {
    let result = run(r#"
        local a = setmetatable({}, {__eq = function() return true end})
        local b = setmetatable({}, {__eq = function() return true end})
        -- Different metamethod instances: no dispatch, identity comparison.
        assert(a ~= b)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_comparison_metamethods() {
    let result = run(r#"
        local mt = {__lt = function(a, b) return a.v < b.v end}
        local a = setmetatable({v = 1}, mt)
        local b = setmetatable({v = 2}, mt)
        assert(a < b)
        assert(b > a)
        -- __le falls back to not (b < a) through __lt.
        assert(a <= b)
        assert(a <= a)
        assert(not (b <= a))
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_metatable_read_at_dispatch_time() {
    let result = run(r#"
        local t = {}
        local ok = pcall(function() return t + 1 end)
        assert(ok == false)
        setmetatable(t, {__add = function() return "now" end})
        assert(t + 1 == "now")
        setmetatable(t, nil)
        local ok2 = pcall(function() return t + 1 end)
        assert(ok2 == false)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_getmetatable_and_protection() {
    let result = run(r#"
        local mt = {}
        local t = setmetatable({}, mt)
        assert(getmetatable(t) == mt)
        assert(getmetatable({}) == nil)
        assert(getmetatable(1) == nil)

        local protected = setmetatable({}, {__metatable = "locked"})
        assert(getmetatable(protected) == "locked")
        local ok = pcall(setmetatable, protected, {})
        assert(ok == false)
    "#);
    assert!(result.is_ok());
}
