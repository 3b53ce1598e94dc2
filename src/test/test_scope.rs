// Tests for lexical scoping: locals, globals, shadowing, capture.
use super::run;
use crate::{stdlib, LuaInterpreter, LuaValue};

#[test]
fn test_local_invisible_outside_block() {
    let result = run(r#"
        do
            local hidden = 1
            assert(hidden == 1)
        end
        assert(hidden == nil)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_assignment_without_local_creates_global() {
    let mut interp = LuaInterpreter::new();
    let scope = interp.new_root_scope();
    stdlib::open_libs(&mut interp, &scope);
    interp
        .execute_string(
            r#"
            do
                g = "global"
                local l = "local"
            end
        "#,
            &scope,
        )
        .unwrap();
    assert_eq!(scope.get("g"), LuaValue::str("global"));
    assert_eq!(scope.get("l"), LuaValue::Nil);
}

#[test]
fn test_assignment_targets_nearest_declaration() {
    let result = run(r#"
        local x = "outer"
        do
            x = "changed"
        end
        assert(x == "changed")

        local y = "outer"
        do
            local y = "inner"
            y = "inner changed"
            assert(y == "inner changed")
        end
        assert(y == "outer")
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_shadowing() {
    let result = run(r#"
        local v = 1
        local function read() return v end
        do
            local v = 2
            assert(v == 2)
            -- The closure captured the outer declaration.
            assert(read() == 1)
        end
        assert(v == 1)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_swap_assignment() {
    let result = run(r#"
        local a, b = 1, 2
        a, b = b, a
        assert(a == 2 and b == 1)

        local t = {x = 1, y = 2}
        t.x, t.y = t.y, t.x
        assert(t.x == 2 and t.y == 1)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_rhs_evaluated_before_targets_written() {
    let result = run(r#"
        local t = {1, 2, 3}
        local i = 1
        i, t[i] = 3, "written"
        -- The right-hand side and target subexpressions saw i == 1.
        assert(i == 3)
        assert(t[1] == "written" or t[3] == "written")
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_two_closures_share_captured_variable() {
    let result = run(r#"
        local n = 0
        local function inc() n = n + 1 end
        local function get() return n end
        inc()
        inc()
        assert(get() == 2)
        n = 10
        assert(get() == 10)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_chunk_locals_do_not_leak_into_root() {
    let mut interp = LuaInterpreter::new();
    let scope = interp.new_root_scope();
    stdlib::open_libs(&mut interp, &scope);
    interp
        .execute_string("local chunk_private = 1", &scope)
        .unwrap();
    assert_eq!(scope.get("chunk_private"), LuaValue::Nil);

    // Globals persist across chunks run against the same scope.
    interp.execute_string("shared = 7", &scope).unwrap();
    let result = interp
        .execute_string("return shared", &scope)
        .unwrap();
    assert_eq!(result.first(), LuaValue::number(7.0));
}

#[test]
fn test_multiple_assignment_truncation_and_extension() {
    let result = run(r#"
        local a, b, c = 1
        assert(a == 1 and b == nil and c == nil)
        local d = 1, 2
        assert(d == 1)
    "#);
    assert!(result.is_ok());
}
