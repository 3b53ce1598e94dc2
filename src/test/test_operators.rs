// Tests for operator semantics: arithmetic, comparison, concatenation,
// length, logical operators and coercion.
use super::run;

#[test]
fn test_arithmetic() {
    let result = run(r#"
        assert(1 + 2 == 3)
        assert(7 - 10 == -3)
        assert(6 * 7 == 42)
        assert(7 / 2 == 3.5)
        assert(2 ^ 10 == 1024)
        assert(4 ^ 0.5 == 2)
        assert(5 % 3 == 2)
        assert(-5 % 3 == 1)
        assert(5 % -3 == -1)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_precedence_and_associativity() {
    let result = run(r#"
        assert(1 + 2 * 3 == 7)
        assert((1 + 2) * 3 == 9)
        assert(2 ^ 3 ^ 2 == 512)
        assert(-2 ^ 2 == -4)
        assert(not true == false)
        assert(10 - 2 - 3 == 5)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_string_number_coercion() {
    let result = run(r#"
        assert("10" + 5 == 15)
        assert("3" * "4" == 12)
        assert("0x10" + 0 == 16)
        assert((1 .. 2) == "12")
        assert(("x" .. 1.5) == "x1.5")
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_comparison() {
    let result = run(r#"
        assert(1 < 2)
        assert(2 <= 2)
        assert(3 > 2)
        assert(3 >= 3)
        assert(1 ~= 2)
        assert("a" < "b")
        assert("abc" < "abd")
        assert("abc" <= "abc")
        assert(not ("b" < "a"))
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_equality_never_coerces() {
    let result = run(r#"
        assert("1" ~= 1)
        assert(0 ~= false)
        assert(nil ~= false)
        assert(nil == nil)
        local t = {}
        local u = {}
        assert(t == t)
        assert(t ~= u)
        local a = t
        assert(a == t)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_concat() {
    let result = run(r#"
        assert("a" .. "b" .. "c" == "abc")
        assert("" .. "" == "")
        assert((1 .. 2 .. 3) == "123")
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_length() {
    let result = run(r#"
        assert(#"hello" == 5)
        assert(#"" == 0)
        assert(#{1, 2, 3} == 3)
        assert(#{} == 0)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_truthiness() {
    let result = run(r#"
        assert(not nil)
        assert(not false)
        assert(0)
        assert("")
        assert({})
        if 0 then else error("zero must be truthy") end
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_logical_operators() {
    let result = run(r#"
        assert((false or "default") == "default")
        assert((nil and 1) == nil)
        assert((1 and 2) == 2)
        assert((false or nil) == nil)
        assert((1 or 2) == 1)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_short_circuit_skips_evaluation() {
    let result = run(r#"
        local called = false
        local function mark() called = true return true end
        local _ = false and mark()
        assert(called == false)
        local _ = true or mark()
        assert(called == false)
        local _ = true and mark()
        assert(called == true)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_comparing_mixed_types_fails() {
    let result = run(r#"
        local ok = pcall(function() return 1 < "2" end)
        assert(ok == false)
        local ok2 = pcall(function() return {} < {} end)
        assert(ok2 == false)
    "#);
    assert!(result.is_ok());
}
