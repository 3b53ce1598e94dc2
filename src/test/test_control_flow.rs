// Tests for control flow: if/elseif/else, loops, break, and signal
// propagation through nested blocks.
use super::run;
use crate::LuaValue;

#[test]
fn test_if_branches() {
    let result = run(r#"
        local function classify(n)
            if n < 0 then
                return "negative"
            elseif n == 0 then
                return "zero"
            elseif n < 10 then
                return "small"
            else
                return "big"
            end
        end
        assert(classify(-5) == "negative")
        assert(classify(0) == "zero")
        assert(classify(3) == "small")
        assert(classify(99) == "big")
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_exactly_one_branch_runs() {
    let result = run(r#"
        local count = 0
        local function bump() count = count + 1 return true end
        if bump() then
        elseif bump() then
        else bump()
        end
        assert(count == 1)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_while_loop() {
    let result = run(r#"
        local i, sum = 1, 0
        while i <= 10 do
            sum = sum + i
            i = i + 1
        end
        assert(sum == 55)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_while_false_never_runs() {
    let result = run(r#"
        local ran = false
        while false do ran = true end
        assert(ran == false)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_repeat_runs_at_least_once() {
    let result = run(r#"
        local n = 0
        repeat n = n + 1 until true
        assert(n == 1)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_repeat_condition_sees_body_locals() {
    // The until condition is evaluated in the body's scope.
    let result = run(r#"
        local i = 0
        repeat
            local x = i + 1
            i = x
        until x >= 3
        return i
    "#)
    .unwrap();
    assert_eq!(result.first(), LuaValue::number(3.0));
}

#[test]
fn test_numeric_for() {
    let result = run(r#"
        local t = {}
        for i = 1, 5 do t[i] = i * i end
        return t[1], t[2], t[3], t[4], t[5]
    "#)
    .unwrap();
    let values: Vec<f64> = (0..5).map(|i| result.get(i).as_number().unwrap()).collect();
    assert_eq!(values, vec![1.0, 4.0, 9.0, 16.0, 25.0]);
}

#[test]
fn test_numeric_for_step() {
    let result = run(r#"
        local down = {}
        for i = 5, 1, -2 do down[#down + 1] = i end
        assert(#down == 3)
        assert(down[1] == 5 and down[2] == 3 and down[3] == 1)

        local none = 0
        for i = 1, 0 do none = none + 1 end
        assert(none == 0)

        local fractional = 0
        for i = 0, 1, 0.25 do fractional = fractional + 1 end
        assert(fractional == 5)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_generic_for_ipairs() {
    let result = run(r#"
        local t = {"a", "b", "c"}
        local joined = ""
        for i, v in ipairs(t) do
            joined = joined .. i .. v
        end
        assert(joined == "1a2b3c")
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_generic_for_pairs() {
    let result = run(r#"
        local t = {x = 1, y = 2, z = 3}
        local sum, count = 0, 0
        for _, v in pairs(t) do
            sum = sum + v
            count = count + 1
        end
        assert(sum == 6 and count == 3)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_generic_for_custom_iterator() {
    let result = run(r#"
        local function range(n)
            local i = 0
            return function()
                i = i + 1
                if i <= n then return i end
            end
        end
        local total = 0
        for v in range(4) do total = total + v end
        assert(total == 10)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_break() {
    let result = run(r#"
        local count = 0
        for i = 1, 10 do
            if i > 3 then break end
            count = count + 1
        end
        assert(count == 3)

        local n = 0
        while true do
            n = n + 1
            if n == 7 then break end
        end
        assert(n == 7)

        local m = 0
        repeat
            m = m + 1
            if m == 2 then break end
        until false
        assert(m == 2)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_break_only_innermost_loop() {
    let result = run(r#"
        local count = 0
        for i = 1, 3 do
            for j = 1, 3 do
                if j == 2 then break end
                count = count + 1
            end
        end
        assert(count == 3)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_return_propagates_through_loops() {
    let result = run(r#"
        local function find(t, target)
            for i, v in ipairs(t) do
                if v == target then return i end
            end
        end
        assert(find({"a", "b", "c"}, "b") == 2)
        assert(find({"a"}, "z") == nil)
    "#);
    assert!(result.is_ok());
}

#[test]
fn test_do_block() {
    let result = run(r#"
        local x = 1
        do
            local x = 2
            assert(x == 2)
        end
        assert(x == 1)
    "#);
    assert!(result.is_ok());
}
