// Multi-return values from Lua functions, call arguments, and varargs.
// Reading past the end yields nil; expansion into other lists follows the
// "only the last expression in a list expands" rule, applied by the
// evaluator's expression-list walk.

use super::LuaValue;

#[derive(Debug, Clone, Default)]
pub struct MultiValue {
    values: Vec<LuaValue>,
}

impl MultiValue {
    pub fn empty() -> Self {
        MultiValue { values: Vec::new() }
    }

    pub fn single(value: LuaValue) -> Self {
        MultiValue {
            values: vec![value],
        }
    }

    pub fn multiple(values: Vec<LuaValue>) -> Self {
        MultiValue { values }
    }

    /// Value at `index`, nil when out of range.
    #[inline]
    pub fn get(&self, index: usize) -> LuaValue {
        self.values.get(index).cloned().unwrap_or(LuaValue::Nil)
    }

    /// The first value, nil when empty. This is the single-value projection
    /// used everywhere an expression is consumed in one-value context.
    #[inline]
    pub fn first(&self) -> LuaValue {
        self.get(0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push(&mut self, value: LuaValue) {
        self.values.push(value);
    }

    /// Append every value of `other`, used for the expanding last element of
    /// an expression list.
    pub fn extend(&mut self, other: MultiValue) {
        self.values.extend(other.values);
    }

    /// New list with `value` prepended (used by `__call` dispatch, which
    /// passes the callee as the first argument).
    pub fn prepended(self, value: LuaValue) -> Self {
        let mut values = Vec::with_capacity(self.values.len() + 1);
        values.push(value);
        values.extend(self.values);
        MultiValue { values }
    }

    /// The values from `start` onward, as a new list.
    pub fn from_index(&self, start: usize) -> Self {
        if start >= self.values.len() {
            return MultiValue::empty();
        }
        MultiValue {
            values: self.values[start..].to_vec(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LuaValue> {
        self.values.iter()
    }

    pub fn into_vec(self) -> Vec<LuaValue> {
        self.values
    }

    pub fn as_slice(&self) -> &[LuaValue] {
        &self.values
    }
}

impl From<Vec<LuaValue>> for MultiValue {
    fn from(values: Vec<LuaValue>) -> Self {
        MultiValue { values }
    }
}

impl IntoIterator for MultiValue {
    type Item = LuaValue;
    type IntoIter = std::vec::IntoIter<LuaValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_is_nil() {
        let mv = MultiValue::single(LuaValue::number(1.0));
        assert_eq!(mv.get(0), LuaValue::number(1.0));
        assert_eq!(mv.get(1), LuaValue::Nil);
        assert_eq!(MultiValue::empty().first(), LuaValue::Nil);
    }

    #[test]
    fn test_prepended() {
        let mv = MultiValue::multiple(vec![LuaValue::number(2.0), LuaValue::number(3.0)]);
        let mv = mv.prepended(LuaValue::number(1.0));
        assert_eq!(mv.len(), 3);
        assert_eq!(mv.get(0), LuaValue::number(1.0));
        assert_eq!(mv.get(2), LuaValue::number(3.0));
    }

    #[test]
    fn test_from_index() {
        let mv = MultiValue::multiple(vec![
            LuaValue::number(1.0),
            LuaValue::number(2.0),
            LuaValue::number(3.0),
        ]);
        let rest = mv.from_index(1);
        assert_eq!(rest.len(), 2);
        assert_eq!(rest.first(), LuaValue::number(2.0));
        assert!(mv.from_index(5).is_empty());
    }
}
