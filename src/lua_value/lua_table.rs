// Lua table: associative container with an array part and a hash part.
// - Array part stores values for the dense integer keys [1..n].
// - Hash part is an insertion-ordered IndexMap, which keeps `next`
//   iteration stable and cheap.
// - Keys with value nil are absent by definition; nil/NaN keys are rejected.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::RandomState;
use indexmap::IndexMap;

use crate::lua_interp::{LuaError, LuaResult};

use super::LuaValue;

pub struct LuaTable {
    /// Values for integer keys 1..=array.len(). Interior holes are allowed
    /// (a nil write inside the range), trailing holes are trimmed.
    array: Vec<LuaValue>,

    /// Everything else, insertion ordered.
    hash: IndexMap<LuaValue, LuaValue, RandomState>,

    /// Metatable, absent by default.
    metatable: Option<Rc<RefCell<LuaTable>>>,
}

/// An integer key that may belong to the array part.
fn array_index(key: &LuaValue) -> Option<usize> {
    if let LuaValue::Number(n) = key {
        if n.fract() == 0.0 && *n >= 1.0 && *n <= usize::MAX as f64 {
            return Some(*n as usize);
        }
    }
    None
}

impl LuaTable {
    pub fn new() -> Self {
        LuaTable {
            array: Vec::new(),
            hash: IndexMap::with_hasher(RandomState::new()),
            metatable: None,
        }
    }

    pub fn with_capacity(narr: usize, nrec: usize) -> Self {
        LuaTable {
            array: Vec::with_capacity(narr),
            hash: IndexMap::with_capacity_and_hasher(nrec, RandomState::new()),
            metatable: None,
        }
    }

    // ===== Metatable =====

    pub fn metatable(&self) -> Option<Rc<RefCell<LuaTable>>> {
        self.metatable.clone()
    }

    pub fn set_metatable(&mut self, mt: Option<Rc<RefCell<LuaTable>>>) {
        self.metatable = mt;
    }

    // ===== Raw access (no metamethods) =====

    /// Stored value for `key`, nil when absent. Nil and NaN keys are never
    /// present, so they simply read as nil here; writes reject them.
    pub fn raw_get(&self, key: &LuaValue) -> LuaValue {
        if let Some(i) = array_index(key) {
            if i <= self.array.len() {
                return self.array[i - 1].clone();
            }
        }
        self.hash.get(key).cloned().unwrap_or(LuaValue::Nil)
    }

    /// Convenience accessor for 1-based integer keys.
    pub fn get_int(&self, key: i64) -> LuaValue {
        self.raw_get(&LuaValue::number(key as f64))
    }

    pub fn set_int(&mut self, key: i64, value: LuaValue) {
        // Integer keys are always valid, the error path is unreachable.
        let _ = self.raw_set(LuaValue::number(key as f64), value);
    }

    /// Convenience accessor for string keys.
    pub fn get_field(&self, name: &str) -> LuaValue {
        self.raw_get(&LuaValue::str(name))
    }

    pub fn set_field(&mut self, name: &str, value: LuaValue) {
        // String keys are always valid, the error path is unreachable.
        let _ = self.raw_set(LuaValue::str(name), value);
    }

    /// Store `key = value`. Writing nil removes the key. Nil or NaN keys
    /// fail with `InvalidKey`.
    pub fn raw_set(&mut self, key: LuaValue, value: LuaValue) -> LuaResult<()> {
        if key.is_invalid_key() {
            return Err(LuaError::invalid_key(format!(
                "table key is {}",
                if key.is_nil() { "nil" } else { "NaN" }
            )));
        }
        if let Some(i) = array_index(&key) {
            let len = self.array.len();
            if i <= len {
                self.array[i - 1] = value;
                if i == len {
                    self.trim_array_tail();
                }
                return Ok(());
            }
            if i == len + 1 && !value.is_nil() {
                self.array.push(value);
                self.migrate_from_hash();
                return Ok(());
            }
        }

        if value.is_nil() {
            self.hash.shift_remove(&key);
        } else {
            self.hash.insert(key, value);
        }
        Ok(())
    }

    /// Pull hash entries into the array part when a push closes the gap
    /// (table constructors can overflow keys into the hash part).
    fn migrate_from_hash(&mut self) {
        loop {
            let next_key = LuaValue::number((self.array.len() + 1) as f64);
            match self.hash.shift_remove(&next_key) {
                Some(v) => self.array.push(v),
                None => break,
            }
        }
    }

    fn trim_array_tail(&mut self) {
        while matches!(self.array.last(), Some(LuaValue::Nil)) {
            self.array.pop();
        }
    }

    // ===== Length =====

    /// The `#` operator: a border `n` with `t[n] ~= nil` and `t[n+1] == nil`.
    /// For sparse tables any border is acceptable.
    pub fn len(&self) -> i64 {
        if self.array.is_empty() {
            // Border 0 unless the hash part holds a run starting at 1.
            let mut n = 0i64;
            while !self.hash_get_int(n + 1).is_nil() {
                n += 1;
            }
            return n;
        }
        // Trailing holes are trimmed, so array.len() is a border unless the
        // hash part continues the run.
        let mut n = self.array.len() as i64;
        while !self.hash_get_int(n + 1).is_nil() {
            n += 1;
        }
        n
    }

    fn hash_get_int(&self, key: i64) -> LuaValue {
        self.hash
            .get(&LuaValue::number(key as f64))
            .cloned()
            .unwrap_or(LuaValue::Nil)
    }

    pub fn is_empty(&self) -> bool {
        self.array.iter().all(LuaValue::is_nil) && self.hash.is_empty()
    }

    // ===== Iteration =====

    /// Stateless iteration: the next key/value pair after `key`, or `None`
    /// at the end. Traverses the array part first, then the hash part in
    /// insertion order. A key that is not present in the table is an error.
    pub fn next(&self, key: &LuaValue) -> LuaResult<Option<(LuaValue, LuaValue)>> {
        if key.is_nil() {
            if let Some(found) = self.next_in_array(0) {
                return Ok(Some(found));
            }
            return Ok(self.hash_entry(0));
        }

        if let Some(i) = array_index(key) {
            if i <= self.array.len() {
                if self.array[i - 1].is_nil() {
                    return Err(LuaError::invalid_key("invalid key to 'next'"));
                }
                if let Some(found) = self.next_in_array(i) {
                    return Ok(Some(found));
                }
                return Ok(self.hash_entry(0));
            }
        }

        match self.hash.get_index_of(key) {
            Some(index) => Ok(self.hash_entry(index + 1)),
            None => Err(LuaError::invalid_key("invalid key to 'next'")),
        }
    }

    fn next_in_array(&self, start: usize) -> Option<(LuaValue, LuaValue)> {
        for (offset, value) in self.array[start..].iter().enumerate() {
            if !value.is_nil() {
                let index = start + offset + 1;
                return Some((LuaValue::number(index as f64), value.clone()));
            }
        }
        None
    }

    fn hash_entry(&self, index: usize) -> Option<(LuaValue, LuaValue)> {
        self.hash
            .get_index(index)
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    // ===== GC support =====

    /// Visit every value reachable from this table (keys and values; the
    /// metatable is reachable through `metatable()`).
    pub(crate) fn for_each_ref(&self, f: &mut dyn FnMut(&LuaValue)) {
        for v in &self.array {
            f(v);
        }
        for (k, v) in &self.hash {
            f(k);
            f(v);
        }
    }

    /// Drop all contents and the metatable link. Used by the collector to
    /// dismantle unreachable reference cycles.
    pub(crate) fn clear(&mut self) {
        self.array.clear();
        self.hash.clear();
        self.metatable = None;
    }
}

impl Default for LuaTable {
    fn default() -> Self {
        LuaTable::new()
    }
}
