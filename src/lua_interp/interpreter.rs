// The interpreter: recursion guards, the host embedding surface, and
// function invocation. Expression and statement walks live in expr.rs and
// stmt.rs as further impl blocks.

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;

use crate::ast::Block;
use crate::gc::GcRegistry;
use crate::lua_value::{
    HostFunction, LuaClosure, LuaFunction, LuaTable, LuaValue, MultiValue,
};
use crate::parser::{self, LuaParseError};

use super::events::LuaEvent;
use super::lua_limits::{MAX_CALL_DEPTH, MAX_EVAL_DEPTH, MAX_TAG_LOOP};
use super::{events, ControlSignal, LuaError, LuaResult, Scope};

/// Recursion bounds; the defaults come from `lua_limits`.
#[derive(Debug, Clone, Copy)]
pub struct InterpreterLimits {
    pub max_call_depth: usize,
    pub max_eval_depth: usize,
}

impl Default for InterpreterLimits {
    fn default() -> Self {
        InterpreterLimits {
            max_call_depth: MAX_CALL_DEPTH,
            max_eval_depth: MAX_EVAL_DEPTH,
        }
    }
}

pub struct LuaInterpreter {
    limits: InterpreterLimits,
    call_depth: usize,
    eval_depth: usize,
    /// Shared metatable for all string values, unset by default. Hosts can
    /// attach an `__index` table here to give strings methods.
    string_meta: Option<Rc<RefCell<LuaTable>>>,
    pub(crate) gc: GcRegistry,
}

impl LuaInterpreter {
    pub fn new() -> Self {
        Self::with_limits(InterpreterLimits::default())
    }

    pub fn with_limits(limits: InterpreterLimits) -> Self {
        LuaInterpreter {
            limits,
            call_depth: 0,
            eval_depth: 0,
            string_meta: None,
            gc: GcRegistry::new(),
        }
    }

    // ===== Host embedding surface =====

    /// A fresh root scope: the global frame the host populates with
    /// library bindings.
    pub fn new_root_scope(&self) -> Scope {
        Scope::new_root()
    }

    pub fn bind(&self, scope: &Scope, name: &str, value: LuaValue) {
        scope.set_local(name, value);
    }

    pub fn bind_function(&self, scope: &Scope, name: &str, func: HostFunction) {
        scope.set_local(name, LuaValue::function(LuaFunction::Host(func)));
    }

    /// A new table tracked by the collector.
    pub fn create_table(&mut self) -> Rc<RefCell<LuaTable>> {
        let table = Rc::new(RefCell::new(LuaTable::new()));
        self.gc.track_table(&table);
        table
    }

    pub fn compile(&self, source: &str) -> Result<Block, LuaParseError> {
        parser::parse(source)
    }

    /// Execute a chunk against `scope`. The chunk body runs in a child
    /// scope, so chunk locals never leak into the global frame. A `return`
    /// at chunk level produces the result list.
    pub fn execute(&mut self, block: &Block, scope: &Scope) -> LuaResult<MultiValue> {
        let chunk_scope = scope.child();
        match self.exec_block_in(block, &chunk_scope)? {
            ControlSignal::Return(values) => Ok(values),
            _ => Ok(MultiValue::empty()),
        }
    }

    /// Parse and execute in one step.
    pub fn execute_string(&mut self, source: &str, scope: &Scope) -> LuaResult<MultiValue> {
        let block = self.compile(source)?;
        self.execute(&block, scope)
    }

    /// Call a Lua value from the host.
    pub fn call(&mut self, func: &LuaValue, args: MultiValue) -> LuaResult<MultiValue> {
        self.call_value(func.clone(), args)
    }

    /// Trace the live graph from `roots` and dismantle unreachable
    /// interpreter-created objects. Returns how many were reclaimed.
    pub fn collect_garbage(&mut self, roots: &[Scope]) -> usize {
        self.gc.collect(roots)
    }

    pub fn string_metatable(&self) -> Option<Rc<RefCell<LuaTable>>> {
        self.string_meta.clone()
    }

    pub fn set_string_metatable(&mut self, mt: Option<Rc<RefCell<LuaTable>>>) {
        self.string_meta = mt;
    }

    // ===== Metatable access for library code =====

    pub fn metatable_of(&self, value: &LuaValue) -> Option<Rc<RefCell<LuaTable>>> {
        events::get_metatable(self, value)
    }

    // ===== Call machinery =====

    /// Invoke a callable value: functions directly, anything else through
    /// its `__call` metamethod with the callee prepended to the arguments.
    pub(crate) fn call_value(&mut self, func: LuaValue, args: MultiValue) -> LuaResult<MultiValue> {
        self.call_depth += 1;
        if self.call_depth > self.limits.max_call_depth {
            self.call_depth -= 1;
            return Err(LuaError::StackOverflow);
        }
        let result = self.dispatch_call(func, args, 0);
        self.call_depth -= 1;
        result
    }

    fn dispatch_call(
        &mut self,
        func: LuaValue,
        args: MultiValue,
        hops: usize,
    ) -> LuaResult<MultiValue> {
        if let Some(f) = func.as_function() {
            return match f.as_ref() {
                LuaFunction::Host(host) => {
                    trace!("calling host function, depth {}", self.call_depth);
                    host(self, args)
                }
                LuaFunction::Closure(_) => self.invoke_closure(&f, args),
            };
        }

        if hops >= MAX_TAG_LOOP {
            return Err(LuaError::call_error("'__call' chain too long; possible loop"));
        }
        match events::get_metamethod(self, &func, LuaEvent::Call) {
            Some(handler) => {
                // __call receives the callee as its first argument.
                let args = args.prepended(func);
                self.dispatch_call(handler, args, hops + 1)
            }
            None => Err(LuaError::call_error(format!(
                "attempt to call a {} value",
                func.type_name()
            ))),
        }
    }

    fn invoke_closure(&mut self, func: &Rc<LuaFunction>, args: MultiValue) -> LuaResult<MultiValue> {
        let closure = match func.as_ref() {
            LuaFunction::Closure(c) => c,
            _ => unreachable!("invoke_closure on a host function"),
        };
        let proto = closure.proto.clone();
        trace!(
            "calling closure with {} args, depth {}",
            args.len(),
            self.call_depth
        );

        // Fresh invocation scope under the captured environment: parameters
        // bind here, and the varargs slot is always set so `...` resolves to
        // this call, not an enclosing one.
        let call_scope = closure.scope.child();
        for (i, param) in proto.params.iter().enumerate() {
            call_scope.set_local(param, args.get(i));
        }
        if proto.is_vararg {
            call_scope.set_varargs(args.from_index(proto.params.len()));
        } else {
            call_scope.set_varargs(MultiValue::empty());
        }

        // The call boundary consumes Return; an unreached fall-through (or a
        // stray Break from a host-built AST) yields no values.
        match self.exec_block_in(&proto.body, &call_scope)? {
            ControlSignal::Return(values) => Ok(values),
            _ => Ok(MultiValue::empty()),
        }
    }

    // ===== Recursion guards =====

    pub(crate) fn enter_eval(&mut self) -> LuaResult<()> {
        self.eval_depth += 1;
        if self.eval_depth > self.limits.max_eval_depth {
            self.eval_depth -= 1;
            return Err(LuaError::StackOverflow);
        }
        Ok(())
    }

    pub(crate) fn leave_eval(&mut self) {
        self.eval_depth -= 1;
    }

    /// Create a closure value capturing `scope`, tracking both for the
    /// collector (captured scopes can participate in reference cycles).
    pub(crate) fn create_closure(&mut self, proto: Rc<crate::ast::FunctionBody>, scope: &Scope) -> LuaValue {
        self.gc.track_scope(scope);
        LuaValue::function(LuaFunction::Closure(LuaClosure {
            proto,
            scope: scope.clone(),
        }))
    }
}

impl Default for LuaInterpreter {
    fn default() -> Self {
        LuaInterpreter::new()
    }
}
