// Statement evaluation. Statements execute for effect and produce a
// ControlSignal; Break is absorbed by the innermost loop, Return by the
// innermost function call (or the chunk boundary).

use crate::ast::{Assignable, Block, Expression, Statement};
use crate::lua_value::{LuaValue, MultiValue};

use super::{events, ControlSignal, LuaError, LuaInterpreter, LuaResult, Scope};

impl LuaInterpreter {
    /// Run the statements of `block` directly in `scope`. Used where the
    /// caller owns the scope: function bodies, loop iterations, repeat
    /// (whose condition must see body locals).
    pub(crate) fn exec_block_in(&mut self, block: &Block, scope: &Scope) -> LuaResult<ControlSignal> {
        for stmt in &block.statements {
            let signal = self.exec_stmt(stmt, scope)?;
            if !signal.is_normal() {
                return Ok(signal);
            }
        }
        Ok(ControlSignal::Normal)
    }

    /// Block entry: open a child scope, run, forward the child's signal
    /// unchanged.
    fn exec_block(&mut self, block: &Block, scope: &Scope) -> LuaResult<ControlSignal> {
        let child = scope.child();
        self.exec_block_in(block, &child)
    }

    pub(crate) fn exec_stmt(&mut self, stmt: &Statement, scope: &Scope) -> LuaResult<ControlSignal> {
        self.enter_eval()?;
        let result = self.exec_stmt_inner(stmt, scope);
        self.leave_eval();
        result
    }

    fn exec_stmt_inner(&mut self, stmt: &Statement, scope: &Scope) -> LuaResult<ControlSignal> {
        match stmt {
            Statement::Assignment { targets, values } => {
                // The whole right-hand side is evaluated before any target
                // is written, so `a, b = b, a` swaps.
                let values = self.eval_expr_list(values, scope)?;
                for (i, target) in targets.iter().enumerate() {
                    self.assign(target, values.get(i), scope)?;
                }
                Ok(ControlSignal::Normal)
            }

            Statement::LocalAssignment { names, values } => {
                let values = self.eval_expr_list(values, scope)?;
                for (i, name) in names.iter().enumerate() {
                    scope.set_local(name, values.get(i));
                }
                Ok(ControlSignal::Normal)
            }

            Statement::FunctionCall(call) => {
                self.eval_call(call, scope)?;
                Ok(ControlSignal::Normal)
            }

            Statement::Return(exprs) => {
                let values = self.eval_expr_list(exprs, scope)?;
                Ok(ControlSignal::Return(values))
            }

            Statement::Break => Ok(ControlSignal::Break),

            Statement::Do(block) => self.exec_block(block, scope),

            Statement::If {
                cond,
                block,
                elseifs,
                else_block,
            } => {
                if self.eval_expr_single(cond, scope)?.is_truthy() {
                    return self.exec_block(block, scope);
                }
                for (elseif_cond, elseif_block) in elseifs {
                    if self.eval_expr_single(elseif_cond, scope)?.is_truthy() {
                        return self.exec_block(elseif_block, scope);
                    }
                }
                match else_block {
                    Some(block) => self.exec_block(block, scope),
                    None => Ok(ControlSignal::Normal),
                }
            }

            Statement::While { cond, block } => {
                while self.eval_expr_single(cond, scope)?.is_truthy() {
                    match self.exec_block(block, scope)? {
                        ControlSignal::Break => break,
                        ControlSignal::Return(values) => {
                            return Ok(ControlSignal::Return(values));
                        }
                        ControlSignal::Normal => {}
                    }
                }
                Ok(ControlSignal::Normal)
            }

            Statement::Repeat { block, cond } => {
                loop {
                    // The condition is evaluated in the body's scope, so
                    // locals declared in the body are visible to it.
                    let body_scope = scope.child();
                    match self.exec_block_in(block, &body_scope)? {
                        ControlSignal::Break => break,
                        ControlSignal::Return(values) => {
                            return Ok(ControlSignal::Return(values));
                        }
                        ControlSignal::Normal => {
                            if self.eval_expr_single(cond, &body_scope)?.is_truthy() {
                                break;
                            }
                        }
                    }
                }
                Ok(ControlSignal::Normal)
            }

            Statement::NumericFor {
                var,
                start,
                limit,
                step,
                block,
            } => self.exec_numeric_for(var, start, limit, step.as_ref(), block, scope),

            Statement::GenericFor { vars, exprs, block } => {
                self.exec_generic_for(vars, exprs, block, scope)
            }
        }
    }

    fn assign(&mut self, target: &Assignable, value: LuaValue, scope: &Scope) -> LuaResult<()> {
        match target {
            Assignable::Variable { prefix: None, name } => {
                scope.set(name, value);
                Ok(())
            }
            Assignable::Variable {
                prefix: Some(prefix),
                name,
            } => {
                let obj = self.eval_expr_single(prefix, scope)?;
                events::new_index(self, &obj, &LuaValue::str(name), value)
            }
            Assignable::TableAccess { expr, index } => {
                let obj = self.eval_expr_single(expr, scope)?;
                let key = self.eval_expr_single(index, scope)?;
                events::new_index(self, &obj, &key, value)
            }
        }
    }

    fn exec_numeric_for(
        &mut self,
        var: &str,
        start: &Expression,
        limit: &Expression,
        step: Option<&Expression>,
        block: &Block,
        scope: &Scope,
    ) -> LuaResult<ControlSignal> {
        let start = self.numeric_for_value(start, scope, "initial value")?;
        let limit = self.numeric_for_value(limit, scope, "limit")?;
        let step = match step {
            Some(expr) => self.numeric_for_value(expr, scope, "step")?,
            None => 1.0,
        };

        let mut i = start;
        while (step > 0.0 && i <= limit) || (step <= 0.0 && i >= limit) {
            // A fresh scope per iteration: closures created in the body
            // capture this iteration's binding of the loop variable.
            let iter_scope = scope.child();
            iter_scope.set_local(var, LuaValue::number(i));
            match self.exec_block_in(block, &iter_scope)? {
                ControlSignal::Break => break,
                ControlSignal::Return(values) => return Ok(ControlSignal::Return(values)),
                ControlSignal::Normal => {}
            }
            i += step;
        }
        Ok(ControlSignal::Normal)
    }

    fn numeric_for_value(
        &mut self,
        expr: &Expression,
        scope: &Scope,
        what: &str,
    ) -> LuaResult<f64> {
        let value = self.eval_expr_single(expr, scope)?;
        events::coerce_number(&value)
            .ok_or_else(|| LuaError::loop_error(format!("'for' {} must be a number", what)))
    }

    fn exec_generic_for(
        &mut self,
        vars: &[String],
        exprs: &[Expression],
        block: &Block,
        scope: &Scope,
    ) -> LuaResult<ControlSignal> {
        let init = self.eval_expr_list(exprs, scope)?;
        let iterator = init.get(0);
        let state = init.get(1);
        let mut control = init.get(2);

        loop {
            let results = self.call_value(
                iterator.clone(),
                MultiValue::multiple(vec![state.clone(), control.clone()]),
            )?;
            // Test first, then bind: a nil control value ends the loop
            // before any loop variable is touched.
            let first = results.first();
            if first.is_nil() {
                break;
            }
            control = first;

            let iter_scope = scope.child();
            for (i, name) in vars.iter().enumerate() {
                iter_scope.set_local(name, results.get(i));
            }
            match self.exec_block_in(block, &iter_scope)? {
                ControlSignal::Break => break,
                ControlSignal::Return(values) => return Ok(ControlSignal::Return(values)),
                ControlSignal::Normal => {}
            }
        }
        Ok(ControlSignal::Normal)
    }
}
