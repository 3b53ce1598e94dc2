// Expression evaluation. Every expression produces a MultiValue; callers
// that consume a single value project index 0. The expression-list walk at
// the bottom is the sole source of multi-value propagation: only a function
// call or `...` in the final slot expands.

use crate::ast::{
    BinaryOperator, Expression, FunctionCall, TableField, UnaryOperator,
};
use crate::lua_value::{LuaString, LuaValue, MultiValue};

use super::{events, LuaInterpreter, LuaResult, Scope};

impl LuaInterpreter {
    pub(crate) fn eval_expr(&mut self, expr: &Expression, scope: &Scope) -> LuaResult<MultiValue> {
        self.enter_eval()?;
        let result = self.eval_expr_inner(expr, scope);
        self.leave_eval();
        result
    }

    /// Evaluate in single-value context: the first value, nil when empty.
    pub(crate) fn eval_expr_single(
        &mut self,
        expr: &Expression,
        scope: &Scope,
    ) -> LuaResult<LuaValue> {
        Ok(self.eval_expr(expr, scope)?.first())
    }

    fn eval_expr_inner(&mut self, expr: &Expression, scope: &Scope) -> LuaResult<MultiValue> {
        match expr {
            Expression::NilLiteral => Ok(MultiValue::single(LuaValue::Nil)),
            Expression::BoolLiteral(b) => Ok(MultiValue::single(LuaValue::boolean(*b))),
            Expression::NumberLiteral(n) => Ok(MultiValue::single(LuaValue::number(*n))),
            Expression::StringLiteral(bytes) => Ok(MultiValue::single(LuaValue::string(
                LuaString::from_bytes(bytes.clone()),
            ))),
            Expression::VarargsLiteral => Ok(scope.varargs()),

            Expression::Variable { prefix: None, name } => {
                Ok(MultiValue::single(scope.get(name)))
            }
            Expression::Variable {
                prefix: Some(prefix),
                name,
            } => {
                let obj = self.eval_expr_single(prefix, scope)?;
                let value = events::index(self, &obj, &LuaValue::str(name))?;
                Ok(MultiValue::single(value))
            }

            Expression::TableAccess { expr, index } => {
                let obj = self.eval_expr_single(expr, scope)?;
                let key = self.eval_expr_single(index, scope)?;
                let value = events::index(self, &obj, &key)?;
                Ok(MultiValue::single(value))
            }

            Expression::FunctionCall(call) => self.eval_call(call, scope),

            Expression::BinaryExpression { op, left, right } => {
                self.eval_binary(*op, left, right, scope)
            }

            Expression::UnaryExpression { op, expr } => {
                let value = self.eval_expr_single(expr, scope)?;
                let result = match op {
                    UnaryOperator::Negate => LuaValue::boolean(value.is_falsy()),
                    UnaryOperator::Invert => events::unary_minus(self, &value)?,
                    UnaryOperator::Length => events::length(self, &value)?,
                };
                Ok(MultiValue::single(result))
            }

            Expression::FunctionDefinition(proto) => {
                Ok(MultiValue::single(self.create_closure(proto.clone(), scope)))
            }

            Expression::TableConstructor(fields) => self.eval_table_constructor(fields, scope),

            Expression::Paren(inner) => {
                Ok(MultiValue::single(self.eval_expr_single(inner, scope)?))
            }
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOperator,
        left: &Expression,
        right: &Expression,
        scope: &Scope,
    ) -> LuaResult<MultiValue> {
        // and/or short-circuit on the left value and never dispatch a
        // metamethod; every other operator evaluates both sides first.
        match op {
            BinaryOperator::And => {
                let lhs = self.eval_expr_single(left, scope)?;
                if lhs.is_falsy() {
                    return Ok(MultiValue::single(lhs));
                }
                return Ok(MultiValue::single(self.eval_expr_single(right, scope)?));
            }
            BinaryOperator::Or => {
                let lhs = self.eval_expr_single(left, scope)?;
                if lhs.is_truthy() {
                    return Ok(MultiValue::single(lhs));
                }
                return Ok(MultiValue::single(self.eval_expr_single(right, scope)?));
            }
            _ => {}
        }

        let lhs = self.eval_expr_single(left, scope)?;
        let rhs = self.eval_expr_single(right, scope)?;
        let result = match op {
            BinaryOperator::Addition
            | BinaryOperator::Subtraction
            | BinaryOperator::Multiplication
            | BinaryOperator::Division
            | BinaryOperator::Modulo
            | BinaryOperator::Power => events::arith(self, op, &lhs, &rhs)?,
            BinaryOperator::Concat => events::concat(self, &lhs, &rhs)?,
            BinaryOperator::Equal => LuaValue::boolean(events::equals(self, &lhs, &rhs)?),
            BinaryOperator::Different => LuaValue::boolean(!events::equals(self, &lhs, &rhs)?),
            BinaryOperator::LessThan => LuaValue::boolean(events::less_than(self, &lhs, &rhs)?),
            BinaryOperator::LessOrEqual => {
                LuaValue::boolean(events::less_or_equal(self, &lhs, &rhs)?)
            }
            BinaryOperator::GreaterThan => LuaValue::boolean(events::less_than(self, &rhs, &lhs)?),
            BinaryOperator::GreaterOrEqual => {
                LuaValue::boolean(events::less_or_equal(self, &rhs, &lhs)?)
            }
            BinaryOperator::And | BinaryOperator::Or => unreachable!("handled above"),
        };
        Ok(MultiValue::single(result))
    }

    pub(crate) fn eval_call(
        &mut self,
        call: &FunctionCall,
        scope: &Scope,
    ) -> LuaResult<MultiValue> {
        let callee = self.eval_expr_single(&call.callee, scope)?;
        let args = self.eval_expr_list(&call.args, scope)?;
        self.call_value(callee, args)
    }

    /// The argument-list expansion rule, shared by call arguments, return
    /// lists, multi-assignment right-hand sides and table constructors:
    /// every expression but the last contributes exactly its first value;
    /// a final call or `...` contributes all of its values.
    pub(crate) fn eval_expr_list(
        &mut self,
        exprs: &[Expression],
        scope: &Scope,
    ) -> LuaResult<MultiValue> {
        let mut out = MultiValue::empty();
        let Some((last, init)) = exprs.split_last() else {
            return Ok(out);
        };
        for expr in init {
            let value = self.eval_expr_single(expr, scope)?;
            out.push(value);
        }
        if last.is_multi_valued() {
            out.extend(self.eval_expr(last, scope)?);
        } else {
            let value = self.eval_expr_single(last, scope)?;
            out.push(value);
        }
        Ok(out)
    }

    fn eval_table_constructor(
        &mut self,
        fields: &[TableField],
        scope: &Scope,
    ) -> LuaResult<MultiValue> {
        let table = self.create_table();
        let mut array_index = 0i64;
        let last = fields.len().saturating_sub(1);

        for (i, field) in fields.iter().enumerate() {
            match &field.key {
                Some(key_expr) => {
                    let key = self.eval_expr_single(key_expr, scope)?;
                    let value = self.eval_expr_single(&field.value, scope)?;
                    table.borrow_mut().raw_set(key, value)?;
                }
                None => {
                    // The final positional field expands a call or `...`
                    // into successive array slots.
                    if i == last && field.value.is_multi_valued() {
                        let values = self.eval_expr(&field.value, scope)?;
                        for value in values {
                            array_index += 1;
                            table.borrow_mut().set_int(array_index, value);
                        }
                    } else {
                        let value = self.eval_expr_single(&field.value, scope)?;
                        array_index += 1;
                        table.borrow_mut().set_int(array_index, value);
                    }
                }
            }
        }

        Ok(MultiValue::single(LuaValue::table_ref(table)))
    }
}
