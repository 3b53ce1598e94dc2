// Recursive-descent parser producing the `ast` vocabulary. Operator
// precedence follows Lua 5.1 (no bitwise operators): binary priorities are
// resolved with the classic left/right priority pairs, `..` and `^` are
// right associative.

mod error;
mod lexer;
mod token;

pub use error::LuaParseError;

use std::rc::Rc;

use crate::ast::{
    Assignable, BinaryOperator, Block, Expression, FunctionBody, FunctionCall, Statement,
    TableField, UnaryOperator,
};

use lexer::Lexer;
use token::{Token, TokenKind, TokenValue};

/// Parse a complete chunk.
pub fn parse(source: &str) -> Result<Block, LuaParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = LuaParser::new(tokens);
    parser.parse_chunk()
}

type ParseResult<T> = Result<T, LuaParseError>;

const UNARY_PRIORITY: u8 = 8;

/// (left, right) binding priority; a right priority lower than the left one
/// makes the operator right associative.
fn binary_priority(kind: TokenKind) -> Option<(BinaryOperator, u8, u8)> {
    let entry = match kind {
        TokenKind::Or => (BinaryOperator::Or, 1, 1),
        TokenKind::And => (BinaryOperator::And, 2, 2),
        TokenKind::Less => (BinaryOperator::LessThan, 3, 3),
        TokenKind::Greater => (BinaryOperator::GreaterThan, 3, 3),
        TokenKind::LessEq => (BinaryOperator::LessOrEqual, 3, 3),
        TokenKind::GreaterEq => (BinaryOperator::GreaterOrEqual, 3, 3),
        TokenKind::NotEq => (BinaryOperator::Different, 3, 3),
        TokenKind::Eq => (BinaryOperator::Equal, 3, 3),
        TokenKind::Concat => (BinaryOperator::Concat, 5, 4),
        TokenKind::Plus => (BinaryOperator::Addition, 6, 6),
        TokenKind::Minus => (BinaryOperator::Subtraction, 6, 6),
        TokenKind::Star => (BinaryOperator::Multiplication, 7, 7),
        TokenKind::Slash => (BinaryOperator::Division, 7, 7),
        TokenKind::Percent => (BinaryOperator::Modulo, 7, 7),
        TokenKind::Caret => (BinaryOperator::Power, 10, 9),
        _ => return None,
    };
    Some(entry)
}

struct LuaParser {
    tokens: Vec<Token>,
    pos: usize,
    /// Nesting depth of enclosing loops, for `break` validation. Reset
    /// inside function bodies.
    loop_depth: usize,
    /// One entry per enclosing function body; true when that function is
    /// vararg. The chunk itself counts as a vararg function.
    vararg_stack: Vec<bool>,
}

impl LuaParser {
    fn new(tokens: Vec<Token>) -> Self {
        LuaParser {
            tokens,
            pos: 0,
            loop_depth: 0,
            vararg_stack: vec![true],
        }
    }

    // ===== Token cursor =====

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn line(&self) -> usize {
        self.current().line
    }

    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn check(&mut self, kind: TokenKind) -> bool {
        if self.kind() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> ParseResult<Token> {
        if self.kind() == kind {
            Ok(self.bump())
        } else {
            Err(self.error(format!("'{}' expected", what)))
        }
    }

    fn expect_name(&mut self) -> ParseResult<String> {
        if self.kind() == TokenKind::Name {
            let token = self.bump();
            match token.value {
                TokenValue::Name(name) => Ok(name),
                _ => Err(self.error("<name> expected")),
            }
        } else {
            Err(self.error("<name> expected"))
        }
    }

    fn error(&self, message: impl Into<String>) -> LuaParseError {
        LuaParseError::new(message, self.line())
    }

    // ===== Blocks =====

    fn parse_chunk(&mut self) -> ParseResult<Block> {
        let block = self.parse_block()?;
        if self.kind() != TokenKind::Eof {
            return Err(self.error("'<eof>' expected"));
        }
        Ok(block)
    }

    fn block_follows(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::End
                | TokenKind::Else
                | TokenKind::ElseIf
                | TokenKind::Until
                | TokenKind::Eof
        )
    }

    fn parse_block(&mut self) -> ParseResult<Block> {
        let mut statements = Vec::new();
        loop {
            if self.block_follows() {
                break;
            }
            if self.check(TokenKind::Semicolon) {
                continue;
            }
            if self.kind() == TokenKind::Return {
                statements.push(self.parse_return()?);
                self.check(TokenKind::Semicolon);
                if !self.block_follows() {
                    return Err(self.error("'<eof>' or block end expected after 'return'"));
                }
                break;
            }
            self.parse_statement(&mut statements)?;
        }
        Ok(Block { statements })
    }

    // ===== Statements =====

    fn parse_statement(&mut self, out: &mut Vec<Statement>) -> ParseResult<()> {
        match self.kind() {
            TokenKind::If => {
                self.bump();
                out.push(self.parse_if()?);
            }
            TokenKind::While => {
                self.bump();
                let cond = self.parse_expression()?;
                self.expect(TokenKind::Do, "do")?;
                self.loop_depth += 1;
                let block = self.parse_block()?;
                self.loop_depth -= 1;
                self.expect(TokenKind::End, "end")?;
                out.push(Statement::While { cond, block });
            }
            TokenKind::Do => {
                self.bump();
                let block = self.parse_block()?;
                self.expect(TokenKind::End, "end")?;
                out.push(Statement::Do(block));
            }
            TokenKind::For => {
                self.bump();
                out.push(self.parse_for()?);
            }
            TokenKind::Repeat => {
                self.bump();
                self.loop_depth += 1;
                let block = self.parse_block()?;
                self.loop_depth -= 1;
                self.expect(TokenKind::Until, "until")?;
                let cond = self.parse_expression()?;
                out.push(Statement::Repeat { block, cond });
            }
            TokenKind::Function => {
                self.bump();
                out.push(self.parse_function_statement()?);
            }
            TokenKind::Local => {
                self.bump();
                self.parse_local(out)?;
            }
            TokenKind::Break => {
                if self.loop_depth == 0 {
                    return Err(self.error("'break' outside a loop"));
                }
                self.bump();
                out.push(Statement::Break);
            }
            _ => out.push(self.parse_expression_statement()?),
        }
        Ok(())
    }

    fn parse_return(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::Return, "return")?;
        let values = if self.block_follows() || self.kind() == TokenKind::Semicolon {
            Vec::new()
        } else {
            self.parse_expression_list()?
        };
        Ok(Statement::Return(values))
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        let cond = self.parse_expression()?;
        self.expect(TokenKind::Then, "then")?;
        let block = self.parse_block()?;

        let mut elseifs = Vec::new();
        let mut else_block = None;
        loop {
            match self.kind() {
                TokenKind::ElseIf => {
                    self.bump();
                    let elseif_cond = self.parse_expression()?;
                    self.expect(TokenKind::Then, "then")?;
                    elseifs.push((elseif_cond, self.parse_block()?));
                }
                TokenKind::Else => {
                    self.bump();
                    else_block = Some(self.parse_block()?);
                    self.expect(TokenKind::End, "end")?;
                    break;
                }
                TokenKind::End => {
                    self.bump();
                    break;
                }
                _ => return Err(self.error("'end' expected")),
            }
        }

        Ok(Statement::If {
            cond,
            block,
            elseifs,
            else_block,
        })
    }

    fn parse_for(&mut self) -> ParseResult<Statement> {
        let first = self.expect_name()?;
        if self.check(TokenKind::Assign) {
            // Numeric: for Name = start, limit [, step] do ... end
            let start = self.parse_expression()?;
            self.expect(TokenKind::Comma, ",")?;
            let limit = self.parse_expression()?;
            let step = if self.check(TokenKind::Comma) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            self.expect(TokenKind::Do, "do")?;
            self.loop_depth += 1;
            let block = self.parse_block()?;
            self.loop_depth -= 1;
            self.expect(TokenKind::End, "end")?;
            return Ok(Statement::NumericFor {
                var: first,
                start,
                limit,
                step,
                block,
            });
        }

        // Generic: for namelist in exprlist do ... end
        let mut vars = vec![first];
        while self.check(TokenKind::Comma) {
            vars.push(self.expect_name()?);
        }
        self.expect(TokenKind::In, "in")?;
        let exprs = self.parse_expression_list()?;
        self.expect(TokenKind::Do, "do")?;
        self.loop_depth += 1;
        let block = self.parse_block()?;
        self.loop_depth -= 1;
        self.expect(TokenKind::End, "end")?;
        Ok(Statement::GenericFor { vars, exprs, block })
    }

    /// `function Name{.Name}[:Name] body` lowers onto plain assignment;
    /// the method form prepends an implicit `self` parameter.
    fn parse_function_statement(&mut self) -> ParseResult<Statement> {
        let root = self.expect_name()?;
        let mut prefix: Option<Box<Expression>> = None;
        let mut name = root;
        let mut is_method = false;

        loop {
            match self.kind() {
                TokenKind::Dot => {
                    self.bump();
                    let next = self.expect_name()?;
                    prefix = Some(Box::new(Expression::Variable { prefix, name }));
                    name = next;
                }
                TokenKind::Colon => {
                    self.bump();
                    let next = self.expect_name()?;
                    prefix = Some(Box::new(Expression::Variable { prefix, name }));
                    name = next;
                    is_method = true;
                    break;
                }
                _ => break,
            }
        }

        let func = self.parse_function_body(is_method)?;
        Ok(Statement::Assignment {
            targets: vec![Assignable::Variable { prefix, name }],
            values: vec![func],
        })
    }

    fn parse_local(&mut self, out: &mut Vec<Statement>) -> ParseResult<()> {
        if self.check(TokenKind::Function) {
            // local function f: declare the name first so the closure can
            // refer to itself, then assign.
            let name = self.expect_name()?;
            out.push(Statement::LocalAssignment {
                names: vec![name.clone()],
                values: Vec::new(),
            });
            let func = self.parse_function_body(false)?;
            out.push(Statement::Assignment {
                targets: vec![Assignable::Variable { prefix: None, name }],
                values: vec![func],
            });
            return Ok(());
        }

        let mut names = vec![self.expect_name()?];
        while self.check(TokenKind::Comma) {
            names.push(self.expect_name()?);
        }
        let values = if self.check(TokenKind::Assign) {
            self.parse_expression_list()?
        } else {
            Vec::new()
        };
        out.push(Statement::LocalAssignment { names, values });
        Ok(())
    }

    /// `( parlist ) block end`; loop depth resets inside the body so a
    /// `break` cannot cross a function boundary.
    fn parse_function_body(&mut self, is_method: bool) -> ParseResult<Expression> {
        self.expect(TokenKind::LeftParen, "(")?;
        let mut params = Vec::new();
        if is_method {
            params.push("self".to_string());
        }
        let mut is_vararg = false;
        if self.kind() != TokenKind::RightParen {
            loop {
                match self.kind() {
                    TokenKind::Ellipsis => {
                        self.bump();
                        is_vararg = true;
                        break;
                    }
                    TokenKind::Name => params.push(self.expect_name()?),
                    _ => return Err(self.error("<name> or '...' expected")),
                }
                if !self.check(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, ")")?;

        let saved_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        self.vararg_stack.push(is_vararg);
        let body = self.parse_block()?;
        self.vararg_stack.pop();
        self.loop_depth = saved_loop_depth;
        self.expect(TokenKind::End, "end")?;

        Ok(Expression::FunctionDefinition(Rc::new(FunctionBody {
            params,
            is_vararg,
            body,
        })))
    }

    /// Assignment or call; anything else at expression position is an
    /// error.
    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let expr = self.parse_suffixed_expression()?;

        if self.kind() == TokenKind::Assign || self.kind() == TokenKind::Comma {
            let mut targets = vec![self.to_assignable(expr)?];
            while self.check(TokenKind::Comma) {
                let target = self.parse_suffixed_expression()?;
                targets.push(self.to_assignable(target)?);
            }
            self.expect(TokenKind::Assign, "=")?;
            let values = self.parse_expression_list()?;
            return Ok(Statement::Assignment { targets, values });
        }

        match expr {
            Expression::FunctionCall(call) => Ok(Statement::FunctionCall(call)),
            _ => Err(self.error("syntax error near unexpected expression")),
        }
    }

    fn to_assignable(&self, expr: Expression) -> ParseResult<Assignable> {
        match expr {
            Expression::Variable { prefix, name } => Ok(Assignable::Variable { prefix, name }),
            Expression::TableAccess { expr, index } => Ok(Assignable::TableAccess { expr, index }),
            _ => Err(self.error("cannot assign to this expression")),
        }
    }

    // ===== Expressions =====

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_expression(0)
    }

    fn parse_expression_list(&mut self) -> ParseResult<Vec<Expression>> {
        let mut exprs = vec![self.parse_expression()?];
        while self.check(TokenKind::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }

    fn parse_binary_expression(&mut self, limit: u8) -> ParseResult<Expression> {
        let mut left = match self.kind() {
            TokenKind::Not => {
                self.bump();
                let operand = self.parse_binary_expression(UNARY_PRIORITY)?;
                Expression::UnaryExpression {
                    op: UnaryOperator::Negate,
                    expr: Box::new(operand),
                }
            }
            TokenKind::Minus => {
                self.bump();
                let operand = self.parse_binary_expression(UNARY_PRIORITY)?;
                Expression::UnaryExpression {
                    op: UnaryOperator::Invert,
                    expr: Box::new(operand),
                }
            }
            TokenKind::Hash => {
                self.bump();
                let operand = self.parse_binary_expression(UNARY_PRIORITY)?;
                Expression::UnaryExpression {
                    op: UnaryOperator::Length,
                    expr: Box::new(operand),
                }
            }
            _ => self.parse_simple_expression()?,
        };

        while let Some((op, left_priority, right_priority)) = binary_priority(self.kind()) {
            if left_priority <= limit {
                break;
            }
            self.bump();
            let right = self.parse_binary_expression(right_priority)?;
            left = Expression::BinaryExpression {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_simple_expression(&mut self) -> ParseResult<Expression> {
        match self.kind() {
            TokenKind::Nil => {
                self.bump();
                Ok(Expression::NilLiteral)
            }
            TokenKind::True => {
                self.bump();
                Ok(Expression::BoolLiteral(true))
            }
            TokenKind::False => {
                self.bump();
                Ok(Expression::BoolLiteral(false))
            }
            TokenKind::Number => {
                let token = self.bump();
                match token.value {
                    TokenValue::Number(n) => Ok(Expression::NumberLiteral(n)),
                    _ => Err(self.error("malformed number")),
                }
            }
            TokenKind::String => {
                let token = self.bump();
                match token.value {
                    TokenValue::Str(bytes) => Ok(Expression::StringLiteral(bytes)),
                    _ => Err(self.error("malformed string")),
                }
            }
            TokenKind::Ellipsis => {
                if !self.vararg_stack.last().copied().unwrap_or(false) {
                    return Err(self.error("cannot use '...' outside a vararg function"));
                }
                self.bump();
                Ok(Expression::VarargsLiteral)
            }
            TokenKind::Function => {
                self.bump();
                self.parse_function_body(false)
            }
            TokenKind::LeftBrace => self.parse_table_constructor(),
            _ => self.parse_suffixed_expression(),
        }
    }

    fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        match self.kind() {
            TokenKind::Name => {
                let name = self.expect_name()?;
                Ok(Expression::Variable { prefix: None, name })
            }
            TokenKind::LeftParen => {
                self.bump();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RightParen, ")")?;
                Ok(Expression::Paren(Box::new(inner)))
            }
            _ => Err(self.error("unexpected symbol")),
        }
    }

    fn parse_suffixed_expression(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary_expression()?;
        loop {
            match self.kind() {
                TokenKind::Dot => {
                    self.bump();
                    let name = self.expect_name()?;
                    expr = Expression::Variable {
                        prefix: Some(Box::new(expr)),
                        name,
                    };
                }
                TokenKind::LeftBracket => {
                    self.bump();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RightBracket, "]")?;
                    expr = Expression::TableAccess {
                        expr: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::LeftParen => {
                    self.bump();
                    let args = if self.kind() == TokenKind::RightParen {
                        Vec::new()
                    } else {
                        self.parse_expression_list()?
                    };
                    self.expect(TokenKind::RightParen, ")")?;
                    expr = Expression::FunctionCall(FunctionCall {
                        callee: Box::new(expr),
                        args,
                    });
                }
                // f{...} and f"..." call sugar.
                TokenKind::LeftBrace => {
                    let arg = self.parse_table_constructor()?;
                    expr = Expression::FunctionCall(FunctionCall {
                        callee: Box::new(expr),
                        args: vec![arg],
                    });
                }
                TokenKind::String => {
                    let token = self.bump();
                    let arg = match token.value {
                        TokenValue::Str(bytes) => Expression::StringLiteral(bytes),
                        _ => return Err(self.error("malformed string")),
                    };
                    expr = Expression::FunctionCall(FunctionCall {
                        callee: Box::new(expr),
                        args: vec![arg],
                    });
                }
                TokenKind::Colon => {
                    return Err(self.error("method call syntax is not supported"));
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_table_constructor(&mut self) -> ParseResult<Expression> {
        self.expect(TokenKind::LeftBrace, "{")?;
        let mut fields = Vec::new();
        loop {
            if self.kind() == TokenKind::RightBrace {
                break;
            }
            match self.kind() {
                TokenKind::LeftBracket => {
                    self.bump();
                    let key = self.parse_expression()?;
                    self.expect(TokenKind::RightBracket, "]")?;
                    self.expect(TokenKind::Assign, "=")?;
                    let value = self.parse_expression()?;
                    fields.push(TableField {
                        key: Some(key),
                        value,
                    });
                }
                TokenKind::Name if self.peek_kind(1) == TokenKind::Assign => {
                    let name = self.expect_name()?;
                    self.bump();
                    let value = self.parse_expression()?;
                    fields.push(TableField {
                        key: Some(Expression::StringLiteral(name.into_bytes())),
                        value,
                    });
                }
                _ => {
                    let value = self.parse_expression()?;
                    fields.push(TableField { key: None, value });
                }
            }
            if !self.check(TokenKind::Comma) && !self.check(TokenKind::Semicolon) {
                break;
            }
        }
        self.expect(TokenKind::RightBrace, "}")?;
        Ok(Expression::TableConstructor(fields))
    }

    fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Block {
        parse(source).unwrap()
    }

    #[test]
    fn test_parse_local_assignment() {
        let block = parse_ok("local a, b = 1, 'x'");
        assert_eq!(block.statements.len(), 1);
        match &block.statements[0] {
            Statement::LocalAssignment { names, values } => {
                assert_eq!(names, &["a", "b"]);
                assert_eq!(values.len(), 2);
            }
            other => panic!("unexpected statement {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let block = parse_ok("return 1 + 2 * 3");
        match &block.statements[0] {
            Statement::Return(values) => match &values[0] {
                Expression::BinaryExpression { op, right, .. } => {
                    assert_eq!(*op, BinaryOperator::Addition);
                    assert!(matches!(
                        right.as_ref(),
                        Expression::BinaryExpression {
                            op: BinaryOperator::Multiplication,
                            ..
                        }
                    ));
                }
                other => panic!("unexpected expression {:?}", other),
            },
            other => panic!("unexpected statement {:?}", other),
        }
    }

    #[test]
    fn test_concat_right_associative() {
        let block = parse_ok("return 'a' .. 'b' .. 'c'");
        match &block.statements[0] {
            Statement::Return(values) => match &values[0] {
                Expression::BinaryExpression { op, right, .. } => {
                    assert_eq!(*op, BinaryOperator::Concat);
                    assert!(matches!(
                        right.as_ref(),
                        Expression::BinaryExpression {
                            op: BinaryOperator::Concat,
                            ..
                        }
                    ));
                }
                other => panic!("unexpected expression {:?}", other),
            },
            other => panic!("unexpected statement {:?}", other),
        }
    }

    #[test]
    fn test_unary_binds_looser_than_power() {
        // -x^2 parses as -(x^2)
        let block = parse_ok("return -x^2");
        match &block.statements[0] {
            Statement::Return(values) => {
                assert!(matches!(
                    &values[0],
                    Expression::UnaryExpression {
                        op: UnaryOperator::Invert,
                        ..
                    }
                ));
            }
            other => panic!("unexpected statement {:?}", other),
        }
    }

    #[test]
    fn test_function_statement_sugar() {
        let block = parse_ok("function t.a.b(x) return x end");
        match &block.statements[0] {
            Statement::Assignment { targets, values } => {
                assert_eq!(targets.len(), 1);
                assert!(matches!(
                    &targets[0],
                    Assignable::Variable {
                        prefix: Some(_),
                        ..
                    }
                ));
                assert!(matches!(&values[0], Expression::FunctionDefinition(_)));
            }
            other => panic!("unexpected statement {:?}", other),
        }
    }

    #[test]
    fn test_method_definition_gets_self() {
        let block = parse_ok("function t:m(x) return self, x end");
        match &block.statements[0] {
            Statement::Assignment { values, .. } => match &values[0] {
                Expression::FunctionDefinition(proto) => {
                    assert_eq!(proto.params, vec!["self", "x"]);
                }
                other => panic!("unexpected expression {:?}", other),
            },
            other => panic!("unexpected statement {:?}", other),
        }
    }

    #[test]
    fn test_local_function_desugars() {
        let block = parse_ok("local function f() return f end");
        assert_eq!(block.statements.len(), 2);
        assert!(matches!(
            &block.statements[0],
            Statement::LocalAssignment { .. }
        ));
        assert!(matches!(&block.statements[1], Statement::Assignment { .. }));
    }

    #[test]
    fn test_break_outside_loop_rejected() {
        assert!(parse("break").is_err());
        assert!(parse("while true do break end").is_ok());
        // A function body resets the loop context.
        assert!(parse("while true do local f = function() break end end").is_err());
    }

    #[test]
    fn test_varargs_outside_vararg_function_rejected() {
        assert!(parse("return ...").is_ok());
        assert!(parse("local f = function(...) return ... end").is_ok());
        assert!(parse("local f = function() return ... end").is_err());
    }

    #[test]
    fn test_return_must_end_block() {
        assert!(parse("return 1; x = 2").is_err());
        assert!(parse("do return end x = 2").is_ok());
    }

    #[test]
    fn test_table_constructor_forms() {
        let block = parse_ok("local t = { 1, x = 2, [3] = 4, f() }");
        match &block.statements[0] {
            Statement::LocalAssignment { values, .. } => match &values[0] {
                Expression::TableConstructor(fields) => {
                    assert_eq!(fields.len(), 4);
                    assert!(fields[0].key.is_none());
                    assert!(fields[1].key.is_some());
                    assert!(fields[2].key.is_some());
                    assert!(fields[3].key.is_none());
                }
                other => panic!("unexpected expression {:?}", other),
            },
            other => panic!("unexpected statement {:?}", other),
        }
    }

    #[test]
    fn test_method_call_rejected() {
        assert!(parse("t:m(1)").is_err());
    }
}
