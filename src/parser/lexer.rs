// Hand-written tokenizer over raw bytes. Lua source is 8-bit clean inside
// string literals, so the lexer never assumes UTF-8 there.

use super::error::LuaParseError;
use super::token::{keyword_kind, Token, TokenKind, TokenValue};

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
}

type LexResult<T> = Result<T, LuaParseError>;

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            src: source.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    pub fn tokenize(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if eof {
                return Ok(tokens);
            }
        }
    }

    // ===== Cursor =====

    fn peek(&self) -> u8 {
        self.src.get(self.pos).copied().unwrap_or(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.src.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn bump(&mut self) -> u8 {
        let c = self.peek();
        self.pos += 1;
        c
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn error(&self, message: impl Into<String>) -> LuaParseError {
        LuaParseError::new(message, self.line)
    }

    // ===== Lexing =====

    fn next_token(&mut self) -> LexResult<Token> {
        loop {
            if self.is_eof() {
                return Ok(Token::plain(TokenKind::Eof, self.line));
            }
            match self.peek() {
                b' ' | b'\t' | b'\r' => {
                    self.pos += 1;
                }
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                }
                b'-' if self.peek_at(1) == b'-' => {
                    self.pos += 2;
                    self.skip_comment()?;
                }
                _ => break,
            }
        }

        let line = self.line;
        let c = self.peek();
        match c {
            b'0'..=b'9' => self.lex_number(),
            b'.' if self.peek_at(1).is_ascii_digit() => self.lex_number(),
            b'"' | b'\'' => self.lex_short_string(),
            b'[' if self.peek_at(1) == b'[' || self.peek_at(1) == b'=' => {
                match self.try_long_bracket() {
                    Some(level) => {
                        let bytes = self.lex_long_string(level)?;
                        Ok(Token {
                            kind: TokenKind::String,
                            value: TokenValue::Str(bytes),
                            line,
                        })
                    }
                    None => {
                        self.pos += 1;
                        Ok(Token::plain(TokenKind::LeftBracket, line))
                    }
                }
            }
            c if c == b'_' || c.is_ascii_alphabetic() => self.lex_name(),
            _ => self.lex_symbol(),
        }
    }

    fn skip_comment(&mut self) -> LexResult<()> {
        if self.peek() == b'[' {
            if let Some(level) = self.try_long_bracket() {
                self.lex_long_string(level)?;
                return Ok(());
            }
        }
        while !self.is_eof() && self.peek() != b'\n' {
            self.pos += 1;
        }
        Ok(())
    }

    /// At a `[`: consume `[=*[` and return the level, or consume nothing
    /// and return None.
    fn try_long_bracket(&mut self) -> Option<usize> {
        let start = self.pos;
        if self.peek() != b'[' {
            return None;
        }
        let mut offset = 1;
        while self.peek_at(offset) == b'=' {
            offset += 1;
        }
        if self.peek_at(offset) == b'[' {
            self.pos = start + offset + 1;
            Some(offset - 1)
        } else {
            None
        }
    }

    /// Body of a long string/comment after the opening bracket. The first
    /// immediate newline is skipped, per Lua.
    fn lex_long_string(&mut self, level: usize) -> LexResult<Vec<u8>> {
        if self.peek() == b'\r' {
            self.pos += 1;
        }
        if self.peek() == b'\n' {
            self.pos += 1;
            self.line += 1;
        }
        let mut bytes = Vec::new();
        loop {
            if self.is_eof() {
                return Err(self.error("unfinished long string"));
            }
            if self.peek() == b']' {
                let mut offset = 1;
                while self.peek_at(offset) == b'=' {
                    offset += 1;
                }
                if offset - 1 == level && self.peek_at(offset) == b']' {
                    self.pos += offset + 1;
                    return Ok(bytes);
                }
            }
            let c = self.bump();
            if c == b'\n' {
                self.line += 1;
            }
            bytes.push(c);
        }
    }

    fn lex_short_string(&mut self) -> LexResult<Token> {
        let line = self.line;
        let quote = self.bump();
        let mut bytes = Vec::new();
        loop {
            if self.is_eof() {
                return Err(self.error("unfinished string"));
            }
            let c = self.bump();
            if c == quote {
                break;
            }
            match c {
                b'\n' => return Err(self.error("unfinished string")),
                b'\\' => {
                    let esc = self.bump();
                    match esc {
                        b'n' => bytes.push(b'\n'),
                        b't' => bytes.push(b'\t'),
                        b'r' => bytes.push(b'\r'),
                        b'a' => bytes.push(7),
                        b'b' => bytes.push(8),
                        b'f' => bytes.push(12),
                        b'v' => bytes.push(11),
                        b'\\' => bytes.push(b'\\'),
                        b'"' => bytes.push(b'"'),
                        b'\'' => bytes.push(b'\''),
                        b'\n' => {
                            bytes.push(b'\n');
                            self.line += 1;
                        }
                        b'x' => {
                            let hi = self.hex_digit()?;
                            let lo = self.hex_digit()?;
                            bytes.push((hi << 4) | lo);
                        }
                        b'0'..=b'9' => {
                            // \ddd: up to three decimal digits, max 255.
                            let mut n = (esc - b'0') as u32;
                            for _ in 0..2 {
                                if self.peek().is_ascii_digit() {
                                    n = n * 10 + (self.bump() - b'0') as u32;
                                } else {
                                    break;
                                }
                            }
                            if n > 255 {
                                return Err(self.error("decimal escape too large"));
                            }
                            bytes.push(n as u8);
                        }
                        _ => return Err(self.error("invalid escape sequence")),
                    }
                }
                _ => bytes.push(c),
            }
        }
        Ok(Token {
            kind: TokenKind::String,
            value: TokenValue::Str(bytes),
            line,
        })
    }

    fn hex_digit(&mut self) -> LexResult<u8> {
        let c = self.bump();
        match c {
            b'0'..=b'9' => Ok(c - b'0'),
            b'a'..=b'f' => Ok(c - b'a' + 10),
            b'A'..=b'F' => Ok(c - b'A' + 10),
            _ => Err(self.error("hexadecimal digit expected")),
        }
    }

    fn lex_number(&mut self) -> LexResult<Token> {
        let line = self.line;
        let start = self.pos;

        if self.peek() == b'0' && matches!(self.peek_at(1), b'x' | b'X') {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_ascii_hexdigit() {
                self.pos += 1;
            }
            if self.pos == digits_start {
                return Err(self.error("malformed number"));
            }
            let text = std::str::from_utf8(&self.src[digits_start..self.pos])
                .map_err(|_| self.error("malformed number"))?;
            let n = i64::from_str_radix(text, 16)
                .map_err(|_| self.error("malformed number"))? as f64;
            return Ok(Token {
                kind: TokenKind::Number,
                value: TokenValue::Number(n),
                line,
            });
        }

        while self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        if self.peek() == b'.' {
            self.pos += 1;
            while self.peek().is_ascii_digit() {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), b'e' | b'E') {
            self.pos += 1;
            if matches!(self.peek(), b'+' | b'-') {
                self.pos += 1;
            }
            if !self.peek().is_ascii_digit() {
                return Err(self.error("malformed number"));
            }
            while self.peek().is_ascii_digit() {
                self.pos += 1;
            }
        }

        let text = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| self.error("malformed number"))?;
        let n: f64 = text.parse().map_err(|_| self.error("malformed number"))?;
        Ok(Token {
            kind: TokenKind::Number,
            value: TokenValue::Number(n),
            line,
        })
    }

    fn lex_name(&mut self) -> LexResult<Token> {
        let line = self.line;
        let start = self.pos;
        loop {
            let c = self.peek();
            if c == b'_' || c.is_ascii_alphanumeric() {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| self.error("invalid identifier"))?;
        match keyword_kind(text) {
            Some(kind) => Ok(Token::plain(kind, line)),
            None => Ok(Token {
                kind: TokenKind::Name,
                value: TokenValue::Name(text.to_string()),
                line,
            }),
        }
    }

    fn lex_symbol(&mut self) -> LexResult<Token> {
        let line = self.line;
        let c = self.bump();
        let kind = match c {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'^' => TokenKind::Caret,
            b'#' => TokenKind::Hash,
            b'(' => TokenKind::LeftParen,
            b')' => TokenKind::RightParen,
            b'{' => TokenKind::LeftBrace,
            b'}' => TokenKind::RightBrace,
            b'[' => TokenKind::LeftBracket,
            b']' => TokenKind::RightBracket,
            b';' => TokenKind::Semicolon,
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            b'=' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            b'~' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    TokenKind::NotEq
                } else {
                    return Err(self.error("unexpected symbol near '~'"));
                }
            }
            b'<' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    TokenKind::LessEq
                } else {
                    TokenKind::Less
                }
            }
            b'>' => {
                if self.peek() == b'=' {
                    self.pos += 1;
                    TokenKind::GreaterEq
                } else {
                    TokenKind::Greater
                }
            }
            b'.' => {
                if self.peek() == b'.' {
                    self.pos += 1;
                    if self.peek() == b'.' {
                        self.pos += 1;
                        TokenKind::Ellipsis
                    } else {
                        TokenKind::Concat
                    }
                } else {
                    TokenKind::Dot
                }
            }
            other => {
                return Err(self.error(format!(
                    "unexpected symbol near '{}'",
                    (other as char).escape_default()
                )));
            }
        };
        Ok(Token::plain(kind, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds("local x = 1 + 2"),
            vec![
                TokenKind::Local,
                TokenKind::Name,
                TokenKind::Assign,
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_dots() {
        assert_eq!(
            kinds("a.b .. c ..."),
            vec![
                TokenKind::Name,
                TokenKind::Dot,
                TokenKind::Name,
                TokenKind::Concat,
                TokenKind::Name,
                TokenKind::Ellipsis,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::new("3 3.25 1e2 0xFF .5").tokenize().unwrap();
        let values: Vec<f64> = tokens
            .iter()
            .filter_map(|t| match t.value {
                TokenValue::Number(n) => Some(n),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec![3.0, 3.25, 100.0, 255.0, 0.5]);
    }

    #[test]
    fn test_string_escapes() {
        let tokens = Lexer::new(r#""a\n\t\\\"\065\x41""#).tokenize().unwrap();
        match &tokens[0].value {
            TokenValue::Str(bytes) => assert_eq!(bytes, b"a\n\t\\\"AA"),
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn test_long_string_and_comment() {
        let tokens = Lexer::new("--[[ skipped\nentirely ]] x = [==[raw ]] body]==]")
            .tokenize()
            .unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Name);
        match &tokens[2].value {
            TokenValue::Str(bytes) => assert_eq!(bytes, b"raw ]] body"),
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn test_comments_and_lines() {
        let tokens = Lexer::new("a -- comment\nb").tokenize().unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_unfinished_string_errors() {
        assert!(Lexer::new("\"abc").tokenize().is_err());
        assert!(Lexer::new("[[abc").tokenize().is_err());
    }
}
