//! Lexical analysis of query text.
//!
//! [`tokenize`] turns a query string into a token stream terminated by
//! [`TokenKind::Eof`]. Whitespace is skipped. Keywords (`and`, `or`, `not`,
//! `in`, `true`, `false`, `null`) are matched case-insensitively and only
//! at their exact spelling, so `order` or `null_count` stay identifiers.
//! `not` followed by `in` collapses into a single `not in` operator token.

use crate::error::{LexError, LexErrorReason};
use crate::op::CompareOp;
use crate::token::{Token, TokenKind};

/// Splits `input` into tokens.
///
/// Offsets are byte offsets into `input`. The last token is always
/// [`TokenKind::Eof`] at `input.len()`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let tokens = Lexer::new(input).run()?;
    tracing::trace!(count = tokens.len(), "tokenized query");
    Ok(tokens)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    open_lists: Vec<usize>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            open_lists: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(c) = self.peek() else { break };
            let kind = self.next_kind(c, start)?;
            tokens.push(Token::new(kind, &self.input[start..self.pos], start));
        }

        if let Some(&offset) = self.open_lists.last() {
            return Err(LexError::new(offset, LexErrorReason::UnterminatedList));
        }

        tokens.push(Token::new(TokenKind::Eof, "", self.input.len()));
        Ok(tokens)
    }

    fn next_kind(&mut self, c: char, start: usize) -> Result<TokenKind, LexError> {
        let kind = match c {
            '(' => self.single(TokenKind::ParenOpen),
            ')' => self.single(TokenKind::ParenClose),
            '[' => {
                self.open_lists.push(start);
                self.single(TokenKind::ListOpen)
            }
            ']' => {
                // An unmatched `]` is left for the parser to report.
                self.open_lists.pop();
                self.single(TokenKind::ListClose)
            }
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Dot),
            '=' => self.single(TokenKind::Op(CompareOp::Eq)),
            '~' => self.single(TokenKind::Op(CompareOp::Contains)),
            '!' => {
                self.bump();
                match self.peek() {
                    Some('=') => self.single(TokenKind::Op(CompareOp::Ne)),
                    Some('~') => self.single(TokenKind::Op(CompareOp::NotContains)),
                    _ => {
                        return Err(LexError::new(start, LexErrorReason::UnexpectedChar('!')))
                    }
                }
            }
            '>' => {
                self.bump();
                if self.eat('=') {
                    TokenKind::Op(CompareOp::Gte)
                } else {
                    TokenKind::Op(CompareOp::Gt)
                }
            }
            '<' => {
                self.bump();
                if self.eat('=') {
                    TokenKind::Op(CompareOp::Lte)
                } else {
                    TokenKind::Op(CompareOp::Lt)
                }
            }
            '"' | '\'' => TokenKind::String(self.string(c, start)?),
            '-' if self.peek_second().is_some_and(|n| n.is_ascii_digit()) => self.number(start)?,
            c if c.is_ascii_digit() => self.number(start)?,
            c if c.is_ascii_alphabetic() || c == '_' => self.word(),
            other => return Err(LexError::new(start, LexErrorReason::UnexpectedChar(other))),
        };
        Ok(kind)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn is_ident_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    fn read_ident(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.peek().is_some_and(Self::is_ident_char) {
            self.bump();
        }
        &input[start..self.pos]
    }

    fn word(&mut self) -> TokenKind {
        let word = self.read_ident();
        match word.to_ascii_lowercase().as_str() {
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "in" => TokenKind::Op(CompareOp::In),
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            "null" => TokenKind::Null,
            "not" => {
                if self.try_in_after_not() {
                    TokenKind::Op(CompareOp::NotIn)
                } else {
                    TokenKind::Not
                }
            }
            _ => TokenKind::Ident(word.to_string()),
        }
    }

    /// Consumes a following `in` keyword, if there is one.
    fn try_in_after_not(&mut self) -> bool {
        let saved = self.pos;
        self.skip_whitespace();
        if self.pos > saved && self.read_ident().eq_ignore_ascii_case("in") {
            return true;
        }
        self.pos = saved;
        false
    }

    fn number(&mut self, start: usize) -> Result<TokenKind, LexError> {
        self.eat('-');
        self.digits();

        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            self.digits();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let saved = self.pos;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.digits();
            } else {
                self.pos = saved;
            }
        }

        let input = self.input;
        let raw = &input[start..self.pos];
        let invalid = || LexError::new(start, LexErrorReason::InvalidNumber(raw.to_string()));
        if is_float {
            let n: f64 = raw.parse().map_err(|_| invalid())?;
            if !n.is_finite() {
                return Err(invalid());
            }
            Ok(TokenKind::Float(n))
        } else {
            raw.parse().map(TokenKind::Integer).map_err(|_| invalid())
        }
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    fn string(&mut self, quote: char, start: usize) -> Result<String, LexError> {
        self.bump();
        let mut out = String::new();
        loop {
            let escape_at = self.pos;
            match self.bump() {
                None => return Err(LexError::new(start, LexErrorReason::UnterminatedString)),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push(self.escape(escape_at)?),
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, escape_at: usize) -> Result<char, LexError> {
        let c = match self.bump() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some(c @ ('\\' | '/' | '"' | '\'')) => c,
            Some('u') => {
                let hex_start = self.pos;
                for _ in 0..4 {
                    if !self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                        return Err(self.invalid_escape(escape_at));
                    }
                    self.bump();
                }
                u32::from_str_radix(&self.input[hex_start..self.pos], 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.invalid_escape(escape_at))?
            }
            None => return Err(LexError::new(escape_at, LexErrorReason::UnterminatedString)),
            Some(_) => return Err(self.invalid_escape(escape_at)),
        };
        Ok(c)
    }

    fn invalid_escape(&self, escape_at: usize) -> LexError {
        LexError::new(
            escape_at,
            LexErrorReason::InvalidEscape(self.input[escape_at..self.pos].to_string()),
        )
    }
}
