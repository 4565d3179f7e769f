//! Lua call-site lexer
//!
//! A single forward scan over the source bytes that extracts `require`
//! call-sites while staying out of string and comment content. The scanner
//! recognizes two surface forms and treats them identically:
//!
//! - a direct call: `require("mod")`, `require 'mod'`, `require [[mod]]`
//! - a guarded call: `pcall(require, "mod")`
//!
//! The module argument must be a string literal. Anything else (a variable,
//! a concatenation, a nested call) cannot be resolved at build time and
//! raises a dynamic-require error carrying the line and the raw statement.

use crate::error::{LuapackError, Result};
use crate::models::ImportSite;
use std::path::{Path, PathBuf};

/// Scanner state. Exactly one is active at any position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Normal,
    InSingleQuoteString,
    InDoubleQuoteString,
    /// Long bracket string; the level is the number of `=` between brackets
    InLongBracketString(usize),
    InLineComment,
    /// Long bracket comment with its level
    InBlockComment(usize),
}

/// Extracts ordered `require` call-sites from one Lua source file
pub struct SourceLexer<'a> {
    text: &'a str,
    src: &'a [u8],
    origin: &'a Path,
    pos: usize,
    line: usize,
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

impl<'a> SourceLexer<'a> {
    /// Create a lexer over raw source text originating from `origin`
    pub fn new(text: &'a str, origin: &'a Path) -> Self {
        Self {
            text,
            src: text.as_bytes(),
            origin,
            pos: 0,
            line: 1,
        }
    }

    /// Scan the whole input and return every call-site in source order
    pub fn scan(mut self) -> Result<Vec<ImportSite>> {
        let mut sites = Vec::new();
        let mut state = LexState::Normal;

        while let Some(b) = self.peek() {
            state = match state {
                LexState::Normal => self.step_normal(b, &mut sites)?,
                LexState::InSingleQuoteString => self.step_short_string(b, b'\''),
                LexState::InDoubleQuoteString => self.step_short_string(b, b'"'),
                LexState::InLongBracketString(level) => self.step_long_bracket(b, level, false),
                LexState::InLineComment => {
                    let next = if b == b'\n' {
                        LexState::Normal
                    } else {
                        LexState::InLineComment
                    };
                    self.advance();
                    next
                }
                LexState::InBlockComment(level) => self.step_long_bracket(b, level, true),
            };
        }

        Ok(sites)
    }

    fn step_normal(&mut self, b: u8, sites: &mut Vec<ImportSite>) -> Result<LexState> {
        match b {
            b'-' if self.peek_at(1) == Some(b'-') => {
                self.advance();
                self.advance();
                if let Some(level) = self.consume_long_bracket_open() {
                    Ok(LexState::InBlockComment(level))
                } else {
                    Ok(LexState::InLineComment)
                }
            }
            b'\'' => {
                self.advance();
                Ok(LexState::InSingleQuoteString)
            }
            b'"' => {
                self.advance();
                Ok(LexState::InDoubleQuoteString)
            }
            b'[' => {
                if let Some(level) = self.consume_long_bracket_open() {
                    Ok(LexState::InLongBracketString(level))
                } else {
                    self.advance();
                    Ok(LexState::Normal)
                }
            }
            b if is_ident_start(b) && self.at_ident_boundary() => {
                let start = self.pos;
                let ident = self.consume_identifier();
                match ident {
                    "require" => self.parse_require_call(start, sites)?,
                    "pcall" => self.parse_guarded_call(start, sites)?,
                    _ => {}
                }
                Ok(LexState::Normal)
            }
            _ => {
                self.advance();
                Ok(LexState::Normal)
            }
        }
    }

    /// Short string body: backslash escapes the next byte; the matching
    /// quote closes only when unescaped.
    fn step_short_string(&mut self, b: u8, quote: u8) -> LexState {
        let stay = if quote == b'\'' {
            LexState::InSingleQuoteString
        } else {
            LexState::InDoubleQuoteString
        };
        match b {
            b'\\' => {
                self.advance();
                if self.peek().is_some() {
                    self.advance();
                }
                stay
            }
            b if b == quote => {
                self.advance();
                LexState::Normal
            }
            _ => {
                self.advance();
                stay
            }
        }
    }

    /// Long bracket body (string or comment): closes only on a `]`...`]`
    /// run whose level matches the opener exactly.
    fn step_long_bracket(&mut self, b: u8, level: usize, comment: bool) -> LexState {
        if b == b']' && self.consume_long_bracket_close(level) {
            return LexState::Normal;
        }
        self.advance();
        if comment {
            LexState::InBlockComment(level)
        } else {
            LexState::InLongBracketString(level)
        }
    }

    /// A direct `require` call. The keyword has already been consumed.
    fn parse_require_call(&mut self, stmt_start: usize, sites: &mut Vec<ImportSite>) -> Result<()> {
        let stmt_line = self.line;
        self.skip_inline_whitespace();

        match self.peek() {
            Some(b'(') => {
                self.advance();
                self.skip_whitespace();
            }
            Some(b'\'') | Some(b'"') => {}
            Some(b'[') if self.probe_long_bracket_open() => {}
            Some(b'{') => {
                // a table-constructor argument is never a resolvable name
                return Err(self.dynamic_require(stmt_start, stmt_line));
            }
            // `require` referenced as a value, not called
            _ => return Ok(()),
        }

        let reference = self.parse_literal_argument(stmt_start, stmt_line)?;
        self.reject_trailing_concat(stmt_start, stmt_line)?;
        sites.push(ImportSite::new(reference, stmt_line, self.origin));
        Ok(())
    }

    /// A `pcall(...)` invocation. Only `pcall(require, <arg>)` and
    /// `pcall(require(<arg>))` denote imports; any other callee is skipped.
    fn parse_guarded_call(&mut self, stmt_start: usize, sites: &mut Vec<ImportSite>) -> Result<()> {
        let stmt_line = self.line;
        self.skip_inline_whitespace();
        if self.peek() != Some(b'(') {
            return Ok(());
        }
        self.advance();
        self.skip_whitespace();

        if !self.consume_keyword("require") {
            return Ok(());
        }
        self.skip_whitespace();

        match self.peek() {
            Some(b',') => {
                self.advance();
                self.skip_whitespace();
                let reference = self.parse_literal_argument(stmt_start, stmt_line)?;
                self.reject_trailing_concat(stmt_start, stmt_line)?;
                sites.push(ImportSite::new(reference, stmt_line, self.origin));
                Ok(())
            }
            // `pcall(require("mod"))`: the inner call is a direct require
            Some(b'(') | Some(b'\'') | Some(b'"') | Some(b'[') => {
                self.parse_require_call(stmt_start, sites)
            }
            // `pcall(require)` passes the function itself; nothing to record
            _ => Ok(()),
        }
    }

    /// The module argument: a quoted literal or a long-bracket literal.
    /// Anything else, and any unterminated literal, is a dynamic reference.
    fn parse_literal_argument(&mut self, stmt_start: usize, stmt_line: usize) -> Result<String> {
        match self.peek() {
            Some(q @ (b'\'' | b'"')) => {
                self.advance();
                let start = self.pos;
                loop {
                    match self.peek() {
                        None | Some(b'\n') => {
                            return Err(self.dynamic_require(stmt_start, stmt_line));
                        }
                        Some(b'\\') => {
                            self.advance();
                            if self.peek().is_some() {
                                self.advance();
                            }
                        }
                        Some(b) if b == q => {
                            let reference = self.text[start..self.pos].to_string();
                            self.advance();
                            return Ok(reference);
                        }
                        Some(_) => self.advance(),
                    }
                }
            }
            Some(b'[') => {
                let Some(level) = self.consume_long_bracket_open() else {
                    return Err(self.dynamic_require(stmt_start, stmt_line));
                };
                let start = self.pos;
                loop {
                    match self.peek() {
                        None => return Err(self.dynamic_require(stmt_start, stmt_line)),
                        Some(b']') => {
                            let end = self.pos;
                            if self.consume_long_bracket_close(level) {
                                return Ok(self.text[start..end].to_string());
                            }
                            self.advance();
                        }
                        Some(_) => self.advance(),
                    }
                }
            }
            _ => Err(self.dynamic_require(stmt_start, stmt_line)),
        }
    }

    /// A literal followed by `..` would silently narrow a concatenation to
    /// its first operand; reject it instead.
    fn reject_trailing_concat(&mut self, stmt_start: usize, stmt_line: usize) -> Result<()> {
        self.skip_whitespace();
        if self.peek() == Some(b'.') && self.peek_at(1) == Some(b'.') {
            return Err(self.dynamic_require(stmt_start, stmt_line));
        }
        Ok(())
    }

    fn dynamic_require(&self, stmt_start: usize, stmt_line: usize) -> LuapackError {
        LuapackError::dynamic_require(
            PathBuf::from(self.origin),
            stmt_line,
            self.statement_text(stmt_start),
        )
    }

    /// The trimmed source line containing the byte offset `start`
    fn statement_text(&self, start: usize) -> String {
        let line_start = self.src[..start]
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let line_end = self.src[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|i| start + i)
            .unwrap_or(self.src.len());
        self.text[line_start..line_end].trim().to_string()
    }

    // -- cursor helpers -----------------------------------------------------

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    /// Advance one byte, counting newlines unconditionally
    fn advance(&mut self) {
        if self.src.get(self.pos) == Some(&b'\n') {
            self.line += 1;
        }
        self.pos += 1;
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.advance();
        }
    }

    /// Whitespace on the current line only; a newline ends the skip
    fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r')) {
            self.advance();
        }
    }

    /// True when the previous byte cannot extend an identifier
    fn at_ident_boundary(&self) -> bool {
        self.pos == 0 || !is_ident_byte(self.src[self.pos - 1])
    }

    fn consume_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if is_ident_byte(b)) {
            self.advance();
        }
        &self.text[start..self.pos]
    }

    /// Consume `keyword` only if it appears here as a complete identifier
    fn consume_keyword(&mut self, keyword: &str) -> bool {
        let end = self.pos + keyword.len();
        if self.src.len() < end || &self.src[self.pos..end] != keyword.as_bytes() {
            return false;
        }
        if self.src.get(end).is_some_and(|&b| is_ident_byte(b)) {
            return false;
        }
        for _ in 0..keyword.len() {
            self.advance();
        }
        true
    }

    /// True if the cursor sits on a long-bracket opener, without consuming
    fn probe_long_bracket_open(&self) -> bool {
        self.long_bracket_open_len().is_some()
    }

    fn long_bracket_open_len(&self) -> Option<(usize, usize)> {
        if self.peek() != Some(b'[') {
            return None;
        }
        let mut level = 0;
        while self.peek_at(1 + level) == Some(b'=') {
            level += 1;
        }
        if self.peek_at(1 + level) == Some(b'[') {
            Some((level, level + 2))
        } else {
            None
        }
    }

    /// Consume `[==[` style opener, returning its level
    fn consume_long_bracket_open(&mut self) -> Option<usize> {
        let (level, len) = self.long_bracket_open_len()?;
        for _ in 0..len {
            self.advance();
        }
        Some(level)
    }

    /// Consume `]==]` only when the level matches the opener exactly
    fn consume_long_bracket_close(&mut self, level: usize) -> bool {
        if self.peek() != Some(b']') {
            return false;
        }
        for i in 0..level {
            if self.peek_at(1 + i) != Some(b'=') {
                return false;
            }
        }
        if self.peek_at(1 + level) != Some(b']') {
            return false;
        }
        for _ in 0..level + 2 {
            self.advance();
        }
        true
    }
}
