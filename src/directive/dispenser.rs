//! Cursor over directive tokens.
//!
//! Walks a token stream line by line and block by block, the way a directive
//! handler consumes its own configuration.

use crate::directive::lexer::{tokenize, Token};

#[derive(Debug, Clone)]
pub struct Dispenser {
    tokens: Vec<Token>,
    /// Index of the current token; `None` before the first `next()`.
    cursor: Option<usize>,
    nesting: usize,
    block_line: usize,
}

impl Dispenser {
    pub fn new(input: &str) -> Self {
        Self::from_tokens(tokenize(input))
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: None,
            nesting: 0,
            block_line: 0,
        }
    }

    /// Advance to the next token, on any line.
    pub fn next(&mut self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next < self.tokens.len() {
            self.cursor = Some(next);
            true
        } else {
            false
        }
    }

    /// Advance only if the next token sits on the current line.
    pub fn next_arg(&mut self) -> bool {
        let Some(current) = self.cursor else {
            return false;
        };
        match self.tokens.get(current + 1) {
            Some(token) if token.line == self.tokens[current].line => {
                self.cursor = Some(current + 1);
                true
            }
            _ => false,
        }
    }

    /// Advance to the next token inside the current block.
    ///
    /// Opens the block on first call when the current line ends in `{`.
    /// Returns false on the closing `}`, on an empty block, or at end of input.
    pub fn next_block(&mut self) -> bool {
        if self.nesting > 0 {
            if !self.next() {
                return false;
            }
            if self.val() == "}" {
                self.nesting -= 1;
                return false;
            }
            return true;
        }

        if !self.next_arg() {
            return false;
        }
        if self.val() != "{" {
            self.back();
            return false;
        }
        self.block_line = self.line();
        if !self.next() {
            self.nesting += 1;
            return false;
        }
        if self.val() == "}" {
            return false;
        }
        self.nesting += 1;
        true
    }

    /// Collect the rest of the current line, stopping before a `{`.
    pub fn remaining_args(&mut self) -> Vec<String> {
        let mut args = Vec::new();
        while self.next_arg() {
            if self.val() == "{" {
                self.back();
                break;
            }
            args.push(self.val().to_string());
        }
        args
    }

    /// Skip the rest of the current line, including a nested block it opens.
    pub fn skip_line(&mut self) {
        self.remaining_args();
        if !self.next_arg() {
            return;
        }
        let mut depth = 1;
        while depth > 0 && self.next() {
            match self.val() {
                "{" => depth += 1,
                "}" => depth -= 1,
                _ => {}
            }
        }
    }

    /// Text of the current token, or `""` before the first token.
    pub fn val(&self) -> &str {
        self.current().map_or("", |t| t.text.as_str())
    }

    /// Line of the current token, or 0 before the first token.
    pub fn line(&self) -> usize {
        self.current().map_or(0, |t| t.line)
    }

    /// True while inside a block that has not been closed.
    pub fn in_block(&self) -> bool {
        self.nesting > 0
    }

    /// Line where the innermost open block started.
    pub fn block_line(&self) -> usize {
        self.block_line
    }

    fn current(&self) -> Option<&Token> {
        self.cursor.and_then(|c| self.tokens.get(c))
    }

    fn back(&mut self) {
        self.cursor = match self.cursor {
            Some(0) | None => None,
            Some(c) => Some(c - 1),
        };
    }
}
