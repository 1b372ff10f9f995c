//! Token cursor
//!
//! Forward-only buffer over a finished token sequence. The read position
//! only ever moves forward, so every token is handed out at most once.

use crate::Token;

/// Single-pass reader over a fully tokenized document
#[derive(Debug, Clone, Default)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    /// Create a cursor positioned before the first token
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Whether every token has been read
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Total number of buffered tokens, read or not
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Current read position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of tokens not yet read
    #[inline]
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.pos)
    }

    /// Read the next token and advance past it
    pub fn get(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        Some(token)
    }

    /// Look at the next token without consuming it
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Skip tokens until one satisfies `predicate`, and return it.
    ///
    /// Skipped tokens are gone for good. Returns `None` once the cursor
    /// runs dry without a match.
    pub fn take<P>(&mut self, mut predicate: P) -> Option<Token>
    where
        P: FnMut(&Token) -> bool,
    {
        while let Some(token) = self.get() {
            if predicate(&token) {
                return Some(token);
            }
        }
        None
    }
}

impl FromIterator<Token> for TokenCursor {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<Token>> for TokenCursor {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}
