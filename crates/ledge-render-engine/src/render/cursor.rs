use crate::lexing::Token;

/// A forward-only cursor over a lexed token slice.
///
/// The slice is never mutated; `pos` only ever grows, so each token is
/// yielded exactly once and in source order.
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Index of the token the next [`advance`](Self::advance) returns.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns true once every token has been consumed.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peeks at the next token without consuming it.
    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// Consumes and returns the next token.
    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }
}
