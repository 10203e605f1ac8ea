//! LL(1) and LR(0)/SLR parser engines (SPEC_FULL §4.4, §4.5) sharing a flat
//! [`table::Table`] abstraction and a token-stream helper that pairs a
//! [`crate::lexer::Lexer`] with a loaded [`crate::grammar::Grammar`].

pub mod ll;
pub mod lr;
pub mod table;

pub use ll::LlParser;
pub use lr::LrParser;

use crate::{grammar::Grammar, lexer::Lexer, types::FIRST_TOKEN_ID};

/// Advances a [`Lexer`] over an input buffer, skipping patterns the grammar
/// marked `*` (ignored) and converting matched-pattern ids into flat symbol
/// ids, grounded on `examples/original_source/C++/BaseParserGenerator.h`'s
/// (declaration-only) `next()`: "Gets next token number/char. 0 means end of
/// input."
pub(crate) struct TokenStream<'g> {
  lexer: Lexer,
  grammar: &'g Grammar,
  input: Vec<u8>,
  pos: usize,
  lexeme_start: usize,
  lexeme_end: usize,
}

impl<'g> TokenStream<'g> {
  pub fn new(lexer: Lexer, grammar: &'g Grammar, input: &[u8]) -> Self {
    let mut lexer = lexer;
    lexer.reset();
    Self { lexer, grammar, input: input.to_vec(), pos: 0, lexeme_start: 0, lexeme_end: 0 }
  }

  pub fn line(&self) -> u32 {
    self.lexer.line()
  }

  pub fn col(&self) -> u32 {
    self.lexer.col()
  }

  /// The exact bytes of the most recently returned token.
  pub fn lexeme(&self) -> &[u8] {
    &self.input[self.lexeme_start..self.lexeme_end]
  }

  /// Returns the next significant symbol id, `0` at end of input.
  pub fn advance(&mut self) -> i32 {
    loop {
      if self.pos >= self.input.len() {
        self.lexeme_start = self.pos;
        self.lexeme_end = self.pos;
        return 0;
      }
      let start = self.pos;
      let tok = self.lexer.lex(&self.input, self.pos);
      self.pos = tok.end;
      self.lexeme_start = start;
      self.lexeme_end = tok.end;
      if tok.matched {
        if self.grammar.token_ignore[tok.id as usize] {
          continue;
        }
        return FIRST_TOKEN_ID + tok.id;
      }
      return tok.id;
    }
  }
}
