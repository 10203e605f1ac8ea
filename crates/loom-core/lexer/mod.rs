//! Lexer (SPEC_FULL §4.2): composes many patterns into one NFA with multiple
//! accept states and produces a token stream from a byte buffer.

use crate::{
  regex::{
    nfa::Nfa,
    sim::simulate,
  },
  types::LoomResult,
};

mod compile;

/// A composed multi-pattern lexer. Immutable once built; sessions reset the
/// cursor/line/column via [`Lexer::reset`] (SPEC_FULL §4.2, §10.6).
#[derive(Clone, Debug)]
pub struct Lexer {
  nfa: Nfa,
  start: usize,
  /// `accept_table[state] = pattern index`, or `-1` if `state` is not an
  /// accept state.
  accept_table: Vec<i32>,
  /// Index of the pattern (if any) whose matches advance `line` instead of
  /// `col` — SPEC_FULL §4.2's "newline pattern".
  newline_pattern: Option<usize>,

  line: u32,
  col: u32,
  last_token: Option<i32>,
}

/// One step of tokenization, returned by [`Lexer::lex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
  /// The matched pattern's index, or the raw byte value if no pattern
  /// matched (SPEC_FULL §4.2's raw-byte fallback) — see `matched` to tell
  /// the two cases apart, since both are small non-negative integers.
  pub id: i32,
  /// `true` if `id` is a pattern index (a real pattern matched); `false` if
  /// `id` is a raw byte value (the fallback case). A caller combining this
  /// lexer's output with the grammar's flat symbol numbering needs this to
  /// decide whether to offset `id` by `FIRST_TOKEN_ID`.
  pub matched: bool,
  /// The offset, relative to the buffer passed to `lex`, one past the last
  /// consumed byte.
  pub end: usize,
}

impl Lexer {
  /// Compiles `patterns` in order into one combined NFA. `newline_pattern`,
  /// if given, names the index of the pattern whose matches bump `line`
  /// instead of `col` (SPEC_FULL §4.2).
  pub fn compile(patterns: &[&str], newline_pattern: Option<usize>) -> LoomResult<Self> {
    let (nfa, start, accept_table) = compile::compile_patterns(patterns)?;
    Ok(Self { nfa, start, accept_table, newline_pattern, line: 1, col: 1, last_token: None })
  }

  /// Resets `line`/`col`/`last_token` to `(1, 1, None)` (SPEC_FULL §4.2,
  /// §10.6), mirroring the original `Lexer::reset` lifecycle hook.
  pub fn reset(&mut self) {
    self.line = 1;
    self.col = 1;
    self.last_token = None;
  }

  /// `true` once a token has been successfully produced by `lex`, mirroring
  /// the original `Lexer::good` predicate (SPEC_FULL §10.6).
  pub fn good(&self) -> bool {
    self.last_token.is_some_and(|t| t >= 0)
  }

  pub fn line(&self) -> u32 {
    self.line
  }

  pub fn col(&self) -> u32 {
    self.col
  }

  /// Runs one tokenization step starting at byte offset `pos` in `input`
  /// (SPEC_FULL §4.2):
  /// - a pattern match advances `pos` to the match end and returns the
  ///   pattern's index;
  /// - no match at a non-final `pos` emits a single raw-byte token whose id
  ///   is the byte value;
  /// - `pos` at end-of-input returns `(0, pos)`.
  pub fn lex(&mut self, input: &[u8], pos: usize) -> Token {
    if pos >= input.len() {
      return Token { id: 0, matched: false, end: pos };
    }

    let table = &self.accept_table;
    let found = simulate(&self.nfa, self.start, &input[pos..], |state| {
      let id = table[state];
      if id >= 0 {
        Some(id)
      } else {
        None
      }
    });

    match found {
      Some((len, pattern_id)) => {
        let end = pos + len;
        if Some(pattern_id as usize) == self.newline_pattern {
          self.line += 1;
          self.col = 1;
        } else {
          self.col += len as u32;
        }
        self.last_token = Some(pattern_id);
        Token { id: pattern_id, matched: true, end }
      }
      None => {
        let byte = input[pos];
        self.col += 1;
        self.last_token = Some(byte as i32);
        Token { id: byte as i32, matched: false, end: pos + 1 }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scenario_tokenizes_mixed_case_and_newline() {
    let mut lexer = Lexer::compile(&["\n", " +", "[a-z]+", "[A-Z]+"], Some(0)).unwrap();
    let input = b"abc DEF\nghi";
    let mut pos = 0;
    let mut tokens = Vec::new();
    loop {
      let tok = lexer.lex(input, pos);
      if pos == tok.end && pos >= input.len() {
        break;
      }
      tokens.push((tok.id, String::from_utf8(input[pos..tok.end].to_vec()).unwrap()));
      pos = tok.end;
      if pos >= input.len() {
        break;
      }
    }
    assert_eq!(
      tokens,
      vec![
        (2, "abc".to_string()),
        (1, " ".to_string()),
        (3, "DEF".to_string()),
        (0, "\n".to_string()),
        (2, "ghi".to_string()),
      ]
    );
    assert_eq!(lexer.line(), 2);
  }

  #[test]
  fn raw_byte_fallback_for_unmatched_input() {
    let mut lexer = Lexer::compile(&["[a-z]+"], None).unwrap();
    let tok = lexer.lex(b"1", 0);
    assert_eq!(tok.id, b'1' as i32);
    assert_eq!(tok.end, 1);
  }

  #[test]
  fn end_of_input_returns_eof_token() {
    let mut lexer = Lexer::compile(&["[a-z]+"], None).unwrap();
    let tok = lexer.lex(b"", 0);
    assert_eq!(tok.id, 0);
    assert_eq!(tok.end, 0);
  }

  #[test]
  fn reset_restores_initial_state() {
    let mut lexer = Lexer::compile(&["[a-z]+"], None).unwrap();
    lexer.lex(b"abc", 0);
    lexer.reset();
    assert_eq!(lexer.line(), 1);
    assert_eq!(lexer.col(), 1);
    assert!(!lexer.good());
  }

  #[test]
  fn tie_break_prefers_earlier_pattern_index() {
    // Both patterns accept "abc" at the same length; pattern 0 must win.
    let mut lexer = Lexer::compile(&["abc", "[a-z]+"], None).unwrap();
    let tok = lexer.lex(b"abc", 0);
    assert_eq!(tok.id, 0);
  }
}
