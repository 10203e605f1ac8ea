//! LL(1) table construction and driver (SPEC_FULL §4.4), grounded on
//! `examples/original_source/C++/LLParser.h`/`.cpp`.

use std::collections::HashSet;

use super::TokenStream;
use crate::{
  grammar::Grammar,
  lexer::Lexer,
  parser::table::Table,
  types::{GrammarErrorKind, LoomError, LoomResult, ParseStatus},
};

/// Sentinel for "not yet visited" in `derives_epsilon`, distinct from the
/// "does not derive epsilon" sentinel (`-1`) and from any real production
/// position (`>= 0`).
const UNSEEN: i32 = -2;
const NO_EPSILON: i32 = -1;

/// A value on the parser's value stack: either the raw lexeme of a shifted
/// terminal, or a value the host supplied via [`LlParser::reduce`].
#[derive(Clone, Debug)]
pub enum ParseValue<V> {
  Token(Vec<u8>),
  Reduced(V),
}

/// A grammar compiled into an LL(1) parse table, plus the session state for
/// one parse (SPEC_FULL §4.4). `V` is the value type the host attaches to
/// completed reductions.
pub struct LlParser<'g, V> {
  grammar: &'g Grammar,
  lexer: Lexer,
  table: Table,
  derives_epsilon: Vec<i32>,

  stream: Option<TokenStream<'g>>,
  symbol_stack: Vec<i32>,
  value_stack: Vec<ParseValue<V>>,
  cur_token: i32,
  expected_symbol: i32,
  cur_lhs: i32,
  cur_prod_num: i32,
  cur_symbol_count: i32,
}

impl<'g, V> LlParser<'g, V> {
  /// Builds the LL(1) table for `grammar`. `lexer` tokenizes input for
  /// [`parse`](Self::parse) and should be built from the same patterns the
  /// grammar's token block declared.
  pub fn new(grammar: &'g Grammar, lexer: Lexer) -> LoomResult<Self> {
    let nonterm_count = grammar.nonterm_count();
    let mut parser = Self {
      grammar,
      lexer,
      table: Table::new(nonterm_count, grammar.token_num as usize, -1),
      derives_epsilon: vec![UNSEEN; nonterm_count],
      stream: None,
      symbol_stack: Vec::new(),
      value_stack: Vec::new(),
      cur_token: -1,
      expected_symbol: 0,
      cur_lhs: -1,
      cur_prod_num: -1,
      cur_symbol_count: -1,
    };
    for lhs_index in 0..nonterm_count {
      let mut first_set = HashSet::new();
      parser.populate_table(lhs_index, &mut first_set)?;
    }
    log::debug!("built LL(1) table for {} nonterminal(s)", nonterm_count);
    Ok(parser)
  }

  fn conflict(&self, lhs_index: usize, detail: String) -> LoomError {
    LoomError::Grammar {
      line: 0,
      column: 0,
      kind: GrammarErrorKind::LlConflict { nonterm: self.grammar.nonterm_names[lhs_index].clone(), detail },
    }
  }

  fn set_cell(&mut self, lhs_index: usize, symbol: i32, pos: usize) -> LoomResult<()> {
    let existing = self.table.get(lhs_index, symbol as usize);
    if existing >= 0 && existing as usize != pos {
      return Err(self.conflict(lhs_index, format!("two productions both start with lookahead symbol {symbol}")));
    }
    self.table.set(lhs_index, symbol as usize, pos as i32);
    Ok(())
  }

  /// Mirrors `LLParser::populateTable`: computes `FIRST(A)` for nonterterminal
  /// `lhs_index` by recursive DFS, filling the table along the way, with an
  /// explicit conflict check the original draft did not perform (SPEC_FULL
  /// §4.4: "Writing the same `Table[A, t]` twice is also a conflict").
  fn populate_table(&mut self, lhs_index: usize, first_set: &mut HashSet<i32>) -> LoomResult<()> {
    if self.derives_epsilon[lhs_index] != UNSEEN {
      return Ok(());
    }
    self.derives_epsilon[lhs_index] = NO_EPSILON;

    let lhs_symbol = self.grammar.token_num + lhs_index as i32;
    let mut pos = self.grammar.rule_start_of(lhs_symbol);
    let end = self.grammar.rule_start[lhs_index + 1];
    while pos < end {
      let rhs = self.grammar.production_rhs(pos).to_vec();
      let mut descendant_set = HashSet::new();
      let mut fully_nullable = true;
      for &front_symbol in &rhs {
        if self.grammar.is_terminal(front_symbol) {
          self.set_cell(lhs_index, front_symbol, pos)?;
          first_set.insert(front_symbol);
          fully_nullable = false;
          break;
        }
        let front_index = (front_symbol - self.grammar.token_num) as usize;
        if front_index == lhs_index {
          return Err(self.conflict(
            lhs_index,
            "left recursion: the nonterminal is its own leftmost non-nullable symbol, so FIRST cannot be \
             computed without already knowing it"
              .to_string(),
          ));
        }
        self.populate_table(front_index, &mut descendant_set)?;
        if self.derives_epsilon[front_index] < 0 {
          fully_nullable = false;
          break;
        }
      }
      for &symbol in &descendant_set {
        first_set.insert(symbol);
        self.set_cell(lhs_index, symbol, pos)?;
      }
      if fully_nullable {
        if self.derives_epsilon[lhs_index] >= 0 {
          return Err(self.conflict(lhs_index, "more than one production derives the empty string".to_string()));
        }
        self.derives_epsilon[lhs_index] = pos as i32;
      }
      pos = self.grammar.next_production(pos);
    }
    Ok(())
  }

  /// Resets session state and begins parsing `input` (SPEC_FULL §4.4).
  pub fn parse(&mut self, input: &[u8]) -> ParseStatus {
    self.value_stack.clear();
    self.symbol_stack.clear();
    self.symbol_stack.push(self.grammar.start_symbol);
    let mut stream = TokenStream::new(self.lexer.clone(), self.grammar, input);
    self.cur_token = stream.advance();
    self.stream = Some(stream);
    self.shift_helper()
  }

  /// Completes the pending reduction with `value` and resumes shifting
  /// (SPEC_FULL §4.4).
  pub fn reduce(&mut self, value: V) -> ParseStatus {
    if self.symbol_stack.is_empty() {
      return self.at_end();
    }
    self.symbol_stack.pop();
    let base = self.value_stack.len() - self.cur_symbol_count as usize;
    self.value_stack.truncate(base);
    self.value_stack.push(ParseValue::Reduced(value));
    self.shift_helper()
  }

  fn at_end(&mut self) -> ParseStatus {
    if self.cur_token == 0 {
      ParseStatus::Done
    } else {
      self.expected_symbol = 0;
      ParseStatus::SyntaxError
    }
  }

  fn shift_helper(&mut self) -> ParseStatus {
    if self.symbol_stack.is_empty() {
      return self.at_end();
    }
    while self.symbol_stack.last().copied().unwrap_or(0) > 0 {
      let symbol = self.symbol_stack.pop().unwrap();
      if self.grammar.is_terminal(symbol) {
        if symbol == self.cur_token {
          let lexeme = self.stream.as_ref().unwrap().lexeme().to_vec();
          self.value_stack.push(ParseValue::Token(lexeme));
          self.cur_token = self.stream.as_mut().unwrap().advance();
        } else {
          self.expected_symbol = symbol;
          return ParseStatus::SyntaxError;
        }
      } else {
        let lhs_index = (symbol - self.grammar.token_num) as usize;
        let mut production_pos = self.table.get(lhs_index, self.cur_token as usize);
        if production_pos < 0 {
          if self.derives_epsilon[lhs_index] > NO_EPSILON {
            production_pos = self.derives_epsilon[lhs_index];
          } else {
            self.expected_symbol = symbol;
            return ParseStatus::SyntaxError;
          }
        }
        self.symbol_stack.push(-production_pos);
        for &s in self.grammar.production_rhs(production_pos as usize).iter().rev() {
          self.symbol_stack.push(s);
        }
      }
    }
    if self.symbol_stack.is_empty() {
      return self.at_end();
    }
    self.update_reduction_info(-*self.symbol_stack.last().unwrap());
    ParseStatus::Good
  }

  fn update_reduction_info(&mut self, prod_pos: i32) {
    let prod_pos = prod_pos as usize;
    self.cur_symbol_count = self.grammar.g[prod_pos];
    let mut lhs_index = 0;
    for (i, &start) in self.grammar.rule_start.iter().enumerate() {
      if start > prod_pos {
        lhs_index = i - 1;
        break;
      }
    }
    self.cur_lhs = lhs_index as i32;
    let mut prod_num = 0;
    let mut j = self.grammar.rule_start[lhs_index];
    while j < prod_pos {
      j = self.grammar.next_production(j);
      prod_num += 1;
    }
    self.cur_prod_num = prod_num;
  }

  pub fn lhs_num(&self) -> usize {
    self.cur_lhs as usize
  }

  pub fn prod_num(&self) -> usize {
    self.cur_prod_num as usize
  }

  pub fn rhs_value(&self, pos: usize) -> &ParseValue<V> {
    let base = self.value_stack.len() - self.cur_symbol_count as usize;
    &self.value_stack[base + pos]
  }

  pub fn current_token(&self) -> i32 {
    self.cur_token
  }

  pub fn expected_tokens(&self) -> Vec<i32> {
    if self.grammar.is_terminal(self.expected_symbol) {
      return vec![self.expected_symbol];
    }
    let lhs_index = (self.expected_symbol - self.grammar.token_num) as usize;
    (0..self.grammar.token_num).filter(|&t| self.table.get(lhs_index, t as usize) >= 0).collect()
  }

  pub fn line(&self) -> u32 {
    self.stream.as_ref().map(|s| s.line()).unwrap_or(1)
  }

  pub fn column(&self) -> u32 {
    self.stream.as_ref().map(|s| s.col()).unwrap_or(1)
  }
}
