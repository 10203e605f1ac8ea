//! LR(0)/SLR table construction and driver (SPEC_FULL §4.5), grounded on
//! `examples/original_source/C++/LRHelper.h`/`.cpp` and `LRParser.h`/`.cpp`.

use std::collections::{HashMap, HashSet};

use super::TokenStream;
use crate::{
  grammar::Grammar,
  lexer::Lexer,
  parser::table::Table,
  types::{GrammarErrorKind, LoomError, LoomResult, ParseStatus, ParserConfig, ReduceReducePolicy},
};

/// Sentinel `prod_pos` for the synthetic "goal" item `S' -> start_symbol .`,
/// which never appears in `grammar.g`. Augmenting with this single extra
/// item — rather than closing over the grammar's own (possibly recursive)
/// start production directly — keeps "this state accepts" a property of one
/// unique item instead of something that has to survive closure expanding
/// the start symbol's real productions alongside it.
const AUGMENTED: i32 = -1;

/// One LR item: the production starting at `prod_pos`, with the dot before
/// `rhs[dot_pos]` (or past the end, for a complete item). `lhs` is carried
/// alongside so a completed item can be reduced without re-deriving which
/// nonterminal it belongs to. The single augmented item (`prod_pos ==
/// AUGMENTED`) is the only one ever marked `is_start`; its completion means
/// accept rather than reduce.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
struct Item {
  prod_pos: i32,
  dot_pos: i32,
  lhs: i32,
  is_start: bool,
}

/// Symbol immediately after the dot, if any.
fn symbol_after_dot(grammar: &Grammar, item: &Item) -> Option<i32> {
  if item.prod_pos == AUGMENTED {
    return if item.dot_pos == 0 { Some(grammar.start_symbol) } else { None };
  }
  grammar.production_rhs(item.prod_pos as usize).get(item.dot_pos as usize).copied()
}

fn is_complete(grammar: &Grammar, item: &Item) -> bool {
  symbol_after_dot(grammar, item).is_none()
}

/// Expands `kernel` into the full item set for a state: every item reachable
/// by repeatedly adding, for each item whose symbol-after-dot is a
/// nonterminal `B` not yet expanded in this state, one dot-at-0 item per
/// production of `B` (SPEC_FULL §4.5's closure step).
fn close(grammar: &Grammar, kernel: &[Item]) -> Vec<Item> {
  let mut items = kernel.to_vec();
  let mut closed = HashSet::new();
  let mut i = 0;
  while i < items.len() {
    let item = items[i];
    i += 1;
    if let Some(sym) = symbol_after_dot(grammar, &item) {
      if !grammar.is_terminal(sym) && closed.insert(sym) {
        for (pos, _, _) in grammar.productions(sym) {
          items.push(Item { prod_pos: pos as i32, dot_pos: 0, lhs: sym, is_start: false });
        }
      }
    }
  }
  items
}

fn normalize(mut kernel: Vec<Item>) -> Vec<Item> {
  kernel.sort();
  kernel.dedup();
  kernel
}

fn find_prod_num(grammar: &Grammar, lhs: i32, prod_pos: i32) -> i32 {
  let mut count = 0;
  let mut pos = grammar.rule_start_of(lhs);
  while pos < prod_pos as usize {
    pos = grammar.next_production(pos);
    count += 1;
  }
  count
}

/// Per-state reduction metadata: the production to reduce by, its lhs
/// nonterminal id, and its 0-based position among that nonterminal's
/// productions. `None` for a state with no recorded reduce (either no
/// complete item, or the only complete item is the accept item).
type Reduction = Option<(i32, i32, i32)>;

/// Builds the ACTION/GOTO table (SPEC_FULL §4.5): one combined `Table` whose
/// columns span every symbol id `0..grammar.rule_num` (terminals, byte
/// literals and nonterminals alike), cells `-1` none, `-2` reduce, `-3`
/// accept, `>= 0` shift-or-goto to that state.
fn build_tables(grammar: &Grammar, config: &ParserConfig) -> LoomResult<(Table, Vec<Reduction>)> {
  let start_kernel = vec![Item { prod_pos: AUGMENTED, dot_pos: 0, lhs: AUGMENTED, is_start: true }];

  let mut kernels: Vec<Vec<Item>> = vec![normalize(start_kernel)];
  let mut table = Table::new(1, grammar.rule_num as usize, -1);
  let mut reductions: Vec<Reduction> = vec![None];

  let mut state = 0;
  while state < kernels.len() {
    let items = close(grammar, &kernels[state]);

    let mut by_symbol: HashMap<i32, Vec<Item>> = HashMap::new();
    for item in &items {
      if let Some(sym) = symbol_after_dot(grammar, item) {
        by_symbol.entry(sym).or_default().push(Item { prod_pos: item.prod_pos, dot_pos: item.dot_pos + 1, lhs: item.lhs, is_start: item.is_start });
      }
    }
    for (sym, advanced) in by_symbol {
      let normalized = normalize(advanced);
      let target = kernels.iter().position(|k| *k == normalized).unwrap_or_else(|| {
        kernels.push(normalized);
        table.push_row(-1);
        reductions.push(None);
        kernels.len() - 1
      });
      table.set(state, sym as usize, target as i32);
      log::trace!("state {state} --{sym}--> {target}");
    }

    let completed: Vec<&Item> = items.iter().filter(|item| is_complete(grammar, item)).collect();
    if let Some(&first) = completed.first() {
      let mut chosen = *first;
      for &item in &completed[1..] {
        if item.prod_pos == chosen.prod_pos {
          continue;
        }
        match config.reduce_reduce_policy {
          ReduceReducePolicy::PreferEarliestProduction => {
            let kept = chosen.prod_pos.min(item.prod_pos);
            let dropped = chosen.prod_pos.max(item.prod_pos);
            log::warn!("reduce/reduce conflict in state {state} between productions at {kept} and {dropped}; keeping {kept}");
            if item.prod_pos < chosen.prod_pos {
              chosen = *item;
            }
          }
          ReduceReducePolicy::Error => {
            let name_index = (chosen.lhs - grammar.token_num) as usize;
            return Err(LoomError::Grammar {
              line: 0,
              column: 0,
              kind: GrammarErrorKind::ReduceReduceConflict {
                nonterm: grammar.nonterm_names[name_index].clone(),
                detail: format!("productions at {} and {} both reduce in state {state}", chosen.prod_pos, item.prod_pos),
              },
            });
          }
        }
      }
      let fill_value = if chosen.is_start { -3 } else { -2 };
      table.fill_row_where(state, -1, fill_value);
      if !chosen.is_start {
        reductions[state] = Some((chosen.prod_pos, chosen.lhs, find_prod_num(grammar, chosen.lhs, chosen.prod_pos)));
      }
    }

    state += 1;
  }

  log::debug!("built LR(0) table with {} state(s)", kernels.len());
  Ok((table, reductions))
}

/// A grammar compiled into an LR(0)/SLR shift-reduce table, plus the session
/// state for one parse (SPEC_FULL §4.5). `V` is the value type the host
/// attaches to completed reductions.
pub struct LrParser<'g, V> {
  grammar: &'g Grammar,
  lexer: Lexer,
  table: Table,
  reductions: Vec<Reduction>,

  stream: Option<TokenStream<'g>>,
  state_stack: Vec<usize>,
  value_stack: Vec<ParseValue<V>>,
  cur_token: i32,
  expected_symbol: i32,
  cur_lhs: i32,
  cur_prod_num: i32,
  cur_symbol_count: i32,
}

/// A value on the parser's value stack: either the raw lexeme of a shifted
/// terminal, or a value the host supplied via [`LrParser::reduce`].
#[derive(Clone, Debug)]
pub enum ParseValue<V> {
  Token(Vec<u8>),
  Reduced(V),
}

impl<'g, V> LrParser<'g, V> {
  /// Builds the LR(0)/SLR table for `grammar`. `lexer` tokenizes input for
  /// [`parse`](Self::parse) and should be built from the same patterns the
  /// grammar's token block declared.
  pub fn new(grammar: &'g Grammar, lexer: Lexer) -> LoomResult<Self> {
    Self::with_config(grammar, lexer, &ParserConfig::default())
  }

  /// As [`new`](Self::new), but with explicit reduce/reduce conflict policy
  /// (SPEC_FULL §9(b)).
  pub fn with_config(grammar: &'g Grammar, lexer: Lexer, config: &ParserConfig) -> LoomResult<Self> {
    let (table, reductions) = build_tables(grammar, config)?;
    Ok(Self {
      grammar,
      lexer,
      table,
      reductions,
      stream: None,
      state_stack: Vec::new(),
      value_stack: Vec::new(),
      cur_token: -1,
      expected_symbol: -1,
      cur_lhs: -1,
      cur_prod_num: -1,
      cur_symbol_count: -1,
    })
  }

  /// Resets session state and begins parsing `input` (SPEC_FULL §4.5).
  pub fn parse(&mut self, input: &[u8]) -> ParseStatus {
    self.value_stack.clear();
    self.state_stack.clear();
    self.state_stack.push(0);
    let mut stream = TokenStream::new(self.lexer.clone(), self.grammar, input);
    self.cur_token = stream.advance();
    self.stream = Some(stream);
    self.shift_helper()
  }

  /// Completes the pending reduction with `value`, pops the production's
  /// rhs off both stacks, follows GOTO back on, and resumes shifting
  /// (SPEC_FULL §4.5).
  pub fn reduce(&mut self, value: V) -> ParseStatus {
    let k = self.cur_symbol_count as usize;
    self.state_stack.truncate(self.state_stack.len() - k);
    let base = self.value_stack.len() - k;
    self.value_stack.truncate(base);
    self.value_stack.push(ParseValue::Reduced(value));
    let top_state = *self.state_stack.last().unwrap();
    let goto_state = self.table.get(top_state, self.cur_lhs as usize);
    self.state_stack.push(goto_state as usize);
    self.shift_helper()
  }

  fn shift_helper(&mut self) -> ParseStatus {
    loop {
      let top_state = *self.state_stack.last().unwrap();
      let action = self.table.get(top_state, self.cur_token as usize);
      if action >= 0 {
        self.state_stack.push(action as usize);
        let lexeme = self.stream.as_ref().unwrap().lexeme().to_vec();
        self.value_stack.push(ParseValue::Token(lexeme));
        self.cur_token = self.stream.as_mut().unwrap().advance();
        continue;
      }
      if action == -2 {
        let (prod_pos, lhs, prod_num) = self.reductions[top_state].expect("reduce action implies a recorded reduction");
        self.cur_lhs = lhs;
        self.cur_prod_num = prod_num;
        self.cur_symbol_count = self.grammar.g[prod_pos as usize];
        return ParseStatus::Good;
      }
      if action == -3 {
        if self.cur_token == 0 {
          return ParseStatus::Done;
        }
        self.expected_symbol = 0;
        return ParseStatus::SyntaxError;
      }
      self.expected_symbol = -1;
      return ParseStatus::SyntaxError;
    }
  }

  pub fn lhs_num(&self) -> usize {
    (self.cur_lhs - self.grammar.token_num) as usize
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

  /// Every terminal the current state can shift on, per SPEC_FULL §4.5's
  /// "every `t` with `ACTION[top-state, t] >= 0`" (restricted to the
  /// terminal column range; GOTO columns are not tokens a host can supply).
  pub fn expected_tokens(&self) -> Vec<i32> {
    if self.expected_symbol == 0 {
      return vec![0];
    }
    let top_state = *self.state_stack.last().unwrap();
    (0..self.grammar.token_num).filter(|&t| self.table.get(top_state, t as usize) >= 0).collect()
  }

  pub fn line(&self) -> u32 {
    self.stream.as_ref().map(|s| s.line()).unwrap_or(1)
  }

  pub fn column(&self) -> u32 {
    self.stream.as_ref().map(|s| s.col()).unwrap_or(1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar;

  fn build<'g>(grammar: &'g Grammar) -> LrParser<'g, String> {
    let lexer = Lexer::compile(&["[0-9]+", " +"], None).unwrap();
    LrParser::new(grammar, lexer).unwrap()
  }

  /// SPEC_FULL §8 scenario 5: accepts `"1+1"` with reductions `(t,0) (e,1)
  /// (t,0) (e,0)` in this crate's 0-based, per-nonterminal declaration-order
  /// numbering (e is nonterminal index 0, t is index 1).
  #[test]
  fn scenario_sum_expression_accepts_with_expected_reductions() {
    let grammar = grammar::load(&["NUM", "plus"], "{ NUM * }\ne : e '+' t | t ;\nt : NUM ;").unwrap();
    let mut parser = build(&grammar);
    let mut status = parser.parse(b"1+1");
    let mut reductions = Vec::new();
    loop {
      match status {
        ParseStatus::Good => {
          reductions.push((parser.lhs_num(), parser.prod_num()));
          status = parser.reduce(String::new());
        }
        ParseStatus::Done => break,
        ParseStatus::SyntaxError => panic!("unexpected syntax error at {}:{}", parser.line(), parser.column()),
      }
    }
    assert_eq!(reductions, vec![(1, 0), (0, 1), (1, 0), (0, 0)]);
  }

  /// SPEC_FULL §8 scenario 6: `"1+"` fails at EOF expecting `NUM`.
  #[test]
  fn scenario_sum_expression_rejects_trailing_operator() {
    let grammar = grammar::load(&["NUM", "plus"], "{ NUM * }\ne : e '+' t | t ;\nt : NUM ;").unwrap();
    let mut parser = build(&grammar);
    let mut status = parser.parse(b"1+");
    while status == ParseStatus::Good {
      status = parser.reduce(String::new());
    }
    assert_eq!(status, ParseStatus::SyntaxError);
    assert_eq!(parser.expected_tokens(), vec![128]);
  }

  #[test]
  fn reduce_reduce_conflict_errors_when_configured() {
    // Both `a :` and `b :` complete on the same lookahead with no shift to
    // prefer between them.
    let grammar = grammar::load(&[], "s : a | b ; a : 'x' ; b : 'x' ;").unwrap();
    let lexer = Lexer::compile(&["x"], None).unwrap();
    let config = ParserConfig::new().with_reduce_reduce_policy(ReduceReducePolicy::Error);
    let err = LrParser::<()>::with_config(&grammar, lexer, &config);
    assert!(matches!(err, Err(LoomError::Grammar { kind: GrammarErrorKind::ReduceReduceConflict { .. }, .. })));
  }

  #[test]
  fn reduce_reduce_conflict_prefers_earliest_by_default() {
    let grammar = grammar::load(&[], "s : a | b ; a : 'x' ; b : 'x' ;").unwrap();
    let lexer = Lexer::compile(&["x"], None).unwrap();
    assert!(LrParser::<()>::new(&grammar, lexer).is_ok());
  }

  #[test]
  fn kernel_set_equality_dedups_states() {
    // state4's shift-on-NUM item `{t -> NUM ., dot 1}` is structurally
    // identical to state3's kernel and must reuse it rather than spawn a
    // duplicate state.
    let grammar = grammar::load(&["NUM", "plus"], "{ NUM * }\ne : e '+' t | t ;\nt : NUM ;").unwrap();
    let lexer = Lexer::compile(&["[0-9]+", " +"], None).unwrap();
    let (table, _) = build_tables(&grammar, &ParserConfig::default()).unwrap();
    assert_eq!(table.rows(), 6);
    let _ = lexer;
  }
}
