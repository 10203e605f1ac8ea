//! Compiles a grammar-configuration string (SPEC_FULL §4.3, §6) into a flat
//! production buffer, grounded on
//! `examples/original_source/C++/BaseParserGenerator.cpp`'s `GrammarParser`.

use super::symtab::{replace_symbol, SymbolTable};
use crate::{
  lexer::Lexer,
  types::{GrammarErrorKind, LoomError, LoomResult, ParserConfig, FIRST_TOKEN_ID},
};

const NEWLINE: i32 = 0;
const SPACES: i32 = 1;
const NTRML: i32 = 2;
const TRML: i32 = 3;
const LBRAC: i32 = 4;
const RBRAC: i32 = 5;
const CHR: i32 = 6;
const COLON: i32 = 7;
const PIPE: i32 = 8;
const SCOLON: i32 = 9;
const STAR: i32 = 10;

/// Not a grammar-lexer pattern id: marks "ran off the end of the config
/// string", distinct from every pattern index above.
const CONFIG_EOF: i32 = -1;

const GRAMMAR_LEXER_PATTERNS: [&str; 11] = ["\n", " +", "[a-z]+", "[A-Z]+", "{", "}", "'.'", ":", "\\|", ";", "\\*"];

/// A loaded grammar's flat representation (SPEC_FULL §3, §4.3).
#[derive(Clone, Debug)]
pub struct Grammar {
  /// Production buffer: `len, rhs[0..len]` segments back to back.
  pub g: Vec<i32>,
  /// `rule_start[i]` is the offset into `g` where nonterminal `token_num + i`'s
  /// productions begin; padded with a trailing sentinel equal to `g.len()`.
  pub rule_start: Vec<usize>,
  /// `token_ignore[i]` is `true` if the token at index `i` is discarded by a
  /// parser driver rather than shifted.
  pub token_ignore: Vec<bool>,
  /// Declared token names, empty string for an unnamed (`*`) slot.
  pub token_names: Vec<String>,
  /// Nonterminal names, in declaration order (index 0 is the start symbol).
  pub nonterm_names: Vec<String>,
  /// First id in the nonterminal range; also the grammar's token count plus
  /// [`FIRST_TOKEN_ID`].
  pub token_num: i32,
  /// One past the last valid nonterminal id.
  pub rule_num: i32,
  pub start_symbol: i32,
}

impl Grammar {
  pub fn is_terminal(&self, symbol: i32) -> bool {
    symbol < self.token_num
  }

  /// Offset into `g` where `nonterm`'s productions begin.
  pub fn rule_start_of(&self, nonterm: i32) -> usize {
    self.rule_start[(nonterm - self.token_num) as usize]
  }

  /// Offset of the production immediately following the one starting at `pos`.
  pub fn next_production(&self, pos: usize) -> usize {
    pos + 1 + self.g[pos] as usize
  }

  /// The rhs symbols of the production starting at `pos`.
  pub fn production_rhs(&self, pos: usize) -> &[i32] {
    &self.g[pos + 1..pos + 1 + self.g[pos] as usize]
  }

  pub fn nonterm_count(&self) -> usize {
    (self.rule_num - self.token_num) as usize
  }

  /// Iterates `nonterm`'s productions as `(start_pos, rhs, production_index)`.
  pub fn productions(&self, nonterm: i32) -> Productions<'_> {
    let start = self.rule_start_of(nonterm);
    let end = self.rule_start[(nonterm - self.token_num) as usize + 1];
    Productions { grammar: self, pos: start, end, index: 0 }
  }
}

pub struct Productions<'g> {
  grammar: &'g Grammar,
  pos: usize,
  end: usize,
  index: usize,
}

impl<'g> Iterator for Productions<'g> {
  type Item = (usize, &'g [i32], usize);

  fn next(&mut self) -> Option<Self::Item> {
    if self.pos >= self.end {
      return None;
    }
    let pos = self.pos;
    let rhs = self.grammar.production_rhs(pos);
    let index = self.index;
    self.pos = self.grammar.next_production(pos);
    self.index += 1;
    Some((pos, rhs, index))
  }
}

/// Loads a grammar from `config` (SPEC_FULL §6's `grammar` surface syntax).
/// `token_patterns` supplies one regex per declared terminal slot, in
/// declaration order — the grammar text itself names the slots but carries
/// no patterns, mirroring the original's split between a grammar string and
/// a caller-built `Lexer`.
pub fn load(token_patterns: &[&str], source: &str) -> LoomResult<Grammar> {
  load_with_config(token_patterns, source, &ParserConfig::default())
}

/// As [`load`], but honors `config.max_placeholder_report` when reporting an
/// undefined-nonterminal error (SPEC_FULL §9(b)).
pub fn load_with_config(token_patterns: &[&str], source: &str, config: &ParserConfig) -> LoomResult<Grammar> {
  let mut loader = Loader::new(source)?;
  loader.advance();
  loader.parse_tokens(token_patterns)?;
  loader.parse_rules()?;
  loader.finish(config)
}

struct Loader<'a> {
  lexer: Lexer,
  input: &'a [u8],
  pos: usize,
  tok_id: i32,
  tok_start: usize,
  tok_end: usize,

  symtab: SymbolTable,
  token_names: Vec<String>,
  token_ignore: Vec<bool>,
  g: Vec<i32>,
  rule_start: Vec<usize>,
  nonterm_names: Vec<String>,
  token_num: i32,
  next_rule_num: i32,
  start_symbol: Option<i32>,
}

impl<'a> Loader<'a> {
  fn new(config: &'a str) -> LoomResult<Self> {
    let lexer = Lexer::compile(&GRAMMAR_LEXER_PATTERNS, Some(NEWLINE as usize))
      .expect("the grammar loader's own fixed pattern set always compiles");
    Ok(Self {
      lexer,
      input: config.as_bytes(),
      pos: 0,
      tok_id: CONFIG_EOF,
      tok_start: 0,
      tok_end: 0,
      symtab: SymbolTable::new(),
      token_names: Vec::new(),
      token_ignore: Vec::new(),
      g: Vec::new(),
      rule_start: Vec::new(),
      nonterm_names: Vec::new(),
      token_num: 0,
      next_rule_num: 0,
      start_symbol: None,
    })
  }

  fn advance(&mut self) {
    loop {
      if self.pos >= self.input.len() {
        self.tok_id = CONFIG_EOF;
        self.tok_start = self.pos;
        self.tok_end = self.pos;
        return;
      }
      let start = self.pos;
      let tok = self.lexer.lex(self.input, self.pos);
      self.pos = tok.end;
      if tok.id == NEWLINE || tok.id == SPACES {
        continue;
      }
      self.tok_id = tok.id;
      self.tok_start = start;
      self.tok_end = tok.end;
      return;
    }
  }

  fn text(&self) -> &str {
    std::str::from_utf8(&self.input[self.tok_start..self.tok_end]).unwrap_or("")
  }

  fn line(&self) -> u32 {
    self.lexer.line()
  }

  fn col(&self) -> u32 {
    self.lexer.col()
  }

  fn gtoken_name(id: i32) -> &'static str {
    match id {
      NEWLINE => "newline",
      SPACES => "spaces",
      NTRML => "a nonterminal name",
      TRML => "a terminal name",
      LBRAC => "'{'",
      RBRAC => "'}'",
      CHR => "a character literal",
      COLON => "':'",
      PIPE => "'|'",
      SCOLON => "';'",
      STAR => "'*'",
      CONFIG_EOF => "end of input",
      _ => "an unrecognized character",
    }
  }

  fn unexpected(&self, expected: i32) -> LoomError {
    LoomError::Grammar {
      line: self.line(),
      column: self.col(),
      kind: GrammarErrorKind::UnexpectedToken {
        found: Self::gtoken_name(self.tok_id).to_string(),
        expected: Self::gtoken_name(expected).to_string(),
      },
    }
  }

  fn expect(&mut self, expected: i32) -> LoomResult<()> {
    self.advance();
    if self.tok_id != expected {
      return Err(self.unexpected(expected));
    }
    Ok(())
  }

  fn malformed(&self, message: impl Into<String>) -> LoomError {
    LoomError::Grammar { line: self.line(), column: self.col(), kind: GrammarErrorKind::MalformedSyntax { message: message.into() } }
  }

  /// Parses the optional `{ NAME1 * NAME2 … }` token block, binding each
  /// named slot to its flat id and pairing it with `token_patterns[i]`.
  /// Assumes `self.tok_id` already holds the config's first token; leaves it
  /// positioned at the first rule's `NTRML` (or `CONFIG_EOF`) on return.
  fn parse_tokens(&mut self, token_patterns: &[&str]) -> LoomResult<()> {
    if self.tok_id != LBRAC {
      self.token_num = FIRST_TOKEN_ID;
      return Ok(());
    }
    loop {
      self.advance();
      if self.tok_id == TRML {
        let name = self.text().to_string();
        let id = FIRST_TOKEN_ID + self.token_names.len() as i32;
        self.symtab.bind(&name, id);
        self.token_names.push(name);
        self.token_ignore.push(false);
      } else if self.tok_id == STAR {
        self.token_names.push(String::new());
        self.token_ignore.push(true);
      } else {
        break;
      }
    }
    if self.tok_id != RBRAC {
      return Err(self.unexpected(RBRAC));
    }
    if token_patterns.len() != self.token_names.len() {
      return Err(self.malformed(format!(
        "token block declares {} slot(s) but {} pattern(s) were supplied",
        self.token_names.len(),
        token_patterns.len()
      )));
    }
    self.token_num = FIRST_TOKEN_ID + self.token_names.len() as i32;
    self.advance();
    Ok(())
  }

  /// Assumes `self.tok_id` already holds the first rule's `NTRML`.
  fn parse_rules(&mut self) -> LoomResult<()> {
    loop {
      self.parse_rule()?;
      self.advance();
      if self.tok_id == CONFIG_EOF {
        break;
      }
    }
    Ok(())
  }

  fn parse_rule(&mut self) -> LoomResult<()> {
    if self.tok_id != NTRML {
      return Err(self.unexpected(NTRML));
    }
    let lhs_name = self.text().to_string();

    match self.symtab.get(&lhs_name) {
      Some(id) if id < 0 => {
        let rn = self.rule_num();
        replace_symbol(&mut self.g, id, rn);
      }
      Some(id) if id >= self.token_num => {
        return Err(LoomError::Grammar {
          line: self.line(),
          column: self.col(),
          kind: GrammarErrorKind::DuplicateLhs { name: lhs_name },
        });
      }
      _ => {}
    }

    self.rule_start.push(self.g.len());
    self.symtab.bind(&lhs_name, self.rule_num());
    self.nonterm_names.push(lhs_name);
    if self.start_symbol.is_none() {
      self.start_symbol = Some(self.rule_num());
    }

    self.expect(COLON)?;
    loop {
      self.parse_production()?;
      if self.tok_id != PIPE {
        break;
      }
    }
    if self.tok_id != SCOLON {
      return Err(self.unexpected(SCOLON));
    }
    self.next_rule_num += 1;
    Ok(())
  }

  fn rule_num(&self) -> i32 {
    self.token_num + self.next_rule_num
  }

  fn parse_production(&mut self) -> LoomResult<()> {
    self.g.push(0);
    let count_index = self.g.len() - 1;
    loop {
      self.advance();
      if self.tok_id == CHR {
        let text = self.text();
        let byte = *text.as_bytes().get(1).ok_or_else(|| self.malformed("malformed character literal"))?;
        self.g.push(byte as i32);
      } else if self.tok_id == TRML {
        let name = self.text().to_string();
        match self.symtab.get(&name) {
          Some(id) => self.g.push(id),
          None => return Err(LoomError::Grammar { line: self.line(), column: self.col(), kind: GrammarErrorKind::UnknownTerminal { name } }),
        }
      } else if self.tok_id == NTRML {
        let name = self.text().to_string();
        let id = self.symtab.placeholder_for(&name);
        self.g.push(id);
      } else {
        return Ok(());
      }
      self.g[count_index] += 1;
    }
  }

  fn finish(mut self, config: &ParserConfig) -> LoomResult<Grammar> {
    let mut unresolved = self.symtab.unresolved();
    if !unresolved.is_empty() {
      unresolved.sort();
      unresolved.truncate(config.max_placeholder_report);
      return Err(LoomError::Grammar { line: self.line(), column: self.col(), kind: GrammarErrorKind::UndefinedNonterminal { names: unresolved } });
    }
    self.rule_start.push(self.g.len());
    let rule_num = self.rule_num();
    let start_symbol = self.start_symbol.ok_or_else(|| self.malformed("grammar has no rules"))?;
    log::debug!("loaded grammar: {} token(s), {} nonterminal(s)", self.token_names.len(), self.nonterm_names.len());
    Ok(Grammar {
      g: self.g,
      rule_start: self.rule_start,
      token_ignore: self.token_ignore,
      token_names: self.token_names,
      nonterm_names: self.nonterm_names,
      token_num: self.token_num,
      rule_num,
      start_symbol,
    })
  }
}
