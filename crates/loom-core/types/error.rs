use std::fmt;

/// Errors raised while compiling a pattern, composing a lexer, or loading and
/// building tables for a grammar (SPEC_FULL §7, §10.2). These are build-time
/// and fatal: a grammar or pattern that produces one cannot be used.
///
/// Recoverable parse-time failures are *not* a variant here — they are
/// surfaced as [`crate::types::ParseStatus::SyntaxError`] from the parser
/// drivers, per SPEC_FULL §4.4/§4.5/§6.
#[derive(Clone, Debug, thiserror::Error)]
pub enum LoomError {
  /// A regex pattern could not be compiled. `offset` is the zero-based byte
  /// offset into the pattern string at which the fault was detected.
  #[error("regex syntax error at byte {offset}: {message}")]
  Regex { offset: usize, message: String },

  /// A grammar-configuration string is malformed or inconsistent.
  #[error("grammar error at {line}:{column}: {kind}")]
  Grammar { line: u32, column: u32, kind: GrammarErrorKind },
}

/// The specific kind of grammar-configuration error, carried by
/// [`LoomError::Grammar`].
#[derive(Clone, Debug)]
pub enum GrammarErrorKind {
  /// The grammar lexer produced a token the parser did not expect.
  UnexpectedToken { found: String, expected: String },
  /// A nonterminal was given two rule bodies (`lhs : ... ;` appearing twice).
  DuplicateLhs { name: String },
  /// A rhs symbol used uppercase naming but was never declared in the token
  /// block.
  UnknownTerminal { name: String },
  /// A nonterminal appeared in some rhs but its lhs was never defined.
  UndefinedNonterminal { names: Vec<String> },
  /// A token-block or rule body was not closed (`}` `:` `;`), or a literal
  /// byte was malformed.
  MalformedSyntax { message: String },
  /// LL(1) table construction found two productions competing for the same
  /// `(nonterminal, lookahead)` cell, or two epsilon productions for one
  /// nonterminal.
  LlConflict { nonterm: String, detail: String },
  /// LR(0)/SLR table construction found two complete items in the same
  /// state, and [`crate::types::ReduceReducePolicy::Error`] was configured.
  ReduceReduceConflict { nonterm: String, detail: String },
}

impl fmt::Display for GrammarErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnexpectedToken { found, expected } => write!(f, "unexpected {found}, expected {expected}"),
      Self::DuplicateLhs { name } => write!(f, "nonterminal `{name}` is defined more than once"),
      Self::UnknownTerminal { name } => write!(f, "terminal `{name}` was not declared in the token block"),
      Self::UndefinedNonterminal { names } => write!(f, "undefined nonterminal(s): {}", names.join(", ")),
      Self::MalformedSyntax { message } => write!(f, "{message}"),
      Self::LlConflict { nonterm, detail } => write!(f, "LL(1) conflict on `{nonterm}`: {detail}"),
      Self::ReduceReduceConflict { nonterm, detail } => write!(f, "reduce/reduce conflict on `{nonterm}`: {detail}"),
    }
  }
}

/// Convenience alias used throughout the crate's build-time constructors.
pub type LoomResult<T> = Result<T, LoomError>;
