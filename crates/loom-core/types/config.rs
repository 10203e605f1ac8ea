/// How the LR(0)/SLR table builder resolves a reduce/reduce conflict — two
/// complete items in the same state, neither favored by the shift-preferred
/// rule (SPEC_FULL §9(b)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReduceReducePolicy {
  /// Keep the production with the lower `prod_pos` (earlier in declaration
  /// order) and log the discarded alternative via `log::warn!`.
  #[default]
  PreferEarliestProduction,
  /// Treat a reduce/reduce conflict as a grammar-configuration error.
  Error,
}

/// Build-time configuration accepted by the LL(1) and LR(0)/SLR table
/// constructors. Controls only the open decisions left by SPEC_FULL §9; it
/// never changes the wire format of `G`/`RuleStart`/`AcceptTable`.
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
  /// How reduce/reduce conflicts are resolved during LR table construction.
  pub reduce_reduce_policy: ReduceReducePolicy,
  /// Maximum number of distinct undefined-nonterminal names collected into a
  /// single [`crate::types::GrammarErrorKind::UndefinedNonterminal`] before
  /// the list is truncated.
  pub max_placeholder_report: usize,
}

impl Default for ParserConfig {
  fn default() -> Self {
    Self { reduce_reduce_policy: ReduceReducePolicy::default(), max_placeholder_report: 16 }
  }
}

impl ParserConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_reduce_reduce_policy(mut self, policy: ReduceReducePolicy) -> Self {
    self.reduce_reduce_policy = policy;
    self
  }

  pub fn with_max_placeholder_report(mut self, max: usize) -> Self {
    self.max_placeholder_report = max;
    self
  }
}
