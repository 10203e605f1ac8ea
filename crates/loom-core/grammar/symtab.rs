//! Name resolution for grammar loading (SPEC_FULL §4.3), grounded on
//! `examples/original_source/C++/BaseParserGenerator.cpp`'s `symbolTable` /
//! `symbolNumber` / `replaceSymbol` trio.

use std::collections::HashMap;

/// Maps terminal/nonterminal names to flat symbol ids while a grammar is
/// being loaded. A nonterminal referenced on some rhs before its own `lhs :`
/// line is recorded under a negative placeholder id; [`SymbolTable::resolve`]
/// later rewrites every placeholder once the real id is known.
#[derive(Default)]
pub struct SymbolTable {
  names: HashMap<String, i32>,
  next_placeholder: i32,
}

impl SymbolTable {
  pub fn new() -> Self {
    Self { names: HashMap::new(), next_placeholder: -1 }
  }

  /// The id bound to `name`, or `None` if it has never been seen.
  pub fn get(&self, name: &str) -> Option<i32> {
    self.names.get(name).copied()
  }

  /// Binds `name` to `id` outright, overwriting any placeholder.
  pub fn bind(&mut self, name: &str, id: i32) {
    self.names.insert(name.to_string(), id);
  }

  /// Returns `name`'s id, minting a fresh negative placeholder and binding it
  /// if `name` has not been seen (SPEC_FULL §4.3's forward-reference rule for
  /// nonterminals used before their own `lhs :` line).
  pub fn placeholder_for(&mut self, name: &str) -> i32 {
    if let Some(&id) = self.names.get(name) {
      return id;
    }
    let id = self.next_placeholder;
    self.next_placeholder -= 1;
    self.names.insert(name.to_string(), id);
    id
  }

  /// Every name still bound to a negative id once grammar loading finishes —
  /// nonterminals that were referenced but never defined.
  pub fn unresolved(&self) -> Vec<String> {
    self.names.iter().filter(|(_, &id)| id < 0).map(|(name, _)| name.clone()).collect()
  }
}

/// Rewrites every occurrence of `old` in `grammar` to `new`, in place
/// (mirrors `GrammarParser::replaceSymbol`).
pub fn replace_symbol(grammar: &mut [i32], old: i32, new: i32) {
  for slot in grammar.iter_mut() {
    if *slot == old {
      *slot = new;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn placeholder_is_negative_and_stable() {
    let mut table = SymbolTable::new();
    let a = table.placeholder_for("expr");
    let b = table.placeholder_for("expr");
    assert_eq!(a, b);
    assert!(a < 0);
  }

  #[test]
  fn bind_overwrites_placeholder() {
    let mut table = SymbolTable::new();
    let placeholder = table.placeholder_for("expr");
    table.bind("expr", 130);
    assert_eq!(table.get("expr"), Some(130));
    assert_ne!(table.get("expr"), Some(placeholder));
  }

  #[test]
  fn replace_symbol_rewrites_every_match() {
    let mut grammar = vec![1, -1, 2, -1, -1];
    replace_symbol(&mut grammar, -1, 130);
    assert_eq!(grammar, vec![1, 130, 2, 130, 130]);
  }

  #[test]
  fn unresolved_lists_only_negative_bindings() {
    let mut table = SymbolTable::new();
    table.placeholder_for("expr");
    table.bind("stmt", 129);
    assert_eq!(table.unresolved(), vec!["expr".to_string()]);
  }
}
