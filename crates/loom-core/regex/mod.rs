//! Regex/NFA Engine (SPEC_FULL §4.1): compiles a single pattern into an NFA
//! and simulates it with maximal munch.

pub mod nfa;
pub(crate) mod parse;
pub(crate) mod sim;

use nfa::Nfa;
use crate::types::LoomResult;

/// A compiled regular expression. Immutable once built; `match`/`search`
/// simulate the underlying NFA (SPEC_FULL §4.1).
#[derive(Clone, Debug)]
pub struct Regex {
  nfa: Nfa,
  start: usize,
  accepting: usize,
}

impl Regex {
  /// Compiles `pattern` (see SPEC_FULL §4.1/§6 for syntax) into an NFA.
  pub fn compile(pattern: &str) -> LoomResult<Self> {
    let mut nfa = Nfa::new();
    let frag = parse::compile_pattern(&mut nfa, pattern.as_bytes())?;
    let accepting = nfa.push();
    nfa.concatenate(frag.end, accepting);
    log::debug!("compiled pattern `{pattern}` into {} states", nfa.states.len());
    Ok(Self { nfa, start: frag.start, accepting })
  }

  /// Returns the length of the longest prefix of `s` accepted by the
  /// pattern, or `None` if no prefix matches.
  pub fn find_match(&self, s: &[u8]) -> Option<usize> {
    let accepting = self.accepting;
    sim::simulate(&self.nfa, self.start, s, |st| if st == accepting { Some(0) } else { None }).map(|(end, _)| end)
  }

  /// Returns the smallest offset `i` such that `find_match(&s[i..])`
  /// succeeds, or `None` if no offset matches.
  pub fn search(&self, s: &[u8]) -> Option<usize> {
    for i in 0..=s.len() {
      if self.find_match(&s[i..]).is_some() {
        return Some(i);
      }
    }
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scenario_a_b_or_c_star_d() {
    let re = Regex::compile("a(b|c)*d").unwrap();
    assert_eq!(re.find_match(b"ad"), Some(2));
    assert_eq!(re.find_match(b"abbcd"), Some(5));
    assert_eq!(re.find_match(b"aXd"), None);
    assert_eq!(re.search(b"xxad"), Some(2));
  }

  #[test]
  fn maximal_munch_prefers_longest() {
    let re = Regex::compile("a+").unwrap();
    assert_eq!(re.find_match(b"aaab"), Some(3));
  }

  #[test]
  fn optional_and_wildcard() {
    let re = Regex::compile("ab?.").unwrap();
    assert_eq!(re.find_match(b"ac"), Some(2));
    assert_eq!(re.find_match(b"abc"), Some(3));
    assert_eq!(re.find_match(b"a\n"), None);
  }

  #[test]
  fn character_class_and_escapes() {
    let re = Regex::compile(r"\d+").unwrap();
    assert_eq!(re.find_match(b"123abc"), Some(3));
    let re = Regex::compile(r"\s").unwrap();
    assert_eq!(re.find_match(b" "), Some(1));
  }

  #[test]
  fn no_match_returns_none() {
    let re = Regex::compile("xyz").unwrap();
    assert_eq!(re.find_match(b"abc"), None);
    assert_eq!(re.search(b"abc"), None);
  }

  #[test]
  fn matches_starting_on_a_continuation_byte_offset() {
    let re = Regex::compile(".d").unwrap();
    let s = "é".as_bytes();
    let mut input = s.to_vec();
    input.push(b'd');
    assert_eq!(re.search(&input), Some(1));
  }
}
