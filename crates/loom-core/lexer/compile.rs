//! Combines many patterns into one NFA with an accept table (SPEC_FULL
//! §4.2). Grounded on `examples/original_source/C++/Lexer.cpp`'s
//! `alternate`-each-pattern-in-turn composition, but closes each pattern's
//! dangling exit directly rather than the original's `pop_back` trick of
//! discarding a transient alternation-closure state — see DESIGN.md's
//! `lexer` entry for why that trick is unsafe to port literally.

use crate::{
  regex::{nfa::Fragment, nfa::Nfa, parse},
  types::LoomResult,
};

pub fn compile_patterns(patterns: &[&str]) -> LoomResult<(Nfa, usize, Vec<i32>)> {
  let mut nfa = Nfa::new();
  let mut accept_table = Vec::new();

  let mut fragments = Vec::with_capacity(patterns.len());
  for pattern in patterns {
    let frag = parse::compile_pattern(&mut nfa, pattern.as_bytes())?;
    fragments.push(frag);
  }

  // Give each pattern its own accept state and close its dangling exit into
  // it directly, so no two patterns ever share a post-accept state.
  let mut accepts = Vec::with_capacity(fragments.len());
  for (idx, frag) in fragments.iter().enumerate() {
    let accept = nfa.push();
    nfa.concatenate(frag.end, accept);
    grow_accept_table(&mut accept_table, accept, idx as i32);
    accepts.push(accept);
  }

  let start = combine_starts(&mut nfa, &fragments);

  // Any state introduced by `combine_starts` itself is a non-accepting
  // junction; pad the table out to cover the final state count.
  grow_accept_table(&mut accept_table, nfa.states.len().saturating_sub(1), -1);

  Ok((nfa, start, accept_table))
}

/// Ensures `table[state]` is addressable, filling any gap with `-1` (not an
/// accept state) before writing `id` at `state`.
fn grow_accept_table(table: &mut Vec<i32>, state: usize, id: i32) {
  if table.len() <= state {
    table.resize(state + 1, -1);
  }
  table[state] = id;
}

/// Joins every pattern's start state under one new root via epsilon edges,
/// mirroring the original's repeated pairwise `alternate` but without
/// introducing a shared exit (each pattern already has its own accept).
fn combine_starts(nfa: &mut Nfa, fragments: &[Fragment]) -> usize {
  match fragments.len() {
    0 => nfa.push(),
    1 => fragments[0].start,
    _ => {
      let mut roots = fragments.iter().map(|f| f.start).collect::<Vec<_>>();
      while roots.len() > 1 {
        let mut next = Vec::with_capacity(roots.len().div_ceil(2));
        let mut it = roots.into_iter();
        while let Some(a) = it.next() {
          match it.next() {
            Some(b) => {
              let root = nfa.push();
              nfa.states[root].epsilon1 = a as i32;
              nfa.states[root].epsilon2 = b as i32;
              next.push(root);
            }
            None => next.push(a),
          }
        }
        roots = next;
      }
      roots[0]
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn each_pattern_gets_an_independent_accept_state() {
    let (nfa, start, table) = compile_patterns(&["a", "b"]).unwrap();
    assert!(nfa.states.len() > 2);
    assert!(table.iter().any(|&id| id == 0));
    assert!(table.iter().any(|&id| id == 1));
    // The two patterns' accept states must differ.
    let accept_a = table.iter().position(|&id| id == 0).unwrap();
    let accept_b = table.iter().position(|&id| id == 1).unwrap();
    assert_ne!(accept_a, accept_b);
    let _ = start;
  }

  #[test]
  fn single_pattern_has_no_combining_junction() {
    let (_, start, _) = compile_patterns(&["abc"]).unwrap();
    // With one pattern, `start` is just that pattern's own start state.
    assert_eq!(start, 0);
  }
}
