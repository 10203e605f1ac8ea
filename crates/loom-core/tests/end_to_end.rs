//! Cross-module scenario coverage (SPEC_FULL §8, §10.5), exercising the
//! public API the way `*-test` crates in this lineage separate end-to-end
//! scenarios from each module's own `#[cfg(test)]` unit tests.

use loom_core::{grammar, Grammar, Lexer, LlParser, LrParser, ParseStatus, Regex};

/// Scenario 1: `a(b|c)*d`.
#[test]
fn regex_scenario() {
  let re = Regex::compile("a(b|c)*d").unwrap();
  assert_eq!(re.find_match(b"ad"), Some(2));
  assert_eq!(re.find_match(b"abbcd"), Some(5));
  assert_eq!(re.find_match(b"aXd"), None);
  assert_eq!(re.search(b"xxad"), Some(2));
}

/// Scenario 2: mixed-case words plus a newline-marked pattern.
#[test]
fn lexer_scenario() {
  let mut lexer = Lexer::compile(&["\n", " +", "[a-z]+", "[A-Z]+"], Some(0)).unwrap();
  let input = b"abc DEF\nghi";
  let mut pos = 0;
  let mut tokens = Vec::new();
  loop {
    let tok = lexer.lex(input, pos);
    if pos == tok.end {
      break;
    }
    tokens.push((tok.id, String::from_utf8(input[pos..tok.end].to_vec()).unwrap()));
    pos = tok.end;
  }
  assert_eq!(
    tokens,
    vec![(2, "abc".to_string()), (1, " ".to_string()), (3, "DEF".to_string()), (0, "\n".to_string()), (2, "ghi".to_string())]
  );
  assert_eq!(lexer.line(), 2);
}

fn sum_grammar(start_first: bool) -> Grammar {
  if start_first {
    grammar::load(&["NUM", "plus"], "{ NUM * }\ne : e '+' t | t ;\nt : NUM ;").unwrap()
  } else {
    grammar::load(&["NUM", "plus"], "{ NUM * }\ne : t ep ;\nep : '+' t ep | ;\nt : NUM ;").unwrap()
  }
}

/// Scenario 3: left-recursive LL(1) grammar is rejected as a conflict, since
/// both alternatives of `e` would write the same `Table[e, NUM]` cell.
#[test]
fn ll_left_recursion_is_rejected_as_a_conflict() {
  let grammar = sum_grammar(true);
  let lexer = Lexer::compile(&["[0-9]+", " +"], None).unwrap();
  assert!(LlParser::<()>::new(&grammar, lexer).is_err());
}

/// Scenario 4: the right-recursive rewrite of the same language accepts
/// `"1+1+1"` under LL(1), reducing `t` three times, `e` once, and `ep` some
/// number of times including exactly one epsilon production.
#[test]
fn ll_right_recursive_sum_accepts_with_expected_reduction_shape() {
  let grammar = sum_grammar(false);
  let lexer = Lexer::compile(&["[0-9]+", " +"], None).unwrap();
  let mut parser = LlParser::new(&grammar, lexer).unwrap();
  let mut status = parser.parse(b"1+1+1");
  let mut reductions = Vec::new();
  loop {
    match status {
      ParseStatus::Good => {
        reductions.push((parser.lhs_num(), parser.prod_num()));
        status = parser.reduce(());
      }
      ParseStatus::Done => break,
      ParseStatus::SyntaxError => panic!("unexpected syntax error at {}:{}", parser.line(), parser.column()),
    }
  }
  let e_idx = 0;
  let ep_idx = 1;
  let t_idx = 2;
  assert_eq!(reductions.last(), Some(&(e_idx, 0)));
  assert_eq!(reductions.iter().filter(|&&r| r.0 == t_idx).count(), 3);
  assert!(reductions.iter().filter(|&&r| r.0 == t_idx).all(|&r| r.1 == 0));
  let ep_reductions: Vec<_> = reductions.iter().filter(|&&r| r.0 == ep_idx).collect();
  assert_eq!(ep_reductions.iter().filter(|&&&r| r.1 == 1).count(), 1, "exactly one epsilon reduction for ep");
  assert!(!ep_reductions.is_empty());
}

/// Scenario 5: LR(0)/SLR accepts `"1+1"` with reductions `(t,0) (e,1) (t,0)
/// (e,0)` (0-based, per-nonterminal declaration order: `e` is index 0, `t` is
/// index 1).
#[test]
fn lr_sum_expression_accepts_with_expected_reductions() {
  let grammar = sum_grammar(true);
  let lexer = Lexer::compile(&["[0-9]+", " +"], None).unwrap();
  let mut parser = LrParser::new(&grammar, lexer).unwrap();
  let mut status = parser.parse(b"1+1");
  let mut reductions = Vec::new();
  loop {
    match status {
      ParseStatus::Good => {
        reductions.push((parser.lhs_num(), parser.prod_num()));
        status = parser.reduce(());
      }
      ParseStatus::Done => break,
      ParseStatus::SyntaxError => panic!("unexpected syntax error at {}:{}", parser.line(), parser.column()),
    }
  }
  assert_eq!(reductions, vec![(1, 0), (0, 1), (1, 0), (0, 0)]);
}

/// Scenario 6: a dangling `"1+"` fails at end-of-input, expecting `NUM`.
#[test]
fn lr_sum_expression_rejects_trailing_operator() {
  let grammar = sum_grammar(true);
  let lexer = Lexer::compile(&["[0-9]+", " +"], None).unwrap();
  let mut parser = LrParser::new(&grammar, lexer).unwrap();
  let mut status = parser.parse(b"1+");
  while status == ParseStatus::Good {
    status = parser.reduce(());
  }
  assert_eq!(status, ParseStatus::SyntaxError);
  assert_eq!(parser.expected_tokens(), vec![128]);
}
