//! Flat symbol numbering (SPEC_FULL §3).
//!
//! A single integer space identifies every grammar symbol: `0` is end-of-input,
//! `[1, FIRST_TOKEN_ID)` are literal bytes, `[FIRST_TOKEN_ID, T)` are declared
//! tokens, and `[T, R)` are nonterminals. `SymbolId` is the raw flat id as it
//! appears in `G`/`RuleStart`/the parse tables; it is signed because grammar
//! loading uses negative ids as forward-reference placeholders (SPEC_FULL §4.3).

/// End-of-input symbol id.
pub const EOF: i32 = 0;

/// First id in the literal-byte range; also the count of single-byte characters
/// reserved below it (`[1, FIRST_TOKEN_ID)`).
pub const FIRST_TOKEN_ID: i32 = 128;

/// Raw flat symbol id, as stored in `G` and indexed into parse tables.
pub type SymbolId = i32;

macro_rules! indexed_id {
  ($id_type:ty) => {
    impl From<u32> for $id_type {
      fn from(value: u32) -> Self {
        Self(value)
      }
    }

    impl From<usize> for $id_type {
      fn from(value: usize) -> Self {
        Self(value as u32)
      }
    }

    impl From<$id_type> for usize {
      fn from(value: $id_type) -> Self {
        value.0 as usize
      }
    }

    impl From<$id_type> for u32 {
      fn from(value: $id_type) -> Self {
        value.0
      }
    }
  };
}

/// A single literal byte used as a grammar symbol (`'c'` in the surface syntax).
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct ByteSym(pub u8);

/// 0-based index of a declared token, in declaration order. The token's flat
/// symbol id is `FIRST_TOKEN_ID + index`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Default)]
pub struct TokenId(u32);
indexed_id!(TokenId);

/// 0-based index of a nonterminal, in declaration order. The nonterminal's flat
/// symbol id is `first_nonterm_id + index`, where `first_nonterm_id` is the
/// grammar's token count plus [FIRST_TOKEN_ID].
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Default)]
pub struct NontermId(u32);
indexed_id!(NontermId);

impl NontermId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

impl TokenId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}
