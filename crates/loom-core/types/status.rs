/// The status returned from every `parse`/`reduce` call on either parser
/// driver (SPEC_FULL §4.4/§4.5/§6).
///
/// Unlike [`crate::types::LoomError`], this is not an error type: `SyntaxError`
/// is a recoverable outcome the host queries via `current_token`/
/// `expected_tokens`/`line`/`column`, and the engine remains reusable for a
/// fresh `parse` call afterward (SPEC_FULL §7 policy).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
  /// A reduction is pending; the host should inspect `lhs_num`/`prod_num`/
  /// `rhs_value` and call `reduce`.
  Good,
  /// Parsing failed. Query `current_token`/`expected_tokens`/`line`/`column`.
  SyntaxError,
  /// The input was fully consumed and the parse stack emptied cleanly.
  Done,
}
