//! Shared data types: symbol numbering, the unified error enum, parse status,
//! and build-time configuration.

mod config;
mod error;
mod ids;
mod status;

pub use config::{ParserConfig, ReduceReducePolicy};
pub use error::{GrammarErrorKind, LoomError, LoomResult};
pub use ids::{ByteSym, NontermId, SymbolId, TokenId, EOF, FIRST_TOKEN_ID};
pub use status::ParseStatus;
