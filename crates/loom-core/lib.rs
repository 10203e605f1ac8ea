//! A parser-generator toolkit: a Thompson-construction regex/NFA engine, a
//! multi-pattern lexer built on top of it, a YACC-like grammar-configuration
//! loader, and two table-driven parser engines (LL(1) predictive and
//! LR(0)/SLR shift-reduce) that consume the loaded grammar.
//!
//! The four pieces compose bottom-up: [`regex`] underlies [`lexer`],
//! [`grammar::load`] produces the flat production buffer both
//! [`parser::LlParser`] and [`parser::LrParser`] build their tables from, and
//! a lexer built from the same token patterns drives either engine's input.

pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod regex;
pub mod types;

pub use grammar::{load, load_with_config, Grammar};
pub use lexer::{Lexer, Token};
pub use parser::{LlParser, LrParser};
pub use regex::Regex;
pub use types::{GrammarErrorKind, LoomError, LoomResult, ParseStatus, ParserConfig, ReduceReducePolicy};
