//! Grammar Loader (SPEC_FULL §4.3): turns a grammar-configuration string and
//! its token patterns into a flat production buffer ready for table
//! construction.

pub mod load;
pub mod symtab;

pub use load::{load, load_with_config, Grammar};
