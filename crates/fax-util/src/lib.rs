//! fax-util - Foundation types shared by the lexer, parser, and symbol-table
//! crates: spans, string interning, typed arena indices, and the closed
//! error/diagnostic taxonomy the rest of the front-end propagates through.
//!
//! Nothing in this crate depends on the others; it exists so that `fax-lex`,
//! `fax-par`, and `fax-sem` can agree on a `Span`, an `Ident`, and a
//! `FrontendError` without importing one another.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use error::{FrontendError, FrontendResult};
pub use index_vec::{Idx, IndexVec};
pub use span::{Location, Span};
pub use symbol::Ident;
