//! fax-lex - the front-end's lexer: a checkpointable tokenizer over UTF-8
//! source text.
//!
//! The lexer is pull-based (the parser drives it via [`Lexer::peek`] /
//! [`Lexer::next`]) and supports nested speculative lookahead through
//! [`Lexer::push_checkpoint`] / [`Lexer::pop_checkpoint`] /
//! [`Lexer::restore_checkpoint`], which the parser uses to disambiguate
//! type-argument lists from `<` and lambda patterns from tuple expressions.

pub mod keyword;
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};
