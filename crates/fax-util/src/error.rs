//! The closed error taxonomy of §7: four fatal error families, each
//! carrying a span where the source text names one, plus a unifying
//! [`FrontendError`] so a caller driving the whole pipeline can propagate a
//! single error type.
//!
//! Propagation policy (§7): every error here is fatal to the phase that
//! raised it. The only errors that do *not* reach a top-level caller are
//! ones caught locally inside a parser checkpoint region or inside
//! `pat_rewrite`'s probe of `find_expr_symbol` — those are internal control
//! flow, not reported failures, and never constructed as `FrontendError`.

use crate::span::Span;
use thiserror::Error;

/// Lexical errors (§7): tokenizing failures and lexer API misuse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    /// An input byte could not start any token: a non-ASCII byte outside a
    /// string/character literal, or an ASCII byte that starts no known
    /// token (§6).
    #[error("{span}: unexpected character {found:?}")]
    Unexpected { found: char, span: Span },

    /// A `"` literal ran to end-of-input without a closing `"`.
    #[error("{span}: unterminated string literal")]
    UnterminatedString { span: Span },

    /// A `'` literal ran to end-of-input without a closing `'`.
    #[error("{span}: unterminated character literal")]
    UnterminatedChar { span: Span },

    /// A `/* ... */` comment ran to end-of-input without a closing `*/`.
    #[error("{span}: unterminated block comment")]
    UnterminatedComment { span: Span },

    /// An escape sequence in a string or character literal used a character
    /// outside `{n t r \\ ' \" 0}`.
    #[error("{span}: bad escape sequence '\\{escape}'")]
    BadEscape { escape: char, span: Span },

    /// An integer literal's digits do not fit in `i64` (§7: "an
    /// implementation that silently wraps is non-conforming").
    #[error("{span}: integer literal overflows i64")]
    IntOverflow { span: Span },

    /// `restore_checkpoint()` was called with an empty checkpoint stack
    /// (§4.1). This is lexer API misuse by the parser, not a defect in the
    /// source text, but it is a `LexError` because it can surface from any
    /// call site the parser drives through the lexer.
    #[error("restore_checkpoint called with no saved checkpoint")]
    NoCheckpoint,
}

impl LexError {
    /// The span of the error, when the variant carries one.
    pub fn span(&self) -> Option<Span> {
        match self {
            LexError::Unexpected { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedChar { span }
            | LexError::UnterminatedComment { span }
            | LexError::BadEscape { span, .. }
            | LexError::IntOverflow { span } => Some(*span),
            LexError::NoCheckpoint => None,
        }
    }
}

/// Parse errors (§7): the parser failed at the first unexpected token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A specific token kind (or one of a small fixed set) was required but
    /// a different token was found.
    #[error("{span}: expected {expected}, found {actual}")]
    ExpectedButGot {
        expected: String,
        actual: String,
        span: Span,
    },

    /// No production in the current grammar context accepts the token
    /// found (e.g. a statement-leading token that starts no statement
    /// form).
    #[error("{span}: unexpected {found} in {context}")]
    UnexpectedInContext {
        found: String,
        context: &'static str,
        span: Span,
    },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::ExpectedButGot { span, .. } => *span,
            ParseError::UnexpectedInContext { span, .. } => *span,
        }
    }
}

/// Name resolution errors (§7), raised by the symbol table and elaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No symbol/node matched the given identifier anywhere in the search
    /// path.
    #[error("{span}: symbol not found: {path}")]
    SymbolNotFound { path: String, span: Span },

    /// More than one symbol/node matched; resolution requires an exact
    /// singleton (§4.3, `find_node`/`find_*_symbol`).
    #[error("{span}: ambiguous symbol: {path} ({count} candidates)")]
    AmbiguousSymbol {
        path: String,
        count: usize,
        span: Span,
    },

    /// A resolved symbol's kind cannot be projected to any `Type` variant
    /// (§4.4: only `Enum`/`Class`/`Typealias`/`Interface` kinds qualify).
    #[error("{span}: {path} does not name a type")]
    InvalidType { path: String, span: Span },

    /// A dotted selector mixed identifier and non-trailing integer
    /// segments, or used more than one integer segment (§4.4).
    #[error("{span}: invalid selector path")]
    InvalidSelector { span: Span },

    /// A pattern `Name` identifier resolved to something other than a
    /// constructor during `pat_rewrite`'s rewrite check, where a
    /// constructor was required by context.
    #[error("{span}: {name} does not name a constructor")]
    InvalidPatternName { name: String, span: Span },
}

impl ResolveError {
    pub fn span(&self) -> Span {
        match self {
            ResolveError::SymbolNotFound { span, .. }
            | ResolveError::AmbiguousSymbol { span, .. }
            | ResolveError::InvalidType { span, .. }
            | ResolveError::InvalidSelector { span }
            | ResolveError::InvalidPatternName { span, .. } => *span,
        }
    }
}

/// Semantic errors (§7), raised while building or rewriting the symbol
/// table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// `build_constants` tried to add a local symbol identical to one
    /// already present in the same `(node, identifier)` slot (§3: "local
    /// declarations may not introduce duplicates in the same node").
    #[error("{span}: duplicate declaration of {name}")]
    DuplicateDeclaration { name: String, span: Span },

    /// A `mut` modifier was used on a `Name` pattern that `pat_rewrite`
    /// determined names a constructor (§4.3).
    #[error("{span}: 'mut' is not allowed on a constructor pattern")]
    MutOnCtorPattern { span: Span },

    /// A non-`Meta` type hint was used on a `Name` pattern that
    /// `pat_rewrite` determined names a constructor (§4.3).
    #[error("{span}: a type hint is not allowed on a constructor pattern")]
    HintOnCtorPattern { span: Span },
}

impl SemanticError {
    pub fn span(&self) -> Span {
        match self {
            SemanticError::DuplicateDeclaration { span, .. }
            | SemanticError::MutOnCtorPattern { span }
            | SemanticError::HintOnCtorPattern { span } => *span,
        }
    }
}

/// The union of every error family the front-end can raise, returned by
/// the top-level pipeline entry point (`fax_sem::elaborate_package`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrontendError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl FrontendError {
    /// The span of the error, when one is available (`LexError::NoCheckpoint`
    /// carries none).
    pub fn span(&self) -> Option<Span> {
        match self {
            FrontendError::Lex(e) => e.span(),
            FrontendError::Parse(e) => Some(e.span()),
            FrontendError::Resolve(e) => Some(e.span()),
            FrontendError::Semantic(e) => Some(e.span()),
        }
    }
}

pub type LexResult<T> = std::result::Result<T, LexError>;
pub type ParseResult<T> = std::result::Result<T, ParseError>;
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
pub type SemanticResult<T> = std::result::Result<T, SemanticError>;
pub type FrontendResult<T> = std::result::Result<T, FrontendError>;
