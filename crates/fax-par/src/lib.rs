//! fax-par - the recursive-descent, operator-precedence parser (spec.md
//! §4.2). Consumes the token stream [`fax_lex::Lexer`] produces and builds
//! the raw AST defined in [`ast`].
//!
//! The grammar has two genuinely context-sensitive ambiguities that cannot
//! be resolved with a fixed amount of lookahead: a `<` after an identifier
//! might open a type-argument list or might be the less-than operator, and
//! a `(` might open a lambda parameter list or a parenthesized/tuple
//! expression. Both are resolved the same way: push a lexer checkpoint,
//! attempt the more specific production, and either commit (pop the
//! checkpoint) or roll back (restore it) and fall through to the general
//! production. [`Parser::try_parse`] packages exactly that pattern.

pub mod ast;
pub mod expr;
pub mod items;
pub mod pattern;
pub mod stmt;
pub mod types;

use fax_lex::{Lexer, Token, TokenKind};
use fax_util::error::ParseError;
use fax_util::Span;

pub use ast::Package;

/// Result type used throughout the parser: a parse can fail with either a
/// `ParseError` of its own or a `LexError` bubbling up from the lexer, so
/// the crate works in terms of the unified `FrontendError` at every public
/// boundary.
pub type PResult<T> = fax_util::FrontendResult<T>;

/// The parser. Owns the lexer and nothing else: all grammar state lives on
/// the Rust call stack, matching the single-threaded, cooperative
/// execution model of §5.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser { lexer: Lexer::new(source) }
    }

    // -- token helpers ------------------------------------------------

    fn peek(&mut self) -> PResult<Token> {
        Ok(self.lexer.peek()?)
    }

    fn peek_kind(&mut self) -> PResult<TokenKind> {
        Ok(self.peek()?.kind)
    }

    fn bump(&mut self) -> PResult<Token> {
        Ok(self.lexer.next()?)
    }

    fn check(&mut self, kind: TokenKind) -> PResult<bool> {
        Ok(self.peek_kind()? == kind)
    }

    /// Consume and return the next token if it has kind `kind`.
    fn eat(&mut self, kind: TokenKind) -> PResult<Option<Token>> {
        if self.check(kind)? {
            Ok(Some(self.bump()?))
        } else {
            Ok(None)
        }
    }

    /// Consume the next token, failing with `ExpectedButGot` if its kind
    /// isn't `kind`.
    fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        let tok = self.peek()?;
        if tok.kind == kind {
            self.bump()
        } else {
            Err(ParseError::ExpectedButGot {
                expected: kind.to_string(),
                actual: tok.kind.to_string(),
                span: tok.span,
            }
            .into())
        }
    }

    fn unexpected(&mut self, context: &'static str) -> PResult<fax_util::FrontendError> {
        let tok = self.peek()?;
        Ok(ParseError::UnexpectedInContext {
            found: tok.kind.to_string(),
            context,
            span: tok.span,
        }
        .into())
    }

    /// Consume an identifier token and intern its lexeme.
    fn ident(&mut self) -> PResult<(fax_util::Ident, Span)> {
        let tok = self.expect(TokenKind::Ident)?;
        Ok((fax_util::Ident::intern(self.lexer.lexeme()), tok.span))
    }

    /// The lexeme of the most recently consumed token (identifiers and
    /// string literals read this).
    pub(crate) fn lexeme(&self) -> &str {
        self.lexer.lexeme()
    }

    /// The parsed integer value of the most recently consumed `IntLit`.
    pub(crate) fn int_value(&self) -> i64 {
        self.lexer.int_value()
    }

    /// The parsed character value of the most recently consumed `CharLit`.
    pub(crate) fn char_value(&self) -> char {
        self.lexer.char_value()
    }

    // -- speculative parsing -------------------------------------------

    /// Run `f` under a lexer checkpoint. On `Ok`, the checkpoint is popped
    /// (committed). On `Err`, the checkpoint is restored and the error is
    /// swallowed (the caller falls back to a different production) — use a
    /// plain call (without `try_parse`) for non-speculative parsing, where
    /// a failure should propagate instead of triggering a fallback.
    fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<Option<T>> {
        self.lexer.push_checkpoint();
        match f(self) {
            Ok(v) => {
                self.lexer.pop_checkpoint();
                Ok(Some(v))
            }
            Err(_) => {
                self.lexer.restore_checkpoint()?;
                Ok(None)
            }
        }
    }

    /// Speculatively parse `<T, U, ...>` and commit only if a closing `>`
    /// follows (§4.2: type-argument-list vs. less-than disambiguation).
    /// Returns `None`, with the lexer rolled back to just before the `<`,
    /// when the speculative parse fails or doesn't close with `>`.
    fn try_type_args(&mut self) -> PResult<Option<Vec<ast::Type>>> {
        if !self.check(TokenKind::Lt)? {
            return Ok(None);
        }
        self.try_parse(|p| {
            p.expect(TokenKind::Lt)?;
            let mut args = vec![p.parse_type()?];
            while p.eat(TokenKind::Comma)?.is_some() {
                if p.check(TokenKind::Gt)? {
                    break;
                }
                args.push(p.parse_type()?);
            }
            p.expect(TokenKind::Gt)?;
            Ok(args)
        })
    }

    /// Parse a comma-separated list bracketed by `open`/`close`, with an
    /// optional trailing comma before `close`.
    fn parse_list<T>(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        item: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        Ok(self.parse_list_spanned(open, close, item)?.0)
    }

    /// Like [`Parser::parse_list`], but also returns the closing delimiter's
    /// span, for callers whose own span must extend to the delimiter rather
    /// than stopping at the last item (e.g. a call's `App` span must cover
    /// the closing `)`, not just its last argument).
    fn parse_list_spanned<T>(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        mut item: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<(Vec<T>, Span)> {
        self.expect(open)?;
        let mut out = Vec::new();
        if !self.check(close)? {
            out.push(item(self)?);
            while self.eat(TokenKind::Comma)?.is_some() {
                if self.check(close)? {
                    break;
                }
                out.push(item(self)?);
            }
        }
        let close_tok = self.expect(close)?;
        Ok((out, close_tok.span))
    }

    // -- public entry points --------------------------------------------

    pub fn parse_type(&mut self) -> PResult<ast::Type> {
        types::parse_type(self)
    }

    pub fn parse_expr(&mut self) -> PResult<ast::Expr> {
        expr::parse_expr(self)
    }

    pub fn parse_stmt(&mut self) -> PResult<ast::Stmt> {
        stmt::parse_stmt(self)
    }

    pub fn parse_decl(&mut self) -> PResult<ast::Decl> {
        items::parse_decl(self)
    }

    /// Parse an entire source file as a package named `ident` (§6: the
    /// package identifier is supplied by the caller). Verifies EOF at the
    /// end (§4.2).
    pub fn parse_package(&mut self, ident: impl Into<String>) -> PResult<Package> {
        let pkg = items::parse_package(self, ident.into())?;
        self.expect(TokenKind::Eof)?;
        Ok(pkg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_empty_package() {
        let mut p = Parser::new("");
        let pkg = p.parse_package("root").unwrap();
        assert_eq!(pkg.ident, "root");
        assert!(pkg.body.is_empty());
    }

    #[test]
    fn rejects_trailing_garbage() {
        let mut p = Parser::new("let x = 1; )");
        assert!(p.parse_package("root").is_err());
    }
}
