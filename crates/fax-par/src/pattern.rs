//! Pattern parsing (spec.md §3): `Lit, Tuple, Ctor(name, type_args?,
//! args?), Name(name, type_args?, hint, is_mut), Wild, Or, At(name, hint,
//! is_mut, pat)`.
//!
//! A bare identifier pattern is ambiguous between a fresh binding and a
//! nullary constructor reference until the symbol table is available
//! (§4.3: `pat_rewrite`), so the parser always produces `PatKind::Name`
//! for that case and leaves the rewrite to `fax-sem`. A name immediately
//! followed by `(` is unambiguous — no binding form takes a parenthesized
//! argument list — so that one the parser commits to `PatKind::Ctor`
//! directly.

use fax_lex::TokenKind;
use fax_util::Span;

use crate::ast::{Lit, Name, Pat, PatKind, Type};
use crate::{PResult, Parser};

fn lit_pat(p: &mut Parser) -> PResult<Pat> {
    let tok = p.peek()?;
    let lit = match tok.kind {
        TokenKind::IntLit => {
            p.bump()?;
            Lit::Int(p.int_value())
        }
        TokenKind::CharLit => {
            p.bump()?;
            Lit::Char(p.char_value())
        }
        TokenKind::StringLit => {
            p.bump()?;
            Lit::String(p.lexeme().to_string())
        }
        TokenKind::True => {
            p.bump()?;
            Lit::Bool(true)
        }
        TokenKind::False => {
            p.bump()?;
            Lit::Bool(false)
        }
        _ => unreachable!("lit_pat called on a non-literal token"),
    };
    Ok(Pat { span: tok.span, kind: PatKind::Lit(lit) })
}

fn parse_pat_primary(p: &mut Parser) -> PResult<Pat> {
    let tok = p.peek()?;
    match tok.kind {
        TokenKind::Underscore => {
            p.bump()?;
            Ok(Pat { span: tok.span, kind: PatKind::Wild })
        }
        TokenKind::IntLit | TokenKind::CharLit | TokenKind::StringLit | TokenKind::True | TokenKind::False => {
            lit_pat(p)
        }
        TokenKind::LParen => {
            let start = tok.span;
            let items = p.parse_list(TokenKind::LParen, TokenKind::RParen, parse_pat)?;
            match items.len() {
                0 => Ok(Pat { span: start, kind: PatKind::Lit(Lit::Unit) }),
                1 => Ok(items.into_iter().next().expect("len == 1")),
                _ => {
                    let span = items.iter().fold(start, |s, it| s.merge(it.span));
                    Ok(Pat { span, kind: PatKind::Tuple(items) })
                }
            }
        }
        TokenKind::Mut | TokenKind::Ident => {
            let is_mut = p.eat(TokenKind::Mut)?.is_some();
            let (ident, ident_span) = p.ident()?;
            let name = Name::simple(ident, ident_span);
            let type_args = p.try_type_args()?;

            if p.check(TokenKind::LParen)? {
                let args = p.parse_list(TokenKind::LParen, TokenKind::RParen, parse_pat)?;
                let span = args.iter().fold(ident_span, |s, a| s.merge(a.span));
                return Ok(Pat { span, kind: PatKind::Ctor(name, type_args, Some(args)) });
            }

            let hint = parse_optional_hint(p)?;

            if p.eat(TokenKind::At)?.is_some() {
                let inner = parse_pat_primary(p)?;
                let span = ident_span.merge(inner.span);
                return Ok(Pat {
                    span,
                    kind: PatKind::At(ident, Box::new(hint), is_mut, Box::new(inner)),
                });
            }

            let span = hint_span(&hint, ident_span);
            Ok(Pat { span, kind: PatKind::Name(name, type_args, Box::new(hint), is_mut) })
        }
        _ => Err(p.unexpected("pattern")?),
    }
}

fn parse_optional_hint(p: &mut Parser) -> PResult<Type> {
    if p.eat(TokenKind::Colon)?.is_some() {
        p.parse_type()
    } else {
        Ok(Type::meta(Span::DUMMY))
    }
}

fn hint_span(hint: &Type, fallback: Span) -> Span {
    if hint.span == Span::DUMMY {
        fallback
    } else {
        fallback.merge(hint.span)
    }
}

/// Parse a pattern, including top-level `|`-separated alternatives
/// (`Or`), as used by `switch` case labels.
pub fn parse_pat(p: &mut Parser) -> PResult<Pat> {
    let first = parse_pat_primary(p)?;
    if !p.check(TokenKind::Pipe)? {
        return Ok(first);
    }
    let mut span = first.span;
    let mut alts = vec![first];
    while p.eat(TokenKind::Pipe)?.is_some() {
        let next = parse_pat_primary(p)?;
        span = span.merge(next.span);
        alts.push(next);
    }
    Ok(Pat { span, kind: PatKind::Or(alts) })
}
