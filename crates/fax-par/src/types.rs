//! Type parsing (spec.md §3, §4.2): `Meta, Int, Bool, Char, String, Unit,
//! Name(name, type_args?), Tuple([...]), Arrow(inputs, output)`.
//!
//! `Meta` has no surface syntax of its own — it is the value callers
//! substitute for a missing `: Type` annotation — so `parse_type` never
//! produces it; see [`crate::ast::Type::meta`].

use fax_lex::TokenKind;

use crate::ast::{Name, Type, TypeKind};
use crate::{PResult, Parser};

/// Parse a single dotted type name: `A`, `A.B.C`, each with its own
/// optional `<...>` type-argument list living on the innermost `Type::Name`
/// node (the dotted segments themselves never carry arguments — only the
/// type as a whole does, per §3's `Name(name, type_args?)` shape).
fn parse_name(p: &mut Parser) -> PResult<Name> {
    let (ident, mut span) = p.ident()?;
    let mut path = Vec::new();
    while p.eat(TokenKind::Dot)?.is_some() {
        let (seg, seg_span) = p.ident()?;
        path.push(seg);
        span = span.merge(seg_span);
    }
    Ok(Name { span, ident, path })
}

pub fn parse_type(p: &mut Parser) -> PResult<Type> {
    let tok = p.peek()?;
    match tok.kind {
        TokenKind::KwInt => {
            p.bump()?;
            Ok(Type { span: tok.span, kind: TypeKind::Int })
        }
        TokenKind::KwBool => {
            p.bump()?;
            Ok(Type { span: tok.span, kind: TypeKind::Bool })
        }
        TokenKind::KwChar => {
            p.bump()?;
            Ok(Type { span: tok.span, kind: TypeKind::Char })
        }
        TokenKind::KwString => {
            p.bump()?;
            Ok(Type { span: tok.span, kind: TypeKind::String })
        }
        TokenKind::Ident => {
            let name = parse_name(p)?;
            let span_start = name.span;
            let args = p.try_type_args()?;
            let span = match &args {
                Some(a) => a.last().map(|t| span_start.merge(t.span)).unwrap_or(span_start),
                None => span_start,
            };
            Ok(Type { span, kind: TypeKind::Name(name, args) })
        }
        TokenKind::LParen => {
            let start = tok.span;
            let items = p.parse_list(TokenKind::LParen, TokenKind::RParen, parse_type)?;
            if p.eat(TokenKind::Arrow)?.is_some() {
                let ret = parse_type(p)?;
                let span = start.merge(ret.span);
                return Ok(Type { span, kind: TypeKind::Arrow(items, Box::new(ret)) });
            }
            match items.len() {
                0 => Ok(Type { span: start, kind: TypeKind::Unit }),
                1 => Ok(items.into_iter().next().expect("len == 1")),
                _ => {
                    let span = items.iter().fold(start, |s, t| s.merge(t.span));
                    Ok(Type { span, kind: TypeKind::Tuple(items) })
                }
            }
        }
        _ => Err(p.unexpected("type")?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(src: &str) -> Type {
        let mut p = Parser::new(src);
        parse_type(&mut p).unwrap()
    }

    #[test]
    fn parses_builtin_types() {
        assert!(matches!(ty("Int").kind, TypeKind::Int));
        assert!(matches!(ty("String").kind, TypeKind::String));
    }

    #[test]
    fn parses_unit_and_tuple() {
        assert!(matches!(ty("()").kind, TypeKind::Unit));
        assert!(matches!(ty("(Int, Bool)").kind, TypeKind::Tuple(v) if v.len() == 2));
    }

    #[test]
    fn parenthesized_single_type_is_not_a_tuple() {
        assert!(matches!(ty("(Int)").kind, TypeKind::Int));
    }

    #[test]
    fn parses_generic_name() {
        let t = ty("Option<Int>");
        match t.kind {
            TypeKind::Name(name, Some(args)) => {
                assert_eq!(args.len(), 1);
                assert!(name.path.is_empty());
            }
            _ => panic!("expected generic Name"),
        }
    }

    #[test]
    fn parses_dotted_name() {
        let t = ty("A.B.C");
        match t.kind {
            TypeKind::Name(name, None) => assert_eq!(name.path.len(), 2),
            _ => panic!("expected dotted Name"),
        }
    }

    #[test]
    fn parses_arrow_type() {
        let t = ty("(Int, Int) -> Bool");
        match t.kind {
            TypeKind::Arrow(inputs, ret) => {
                assert_eq!(inputs.len(), 2);
                assert!(matches!(ret.kind, TypeKind::Bool));
            }
            _ => panic!("expected Arrow"),
        }
    }
}
