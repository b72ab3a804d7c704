//! Declaration parsing (spec.md §4.2): attribute*-prefixed,
//! access-modifier-prefixed `module, open, class, enum, typealias,
//! interface, extension, let, func, init, ctor`.
//!
//! Classes/enums/interfaces/extensions share a generics-plus-`where`
//! prefix and a `{ DECL* }` body (or a bare `;` forward declaration);
//! [`parse_generics`]/[`parse_where`]/[`merge_where`] and
//! [`parse_classlike_body`] factor that shared shape out so each variant's
//! branch in [`parse_decl`] only spells out what's actually different.

use fax_lex::TokenKind;
use fax_util::Ident;

use crate::ast::{
    Access, ClassLike, Decl, DeclKind, ExtensionDecl, FuncDecl, GenericParam, InitDecl, Param, Package, WhereBound,
};
use crate::expr::parse_block;
use crate::pattern::parse_pat;
use crate::stmt::{parse_attrs, parse_import};
use crate::{PResult, Parser};

fn parse_access(p: &mut Parser) -> PResult<Access> {
    if p.eat(TokenKind::Private)?.is_some() {
        Ok(Access::Private)
    } else if p.eat(TokenKind::Protected)?.is_some() {
        Ok(Access::Protected)
    } else {
        Ok(Access::Public)
    }
}

/// `<T: Bound + ..., U, ...>`, absent entirely when there is no `<`.
pub(crate) fn parse_generics(p: &mut Parser) -> PResult<Vec<GenericParam>> {
    if !p.check(TokenKind::Lt)? {
        return Ok(Vec::new());
    }
    p.expect(TokenKind::Lt)?;
    let mut out = Vec::new();
    loop {
        let (name, span) = p.ident()?;
        let mut bounds = Vec::new();
        if p.eat(TokenKind::Colon)?.is_some() {
            bounds.push(p.parse_type()?);
            while p.eat(TokenKind::Plus)?.is_some() {
                bounds.push(p.parse_type()?);
            }
        }
        out.push(GenericParam { name, span, bounds });
        if p.eat(TokenKind::Comma)?.is_none() {
            break;
        }
        if p.check(TokenKind::Gt)? {
            break;
        }
    }
    p.expect(TokenKind::Gt)?;
    Ok(out)
}

/// `where T: Bound + ..., ...`, absent entirely when there is no `where`.
fn parse_where(p: &mut Parser) -> PResult<Vec<WhereBound>> {
    if p.eat(TokenKind::Where)?.is_none() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    loop {
        let ty = p.parse_type()?;
        p.expect(TokenKind::Colon)?;
        let mut bounds = vec![p.parse_type()?];
        while p.eat(TokenKind::Plus)?.is_some() {
            bounds.push(p.parse_type()?);
        }
        out.push(WhereBound { ty, bounds });
        if p.eat(TokenKind::Comma)?.is_none() {
            break;
        }
    }
    Ok(out)
}

/// Fold a `where` clause's bounds into the matching `<...>` generic
/// parameter by name (§4.2: "bounds from both are merged into one list").
/// A `where` bound naming something other than one of `generics` is
/// dropped — it constrains an associated/outer type, not a parameter of
/// this declaration.
fn merge_where(generics: &mut [GenericParam], wheres: Vec<WhereBound>) {
    use crate::ast::TypeKind;
    for wb in wheres {
        if let TypeKind::Name(name, None) = &wb.ty.kind {
            if name.path.is_empty() {
                if let Some(gp) = generics.iter_mut().find(|gp| gp.name == name.ident) {
                    gp.bounds.extend(wb.bounds);
                }
            }
        }
    }
}

pub(crate) fn parse_params(p: &mut Parser) -> PResult<Vec<Param>> {
    p.parse_list(TokenKind::LParen, TokenKind::RParen, |p| {
        let (name, span) = p.ident()?;
        p.expect(TokenKind::Colon)?;
        let ty = p.parse_type()?;
        let span = span.merge(ty.span);
        Ok(Param { name, ty, span })
    })
}

/// A `{ DECL* }` body, or `;` for a forward declaration with no members.
fn parse_classlike_body(p: &mut Parser) -> PResult<Vec<Decl>> {
    if p.eat(TokenKind::Semi)?.is_some() {
        return Ok(Vec::new());
    }
    p.expect(TokenKind::LBrace)?;
    let mut decls = Vec::new();
    while !p.check(TokenKind::RBrace)? {
        decls.push(parse_decl(p)?);
    }
    p.expect(TokenKind::RBrace)?;
    Ok(decls)
}

fn parse_classlike(p: &mut Parser) -> PResult<ClassLike> {
    let (name, _) = p.ident()?;
    let mut generics = parse_generics(p)?;
    let wheres = parse_where(p)?;
    merge_where(&mut generics, wheres);
    let body = parse_classlike_body(p)?;
    Ok(ClassLike { name, generics, body })
}

/// An item-level `func`: unlike a local one (`crate::stmt`), this form
/// carries its own generics/`where` clause and may close with `;` instead
/// of a body.
fn parse_func_decl(p: &mut Parser) -> PResult<FuncDecl> {
    p.expect(TokenKind::Func)?;
    let (name, _) = p.ident()?;
    let mut generics = parse_generics(p)?;
    let params = parse_params(p)?;
    let ret = if p.eat(TokenKind::Arrow)?.is_some() { Some(p.parse_type()?) } else { None };
    let wheres = parse_where(p)?;
    merge_where(&mut generics, wheres);
    let body = if p.check(TokenKind::LBrace)? {
        Some(parse_block(p)?)
    } else {
        p.expect(TokenKind::Semi)?;
        None
    };
    Ok(FuncDecl { name, generics, params, ret, body })
}

/// `init`, named or anonymous (§4.3: an anonymous one is assigned
/// `init%N` by the table builder, not here).
fn parse_init_decl(p: &mut Parser) -> PResult<InitDecl> {
    p.expect(TokenKind::Init)?;
    let name = if p.check(TokenKind::Ident)? { Some(p.ident()?.0) } else { None };
    let params = parse_params(p)?;
    let body = if p.check(TokenKind::LBrace)? {
        Some(parse_block(p)?)
    } else {
        p.expect(TokenKind::Semi)?;
        None
    };
    Ok(InitDecl { name, params, body })
}

/// `case Name(Type*)` inside an enum body. Unlike the other declaration
/// forms, a ctor has no trailing `;` (§8, example 1: `case A case B(Int)`
/// written back-to-back with no separator).
fn parse_ctor(p: &mut Parser) -> PResult<(Ident, Vec<crate::ast::Type>)> {
    p.expect(TokenKind::Case)?;
    let (name, _) = p.ident()?;
    let params = if p.check(TokenKind::LParen)? {
        p.parse_list(TokenKind::LParen, TokenKind::RParen, |p| p.parse_type())?
    } else {
        Vec::new()
    };
    Ok((name, params))
}

pub fn parse_decl(p: &mut Parser) -> PResult<Decl> {
    let attrs = parse_attrs(p)?;
    let start = p.peek()?.span;
    let access = parse_access(p)?;

    let (kind, end) = match p.peek_kind()? {
        TokenKind::Module => {
            p.bump()?;
            let (name, _) = p.ident()?;
            let body = parse_classlike_body(p)?;
            let end = body.last().map(|d| d.span).unwrap_or(start);
            (DeclKind::Module(name, body), end)
        }
        TokenKind::Open => {
            p.bump()?;
            let import = parse_import(p)?;
            let end = p.expect(TokenKind::Semi)?.span;
            (DeclKind::Open(import), end)
        }
        TokenKind::Class => {
            p.bump()?;
            let cl = parse_classlike(p)?;
            let end = cl.body.last().map(|d| d.span).unwrap_or(start);
            (DeclKind::Class(cl), end)
        }
        TokenKind::Enum => {
            p.bump()?;
            let cl = parse_classlike(p)?;
            let end = cl.body.last().map(|d| d.span).unwrap_or(start);
            (DeclKind::Enum(cl), end)
        }
        TokenKind::Interface => {
            p.bump()?;
            let cl = parse_classlike(p)?;
            let end = cl.body.last().map(|d| d.span).unwrap_or(start);
            (DeclKind::Interface(cl), end)
        }
        TokenKind::Type => {
            p.bump()?;
            let (name, _) = p.ident()?;
            let generics = parse_generics(p)?;
            p.expect(TokenKind::Eq)?;
            let ty = p.parse_type()?;
            let end = p.expect(TokenKind::Semi)?.span;
            (DeclKind::Typealias { name, generics, ty }, end)
        }
        TokenKind::Extension => {
            p.bump()?;
            let mut generics = parse_generics(p)?;
            let target = p.parse_type()?;
            let mut interfaces = Vec::new();
            if p.eat(TokenKind::Colon)?.is_some() {
                interfaces.push(p.parse_type()?);
                while p.eat(TokenKind::Plus)?.is_some() {
                    interfaces.push(p.parse_type()?);
                }
            }
            let wheres = parse_where(p)?;
            merge_where(&mut generics, wheres);
            let body = parse_classlike_body(p)?;
            let end = body.last().map(|d| d.span).unwrap_or(target.span);
            (DeclKind::Extension(ExtensionDecl { ident: None, generics, target, interfaces, body }), end)
        }
        TokenKind::Let => {
            p.bump()?;
            let pat = parse_pat(p)?;
            p.expect(TokenKind::Eq)?;
            let expr = crate::expr::parse_expr(p)?;
            let end = p.expect(TokenKind::Semi)?.span;
            (DeclKind::Let { pat, expr }, end)
        }
        TokenKind::Func => {
            let fd = parse_func_decl(p)?;
            let end = fd.body.as_ref().and_then(|b| b.last()).map(|s| s.span).unwrap_or(start);
            (DeclKind::Func(fd), end)
        }
        TokenKind::Init => {
            let id = parse_init_decl(p)?;
            let end = id.body.as_ref().and_then(|b| b.last()).map(|s| s.span).unwrap_or(start);
            (DeclKind::Init(id), end)
        }
        TokenKind::Case => {
            let (name, params) = parse_ctor(p)?;
            let end = params.last().map(|t| t.span).unwrap_or(start);
            (DeclKind::Ctor { name, params }, end)
        }
        _ => return Err(p.unexpected("declaration")?),
    };

    Ok(Decl { span: start.merge(end), attrs, access, kind })
}

/// A whole source file: a leading run of `open` imports (the package
/// `header`, §3) followed by the declaration body, through EOF.
pub fn parse_package(p: &mut Parser, ident: String) -> PResult<Package> {
    let mut header = Vec::new();
    while p.check(TokenKind::Open)? {
        p.bump()?;
        let import = parse_import(p)?;
        p.expect(TokenKind::Semi)?;
        header.push(import);
    }
    let mut body = Vec::new();
    while !p.check(TokenKind::Eof)? {
        body.push(parse_decl(p)?);
    }
    Ok(Package { ident, header, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DeclKind;

    fn decl(src: &str) -> Decl {
        let mut p = Parser::new(src);
        parse_decl(&mut p).unwrap()
    }

    #[test]
    fn parses_module_with_nested_class_and_enum() {
        match decl("module M { class C { } enum E { case A case B(Int) } }").kind {
            DeclKind::Module(_, body) => {
                assert_eq!(body.len(), 2);
                assert!(matches!(body[0].kind, DeclKind::Class(_)));
                match &body[1].kind {
                    DeclKind::Enum(cl) => assert_eq!(cl.body.len(), 2),
                    _ => panic!("expected Enum"),
                }
            }
            _ => panic!("expected Module"),
        }
    }

    #[test]
    fn parses_generic_enum_with_ctors() {
        match decl("enum Option<T> { case None case Some(T) }").kind {
            DeclKind::Enum(cl) => {
                assert_eq!(cl.generics.len(), 1);
                assert_eq!(cl.body.len(), 2);
            }
            _ => panic!("expected Enum"),
        }
    }

    #[test]
    fn parses_private_access() {
        let d = decl("private class C { }");
        assert_eq!(d.access, Access::Private);
    }

    #[test]
    fn parses_extension_with_bounds_and_where() {
        match decl("extension <T> Box<T>: Show where T: Eq { }").kind {
            DeclKind::Extension(ext) => {
                assert_eq!(ext.generics.len(), 1);
                assert_eq!(ext.generics[0].bounds.len(), 1);
                assert_eq!(ext.interfaces.len(), 1);
            }
            _ => panic!("expected Extension"),
        }
    }

    #[test]
    fn parses_anonymous_init() {
        match decl("init(x: Int) { }").kind {
            DeclKind::Init(id) => assert!(id.name.is_none()),
            _ => panic!("expected Init"),
        }
    }

    #[test]
    fn forward_declared_class_has_empty_body() {
        match decl("class Opaque;").kind {
            DeclKind::Class(cl) => assert!(cl.body.is_empty()),
            _ => panic!("expected Class"),
        }
    }
}
