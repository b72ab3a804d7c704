//! Statement parsing (spec.md §4.2): attribute*-prefixed, one of
//! `open IMPORT;`, `let PAT = EXPR (else BLOCK)?;`, `let PAT <- EXPR;`
//! (bind), `func IDENT(PARAM*) (-> TYPE)? BLOCK`, or an expression
//! terminated by `;` (statement) or a following `}` (trailing block value).

use fax_lex::TokenKind;

use crate::ast::{Expr, FuncDecl, Import, ImportKind, Stmt, StmtKind};
use crate::expr::{parse_block, parse_expr};
use crate::pattern::parse_pat;
use crate::{PResult, Parser};

/// `@expr` annotations, zero or more, attached to the statement or
/// declaration that follows them (Glossary: "Attribute").
pub fn parse_attrs(p: &mut Parser) -> PResult<Vec<Expr>> {
    let mut attrs = Vec::new();
    while p.eat(TokenKind::At)?.is_some() {
        attrs.push(parse_expr(p)?);
    }
    Ok(attrs)
}

/// Parse one `Import` tree node (§3, §4.3, example 6: `M.{C as D, *}`
/// parses as `Node("M", [Alias("C", Some("D")), Wild])`).
pub fn parse_import(p: &mut Parser) -> PResult<Import> {
    let tok = p.peek()?;
    if p.eat(TokenKind::Star)?.is_some() {
        return Ok(Import { span: tok.span, kind: ImportKind::Wild });
    }
    let (ident, mut span) = p.ident()?;
    if p.eat(TokenKind::Dot)?.is_some() {
        if p.check(TokenKind::LBrace)? {
            let nested = p.parse_list(TokenKind::LBrace, TokenKind::RBrace, parse_import)?;
            let end = nested.last().map(|i| i.span).unwrap_or(span);
            span = span.merge(end);
            return Ok(Import { span, kind: ImportKind::Node(ident, nested) });
        }
        let inner = parse_import(p)?;
        span = span.merge(inner.span);
        return Ok(Import { span, kind: ImportKind::Node(ident, vec![inner]) });
    }
    if p.eat(TokenKind::As)?.is_some() {
        let (alias, alias_span) = p.ident()?;
        span = span.merge(alias_span);
        return Ok(Import { span, kind: ImportKind::Alias(ident, Some(alias)) });
    }
    Ok(Import { span, kind: ImportKind::Alias(ident, None) })
}

fn parse_open_stmt(p: &mut Parser) -> PResult<Stmt> {
    let start = p.expect(TokenKind::Open)?.span;
    let import = parse_import(p)?;
    let end = p.expect(TokenKind::Semi)?.span;
    Ok(Stmt { span: start.merge(end), attrs: Vec::new(), kind: StmtKind::Open(import) })
}

fn parse_let_stmt(p: &mut Parser) -> PResult<Stmt> {
    let start = p.expect(TokenKind::Let)?.span;
    let pat = parse_pat(p)?;

    if p.eat(TokenKind::LArrow)?.is_some() {
        let expr = parse_expr(p)?;
        let end = p.expect(TokenKind::Semi)?.span;
        return Ok(Stmt {
            span: start.merge(end),
            attrs: Vec::new(),
            kind: StmtKind::Bind { pat, expr },
        });
    }

    p.expect(TokenKind::Eq)?;
    let expr = parse_expr(p)?;
    let else_block = if p.eat(TokenKind::Else)?.is_some() { Some(parse_block(p)?) } else { None };
    let end = p.expect(TokenKind::Semi)?.span;
    Ok(Stmt {
        span: start.merge(end),
        attrs: Vec::new(),
        kind: StmtKind::Let { pat, expr, else_block },
    })
}

/// A local `func` declaration (§4.2 Statements): unlike an item-level
/// `func`, this one has no generics/`where` clause and its body is
/// mandatory.
fn parse_local_func(p: &mut Parser) -> PResult<FuncDecl> {
    p.expect(TokenKind::Func)?;
    let (name, _) = p.ident()?;
    let params = crate::items::parse_params(p)?;
    let ret = if p.eat(TokenKind::Arrow)?.is_some() { Some(p.parse_type()?) } else { None };
    let body = parse_block(p)?;
    Ok(FuncDecl { name, generics: Vec::new(), params, ret, body: Some(body) })
}

fn parse_stmt_inner(p: &mut Parser) -> PResult<Stmt> {
    match p.peek_kind()? {
        TokenKind::Open => parse_open_stmt(p),
        TokenKind::Let => parse_let_stmt(p),
        TokenKind::Func => {
            let start = p.peek()?.span;
            let decl = parse_local_func(p)?;
            let end = decl.body.as_ref().and_then(|b| b.last()).map(|s| s.span).unwrap_or(start);
            Ok(Stmt { span: start.merge(end), attrs: Vec::new(), kind: StmtKind::Func(decl) })
        }
        _ => {
            let expr = parse_expr(p)?;
            let span = expr.span;
            if p.eat(TokenKind::Semi)?.is_some() {
                // span already covers the expression; the `;` itself isn't
                // semantically part of the statement's value.
            } else if !matches!(p.peek_kind()?, TokenKind::RBrace | TokenKind::Eof) {
                return Err(p.unexpected("statement")?);
            }
            Ok(Stmt { span, attrs: Vec::new(), kind: StmtKind::Expr(expr) })
        }
    }
}

pub fn parse_stmt(p: &mut Parser) -> PResult<Stmt> {
    let attrs = parse_attrs(p)?;
    let mut stmt = parse_stmt_inner(p)?;
    if !attrs.is_empty() {
        let start = attrs[0].span;
        stmt.span = start.merge(stmt.span);
        stmt.attrs = attrs;
    }
    Ok(stmt)
}
