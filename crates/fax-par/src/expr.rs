//! Expression parsing (spec.md §4.2): a ten-level operator-precedence
//! ladder, lowest to highest —
//! `assign(right) | or | and | eq | rel | add | mul | unary | postfix | primary`.
//!
//! Two productions need lookahead beyond one token and use the lexer's
//! checkpoint stack (§4.1) to speculate and roll back:
//! - a lambda (`pat => expr` / `(pat, ...) => expr`) is tried before
//!   falling back to the assignment ladder, since `(` also opens a tuple;
//! - `ident<...>` is tried as a type-argument list, committed only if a
//!   closing `>` follows, otherwise rolled back and re-read as `<`.

use fax_lex::TokenKind;

use crate::ast::{AssignMode, BinOp, Block, Cond, Expr, ExprKind, Lit, Name, PathSeg, Stmt, StmtKind, SwitchClause, UnOp};
use crate::pattern::parse_pat;
use crate::{PResult, Parser};

pub fn parse_expr(p: &mut Parser) -> PResult<Expr> {
    parse_assign(p)
}

fn assign_mode(kind: TokenKind) -> Option<AssignMode> {
    Some(match kind {
        TokenKind::Eq => AssignMode::Set,
        TokenKind::PlusEq => AssignMode::Add,
        TokenKind::MinusEq => AssignMode::Sub,
        TokenKind::StarEq => AssignMode::Mul,
        TokenKind::SlashEq => AssignMode::Div,
        TokenKind::PercentEq => AssignMode::Mod,
        _ => return None,
    })
}

fn parse_assign(p: &mut Parser) -> PResult<Expr> {
    let lhs = parse_or(p)?;
    let kind = p.peek_kind()?;
    if let Some(mode) = assign_mode(kind) {
        p.bump()?;
        let rhs = parse_assign(p)?;
        let span = lhs.span.merge(rhs.span);
        return Ok(Expr {
            span,
            kind: ExprKind::Binary(BinOp::Assign(mode), Box::new(lhs), Box::new(rhs)),
        });
    }
    Ok(lhs)
}

macro_rules! left_assoc_level {
    ($name:ident, $next:ident, [$($tok:pat => $op:expr),+ $(,)?]) => {
        fn $name(p: &mut Parser) -> PResult<Expr> {
            let mut lhs = $next(p)?;
            loop {
                let op = match p.peek_kind()? {
                    $($tok => $op,)+
                    _ => break,
                };
                p.bump()?;
                let rhs = $next(p)?;
                let span = lhs.span.merge(rhs.span);
                lhs = Expr { span, kind: ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)) };
            }
            Ok(lhs)
        }
    };
}

left_assoc_level!(parse_or, parse_and, [TokenKind::PipePipe => BinOp::Or]);
left_assoc_level!(parse_and, parse_eq, [TokenKind::AmpAmp => BinOp::And]);
left_assoc_level!(parse_eq, parse_rel, [
    TokenKind::EqEq => BinOp::Eq,
    TokenKind::BangEq => BinOp::Ne,
]);
left_assoc_level!(parse_rel, parse_add, [
    TokenKind::Lt => BinOp::Lt,
    TokenKind::Gt => BinOp::Gt,
    TokenKind::LtEq => BinOp::Le,
    TokenKind::GtEq => BinOp::Ge,
]);
left_assoc_level!(parse_add, parse_mul, [
    TokenKind::Plus => BinOp::Add,
    TokenKind::Minus => BinOp::Sub,
]);
left_assoc_level!(parse_mul, parse_unary, [
    TokenKind::Star => BinOp::Mul,
    TokenKind::Slash => BinOp::Div,
    TokenKind::Percent => BinOp::Mod,
]);

/// Level 8: `+ - & *` as prefix operators (§4.2: "address-of and deref
/// share tokens with add and mul; context disambiguates because prefix
/// forms start an expression").
fn parse_unary(p: &mut Parser) -> PResult<Expr> {
    let tok = p.peek()?;
    let op = match tok.kind {
        TokenKind::Plus => UnOp::Pos,
        TokenKind::Minus => UnOp::Neg,
        TokenKind::Amp => UnOp::Ref,
        TokenKind::Star => UnOp::Deref,
        _ => return parse_postfix(p),
    };
    p.bump()?;
    let operand = parse_unary(p)?;
    let span = tok.span.merge(operand.span);
    Ok(Expr { span, kind: ExprKind::Unary(op, Box::new(operand)) })
}

/// Level 9: `? . [ ] ( )`. `[` `]` have no production in this grammar
/// (there is no array/index/slice form in §3's `Expr`/`Type` lists) and
/// are left unconsumed here, same as the bracket tokens are otherwise
/// unused.
fn parse_postfix(p: &mut Parser) -> PResult<Expr> {
    let mut base = parse_primary(p)?;
    loop {
        match p.peek_kind()? {
            TokenKind::Question => {
                let tok = p.bump()?;
                let span = base.span.merge(tok.span);
                base = Expr { span, kind: ExprKind::Unary(UnOp::Try, Box::new(base)) };
            }
            TokenKind::Dot => base = parse_dot(p, base)?,
            TokenKind::LParen => {
                let (args, rparen_span) =
                    p.parse_list_spanned(TokenKind::LParen, TokenKind::RParen, parse_expr)?;
                let span = base.span.merge(rparen_span);
                base = Expr { span, kind: ExprKind::App(Box::new(base), args) };
            }
            _ => break,
        }
    }
    Ok(base)
}

/// Parse one postfix `.` node. The first `.` is always consumed here
/// unconditionally; if it starts an integer segment the node is a single
/// `Proj`-shaped Dot (one segment, no further merging). If it starts an
/// identifier, subsequent `.ident` runs are spliced into the same path as
/// long as each continuation dot is itself followed by an identifier —
/// checked via a checkpoint so a `.0` after a `.field` run correctly opens
/// its own node instead (§4.4, example `p.0.field<T>`).
fn parse_dot(p: &mut Parser, base: Expr) -> PResult<Expr> {
    let dot_span = p.expect(TokenKind::Dot)?.span;

    if let Some(tok) = p.eat(TokenKind::IntLit)? {
        let n = p.int_value() as u64;
        let span = base.span.merge(tok.span);
        return Ok(Expr {
            span,
            kind: ExprKind::Unary(UnOp::Dot(vec![PathSeg::Index(n)], None), Box::new(base)),
        });
    }

    let (first, mut span) = p.ident()?;
    span = base.span.merge(span);
    let mut segs = vec![PathSeg::Ident(first)];

    loop {
        let continued = p.try_parse(|p| {
            p.expect(TokenKind::Dot)?;
            p.ident()
        })?;
        match continued {
            Some((ident, seg_span)) => {
                span = span.merge(seg_span);
                segs.push(PathSeg::Ident(ident));
            }
            None => break,
        }
    }

    let type_args = p.try_type_args()?;
    if let Some(args) = &type_args {
        if let Some(last) = args.last() {
            span = span.merge(last.span);
        }
    }
    let _ = dot_span;
    Ok(Expr { span, kind: ExprKind::Unary(UnOp::Dot(segs, type_args), Box::new(base)) })
}

fn can_start_expr(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::IntLit
            | TokenKind::CharLit
            | TokenKind::StringLit
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Underscore
            | TokenKind::Ident
            | TokenKind::LParen
            | TokenKind::LBrace
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Amp
            | TokenKind::Star
            | TokenKind::If
            | TokenKind::Switch
            | TokenKind::For
            | TokenKind::While
            | TokenKind::Loop
    )
}

fn parse_cond(p: &mut Parser) -> PResult<Cond> {
    if p.eat(TokenKind::Let)?.is_some() {
        let pat = parse_pat(p)?;
        p.expect(TokenKind::Eq)?;
        let expr = parse_expr(p)?;
        Ok(Cond::Let(pat, expr))
    } else {
        Ok(Cond::Expr(parse_expr(p)?))
    }
}

pub fn parse_block(p: &mut Parser) -> PResult<Block> {
    p.expect(TokenKind::LBrace)?;
    let mut stmts = Vec::new();
    while !p.check(TokenKind::RBrace)? {
        stmts.push(crate::stmt::parse_stmt(p)?);
    }
    p.expect(TokenKind::RBrace)?;
    Ok(stmts)
}

fn parse_block_expr(p: &mut Parser) -> PResult<Expr> {
    let start = p.peek()?.span;
    let block = parse_block(p)?;
    let end = block.last().map(|s| s.span).unwrap_or(start);
    Ok(Expr { span: start.merge(end), kind: ExprKind::Block(block) })
}

fn parse_ite(p: &mut Parser) -> PResult<Expr> {
    let start = p.expect(TokenKind::If)?.span;
    let mut clauses = Vec::new();
    let cond = parse_cond(p)?;
    let body = parse_block(p)?;
    clauses.push((cond, body));
    let mut else_block = None;
    loop {
        if p.eat(TokenKind::Else)?.is_some() {
            if p.eat(TokenKind::If)?.is_some() {
                let cond = parse_cond(p)?;
                let body = parse_block(p)?;
                clauses.push((cond, body));
                continue;
            }
            else_block = Some(parse_block(p)?);
        }
        break;
    }
    let end = else_block
        .as_ref()
        .and_then(|b| b.last())
        .or_else(|| clauses.last().and_then(|(_, b)| b.last()))
        .map(|s| s.span)
        .unwrap_or(start);
    Ok(Expr { span: start.merge(end), kind: ExprKind::Ite(clauses, else_block) })
}

fn parse_switch_clause(p: &mut Parser) -> PResult<SwitchClause> {
    let start = p.peek()?.span;
    let pat = if p.eat(TokenKind::Case)?.is_some() {
        Some(parse_pat(p)?)
    } else {
        p.expect(TokenKind::Default)?;
        None
    };
    let guard = if p.eat(TokenKind::If)?.is_some() { Some(parse_expr(p)?) } else { None };
    p.expect(TokenKind::Colon)?;
    let mut body = Vec::new();
    while !matches!(p.peek_kind()?, TokenKind::Case | TokenKind::Default | TokenKind::RBrace) {
        body.push(crate::stmt::parse_stmt(p)?);
    }
    let end = body.last().map(|s| s.span).unwrap_or(start);
    Ok(SwitchClause { span: start.merge(end), pat, guard, body })
}

fn parse_switch(p: &mut Parser) -> PResult<Expr> {
    let start = p.expect(TokenKind::Switch)?.span;
    let scrutinee = parse_expr(p)?;
    p.expect(TokenKind::LBrace)?;
    let mut clauses = Vec::new();
    while !p.check(TokenKind::RBrace)? {
        clauses.push(parse_switch_clause(p)?);
    }
    let end = p.expect(TokenKind::RBrace)?.span;
    Ok(Expr { span: start.merge(end), kind: ExprKind::Switch(Box::new(scrutinee), clauses) })
}

fn parse_for(p: &mut Parser) -> PResult<Expr> {
    let start = p.expect(TokenKind::For)?.span;
    let pat = parse_pat(p)?;
    p.expect(TokenKind::In)?;
    let iter = parse_expr(p)?;
    let body = parse_block(p)?;
    let end = body.last().map(|s| s.span).unwrap_or(start);
    Ok(Expr { span: start.merge(end), kind: ExprKind::For(pat, Box::new(iter), body) })
}

fn parse_while(p: &mut Parser) -> PResult<Expr> {
    let start = p.expect(TokenKind::While)?.span;
    let cond = parse_cond(p)?;
    let body = parse_block(p)?;
    let end = body.last().map(|s| s.span).unwrap_or(start);
    Ok(Expr { span: start.merge(end), kind: ExprKind::While(cond, body) })
}

fn parse_loop(p: &mut Parser) -> PResult<Expr> {
    let start = p.expect(TokenKind::Loop)?.span;
    let body = parse_block(p)?;
    let end = body.last().map(|s| s.span).unwrap_or(start);
    Ok(Expr { span: start.merge(end), kind: ExprKind::Loop(body) })
}

fn parse_jump(
    p: &mut Parser,
    kind: TokenKind,
    build: impl FnOnce(Option<Box<Expr>>) -> ExprKind,
) -> PResult<Expr> {
    let start = p.expect(kind)?.span;
    let value = if can_start_expr(p.peek_kind()?) {
        Some(Box::new(parse_expr(p)?))
    } else {
        None
    };
    let end = value.as_ref().map(|e| e.span).unwrap_or(start);
    Ok(Expr { span: start.merge(end), kind: build(value) })
}

/// Try the lambda form (§4.2): `(pat, ...) => expr` or `pat => expr`.
/// Returns `None`, with the lexer unchanged, when no lambda is present.
fn try_lambda(p: &mut Parser) -> PResult<Option<Expr>> {
    let start = p.peek()?.span;
    if p.check(TokenKind::LParen)? {
        let attempt = p.try_parse(|p| {
            let pats = p.parse_list(TokenKind::LParen, TokenKind::RParen, parse_pat)?;
            p.expect(TokenKind::FatArrow)?;
            Ok(pats)
        })?;
        if let Some(pats) = attempt {
            let body = parse_expr(p)?;
            let span = start.merge(body.span);
            return Ok(Some(Expr { span, kind: ExprKind::Lam(pats, Box::new(body)) }));
        }
        return Ok(None);
    }
    if matches!(p.peek_kind()?, TokenKind::Ident | TokenKind::Mut | TokenKind::Underscore) {
        let attempt = p.try_parse(|p| {
            let pat = parse_pat(p)?;
            p.expect(TokenKind::FatArrow)?;
            Ok(pat)
        })?;
        if let Some(pat) = attempt {
            let body = parse_expr(p)?;
            let span = start.merge(body.span);
            return Ok(Some(Expr { span, kind: ExprKind::Lam(vec![pat], Box::new(body)) }));
        }
    }
    Ok(None)
}

fn parse_primary(p: &mut Parser) -> PResult<Expr> {
    if let Some(lam) = try_lambda(p)? {
        return Ok(lam);
    }

    let tok = p.peek()?;
    match tok.kind {
        TokenKind::IntLit => {
            p.bump()?;
            Ok(Expr { span: tok.span, kind: ExprKind::Lit(Lit::Int(p.int_value())) })
        }
        TokenKind::CharLit => {
            p.bump()?;
            Ok(Expr { span: tok.span, kind: ExprKind::Lit(Lit::Char(p.char_value())) })
        }
        TokenKind::StringLit => {
            p.bump()?;
            Ok(Expr { span: tok.span, kind: ExprKind::Lit(Lit::String(p.lexeme().to_string())) })
        }
        TokenKind::True => {
            p.bump()?;
            Ok(Expr { span: tok.span, kind: ExprKind::Lit(Lit::Bool(true)) })
        }
        TokenKind::False => {
            p.bump()?;
            Ok(Expr { span: tok.span, kind: ExprKind::Lit(Lit::Bool(false)) })
        }
        TokenKind::Underscore => {
            p.bump()?;
            Ok(Expr { span: tok.span, kind: ExprKind::Hole })
        }
        TokenKind::Ident => {
            let (ident, span) = p.ident()?;
            let name = Name::simple(ident, span);
            let args = p.try_type_args()?;
            let span = match &args {
                Some(a) => a.last().map(|t| span.merge(t.span)).unwrap_or(span),
                None => span,
            };
            Ok(Expr { span, kind: ExprKind::Name(name, args) })
        }
        TokenKind::LParen => {
            let start = tok.span;
            let items = p.parse_list(TokenKind::LParen, TokenKind::RParen, parse_expr)?;
            match items.len() {
                0 => Ok(Expr { span: start, kind: ExprKind::Lit(Lit::Unit) }),
                1 => {
                    let inner = items.into_iter().next().expect("len == 1");
                    if p.eat(TokenKind::Colon)?.is_some() {
                        let ty = p.parse_type()?;
                        let span = start.merge(ty.span);
                        Ok(Expr { span, kind: ExprKind::Hint(Box::new(inner), ty) })
                    } else {
                        Ok(inner)
                    }
                }
                _ => {
                    let span = items.iter().fold(start, |s, e| s.merge(e.span));
                    Ok(Expr { span, kind: ExprKind::Tuple(items) })
                }
            }
        }
        TokenKind::LBrace => parse_block_expr(p),
        TokenKind::If => parse_ite(p),
        TokenKind::Switch => parse_switch(p),
        TokenKind::For => parse_for(p),
        TokenKind::While => parse_while(p),
        TokenKind::Loop => parse_loop(p),
        TokenKind::Break => parse_jump(p, TokenKind::Break, ExprKind::Break),
        TokenKind::Continue => {
            p.bump()?;
            Ok(Expr { span: tok.span, kind: ExprKind::Continue })
        }
        TokenKind::Return => parse_jump(p, TokenKind::Return, ExprKind::Return),
        _ => Err(p.unexpected("expression")?),
    }
}

/// An attribute-prefixed expression statement, used where `Stmt` requires
/// its trailing `;` to be consumed by the caller (`crate::stmt`).
pub fn parse_expr_stmt(p: &mut Parser) -> PResult<Stmt> {
    let expr = parse_expr(p)?;
    Ok(Stmt { span: expr.span, attrs: Vec::new(), kind: StmtKind::Expr(expr) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(src: &str) -> Expr {
        let mut p = Parser::new(src);
        parse_expr(&mut p).unwrap()
    }

    #[test]
    fn precedence_mul_binds_tighter_than_add() {
        match expr("1 + 2 * 3").kind {
            ExprKind::Binary(BinOp::Add, _, rhs) => {
                assert!(matches!(rhs.kind, ExprKind::Binary(BinOp::Mul, _, _)));
            }
            _ => panic!("expected Add at the top"),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        match expr("a = b = c").kind {
            ExprKind::Binary(BinOp::Assign(AssignMode::Set), _, rhs) => {
                assert!(matches!(rhs.kind, ExprKind::Binary(BinOp::Assign(AssignMode::Set), _, _)));
            }
            _ => panic!("expected right-associative ="),
        }
    }

    #[test]
    fn generic_call_parses_as_one_app() {
        match expr("f<A, B>(1, 2)").kind {
            ExprKind::App(callee, args) => {
                assert_eq!(args.len(), 2);
                match callee.kind {
                    ExprKind::Name(_, Some(targs)) => assert_eq!(targs.len(), 2),
                    _ => panic!("expected Name with type args"),
                }
            }
            _ => panic!("expected App"),
        }
    }

    #[test]
    fn less_than_rolls_back_when_not_closed() {
        match expr("a < b").kind {
            ExprKind::Binary(BinOp::Lt, _, _) => {}
            _ => panic!("expected Lt"),
        }
    }

    #[test]
    fn dotted_proj_then_field_with_type_args() {
        match expr("p.0.field<T>").kind {
            ExprKind::Unary(UnOp::Dot(segs, Some(targs)), base) => {
                assert_eq!(segs.len(), 1);
                assert_eq!(targs.len(), 1);
                assert!(matches!(base.kind, ExprKind::Unary(UnOp::Dot(ref s, None), _) if matches!(s[0], PathSeg::Index(0))));
            }
            _ => panic!("expected Field(Proj(..), [field], Some([T]))"),
        }
    }

    #[test]
    fn multi_segment_field_merges_into_one_node() {
        match expr("a.b.c").kind {
            ExprKind::Unary(UnOp::Dot(segs, None), _) => assert_eq!(segs.len(), 2),
            _ => panic!("expected one Dot node with a two-segment path"),
        }
    }

    #[test]
    fn parenthesized_lambda() {
        match expr("(a, b) => a + b").kind {
            ExprKind::Lam(pats, _) => assert_eq!(pats.len(), 2),
            _ => panic!("expected Lam"),
        }
    }

    #[test]
    fn single_pattern_lambda() {
        assert!(matches!(expr("x => x").kind, ExprKind::Lam(pats, _) if pats.len() == 1));
    }

    #[test]
    fn parenthesized_tuple_is_not_a_lambda() {
        assert!(matches!(expr("(1, 2)").kind, ExprKind::Tuple(items) if items.len() == 2));
    }

    #[test]
    fn try_operator_wraps_base() {
        assert!(matches!(expr("f()?").kind, ExprKind::Unary(UnOp::Try, _)));
    }

    #[test]
    fn parenthesized_hint() {
        assert!(matches!(expr("(1: Int)").kind, ExprKind::Hint(_, _)));
    }
}
