//! The elaborator (spec.md §4.4): a single forward pass over the raw
//! package that resolves every name to a symbol path and produces the
//! [`crate::elaborated`] tree.
//!
//! The table builder's `pat_rewrite` (§4.3) only visits a top-level `let`
//! declaration's pattern — `build_variables` walks the `Decl` tree, not
//! statement bodies — so a bare identifier pattern inside a function body
//! (a `switch` case, a `for` binding, a lambda parameter, a local `let`/
//! `bind`) reaches the elaborator still ambiguous between a fresh binding
//! and a nullary constructor reference. [`Elaborator::elaborate_pat`]
//! performs the same resolve-and-rewrite `pat_rewrite` does, on every
//! pattern it sees, not only ones the builder already rewrote — otherwise
//! §8's soundness property ("no elaborated `VarPat` resolves to a `Ctor`
//! symbol") would only hold for top-level lets.
//!
//! Two scope stacks track what the table alone cannot tell us: which type
//! identifiers name a generic parameter of an enclosing declaration, and
//! which expression identifiers are local bindings (function parameters,
//! lambda/`for`/`switch`/pattern-condition bindings) rather than table
//! entries. Local bindings shadow the table outright; they are never
//! registered in it, since only top-level `let`s are (§4.3).

use std::rc::Rc;

use indexmap::IndexSet;

use fax_par::ast::{self, BinOp, Cond, Decl, DeclKind, Expr, ExprKind, FuncDecl, GenericParam, InitDecl, Pat, PatKind, PathSeg, Stmt, StmtKind, Type, TypeKind, UnOp as RawUnOp};
use fax_util::error::{FrontendResult, ResolveError, SemanticError};
use fax_util::Ident;

use crate::elaborated;
use crate::table::{NodeId, SymbolKind, SymbolTable};

/// Run the elaborator over an already-built `package` (the raw tree as
/// left by [`crate::builder::TableBuilder::build`], with constructor
/// patterns and synthesized `ext%N`/`init%N` identifiers already in
/// place), returning the elaborated package (§4.4).
pub fn elaborate_package(table: &SymbolTable, package: &ast::Package) -> FrontendResult<elaborated::Package> {
    let mut elaborator = Elaborator::new(table);
    let body = elaborator.elaborate_decls(&package.body)?;
    Ok(elaborated::Package { ident: package.ident.clone(), body })
}

struct Elaborator<'a> {
    table: &'a SymbolTable,
    active: NodeId,
    type_scopes: Vec<IndexSet<Ident>>,
    expr_scopes: Vec<IndexSet<Ident>>,
}

impl<'a> Elaborator<'a> {
    fn new(table: &'a SymbolTable) -> Self {
        Elaborator { table, active: table.root, type_scopes: Vec::new(), expr_scopes: Vec::new() }
    }

    // -- scope bookkeeping -----------------------------------------------

    fn push_type_scope(&mut self, generics: &[GenericParam]) {
        self.type_scopes.push(generics.iter().map(|g| g.name).collect());
    }

    fn pop_type_scope(&mut self) {
        self.type_scopes.pop();
    }

    fn is_type_var(&self, ident: Ident) -> bool {
        self.type_scopes.iter().rev().any(|scope| scope.contains(&ident))
    }

    fn push_expr_scope(&mut self) {
        self.expr_scopes.push(IndexSet::new());
    }

    fn pop_expr_scope(&mut self) {
        self.expr_scopes.pop();
    }

    /// Register a fresh binding in the innermost scope. A no-op at
    /// top-level (outside any function/lambda/block), where the table
    /// builder has already registered the binding as a `Var` symbol
    /// (§4.3) and there is no local scope to shadow with.
    fn bind_var(&mut self, ident: Ident) {
        if let Some(scope) = self.expr_scopes.last_mut() {
            scope.insert(ident);
        }
    }

    fn is_local_var(&self, ident: Ident) -> bool {
        self.expr_scopes.iter().rev().any(|scope| scope.contains(&ident))
    }

    // -- types -------------------------------------------------------------

    fn elaborate_type(&self, ty: &Type) -> FrontendResult<elaborated::Type> {
        let span = ty.span;
        let kind = match &ty.kind {
            TypeKind::Meta => elaborated::TypeKind::Meta,
            TypeKind::Int => elaborated::TypeKind::Int,
            TypeKind::Bool => elaborated::TypeKind::Bool,
            TypeKind::Char => elaborated::TypeKind::Char,
            TypeKind::String => elaborated::TypeKind::String,
            TypeKind::Unit => elaborated::TypeKind::Unit,
            TypeKind::Tuple(items) => {
                elaborated::TypeKind::Tuple(self.elaborate_types(items)?)
            }
            TypeKind::Arrow(inputs, output) => {
                let inputs = self.elaborate_types(inputs)?;
                let output = Box::new(self.elaborate_type(output)?);
                elaborated::TypeKind::Arrow(inputs, output)
            }
            TypeKind::Name(name, args) => {
                if name.path.is_empty() && args.is_none() && self.is_type_var(name.ident) {
                    elaborated::TypeKind::Var(name.ident)
                } else {
                    let elab_args = match args {
                        Some(a) => Some(self.elaborate_types(a)?),
                        None => None,
                    };
                    let sym = self.table.find_type_symbol(self.active, name.ident, &name.path, span)?;
                    match sym.kind {
                        SymbolKind::Class => elaborated::TypeKind::Class(sym.path, elab_args),
                        SymbolKind::Enum => elaborated::TypeKind::Enum(sym.path, elab_args),
                        SymbolKind::Typealias => elaborated::TypeKind::Typealias(sym.path, elab_args),
                        SymbolKind::Interface => elaborated::TypeKind::Interface(sym.path, elab_args),
                        _ => return Err(ResolveError::InvalidType { path: sym.path, span }.into()),
                    }
                }
            }
        };
        Ok(elaborated::Type { span, kind })
    }

    fn elaborate_types(&self, tys: &[Type]) -> FrontendResult<Vec<elaborated::Type>> {
        tys.iter().map(|t| self.elaborate_type(t)).collect()
    }

    fn elaborate_opt_types(&self, tys: &Option<Vec<Type>>) -> FrontendResult<Option<Vec<elaborated::Type>>> {
        match tys {
            Some(a) => Ok(Some(self.elaborate_types(a)?)),
            None => Ok(None),
        }
    }

    fn elaborate_generics(&self, generics: &[GenericParam]) -> FrontendResult<Vec<elaborated::GenericParam>> {
        generics
            .iter()
            .map(|g| {
                Ok(elaborated::GenericParam { name: g.name, span: g.span, bounds: self.elaborate_types(&g.bounds)? })
            })
            .collect()
    }

    // -- patterns ------------------------------------------------------

    fn elaborate_pat(&mut self, pat: &Pat) -> FrontendResult<elaborated::Pat> {
        let span = pat.span;
        let kind = match &pat.kind {
            PatKind::Lit(l) => elaborated::PatKind::Lit(l.clone()),
            PatKind::Wild => elaborated::PatKind::Wild,
            PatKind::Tuple(items) => elaborated::PatKind::Tuple(self.elaborate_pats(items)?),
            PatKind::Or(alts) => elaborated::PatKind::Or(self.elaborate_pats(alts)?),
            PatKind::At(ident, hint, is_mut, inner) => {
                let hint = Rc::new(self.elaborate_type(hint)?);
                let inner = Box::new(self.elaborate_pat(inner)?);
                self.bind_var(*ident);
                elaborated::PatKind::At(*ident, hint, *is_mut, inner)
            }
            PatKind::Ctor(name, type_args, args) => {
                let sym = self.table.find_expr_symbol(self.active, name.ident, &name.path, span)?;
                if sym.kind != SymbolKind::Ctor {
                    return Err(ResolveError::InvalidPatternName { name: name.ident.as_str().to_string(), span }.into());
                }
                let type_args = self.elaborate_opt_types(type_args)?;
                let args = match args {
                    Some(a) => Some(self.elaborate_pats(a)?),
                    None => None,
                };
                elaborated::PatKind::Ctor(sym.path, type_args, args)
            }
            PatKind::Name(name, type_args, hint, is_mut) => {
                if !self.is_local_var(name.ident) {
                    if let Ok(sym) = self.table.find_expr_symbol(self.active, name.ident, &name.path, span) {
                        if sym.kind == SymbolKind::Ctor {
                            if *is_mut {
                                return Err(SemanticError::MutOnCtorPattern { span }.into());
                            }
                            if !matches!(hint.kind, TypeKind::Meta) {
                                return Err(SemanticError::HintOnCtorPattern { span }.into());
                            }
                            let type_args = self.elaborate_opt_types(type_args)?;
                            return Ok(elaborated::Pat { span, kind: elaborated::PatKind::Ctor(sym.path, type_args, None) });
                        }
                    }
                }
                let hint = Rc::new(self.elaborate_type(hint)?);
                self.bind_var(name.ident);
                elaborated::PatKind::Var(name.ident, hint, *is_mut)
            }
        };
        Ok(elaborated::Pat { span, kind })
    }

    fn elaborate_pats(&mut self, pats: &[Pat]) -> FrontendResult<Vec<elaborated::Pat>> {
        pats.iter().map(|p| self.elaborate_pat(p)).collect()
    }

    // -- conditions & switch clauses ---------------------------------------

    fn elaborate_cond(&mut self, cond: &Cond) -> FrontendResult<elaborated::Cond> {
        match cond {
            Cond::Expr(e) => Ok(elaborated::Cond::Expr(self.elaborate_expr(e)?)),
            Cond::Let(pat, e) => {
                // The scrutinee is evaluated in the outer scope, before the
                // pattern's bindings come into existence (§4.2).
                let e = self.elaborate_expr(e)?;
                let pat = self.elaborate_pat(pat)?;
                Ok(elaborated::Cond::Let(pat, e))
            }
        }
    }

    // -- expressions ---------------------------------------------------

    fn elaborate_expr(&mut self, expr: &Expr) -> FrontendResult<elaborated::Expr> {
        let span = expr.span;
        let kind = match &expr.kind {
            ExprKind::Lit(l) => elaborated::ExprKind::Lit(l.clone()),
            ExprKind::Hole => elaborated::ExprKind::Hole,
            ExprKind::Continue => elaborated::ExprKind::Continue,
            ExprKind::Tuple(items) => elaborated::ExprKind::Tuple(self.elaborate_exprs(items)?),
            ExprKind::Hint(e, t) => {
                elaborated::ExprKind::Hint(Box::new(self.elaborate_expr(e)?), self.elaborate_type(t)?)
            }
            ExprKind::Binary(op, l, r) => {
                elaborated::ExprKind::Binary(*op, Box::new(self.elaborate_expr(l)?), Box::new(self.elaborate_expr(r)?))
            }
            ExprKind::Break(v) => elaborated::ExprKind::Break(self.elaborate_opt_boxed_expr(v)?),
            ExprKind::Return(v) => elaborated::ExprKind::Return(self.elaborate_opt_boxed_expr(v)?),
            ExprKind::App(callee, args) => {
                elaborated::ExprKind::App(Box::new(self.elaborate_expr(callee)?), self.elaborate_exprs(args)?)
            }
            ExprKind::Block(stmts) => elaborated::ExprKind::Block(self.elaborate_block(stmts)?),
            ExprKind::Lam(pats, body) => {
                self.push_expr_scope();
                let pats = self.elaborate_pats(pats)?;
                let body = self.elaborate_expr(body);
                self.pop_expr_scope();
                elaborated::ExprKind::Lam(pats, Box::new(body?))
            }
            ExprKind::Ite(clauses, else_block) => {
                let mut out = Vec::with_capacity(clauses.len());
                for (cond, body) in clauses {
                    self.push_expr_scope();
                    let cond = self.elaborate_cond(cond);
                    let body = cond.and_then(|cond| Ok((cond, self.elaborate_block(body)?)));
                    self.pop_expr_scope();
                    out.push(body?);
                }
                let else_block = match else_block {
                    Some(b) => Some(self.elaborate_block(b)?),
                    None => None,
                };
                elaborated::ExprKind::Ite(out, else_block)
            }
            ExprKind::Switch(scrutinee, clauses) => {
                let scrutinee = Box::new(self.elaborate_expr(scrutinee)?);
                let mut out = Vec::with_capacity(clauses.len());
                for clause in clauses {
                    self.push_expr_scope();
                    let elaborated_clause = (|| {
                        let pat = match &clause.pat {
                            Some(p) => Some(self.elaborate_pat(p)?),
                            None => None,
                        };
                        let guard = match &clause.guard {
                            Some(g) => Some(self.elaborate_expr(g)?),
                            None => None,
                        };
                        let body = self.elaborate_stmts(&clause.body)?;
                        Ok(elaborated::SwitchClause { span: clause.span, pat, guard, body })
                    })();
                    self.pop_expr_scope();
                    out.push(elaborated_clause?);
                }
                elaborated::ExprKind::Switch(scrutinee, out)
            }
            ExprKind::For(pat, iter, body) => {
                let iter = Box::new(self.elaborate_expr(iter)?);
                self.push_expr_scope();
                let result = (|| {
                    let pat = self.elaborate_pat(pat)?;
                    let body = self.elaborate_block(body)?;
                    Ok((pat, body))
                })();
                self.pop_expr_scope();
                let (pat, body) = result?;
                elaborated::ExprKind::For(pat, iter, body)
            }
            ExprKind::While(cond, body) => {
                self.push_expr_scope();
                let result = (|| {
                    let cond = self.elaborate_cond(cond)?;
                    let body = self.elaborate_block(body)?;
                    Ok((cond, body))
                })();
                self.pop_expr_scope();
                let (cond, body) = result?;
                elaborated::ExprKind::While(cond, body)
            }
            ExprKind::Loop(body) => elaborated::ExprKind::Loop(self.elaborate_block(body)?),
            ExprKind::Name(name, type_args) => {
                if name.path.is_empty() && self.is_local_var(name.ident) {
                    elaborated::ExprKind::Var(name.ident)
                } else {
                    let sym = self.table.find_expr_symbol(self.active, name.ident, &name.path, span)?;
                    if sym.kind == SymbolKind::Var {
                        let ident = name.path.last().copied().unwrap_or(name.ident);
                        elaborated::ExprKind::Var(ident)
                    } else {
                        let type_args = self.elaborate_opt_types(type_args)?;
                        elaborated::ExprKind::Const(sym.path, type_args)
                    }
                }
            }
            ExprKind::Unary(RawUnOp::Dot(segs, type_args), base) => {
                let base = Box::new(self.elaborate_expr(base)?);
                let type_args = self.elaborate_opt_types(type_args)?;
                if segs.len() == 1 {
                    match segs[0] {
                        PathSeg::Index(n) => elaborated::ExprKind::Proj(base, n),
                        PathSeg::Ident(id) => elaborated::ExprKind::Field(base, vec![id], type_args),
                    }
                } else {
                    let idents: Result<Vec<Ident>, _> = segs
                        .iter()
                        .map(|seg| match seg {
                            PathSeg::Ident(id) => Ok(*id),
                            PathSeg::Index(_) => Err(ResolveError::InvalidSelector { span }),
                        })
                        .collect();
                    elaborated::ExprKind::Field(base, idents?, type_args)
                }
            }
            ExprKind::Unary(op, operand) => {
                let op = match op {
                    RawUnOp::Pos => elaborated::UnOp::Pos,
                    RawUnOp::Neg => elaborated::UnOp::Neg,
                    RawUnOp::Ref => elaborated::UnOp::Ref,
                    RawUnOp::Deref => elaborated::UnOp::Deref,
                    RawUnOp::Try => elaborated::UnOp::Try,
                    RawUnOp::Dot(..) => unreachable!("handled by the preceding arm"),
                };
                elaborated::ExprKind::Unary(op, Box::new(self.elaborate_expr(operand)?))
            }
        };
        Ok(elaborated::Expr { span, kind })
    }

    fn elaborate_exprs(&mut self, exprs: &[Expr]) -> FrontendResult<Vec<elaborated::Expr>> {
        exprs.iter().map(|e| self.elaborate_expr(e)).collect()
    }

    fn elaborate_opt_boxed_expr(&mut self, e: &Option<Box<Expr>>) -> FrontendResult<Option<Box<elaborated::Expr>>> {
        match e {
            Some(e) => Ok(Some(Box::new(self.elaborate_expr(e)?))),
            None => Ok(None),
        }
    }

    // -- statements & blocks ---------------------------------------------

    fn elaborate_stmt(&mut self, stmt: &Stmt) -> FrontendResult<elaborated::Stmt> {
        let span = stmt.span;
        let attrs = self.elaborate_exprs(&stmt.attrs)?;
        let kind = match &stmt.kind {
            StmtKind::Open(import) => elaborated::StmtKind::Open(import.clone()),
            StmtKind::Let { pat, expr, else_block } => {
                let expr = self.elaborate_expr(expr)?;
                let pat = self.elaborate_pat(pat)?;
                let else_block = match else_block {
                    Some(b) => Some(self.elaborate_block(b)?),
                    None => None,
                };
                elaborated::StmtKind::Let { pat, expr, else_block }
            }
            StmtKind::Bind { pat, expr } => {
                let expr = self.elaborate_expr(expr)?;
                let pat = self.elaborate_pat(pat)?;
                elaborated::StmtKind::Bind { pat, expr }
            }
            StmtKind::Func(fd) => elaborated::StmtKind::Func(self.elaborate_func(fd)?),
            StmtKind::Expr(e) => elaborated::StmtKind::Expr(self.elaborate_expr(e)?),
        };
        Ok(elaborated::Stmt { span, attrs, kind })
    }

    fn elaborate_stmts(&mut self, stmts: &[Stmt]) -> FrontendResult<Vec<elaborated::Stmt>> {
        stmts.iter().map(|s| self.elaborate_stmt(s)).collect()
    }

    /// A block is its own lexical scope (§4.2): any `let`/`bind` inside it
    /// binds only for the rest of the block.
    fn elaborate_block(&mut self, stmts: &[Stmt]) -> FrontendResult<Vec<elaborated::Stmt>> {
        self.push_expr_scope();
        let out = self.elaborate_stmts(stmts);
        self.pop_expr_scope();
        out
    }

    // -- declarations ---------------------------------------------------

    fn elaborate_func(&mut self, fd: &FuncDecl) -> FrontendResult<elaborated::FuncDecl> {
        self.push_type_scope(&fd.generics);
        let generics = self.elaborate_generics(&fd.generics);
        let ret = fd.ret.as_ref().map(|t| self.elaborate_type(t)).transpose();

        self.push_expr_scope();
        for p in &fd.params {
            self.bind_var(p.name);
        }
        let params: FrontendResult<Vec<_>> = fd
            .params
            .iter()
            .map(|p| Ok(elaborated::Param { name: p.name, ty: self.elaborate_type(&p.ty)?, span: p.span }))
            .collect();
        let body = match &fd.body {
            Some(b) => self.elaborate_block(b).map(Some),
            None => Ok(None),
        };
        self.pop_expr_scope();
        self.pop_type_scope();

        Ok(elaborated::FuncDecl { name: fd.name, generics: generics?, params: params?, ret: ret?, body: body? })
    }

    fn elaborate_init(&mut self, id: &InitDecl) -> FrontendResult<elaborated::InitDecl> {
        let name = id.name.expect("init identifier synthesized by the table builder when omitted (§4.3)");
        self.push_expr_scope();
        for p in &id.params {
            self.bind_var(p.name);
        }
        let params: FrontendResult<Vec<_>> = id
            .params
            .iter()
            .map(|p| Ok(elaborated::Param { name: p.name, ty: self.elaborate_type(&p.ty)?, span: p.span }))
            .collect();
        let body = match &id.body {
            Some(b) => self.elaborate_block(b).map(Some),
            None => Ok(None),
        };
        self.pop_expr_scope();
        Ok(elaborated::InitDecl { name, params: params?, body: body? })
    }

    fn elaborate_classlike(&mut self, cl: &ast::ClassLike) -> FrontendResult<elaborated::ClassLike> {
        self.push_type_scope(&cl.generics);
        let generics = self.elaborate_generics(&cl.generics);

        let child = self
            .table
            .local_child(self.active, cl.name)
            .expect("classlike node registered in build_constants (§4.3)");
        let prev = std::mem::replace(&mut self.active, child);
        let body = self.elaborate_decls(&cl.body);
        self.active = prev;

        self.pop_type_scope();
        Ok(elaborated::ClassLike { name: cl.name, generics: generics?, body: body? })
    }

    fn elaborate_decl(&mut self, decl: &Decl) -> FrontendResult<elaborated::Decl> {
        let span = decl.span;
        let attrs = self.elaborate_exprs(&decl.attrs)?;
        let access = decl.access;
        let kind = match &decl.kind {
            DeclKind::Module(ident, body) => {
                let child = self
                    .table
                    .local_child(self.active, *ident)
                    .expect("module node registered in build_constants (§4.3)");
                let prev = std::mem::replace(&mut self.active, child);
                let body = self.elaborate_decls(body);
                self.active = prev;
                elaborated::DeclKind::Module(*ident, body?)
            }
            DeclKind::Open(import) => elaborated::DeclKind::Open(import.clone()),
            DeclKind::Class(cl) => elaborated::DeclKind::Class(self.elaborate_classlike(cl)?),
            DeclKind::Enum(cl) => elaborated::DeclKind::Enum(self.elaborate_classlike(cl)?),
            DeclKind::Interface(cl) => elaborated::DeclKind::Interface(self.elaborate_classlike(cl)?),
            DeclKind::Extension(ext) => {
                let ident = ext.ident.expect("extension identifier synthesized in build_constants (§4.3, §9)");
                self.push_type_scope(&ext.generics);
                let generics = self.elaborate_generics(&ext.generics);
                let target = self.elaborate_type(&ext.target);
                let interfaces = self.elaborate_types(&ext.interfaces);

                let child = self
                    .table
                    .local_child(self.active, ident)
                    .expect("extension node registered in build_constants (§4.3)");
                let prev = std::mem::replace(&mut self.active, child);
                let body = self.elaborate_decls(&ext.body);
                self.active = prev;
                self.pop_type_scope();

                elaborated::DeclKind::Extension(elaborated::ExtensionDecl {
                    ident,
                    generics: generics?,
                    target: target?,
                    interfaces: interfaces?,
                    body: body?,
                })
            }
            DeclKind::Typealias { name, generics, ty } => {
                self.push_type_scope(generics);
                let elab_generics = self.elaborate_generics(generics);
                let ty = self.elaborate_type(ty);
                self.pop_type_scope();
                elaborated::DeclKind::Typealias { name: *name, generics: elab_generics?, ty: ty? }
            }
            DeclKind::Let { pat, expr } => {
                let expr = self.elaborate_expr(expr)?;
                let pat = self.elaborate_pat(pat)?;
                elaborated::DeclKind::Let { pat, expr }
            }
            DeclKind::Func(fd) => elaborated::DeclKind::Func(self.elaborate_func(fd)?),
            DeclKind::Init(id) => elaborated::DeclKind::Init(self.elaborate_init(id)?),
            DeclKind::Ctor { name, params } => {
                elaborated::DeclKind::Ctor { name: *name, params: self.elaborate_types(params)? }
            }
        };
        Ok(elaborated::Decl { span, attrs, access, kind })
    }

    fn elaborate_decls(&mut self, decls: &[Decl]) -> FrontendResult<Vec<elaborated::Decl>> {
        decls.iter().map(|d| self.elaborate_decl(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TableBuilder;
    use fax_par::Parser;

    fn elaborate(src: &str) -> (SymbolTable, elaborated::Package) {
        let mut parser = Parser::new(src);
        let mut package = parser.parse_package("root").unwrap();
        let table = TableBuilder::new(Ident::intern("root")).build(&mut package).unwrap();
        let elaborated = elaborate_package(&table, &package).unwrap();
        (table, elaborated)
    }

    #[test]
    fn ctor_application_resolves_to_full_path() {
        let (_, pkg) = elaborate("enum Option<T> { case None case Some(T) } let x = Some(1);");
        match &pkg.body.last().unwrap().kind {
            elaborated::DeclKind::Let { expr, .. } => match &expr.kind {
                elaborated::ExprKind::App(callee, args) => {
                    match &callee.kind {
                        elaborated::ExprKind::Const(path, _) => assert_eq!(path, "root.Option.Some"),
                        other => panic!("expected Const callee, got {other:?}"),
                    }
                    assert_eq!(args.len(), 1);
                }
                other => panic!("expected App, got {other:?}"),
            },
            other => panic!("expected Let, got {other:?}"),
        }
    }

    #[test]
    fn top_level_let_registers_a_var() {
        let (_, pkg) = elaborate("let x = 1;");
        match &pkg.body[0].kind {
            elaborated::DeclKind::Let { pat, .. } => {
                assert!(matches!(pat.kind, elaborated::PatKind::Var(ident, _, false) if ident == Ident::intern("x")));
            }
            other => panic!("expected Let, got {other:?}"),
        }
    }

    #[test]
    fn field_and_proj_split_from_dot() {
        let (_, pkg) = elaborate("func f(p: (Int, Int)) -> Int { p.0 }");
        match &pkg.body[0].kind {
            elaborated::DeclKind::Func(fd) => match fd.body.as_ref().unwrap().last().unwrap().kind {
                elaborated::StmtKind::Expr(ref e) => {
                    assert!(matches!(e.kind, elaborated::ExprKind::Proj(_, 0)));
                }
                ref other => panic!("expected trailing expr, got {other:?}"),
            },
            other => panic!("expected Func, got {other:?}"),
        }
    }

    #[test]
    fn multi_segment_field_keeps_identifiers() {
        let (_, pkg) = elaborate("func f(p: Int) -> Int { p.a.b }");
        match &pkg.body[0].kind {
            elaborated::DeclKind::Func(fd) => match fd.body.as_ref().unwrap().last().unwrap().kind {
                elaborated::StmtKind::Expr(ref e) => match &e.kind {
                    elaborated::ExprKind::Field(_, path, _) => assert_eq!(path.len(), 2),
                    other => panic!("expected Field, got {other:?}"),
                },
                ref other => panic!("expected trailing expr, got {other:?}"),
            },
            other => panic!("expected Func, got {other:?}"),
        }
    }

    #[test]
    fn switch_case_bare_ctor_name_resolves_without_builder_pass() {
        // `None` here is a bare-identifier pattern inside a `switch` clause,
        // never visited by `build_variables` (§4.3) — only the elaborator's
        // own `pat_rewrite` mirror sees it.
        let (_, pkg) = elaborate(
            "enum Option<T> { case None case Some(T) }\n\
             func f(x: Option<Int>) -> Int {\n\
                 switch x { case None: 0 default: 1 }\n\
             }",
        );
        match &pkg.body[1].kind {
            elaborated::DeclKind::Func(fd) => match fd.body.as_ref().unwrap().last().unwrap().kind {
                elaborated::StmtKind::Expr(ref e) => match &e.kind {
                    elaborated::ExprKind::Switch(_, clauses) => {
                        let ctor_pat = clauses[0].pat.as_ref().unwrap();
                        match &ctor_pat.kind {
                            elaborated::PatKind::Ctor(path, ..) => assert_eq!(path, "root.Option.None"),
                            other => panic!("expected Ctor pattern, got {other:?}"),
                        }
                    }
                    other => panic!("expected Switch, got {other:?}"),
                },
                ref other => panic!("expected trailing expr, got {other:?}"),
            },
            other => panic!("expected Func, got {other:?}"),
        }
    }

    #[test]
    fn function_parameter_shadows_a_same_named_top_level_let() {
        let (_, pkg) = elaborate("let x = 1; func f(x: Int) -> Int { x }");
        match &pkg.body[1].kind {
            elaborated::DeclKind::Func(fd) => match fd.body.as_ref().unwrap().last().unwrap().kind {
                elaborated::StmtKind::Expr(ref e) => {
                    assert!(matches!(e.kind, elaborated::ExprKind::Var(ident) if ident == Ident::intern("x")));
                }
                ref other => panic!("expected trailing expr, got {other:?}"),
            },
            other => panic!("expected Func, got {other:?}"),
        }
    }

    #[test]
    fn type_parameter_resolves_to_var() {
        let (_, pkg) = elaborate("class Box<T> { let item: T; }");
        match &pkg.body[0].kind {
            elaborated::DeclKind::Class(cl) => match &cl.body[0].kind {
                elaborated::DeclKind::Let { pat, .. } => match &pat.kind {
                    elaborated::PatKind::Var(_, hint, _) => {
                        assert!(matches!(hint.kind, elaborated::TypeKind::Var(ident) if ident == Ident::intern("T")));
                    }
                    other => panic!("expected Var pattern, got {other:?}"),
                },
                other => panic!("expected Let, got {other:?}"),
            },
            other => panic!("expected Class, got {other:?}"),
        }
    }
}
