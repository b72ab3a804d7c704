//! The elaborated AST (spec.md §3(b), §4.4): mirrors the raw AST from
//! [`fax_par::ast`] shape-for-shape, except wherever a name has been
//! resolved against the symbol table:
//!
//! - `Pat::Name` collapses to [`Pat::Var`], since a bare pattern name that
//!   resolved to a constructor was already turned into `Pat::Ctor` by
//!   either the table builder's `pat_rewrite` (top-level `let`s) or the
//!   elaborator's own mirror of it (local patterns, §4.4);
//! - `Expr::Name` splits into [`Expr::Const`] (a resolved
//!   func/init/ctor/type symbol, carrying its full dotted path) or
//!   [`Expr::Var`] (a local binding, carrying its bare identifier);
//! - `Type::Name` splits into [`Type::Var`] (a bound type parameter) or
//!   one of [`Type::Enum`]/[`Type::Class`]/[`Type::Typealias`]/
//!   [`Type::Interface`] (a resolved type symbol, again by full path);
//! - `UnOp::Dot` splits into [`Expr::Field`] and [`Expr::Proj`].
//!
//! Per §9 ("Ownership"): the raw tree is uniquely owned top-down, while the
//! elaborated tree shares ownership of nodes reachable from more than one
//! place — here, a pattern's resolved type hint, which downstream
//! consumers may attach to more than one binding record. `Pat::Var` and
//! `Pat::At` hold their hint behind an `Rc`; everything else is owned
//! outright, matching the raw tree.

use std::rc::Rc;

use fax_util::{Ident, Span};

pub use fax_par::ast::{AssignMode, BinOp, Lit};

/// A resolved type (§3(b), §4.4).
#[derive(Debug, Clone)]
pub struct Type {
    pub span: Span,
    pub kind: TypeKind,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Meta,
    Int,
    Bool,
    Char,
    String,
    Unit,
    /// A type parameter bound by an enclosing
    /// class/enum/interface/extension/typealias/func/init (§4.4).
    Var(Ident),
    /// A resolved type symbol, keyed by its full dotted path (e.g.
    /// `"root.Option"`), carrying its own type arguments if any.
    Enum(String, Option<Vec<Type>>),
    Class(String, Option<Vec<Type>>),
    Typealias(String, Option<Vec<Type>>),
    Interface(String, Option<Vec<Type>>),
    Tuple(Vec<Type>),
    Arrow(Vec<Type>, Box<Type>),
}

/// A resolved pattern (§3(b), §4.4).
#[derive(Debug, Clone)]
pub struct Pat {
    pub span: Span,
    pub kind: PatKind,
}

#[derive(Debug, Clone)]
pub enum PatKind {
    Lit(Lit),
    Tuple(Vec<Pat>),
    /// A constructor pattern, its identifier rewritten to the resolved
    /// `Ctor` symbol's full path (§4.4).
    Ctor(String, Option<Vec<Type>>, Option<Vec<Pat>>),
    /// A fresh binding; the raw tree's `Name` pattern always collapses to
    /// this once it is known not to name a constructor (§3(b): "the path
    /// always empty").
    Var(Ident, Rc<Type>, bool),
    Wild,
    Or(Vec<Pat>),
    At(Ident, Rc<Type>, bool, Box<Pat>),
}

/// A condition (§4.2/§4.4): a plain expression or a pattern match against
/// one, as used by `if`/`while`.
#[derive(Debug, Clone)]
pub enum Cond {
    Expr(Expr),
    Let(Pat, Expr),
}

/// One `case`/`default` arm of a `switch`, resolved (§4.2).
#[derive(Debug, Clone)]
pub struct SwitchClause {
    pub span: Span,
    pub pat: Option<Pat>,
    pub guard: Option<Expr>,
    pub body: Vec<Stmt>,
}

/// Unary-position operators remaining once `UnOp::Dot` has been split out
/// into [`ExprKind::Field`]/[`ExprKind::Proj`] (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Pos,
    Neg,
    Ref,
    Deref,
    Try,
}

/// A resolved expression (§3(b), §4.4).
#[derive(Debug, Clone)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

pub type Block = Vec<Stmt>;

#[derive(Debug, Clone)]
pub enum ExprKind {
    Lit(Lit),
    Unary(UnOp, Box<Expr>),
    /// `UnOp::Dot` with a single/multi identifier segment (§4.4). The
    /// field path is left as bare identifiers — resolving a field
    /// reference against a class's layout is a later (out-of-scope) type
    /// checking phase's job, not the elaborator's.
    Field(Box<Expr>, Vec<Ident>, Option<Vec<Type>>),
    /// `UnOp::Dot` with a single integer segment: tuple projection.
    Proj(Box<Expr>, u64),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Tuple(Vec<Expr>),
    Hint(Box<Expr>, Type),
    /// A reference to a resolved func/init/ctor/class/enum/interface/
    /// typealias/extension symbol, keyed by its full dotted path (§4.4).
    Const(String, Option<Vec<Type>>),
    /// A reference to a local or declared variable, by its bare
    /// identifier (§4.4).
    Var(Ident),
    Hole,
    Lam(Vec<Pat>, Box<Expr>),
    App(Box<Expr>, Vec<Expr>),
    Block(Block),
    Ite(Vec<(Cond, Block)>, Option<Block>),
    Switch(Box<Expr>, Vec<SwitchClause>),
    For(Pat, Box<Expr>, Block),
    While(Cond, Block),
    Loop(Block),
    Break(Option<Box<Expr>>),
    Continue,
    Return(Option<Box<Expr>>),
}

/// A resolved generic type parameter: its bound list has itself been
/// elaborated, since a bound type may reference other resolved symbols
/// (e.g. `T: Comparable<U>`, §4.2).
#[derive(Debug, Clone)]
pub struct GenericParam {
    pub name: Ident,
    pub span: Span,
    pub bounds: Vec<Type>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Ident,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ClassLike {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    pub body: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub struct ExtensionDecl {
    pub ident: Ident,
    pub generics: Vec<GenericParam>,
    pub target: Type,
    pub interfaces: Vec<Type>,
    pub body: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    pub params: Vec<Param>,
    pub ret: Option<Type>,
    pub body: Option<Block>,
}

#[derive(Debug, Clone)]
pub struct InitDecl {
    /// Always present: an anonymous `init` has its `init%N` identifier
    /// synthesized by the table builder before elaboration ever sees it
    /// (§4.3).
    pub name: Ident,
    pub params: Vec<Param>,
    pub body: Option<Block>,
}

#[derive(Debug, Clone)]
pub struct Decl {
    pub span: Span,
    pub attrs: Vec<Expr>,
    pub access: fax_par::ast::Access,
    pub kind: DeclKind,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Module(Ident, Vec<Decl>),
    /// Retained unchanged: an `open` import has already done its work
    /// merging symbols into the table by the time elaboration runs, and
    /// carries no further name to resolve (§4.3, §4.4).
    Open(fax_par::ast::Import),
    Class(ClassLike),
    Enum(ClassLike),
    Typealias { name: Ident, generics: Vec<GenericParam>, ty: Type },
    Interface(ClassLike),
    Extension(ExtensionDecl),
    Let { pat: Pat, expr: Expr },
    Func(FuncDecl),
    Init(InitDecl),
    Ctor { name: Ident, params: Vec<Type> },
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub span: Span,
    pub attrs: Vec<Expr>,
    pub kind: StmtKind,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Open(fax_par::ast::Import),
    Let { pat: Pat, expr: Expr, else_block: Option<Block> },
    Bind { pat: Pat, expr: Expr },
    Func(FuncDecl),
    Expr(Expr),
}

/// The elaborated package (§3, §6): the `header` import list is dropped,
/// since by elaboration time every `open` it held has already merged its
/// symbols into the table and carries no further observable content.
#[derive(Debug, Clone)]
pub struct Package {
    pub ident: String,
    pub body: Vec<Decl>,
}
