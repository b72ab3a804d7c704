//! The raw AST (spec.md §3): the tree the parser builds directly from
//! tokens, before any name resolution. Every node pairs a `kind` tag with
//! the `span` of source text it came from; nothing here has been resolved
//! against the symbol table yet (that's `fax-sem`'s `elaborated` tree).
//!
//! The raw/elaborated split matters because some rewrites (constructor vs.
//! binding patterns, §4.3 `pat_rewrite`) depend on a preliminary symbol
//! pass that hasn't run when the parser produces this tree.

use fax_util::{Ident, Span};

/// A possibly-qualified identifier: `a`, or `a.b.c`. Used wherever the
/// grammar references a declared type or value by name — not for
/// expression field access, which goes through [`UnOp::Dot`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub span: Span,
    pub ident: Ident,
    pub path: Vec<Ident>,
}

impl Name {
    pub fn simple(ident: Ident, span: Span) -> Self {
        Name { span, ident, path: Vec::new() }
    }
}

/// One segment of a postfix `.` selector on an expression (§4.1: names in
/// `Name` paths are always identifiers; a selector path may additionally
/// contain an integer, as in tuple projection `p.0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSeg {
    Ident(Ident),
    Index(u64),
}

/// An `open` import tree (§3, §4.3). `open M.{C as D, *}` parses as
/// `Node("M", [Alias("C", Some("D")), Wild])`.
#[derive(Debug, Clone)]
pub struct Import {
    pub span: Span,
    pub kind: ImportKind,
}

#[derive(Debug, Clone)]
pub enum ImportKind {
    /// `name.{ nested, ... }` — descend into a child node and keep going.
    Node(Ident, Vec<Import>),
    /// A leaf import, optionally renamed locally.
    Alias(Ident, Option<Ident>),
    /// `*` — import every entry of the target node.
    Wild,
}

/// Access level a declaration carries (§3). Default is `Public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    Public,
    Private,
    Protected,
}

impl Default for Access {
    fn default() -> Self {
        Access::Public
    }
}

/// A type expression (§3).
#[derive(Debug, Clone)]
pub struct Type {
    pub span: Span,
    pub kind: TypeKind,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    /// The missing-annotation placeholder (`let x = ...` with no `: T`).
    Meta,
    Int,
    Bool,
    Char,
    String,
    Unit,
    /// A named type, optionally applied to type arguments: `Option<Int>`.
    Name(Name, Option<Vec<Type>>),
    Tuple(Vec<Type>),
    /// `(In, In) -> Out`.
    Arrow(Vec<Type>, Box<Type>),
}

impl Type {
    pub fn meta(span: Span) -> Self {
        Type { span, kind: TypeKind::Meta }
    }
}

/// A literal value (§3).
#[derive(Debug, Clone)]
pub enum Lit {
    Unit,
    Int(i64),
    Bool(bool),
    Char(char),
    String(String),
}

/// A pattern (§3).
#[derive(Debug, Clone)]
pub struct Pat {
    pub span: Span,
    pub kind: PatKind,
}

#[derive(Debug, Clone)]
pub enum PatKind {
    Lit(Lit),
    Tuple(Vec<Pat>),
    /// A constructor pattern, either written directly (`Some(x)`) or
    /// produced by `pat_rewrite` from a `Name` pattern that resolved to a
    /// `Ctor` symbol (§4.3).
    Ctor(Name, Option<Vec<Type>>, Option<Vec<Pat>>),
    /// A bare name before it is known whether it binds a fresh variable or
    /// names a nullary constructor; `pat_rewrite` resolves the ambiguity.
    Name(Name, Option<Vec<Type>>, Box<Type>, bool),
    Wild,
    Or(Vec<Pat>),
    /// `name @ pat`, as in `b @ _`.
    At(Ident, Box<Type>, bool, Box<Pat>),
}

impl Pat {
    pub fn is_mut(&self) -> bool {
        matches!(self.kind, PatKind::Name(_, _, _, true) | PatKind::At(_, _, true, _))
    }
}

/// Unary-position operators (§3, §4.2 level 8: `+ - & *`, plus the postfix
/// forms promoted into the same enum since the raw AST has only one unary
/// node kind). `Dot` carries the selector path and optional type arguments
/// for `p.field<T>` / `p.0`; `Try` is the postfix `?` operator.
#[derive(Debug, Clone)]
pub enum UnOp {
    Pos,
    Neg,
    Ref,
    Deref,
    Try,
    Dot(Vec<PathSeg>, Option<Vec<Type>>),
}

/// Binary-position operators (§3). `Assign` carries whether it is a plain
/// `=` or one of the compound-arithmetic forms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Assign(AssignMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignMode {
    Set,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// A condition, used by `if` and pattern-condition forms (§4.2): either a
/// plain expression or `let PAT = EXPR`.
#[derive(Debug, Clone)]
pub enum Cond {
    Expr(Expr),
    Let(Pat, Expr),
}

/// One `case`/`default` arm of a `switch` (§4.2). `pat` is `None` for
/// `default`.
#[derive(Debug, Clone)]
pub struct SwitchClause {
    pub span: Span,
    pub pat: Option<Pat>,
    pub guard: Option<Expr>,
    pub body: Vec<Stmt>,
}

/// An expression (§3).
#[derive(Debug, Clone)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

/// A block is just its statement list; the last statement, if it is an
/// `Expr` with no trailing `;`, is the block's value (§4.2).
pub type Block = Vec<Stmt>;

#[derive(Debug, Clone)]
pub enum ExprKind {
    Lit(Lit),
    Unary(UnOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Tuple(Vec<Expr>),
    /// A parenthesized expression with a trailing `: Type` hint.
    Hint(Box<Expr>, Type),
    Name(Name, Option<Vec<Type>>),
    /// `_` used as an expression: a value to be inferred.
    Hole,
    Lam(Vec<Pat>, Box<Expr>),
    App(Box<Expr>, Vec<Expr>),
    Block(Block),
    /// An `if`/`else if`*/`else`? chain. The final `Block` is the `else`,
    /// absent when there is none.
    Ite(Vec<(Cond, Block)>, Option<Block>),
    Switch(Box<Expr>, Vec<SwitchClause>),
    For(Pat, Box<Expr>, Block),
    While(Cond, Block),
    Loop(Block),
    Break(Option<Box<Expr>>),
    Continue,
    Return(Option<Box<Expr>>),
}

/// A generic type parameter together with its bound list, merged from both
/// the `<T: Bound + ...>` list and a trailing `where` clause (§4.2).
#[derive(Debug, Clone)]
pub struct GenericParam {
    pub name: Ident,
    pub span: Span,
    pub bounds: Vec<Type>,
}

/// One `where T: B + ...` constraint, merged into the matching
/// [`GenericParam`] by the parser before the declaration is returned.
#[derive(Debug, Clone)]
pub struct WhereBound {
    pub ty: Type,
    pub bounds: Vec<Type>,
}

/// A function/initializer parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: Ident,
    pub ty: Type,
    pub span: Span,
}

/// A `class`/`enum`/`interface` declaration shape: name, generics, body.
#[derive(Debug, Clone)]
pub struct ClassLike {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    pub body: Vec<Decl>,
}

/// An `extension` declaration: attaches `interfaces` to `target`. Its
/// table-node identifier (`ext%N`) is synthesized by the table builder
/// during `build_constants` and written back here, not produced by the
/// parser (§4.2, §9).
#[derive(Debug, Clone)]
pub struct ExtensionDecl {
    pub ident: Option<Ident>,
    pub generics: Vec<GenericParam>,
    pub target: Type,
    pub interfaces: Vec<Type>,
    pub body: Vec<Decl>,
}

/// A `func` declaration, either top-level/member (with attrs/access on the
/// enclosing [`Decl`]) or local to a block (as a bare [`Stmt`] payload). A
/// `None` body means the declaration closed with `;` rather than `{ ... }`.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: Ident,
    pub generics: Vec<GenericParam>,
    pub params: Vec<Param>,
    pub ret: Option<Type>,
    pub body: Option<Block>,
}

/// An `init` declaration. `name` is `None` when written anonymously, in
/// which case the table builder synthesizes `init%N` (§4.3).
#[derive(Debug, Clone)]
pub struct InitDecl {
    pub name: Option<Ident>,
    pub params: Vec<Param>,
    pub body: Option<Block>,
}

/// A declaration (§3): attribute-prefixed, access-modifier-prefixed, one
/// of the kinds below.
#[derive(Debug, Clone)]
pub struct Decl {
    pub span: Span,
    pub attrs: Vec<Expr>,
    pub access: Access,
    pub kind: DeclKind,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Module(Ident, Vec<Decl>),
    Open(Import),
    Class(ClassLike),
    Enum(ClassLike),
    Typealias { name: Ident, generics: Vec<GenericParam>, ty: Type },
    Interface(ClassLike),
    Extension(ExtensionDecl),
    Let { pat: Pat, expr: Expr },
    Func(FuncDecl),
    Init(InitDecl),
    /// `case Name(Type*)` inside an enum body.
    Ctor { name: Ident, params: Vec<Type> },
}

/// A statement (§3): attribute-prefixed, one of the kinds below.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub span: Span,
    pub attrs: Vec<Expr>,
    pub kind: StmtKind,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Open(Import),
    /// `let PAT = EXPR (else BLOCK)?;`
    Let { pat: Pat, expr: Expr, else_block: Option<Block> },
    /// `let PAT <- EXPR;`
    Bind { pat: Pat, expr: Expr },
    Func(FuncDecl),
    Expr(Expr),
}

/// A full source file: package identifier, `open` header, declaration
/// body (§3, §6). `ident` is supplied by the caller, typically derived
/// from the input file path.
#[derive(Debug, Clone)]
pub struct Package {
    pub ident: String,
    pub header: Vec<Import>,
    pub body: Vec<Decl>,
}
