//! The symbol table (spec.md §3, §4.3): a rooted tree of [`TableNode`]s,
//! one per `module`/`class`/`enum`/`interface`/`extension` scope, each
//! holding the type-level, expression-level, and nested-scope symbols
//! declared directly inside it.
//!
//! Nodes live in a flat arena (`IndexVec<NodeId, TableNode>`) rather than
//! behind `Rc<RefCell<...>>`: a node is never mutated through more than one
//! owner at a time (the builder always has `&mut SymbolTable`), and the
//! "shared nested children" case spec.md describes — the same child
//! reachable from more than one parent's `nested` map after a wildcard
//! import — falls out for free, since what's shared is just a `NodeId`
//! value, not a node. This mirrors the `DefId`-style arena index the
//! original type checker used for its `HIR` nodes.

use std::collections::BTreeSet;

use fax_util::error::{ResolveError, ResolveResult};
use fax_util::{Ident, Span};
use indexmap::IndexMap;

fax_util::index_vec::define_idx!(NodeId);

/// The kind of scope a [`TableNode`] represents. `Typealias`, `Func`,
/// `Init`, and `Ctor` declarations register a [`Symbol`] but never open a
/// node of their own (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    Class,
    Enum,
    Interface,
    Extension,
}

/// The kind of declaration a [`Symbol`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SymbolKind {
    Class,
    Enum,
    Typealias,
    Interface,
    Extension,
    Func,
    Init,
    Ctor,
    Var,
}

/// A single declared name: its access level, its kind, and the dot-joined
/// path from the package root to the declaration (§3: "a `Symbol`'s path
/// always equals its node's path plus its local identifier").
///
/// Ordering and equality are defined on `(kind, path)` alone, not `access`
/// (§3: "order on `Symbol` is lexicographic on `(kind, path)` so sets
/// deduplicate reliably") — two copies of the same declaration reached via
/// different import chains always carry the same access level anyway, so
/// this only matters for putting `Symbol`s in a deterministic `BTreeSet`.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub access: crate::Access,
    pub kind: SymbolKind,
    pub path: String,
}

impl Symbol {
    pub fn new(access: crate::Access, kind: SymbolKind, path: impl Into<String>) -> Self {
        Symbol { access, kind, path: path.into() }
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.path == other.path
    }
}
impl Eq for Symbol {}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.kind, &self.path).cmp(&(other.kind, &other.path))
    }
}

/// One scope in the symbol table tree (§3, §4.3).
#[derive(Debug, Clone)]
pub struct TableNode {
    pub kind: NodeKind,
    pub ident: Ident,
    pub path: String,
    pub parent: Option<NodeId>,
    /// Counter used to synthesize `ext%N`/`init%N` identifiers for
    /// anonymous extensions/initializers declared directly in this node
    /// (§4.3, §9).
    pub counter: u32,
    pub types: IndexMap<Ident, BTreeSet<Symbol>>,
    pub exprs: IndexMap<Ident, BTreeSet<Symbol>>,
    pub nested: IndexMap<Ident, BTreeSet<NodeId>>,
}

impl TableNode {
    fn new(kind: NodeKind, ident: Ident, path: String, parent: Option<NodeId>) -> Self {
        TableNode {
            kind,
            ident,
            path,
            parent,
            counter: 0,
            types: IndexMap::new(),
            exprs: IndexMap::new(),
            nested: IndexMap::new(),
        }
    }
}

/// Which of a [`TableNode`]'s two symbol maps a lookup targets.
#[derive(Clone, Copy)]
enum Space {
    Type,
    Expr,
}

/// The symbol table: an arena of [`TableNode`]s plus the root and the node
/// the builder/elaborator currently has open (§4.3).
pub struct SymbolTable {
    nodes: fax_util::IndexVec<NodeId, TableNode>,
    pub root: NodeId,
}

impl SymbolTable {
    /// A fresh table with just a root `Module` node named `ident`.
    pub fn new(ident: Ident) -> Self {
        let mut nodes = fax_util::IndexVec::new();
        let root = nodes.push(TableNode::new(NodeKind::Module, ident, ident.as_str().to_string(), None));
        SymbolTable { nodes, root }
    }

    pub fn node(&self, id: NodeId) -> &TableNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut TableNode {
        &mut self.nodes[id]
    }

    /// The dot-joined path a child named `ident` of `parent` would have.
    pub fn child_path(&self, parent: NodeId, ident: Ident) -> String {
        format!("{}.{}", self.node(parent).path, ident.as_str())
    }

    /// Open a new child scope under `parent` and register it in `parent`'s
    /// `nested` map under `ident`. Returns the new node's id.
    pub fn push_child(&mut self, parent: NodeId, kind: NodeKind, ident: Ident) -> NodeId {
        let path = self.child_path(parent, ident);
        let id = self.nodes.push(TableNode::new(kind, ident, path, Some(parent)));
        self.nodes[parent].nested.entry(ident).or_default().insert(id);
        id
    }

    /// Allocate the next synthetic counter value for anonymous
    /// declarations inside `node` (§4.3, §9: `ext%N`/`init%N`).
    pub fn next_counter(&mut self, node: NodeId) -> u32 {
        let n = &mut self.nodes[node].counter;
        let c = *n;
        *n += 1;
        c
    }

    /// Register a locally-declared type symbol, failing if `local` is
    /// already occupied in `node`'s `types` map (§3: no local duplicates).
    pub fn declare_type(
        &mut self,
        node: NodeId,
        local: Ident,
        symbol: Symbol,
        span: Span,
    ) -> fax_util::error::SemanticResult<()> {
        self.declare(node, Space::Type, local, symbol, span)
    }

    /// Register a locally-declared expression symbol; see
    /// [`SymbolTable::declare_type`].
    pub fn declare_expr(
        &mut self,
        node: NodeId,
        local: Ident,
        symbol: Symbol,
        span: Span,
    ) -> fax_util::error::SemanticResult<()> {
        self.declare(node, Space::Expr, local, symbol, span)
    }

    fn declare(
        &mut self,
        node: NodeId,
        space: Space,
        local: Ident,
        symbol: Symbol,
        span: Span,
    ) -> fax_util::error::SemanticResult<()> {
        let map = match space {
            Space::Type => &mut self.nodes[node].types,
            Space::Expr => &mut self.nodes[node].exprs,
        };
        let set = map.entry(local).or_default();
        if !set.is_empty() {
            return Err(fax_util::error::SemanticError::DuplicateDeclaration {
                name: local.as_str().to_string(),
                span,
            });
        }
        set.insert(symbol);
        Ok(())
    }

    /// Merge an imported type symbol into `node` under `local`, without the
    /// duplicate check `declare_type` applies (pass 2 dedups via the
    /// `BTreeSet`'s ordering instead; §4.3).
    pub fn merge_type(&mut self, node: NodeId, local: Ident, symbol: Symbol) {
        self.nodes[node].types.entry(local).or_default().insert(symbol);
    }

    /// See [`SymbolTable::merge_type`].
    pub fn merge_expr(&mut self, node: NodeId, local: Ident, symbol: Symbol) {
        self.nodes[node].exprs.entry(local).or_default().insert(symbol);
    }

    pub fn merge_nested(&mut self, node: NodeId, local: Ident, child: NodeId) {
        self.nodes[node].nested.entry(local).or_default().insert(child);
    }

    pub fn remove_type(&mut self, node: NodeId, local: Ident) {
        self.nodes[node].types.shift_remove(&local);
    }

    pub fn remove_expr(&mut self, node: NodeId, local: Ident) {
        self.nodes[node].exprs.shift_remove(&local);
    }

    pub fn remove_nested(&mut self, node: NodeId, local: Ident) {
        self.nodes[node].nested.shift_remove(&local);
    }

    /// The child of `node` created locally for `ident` during
    /// `build_constants` — i.e. the smallest `NodeId` registered under
    /// `ident` in `node.nested`. `build_constants` always allocates every
    /// structural child before any later pass merges an imported node
    /// under the same identifier, so the locally-declared child always has
    /// the smallest id among any same-named entries (§4.3).
    pub fn local_child(&self, node: NodeId, ident: Ident) -> Option<NodeId> {
        self.node(node).nested.get(&ident).and_then(|set| set.iter().next().copied())
    }

    /// Search `node`'s `nested` map, then its ancestors, for a child named
    /// `ident`; the match must be a singleton (§4.3: `find_node`).
    pub fn find_node(&self, from: NodeId, ident: Ident, span: Span) -> ResolveResult<NodeId> {
        let mut cur = Some(from);
        while let Some(nid) = cur {
            if let Some(set) = self.node(nid).nested.get(&ident) {
                return Self::singleton(set, ident, span);
            }
            cur = self.node(nid).parent;
        }
        Err(ResolveError::SymbolNotFound { path: ident.as_str().to_string(), span })
    }

    /// A single-level lookup of `ident` among `node`'s direct children,
    /// with no ancestor climbing (§4.3: used to walk the remainder of a
    /// dotted path once the head has already been resolved).
    pub fn child_node(&self, node: NodeId, ident: Ident, span: Span) -> ResolveResult<NodeId> {
        match self.node(node).nested.get(&ident) {
            Some(set) => Self::singleton(set, ident, span),
            None => Err(ResolveError::SymbolNotFound { path: ident.as_str().to_string(), span }),
        }
    }

    fn singleton(set: &BTreeSet<NodeId>, ident: Ident, span: Span) -> ResolveResult<NodeId> {
        match set.len() {
            1 => Ok(*set.iter().next().unwrap()),
            0 => Err(ResolveError::SymbolNotFound { path: ident.as_str().to_string(), span }),
            n => Err(ResolveError::AmbiguousSymbol { path: ident.as_str().to_string(), count: n, span }),
        }
    }

    /// `find_type_symbol`/`find_expr_symbol` (§4.3): `ident` is the head of
    /// a `Name`, `path` its remaining segments. An empty `path` searches
    /// `from`'s own symbol map, then its ancestors'. A non-empty `path`
    /// finds the ancestor whose `nested` map holds `ident`, walks the rest
    /// of `path` through `nested`, and looks the final segment up in that
    /// node's symbol map.
    pub fn find_type_symbol(&self, from: NodeId, ident: Ident, path: &[Ident], span: Span) -> ResolveResult<Symbol> {
        self.find_symbol(Space::Type, from, ident, path, span)
    }

    pub fn find_expr_symbol(&self, from: NodeId, ident: Ident, path: &[Ident], span: Span) -> ResolveResult<Symbol> {
        self.find_symbol(Space::Expr, from, ident, path, span)
    }

    fn find_symbol(&self, space: Space, from: NodeId, ident: Ident, path: &[Ident], span: Span) -> ResolveResult<Symbol> {
        if path.is_empty() {
            let mut cur = Some(from);
            while let Some(nid) = cur {
                let map = match space {
                    Space::Type => &self.node(nid).types,
                    Space::Expr => &self.node(nid).exprs,
                };
                if let Some(set) = map.get(&ident) {
                    return Self::singleton_symbol(set, ident, span);
                }
                cur = self.node(nid).parent;
            }
            return Err(ResolveError::SymbolNotFound { path: ident.as_str().to_string(), span });
        }

        let mut current = self.find_node(from, ident, span)?;
        for seg in &path[..path.len() - 1] {
            current = self.child_node(current, *seg, span)?;
        }
        let last = *path.last().unwrap();
        let map = match space {
            Space::Type => &self.node(current).types,
            Space::Expr => &self.node(current).exprs,
        };
        match map.get(&last) {
            Some(set) => Self::singleton_symbol(set, last, span),
            None => Err(ResolveError::SymbolNotFound { path: last.as_str().to_string(), span }),
        }
    }

    fn singleton_symbol(set: &BTreeSet<Symbol>, ident: Ident, span: Span) -> ResolveResult<Symbol> {
        match set.len() {
            1 => Ok(set.iter().next().unwrap().clone()),
            0 => Err(ResolveError::SymbolNotFound { path: ident.as_str().to_string(), span }),
            n => Err(ResolveError::AmbiguousSymbol { path: ident.as_str().to_string(), count: n, span }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_is_its_identifier() {
        let table = SymbolTable::new(Ident::intern("app"));
        assert_eq!(table.node(table.root).path, "app");
    }

    #[test]
    fn child_path_is_dot_joined() {
        let mut table = SymbolTable::new(Ident::intern("app"));
        let c = table.push_child(table.root, NodeKind::Class, Ident::intern("Point"));
        assert_eq!(table.node(c).path, "app.Point");
    }

    #[test]
    fn declare_type_rejects_duplicate_in_same_node() {
        let mut table = SymbolTable::new(Ident::intern("app"));
        let name = Ident::intern("Point");
        let sym = Symbol::new(crate::Access::Public, SymbolKind::Class, "app.Point");
        table.declare_type(table.root, name, sym.clone(), Span::DUMMY).unwrap();
        assert!(table.declare_type(table.root, name, sym, Span::DUMMY).is_err());
    }

    #[test]
    fn find_type_symbol_climbs_ancestors_when_path_is_empty() {
        let mut table = SymbolTable::new(Ident::intern("app"));
        let name = Ident::intern("Point");
        table
            .declare_type(table.root, name, Symbol::new(crate::Access::Public, SymbolKind::Class, "app.Point"), Span::DUMMY)
            .unwrap();
        let child = table.push_child(table.root, NodeKind::Class, name);
        let found = table.find_type_symbol(child, name, &[], Span::DUMMY).unwrap();
        assert_eq!(found.path, "app.Point");
    }

    #[test]
    fn find_node_reports_ambiguity() {
        let mut table = SymbolTable::new(Ident::intern("app"));
        let name = Ident::intern("M");
        let a = table.push_child(table.root, NodeKind::Module, name);
        let _b = table.push_child(table.root, NodeKind::Module, name);
        table.merge_nested(table.root, name, a);
        match table.find_node(table.root, name, Span::DUMMY) {
            Err(ResolveError::AmbiguousSymbol { count, .. }) => assert_eq!(count, 2),
            other => panic!("expected AmbiguousSymbol, got {other:?}"),
        }
    }
}
