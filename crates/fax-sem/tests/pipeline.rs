//! End-to-end pipeline tests: source text through `fax-lex` → `fax-par` →
//! `fax-sem`, exercising the same scenarios the unit tests spread across
//! `builder.rs`/`table.rs`/`elaborate.rs` cover individually, but run here
//! through the single public entry point a real caller would use.

use fax_sem::elaborated::{DeclKind, ExprKind, PatKind};
use fax_sem::table::{NodeKind, SymbolKind};
use fax_sem::{elaborate_package, Access};
use fax_util::Ident;

#[test]
fn nested_module_class_enum_registers_every_scope_and_ctor() {
    let (table, _) = elaborate_package("module M { class C { } enum E { case A case B(Int) } }", "root").unwrap();

    assert_eq!(table.node(table.root).path, "root");
    let m = table.local_child(table.root, Ident::intern("M")).unwrap();
    assert_eq!(table.node(m).kind, NodeKind::Module);

    let c = table.local_child(m, Ident::intern("C")).unwrap();
    assert_eq!(table.node(c).kind, NodeKind::Class);
    let e = table.local_child(m, Ident::intern("E")).unwrap();
    assert_eq!(table.node(e).kind, NodeKind::Enum);

    let a = table.find_expr_symbol(e, Ident::intern("A"), &[], fax_util::Span::DUMMY).unwrap();
    assert_eq!(a.kind, SymbolKind::Ctor);
    let b = table.find_expr_symbol(e, Ident::intern("B"), &[], fax_util::Span::DUMMY).unwrap();
    assert_eq!(b.kind, SymbolKind::Ctor);

    let c_sym = table.find_type_symbol(m, Ident::intern("C"), &[], fax_util::Span::DUMMY).unwrap();
    assert_eq!(c_sym.kind, SymbolKind::Class);
    let e_sym = table.find_type_symbol(m, Ident::intern("E"), &[], fax_util::Span::DUMMY).unwrap();
    assert_eq!(e_sym.kind, SymbolKind::Enum);
}

#[test]
fn generic_enum_constructor_call_elaborates_to_full_path() {
    let (_, pkg) = elaborate_package("enum Option<T> { case None case Some(T) }\nlet x = Some(1);", "root").unwrap();

    let let_decl = pkg.body.last().unwrap();
    match &let_decl.kind {
        DeclKind::Let { pat, expr } => {
            assert!(matches!(&pat.kind, PatKind::Var(ident, _, false) if *ident == Ident::intern("x")));
            match &expr.kind {
                ExprKind::App(callee, args) => {
                    match &callee.kind {
                        ExprKind::Const(path, _) => assert_eq!(path, "root.Option.Some"),
                        other => panic!("expected Const callee, got {other:?}"),
                    }
                    assert_eq!(args.len(), 1);
                }
                other => panic!("expected App, got {other:?}"),
            }
        }
        other => panic!("expected Let, got {other:?}"),
    }
}

#[test]
fn tuple_pattern_registers_mut_and_plain_vars_and_skips_wildcard() {
    let (table, pkg) = elaborate_package("let (mut a, _, b @ _) = (1, 2, 3);", "root").unwrap();

    let a = table.find_expr_symbol(table.root, Ident::intern("a"), &[], fax_util::Span::DUMMY).unwrap();
    assert_eq!(a.kind, SymbolKind::Var);
    let b = table.find_expr_symbol(table.root, Ident::intern("b"), &[], fax_util::Span::DUMMY).unwrap();
    assert_eq!(b.kind, SymbolKind::Var);
    assert!(table.find_expr_symbol(table.root, Ident::intern("_"), &[], fax_util::Span::DUMMY).is_err());

    match &pkg.body[0].kind {
        DeclKind::Let { pat, .. } => match &pat.kind {
            PatKind::Tuple(items) => {
                assert!(matches!(&items[0].kind, PatKind::Var(_, _, true)));
                assert!(matches!(&items[1].kind, PatKind::Wild));
                assert!(matches!(&items[2].kind, PatKind::At(..)));
            }
            other => panic!("expected Tuple, got {other:?}"),
        },
        other => panic!("expected Let, got {other:?}"),
    }
}

#[test]
fn generic_call_parses_as_single_app_while_less_than_rolls_back() {
    let (_, pkg2) = elaborate_package(
        "func f<A, B>(a: A, b: B) -> A { a }\nfunc g(a: Int, b: Int) -> Int { f<Int, Int>(a, b); a }",
        "root",
    )
    .unwrap();
    let g = &pkg2.body[1];
    match &g.kind {
        DeclKind::Func(fd) => {
            let body = fd.body.as_ref().unwrap();
            match &body[0].kind {
                fax_sem::elaborated::StmtKind::Expr(e) => match &e.kind {
                    ExprKind::App(callee, args) => {
                        match &callee.kind {
                            ExprKind::Const(path, type_args) => {
                                assert_eq!(path, "root.f");
                                assert_eq!(type_args.as_ref().unwrap().len(), 2);
                            }
                            other => panic!("expected Const, got {other:?}"),
                        }
                        assert_eq!(args.len(), 2);
                    }
                    other => panic!("expected App, got {other:?}"),
                },
                other => panic!("expected Expr stmt, got {other:?}"),
            }
        }
        other => panic!("expected Func, got {other:?}"),
    }
}

#[test]
fn less_than_after_identifier_without_matching_function_is_comparison() {
    let mut parser = fax_par::Parser::new("a<b");
    let expr = parser.parse_expr().unwrap();
    match expr.kind {
        fax_par::ast::ExprKind::Binary(fax_par::ast::BinOp::Lt, l, r) => {
            assert!(matches!(l.kind, fax_par::ast::ExprKind::Name(..)));
            assert!(matches!(r.kind, fax_par::ast::ExprKind::Name(..)));
        }
        other => panic!("expected Binary(Lt, ..), got {other:?}"),
    }
}

#[test]
fn dotted_projection_then_field_with_type_args_splits_correctly() {
    let (_, pkg) = elaborate_package("func f(p: ((Int, Int), Int)) -> Int { p.0.field<Int> }", "root").unwrap();
    match &pkg.body[0].kind {
        DeclKind::Func(fd) => {
            let body = fd.body.as_ref().unwrap();
            match &body.last().unwrap().kind {
                fax_sem::elaborated::StmtKind::Expr(e) => match &e.kind {
                    ExprKind::Field(base, path, type_args) => {
                        assert_eq!(path.len(), 1);
                        assert_eq!(path[0], Ident::intern("field"));
                        assert_eq!(type_args.as_ref().unwrap().len(), 1);
                        match &base.kind {
                            ExprKind::Proj(inner, 0) => {
                                assert!(matches!(inner.kind, ExprKind::Var(ident) if ident == Ident::intern("p")));
                            }
                            other => panic!("expected Proj(_, 0), got {other:?}"),
                        }
                    }
                    other => panic!("expected Field, got {other:?}"),
                },
                other => panic!("expected trailing expr, got {other:?}"),
            }
        }
        other => panic!("expected Func, got {other:?}"),
    }
}

#[test]
fn open_with_alias_and_wildcard_erases_the_aliased_original_name() {
    let (table, _) = elaborate_package(
        "module M { class C { } class F { } }\nmodule N { open M.{C as D, *}; }",
        "root",
    )
    .unwrap();

    let n = table.local_child(table.root, Ident::intern("N")).unwrap();
    let d = table.find_type_symbol(n, Ident::intern("D"), &[], fax_util::Span::DUMMY).unwrap();
    assert_eq!(d.path, "root.M.C");
    assert_eq!(d.kind, SymbolKind::Class);

    // The alias leaf erases `current`'s own `C` entry first; the wildcard
    // leaf that follows it in the same `open` then repopulates `C` under its
    // original identifier straight from `M` (builder.rs's `import_into`
    // runs leaves left-to-right, so the erasure never outlives the wildcard
    // that comes after it).
    let c = table.find_type_symbol(n, Ident::intern("C"), &[], fax_util::Span::DUMMY).unwrap();
    assert_eq!(c.path, "root.M.C");
    let f = table.find_type_symbol(n, Ident::intern("F"), &[], fax_util::Span::DUMMY).unwrap();
    assert_eq!(f.path, "root.M.F");

    let _ = Access::Public;
}
