//! fax-sem - symbol-table construction and name resolution (spec.md §4.3,
//! §4.4): the last two phases of the front-end, consuming the raw AST
//! [`fax_par::ast::Package`] that [`fax_par::Parser::parse_package`]
//! produces.
//!
//! Two passes over that tree, in sequence:
//!
//! - [`builder::TableBuilder`] builds the nested [`table::SymbolTable`],
//!   resolving every `open` import and deciding, for each bare-identifier
//!   pattern, whether it binds a fresh variable or names a nullary
//!   constructor.
//! - [`elaborate::elaborate_package`] walks the same tree a second time,
//!   now with the finished table available, and produces the
//!   [`elaborated::Package`] tree: every `Name` resolved to either a local
//!   binding or a symbol's full dotted path.
//!
//! The free function [`elaborate_package`] at this crate's root (not
//! [`elaborate::elaborate_package`]) is the top-level pipeline entry point:
//! source text in, `(SymbolTable, elaborated::Package)` out.

pub mod builder;
pub mod elaborate;
pub mod elaborated;
pub mod table;

pub use fax_par::ast::Access;

use fax_util::error::FrontendResult;
use fax_util::Ident;

/// Run the whole front-end over `source`: lex, parse, build the symbol
/// table, elaborate. `ident` becomes the package's root identifier (§6),
/// typically derived by the caller from the input file's name.
pub fn elaborate_package(source: &str, ident: impl Into<String>) -> FrontendResult<(table::SymbolTable, elaborated::Package)> {
    let ident = ident.into();
    let mut parser = fax_par::Parser::new(source);
    let mut package = parser.parse_package(ident.clone())?;
    let table = builder::TableBuilder::new(Ident::intern(&ident)).build(&mut package)?;
    let elaborated = elaborate::elaborate_package(&table, &package)?;
    Ok((table, elaborated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_elaborates_a_small_package() {
        let (table, package) = elaborate_package("let x = 1;", "root").unwrap();
        assert_eq!(table.node(table.root).path, "root");
        assert_eq!(package.ident, "root");
        assert_eq!(package.body.len(), 1);
    }

    #[test]
    fn pipeline_surfaces_parse_errors() {
        assert!(elaborate_package("let x = ;", "root").is_err());
    }

    #[test]
    fn pipeline_surfaces_resolve_errors() {
        assert!(elaborate_package("let x: DoesNotExist = 1;", "root").is_err());
    }
}
