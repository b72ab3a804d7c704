//! The process-wide immutable keyword map (spec.md §9, "Global state": "the
//! keyword table is a process-wide immutable map; it is initialized once at
//! program start and is never mutated"). Covers both the ordinary keywords
//! and the builtin-type names, since §4.1 looks both up through the same
//! table.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::token::TokenKind;

static KEYWORDS: LazyLock<FxHashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    use TokenKind::*;
    [
        ("class", Class),
        ("enum", Enum),
        ("interface", Interface),
        ("extension", Extension),
        ("func", Func),
        ("init", Init),
        ("let", Let),
        ("mut", Mut),
        ("if", If),
        ("else", Else),
        ("switch", Switch),
        ("case", Case),
        ("default", Default),
        ("for", For),
        ("in", In),
        ("while", While),
        ("loop", Loop),
        ("return", Return),
        ("break", Break),
        ("continue", Continue),
        ("module", Module),
        ("import", Import),
        ("open", Open),
        ("as", As),
        ("type", Type),
        ("where", Where),
        ("private", Private),
        ("protected", Protected),
        ("true", True),
        ("false", False),
        ("Int", KwInt),
        ("Bool", KwBool),
        ("Char", KwChar),
        ("String", KwString),
    ]
    .into_iter()
    .collect()
});

/// Look up `lexeme` in the keyword table. Returns `None` for an ordinary
/// identifier.
pub fn lookup(lexeme: &str) -> Option<TokenKind> {
    KEYWORDS.get(lexeme).copied()
}
