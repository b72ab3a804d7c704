//! Property test for spec.md §8 invariant 1 (round-trip span discipline) as
//! it applies to the token stream alone: every token's span has
//! `start <= end`, and successive tokens' spans never go backwards or
//! overlap.

use fax_lex::{Lexer, TokenKind};
use proptest::prelude::*;

fn token_vocabulary() -> Vec<&'static str> {
    vec![
        "class", "enum", "interface", "extension", "func", "init", "let", "mut", "if", "else",
        "switch", "case", "default", "for", "in", "while", "loop", "return", "break", "continue",
        "module", "import", "open", "as", "type", "where", "private", "protected", "true",
        "false", "Int", "Bool", "Char", "String", "foo", "Bar", "_", "42", "0", "123456",
        "(", ")", "[", "]", "{", "}", ",", ".", "..", ":", "::", ";", "|", "@", "=", "+=", "-=",
        "*=", "/=", "%=", "->", "<-", "=>", "+", "-", "*", "/", "%", "&", "&&", "||", "!", "==",
        "!=", "<", ">", "<=", ">=", "?",
    ]
}

fn token_sequence() -> impl Strategy<Value = Vec<&'static str>> {
    let vocab = token_vocabulary();
    prop::collection::vec(prop::sample::select(vocab), 0..64)
}

proptest! {
    #[test]
    fn token_spans_are_well_formed_and_monotonic(tokens in token_sequence()) {
        let source = tokens.join(" ");
        let mut lexer = Lexer::new(&source);

        let mut prev_end = None;
        loop {
            let tok = lexer.next().expect("vocabulary only contains well-formed tokens");
            prop_assert!(tok.span.start <= tok.span.end);
            if let Some(prev_end) = prev_end {
                prop_assert!(prev_end <= tok.span.start);
            }
            prev_end = Some(tok.span.end);
            if tok.kind == TokenKind::Eof {
                break;
            }
        }
    }

    #[test]
    fn token_count_matches_vocabulary_length(tokens in token_sequence()) {
        let source = tokens.join(" ");
        let mut lexer = Lexer::new(&source);
        let mut count = 0;
        loop {
            let tok = lexer.next().expect("vocabulary only contains well-formed tokens");
            if tok.kind == TokenKind::Eof {
                break;
            }
            count += 1;
        }
        prop_assert_eq!(count, tokens.len());
    }
}
