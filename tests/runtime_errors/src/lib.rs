#![cfg(test)]

use lrquad::{Error, LexError, ParseError, RuntimeError, TokenKind, TranslateError};
use matches::assert_matches;
use test_utils::run;

#[test]
fn test_index_on_non_array() {
    assert_matches!(
        run("{ int n; n[0] = 1; }"),
        Err(Error::Runtime(RuntimeError::NotAnArray(ref name))) if name == "n"
    );
    assert_matches!(
        run("{ b[0] = 1; }"),
        Err(Error::Runtime(RuntimeError::NotAnArray(ref name))) if name == "b"
    );
}

#[test]
fn test_index_out_of_bounds() {
    assert_matches!(
        run("{ int[2] a; a[2] = 1; }"),
        Err(Error::Runtime(RuntimeError::IndexOutOfBounds { index: 2, size: 2, .. }))
    );
    assert_matches!(
        run("{ int[2][2] m; print(m[0][7]); }"),
        Err(Error::Runtime(RuntimeError::IndexOutOfBounds { index: 7, size: 2, .. }))
    );
}

#[test]
fn test_huge_index_into_unsized_array() {
    assert_matches!(
        run("{ int[] a; a[1000000000000000000] = 1; }"),
        Err(Error::Runtime(RuntimeError::ArrayTooLarge { ref symbol, .. })) if symbol == "a"
    );
    assert_matches!(
        run("{ double[] d; d[10000000000] = 1.5; }"),
        Err(Error::Runtime(RuntimeError::ArrayTooLarge { index: 10_000_000_000, .. }))
    );
}

#[test]
fn test_undeclared_and_undefined() {
    assert_matches!(
        run("{ x = 1; }"),
        Err(Error::Runtime(RuntimeError::UndeclaredIdentifier(ref name))) if name == "x"
    );
    assert_matches!(
        run("{ int x; print(x); }"),
        Err(Error::Runtime(RuntimeError::UndefinedValue(ref name))) if name == "x"
    );
    assert_matches!(
        run("{ int[3] a; a[0] = 1; print(a[1]); }"),
        Err(Error::Runtime(RuntimeError::UndefinedValue(ref name))) if name == "a[1]"
    );
}

#[test]
fn test_type_mismatch() {
    assert_matches!(
        run("{ boolean b; b = true; print(b + 1); }"),
        Err(Error::Runtime(RuntimeError::TypeMismatch { op: "+", found: "boolean" }))
    );
    assert_matches!(
        run("{ int[2] a; int x; x = a < 1; }"),
        Err(Error::Runtime(RuntimeError::TypeMismatch { op: "<", found: "array" }))
    );
}

#[test]
fn test_invalid_index() {
    assert_matches!(
        run("{ int[2] a; a[0.5] = 1; }"),
        Err(Error::Runtime(RuntimeError::InvalidIndex(_)))
    );
    assert_matches!(
        run("{ int[2] a; a[0 - 1] = 1; }"),
        Err(Error::Runtime(RuntimeError::InvalidIndex(_)))
    );
}

#[test]
fn test_front_end_errors() {
    assert_matches!(
        run("{ x = 1 @ 2; }"),
        Err(Error::Lex(LexError::UnexpectedCharacter { character: '@', .. }))
    );
    assert_matches!(
        run("{ x = 1 }"),
        Err(Error::Parse(ParseError::UnexpectedToken { ref text, .. })) if text == "}"
    );
    assert_matches!(run("{ x = 1;"), Err(Error::Parse(ParseError::UnexpectedEnd)));
    assert_matches!(
        run("{ x = \"one\"; }"),
        Err(Error::Parse(ParseError::UnsupportedToken { kind: TokenKind::StringLiteral, .. }))
    );
    assert_matches!(
        run("{ int x; double x; }"),
        Err(Error::Translate(TranslateError::Redeclared(ref name))) if name == "x"
    );
    assert_matches!(
        run("{ break; }"),
        Err(Error::Translate(TranslateError::BreakOutsideLoop(_)))
    );
    assert_matches!(
        run("{ foo(); }"),
        Err(Error::Translate(TranslateError::UnknownFunction(ref name))) if name == "foo"
    );
}

#[test]
fn test_errors_render() {
    let err = run("{ int[2] a; a[5] = 1; }").unwrap_err();
    assert_eq!(err.to_string(), "Index 5 out of bounds for 'a' of size 2");

    let err = run("{ x = ; }").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Syntax error: unexpected ';' at line 1, column 7"
    );
}
