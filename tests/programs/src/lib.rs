#![cfg(test)]

use lrquad::quad::{parse_listing, write_listing};
use lrquad::{Nonterminal, Value};
use test_utils::{compile, listing, run, run_with_symbols};

#[test]
fn test_empty_program_has_no_code() {
    let compilation = compile("{}").unwrap();
    assert!(compilation.code.is_empty());
    assert!(compilation.symbols.is_empty());
    assert!(compilation.tree.root.is(Nonterminal::Block));
    assert_eq!(compilation.trace.last().unwrap().action, "Accept");
    assert_eq!(run("{}").unwrap(), Vec::<String>::new());
}

#[test]
fn test_arithmetic_precedence() {
    let source = "{ int x; x = 1 + 2 * 3; }";
    assert_eq!(
        listing(source),
        "\
(*, #2, #3, %T1)
(+, #1, %T1, %T2)
(=, %T2, _, x)
"
    );

    let (_, symbols) = run_with_symbols(source).unwrap();
    assert_eq!(symbols.get("x").unwrap().value, Value::Number(7.0));
}

#[test]
fn test_while_loop() {
    let source = "{ int x; x = 0; while (x < 3) { x = x + 1; } }";
    assert_eq!(
        listing(source),
        "\
(=, #0, _, x)
(label, _, _, @L2)
(<, x, #3, %T1)
(jfalse, %T1, _, @L1)
(+, x, #1, %T2)
(=, %T2, _, x)
(jmp, _, _, @L2)
(label, _, _, @L1)
"
    );

    let (_, symbols) = run_with_symbols(source).unwrap();
    assert_eq!(symbols.get("x").unwrap().value, Value::Number(3.0));
}

#[test]
fn test_while_body_runs_three_times() {
    let output = run("{ int x; x = 0; while (x < 3) { x = x + 1; print(x); } }").unwrap();
    assert_eq!(output, vec!["1", "2", "3"]);
}

#[test]
fn test_break_leaves_innermost_loop() {
    let source = "
    {
        int i; int j; int total;
        i = 0;
        total = 0;
        while (i < 3) {
            j = 0;
            while (true) {
                if (j == 2) { break; }
                j = j + 1;
                total = total + 1;
            }
            i = i + 1;
        }
        print(i, total);
    }";
    assert_eq!(run(source).unwrap(), vec!["3 6"]);
}

#[test]
fn test_break_in_do_while() {
    let source = "
    {
        int n;
        n = 0;
        do {
            n = n + 1;
            if (n >= 4) { break; }
        } while (true);
        print(n);
    }";
    assert_eq!(run(source).unwrap(), vec!["4"]);
}

#[test]
fn test_do_while_runs_body_first() {
    let source = "{ int n; n = 10; do { n = n - 3; } while (n > 0); print(n); }";
    assert_eq!(run(source).unwrap(), vec!["-2"]);

    let source = "{ int n; n = 0; do { print(n); } while (false); }";
    assert_eq!(run(source).unwrap(), vec!["0"]);
}

#[test]
fn test_array_element_round_trip() {
    assert_eq!(
        run("{ int[5] a; a[2] = 5; print(a[2]); }").unwrap(),
        vec!["5"]
    );
}

#[test]
fn test_two_dimensional_array() {
    let source = "
    {
        int[2][3] m;
        int i; int j;
        i = 0;
        while (i < 2) {
            j = 0;
            while (j < 3) {
                m[i][j] = i * 3 + j;
                j = j + 1;
            }
            i = i + 1;
        }
        print(m[1][2], m[0][1]);
        print(m);
    }";
    assert_eq!(run(source).unwrap(), vec!["5 1", "[[0, 1, 2], [3, 4, 5]]"]);
}

#[test]
fn test_array_index_expressions() {
    let source = "
    {
        int[] a;
        int k;
        k = 1;
        a[k + 1] = 10;
        a[a[k + 1] - 10] = 3;
        print(a[0] * a[2]);
    }";
    assert_eq!(run(source).unwrap(), vec!["30"]);
}

#[test]
fn test_conditionals_and_booleans() {
    let source = "
    {
        boolean b; int x;
        x = 4;
        b = x % 2 == 0 && !(x > 10);
        if (b) { print(1); } else { print(0); }
        if (x != 4 || false) { print(2); }
        print(b, x <= 4, x >= 5);
    }";
    assert_eq!(run(source).unwrap(), vec!["1", "true true false"]);
}

#[test]
fn test_reals_and_unary_minus() {
    let source = "{ double d; int x; d = 7. / 2; x = -3 + 5; print(d, 2.5 * 2, -x); }";
    assert_eq!(run(source).unwrap(), vec!["3.5 5 -2"]);
}

#[test]
fn test_print_without_arguments() {
    assert_eq!(run("{ print(); }").unwrap(), vec![""]);
}

#[test]
fn test_declarations_in_nested_blocks_are_global() {
    assert_eq!(
        run("{ { int y; y = 4; } print(y); }").unwrap(),
        vec!["4"]
    );
}

#[test]
fn test_comments_are_ignored() {
    let source = "
    {
        // counter
        int i;
        i = 41; // answer follows
        print(i + 1);
    }";
    assert_eq!(run(source).unwrap(), vec!["42"]);
}

#[test]
fn test_stored_listing_runs_like_compiled_code() {
    let source = "
    {
        int[4] fib; int i;
        fib[0] = 0;
        fib[1] = 1;
        i = 2;
        while (i < 4) {
            fib[i] = fib[i - 1] + fib[i - 2];
            i = i + 1;
        }
        print(fib[3]);
    }";
    let expected = run(source).unwrap();
    assert_eq!(expected, vec!["2"]);

    let mut compilation = compile(source).unwrap();
    let program = parse_listing(&write_listing(&compilation.code)).unwrap();
    assert_eq!(program, compilation.code);
    let output = lrquad::execute(&program, &mut compilation.symbols).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn test_every_grammar_symbol_translates() {
    let source = "
    {
        int a; double b; boolean c; int[3] d; double[] e;
        a = 1; b = 2.0; c = true;
        d[0] = (a + 1) * 2 / 1 - a % 2;
        e[1] = -b;
        if (c && a < 2 || a > 3 && a <= 4 || a >= 5 && a == 1 || a != 6) {
            c = !c;
        } else {
            { a = 0; }
        }
        while (false) { break; }
        do { a = a + 1; } while (a < 3);
        print(a, b, c, d[0], e[1]);
    }";
    assert_eq!(run(source).unwrap(), vec!["3 2 false 3 -2"]);
}

#[test]
fn test_demo_programs() {
    assert_eq!(
        run(include_str!("../../../demos/fibonacci.lq")).unwrap(),
        vec!["[0, 1, 1, 2, 3, 5, 8, 13, 21, 34]"]
    );
    assert_eq!(
        run(include_str!("../../../demos/primes.lq")).unwrap(),
        vec!["2", "3", "5", "7", "11", "13", "17", "19", "23", "29"]
    );
    assert_eq!(
        run(include_str!("../../../demos/bubble_sort.lq")).unwrap(),
        vec!["[1, 2, 3, 4, 5]"]
    );
    assert_eq!(
        run(include_str!("../../../demos/matrix.lq")).unwrap(),
        vec!["[[1, 2, 3], [4, 5, 6]]", "[[1, 4], [2, 5], [3, 6]]"]
    );
}
