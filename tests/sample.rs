//! End-to-end check against a realistic dynamic-programming sample.

use std::rc::Rc;

use py2cpp::convert::Converter;
use py2cpp::cpp::BuildContext;
use py2cpp::lexer::Lexer;
use py2cpp::parser;
use py2cpp::types::TypeRegistry;

const SRC: &str = include_str!("../samples/dp.py");

fn transpile(src: &str) -> String {
    let registry = Rc::new(TypeRegistry::with_builtins());
    let tokens = Lexer::new(src).lex().expect("lexing failed");
    let module = parser::parse(tokens).expect("parsing failed");

    let mut converter = Converter::new(Rc::clone(&registry));
    let module = converter.convert_module(module).expect("translation failed");

    let ctx = BuildContext::new(&registry);
    module.build(&ctx)
}

#[test]
fn test_signature_uses_annotated_types() {
    let output = transpile(SRC);
    assert!(
        output.starts_with("int dp(std::vector<int> a, std::vector<int> b, int cost=1) {"),
        "unexpected header in:\n{output}"
    );
}

#[test]
fn test_conditional_expressions_are_parenthesized() {
    let output = transpile(SRC);
    assert!(output.contains("    min_str = ((len(a) < len(b)) ? (a) : (b));"));
    assert!(output.contains("    max_str = ((len(a) > len(b)) ? (a) : (b));"));
}

#[test]
fn test_range_loops_use_the_runtime_helper() {
    let output = transpile(SRC);
    assert!(output.contains("    for (auto x : py2cpp::range(min_size + 1)) {"));
    assert!(output.contains("    for (auto i : py2cpp::range(1, min_size + 1)) {"));
    assert!(output.contains("        for (auto j : py2cpp::range(1, max_size + 1)) {"));
}

#[test]
fn test_nested_subscripts_and_return() {
    let output = transpile(SRC);
    assert!(output.contains("        states[i % 2][0] = i;"));
    assert!(output.contains("    return states[min_size % 2][min_size];"));
}

#[test]
fn test_transpiling_twice_is_stable() {
    assert_eq!(transpile(SRC), transpile(SRC));
}
