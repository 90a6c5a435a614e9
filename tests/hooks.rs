use std::rc::Rc;

use py2cpp::convert::Converter;
use py2cpp::cpp::BuildContext;
use py2cpp::lexer::Lexer;
use py2cpp::parser;
use py2cpp::types::TypeRegistry;

fn build_with_registry(src: &str, registry: Rc<TypeRegistry>) -> Vec<String> {
    let tokens = Lexer::new(src).lex().expect("lexing failed");
    let module = parser::parse(tokens).expect("parsing failed");

    let mut converter = Converter::new(Rc::clone(&registry));
    let module = converter.convert_module(module).expect("translation failed");

    let ctx = BuildContext::new(&registry);
    module.body.iter().map(|stmt| stmt.build(&ctx)).collect()
}

fn build(src: &str) -> Vec<String> {
    build_with_registry(src, Rc::new(TypeRegistry::with_builtins()))
}

#[test]
fn test_math_pow_call_is_scoped() {
    assert_eq!(build("math.pow(x, 2)"), ["std::pow(x, 2);"]);
}

#[test]
fn test_power_operator_reaches_std_pow() {
    assert_eq!(build("x ** 2"), ["std::pow(x, 2);"]);
}

#[test]
fn test_tuple_literal_becomes_make_tuple() {
    assert_eq!(build("(1, 2, 3)"), ["std::make_tuple(1, 2, 3);"]);
}

#[test]
fn test_bare_tuple_becomes_make_tuple() {
    assert_eq!(build("x = 1, 2"), ["x = std::make_tuple(1, 2);"]);
}

#[test]
fn test_range_call_is_scoped() {
    assert_eq!(
        build("for i in range(10):\n    pass"),
        ["for (auto i : py2cpp::range(10)) {\n\n}"]
    );
}

#[test]
fn test_none_becomes_nullptr() {
    assert_eq!(build("x = None"), ["x = nullptr;"]);
}

#[test]
fn test_none_in_comparison_becomes_nullptr() {
    assert_eq!(build("x == None"), ["x == nullptr;"]);
}

#[test]
fn test_print_call_becomes_stream_output() {
    assert_eq!(build("print(\"hello\")"), ["std::cout << \"hello\" << std::endl;"]);
}

#[test]
fn test_print_with_several_arguments_chains_insertions() {
    assert_eq!(build("print(a, b, 1)"), ["std::cout << a << b << 1 << std::endl;"]);
}

#[test]
fn test_legacy_print_statement_becomes_stream_output() {
    assert_eq!(build("print 1, 2"), ["std::cout << 1 << 2 << std::endl;"]);
}

#[test]
fn test_print_inside_function_is_indented() {
    assert_eq!(
        build("def test():\n    print(\"x\")"),
        ["void test() {\n    std::cout << \"x\" << std::endl;\n}"]
    );
}

#[test]
fn test_docstring_param_types_reach_the_signature() {
    assert_eq!(
        build("def test(s, n):\n    \"\"\"\n    :param str s: text\n    :param int n: count\n    \"\"\"\n    pass"),
        ["void test(std::string s, int n) {\n\n}"]
    );
}

#[test]
fn test_docstring_rtype_compound_falls_back_to_void() {
    assert_eq!(
        build("def test():\n    \":rtype: list of str\"\n    pass"),
        ["void test() {\n\n}"]
    );
}

#[test]
fn test_docstring_types_use_the_registry() {
    let mut registry = TypeRegistry::with_builtins();
    registry.register("Spam", "Spam *");

    assert_eq!(
        build_with_registry(
            "def test(s):\n    \":param Spam s: doc\"\n    pass",
            Rc::new(registry)
        ),
        ["void test(Spam * s) {\n\n}"]
    );
}

#[test]
fn test_keyword_argument_emits_as_declaration() {
    assert_eq!(
        build("f(a, key=1)"),
        ["f(a, static const auto key = 1);"]
    );
}
