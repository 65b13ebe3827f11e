use rox::ast::{Expr, Stmt};
use rox::ast_printer::AstPrinter;
use rox::error::ErrorReporter;
use rox::parser::Parser;
use rox::scanner::Scanner;

fn parse(source: &str) -> (Vec<Stmt>, ErrorReporter) {
    let mut reporter = ErrorReporter::silent();
    let (tokens, errors) = Scanner::new(source).scan_all();
    assert!(errors.is_empty(), "lex errors: {:?}", errors);

    let statements = Parser::new(tokens, &mut reporter).parse();
    (statements, reporter)
}

fn print_expr(source: &str) -> String {
    let mut reporter = ErrorReporter::silent();
    let (tokens, _) = Scanner::new(source).scan_all();
    let expr = Parser::new(tokens, &mut reporter)
        .parse_expression()
        .expect("expression should parse");
    AstPrinter::print(&expr)
}

#[test]
fn precedence_and_grouping() {
    assert_eq!(print_expr("1 + 2 * 3"), "(+ 1.0 (* 2.0 3.0))");
    assert_eq!(print_expr("(1 + 2) * -3"), "(* (group (+ 1.0 2.0)) (- 3.0))");
    assert_eq!(print_expr("a == b or !c and d"), "(or (== a b) (and (! c) d))");
    assert_eq!(print_expr("1 < 2 == 3 >= 4"), "(== (< 1.0 2.0) (>= 3.0 4.0))");
}

#[test]
fn calls_properties_and_assignment() {
    assert_eq!(print_expr("a.b(1, 2).c"), "(. (call (. a b) 1.0 2.0) c)");
    assert_eq!(print_expr("a = b = 3"), "(= a (= b 3.0))");
    assert_eq!(print_expr("obj.field = 1"), "(= (. obj field) 1.0)");
    assert_eq!(print_expr("super.greet()"), "(call (super greet))");
}

#[test]
fn for_loop_is_desugared_into_while() {
    let (statements, reporter) = parse("for (var i = 0; i < 3; i = i + 1) print i;");

    assert!(!reporter.had_error());
    assert_eq!(statements.len(), 1);
    assert_eq!(
        AstPrinter::print_stmt(&statements[0]),
        "(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"
    );
}

#[test]
fn class_with_superclass_and_methods() {
    let (statements, reporter) = parse("class B < A { init(x) { this.x = x; } get() { return this.x; } }");

    assert!(!reporter.had_error());

    let Stmt::Class {
        name,
        superclass,
        methods,
    } = &statements[0]
    else {
        panic!("expected class, got {:?}", statements[0]);
    };

    assert_eq!(name.lexeme, "B");
    assert!(matches!(superclass, Some(Expr::Variable { name, .. }) if name.lexeme == "A"));
    let names: Vec<&str> = methods.iter().map(|m| m.name.lexeme.as_str()).collect();
    assert_eq!(names, ["init", "get"]);
    assert_eq!(methods[0].params.len(), 1);
}

#[test]
fn recovers_and_reports_every_syntax_error() {
    let (statements, reporter) = parse("var = 1;\nprint 2;\nvar x = ;\nprint 3;");

    assert_eq!(
        reporter.diagnostics(),
        [
            "[line 1] Error at '=': Expect variable name.",
            "[line 3] Error at ';': Expect expression.",
        ]
    );
    // The two well-formed print statements survive recovery.
    assert_eq!(statements.len(), 2);
}

#[test]
fn invalid_assignment_target_does_not_unwind() {
    let (statements, reporter) = parse("1 + 2 = 3; print 4;");

    assert_eq!(
        reporter.diagnostics(),
        ["[line 1] Error at '=': Invalid assignment target."]
    );
    assert_eq!(statements.len(), 2);
}

#[test]
fn error_at_end_of_input() {
    let (_, reporter) = parse("print 1");

    assert_eq!(
        reporter.diagnostics(),
        ["[line 1] Error at end: Expect ';' after value."]
    );
}

#[test]
fn too_many_arguments_is_reported() {
    let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
    let source = format!("f({});", args.join(", "));
    let (_, reporter) = parse(&source);

    assert!(reporter.had_error());
    assert!(reporter.diagnostics()[0].ends_with("Can't have more than 255 arguments."));
}

fn nested(open: &str, inner: &str, close: &str, depth: usize) -> String {
    format!("{}{}{}", open.repeat(depth), inner, close.repeat(depth))
}

#[test]
fn runaway_nesting_is_a_parse_error() {
    let cases = [
        (format!("print {};", nested("(", "1", ")", 20_000)), "("),
        (format!("print {}1;", "-".repeat(20_000)), "-"),
        (format!("print {}1;", "1 + ".repeat(20_000)), "+"),
        (format!("f{};", "()".repeat(20_000)), "("),
        (format!("a = {}1;", "a = ".repeat(20_000)), "a"),
    ];

    for (source, at) in &cases {
        let (statements, reporter) = parse(source);

        assert!(statements.is_empty());
        assert_eq!(
            reporter.diagnostics(),
            [format!("[line 1] Error at '{}': Too much nesting.", at)]
        );
    }
}

#[test]
fn runaway_block_nesting_is_a_parse_error() {
    let (_, reporter) = parse(&nested("{", "print 1;", "}", 20_000));

    assert!(reporter.had_error());
    assert_eq!(
        reporter.diagnostics()[0],
        "[line 1] Error at '{': Too much nesting."
    );
}

#[test]
fn nesting_under_the_limit_parses() {
    let sources = [
        nested("{", "print 1;", "}", 400),
        format!("print {};", nested("(", "1", ")", 400)),
        format!("print {}1;", "!".repeat(400)),
        format!("print {}1;", "1 + ".repeat(400)),
        nested("if (true) ", "print 1;", "", 400),
    ];

    for source in &sources {
        let (statements, reporter) = parse(source);

        assert!(reporter.diagnostics().is_empty(), "{:?}", reporter.diagnostics());
        assert_eq!(statements.len(), 1);
    }
}
