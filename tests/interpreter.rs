mod common;

use common::{run, run_ok, session};

fn runtime_error(source: &str) -> (Vec<String>, String) {
    let (output, lox) = run(source);

    assert!(!lox.reporter().had_error(), "{:?}", lox.reporter().diagnostics());
    assert!(lox.reporter().had_runtime_error(), "expected a runtime error");
    assert_eq!(lox.reporter().exit_code(), 70);
    assert_eq!(lox.reporter().diagnostics().len(), 1);

    let lines = output.lines().map(str::to_string).collect();
    (lines, lox.reporter().diagnostics()[0].clone())
}

#[test]
fn arithmetic_and_printing() {
    assert_eq!(
        run_ok("print 1 + 2; print 7 / 2; print -3 * 2; print \"a\" + \"b\"; print 1 / 0;"),
        ["3", "3.5", "-6", "ab", "inf"]
    );
}

#[test]
fn truthiness() {
    assert_eq!(
        run_ok("print !nil; print !0; print !\"\"; print !true;"),
        ["true", "false", "false", "false"]
    );
}

#[test]
fn equality_never_raises() {
    assert_eq!(
        run_ok("print nil == nil; print nil == false; print 1 == \"1\"; print \"x\" != \"y\";"),
        ["true", "false", "false", "true"]
    );
}

#[test]
fn logical_operators_return_operands() {
    assert_eq!(
        run_ok("print nil or \"yes\"; print 0 and \"right\"; print false and boom();"),
        ["yes", "right", "false"]
    );
}

#[test]
fn control_flow() {
    let source = r#"
        var total = 0;
        for (var i = 0; i < 5; i = i + 1) {
            if (i == 2) total = total + 100; else total = total + i;
        }
        print total;
        var n = 3;
        while (n > 0) n = n - 1;
        print n;
    "#;

    assert_eq!(run_ok(source), ["108", "0"]);
}

#[test]
fn closures_capture_definition_scope() {
    let source = r#"
        var a = "global";
        {
            fun f() { print a; }
            {
                var a = "block";
                f();
            }
        }
    "#;

    assert_eq!(run_ok(source), ["global"]);
}

#[test]
fn closures_share_mutations() {
    let source = r#"
        fun makeCounter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
        var counter = makeCounter();
        print counter();
        print counter();
        var other = makeCounter();
        print other();
    "#;

    assert_eq!(run_ok(source), ["1", "2", "1"]);
}

#[test]
fn recursion_and_forward_reference_to_globals() {
    let source = r#"
        fun isEven(n) { if (n == 0) return true; return isOdd(n - 1); }
        fun isOdd(n) { if (n == 0) return false; return isEven(n - 1); }
        fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }
        print isEven(10);
        print fib(15);
    "#;

    assert_eq!(run_ok(source), ["true", "610"]);
}

#[test]
fn return_unwinds_out_of_loops_and_blocks() {
    let source = r#"
        fun first() {
            for (var i = 0; ; i = i + 1) {
                { if (i == 3) return i; }
            }
        }
        print first();
        fun nothing() { return; }
        print nothing();
    "#;

    assert_eq!(run_ok(source), ["3", "nil"]);
}

#[test]
fn display_of_callables_and_instances() {
    let source = r#"
        fun f() {}
        class Point {}
        print f;
        print clock;
        print Point;
        print Point();
    "#;

    assert_eq!(run_ok(source), ["<fn f>", "<native fn>", "Point", "Point instance"]);
}

#[test]
fn clock_returns_seconds() {
    assert_eq!(run_ok("print clock() > 1000000000;"), ["true"]);
}

#[test]
fn classes_fields_and_methods() {
    let source = r#"
        class Counter {
            init(start) { this.value = start; }
            bump() { this.value = this.value + 1; return this; }
        }
        var c = Counter(10);
        c.bump().bump();
        print c.value;
        var d = Counter(0);
        print d.value;
        var bump = c.bump;
        bump();
        print c.value;
    "#;

    assert_eq!(run_ok(source), ["12", "0", "13"]);
}

#[test]
fn fields_shadow_methods() {
    let source = r#"
        class A { m() { return "method"; } }
        var a = A();
        print a.m();
        a.m = "field";
        print a.m;
    "#;

    assert_eq!(run_ok(source), ["method", "field"]);
}

#[test]
fn inheritance_and_super() {
    let source = r#"
        class A { greet() { return "A"; } who() { return "A.who"; } }
        class B < A { greet() { return super.greet() + "B"; } }
        class C < B { greet() { return super.greet() + "C"; } }
        print B().greet();
        print C().greet();
        print C().who();
    "#;

    assert_eq!(run_ok(source), ["AB", "ABC", "A.who"]);
}

#[test]
fn initializer_always_returns_the_instance() {
    let source = r#"
        class C {
            init() { this.ready = true; return; }
            method() { return this.ready; }
        }
        var c = C();
        print c.method();
        print c.init() == c;
    "#;

    assert_eq!(run_ok(source), ["true", "true"]);
}

#[test]
fn inherited_initializer_sets_arity() {
    let source = r#"
        class A { init(x) { this.x = x; } }
        class B < A {}
        print B(5).x;
    "#;

    assert_eq!(run_ok(source), ["5"]);
}

#[test]
fn arity_mismatch_abandons_the_run() {
    let (output, error) = runtime_error(
        "fun add(a, b) { return a + b; }\nprint \"before\";\nadd(1);\nprint \"after\";",
    );

    assert_eq!(output, ["before"]);
    assert_eq!(error, "Expected 2 arguments but got 1.\n[line 3]");
}

#[test]
fn type_errors() {
    assert_eq!(
        runtime_error("print -\"x\";").1,
        "Operand must be a number.\n[line 1]"
    );
    assert_eq!(
        runtime_error("print 1 < \"2\";").1,
        "Operands must be numbers.\n[line 1]"
    );
    assert_eq!(
        runtime_error("print 1 + \"2\";").1,
        "Operands must be two numbers or two strings.\n[line 1]"
    );
}

#[test]
fn calling_and_property_errors() {
    assert_eq!(
        runtime_error("\"text\"();").1,
        "Can only call functions and classes.\n[line 1]"
    );
    assert_eq!(
        runtime_error("var x = 1; print x.y;").1,
        "Only instances have properties.\n[line 1]"
    );
    assert_eq!(
        runtime_error("var x = 1; x.y = 2;").1,
        "Only instances have fields.\n[line 1]"
    );
    assert_eq!(
        runtime_error("class A {} print A().missing;").1,
        "Undefined property 'missing'.\n[line 1]"
    );
    assert_eq!(
        runtime_error("var NotAClass = 1; class B < NotAClass {}").1,
        "Superclass must be a class.\n[line 1]"
    );
}

#[test]
fn undefined_variables() {
    assert_eq!(
        runtime_error("print missing;").1,
        "Undefined variable 'missing'.\n[line 1]"
    );
    assert_eq!(
        runtime_error("missing = 1;").1,
        "Undefined variable 'missing'.\n[line 1]"
    );
}

#[test]
fn unbounded_recursion_is_a_runtime_error() {
    let (_, error) = runtime_error("fun loop(n) { return loop(n + 1); }\nloop(0);");

    assert_eq!(error, "Stack overflow.\n[line 1]");
}

#[test]
fn repl_state_survives_errors() {
    let (mut lox, out) = session();

    lox.run("var count = 1; fun bump() { count = count + 1; }");
    lox.run("{ var local = 1; bump(); nope(); }");
    assert!(lox.reporter().had_runtime_error());

    lox.run("print count;");
    assert_eq!(out.contents(), "2\n");

    lox.run("var = ;");
    assert!(lox.reporter().had_error());
    lox.run("print local;");
    assert_eq!(
        lox.reporter().diagnostics().last().map(String::as_str),
        Some("Undefined variable 'local'.\n[line 1]")
    );
}

#[test]
fn repl_prompt_runs_each_line() {
    let (mut lox, out) = session();
    let input = "var a = 2;\nprint a * 21;\nprint oops;\nprint a;\n";
    let mut prompt = Vec::new();

    lox.run_prompt(input.as_bytes(), &mut prompt).unwrap();

    assert_eq!(out.contents(), "42\n2\n");
    assert_eq!(String::from_utf8(prompt).unwrap(), "> > > > > \n");
    // Reset after every line.
    assert!(lox.reporter().diagnostics().is_empty());
}

#[test]
fn rerunning_a_program_is_deterministic() {
    let source = r#"
        class Node { init(v, next) { this.v = v; this.next = next; } }
        fun sum(list) { if (list == nil) return 0; return list.v + sum(list.next); }
        print sum(Node(1, Node(2, Node(3, nil))));
    "#;

    assert_eq!(run_ok(source), run_ok(source));
    assert_eq!(run_ok(source), ["6"]);
}

#[test]
fn deeply_nested_programs_run() {
    let depth = 400;

    let blocks = format!(
        "var n = 0;{}print n;{}",
        "{ n = n + 1;".repeat(depth),
        "}".repeat(depth)
    );
    assert_eq!(run_ok(&blocks), ["400"]);

    let parens = format!("print {}1 + 2{};", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(run_ok(&parens), ["3"]);

    let negations = format!("print {}1;", "-".repeat(depth));
    assert_eq!(run_ok(&negations), ["1"]);

    let sum = format!("print {}1;", "1 + ".repeat(depth));
    assert_eq!(run_ok(&sum), ["401"]);
}

#[test]
fn runaway_nesting_is_rejected_before_running() {
    let depth = 20_000;
    let sources = [
        format!("{}print 1;{}", "{".repeat(depth), "}".repeat(depth)),
        format!("print {}1{};", "(".repeat(depth), ")".repeat(depth)),
        format!("print {}1;", "-".repeat(depth)),
    ];

    for source in &sources {
        let (output, lox) = run(source);

        assert!(output.is_empty());
        assert!(lox.reporter().had_error());
        assert_eq!(lox.reporter().exit_code(), 65);
        assert!(lox.reporter().diagnostics()[0].ends_with("Too much nesting."));
    }
}

#[test]
fn standalone_expressions_evaluate() {
    use rox::error::ErrorReporter;
    use rox::interpreter::Interpreter;
    use rox::parser::Parser;
    use rox::scanner::Scanner;
    use rox::value::Value;

    let mut interpreter = Interpreter::with_output(Box::new(std::io::sink()));
    let mut evaluate = |source: &str| {
        let mut reporter = ErrorReporter::silent();
        let (tokens, _) = Scanner::new(source).scan_all();
        let expr = Parser::new(tokens, &mut reporter)
            .parse_expression()
            .expect("expression should parse");
        interpreter.evaluate_expression(&expr)
    };

    assert_eq!(evaluate("(1 + 2) * 4").unwrap(), Value::Number(12.0));
    assert_eq!(
        evaluate("\"a\" + 1").unwrap_err().to_string(),
        "Operands must be two numbers or two strings.\n[line 1]"
    );
    assert_eq!(evaluate("clock() > 0").unwrap(), Value::Bool(true));
}
