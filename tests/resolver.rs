mod common;

use common::run;

fn static_errors(source: &str) -> Vec<String> {
    let (output, lox) = run(source);

    assert!(lox.reporter().had_error(), "expected a static error");
    assert!(output.is_empty(), "nothing may run after a static error");
    assert_eq!(lox.reporter().exit_code(), 65);

    lox.reporter().diagnostics().to_vec()
}

#[test]
fn reading_local_in_own_initializer() {
    assert_eq!(
        static_errors("{ var a = a; }"),
        ["[line 1] Error at 'a': Can't read local variable in its own initializer."]
    );
}

#[test]
fn global_self_reference_is_left_to_runtime() {
    let (_, lox) = run("var a = a;");

    assert!(!lox.reporter().had_error());
    assert!(lox.reporter().had_runtime_error());
    assert_eq!(
        lox.reporter().diagnostics(),
        ["Undefined variable 'a'.\n[line 1]"]
    );
}

#[test]
fn duplicate_local_declaration() {
    assert_eq!(
        static_errors("fun f() {\n  var x = 1;\n  var x = 2;\n}"),
        ["[line 3] Error at 'x': Already a variable with this name in this scope."]
    );
}

#[test]
fn misplaced_return_this_and_super() {
    assert_eq!(
        static_errors("return 1;\nprint this;\nprint super.x;"),
        [
            "[line 1] Error at 'return': Can't return from top-level code.",
            "[line 2] Error at 'this': Can't use 'this' outside of a class.",
            "[line 3] Error at 'super': Can't use 'super' outside of a class.",
        ]
    );
}

#[test]
fn super_without_superclass() {
    assert_eq!(
        static_errors("class A { f() { return super.f(); } }"),
        ["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
    );
}

#[test]
fn returning_a_value_from_an_initializer() {
    assert_eq!(
        static_errors("class A { init() { return 1; } }"),
        ["[line 1] Error at 'return': Can't return a value from an initializer."]
    );
}

#[test]
fn class_inheriting_from_itself() {
    assert_eq!(
        static_errors("class A < A {}"),
        ["[line 1] Error at 'A': A class can't inherit from itself."]
    );
}

#[test]
fn errors_do_not_stop_the_pass() {
    let errors = static_errors("{ var a = 1; var a = 2; }\n{ var b = b; }\nreturn;");

    assert_eq!(errors.len(), 3);
}

#[test]
fn resolution_binds_to_the_declaring_scope() {
    let source = r#"
        var a = "global";
        {
            fun show() { print a; }
            show();
            var a = "block";
            show();
        }
    "#;

    assert_eq!(common::run_ok(source), ["global", "global"]);
}

#[test]
fn deeply_nested_scopes_resolve() {
    let depth = 400;
    let mut source = "{ var a = 1;".repeat(depth);
    source.push_str("{ var b = b; }");
    source.push_str(&"}".repeat(depth));

    assert_eq!(
        static_errors(&source),
        ["[line 1] Error at 'b': Can't read local variable in its own initializer."]
    );
}
