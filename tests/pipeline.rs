//! End-to-end: source → program → interpreter output.

use simplescript::ast::Statement;
use simplescript::{
    compile_with_options, run_with_options, Backend, CompileError, CompileOptions, Interpreter,
    InterpreterOptions, Program, RunError,
};

fn compile(source: &str) -> Program {
    match compile_with_options(source, "test.ss", &CompileOptions::silent()) {
        Ok(program) => program,
        Err(err) => panic!("compile failed: {:?}", err.diagnostics()),
    }
}

fn run(source: &str) -> Result<String, RunError> {
    let mut interp = Interpreter::new(Vec::new());
    run_with_options(source, "test.ss", &CompileOptions::silent(), &mut interp)?;
    Ok(String::from_utf8_lossy(&interp.into_output()).into_owned())
}

#[test]
fn test_render_arithmetic() {
    insta::assert_snapshot!(compile("3 + 5 * 2;").to_string(), @r###"
    fn main() {
        display(3 + 5 * 2);
    }
    "###);
}

#[test]
fn test_render_grouping_is_minimal() {
    insta::assert_snapshot!(compile("let x = 7; (((x > 5 && x < 10))) || (x == 0);").to_string(), @r###"
    fn main() {
        let x = 7;
        display(x > 5 && x < 10 || x == 0);
    }
    "###);
    insta::assert_snapshot!(compile("(1 + 2) * 3;").to_string(), @r###"
    fn main() {
        display((1 + 2) * 3);
    }
    "###);
}

#[test]
fn test_render_while_loop() {
    let source = "
        let sum = 0;
        let i = 1;
        while (i <= 5) {
            sum = sum + i;
            i = i + 1;
        }
        sum;
    ";
    insta::assert_snapshot!(compile(source).to_string(), @r###"
    fn main() {
        let sum = 0;
        let i = 1;
        while (i <= 5) {
            sum = sum + i;
            i = i + 1;
        }
        display(sum);
    }
    "###);
}

#[test]
fn test_render_nested_conditionals() {
    let source = r#"
        let temp = 75;
        if (temp > 80) {
            "Hot";
        } else {
            if (temp > 60) {
                "Warm";
            } else {
                "Cold";
            }
        }
    "#;
    insta::assert_snapshot!(compile(source).to_string(), @r###"
    fn main() {
        let temp = 75;
        if (temp > 80) {
            display("Hot");
        } else {
            if (temp > 60) {
                display("Warm");
            } else {
                display("Cold");
            }
        }
    }
    "###);
}

#[test]
fn test_render_functions_and_lambdas() {
    let source = "
        fn add(a, b) => a + b;
        fn show(v) { v; }
        let sq = x => x * x;
        add(sq(2), 3);
    ";
    insta::assert_snapshot!(compile(source).to_string(), @r###"
    fn main() {
        fn add(a, b) {
            return a + b;
        }
        fn show(v) {
            v;
        }
        let sq = (x) => x * x;
        display(add(sq(2), 3));
    }
    "###);
}

#[test]
fn test_demo_outputs() {
    let demos = [
        ("3 + 5 * 2;", "13\n"),
        ("let x = 10; let y = 20; x = x + y; x;", "30\n"),
        ("let a = 15; let b = 10; a > b && b > 5;", "true\n"),
        ("let greeting = \"Hello\"; let name = \"World\"; greeting;", "Hello\n"),
        ("let numbers = [1, 2, 3, 4, 5]; numbers;", "[1, 2, 3, 4, 5]\n"),
        ("let pi = 3.14; let radius = 5.0; pi * radius * radius;", "78.5\n"),
        ("let x = 7; (x > 5 && x < 10) || x == 0;", "true\n"),
    ];
    for (source, expected) in demos {
        assert_eq!(run(source).unwrap(), expected, "{}", source);
    }
}

#[test]
fn test_only_tail_value_is_printed() {
    assert_eq!(run("1; 2; 3;").unwrap(), "3\n");
    assert_eq!(run("let x = 1;").unwrap(), "");
    assert_eq!(run("").unwrap(), "");
}

#[test]
fn test_syntax_error_never_reaches_backend() {
    let err = run("let x = ;\nx;").unwrap_err();
    let RunError::Compile(CompileError::Syntax(diagnostics)) = &err else {
        panic!("expected syntax error, got {:?}", err);
    };
    assert_eq!(diagnostics.len(), 1);
    let rendered = diagnostics[0].render_to_string("test.ss", "let x = ;\nx;");
    assert!(rendered.contains("expected expression"));
    assert!(rendered.contains("test.ss"));
}

#[test]
fn test_backend_failure_carries_program() {
    let err = run("let d = 0; 1 / d;").unwrap_err();
    let RunError::Backend(failure) = err else {
        panic!("expected backend failure");
    };
    assert_eq!(failure.diagnostics[0].message, "division by zero: `1 / 0`");
    let tail = failure.program.statements().last().and_then(Statement::as_display);
    assert_eq!(tail.map(ToString::to_string).as_deref(), Some("1 / d"));
}

#[test]
fn test_fuel_bounds_runaway_programs() {
    let program = compile("let n = 0; while (n >= 0) n = n + 1;");
    let mut interp = Interpreter::with_options(
        Vec::new(),
        InterpreterOptions {
            max_steps: Some(10_000),
            ..InterpreterOptions::default()
        },
    );
    let failure = interp.execute(program).unwrap_err();
    assert!(failure.diagnostics[0].message.contains("step limit"));
}
