//! End-to-end tests driving `ember_runtime::interpret` directly and
//! asserting on captured output, plus a few black-box tests of the compiled
//! binary's exit codes and usage message.

use std::io::Write;
use std::process::Command;

use ember_runtime::Config;

fn run(source: &str) -> Result<String, String> {
    let mut out = Vec::new();
    match ember_runtime::interpret(source, &Config::new(), &mut out) {
        Ok(()) => Ok(String::from_utf8(out).unwrap()),
        Err(e) => Err(e.to_string()),
    }
}

#[test]
fn adds_two_numbers() {
    assert_eq!(run("print 1 + 2;").unwrap(), "'3.0'\n");
}

#[test]
fn concatenates_strings() {
    assert_eq!(run("print \"hi\" + \" there\";").unwrap(), "hi there\n");
}

#[test]
fn globals_read_write_and_reassignment() {
    let out = run("var a = 1; var b = 2; print a + b; a = a + 10; print a;").unwrap();
    assert_eq!(out, "'3.0'\n'11.0'\n");
}

#[test]
fn block_local_does_not_leak_into_outer_scope() {
    let err = run("{ var x = 5; } print x;").unwrap_err();
    assert!(err.contains("Undefined variable 'x'."));
}

#[test]
fn logical_negation_of_comparison() {
    assert_eq!(run("print !(5 == 4);").unwrap(), "true\n");
}

#[test]
fn equal_string_literals_compare_equal() {
    assert_eq!(run("print \"a\" == \"a\";").unwrap(), "true\n");
}

#[test]
fn while_loop_prints_each_iteration() {
    let out = run("var i = 0; while (i < 3) { print i; i = i + 1; }").unwrap();
    assert_eq!(out, "'0.0'\n'1.0'\n'2.0'\n");
}

#[test]
fn for_loop_prints_each_iteration() {
    let out = run("for (var i = 0; i < 3; i = i + 1) print i;").unwrap();
    assert_eq!(out, "'0.0'\n'1.0'\n'2.0'\n");
}

#[test]
fn if_else_takes_the_true_branch() {
    assert_eq!(run("if (true) print \"yes\"; else print \"no\";").unwrap(), "yes\n");
}

fn ember_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ember"))
}

#[test]
fn file_mode_exits_zero_on_success() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "print 1 + 2;").unwrap();

    let output = ember_bin().arg(file.path()).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "'3.0'\n");
}

#[test]
fn file_mode_exits_65_on_compile_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "print 1 +;").unwrap();

    let output = ember_bin().arg(file.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(65));
}

#[test]
fn file_mode_exits_70_on_runtime_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{{ var x = 5; }} print x;").unwrap();

    let output = ember_bin().arg(file.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(70));
}

#[test]
fn file_mode_exits_74_on_missing_file() {
    let output = ember_bin().arg("/no/such/file.ember").output().unwrap();
    assert_eq!(output.status.code(), Some(74));
}

#[test]
fn multiple_positional_args_exit_64_with_usage() {
    let output = ember_bin().arg("a.ember").arg("b.ember").output().unwrap();
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage: ember"));
}
