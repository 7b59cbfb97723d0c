use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_gendoc")))
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

// -- stdin mode --

#[test]
fn stdin_mode_renders_reference() {
    let input = std::fs::read_to_string(fixture("strings.sh")).unwrap();
    let expected = std::fs::read_to_string(fixture("strings.expected.md")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    assert_eq!(stdout_of(assert), expected);
}

#[test]
fn title_and_brief_without_functions_render_alone() {
    let input = std::fs::read_to_string(fixture("header_only.sh")).unwrap();
    let expected = std::fs::read_to_string(fixture("header_only.expected.md")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    let output = stdout_of(assert);
    assert_eq!(output, expected);
    assert!(!output.contains("## Index"));
}

#[test]
fn internal_function_appears_nowhere() {
    let input = "\
# @description Alpha does things.
# @arg $1 string Input value.
alpha() { true; }

# @internal
# @description Bravo is hidden.
# @arg $1 string Ignored.
bravo() { true; }
";
    let assert = cmd().write_stdin(input).assert().success();
    let output = stdout_of(assert);
    assert!(output.contains("* [alpha](#alpha)"));
    assert!(output.contains("### alpha"));
    assert!(!output.contains("bravo"), "suppressed function leaked: {output}");
}

#[test]
fn arguments_render_in_ascending_order() {
    let input = "\
# @description Order check.
# @arg $2 string Second value.
# @arg $1 string First value.
order() { true; }
";
    let assert = cmd().write_stdin(input).assert().success();
    let output = stdout_of(assert);
    let first = output.find("**$1** (string): First value.").unwrap();
    let second = output.find("**$2** (string): Second value.").unwrap();
    assert!(first < second);
}

#[test]
fn undocumented_function_is_skipped() {
    let input = "\
# @name lib
plain() { true; }
";
    let assert = cmd().write_stdin(input).assert().success();
    let output = stdout_of(assert);
    assert!(!output.contains("## Index"));
    assert!(!output.contains("plain"));
}

#[test]
fn malformed_option_renders_as_plain_bullet() {
    let input = "\
# @description Opts.
# @option oops no dash
opts() { true; }
";
    let assert = cmd()
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::contains("warning:"));
    let output = stdout_of(assert);
    assert!(output.contains("#### Options"));
    assert!(output.contains("* oops no dash"));
}

// -- style selection --

#[test]
fn unknown_style_fails() {
    cmd()
        .args(["-s", "man-page"])
        .write_stdin("# @name x\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown style"));
}

// -- file mode --

#[test]
fn file_mode_creates_output() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture("strings.sh"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("strings.md")).unwrap();
    let expected = std::fs::read_to_string(fixture("strings.expected.md")).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn file_mode_multiple_files() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture("strings.sh"))
        .arg(fixture("header_only.sh"))
        .assert()
        .success();

    assert!(dir.path().join("strings.md").exists());
    assert!(dir.path().join("header_only.md").exists());
}

#[test]
fn file_mode_requires_output() {
    cmd()
        .arg(fixture("strings.sh"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

// -- diagnostics --

#[test]
fn debug_log_captures_trace_lines() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("trace.log");

    cmd()
        .arg("--debug")
        .args(["--debug-log", log.to_str().unwrap()])
        .write_stdin("# @description F.\nf() { true; }\n")
        .assert()
        .success();

    let trace = std::fs::read_to_string(&log).unwrap();
    assert!(trace.contains("documented function: f"));
}
