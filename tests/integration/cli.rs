use std::path::Path;
use std::process::Command;

fn burn() -> Command {
    Command::new(env!("CARGO_BIN_EXE_burn"))
}

fn write_program(dir: &Path, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, source).unwrap();
    path
}

#[test]
fn main_return_value_becomes_the_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_program(
        dir.path(),
        "sum.bn",
        "fun main(): int { var s = 0; for (var i = 0; i < 10; i = i + 1) { s = s + i } return s }",
    );
    let status = burn().arg("run").arg(&file).status().unwrap();
    assert_eq!(status.code(), Some(45));
}

#[test]
fn print_goes_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_program(dir.path(), "hello.bn", "fun main() { print(\"hello world\") }");
    let output = burn().arg("run").arg(&file).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello world\n");
}

#[test]
fn type_errors_exit_one_with_a_report() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_program(dir.path(), "bad.bn", "fun main(): int { return \"nope\" }");
    let output = burn().arg("run").arg(&file).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("type error"), "got: {stderr}");
}

#[test]
fn runtime_errors_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_program(dir.path(), "boom.bn", "fun main(): int { var z = 0; return 1 / z }");
    let output = burn().arg("run").arg(&file).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("division/modulo by zero"), "got: {stderr}");
}

#[test]
fn missing_file_exits_one() {
    let output = burn().arg("run").arg("no/such/file.bn").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn debug_mode_dumps_stages_before_running() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_program(dir.path(), "dbg.bn", "fun main(): int { return 0 }");
    let output = burn().arg("run").arg(&file).arg("--debug").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--- tokens ---"), "got: {stdout}");
    assert!(stdout.contains("--- ast ---"), "got: {stdout}");
    assert!(stdout.contains("type check passed"), "got: {stdout}");
}

#[test]
fn debug_mode_resolves_imports() {
    let dir = tempfile::tempdir().unwrap();
    write_program(dir.path(), "helper.bn", "fun double(n: int): int { return n * 2 }");
    let file = write_program(
        dir.path(),
        "main.bn",
        "import \"helper\"\nfun main(): int { return double(21) }",
    );
    let output = burn().arg("run").arg(&file).arg("--debug").output().unwrap();
    assert_eq!(output.status.code(), Some(42));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("type check passed"), "got: {stdout}");
}

#[test]
fn debug_mode_skips_a_shebang_line() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_program(
        dir.path(),
        "stub.bn",
        "#!/usr/bin/env burn run\nfun main(): int { return 3 }",
    );
    let output = burn().arg("run").arg(&file).arg("--debug").output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("type check passed"), "got: {stdout}");
}

#[test]
fn build_accepts_programs_with_imports() {
    let dir = tempfile::tempdir().unwrap();
    write_program(dir.path(), "helper.bn", "fun double(n: int): int { return n * 2 }");
    let file = write_program(
        dir.path(),
        "main.bn",
        "import \"helper\"\nfun main(): int { return double(21) }",
    );
    let out = dir.path().join("main");
    let status = burn().arg("build").arg(&file).arg("-o").arg(&out).status().unwrap();
    assert!(status.success());
}

#[test]
#[cfg(unix)]
fn build_produces_a_self_running_executable() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_program(dir.path(), "seven.bn", "fun main(): int { return 7 }");
    let out = dir.path().join("seven");

    let status = burn().arg("build").arg(&file).arg("-o").arg(&out).status().unwrap();
    assert!(status.success());

    let status = Command::new(&out).status().unwrap();
    assert_eq!(status.code(), Some(7));
}

#[test]
fn build_rejects_programs_that_do_not_check() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_program(dir.path(), "bad.bn", "fun main(): int { }");
    let out = dir.path().join("bad");
    let output = burn().arg("build").arg(&file).arg("-o").arg(&out).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}
