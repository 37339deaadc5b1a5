mod common;

use std::fs;
use std::path::Path;

use burnlang::diagnostics::format_error;
use burnlang::interp::value::Value;

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn run_in(dir: &Path, source: &str) -> Value {
    burnlang::run_source(source, dir)
        .unwrap_or_else(|e| panic!("program failed: {}", format_error(source, &e)))
}

#[test]
fn imported_functions_merge_into_the_importer() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "m.bn",
        "fun add(a: int, b: int): int { return a + b }\nfun main(): int { return 0 }",
    );
    let v = run_in(dir.path(), "import \"m\"\nfun main(): int { return add(2, 3) }");
    assert!(matches!(v, Value::Int(5)));
}

#[test]
fn imported_main_is_not_merged() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "m.bn",
        "fun add(a: int, b: int): int { return a + b }\nfun main(): int { return 99 }",
    );
    // no local main: the module's main must not run in its place
    let v = run_in(dir.path(), "import \"m\"\nvar r = add(2, 3)\nr");
    assert!(matches!(v, Value::Int(5)));
}

#[test]
fn module_variables_do_not_leak() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "m.bn", "var hidden = 1\nfun visible(): int { return 2 }");
    let err = burnlang::run_source("import \"m\"\nhidden", dir.path()).unwrap_err();
    assert!(err.to_string().contains("unknown variable 'hidden'"), "got: {err}");
    let v = run_in(dir.path(), "import \"m\"\nvisible()");
    assert!(matches!(v, Value::Int(2)));
}

#[test]
fn imported_types_and_classes_merge() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "shapes.bn",
        "type Rect { w: int, h: int }\n\
         class Area {\n\
             static fun of(r: Rect): int { return r.w * r.h }\n\
         }",
    );
    let src = "import \"shapes\"\n\
               fun main(): int { var r: Rect = { w: 3, h: 4 }; return Area.of(r) }";
    let v = run_in(dir.path(), src);
    assert!(matches!(v, Value::Int(12)));
}

#[test]
fn transitive_imports_resolve_relative_to_the_module() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "n.bn", "fun base(): int { return 10 }");
    write(dir.path(), "m.bn", "import \"n\"\nfun scaled(): int { return base() * 2 }");
    let v = run_in(dir.path(), "import \"m\"\nfun main(): int { return scaled() + base() }");
    assert!(matches!(v, Value::Int(30)));
}

#[test]
fn subdirectory_imports() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "util/math.bn", "fun triple(n: int): int { return n * 3 }");
    let v = run_in(dir.path(), "import \"util/math\"\nfun main(): int { return triple(4) }");
    assert!(matches!(v, Value::Int(12)));
}

#[test]
fn duplicate_imports_load_once() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "m.bn", "fun one(): int { return 1 }");
    let v = run_in(
        dir.path(),
        "import \"m\"\nimport \"m\"\nfun main(): int { return one() }",
    );
    assert!(matches!(v, Value::Int(1)));
}

#[test]
fn grouped_import_loads_every_path() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.bn", "fun fa(): int { return 1 }");
    write(dir.path(), "b.bn", "fun fb(): int { return 2 }");
    let v = run_in(
        dir.path(),
        "import (\"a\" \"b\")\nfun main(): int { return fa() * 10 + fb() }",
    );
    assert!(matches!(v, Value::Int(12)));
}

#[test]
fn cyclic_imports_terminate_with_both_modules_loaded() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.bn", "import \"b\"\nfun fa(): int { return 1 }");
    write(dir.path(), "b.bn", "import \"a\"\nfun fb(): int { return 2 }");
    let v = run_in(
        dir.path(),
        "import \"a\"\nfun main(): int { return fa() * 10 + fb() }",
    );
    assert!(matches!(v, Value::Int(12)));
}

#[test]
fn native_libraries_need_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let v = run_in(
        dir.path(),
        "import (\"date\" \"http\" \"time\")\nfun main(): bool { return Date.isLeapYear(2024) }",
    );
    assert!(matches!(v, Value::Bool(true)));
}

#[test]
fn bundled_standard_library_files_resolve_by_bare_name() {
    // math.bn and strings.bn ship under src/lib/std/ and are found from
    // the interpreter's working directory
    let dir = tempfile::tempdir().unwrap();
    let v = run_in(dir.path(), "import \"math\"\nfun main(): int { return pow(2, 10) }");
    assert!(matches!(v, Value::Int(1024)));
    let v = run_in(
        dir.path(),
        "import \"strings\"\nfun main(): string { return padLeft(\"7\", 3) }",
    );
    assert!(matches!(v, Value::Str(s) if s == "  7"));
}

#[test]
fn std_prefix_aliases_the_bundled_library() {
    let dir = tempfile::tempdir().unwrap();
    let v = run_in(dir.path(), "import \"std/math\"\nfun main(): int { return abs(0 - 4) }");
    assert!(matches!(v, Value::Int(4)));
}

#[test]
fn check_source_resolves_imports_like_run_source() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "helper.bn", "fun double(n: int): int { return n * 2 }");
    let src = "import \"helper\"\nfun main(): int { return double(21) }";
    burnlang::check_source(src, dir.path())
        .unwrap_or_else(|e| panic!("check rejected a runnable program: {}", format_error(src, &e)));
}

#[test]
fn missing_module_with_a_path_is_an_import_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = burnlang::run_source("import \"util/missing\"", dir.path()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("not found"), "got: {msg}");
}

#[test]
fn missing_bare_library_warns_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    // resolves nothing, but the program itself still runs
    let v = run_in(dir.path(), "import \"nosuchlib\"\nfun main(): int { return 1 }");
    assert!(matches!(v, Value::Int(1)));
}

#[test]
fn errors_inside_modules_name_the_module() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.bn", "fun bad(): int { return \"not an int\" }");
    let err = burnlang::run_source("import \"broken\"", dir.path()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("broken.bn"), "got: {msg}");
    assert!(msg.contains("return type mismatch"), "got: {msg}");
}

#[test]
fn local_definitions_shadow_imported_ones() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "m.bn", "fun value(): int { return 1 }");
    let v = run_in(
        dir.path(),
        "import \"m\"\nfun value(): int { return 2 }\nfun main(): int { return value() }",
    );
    assert!(matches!(v, Value::Int(2)));
}
