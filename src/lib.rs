pub mod builtins;
pub mod diagnostics;
pub mod imports;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod repl;
pub mod span;
pub mod typeck;

use std::path::Path;

use diagnostics::Error;
use interp::value::Value;
use interp::Interpreter;
use parser::ast::Program;

/// Run a `.bn` source file and return the program's result value (`main`'s
/// return value when `main` is defined).
pub fn run_file(path: &Path) -> Result<Value, Error> {
    if path.extension().is_none_or(|ext| ext != "bn") {
        log::warn!("'{}' does not have the .bn extension", path.display());
    }
    let source = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("could not read '{}': {e}", path.display())))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    run_source(&source, base_dir)
}

/// Full pipeline over a source string: lex, parse, resolve imports, type
/// check, evaluate.
pub fn run_source(source: &str, base_dir: &Path) -> Result<Value, Error> {
    let source = strip_shebang(source);
    let mut program = parse_source(&source)?;

    let mut interp = Interpreter::with_base_dir(base_dir.to_path_buf());
    check_with_imports(&mut interp, &mut program)?;

    interp.interpret(&program)
}

/// Lex and parse only.
pub fn parse_source(source: &str) -> Result<Program, Error> {
    let tokens = lexer::lex(source)?;
    let mut parser = parser::Parser::new(&tokens, source);
    parser.parse_program()
}

/// Lex, parse, resolve imports, and type-check without evaluating the
/// program itself. `base_dir` anchors import resolution exactly as in
/// `run_source`, so the two never disagree about a program's validity.
pub fn check_source(source: &str, base_dir: &Path) -> Result<(), Error> {
    let source = strip_shebang(source);
    let mut program = parse_source(&source)?;
    let mut interp = Interpreter::with_base_dir(base_dir.to_path_buf());
    check_with_imports(&mut interp, &mut program)
}

/// Shared checking machinery: resolve imports into `interp`, seed their
/// signatures into a prelude environment, check the program.
fn check_with_imports(interp: &mut Interpreter, program: &mut Program) -> Result<(), Error> {
    imports::resolve_imports(interp, program)?;
    let mut tenv = typeck::env::TypeEnv::with_prelude();
    typeck::seed_imports(&mut tenv, interp)?;
    typeck::check_program(&mut tenv, program)
}

/// Blank out a leading `#!` line (produced by `burn build`) without
/// disturbing byte offsets, so error positions still match the file.
pub fn strip_shebang(source: &str) -> String {
    if !source.starts_with("#!") {
        return source.to_string();
    }
    let line_end = source.find('\n').unwrap_or(source.len());
    let mut out = String::with_capacity(source.len());
    out.extend(std::iter::repeat_n(' ', line_end));
    out.push_str(&source[line_end..]);
    out
}
