//! Recursive import resolution.
//!
//! Each import is resolved against a small candidate list, loaded once
//! (canonicalized paths are recorded in a visited set shared with child
//! contexts, which also breaks cycles), evaluated in a fresh child
//! interpreter, and merged into the importer: type definitions, classes,
//! and every function except `main`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::diagnostics::Error;
use crate::interp::value::Value;
use crate::interp::Interpreter;
use crate::parser::ast::{Decl, ImportPath, Program};
use crate::span::Span;
use crate::typeck;

/// Names served by the embedded library bundle: importing them registers
/// native bindings and never touches the filesystem.
const NATIVE_LIBS: [&str; 3] = ["date", "http", "time"];

/// Resolve every top-level import of a program into `interp`.
pub fn resolve_imports(interp: &mut Interpreter, program: &Program) -> Result<(), Error> {
    for decl in &program.decls {
        if let Decl::Import(paths) = &decl.node {
            for path in paths {
                resolve_import(interp, &path.node, path.span)?;
            }
        }
    }
    Ok(())
}

pub fn resolve_import(
    interp: &mut Interpreter,
    import: &ImportPath,
    span: Span,
) -> Result<(), Error> {
    // the native libraries are already bound in every environment
    if NATIVE_LIBS.contains(&import.raw.as_str()) {
        return Ok(());
    }

    let Some(path) = find_module(&interp.base_dir, import) else {
        if !import.raw.contains('/') {
            log::warn!("standard library '{}' not found, continuing", import.raw);
            return Ok(());
        }
        return Err(Error::import(
            PathBuf::from(&import.path),
            Error::runtime(format!("module '{}' not found", import.raw), span),
        ));
    };
    let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
    // already loaded (or currently loading): cycle broken silently
    if !interp.visited.borrow_mut().insert(canonical) {
        return Ok(());
    }

    load_module(interp, &path).map_err(|e| Error::import(path.clone(), e))
}

/// Candidate locations in probe order: the rewritten path itself, the raw
/// path, each under the importer's directory, under `src/lib/std/`, and
/// under `src/lib/`, with and without a `.bn` suffix. First hit wins.
fn find_module(base_dir: &Path, import: &ImportPath) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    let mut seen = HashSet::new();

    for name in [import.path.as_str(), import.raw.as_str()] {
        for stem in [name.to_string(), format!("{name}.bn")] {
            for root in [None, Some(base_dir)] {
                for prefix in [None, Some("src/lib/std"), Some("src/lib")] {
                    let mut p = root.map(Path::to_path_buf).unwrap_or_default();
                    if let Some(prefix) = prefix {
                        p.push(prefix);
                    }
                    p.push(&stem);
                    if seen.insert(p.clone()) {
                        candidates.push(p);
                    }
                }
            }
        }
    }

    candidates.into_iter().find(|p| p.is_file())
}

/// Lex, parse, type-check, and evaluate a module in a child context, then
/// merge its declarations into the importer.
fn load_module(interp: &mut Interpreter, path: &Path) -> Result<(), Error> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("could not read '{}': {e}", path.display())))?;

    let tokens = crate::lexer::lex(&source)?;
    let mut parser = crate::parser::Parser::new(&tokens, &source);
    let mut program = parser.parse_program()?;

    let module_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    let mut child = interp.child(module_dir);
    resolve_imports(&mut child, &program)?;

    let mut tenv = typeck::env::TypeEnv::with_prelude();
    typeck::seed_imports(&mut tenv, &child)?;
    typeck::check_program(&mut tenv, &mut program)?;

    child.run_decls(&program)?;

    // merge everything but `main` and the child's variable bindings
    for (name, fields) in child.types {
        interp.types.entry(name).or_insert(fields);
    }
    for (name, class) in child.classes {
        interp.env.define(name.clone(), Value::Class(Rc::clone(&class)));
        interp.classes.insert(name, class);
    }
    for (name, func) in child.functions {
        if name != "main" {
            interp.functions.insert(name, func);
        }
    }

    Ok(())
}
