//! Interactive evaluation loop. State (variables, functions, classes,
//! types) persists across lines in a single interpreter and type
//! environment.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::diagnostics::{format_error, Error};
use crate::interp::value::Value;
use crate::interp::Interpreter;
use crate::parser::ast::Decl;
use crate::typeck;
use crate::typeck::env::TypeEnv;

pub struct Repl {
    interp: Interpreter,
    tenv: TypeEnv,
}

impl Repl {
    pub fn new() -> Self {
        Self {
            interp: Interpreter::new(),
            tenv: TypeEnv::with_prelude(),
        }
    }

    /// Evaluate one input line. `None` means there is nothing to echo.
    pub fn eval_line(&mut self, line: &str) -> Result<Option<Value>, Error> {
        let tokens = crate::lexer::lex(line)?;
        if tokens.is_empty() {
            return Ok(None);
        }
        let mut parser = crate::parser::Parser::new(&tokens, line);
        let mut program = parser.parse_program()?;

        program.decls.retain(|d| {
            if matches!(d.node, Decl::Import(_)) {
                log::warn!("import is ignored in the REPL");
                false
            } else {
                true
            }
        });

        typeck::check_program(&mut self.tenv, &mut program)?;
        let value = self.interp.run_decls(&program)?;
        Ok(match value {
            Value::Null => None,
            v => Some(v),
        })
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

pub fn run() -> i32 {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("could not start the REPL: {e}");
            return 1;
        }
    };

    println!("Burn REPL (:quit to exit)");
    let mut repl = Repl::new();

    loop {
        match editor.readline("burn> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == ":quit" || trimmed == ":q" {
                    break;
                }
                let _ = editor.add_history_entry(&line);
                match repl.eval_line(&line) {
                    Ok(Some(value)) => println!("{value}"),
                    Ok(None) => {}
                    Err(e) => eprintln!("{}", format_error(&line, &e)),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("repl error: {e}");
                return 1;
            }
        }
    }
    0
}
