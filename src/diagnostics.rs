use std::path::PathBuf;

use thiserror::Error;

use crate::span::{line_col, Span};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Lexical error: {msg}")]
    Lex { msg: String, span: Span },

    #[error("Syntax error: {msg}")]
    Syntax { msg: String, span: Span },

    #[error("Type error: {msg}")]
    Type { msg: String, span: Span },

    #[error("Runtime error: {msg}")]
    Runtime { msg: String, span: Span },

    /// Error raised while resolving or evaluating an imported module.
    #[error("import '{}': {source}", path.display())]
    Import {
        path: PathBuf,
        source: Box<Error>,
    },

    #[error("IO error: {msg}")]
    Io { msg: String },
}

impl Error {
    pub fn lex(msg: impl Into<String>, span: Span) -> Self {
        Self::Lex { msg: msg.into(), span }
    }

    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::Syntax { msg: msg.into(), span }
    }

    pub fn type_err(msg: impl Into<String>, span: Span) -> Self {
        Self::Type { msg: msg.into(), span }
    }

    pub fn runtime(msg: impl Into<String>, span: Span) -> Self {
        Self::Runtime { msg: msg.into(), span }
    }

    pub fn import(path: PathBuf, source: Error) -> Self {
        Self::Import { path, source: Box::new(source) }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io { msg: msg.into() }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Error::Lex { .. } => "Lexical",
            Error::Syntax { .. } => "Syntax",
            Error::Type { .. } => "Type",
            Error::Runtime { .. } => "Runtime",
            Error::Import { .. } => "Import",
            Error::Io { .. } => "IO",
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Lex { span, .. }
            | Error::Syntax { span, .. }
            | Error::Type { span, .. }
            | Error::Runtime { span, .. } => Some(*span),
            Error::Import { source, .. } => source.span(),
            Error::Io { .. } => None,
        }
    }

    fn message(&self) -> String {
        match self {
            Error::Lex { msg, .. }
            | Error::Syntax { msg, .. }
            | Error::Type { msg, .. }
            | Error::Runtime { msg, .. }
            | Error::Io { msg } => msg.clone(),
            Error::Import { path, source } => {
                format!("'{}': {}", path.display(), source.message())
            }
        }
    }
}

/// Format an error as `<Stage> error at line L, column C: <msg>`, falling
/// back to `<Stage> error: <msg>` when no position is known.
pub fn format_error(source: &str, err: &Error) -> String {
    match err.span() {
        Some(span) => {
            let (line, col) = line_col(source, span.start);
            format!("{} error at line {}, column {}: {}", err.stage(), line, col, err.message())
        }
        None => format!("{} error: {}", err.stage(), err.message()),
    }
}

/// Render an error with ariadne for nice terminal output.
pub fn render_error(source: &str, _filename: &str, err: &Error) {
    use ariadne::{Label, Report, ReportKind, Source};

    match err.span() {
        Some(span) => {
            Report::build(ReportKind::Error, (), span.start)
                .with_message(format!("{} error", err.stage().to_lowercase()))
                .with_label(Label::new(span.start..span.end).with_message(err.message()))
                .finish()
                .eprint(Source::from(source))
                .ok();
        }
        None => {
            eprintln!("{}", format_error(source, err));
        }
    }
}
