pub mod token;

use logos::Logos;

use crate::diagnostics::Error;
use crate::span::{Span, Spanned};
use token::Token;

pub fn lex(source: &str) -> Result<Vec<Spanned<Token>>, Error> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(Token::Comment) => continue,
            Ok(tok) => {
                tokens.push(Spanned::new(tok, Span::new(span.start, span.end)));
            }
            Err(()) => {
                let offending = &source[span.start..span.end];
                if offending.starts_with('"') {
                    // a string logos could not match either never closes
                    // or carries an unknown escape
                    if source[span.start + 1..].contains('"') {
                        return Err(Error::lex(
                            "invalid escape sequence in string literal",
                            Span::new(span.start, span.end),
                        ));
                    }
                    return Err(Error::lex(
                        "unterminated string literal",
                        Span::new(span.start, source.len()),
                    ));
                }
                return Err(Error::lex(
                    format!("unexpected character '{offending}'"),
                    Span::new(span.start, span.end),
                ));
            }
        }
    }

    Ok(tokens)
}
