use std::fmt::Display;

use thiserror::Error;

use crate::ast::Span;

/// A syntax or name-resolution error found in the compiled source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct Diagnostic {
    pub span: Span,
    /// 1-based line of the start of `span`
    pub line: usize,
    /// 1-based column (in characters) of the start of `span`
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(source: &str, span: Span, message: String) -> Self {
        let (line, column) = line_column(source, span.start);
        Self {
            span,
            line,
            column,
            message,
        }
    }
}

fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Collects all errors reported during one compilation.
/// Reporting never stops the compilation, the caller decides what to do with the collected errors.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Records an error at `span` of `source`.
    pub fn report(&mut self, source: &str, span: Span, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(source, span, message.into());
        log::warn!("{}", diagnostic);
        self.errors.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.errors.iter()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct PublicError(#[from] pub ErrorRepr);

#[derive(Debug, Error)]
pub enum ErrorRepr {
    /// The source contained errors, compilation is marked failed.
    #[error("compilation failed with {} error(s):\n{}", .0.len(), .0)]
    Syntax(Diagnostics),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// Resolve transitive conversion

impl From<Diagnostics> for PublicError {
    fn from(errors: Diagnostics) -> Self {
        PublicError(ErrorRepr::Syntax(errors))
    }
}

impl From<std::io::Error> for PublicError {
    fn from(err: std::io::Error) -> Self {
        PublicError(ErrorRepr::Io(err))
    }
}

impl PublicError {
    /// Returns the collected diagnostics if the error is due to errors in the source.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match &self.0 {
            ErrorRepr::Syntax(d) => Some(d),
            ErrorRepr::Io(_) => None,
        }
    }
}
