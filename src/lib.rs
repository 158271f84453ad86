//! Front-end of a compiler for hierarchical-task-network planning domains.
//!
//! Sources are parsed into an [`Ast`] whose precondition expressions are then
//! rewritten into canonical forms with the passes in [`normal`]:
//! [`flatten`](normal::flatten), [`convert_to_nnf`](normal::convert_to_nnf) and
//! [`convert_to_dnf`](normal::convert_to_dnf).
//!
//! ```
//! use htnc::{compile, Options};
//!
//! let ast = compile("( t1 & (~t2 | t3) )", Options::default()).unwrap();
//! let dnf = ast.preconds[0];
//! assert_eq!(
//!     ast.tree.display(dnf).to_string(),
//!     "Or{ And{ Var[t1] Not{ Var[t2] } } And{ Var[t1] Var[t3] } }"
//! );
//! ```

use std::{path::Path, time::Instant};

pub mod ast;
mod error;
pub mod lexer;
pub mod normal;
mod options;
mod parse;

pub use ast::{Ast, ExprId, ExprKind, Tree};
pub use error::{Diagnostic, Diagnostics, ErrorRepr, PublicError};
pub use options::{Options, MIN_LOOK_AHEAD};
pub use parse::Parser;

/// Parses `source` and converts every precondition to disjunctive normal form.
///
/// All errors in the source are collected. If any was reported, the compilation
/// is failed and the error carries all of them.
pub fn compile(source: &str, options: Options) -> Result<Ast, PublicError> {
    let ts = Instant::now();
    let (mut ast, diagnostics) = Parser::new(source, options).parse();
    for precond in ast.preconds.iter_mut() {
        *precond = normal::convert_to_dnf(&mut ast.tree, *precond);
    }
    log::info!(
        "Compiled {} precondition(s) ({}ms).",
        ast.preconds.len(),
        ts.elapsed().as_millis()
    );
    if diagnostics.has_errors() {
        return Err(diagnostics.into());
    }
    Ok(ast)
}

/// Reads and compiles the file at `path`, see [`compile`].
pub fn compile_file(path: impl AsRef<Path>, options: Options) -> Result<Ast, PublicError> {
    let source = std::fs::read_to_string(path)?;
    compile(&source, options)
}
