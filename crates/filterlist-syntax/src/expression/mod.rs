//! Condition expressions of the `!#if` directive.
//!
//! Evaluation happens in two steps: [`parse_expression`] turns the text into an [`Expr`] and
//! [`Expr::evaluate`] folds it against a [`FlagSet`]. Every malformed expression is rejected
//! while parsing, so evaluation itself cannot fail.
use thiserror::Error;

use crate::flags::FlagSet;

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::Expr;
pub use parser::parse_expression;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum SyntaxError {
    #[error("Empty condition")]
    EmptyCondition,

    #[error("Incorrect brackets: {0}")]
    IncorrectBrackets(String),

    #[error("Unexpected '{token}' at {offset} in condition: {expression}")]
    UnexpectedToken {
        token: String,
        /// Byte offset of `token` in the trimmed expression
        offset: usize,
        expression: String,
    },
}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Parses and evaluates `expression` in one go.
///
/// ```
/// use filterlist_syntax::{evaluate, FlagSet};
/// let flags = FlagSet::new().with("adguard", true);
/// assert_eq!(evaluate("adguard && !adguard_ext_safari", &flags), Ok(true));
/// assert!(evaluate("(adguard", &flags).is_err());
/// ```
pub fn evaluate(expression: &str, flags: &FlagSet) -> SyntaxResult<bool> {
    Ok(parse_expression(expression)?.evaluate(flags))
}

/// Checks that parentheses never close before they open and that all of them are closed.
pub fn brackets_balanced(expression: &str) -> bool {
    let mut depth: usize = 0;
    for c in expression.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }

    depth == 0
}
