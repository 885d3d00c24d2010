//! ## Introduction
//! Filter lists carry a tiny preprocessor. Maintainers use it to ship one list to several ad
//! blockers:
//!
//! ```text
//! ||example.org^
//! !#if (adguard && !adguard_ext_safari)
//! example.org##.banner
//! !#else
//! example.org##.banner:not(.safe)
//! !#endif
//! !#include subdir/extra.txt
//! ```
//!
//! This crate knows how to recognise those directives ([`directive`]) and how to parse and
//! evaluate the condition expressions of `!#if` ([`expression`]) against a [`FlagSet`].
//! Resolving whole documents lives in `filterlist-compiler`.
//!
//! ## Expressions
//! A condition is built from flag names, the literal `true`, `!`, `&&`, `||` and parentheses.
//! `||` binds loosest, then `&&`, then `!`. Flags that the caller did not define are false.
pub mod directive;
pub mod expression;
pub mod flags;


pub use directive::{Directive, DirectiveKind};
pub use expression::{evaluate, parse_expression, Expr, SyntaxError, SyntaxResult};
pub use flags::FlagSet;
