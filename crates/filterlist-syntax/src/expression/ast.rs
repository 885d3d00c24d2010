use derive_more::Display;

use crate::flags::FlagSet;

pub const TRUE_LITERAL: &str = "true";

/// Parsed condition. The `Display` form is fully parenthesised, which makes the grouping the
/// parser chose visible in logs and test failures.
#[derive(Debug, Clone, Display, Eq, PartialEq)]
pub enum Expr {
    #[display("true")]
    True,
    #[display("{_0}")]
    Flag(String),
    #[display("!{_0}")]
    Not(Box<Expr>),
    #[display("({_0} && {_1})")]
    And(Box<Expr>, Box<Expr>),
    #[display("({_0} || {_1})")]
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn flag<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        if name == TRUE_LITERAL {
            Expr::True
        } else {
            Expr::Flag(name)
        }
    }

    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    pub fn evaluate(&self, flags: &FlagSet) -> bool {
        match self {
            Expr::True => true,
            Expr::Flag(name) => flags.is_enabled(name),
            Expr::Not(e) => !e.evaluate(flags),
            Expr::And(l, r) => l.evaluate(flags) && r.evaluate(flags),
            Expr::Or(l, r) => l.evaluate(flags) || r.evaluate(flags),
        }
    }

    /// Names of all flags the expression reads, in source order.
    pub fn flags(&self) -> Vec<&str> {
        let mut ret = vec![];
        self.collect_flags(&mut ret);
        ret
    }

    fn collect_flags<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::True => {}
            Expr::Flag(name) => out.push(name),
            Expr::Not(e) => e.collect_flags(out),
            Expr::And(l, r) | Expr::Or(l, r) => {
                l.collect_flags(out);
                r.collect_flags(out);
            }
        }
    }
}
