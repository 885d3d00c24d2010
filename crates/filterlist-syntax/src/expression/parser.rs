use std::iter::Peekable;
use std::vec::IntoIter;

use tracing::trace;

use crate::expression::ast::Expr;
use crate::expression::lexer::{tokenize, Token, TokenKind};
use crate::expression::{brackets_balanced, SyntaxError, SyntaxResult};

struct Parser<'a> {
    expression: &'a str,
    tokens: Peekable<IntoIter<Token<'a>>>,
}

impl<'a> Parser<'a> {
    fn eat(&mut self, kind: TokenKind) -> bool {
        self.tokens.next_if(|t| t.kind == kind).is_some()
    }

    fn parse_or(&mut self) -> SyntaxResult<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(TokenKind::Or) {
            let right = self.parse_and()?;
            left = Expr::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> SyntaxResult<Expr> {
        let mut left = self.parse_unary()?;
        while self.eat(TokenKind::And) {
            let right = self.parse_unary()?;
            left = Expr::and(left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> SyntaxResult<Expr> {
        if self.eat(TokenKind::Not) {
            return Ok(Expr::not(self.parse_unary()?));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> SyntaxResult<Expr> {
        let Some(token) = self.tokens.next() else {
            return Err(SyntaxError::EmptyCondition);
        };

        match token.kind {
            TokenKind::Name => Ok(Expr::flag(token.text)),
            TokenKind::OpenParen => {
                let inner = self.parse_or()?;
                if self.eat(TokenKind::CloseParen) {
                    Ok(inner)
                } else {
                    Err(self.unexpected())
                }
            }
            // An operator or `)` where an operand should be
            _ => Err(SyntaxError::EmptyCondition),
        }
    }

    fn unexpected(&mut self) -> SyntaxError {
        match self.tokens.peek() {
            Some(token) => SyntaxError::UnexpectedToken {
                token: token.text.to_string(),
                offset: token.offset,
                expression: self.expression.to_string(),
            },
            // Brackets are checked up front, so a group can only be left open by `(a` which
            // never gets here.
            None => SyntaxError::IncorrectBrackets(self.expression.to_string()),
        }
    }
}

/// Parses a `!#if` condition.
///
/// `||` binds loosest, then `&&`, then prefix `!`. Chains of the same operator group to the
/// left.
///
/// ```
/// use filterlist_syntax::{parse_expression, Expr};
/// assert_eq!(
///     parse_expression("a || b && !c").unwrap(),
///     Expr::or(Expr::flag("a"), Expr::and(Expr::flag("b"), Expr::not(Expr::flag("c"))))
/// );
/// ```
pub fn parse_expression(expression: &str) -> SyntaxResult<Expr> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Err(SyntaxError::EmptyCondition);
    }

    if !brackets_balanced(expression) {
        return Err(SyntaxError::IncorrectBrackets(expression.to_string()));
    }

    let mut parser = Parser {
        expression,
        tokens: tokenize(expression).into_iter().peekable(),
    };

    let expr = parser.parse_or()?;
    if parser.tokens.peek().is_some() {
        return Err(parser.unexpected());
    }

    trace!("parsed condition {:?} as {}", expression, expr);
    Ok(expr)
}
