#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TokenKind {
    Not,
    And,
    Or,
    OpenParen,
    CloseParen,
    Name,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// For names, the trimmed text
    pub text: &'a str,
    /// Byte offset of `text` in the expression
    pub offset: usize,
}

#[inline]
fn is_name_end(bytes: &[u8], i: usize) -> bool {
    match bytes[i] {
        b'(' | b')' => true,
        b'&' => bytes.get(i + 1) == Some(&b'&'),
        b'|' => bytes.get(i + 1) == Some(&b'|'),
        _ => false,
    }
}

/// Splits a condition into tokens.
///
/// A name runs up to the next parenthesis, `&&` or `||` and may contain spaces, so `a b` is a
/// single (and normally undefined) flag. `!` is only a negation where an operand starts; in
/// any other position it is part of a name.
pub fn tokenize(expression: &str) -> Vec<Token<'_>> {
    let bytes = expression.as_bytes();
    let mut tokens = vec![];
    let mut expect_operand = true;
    let mut i = 0;

    // Every split point is an ASCII byte, so all slices below fall on char boundaries.
    while i < bytes.len() {
        let (kind, len) = match bytes[i] {
            c if c.is_ascii_whitespace() => {
                i += 1;
                continue;
            }
            b'(' => (TokenKind::OpenParen, 1),
            b')' => (TokenKind::CloseParen, 1),
            b'&' if bytes.get(i + 1) == Some(&b'&') => (TokenKind::And, 2),
            b'|' if bytes.get(i + 1) == Some(&b'|') => (TokenKind::Or, 2),
            b'!' if expect_operand => (TokenKind::Not, 1),
            _ => {
                let start = i;
                while i < bytes.len() && !is_name_end(bytes, i) {
                    i += 1;
                }

                let raw = &expression[start..i];
                let text = raw.trim();
                tokens.push(Token {
                    kind: TokenKind::Name,
                    text,
                    offset: start + (raw.len() - raw.trim_start().len()),
                });
                expect_operand = false;
                continue;
            }
        };

        tokens.push(Token {
            kind,
            text: &expression[i..i + len],
            offset: i,
        });
        expect_operand = kind != TokenKind::CloseParen;
        i += len;
    }

    tokens
}
