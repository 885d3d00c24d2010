use phf::{self, phf_map};

pub const IF_DIRECTIVE: &str = "!#if";
pub const ELSE_DIRECTIVE: &str = "!#else";
pub const ENDIF_DIRECTIVE: &str = "!#endif";
pub const INCLUDE_DIRECTIVE: &str = "!#include";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DirectiveKind {
    If,
    Else,
    EndIf,
    Include,
}

// None of the keywords is a prefix of another, so lookup order does not matter.
static DIRECTIVE_KEYWORDS: phf::Map<&'static str, DirectiveKind> = phf_map! {
    "!#if" => DirectiveKind::If,
    "!#else" => DirectiveKind::Else,
    "!#endif" => DirectiveKind::EndIf,
    "!#include" => DirectiveKind::Include,
};

impl DirectiveKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            DirectiveKind::If => IF_DIRECTIVE,
            DirectiveKind::Else => ELSE_DIRECTIVE,
            DirectiveKind::EndIf => ENDIF_DIRECTIVE,
            DirectiveKind::Include => INCLUDE_DIRECTIVE,
        }
    }

    /// Directives are only recognised at column 0 of the untrimmed line.
    pub fn matches<L: AsRef<str>>(&self, line: L) -> bool {
        line.as_ref().starts_with(self.keyword())
    }

    pub fn of<L: AsRef<str>>(line: L) -> Option<DirectiveKind> {
        let line = line.as_ref();
        DIRECTIVE_KEYWORDS
            .entries()
            .find(|(keyword, _)| line.starts_with(**keyword))
            .map(|(_, kind)| *kind)
    }
}

/// A line of a filter list, viewed as a preprocessor directive.
///
/// Recognition is a plain prefix test, so `!#ifdef x` is an `If` with the expression `def x`
/// and `!#elseif x` is an `Else` whose trailing text is `if x`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Directive<'a> {
    /// Condition expression, trimmed
    If(&'a str),
    /// Whatever follows the keyword, untrimmed. Anything other than whitespace is invalid.
    Else(&'a str),
    EndIf,
    /// Include target, trimmed
    Include(&'a str),
    Plain(&'a str),
}

impl<'a> Directive<'a> {
    pub fn parse(line: &'a str) -> Self {
        let Some(kind) = DirectiveKind::of(line) else {
            return Directive::Plain(line);
        };

        let rest = &line[kind.keyword().len()..];
        match kind {
            DirectiveKind::If => Directive::If(rest.trim()),
            DirectiveKind::Else => Directive::Else(rest),
            DirectiveKind::EndIf => Directive::EndIf,
            DirectiveKind::Include => Directive::Include(rest.trim()),
        }
    }

    pub fn kind(&self) -> Option<DirectiveKind> {
        match self {
            Directive::If(_) => Some(DirectiveKind::If),
            Directive::Else(_) => Some(DirectiveKind::Else),
            Directive::EndIf => Some(DirectiveKind::EndIf),
            Directive::Include(_) => Some(DirectiveKind::Include),
            Directive::Plain(_) => None,
        }
    }

    pub fn is_include(&self) -> bool {
        matches!(self, Directive::Include(_))
    }
}

/// Returns the include target if `line` is an `!#include` directive.
pub fn include_target(line: &str) -> Option<&str> {
    match Directive::parse(line) {
        Directive::Include(target) => Some(target),
        _ => None,
    }
}
