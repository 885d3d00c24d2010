use filterlist_syntax::{parse_expression, Directive, DirectiveKind, FlagSet};
use tracing::{debug, trace};

use crate::blocks::find_block_end;
use crate::errors::{CompileError, CompileResult};

/// Keeps the lines whose `!#if` conditions hold for `flags` and drops all condition
/// directives.
///
/// Without flags the lines are returned untouched, directives included. `!#include` lines are
/// kept as they are.
pub fn resolve_conditions<S: AsRef<str>>(
    lines: &[S],
    flags: Option<&FlagSet>,
) -> CompileResult<Vec<String>> {
    let Some(flags) = flags else {
        return Ok(lines.iter().map(|l| l.as_ref().to_string()).collect());
    };

    let mut ret = Vec::with_capacity(lines.len());
    resolve_into(lines, flags, &mut ret)?;
    Ok(ret)
}

fn resolve_into<S: AsRef<str>>(
    lines: &[S],
    flags: &FlagSet,
    out: &mut Vec<String>,
) -> CompileResult<()> {
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].as_ref();
        match Directive::parse(line) {
            Directive::If(expression) => {
                let end = find_block_end(lines, DirectiveKind::EndIf, i + 1, lines.len())
                    .ok_or_else(|| CompileError::MissingEndIf(line.to_string()))?;
                let else_index = find_block_end(lines, DirectiveKind::Else, i + 1, end);

                let condition = parse_expression(expression).map_err(|source| {
                    CompileError::InvalidDirective {
                        directive: line.to_string(),
                        source,
                    }
                })?;

                let undefined: Vec<&str> = condition
                    .flags()
                    .into_iter()
                    .filter(|name| flags.get(name).is_none())
                    .collect();
                if !undefined.is_empty() {
                    debug!("{:?} reads undefined flags {:?}", line, undefined);
                }

                let matched = condition.evaluate(flags);
                trace!("{:?} evaluated to {}", line, matched);

                match else_index {
                    None if matched => resolve_into(&lines[i + 1..end], flags, out)?,
                    None => {}
                    Some(e) => {
                        let else_line = lines[e].as_ref();
                        if !matches!(Directive::parse(else_line), Directive::Else(rest) if rest.trim().is_empty())
                        {
                            return Err(CompileError::InvalidElse {
                                else_line: else_line.to_string(),
                                if_line: line.to_string(),
                            });
                        }

                        if let Some(second) = find_block_end(lines, DirectiveKind::Else, e + 1, end)
                        {
                            return Err(CompileError::UnexpectedElse(
                                lines[second].as_ref().to_string(),
                            ));
                        }

                        if matched {
                            resolve_into(&lines[i + 1..e], flags, out)?;
                        } else {
                            resolve_into(&lines[e + 1..end], flags, out)?;
                        }
                    }
                }

                i = end;
            }
            Directive::Else(_) => return Err(CompileError::UnexpectedElse(line.to_string())),
            Directive::EndIf => return Err(CompileError::UnexpectedEndIf(line.to_string())),
            Directive::Include(_) | Directive::Plain(_) => out.push(line.to_string()),
        }

        i += 1;
    }

    Ok(())
}
