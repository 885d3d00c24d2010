use filterlist_syntax::DirectiveKind;

/// Finds the line closing the innermost open block, within `start..end`.
///
/// Nested `!#if` blocks are skipped entirely, so searching for [`DirectiveKind::Else`] never
/// stops at the `!#else` of a nested block, with or without its own `!#else`.
pub fn find_block_end<S: AsRef<str>>(
    lines: &[S],
    end_directive: DirectiveKind,
    start: usize,
    end: usize,
) -> Option<usize> {
    let end = end.min(lines.len());
    let mut depth: usize = 0;

    for (i, line) in lines.iter().enumerate().take(end).skip(start) {
        let line = line.as_ref();
        if DirectiveKind::If.matches(line) {
            depth += 1;
        } else if depth == 0 && end_directive.matches(line) {
            return Some(i);
        } else if depth > 0 && DirectiveKind::EndIf.matches(line) {
            depth -= 1;
        }
    }

    None
}
