//! Textual condition evaluator used as the behavioural yardstick for the parser.
//!
//! It rewrites the innermost-last bracket group into `true`/`false`, then splits at the first
//! `||`, else the first `&&`, else strips a leading `!`. The character just before a split
//! operator is dropped, which is harmless for spaced operators. Inputs are assumed ASCII.
use filterlist_syntax::expression::brackets_balanced;
use filterlist_syntax::FlagSet;

pub fn evaluate(raw: &str, flags: &FlagSet) -> Result<bool, String> {
    let expression = raw.trim();
    if expression.is_empty() {
        return Err("Empty condition".to_string());
    }

    if !brackets_balanced(expression) {
        return Err(format!("Incorrect brackets: {expression}"));
    }

    if let Some(open) = expression.rfind('(') {
        let close = open
            + expression[open..]
                .find(')')
                .ok_or_else(|| format!("Incorrect brackets: {expression}"))?;
        let inner = evaluate(&expression[open + 1..close], flags)?;
        let rewritten = format!(
            "{}{}{}",
            &expression[..open],
            inner,
            &expression[close + 1..]
        );
        return evaluate(&rewritten, flags);
    }

    if let Some(i) = expression.find("||") {
        return Ok(evaluate(&expression[..i.saturating_sub(1)], flags)?
            || evaluate(&expression[i + 2..], flags)?);
    }

    if let Some(i) = expression.find("&&") {
        return Ok(evaluate(&expression[..i.saturating_sub(1)], flags)?
            && evaluate(&expression[i + 2..], flags)?);
    }

    if let Some(rest) = expression.strip_prefix('!') {
        return Ok(!evaluate(rest, flags)?);
    }

    Ok(expression == "true" || flags.is_enabled(expression))
}
