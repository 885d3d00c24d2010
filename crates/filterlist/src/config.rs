use std::env::VarError;

use anyhow::{bail, Context};
use filterlist_syntax::FlagSet;
use tracing::debug;

use crate::FilterListResult;

/// Flags defined for every run, e.g. `adguard,adguard_ext_firefox opera=false`
pub const DEFINES_ENV: &str = "FILTERLIST_DEFINES";

/// Parses `name` or `name=<bool>`.
pub fn parse_define(define: &str) -> FilterListResult<(String, bool)> {
    let (name, value) = match define.split_once('=') {
        Some((name, value)) => {
            let value = match value.trim() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => bail!("invalid value {:?} for flag {:?}", other, name.trim()),
            };
            (name.trim(), value)
        }
        None => (define.trim(), true),
    };

    if name.is_empty() {
        bail!("empty flag name in {:?}", define);
    }

    Ok((name.to_string(), value))
}

/// Parses a comma or whitespace separated list of defines.
pub fn parse_defines(defines: &str) -> FilterListResult<FlagSet> {
    defines
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|d| !d.is_empty())
        .map(parse_define)
        .collect()
}

pub fn defines_from_env() -> FilterListResult<FlagSet> {
    match std::env::var(DEFINES_ENV) {
        Ok(val) => {
            debug!("{} = {:?}", DEFINES_ENV, val);
            parse_defines(&val).with_context(|| format!("unable to parse {DEFINES_ENV}"))
        }
        Err(VarError::NotPresent) => Ok(FlagSet::new()),
        Err(other_err) => Err(other_err.into()),
    }
}

/// Flags from the environment, overridden by explicit defines.
pub fn build_flags(defines: &[(String, bool)]) -> FilterListResult<FlagSet> {
    let mut flags = defines_from_env()?;
    flags.extend(defines.iter().cloned());
    Ok(flags)
}
