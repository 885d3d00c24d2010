//! `! Checksum:` header validation.
//!
//! The checksum is the unpadded Base64 MD5 digest of the document with the checksum line
//! removed, `\r` dropped and runs of `\n` collapsed to one.
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use md5::{Digest, Md5};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{CompileError, CompileResult};

static CHECKSUM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*!\s*checksum[\s\-:]+([A-Za-z0-9_+/=]+)[^\r\n]*[\r\n]+").unwrap()
});

static LINE_FEEDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());

/// Only the beginning of a document is searched for the checksum line.
const CHECKSUM_SEARCH_LIMIT: usize = 200;

fn head(content: &str) -> &str {
    match content.char_indices().nth(CHECKSUM_SEARCH_LIMIT) {
        Some((i, _)) => &content[..i],
        None => content,
    }
}

/// Returns the whole checksum line and the declared checksum.
fn find_checksum(content: &str) -> Option<(&str, &str)> {
    let captures = CHECKSUM_PATTERN.captures(head(content))?;
    let line = captures.get(0)?.as_str();
    let checksum = captures.get(1)?.as_str();
    Some((line, checksum))
}

fn normalize(content: &str) -> String {
    let content = match find_checksum(content) {
        Some((line, _)) => content.replacen(line, "", 1),
        None => content.to_string(),
    };
    let content = content.replace('\r', "");
    LINE_FEEDS.replace_all(&content, "\n").into_owned()
}

pub fn parse_checksum(content: &str) -> Option<&str> {
    find_checksum(content).map(|(_, checksum)| checksum)
}

pub fn calculate_checksum(content: &str) -> String {
    STANDARD_NO_PAD.encode(Md5::digest(normalize(content).as_bytes()))
}

/// A document without checksum is only valid when `strict` is off.
pub fn is_valid_checksum(content: &str, strict: bool) -> bool {
    match parse_checksum(content) {
        Some(expected) => calculate_checksum(content) == expected,
        None => !strict,
    }
}

pub fn validate_checksum(content: &str, strict: bool) -> CompileResult<()> {
    if is_valid_checksum(content, strict) {
        Ok(())
    } else {
        Err(CompileError::InvalidChecksum)
    }
}
