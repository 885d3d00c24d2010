//! Where a document lives, and where its includes may come from.
//!
//! An origin is the directory part of a document's URL or path. Relative include targets are
//! resolved against it and absolute include URLs must share its URL origin.
use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::errors::{CompileError, CompileResult};

static URL_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:([a-z]+)://|//)").unwrap());

const FILE_SCHEME: &str = "file://";

/// `scheme://...` or protocol relative `//...`.
pub fn is_absolute_url(url: &str) -> bool {
    URL_SCHEME.is_match(url)
}

/// An absolute URL that is not on the local filesystem.
pub fn is_external_url(url: &str) -> bool {
    match URL_SCHEME.captures(url) {
        Some(captures) => match captures.get(1) {
            Some(scheme) => !scheme.as_str().to_ascii_lowercase().starts_with("file"),
            None => true,
        },
        None => false,
    }
}

/// The serialized URL origin (`scheme://host[:port]`) of an absolute URL.
pub fn url_origin(url: &str) -> CompileResult<String> {
    Url::parse(url)
        .map(|u| u.origin().ascii_serialization())
        .map_err(|_| CompileError::InvalidUrl(url.to_string()))
}

/// An explicit non-empty origin wins, otherwise everything before the last `/` of `url`.
pub fn filter_url_origin(url: &str, existing_origin: Option<&str>) -> String {
    match existing_origin {
        Some(origin) if !origin.is_empty() => origin.to_string(),
        _ => match url.rfind('/') {
            Some(i) => url[..i].to_string(),
            None => String::new(),
        },
    }
}

/// Rejects absolute include targets whose URL origin differs from the including document's.
///
/// Relative targets, and any target of a document without origin, are always accepted.
pub fn validate_include_target(target: &str, origin: Option<&str>) -> CompileResult<()> {
    let Some(origin) = origin.filter(|o| !o.is_empty()) else {
        return Ok(());
    };

    if !is_absolute_url(target) {
        return Ok(());
    }

    let target_origin = url_origin(target)?;
    if target_origin != url_origin(origin)? {
        return Err(CompileError::RejectedOrigin(target_origin));
    }

    Ok(())
}

/// The URL an external document is requested from.
pub fn external_location(target: &str, origin: Option<&str>) -> String {
    match origin {
        Some(origin) if !is_absolute_url(target) && is_absolute_url(origin) => {
            format!("{}/{}", origin.trim_end_matches('/'), target)
        }
        _ => target.to_string(),
    }
}

fn strip_file_scheme(path: &str) -> &str {
    match path.get(..FILE_SCHEME.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(FILE_SCHEME) => &path[FILE_SCHEME.len()..],
        _ => path,
    }
}

/// The filesystem path of a local document.
pub fn join_local(origin: Option<&str>, target: &str) -> String {
    let target = strip_file_scheme(target);
    match origin.map(strip_file_scheme) {
        Some(origin) if !origin.is_empty() && !Path::new(target).is_absolute() => {
            format!("{}/{}", origin.trim_end_matches('/'), target)
        }
        _ => target.to_string(),
    }
}

/// Collapses `.` and `..` segments of a local path without touching the filesystem.
///
/// `..` above the start of a relative path is kept, `..` above the root is dropped.
pub fn normalize_local(path: &str) -> String {
    let mut parts: Vec<Component<'_>> = vec![];
    for component in Path::new(strip_file_scheme(path)).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    parts
        .iter()
        .collect::<PathBuf>()
        .to_string_lossy()
        .into_owned()
}

/// The canonical serialization of an absolute URL, dot segments removed. Anything the URL
/// parser rejects, such as protocol relative URLs, is returned as is.
pub fn normalize_url(url: &str) -> String {
    Url::parse(url)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}
