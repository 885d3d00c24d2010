use std::fmt;
use std::sync::Arc;

use async_recursion::async_recursion;
use filterlist_syntax::directive::include_target;
use filterlist_syntax::FlagSet;
use filterlist_util::lines::{lines_before, RetainWithIndex};
use filterlist_util::split::{is_blank, split_filter};
use indexmap::IndexSet;
use tracing::{debug, info, warn};

use crate::checksum::validate_checksum;
use crate::conditions;
use crate::errors::{CompileError, CompileResult};
use crate::fetch::FileFetcher;
use crate::options::{DownloadOptions, DownloadResult, DownloadWithRawOptions};
use crate::origin;
use crate::patch::{NoPatches, PatchApplier, PatchError, PatchRequest};

/// Lines of context shown before a failing include
const INCLUDE_CONTEXT_LINES: usize = 3;

/// Included documents may carry their own patch metadata near the top, which is meaningless
/// once spliced into another list.
const DIFF_PATH_SCAN_LINES: usize = 50;
const DIFF_PATH_PREFIX: &str = "! Diff-Path:";

/// Nesting limit for includes, counted from the document being resolved.
pub const MAX_INCLUDE_DEPTH: usize = 32;

/// Where a document is fetched from.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Location {
    External(String),
    Local(String),
}

impl Location {
    fn resolve(target: &str, origin: Option<&str>) -> Self {
        if origin::is_external_url(target) || origin.is_some_and(origin::is_external_url) {
            Location::External(origin::external_location(target, origin))
        } else {
            Location::Local(origin::join_local(origin, target))
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Location::External(s) | Location::Local(s) => s,
        }
    }

    /// Identity of the document, with `.` and `..` segments collapsed.
    fn key(&self) -> String {
        match self {
            Location::External(url) => origin::normalize_url(url),
            Location::Local(path) => origin::normalize_local(path),
        }
    }

    /// Origin of the document found here, if it has one.
    fn child_origin(&self) -> Option<String> {
        Some(origin::filter_url_origin(self.as_str(), None)).filter(|o| !o.is_empty())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Downloads filter lists and resolves their `!#if` and `!#include` directives.
///
/// Includes are fetched one at a time, in document order, through the [`FileFetcher`]. The
/// [`PatchApplier`] is only consulted by [`download_with_raw`](Self::download_with_raw).
#[derive(Clone)]
pub struct FiltersDownloader {
    fetcher: Arc<dyn FileFetcher>,
    patcher: Arc<dyn PatchApplier>,
}

impl fmt::Debug for FiltersDownloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiltersDownloader").finish_non_exhaustive()
    }
}

impl FiltersDownloader {
    pub fn new(fetcher: Arc<dyn FileFetcher>) -> Self {
        Self {
            fetcher,
            patcher: Arc::new(NoPatches),
        }
    }

    pub fn with_patch_applier(mut self, patcher: Arc<dyn PatchApplier>) -> Self {
        self.patcher = patcher;
        self
    }

    /// Resolves conditions, then includes, of an already split document.
    pub async fn compile<S: AsRef<str>>(
        &self,
        lines: &[S],
        origin: Option<&str>,
        flags: Option<&FlagSet>,
    ) -> CompileResult<Vec<String>> {
        let lines = conditions::resolve_conditions(lines, flags)?;
        self.resolve_includes(&lines, origin, flags).await
    }

    pub fn resolve_conditions<S: AsRef<str>>(
        &self,
        lines: &[S],
        flags: Option<&FlagSet>,
    ) -> CompileResult<Vec<String>> {
        conditions::resolve_conditions(lines, flags)
    }

    /// Replaces every `!#include` line with the fully resolved lines of its target.
    pub async fn resolve_includes<S: AsRef<str>>(
        &self,
        lines: &[S],
        origin: Option<&str>,
        flags: Option<&FlagSet>,
    ) -> CompileResult<Vec<String>> {
        let lines: Vec<String> = lines.iter().map(|l| l.as_ref().to_string()).collect();
        let mut chain = IndexSet::new();
        self.resolve_includes_in(&lines, origin, flags, &mut chain, 0)
            .await
    }

    pub fn filter_url_origin(&self, url: &str, existing_origin: Option<&str>) -> String {
        origin::filter_url_origin(url, existing_origin)
    }

    /// Downloads `url` and resolves all of its directives.
    pub async fn download(
        &self,
        url: &str,
        flags: Option<&FlagSet>,
        options: &DownloadOptions,
    ) -> CompileResult<Vec<String>> {
        let location = Location::resolve(url, None);
        let raw = self
            .fetch_checked(
                url,
                &location,
                options.validate_checksum,
                options.validate_checksum_strict,
            )
            .await?;

        let filter = self
            .resolve_document(&split_filter(&raw), &location, flags)
            .await?;

        if !options.allow_empty_response && is_blank(&filter) {
            return Err(CompileError::EmptyResponse);
        }

        Ok(filter)
    }

    /// Updates a list, by patch when possible, keeping the raw text for the next update.
    pub async fn download_with_raw(
        &self,
        url: &str,
        options: &DownloadWithRawOptions,
    ) -> CompileResult<DownloadResult> {
        let raw_filter = match options.raw_filter.as_deref() {
            Some(raw) if !options.force && !raw.is_empty() => raw,
            _ => {
                log_decision(options.verbose, url, "downloading the whole list");
                return self.download_and_process(url, options).await;
            }
        };

        let request = PatchRequest {
            filter_url: url,
            base_content: raw_filter,
            verbose: options.verbose,
        };

        let patched = match self.patcher.apply_patch(request).await {
            Ok(patched) => patched,
            Err(PatchError::UnacceptableResponse(reason)) => {
                warn!("patch update of {} failed, keeping previous content: {}", url, reason);
                return Ok(DownloadResult {
                    filter: split_filter(raw_filter),
                    raw_filter: raw_filter.to_string(),
                    is_patch_update_failed: true,
                });
            }
            Err(err) => return Err(err.into()),
        };

        match patched {
            None => {
                log_decision(options.verbose, url, "no Diff-Path, downloading the whole list");
                self.download_and_process(url, options).await
            }
            Some(patched) if patched == raw_filter => {
                log_decision(options.verbose, url, "patch changed nothing");
                Ok(DownloadResult {
                    filter: split_filter(raw_filter),
                    raw_filter: patched,
                    is_patch_update_failed: false,
                })
            }
            Some(patched) => {
                log_decision(options.verbose, url, "resolving patched content");
                let location = Location::resolve(url, None);
                let filter = self
                    .resolve_document(&split_filter(&patched), &location, options.flags.as_ref())
                    .await?;
                Ok(DownloadResult {
                    filter,
                    raw_filter: patched,
                    is_patch_update_failed: false,
                })
            }
        }
    }

    async fn download_and_process(
        &self,
        url: &str,
        options: &DownloadWithRawOptions,
    ) -> CompileResult<DownloadResult> {
        let location = Location::resolve(url, None);
        let raw_filter = self
            .fetch_checked(
                url,
                &location,
                options.validate_checksum,
                options.validate_checksum_strict,
            )
            .await?;

        let lines = split_filter(&raw_filter);
        if !options.allow_empty_response && is_blank(&lines) {
            return Err(CompileError::EmptyResponse);
        }

        let filter = self
            .resolve_document(&lines, &location, options.flags.as_ref())
            .await?;

        Ok(DownloadResult {
            filter,
            raw_filter,
            is_patch_update_failed: false,
        })
    }

    async fn fetch(
        &self,
        target: &str,
        location: &Location,
        origin: Option<&str>,
    ) -> CompileResult<String> {
        let raw = match location {
            Location::External(url) => self.fetcher.get_external_file(url).await?,
            Location::Local(_) => self.fetcher.get_local_file(target, origin).await?,
        };
        Ok(raw)
    }

    async fn fetch_checked(
        &self,
        url: &str,
        location: &Location,
        validate: bool,
        strict: bool,
    ) -> CompileResult<String> {
        let raw = self.fetch(url, location, None).await?;
        if validate {
            validate_checksum(&raw, strict)?;
        }
        Ok(raw)
    }

    /// Resolves a top-level document found at `location`.
    async fn resolve_document(
        &self,
        lines: &[String],
        location: &Location,
        flags: Option<&FlagSet>,
    ) -> CompileResult<Vec<String>> {
        let lines = conditions::resolve_conditions(lines, flags)?;
        let origin = location.child_origin();
        let mut chain = IndexSet::from([location.key()]);
        self.resolve_includes_in(&lines, origin.as_deref(), flags, &mut chain, 0)
            .await
    }

    /// `depth` is 0 for the document handed to the public entry points. Origin rejections of
    /// its own includes are returned bare, deeper ones are wrapped with their directive.
    #[async_recursion]
    async fn resolve_includes_in<'a>(
        &'a self,
        lines: &'a [String],
        origin: Option<&'a str>,
        flags: Option<&'a FlagSet>,
        chain: &'a mut IndexSet<String>,
        depth: usize,
    ) -> CompileResult<Vec<String>> {
        let mut ret = Vec::with_capacity(lines.len());

        for (i, line) in lines.iter().enumerate() {
            let Some(target) = include_target(line) else {
                ret.push(line.clone());
                continue;
            };

            let location = Location::resolve(target, origin);
            let resolved = match origin::validate_include_target(target, origin) {
                Err(err) if depth == 0 => return Err(err),
                Err(err) => Err(err),
                Ok(()) => {
                    self.resolve_include(target, &location, origin, flags, chain, depth)
                        .await
                }
            };

            match resolved {
                Ok(included) => ret.extend(included),
                Err(err @ CompileError::IncludeResolutionFailed { .. }) => return Err(err),
                Err(source) => {
                    return Err(CompileError::IncludeResolutionFailed {
                        directive: line.clone(),
                        context: lines_before(lines, i, INCLUDE_CONTEXT_LINES).to_vec(),
                        location: Some(location.to_string()),
                        source: Box::new(source),
                    })
                }
            }
        }

        Ok(ret)
    }

    async fn resolve_include(
        &self,
        target: &str,
        location: &Location,
        origin: Option<&str>,
        flags: Option<&FlagSet>,
        chain: &mut IndexSet<String>,
        depth: usize,
    ) -> CompileResult<Vec<String>> {
        let key = location.key();
        if chain.contains(&key) {
            let mut cycle: Vec<String> = chain.iter().cloned().collect();
            cycle.push(key);
            return Err(CompileError::IncludeCycle { chain: cycle });
        }

        if depth >= MAX_INCLUDE_DEPTH {
            return Err(CompileError::IncludeDepthExceeded {
                limit: MAX_INCLUDE_DEPTH,
                location: location.to_string(),
            });
        }

        debug!("including {} (origin {:?})", location, origin);
        let raw = self.fetch(target, location, origin).await?;
        let lines = conditions::resolve_conditions(&split_filter(&raw), flags)?;

        let child_origin = location.child_origin();
        chain.insert(key);
        let resolved = self
            .resolve_includes_in(&lines, child_origin.as_deref(), flags, chain, depth + 1)
            .await;
        chain.pop();

        let mut included = resolved?;
        included.retain_with_index(|line, i| {
            i >= DIFF_PATH_SCAN_LINES || !line.trim().starts_with(DIFF_PATH_PREFIX)
        });

        Ok(included)
    }
}

fn log_decision(verbose: bool, url: &str, decision: &str) {
    if verbose {
        info!("{}: {}", url, decision);
    } else {
        debug!("{}: {}", url, decision);
    }
}
