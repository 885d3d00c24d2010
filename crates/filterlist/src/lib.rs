//! Filter list preprocessing.
//!
//! Re-exports the directive syntax and the compiler, and adds the configuration sources used
//! by the `filterlist` binary.
use std::sync::Arc;

pub mod config;

pub use filterlist_compiler as compiler;
pub use filterlist_syntax as syntax;
pub use filterlist_util as util;

pub use filterlist_compiler::{
    CompileError, DefaultFetcher, DownloadOptions, DownloadResult, DownloadWithRawOptions,
    FiltersDownloader, HttpFetcherConfig,
};
pub use filterlist_syntax::FlagSet;

pub type FilterListResult<T> = anyhow::Result<T>;

/// A downloader that reads local lists from disk and remote ones over HTTP.
pub fn default_downloader(config: HttpFetcherConfig) -> FiltersDownloader {
    FiltersDownloader::new(Arc::new(DefaultFetcher::new(config)))
}
