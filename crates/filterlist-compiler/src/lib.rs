//! Resolution of filter list directives, and the downloader built on top of it.
//!
//! The condition pass ([`conditions`]) is synchronous. Include resolution and downloads go
//! through a [`FileFetcher`], so anything that can produce document text can back them, and
//! [`FiltersDownloader::download_with_raw`] can update a list through a [`PatchApplier`].
pub mod blocks;
pub mod checksum;
pub mod conditions;
pub mod downloader;
pub mod errors;
pub mod fetch;
pub mod options;
pub mod origin;
pub mod patch;

#[cfg(test)]
mod tests;

pub use checksum::{calculate_checksum, is_valid_checksum};
pub use conditions::resolve_conditions;
pub use downloader::FiltersDownloader;
pub use errors::{CompileError, CompileResult};
pub use fetch::{DefaultFetcher, FetchError, FileFetcher, HttpFetcherConfig};
pub use options::{DownloadOptions, DownloadResult, DownloadWithRawOptions, DownloadWithRawOptionsBuilder};
pub use patch::{NoPatches, PatchApplier, PatchError, PatchRequest};
