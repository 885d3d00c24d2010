//! Incremental updates of a previously downloaded list.
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    /// The patch server answered in a way that rules out an update for now. The caller should
    /// keep serving the content it already has.
    #[error("Unacceptable response while patching {0}")]
    UnacceptableResponse(String),

    #[error("Failed to apply patch to {url}: {reason}")]
    Failed { url: String, reason: String },
}

#[derive(Clone, Copy, Debug)]
pub struct PatchRequest<'a> {
    pub filter_url: &'a str,
    /// Raw content of the previous download, as the patch base
    pub base_content: &'a str,
    pub verbose: bool,
}

#[async_trait]
pub trait PatchApplier: Send + Sync {
    /// Returns the patched content, the unchanged base when there is nothing new, or `None`
    /// when the list does not declare a `Diff-Path`.
    async fn apply_patch(&self, request: PatchRequest<'_>) -> Result<Option<String>, PatchError>;
}

/// Never patches, so every update is a full download.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPatches;

#[async_trait]
impl PatchApplier for NoPatches {
    async fn apply_patch(&self, _request: PatchRequest<'_>) -> Result<Option<String>, PatchError> {
        Ok(None)
    }
}
