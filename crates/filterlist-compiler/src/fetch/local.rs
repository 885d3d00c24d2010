use tracing::trace;

use crate::fetch::{FetchError, FetchResult};
use crate::origin::join_local;

pub async fn read_local_file(path: &str, origin: Option<&str>) -> FetchResult<String> {
    let path = join_local(origin, path);
    trace!("reading {}", path);
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| FetchError::Io { path, source })
}
