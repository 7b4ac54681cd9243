//! Asynchronous batch loading of card files.
//!
//! Each file in a batch is read independently; reads complete in whatever
//! order the I/O finishes. The batch result is produced only once every file
//! has finished, so the UI refreshes exactly once per batch. Unreadable files
//! are reported per-file, never as a batch failure.

use crate::models::Card;
use crate::parser;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// One successfully read and parsed file. `cards` may be empty; the store
/// decides that empty files are not added.
#[derive(Debug)]
pub struct LoadedFile {
    pub name: String,
    pub cards: Vec<Card>,
}

/// Read and parse every file in the batch, waiting for all of them.
///
/// Files are processed concurrently and finish in arbitrary order; results
/// are reassembled in the order the paths were given so the file list is
/// deterministic. One result per path.
pub async fn load_batch(paths: &[PathBuf]) -> Vec<LoadResult<LoadedFile>> {
    let mut set = JoinSet::new();
    for (slot, path) in paths.iter().cloned().enumerate() {
        set.spawn(async move { (slot, load_file(path).await) });
    }

    let mut results: Vec<Option<LoadResult<LoadedFile>>> =
        paths.iter().map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((slot, result)) => results[slot] = Some(result),
            Err(err) => warn!(error = %err, "load task failed"),
        }
    }
    results.into_iter().flatten().collect()
}

/// Read and parse a single file. Reading is async; parsing is CPU-bound and
/// runs on the blocking pool.
pub async fn load_file(path: PathBuf) -> LoadResult<LoadedFile> {
    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| LoadError::Read {
            path: path.clone(),
            source,
        })?;

    let cards = tokio::task::spawn_blocking(move || parser::parse_cards(&text)).await?;
    let name = file_name(&path);
    info!(file = %name, cards = cards.len(), "loaded card file");
    Ok(LoadedFile { name, cards })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
