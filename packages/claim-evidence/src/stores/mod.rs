//! Result store implementations.
//!
//! Available backends:
//! - `MemoryStore` - In-memory snapshots (tests, single-post analysis)
//! - `CsvStore` - Flat CSV file with the stable column set
//! - `JsonlStore` - One JSON row per line, overwrite or append

pub mod csv;
pub mod jsonl;
pub mod memory;

pub use self::csv::CsvStore;
pub use jsonl::{JsonlStore, WriteMode};
pub use memory::MemoryStore;

use std::path::Path;

use crate::error::StoreResult;

/// Create the parent directory of `path` if it has one.
fn ensure_parent_dir(path: &Path) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Run blocking file I/O off the async runtime.
async fn blocking<T, F>(f: F) -> StoreResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?
}
