//! Local file system helpers for backend implementations: existence checks,
//! deletion, and disk capacity lookups.

use std::path::Path;

use sysinfo::Disks;

use crate::types::errors::BackendError;
use crate::types::storage::StorageInfo;

pub async fn file_exists(path: &str) -> Result<bool, BackendError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| BackendError::FileSystem(format!("Failed to stat {}: {}", path, e)))
}

/// Deletes a file. A file that is already gone counts as deleted.
pub async fn delete_file(path: &str) -> Result<(), BackendError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BackendError::FileSystem(format!(
            "Failed to delete {}: {}",
            path, e
        ))),
    }
}

/// Capacity of the disk that contains `path`.
///
/// Picks the disk whose mount point is the longest prefix of `path`, so a
/// folder on a nested mount resolves to that mount rather than to `/`.
pub fn disk_info(path: &str) -> Option<StorageInfo> {
    let disks = Disks::new_with_refreshed_list();
    let mounts = disks.list().iter().map(|disk| {
        (
            disk.mount_point().to_string_lossy().to_string(),
            disk.total_space(),
            disk.available_space(),
        )
    });
    best_mount(path, mounts)
}

fn best_mount<I>(path: &str, mounts: I) -> Option<StorageInfo>
where
    I: IntoIterator<Item = (String, u64, u64)>,
{
    let target = Path::new(path);
    mounts
        .into_iter()
        .filter(|(mount, _, _)| target.starts_with(mount))
        .max_by_key(|(mount, _, _)| mount.len())
        .map(|(mount_point, total, free)| StorageInfo {
            total,
            used: total.saturating_sub(free),
            free,
            mount_point,
        })
}

/// Async wrapper over [`disk_info`] for use from backend implementations.
pub async fn query_storage(path: &str) -> Result<StorageInfo, BackendError> {
    let owned = path.to_string();
    tokio::task::spawn_blocking(move || disk_info(&owned))
        .await
        .map_err(|e| BackendError::FileSystem(e.to_string()))?
        .ok_or_else(|| BackendError::FileSystem(format!("Could not determine disk for {}", path)))
}
