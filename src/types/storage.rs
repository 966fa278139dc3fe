use serde::{Deserialize, Serialize};

/// Capacity of the disk holding a destination folder, in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInfo {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub mount_point: String,
}
