use super::restaurant_file::RestaurantFile;

/// Account-wide storage ceiling, in megabytes.
pub const STORAGE_LIMIT_MB: f64 = 100.0;

pub fn bytes_to_mb(bytes: i64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

/// Aggregate usage for a set of file rows. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageUsage {
    pub files: Vec<RestaurantFile>,
    pub total_size: i64,
    pub used_storage: f64,
    pub available_storage: f64,
    pub percentage_used: f64,
}

impl StorageUsage {
    pub fn from_files(files: Vec<RestaurantFile>) -> Self {
        let total_size: i64 = files.iter().map(|f| f.size).sum();
        let used_storage: f64 = files.iter().map(|f| bytes_to_mb(f.size)).sum();
        Self {
            files,
            total_size,
            used_storage,
            available_storage: STORAGE_LIMIT_MB,
            percentage_used: used_storage / STORAGE_LIMIT_MB * 100.0,
        }
    }
}

/// Outcome of checking a new upload against the account quota.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuotaCheck {
    Admitted,
    Exceeded { available_mb: f64 },
}

pub fn check_quota(current_usage_mb: f64, new_file_bytes: i64) -> QuotaCheck {
    if current_usage_mb + bytes_to_mb(new_file_bytes) > STORAGE_LIMIT_MB {
        QuotaCheck::Exceeded {
            available_mb: STORAGE_LIMIT_MB - current_usage_mb,
        }
    } else {
        QuotaCheck::Admitted
    }
}
