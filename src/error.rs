//! # Error Types
//!
//! Errors of the load/restore surface. The reward path (`award`, `tick`,
//! offline replay) has no error type: degenerate input degrades to zero.

use thiserror::Error;

/// Errors raised while loading an [`EconomyConfig`](crate::config::EconomyConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config text is not valid TOML for the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value that would break an economy invariant.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Errors raised while decoding a persisted [`Snapshot`](crate::snapshot::Snapshot).
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The blob is not JSON, or does not match the schema of its version.
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// The blob has no usable `version` field.
    #[error("snapshot has no version field")]
    MissingVersion,

    /// The blob was written by a newer (or unknown) schema.
    #[error("unsupported snapshot version {found} (supported up to {supported})")]
    UnsupportedVersion {
        /// Version found in the blob.
        found: u64,
        /// Newest version this build reads.
        supported: u32,
    },
}

/// Result type for config loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for snapshot decoding.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
