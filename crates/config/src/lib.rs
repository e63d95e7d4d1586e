//! # Config — Device-Table Configuration
//!
//! The explicit configuration object for one capture-store array: which
//! block devices make it up, how many data blocks each contributes, and
//! where the metadata slot lives. Built once at startup and passed by
//! reference to whatever needs it; there is no process-global state.
//!
//! The device table is parsed from a comma-separated list of
//! `path:blocks` pairs, e.g.
//!
//! ```text
//! /dev/nvme0n1:262144,/dev/nvme1n1:262144
//! ```
//!
//! Device order in the table only matters on first format (it decides
//! which device gets which `disk_id`); on every later mount the recorded
//! ids govern.

use std::path::PathBuf;
use thiserror::Error;

/// Default byte offset of the metadata slot within each device.
pub const DEFAULT_META_OFFSET: u64 = 0;

/// Configuration errors from device-table parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The device table was empty.
    #[error("device table is empty")]
    NoDevices,

    /// An entry was not of the form `path:blocks`.
    #[error("malformed device entry (expected 'path:blocks'): {0}")]
    Malformed(String),

    /// A block count failed to parse or was zero.
    #[error("bad block count in device entry: {0}")]
    BadBlockCount(String),

    /// The same device path appeared twice.
    #[error("duplicate device path: {0}")]
    DuplicateDevice(String),
}

/// One member device: its path and the number of logical data blocks it
/// contributes to the array's flat address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSpec {
    pub path: PathBuf,
    pub blocks: u64,
}

/// Full array configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayConfig {
    /// Member devices, in format order.
    pub devices: Vec<DeviceSpec>,
    /// Byte offset of the metadata slot within each device.
    pub meta_offset: u64,
}

impl ArrayConfig {
    /// Parses a `path:blocks,path:blocks` device table.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty table, a malformed entry, a
    /// zero or unparseable block count, or a repeated device path.
    pub fn from_device_table(table: &str, meta_offset: u64) -> Result<Self, ConfigError> {
        let mut devices: Vec<DeviceSpec> = Vec::new();

        for raw in table.split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            // Split on the last ':' so drive letters and odd paths survive.
            let (path, blocks) = raw
                .rsplit_once(':')
                .ok_or_else(|| ConfigError::Malformed(raw.to_string()))?;
            if path.is_empty() {
                return Err(ConfigError::Malformed(raw.to_string()));
            }

            let blocks: u64 = blocks
                .parse()
                .map_err(|_| ConfigError::BadBlockCount(raw.to_string()))?;
            if blocks == 0 {
                return Err(ConfigError::BadBlockCount(raw.to_string()));
            }

            let path = PathBuf::from(path);
            if devices.iter().any(|d| d.path == path) {
                return Err(ConfigError::DuplicateDevice(path.display().to_string()));
            }
            devices.push(DeviceSpec { path, blocks });
        }

        if devices.is_empty() {
            return Err(ConfigError::NoDevices);
        }

        Ok(Self {
            devices,
            meta_offset,
        })
    }

    /// Aggregate logical capacity: the sum of every device's data blocks.
    /// This is the `total_blocks` handed to assembly.
    #[must_use]
    pub fn total_blocks(&self) -> u64 {
        self.devices.iter().map(|d| d.blocks).sum()
    }

    /// Number of member devices.
    #[must_use]
    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }
}
