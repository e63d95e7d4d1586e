//! Assembly: the mount-equivalent that turns a set of loaded sectors into
//! a consistent [`RaidArray`].
//!
//! Exactly one of three things happens:
//! - **All uninitialized** — every device is formatted fresh and marked
//!   dirty so the caller persists the new sectors. The only path that
//!   creates sectors.
//! - **All initialized** — sectors are sorted by `disk_id` and the
//!   structural invariant is verified.
//! - **Mixed** — fatal. Reformatting a partially populated array could
//!   destroy live file tables on the already-initialized members, so the
//!   operator must either attach only the initialized devices or wipe all
//!   metadata explicitly.
//!
//! Assembly is idempotent for an already-formatted consistent array and
//! refuses ambiguous states rather than guessing. Errors from this module
//! are *fatal*: they describe on-disk states the engine considers unsafe
//! to operate under, and the caller is expected to terminate.

use log::{info, warn};
use sector::MetaSector;
use thiserror::Error;

use crate::{RaidArray, MAX_DISKS};

/// Fatal structural conditions detected while assembling an array.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    /// An array needs at least one device.
    #[error("cannot assemble an array with no devices")]
    NoDevices,

    /// More devices than the array format supports.
    #[error("too many devices: {0} (max {max})", max = MAX_DISKS)]
    TooManyDevices(usize),

    /// Some devices are formatted and some are not. Never auto-repaired:
    /// attach only the initialized devices, or wipe all metadata.
    #[error(
        "mixed initialization: {initialized} of {total} devices are formatted; \
         attach only the initialized devices or explicitly wipe all metadata"
    )]
    MixedInitialization { initialized: usize, total: usize },

    /// Post-sort structural mismatch: a sector's recorded identity does
    /// not agree with its position or with the array width.
    #[error(
        "array integrity error at position {position}: \
         disk_id={disk_id}, total_disks={total_disks}, expected disk_id={position} in an \
         array of {expected_disks}"
    )]
    Integrity {
        position: usize,
        disk_id: u8,
        total_disks: u8,
        expected_disks: u8,
    },
}

impl RaidArray {
    /// Assembles the sectors loaded from `N` devices into one array.
    ///
    /// `total_blocks` is the caller-supplied aggregate logical capacity of
    /// all devices (the flat block address space files are placed in).
    ///
    /// On the fresh-format path every sector comes back dirty; the caller
    /// must persist them all before relying on the array surviving a
    /// restart.
    ///
    /// # Errors
    ///
    /// All variants of [`AssembleError`] are fatal structural conditions;
    /// no usable array exists when one is returned.
    pub fn assemble(
        sectors: Vec<MetaSector>,
        total_blocks: u64,
    ) -> Result<RaidArray, AssembleError> {
        let n = sectors.len();
        if n == 0 {
            return Err(AssembleError::NoDevices);
        }
        if n > MAX_DISKS {
            return Err(AssembleError::TooManyDevices(n));
        }

        let initialized = sectors.iter().filter(|s| s.is_initialized()).count();

        let array = if initialized == 0 {
            info!("no initialized sectors found; formatting {} devices", n);
            let sectors = (0..n).map(|i| MetaSector::format(i as u8, n as u8)).collect();
            RaidArray {
                sectors,
                total_blocks,
                dirty: vec![true; n],
            }
        } else if initialized < n {
            warn!(
                "refusing to assemble: {} of {} devices initialized",
                initialized, n
            );
            return Err(AssembleError::MixedInitialization {
                initialized,
                total: n,
            });
        } else {
            let mut sectors = sectors;
            sectors.sort_by_key(|s| s.disk_id);
            RaidArray {
                sectors,
                total_blocks,
                dirty: vec![false; n],
            }
        };

        array.verify_structure()?;

        info!(
            "assembled array: {} disks, {} blocks, {} files, frontier {}",
            array.num_disks(),
            array.total_blocks,
            array.file_count(),
            array.frontier()
        );
        Ok(array)
    }

    /// Post-sort structural invariant: position, recorded id, and recorded
    /// array width must all agree.
    fn verify_structure(&self) -> Result<(), AssembleError> {
        let n = self.sectors.len() as u8;
        for (i, s) in self.sectors.iter().enumerate() {
            if s.disk_id != i as u8 || s.total_disks != n {
                return Err(AssembleError::Integrity {
                    position: i,
                    disk_id: s.disk_id,
                    total_disks: s.total_disks,
                    expected_disks: n,
                });
            }
        }
        Ok(())
    }
}
