//! File directory: name-indexed lookup, placement, and tombstone deletion
//! over the whole array.
//!
//! Every operation treats all devices' tables as one logical namespace and
//! scans in a single fixed order: devices ascending by `disk_id`, each
//! device's slots in physical order. That order is load-bearing for
//! placement — it decides which device's table hosts a new descriptor.
//!
//! Placement is slot-first, address-flat: the hosting table and the
//! assigned block range are independent, because block addresses span the
//! aggregate array. Mapping `[start_block, end_block)` onto device+offset
//! pairs is the data path's job, not the directory's.

use log::debug;
use sector::{FileEntry, FileName};
use thiserror::Error;

use crate::RaidArray;

/// Recoverable failures of [`RaidArray::insert`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// The name is already present somewhere in the array.
    #[error("file {0} already exists")]
    Duplicate(FileName),

    /// Every device's table is out of descriptor slots, independent of
    /// block space.
    #[error("no free directory slot on any device")]
    Full,

    /// Not enough blocks beyond the frontier for the requested size.
    #[error("out of space: {requested} blocks requested, {free} free")]
    OutOfSpace { requested: u64, free: u64 },

    /// A live entry must cover at least one block.
    #[error("file must span at least one block")]
    ZeroLength,
}

/// A resolved file placement: the owning device plus the file's logical
/// block range. This is the read contract the replay transmit path
/// consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLocation {
    /// Device whose table hosts the descriptor.
    pub disk_id: u8,
    /// First logical block (inclusive).
    pub start_block: u64,
    /// One past the last logical block (exclusive).
    pub end_block: u64,
}

impl FileLocation {
    /// Number of logical blocks covered.
    #[must_use]
    pub fn block_count(&self) -> u64 {
        self.end_block - self.start_block
    }
}

impl RaidArray {
    /// Looks up a live entry by name. Returns `None` when no table holds
    /// the name — a miss is an ordinary outcome, not an error.
    #[must_use]
    pub fn find(&self, name: &FileName) -> Option<&FileEntry> {
        self.sectors
            .iter()
            .flat_map(|s| s.entries.iter())
            .find(|e| e.matches(name))
    }

    /// Looks up a file and returns its owning device alongside its block
    /// range. Same scan order as [`find`](RaidArray::find); `None` on a
    /// miss, never an indeterminate device id.
    #[must_use]
    pub fn locate(&self, name: &FileName) -> Option<FileLocation> {
        self.sectors.iter().find_map(|s| {
            s.entries
                .iter()
                .find(|e| e.matches(name))
                .map(|e| FileLocation {
                    disk_id: s.disk_id,
                    start_block: e.start_block,
                    end_block: e.end_block,
                })
        })
    }

    /// Places a new file of `blocks` logical blocks at the allocation
    /// frontier.
    ///
    /// The descriptor goes into the first empty slot in scan order; the
    /// range is `[frontier, frontier + blocks)` regardless of which device
    /// hosts the descriptor. The hosting sector's advisory `total_files`
    /// counter is incremented and the sector is marked for write-back.
    ///
    /// # Errors
    ///
    /// [`DirectoryError::Duplicate`], [`DirectoryError::Full`],
    /// [`DirectoryError::OutOfSpace`], or [`DirectoryError::ZeroLength`].
    /// The array is unchanged on any failure.
    pub fn insert(&mut self, name: FileName, blocks: u64) -> Result<FileLocation, DirectoryError> {
        if blocks == 0 {
            return Err(DirectoryError::ZeroLength);
        }
        if self.find(&name).is_some() {
            return Err(DirectoryError::Duplicate(name));
        }

        let free = self.free_blocks();
        let start = self.frontier();

        let Some((disk, slot)) = self.first_empty_slot() else {
            return Err(DirectoryError::Full);
        };

        if free < blocks {
            return Err(DirectoryError::OutOfSpace {
                requested: blocks,
                free,
            });
        }

        let end = start + blocks;
        let sector = &mut self.sectors[disk];
        sector.entries[slot].set(name, start, end);
        sector.total_files += 1;
        self.mark_dirty(disk);

        debug!(
            "placed {} at [{}, {}) in disk {} slot {}",
            name, start, end, disk, slot
        );
        Ok(FileLocation {
            disk_id: disk as u8,
            start_block: start,
            end_block: end,
        })
    }

    /// Tombstones a file: its slot is cleared for reuse, but its block
    /// range stays allocated (the frontier never moves backwards).
    ///
    /// Returns whether a file was removed. The owning sector is marked for
    /// write-back on success.
    pub fn delete(&mut self, name: &FileName) -> bool {
        for disk in 0..self.sectors.len() {
            let sector = &mut self.sectors[disk];
            if let Some(entry) = sector.entries.iter_mut().find(|e| e.matches(name)) {
                entry.clear();
                sector.total_files = sector.total_files.saturating_sub(1);
                self.mark_dirty(disk);
                debug!("tombstoned {} on disk {}", name, disk);
                return true;
            }
        }
        false
    }

    /// First empty descriptor slot in scan order, as `(disk, slot)`.
    fn first_empty_slot(&self) -> Option<(usize, usize)> {
        self.sectors.iter().enumerate().find_map(|(disk, s)| {
            s.entries
                .iter()
                .position(FileEntry::is_empty)
                .map(|slot| (disk, slot))
        })
    }
}
