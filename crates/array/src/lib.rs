//! # Array — Capture-Store Metadata Array
//!
//! Assembles the per-device [`sector::MetaSector`]s of a pool of raw block
//! devices into one logical, append-only capture-file store, and owns the
//! name directory and free-space accounting on top of it.
//!
//! ## Architecture
//!
//! ```text
//! Ingestion tool / replay engine
//!   |
//!   v
//! ┌───────────────────────────────────────────────┐
//! │                 RAID ARRAY                    │
//! │                                               │
//! │ assemble.rs → classify sectors → format OR    │
//! │               sort + verify integrity         │
//! │                                               │
//! │ directory.rs → find / locate / insert / delete│
//! │                  |                            │
//! │                  v                            │
//! │ frontier.rs → watermark + free blocks         │
//! │                                               │
//! │ mutations mark sectors dirty; the caller      │
//! │ persists them (the engine performs no I/O)    │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Module responsibilities
//!
//! | Module         | Purpose                                            |
//! |----------------|----------------------------------------------------|
//! | [`lib.rs`]     | `RaidArray` struct, accessors, dirty set, `Debug`  |
//! | [`assemble`]   | Mount: fresh format or sort + integrity check      |
//! | [`frontier`]   | Watermark allocator accounting                     |
//! | [`directory`]  | Whole-array name lookup, placement, tombstoning    |
//!
//! ## Allocation model
//!
//! The array is a watermark allocator, not a free list. New files always
//! extend the frontier (the highest `end_block` allocated so far); deleting
//! a file frees its *directory slot* but never its *block range*. Space
//! below the frontier is only reclaimed by reformatting the whole array.
//!
//! ## Phases
//!
//! Single writer, phase separated, no internal locking:
//! - **Assembly** runs once, single threaded, before anything else.
//! - **Management** (`insert`/`delete`) is serialized by the caller.
//! - **Replay** treats the array as an immutable snapshot; any number of
//!   transmit cores may call [`RaidArray::locate`] concurrently through a
//!   shared reference.
//!
//! No operation blocks or touches a device; every operation is bounded by
//! the fixed table sizes.

mod assemble;
mod directory;
mod frontier;

pub use assemble::AssembleError;
pub use directory::{DirectoryError, FileLocation};

use sector::MetaSector;

/// Upper bound on the number of devices in one array.
pub const MAX_DISKS: usize = 64;

/// The assembled in-memory view of every device's metadata sector plus the
/// array's aggregate logical capacity.
///
/// Invariants (established by [`RaidArray::assemble`], preserved by every
/// operation): sectors are sorted ascending by `disk_id`;
/// `sectors[i].disk_id == i` and `sectors[i].total_disks == num_disks()`
/// for every position `i`.
pub struct RaidArray {
    /// One sector per device, position == `disk_id`.
    pub(crate) sectors: Vec<MetaSector>,
    /// Aggregate logical capacity of the array, in blocks.
    pub(crate) total_blocks: u64,
    /// Per-device write-back flags: `dirty[i]` means device `i`'s sector
    /// diverged from its persisted state and must be stored by the caller.
    pub(crate) dirty: Vec<bool>,
}

impl RaidArray {
    /// Number of devices in the array.
    #[must_use]
    pub fn num_disks(&self) -> u8 {
        self.sectors.len() as u8
    }

    /// Aggregate logical capacity in blocks, as supplied at assembly.
    #[must_use]
    pub fn total_blocks(&self) -> u64 {
        self.total_blocks
    }

    /// Borrows one device's sector, or `None` for an out-of-range id.
    #[must_use]
    pub fn sector(&self, disk_id: u8) -> Option<&MetaSector> {
        self.sectors.get(disk_id as usize)
    }

    /// Iterates over all sectors in ascending `disk_id` order.
    pub fn sectors(&self) -> impl Iterator<Item = &MetaSector> {
        self.sectors.iter()
    }

    /// Total number of live file entries across every device's table.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.sectors.iter().map(|s| s.live_entries().count()).sum()
    }

    /// Device ids whose sectors need to be written back by the caller.
    #[must_use]
    pub fn dirty_disks(&self) -> Vec<u8> {
        self.dirty
            .iter()
            .enumerate()
            .filter(|(_, &d)| d)
            .map(|(i, _)| i as u8)
            .collect()
    }

    /// Clears the write-back flag for one device after the caller has
    /// persisted its sector.
    pub fn clear_dirty(&mut self, disk_id: u8) {
        if let Some(flag) = self.dirty.get_mut(disk_id as usize) {
            *flag = false;
        }
    }

    pub(crate) fn mark_dirty(&mut self, disk_id: usize) {
        self.dirty[disk_id] = true;
    }
}

impl std::fmt::Debug for RaidArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaidArray")
            .field("num_disks", &self.num_disks())
            .field("total_blocks", &self.total_blocks)
            .field("frontier", &self.frontier())
            .field("free_blocks", &self.free_blocks())
            .field("file_count", &self.file_count())
            .field("dirty_disks", &self.dirty_disks())
            .finish()
    }
}

#[cfg(test)]
mod tests;
