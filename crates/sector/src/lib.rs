//! # Sector — Per-Device Metadata Sector
//!
//! The persisted identity and file table for one physical device of a
//! capture-store array. Each device reserves one fixed-size slot (a single
//! 4K block) at a fixed offset; everything the array knows about a device
//! lives in that slot.
//!
//! ## On-disk layout (v1 — magic `PCR1`)
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ HEADER (14 bytes)                                             │
//! │                                                               │
//! │ magic (u32 LE) | version (u32 LE)                             │
//! │ disk_id (u8) | total_disks (u8) | total_files (u32 LE)        │
//! ├───────────────────────────────────────────────────────────────┤
//! │ FILE TABLE (MAX_FILES = 64 fixed slots, 48 bytes each)        │
//! │                                                               │
//! │ name ([u8; 32]) | start_block (u64 LE) | end_block (u64 LE)   │
//! │                                                               │
//! │ ... repeated for each slot, in physical slot order ...        │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! A slot whose first name byte is zero is empty (either never used or
//! tombstoned by a delete). `end_block` is exclusive; block addresses are
//! logical addresses in the flat space spanning the whole array, not
//! offsets into this device.
//!
//! A sector whose magic does not equal [`SECTOR_MAGIC`] is *uninitialized*;
//! reading a zeroed (or short, zero-padded) slot therefore classifies
//! cleanly as "never formatted". No checksum is carried: the slot is a
//! single block and is rewritten whole on every update.
//!
//! The codec is generic over `Read`/`Write` so unit tests can run against
//! `Cursor<Vec<u8>>` instead of real devices.

mod format;

pub use format::{read_sector, write_sector, SectorError};

/// Magic number identifying an initialized capture-store sector (ASCII "PCR1").
pub const SECTOR_MAGIC: u32 = 0x5043_5231;

/// Current on-disk format version.
pub const CUR_VERSION: u32 = 1;

/// Fixed capacity of a file name, in bytes.
pub const NAME_BYTES: usize = 32;

/// Number of file-descriptor slots in one device's table.
pub const MAX_FILES: usize = 64;

/// Encoded size of one file entry: name + start_block + end_block.
pub const ENTRY_BYTES: usize = NAME_BYTES + 8 + 8;

/// Encoded size of the sector header:
/// magic (4) + version (4) + disk_id (1) + total_disks (1) + total_files (4).
pub const HEADER_BYTES: usize = 4 + 4 + 1 + 1 + 4;

/// Exact encoded size of a full sector.
pub const SECTOR_ENCODED_BYTES: usize = HEADER_BYTES + MAX_FILES * ENTRY_BYTES;

/// Size of the on-disk slot reserved for the sector: one 4K block.
pub const SECTOR_SLOT_BYTES: usize = 4096;

// Enlarging MAX_FILES or NAME_BYTES without resizing the reserved slot
// would silently truncate the file table on disk; refuse to build instead.
const _: () = assert!(SECTOR_ENCODED_BYTES <= SECTOR_SLOT_BYTES);

/// Fixed-capacity file identifier, unique across the whole array.
///
/// Comparison is fixed-width over all [`NAME_BYTES`] bytes, so two names
/// are equal iff their padded representations match exactly. A name whose
/// first byte is zero denotes an empty slot and cannot be constructed
/// through [`FileName::new`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FileName([u8; NAME_BYTES]);

impl FileName {
    /// Builds a name from raw bytes, zero-padded to [`NAME_BYTES`].
    ///
    /// Rejects the empty name (it is the empty-slot sentinel) and names
    /// longer than the fixed capacity.
    pub fn new(bytes: &[u8]) -> Result<Self, SectorError> {
        if bytes.is_empty() || bytes[0] == 0 {
            return Err(SectorError::EmptyName);
        }
        if bytes.len() > NAME_BYTES {
            return Err(SectorError::NameTooLong(bytes.len()));
        }
        let mut buf = [0u8; NAME_BYTES];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Returns the fixed-width byte representation.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; NAME_BYTES] {
        &self.0
    }
}

impl std::str::FromStr for FileName {
    type Err = SectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.as_bytes())
    }
}

impl std::fmt::Display for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.0.iter().position(|&b| b == 0).unwrap_or(NAME_BYTES);
        write!(f, "{}", String::from_utf8_lossy(&self.0[..len]))
    }
}

impl std::fmt::Debug for FileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FileName({})", self)
    }
}

/// One capture file's placement record: a name plus its logical block
/// range `[start_block, end_block)` in the array's flat address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEntry {
    name: [u8; NAME_BYTES],
    /// First logical block of the file (inclusive).
    pub start_block: u64,
    /// One past the last logical block of the file (exclusive).
    pub end_block: u64,
}

impl FileEntry {
    /// An empty (never used or tombstoned) slot.
    pub const EMPTY: FileEntry = FileEntry {
        name: [0u8; NAME_BYTES],
        start_block: 0,
        end_block: 0,
    };

    /// Returns `true` if this slot holds no live file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name[0] == 0
    }

    /// Returns `true` if this slot's name matches `name` (fixed-width compare).
    #[must_use]
    pub fn matches(&self, name: &FileName) -> bool {
        !self.is_empty() && &self.name == name.as_bytes()
    }

    /// Returns the live name, or `None` for an empty slot.
    #[must_use]
    pub fn name(&self) -> Option<FileName> {
        if self.is_empty() {
            None
        } else {
            Some(FileName(self.name))
        }
    }

    /// Number of logical blocks covered by this entry.
    #[must_use]
    pub fn block_count(&self) -> u64 {
        self.end_block - self.start_block
    }

    /// Fills the slot with a live entry.
    pub fn set(&mut self, name: FileName, start_block: u64, end_block: u64) {
        self.name = name.0;
        self.start_block = start_block;
        self.end_block = end_block;
    }

    /// Tombstones the slot: the name and range are zeroed. The blocks the
    /// entry covered stay allocated forever (watermark semantics); only
    /// the descriptor slot becomes reusable.
    pub fn clear(&mut self) {
        *self = FileEntry::EMPTY;
    }
}

/// The persisted metadata sector of one physical device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaSector {
    /// Identity tag; equals [`SECTOR_MAGIC`] iff the device was formatted.
    pub magic: u32,
    /// Format version written at format time.
    pub version: u32,
    /// This device's 0-based ordinal within its array.
    pub disk_id: u8,
    /// The array's device count recorded at format time.
    pub total_disks: u8,
    /// Advisory count of live entries on this device.
    pub total_files: u32,
    /// Fixed table of file-descriptor slots, in physical slot order.
    pub entries: [FileEntry; MAX_FILES],
}

impl MetaSector {
    /// Builds a freshly formatted sector: identity tag, current version,
    /// the given array position, and an all-empty file table.
    #[must_use]
    pub fn format(disk_id: u8, total_disks: u8) -> Self {
        Self {
            magic: SECTOR_MAGIC,
            version: CUR_VERSION,
            disk_id,
            total_disks,
            total_files: 0,
            entries: [FileEntry::EMPTY; MAX_FILES],
        }
    }

    /// An all-zero sector, as read from a never-formatted device.
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            magic: 0,
            version: 0,
            disk_id: 0,
            total_disks: 0,
            total_files: 0,
            entries: [FileEntry::EMPTY; MAX_FILES],
        }
    }

    /// Sector validator: `true` iff the identity tag matches.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.magic == SECTOR_MAGIC
    }

    /// Iterates over the live (non-empty) entries in slot order.
    pub fn live_entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests;
