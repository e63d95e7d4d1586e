//! Sector binary codec.
//!
//! All integers are little-endian. The encoded sector is exactly
//! [`SECTOR_ENCODED_BYTES`](crate::SECTOR_ENCODED_BYTES) long; the caller
//! owns where in the device the slot lives and any padding up to
//! [`SECTOR_SLOT_BYTES`](crate::SECTOR_SLOT_BYTES).

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use thiserror::Error;

use crate::{FileEntry, MetaSector, MAX_FILES, NAME_BYTES};

/// Errors produced by the sector crate.
#[derive(Debug, Error)]
pub enum SectorError {
    /// An underlying I/O error (including a short read of the slot).
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A file name was empty or began with the empty-slot sentinel byte.
    #[error("file name must not be empty")]
    EmptyName,

    /// A file name exceeded the fixed capacity.
    #[error("file name too long: {0} bytes (max {max})", max = NAME_BYTES)]
    NameTooLong(usize),
}

/// Serializes `sector` to `w` in the fixed v1 layout.
///
/// Writes exactly `SECTOR_ENCODED_BYTES` bytes. The magic and version are
/// written as stored, so an uninitialized in-memory sector round-trips as
/// uninitialized.
pub fn write_sector<W: Write>(w: &mut W, sector: &MetaSector) -> Result<(), SectorError> {
    w.write_u32::<LittleEndian>(sector.magic)?;
    w.write_u32::<LittleEndian>(sector.version)?;
    w.write_u8(sector.disk_id)?;
    w.write_u8(sector.total_disks)?;
    w.write_u32::<LittleEndian>(sector.total_files)?;

    for entry in &sector.entries {
        w.write_all(&entry.name)?;
        w.write_u64::<LittleEndian>(entry.start_block)?;
        w.write_u64::<LittleEndian>(entry.end_block)?;
    }

    Ok(())
}

/// Deserializes one sector from `r`.
///
/// No validation happens here: a zeroed buffer decodes to a sector with
/// `magic == 0`, which [`MetaSector::is_initialized`] classifies as
/// uninitialized. A short read surfaces as `SectorError::Io`.
pub fn read_sector<R: Read>(r: &mut R) -> Result<MetaSector, SectorError> {
    let magic = r.read_u32::<LittleEndian>()?;
    let version = r.read_u32::<LittleEndian>()?;
    let disk_id = r.read_u8()?;
    let total_disks = r.read_u8()?;
    let total_files = r.read_u32::<LittleEndian>()?;

    let mut entries = [FileEntry::EMPTY; MAX_FILES];
    for entry in &mut entries {
        let mut name = [0u8; NAME_BYTES];
        r.read_exact(&mut name)?;
        let start_block = r.read_u64::<LittleEndian>()?;
        let end_block = r.read_u64::<LittleEndian>()?;
        *entry = FileEntry {
            name,
            start_block,
            end_block,
        };
    }

    Ok(MetaSector {
        magic,
        version,
        disk_id,
        total_disks,
        total_files,
        entries,
    })
}
