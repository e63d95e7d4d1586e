//! Caller-side sector persistence.
//!
//! The array engine never touches a device; it only marks sectors dirty.
//! This module is the write-back step: it loads each member's metadata
//! slot at mount time and stores mutated sectors after management
//! commands.
//!
//! A missing or short backing file reads as a zeroed slot, which the
//! validator classifies as uninitialized — exactly what a never-formatted
//! device looks like. Stores always write the full reserved slot
//! (encoded sector plus zero padding) and fsync before returning.

use anyhow::{Context, Result};
use sector::{read_sector, write_sector, MetaSector, SECTOR_ENCODED_BYTES, SECTOR_SLOT_BYTES};
use std::fs::OpenOptions;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Loads the metadata sector stored at `offset` in `path`.
///
/// A nonexistent file or a read past EOF yields a zeroed (uninitialized)
/// sector rather than an error; a device that was never written simply has
/// no metadata yet.
pub fn load_sector(path: &Path, offset: u64) -> Result<MetaSector> {
    let mut buf = vec![0u8; SECTOR_ENCODED_BYTES];

    match OpenOptions::new().read(true).open(path) {
        Ok(mut f) => {
            f.seek(SeekFrom::Start(offset))
                .with_context(|| format!("failed to seek {} to {}", path.display(), offset))?;
            // Fill as much of the slot as the file holds; the zeroed tail
            // keeps a short file decoding as uninitialized.
            let mut filled = 0;
            while filled < buf.len() {
                let n = f
                    .read(&mut buf[filled..])
                    .with_context(|| format!("failed to read sector from {}", path.display()))?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("failed to open {}", path.display()));
        }
    }

    let sector = read_sector(&mut Cursor::new(&buf))
        .with_context(|| format!("failed to decode sector from {}", path.display()))?;
    Ok(sector)
}

/// Persists `sector` into the slot at `offset` in `path`, creating the
/// file if needed, padding to the full reserved slot, and fsyncing.
pub fn store_sector(path: &Path, offset: u64, sector: &MetaSector) -> Result<()> {
    let mut buf = Vec::with_capacity(SECTOR_SLOT_BYTES);
    write_sector(&mut buf, sector)
        .with_context(|| format!("failed to encode sector for {}", path.display()))?;
    buf.resize(SECTOR_SLOT_BYTES, 0);

    let mut f = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(path)
        .with_context(|| format!("failed to open {} for write-back", path.display()))?;
    f.seek(SeekFrom::Start(offset))
        .with_context(|| format!("failed to seek {} to {}", path.display(), offset))?;
    f.write_all(&buf)
        .with_context(|| format!("failed to write sector to {}", path.display()))?;
    f.sync_all()
        .with_context(|| format!("failed to sync {}", path.display()))?;
    Ok(())
}
