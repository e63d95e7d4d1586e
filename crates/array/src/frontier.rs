//! Watermark accounting.
//!
//! The array never searches for holes: placement always extends the
//! frontier, the highest logical block address allocated so far. Deleting
//! a file below the frontier leaves its range permanently allocated, so
//! `free_blocks` only ever shrinks between reformats. Placement stays a
//! linear scan over the fixed tables instead of needing a sorted
//! free-range structure.

use crate::RaidArray;

impl RaidArray {
    /// The allocation watermark: the maximum `end_block` across every live
    /// entry on every device, or 0 for an array holding no files.
    #[must_use]
    pub fn frontier(&self) -> u64 {
        self.sectors
            .iter()
            .flat_map(|s| s.live_entries())
            .map(|e| e.end_block)
            .max()
            .unwrap_or(0)
    }

    /// Blocks still available beyond the frontier.
    ///
    /// Saturates at 0 if a corrupt table claims an `end_block` past the
    /// configured capacity.
    #[must_use]
    pub fn free_blocks(&self) -> u64 {
        self.total_blocks.saturating_sub(self.frontier())
    }
}
