use crate::RaidArray;
use sector::{FileName, MetaSector};

pub fn name(s: &str) -> FileName {
    FileName::new(s.as_bytes()).unwrap()
}

/// A freshly formatted array of `disks` devices, `blocks_per_disk` logical
/// blocks each, with the format-path dirty flags cleared (as a caller
/// would after persisting the new sectors).
pub fn fresh_array(disks: usize, blocks_per_disk: u64) -> RaidArray {
    let sectors = vec![MetaSector::zeroed(); disks];
    let mut array = RaidArray::assemble(sectors, disks as u64 * blocks_per_disk).unwrap();
    for disk in array.dirty_disks() {
        array.clear_dirty(disk);
    }
    array
}

/// The sectors of a formatted array, as if re-read from the devices.
pub fn formatted_sectors(disks: usize) -> Vec<MetaSector> {
    (0..disks)
        .map(|i| MetaSector::format(i as u8, disks as u8))
        .collect()
}
