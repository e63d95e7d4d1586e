use super::*;
use std::io::Cursor;

// -------------------- Helpers --------------------

fn name(s: &str) -> FileName {
    FileName::new(s.as_bytes()).unwrap()
}

fn encode(sector: &MetaSector) -> Vec<u8> {
    let mut buf = Vec::new();
    write_sector(&mut buf, sector).unwrap();
    buf
}

fn decode(buf: &[u8]) -> MetaSector {
    read_sector(&mut Cursor::new(buf)).unwrap()
}

// -------------------- Layout budget --------------------

#[test]
fn encoded_size_is_exact_and_fits_slot() {
    let sector = MetaSector::format(0, 1);
    let buf = encode(&sector);
    assert_eq!(buf.len(), SECTOR_ENCODED_BYTES);
    assert!(buf.len() <= SECTOR_SLOT_BYTES);
}

// -------------------- Validator --------------------

#[test]
fn formatted_sector_is_initialized() {
    let sector = MetaSector::format(3, 8);
    assert!(sector.is_initialized());
    assert_eq!(sector.magic, SECTOR_MAGIC);
    assert_eq!(sector.version, CUR_VERSION);
    assert_eq!(sector.disk_id, 3);
    assert_eq!(sector.total_disks, 8);
    assert_eq!(sector.total_files, 0);
    assert!(sector.entries.iter().all(FileEntry::is_empty));
}

#[test]
fn zeroed_sector_is_uninitialized() {
    assert!(!MetaSector::zeroed().is_initialized());
}

#[test]
fn zeroed_slot_decodes_as_uninitialized() {
    let sector = decode(&vec![0u8; SECTOR_SLOT_BYTES]);
    assert!(!sector.is_initialized());
    assert!(sector.entries.iter().all(FileEntry::is_empty));
}

#[test]
fn wrong_magic_is_uninitialized() {
    let mut sector = MetaSector::format(0, 1);
    sector.magic ^= 1;
    assert!(!sector.is_initialized());
}

// -------------------- Codec round trip --------------------

#[test]
fn format_round_trips() {
    let sector = MetaSector::format(2, 4);
    assert_eq!(decode(&encode(&sector)), sector);
}

#[test]
fn populated_table_round_trips() {
    let mut sector = MetaSector::format(0, 2);
    sector.entries[0].set(name("capture-a"), 0, 100);
    sector.entries[5].set(name("capture-b"), 100, 150);
    sector.total_files = 2;

    let back = decode(&encode(&sector));
    assert_eq!(back, sector);
    assert_eq!(back.live_entries().count(), 2);
    assert_eq!(back.entries[5].start_block, 100);
    assert_eq!(back.entries[5].end_block, 150);
}

#[test]
fn tombstoned_slot_round_trips_as_empty() {
    let mut sector = MetaSector::format(0, 1);
    sector.entries[0].set(name("gone"), 10, 20);
    sector.entries[0].clear();

    let back = decode(&encode(&sector));
    assert!(back.entries[0].is_empty());
    assert_eq!(back.entries[0].start_block, 0);
    assert_eq!(back.entries[0].end_block, 0);
}

#[test]
fn short_read_is_an_error() {
    let sector = MetaSector::format(0, 1);
    let buf = encode(&sector);
    let res = read_sector(&mut Cursor::new(&buf[..buf.len() - 1]));
    assert!(matches!(res, Err(SectorError::Io(_))));
}

#[test]
fn file_round_trip_at_offset() {
    use std::io::{Read, Seek, SeekFrom, Write};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dev0");
    let mut sector = MetaSector::format(1, 2);
    sector.entries[0].set(name("flows.pcap"), 0, 4096);
    sector.total_files = 1;

    {
        let mut f = std::fs::File::create(&path).unwrap();
        f.seek(SeekFrom::Start(SECTOR_SLOT_BYTES as u64)).unwrap();
        write_sector(&mut f, &sector).unwrap();
        f.flush().unwrap();
    }

    let mut f = std::fs::File::open(&path).unwrap();
    f.seek(SeekFrom::Start(SECTOR_SLOT_BYTES as u64)).unwrap();
    let mut buf = vec![0u8; SECTOR_ENCODED_BYTES];
    f.read_exact(&mut buf).unwrap();
    assert_eq!(decode(&buf), sector);
}

// -------------------- FileName --------------------

#[test]
fn name_rejects_empty() {
    assert!(matches!(FileName::new(b""), Err(SectorError::EmptyName)));
    assert!(matches!(
        FileName::new(&[0u8, b'x']),
        Err(SectorError::EmptyName)
    ));
}

#[test]
fn name_rejects_too_long() {
    let long = vec![b'a'; NAME_BYTES + 1];
    assert!(matches!(
        FileName::new(&long),
        Err(SectorError::NameTooLong(n)) if n == NAME_BYTES + 1
    ));
}

#[test]
fn name_accepts_max_length() {
    let max = vec![b'a'; NAME_BYTES];
    let n = FileName::new(&max).unwrap();
    assert_eq!(n.as_bytes(), &[b'a'; NAME_BYTES]);
}

#[test]
fn name_comparison_is_fixed_width() {
    // "ab" and "ab\0..." pad to the same fixed-width representation.
    assert_eq!(name("ab"), FileName::new(b"ab").unwrap());
    assert_ne!(name("ab"), name("abc"));
}

#[test]
fn entry_matches_by_name() {
    let mut entry = FileEntry::EMPTY;
    entry.set(name("x"), 5, 9);
    assert!(entry.matches(&name("x")));
    assert!(!entry.matches(&name("y")));
    assert_eq!(entry.block_count(), 4);

    entry.clear();
    assert!(!entry.matches(&name("x")));
}

#[test]
fn name_displays_without_padding() {
    assert_eq!(name("trace-01").to_string(), "trace-01");
}
