//! # CLI — Capture-Store Management Shell
//!
//! The offline ingestion/management front end for the capture-store
//! metadata array. Mounts the array over the configured devices, then
//! reads commands from stdin and prints results to stdout. Designed for
//! both interactive use and scripted testing (pipe commands via stdin).
//!
//! ## Commands
//!
//! ```text
//! ADD name blocks   Place a new capture file at the allocation frontier
//! DEL name          Tombstone a capture file (its blocks stay allocated)
//! FIND name         Look up a file's block range
//! LOCATE name       Look up a file's owning disk and block range
//! LS                List every live file in scan order
//! FREE              Print frontier / free-space accounting
//! STATS             Print array debug info
//! EXIT / QUIT       Shut down
//! ```
//!
//! ## Configuration
//!
//! All settings are controlled via environment variables:
//!
//! ```text
//! PACKRAID_DEVICES      Device table "path:blocks,path:blocks" (required)
//! PACKRAID_META_OFFSET  Byte offset of the metadata slot   (default: 0)
//! ```
//!
//! ## Example
//!
//! ```text
//! $ PACKRAID_DEVICES="dev0:1000,dev1:1000" cargo run -p cli
//! packraid mounted (disks=2, blocks=2000, files=0, frontier=0)
//! > ADD flows.pcap 100
//! OK disk=0 start=0 end=100
//! > LOCATE flows.pcap
//! disk=0 start=0 end=100
//! > EXIT
//! bye
//! ```
//!
//! Mounting a mix of formatted and unformatted devices is fatal: the shell
//! prints the integrity error and exits non-zero without touching any
//! device.

mod device;

use anyhow::{bail, Context, Result};
use array::RaidArray;
use config::{ArrayConfig, DEFAULT_META_OFFSET};
use sector::FileName;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Reads a configuration value from the environment, falling back to `default`.
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Writes every dirty sector back to its device, then clears the flags.
fn persist_dirty(array: &mut RaidArray, cfg: &ArrayConfig) -> Result<()> {
    for disk in array.dirty_disks() {
        let spec = &cfg.devices[disk as usize];
        let sector = array.sector(disk).context("dirty disk id out of range")?;
        device::store_sector(&spec.path, cfg.meta_offset, sector)?;
        array.clear_dirty(disk);
    }
    Ok(())
}

/// Parses a command argument into a [`FileName`], printing the usage error
/// itself so the REPL loop stays flat.
fn parse_name(arg: &str) -> Option<FileName> {
    match FileName::from_str(arg) {
        Ok(name) => Some(name),
        Err(e) => {
            println!("ERR bad name: {}", e);
            None
        }
    }
}

fn print_prompt() {
    print!("> ");
    io::stdout().flush().ok();
}

fn main() -> Result<()> {
    env_logger::init();

    let table = env_or("PACKRAID_DEVICES", "");
    if table.is_empty() {
        bail!("PACKRAID_DEVICES is not set (expected \"path:blocks,path:blocks\")");
    }
    let meta_offset: u64 = env_or("PACKRAID_META_OFFSET", "0")
        .parse()
        .unwrap_or(DEFAULT_META_OFFSET);

    let cfg = ArrayConfig::from_device_table(&table, meta_offset)
        .context("invalid PACKRAID_DEVICES device table")?;

    // Mount: load every member's sector, assemble, and persist the fresh
    // format if this is first use. A fatal assembly error (mixed
    // initialization, integrity failure) propagates out and exits non-zero
    // before any device is written.
    let mut sectors = Vec::with_capacity(cfg.num_devices());
    for spec in &cfg.devices {
        sectors.push(device::load_sector(&spec.path, cfg.meta_offset)?);
    }
    let mut array =
        RaidArray::assemble(sectors, cfg.total_blocks()).context("failed to mount array")?;
    persist_dirty(&mut array, &cfg)?;

    println!(
        "packraid mounted (disks={}, blocks={}, files={}, frontier={})",
        array.num_disks(),
        array.total_blocks(),
        array.file_count(),
        array.frontier()
    );
    println!("Commands: ADD name blocks | DEL name | FIND name | LOCATE name");
    println!("          LS | FREE | STATS | EXIT");
    print_prompt();

    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        if let Some(cmd) = parts.next() {
            match cmd.to_uppercase().as_str() {
                "ADD" => match (parts.next(), parts.next().and_then(|b| b.parse::<u64>().ok())) {
                    (Some(name), Some(blocks)) => {
                        if let Some(name) = parse_name(name) {
                            match array.insert(name, blocks) {
                                Ok(loc) => {
                                    persist_dirty(&mut array, &cfg)?;
                                    println!(
                                        "OK disk={} start={} end={}",
                                        loc.disk_id, loc.start_block, loc.end_block
                                    );
                                }
                                Err(e) => println!("ERR add failed: {}", e),
                            }
                        }
                    }
                    _ => println!("ERR usage: ADD name blocks"),
                },
                "DEL" => {
                    if let Some(name) = parts.next().and_then(parse_name) {
                        if array.delete(&name) {
                            persist_dirty(&mut array, &cfg)?;
                            println!("OK");
                        } else {
                            println!("(not found)");
                        }
                    } else {
                        println!("ERR usage: DEL name");
                    }
                }
                "FIND" => {
                    if let Some(name) = parts.next().and_then(parse_name) {
                        match array.find(&name) {
                            Some(entry) => println!(
                                "{} start={} end={} blocks={}",
                                name,
                                entry.start_block,
                                entry.end_block,
                                entry.block_count()
                            ),
                            None => println!("(not found)"),
                        }
                    } else {
                        println!("ERR usage: FIND name");
                    }
                }
                "LOCATE" => {
                    if let Some(name) = parts.next().and_then(parse_name) {
                        match array.locate(&name) {
                            Some(loc) => println!(
                                "disk={} start={} end={}",
                                loc.disk_id, loc.start_block, loc.end_block
                            ),
                            None => println!("ERR not found: {}", name),
                        }
                    } else {
                        println!("ERR usage: LOCATE name");
                    }
                }
                "LS" => {
                    let mut count = 0usize;
                    for s in array.sectors() {
                        for entry in s.live_entries() {
                            if let Some(name) = entry.name() {
                                println!(
                                    "{} disk={} start={} end={}",
                                    name, s.disk_id, entry.start_block, entry.end_block
                                );
                                count += 1;
                            }
                        }
                    }
                    println!("({} files)", count);
                }
                "FREE" => println!(
                    "frontier={} free={} total={}",
                    array.frontier(),
                    array.free_blocks(),
                    array.total_blocks()
                ),
                "STATS" => println!("{:?}", array),
                "EXIT" | "QUIT" => {
                    println!("bye");
                    break;
                }
                other => println!("unknown command: {}", other),
            }
        }

        print_prompt();
    }

    Ok(())
}
