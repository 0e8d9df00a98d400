//! Ordered final report of a watch cycle.

use std::io::{self, Write};
use std::sync::Arc;

use super::buffer_entry::{BufferEntry, WatchSettings};

/// Header block preceding a stage's log: blank line, status line, a dashed
/// underline of the same length and another blank line.
pub fn section_header(status_line: &str) -> Vec<u8> {
    let mut header = Vec::with_capacity(status_line.len() * 2 + 4);
    header.extend_from_slice(b"\n\n");
    header.extend_from_slice(status_line.as_bytes());
    header.push(b'\n');
    header.resize(header.len() + status_line.len(), b'-');
    header.extend_from_slice(b"\n\n");
    header
}

/// Write every entry's header and log in index order, then one trailing
/// line break, and flush.
pub fn write_report<W: Write>(
    sink: &mut W,
    entries: &[Arc<BufferEntry>],
    settings: &WatchSettings,
) -> io::Result<()> {
    let mut report = Vec::new();
    for entry in entries {
        report.extend_from_slice(&section_header(&entry.status_line(settings)));
        report.extend_from_slice(&entry.log_bytes());
    }
    report.push(b'\n');

    sink.write_all(&report)?;
    sink.flush()
}
