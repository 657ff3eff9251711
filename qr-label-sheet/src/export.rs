//! Slot → ID table written next to the PDF.
//!
//! The CSV is what lets someone find a given ID on a printed sheet later,
//! so it lists the real slot numbers, not positions in the input list.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::AppError;
use crate::slots::SlotAssignment;

pub fn write_slot_csv(path: &Path, assignments: &[SlotAssignment<'_>]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, assignments)?;
    writer.flush()?;
    Ok(())
}

fn write_rows<W: Write>(out: &mut W, assignments: &[SlotAssignment<'_>]) -> std::io::Result<()> {
    out.write_all(b"slot,id\r\n")?;
    for assignment in assignments {
        writeln!(out, "{},{}\r", assignment.slot, escape_field(assignment.id))?;
    }
    Ok(())
}

/// RFC 4180 quoting: fields with a comma, quote or line break are wrapped in
/// quotes with inner quotes doubled.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
