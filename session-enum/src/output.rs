use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::batch::HostOutcome;

/// Create a BufWriter for the output file, or stdout when no path is given.
pub fn create_output_writer(output_path: Option<&Path>) -> Result<Box<dyn Write>> {
    match output_path {
        Some(path) => {
            let file: File = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("Failed to open output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

/// Write one record as JSON (one line).
pub fn write_json_line<T: Serialize, W: Write + ?Sized>(record: &T, writer: &mut W) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")
}

/// Write every session of one host and flush, so a later failure keeps what
/// was already collected. Returns the number of lines written.
pub fn write_outcome<W: Write + ?Sized>(outcome: &HostOutcome, writer: &mut W) -> io::Result<usize> {
    let mut lines = 0;
    for session in outcome.sessions() {
        write_json_line(&session, writer)?;
        lines += 1;
    }
    writer.flush()?;
    Ok(lines)
}
