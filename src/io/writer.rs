//! Canonical ACH writer
//!
//! Renders a validated [`File`] as newline-terminated 94-character
//! records, padding the final block with all-9 lines so the total line
//! count is a multiple of the blocking factor. For any file built with
//! `create`, reading the written bytes back yields an equal file.

use crate::core::File;
use crate::types::error::AchError;
use std::io::{BufWriter, Write};

/// Writes [`File`] values as NACHA-encoded bytes
///
/// Output is buffered; [`Writer::write`] flushes when the file is
/// complete, and [`Writer::flush`] is exposed for callers that need to
/// drain earlier.
///
/// # Examples
///
/// ```no_run
/// use nacha_engine::io::Writer;
/// # let file = nacha_engine::File::default();
///
/// let out = std::fs::File::create("payroll.ach").unwrap();
/// let mut writer = Writer::new(out);
/// writer.write(&file).unwrap();
/// ```
pub struct Writer<W: Write> {
    writer: BufWriter<W>,
    /// Lines written for the file in progress
    line_num: u64,
}

impl<W: Write> Writer<W> {
    /// Create a writer over a byte sink
    pub fn new(writer: W) -> Self {
        Writer {
            writer: BufWriter::new(writer),
            line_num: 0,
        }
    }

    /// Validate `file` and render it, including final block padding
    pub fn write(&mut self, file: &File) -> Result<(), AchError> {
        file.validate()?;

        self.line_num = 0;
        self.write_line(&file.header.to_string())?;

        for batch in &file.batches {
            self.write_line(&batch.header.to_string())?;
            for entry in &batch.entries {
                self.write_line(&entry.to_string())?;
                if let Some(addenda) = &entry.addenda02 {
                    self.write_line(&addenda.to_string())?;
                }
                for addenda in &entry.addenda05 {
                    self.write_line(&addenda.to_string())?;
                }
                if let Some(addenda) = &entry.addenda98 {
                    self.write_line(&addenda.to_string())?;
                }
                if let Some(addenda) = &entry.addenda99 {
                    self.write_line(&addenda.to_string())?;
                }
            }
            self.write_line(&batch.control.to_string())?;
        }

        for batch in &file.iat_batches {
            self.write_line(&batch.header.to_string())?;
            for entry in &batch.entries {
                self.write_line(&entry.to_string())?;
                let mandatory = [
                    entry.addenda10.as_ref().map(ToString::to_string),
                    entry.addenda11.as_ref().map(ToString::to_string),
                    entry.addenda12.as_ref().map(ToString::to_string),
                    entry.addenda13.as_ref().map(ToString::to_string),
                    entry.addenda14.as_ref().map(ToString::to_string),
                    entry.addenda15.as_ref().map(ToString::to_string),
                    entry.addenda16.as_ref().map(ToString::to_string),
                ];
                for line in mandatory.into_iter().flatten() {
                    self.write_line(&line)?;
                }
                for addenda in &entry.addenda17 {
                    self.write_line(&addenda.to_string())?;
                }
                for addenda in &entry.addenda18 {
                    self.write_line(&addenda.to_string())?;
                }
                if let Some(addenda) = &entry.addenda98 {
                    self.write_line(&addenda.to_string())?;
                }
                if let Some(addenda) = &entry.addenda99 {
                    self.write_line(&addenda.to_string())?;
                }
            }
            self.write_line(&batch.control.to_string())?;
        }

        self.write_line(&file.control.to_string())?;

        // pad the final block with all-9 lines
        while self.line_num % 10 != 0 {
            self.write_line(&"9".repeat(94))?;
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Drain any buffered output to the underlying sink
    pub fn flush(&mut self) -> Result<(), AchError> {
        self.writer.flush()?;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<(), AchError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.line_num += 1;
        Ok(())
    }
}
