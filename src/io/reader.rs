//! Streaming ACH reader
//!
//! Walks a byte source line by line, dispatching each 94-character record
//! on its first character while holding the "current batch" context. The
//! reader enforces the file's structural grammar: exactly one header
//! first, exactly one control last, entries only inside an open batch, and
//! a batch control closing (and validating) every batch it opened.
//!
//! # Errors
//!
//! The first defect stops the parse. Errors are wrapped with the line
//! number and record name (`line:4 record:EntryDetail ...`).

use crate::core::{Batch, File, IatBatch};
use crate::records::field::RECORD_LENGTH;
use crate::records::{
    Addenda02, Addenda05, Addenda10, Addenda11, Addenda12, Addenda13, Addenda14, Addenda15,
    Addenda16, Addenda17, Addenda18, Addenda98, Addenda99, BatchControl, BatchHeader, EntryDetail,
    FileControl, FileHeader, IatBatchHeader, IatEntryDetail, Record,
};
use crate::types::error::AchError;
use std::io::BufRead;

const MSG_BATCH_OUTSIDE: &str = "outside of current batch";
const MSG_BATCH_INSIDE: &str = "inside of current batch";
const MSG_ONE_FILE_HEADER: &str = "none or more than one file header exists";
const MSG_ONE_FILE_CONTROL: &str = "none or more than one file control exists";

/// Streaming parser producing a [`File`] or the first error encountered
///
/// # Examples
///
/// ```no_run
/// use nacha_engine::io::Reader;
/// use std::io::BufReader;
///
/// let source = BufReader::new(std::fs::File::open("payroll.ach").unwrap());
/// let file = Reader::new(source).read().unwrap();
/// println!("{} batches", file.batches.len());
/// ```
pub struct Reader<R: BufRead> {
    reader: R,
    /// Line number of the record being parsed, 1-based
    line_num: usize,
    file: File,
    current_batch: Option<Batch>,
    current_iat_batch: Option<IatBatch>,
    has_header: bool,
    has_control: bool,
}

impl<R: BufRead> Reader<R> {
    /// Create a reader over a buffered byte source
    pub fn new(reader: R) -> Self {
        Reader {
            reader,
            line_num: 0,
            file: File::default(),
            current_batch: None,
            current_iat_batch: None,
            has_header: false,
            has_control: false,
        }
    }

    /// Consume the source until EOF or the first error
    pub fn read(mut self) -> Result<File, AchError> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                break;
            }
            let line = buf.trim_end_matches('\n').trim_end_matches('\r').to_string();
            self.line_num += 1;

            if self.line_num == 1
                && line.len() > RECORD_LENGTH
                && line.len() % RECORD_LENGTH == 0
            {
                // a fixed-width file with no separators: re-segment the
                // single line into 94-character records
                for record in line.as_bytes().chunks(RECORD_LENGTH) {
                    let record = std::str::from_utf8(record).map_err(|_| {
                        AchError::file("RecordLength", "", "must be ASCII characters")
                    })?;
                    self.parse_line(record)?;
                }
            } else if line.len() != RECORD_LENGTH {
                return Err(AchError::parse(
                    self.line_num,
                    "RecordLength",
                    AchError::file(
                        "RecordLength",
                        &line.len().to_string(),
                        "must be 94 characters",
                    ),
                ));
            } else {
                self.parse_line(&line)?;
            }
        }

        if !self.has_header {
            return Err(AchError::parse(
                self.line_num,
                FileHeader::NAME,
                AchError::file("", "", MSG_ONE_FILE_HEADER),
            ));
        }
        if !self.has_control {
            return Err(AchError::parse(
                self.line_num,
                FileControl::NAME,
                AchError::file("", "", MSG_ONE_FILE_CONTROL),
            ));
        }
        Ok(self.file)
    }

    /// Dispatch one 94-character record on its first character
    fn parse_line(&mut self, line: &str) -> Result<(), AchError> {
        if !line.is_ascii() {
            return Err(AchError::parse(
                self.line_num,
                "recordType",
                AchError::file("RecordLength", "", "must be ASCII characters"),
            ));
        }
        match line.as_bytes().first() {
            Some(b'1') => self.parse_file_header(line),
            Some(b'5') => self.parse_batch_header(line),
            Some(b'6') => self.parse_entry_detail(line),
            Some(b'7') => self.parse_addenda(line),
            Some(b'8') => self.parse_batch_control(line),
            Some(b'9') => {
                if line.starts_with("99") {
                    // final blocking padding
                    Ok(())
                } else {
                    self.parse_file_control(line)
                }
            }
            _ => Err(AchError::parse(
                self.line_num,
                "recordType",
                AchError::file(
                    "recordType",
                    &line[0..1],
                    "is an unknown record type",
                ),
            )),
        }
    }

    /// Parse and validate a record, attaching line and record context
    fn parse_record<T: Record>(&self, line: &str) -> Result<T, AchError> {
        let record =
            T::parse(line).map_err(|e| AchError::parse(self.line_num, T::NAME, e))?;
        record
            .validate()
            .map_err(|e| AchError::parse(self.line_num, T::NAME, e))?;
        Ok(record)
    }

    fn parse_file_header(&mut self, line: &str) -> Result<(), AchError> {
        if self.has_header {
            return Err(AchError::parse(
                self.line_num,
                FileHeader::NAME,
                AchError::file("", "", MSG_ONE_FILE_HEADER),
            ));
        }
        self.file.header = self.parse_record(line)?;
        self.has_header = true;
        Ok(())
    }

    /// Select the IAT or ordinary batch header by peeking at the Standard
    /// Entry Class columns
    fn parse_batch_header(&mut self, line: &str) -> Result<(), AchError> {
        if self.current_batch.is_some() || self.current_iat_batch.is_some() {
            return Err(AchError::parse(
                self.line_num,
                BatchHeader::NAME,
                AchError::file("", "", MSG_BATCH_INSIDE),
            ));
        }
        if &line[50..53] == "IAT" {
            let header: IatBatchHeader = self.parse_record(line)?;
            self.current_iat_batch = Some(IatBatch::new(header));
        } else {
            let header: BatchHeader = self.parse_record(line)?;
            let batch =
                Batch::new(header).map_err(|e| AchError::parse(self.line_num, BatchHeader::NAME, e))?;
            self.current_batch = Some(batch);
        }
        Ok(())
    }

    /// Select the IAT or ordinary entry by peeking at the reserved columns
    /// only an IAT entry leaves blank
    fn parse_entry_detail(&mut self, line: &str) -> Result<(), AchError> {
        if &line[16..29] == "             " {
            let entry: IatEntryDetail = self.parse_record(line)?;
            match self.current_iat_batch.as_mut() {
                Some(batch) => batch.add_entry(entry),
                None => {
                    return Err(AchError::parse(
                        self.line_num,
                        IatEntryDetail::NAME,
                        AchError::file("", "", MSG_BATCH_OUTSIDE),
                    ))
                }
            }
        } else {
            let entry: EntryDetail = self.parse_record(line)?;
            match self.current_batch.as_mut() {
                Some(batch) => batch.add_entry(entry),
                None => {
                    return Err(AchError::parse(
                        self.line_num,
                        EntryDetail::NAME,
                        AchError::file("", "", MSG_BATCH_OUTSIDE),
                    ))
                }
            }
        }
        Ok(())
    }

    fn parse_addenda(&mut self, line: &str) -> Result<(), AchError> {
        if self.current_batch.is_some() {
            self.parse_batch_addenda(line)
        } else if self.current_iat_batch.is_some() {
            self.parse_iat_addenda(line)
        } else {
            Err(AchError::parse(
                self.line_num,
                "Addenda",
                AchError::file("Addenda", "", MSG_BATCH_OUTSIDE),
            ))
        }
    }

    fn parse_batch_addenda(&mut self, line: &str) -> Result<(), AchError> {
        let line_num = self.line_num;
        // the batch is present per parse_addenda; re-borrow mutably
        let Some(batch) = self.current_batch.as_mut() else {
            return Ok(());
        };
        let Some(entry) = batch.entries.last_mut() else {
            return Err(AchError::parse(
                line_num,
                "Addenda",
                AchError::file("Addenda", "", MSG_BATCH_OUTSIDE),
            ));
        };
        if entry.addenda_record_indicator != 1 {
            return Err(AchError::parse(
                line_num,
                "Addenda",
                AchError::file(
                    "AddendaRecordIndicator",
                    "",
                    "entry detail addenda record indicator must be 1",
                ),
            ));
        }
        match &line[1..3] {
            "02" => {
                let addenda = parse_record_at::<Addenda02>(line_num, line)?;
                entry.set_addenda02(addenda);
            }
            "05" => {
                let addenda = parse_record_at::<Addenda05>(line_num, line)?;
                entry.add_addenda05(addenda);
            }
            "98" => {
                let addenda = parse_record_at::<Addenda98>(line_num, line)?;
                entry.set_addenda98(addenda);
            }
            "99" => {
                let addenda = parse_record_at::<Addenda99>(line_num, line)?;
                entry.set_addenda99(addenda);
            }
            other => {
                return Err(AchError::parse(
                    line_num,
                    "Addenda",
                    AchError::field("TypeCode", other, "invalid addenda type code"),
                ))
            }
        }
        Ok(())
    }

    fn parse_iat_addenda(&mut self, line: &str) -> Result<(), AchError> {
        let line_num = self.line_num;
        let Some(batch) = self.current_iat_batch.as_mut() else {
            return Ok(());
        };
        let Some(entry) = batch.entries.last_mut() else {
            return Err(AchError::parse(
                line_num,
                "Addenda",
                AchError::file("Addenda", "", MSG_BATCH_OUTSIDE),
            ));
        };
        if entry.addenda_record_indicator != 1 {
            return Err(AchError::parse(
                line_num,
                "Addenda",
                AchError::file(
                    "AddendaRecordIndicator",
                    "",
                    "entry detail addenda record indicator must be 1",
                ),
            ));
        }
        match &line[1..3] {
            "10" => entry.addenda10 = Some(parse_record_at::<Addenda10>(line_num, line)?),
            "11" => entry.addenda11 = Some(parse_record_at::<Addenda11>(line_num, line)?),
            "12" => entry.addenda12 = Some(parse_record_at::<Addenda12>(line_num, line)?),
            "13" => entry.addenda13 = Some(parse_record_at::<Addenda13>(line_num, line)?),
            "14" => entry.addenda14 = Some(parse_record_at::<Addenda14>(line_num, line)?),
            "15" => entry.addenda15 = Some(parse_record_at::<Addenda15>(line_num, line)?),
            "16" => entry.addenda16 = Some(parse_record_at::<Addenda16>(line_num, line)?),
            "17" => entry.add_addenda17(parse_record_at::<Addenda17>(line_num, line)?),
            "18" => entry.add_addenda18(parse_record_at::<Addenda18>(line_num, line)?),
            "98" => entry.addenda98 = Some(parse_record_at::<Addenda98>(line_num, line)?),
            "99" => entry.addenda99 = Some(parse_record_at::<Addenda99>(line_num, line)?),
            other => {
                return Err(AchError::parse(
                    line_num,
                    "Addenda",
                    AchError::field("TypeCode", other, "invalid addenda type code"),
                ))
            }
        }
        Ok(())
    }

    /// Close the open batch: parse its control, then validate the whole
    /// batch before it joins the file
    fn parse_batch_control(&mut self, line: &str) -> Result<(), AchError> {
        if let Some(mut batch) = self.current_batch.take() {
            batch.control = self.parse_record::<BatchControl>(line)?;
            batch
                .validate()
                .map_err(|e| AchError::parse(self.line_num, "Batches", e))?;
            self.file.add_batch(batch);
            Ok(())
        } else if let Some(mut batch) = self.current_iat_batch.take() {
            batch.control = self.parse_record::<BatchControl>(line)?;
            batch
                .validate()
                .map_err(|e| AchError::parse(self.line_num, "Batches", e))?;
            self.file.add_iat_batch(batch);
            Ok(())
        } else {
            Err(AchError::parse(
                self.line_num,
                BatchControl::NAME,
                AchError::file("", "", MSG_BATCH_OUTSIDE),
            ))
        }
    }

    fn parse_file_control(&mut self, line: &str) -> Result<(), AchError> {
        if self.has_control {
            return Err(AchError::parse(
                self.line_num,
                FileControl::NAME,
                AchError::file("", "", MSG_ONE_FILE_CONTROL),
            ));
        }
        self.file.control = self.parse_record(line)?;
        self.has_control = true;
        Ok(())
    }
}

/// Free-function form of `parse_record` for use while the reader is
/// mutably borrowed
fn parse_record_at<T: Record>(line_num: usize, line: &str) -> Result<T, AchError> {
    let record = T::parse(line).map_err(|e| AchError::parse(line_num, T::NAME, e))?;
    record
        .validate()
        .map_err(|e| AchError::parse(line_num, T::NAME, e))?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_str(content: &str) -> Result<File, AchError> {
        Reader::new(Cursor::new(content.to_string())).read()
    }

    /// A minimal valid one-batch PPD file, rendered by the writer tests'
    /// mock and kept in sync with the writer round-trip suite
    fn mock_file_content() -> String {
        use crate::core::file::tests::mock_file_ppd;
        use crate::io::writer::Writer;

        let file = mock_file_ppd();
        let mut out = Vec::new();
        {
            let mut writer = Writer::new(&mut out);
            writer.write(&file).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_read_round_trip() {
        use crate::core::file::tests::mock_file_ppd;

        let parsed = read_str(&mock_file_content()).unwrap();
        assert_eq!(parsed, mock_file_ppd());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_read_requires_file_header() {
        let err = read_str("").unwrap_err();
        assert!(err.to_string().contains("file header"));
    }

    #[test]
    fn test_read_rejects_two_file_headers() {
        let content = mock_file_content();
        let header_line = content.lines().next().unwrap();
        let doubled = format!("{header_line}\n{content}");
        let err = read_str(&doubled).unwrap_err();
        assert!(err.to_string().contains("more than one file header"));
    }

    #[test]
    fn test_read_rejects_short_line() {
        let content = mock_file_content().replacen("101 ", "101", 1);
        let err = read_str(&content).unwrap_err();
        assert!(err.to_string().contains("line:1"));
        assert!(err.to_string().contains("94 characters"));
    }

    #[test]
    fn test_read_rejects_entry_outside_batch() {
        let content = mock_file_content();
        let mut lines: Vec<&str> = content.lines().collect();
        // drop the batch header so the entry appears outside a batch
        lines.remove(1);
        let err = read_str(&lines.join("\n")).unwrap_err();
        assert!(err.to_string().contains(MSG_BATCH_OUTSIDE));
    }

    #[test]
    fn test_read_rejects_batch_header_inside_batch() {
        let content = mock_file_content();
        let lines: Vec<&str> = content.lines().collect();
        let mut doubled: Vec<&str> = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            doubled.push(line);
            if i == 1 {
                doubled.push(lines[1]);
            }
        }
        let err = read_str(&doubled.join("\n")).unwrap_err();
        assert!(err.to_string().contains(MSG_BATCH_INSIDE));
    }

    #[test]
    fn test_read_skips_blocking_padding() {
        let parsed = read_str(&mock_file_content()).unwrap();
        // the padded file parses cleanly and keeps one batch
        assert_eq!(parsed.batches.len(), 1);
    }

    #[test]
    fn test_read_unwrapped_fixed_width_file() {
        let content = mock_file_content().replace('\n', "");
        let parsed = read_str(&content).unwrap();
        assert_eq!(parsed.batches.len(), 1);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_read_requires_file_control() {
        let content = mock_file_content();
        let kept: Vec<&str> = content
            .lines()
            .filter(|l| !l.starts_with('9'))
            .collect();
        let err = read_str(&kept.join("\n")).unwrap_err();
        assert!(err.to_string().contains("file control"));
    }

    #[test]
    fn test_read_rejects_unknown_record_type() {
        let content = format!("{}\n{}", "4".repeat(94), mock_file_content());
        let err = read_str(&content).unwrap_err();
        assert!(err.to_string().contains("unknown record type"));
    }

    #[test]
    fn test_addenda_requires_indicator() {
        use crate::records::addenda::tests::mock_addenda05;

        let content = mock_file_content();
        let mut lines: Vec<String> = content.lines().map(String::from).collect();
        // splice an addenda after the entry, whose indicator is 0
        let mut addenda = mock_addenda05();
        addenda.entry_detail_sequence_number = 1;
        lines.insert(3, addenda.to_string());
        let err = read_str(&lines.join("\n")).unwrap_err();
        assert!(err.to_string().contains("AddendaRecordIndicator"));
    }
}
