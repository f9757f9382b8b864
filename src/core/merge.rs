//! File merger
//!
//! Consolidates many ACH files into as few as possible. Files are grouped
//! by their (immediate destination, immediate origin) pair, duplicate
//! batches are dropped, and no output file may exceed the NACHA limit of
//! 10,000 rendered lines. When appending a batch would cross the limit,
//! the batch is rolled back, the full file is sealed, and a fresh file
//! with the same header (stamped with the current date and time) takes
//! over.

use crate::core::file::File;
use crate::types::error::AchError;
use chrono::{Local, NaiveTime, Timelike};

/// NACHA's per-file limit on rendered lines
pub const FILE_LINE_LIMIT: u64 = 10_000;

/// Consolidate `files` into as few output files as possible
///
/// Domestic and IAT batches are deduplicated under the `equal` semantics
/// of [`Batch`](crate::core::Batch) and [`IatBatch`](crate::core::IatBatch)
/// (content identity, batch numbers excluded), relative batch order is
/// preserved, and every output file is rebuilt with `create` so its
/// control record and batch numbering stay consistent.
pub fn merge_files(files: Vec<File>) -> Result<Vec<File>, AchError> {
    let mut merger = MergeableFiles::default();

    for input in files {
        let mut out_idx = merger.lookup_by_header(input.header.clone());
        for batch in input.batches {
            if merger.outfiles[out_idx]
                .batches
                .iter()
                .any(|existing| existing.equal(&batch))
            {
                continue;
            }
            merger.outfiles[out_idx].add_batch(batch);
            merger.outfiles[out_idx].create()?;

            // a lone oversized batch cannot be split further, so the
            // rollover only happens when something would remain behind
            if merger.outfiles[out_idx].line_count() > FILE_LINE_LIMIT
                && merger.batch_count(out_idx) > 1
            {
                // roll the batch back, seal the full file, and restart
                // with a fresh header stamped "now"
                if let Some(batch) = merger.outfiles[out_idx].batches.pop() {
                    merger.outfiles[out_idx].create()?;
                    out_idx = merger.seal(out_idx);

                    merger.outfiles[out_idx].add_batch(batch);
                    merger.outfiles[out_idx].create()?;
                }
            }
        }
        for iat_batch in input.iat_batches {
            if merger.outfiles[out_idx]
                .iat_batches
                .iter()
                .any(|existing| existing.equal(&iat_batch))
            {
                continue;
            }
            merger.outfiles[out_idx].add_iat_batch(iat_batch);
            merger.outfiles[out_idx].create()?;

            if merger.outfiles[out_idx].line_count() > FILE_LINE_LIMIT
                && merger.batch_count(out_idx) > 1
            {
                if let Some(iat_batch) = merger.outfiles[out_idx].iat_batches.pop() {
                    merger.outfiles[out_idx].create()?;
                    out_idx = merger.seal(out_idx);

                    merger.outfiles[out_idx].add_iat_batch(iat_batch);
                    merger.outfiles[out_idx].create()?;
                }
            }
        }
        // renumber sequentially from 1 now that placement is final
        for (i, batch) in merger.outfiles[out_idx].batches.iter_mut().enumerate() {
            batch.header.batch_number = i as u64 + 1;
            batch.control.batch_number = i as u64 + 1;
        }
    }

    let mut out = merger.sealed;
    out.extend(merger.outfiles);
    Ok(out)
}

/// Working state for one merge invocation
#[derive(Default)]
struct MergeableFiles {
    /// Open output files, at most one per merge key
    outfiles: Vec<File>,
    /// Files that reached the line limit and accept no more batches
    sealed: Vec<File>,
}

impl MergeableFiles {
    /// Batches of both kinds held by the open output file at `idx`
    fn batch_count(&self, idx: usize) -> usize {
        self.outfiles[idx].batches.len() + self.outfiles[idx].iat_batches.len()
    }

    /// Index of the open output file matching `header`'s merge key,
    /// creating one when none exists
    fn lookup_by_header(&mut self, header: crate::records::FileHeader) -> usize {
        for (i, file) in self.outfiles.iter().enumerate() {
            if file.header.immediate_destination == header.immediate_destination
                && file.header.immediate_origin == header.immediate_origin
            {
                return i;
            }
        }
        self.outfiles.push(File::new(header));
        self.outfiles.len() - 1
    }

    /// Move the file at `idx` to the sealed list and open a replacement
    /// with the same header but the current creation date and time
    fn seal(&mut self, idx: usize) -> usize {
        let full = self.outfiles.remove(idx);
        let mut header = full.header.clone();
        let now = Local::now().naive_local();
        header.file_creation_date = now.date();
        // the wire format carries minutes resolution only
        header.file_creation_time =
            NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or_default();
        self.sealed.push(full);

        self.outfiles.push(File::new(header));
        self.outfiles.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::batch::tests::mock_batch;
    use crate::core::batch::Batch;
    use crate::core::iat_batch::tests::mock_iat_batch;
    use crate::core::iat_batch::IatBatch;
    use crate::records::entry_detail::tests::mock_entry_detail;
    use crate::records::file_header::tests::mock_file_header;
    use crate::records::iat_entry::tests::mock_iat_entry_with_addenda;
    use crate::records::iat_header::tests::mock_iat_batch_header;

    fn file_with_batches(batches: Vec<Batch>) -> File {
        let mut file = File::new(mock_file_header());
        for batch in batches {
            file.add_batch(batch);
        }
        file.create().unwrap();
        file
    }

    /// A valid batch whose entries are distinguishable by `amount_seed`
    fn distinct_batch(amount_seed: u64) -> Batch {
        let mut batch = mock_batch();
        batch.entries[0].amount = amount_seed;
        batch.build().unwrap();
        batch
    }

    /// A batch large enough that a few of them cross the line limit
    fn wide_batch(seed: u64, entry_count: u64) -> Batch {
        let mut batch = mock_batch();
        batch.entries[0].amount = seed;
        for seq in 2..=entry_count {
            let mut entry = mock_entry_detail();
            entry.amount = seed;
            entry.set_trace_number("12104288", seq);
            batch.add_entry(entry);
        }
        batch.build().unwrap();
        batch
    }

    #[test]
    fn test_merge_combines_matching_headers() {
        let a = file_with_batches(vec![distinct_batch(100)]);
        let b = file_with_batches(vec![distinct_batch(200)]);

        let merged = merge_files(vec![a, b]).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].batches.len(), 2);
        assert_eq!(merged[0].batches[0].header.batch_number, 1);
        assert_eq!(merged[0].batches[1].header.batch_number, 2);
        assert!(merged[0].validate().is_ok());
    }

    #[test]
    fn test_merge_keeps_distinct_headers_apart() {
        let a = file_with_batches(vec![distinct_batch(100)]);
        let mut other_header = mock_file_header();
        other_header.immediate_origin = "987654320".to_string();
        let mut b = File::new(other_header);
        b.add_batch(distinct_batch(200));
        b.create().unwrap();

        let merged = merge_files(vec![a, b]).unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_deduplicates_equal_batches() {
        let a = file_with_batches(vec![distinct_batch(100)]);
        let b = file_with_batches(vec![distinct_batch(100)]);

        let merged = merge_files(vec![a, b]).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].batches.len(), 1);
    }

    #[test]
    fn test_merge_splits_at_line_limit() {
        // each wide batch renders 2 + 4000 lines; two fit under 10,000
        // lines, the third forces a split
        let files: Vec<File> = (0..3)
            .map(|i| file_with_batches(vec![wide_batch(1000 + i, 4000)]))
            .collect();

        let merged = merge_files(files).unwrap();
        assert_eq!(merged.len(), 2);

        let total_batches: usize = merged.iter().map(|f| f.batches.len()).sum();
        assert_eq!(total_batches, 3);
        for file in &merged {
            assert!(file.line_count() <= FILE_LINE_LIMIT);
            assert!(file.validate().is_ok());
        }
    }

    #[test]
    fn test_split_file_gets_fresh_timestamp() {
        let today = Local::now().date_naive();
        let files: Vec<File> = (0..3)
            .map(|i| file_with_batches(vec![wide_batch(1000 + i, 4000)]))
            .collect();

        let merged = merge_files(files).unwrap();
        // the rollover file was created during the merge
        let rollover = merged.last().unwrap();
        assert_eq!(rollover.header.file_creation_date, today);
    }

    fn file_with_iat_batch(batch: IatBatch) -> File {
        let mut file = File::new(mock_file_header());
        file.add_iat_batch(batch);
        file.create().unwrap();
        file
    }

    /// An IAT batch whose forward entries each carry the mandatory suite,
    /// so every entry renders as eight lines
    fn wide_iat_batch(amount_seed: u64, entry_count: u64) -> IatBatch {
        let mut batch = IatBatch::new(mock_iat_batch_header());
        for seq in 1..=entry_count {
            let mut entry = mock_iat_entry_with_addenda();
            entry.amount = amount_seed;
            entry.set_trace_number("23138010", seq);
            batch.add_entry(entry);
        }
        batch.create().unwrap();
        batch
    }

    #[test]
    fn test_merge_deduplicates_equal_iat_batches() {
        let a = file_with_iat_batch(mock_iat_batch());
        let b = file_with_iat_batch(mock_iat_batch());

        let merged = merge_files(vec![a, b]).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].iat_batches.len(), 1);
        assert!(merged[0].validate().is_ok());
    }

    #[test]
    fn test_merge_splits_iat_batches_at_line_limit() {
        // each batch renders 2 + 600 * 8 lines; two fit under 10,000
        // lines, the third forces a split
        let files: Vec<File> = (0..3)
            .map(|i| file_with_iat_batch(wide_iat_batch(1_000 + i, 600)))
            .collect();

        let merged = merge_files(files).unwrap();
        assert_eq!(merged.len(), 2);

        let total_batches: usize = merged.iter().map(|f| f.iat_batches.len()).sum();
        assert_eq!(total_batches, 3);
        for file in &merged {
            assert!(file.line_count() <= FILE_LINE_LIMIT);
            assert!(file.validate().is_ok());
        }
    }

    #[test]
    fn test_merge_preserves_all_batches_exactly_once() {
        let batches: Vec<Batch> = (0..5).map(|i| distinct_batch(100 + i)).collect();
        let a = file_with_batches(batches[0..3].to_vec());
        let b = file_with_batches(batches[2..5].to_vec());

        let merged = merge_files(vec![a, b]).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].batches.len(), 5);
        for original in &batches {
            let placements = merged
                .iter()
                .flat_map(|f| f.batches.iter())
                .filter(|b| b.equal(original))
                .count();
            assert_eq!(placements, 1);
        }
    }
}
