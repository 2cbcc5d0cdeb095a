use crate::error::{ProcessingError, Result};
use crate::models::Partition;
use crate::readers::value_parser::parse_value;
use crate::readers::windowed_source::{Window, WindowedFile};
use crate::utils::constants::{FIELD_SEPARATOR, PAGE_SIZE, RECORD_TERMINATOR};
use memchr::{memchr, memchr2_iter};
use tracing::trace;

/// Diagnostics gathered while scanning one byte range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Offset of the first record that belongs to the range.
    pub first_record: u64,
    /// Cursor position after the last record handled.
    pub end_offset: u64,
    pub skipped_bytes: u64,
    pub records: u64,
    pub windows_mapped: u32,
}

#[derive(Debug, PartialEq, Eq)]
enum RecordShape {
    Complete { separator: usize, terminator: usize },
    TooManyFields(usize),
    MissingSeparator(usize),
    Incomplete,
}

/// Walks `[start, end)` of a [`WindowedFile`] one record at a time.
///
/// Records are owned by the range their first byte falls in: a non-zero
/// `start` skips forward past the next line terminator, and the record in
/// progress at `end` is always finished.
pub struct RecordScanner<'a> {
    source: &'a WindowedFile,
    start: u64,
    end: u64,
}

impl<'a> RecordScanner<'a> {
    pub fn new(source: &'a WindowedFile, start: u64, end: u64) -> Self {
        Self { source, start, end }
    }

    pub fn for_partition(source: &'a WindowedFile, partition: &Partition) -> Self {
        Self::new(source, partition.start, partition.end)
    }

    /// Hand every `(station, value)` in the range to `visit`, in file order.
    ///
    /// The station slice borrows the current window and is only valid for
    /// the duration of the call. At most one window is mapped at a time.
    pub fn scan<F>(&self, mut visit: F) -> Result<ScanSummary>
    where
        F: FnMut(&[u8], f32),
    {
        let size = self.source.size();
        let end = self.end.min(size);
        let mut summary = ScanSummary::default();
        let mut window: Option<Window> = None;

        let mut cursor = if self.start == 0 || self.start >= size {
            self.start.min(size)
        } else {
            let (first, probe_window) = self.find_first_record()?;
            summary.windows_mapped += 1;
            window = Some(probe_window);
            first
        };
        summary.first_record = cursor;
        summary.skipped_bytes = cursor - self.start.min(size);

        while cursor < end {
            let current = match window.take() {
                Some(w) if w.contains(cursor) => w,
                stale => {
                    drop(stale);
                    trace!(offset = cursor, "mapping window");
                    summary.windows_mapped += 1;
                    self.source.window_at(cursor)?
                }
            };

            let bytes = current.bytes_from(cursor);
            match split_record(bytes) {
                RecordShape::Complete {
                    separator,
                    terminator,
                } => {
                    let field = &bytes[separator + 1..terminator];
                    let value = parse_value(field).ok_or_else(|| ProcessingError::Parse {
                        offset: cursor + separator as u64 + 1,
                        value: String::from_utf8_lossy(field).into_owned(),
                    })?;

                    visit(&bytes[..separator], value);
                    summary.records += 1;
                    cursor += terminator as u64 + 1;
                    window = Some(current);
                }
                RecordShape::Incomplete => {
                    if current.end() >= size {
                        return Err(ProcessingError::MalformedRecord {
                            offset: cursor,
                            reason: "final record has no line terminator".to_string(),
                        });
                    }
                    if cursor - current.chunk_start() < PAGE_SIZE {
                        return Err(ProcessingError::MalformedRecord {
                            offset: cursor,
                            reason: format!(
                                "record does not fit in a {} byte window",
                                self.source.window_size()
                            ),
                        });
                    }
                    // Dropping `current` here unmaps it before the record is
                    // rescanned from a window starting at its first byte.
                }
                RecordShape::TooManyFields(pos) => {
                    return Err(ProcessingError::MalformedRecord {
                        offset: cursor + pos as u64,
                        reason: "too many fields".to_string(),
                    });
                }
                RecordShape::MissingSeparator(pos) => {
                    return Err(ProcessingError::MalformedRecord {
                        offset: cursor + pos as u64,
                        reason: "expected 2 fields".to_string(),
                    });
                }
            }
        }

        summary.end_offset = cursor;
        Ok(summary)
    }

    /// Locate the first record boundary at or after `start - 1`.
    fn find_first_record(&self) -> Result<(u64, Window)> {
        let probe = self.start - 1;
        let window = self.source.window_at(probe)?;

        match memchr(RECORD_TERMINATOR, window.bytes_from(probe)) {
            Some(pos) => Ok((probe + pos as u64 + 1, window)),
            None => Err(ProcessingError::BoundaryScan { offset: probe }),
        }
    }
}

fn split_record(bytes: &[u8]) -> RecordShape {
    let mut separator = None;

    for pos in memchr2_iter(FIELD_SEPARATOR, RECORD_TERMINATOR, bytes) {
        if bytes[pos] == RECORD_TERMINATOR {
            return match separator {
                Some(separator) => RecordShape::Complete {
                    separator,
                    terminator: pos,
                },
                None => RecordShape::MissingSeparator(pos),
            };
        }
        if separator.is_some() {
            return RecordShape::TooManyFields(pos);
        }
        separator = Some(pos);
    }

    RecordShape::Incomplete
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use crate::test_utils::file_with;

    fn collect(source: &WindowedFile, start: u64, end: u64) -> Result<Vec<(String, f32)>> {
        let mut records = Vec::new();
        RecordScanner::new(source, start, end).scan(|station, value| {
            records.push((String::from_utf8_lossy(station).into_owned(), value));
        })?;
        Ok(records)
    }

    fn generated_input(lines: usize) -> (Vec<u8>, Vec<(String, f32)>) {
        let names = ["Hamburg", "München", "Kansas City", "La Ceiba", "Zürich", "Ōsaka"];
        let mut text = Vec::new();
        let mut expected = Vec::new();
        for i in 0..lines {
            let station = format!("{}{}", names[i % names.len()], "x".repeat(i % 17));
            let value = (i as f32 * 0.7) % 60.0 - 30.0;
            let rendered = format!("{:.1}", value);
            text.extend_from_slice(format!("{};{}\n", station, rendered).as_bytes());
            expected.push((station, rendered.parse::<f32>().unwrap()));
        }
        (text, expected)
    }

    #[test]
    fn test_split_record_shapes() {
        assert_eq!(
            split_record(b"Kansas City;-0.8\nDamascus"),
            RecordShape::Complete {
                separator: 11,
                terminator: 16
            }
        );
        assert_eq!(split_record(b"A;B;C\n"), RecordShape::TooManyFields(3));
        assert_eq!(split_record(b"abc\n"), RecordShape::MissingSeparator(3));
        assert_eq!(split_record(b"\n"), RecordShape::MissingSeparator(0));
        assert_eq!(split_record(b"Kansas;1"), RecordShape::Incomplete);
    }

    #[test]
    fn test_scan_whole_file() -> Result<()> {
        let file = file_with(b"Kansas City;-0.8\nDamascus;19.8\nKansas City;28.0\n");
        let source = WindowedFile::open(file.path(), 8192)?;

        let records = collect(&source, 0, source.size())?;

        assert_eq!(
            records,
            vec![
                ("Kansas City".to_string(), -0.8),
                ("Damascus".to_string(), 19.8),
                ("Kansas City".to_string(), 28.0),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_every_split_point_counts_each_record_once() -> Result<()> {
        let (text, expected) = generated_input(40);
        let file = file_with(&text);
        let source = WindowedFile::open(file.path(), 8192)?;
        let size = source.size();

        for split in 1..size {
            let mut records = collect(&source, 0, split)?;
            records.extend(collect(&source, split, size)?);
            assert_eq!(records, expected, "split at {}", split);
        }
        Ok(())
    }

    #[test]
    fn test_split_inside_station_name() -> Result<()> {
        let file = file_with(b"Kansas City;-0.8\nDamascus;19.8\n");
        let source = WindowedFile::open(file.path(), 8192)?;

        // Byte 20 falls inside "Damascus", which starts at 17.
        let head = collect(&source, 0, 20)?;
        let tail = collect(&source, 20, source.size())?;

        assert_eq!(head.len(), 2);
        assert_eq!(head[1].0, "Damascus");
        assert!(tail.is_empty());
        Ok(())
    }

    #[test]
    fn test_records_straddle_windows() -> Result<()> {
        let (text, expected) = generated_input(3000);
        assert!(text.len() > 5 * 8192);
        let file = file_with(&text);
        let source = WindowedFile::open(file.path(), 8192)?;

        let mut records = Vec::new();
        let summary = RecordScanner::new(&source, 0, source.size()).scan(|station, value| {
            records.push((String::from_utf8_lossy(station).into_owned(), value));
        })?;

        assert_eq!(records, expected);
        assert_eq!(summary.records, 3000);
        assert_eq!(summary.end_offset, source.size());
        assert!(summary.windows_mapped > 5);
        Ok(())
    }

    #[test]
    fn test_summary_reports_skipped_bytes() -> Result<()> {
        let file = file_with(b"Kansas City;-0.8\nDamascus;19.8\n");
        let source = WindowedFile::open(file.path(), 8192)?;

        let summary = RecordScanner::new(&source, 5, source.size()).scan(|_, _| {})?;

        assert_eq!(summary.first_record, 17);
        assert_eq!(summary.skipped_bytes, 12);
        assert_eq!(summary.records, 1);
        Ok(())
    }

    #[test]
    fn test_too_many_fields() {
        let file = file_with(b"ok;1.0\nA;B;C\n");
        let source = WindowedFile::open(file.path(), 8192).unwrap();

        let result = collect(&source, 0, source.size());
        assert!(matches!(
            result,
            Err(ProcessingError::MalformedRecord { offset: 10, .. })
        ));
    }

    #[test]
    fn test_missing_separator_and_empty_line() {
        let file = file_with(b"abc\n");
        let source = WindowedFile::open(file.path(), 8192).unwrap();
        assert!(matches!(
            collect(&source, 0, source.size()),
            Err(ProcessingError::MalformedRecord { offset: 3, .. })
        ));

        let file = file_with(b"a;1\n\nb;2\n");
        let source = WindowedFile::open(file.path(), 8192).unwrap();
        assert!(matches!(
            collect(&source, 0, source.size()),
            Err(ProcessingError::MalformedRecord { offset: 4, .. })
        ));
    }

    #[test]
    fn test_invalid_value() {
        let file = file_with(b"Hamburg;12.0\nBerlin;warm\n");
        let source = WindowedFile::open(file.path(), 8192).unwrap();

        match collect(&source, 0, source.size()) {
            Err(ProcessingError::Parse { offset, value }) => {
                assert_eq!(offset, 20);
                assert_eq!(value, "warm");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_final_record() {
        let file = file_with(b"a;1\nb;2");
        let source = WindowedFile::open(file.path(), 8192).unwrap();

        assert!(matches!(
            collect(&source, 0, source.size()),
            Err(ProcessingError::MalformedRecord { offset: 4, .. })
        ));
    }

    #[test]
    fn test_boundary_scan_without_terminator() {
        let file = file_with(b"a;1\nbbbbbbbbbb");
        let source = WindowedFile::open(file.path(), 8192).unwrap();

        assert!(matches!(
            collect(&source, 8, source.size()),
            Err(ProcessingError::BoundaryScan { offset: 7 })
        ));
    }

    #[test]
    fn test_record_longer_than_window() {
        let mut text = b"a;1\n".to_vec();
        text.extend(std::iter::repeat(b'x').take(9000));
        text.extend_from_slice(b";1\n");
        text.extend(b"b;2\n".repeat(5000));
        let file = file_with(&text);
        let source = WindowedFile::open(file.path(), 8192).unwrap();

        match collect(&source, 0, source.size()) {
            Err(ProcessingError::MalformedRecord { offset, reason }) => {
                assert_eq!(offset, 4);
                assert!(reason.contains("window"));
            }
            other => panic!("expected malformed record, got {:?}", other),
        }
    }

    #[test]
    fn test_start_at_end_of_file_yields_nothing() -> Result<()> {
        let file = file_with(b"a;1\n");
        let source = WindowedFile::open(file.path(), 8192)?;

        assert!(collect(&source, 4, 4)?.is_empty());
        assert!(collect(&source, 3, 4)?.is_empty());
        Ok(())
    }
}
