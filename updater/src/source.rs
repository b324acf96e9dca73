use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::StringRecord;

use crate::error::{UpdaterError, UpdaterResult};

/// One record as read from the input, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based physical line on which the record starts.
    pub line: u64,
    /// Fields in input order; normally `[url, handle]`.
    pub fields: Vec<String>,
}

/// Keeps every byte handed to the CSV reader until it is attributed to a record.
///
/// The CSV reader skips blank lines without reporting them, so line numbers and
/// blank records are recovered from the raw bytes instead.
struct ByteLog<R> {
    inner: R,
    pending: VecDeque<u8>,
    drained: u64,
}

impl<R> ByteLog<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
            drained: 0,
        }
    }

    /// Removes and returns the logged bytes before absolute `offset`.
    fn take_until(&mut self, offset: u64) -> Vec<u8> {
        let len = usize::try_from(offset.saturating_sub(self.drained))
            .unwrap_or(usize::MAX)
            .min(self.pending.len());
        self.drained += len as u64;

        self.pending.drain(..len).collect()
    }
}

impl<R: Read> Read for ByteLog<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.pending.extend(&buf[..read]);

        Ok(read)
    }
}

/// Lazy, finite sequence of [`RawRow`]s read from a comma-separated input.
///
/// The reader accepts any number of fields per record so that shape problems
/// reach the normalizer as row-level outcomes. A blank line is yielded as a
/// record without fields. A record that cannot be decoded ends the sequence
/// with an error.
pub struct RowSource<R> {
    reader: csv::Reader<ByteLog<R>>,
    /// Physical line of the next unattributed byte.
    line: u64,
    /// Whether the last attributed byte was a `\r`.
    after_cr: bool,
    queued: VecDeque<UpdaterResult<RawRow>>,
    finished: bool,
}

impl RowSource<File> {
    /// Opens the input file.
    ///
    /// A missing file is reported as [`UpdaterError::InputNotFound`].
    pub fn open(path: &Path) -> UpdaterResult<Self> {
        let file = File::open(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                UpdaterError::InputNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                UpdaterError::Input {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Ok(Self::from_reader(file))
    }
}

impl<R: Read> RowSource<R> {
    /// Wraps any reader producing UTF-8 comma-separated text without a header row.
    pub fn from_reader(reader: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(ByteLog::new(reader));

        Self {
            reader,
            line: 1,
            after_cr: false,
            queued: VecDeque::new(),
            finished: false,
        }
    }

    fn read_next(&mut self) {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => {
                let end = self.reader.position().byte();
                let consumed = self.reader.get_mut().take_until(end);
                let line = self.attribute(&consumed).unwrap_or(self.line);
                let fields = record.iter().map(str::to_owned).collect();

                self.queued.push_back(Ok(RawRow { line, fields }));
            }
            Ok(false) => {
                let trailing = self.reader.get_mut().take_until(u64::MAX);
                self.attribute(&trailing);
                self.finished = true;
            }
            Err(err) => {
                self.queued.push_back(Err(err.into()));
                self.finished = true;
            }
        }
    }

    /// Advances the physical line count over `bytes`.
    ///
    /// Line terminators seen before the first content byte are blank lines and are
    /// queued as empty records. Returns the line on which the content starts.
    fn attribute(&mut self, bytes: &[u8]) -> Option<u64> {
        let mut start = None;

        for &byte in bytes {
            let after_cr = std::mem::replace(&mut self.after_cr, byte == b'\r');
            match byte {
                // Second half of a `\r\n` terminator.
                b'\n' if after_cr => {}
                b'\r' | b'\n' => {
                    if start.is_none() {
                        self.queued.push_back(Ok(RawRow {
                            line: self.line,
                            fields: Vec::new(),
                        }));
                    }
                    self.line += 1;
                }
                _ => {
                    start.get_or_insert(self.line);
                }
            }
        }

        start
    }
}

impl<R: Read> Iterator for RowSource<R> {
    type Item = UpdaterResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.queued.pop_front() {
                return Some(item);
            }
            if self.finished {
                return None;
            }

            self.read_next();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(input: &str) -> Vec<RawRow> {
        RowSource::from_reader(input.as_bytes())
            .collect::<UpdaterResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn reads_fields_with_line_numbers() {
        let rows = rows("http://a.example/x,10.1/x\nonly-one\nbad,row,extra\n");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].line, 1);
        assert_eq!(rows[0].fields, vec!["http://a.example/x", "10.1/x"]);
        assert_eq!(rows[1].line, 2);
        assert_eq!(rows[1].fields, vec!["only-one"]);
        assert_eq!(rows[2].line, 3);
        assert_eq!(rows[2].fields.len(), 3);
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let rows = rows("\"http://a.example/?q=1,2\",10.1/x\n");

        assert_eq!(rows[0].fields, vec!["http://a.example/?q=1,2", "10.1/x"]);
    }

    #[test]
    fn line_numbers_stay_physical() {
        let rows = rows("\"multi\nline\",10.1/a\n\nhttp://b.example,10.1/b\n");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].line, 1);
        assert_eq!(rows[0].fields[0], "multi\nline");
        assert_eq!(rows[1].line, 3);
        assert!(rows[1].fields.is_empty());
        assert_eq!(rows[2].line, 4);
    }

    #[test]
    fn blank_lines_are_empty_records() {
        let rows = rows("http://n/a,10.1/a\n\nhttp://n/b,10.1/b\r\n\r\n,\n\n");

        let lines: Vec<_> = rows.iter().map(|row| row.line).collect();
        let widths: Vec<_> = rows.iter().map(|row| row.fields.len()).collect();
        assert_eq!(lines, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(widths, vec![2, 0, 2, 0, 2, 0]);
    }

    #[test]
    fn leading_blank_lines_and_bare_carriage_returns_count() {
        let rows = rows("\n\rhttp://n/a,10.1/a");

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].line, 1);
        assert_eq!(rows[1].line, 2);
        assert_eq!(rows[2].line, 3);
        assert_eq!(rows[2].fields, vec!["http://n/a", "10.1/a"]);
    }

    #[test]
    fn invalid_utf8_ends_the_sequence_with_an_error() {
        let input: &[u8] = b"http://a.example,10.1/a\n\xff\xfe,10.1/b\nhttp://c.example,10.1/c\n";
        let mut source = RowSource::from_reader(input);

        assert!(source.next().unwrap().is_ok());
        assert!(matches!(source.next(), Some(Err(UpdaterError::Csv(_)))));
        assert!(source.next().is_none());
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        let err = RowSource::open(&path).err().unwrap();

        assert!(matches!(err, UpdaterError::InputNotFound { path: p } if p == path));
    }
}
