//! Tab-delimited correction record reader.
//!
//! The first row is a header naming the columns:
//! ```text
//! sentence	correction	covered	replacement	suggestion_pos	rule_id	language
//! I havv a cat.	I have a cat.	havv	have	0	MORFOLOGIK_RULE_EN_US	en-US
//! ```
//! Columns are located by header name, so their order may vary.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};

use crate::error::{FeatureError, Result};
use crate::record::{CorrectionRecord, parse_suggestion_pos};

const COLUMNS: [&str; 7] = [
    "sentence",
    "correction",
    "covered",
    "replacement",
    "suggestion_pos",
    "rule_id",
    "language",
];

/// Reads [`CorrectionRecord`]s from a TSV export.
///
/// Opening the file and reading the header are fatal on failure. Each
/// data row is yielded as its own `Result`, so a malformed row only spoils
/// itself.
pub struct TsvRecordReader<R: Read> {
    records: StringRecordsIntoIter<R>,
    /// Header position of each entry in `COLUMNS`.
    positions: [usize; 7],
    language: Option<String>,
    skip: usize,
    remaining: Option<usize>,
}

impl TsvRecordReader<File> {
    /// Open a TSV file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read> TsvRecordReader<R> {
    /// Wrap any reader producing TSV text.
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let positions = Self::column_positions(&headers)?;

        Ok(TsvRecordReader {
            records: reader.into_records(),
            positions,
            language: None,
            skip: 0,
            remaining: None,
        })
    }

    /// Only yield records in `language`. Offset and limit count the
    /// matching rows only; malformed rows are always yielded.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Skip the first `offset` data rows.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.skip = offset;
        self
    }

    /// Yield at most `limit` rows after the offset.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.remaining = Some(limit);
        self
    }

    fn column_positions(headers: &StringRecord) -> Result<[usize; 7]> {
        let mut positions = [0usize; 7];
        for (slot, column) in positions.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| {
                    FeatureError::other(format!("TSV header is missing column '{column}'"))
                })?;
        }
        Ok(positions)
    }

    fn parse_row(&self, row: &StringRecord) -> Result<CorrectionRecord> {
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let field = |i: usize| self.field(row, i, line).map(str::to_string);

        let suggestion_pos = parse_suggestion_pos(self.field(row, 4, line)?)
            .map_err(|e| FeatureError::malformed_record(format!("line {line}: {e}")))?;

        Ok(CorrectionRecord {
            sentence: field(0)?,
            correction: field(1)?,
            covered: field(2)?,
            replacement: field(3)?,
            suggestion_pos,
            rule_id: field(5)?,
            language: field(6)?,
        })
    }

    fn field<'r>(&self, row: &'r StringRecord, column: usize, line: u64) -> Result<&'r str> {
        row.get(self.positions[column]).ok_or_else(|| {
            FeatureError::malformed_record(format!(
                "line {line}: missing column '{}'",
                COLUMNS[column]
            ))
        })
    }
}

impl<R: Read> Iterator for TsvRecordReader<R> {
    type Item = Result<CorrectionRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining == Some(0) {
                return None;
            }

            let item = match self.records.next()? {
                Ok(row) => self.parse_row(&row),
                Err(e) => Err(e.into()),
            };

            if let (Some(language), Ok(record)) = (&self.language, &item)
                && record.language != *language
            {
                continue;
            }

            if self.skip > 0 {
                self.skip -= 1;
                continue;
            }

            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= 1;
            }
            return Some(item);
        }
    }
}
