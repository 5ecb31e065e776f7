//! CSV sink for feature rows.
//!
//! Every non-numeric field is quoted. Embedded quotes and backslashes are
//! escaped with a backslash rather than doubled:
//! ```text
//! row_index,left_context,right_context,covered_string,replacement_string,replacement_position,selected_by_user,rule_id,language
//! 0,"I havv","havv a cat","havv","have",0,"true","MORFOLOGIK_RULE_EN_US","en-US"
//! ```

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{QuoteStyle, Writer, WriterBuilder};

use crate::error::{FeatureError, Result};
use crate::extraction::FeatureRow;
use crate::record::CorrectionRecord;

/// Column names, in output order.
pub const HEADER: [&str; 9] = [
    "row_index",
    "left_context",
    "right_context",
    "covered_string",
    "replacement_string",
    "replacement_position",
    "selected_by_user",
    "rule_id",
    "language",
];

/// Writes feature rows as CSV, numbering them as it goes.
pub struct FeatureWriter<W: Write> {
    writer: Writer<W>,
    next_index: u64,
}

impl FeatureWriter<BufWriter<File>> {
    /// Create (or truncate) the output file, optionally starting it with the
    /// header row.
    pub fn create<P: AsRef<Path>>(path: P, header: bool) -> Result<Self> {
        let inner = BufWriter::new(File::create(path)?);
        if header {
            Self::with_header(inner)
        } else {
            Ok(Self::new(inner))
        }
    }
}

impl<W: Write> FeatureWriter<W> {
    /// Wrap any writer.
    pub fn new(inner: W) -> Self {
        let writer = WriterBuilder::new()
            .quote_style(QuoteStyle::NonNumeric)
            .double_quote(false)
            .escape(b'\\')
            .from_writer(inner);
        FeatureWriter {
            writer,
            next_index: 0,
        }
    }

    /// Wrap a writer after writing the header row to it.
    ///
    /// Header names are written bare, not quoted like data fields.
    pub fn with_header(mut inner: W) -> Result<Self> {
        inner.write_all(HEADER.join(",").as_bytes())?;
        inner.write_all(b"\n")?;
        Ok(Self::new(inner))
    }

    /// Write the rows extracted from `record`.
    pub fn write_rows(&mut self, record: &CorrectionRecord, rows: &[FeatureRow]) -> Result<()> {
        for row in rows {
            let index = self.next_index.to_string();
            let position = row.replacement_position.to_string();
            let selected = if row.selected_by_user { "true" } else { "false" };

            let left = escape_backslashes(&row.left_context);
            let right = escape_backslashes(&row.right_context);
            let covered = escape_backslashes(&row.covered_string);
            let replacement = escape_backslashes(&row.replacement_string);
            let rule_id = escape_backslashes(&record.rule_id);
            let language = escape_backslashes(&record.language);

            self.writer.write_record([
                index.as_str(),
                &*left,
                &*right,
                &*covered,
                &*replacement,
                position.as_str(),
                selected,
                &*rule_id,
                &*language,
            ])?;
            self.next_index += 1;
        }
        Ok(())
    }

    /// Number of rows written so far.
    pub fn rows_written(&self) -> u64 {
        self.next_index
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| FeatureError::Io(e.into_error()))
    }
}

/// The csv writer escapes quotes but not the escape character itself.
fn escape_backslashes(field: &str) -> Cow<'_, str> {
    if field.contains('\\') {
        Cow::Owned(field.replace('\\', "\\\\"))
    } else {
        Cow::Borrowed(field)
    }
}
