//! SQLite-backed correction record source.
//!
//! Reads from a `corrections` table holding the columns `sentence`,
//! `correction`, `covered`, `replacement`, `suggestion_pos`, `rule_id` and
//! `language`. Only rows produced by spelling rule families, with an actual
//! change between sentence and correction, are selected.

use std::path::Path;

use log::{debug, info};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, OpenFlags, Row, params_from_iter};

use crate::error::{FeatureError, Result};
use crate::record::{CorrectionRecord, parse_suggestion_pos};

/// Default `LIKE` patterns for speller rule identifiers.
pub const DEFAULT_RULE_PATTERNS: [&str; 3] = ["MORFOLOGIK_RULE%", "%SPELLER_RULE%", "HUNSPELL%"];

/// Rows read per query when streaming records.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Filters applied to the `corrections` table.
#[derive(Debug, Clone)]
pub struct RecordQuery {
    /// `LIKE` patterns matched against `rule_id`; a row passes if any matches.
    pub rule_patterns: Vec<String>,
    /// Restrict to one language tag.
    pub language: Option<String>,
    /// Maximum number of rows.
    pub limit: Option<usize>,
    /// Rows to skip before the first returned one.
    pub offset: Option<usize>,
}

impl Default for RecordQuery {
    fn default() -> Self {
        RecordQuery {
            rule_patterns: DEFAULT_RULE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            language: None,
            limit: None,
            offset: None,
        }
    }
}

impl RecordQuery {
    /// Render the SQL text and its bound parameters.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = String::from(
            "SELECT sentence, correction, covered, replacement, suggestion_pos, rule_id, language \
             FROM corrections WHERE sentence != correction AND covered != replacement",
        );
        let mut params = Vec::new();

        if !self.rule_patterns.is_empty() {
            let clauses = vec!["rule_id LIKE ?"; self.rule_patterns.len()].join(" OR ");
            sql.push_str(&format!(" AND ({clauses})"));
            params.extend(self.rule_patterns.iter().cloned().map(Value::Text));
        }

        if let Some(language) = &self.language {
            sql.push_str(" AND language = ?");
            params.push(Value::Text(language.clone()));
        }

        sql.push_str(" ORDER BY rowid");

        if self.limit.is_some() || self.offset.is_some() {
            // SQLite needs a LIMIT before OFFSET; -1 means unbounded.
            let limit = self.limit.map(|l| l as i64).unwrap_or(-1);
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(Value::Integer(limit));
            params.push(Value::Integer(self.offset.unwrap_or(0) as i64));
        }

        (sql, params)
    }
}

/// Reads correction records out of a SQLite database.
pub struct SqlRecordSource {
    conn: Connection,
}

impl SqlRecordSource {
    /// Open a database file read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Opening database {}", path.as_ref().display());
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(SqlRecordSource { conn })
    }

    /// Wrap an already open connection.
    pub fn from_connection(conn: Connection) -> Self {
        SqlRecordSource { conn }
    }

    /// Stream the rows selected by `query`, one page at a time.
    ///
    /// The first page is fetched here, so a query that cannot be prepared or
    /// executed fails immediately. A later page failing ends the stream with
    /// that error; a row whose fields cannot be read becomes a record-level
    /// error and the stream goes on.
    pub fn records(self, query: RecordQuery) -> Result<SqlRecords> {
        SqlRecords::new(self, query, DEFAULT_PAGE_SIZE)
    }

    /// Run one page of `query`. `first_row` is the position of the page's
    /// first row in the whole result, used in error messages.
    fn fetch_page(&self, query: &RecordQuery, first_row: usize) -> Result<Vec<Result<CorrectionRecord>>> {
        let (sql, params) = query.to_sql();
        debug!("{sql}");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(params))?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let index = first_row + records.len();
            records.push(
                Self::read_row(row)
                    .map_err(|e| FeatureError::malformed_record(format!("row {index}: {e}"))),
            );
        }

        debug!("Fetched {} correction records from row {first_row}", records.len());
        Ok(records)
    }

    fn read_row(row: &Row<'_>) -> Result<CorrectionRecord> {
        let suggestion_pos = match row.get_ref(4)? {
            ValueRef::Integer(pos) => i32::try_from(pos).map_err(|_| {
                FeatureError::malformed_record(format!("suggestion_pos {pos} is out of range"))
            })?,
            ValueRef::Text(raw) => parse_suggestion_pos(&String::from_utf8_lossy(raw))?,
            other => {
                return Err(FeatureError::malformed_record(format!(
                    "suggestion_pos has unsupported type {:?}",
                    other.data_type()
                )));
            }
        };

        Ok(CorrectionRecord {
            sentence: row.get(0)?,
            correction: row.get(1)?,
            covered: row.get(2)?,
            replacement: row.get(3)?,
            suggestion_pos,
            rule_id: row.get(5)?,
            language: row.get(6)?,
        })
    }
}

/// Iterator over the records of a [`SqlRecordSource`], reading
/// `LIMIT`/`OFFSET` pages of the query on demand.
pub struct SqlRecords {
    source: SqlRecordSource,
    query: RecordQuery,
    page_size: usize,
    fetched: usize,
    buffer: std::vec::IntoIter<Result<CorrectionRecord>>,
    exhausted: bool,
}

impl SqlRecords {
    fn new(source: SqlRecordSource, query: RecordQuery, page_size: usize) -> Result<Self> {
        let mut records = SqlRecords {
            source,
            query,
            page_size: page_size.max(1),
            fetched: 0,
            buffer: Vec::new().into_iter(),
            exhausted: false,
        };
        records.fill()?;
        Ok(records)
    }

    /// Change the number of rows read per query. Takes effect from the
    /// next page on.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Rows read from the database so far.
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    fn fill(&mut self) -> Result<()> {
        let mut page_size = self.page_size;
        if let Some(limit) = self.query.limit {
            page_size = page_size.min(limit - self.fetched);
        }
        if page_size == 0 {
            self.exhausted = true;
            return Ok(());
        }

        let page = RecordQuery {
            limit: Some(page_size),
            offset: Some(self.query.offset.unwrap_or(0) + self.fetched),
            ..self.query.clone()
        };
        let records = self.source.fetch_page(&page, self.fetched)?;

        if records.len() < page_size {
            self.exhausted = true;
        }
        self.fetched += records.len();
        self.buffer = records.into_iter();
        Ok(())
    }
}

impl Iterator for SqlRecords {
    type Item = Result<CorrectionRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.buffer.next() {
                return Some(record);
            }
            if self.exhausted {
                return None;
            }
            if let Err(e) = self.fill() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
    }
}
