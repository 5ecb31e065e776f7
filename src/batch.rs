//! Batch extraction over a record source.

use std::io::Write;

use log::{debug, info, warn};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, Result};
use crate::extraction::{FeatureExtractor, RecordFeatures};
use crate::output::FeatureWriter;
use crate::record::CorrectionRecord;

/// Counters for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Records pulled from the source, including failed ones.
    pub records_read: u64,
    /// Records whose rows were written.
    pub records_processed: u64,
    /// Feature rows written to the sink.
    pub rows_written: u64,
    /// Records skipped because of a record-level error.
    pub record_errors: u64,
    /// Processed records whose error span could not be localized.
    pub unresolved: u64,
}

type Outcome = Result<(CorrectionRecord, RecordFeatures)>;

/// Drives a [`FeatureExtractor`] over a stream of records into a
/// [`FeatureWriter`].
///
/// Record-level failures (malformed rows, checker errors) are logged and
/// counted; anything else stops the batch after flushing the sink.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    extractor: FeatureExtractor,
    log_frequency: usize,
    workers: usize,
    chunk_size: usize,
}

impl BatchProcessor {
    pub fn new(extractor: FeatureExtractor) -> Self {
        BatchProcessor {
            extractor,
            log_frequency: 100,
            workers: num_cpus::get(),
            chunk_size: 256,
        }
    }

    /// Log progress every `log_frequency` records.
    pub fn with_log_frequency(mut self, log_frequency: usize) -> Self {
        self.log_frequency = log_frequency.max(1);
        self
    }

    /// Thread count for [`run_parallel`](Self::run_parallel).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Records handed to the thread pool at once.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Process every record on the calling thread.
    pub fn run<I, W>(&self, records: I, sink: &mut FeatureWriter<W>) -> Result<BatchSummary>
    where
        I: IntoIterator<Item = Result<CorrectionRecord>>,
        W: Write,
    {
        let mut summary = BatchSummary::default();

        for item in records {
            let outcome = self.extract(item);
            self.absorb(outcome, sink, &mut summary)?;
        }

        self.finish(sink, &summary)?;
        Ok(summary)
    }

    /// Process records on a thread pool, chunk by chunk.
    ///
    /// Rows are written in input order, so the output matches [`run`](Self::run).
    pub fn run_parallel<I, W>(&self, records: I, sink: &mut FeatureWriter<W>) -> Result<BatchSummary>
    where
        I: IntoIterator<Item = Result<CorrectionRecord>>,
        W: Write,
    {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("feature-extract-{i}"))
            .build()
            .map_err(|e| FeatureError::other(format!("Failed to create thread pool: {e}")))?;
        debug!(
            "extracting on {} threads, {} records per chunk",
            self.workers, self.chunk_size
        );

        let mut summary = BatchSummary::default();
        let mut records = records.into_iter();

        loop {
            let chunk: Vec<Result<CorrectionRecord>> =
                records.by_ref().take(self.chunk_size).collect();
            if chunk.is_empty() {
                break;
            }

            let outcomes: Vec<Outcome> = pool.install(|| {
                chunk
                    .into_par_iter()
                    .map(|item| self.extract(item))
                    .collect()
            });

            for outcome in outcomes {
                self.absorb(outcome, sink, &mut summary)?;
            }
        }

        self.finish(sink, &summary)?;
        Ok(summary)
    }

    fn extract(&self, item: Result<CorrectionRecord>) -> Outcome {
        let record = item?;
        let features = self.extractor.process(&record)?;
        Ok((record, features))
    }

    /// Fold one outcome into the sink and the counters.
    fn absorb<W: Write>(
        &self,
        outcome: Outcome,
        sink: &mut FeatureWriter<W>,
        summary: &mut BatchSummary,
    ) -> Result<()> {
        summary.records_read += 1;

        let written = match outcome {
            Ok((record, features)) => sink.write_rows(&record, &features.rows).map(|_| {
                if !features.is_resolved() {
                    summary.unresolved += 1;
                }
                summary.records_processed += 1;
                summary.rows_written += features.rows.len() as u64;
            }),
            Err(e) if e.is_record_level() => {
                warn!("Skipping record {}: {e}", summary.records_read);
                summary.record_errors += 1;
                Ok(())
            }
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(flush_err) = sink.flush() {
                warn!("Failed to flush output: {flush_err}");
            }
            return Err(e);
        }

        if summary.records_read % self.log_frequency as u64 == 0 {
            info!(
                "Processed {} sentences, {} rows written",
                summary.records_read, summary.rows_written
            );
        }
        Ok(())
    }

    fn finish<W: Write>(&self, sink: &mut FeatureWriter<W>, summary: &BatchSummary) -> Result<()> {
        sink.flush()?;
        info!(
            "Done: {} records read, {} processed, {} rows written, {} errors, {} unresolved",
            summary.records_read,
            summary.records_processed,
            summary.rows_written,
            summary.record_errors,
            summary.unresolved
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use super::*;
    use crate::checker::{CheckerRegistry, GrammarChecker, RuleMatch, SpellingChecker};

    /// Fails on sentences containing a marker word.
    struct FailOn(&'static str);

    impl GrammarChecker for FailOn {
        fn check(&self, sentence: &str) -> Result<Vec<RuleMatch>> {
            if sentence.contains(self.0) {
                Err(FeatureError::checker(format!("cannot check '{sentence}'")))
            } else {
                Ok(Vec::new())
            }
        }

        fn name(&self) -> &str {
            "fail-on"
        }
    }

    fn processor(checker: Arc<dyn GrammarChecker>) -> BatchProcessor {
        BatchProcessor::new(FeatureExtractor::new(CheckerRegistry::with_default(checker)))
            .with_log_frequency(2)
    }

    fn havv(n: usize) -> CorrectionRecord {
        CorrectionRecord::new(
            format!("I havv {n} cats."),
            format!("I have {n} cats."),
            "havv",
            "have",
            0,
        )
    }

    fn records(count: usize) -> Vec<Result<CorrectionRecord>> {
        (0..count).map(|n| Ok(havv(n))).collect()
    }

    #[test]
    fn test_run_counts_rows() {
        let batch = processor(Arc::new(FailOn("never")));
        let mut sink = FeatureWriter::new(Vec::new());

        let summary = batch.run(records(3), &mut sink).unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                records_read: 3,
                records_processed: 3,
                rows_written: 3,
                record_errors: 0,
                unresolved: 0,
            }
        );
        assert_eq!(sink.rows_written(), 3);
    }

    #[test]
    fn test_record_level_errors_are_skipped() {
        let batch = processor(Arc::new(FailOn("1 cats")));
        let mut input = records(3);
        input.push(Err(FeatureError::malformed_record("line 5: missing field")));
        input.push(Ok(CorrectionRecord::new("same", "same", "x", "y", 0)));

        let mut sink = FeatureWriter::new(Vec::new());
        let summary = batch.run(input, &mut sink).unwrap();

        assert_eq!(summary.records_read, 5);
        assert_eq!(summary.records_processed, 3);
        assert_eq!(summary.record_errors, 2);
        assert_eq!(summary.unresolved, 1);

        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(out.lines().count(), 3);
        assert!(!out.contains("1 cats"));
    }

    #[test]
    fn test_fatal_error_stops_batch() {
        let batch = processor(Arc::new(FailOn("never")));
        let mut input = records(2);
        input.push(Err(FeatureError::Io(io::Error::other("disk gone"))));
        input.extend(records(2));

        let mut sink = FeatureWriter::new(Vec::new());
        let err = batch.run(input, &mut sink).unwrap_err();
        assert!(!err.is_record_level());

        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_parallel_output_matches_sequential() {
        let batch = processor(Arc::new(SpellingChecker::english()))
            .with_workers(4)
            .with_chunk_size(3);

        let mut input: Vec<CorrectionRecord> = (0..10).map(havv).collect();
        input.push(CorrectionRecord::new(
            "My frend went home.",
            "My friend went home.",
            "frend",
            "friend",
            0,
        ));

        let mut sequential = FeatureWriter::new(Vec::new());
        let seq_summary = batch
            .run(input.iter().cloned().map(Ok), &mut sequential)
            .unwrap();

        let mut parallel = FeatureWriter::new(Vec::new());
        let par_summary = batch
            .run_parallel(input.iter().cloned().map(Ok), &mut parallel)
            .unwrap();

        assert_eq!(seq_summary, par_summary);
        assert_eq!(
            sequential.into_inner().unwrap(),
            parallel.into_inner().unwrap()
        );
    }

    #[test]
    fn test_parallel_fatal_error_keeps_prefix() {
        let batch = processor(Arc::new(FailOn("never")))
            .with_workers(2)
            .with_chunk_size(4);
        let mut input = records(3);
        input.push(Err(FeatureError::invalid_config("bad source")));
        input.extend(records(3));

        let mut sink = FeatureWriter::new(Vec::new());
        assert!(batch.run_parallel(input, &mut sink).is_err());

        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn test_empty_source() {
        let batch = processor(Arc::new(FailOn("never")));
        let mut sink = FeatureWriter::new(Vec::new());

        let summary = batch.run(Vec::new(), &mut sink).unwrap();
        assert_eq!(summary, BatchSummary::default());

        let summary = batch.run_parallel(Vec::new(), &mut sink).unwrap();
        assert_eq!(summary, BatchSummary::default());
    }
}
