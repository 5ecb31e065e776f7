//! Command implementations for the correction-features CLI.

use std::time::Instant;

use log::{debug, info};

use crate::batch::BatchProcessor;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::Config;
use crate::error::{FeatureError, Result};
use crate::extraction::FeatureExtractor;
use crate::output::FeatureWriter;
use crate::record::{CorrectionRecord, SqlRecordSource, TsvRecordReader};

type RecordStream = Box<dyn Iterator<Item = Result<CorrectionRecord>>>;

/// Execute a CLI command.
pub fn execute_command(args: CorrectionFeaturesArgs) -> Result<()> {
    match &args.command {
        Command::Extract(extract_args) => extract(extract_args.clone(), &args),
        Command::Inspect(inspect_args) => inspect(inspect_args.clone(), &args),
        Command::Check(check_args) => check(check_args.clone(), &args),
    }
}

/// Run the batch extraction.
fn extract(args: ExtractArgs, cli_args: &CorrectionFeaturesArgs) -> Result<()> {
    let mut config = Config::load_or_default(&cli_args.config)?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    let registry = config.build_registry()?;
    let extractor = FeatureExtractor::with_context_length(registry, config.context_length);
    let processor = BatchProcessor::new(extractor)
        .with_log_frequency(config.log_frequency)
        .with_workers(config.workers)
        .with_chunk_size(config.chunk_size);

    let records = open_source(&config)?;

    info!("writing features to '{}'", config.output_csv_filename.display());
    let mut sink = FeatureWriter::create(&config.output_csv_filename, config.write_header)?;

    let start = Instant::now();
    let summary = if config.parallel {
        processor.run_parallel(records, &mut sink)?
    } else {
        processor.run(records, &mut sink)?
    };
    let duration = start.elapsed();

    output_result(
        "Extraction finished",
        &ExtractionResult {
            output: config.output_csv_filename.to_string_lossy().to_string(),
            records_read: summary.records_read,
            records_processed: summary.records_processed,
            rows_written: summary.rows_written,
            record_errors: summary.record_errors,
            unresolved: summary.unresolved,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

fn apply_overrides(config: &mut Config, args: &ExtractArgs) {
    if let Some(input) = &args.input {
        config.input_tsv_filename = Some(input.clone());
        config.database_path = None;
    }
    if let Some(database) = &args.database {
        config.database_path = Some(database.clone());
        config.input_tsv_filename = None;
    }
    if let Some(output) = &args.output {
        config.output_csv_filename = output.clone();
    }
    if args.language.is_some() {
        config.language = args.language.clone();
    }
    if args.limit.is_some() {
        config.limit = args.limit;
    }
    if args.offset.is_some() {
        config.offset = args.offset;
    }
    if let Some(context_length) = args.context_length {
        config.context_length = context_length;
    }
    if args.parallel {
        config.parallel = true;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if args.no_header {
        config.write_header = false;
    }
}

/// Open the configured record source; a TSV file wins over a database.
fn open_source(config: &Config) -> Result<RecordStream> {
    if let Some(path) = &config.input_tsv_filename {
        info!("reading records from '{}'", path.display());
        let mut reader = TsvRecordReader::open(path)?;
        if let Some(language) = &config.language {
            reader = reader.with_language(language.clone());
        }
        if let Some(offset) = config.offset {
            reader = reader.with_offset(offset);
        }
        if let Some(limit) = config.limit {
            reader = reader.with_limit(limit);
        }
        return Ok(Box::new(reader));
    }

    if let Some(path) = &config.database_path {
        info!("reading records from database '{}'", path.display());
        let records = SqlRecordSource::open(path)?.records(config.record_query())?;
        debug!("first page holds {} records", records.fetched());
        return Ok(Box::new(records));
    }

    Err(FeatureError::invalid_config(
        "no record source: set input_tsv_filename or database_path",
    ))
}

/// Extract the rows of one correction given on the command line.
fn inspect(args: InspectArgs, cli_args: &CorrectionFeaturesArgs) -> Result<()> {
    let config = Config::load_or_default(&cli_args.config)?;
    let registry = config.build_registry()?;
    let extractor = FeatureExtractor::with_context_length(
        registry,
        args.context_length.unwrap_or(config.context_length),
    );

    let record = CorrectionRecord::new(
        args.sentence,
        args.correction,
        args.covered,
        args.replacement,
        args.suggestion_pos,
    )
    .with_rule_id(args.rule_id)
    .with_language(args.language);

    let features = extractor.process(&record)?;
    let flagged = features
        .span
        .and_then(|span| span.slice(&record.sentence))
        .map(str::to_string);

    output_result(
        "Feature rows",
        &InspectionResult {
            span: features.span,
            flagged,
            rows: features.rows,
        },
        cli_args,
    )
}

/// Run the checker bound to a rule on one sentence.
fn check(args: CheckArgs, cli_args: &CorrectionFeaturesArgs) -> Result<()> {
    let config = Config::load_or_default(&cli_args.config)?;
    let registry = config.build_registry()?;
    let checker = registry.checker_for(&args.rule_id);

    let matches = checker.check(&args.sentence)?;

    output_result(
        "Checker matches",
        &CheckResult {
            checker: checker.name().to_string(),
            matches,
        },
        cli_args,
    )
}
