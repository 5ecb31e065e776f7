//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checker::RuleMatch;
use crate::cli::args::{CorrectionFeaturesArgs, OutputFormat};
use crate::error::Result;
use crate::extraction::{ErrorSpan, FeatureRow};

/// Result of a batch extraction.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub output: String,
    pub records_read: u64,
    pub records_processed: u64,
    pub rows_written: u64,
    pub record_errors: u64,
    pub unresolved: u64,
    pub duration_ms: u64,
}

/// Feature rows of one inspected correction.
#[derive(Debug, Serialize, Deserialize)]
pub struct InspectionResult {
    pub span: Option<ErrorSpan>,
    pub flagged: Option<String>,
    pub rows: Vec<FeatureRow>,
}

/// Matches reported by a checker.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResult {
    pub checker: String,
    pub matches: Vec<RuleMatch>,
}

/// Output a result in the selected format.
pub fn output_result<T: Serialize>(
    message: &str,
    result: &T,
    args: &CorrectionFeaturesArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_human<T: Serialize>(message: &str, result: &T, args: &CorrectionFeaturesArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    for line in render_human(&value) {
        println!("{line}");
    }
    Ok(())
}

/// Render a JSON value as `key: value` lines; arrays of objects become
/// numbered blocks.
fn render_human(value: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                match val {
                    Value::Array(items) if items.iter().any(Value::is_object) => {
                        lines.push(format!("{key}:"));
                        for (i, item) in items.iter().enumerate() {
                            lines.push(format!("  [{i}]"));
                            lines.extend(render_human(item).into_iter().map(|l| format!("    {l}")));
                        }
                    }
                    _ => lines.push(format!("{key}: {}", format_value(val))),
                }
            }
        }
        _ => lines.push(format_value(value)),
    }
    lines
}

fn output_json<T: Serialize>(result: &T, args: &CorrectionFeaturesArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        Value::Object(obj) => {
            let fields = obj
                .iter()
                .map(|(k, v)| format!("{k}={}", format_value(v)))
                .collect::<Vec<_>>()
                .join(" ");
            format!("{{{fields}}}")
        }
        Value::Null => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_render_flat_object() {
        let lines = render_human(&json!({
            "rows_written": 3,
            "output": "features.csv",
            "span": {"start": 2, "len": 4},
            "flagged": null,
        }));

        assert!(lines.contains(&"rows_written: 3".to_string()));
        assert!(lines.contains(&"output: features.csv".to_string()));
        assert!(lines.contains(&"span: {len=4 start=2}".to_string()));
        assert!(lines.contains(&"flagged: none".to_string()));
    }

    #[test]
    fn test_render_rows_as_blocks() {
        let lines = render_human(&json!({
            "rows": [
                {"replacement_string": "have"},
                {"replacement_string": "hive"},
            ],
        }));

        assert_eq!(
            lines,
            vec![
                "rows:",
                "  [0]",
                "    replacement_string: have",
                "  [1]",
                "    replacement_string: hive",
            ]
        );
    }

    #[test]
    fn test_scalar_arrays_inline() {
        assert_eq!(format_value(&json!(["a", "b"])), "[a, b]");
    }
}
