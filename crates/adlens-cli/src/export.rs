//! Result export: pretty JSON and flattened CSV

use adlens_core::{ClassificationResult, EnrichedResult};
use anyhow::Result;
use clap::ValueEnum;
use std::io::Write;

/// Export format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

/// Write rule-only classification results
pub fn write_classifications(
    writer: &mut impl Write,
    results: &[ClassificationResult],
    format: Format,
) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *writer, results)?;
            writeln!(writer)?;
        }
        Format::Csv => {
            writeln!(
                writer,
                "ad_id,original_text,typology_labels,typology_count,word_count,exclamation_count,question_count"
            )?;
            for result in results {
                writeln!(writer, "{}", classification_row(result))?;
            }
        }
    }
    Ok(())
}

/// Write enhanced records; CSV adds status and cost columns
pub fn write_enriched(
    writer: &mut impl Write,
    records: &[EnrichedResult],
    format: Format,
) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *writer, records)?;
            writeln!(writer)?;
        }
        Format::Csv => {
            writeln!(
                writer,
                "ad_id,original_text,typology_labels,typology_count,word_count,exclamation_count,question_count,enhancement,tone,intensity,session_spent"
            )?;
            for record in records {
                let insights = record.enhancement.insights();
                writeln!(
                    writer,
                    "{},{},{},{}",
                    classification_row(&record.classification),
                    csv_escape(&record.enhancement.to_string()),
                    csv_escape(
                        insights
                            .and_then(|bundle| bundle.tone.as_deref())
                            .unwrap_or("")
                    ),
                    match insights.and_then(|bundle| bundle.intensity) {
                        Some(intensity) => format!("{intensity},{}", record.cost.spent),
                        None => format!(",{}", record.cost.spent),
                    }
                )?;
            }
        }
    }
    Ok(())
}

fn classification_row(result: &ClassificationResult) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        csv_escape(result.ad_id.as_deref().unwrap_or("")),
        csv_escape(&result.original_text),
        csv_escape(&result.typology_labels.join("; ")),
        result.typology_count,
        result.features.word_count,
        result.features.exclamation_count,
        result.features.question_count,
    )
}

/// Quote a CSV field when it carries commas, quotes, or newlines
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
