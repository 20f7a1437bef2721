/*!
 * Run summary reporting
 *
 * Renders the outcome of a run as a console table using the tabled library.
 */

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::session::RunSummary;
use crate::utils::format_file_size;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    key: &'static str,

    #[tabled(rename = "Value")]
    value: String,
}

/// Render a run summary as a table
pub fn summary_table(summary: &RunSummary) -> String {
    let stats = &summary.statistics;

    let rows = vec![
        SummaryRow {
            key: "Output File",
            value: summary.output_file.display().to_string(),
        },
        SummaryRow {
            key: "Output Size",
            value: format_file_size(summary.bytes_written as u64),
        },
        SummaryRow {
            key: "Process Time",
            value: format!("{:.4?}", summary.duration),
        },
        SummaryRow {
            key: "Files Included",
            value: format!(
                "{} ({})",
                stats.files_included,
                format_file_size(stats.bytes_included)
            ),
        },
        SummaryRow {
            key: "Excluded Entries",
            value: stats.excluded.to_string(),
        },
        SummaryRow {
            key: "Oversized Files",
            value: stats.oversized.to_string(),
        },
        SummaryRow {
            key: "Binary Files",
            value: stats.binary.to_string(),
        },
        SummaryRow {
            key: "Failed Entries",
            value: stats.failed.to_string(),
        },
        // Rough rule of thumb: four characters per token
        SummaryRow {
            key: "Est. LLM Tokens",
            value: (summary.bytes_written / 4).to_string(),
        },
    ];

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));

    table.to_string()
}

/// Print the summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("\n{}", summary_table(summary));
}
