//! Command implementations for the PDE CLI.
//!
//! Provides the grid and inferential fetch subcommands over an offline
//! historian dump, with flat-file export of the result.

use clap::{Subcommand, ValueEnum};
use pde_export::ExportFormat;

pub mod grid;
pub mod inferential;
pub mod worker;

/// Output file format for a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Comma-delimited with metadata header rows
    Csv,
    /// Tab-delimited, single header row
    Tsv,
    /// DMC TXT: Time/tag/Status interleaved
    Dmc,
    /// IQ lab-data layout, MM/DD/YYYY timestamps
    Iq,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ExportFormat::Csv,
            OutputFormat::Tsv => ExportFormat::Tsv,
            OutputFormat::Dmc => ExportFormat::Dmc,
            OutputFormat::Iq => ExportFormat::Iq,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch grid-interpolated process data over a fixed range and interval
    Grid {
        /// Path to the historian dump CSV (TAG,TIMESTAMP,VALUE)
        #[arg(short = 'd', long)]
        dump_csv: String,

        /// Optional path to a tag metadata CSV (TAG,DESCRIPTION,UNITS)
        #[arg(long)]
        meta_csv: Option<String>,

        /// Comma-separated process tags; output column order follows this
        #[arg(short, long)]
        tags: String,

        /// Range start, e.g. "2024-01-01 00:00:00"
        #[arg(long)]
        start: String,

        /// Range end (inclusive)
        #[arg(long)]
        end: String,

        /// Grid interval, e.g. "30s", "15m", "1h"
        #[arg(short, long, default_value = "1h")]
        interval: String,

        /// Output file path
        #[arg(short, long)]
        output: String,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: OutputFormat,

        /// Timezone label written to the DMC header line
        #[arg(long, default_value = "Local")]
        timezone: String,
    },

    /// Align lab sample events with time-weighted windows of process data
    Inferential {
        /// Path to the historian dump CSV (TAG,TIMESTAMP,VALUE)
        #[arg(short = 'd', long)]
        dump_csv: String,

        /// Optional path to a tag metadata CSV (TAG,DESCRIPTION,UNITS)
        #[arg(long)]
        meta_csv: Option<String>,

        /// Comma-separated lab tags to anchor on
        #[arg(long)]
        lab_tags: String,

        /// Comma-separated process tags to aggregate
        #[arg(long)]
        process_tags: String,

        /// Range start, e.g. "2024-01-01 00:00:00"
        #[arg(long)]
        start: String,

        /// Range end (inclusive)
        #[arg(long)]
        end: String,

        /// Minutes of data taken before the window anchor
        #[arg(long, default_value_t = 20)]
        past_window: i64,

        /// Offset in minutes from recorded to actual sample time; negative
        /// means the sample was physically taken before it was logged
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        future_window: i64,

        /// Fix the window to the recorded time (legacy windowing) instead of
        /// the actual sample time
        #[arg(long)]
        legacy_window: bool,

        /// Output file path
        #[arg(short, long)]
        output: String,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: OutputFormat,

        /// Timezone label written to the DMC header line
        #[arg(long, default_value = "Local")]
        timezone: String,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Grid {
            dump_csv,
            meta_csv,
            tags,
            start,
            end,
            interval,
            output,
            format,
            timezone,
        } => {
            grid::run_grid(
                &dump_csv,
                meta_csv.as_deref(),
                &tags,
                &start,
                &end,
                &interval,
                &output,
                format,
                &timezone,
            )
            .await
        }
        Command::Inferential {
            dump_csv,
            meta_csv,
            lab_tags,
            process_tags,
            start,
            end,
            past_window,
            future_window,
            legacy_window,
            output,
            format,
            timezone,
        } => {
            inferential::run_inferential(
                &dump_csv,
                meta_csv.as_deref(),
                &lab_tags,
                &process_tags,
                &start,
                &end,
                past_window,
                future_window,
                legacy_window,
                &output,
                format,
                &timezone,
            )
            .await
        }
    }
}

/// Split a comma-separated tag list, trimming whitespace and dropping
/// empty entries.
pub(crate) fn split_tags(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::split_tags;

    #[test]
    fn test_split_tags() {
        assert_eq!(
            split_tags("T1, T2 ,,T3"),
            vec!["T1".to_string(), "T2".to_string(), "T3".to_string()]
        );
        assert!(split_tags("  ").is_empty());
    }
}
