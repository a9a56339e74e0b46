pub mod formatter;

pub use formatter::{
    format_batch_summary, format_json, format_report, format_score, format_scored_table,
    format_tsv, should_use_colors, OutputFormat, ScoredQuestion,
};
