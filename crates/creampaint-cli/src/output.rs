//! Output formatting for command results.
//!
//! Every command produces a serializable report. `text` renders it for
//! people; `json` and `yaml` serialize the report directly.

use clap::ValueEnum;
use serde::Serialize;

/// Controls how command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Human-readable lines
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

/// Reports that know how to print themselves as text.
pub trait Render: Serialize {
    fn render_text(&self) -> String;
}

/// Formats `report` in `mode`.
pub fn format<T: Render>(report: &T, mode: OutputMode) -> anyhow::Result<String> {
    Ok(match mode {
        OutputMode::Text => report.render_text(),
        OutputMode::Json => serde_json::to_string_pretty(report)?,
        OutputMode::Yaml => serde_yaml::to_string(report)?,
    })
}
