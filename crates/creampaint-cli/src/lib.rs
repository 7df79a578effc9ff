//! Command line front end for `creampaint`.
//!
//! ```text
//! creampaint classify "rgb(250, 250, 250)" "rgba(0, 0, 0, 0.5)"
//! creampaint shadow "0 1px 2px rgba(0, 0, 0, 0.4)"
//! creampaint detect page.yaml
//! creampaint repaint page.yaml --output json
//! ```
//!
//! A `creampaint.yaml` (or `.yml`/`.json`) in the working directory is picked
//! up as configuration unless `--config` names another file.

pub mod logging;
pub mod output;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use creampaint::memory::{MemoryDocument, PageSnapshot, StyleWrite};
use creampaint::{
    rewrite_shadow, Classifier, ColorMode, DarkPagePolicy, RepaintConfig, Repainter, SessionStats,
    ThemeDetector,
};

use output::{OutputMode, Render};

/// Config file stem looked up in the working directory.
pub const CONFIG_STEM: &str = "creampaint";

#[derive(Debug, Parser)]
#[command(name = "creampaint", version, about = "Two-tone cream/black page repainting")]
pub struct Cli {
    /// Config file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputMode::Text)]
    pub output: OutputMode,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify resolved color values
    Classify {
        #[arg(required = true)]
        colors: Vec<String>,
    },
    /// Rewrite the colors of a box-shadow/text-shadow value
    Shadow { value: String },
    /// Report whether a page snapshot is dark-themed
    Detect { snapshot: PathBuf },
    /// Repaint a page snapshot and list every forced write
    Repaint { snapshot: PathBuf },
}

#[derive(Debug, Serialize)]
pub struct Classification {
    pub input: String,
    pub output: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyReport {
    pub results: Vec<Classification>,
}

impl Render for ClassifyReport {
    fn render_text(&self) -> String {
        self.results
            .iter()
            .map(|c| {
                let output = c.output.as_deref().unwrap_or("unchanged");
                format!("{} -> {}", c.input, output)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct ShadowReport {
    pub input: String,
    pub output: Option<String>,
}

impl Render for ShadowReport {
    fn render_text(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| "unchanged".to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct DetectReport {
    pub mode: ColorMode,
    pub policy: DarkPagePolicy,
}

fn mode_label(mode: ColorMode) -> &'static str {
    match mode {
        ColorMode::Dark => "dark",
        ColorMode::Light => "light",
    }
}

impl Render for DetectReport {
    fn render_text(&self) -> String {
        mode_label(self.mode).to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct RepaintReport {
    pub mode: ColorMode,
    pub processed: usize,
    pub stats: SessionStats,
    pub writes: Vec<StyleWrite>,
}

impl Render for RepaintReport {
    fn render_text(&self) -> String {
        let mut lines = vec![format!(
            "{} page, {} elements processed, {} writes",
            mode_label(self.mode),
            self.processed,
            self.writes.len()
        )];
        lines.extend(self.writes.iter().map(|w| {
            format!("#{} <{}> {}: {}", w.node.0, w.tag, w.property, w.value)
        }));
        lines.join("\n")
    }
}

/// Resolves the effective configuration.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> anyhow::Result<RepaintConfig> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => RepaintConfig::find_in(cwd, CONFIG_STEM),
    };
    match path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            RepaintConfig::load(&p).with_context(|| format!("loading {}", p.display()))
        }
        None => Ok(RepaintConfig::default()),
    }
}

fn load_document(path: &Path) -> anyhow::Result<MemoryDocument> {
    let snapshot =
        PageSnapshot::load(path).with_context(|| format!("reading snapshot {}", path.display()))?;
    Ok(MemoryDocument::from_snapshot(&snapshot)?)
}

/// Runs one command and returns its formatted output.
pub fn run(command: &Command, config: &RepaintConfig, mode: OutputMode) -> anyhow::Result<String> {
    match command {
        Command::Classify { colors } => {
            let classifier = Classifier::from_config(config);
            let report = ClassifyReport {
                results: colors
                    .iter()
                    .map(|c| Classification {
                        input: c.clone(),
                        output: classifier.to_two_tone(c).map(|t| t.to_string()),
                    })
                    .collect(),
            };
            output::format(&report, mode)
        }
        Command::Shadow { value } => {
            let classifier = Classifier::from_config(config);
            let report = ShadowReport {
                input: value.clone(),
                output: rewrite_shadow(value, &classifier),
            };
            output::format(&report, mode)
        }
        Command::Detect { snapshot } => {
            let doc = load_document(snapshot)?;
            let detector = ThemeDetector::new(config.theme.policy);
            let report = DetectReport {
                mode: detector.detect(&doc, &Classifier::from_config(config)),
                policy: detector.policy(),
            };
            output::format(&report, mode)
        }
        Command::Repaint { snapshot } => {
            let mut doc = load_document(snapshot)?;
            let mut repainter = Repainter::new(config.clone());
            let color_mode = repainter.start(&mut doc, Duration::ZERO);
            repainter.run_until_idle(&mut doc);
            let report = RepaintReport {
                mode: color_mode,
                processed: repainter.processor().processed().len(),
                stats: repainter.stats(),
                writes: doc.take_writes(),
            };
            output::format(&report, mode)
        }
    }
}
