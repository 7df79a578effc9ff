//! The repaint lifecycle a host drives.
//!
//! A host wires its own event sources to a [`Repainter`]:
//!
//! | Host event | Call |
//! |------------|------|
//! | script injected / page ready | [`Repainter::start`] |
//! | animation frame | [`Repainter::on_animation_frame`] |
//! | interval timer | [`Repainter::on_interval`] |
//! | mutation observer batch | [`Repainter::on_mutations`] |
//! | element destroyed | [`Repainter::forget`] |
//!
//! ```rust
//! use std::time::Duration;
//! use creampaint::memory::MemoryDocument;
//! use creampaint::{Document, Rect, RepaintConfig, Repainter};
//!
//! let mut doc = MemoryDocument::new();
//! let html = doc.create_element("html");
//! let body = doc.create_element("body");
//! let p = doc.create_element("p");
//! doc.set_document_element(html);
//! doc.append_child(html, body);
//! doc.append_child(body, p);
//! doc.set_rect(p, Rect::new(300.0, 20.0));
//! doc.set_computed(p, "color", "rgb(40, 40, 40)");
//!
//! let mut repainter = Repainter::new(RepaintConfig::default());
//! repainter.start(&mut doc, Duration::ZERO);
//! repainter.run_until_idle(&mut doc);
//!
//! assert_eq!(doc.computed_value(p, "color"), "rgb(18, 18, 18)");
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::config::RepaintConfig;
use crate::dom::{Document, MutationRecord, NodeId};
use crate::processor::{ElementProcessor, Visit};
use crate::scheduler::{PeriodicRescan, RescanDecision, ScanScheduler, ScanStatus};
use crate::theme::{ColorMode, ThemeDetector};

const BACKGROUND: &str = "background-color";

/// Counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub scans_started: usize,
    pub frames: usize,
    pub rescans: usize,
    pub mutation_visits: usize,
}

/// One page's repaint session.
#[derive(Debug, Clone)]
pub struct Repainter {
    config: RepaintConfig,
    detector: ThemeDetector,
    processor: ElementProcessor,
    scheduler: ScanScheduler,
    periodic: PeriodicRescan,
    color_mode: Option<ColorMode>,
    stats: SessionStats,
}

impl Repainter {
    pub fn new(config: RepaintConfig) -> Self {
        Self {
            detector: ThemeDetector::new(config.theme.policy),
            processor: ElementProcessor::from_config(&config),
            scheduler: ScanScheduler::from_config(&config),
            periodic: PeriodicRescan::from_config(&config),
            color_mode: None,
            stats: SessionStats::default(),
            config,
        }
    }

    pub fn config(&self) -> &RepaintConfig {
        &self.config
    }

    /// The detected page mode, once [`start`](Self::start) has run.
    pub fn color_mode(&self) -> Option<ColorMode> {
        self.color_mode
    }

    pub fn processor(&self) -> &ElementProcessor {
        &self.processor
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// True while a scan waits for the next animation frame.
    pub fn wants_frame(&self) -> bool {
        self.scheduler.has_pending()
    }

    /// When the host should next call [`on_interval`](Self::on_interval).
    pub fn next_interval_due(&self) -> Option<Duration> {
        self.periodic.next_due()
    }

    /// Detects the page theme, pins the root background, starts the initial
    /// scan and arms the periodic rescan. `now` is the host clock at start.
    pub fn start<D: Document>(&mut self, doc: &mut D, now: Duration) -> ColorMode {
        let mode = self.detector.detect(doc, self.processor.classifier());
        self.color_mode = Some(mode);

        if mode.is_dark() && self.config.theme.swap_palette_on_dark {
            let swapped = self.processor.classifier().palette().swapped();
            self.processor.classifier_mut().set_palette(swapped);
            tracing::debug!("dark page, palette swapped");
        }

        if self.config.pin_root_background {
            self.pin_root_background(doc);
        }

        self.periodic.start(now);
        self.full_scan(doc, Visit::Normal);
        mode
    }

    /// Forces the light target onto the root and body backgrounds.
    fn pin_root_background<D: Document>(&self, doc: &mut D) {
        let frame = self.processor.classifier().palette().light.to_string();
        let targets = [doc.document_element(), doc.body()];
        for node in targets.into_iter().flatten() {
            doc.set_important(node, BACKGROUND, &frame);
        }
    }

    fn full_scan<D: Document>(&mut self, doc: &mut D, visit: Visit) -> Option<ScanStatus> {
        let root = doc.document_element()?;
        self.stats.scans_started += 1;
        Some(self.scheduler.scan(doc, &mut self.processor, root, visit))
    }

    /// Runs one batch of every pending scan. Returns whether another frame is
    /// needed.
    pub fn on_animation_frame<D: Document>(&mut self, doc: &mut D) -> bool {
        if !self.scheduler.has_pending() {
            return false;
        }
        self.stats.frames += 1;
        self.scheduler.on_animation_frame(doc, &mut self.processor) > 0
    }

    /// Periodic timer tick at host time `now`.
    pub fn on_interval<D: Document>(&mut self, doc: &mut D, now: Duration) -> RescanDecision {
        let decision = self.periodic.poll(now);
        if let RescanDecision::Rescan(visit) = decision {
            self.stats.rescans += 1;
            self.full_scan(doc, visit);
        }
        decision
    }

    /// Feeds a batch of mutation records through the incremental path.
    pub fn on_mutations<D: Document>(&mut self, doc: &mut D, records: &[MutationRecord]) -> usize {
        let visited = self.scheduler.on_mutations(doc, &mut self.processor, records);
        self.stats.mutation_visits += visited;
        visited
    }

    /// Drops a destroyed element from the processed set.
    pub fn forget(&mut self, node: NodeId) {
        self.processor.processed_mut().forget(node);
    }

    /// Pumps animation frames until no scan is pending. Returns the number of
    /// frames it took.
    pub fn run_until_idle<D: Document>(&mut self, doc: &mut D) -> usize {
        let mut frames = 0;
        while self.wants_frame() {
            self.on_animation_frame(doc);
            frames += 1;
        }
        frames
    }
}

impl Default for Repainter {
    fn default() -> Self {
        Self::new(RepaintConfig::default())
    }
}
