//! Time-sliced scanning.
//!
//! A full scan can touch thousands of elements, so it never runs in one go.
//! [`ScanCursor`] snapshots the element list and advances it one batch at a
//! time; [`ScanScheduler`] runs the first batch right away and one batch of
//! every pending scan per animation frame, the host's yield point.
//!
//! Two more triggers feed the same processor:
//!
//! - [`PeriodicRescan`]: a full rescan every few seconds for a limited window
//!   after start, to catch content that paints late.
//! - [`ScanScheduler::on_mutations`]: added subtrees are processed right away,
//!   capped per subtree so a large insertion stays cheap. Removed subtrees
//!   leave the processed set.

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::{RepaintConfig, RescanPolicy};
use crate::dom::{Document, MutationRecord, NodeId};
use crate::processor::{ElementProcessor, Visit};

/// Whether a scan has more work left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// More batches remain; resume on the next frame.
    Yielded,
    Finished,
}

/// A resumable walk over a fixed element list.
#[derive(Debug, Clone)]
pub struct ScanCursor {
    elements: Vec<NodeId>,
    next: usize,
    visit: Visit,
}

impl ScanCursor {
    /// Snapshots the element descendants of `root`.
    pub fn new<D: Document>(doc: &D, root: NodeId, visit: Visit) -> Self {
        Self {
            elements: doc.descendants(root),
            next: 0,
            visit,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.elements.len() - self.next
    }

    /// Processes up to `batch` elements.
    pub fn step<D: Document>(
        &mut self,
        doc: &mut D,
        processor: &mut ElementProcessor,
        batch: usize,
    ) -> ScanStatus {
        let end = self.elements.len().min(self.next + batch);
        while self.next < end {
            processor.process(doc, self.elements[self.next], self.visit);
            self.next += 1;
        }
        if self.next < self.elements.len() {
            ScanStatus::Yielded
        } else {
            ScanStatus::Finished
        }
    }
}

/// Runs scans in fixed-size batches across animation frames.
#[derive(Debug, Clone)]
pub struct ScanScheduler {
    batch_size: usize,
    descendant_cap: usize,
    observe_mutations: bool,
    pending: VecDeque<ScanCursor>,
}

impl ScanScheduler {
    pub fn new(batch_size: usize, descendant_cap: usize, observe_mutations: bool) -> Self {
        Self {
            batch_size: batch_size.max(1),
            descendant_cap,
            observe_mutations,
            pending: VecDeque::new(),
        }
    }

    pub fn from_config(config: &RepaintConfig) -> Self {
        Self::new(
            config.batch_size,
            config.mutation_descendant_cap,
            config.observe_mutations,
        )
    }

    /// True while some scan is waiting for a frame.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_scans(&self) -> usize {
        self.pending.len()
    }

    /// Starts a scan under `root`, running its first batch immediately.
    ///
    /// Scans started while others are pending run alongside them; nothing is
    /// cancelled.
    pub fn scan<D: Document>(
        &mut self,
        doc: &mut D,
        processor: &mut ElementProcessor,
        root: NodeId,
        visit: Visit,
    ) -> ScanStatus {
        let mut cursor = ScanCursor::new(doc, root, visit);
        tracing::debug!(elements = cursor.len(), ?visit, "scan started");
        let status = cursor.step(doc, processor, self.batch_size);
        match status {
            ScanStatus::Yielded => self.pending.push_back(cursor),
            ScanStatus::Finished => tracing::debug!("scan finished"),
        }
        status
    }

    /// Advances every pending scan by one batch. Returns how many scans are
    /// still pending afterwards.
    pub fn on_animation_frame<D: Document>(
        &mut self,
        doc: &mut D,
        processor: &mut ElementProcessor,
    ) -> usize {
        let batch = self.batch_size;
        self.pending.retain_mut(|cursor| {
            match cursor.step(doc, processor, batch) {
                ScanStatus::Yielded => true,
                ScanStatus::Finished => {
                    tracing::debug!(elements = cursor.len(), "scan finished");
                    false
                }
            }
        });
        self.pending.len()
    }

    /// Incremental path: processes each added element and up to the
    /// descendant cap of its element descendants.
    ///
    /// Removed nodes and their descendants are dropped from the processed set
    /// whether or not the add path is enabled. Attribute records are accepted
    /// and ignored. Returns the number of elements handed to the processor.
    pub fn on_mutations<D: Document>(
        &mut self,
        doc: &mut D,
        processor: &mut ElementProcessor,
        records: &[MutationRecord],
    ) -> usize {
        let mut visited = 0;
        for record in records {
            let (added, removed) = match record {
                MutationRecord::ChildList { added, removed, .. } => (added, removed),
                MutationRecord::Attributes { .. } => continue,
            };
            for &node in removed {
                forget_subtree(doc, processor, node);
            }
            if !self.observe_mutations {
                continue;
            }
            for &node in added {
                if !doc.is_element(node) {
                    continue;
                }
                processor.process(doc, node, Visit::Normal);
                visited += 1;

                for child in doc.descendants(node).into_iter().take(self.descendant_cap) {
                    processor.process(doc, child, Visit::Normal);
                    visited += 1;
                }
            }
        }
        visited
    }
}

fn forget_subtree<D: Document>(doc: &D, processor: &mut ElementProcessor, node: NodeId) {
    let processed = processor.processed_mut();
    processed.forget(node);
    for child in doc.descendants(node) {
        processed.forget(child);
    }
}

impl Default for ScanScheduler {
    fn default() -> Self {
        Self::from_config(&RepaintConfig::default())
    }
}

/// What a periodic timer tick asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescanDecision {
    /// Not due yet.
    Idle,
    /// Run a full rescan now.
    Rescan(Visit),
    /// The window just ran out; the timer is now cancelled.
    Expired,
    /// The timer was already cancelled.
    Cancelled,
}

/// Fires a full rescan every interval until the window after start closes.
///
/// Times are offsets from the session start as reported by the host. A tick
/// that arrives late (a throttled background tab) fires once and the next due
/// time skips the missed intervals.
#[derive(Debug, Clone)]
pub struct PeriodicRescan {
    interval: Duration,
    window: Duration,
    started_at: Duration,
    next_due: Duration,
    visit: Visit,
    cancelled: bool,
}

impl PeriodicRescan {
    pub fn new(interval: Duration, window: Duration, policy: RescanPolicy) -> Self {
        let visit = match policy {
            RescanPolicy::RespectMark => Visit::Normal,
            RescanPolicy::BypassMark => Visit::Forced,
        };
        Self {
            interval,
            window,
            started_at: Duration::ZERO,
            next_due: interval,
            visit,
            cancelled: false,
        }
    }

    pub fn from_config(config: &RepaintConfig) -> Self {
        Self::new(
            config.rescan_interval(),
            config.rescan_window(),
            config.rescan_policy,
        )
    }

    /// Arms the timer relative to `now`.
    pub fn start(&mut self, now: Duration) {
        self.started_at = now;
        self.next_due = now + self.interval;
        self.cancelled = false;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next tick is due, or `None` once cancelled.
    pub fn next_due(&self) -> Option<Duration> {
        (!self.cancelled).then_some(self.next_due)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Checks the timer at `now`.
    pub fn poll(&mut self, now: Duration) -> RescanDecision {
        if self.cancelled {
            return RescanDecision::Cancelled;
        }
        if now < self.next_due {
            return RescanDecision::Idle;
        }

        if now.saturating_sub(self.started_at) >= self.window {
            self.cancelled = true;
            tracing::debug!(
                elapsed = ?now.saturating_sub(self.started_at),
                "periodic rescan expired"
            );
            return RescanDecision::Expired;
        }

        while self.next_due <= now {
            self.next_due += self.interval;
        }
        RescanDecision::Rescan(self.visit)
    }
}

impl Default for PeriodicRescan {
    fn default() -> Self {
        Self::from_config(&RepaintConfig::default())
    }
}
