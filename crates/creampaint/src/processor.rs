//! Per-element repainting.
//!
//! [`ElementProcessor::process`] reads each recognized channel's resolved
//! value, reduces it to the palette and writes it back with forced priority.
//! Processed elements are remembered so plain scans visit each one once.

use crate::channel::{ChannelKind, StyleChannel};
use crate::classify::Classifier;
use crate::config::RepaintConfig;
use crate::dom::{Document, NodeId};
use crate::processed::ProcessedSet;
use crate::shadow::rewrite_shadow;

/// Tags that carry no visual styling.
const NON_VISUAL_TAGS: &[&str] = &["script", "style", "noscript"];

/// Whether a visit honors the processed mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visit {
    /// Skip elements that were already processed.
    #[default]
    Normal,
    /// Repaint even if the element was already processed.
    Forced,
}

/// Why an element was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotElement,
    NonVisualTag,
    AlreadyProcessed,
}

/// Result of one [`ElementProcessor::process`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    Skipped(SkipReason),
    /// The element was examined; `writes` channels were overwritten.
    Repainted { writes: usize },
}

impl ProcessOutcome {
    pub fn was_processed(&self) -> bool {
        matches!(self, ProcessOutcome::Repainted { .. })
    }
}

/// Applies two-tone classification to one element at a time.
#[derive(Debug, Clone)]
pub struct ElementProcessor {
    classifier: Classifier,
    min_box_size: f64,
    processed: ProcessedSet,
}

impl ElementProcessor {
    pub fn new(classifier: Classifier, min_box_size: f64) -> Self {
        Self {
            classifier,
            min_box_size,
            processed: ProcessedSet::new(),
        }
    }

    pub fn from_config(config: &RepaintConfig) -> Self {
        Self::new(Classifier::from_config(config), config.min_box_size)
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut Classifier {
        &mut self.classifier
    }

    pub fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    pub fn processed_mut(&mut self) -> &mut ProcessedSet {
        &mut self.processed
    }

    /// Why `node` would be skipped on this visit, if at all.
    pub fn skip_reason<D: Document>(
        &self,
        doc: &D,
        node: NodeId,
        visit: Visit,
    ) -> Option<SkipReason> {
        if !doc.is_element(node) {
            return Some(SkipReason::NotElement);
        }
        let tag = doc.tag_name(node).unwrap_or_default();
        if NON_VISUAL_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            return Some(SkipReason::NonVisualTag);
        }
        if visit == Visit::Normal && self.processed.contains(node) {
            return Some(SkipReason::AlreadyProcessed);
        }
        None
    }

    /// Repaints the recognized channels of `node` and marks it processed.
    pub fn process<D: Document>(
        &mut self,
        doc: &mut D,
        node: NodeId,
        visit: Visit,
    ) -> ProcessOutcome {
        if let Some(reason) = self.skip_reason(doc, node, visit) {
            return ProcessOutcome::Skipped(reason);
        }

        let tiny = doc.bounding_box(node).is_smaller_than(self.min_box_size);
        let mut writes = 0;

        for channel in StyleChannel::ALL {
            let kind = channel.kind();
            if tiny && kind == ChannelKind::Background {
                continue;
            }

            let current = doc.computed_value(node, channel.property());
            let replacement = match kind {
                ChannelKind::Shadow => rewrite_shadow(&current, &self.classifier),
                ChannelKind::Plain | ChannelKind::Background | ChannelKind::SvgPaint => self
                    .classifier
                    .to_two_tone(&current)
                    .map(|target| target.to_string()),
            };

            if let Some(value) = replacement {
                tracing::trace!(node = node.0, property = %channel, %value, "repaint");
                doc.set_important(node, channel.property(), &value);
                writes += 1;
            }
        }

        self.processed.insert(node);
        ProcessOutcome::Repainted { writes }
    }
}

impl Default for ElementProcessor {
    fn default() -> Self {
        Self::from_config(&RepaintConfig::default())
    }
}
