//! # creampaint - two-tone page repainting
//!
//! `creampaint` repaints a document into a cream/black palette to reduce eye
//! strain. It reads every element's resolved colors, reduces each one to the
//! light or dark target by luminance, and writes the result back with forced
//! priority, while keeping up with pages that keep changing underneath it.
//!
//! ## Core Concepts
//!
//! - [`Document`]: the host page (resolved styles, boxes, forced writes)
//! - [`Classifier`]: color string → light or dark target
//! - [`rewrite_shadow`]: swaps color tokens inside shadow lists
//! - [`ThemeDetector`]: decides once whether the page is already dark
//! - [`ElementProcessor`]: repaints one element's channels
//! - [`ScanScheduler`] / [`PeriodicRescan`]: batched, periodic and incremental scans
//! - [`Repainter`]: the lifecycle a host drives
//! - [`MemoryDocument`](memory::MemoryDocument): headless host for snapshots and tests
//!
//! ## Quick Start
//!
//! ```rust
//! use creampaint::Classifier;
//!
//! let classifier = Classifier::default();
//! assert_eq!(
//!     classifier.to_two_tone("rgb(250, 250, 250)").unwrap().to_string(),
//!     "rgb(255, 243, 214)",
//! );
//! assert_eq!(
//!     classifier.to_two_tone("rgba(20, 40, 60, 0.8)").unwrap().to_string(),
//!     "rgb(18, 18, 18)",
//! );
//! assert!(classifier.to_two_tone("transparent").is_none());
//! ```
//!
//! ## Channels
//!
//! Only a fixed set of properties is touched (see [`StyleChannel`]): text,
//! background, border, outline, decoration, caret and column-rule colors, the
//! two shadow lists, and SVG `fill`/`stroke`. Backgrounds of boxes smaller
//! than 8px on a side are left alone.

pub mod channel;
pub mod classify;
pub mod color;
pub mod config;
pub mod dom;
mod error;
pub mod memory;
pub mod processed;
pub mod processor;
pub mod scheduler;
pub mod session;
pub mod shadow;
pub mod theme;

pub use channel::{ChannelKind, StyleChannel};
pub use classify::Classifier;
pub use color::{parse_color, ColorSample, Rgb, DEFAULT_MIN_ALPHA};
pub use config::{Palette, RepaintConfig, RescanPolicy, ThemeConfig, CREAM, SOFT_BLACK};
pub use dom::{Document, MutationRecord, NodeId, Rect};
pub use error::{ConfigError, SnapshotError};
pub use processed::ProcessedSet;
pub use processor::{ElementProcessor, ProcessOutcome, SkipReason, Visit};
pub use scheduler::{PeriodicRescan, RescanDecision, ScanCursor, ScanScheduler, ScanStatus};
pub use session::{Repainter, SessionStats};
pub use shadow::rewrite_shadow;
pub use theme::{ColorMode, DarkPagePolicy, ThemeDetector};
