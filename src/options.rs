//! Configuration options for boilerplate identification and removal.
//!
//! The `Options` struct controls the operation mode, worker count, and the
//! statistical thresholds of the fit phase. Use `Default::default()` for
//! standard settings.

use crate::error::{Error, Result};

/// Memory/CPU trade-off for a fit+transform run.
///
/// In `Memory` mode, parsed pages are dropped as soon as their pairs have
/// been matched and are re-parsed during `transform`; peak memory stays at
/// O(1) pages. In `Performance` mode, the whole corpus is parsed up front
/// and the parsed trees are reused by `transform`, trading memory for the
/// elimination of a second parse pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationMode {
    /// Minimize resident DOM state; re-parse during transform.
    #[default]
    Memory,

    /// Retain parsed trees between fit and transform; single-threaded only.
    Performance,
}

/// Configuration options for a [`Deboiler`](crate::Deboiler) run.
///
/// # Example
///
/// ```rust
/// use rs_deboiler::{OperationMode, Options};
///
/// let options = Options {
///     n_workers: 4,
///     operation_mode: OperationMode::Memory,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Memory vs performance trade-off. See [`OperationMode`].
    ///
    /// Default: `Memory`
    pub operation_mode: OperationMode,

    /// Number of workers processing pairs/pages concurrently.
    ///
    /// `1` means strictly sequential execution in the calling thread.
    /// Values above `1` are only valid in `Memory` mode.
    ///
    /// Default: `1`
    pub n_workers: usize,

    /// Near-duplicate safeguard threshold.
    ///
    /// If the intersection-over-union of two pages' candidate fingerprint
    /// sets reaches this value, the pair is considered near-identical and
    /// contributes no shared subtrees. Otherwise the matcher would flag
    /// entire page bodies as boilerplate and destroy real content.
    ///
    /// Default: `0.95`
    pub iou_threshold: f64,

    /// Number of pairs a shared subtree must appear in to count as
    /// boilerplate.
    ///
    /// The default of `1` accepts any shared subtree that survives the IOU
    /// safeguard; raise it to trade recall for precision on noisy domains.
    ///
    /// Default: `1`
    pub min_occurrence_threshold: usize,

    /// Number of pairs (during fit) or pages (during transform) handed to a
    /// worker as one contiguous unit of work.
    ///
    /// Within a chunk, pairs are processed in order with a single-slot parse
    /// memo, so each page is parsed at most once per chunk; chunk boundaries
    /// cost at most one extra parse each.
    ///
    /// Default: `100`
    pub chunk_size: usize,

    /// Domain label included in log lines. Purely informational.
    ///
    /// Default: `""`
    pub domain: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            operation_mode: OperationMode::Memory,
            n_workers: 1,
            iou_threshold: 0.95,
            min_occurrence_threshold: 1,
            chunk_size: 100,
            domain: String::new(),
        }
    }
}

impl Options {
    /// Validates option combinations that must be rejected before any work
    /// starts.
    pub fn validate(&self) -> Result<()> {
        if self.n_workers == 0 {
            return Err(Error::Config("`n_workers` must be at least 1".into()));
        }
        if self.operation_mode == OperationMode::Performance && self.n_workers > 1 {
            return Err(Error::Config(
                "`n_workers` can only be larger than 1 in `Memory` operation mode".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(Error::Config("`chunk_size` must be at least 1".into()));
        }
        Ok(())
    }
}
