//! Single-active LED indicator column
//!
//! One LED per row on the machine face. At most one LED is lit at a time:
//! lighting a row first clears the whole column, mirroring the physical
//! machine's behavior of never showing two confirmations at once.

use tracing::warn;

/// Drives the per-row LED column
#[derive(Debug)]
pub struct IndicatorController {
    lit: Vec<bool>,
}

impl IndicatorController {
    /// Create a controller for a fixed number of rows, all unlit
    pub fn new(row_count: usize) -> Self {
        Self {
            lit: vec![false; row_count],
        }
    }

    /// Light the LED for one row, clearing every other LED first
    ///
    /// Out-of-range indices are a logged no-op; the column is left unchanged.
    pub fn set_active(&mut self, row_index: usize) {
        if row_index >= self.lit.len() {
            warn!(row_index, rows = self.lit.len(), "LED index out of range");
            return;
        }
        // O(rows) clear is fine at the fixed small row count
        for led in self.lit.iter_mut() {
            *led = false;
        }
        self.lit[row_index] = true;
    }

    /// Turn every LED off
    pub fn clear_all(&mut self) {
        for led in self.lit.iter_mut() {
            *led = false;
        }
    }

    /// The currently lit row, if any
    pub fn active_row(&self) -> Option<usize> {
        self.lit.iter().position(|&on| on)
    }

    /// Whether a specific row's LED is lit
    pub fn is_active(&self, row_index: usize) -> bool {
        self.lit.get(row_index).copied().unwrap_or(false)
    }

    /// Number of LEDs in the column
    pub fn len(&self) -> usize {
        self.lit.len()
    }

    /// Whether the column has no LEDs at all
    pub fn is_empty(&self) -> bool {
        self.lit.is_empty()
    }

    /// Count of lit LEDs (0 or 1 by invariant)
    pub fn active_count(&self) -> usize {
        self.lit.iter().filter(|&&on| on).count()
    }
}
