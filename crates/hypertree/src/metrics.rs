//! Engine-agnostic metrics collection for hypertree conversion.
//!
//! Feature-gated and runtime-toggled so it costs nothing when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use hypertree::metrics::{ConversionMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let conversion = convert_with_config(&forest, "density", &config)?;
//! metrics.record(&conversion.stats);
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::types::ConversionStats;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Rolling window of the most recent values.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.capacity == 0 {
      return;
    }
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }
}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
  pub fn sum(&self) -> T {
    self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
  }
}

impl RollingWindow<u64> {
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = *self.buffer.iter().min()?;
    let max = *self.buffer.iter().max()?;
    Some((min, max))
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128)
  }
}

/// Cumulative conversion statistics plus recent timing history.
#[derive(Debug, Clone, Default)]
pub struct ConversionMetrics {
  /// Conversion calls recorded.
  pub conversions: u64,
  pub trees_converted: u64,
  pub trees_skipped: u64,
  pub cells_emitted: u64,
  pub points_emitted: u64,

  /// Per-tree walk times in microseconds.
  pub tree_walk_timings: RollingWindow<u64>,
  /// Whole-call times in microseconds.
  pub conversion_timings: RollingWindow<u64>,
  /// Merge-stage times in microseconds.
  pub merge_timings: RollingWindow<u64>,

  pub last_conversion_us: u64,
}

impl ConversionMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reset timings and counters.
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  /// Fold one call's stats in. No-op when metrics are disabled.
  pub fn record(&mut self, stats: &ConversionStats) {
    if !is_enabled() {
      return;
    }

    self.conversions += 1;
    self.trees_converted += stats.converted as u64;
    self.trees_skipped += stats.skipped as u64;
    self.cells_emitted += stats.cells as u64;
    self.points_emitted += stats.points as u64;

    for report in stats.reports.iter().filter(|r| !r.skipped) {
      self.tree_walk_timings.push(report.walk_us);
    }
    self.conversion_timings.push(stats.total_us);
    self.merge_timings.push(stats.merge_us);
    self.last_conversion_us = stats.total_us;
  }

  pub fn avg_tree_walk_us(&self) -> f64 {
    self.tree_walk_timings.average()
  }

  pub fn avg_conversion_us(&self) -> f64 {
    self.conversion_timings.average()
  }

  /// Approximate output memory: 24 bytes per point, 64 per cell, 8 per value.
  pub fn mesh_memory_mb(&self) -> f64 {
    let bytes = self.points_emitted * 24 + self.cells_emitted * (64 + 8);
    bytes as f64 / 1_048_576.0
  }
}
