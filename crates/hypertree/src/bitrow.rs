//! BitRow codec - per-slot flags packed MSB-first into one byte.
//!
//! A row is the pair of bytes `(child_mask, child_is_leaf)` describing the
//! children of one internal node. Every query takes a slot `width` (the
//! tree's branching factor); bits past `width` are never read, so a quadtree
//! row only looks at the top four bits of each byte.

use crate::constants::ROW_BITS;

/// Bit for `slot`, counting from the most significant bit (slot 0 = 0x80).
#[inline(always)]
pub const fn slot_bit(slot: usize) -> u8 {
  debug_assert!(slot < ROW_BITS);
  0x80 >> slot
}

/// Bits for the first `width` slots of a row.
///
/// `width_mask(0) == 0x00`, `width_mask(4) == 0xF0`, `width_mask(8) == 0xFF`.
#[inline(always)]
pub const fn width_mask(width: usize) -> u8 {
  debug_assert!(width <= ROW_BITS);
  ((0xFF00u16 >> width) & 0xFF) as u8
}

/// Slot `slot` of a `child_mask` byte is pruned.
#[inline(always)]
pub const fn is_masked(mask: u8, slot: usize) -> bool {
  mask & slot_bit(slot) != 0
}

/// Slot `slot` of a `child_is_leaf` byte is terminal.
#[inline(always)]
pub const fn is_leaf(leaf: u8, slot: usize) -> bool {
  leaf & slot_bit(slot) != 0
}

/// What a single child slot holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
  /// Pruned: no geometry, no data, no row.
  Masked,
  /// Terminal cell with one data value.
  Leaf,
  /// Subdivided node with its own row.
  Internal,
}

/// One decoded row: the mask and leaf bytes side by side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BitRow {
  pub mask: u8,
  pub leaf: u8,
}

impl BitRow {
  pub const fn new(mask: u8, leaf: u8) -> Self {
    Self { mask, leaf }
  }

  /// Classify one slot. Masking wins over the leaf flag.
  #[inline]
  pub const fn kind(&self, slot: usize) -> SlotKind {
    if is_masked(self.mask, slot) {
      SlotKind::Masked
    } else if is_leaf(self.leaf, slot) {
      SlotKind::Leaf
    } else {
      SlotKind::Internal
    }
  }

  /// Unmasked leaf slots among the first `width`.
  #[inline]
  pub const fn leaf_bits(&self, width: usize) -> u8 {
    self.leaf & !self.mask & width_mask(width)
  }

  /// Unmasked internal slots among the first `width`.
  #[inline]
  pub const fn internal_bits(&self, width: usize) -> u8 {
    !self.leaf & !self.mask & width_mask(width)
  }

  #[inline]
  pub const fn leaf_count(&self, width: usize) -> usize {
    self.leaf_bits(width).count_ones() as usize
  }

  #[inline]
  pub const fn internal_count(&self, width: usize) -> usize {
    self.internal_bits(width).count_ones() as usize
  }

  /// Every one of the first `width` slots is masked.
  #[inline]
  pub const fn is_fully_masked(&self, width: usize) -> bool {
    let bits = width_mask(width);
    self.mask & bits == bits
  }

  /// Iterate `(slot, kind)` for the first `width` slots.
  pub fn slots(self, width: usize) -> impl Iterator<Item = (usize, SlotKind)> {
    (0..width).map(move |slot| (slot, self.kind(slot)))
  }
}

#[cfg(test)]
#[path = "bitrow_test.rs"]
mod bitrow_test;
