//! Axis-aligned cell bounds with double precision, and the slot bisection
//! rule that turns a parent box into its children.

use glam::DVec3;

use crate::constants::{HEX_CORNERS, SUPPORTED_DIMENSIONS};
use crate::error::{HypertreeError, Result};

/// Double-precision axis-aligned box of one hypertree cell.
///
/// 2-D trees live in the z = 0 plane: `min.z == max.z == 0.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBounds {
  /// Minimum corner (inclusive).
  pub min: DVec3,
  /// Maximum corner (inclusive).
  pub max: DVec3,
}

impl CellBounds {
  /// Create bounds from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: DVec3, max: DVec3) -> Self {
    debug_assert!(
      min.x <= max.x && min.y <= max.y && min.z <= max.z,
      "bounds min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Parse `[xmin, xmax, ymin, ymax, (zmin, zmax)]`.
  ///
  /// Requires exactly `2 * dimension` finite values with each pair ordered.
  pub fn from_slice(bounds: &[f64], dimension: usize) -> Result<Self> {
    let expected = 2 * dimension;
    let ordered = bounds
      .chunks_exact(2)
      .all(|pair| pair[0].is_finite() && pair[1].is_finite() && pair[0] <= pair[1]);
    if !SUPPORTED_DIMENSIONS.contains(&dimension) || bounds.len() != expected || !ordered {
      return Err(HypertreeError::InvalidBounds {
        tree: None,
        expected,
        found: bounds.to_vec(),
      });
    }

    let (z0, z1) = if dimension == 3 {
      (bounds[4], bounds[5])
    } else {
      (0.0, 0.0)
    };
    Ok(Self {
      min: DVec3::new(bounds[0], bounds[2], z0),
      max: DVec3::new(bounds[1], bounds[3], z1),
    })
  }

  /// Get the size of the box (max - min).
  #[inline]
  pub fn size(&self) -> DVec3 {
    self.max - self.min
  }

  /// Get the center of the box.
  #[inline]
  pub fn center(&self) -> DVec3 {
    (self.min + self.max) * 0.5
  }

  /// Check if this box contains a point (boundary inclusive).
  #[inline]
  pub fn contains_point(&self, point: DVec3) -> bool {
    point.cmpge(self.min).all() && point.cmple(self.max).all()
  }

  /// Bounds of child `slot` after splitting every subdivided axis into
  /// `refinement` equal parts.
  ///
  /// The slot is read as base-`refinement` digits, X fastest:
  /// - `ix = slot % r`
  /// - `iy = (slot / r) % r`
  /// - `iz = slot / r²` (3-D only; 2-D trees keep their flat z extent)
  ///
  /// For the octree (r = 2) this is X on odd slots, Y on slots 2,3,6,7 and
  /// Z on slots 4..7.
  pub fn child_bounds(&self, slot: usize, refinement: usize, dimension: usize) -> Self {
    debug_assert!(refinement >= 2);
    let r = refinement;
    let ix = slot % r;
    let iy = (slot / r) % r;
    let iz = if dimension == 3 { slot / (r * r) } else { 0 };
    debug_assert!(iz < r, "slot {} out of range", slot);

    let (x0, x1) = split_axis(self.min.x, self.max.x, ix, r);
    let (y0, y1) = split_axis(self.min.y, self.max.y, iy, r);
    let (z0, z1) = if dimension == 3 {
      split_axis(self.min.z, self.max.z, iz, r)
    } else {
      (self.min.z, self.max.z)
    };

    Self {
      min: DVec3::new(x0, y0, z0),
      max: DVec3::new(x1, y1, z1),
    }
  }

  /// The 8 hexahedron corners in VTK order (see [`HEX_CORNERS`]).
  pub fn corners(&self) -> [DVec3; 8] {
    let extent = [self.min, self.max];
    HEX_CORNERS.map(|[x, y, z]| DVec3::new(extent[x].x, extent[y].y, extent[z].z))
  }
}

/// Part `index` of `[lo, hi]` split into `parts`. The last part ends exactly
/// on `hi` so siblings tile the parent without drift.
#[inline]
fn split_axis(lo: f64, hi: f64, index: usize, parts: usize) -> (f64, f64) {
  let step = (hi - lo) / parts as f64;
  let start = lo + step * index as f64;
  let end = if index + 1 == parts {
    hi
  } else {
    lo + step * (index + 1) as f64
  };
  (start, end)
}
