// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Axis-aligned bounding box in the viewer's dictionary layout.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in model coordinates.
///
/// Invariants:
/// - each `*min` component is less than or equal to its `*max` counterpart.
/// - serialized as `{xmin, xmax, ymin, ymax, zmin, zmax}`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum x.
    pub xmin: f64,
    /// Maximum x.
    pub xmax: f64,
    /// Minimum y.
    pub ymin: f64,
    /// Maximum y.
    pub ymax: f64,
    /// Minimum z.
    pub zmin: f64,
    /// Maximum z.
    pub zmax: f64,
}

impl BoundingBox {
    /// Degenerate box at the origin, used for empty scenes.
    pub const ZERO: Self = Self {
        xmin: 0.0,
        xmax: 0.0,
        ymin: 0.0,
        ymax: 0.0,
        zmin: 0.0,
        zmax: 0.0,
    };

    /// Builds a box from two opposite corners; components are reordered per axis.
    pub fn from_corners(a: [f64; 3], b: [f64; 3]) -> Self {
        Self {
            xmin: a[0].min(b[0]),
            xmax: a[0].max(b[0]),
            ymin: a[1].min(b[1]),
            ymax: a[1].max(b[1]),
            zmin: a[2].min(b[2]),
            zmax: a[2].max(b[2]),
        }
    }

    /// Returns the minimum corner.
    pub fn min(&self) -> [f64; 3] {
        [self.xmin, self.ymin, self.zmin]
    }

    /// Returns the maximum corner.
    pub fn max(&self) -> [f64; 3] {
        [self.xmax, self.ymax, self.zmax]
    }

    /// Returns the union of two boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            xmin: self.xmin.min(other.xmin),
            xmax: self.xmax.max(other.xmax),
            ymin: self.ymin.min(other.ymin),
            ymax: self.ymax.max(other.ymax),
            zmin: self.zmin.min(other.zmin),
            zmax: self.zmax.max(other.zmax),
        }
    }

    /// Union of all boxes, or `None` when the iterator is empty.
    pub fn combined<'a>(boxes: impl IntoIterator<Item = &'a Self>) -> Option<Self> {
        boxes
            .into_iter()
            .fold(None, |acc: Option<Self>, b| match acc {
                Some(a) => Some(a.union(b)),
                None => Some(*b),
            })
    }

    /// Edge lengths along x, y and z.
    pub fn size(&self) -> [f64; 3] {
        [
            self.xmax - self.xmin,
            self.ymax - self.ymin,
            self.zmax - self.zmin,
        ]
    }

    /// Largest edge length.
    pub fn max_extent(&self) -> f64 {
        let [x, y, z] = self.size();
        x.max(y).max(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_orders_components() {
        let bb = BoundingBox::from_corners([1.0, -2.0, 3.0], [-1.0, 2.0, 0.0]);
        assert_eq!(bb.min(), [-1.0, -2.0, 0.0]);
        assert_eq!(bb.max(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn combined_covers_every_input() {
        let a = BoundingBox::from_corners([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = BoundingBox::from_corners([5.0, -1.0, 0.5], [6.0, 0.5, 4.0]);
        let bb = BoundingBox::combined([&a, &b]);
        assert_eq!(
            bb,
            Some(BoundingBox::from_corners([0.0, -1.0, 0.0], [6.0, 1.0, 4.0]))
        );
        assert_eq!(BoundingBox::combined(&[] as &[BoundingBox]), None);
    }

    #[test]
    fn max_extent_picks_longest_axis() {
        let bb = BoundingBox::from_corners([0.0, 0.0, 0.0], [2.0, 7.0, 3.0]);
        assert!((bb.max_extent() - 7.0).abs() < f64::EPSILON);
        assert!(BoundingBox::ZERO.max_extent().abs() < f64::EPSILON);
    }
}
