//! Axis-aligned bounding boxes

use crate::vector::Vec3f;
use serde::{Deserialize, Serialize};

/// An axis-aligned box given by its low and high corners
///
/// An empty box has `low` at +infinity and `high` at -infinity so that
/// extending it by any point yields that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub low: Vec3f,
    pub high: Vec3f,
}

impl BoundingBox {
    pub fn new(low: Vec3f, high: Vec3f) -> Self {
        Self { low, high }
    }

    /// A box containing nothing
    pub fn empty() -> Self {
        Self {
            low: Vec3f::repeat(f32::INFINITY),
            high: Vec3f::repeat(f32::NEG_INFINITY),
        }
    }

    /// Smallest box containing every point, or an empty box.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Vec3f>,
    {
        let mut bounds = Self::empty();
        for p in points {
            bounds.extend(p);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.low.x > self.high.x || self.low.y > self.high.y || self.low.z > self.high.z
    }

    /// Grow the box to contain `p`.
    pub fn extend(&mut self, p: &Vec3f) {
        self.low = self.low.inf(p);
        self.high = self.high.sup(p);
    }

    /// Grow the box to contain another box.
    pub fn union(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.extend(&other.low);
        self.extend(&other.high);
    }

    pub fn center(&self) -> Vec3f {
        (self.low + self.high) * 0.5
    }

    /// Edge lengths along each axis; zero for an empty box.
    pub fn size(&self) -> Vec3f {
        if self.is_empty() {
            Vec3f::zeros()
        } else {
            self.high - self.low
        }
    }

    /// Longest edge length
    pub fn max_extent(&self) -> f32 {
        self.size().max()
    }

    pub fn contains(&self, p: &Vec3f) -> bool {
        p.x >= self.low.x
            && p.y >= self.low.y
            && p.z >= self.low.z
            && p.x <= self.high.x
            && p.y <= self.high.y
            && p.z <= self.high.z
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
