//! Parametric planes

use nalgebra::{RealField, Vector3};

/// A plane spanned by two edge vectors from a corner point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3<T: RealField + Copy> {
    pub corner: Vector3<T>,
    pub u: Vector3<T>,
    pub v: Vector3<T>,
}

/// Plane with floating point components
pub type Plane3f = Plane3<f32>;

/// Plane with double precision components
pub type Plane3d = Plane3<f64>;

impl<T: RealField + Copy> Plane3<T> {
    pub fn new(corner: Vector3<T>, u: Vector3<T>, v: Vector3<T>) -> Self {
        Self { corner, u, v }
    }

    /// Point at parametric coordinates `(s, t)`.
    pub fn position(&self, s: T, t: T) -> Vector3<T> {
        self.corner + self.u * s + self.v * t
    }

    /// Unnormalized normal, `u x v`.
    pub fn normal(&self) -> Vector3<T> {
        self.u.cross(&self.v)
    }
}

/// The XY plane at the origin with unit edges
impl<T: RealField + Copy> Default for Plane3<T> {
    fn default() -> Self {
        Self {
            corner: Vector3::zeros(),
            u: Vector3::x(),
            v: Vector3::y(),
        }
    }
}
