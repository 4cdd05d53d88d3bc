//! Quaternion helpers for camera rotations
//!
//! Quaternions here are not required to be unit length; rotation helpers
//! follow the `q * v * conj(q)` convention.

use nalgebra::{Quaternion, RealField, UnitQuaternion, Vector3};

/// Quaternion with floating point components
pub type Quatf = Quaternion<f32>;

/// Quaternion with double precision components
pub type Quatd = Quaternion<f64>;

/// Build the quaternion rotating by `radians` about `axis`.
///
/// The axis is used as given; pass a unit vector for a unit quaternion.
pub fn quat_rotation<T: RealField + Copy>(axis: &Vector3<T>, radians: T) -> Quaternion<T> {
    let half = radians * nalgebra::convert::<f64, T>(0.5);
    let (s, c) = half.sin_cos();
    Quaternion::from_parts(c, axis * s)
}

/// Rotate `v` by `q`.
pub fn quat_rotate<T: RealField + Copy>(q: &Quaternion<T>, v: &Vector3<T>) -> Vector3<T> {
    let p = Quaternion::from_parts(T::zero(), *v);
    let r = q * p * q.conjugate();
    r.vector().into_owned()
}

/// Multiplicative inverse of `q`, or `None` for the zero quaternion.
pub fn quat_inverse<T: RealField + Copy>(q: &Quaternion<T>) -> Option<Quaternion<T>> {
    let n = q.norm_squared();
    if n == T::zero() {
        None
    } else {
        Some(q.conjugate() / n)
    }
}

/// Spherical interpolation between two orientations.
pub fn slerp<T: RealField + Copy>(a: &Quaternion<T>, b: &Quaternion<T>, t: T) -> UnitQuaternion<T> {
    let a = UnitQuaternion::new_normalize(*a);
    let b = UnitQuaternion::new_normalize(*b);
    a.slerp(&b, t)
}
