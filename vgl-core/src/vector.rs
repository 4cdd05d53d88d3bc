//! Vector types and closed-form rotation helpers

use nalgebra::{Point3, RealField, Rotation3, Unit, Vector2, Vector3, Vector4};

/// A 2D vector with floating point components
pub type Vec2f = Vector2<f32>;

/// A 3D vector with floating point components
pub type Vec3f = Vector3<f32>;

/// A 4D vector with floating point components
pub type Vec4f = Vector4<f32>;

/// A 2D vector with double precision components
pub type Vec2d = Vector2<f64>;

/// A 3D vector with double precision components
pub type Vec3d = Vector3<f64>;

/// A 4D vector with double precision components
pub type Vec4d = Vector4<f64>;

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// 3x3 matrix with floating point elements
pub type Mat3f = nalgebra::Matrix3<f32>;

/// 4x4 matrix with floating point elements
pub type Mat4f = nalgebra::Matrix4<f32>;

/// 3x3 matrix with double precision elements
pub type Mat3d = nalgebra::Matrix3<f64>;

/// 4x4 matrix with double precision elements
pub type Mat4d = nalgebra::Matrix4<f64>;

/// Rotate `a` about the X axis by `radians`.
pub fn rotate_x<T: RealField + Copy>(a: &Vector3<T>, radians: T) -> Vector3<T> {
    let (s, c) = radians.sin_cos();
    Vector3::new(a.x, c * a.y - s * a.z, s * a.y + c * a.z)
}

/// Rotate `a` about the Y axis by `radians`.
pub fn rotate_y<T: RealField + Copy>(a: &Vector3<T>, radians: T) -> Vector3<T> {
    let (s, c) = radians.sin_cos();
    Vector3::new(c * a.x + s * a.z, a.y, -s * a.x + c * a.z)
}

/// Rotate `a` about the Z axis by `radians`.
pub fn rotate_z<T: RealField + Copy>(a: &Vector3<T>, radians: T) -> Vector3<T> {
    let (s, c) = radians.sin_cos();
    Vector3::new(c * a.x - s * a.y, s * a.x + c * a.y, a.z)
}

/// Rotate `a` about an arbitrary axis by `radians`.
///
/// A zero-length axis leaves the vector unchanged.
pub fn rotate_about<T: RealField + Copy>(a: &Vector3<T>, axis: &Vector3<T>, radians: T) -> Vector3<T> {
    match Unit::try_new(*axis, T::default_epsilon()) {
        Some(axis) => Rotation3::from_axis_angle(&axis, radians) * a,
        None => *a,
    }
}

/// Component-wise linear interpolation between two vectors.
pub fn lerp<T: RealField + Copy>(a: &Vector3<T>, b: &Vector3<T>, t: T) -> Vector3<T> {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_axis_rotations_quarter_turn() {
        let v = Vec3f::new(0.0, 1.0, 0.0);
        assert_relative_eq!(rotate_x(&v, FRAC_PI_2), Vec3f::new(0.0, 0.0, 1.0), epsilon = 1e-6);

        let v = Vec3f::new(0.0, 0.0, 1.0);
        assert_relative_eq!(rotate_y(&v, FRAC_PI_2), Vec3f::new(1.0, 0.0, 0.0), epsilon = 1e-6);

        let v = Vec3f::new(1.0, 0.0, 0.0);
        assert_relative_eq!(rotate_z(&v, FRAC_PI_2), Vec3f::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_rotate_about_matches_axis_rotation() {
        let v = Vec3f::new(0.3, -1.2, 2.0);
        let expected = rotate_y(&v, 0.7);
        let actual = rotate_about(&v, &Vec3f::new(0.0, 5.0, 0.0), 0.7);
        assert_relative_eq!(actual, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_about_zero_axis_is_identity() {
        let v = Vec3f::new(1.0, 2.0, 3.0);
        assert_eq!(rotate_about(&v, &Vec3f::zeros(), 1.0), v);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Vec3d::new(0.0, 0.0, 0.0);
        let b = Vec3d::new(2.0, 4.0, 6.0);
        assert_eq!(lerp(&a, &b, 0.0), a);
        assert_eq!(lerp(&a, &b, 1.0), b);
        assert_eq!(lerp(&a, &b, 0.5), Vec3d::new(1.0, 2.0, 3.0));
    }
}
