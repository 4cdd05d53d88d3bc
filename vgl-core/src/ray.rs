//! Rays, reflection, refraction and ray/sphere intersection

use nalgebra::{RealField, Vector3};

const MIN_T: f64 = 1e-4;
const MAX_T: f64 = 1e10;

/// A ray with an origin and a (not necessarily normalized) direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray3<T: RealField + Copy> {
    pub origin: Vector3<T>,
    pub direction: Vector3<T>,
}

/// Ray with floating point components
pub type Ray3f = Ray3<f32>;

/// Ray with double precision components
pub type Ray3d = Ray3<f64>;

impl<T: RealField + Copy> Ray3<T> {
    pub fn new(origin: Vector3<T>, direction: Vector3<T>) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t` along the ray.
    pub fn evaluate(&self, t: T) -> Vector3<T> {
        self.origin + self.direction * t
    }

    /// Mirror this ray about `normal`, starting the new ray at `hit`.
    pub fn reflect(&self, hit: &Vector3<T>, normal: &Vector3<T>) -> Self {
        let two = nalgebra::convert::<f64, T>(2.0);
        let d = self.direction - normal * (two * self.direction.dot(normal));
        Self::new(*hit, d)
    }

    /// Bend this ray through a surface with the given refractive indices.
    ///
    /// Under total internal reflection the direction components are NaN.
    pub fn refract(&self, hit: &Vector3<T>, normal: &Vector3<T>, old_index: T, new_index: T) -> Self {
        let n = old_index / new_index;
        let cos_i = normal.dot(&-self.direction);
        let sin2_t = n * n * (T::one() - cos_i * cos_i);
        let d = self.direction * n + normal * (n * cos_i - (T::one() - sin2_t).sqrt());
        Self::new(*hit, d)
    }

    /// Nearest intersection with a sphere in front of the origin.
    ///
    /// Only parameters in `[1e-4, 1e10]` count as hits. A tangent ray
    /// does not hit.
    pub fn intersect_sphere(&self, center: &Vector3<T>, radius: T) -> Option<Vector3<T>> {
        let min_t = nalgebra::convert::<f64, T>(MIN_T);
        let max_t = nalgebra::convert::<f64, T>(MAX_T);
        let two = nalgebra::convert::<f64, T>(2.0);
        let four = nalgebra::convert::<f64, T>(4.0);

        let m = self.origin - center;
        let a = self.direction.norm_squared();
        let b = two * self.direction.dot(&m);
        let c = m.norm_squared() - radius * radius;

        let discriminant = b * b - four * a * c;
        if discriminant <= T::zero() {
            return None;
        }

        let root = discriminant.sqrt();
        let mut t = (-b - root) / (two * a);
        if t < min_t {
            t = (-b + root) / (two * a);
        }
        if t < min_t || t > max_t {
            return None;
        }
        Some(self.evaluate(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3f;
    use approx::assert_relative_eq;

    #[test]
    fn test_evaluate() {
        let ray = Ray3f::new(Vec3f::new(1.0, 0.0, 0.0), Vec3f::new(0.0, 2.0, 0.0));
        assert_eq!(ray.evaluate(1.5), Vec3f::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn test_reflect_off_floor() {
        let ray = Ray3f::new(Vec3f::new(0.0, 1.0, 0.0), Vec3f::new(1.0, -1.0, 0.0));
        let hit = Vec3f::new(1.0, 0.0, 0.0);
        let out = ray.reflect(&hit, &Vec3f::new(0.0, 1.0, 0.0));
        assert_eq!(out.origin, hit);
        assert_relative_eq!(out.direction, Vec3f::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_same_medium_is_straight() {
        let d = Vec3f::new(0.6, -0.8, 0.0);
        let ray = Ray3f::new(Vec3f::zeros(), d);
        let out = ray.refract(&Vec3f::zeros(), &Vec3f::new(0.0, 1.0, 0.0), 1.5, 1.5);
        assert_relative_eq!(out.direction, d, epsilon = 1e-6);
    }

    #[test]
    fn test_intersect_sphere_from_outside() {
        let ray = Ray3f::new(Vec3f::new(0.0, 0.0, 5.0), Vec3f::new(0.0, 0.0, -1.0));
        let hit = ray.intersect_sphere(&Vec3f::zeros(), 1.0).unwrap();
        assert_relative_eq!(hit, Vec3f::new(0.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_intersect_sphere_from_inside_uses_far_root() {
        let ray = Ray3f::new(Vec3f::zeros(), Vec3f::new(1.0, 0.0, 0.0));
        let hit = ray.intersect_sphere(&Vec3f::zeros(), 2.0).unwrap();
        assert_relative_eq!(hit, Vec3f::new(2.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_intersect_sphere_miss_and_behind() {
        let miss = Ray3f::new(Vec3f::new(0.0, 5.0, 5.0), Vec3f::new(0.0, 0.0, -1.0));
        assert!(miss.intersect_sphere(&Vec3f::zeros(), 1.0).is_none());

        let behind = Ray3f::new(Vec3f::new(0.0, 0.0, 5.0), Vec3f::new(0.0, 0.0, 1.0));
        assert!(behind.intersect_sphere(&Vec3f::zeros(), 1.0).is_none());
    }
}
