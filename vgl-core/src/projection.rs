//! Projection, view and unprojection matrices in OpenGL conventions

use crate::error::{Error, Result};
use crate::vector::{Mat4f, Vec3f, Vec4f};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A window-space viewport rectangle, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport anchored at the origin.
    pub fn with_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width over height; 1 for a degenerate viewport.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Perspective projection with a vertical field of view in degrees.
pub fn perspective(fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4f {
    Mat4f::new_perspective(aspect, fovy_degrees.to_radians(), near, far)
}

/// Orthographic projection onto the given clip box.
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4f {
    Mat4f::new_orthographic(left, right, bottom, top, near, far)
}

/// Right-handed view matrix looking from `eye` towards `target`.
pub fn look_at(eye: &Vec3f, target: &Vec3f, up: &Vec3f) -> Mat4f {
    Mat4f::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
}

/// Map a window coordinate back into world space.
///
/// `win_z` is the depth in `[0, 1]`. Fails when the combined matrix is
/// singular or the point lands at infinity.
pub fn unproject(win: &Vec3f, view: &Mat4f, projection: &Mat4f, viewport: &Viewport) -> Result<Vec3f> {
    let inverse = (projection * view)
        .try_inverse()
        .ok_or_else(|| Error::InvalidData("singular projection-view matrix".to_string()))?;

    if viewport.width == 0 || viewport.height == 0 {
        return Err(Error::InvalidData("empty viewport".to_string()));
    }

    let ndc = Vec4f::new(
        (win.x - viewport.x as f32) / viewport.width as f32 * 2.0 - 1.0,
        (win.y - viewport.y as f32) / viewport.height as f32 * 2.0 - 1.0,
        win.z * 2.0 - 1.0,
        1.0,
    );
    let out = inverse * ndc;
    if out.w == 0.0 {
        return Err(Error::InvalidData("unprojected point at infinity".to_string()));
    }
    Ok(out.xyz() / out.w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perspective_matches_glu_layout() {
        let m = perspective(90.0, 2.0, 1.0, 3.0);
        assert_relative_eq!(m[(0, 0)], 0.5, epsilon = 1e-6);
        assert_relative_eq!(m[(1, 1)], 1.0, epsilon = 1e-6);
        assert_relative_eq!(m[(2, 2)], -2.0, epsilon = 1e-6);
        assert_relative_eq!(m[(2, 3)], -3.0, epsilon = 1e-6);
        assert_relative_eq!(m[(3, 2)], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ortho_maps_corners() {
        let m = ortho(0.0, 100.0, 0.0, 50.0, -0.5, 0.5);
        let p = m * Vec4f::new(100.0, 50.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let eye = Vec3f::new(0.0, 0.0, 10.0);
        let view = look_at(&eye, &Vec3f::zeros(), &Vec3f::y());
        let p = view * Vec4f::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.xyz(), Vec3f::new(0.0, 0.0, -10.0), epsilon = 1e-5);
    }

    #[test]
    fn test_unproject_identity() {
        let vp = Viewport::with_size(200, 100);
        let p = unproject(
            &Vec3f::new(100.0, 50.0, 0.5),
            &Mat4f::identity(),
            &Mat4f::identity(),
            &vp,
        )
        .unwrap();
        assert_relative_eq!(p, Vec3f::zeros(), epsilon = 1e-6);
    }

    #[test]
    fn test_unproject_inverts_projection() {
        let vp = Viewport::with_size(640, 480);
        let view = look_at(&Vec3f::new(0.0, 0.0, 5.0), &Vec3f::zeros(), &Vec3f::y());
        let proj = perspective(30.0, vp.aspect(), 0.5, 10.0);

        let world = Vec3f::new(0.3, -0.2, 0.1);
        let clip = proj * view * world.push(1.0);
        let ndc = clip.xyz() / clip.w;
        let win = Vec3f::new(
            (ndc.x + 1.0) * 0.5 * vp.width as f32,
            (ndc.y + 1.0) * 0.5 * vp.height as f32,
            (ndc.z + 1.0) * 0.5,
        );

        let back = unproject(&win, &view, &proj, &vp).unwrap();
        assert_relative_eq!(back, world, epsilon = 1e-3);
    }

    #[test]
    fn test_unproject_singular_fails() {
        let vp = Viewport::with_size(10, 10);
        let result = unproject(&Vec3f::zeros(), &Mat4f::zeros(), &Mat4f::identity(), &vp);
        assert!(result.is_err());
    }
}
