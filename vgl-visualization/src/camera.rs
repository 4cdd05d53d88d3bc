//! Camera models driven by mouse gestures
//!
//! Every gesture takes the previous and current pointer position in window
//! pixels, with y increasing downwards as windowing systems report it.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use vgl_core::{
    look_at, ortho, perspective, quat_inverse, quat_rotate, quat_rotation, rotate_x, rotate_y, unproject,
    BoundingBox, Mat4f, Ray3f, Vec3f, Viewport,
};

/// A pointer position in window pixels
pub type Pixel = (i32, i32);

/// Where a camera sits and how wide it sees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraState {
    pub position: Vec3f,
    pub target: Vec3f,
    pub up: Vec3f,
    /// Vertical field of view in degrees
    pub aperture: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3f::new(0.0, 0.0, 10.0),
            target: Vec3f::zeros(),
            up: Vec3f::y(),
            aperture: 30.0,
        }
    }
}

/// Shared camera interface used by the viewer
///
/// Implementors only provide access to their [`BaseCamera`]; every gesture
/// defaults to the base behaviour and can be overridden individually.
pub trait Camera: fmt::Debug {
    fn base(&self) -> &BaseCamera;
    fn base_mut(&mut self) -> &mut BaseCamera;

    /// Turn the camera in place.
    fn pan(&mut self, prev: Pixel, curr: Pixel) {
        self.base_mut().pan(prev, curr)
    }

    /// Orbit the camera around its target.
    fn roll(&mut self, prev: Pixel, curr: Pixel) {
        self.base_mut().roll(prev, curr)
    }

    /// Translate the camera and its target sideways.
    fn move_by(&mut self, prev: Pixel, curr: Pixel) {
        self.base_mut().move_by(prev, curr)
    }

    /// Translate the camera and its target along Z.
    fn dolly(&mut self, prev: Pixel, curr: Pixel) {
        self.base_mut().dolly(prev, curr)
    }

    /// Change the field of view.
    fn zoom(&mut self, prev: Pixel, curr: Pixel) {
        self.base_mut().zoom(prev, curr)
    }

    fn center_view(&mut self, bounds: &BoundingBox) {
        self.base_mut().center_view(bounds)
    }

    fn front_view(&mut self, bounds: &BoundingBox) {
        self.base_mut().front_view(bounds)
    }

    fn back_view(&mut self, bounds: &BoundingBox) {
        self.base_mut().back_view(bounds)
    }

    fn left_view(&mut self, bounds: &BoundingBox) {
        self.base_mut().left_view(bounds)
    }

    fn right_view(&mut self, bounds: &BoundingBox) {
        self.base_mut().right_view(bounds)
    }

    fn top_view(&mut self, bounds: &BoundingBox) {
        self.base_mut().top_view(bounds)
    }

    fn bottom_view(&mut self, bounds: &BoundingBox) {
        self.base_mut().bottom_view(bounds)
    }

    /// Restore the state the camera was created with.
    fn reset(&mut self) {
        self.base_mut().reset()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.base_mut().resize(width, height)
    }

    fn projection_matrix(&self) -> Mat4f {
        self.base().projection_matrix()
    }

    fn view_matrix(&self) -> Mat4f {
        self.base().view_matrix()
    }

    fn state(&self) -> &CameraState {
        &self.base().state
    }
}

/// Perspective camera with closed-form gesture handling
#[derive(Debug, Clone, PartialEq)]
pub struct BaseCamera {
    state: CameraState,
    home: CameraState,
    width: u32,
    height: u32,
}

impl BaseCamera {
    /// Camera at (0, 0, 10) looking at the origin.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_state(CameraState::default(), width, height)
    }

    pub fn with_state(state: CameraState, width: u32, height: u32) -> Self {
        Self {
            state,
            home: state,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CameraState {
        &mut self.state
    }

    pub fn home(&self) -> &CameraState {
        &self.home
    }

    /// Make the current state the one [`reset`](Self::reset) returns to.
    pub fn set_home(&mut self) {
        self.home = self.state;
    }

    pub fn reset(&mut self) {
        self.state = self.home;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::with_size(self.width as i32, self.height as i32)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Distance between the eye and the target
    pub fn distance(&self) -> f32 {
        (self.state.target - self.state.position).norm()
    }

    fn half_delta(prev: Pixel, curr: Pixel) -> (f32, f32) {
        ((curr.0 - prev.0) as f32 / 2.0, (curr.1 - prev.1) as f32 / 2.0)
    }

    fn normalized_delta(&self, prev: Pixel, curr: Pixel) -> (f32, f32) {
        (
            (curr.0 - prev.0) as f32 / self.width as f32,
            (curr.1 - prev.1) as f32 / self.height as f32,
        )
    }

    /// Horizontal delta when it dominates, otherwise the vertical one flipped.
    fn dominant_delta(&self, prev: Pixel, curr: Pixel) -> f32 {
        let (dx, dy) = self.normalized_delta(prev, curr);
        if dx.abs() >= dy.abs() {
            dx
        } else {
            -dy
        }
    }

    fn turn(v: &Vec3f, dx: f32, dy: f32) -> Vec3f {
        let v = rotate_x(v, dy / (2.0 * PI));
        rotate_y(&v, dx / (2.0 * PI))
    }

    pub fn pan(&mut self, prev: Pixel, curr: Pixel) {
        let (dx, dy) = Self::half_delta(prev, curr);
        let view = self.state.target - self.state.position;
        self.state.target = Self::turn(&view, dx, dy) + self.state.position;
    }

    pub fn roll(&mut self, prev: Pixel, curr: Pixel) {
        let (dx, dy) = Self::half_delta(prev, curr);
        let view = self.state.position - self.state.target;
        self.state.position = Self::turn(&view, dx, dy) + self.state.target;
    }

    pub fn move_by(&mut self, prev: Pixel, curr: Pixel) {
        let (dx, dy) = self.normalized_delta(prev, curr);
        let delta = Vec3f::new(dx, dy, 0.0);
        self.state.position += delta;
        self.state.target += delta;
    }

    pub fn dolly(&mut self, prev: Pixel, curr: Pixel) {
        let dz = self.dominant_delta(prev, curr) * 2.0;
        self.state.position.z += dz;
        self.state.target.z += dz;
    }

    pub fn zoom(&mut self, prev: Pixel, curr: Pixel) {
        let dz = self.dominant_delta(prev, curr) * -2.0;
        self.state.aperture *= 1.1f32.powf(dz);
    }

    /// Eye distance at which a `u` by `v` extent fills the field of view.
    fn distance_from(&self, extent_u: f32, extent_v: f32) -> f32 {
        let opposite = extent_u.max(extent_v) / 2.0;
        let angle = (self.state.aperture / 2.0).to_radians();
        opposite / angle.tan()
    }

    fn look_from(&mut self, bounds: &BoundingBox, offset: Vec3f, up: Vec3f) {
        self.state.target = bounds.center();
        self.state.position = self.state.target + offset;
        self.state.up = up;
    }

    pub fn center_view(&mut self, bounds: &BoundingBox) {
        let size = bounds.size();
        self.look_from(bounds, Vec3f::new(0.0, 0.0, size.z / 10.0), Vec3f::y());
    }

    pub fn front_view(&mut self, bounds: &BoundingBox) {
        let size = bounds.size();
        let d = size.z / 2.0 + self.distance_from(size.x, size.y);
        self.look_from(bounds, Vec3f::new(0.0, 0.0, d), Vec3f::y());
    }

    pub fn back_view(&mut self, bounds: &BoundingBox) {
        let size = bounds.size();
        let d = size.z / 2.0 + self.distance_from(size.x, size.y);
        self.look_from(bounds, Vec3f::new(0.0, 0.0, -d), Vec3f::y());
    }

    pub fn left_view(&mut self, bounds: &BoundingBox) {
        let size = bounds.size();
        let d = size.x / 2.0 + self.distance_from(size.z, size.y);
        self.look_from(bounds, Vec3f::new(-d, 0.0, 0.0), Vec3f::y());
    }

    pub fn right_view(&mut self, bounds: &BoundingBox) {
        let size = bounds.size();
        let d = size.x / 2.0 + self.distance_from(size.z, size.y);
        self.look_from(bounds, Vec3f::new(d, 0.0, 0.0), Vec3f::y());
    }

    pub fn top_view(&mut self, bounds: &BoundingBox) {
        let size = bounds.size();
        let d = size.y + self.distance_from(size.x, size.z);
        self.look_from(bounds, Vec3f::new(0.0, d, 0.0), -Vec3f::z());
    }

    pub fn bottom_view(&mut self, bounds: &BoundingBox) {
        let size = bounds.size();
        let d = size.y + self.distance_from(size.x, size.z);
        self.look_from(bounds, Vec3f::new(0.0, -d, 0.0), Vec3f::z());
    }

    /// Perspective projection with clip planes at 0.1 and 2 times the eye distance.
    pub fn projection_matrix(&self) -> Mat4f {
        let d = self.distance();
        perspective(self.state.aperture, self.viewport().aspect(), d * 0.1, d * 2.0)
    }

    pub fn view_matrix(&self) -> Mat4f {
        look_at(&self.state.position, &self.state.target, &self.state.up)
    }

    /// World position under a window pixel at the given depth.
    ///
    /// `y` must already be flipped to increase upwards.
    fn unproject(&self, x: i32, y: i32, depth: f32) -> Option<Vec3f> {
        let win = Vec3f::new(x as f32, y as f32, depth);
        unproject(&win, &self.view_matrix(), &self.projection_matrix(), &self.viewport()).ok()
    }

    fn flip_y(&self, p: Pixel) -> Pixel {
        (p.0, self.height as i32 - 1 - p.1)
    }
}

impl Camera for BaseCamera {
    fn base(&self) -> &BaseCamera {
        self
    }

    fn base_mut(&mut self) -> &mut BaseCamera {
        self
    }
}

/// Camera that orbits its target as if dragging a virtual trackball
#[derive(Debug, Clone, PartialEq)]
pub struct ArcballCamera {
    base: BaseCamera,
}

impl ArcballCamera {
    const SPHERE_RADIUS: f32 = 1.0;
    const MOVE_DEPTH: f32 = 0.6;

    pub fn new(state: CameraState, width: u32, height: u32) -> Self {
        Self {
            base: BaseCamera::with_state(state, width, height),
        }
    }

    /// Point where the eye ray through `pixel` meets the trackball sphere.
    fn sphere_hit(&self, pixel: Pixel) -> Option<Vec3f> {
        let (x, y) = self.base.flip_y(pixel);
        let on_screen = self.base.unproject(x, y, 0.5)?;
        let eye = self.base.state.position;
        Ray3f::new(eye, on_screen - eye).intersect_sphere(&self.base.state.target, Self::SPHERE_RADIUS)
    }
}

impl Camera for ArcballCamera {
    fn base(&self) -> &BaseCamera {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseCamera {
        &mut self.base
    }

    fn roll(&mut self, prev: Pixel, curr: Pixel) {
        if prev == curr {
            return;
        }
        let (Some(prev_hit), Some(curr_hit)) = (self.sphere_hit(prev), self.sphere_hit(curr)) else {
            return;
        };

        let target = self.base.state.target;
        let from = prev_hit - target;
        let to = curr_hit - target;
        let Some(axis) = from.cross(&to).try_normalize(f32::EPSILON) else {
            return;
        };
        let cos = from.normalize().dot(&to.normalize()).clamp(-1.0, 1.0);

        // The camera moves, not the scene, so the rotation is inverted.
        let Some(q) = quat_inverse(&quat_rotation(&axis, cos.acos())) else {
            return;
        };
        self.base.state.position = quat_rotate(&q, &(self.base.state.position - target)) + target;
    }

    fn move_by(&mut self, prev: Pixel, curr: Pixel) {
        if prev == curr {
            return;
        }
        let (px, py) = self.base.flip_y(prev);
        let (cx, cy) = self.base.flip_y(curr);
        let (Some(from), Some(to)) = (
            self.base.unproject(px, py, Self::MOVE_DEPTH),
            self.base.unproject(cx, cy, Self::MOVE_DEPTH),
        ) else {
            return;
        };

        let delta = to - from;
        self.base.state.position -= delta;
        self.base.state.target -= delta;
    }
}

/// Pixel-aligned orthographic camera for 2D overlays
#[derive(Debug, Clone, PartialEq)]
pub struct OrthoCamera {
    base: BaseCamera,
}

impl OrthoCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            base: BaseCamera::new(width, height),
        }
    }
}

impl Camera for OrthoCamera {
    fn base(&self) -> &BaseCamera {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseCamera {
        &mut self.base
    }

    fn projection_matrix(&self) -> Mat4f {
        let vp = self.base.viewport();
        ortho(
            vp.x as f32,
            vp.width as f32,
            vp.y as f32,
            vp.height as f32,
            -0.5,
            0.5,
        )
    }

    fn view_matrix(&self) -> Mat4f {
        Mat4f::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vgl_core::Vec4f;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Vec3f::repeat(-1.0), Vec3f::repeat(1.0))
    }

    fn arcball() -> ArcballCamera {
        let state = CameraState {
            position: Vec3f::new(0.0, 0.0, 5.0),
            ..CameraState::default()
        };
        ArcballCamera::new(state, 100, 100)
    }

    #[test]
    fn test_default_state() {
        let cam = BaseCamera::new(640, 480);
        assert_eq!(cam.state().position, Vec3f::new(0.0, 0.0, 10.0));
        assert_eq!(cam.state().target, Vec3f::zeros());
        assert_eq!(cam.state().up, Vec3f::y());
        assert_eq!(cam.state().aperture, 30.0);
        assert_relative_eq!(cam.distance(), 10.0);
    }

    #[test]
    fn test_roll_orbits_target() {
        let mut cam = BaseCamera::new(100, 100);
        cam.roll((0, 0), (20, 0));
        assert_relative_eq!(cam.distance(), 10.0, epsilon = 1e-4);
        assert_eq!(cam.state().target, Vec3f::zeros());
        assert!(cam.state().position.x.abs() > 1.0);
    }

    #[test]
    fn test_pan_keeps_position() {
        let mut cam = BaseCamera::new(100, 100);
        cam.pan((0, 0), (0, 20));
        assert_eq!(cam.state().position, Vec3f::new(0.0, 0.0, 10.0));
        assert_relative_eq!(cam.distance(), 10.0, epsilon = 1e-4);
        assert!(cam.state().target.y.abs() > 1.0);
    }

    #[test]
    fn test_move_translates_by_viewport_fraction() {
        let mut cam = BaseCamera::new(200, 100);
        cam.move_by((0, 0), (50, 25));
        assert_relative_eq!(cam.state().position, Vec3f::new(0.25, 0.25, 10.0));
        assert_relative_eq!(cam.state().target, Vec3f::new(0.25, 0.25, 0.0));
    }

    #[test]
    fn test_dolly_uses_dominant_axis() {
        let mut cam = BaseCamera::new(100, 100);
        cam.dolly((0, 0), (50, 10));
        assert_relative_eq!(cam.state().position.z, 11.0);
        assert_relative_eq!(cam.state().target.z, 1.0);

        cam.dolly((0, 0), (10, 50));
        assert_relative_eq!(cam.state().position.z, 10.0);
    }

    #[test]
    fn test_zoom_scales_aperture() {
        let mut cam = BaseCamera::new(100, 100);
        cam.zoom((0, 0), (100, 0));
        assert_relative_eq!(cam.state().aperture, 30.0 * 1.1f32.powf(-2.0), epsilon = 1e-4);
        cam.zoom((0, 0), (-100, 0));
        assert_relative_eq!(cam.state().aperture, 30.0, epsilon = 1e-4);
    }

    #[test]
    fn test_canned_views() {
        let mut cam = BaseCamera::new(100, 100);
        let bounds = unit_box();
        let fit = 1.0 / 15f32.to_radians().tan();

        cam.front_view(&bounds);
        assert_eq!(cam.state().target, Vec3f::zeros());
        assert_relative_eq!(cam.state().position, Vec3f::new(0.0, 0.0, 1.0 + fit), epsilon = 1e-4);

        cam.back_view(&bounds);
        assert_relative_eq!(cam.state().position, Vec3f::new(0.0, 0.0, -1.0 - fit), epsilon = 1e-4);

        cam.left_view(&bounds);
        assert_relative_eq!(cam.state().position, Vec3f::new(-1.0 - fit, 0.0, 0.0), epsilon = 1e-4);

        cam.right_view(&bounds);
        assert_relative_eq!(cam.state().position, Vec3f::new(1.0 + fit, 0.0, 0.0), epsilon = 1e-4);

        cam.top_view(&bounds);
        assert_relative_eq!(cam.state().position, Vec3f::new(0.0, 2.0 + fit, 0.0), epsilon = 1e-4);
        assert_eq!(cam.state().up, -Vec3f::z());

        cam.bottom_view(&bounds);
        assert_relative_eq!(cam.state().position, Vec3f::new(0.0, -2.0 - fit, 0.0), epsilon = 1e-4);
        assert_eq!(cam.state().up, Vec3f::z());

        cam.center_view(&bounds);
        assert_relative_eq!(cam.state().position, Vec3f::new(0.0, 0.0, 0.2), epsilon = 1e-6);
    }

    #[test]
    fn test_reset_restores_home() {
        let mut cam = BaseCamera::new(100, 100);
        cam.zoom((0, 0), (30, 0));
        cam.front_view(&unit_box());
        Camera::reset(&mut cam);
        assert_eq!(cam.state(), &CameraState::default());

        cam.dolly((0, 0), (50, 0));
        cam.set_home();
        cam.roll((0, 0), (40, 40));
        cam.reset();
        assert_relative_eq!(cam.state().position.z, 11.0);
    }

    #[test]
    fn test_projection_clip_planes_follow_distance() {
        let cam = BaseCamera::new(100, 100);
        let p = cam.projection_matrix();
        // A point on the near plane maps to depth -1.
        let near = p * Vec4f::new(0.0, 0.0, -1.0, 1.0);
        assert_relative_eq!(near.z / near.w, -1.0, epsilon = 1e-4);
        let far = p * Vec4f::new(0.0, 0.0, -20.0, 1.0);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_arcball_roll_preserves_distance() {
        let mut cam = arcball();
        cam.roll((50, 50), (55, 50));
        let pos = cam.state().position;
        assert_relative_eq!(pos.norm(), 5.0, epsilon = 1e-3);
        assert!(pos.x < 0.0);
        assert_eq!(cam.state().target, Vec3f::zeros());
    }

    #[test]
    fn test_arcball_roll_noop_cases() {
        let mut cam = arcball();
        cam.roll((50, 50), (50, 50));
        assert_eq!(cam.state().position, Vec3f::new(0.0, 0.0, 5.0));

        // Both corners miss the unit sphere.
        cam.roll((0, 0), (99, 0));
        assert_eq!(cam.state().position, Vec3f::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_arcball_move_is_opposite_to_drag() {
        let mut cam = arcball();
        cam.move_by((50, 50), (60, 50));
        let state = cam.state();
        assert!(state.position.x < 0.0);
        assert_relative_eq!(state.position.x, state.target.x, epsilon = 1e-5);
        assert_relative_eq!((state.target - state.position).norm(), 5.0, epsilon = 1e-4);

        let mut cam = arcball();
        cam.move_by((50, 50), (50, 40));
        assert!(cam.state().position.y < 0.0);
    }

    #[test]
    fn test_ortho_camera_matrices() {
        let mut cam = OrthoCamera::new(200, 100);
        assert_eq!(cam.view_matrix(), Mat4f::identity());
        let corner = cam.projection_matrix() * Vec4f::new(200.0, 100.0, 0.0, 1.0);
        assert_relative_eq!(corner.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(corner.y, 1.0, epsilon = 1e-6);

        cam.resize(400, 100);
        let corner = cam.projection_matrix() * Vec4f::new(200.0, 100.0, 0.0, 1.0);
        assert_relative_eq!(corner.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_resize_clamps_to_one_pixel() {
        let mut cam = BaseCamera::new(0, 0);
        assert_eq!(cam.size(), (1, 1));
        cam.resize(320, 0);
        assert_eq!(cam.size(), (320, 1));
    }
}
