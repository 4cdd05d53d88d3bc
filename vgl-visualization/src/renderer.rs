//! Scene rendering hook

use vgl_core::{Mat4f, Viewport};

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSetup {
    pub clear_color: [f32; 4],
    pub viewport: Viewport,
    pub projection: Mat4f,
    pub view: Mat4f,
}

/// Draws the scene for a [`Viewer`](crate::Viewer)
///
/// The viewer computes the camera matrices; the renderer is expected to
/// clear with `clear_color` and draw using `projection * view`.
pub trait Renderer {
    /// Called once when the viewer is created.
    fn setup(&mut self) {}

    fn render(&mut self, frame: &FrameSetup);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn setup(&mut self) {
        (**self).setup()
    }

    fn render(&mut self, frame: &FrameSetup) {
        (**self).render(frame)
    }
}
