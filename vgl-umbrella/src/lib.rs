//! # vgl
//!
//! Helpers that take the boilerplate out of small interactive 3D programs.
//!
//! This is the umbrella crate re-exporting the individual vgl crates. Depend
//! on those directly for finer control over what gets compiled.
//!
//! ## Features
//!
//! - **Core**: vectors, quaternions, rays, planes, bounding boxes and projection math
//! - **I/O**: event-driven OBJ/MTL/PLY parsing, model building and image loading
//! - **Visualization**: camera models and a windowing-agnostic viewer
//!
//! ## Quick Start
//!
//! ```no_run
//! use vgl::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = Model::load("bunny.obj")?;
//!
//! let mut camera = ArcballCamera::new(CameraState::default(), 800, 600);
//! camera.front_view(&model.bounds());
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables io and visualization
//! - `io`: Model and image loading
//! - `visualization`: Cameras and the viewer
//! - `all`: Enables all features

// Re-export core functionality
pub use vgl_core::*;

#[cfg(feature = "io")]
pub use vgl_io as io;

#[cfg(feature = "visualization")]
pub use vgl_visualization as visualization;

/// Convenient imports for common use cases
pub mod prelude {
    pub use vgl_core::{BoundingBox, Mat4f, Plane3f, Quatf, Ray3f, Vec2f, Vec3f, Vec4f, Viewport};

    #[cfg(feature = "io")]
    pub use vgl_io::{
        load_model, AttributeTag, EventLog, Material, Model, ModelLoader, ParseError, ParseErrorKind,
        ParseEvent, ParserCallbacks, RawImage, TextureCache,
    };

    #[cfg(feature = "visualization")]
    pub use vgl_visualization::{
        Action, ActionMapper, ArcballCamera, BackendRequest, BaseCamera, Camera, CameraState, FrameSetup,
        OrthoCamera, Renderer, Viewer, ViewerConfig,
    };
}
