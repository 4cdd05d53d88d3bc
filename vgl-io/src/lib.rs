//! Model and image loading for vgl
//!
//! Wavefront OBJ (with MTL material libraries) and PLY models are parsed into
//! a stream of [`ParseEvent`]s delivered to a [`ParserCallbacks`] sink. The
//! [`ModelBuilder`] sink assembles a complete [`Model`]; hosts with their own
//! mesh layout implement the trait directly. Raster images are decoded into
//! [`RawImage`] buffers.

pub mod error;
pub mod events;
pub mod loader;
pub mod model;
mod mtl;
mod obj;
mod ply;
pub mod raw_image;
pub mod scanner;
pub mod texture_cache;

pub use error::*;
pub use events::{AttributeTag, EventLog, ParseEvent, ParserCallbacks};
pub use loader::{load_model, ModelFormat, ModelLoader};
pub use model::{Face, Material, Model, ModelBuilder, VertexRef};
pub use ply::PlyFields;
pub use raw_image::{PixelFormat, RawImage};
pub use texture_cache::TextureCache;
