//! Camera models and a windowing-agnostic viewer
//!
//! This crate provides the interactive pieces of a small demo program:
//! - Base, arcball and orthographic cameras driven by mouse gestures
//! - A viewer that maps keyboard and mouse input to camera actions
//! - A renderer hook receiving per-frame projection and view matrices
//! - TOML viewer configuration

pub mod camera;
pub mod config;
pub mod renderer;
pub mod viewer;

pub use camera::*;
pub use config::*;
pub use renderer::*;
pub use viewer::*;
