//! Core math types for vgl
//!
//! This crate provides the vector, quaternion, ray, plane, bounding box and
//! projection helpers shared by the model loaders and the camera models.

pub mod bounds;
pub mod error;
pub mod plane;
pub mod projection;
pub mod quaternion;
pub mod ray;
pub mod vector;

pub use bounds::*;
pub use error::*;
pub use plane::*;
pub use projection::*;
pub use quaternion::*;
pub use ray::*;
pub use vector::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Point3, Quaternion, UnitQuaternion, Vector2, Vector3, Vector4};
