//! PLY format support
//!
//! Parsing is delegated to `ply-rs`; this module only maps vertex and face
//! records onto parse events.

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::events::{AttributeTag, ParseEvent, ParserCallbacks};
use crate::loader::open_file;
use bitflags::bitflags;
use log::debug;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, ElementDef, Property};
use std::io::BufReader;
use std::path::Path;
use vgl_core::Vec3f;

bitflags! {
    /// Optional per-vertex properties present in a PLY header
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PlyFields: u16 {
        const U = 1 << 0;
        const V = 1 << 1;
        const NX = 1 << 2;
        const NY = 1 << 3;
        const NZ = 1 << 4;
        const RED = 1 << 5;
        const GREEN = 1 << 6;
        const BLUE = 1 << 7;
        const INTENSITY = 1 << 8;

        const TEXCOORD = Self::U.bits() | Self::V.bits();
        const NORMAL = Self::NX.bits() | Self::NY.bits() | Self::NZ.bits();
        const RGB = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
    }
}

impl PlyFields {
    /// Flags for the named properties of a vertex element.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        names
            .into_iter()
            .fold(Self::empty(), |fields, name| match name {
                "u" => fields | Self::U,
                "v" => fields | Self::V,
                "nx" => fields | Self::NX,
                "ny" => fields | Self::NY,
                "nz" => fields | Self::NZ,
                "red" => fields | Self::RED,
                "green" => fields | Self::GREEN,
                "blue" => fields | Self::BLUE,
                "intensity" => fields | Self::INTENSITY,
                _ => fields,
            })
    }

    fn from_element(element: &ElementDef) -> Self {
        Self::from_names(element.properties.keys().map(String::as_str))
    }

    pub fn has_texcoords(self) -> bool {
        self.contains(Self::TEXCOORD)
    }

    pub fn has_normals(self) -> bool {
        self.contains(Self::NORMAL)
    }

    pub fn has_rgb(self) -> bool {
        self.contains(Self::RGB)
    }

    pub fn has_intensity(self) -> bool {
        self.contains(Self::INTENSITY)
    }
}

/// Extract a scalar property value as f32 from a PLY element
fn scalar(element: &DefaultElement, name: &str) -> Option<f32> {
    match element.get(name)? {
        Property::Char(v) => Some(*v as f32),
        Property::UChar(v) => Some(*v as f32),
        Property::Short(v) => Some(*v as f32),
        Property::UShort(v) => Some(*v as f32),
        Property::Int(v) => Some(*v as f32),
        Property::UInt(v) => Some(*v as f32),
        Property::Float(v) => Some(*v),
        Property::Double(v) => Some(*v as f32),
        _ => None,
    }
}

/// Colour channels stored as unsigned integers are scaled into [0, 1].
fn color_channel(element: &DefaultElement, name: &str) -> Option<f32> {
    match element.get(name)? {
        Property::UChar(v) => Some(*v as f32 / u8::MAX as f32),
        Property::UShort(v) => Some(*v as f32 / u16::MAX as f32),
        _ => scalar(element, name),
    }
}

fn required(element: &DefaultElement, name: &str, index: usize) -> Result<f32> {
    scalar(element, name).ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::MissingProperty,
            format!("Vertex {} has no numeric '{}' property", index, name),
        )
    })
}

/// Extract face indices from a PLY face element
fn face_indices(element: &DefaultElement, index: usize) -> Result<Vec<i64>> {
    let indices: Vec<i64> = match element.get("vertex_indices").or_else(|| element.get("vertex_index")) {
        Some(Property::ListInt(v)) => v.iter().map(|&i| i as i64).collect(),
        Some(Property::ListUInt(v)) => v.iter().map(|&i| i as i64).collect(),
        Some(Property::ListShort(v)) => v.iter().map(|&i| i as i64).collect(),
        Some(Property::ListUShort(v)) => v.iter().map(|&i| i as i64).collect(),
        Some(Property::ListChar(v)) => v.iter().map(|&i| i as i64).collect(),
        Some(Property::ListUChar(v)) => v.iter().map(|&i| i as i64).collect(),
        _ => {
            return Err(ParseError::new(
                ParseErrorKind::MissingProperty,
                format!("Face {} has no vertex index list", index),
            ))
        }
    };
    Ok(indices)
}

fn emit_vertices<C>(callbacks: &mut C, rows: &[DefaultElement], fields: PlyFields) -> Result<()>
where
    C: ParserCallbacks + ?Sized,
{
    for (i, row) in rows.iter().enumerate() {
        let coord = Vec3f::new(required(row, "x", i)?, required(row, "y", i)?, required(row, "z", i)?);
        callbacks.handle(ParseEvent::Vec3(AttributeTag::Coord, coord));

        if fields.has_texcoords() {
            let uv = Vec3f::new(required(row, "u", i)?, required(row, "v", i)?, 0.0);
            callbacks.handle(ParseEvent::Vec3(AttributeTag::TexCoord, uv));
        }
        if fields.has_normals() {
            let n = Vec3f::new(required(row, "nx", i)?, required(row, "ny", i)?, required(row, "nz", i)?);
            callbacks.handle(ParseEvent::Vec3(AttributeTag::VertexNormal, n));
        }

        let color = if fields.has_rgb() {
            match (
                color_channel(row, "red"),
                color_channel(row, "green"),
                color_channel(row, "blue"),
            ) {
                (Some(r), Some(g), Some(b)) => Some(Vec3f::new(r, g, b)),
                _ => None,
            }
        } else if fields.has_intensity() {
            scalar(row, "intensity").map(Vec3f::repeat)
        } else {
            None
        };
        if let Some(color) = color {
            callbacks.handle(ParseEvent::Vec3(AttributeTag::Intensity, color));
        }
    }
    Ok(())
}

fn emit_faces<C>(callbacks: &mut C, rows: &[DefaultElement], fields: PlyFields) -> Result<()>
where
    C: ParserCallbacks + ?Sized,
{
    for (i, row) in rows.iter().enumerate() {
        let corners = face_indices(row, i)?
            .into_iter()
            .map(|raw| {
                usize::try_from(raw).map_err(|_| {
                    ParseError::new(
                        ParseErrorKind::InvalidIndex,
                        format!("Face {} has invalid vertex index {}", i, raw),
                    )
                })
            })
            .collect::<Result<Vec<usize>>>()?;

        callbacks.handle(ParseEvent::BeginFace);
        for v in corners {
            callbacks.handle(ParseEvent::BeginVertex);
            callbacks.handle(ParseEvent::Index(AttributeTag::CoordRef, v));
            if fields.has_texcoords() {
                callbacks.handle(ParseEvent::Index(AttributeTag::TexCoordRef, v));
            }
            if fields.has_normals() {
                callbacks.handle(ParseEvent::Index(AttributeTag::NormalRef, v));
            }
            callbacks.handle(ParseEvent::EndVertex);
        }
        callbacks.handle(ParseEvent::EndFace);
    }
    Ok(())
}

/// Read a PLY file and emit its vertices and faces in header order.
pub(crate) fn load_ply<C>(callbacks: &mut C, path: &Path) -> Result<()>
where
    C: ParserCallbacks + ?Sized,
{
    let mut reader = BufReader::new(open_file(path)?);
    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(&mut reader).map_err(|err| {
        ParseError::new(
            ParseErrorKind::Io,
            format!("Unable to read PLY file {}: {}", path.display(), err),
        )
    })?;

    let fields = ply
        .header
        .elements
        .get("vertex")
        .map(PlyFields::from_element)
        .unwrap_or_else(PlyFields::empty);
    debug!("PLY {} vertex fields: {:?}", path.display(), fields);

    for name in ply.header.elements.keys() {
        let rows = ply.payload.get(name).map(Vec::as_slice).unwrap_or_default();
        match name.as_str() {
            "vertex" => emit_vertices(callbacks, rows, fields)?,
            "face" => emit_faces(callbacks, rows, fields)?,
            other => debug!("Skipping PLY element '{}' ({} rows)", other, rows.len()),
        }
    }
    Ok(())
}
