//! An in-memory model assembled from parse events

use crate::error::Result;
use crate::events::{AttributeTag, ParseEvent, ParserCallbacks};
use crate::loader::ModelLoader;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use vgl_core::{BoundingBox, Vec3f};

/// One face corner: indices into the model's attribute lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexRef {
    pub coord: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

/// A polygon and the material active when it was read
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Face {
    pub vertices: Vec<VertexRef>,
    pub material: Option<usize>,
}

/// Surface properties from a `newmtl` block
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: Vec3f,
    pub diffuse: Vec3f,
    pub specular: Vec3f,
    pub transmissivity: Vec3f,
    pub dissolve: f32,
    pub specular_exponent: f32,
    pub ambient_map: Option<PathBuf>,
    pub diffuse_map: Option<PathBuf>,
    pub specular_map: Option<PathBuf>,
    pub dissolve_map: Option<PathBuf>,
    pub bump_map: Option<PathBuf>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: Vec3f::repeat(0.2),
            diffuse: Vec3f::repeat(0.8),
            specular: Vec3f::zeros(),
            transmissivity: Vec3f::repeat(1.0),
            dissolve: 1.0,
            specular_exponent: 0.0,
            ambient_map: None,
            diffuse_map: None,
            specular_map: None,
            dissolve_map: None,
            bump_map: None,
        }
    }

    /// Every texture map this material references
    pub fn texture_maps(&self) -> impl Iterator<Item = &Path> {
        [
            &self.ambient_map,
            &self.diffuse_map,
            &self.specular_map,
            &self.dissolve_map,
            &self.bump_map,
        ]
        .into_iter()
        .filter_map(|m| m.as_deref())
    }
}

/// A polygonal model with optional per-vertex attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub path: Option<PathBuf>,
    pub coords: Vec<Vec3f>,
    pub texcoords: Vec<Vec3f>,
    pub normals: Vec<Vec3f>,
    pub colors: Vec<Vec3f>,
    pub faces: Vec<Face>,
    pub materials: Vec<Material>,
}

impl Model {
    /// Load a model file through a [`ModelBuilder`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(&mut ModelLoader::new(), path)
    }

    /// Load a model file with a configured loader.
    pub fn load_with<P: AsRef<Path>>(loader: &mut ModelLoader<'_>, path: P) -> Result<Self> {
        let mut builder = ModelBuilder::new();
        loader.load(&mut builder, path)?;
        Ok(builder.build())
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(&self.coords)
    }

    /// Triangles produced by fanning every face
    pub fn triangle_count(&self) -> usize {
        self.faces
            .iter()
            .map(|f| f.vertices.len().saturating_sub(2))
            .sum()
    }

    pub fn material_index(&self, name: &str) -> Option<usize> {
        self.materials.iter().position(|m| m.name == name)
    }

    /// Distinct texture paths referenced by any material
    pub fn texture_paths(&self) -> BTreeSet<&Path> {
        self.materials.iter().flat_map(Material::texture_maps).collect()
    }

    /// Fan-triangulated corner triples of every face
    pub fn triangles(&self) -> impl Iterator<Item = [VertexRef; 3]> + '_ {
        self.faces.iter().flat_map(|face| {
            let v = &face.vertices;
            (1..v.len().saturating_sub(1)).map(move |i| [v[0], v[i], v[i + 1]])
        })
    }
}

/// Builds a [`Model`] from the event stream
#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: Model,
    open_material: Option<usize>,
    current_material: Option<usize>,
    face: Option<Face>,
    vertex: Option<VertexRef>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn build(self) -> Model {
        self.model
    }

    fn material_mut(&mut self) -> Option<&mut Material> {
        let index = self.open_material?;
        self.model.materials.get_mut(index)
    }

    fn vec3(&mut self, tag: AttributeTag, value: Vec3f) {
        if let Some(material) = self.material_mut() {
            match tag {
                AttributeTag::AmbientColor => material.ambient = value,
                AttributeTag::DiffuseColor => material.diffuse = value,
                AttributeTag::SpecularColor => material.specular = value,
                AttributeTag::Transmissivity => material.transmissivity = value,
                _ => {}
            }
            return;
        }
        match tag {
            AttributeTag::Coord => self.model.coords.push(value),
            AttributeTag::TexCoord => self.model.texcoords.push(value),
            AttributeTag::VertexNormal => self.model.normals.push(value),
            AttributeTag::Intensity => self.model.colors.push(value),
            _ => {}
        }
    }

    fn float(&mut self, tag: AttributeTag, value: f32) {
        if let Some(material) = self.material_mut() {
            match tag {
                AttributeTag::Dissolve => material.dissolve = value,
                AttributeTag::SpecularExponent => material.specular_exponent = value,
                _ => {}
            }
        }
    }

    fn texture(&mut self, tag: AttributeTag, path: PathBuf) {
        if let Some(material) = self.material_mut() {
            let slot = match tag {
                AttributeTag::AmbientColor => &mut material.ambient_map,
                AttributeTag::DiffuseColor => &mut material.diffuse_map,
                AttributeTag::SpecularColor => &mut material.specular_map,
                AttributeTag::Dissolve => &mut material.dissolve_map,
                AttributeTag::BumpMap => &mut material.bump_map,
                _ => return,
            };
            *slot = Some(path);
        }
    }

    fn index(&mut self, tag: AttributeTag, value: usize) {
        if let Some(vertex) = self.vertex.as_mut() {
            match tag {
                AttributeTag::CoordRef => vertex.coord = value,
                AttributeTag::TexCoordRef => vertex.texcoord = Some(value),
                AttributeTag::NormalRef => vertex.normal = Some(value),
                _ => {}
            }
        }
    }
}

impl ParserCallbacks for ModelBuilder {
    fn handle(&mut self, event: ParseEvent) {
        match event {
            ParseEvent::BeginModel(path) => self.model.path = Some(path),
            ParseEvent::EndModel => {}
            ParseEvent::BeginMaterial(name) => {
                self.model.materials.push(Material::new(name));
                self.open_material = Some(self.model.materials.len() - 1);
            }
            ParseEvent::EndMaterial => self.open_material = None,
            ParseEvent::BeginFace => {
                self.face = Some(Face {
                    vertices: Vec::new(),
                    material: self.current_material,
                })
            }
            ParseEvent::EndFace => {
                if let Some(face) = self.face.take() {
                    self.model.faces.push(face);
                }
            }
            ParseEvent::BeginVertex => self.vertex = Some(VertexRef::default()),
            ParseEvent::EndVertex => {
                if let (Some(vertex), Some(face)) = (self.vertex.take(), self.face.as_mut()) {
                    face.vertices.push(vertex);
                }
            }
            ParseEvent::Index(tag, value) => self.index(tag, value),
            ParseEvent::Float(tag, value) => self.float(tag, value),
            ParseEvent::Vec3(tag, value) => self.vec3(tag, value),
            ParseEvent::Texture(tag, path) => self.texture(tag, path),
            ParseEvent::Str(AttributeTag::MaterialName, name) => {
                self.current_material = self.model.material_index(&name);
            }
            ParseEvent::Vec2(..) | ParseEvent::Vec4(..) | ParseEvent::Str(..) => {}
        }
    }
}
