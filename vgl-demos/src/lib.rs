//! Shared pieces of the vgl command-line demos

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use vgl::io::{AttributeTag, ParseEvent, ParserCallbacks};
use vgl::BoundingBox;

/// Set up `env_logger`, honouring `RUST_LOG` over the default level.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Statistics gathered straight from the parse event stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelStats {
    pub bounds: BoundingBox,
    pub vertices: usize,
    pub texcoords: usize,
    pub normals: usize,
    pub colors: usize,
    pub triangles: usize,
    pub quads: usize,
    pub polygons: usize,
    pub materials: usize,
    pub textures: BTreeSet<PathBuf>,
    in_material: bool,
    corners: usize,
}

impl ModelStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faces(&self) -> usize {
        self.triangles + self.quads + self.polygons
    }
}

impl ParserCallbacks for ModelStats {
    fn handle(&mut self, event: ParseEvent) {
        match event {
            ParseEvent::BeginMaterial(_) => {
                self.materials += 1;
                self.in_material = true;
            }
            ParseEvent::EndMaterial => self.in_material = false,
            ParseEvent::BeginFace => self.corners = 0,
            ParseEvent::BeginVertex => self.corners += 1,
            ParseEvent::EndFace => match self.corners {
                3 => self.triangles += 1,
                4 => self.quads += 1,
                _ => self.polygons += 1,
            },
            ParseEvent::Texture(_, path) => {
                self.textures.insert(path);
            }
            ParseEvent::Vec3(tag, v) if !self.in_material => match tag {
                AttributeTag::Coord => {
                    self.vertices += 1;
                    self.bounds.extend(&v);
                }
                AttributeTag::TexCoord => self.texcoords += 1,
                AttributeTag::VertexNormal => self.normals += 1,
                AttributeTag::Intensity => self.colors += 1,
                _ => {}
            },
            _ => {}
        }
    }
}

impl fmt::Display for ModelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bounds.is_empty() {
            writeln!(f, "Bounds:    (empty)")?;
        } else {
            let (lo, hi) = (self.bounds.low, self.bounds.high);
            writeln!(
                f,
                "Bounds:    ({}, {}, {}) - ({}, {}, {})",
                lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
            )?;
        }
        writeln!(
            f,
            "Faces:     {} ({} triangles, {} quads, {} polygons)",
            self.faces(),
            self.triangles,
            self.quads,
            self.polygons
        )?;
        writeln!(f, "Vertices:  {}", self.vertices)?;
        writeln!(f, "Texcoords: {}", self.texcoords)?;
        writeln!(f, "Normals:   {}", self.normals)?;
        writeln!(f, "Colors:    {}", self.colors)?;
        writeln!(f, "Materials: {}", self.materials)?;
        write!(f, "Textures:  {}", self.textures.len())
    }
}
