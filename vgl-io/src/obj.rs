//! Wavefront OBJ support
//!
//! Each line is classified by its leading `[A-Za-z0-9]+` keyword. Geometry
//! statements are emitted as attribute events, `mtllib` loads the referenced
//! material libraries synchronously, and grouping statements are skipped.

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::events::{AttributeTag, ParseEvent, ParserCallbacks};
use crate::loader::{scan_lines, LoadContext};
use crate::mtl;
use crate::scanner::{resolve_path, LineScanner};
use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use vgl_core::Vec3f;

/// One face corner as written in the file, already resolved to 0-based indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FaceVertex {
    coord: usize,
    texcoord: Option<usize>,
    normal: Option<usize>,
}

/// Number of each element kind defined so far, for negative indices
#[derive(Debug, Default, Clone, Copy)]
struct ElementCounts {
    coords: usize,
    texcoords: usize,
    normals: usize,
}

/// Convert a 1-based (or negative, relative) OBJ index to a 0-based one.
fn resolve_index(raw: i64, defined: usize, what: &str) -> Result<usize> {
    if raw > 0 {
        return usize::try_from(raw - 1).map_err(|_| {
            ParseError::new(ParseErrorKind::InvalidIndex, format!("{} index {} is too large", what, raw))
        });
    }
    let back = raw.unsigned_abs();
    if raw == 0 || back > defined as u64 {
        return Err(ParseError::new(
            ParseErrorKind::InvalidIndex,
            format!("Invalid {} index {} ({} defined so far)", what, raw, defined),
        ));
    }
    Ok(defined - back as usize)
}

fn starts_index(ch: Option<u8>) -> bool {
    matches!(ch, Some(b'-' | b'+' | b'0'..=b'9'))
}

struct ObjParser<'p, 'a, C: ?Sized> {
    ctx: &'p mut LoadContext<'a>,
    callbacks: &'p mut C,
    base_dir: PathBuf,
    counts: ElementCounts,
    skipped: HashSet<String>,
}

impl<'p, 'a, C: ParserCallbacks + ?Sized> ObjParser<'p, 'a, C> {
    fn statement(&mut self, s: &mut LineScanner<'_>) -> Result<()> {
        s.eat_space(false)?;
        let keyword = s.token(|c| c.is_ascii_alphanumeric());
        match keyword.as_str() {
            "" => {}
            "v" => {
                let coord = parse_coord(s)?;
                self.counts.coords += 1;
                self.callbacks.handle(ParseEvent::Vec3(AttributeTag::Coord, coord));
            }
            "vt" => {
                let texcoord = parse_texcoord(s)?;
                self.counts.texcoords += 1;
                self.callbacks.handle(ParseEvent::Vec3(AttributeTag::TexCoord, texcoord));
            }
            "vn" => {
                let normal = parse_normal(s)?;
                self.counts.normals += 1;
                self.callbacks.handle(ParseEvent::Vec3(AttributeTag::VertexNormal, normal));
            }
            "f" | "fo" => self.face(s)?,
            "usemtl" => {
                s.eat_space(true)?;
                let name = s.parse_identifier()?;
                self.callbacks.handle(ParseEvent::Str(AttributeTag::MaterialName, name));
            }
            "mtllib" => self.mtllib(s)?,
            "vp" | "g" | "s" | "o" => {
                if self.skipped.insert(keyword.clone()) {
                    warn!("Ignoring unsupported OBJ statement '{}'", keyword);
                }
                s.skip_to_end();
            }
            _ => {
                return Err(ParseError::new(
                    ParseErrorKind::UnrecognizedStatement,
                    format!("Unknown line type: {}", keyword),
                ))
            }
        }
        Ok(())
    }

    fn face(&mut self, s: &mut LineScanner<'_>) -> Result<()> {
        let mut corners = Vec::new();
        while !s.at_end_or_comment() {
            s.eat_space(true)?;
            if !s.at_end_or_comment() {
                corners.push(self.face_vertex(s)?);
            }
        }

        self.callbacks.handle(ParseEvent::BeginFace);
        for corner in corners {
            self.callbacks.handle(ParseEvent::BeginVertex);
            self.callbacks
                .handle(ParseEvent::Index(AttributeTag::CoordRef, corner.coord));
            if let Some(t) = corner.texcoord {
                self.callbacks.handle(ParseEvent::Index(AttributeTag::TexCoordRef, t));
            }
            if let Some(n) = corner.normal {
                self.callbacks.handle(ParseEvent::Index(AttributeTag::NormalRef, n));
            }
            self.callbacks.handle(ParseEvent::EndVertex);
        }
        self.callbacks.handle(ParseEvent::EndFace);
        Ok(())
    }

    /// Parse `v`, `v/vt`, `v/vt/vn` or `v//vn`.
    fn face_vertex(&self, s: &mut LineScanner<'_>) -> Result<FaceVertex> {
        let coord = resolve_index(s.parse_int()?, self.counts.coords, "vertex")?;
        let mut texcoord = None;
        let mut normal = None;

        if s.peek() == Some(b'/') {
            s.eat_char(b'/')?;
            if starts_index(s.peek()) {
                texcoord = Some(resolve_index(s.parse_int()?, self.counts.texcoords, "texcoord")?);
            }
            if s.peek() == Some(b'/') {
                s.eat_char(b'/')?;
                if starts_index(s.peek()) {
                    normal = Some(resolve_index(s.parse_int()?, self.counts.normals, "normal")?);
                }
            }
        }

        Ok(FaceVertex {
            coord,
            texcoord,
            normal,
        })
    }

    fn mtllib(&mut self, s: &mut LineScanner<'_>) -> Result<()> {
        while !s.at_end_or_comment() {
            s.eat_space(true)?;
            if !s.at_end_or_comment() {
                let name = s.parse_filename(true)?;
                let path = resolve_path(&self.base_dir, &name);
                mtl::load_material_library(&mut *self.ctx, &mut *self.callbacks, &path)?;
            }
        }
        Ok(())
    }
}

/// `x y z [w]`, dividing through by `w` when present.
fn parse_coord(s: &mut LineScanner<'_>) -> Result<Vec3f> {
    s.eat_space(true)?;
    let x = s.parse_float()?;
    s.eat_space(true)?;
    let y = s.parse_float()?;
    s.eat_space(true)?;
    let z = s.parse_float()?;
    s.eat_space(false)?;
    if s.at_end_or_comment() {
        return Ok(Vec3f::new(x, y, z));
    }
    let w = s.parse_float()?;
    Ok(Vec3f::new(x / w, y / w, z / w))
}

/// `u [v [w]]` with missing components set to zero.
fn parse_texcoord(s: &mut LineScanner<'_>) -> Result<Vec3f> {
    let mut uvw = Vec3f::zeros();
    s.eat_space(true)?;
    uvw.x = s.parse_float()?;
    for i in 1..3 {
        s.eat_space(false)?;
        if s.at_end_or_comment() {
            break;
        }
        uvw[i] = s.parse_float()?;
    }
    Ok(uvw)
}

fn parse_normal(s: &mut LineScanner<'_>) -> Result<Vec3f> {
    let mut n = Vec3f::zeros();
    for i in 0..3 {
        s.eat_space(true)?;
        n[i] = s.parse_float()?;
    }
    Ok(n)
}

/// Parse an OBJ file, emitting everything between `BeginModel` and `EndModel`.
pub(crate) fn load_obj<C>(ctx: &mut LoadContext<'_>, callbacks: &mut C, path: &Path) -> Result<()>
where
    C: ParserCallbacks + ?Sized,
{
    debug!("Parsing OBJ {}", path.display());
    let mut parser = ObjParser {
        ctx,
        callbacks,
        base_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        counts: ElementCounts::default(),
        skipped: HashSet::new(),
    };
    scan_lines(path, |s| parser.statement(s))
}
