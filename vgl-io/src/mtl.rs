//! Wavefront MTL material library support

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::events::{AttributeTag, ParseEvent, ParserCallbacks};
use crate::loader::{scan_lines, LoadContext};
use crate::scanner::{resolve_path, LineScanner};
use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use vgl_core::Vec3f;

/// Recognised keywords that carry no event yet
const IGNORED_PROPERTIES: &[&str] = &["ke", "km", "ni", "illum", "tr", "map_ke", "map_km"];

struct MtlParser<'p, 'a, C: ?Sized> {
    ctx: &'p mut LoadContext<'a>,
    callbacks: &'p mut C,
    base_dir: PathBuf,
    material_open: bool,
    skipped: HashSet<String>,
}

impl<'p, 'a, C: ParserCallbacks + ?Sized> MtlParser<'p, 'a, C> {
    fn statement(&mut self, s: &mut LineScanner<'_>) -> Result<()> {
        s.eat_space(false)?;
        let keyword = s.token(|c| c == b'_' || c.is_ascii_alphanumeric());
        let lowered = keyword.to_ascii_lowercase();

        match lowered.as_str() {
            "" => {}
            "newmtl" => self.new_material(s)?,
            "ka" => self.color(s, AttributeTag::AmbientColor)?,
            "kd" => self.color(s, AttributeTag::DiffuseColor)?,
            "ks" => self.color(s, AttributeTag::SpecularColor)?,
            "tf" => self.color(s, AttributeTag::Transmissivity)?,
            "d" => self.scalar(s, AttributeTag::Dissolve)?,
            "ns" => self.scalar(s, AttributeTag::SpecularExponent)?,
            "map_ka" => self.texture(s, AttributeTag::AmbientColor)?,
            "map_kd" => self.texture(s, AttributeTag::DiffuseColor)?,
            "map_ks" => self.texture(s, AttributeTag::SpecularColor)?,
            "map_d" => self.texture(s, AttributeTag::Dissolve)?,
            "map_bump" | "bump" => self.texture(s, AttributeTag::BumpMap)?,
            other if IGNORED_PROPERTIES.contains(&other) => {
                self.require_material()?;
                if self.skipped.insert(lowered.clone()) {
                    warn!("Ignoring unsupported MTL property '{}'", keyword);
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

    fn close_material(&mut self) {
        if self.material_open {
            self.callbacks.handle(ParseEvent::EndMaterial);
            self.material_open = false;
        }
    }

    fn new_material(&mut self, s: &mut LineScanner<'_>) -> Result<()> {
        self.close_material();
        s.eat_space(true)?;
        let name = s.parse_identifier()?;
        if !self.ctx.material_names.insert(name.clone()) {
            return Err(ParseError::new(
                ParseErrorKind::RedefinedMaterial,
                format!("Redefinition of material {}", name),
            ));
        }
        self.callbacks.handle(ParseEvent::BeginMaterial(name));
        self.material_open = true;
        Ok(())
    }

    fn require_material(&self) -> Result<()> {
        if self.material_open {
            Ok(())
        } else {
            Err(ParseError::new(
                ParseErrorKind::PropertyWithoutMaterial,
                "Defining a material property without declaring a material name.",
            ))
        }
    }

    /// One value expands to grey; otherwise exactly three.
    fn color(&mut self, s: &mut LineScanner<'_>, tag: AttributeTag) -> Result<()> {
        self.require_material()?;
        s.eat_space(true)?;
        let r = s.parse_float()?;
        s.eat_space(false)?;
        let color = if s.at_end_or_comment() {
            Vec3f::repeat(r)
        } else {
            let g = s.parse_float()?;
            s.eat_space(true)?;
            let b = s.parse_float()?;
            Vec3f::new(r, g, b)
        };
        self.callbacks.handle(ParseEvent::Vec3(tag, color));
        Ok(())
    }

    fn scalar(&mut self, s: &mut LineScanner<'_>, tag: AttributeTag) -> Result<()> {
        self.require_material()?;
        s.eat_space(true)?;
        let value = s.parse_float()?;
        self.callbacks.handle(ParseEvent::Float(tag, value));
        Ok(())
    }

    fn texture(&mut self, s: &mut LineScanner<'_>, tag: AttributeTag) -> Result<()> {
        self.require_material()?;
        s.eat_space(true)?;
        let name = s.parse_filename(false)?;
        let path = resolve_path(&self.base_dir, &name);
        if let Some(cache) = self.ctx.texture_cache.as_deref_mut() {
            cache.load(&path)?;
        }
        self.callbacks.handle(ParseEvent::Texture(tag, path));
        Ok(())
    }
}

/// Parse a material library, emitting `BeginMaterial`/`EndMaterial` blocks.
///
/// Material names must be unique across every library read by the same load.
pub(crate) fn load_material_library<C>(
    ctx: &mut LoadContext<'_>,
    callbacks: &mut C,
    path: &Path,
) -> Result<()>
where
    C: ParserCallbacks + ?Sized,
{
    debug!("Loading mtllib {}", path.display());
    let mut parser = MtlParser {
        ctx,
        callbacks,
        base_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        material_open: false,
        skipped: HashSet::new(),
    };
    scan_lines(path, |s| parser.statement(s))?;
    parser.close_material();
    debug!("Finished parsing mtllib {}", path.display());
    Ok(())
}
