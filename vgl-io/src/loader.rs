//! Format detection and the top-level model loading entry points

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::events::{ParseEvent, ParserCallbacks};
use crate::scanner::LineScanner;
use crate::texture_cache::TextureCache;
use crate::{obj, ply};
use log::debug;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Model file formats understood by [`load_model`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Obj,
    Ply,
}

impl ModelFormat {
    /// Detect the format from a path's extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ParseError::new(ParseErrorKind::UnsupportedFormat, "Unknown model format.")
        })?;
        match ext.to_ascii_lowercase().as_str() {
            "obj" => Ok(ModelFormat::Obj),
            "ply" => Ok(ModelFormat::Ply),
            _ => Err(ParseError::new(
                ParseErrorKind::UnsupportedFormat,
                format!("Unknown model format: .{}", ext),
            )),
        }
    }
}

/// State shared by every file read during a single load
pub(crate) struct LoadContext<'a> {
    pub texture_cache: Option<&'a mut TextureCache>,
    pub material_names: HashSet<String>,
}

impl<'a> LoadContext<'a> {
    pub fn new(texture_cache: Option<&'a mut TextureCache>) -> Self {
        Self {
            texture_cache,
            material_names: HashSet::new(),
        }
    }
}

/// Open `path` for reading, classifying a missing file separately.
pub(crate) fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => ParseError::new(
            ParseErrorKind::FileNotFound,
            format!("File not found: {}", path.display()),
        ),
        _ => ParseError::new(
            ParseErrorKind::Io,
            format!("Unable to open {}: {}", path.display(), err),
        ),
    })
}

/// Feed each line of a text file to `statement`.
///
/// After each statement only whitespace or a comment may remain on the
/// line. Errors are located at the failing line and the scanner's column.
pub(crate) fn scan_lines<F>(path: &Path, mut statement: F) -> Result<()>
where
    F: FnMut(&mut LineScanner<'_>) -> Result<()>,
{
    let reader = BufReader::new(open_file(path)?);
    for (index, line) in reader.split(b'\n').enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|err| ParseError::io(err).at(path, line_no, 0))?;
        let mut scanner = LineScanner::new(&line);

        let result = statement(&mut scanner).and_then(|()| {
            scanner.eat_space(false)?;
            if scanner.at_end_or_comment() {
                Ok(())
            } else {
                Err(ParseError::new(
                    ParseErrorKind::TrailingGarbage,
                    format!("Unexpected trailing characters: {}", scanner.rest()),
                ))
            }
        });
        if let Err(err) = result {
            return Err(err.at(path, line_no, scanner.pos()));
        }
    }
    Ok(())
}

/// Configures and runs a model load
///
/// ```no_run
/// use vgl_io::{EventLog, ModelLoader, TextureCache};
///
/// let mut cache = TextureCache::new();
/// let mut log = EventLog::new();
/// ModelLoader::new()
///     .with_texture_cache(&mut cache)
///     .load(&mut log, "scene.obj")?;
/// # Ok::<(), vgl_io::ParseError>(())
/// ```
#[derive(Debug, Default)]
pub struct ModelLoader<'c> {
    texture_cache: Option<&'c mut TextureCache>,
}

impl<'c> ModelLoader<'c> {
    pub fn new() -> Self {
        Self {
            texture_cache: None,
        }
    }

    /// Decode every texture map through `cache` while loading.
    pub fn with_texture_cache(mut self, cache: &'c mut TextureCache) -> Self {
        self.texture_cache = Some(cache);
        self
    }

    /// Parse the model at `path`, delivering events to `callbacks`.
    ///
    /// Unsupported extensions and missing files fail before any event is
    /// delivered. On success the events are bracketed by
    /// `BeginModel`/`EndModel`.
    pub fn load<C, P>(&mut self, callbacks: &mut C, path: P) -> Result<()>
    where
        C: ParserCallbacks + ?Sized,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let format = ModelFormat::from_path(path)?;
        drop(open_file(path)?);

        debug!("Loading model {} as {:?}", path.display(), format);
        let mut ctx = LoadContext::new(self.texture_cache.as_deref_mut());

        callbacks.handle(ParseEvent::BeginModel(path.to_path_buf()));
        match format {
            ModelFormat::Obj => obj::load_obj(&mut ctx, callbacks, path)?,
            ModelFormat::Ply => ply::load_ply(callbacks, path)?,
        }
        callbacks.handle(ParseEvent::EndModel);

        debug!("Finished loading model {}", path.display());
        Ok(())
    }
}

/// Parse the model at `path` without a texture cache.
pub fn load_model<C, P>(callbacks: &mut C, path: P) -> Result<()>
where
    C: ParserCallbacks + ?Sized,
    P: AsRef<Path>,
{
    ModelLoader::new().load(callbacks, path)
}
