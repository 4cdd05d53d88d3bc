//! The event vocabulary emitted by every model parser
//!
//! Parsers never build a mesh themselves. They describe what they read as a
//! stream of [`ParseEvent`]s delivered to a [`ParserCallbacks`] sink, and the
//! host decides what to keep.

use std::path::PathBuf;
use vgl_core::{Vec2f, Vec3f, Vec4f};

/// Identifies which semantic property an attribute event carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeTag {
    AmbientColor,
    DiffuseColor,
    SpecularColor,
    Transmissivity,
    Dissolve,
    SpecularExponent,
    /// Reserved for a material normal map; never emitted by the built-in parsers.
    Normal,
    BumpMap,
    CoordRef,
    TexCoordRef,
    NormalRef,
    MaterialName,
    Coord,
    TexCoord,
    VertexNormal,
    /// Per-vertex colour
    Intensity,
}

/// A single parse event
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent {
    BeginModel(PathBuf),
    EndModel,
    BeginFace,
    EndFace,
    BeginVertex,
    EndVertex,
    BeginMaterial(String),
    EndMaterial,
    /// A 0-based index into a previously emitted attribute list
    Index(AttributeTag, usize),
    Float(AttributeTag, f32),
    Vec2(AttributeTag, Vec2f),
    Vec3(AttributeTag, Vec3f),
    Vec4(AttributeTag, Vec4f),
    /// A resolved texture path; decoding is left to the host or a texture cache
    Texture(AttributeTag, PathBuf),
    Str(AttributeTag, String),
}

impl ParseEvent {
    /// The attribute tag carried by this event, if it is an attribute event.
    pub fn tag(&self) -> Option<AttributeTag> {
        match self {
            ParseEvent::Index(tag, _)
            | ParseEvent::Float(tag, _)
            | ParseEvent::Vec2(tag, _)
            | ParseEvent::Vec3(tag, _)
            | ParseEvent::Vec4(tag, _)
            | ParseEvent::Texture(tag, _)
            | ParseEvent::Str(tag, _) => Some(*tag),
            _ => None,
        }
    }
}

/// Sink for parse events
///
/// Any `FnMut(ParseEvent)` closure is a sink.
pub trait ParserCallbacks {
    fn handle(&mut self, event: ParseEvent);
}

impl<F> ParserCallbacks for F
where
    F: FnMut(ParseEvent),
{
    fn handle(&mut self, event: ParseEvent) {
        self(event)
    }
}

/// Records every event in arrival order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<ParseEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ParseEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ParseEvent> {
        self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events carrying the given attribute tag
    pub fn with_tag(&self, tag: AttributeTag) -> impl Iterator<Item = &ParseEvent> {
        self.events.iter().filter(move |e| e.tag() == Some(tag))
    }

    /// Number of events equal to `event`
    pub fn count(&self, event: &ParseEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl ParserCallbacks for EventLog {
    fn handle(&mut self, event: ParseEvent) {
        self.events.push(event);
    }
}
