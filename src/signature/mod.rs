//! Vector signature model
//!
//! A signature is one cumulative SVG document. Each drawing gesture on the
//! authoring surface produces a [`StrokeBatch`]; the compositor appends it to
//! the document wrapped in a single coordinate transform so that strokes
//! drawn at different surface sizes line up. Existing content is never
//! rewritten, only appended to.

pub mod compositor;
pub mod document;
pub mod surface;
pub mod transform;

pub use compositor::{clear, merge_into_carrier, merge_stroke, replace_whole, SignatureState};
pub use document::SignatureDocument;
pub use surface::{AuthoringSurface, PenConfig};
pub use transform::Transform;

use crate::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fmt;
use std::sync::Arc;

/// Coordinate frame of a signature document (`viewBox`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Frame anchored at the origin, as produced for a fresh surface.
    pub fn origin(width: f64, height: f64) -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            width,
            height,
        }
    }

    /// Parse `"minX minY width height"`; commas are accepted as separators.
    ///
    /// Returns `None` unless there are exactly four numbers and the extent
    /// is positive.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<f64> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .ok()?;
        if parts.len() != 4 || !parts.iter().all(|v| v.is_finite()) {
            return None;
        }
        if parts[2] <= 0.0 || parts[3] <= 0.0 {
            return None;
        }
        Some(Self {
            min_x: parts[0],
            min_y: parts[1],
            width: parts[2],
            height: parts[3],
        })
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
    }
}

/// One self-contained drawable element, kept as serialized markup.
///
/// The compositor treats fragments as opaque: they are appended, wrapped in
/// groups, and written back out byte for byte. Markup is shared, so copying
/// a document's history does not copy the strokes themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment(Arc<str>);

impl Fragment {
    pub fn new(markup: impl Into<String>) -> Self {
        Fragment(Arc::from(markup.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Transform of a wrapping `<g transform="matrix(...)">` fragment.
    ///
    /// Returns `None` for anything that is not a group carrying a plain
    /// scale/translate matrix.
    pub fn transform(&self) -> Option<Transform> {
        let mut reader = Reader::from_str(&self.0);
        loop {
            match reader.read_event().ok()? {
                Event::Start(e) if e.local_name().as_ref() == b"g" => {
                    let attr = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.as_ref() == b"transform")?;
                    let value = attr.unescape_value().ok()?;
                    return Transform::parse(&value);
                }
                Event::Text(_) | Event::Comment(_) => continue,
                _ => return None,
            }
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strokes captured by one continuous gesture, in surface pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeBatch {
    fragments: Vec<Fragment>,
    surface_width: f64,
    surface_height: f64,
}

impl StrokeBatch {
    /// Build a batch; the surface must have a positive, finite size.
    pub fn new(fragments: Vec<Fragment>, surface_width: f64, surface_height: f64) -> Result<Self> {
        check_surface(surface_width, surface_height)?;
        Ok(Self {
            fragments,
            surface_width,
            surface_height,
        })
    }

    /// Build a batch from a surface export (`<svg>` text or an SVG data URI).
    ///
    /// Top-level children of the exported document become the fragments.
    pub fn from_svg(exported: &str, surface_width: f64, surface_height: f64) -> Result<Self> {
        let doc = SignatureDocument::parse(exported)?;
        Self::new(doc.content, surface_width, surface_height)
    }

    /// True when the gesture left the surface untouched.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn surface_width(&self) -> f64 {
        self.surface_width
    }

    pub fn surface_height(&self) -> f64 {
        self.surface_height
    }
}

pub(crate) fn check_surface(width: f64, height: f64) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSurface(format!(
            "surface must be positive, got {}x{}",
            width, height
        )))
    }
}
