//! Signature document parsing and serialization
//!
//! Documents travel as SVG text or as `data:image/svg+xml` URIs. Parsing
//! keeps the root attributes as written (size with its units, `viewBox`,
//! anything else) and splits the root's element children into opaque
//! [`Fragment`]s by re-emitting their XML events unchanged.

use super::{check_surface, Fragment, ViewBox};
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as Base64Engine;
use log::debug;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::fmt;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
pub const SVG_MIME: &str = "image/svg+xml";
/// Default file name for a downloaded signature.
pub const DOWNLOAD_NAME: &str = "signature.svg";

// Root attributes owned by the model; everything else is carried verbatim.
const MODEL_ATTRIBUTES: [&str; 4] = ["xmlns", "width", "height", "viewBox"];

/// Cumulative vector signature.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureDocument {
    pub(crate) width: Option<String>,
    pub(crate) height: Option<String>,
    pub(crate) view_box: Option<ViewBox>,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) content: Vec<Fragment>,
}

impl SignatureDocument {
    /// A document sized to a drawing surface, holding `content` as-is.
    pub fn for_surface(content: Vec<Fragment>, width: f64, height: f64) -> Result<Self> {
        check_surface(width, height)?;
        Ok(Self {
            width: Some(width.to_string()),
            height: Some(height.to_string()),
            view_box: Some(ViewBox::origin(width, height)),
            attributes: Vec::new(),
            content,
        })
    }

    /// Root `width` as written, units included.
    pub fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    /// Root `height` as written, units included.
    pub fn height(&self) -> Option<&str> {
        self.height.as_deref()
    }

    /// Coordinate frame that merged strokes are mapped into.
    ///
    /// This is the declared `viewBox`, or the origin frame of a unitless
    /// size when there is none. `None` when neither yields a numeric frame,
    /// e.g. `width="100%"` without a `viewBox`.
    pub fn view_box(&self) -> Option<ViewBox> {
        self.view_box.or_else(|| {
            let width = user_length(self.width.as_deref()?)?;
            let height = user_length(self.height.as_deref()?)?;
            Some(ViewBox::origin(width, height))
        })
    }

    pub fn content(&self) -> &[Fragment] {
        &self.content
    }

    /// Extra root attributes preserved from an imported file.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Copy of this document with `fragment` appended.
    pub(crate) fn with_appended(&self, fragment: Fragment) -> Self {
        let mut next = self.clone();
        next.content.push(fragment);
        next
    }

    /// Parse a stored signature (SVG text or SVG data URI).
    ///
    /// Failures are reported as [`Error::MalformedCarrier`].
    pub fn parse(carrier: &str) -> Result<Self> {
        let svg = decode_carrier(carrier)?;
        parse_svg(&svg)
    }

    /// Parse an imported file. Anything that is not an SVG document is
    /// reported as [`Error::UnsupportedFormat`].
    pub fn import(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| Error::UnsupportedFormat("file is not UTF-8 text".into()))?;
        Self::parse(text).map_err(|e| match e {
            Error::MalformedCarrier(reason) => Error::UnsupportedFormat(reason),
            other => other,
        })
    }

    /// Serialize as a standalone SVG file.
    pub fn to_svg(&self) -> String {
        let body: usize = self.content.iter().map(|f| f.as_str().len()).sum();
        let mut out = String::with_capacity(body + 160);
        out.push_str(&format!(r#"<svg xmlns="{}""#, SVG_NAMESPACE));
        if let Some(width) = &self.width {
            out.push_str(&format!(r#" width="{}""#, escape(width.as_str())));
        }
        if let Some(height) = &self.height {
            out.push_str(&format!(r#" height="{}""#, escape(height.as_str())));
        }
        if let Some(view_box) = &self.view_box {
            out.push_str(&format!(r#" viewBox="{}""#, view_box));
        }
        for (key, value) in &self.attributes {
            out.push_str(&format!(r#" {}="{}""#, key, escape(value.as_str())));
        }
        out.push('>');
        for fragment in &self.content {
            out.push_str(fragment.as_str());
        }
        out.push_str("</svg>");
        out
    }

    /// Serialize as a base64 `data:` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", SVG_MIME, STANDARD.encode(self.to_svg()))
    }
}

impl fmt::Display for SignatureDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_svg())
    }
}

/// Unwrap a `data:image/svg+xml` URI into SVG text; plain text passes through.
pub fn decode_carrier(carrier: &str) -> Result<Cow<'_, str>> {
    let trimmed = carrier.trim_start();
    let Some(rest) = trimmed.strip_prefix("data:") else {
        return Ok(Cow::Borrowed(carrier));
    };
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::MalformedCarrier("data URI without payload".into()))?;

    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().trim();
    if !mime.eq_ignore_ascii_case(SVG_MIME) {
        return Err(Error::MalformedCarrier(format!(
            "expected {} data URI, got '{}'",
            SVG_MIME, mime
        )));
    }

    if params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::MalformedCarrier(format!("invalid base64 payload: {}", e)))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| Error::MalformedCarrier("payload is not UTF-8".into()))?;
        Ok(Cow::Owned(text))
    } else {
        let text = percent_encoding::percent_decode_str(payload)
            .decode_utf8()
            .map_err(|_| Error::MalformedCarrier("payload is not UTF-8".into()))?;
        Ok(Cow::Owned(text.into_owned()))
    }
}

struct Root {
    width: Option<String>,
    height: Option<String>,
    view_box: Option<ViewBox>,
    attributes: Vec<(String, String)>,
}

fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedCarrier(msg.into())
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Length in user units: a bare number or `px`. Other units and
/// percentages have no fixed pixel size and yield `None`.
fn user_length(s: &str) -> Option<f64> {
    let s = s.trim();
    let v = s.strip_suffix("px").unwrap_or(s).trim().parse::<f64>().ok()?;
    (v.is_finite() && v > 0.0).then_some(v)
}

fn read_root(e: &BytesStart<'_>) -> Result<Root> {
    let name = e.local_name();
    if name.as_ref() != b"svg" {
        return Err(malformed(format!(
            "root element is <{}>, expected <svg>",
            String::from_utf8_lossy(name.as_ref())
        )));
    }
    let mut root = Root {
        width: None,
        height: None,
        view_box: None,
        attributes: Vec::new(),
    };
    for attr in e.attributes() {
        let attr = attr.map_err(|e| malformed(format!("bad root attribute: {}", e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| malformed(format!("bad value for '{}': {}", key, e)))?
            .into_owned();
        match key.as_str() {
            "width" => root.width = Some(value),
            "height" => root.height = Some(value),
            "viewBox" => match ViewBox::parse(&value) {
                Some(view_box) => root.view_box = Some(view_box),
                None => {
                    debug!("keeping unusable viewBox '{}' as a plain attribute", value);
                    root.attributes.push((key, value));
                }
            },
            k if MODEL_ATTRIBUTES.contains(&k) => {}
            _ => root.attributes.push((key, value)),
        }
    }
    Ok(root)
}

fn emit(writer: &mut Option<Writer<Vec<u8>>>, event: Event<'_>) -> Result<()> {
    let writer = writer
        .as_mut()
        .ok_or_else(|| malformed("unbalanced element nesting"))?;
    writer
        .write_event(event)
        .map_err(|e| malformed(format!("cannot re-emit fragment: {}", e)))
}

fn finish(writer: Option<Writer<Vec<u8>>>) -> Result<Fragment> {
    let writer = writer.ok_or_else(|| malformed("unbalanced element nesting"))?;
    String::from_utf8(writer.into_inner())
        .map(Fragment::new)
        .map_err(|_| malformed("fragment is not UTF-8"))
}

fn parse_svg(text: &str) -> Result<SignatureDocument> {
    let mut reader = Reader::from_str(text);
    let mut root: Option<Root> = None;
    let mut closed = false;
    let mut depth = 0usize;
    let mut current: Option<Writer<Vec<u8>>> = None;
    let mut content = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            malformed(format!("XML error at byte {}: {}", reader.buffer_position(), e))
        })?;
        match event {
            Event::Eof => break,
            Event::Start(e) => {
                if closed {
                    return Err(malformed("element after closing </svg>"));
                }
                match depth {
                    0 => root = Some(read_root(&e)?),
                    1 => {
                        current = Some(Writer::new(Vec::new()));
                        emit(&mut current, Event::Start(e))?;
                    }
                    _ => emit(&mut current, Event::Start(e))?,
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if closed {
                    return Err(malformed("element after closing </svg>"));
                }
                match depth {
                    0 => {
                        root = Some(read_root(&e)?);
                        closed = true;
                    }
                    1 => {
                        let mut single = Some(Writer::new(Vec::new()));
                        emit(&mut single, Event::Empty(e))?;
                        content.push(finish(single)?);
                    }
                    _ => emit(&mut current, Event::Empty(e))?,
                }
            }
            Event::End(e) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed("unexpected closing tag"))?;
                match depth {
                    0 => closed = true,
                    1 => {
                        emit(&mut current, Event::End(e))?;
                        content.push(finish(current.take())?);
                    }
                    _ => emit(&mut current, Event::End(e))?,
                }
            }
            Event::Text(t) => match depth {
                0 if !is_blank(&t) => return Err(malformed("text outside the <svg> element")),
                0 => {}
                1 => {
                    if !is_blank(&t) {
                        debug!("dropping loose text at signature top level");
                    }
                }
                _ => emit(&mut current, Event::Text(t))?,
            },
            other => {
                // Comments, CDATA, processing instructions, declarations.
                if depth > 1 {
                    emit(&mut current, other)?;
                }
            }
        }
    }

    let root = root.ok_or_else(|| malformed("no <svg> element found"))?;
    if !closed {
        return Err(malformed("missing closing </svg>"));
    }

    Ok(SignatureDocument {
        width: root.width,
        height: root.height,
        view_box: root.view_box,
        attributes: root.attributes,
        content,
    })
}
