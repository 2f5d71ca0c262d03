//! Merging stroke batches into the cumulative signature

use super::{Fragment, SignatureDocument, StrokeBatch, Transform, ViewBox};
use crate::Result;
use log::{debug, warn};

/// Merge `batch` into `current`, returning the new document.
///
/// Returns `None` when the batch is empty; the caller keeps its state.
/// Into an empty signature the batch fragments are taken as-is and the
/// document adopts the surface size. Otherwise the whole batch is wrapped
/// in one group mapping surface pixels onto the document's `viewBox` and
/// appended after the existing content.
///
/// A document without a numeric frame (an import sized `100%`, say) takes
/// the batch surface as its `viewBox`, so that batch is wrapped unscaled.
pub fn merge_stroke(
    batch: &StrokeBatch,
    current: Option<&SignatureDocument>,
) -> Option<SignatureDocument> {
    if batch.is_empty() {
        debug!("ignoring empty stroke batch");
        return None;
    }

    match current {
        None => Some(fresh(batch)),
        Some(doc) => match doc.view_box() {
            Some(frame) => {
                let transform =
                    Transform::fit(&frame, batch.surface_width, batch.surface_height);
                Some(doc.with_appended(wrap(&batch.fragments, &transform)))
            }
            None => {
                debug!(
                    "signature has no numeric frame, adopting the {}x{} surface",
                    batch.surface_width, batch.surface_height
                );
                let mut next = doc.with_appended(wrap(&batch.fragments, &Transform::IDENTITY));
                next.view_box = Some(ViewBox::origin(batch.surface_width, batch.surface_height));
                Some(next)
            }
        },
    }
}

/// Merge into a serialized signature (SVG text or data URI).
///
/// A carrier that cannot be parsed is discarded and the batch starts a new
/// document sized to its surface.
pub fn merge_into_carrier(batch: &StrokeBatch, current: Option<&str>) -> Option<SignatureDocument> {
    if batch.is_empty() {
        debug!("ignoring empty stroke batch");
        return None;
    }

    let parsed = match current.map(SignatureDocument::parse) {
        None => None,
        Some(Ok(doc)) => Some(doc),
        Some(Err(e)) => {
            warn!("stored signature unreadable, starting a new one: {}", e);
            None
        }
    };
    merge_stroke(batch, parsed.as_ref())
}

/// Replace the signature with an imported file.
///
/// Fails with `UnsupportedFormat` for anything other than an SVG document.
pub fn replace_whole(bytes: &[u8]) -> Result<SignatureDocument> {
    SignatureDocument::import(bytes)
}

/// The empty signature.
pub fn clear() -> Option<SignatureDocument> {
    None
}

fn fresh(batch: &StrokeBatch) -> SignatureDocument {
    SignatureDocument {
        width: Some(batch.surface_width.to_string()),
        height: Some(batch.surface_height.to_string()),
        view_box: Some(ViewBox::origin(batch.surface_width, batch.surface_height)),
        attributes: Vec::new(),
        content: batch.fragments.clone(),
    }
}

fn wrap(fragments: &[Fragment], transform: &Transform) -> Fragment {
    let inner: String = fragments.iter().map(Fragment::as_str).collect();
    Fragment::new(format!(r#"<g transform="{}">{}</g>"#, transform, inner))
}

/// Signature held by an editing session.
///
/// Every operation returns a new state; the previous value is left intact
/// so a failed import can simply keep using it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignatureState {
    document: Option<SignatureDocument>,
}

impl SignatureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&SignatureDocument> {
        self.document.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_none()
    }

    /// State after merging `batch`; unchanged when the batch is empty.
    pub fn apply_stroke(&self, batch: &StrokeBatch) -> SignatureState {
        match merge_stroke(batch, self.document.as_ref()) {
            Some(document) => SignatureState {
                document: Some(document),
            },
            None => self.clone(),
        }
    }

    /// State holding an imported file.
    pub fn import(&self, bytes: &[u8]) -> Result<SignatureState> {
        Ok(SignatureState {
            document: Some(replace_whole(bytes)?),
        })
    }

    pub fn cleared(&self) -> SignatureState {
        SignatureState { document: clear() }
    }
}

impl From<SignatureDocument> for SignatureState {
    fn from(document: SignatureDocument) -> Self {
        Self {
            document: Some(document),
        }
    }
}
