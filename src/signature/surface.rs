//! Live drawing surface that turns pointer gestures into stroke batches

use super::{check_surface, Fragment, StrokeBatch};
use crate::Result;
use log::debug;
use quick_xml::escape::escape;

/// Pen used for freehand strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct PenConfig {
    /// Stroke color (any SVG paint)
    pub color: String,
    /// Stroke width in surface pixels
    pub stroke_width: f64,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            color: "#1E40AF".to_string(),
            stroke_width: 2.0,
        }
    }
}

/// A square drawing surface.
///
/// Points are collected between `pointer_down` and `pointer_up`; each
/// completed gesture becomes one [`StrokeBatch`] tagged with the surface
/// size at capture time.
#[derive(Debug, Clone)]
pub struct AuthoringSurface {
    size: f64,
    pen: PenConfig,
    points: Vec<(f64, f64)>,
    drawing: bool,
}

impl AuthoringSurface {
    pub fn new(size: f64, pen: PenConfig) -> Result<Self> {
        check_surface(size, size)?;
        Ok(Self {
            size,
            pen,
            points: Vec::new(),
            drawing: false,
        })
    }

    pub fn width(&self) -> f64 {
        self.size
    }

    pub fn height(&self) -> f64 {
        self.size
    }

    /// True while a gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Follow the container width.
    ///
    /// A changed width drops any unfinished stroke and leaves a blank square
    /// surface, so the next batch reports the size it was drawn at.
    pub fn resize(&mut self, width: f64) -> Result<()> {
        check_surface(width, width)?;
        if width != self.size {
            if self.drawing {
                debug!("surface resized mid-stroke, discarding {} points", self.points.len());
            }
            self.size = width;
            self.reset();
        }
        Ok(())
    }

    /// Blank the surface.
    pub fn reset(&mut self) {
        self.points.clear();
        self.drawing = false;
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.points.clear();
        self.points.push((x, y));
        self.drawing = true;
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.drawing {
            self.points.push((x, y));
        }
    }

    /// Finish the gesture. Returns `None` if nothing was drawn.
    pub fn pointer_up(&mut self) -> Option<StrokeBatch> {
        if !self.drawing {
            return None;
        }
        self.drawing = false;
        let points = std::mem::take(&mut self.points);
        let (&(x0, y0), rest) = points.split_first()?;

        let mut d = format!("M {} {}", x0, y0);
        if rest.is_empty() {
            d.push_str(&format!(" L {} {}", x0, y0));
        }
        for (x, y) in rest {
            d.push_str(&format!(" L {} {}", x, y));
        }

        let path = format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            d,
            escape(self.pen.color.as_str()),
            self.pen.stroke_width
        );
        StrokeBatch::new(vec![Fragment::new(path)], self.size, self.size).ok()
    }
}
