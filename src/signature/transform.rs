//! Scale + translate mapping from surface pixels into document space

use super::ViewBox;
use std::fmt;

/// Axis-aligned affine transform: `x' = scale_x * x + translate_x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Map a `surface_width x surface_height` surface onto `view_box`.
    pub fn fit(view_box: &ViewBox, surface_width: f64, surface_height: f64) -> Self {
        Self {
            scale_x: view_box.width / surface_width,
            scale_y: view_box.height / surface_height,
            translate_x: view_box.min_x,
            translate_y: view_box.min_y,
        }
    }

    pub fn apply(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            self.scale_x * x + self.translate_x,
            self.scale_y * y + self.translate_y,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Parse `matrix(a b c d e f)`. Skewed or rotated matrices are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let inner = s.trim().strip_prefix("matrix(")?.strip_suffix(')')?;
        let v: Vec<f64> = inner
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        if v.len() != 6 || v[1] != 0.0 || v[2] != 0.0 {
            return None;
        }
        Some(Self {
            scale_x: v[0],
            scale_y: v[3],
            translate_x: v[4],
            translate_y: v[5],
        })
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({} 0 0 {} {} {})",
            self.scale_x, self.scale_y, self.translate_x, self.translate_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_scales_small_surface_up() {
        let t = Transform::fit(&ViewBox::origin(400.0, 400.0), 200.0, 200.0);
        assert_eq!(t.scale_x, 2.0);
        assert_eq!(t.scale_y, 2.0);
        assert_eq!(t.to_string(), "matrix(2 0 0 2 0 0)");
        assert_eq!(t.apply((10.0, 20.0)), (20.0, 40.0));
    }

    #[test]
    fn fit_carries_view_box_offset() {
        let vb = ViewBox { min_x: -5.0, min_y: 10.0, width: 100.0, height: 50.0 };
        let t = Transform::fit(&vb, 200.0, 100.0);
        assert_eq!(t.to_string(), "matrix(0.5 0 0 0.5 -5 10)");
        assert_eq!(t.apply((0.0, 0.0)), (-5.0, 10.0));
    }

    #[test]
    fn same_size_surface_is_identity() {
        let t = Transform::fit(&ViewBox::origin(300.0, 300.0), 300.0, 300.0);
        assert!(t.is_identity());
    }

    #[test]
    fn parse_round_trips_display() {
        let t = Transform { scale_x: 1.5, scale_y: 0.25, translate_x: 3.0, translate_y: -4.0 };
        assert_eq!(Transform::parse(&t.to_string()), Some(t));
        assert_eq!(Transform::parse("matrix(1,0,0,1,0,0)"), Some(Transform::IDENTITY));
    }

    #[test]
    fn parse_rejects_skew_and_other_kinds() {
        assert!(Transform::parse("matrix(1 0.5 0 1 0 0)").is_none());
        assert!(Transform::parse("scale(2)").is_none());
    }
}
