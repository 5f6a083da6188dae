//! Mapping document coordinates onto a display surface
//!
//! Point coordinates come out in the document's user units. A downstream
//! renderer that shows the static image at some other size scales them with
//! a [`ViewportTransform`] built from the document's [`ViewBox`].

use super::Document;
use crate::error::{Error, Result};

/// The `viewBox` of a document's root element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Parse a `viewBox` attribute value (`"min-x min-y width height"`,
    /// separated by whitespace and/or commas)
    pub fn parse(value: &str) -> Option<Self> {
        let parts: Vec<f64> = value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<std::result::Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            &[min_x, min_y, width, height] => Some(ViewBox {
                min_x,
                min_y,
                width,
                height,
            }),
            _ => None,
        }
    }
}

impl Document {
    /// Coordinate system of the root element
    ///
    /// Uses `viewBox` when present, otherwise `width`/`height` (a `pt` or
    /// `px` suffix is accepted) with the origin at zero.
    pub fn view_box(&self) -> Option<ViewBox> {
        let root = self.element(self.root())?;
        if let Some(view_box) = root.attribute("viewBox").and_then(ViewBox::parse) {
            return Some(view_box);
        }
        let width = parse_length(root.attribute("width")?)?;
        let height = parse_length(root.attribute("height")?)?;
        Some(ViewBox {
            min_x: 0.0,
            min_y: 0.0,
            width,
            height,
        })
    }
}

fn parse_length(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed
        .strip_suffix("pt")
        .or_else(|| trimmed.strip_suffix("px"))
        .unwrap_or(trimmed);
    number.trim().parse().ok()
}

/// Scales document coordinates to a display of a given size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    view_box: ViewBox,
    scale_x: f64,
    scale_y: f64,
}

impl ViewportTransform {
    pub fn new(view_box: ViewBox, display_width: f64, display_height: f64) -> Result<Self> {
        if !(view_box.width > 0.0 && view_box.height > 0.0) {
            return Err(Error::Document(format!(
                "viewBox must have a positive size, got {}x{}",
                view_box.width, view_box.height
            )));
        }
        if !(display_width > 0.0 && display_height > 0.0) {
            return Err(Error::MalformedInput(format!(
                "display size must be positive, got {}x{}",
                display_width, display_height
            )));
        }
        Ok(ViewportTransform {
            view_box,
            scale_x: display_width / view_box.width,
            scale_y: display_height / view_box.height,
        })
    }

    /// Document coordinates to display coordinates
    pub fn svg_to_display(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.view_box.min_x) * self.scale_x,
            (y - self.view_box.min_y) * self.scale_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view_box() {
        assert_eq!(
            ViewBox::parse("0 0 576 432"),
            Some(ViewBox {
                min_x: 0.0,
                min_y: 0.0,
                width: 576.0,
                height: 432.0
            })
        );
        assert_eq!(ViewBox::parse("-5,10, 20 30").map(|v| v.min_x), Some(-5.0));
        assert_eq!(ViewBox::parse("0 0 10"), None);
        assert_eq!(ViewBox::parse("a b c d"), None);
    }

    #[test]
    fn test_document_view_box_falls_back_to_size() {
        let doc = Document::parse(r#"<svg xmlns="http://www.w3.org/2000/svg" width="144pt" height="72pt"/>"#)
            .unwrap();
        let view_box = doc.view_box().unwrap();
        assert_eq!((view_box.width, view_box.height), (144.0, 72.0));
    }

    #[test]
    fn test_svg_to_display() {
        let view_box = ViewBox::parse("0 0 576 432").unwrap();
        let transform = ViewportTransform::new(view_box, 800.0, 600.0).unwrap();
        let (x, y) = transform.svg_to_display(288.0, 216.0);
        assert!((x - 400.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_empty_sizes() {
        let view_box = ViewBox::parse("0 0 0 10").unwrap();
        assert!(ViewportTransform::new(view_box, 100.0, 100.0).is_err());
        let view_box = ViewBox::parse("0 0 10 10").unwrap();
        assert!(ViewportTransform::new(view_box, 0.0, 100.0).is_err());
    }
}
