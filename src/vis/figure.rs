//! Laid-out chart scene and its SVG serialization
//!
//! A [`Figure`] is what a [`crate::vis::LayoutEngine`] produces: every shape
//! already placed in screen coordinates (points, origin top-left). Turning it
//! into text is a separate step so it can be timed separately.
//!
//! The SVG follows matplotlib's element naming. Violin bodies live in
//! `<g id="PolyCollection_N">` groups and point glyphs in
//! `<g id="PathCollection_N">` groups, `N` counting series from 1 in
//! declaration order. A glyph is an anonymous `<use>` of a shared marker that
//! carries only `x` and `y`.

use std::fmt::{self, Write};

use crate::error::{Error, Result};
use crate::svg::escape;

/// Foreground color for text, ticks and spines (dark theme)
const FOREGROUND: &str = "#ffffff";
/// Figure and axes background (dark theme)
const BACKGROUND: &str = "#000000";
const GRID_COLOR: &str = "#808080";
const CLIP_ID: &str = "p_axes_1";

/// Axis-aligned rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Tick mark at a screen position along its axis
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    /// Plot area; violins, points and grid lines are clipped to it
    pub area: Rect,
    /// Category ticks, one per series
    pub x_ticks: Vec<Tick>,
    /// Value ticks; each also draws a dashed grid line
    pub y_ticks: Vec<Tick>,
    pub x_label: String,
    pub y_label: String,
    /// Rotation of the category labels in degrees (counter-clockwise)
    pub x_tick_rotation: f64,
}

/// Shape of one violin
#[derive(Debug, Clone, PartialEq)]
pub enum ViolinShape {
    /// Closed outline, right side bottom-to-top then left side top-to-bottom
    Body(Vec<(f64, f64)>),
    /// Series without spread: a horizontal stroke at `y`
    Flat { y: f64, half_width: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViolinBody {
    pub series_index: usize,
    /// Category center
    pub center: f64,
    pub color: String,
    pub alpha: f64,
    pub shape: ViolinShape,
}

/// Point glyphs of one series
#[derive(Debug, Clone, PartialEq)]
pub struct PointCollection {
    pub series_index: usize,
    pub color: String,
    pub alpha: f64,
    /// Marker radius in points
    pub radius: f64,
    /// Glyph positions, one per observation, highest value first
    pub points: Vec<(f64, f64)>,
}

/// A fully laid-out violin + swarm chart
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Width in points
    pub width: f64,
    /// Height in points
    pub height: f64,
    pub title: Option<String>,
    pub axes: Axes,
    pub violins: Vec<ViolinBody>,
    pub collections: Vec<PointCollection>,
}

impl Figure {
    /// Total number of point glyphs
    pub fn glyph_count(&self) -> usize {
        self.collections.iter().map(|c| c.points.len()).sum()
    }

    /// Serialize to a standalone SVG document
    pub fn to_svg(&self) -> Result<String> {
        let mut out = String::with_capacity(4096 + self.glyph_count() * 160);
        self.write_svg(&mut out)
            .map_err(|e| Error::Document(format!("failed to write SVG: {}", e)))?;
        Ok(out)
    }

    fn write_svg(&self, out: &mut String) -> fmt::Result {
        let (w, h) = (num(self.width), num(self.height));
        writeln!(out, r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>"#)?;
        writeln!(
            out,
            r#"<svg xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}pt" height="{h}pt" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" version="1.1">"#
        )?;
        writeln!(out, " <defs>")?;
        writeln!(
            out,
            r#"  <style type="text/css">*{{stroke-linejoin: round; stroke-linecap: butt}}</style>"#
        )?;
        writeln!(out, " </defs>")?;
        writeln!(out, r#" <g id="figure_1">"#)?;
        writeln!(out, r#"  <g id="patch_1">"#)?;
        writeln!(
            out,
            r#"   <path d="M 0 {h} L {w} {h} L {w} 0 L 0 0 z" style="fill: {BACKGROUND}"/>"#
        )?;
        writeln!(out, "  </g>")?;
        writeln!(out, r#"  <g id="axes_1">"#)?;

        let mut ids = IdCounter::default();
        self.write_area(out)?;
        self.write_x_axis(out, &mut ids)?;
        self.write_y_axis(out, &mut ids)?;
        for (i, violin) in self.violins.iter().enumerate() {
            write_violin(out, i + 1, violin)?;
        }
        for (i, collection) in self.collections.iter().enumerate() {
            write_collection(out, i + 1, collection)?;
        }
        self.write_spines(out)?;
        if let Some(title) = &self.title {
            let a = &self.axes.area;
            writeln!(out, r#"   <g id="text_{}">"#, ids.next_text())?;
            writeln!(
                out,
                r#"    <text x="{}" y="{}" style="font: bold 16px sans-serif; fill: {FOREGROUND}" text-anchor="middle">{}</text>"#,
                num(a.x + a.width / 2.0),
                num(a.y - 10.0),
                escape(title)
            )?;
            writeln!(out, "   </g>")?;
        }

        writeln!(out, "  </g>")?;
        writeln!(out, " </g>")?;
        let a = &self.axes.area;
        writeln!(out, " <defs>")?;
        writeln!(out, r#"  <clipPath id="{CLIP_ID}">"#)?;
        writeln!(
            out,
            r#"   <rect x="{}" y="{}" width="{}" height="{}"/>"#,
            num(a.x),
            num(a.y),
            num(a.width),
            num(a.height)
        )?;
        writeln!(out, "  </clipPath>")?;
        writeln!(out, " </defs>")?;
        writeln!(out, "</svg>")
    }

    fn write_area(&self, out: &mut String) -> fmt::Result {
        let a = &self.axes.area;
        writeln!(out, r#"   <g id="patch_2">"#)?;
        writeln!(
            out,
            r#"    <path d="M {} {} L {} {} L {} {} L {} {} z" style="fill: {BACKGROUND}"/>"#,
            num(a.x),
            num(a.bottom()),
            num(a.right()),
            num(a.bottom()),
            num(a.right()),
            num(a.y),
            num(a.x),
            num(a.y)
        )?;
        writeln!(out, "   </g>")
    }

    fn write_x_axis(&self, out: &mut String, ids: &mut IdCounter) -> fmt::Result {
        let a = &self.axes.area;
        let base = a.bottom();
        writeln!(out, r#"   <g id="matplotlib.axis_1">"#)?;
        for (i, tick) in self.axes.x_ticks.iter().enumerate() {
            let x = num(tick.position);
            let label_y = num(base + 14.0);
            writeln!(out, r#"    <g id="xtick_{}">"#, i + 1)?;
            writeln!(out, r#"     <g id="line2d_{}">"#, ids.next_line())?;
            writeln!(
                out,
                r#"      <path d="M {x} {} L {x} {}" style="stroke: {FOREGROUND}; stroke-width: 0.8"/>"#,
                num(base),
                num(base + 3.5)
            )?;
            writeln!(out, "     </g>")?;
            writeln!(out, r#"     <g id="text_{}">"#, ids.next_text())?;
            writeln!(
                out,
                r#"      <text x="{x}" y="{label_y}" transform="rotate({} {x} {label_y})" style="font: 10px sans-serif; fill: {FOREGROUND}" text-anchor="end">{}</text>"#,
                num(-self.axes.x_tick_rotation),
                escape(&tick.label)
            )?;
            writeln!(out, "     </g>")?;
            writeln!(out, "    </g>")?;
        }
        if !self.axes.x_label.is_empty() {
            writeln!(out, r#"    <g id="text_{}">"#, ids.next_text())?;
            writeln!(
                out,
                r#"     <text x="{}" y="{}" style="font: bold 12px sans-serif; fill: {FOREGROUND}" text-anchor="middle">{}</text>"#,
                num(a.x + a.width / 2.0),
                num(base + 48.0),
                escape(&self.axes.x_label)
            )?;
            writeln!(out, "    </g>")?;
        }
        writeln!(out, "   </g>")
    }

    fn write_y_axis(&self, out: &mut String, ids: &mut IdCounter) -> fmt::Result {
        let a = &self.axes.area;
        writeln!(out, r#"   <g id="matplotlib.axis_2">"#)?;
        for (i, tick) in self.axes.y_ticks.iter().enumerate() {
            let y = num(tick.position);
            writeln!(out, r#"    <g id="ytick_{}">"#, i + 1)?;
            writeln!(out, r#"     <g id="line2d_{}">"#, ids.next_line())?;
            writeln!(
                out,
                r#"      <path d="M {} {y} L {} {y}" clip-path="url(#{CLIP_ID})" style="fill: none; stroke-dasharray: 3.7,1.6; stroke: {GRID_COLOR}; stroke-opacity: 0.2; stroke-width: 0.8"/>"#,
                num(a.x),
                num(a.right())
            )?;
            writeln!(out, "     </g>")?;
            writeln!(out, r#"     <g id="text_{}">"#, ids.next_text())?;
            writeln!(
                out,
                r#"      <text x="{}" y="{}" style="font: 10px sans-serif; fill: {FOREGROUND}" text-anchor="end">{}</text>"#,
                num(a.x - 6.0),
                num(tick.position + 3.5),
                escape(&tick.label)
            )?;
            writeln!(out, "     </g>")?;
            writeln!(out, "    </g>")?;
        }
        if !self.axes.y_label.is_empty() {
            let x = num(a.x - 40.0);
            let y = num(a.y + a.height / 2.0);
            writeln!(out, r#"    <g id="text_{}">"#, ids.next_text())?;
            writeln!(
                out,
                r#"     <text x="{x}" y="{y}" transform="rotate(-90 {x} {y})" style="font: bold 12px sans-serif; fill: {FOREGROUND}" text-anchor="middle">{}</text>"#,
                escape(&self.axes.y_label)
            )?;
            writeln!(out, "    </g>")?;
        }
        writeln!(out, "   </g>")
    }

    fn write_spines(&self, out: &mut String) -> fmt::Result {
        let a = &self.axes.area;
        let sides = [
            (a.x, a.bottom(), a.x, a.y),
            (a.right(), a.bottom(), a.right(), a.y),
            (a.x, a.bottom(), a.right(), a.bottom()),
            (a.x, a.y, a.right(), a.y),
        ];
        for (i, (x1, y1, x2, y2)) in sides.iter().enumerate() {
            writeln!(out, r#"   <g id="patch_{}">"#, i + 3)?;
            writeln!(
                out,
                r#"    <path d="M {} {} L {} {}" style="fill: none; stroke: {FOREGROUND}; stroke-width: 0.8; stroke-linecap: square"/>"#,
                num(*x1),
                num(*y1),
                num(*x2),
                num(*y2)
            )?;
            writeln!(out, "   </g>")?;
        }
        Ok(())
    }
}

fn write_violin(out: &mut String, number: usize, violin: &ViolinBody) -> fmt::Result {
    writeln!(out, r#"   <g id="PolyCollection_{number}">"#)?;
    match &violin.shape {
        ViolinShape::Body(outline) => {
            let mut d = String::new();
            for (i, (x, y)) in outline.iter().enumerate() {
                let cmd = if i == 0 { "M" } else { "L" };
                write!(d, "{} {} {} ", cmd, num(*x), num(*y))?;
            }
            d.push('z');
            writeln!(
                out,
                r#"    <path d="{d}" clip-path="url(#{CLIP_ID})" style="fill: {c}; fill-opacity: {a}; stroke: {c}; stroke-width: 1.25"/>"#,
                c = violin.color,
                a = num(violin.alpha)
            )?;
        }
        ViolinShape::Flat { y, half_width } => {
            writeln!(
                out,
                r#"    <path d="M {} {y} L {} {y}" clip-path="url(#{CLIP_ID})" style="fill: none; stroke: {c}; stroke-opacity: {a}; stroke-width: 1.25"/>"#,
                num(violin.center - half_width),
                num(violin.center + half_width),
                y = num(*y),
                c = violin.color,
                a = num(violin.alpha)
            )?;
        }
    }
    writeln!(out, "   </g>")
}

fn write_collection(out: &mut String, number: usize, collection: &PointCollection) -> fmt::Result {
    let marker = format!("m_point_{number}");
    let r = num(collection.radius);
    writeln!(out, r#"   <g id="PathCollection_{number}">"#)?;
    writeln!(out, "    <defs>")?;
    writeln!(
        out,
        r#"     <path id="{marker}" d="M 0 -{r} A {r} {r} 0 1 0 0 {r} A {r} {r} 0 1 0 0 -{r} z" style="stroke: {FOREGROUND}; stroke-width: 0.3"/>"#
    )?;
    writeln!(out, "    </defs>")?;
    writeln!(out, r#"    <g clip-path="url(#{CLIP_ID})">"#)?;
    for (x, y) in &collection.points {
        // Round-trip precision keeps the glyph order identical to the value order
        writeln!(
            out,
            r##"     <use xlink:href="#{marker}" x="{x}" y="{y}" style="fill: {c}; fill-opacity: {a}; stroke: {FOREGROUND}; stroke-opacity: {a}; stroke-width: 0.3"/>"##,
            c = collection.color,
            a = num(collection.alpha)
        )?;
    }
    writeln!(out, "    </g>")?;
    writeln!(out, "   </g>")
}

/// Sequential ids for `line2d_N` / `text_N` groups
#[derive(Default)]
struct IdCounter {
    lines: usize,
    texts: usize,
}

impl IdCounter {
    fn next_line(&mut self) -> usize {
        self.lines += 1;
        self.lines
    }

    fn next_text(&mut self) -> usize {
        self.texts += 1;
        self.texts
    }
}

/// Compact number formatting for geometry: six decimals, trailing zeros cut
fn num(value: f64) -> String {
    let s = format!("{:.6}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_figure() -> Figure {
        Figure {
            width: 200.0,
            height: 100.0,
            title: Some("A & B".to_string()),
            axes: Axes {
                area: Rect {
                    x: 20.0,
                    y: 10.0,
                    width: 170.0,
                    height: 70.0,
                },
                x_ticks: vec![Tick {
                    position: 105.0,
                    label: "<A>".to_string(),
                }],
                y_ticks: vec![Tick {
                    position: 80.0,
                    label: "0.0".to_string(),
                }],
                x_label: "Series".to_string(),
                y_label: String::new(),
                x_tick_rotation: 15.0,
            },
            violins: vec![ViolinBody {
                series_index: 0,
                center: 105.0,
                color: "#023eff".to_string(),
                alpha: 0.5,
                shape: ViolinShape::Flat {
                    y: 45.0,
                    half_width: 20.0,
                },
            }],
            collections: vec![PointCollection {
                series_index: 0,
                color: "#023eff".to_string(),
                alpha: 0.9,
                radius: 2.5,
                points: vec![(101.25, 45.0), (108.5, 45.0)],
            }],
        }
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.125), "0.125");
        assert_eq!(num(-0.0000001), "0");
        assert_eq!(num(2.0 / 3.0), "0.666667");
    }

    #[test]
    fn test_svg_structure() {
        let svg = small_figure().to_svg().unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 200 100""#));
        assert!(svg.contains(r#"<g id="PolyCollection_1">"#));
        assert!(svg.contains(r#"<g id="PathCollection_1">"#));
        assert_eq!(svg.matches("<use ").count(), 2);
        assert!(svg.contains(r#"x="101.25" y="45""#));
        assert!(svg.contains("&lt;A&gt;"));
        assert!(svg.contains("A &amp; B"));
    }

    #[test]
    fn test_svg_parses() {
        let svg = small_figure().to_svg().unwrap();
        assert!(roxmltree::Document::parse(&svg).is_ok());
    }
}
