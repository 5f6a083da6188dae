//! Recovering which glyph belongs to which observation
//!
//! The rendered document holds point glyphs without any identity: a glyph
//! group per series (`<g id="PathCollection_N">`, `N` starting at 1 in
//! declaration order) whose `<use>` children carry only `x` and `y`. `x` is
//! jitter noise. `y` decreases as the value grows, so ranking the glyphs by
//! `y` ascending and the observations by normalized value descending lines
//! both up in the same top-to-bottom order. Pairing by rank is the whole
//! mapping.
//!
//! Both sorts are stable, and the layout writes each group's glyphs in rank
//! order. Glyphs sharing a `y` (equal values, or distinct values that round
//! to the same screen position) therefore keep rank order, which is exactly
//! the order of the ranked observations.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::frame::ObservationFrame;
use crate::svg::{Document, NodeId};
use crate::vis::color::{Palette, FALLBACK_COLOR};

/// Id prefix of the per-series glyph groups
pub const GLYPH_GROUP_PREFIX: &str = "PathCollection_";

/// One anonymous point glyph found in the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub node: NodeId,
    pub x: f64,
    pub y: f64,
    /// Declaration index of the series whose group holds the glyph
    pub series_index: usize,
}

/// A glyph matched to its observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledPoint {
    pub x: f64,
    pub y: f64,
    pub id: String,
    pub series: String,
    /// `#rrggbb`
    pub color: String,
    /// Raw (not normalized) score
    pub value: f64,
}

/// Result of a successful reconciliation
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// One point per observation, by series then top to bottom
    pub points: Vec<ReconciledPoint>,
    /// The glyph node paired with each point, parallel to `points`
    pub glyphs: Vec<NodeId>,
}

/// Collect the glyphs of every series, each list sorted top to bottom
///
/// Groups whose index is zero or larger than `series_count` are skipped, as
/// are `<use>` elements without numeric `x` and `y`.
pub fn collect_glyphs(doc: &Document, series_count: usize) -> Vec<Vec<Glyph>> {
    let mut by_series: Vec<Vec<Glyph>> = vec![Vec::new(); series_count];

    for node in doc.descendants(doc.root()) {
        let Some(number) = glyph_group_number(doc, node) else {
            continue;
        };
        if number == 0 || number > series_count {
            debug!(
                "discarding glyph group {}{} ({} series declared)",
                GLYPH_GROUP_PREFIX, number, series_count
            );
            continue;
        }
        let series_index = number - 1;

        for child in doc.descendants(node).into_iter().skip(1) {
            let Some(element) = doc.element(child) else {
                continue;
            };
            if element.local_name() != "use" {
                continue;
            }
            let x = element.attribute("x").and_then(|v| v.trim().parse::<f64>().ok());
            let y = element.attribute("y").and_then(|v| v.trim().parse::<f64>().ok());
            if let (Some(x), Some(y)) = (x, y) {
                by_series[series_index].push(Glyph {
                    node: child,
                    x,
                    y,
                    series_index,
                });
            }
        }
    }

    for glyphs in &mut by_series {
        glyphs.sort_by(|a, b| a.y.total_cmp(&b.y));
    }
    by_series
}

/// Pair every observation of `frame` with its glyph in `doc`
///
/// # Errors
/// [`Error::ReconciliationMismatch`] when fewer pairs were formed than the
/// frame has observations. No partial result is returned.
pub fn reconcile(doc: &Document, frame: &ObservationFrame, palette: &Palette) -> Result<Reconciliation> {
    let glyphs = collect_glyphs(doc, frame.series_count());
    let fallback = FALLBACK_COLOR.to_hex()?;

    let mut points = Vec::with_capacity(frame.len());
    let mut nodes = Vec::with_capacity(frame.len());
    let mut matched = 0;

    for (index, series_glyphs) in glyphs.iter().enumerate() {
        let ranked = frame.ranked_by_value(index);
        if series_glyphs.len() > ranked.len() {
            warn!(
                "series '{}' has {} glyphs for {} observations; surplus glyphs stay in the document",
                frame.series_names()[index],
                series_glyphs.len(),
                ranked.len()
            );
        }
        let color = palette.get(index).unwrap_or(fallback.as_str());

        for (glyph, observation) in series_glyphs.iter().zip(&ranked) {
            points.push(ReconciledPoint {
                x: glyph.x,
                y: glyph.y,
                id: observation.id.clone(),
                series: observation.series.clone(),
                color: color.to_string(),
                value: observation.raw_value,
            });
            nodes.push(glyph.node);
            matched += 1;
        }
    }

    if matched != frame.len() {
        return Err(Error::ReconciliationMismatch {
            matched,
            expected: frame.len(),
        });
    }

    Ok(Reconciliation {
        points,
        glyphs: nodes,
    })
}

/// `N` of a `<g id="PathCollection_N">` element
fn glyph_group_number(doc: &Document, node: NodeId) -> Option<usize> {
    let element = doc.element(node)?;
    if element.local_name() != "g" {
        return None;
    }
    element
        .attribute("id")?
        .strip_prefix(GLYPH_GROUP_PREFIX)?
        .parse()
        .ok()
}
