//! Removing or tagging reconciled point glyphs
//!
//! Both operations take the exact [`NodeId`]s the reconciler paired with
//! observations. Nothing here searches by coordinates, so two glyphs drawn
//! at the same position can never be confused.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::{Document, NodeId};

/// Detach every listed glyph from the document
///
/// Removals are grouped by parent so each parent's child list is rewritten
/// once. Glyphs that are already detached are skipped, which makes a second
/// pass with the same list a no-op. Returns the number of glyphs removed.
pub fn strip_glyphs(doc: &mut Document, glyphs: &[NodeId]) -> usize {
    let mut by_parent: HashMap<NodeId, HashSet<NodeId>> = HashMap::new();
    for &glyph in glyphs {
        if let Some(parent) = doc.nodes[glyph.0].parent {
            by_parent.entry(parent).or_default().insert(glyph);
        }
    }

    let mut removed = 0;
    for (parent, doomed) in by_parent {
        let before = doc.nodes[parent.0].children.len();
        doc.nodes[parent.0].children.retain(|c| !doomed.contains(c));
        removed += before - doc.nodes[parent.0].children.len();
        for glyph in doomed {
            doc.nodes[glyph.0].parent = None;
        }
    }

    debug!("stripped {} point glyphs", removed);
    removed
}

/// Stamp `data-id` and `data-series` onto each listed glyph
///
/// Returns the number of elements annotated; ids that do not name an
/// element are skipped.
pub fn annotate_glyphs<'a, I>(doc: &mut Document, glyphs: I) -> usize
where
    I: IntoIterator<Item = (NodeId, &'a str, &'a str)>,
{
    let mut annotated = 0;
    for (glyph, id, series) in glyphs {
        if let Some(element) = doc.element_mut(glyph) {
            element.set_attribute("data-id", id);
            element.set_attribute("data-series", series);
            annotated += 1;
        }
    }
    annotated
}
