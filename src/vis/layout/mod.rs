//! Chart layout
//!
//! A [`LayoutEngine`] turns the normalized observation table into a
//! [`Figure`]. The rest of the pipeline only relies on the document
//! conventions described in [`crate::vis::figure`]: one glyph group per
//! series in declaration order, one glyph per observation, a glyph `y` that
//! never increases as the normalized value grows, and glyphs written in
//! [`ObservationFrame::ranked_by_value`] order. Two values that land on the
//! same `y` then still appear in rank order.

mod violin;

pub use self::violin::ViolinSwarmLayout;

use crate::error::Result;
use crate::frame::ObservationFrame;
use crate::vis::color::Palette;
use crate::vis::config::PlotSettings;
use crate::vis::figure::Figure;

/// Places density shapes and point glyphs for a frame
pub trait LayoutEngine {
    /// Lay out every series of `frame`
    ///
    /// Implementations that consume randomness must derive it from
    /// `settings.seed` on each call so that identical inputs give identical
    /// figures.
    fn layout(
        &self,
        frame: &ObservationFrame,
        palette: &Palette,
        settings: &PlotSettings,
    ) -> Result<Figure>;
}
