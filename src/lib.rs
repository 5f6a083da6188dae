#![allow(clippy::too_many_arguments)]

//! Violin + swarm charts with recoverable point identity
//!
//! A render call turns named series of scores into a static SVG image of the
//! per-series distributions plus a list of point records (position, id,
//! series, color, raw value). The point glyphs are first drawn anonymously,
//! then matched back to their observations by rank and removed from the
//! image, so a front end can draw its own interactive points on top.

pub mod error;
pub mod frame;
pub mod groupby;
pub mod reconcile;
pub mod render;
pub mod series;
pub mod stats;
pub mod svg;
pub mod synthetic;
pub mod vis;

// Re-export commonly used types
pub use error::{Error, Result};
pub use frame::{ObservationFrame, DEGENERATE_NORMALIZED_VALUE};
pub use groupby::GroupBy;
pub use reconcile::{reconcile, ReconciledPoint, Reconciliation};
pub use render::{render, render_chart, render_with, RenderOutput, RenderRequest, Timings};
pub use series::{Observation, Series};
pub use svg::{Document, ViewBox, ViewportTransform};
pub use synthetic::CohortGenerator;
pub use vis::{Color, GlyphPolicy, LayoutEngine, Palette, PlotSettings, ViolinSwarmLayout};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
