//! Chart construction
//!
//! - [`color`]: series colors and the default palette
//! - [`config`]: plot settings and file loading
//! - [`layout`]: placing violins and jittered points
//! - [`figure`]: the laid-out chart and its SVG serialization

pub mod color;
pub mod config;
pub mod figure;
pub mod layout;

pub use self::color::{Color, Palette, BRIGHT_PALETTE, FALLBACK_COLOR};
pub use self::config::{load_file, GlyphPolicy, PlotSettings};
pub use self::figure::{Axes, Figure, PointCollection, Rect, Tick, ViolinBody, ViolinShape};
pub use self::layout::{LayoutEngine, ViolinSwarmLayout};
