//! The render call
//!
//! One call normalizes the input, lays out the chart, serializes it, parses
//! the text back, reconciles the point glyphs with their observations and
//! finally strips (or tags) those glyphs. The caller gets the static image,
//! the point list and the duration of every phase. Any failure aborts the
//! whole call.

mod timing;

pub use self::timing::{Phase, PhaseTimer, Timings, TOTAL};

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::ObservationFrame;
use crate::reconcile::{reconcile, ReconciledPoint};
use crate::series::Series;
use crate::svg::{annotate_glyphs, strip_glyphs, Document};
use crate::vis::color::{Color, Palette};
use crate::vis::config::{load_file, GlyphPolicy, PlotSettings};
use crate::vis::layout::{LayoutEngine, ViolinSwarmLayout};

/// Everything one render call needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Series in render order
    pub series: Vec<Series>,
    /// One color per series; `None` uses the default palette
    #[serde(default)]
    pub colors: Option<Vec<Color>>,
    #[serde(default)]
    pub settings: PlotSettings,
}

impl RenderRequest {
    pub fn new(series: Vec<Series>) -> Self {
        RenderRequest {
            series,
            colors: None,
            settings: PlotSettings::default(),
        }
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_settings(mut self, settings: PlotSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Load a request from a `.toml`, `.yaml`/`.yml` or `.json` file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_file(path)
    }
}

/// Result of a render call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutput {
    pub timings: Timings,
    /// Static image: density shapes and decoration, with an XML declaration
    pub svg: String,
    /// One point per observation
    pub points: Vec<ReconciledPoint>,
}

/// Render with the default [`ViolinSwarmLayout`]
///
/// # Example
///
/// ```
/// use violin_swarm::{render, RenderRequest, Series};
///
/// let request = RenderRequest::new(vec![
///     Series::new("A").with_score("a1", 0.2).with_score("a2", 0.8),
///     Series::new("B").with_score("b1", 5.0).with_score("b2", 10.0).with_score("b3", 15.0),
/// ]);
/// let output = render(&request).unwrap();
/// assert_eq!(output.points.len(), 5);
/// assert!(!output.svg.contains("<use "));
/// ```
pub fn render(request: &RenderRequest) -> Result<RenderOutput> {
    render_with(request, &ViolinSwarmLayout::default())
}

/// Render with a custom layout engine
pub fn render_with<L>(request: &RenderRequest, layout: &L) -> Result<RenderOutput>
where
    L: LayoutEngine + ?Sized,
{
    let mut timer = PhaseTimer::start();

    request.settings.validate()?;
    let frame = ObservationFrame::from_series(&request.series)?;
    timer.mark(Phase::DataPreparation);

    let palette = Palette::resolve(request.colors.as_deref(), frame.series_count())?;
    let figure = layout.layout(&frame, &palette, &request.settings)?;
    timer.mark(Phase::Rendering);

    let text = figure.to_svg()?;
    timer.mark(Phase::SvgConversion);

    let mut doc = Document::parse(&text)?;
    let reconciliation = reconcile(&doc, &frame, &palette)?;
    match request.settings.glyphs {
        GlyphPolicy::Strip => {
            strip_glyphs(&mut doc, &reconciliation.glyphs);
        }
        GlyphPolicy::Annotate => {
            let tags = reconciliation
                .glyphs
                .iter()
                .zip(&reconciliation.points)
                .map(|(&node, point)| (node, point.id.as_str(), point.series.as_str()));
            annotate_glyphs(&mut doc, tags);
        }
    }
    let svg = doc.to_xml_string()?;
    timer.mark(Phase::AddingAnnotations);

    let timings = timer.finish();
    info!(
        "rendered {} series, {} points in {} ms",
        frame.series_count(),
        reconciliation.points.len(),
        timings.total()
    );

    Ok(RenderOutput {
        timings,
        svg,
        points: reconciliation.points,
    })
}

/// Positional form of [`render`]
///
/// `title`, `x_label` and `y_label` may be empty to omit them.
pub fn render_chart(
    figure_size: (f64, f64),
    series: &[Series],
    colors: Option<&[Color]>,
    title: &str,
    x_label: &str,
    y_label: &str,
    dot_size: f64,
) -> Result<RenderOutput> {
    let settings = PlotSettings {
        figure_size,
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        dot_size,
        ..PlotSettings::default()
    };
    let request = RenderRequest {
        series: series.to_vec(),
        colors: colors.map(<[Color]>::to_vec),
        settings,
    };
    render(&request)
}
