use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::LayoutEngine;
use crate::error::{Error, Result};
use crate::frame::ObservationFrame;
use crate::stats::{self, DensityCurve, KdeSettings};
use crate::vis::color::Palette;
use crate::vis::config::PlotSettings;
use crate::vis::figure::{Axes, Figure, PointCollection, Rect, Tick, ViolinBody, ViolinShape};

/// Space around the plot area, in points
const MARGIN_LEFT: f64 = 62.0;
const MARGIN_RIGHT: f64 = 12.0;
const MARGIN_TOP: f64 = 12.0;
const MARGIN_BOTTOM: f64 = 42.0;
const TITLE_SPACE: f64 = 28.0;
const X_LABEL_SPACE: f64 = 18.0;

/// Widest a violin may get, as a fraction of its category slot
const VIOLIN_WIDTH: f64 = 0.8;
/// Fraction of the value range added above and below the data
const Y_PADDING: f64 = 0.05;
const X_TICK_ROTATION: f64 = 15.0;

/// Default layout: Gaussian KDE violins with uniformly jittered points
///
/// Horizontal jitter is drawn from a [`StdRng`] seeded with
/// [`PlotSettings::seed`] at the start of the point stage; the density stage
/// is deterministic. Two calls with the same frame and settings therefore
/// produce the same figure.
#[derive(Debug, Clone, Default)]
pub struct ViolinSwarmLayout {
    kde: KdeSettings,
}

impl ViolinSwarmLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom density estimation settings
    pub fn with_kde(mut self, kde: KdeSettings) -> Self {
        self.kde = kde;
        self
    }
}

impl LayoutEngine for ViolinSwarmLayout {
    fn layout(
        &self,
        frame: &ObservationFrame,
        palette: &Palette,
        settings: &PlotSettings,
    ) -> Result<Figure> {
        settings.validate()?;
        let (width, height) = settings.size_in_points();
        let area = plot_area(width, height, settings)?;

        let series_count = frame.series_count();
        let slot = area.width / series_count as f64;
        let centers: Vec<f64> = (0..series_count)
            .map(|i| area.x + slot * (i as f64 + 0.5))
            .collect();
        let color = |i: usize| palette.get(i).unwrap_or("#7f7f7f").to_string();

        // Density stage
        let mut curves = Vec::with_capacity(series_count);
        for i in 0..series_count {
            let values: Vec<f64> = frame
                .series_rows(i)
                .iter()
                .map(|o| o.normalized_value)
                .collect();
            curves.push(stats::gaussian_kde(&values, &self.kde)?);
        }
        let scale = ValueScale::fit(&curves, area);

        let half_width = slot * VIOLIN_WIDTH / 2.0;
        let violins = curves
            .iter()
            .enumerate()
            .map(|(i, curve)| {
                let shape = match curve {
                    Some(curve) => ViolinShape::Body(outline(curve, centers[i], half_width, &scale)),
                    None => {
                        let value = frame
                            .series_rows(i)
                            .first()
                            .map(|o| o.normalized_value)
                            .unwrap_or(0.0);
                        ViolinShape::Flat {
                            y: scale.to_screen(value),
                            half_width,
                        }
                    }
                };
                ViolinBody {
                    series_index: i,
                    center: centers[i],
                    color: color(i),
                    alpha: settings.violin_alpha,
                    shape,
                }
            })
            .collect();

        // Point stage: fresh random source, same seed on every call
        let mut rng = StdRng::seed_from_u64(settings.seed);
        let spread = settings.jitter;
        let mut collections = Vec::with_capacity(series_count);
        for (i, &center) in centers.iter().enumerate() {
            let points = frame
                .ranked_by_value(i)
                .into_iter()
                .map(|o| {
                    let offset: f64 = rng.random_range(-spread..=spread);
                    (center + offset * slot, scale.to_screen(o.normalized_value))
                })
                .collect();
            collections.push(PointCollection {
                series_index: i,
                color: color(i),
                alpha: settings.point_alpha,
                radius: settings.dot_size / 2.0,
                points,
            });
        }

        debug!(
            "laid out {} series in a {}x{}pt figure (value range {:.3}..{:.3})",
            series_count, width, height, scale.lo, scale.hi
        );

        Ok(Figure {
            width,
            height,
            title: (!settings.title.is_empty()).then(|| settings.title.clone()),
            axes: Axes {
                area,
                x_ticks: frame
                    .series_names()
                    .iter()
                    .zip(&centers)
                    .map(|(name, &position)| Tick {
                        position,
                        label: name.clone(),
                    })
                    .collect(),
                y_ticks: (0..=5)
                    .map(|k| {
                        let value = k as f64 * 0.2;
                        Tick {
                            position: scale.to_screen(value),
                            label: format!("{:.1}", value),
                        }
                    })
                    .collect(),
                x_label: settings.x_label.clone(),
                y_label: settings.y_label.clone(),
                x_tick_rotation: X_TICK_ROTATION,
            },
            violins,
            collections,
        })
    }
}

fn plot_area(width: f64, height: f64, settings: &PlotSettings) -> Result<Rect> {
    let top = MARGIN_TOP + if settings.title.is_empty() { 0.0 } else { TITLE_SPACE };
    let bottom = MARGIN_BOTTOM + if settings.x_label.is_empty() { 0.0 } else { X_LABEL_SPACE };
    let area = Rect {
        x: MARGIN_LEFT,
        y: top,
        width: width - MARGIN_LEFT - MARGIN_RIGHT,
        height: height - top - bottom,
    };
    if area.width <= 0.0 || area.height <= 0.0 {
        return Err(Error::Config(format!(
            "figure of {}x{}pt leaves no room for the plot area",
            width, height
        )));
    }
    Ok(area)
}

/// Maps normalized values to screen y (larger value, smaller y)
struct ValueScale {
    lo: f64,
    hi: f64,
    area: Rect,
}

impl ValueScale {
    /// Cover `[0, 1]` and every density support, plus padding
    fn fit(curves: &[Option<DensityCurve>], area: Rect) -> Self {
        let (lo, hi) = curves
            .iter()
            .flatten()
            .map(DensityCurve::extent)
            .fold((0.0_f64, 1.0_f64), |(lo, hi), (a, b)| (lo.min(a), hi.max(b)));
        let pad = (hi - lo) * Y_PADDING;
        ValueScale {
            lo: lo - pad,
            hi: hi + pad,
            area,
        }
    }

    fn to_screen(&self, value: f64) -> f64 {
        self.area.y + (self.hi - value) / (self.hi - self.lo) * self.area.height
    }
}

fn outline(curve: &DensityCurve, center: f64, half_width: f64, scale: &ValueScale) -> Vec<(f64, f64)> {
    let peak = curve.peak();
    let widen = if peak > 0.0 { half_width / peak } else { 0.0 };

    let right = curve
        .support
        .iter()
        .zip(&curve.density)
        .map(|(&v, &d)| (center + d * widen, scale.to_screen(v)));
    let left = curve
        .support
        .iter()
        .zip(&curve.density)
        .rev()
        .map(|(&v, &d)| (center - d * widen, scale.to_screen(v)));
    right.chain(left).collect()
}
