//! Plot configuration
//!
//! [`PlotSettings`] carries everything about a chart that is not data:
//! figure size, labels, marker size, jitter, transparency, the jitter seed
//! and what happens to the point glyphs once they are reconciled. Settings
//! (and whole render requests) can be loaded from TOML, YAML or JSON files.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What the document surgeon does with reconciled point glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphPolicy {
    /// Remove the glyphs; the static image keeps only density shapes
    #[default]
    Strip,
    /// Keep the glyphs and tag them with `data-id` / `data-series`
    Annotate,
}

/// Chart settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    /// Figure size in inches `(width, height)`
    pub figure_size: (f64, f64),
    /// Chart title; empty for none
    pub title: String,
    /// X-axis label
    pub x_label: String,
    /// Y-axis label
    pub y_label: String,
    /// Point marker diameter in points
    pub dot_size: f64,
    /// Horizontal jitter, as a fraction of one category slot on each side
    pub jitter: f64,
    /// Fill opacity of the violin bodies
    pub violin_alpha: f64,
    /// Fill opacity of the point glyphs
    pub point_alpha: f64,
    /// Seed for the jitter random source
    pub seed: u64,
    /// Strip or annotate reconciled glyphs
    pub glyphs: GlyphPolicy,
}

impl Default for PlotSettings {
    fn default() -> Self {
        PlotSettings {
            figure_size: (8.0, 6.0),
            title: String::new(),
            x_label: "Series".to_string(),
            y_label: "Normalized Score (0-1)".to_string(),
            dot_size: 5.0,
            jitter: 0.14,
            violin_alpha: 0.5,
            point_alpha: 0.9,
            seed: 42,
            glyphs: GlyphPolicy::Strip,
        }
    }
}

impl PlotSettings {
    /// Load settings from a `.toml`, `.yaml`/`.yml` or `.json` file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: PlotSettings = load_file(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the layout cannot draw
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.figure_size;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(Error::Config(format!(
                "figure size must be positive, got ({}, {})",
                width, height
            )));
        }
        if !(self.dot_size > 0.0 && self.dot_size.is_finite()) {
            return Err(Error::Config(format!(
                "dot size must be positive, got {}",
                self.dot_size
            )));
        }
        if !(0.0..=0.5).contains(&self.jitter) {
            return Err(Error::Config(format!(
                "jitter must be within [0, 0.5], got {}",
                self.jitter
            )));
        }
        for (name, alpha) in [("violin_alpha", self.violin_alpha), ("point_alpha", self.point_alpha)] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(Error::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, alpha
                )));
            }
        }
        Ok(())
    }

    /// Figure size in points (72 per inch)
    pub fn size_in_points(&self) -> (f64, f64) {
        (self.figure_size.0 * 72.0, self.figure_size.1 * 72.0)
    }
}

/// Deserialize a file, picking the format from its extension
pub fn load_file<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let text = fs::read_to_string(path)?;

    match extension.as_str() {
        "toml" => Ok(toml::from_str(&text)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(&text)?),
        "json" => serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("invalid JSON in {}: {}", path.display(), e))),
        other => Err(Error::Config(format!(
            "unsupported config format '{}' for {}",
            other,
            path.display()
        ))),
    }
}
