//! Series colors
//!
//! Callers may pass one color per series, either as a hex string or as an
//! RGB triple with channels in `[0, 1]`. Missing colors come from a fixed
//! palette. Every color is resolved to a lowercase `#rrggbb` string before
//! it reaches the layout or the point list.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The ten-color "bright" cycle, used when the caller gives no colors
pub const BRIGHT_PALETTE: [&str; 10] = [
    "#023eff", "#ff7c00", "#1ac938", "#e8000b", "#8b2be2", "#9f4800", "#f14cc1", "#a3a3a3",
    "#ffc400", "#00d7ff",
];

/// Color used for series past the end of a caller-supplied list
pub const FALLBACK_COLOR: Color = Color::Rgb(0.5, 0.5, 0.5);

/// A caller-supplied color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// `#rgb` or `#rrggbb`
    Hex(String),
    /// Red, green, blue in `[0, 1]`
    Rgb(f64, f64, f64),
}

impl Color {
    pub fn hex<S: Into<String>>(value: S) -> Self {
        Color::Hex(value.into())
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color::Rgb(r, g, b)
    }

    /// Normalized `#rrggbb` form
    ///
    /// Channels of an RGB triple are scaled by 255 and truncated.
    ///
    /// # Example
    /// ```
    /// use violin_swarm::vis::Color;
    ///
    /// assert_eq!(Color::rgb(0.5, 0.5, 0.5).to_hex().unwrap(), "#7f7f7f");
    /// assert_eq!(Color::hex("#F0A").to_hex().unwrap(), "#ff00aa");
    /// ```
    pub fn to_hex(&self) -> Result<String> {
        match self {
            Color::Hex(value) => normalize_hex(value),
            Color::Rgb(r, g, b) => {
                let mut out = String::from("#");
                for channel in [*r, *g, *b] {
                    if !(0.0..=1.0).contains(&channel) {
                        return Err(Error::InvalidColor(format!(
                            "RGB channel {} is outside [0, 1]",
                            channel
                        )));
                    }
                    out.push_str(&format!("{:02x}", (channel * 255.0) as u8));
                }
                Ok(out)
            }
        }
    }
}

fn normalize_hex(value: &str) -> Result<String> {
    let digits = value
        .strip_prefix('#')
        .ok_or_else(|| Error::InvalidColor(format!("'{}' does not start with '#'", value)))?;

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor(format!(
            "'{}' contains non-hex characters",
            value
        )));
    }

    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => {
            return Err(Error::InvalidColor(format!(
                "'{}' must have 3 or 6 hex digits",
                value
            )))
        }
    };

    Ok(format!("#{}", expanded.to_ascii_lowercase()))
}

/// Resolved color per series, by declaration index
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Default palette for `n` series; cycles after ten colors
    pub fn bright(n: usize) -> Self {
        Palette {
            colors: (0..n)
                .map(|i| BRIGHT_PALETTE[i % BRIGHT_PALETTE.len()].to_string())
                .collect(),
        }
    }

    /// Resolve caller colors for `n` series
    ///
    /// `None` selects [`Palette::bright`]. A list shorter than `n` is padded
    /// with [`FALLBACK_COLOR`]; extra entries are ignored.
    pub fn resolve(colors: Option<&[Color]>, n: usize) -> Result<Self> {
        let Some(colors) = colors else {
            return Ok(Self::bright(n));
        };

        let mut resolved = Vec::with_capacity(n);
        for i in 0..n {
            resolved.push(colors.get(i).unwrap_or(&FALLBACK_COLOR).to_hex()?);
        }
        Ok(Palette { colors: resolved })
    }

    /// Color of series `index`
    pub fn get(&self, index: usize) -> Option<&str> {
        self.colors.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
