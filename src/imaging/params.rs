//! Parameter types for collage operations.
//!
//! - [`RowHeight`]: Target row height hint (100–1024, default 300). Clamped on construction.
//! - [`ResampleFilter`]: Which resampling policy resizes go through. Nearest by default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target row height in pixels (100-1024).
///
/// This is a hint: rows are normally as tall as their shortest image.
/// See [`crate::config::CollageSection::cap_row_height`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHeight(u32);

impl RowHeight {
    pub const MIN: u32 = 100;
    pub const MAX: u32 = 1024;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for RowHeight {
    fn default() -> Self {
        Self(300)
    }
}

/// Resampling policy used for every resize in the pipeline.
///
/// `Nearest` copies the closest source pixel and is the baseline: layout is
/// the goal, not visual quality, and hard edges in thumbnails stay legible.
/// The interpolating filters are opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    #[default]
    Nearest,
    Triangle,
    CatmullRom,
    Lanczos3,
}

impl ResampleFilter {
    pub const ALL: [ResampleFilter; 4] = [
        ResampleFilter::Nearest,
        ResampleFilter::Triangle,
        ResampleFilter::CatmullRom,
        ResampleFilter::Lanczos3,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResampleFilter::Nearest => "nearest",
            ResampleFilter::Triangle => "triangle",
            ResampleFilter::CatmullRom => "catmull-rom",
            ResampleFilter::Lanczos3 => "lanczos3",
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResampleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|f| f.name()).collect();
                format!("unknown filter '{s}' (expected one of: {})", names.join(", "))
            })
    }
}
