//! Image primitives in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Buffer** | [`ImageBuffer`], [`ImageBatch`] (height × width × channels, 8-bit) |
//! | **Resize (default)** | [`NearestResampler`], integer index mapping |
//! | **Resize (opt-in)** | [`FilteredResampler`], `image::imageops::resize` |
//! | **Decode / encode** | `image` crate, see [`codec`] |
//!
//! The module is split into:
//! - **Buffer**: pixel containers and shape accessors
//! - **Calculations**: pure functions for collage geometry (unit testable)
//! - **Parameters**: row height hint and filter selection
//! - **Backend**: [`Resampler`] trait
//! - **Resample**: the resampler implementations
//! - **Codec**: file I/O for the CLI

pub mod backend;
pub mod buffer;
pub mod calculations;
pub mod codec;
mod params;
pub mod resample;

pub use backend::Resampler;
pub use buffer::{Dimensions, ImageBatch, ImageBuffer};
pub use params::{ResampleFilter, RowHeight};
pub use resample::{FilteredResampler, NearestResampler, resampler_for};
