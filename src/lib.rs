//! # Simple Collage
//!
//! Combines a list of images into one rectangular composite. Images are
//! dealt into roughly balanced rows, every row is scaled to a common height,
//! the rows are brought to one shared width, and the result is stacked top
//! to bottom.
//!
//! # Architecture: Four-Step Pipeline
//!
//! ```text
//! 1. Distribute   dimensions  →  rows          (greedy balancing by width)
//! 2. Normalize    rows        →  equal heights (per-row resize, step A)
//!                             →  canvas width  (widest row, step B)
//!                             →  equal widths  (one image per row absorbs the gap, step C)
//! 3. Compose      rows        →  composite     (horizontal, then vertical concatenation)
//! 4. Report       events      →  CLI output / layout JSON
//! ```
//!
//! The geometry is fully determined by image dimensions, so [`layout::plan_layout`]
//! computes the same layout without touching pixels. The CLI uses it for the
//! `plan` command and `--layout-json`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`collage`] | Pipeline entry point, options, and progress events |
//! | [`layout`] | Row distribution and dimension-only layout planning |
//! | [`normalize`] | Row height normalization and width reconciliation |
//! | [`compose`] | Channel checks and buffer concatenation |
//! | [`imaging`] | Pixel buffers, resamplers, geometry calculations, file codec |
//! | [`config`] | `config.toml` loading, validation, and merging |
//! | [`error`] | [`CollageError`], the pipeline's error type |
//! | [`output`] | CLI output formatting for events and plans |
//!
//! # Design Decisions
//!
//! ## Deterministic Output
//!
//! The same input list always produces the same bytes. Row assignment uses a
//! stable sort and lowest-index tie breaks, resizing is pure integer math by
//! default, and rows resized in parallel are collected back in order.
//!
//! ## Nearest-Neighbour by Default
//!
//! Collages are often built from screenshots and diagrams where interpolation
//! blurs text. Nearest-neighbour keeps hard edges; smoother filters are one
//! config key away (`[resampling] filter`).
//!
//! ## Rows Take Their Shortest Image's Height
//!
//! A row is never taller than its smallest member, so nothing in a row is
//! upscaled vertically. The configured row height is a hint unless
//! `cap_row_height` is set.

pub mod collage;
pub mod compose;
pub mod config;
pub mod error;
pub mod imaging;
pub mod layout;
pub mod normalize;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use collage::{
    Collage, CollageEvent, CollageOptions, create_collage, create_collage_from_batch,
    create_collage_with,
};
pub use error::{CollageError, Result};
pub use imaging::{Dimensions, ImageBatch, ImageBuffer, ResampleFilter, RowHeight};
pub use layout::{LayoutPlan, plan_layout};
