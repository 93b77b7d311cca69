//! Row normalization: common row heights and one shared canvas width.
//!
//! Three steps, with a single barrier between them:
//!
//! ```text
//! A  per row (parallel)   height = shortest image; resize each image to
//!                         (height, round(height * its aspect ratio))
//! B  all rows (barrier)   canvas width = widest row total after A
//! C  per row (parallel)   widest image absorbs canvas - total, one resize
//! ```
//!
//! Step B measures rows after the step A resizes, not at source size, so
//! the step C delta only covers rounding and row imbalance.
//!
//! The row height is never taller than the shortest image in the row, so
//! no image is upscaled past a smaller neighbour. Rows never share buffers,
//! so each rayon task owns its row outright and nothing is locked.

use crate::error::{CollageError, Result};
use crate::imaging::calculations::{
    canvas_width, reconcile, row_height, scaled_width, within_tolerance,
};
use crate::imaging::{ImageBuffer, Resampler};
use crate::layout::RowAdjustment;
use rayon::prelude::*;

/// A row whose images share one height and add up to the canvas width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub height: u32,
    /// Input indices, left to right.
    pub sources: Vec<usize>,
    pub images: Vec<ImageBuffer>,
    /// Widths after step A, before reconciliation.
    pub scaled_widths: Vec<u32>,
    pub adjustment: Option<RowAdjustment>,
}

impl NormalizedRow {
    pub fn width(&self) -> u32 {
        self.images.iter().map(ImageBuffer::width).sum()
    }

    pub fn widths(&self) -> Vec<u32> {
        self.images.iter().map(ImageBuffer::width).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRows {
    pub canvas_width: u32,
    pub rows: Vec<NormalizedRow>,
}

/// Step A for one row.
fn scale_row(
    images: &[ImageBuffer],
    row: &[usize],
    cap: Option<u32>,
    resampler: &dyn Resampler,
) -> Result<NormalizedRow> {
    let height = row_height(row.iter().map(|&i| images[i].height()), cap).unwrap_or(1);
    let resized = row
        .iter()
        .map(|&i| {
            let img = &images[i];
            resampler.resize(img, height, scaled_width(img.dimensions(), height))
        })
        .collect::<Result<Vec<_>>>()?;
    let scaled_widths = resized.iter().map(ImageBuffer::width).collect();

    Ok(NormalizedRow {
        height,
        sources: row.to_vec(),
        images: resized,
        scaled_widths,
        adjustment: None,
    })
}

/// Step C for one row.
fn reconcile_row(
    row_index: usize,
    mut row: NormalizedRow,
    canvas: u32,
    resampler: &dyn Resampler,
) -> Result<NormalizedRow> {
    if let Some(adj) = reconcile(&row.widths(), canvas) {
        let adjusted = resampler.resize(&row.images[adj.index], row.height, adj.new_width)?;
        row.images[adj.index] = adjusted;
        row.adjustment = Some(RowAdjustment {
            image: row.sources[adj.index],
            delta: adj.delta,
        });
    }

    let total = row.width();
    if !within_tolerance(total, canvas) {
        return Err(CollageError::WidthReconciliation {
            row: row_index,
            expected: canvas,
            actual: total,
        });
    }
    Ok(row)
}

/// Normalize distributed rows. Empty rows are dropped.
///
/// `cap` optionally limits the row height (see
/// [`CollageSection::cap_row_height`](crate::config::CollageSection::cap_row_height)).
#[tracing::instrument(skip_all, fields(rows = rows.len()))]
pub fn normalize_rows(
    images: &[ImageBuffer],
    rows: &[Vec<usize>],
    cap: Option<u32>,
    resampler: &dyn Resampler,
) -> Result<NormalizedRows> {
    let scaled: Vec<NormalizedRow> = rows
        .par_iter()
        .filter(|row| !row.is_empty())
        .map(|row| scale_row(images, row, cap, resampler))
        .collect::<Result<_>>()?;

    let canvas = canvas_width(scaled.iter().map(NormalizedRow::width));
    tracing::debug!(canvas_width = canvas, "canvas width fixed");

    let rows: Vec<NormalizedRow> = scaled
        .into_par_iter()
        .enumerate()
        .map(|(i, row)| reconcile_row(i, row, canvas, resampler))
        .collect::<Result<_>>()?;

    Ok(NormalizedRows {
        canvas_width: canvas,
        rows,
    })
}
