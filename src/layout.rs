//! Row distribution and dimension-only layout planning.
//!
//! ## Distribution
//!
//! Images are dealt into `ceil(sqrt(N))` rows by a greedy balancing pass:
//!
//! 1. Order image indices by aspect ratio, widest first. The sort is stable,
//!    so equal ratios keep their input order.
//! 2. Give each image to the row with the smallest running total of source
//!    widths. Equal totals go to the lowest row index.
//!
//! This is not optimal partitioning and must not become one: the exact row
//! assignments are part of the output contract, and callers snapshot them.
//! With fewer images than rows some rows stay empty; they are dropped later,
//! the row count is never reduced up front.
//!
//! ## Planning
//!
//! [`plan_layout`] runs the whole geometric pipeline on [`Dimensions`] alone:
//! row heights, scaled widths, canvas width, and the single-image width
//! correction per row. It uses the same [`calculations`] the renderer uses,
//! so a plan describes the rendered composite exactly.

use crate::error::{CollageError, Result};
use crate::imaging::Dimensions;
use crate::imaging::calculations::{
    self, WidthAdjustment, canvas_width, reconcile, row_count, scaled_width, within_tolerance,
};
use serde::Serialize;

/// Row assignments: each row lists input indices, left to right.
pub type Rows = Vec<Vec<usize>>;

fn check_dimensions(dims: &[Dimensions]) -> Result<()> {
    if dims.is_empty() {
        return Err(CollageError::EmptyInput);
    }
    if let Some(d) = dims.iter().find(|d| d.width == 0 || d.height == 0) {
        return Err(CollageError::InvalidDimension {
            what: "image",
            height: d.height,
            width: d.width,
        });
    }
    Ok(())
}

/// Assign every image to a row. Returns exactly `row_count(N)` rows, some
/// of which may be empty when there are very few images.
pub fn distribute(dims: &[Dimensions]) -> Result<Rows> {
    check_dimensions(dims)?;

    let mut order: Vec<usize> = (0..dims.len()).collect();
    order.sort_by(|&a, &b| dims[b].aspect_ratio().total_cmp(&dims[a].aspect_ratio()));

    let num_rows = row_count(dims.len());
    let mut rows: Rows = vec![Vec::new(); num_rows];
    let mut totals = vec![0u64; num_rows];

    for idx in order {
        let mut target = 0;
        for r in 1..num_rows {
            if totals[r] < totals[target] {
                target = r;
            }
        }
        rows[target].push(idx);
        totals[target] += dims[idx].width as u64;
    }

    Ok(rows)
}

/// One image's place in the composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedImage {
    /// Position in the caller's input list.
    pub index: usize,
    pub source: Dimensions,
    /// Left edge within the row.
    pub x: u32,
    /// Final width after scaling and reconciliation.
    pub width: u32,
}

/// The width correction applied to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowAdjustment {
    /// Input index of the adjusted image.
    pub image: usize,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowPlan {
    /// Top edge within the composite.
    pub y: u32,
    pub height: u32,
    pub images: Vec<PlacedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<RowAdjustment>,
}

impl RowPlan {
    pub fn width(&self) -> u32 {
        self.images.iter().map(|i| i.width).sum()
    }
}

/// Complete geometry of a collage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutPlan {
    pub canvas_width: u32,
    pub height: u32,
    pub rows: Vec<RowPlan>,
}

fn placed(row: &[usize], dims: &[Dimensions], widths: &[u32]) -> Vec<PlacedImage> {
    let mut x = 0;
    row.iter()
        .zip(widths)
        .map(|(&index, &width)| {
            let p = PlacedImage {
                index,
                source: dims[index],
                x,
                width,
            };
            x += width;
            p
        })
        .collect()
}

/// Plan a collage from image dimensions.
///
/// `row_height_cap` optionally limits how tall a row may be. A single image
/// is laid out untouched at its own size.
pub fn plan_layout(dims: &[Dimensions], row_height_cap: Option<u32>) -> Result<LayoutPlan> {
    check_dimensions(dims)?;

    if let [only] = dims {
        return Ok(LayoutPlan {
            canvas_width: only.width,
            height: only.height,
            rows: vec![RowPlan {
                y: 0,
                height: only.height,
                images: placed(&[0], dims, &[only.width]),
                adjustment: None,
            }],
        });
    }

    let rows: Rows = distribute(dims)?
        .into_iter()
        .filter(|r| !r.is_empty())
        .collect();

    let scaled: Vec<(u32, Vec<u32>)> = rows
        .iter()
        .map(|row| {
            let heights = row.iter().map(|&i| dims[i].height);
            let height = calculations::row_height(heights, row_height_cap).unwrap_or(1);
            let widths = row.iter().map(|&i| scaled_width(dims[i], height)).collect();
            (height, widths)
        })
        .collect();

    let canvas = canvas_width(scaled.iter().map(|(_, w)| w.iter().sum()));

    let mut plans = Vec::with_capacity(rows.len());
    let mut y = 0;
    for (r, (row, (height, mut widths))) in rows.iter().zip(scaled).enumerate() {
        let adjustment = reconcile(&widths, canvas).map(|adj: WidthAdjustment| {
            widths[adj.index] = adj.new_width;
            RowAdjustment {
                image: row[adj.index],
                delta: adj.delta,
            }
        });

        let total: u32 = widths.iter().sum();
        if !within_tolerance(total, canvas) {
            return Err(CollageError::WidthReconciliation {
                row: r,
                expected: canvas,
                actual: total,
            });
        }

        plans.push(RowPlan {
            y,
            height,
            images: placed(row, dims, &widths),
            adjustment,
        });
        y += height;
    }

    Ok(LayoutPlan {
        canvas_width: canvas,
        height: y,
        rows: plans,
    })
}
