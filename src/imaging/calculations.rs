//! Pure calculation functions for collage geometry.
//!
//! All functions here are pure and testable without any pixels. Both the
//! layout planner and the renderer call them, so a plan always describes
//! exactly the composite that rendering produces.

use super::buffer::Dimensions;

/// Maximum allowed difference between a reconciled row and the canvas width.
pub const WIDTH_TOLERANCE: u32 = 1;

/// Number of rows for `count` images: `max(1, ceil(sqrt(count)))`.
///
/// # Examples
/// ```
/// # use simple_collage::imaging::calculations::row_count;
/// assert_eq!(row_count(4), 2);
/// assert_eq!(row_count(5), 3);
/// assert_eq!(row_count(0), 1);
/// ```
pub fn row_count(count: usize) -> usize {
    let root = count.isqrt();
    let rows = if root * root < count { root + 1 } else { root };
    rows.max(1)
}

/// Width of an image scaled to `row_height`, preserving its aspect ratio.
///
/// Rounds to the nearest pixel and never returns less than 1.
///
/// # Examples
/// ```
/// # use simple_collage::imaging::{Dimensions, calculations::scaled_width};
/// // 300x200 (w x h) at 150 high -> 225 wide
/// assert_eq!(scaled_width(Dimensions::new(300, 200), 150), 225);
/// ```
pub fn scaled_width(source: Dimensions, row_height: u32) -> u32 {
    let width = (row_height as f64 * source.aspect_ratio()).round();
    (width as u32).max(1)
}

/// Common height of a row: its shortest image, optionally capped.
///
/// Returns `None` for an empty row.
pub fn row_height(heights: impl IntoIterator<Item = u32>, cap: Option<u32>) -> Option<u32> {
    let min = heights.into_iter().min()?;
    Some(match cap {
        Some(cap) => min.min(cap),
        None => min,
    })
}

/// Canvas width: the widest row total. `0` when there are no rows.
pub fn canvas_width(row_totals: impl IntoIterator<Item = u32>) -> u32 {
    row_totals.into_iter().max().unwrap_or(0)
}

/// Index of the widest entry; ties go to the lowest index.
pub fn widest_index(widths: &[u32]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (i, &w) in widths.iter().enumerate() {
        if best.is_none_or(|(_, bw)| w > bw) {
            best = Some((i, w));
        }
    }
    best.map(|(i, _)| i)
}

/// The single width change that makes a row add up to `canvas_width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthAdjustment {
    /// Position of the adjusted image within its row.
    pub index: usize,
    /// Signed correction added to that image's width.
    pub delta: i64,
    /// The image's width after correction.
    pub new_width: u32,
}

/// Plan the reconciliation of one row against the canvas width.
///
/// The whole signed delta goes to the widest image. Returns `None` when the
/// row already matches, or is empty. The new width is floored at 1 pixel;
/// [`within_tolerance`] catches the case where that floor leaves a gap.
pub fn reconcile(widths: &[u32], canvas_width: u32) -> Option<WidthAdjustment> {
    let total: i64 = widths.iter().map(|&w| w as i64).sum();
    let delta = canvas_width as i64 - total;
    if delta == 0 {
        return None;
    }
    let index = widest_index(widths)?;
    let new_width = (widths[index] as i64 + delta).max(1) as u32;
    Some(WidthAdjustment {
        index,
        delta,
        new_width,
    })
}

/// Whether a row total is within [`WIDTH_TOLERANCE`] of the canvas width.
pub fn within_tolerance(total: u32, canvas_width: u32) -> bool {
    total.abs_diff(canvas_width) <= WIDTH_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // row_count tests
    // =========================================================================

    #[test]
    fn row_count_perfect_squares() {
        assert_eq!(row_count(1), 1);
        assert_eq!(row_count(4), 2);
        assert_eq!(row_count(9), 3);
        assert_eq!(row_count(16), 4);
    }

    #[test]
    fn row_count_rounds_up() {
        assert_eq!(row_count(2), 2);
        assert_eq!(row_count(3), 2);
        assert_eq!(row_count(5), 3);
        assert_eq!(row_count(10), 4);
    }

    #[test]
    fn row_count_never_zero() {
        assert_eq!(row_count(0), 1);
    }

    // =========================================================================
    // scaled_width tests
    // =========================================================================

    #[test]
    fn scaled_width_preserves_aspect() {
        // 400 wide x 300 high at 200 high -> 267 (266.67 rounded)
        assert_eq!(scaled_width(Dimensions::new(400, 300), 200), 267);
    }

    #[test]
    fn scaled_width_rounds_half_up() {
        // 3 wide x 2 high at 1 high -> 1.5 -> 2
        assert_eq!(scaled_width(Dimensions::new(3, 2), 1), 2);
    }

    #[test]
    fn scaled_width_same_height_is_identity() {
        assert_eq!(scaled_width(Dimensions::new(450, 150), 150), 450);
    }

    #[test]
    fn scaled_width_floors_at_one() {
        // Extremely tall sliver
        assert_eq!(scaled_width(Dimensions::new(1, 1000), 10), 1);
    }

    // =========================================================================
    // row_height / canvas_width tests
    // =========================================================================

    #[test]
    fn row_height_is_shortest_image() {
        assert_eq!(row_height([300, 200, 450], None), Some(200));
    }

    #[test]
    fn row_height_respects_cap() {
        assert_eq!(row_height([300, 500], Some(250)), Some(250));
        assert_eq!(row_height([300, 500], Some(400)), Some(300));
    }

    #[test]
    fn row_height_empty_row() {
        assert_eq!(row_height(std::iter::empty(), None), None);
    }

    #[test]
    fn canvas_width_is_widest_row() {
        assert_eq!(canvas_width([600, 900, 750]), 900);
        assert_eq!(canvas_width(std::iter::empty()), 0);
    }

    // =========================================================================
    // reconcile tests
    // =========================================================================

    #[test]
    fn widest_index_prefers_lowest_on_tie() {
        assert_eq!(widest_index(&[100, 300, 300, 200]), Some(1));
        assert_eq!(widest_index(&[]), None);
    }

    #[test]
    fn reconcile_no_change_when_matching() {
        assert_eq!(reconcile(&[300, 200], 500), None);
    }

    #[test]
    fn reconcile_widens_widest_image() {
        let adj = reconcile(&[150, 300, 100], 600).unwrap();
        assert_eq!(
            adj,
            WidthAdjustment {
                index: 1,
                delta: 50,
                new_width: 350
            }
        );
    }

    #[test]
    fn reconcile_shrinks_with_negative_delta() {
        let adj = reconcile(&[400, 250], 600).unwrap();
        assert_eq!(adj.index, 0);
        assert_eq!(adj.delta, -50);
        assert_eq!(adj.new_width, 350);
    }

    #[test]
    fn reconcile_empty_row() {
        assert_eq!(reconcile(&[], 100), None);
    }

    #[test]
    fn tolerance_is_one_pixel() {
        assert!(within_tolerance(600, 600));
        assert!(within_tolerance(599, 600));
        assert!(within_tolerance(601, 600));
        assert!(!within_tolerance(598, 600));
    }
}
