//! Shared test utilities for the simple-collage test suite.
//!
//! Provides buffer fixtures and row-geometry assertions used across the
//! layout, normalize, compose, and collage tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let images = vec![solid(200, 300, 3, 10), gradient(400, 300, 3)];
//! let rows = normalize_rows(&images, &[vec![0], vec![1]], None, &NearestResampler).unwrap();
//! assert_rows_match_canvas(&rows);
//! ```

use crate::imaging::ImageBuffer;
use crate::normalize::NormalizedRows;

// =========================================================================
// Buffer fixtures
// =========================================================================

/// A `height` x `width` buffer with every sample set to `value`.
pub fn solid(height: u32, width: u32, channels: u32, value: u8) -> ImageBuffer {
    ImageBuffer::new(
        height,
        width,
        channels,
        vec![value; height as usize * width as usize * channels as usize],
    )
    .unwrap()
}

/// A buffer whose samples vary with position and channel, so resizes and
/// concatenation order are visible in the output.
pub fn gradient(height: u32, width: u32, channels: u32) -> ImageBuffer {
    ImageBuffer::from_fn(height, width, channels, |y, x, c| {
        ((y * 7 + x * 13 + c * 101) % 256) as u8
    })
    .unwrap()
}

/// Fixtures for the four-image scenario: (height, width) of
/// (200, 300), (400, 300), (450, 150), (250, 250).
pub fn four_image_scenario(channels: u32) -> Vec<ImageBuffer> {
    [(200, 300), (400, 300), (450, 150), (250, 250)]
        .into_iter()
        .map(|(h, w)| gradient(h, w, channels))
        .collect()
}

// =========================================================================
// Geometry assertions
// =========================================================================

/// Assert every row has one common height and exactly the canvas width.
pub fn assert_rows_match_canvas(rows: &NormalizedRows) {
    for (r, row) in rows.rows.iter().enumerate() {
        for (i, img) in row.images.iter().enumerate() {
            assert_eq!(
                img.height(),
                row.height,
                "row {r} image {i} height differs from row height"
            );
        }
        assert_eq!(
            row.width(),
            rows.canvas_width,
            "row {r} width {:?} does not add up to canvas width",
            row.widths()
        );
    }
}
