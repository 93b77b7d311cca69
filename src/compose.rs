//! Compositing: images into row strips, strips into the final buffer.
//!
//! Channel counts are checked across every image before any bytes are
//! copied, so a mismatch never surfaces halfway through a concatenation.

use crate::error::{CollageError, Result};
use crate::imaging::ImageBuffer;
use crate::normalize::{NormalizedRow, NormalizedRows};

/// Check that all images share one channel count and return it.
///
/// The reported index is the position in `images` of the first offender.
pub fn check_channels<'a>(images: impl IntoIterator<Item = &'a ImageBuffer>) -> Result<u32> {
    let mut iter = images.into_iter();
    let Some(first) = iter.next() else {
        return Err(CollageError::EmptyInput);
    };
    let expected = first.channels();
    for (i, img) in iter.enumerate() {
        if img.channels() != expected {
            return Err(CollageError::ChannelMismatch {
                index: i + 1,
                expected,
                actual: img.channels(),
            });
        }
    }
    Ok(expected)
}

/// Place images side by side, left to right. All must share one height.
pub fn concat_horizontal(row: usize, images: &[ImageBuffer]) -> Result<ImageBuffer> {
    let channels = check_channels(images)?;
    let height = images[0].height();
    if let Some((index, img)) = images
        .iter()
        .enumerate()
        .find(|(_, img)| img.height() != height)
    {
        return Err(CollageError::HeightMismatch {
            row,
            index,
            expected: height,
            actual: img.height(),
        });
    }

    let width: u32 = images.iter().map(ImageBuffer::width).sum();
    let stride = width as usize * channels as usize;
    let mut data = Vec::with_capacity(height as usize * stride);
    for y in 0..height {
        for img in images {
            data.extend_from_slice(img.row(y));
        }
    }
    ImageBuffer::new(height, width, channels, data)
}

/// Stack row strips top to bottom. All must share one width.
pub fn concat_vertical(strips: &[ImageBuffer]) -> Result<ImageBuffer> {
    let channels = check_channels(strips)?;
    let width = strips[0].width();
    if let Some((row, strip)) = strips
        .iter()
        .enumerate()
        .find(|(_, s)| s.width() != width)
    {
        return Err(CollageError::WidthReconciliation {
            row,
            expected: width,
            actual: strip.width(),
        });
    }

    let height: u32 = strips.iter().map(ImageBuffer::height).sum();
    let mut data = Vec::with_capacity(strips.iter().map(|s| s.as_raw().len()).sum());
    for strip in strips {
        data.extend_from_slice(strip.as_raw());
    }
    ImageBuffer::new(height, width, channels, data)
}

/// Check channels across every row. A mismatch reports the offending
/// image's input index (its entry in [`NormalizedRow::sources`]).
fn check_row_channels(rows: &[NormalizedRow]) -> Result<u32> {
    let mut placed = rows
        .iter()
        .flat_map(|row| row.sources.iter().copied().zip(&row.images));
    let Some((_, first)) = placed.next() else {
        return Err(CollageError::EmptyInput);
    };
    let expected = first.channels();
    match placed.find(|(_, img)| img.channels() != expected) {
        Some((index, img)) => Err(CollageError::ChannelMismatch {
            index,
            expected,
            actual: img.channels(),
        }),
        None => Ok(expected),
    }
}

/// Build the composite from normalized rows, keeping row and image order.
#[tracing::instrument(skip_all, fields(rows = rows.rows.len(), canvas_width = rows.canvas_width))]
pub fn compose(rows: &NormalizedRows) -> Result<ImageBuffer> {
    check_row_channels(&rows.rows)?;

    let strips = rows
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| concat_horizontal(i, &row.images))
        .collect::<Result<Vec<_>>>()?;

    if let Some((row, strip)) = strips
        .iter()
        .enumerate()
        .find(|(_, s)| s.width() != rows.canvas_width)
    {
        return Err(CollageError::WidthReconciliation {
            row,
            expected: rows.canvas_width,
            actual: strip.width(),
        });
    }

    concat_vertical(&strips)
}
