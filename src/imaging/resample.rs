//! Resampler implementations.
//!
//! | Policy | Implementation |
//! |---|---|
//! | Nearest (default) | index mapping `src = floor(dst * src_len / dst_len)`, integer math |
//! | Triangle / CatmullRom / Lanczos3 | `image::imageops::resize`, one plane per channel |
//!
//! Nearest never blends samples, so every output pixel exists verbatim in the
//! source and results are bit-identical across platforms.

use super::backend::{Resampler, check_target};
use super::buffer::ImageBuffer;
use super::params::ResampleFilter;
use crate::error::{CollageError, Result};
use image::GrayImage;
use image::imageops::FilterType;

/// Nearest-neighbour resampling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestResampler;

/// Source index for each destination index along one axis.
fn nearest_indices(src_len: u32, dst_len: u32) -> Vec<usize> {
    (0..dst_len as u64)
        .map(|d| {
            let s = d * src_len as u64 / dst_len as u64;
            s.min(src_len as u64 - 1) as usize
        })
        .collect()
}

impl Resampler for NearestResampler {
    fn resize(&self, image: &ImageBuffer, height: u32, width: u32) -> Result<ImageBuffer> {
        check_target(height, width)?;
        if (height, width) == (image.height(), image.width()) {
            return Ok(image.clone());
        }

        let channels = image.channels() as usize;
        let src_x = nearest_indices(image.width(), width);
        let src_y = nearest_indices(image.height(), height);
        let src = image.as_raw();
        let src_stride = image.row_stride();

        let mut data = Vec::with_capacity(height as usize * width as usize * channels);
        for &sy in &src_y {
            let row = &src[sy * src_stride..(sy + 1) * src_stride];
            for &sx in &src_x {
                data.extend_from_slice(&row[sx * channels..(sx + 1) * channels]);
            }
        }
        ImageBuffer::new(height, width, image.channels(), data)
    }
}

/// Interpolating resampler backed by the `image` crate.
///
/// Channels are resized as independent grey planes so any channel count
/// works. `ResampleFilter::Nearest` delegates to [`NearestResampler`].
#[derive(Debug, Clone, Copy)]
pub struct FilteredResampler {
    filter: ResampleFilter,
}

impl FilteredResampler {
    pub fn new(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }
}

fn filter_type(filter: ResampleFilter) -> FilterType {
    match filter {
        ResampleFilter::Nearest => FilterType::Nearest,
        ResampleFilter::Triangle => FilterType::Triangle,
        ResampleFilter::CatmullRom => FilterType::CatmullRom,
        ResampleFilter::Lanczos3 => FilterType::Lanczos3,
    }
}

/// One channel of an interleaved buffer as a grey image.
fn channel_plane(image: &ImageBuffer, channel: usize) -> Result<GrayImage> {
    let plane: Vec<u8> = image
        .as_raw()
        .iter()
        .skip(channel)
        .step_by(image.channels() as usize)
        .copied()
        .collect();
    let actual = plane.len();
    GrayImage::from_raw(image.width(), image.height(), plane).ok_or(CollageError::BufferSize {
        expected: image.width() as usize * image.height() as usize,
        actual,
    })
}

impl Resampler for FilteredResampler {
    fn resize(&self, image: &ImageBuffer, height: u32, width: u32) -> Result<ImageBuffer> {
        if self.filter == ResampleFilter::Nearest {
            return NearestResampler.resize(image, height, width);
        }
        check_target(height, width)?;
        if (height, width) == (image.height(), image.width()) {
            return Ok(image.clone());
        }

        let channels = image.channels() as usize;
        let filter = filter_type(self.filter);
        let planes = (0..channels)
            .map(|c| {
                let gray = channel_plane(image, c)?;
                Ok(image::imageops::resize(&gray, width, height, filter).into_raw())
            })
            .collect::<Result<Vec<Vec<u8>>>>()?;

        let pixels = height as usize * width as usize;
        let mut data = Vec::with_capacity(pixels * channels);
        for i in 0..pixels {
            for plane in &planes {
                data.push(plane[i]);
            }
        }
        ImageBuffer::new(height, width, image.channels(), data)
    }
}

/// Resampler for a configured filter.
pub fn resampler_for(filter: ResampleFilter) -> Box<dyn Resampler> {
    match filter {
        ResampleFilter::Nearest => Box::new(NearestResampler),
        other => Box::new(FilteredResampler::new(other)),
    }
}
