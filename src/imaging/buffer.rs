//! Pixel containers.
//!
//! [`ImageBuffer`] is a height × width × channels array of 8-bit samples,
//! stored row-major and interleaved (the layout `image::ImageBuffer` uses).
//! Buffers are values: nothing in the crate mutates one after creation,
//! every resize produces a new buffer.
//!
//! [`ImageBatch`] adds a leading frame dimension. Hosts that pass images
//! around as `(batch, height, width, channels)` tensors hand the pipeline a
//! batch and receive a singleton batch back.

use crate::error::{CollageError, Result};
use serde::{Deserialize, Serialize};

/// Width and height of an image, without pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn aspect_ratio(self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    height: u32,
    width: u32,
    channels: u32,
    data: Vec<u8>,
}

/// Sample count of a `height * width * channels` frame, validating the shape.
fn frame_len(what: &'static str, height: u32, width: u32, channels: u32) -> Result<usize> {
    if height == 0 || width == 0 {
        return Err(CollageError::InvalidDimension {
            what,
            height,
            width,
        });
    }
    if channels == 0 {
        return Err(CollageError::ZeroChannels);
    }
    (height as usize)
        .checked_mul(width as usize)
        .and_then(|n| n.checked_mul(channels as usize))
        .ok_or(CollageError::TooLarge {
            what,
            height,
            width,
            channels,
        })
}

impl ImageBuffer {
    /// Wrap raw interleaved samples. Fails if any dimension is zero or the
    /// data length is not `height * width * channels`.
    pub fn new(height: u32, width: u32, channels: u32, data: Vec<u8>) -> Result<Self> {
        let expected = frame_len("image", height, width, channels)?;
        if data.len() != expected {
            return Err(CollageError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            channels,
            data,
        })
    }

    /// Build a buffer by evaluating `f(y, x, channel)` for every sample.
    pub fn from_fn(
        height: u32,
        width: u32,
        channels: u32,
        mut f: impl FnMut(u32, u32, u32) -> u8,
    ) -> Result<Self> {
        let mut data = Vec::with_capacity(frame_len("image", height, width, channels)?);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    data.push(f(y, x, c));
                }
            }
        }
        Self::new(height, width, channels, data)
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// `(height, width, channels)`, the order hosts index tensors in.
    pub fn shape(&self) -> (u32, u32, u32) {
        (self.height, self.width, self.channels)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.dimensions().aspect_ratio()
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Bytes in one pixel row.
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Samples of row `y`. Panics if `y` is out of bounds.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.row_stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Samples of the pixel at `(y, x)`. Panics if out of bounds.
    pub fn pixel(&self, y: u32, x: u32) -> &[u8] {
        let c = self.channels as usize;
        let start = y as usize * self.row_stride() + x as usize * c;
        &self.data[start..start + c]
    }
}

/// A stack of equally-shaped frames: `(frames, height, width, channels)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBatch {
    frames: u32,
    height: u32,
    width: u32,
    channels: u32,
    data: Vec<u8>,
}

impl ImageBatch {
    pub fn new(frames: u32, height: u32, width: u32, channels: u32, data: Vec<u8>) -> Result<Self> {
        if frames == 0 {
            return Err(CollageError::EmptyInput);
        }
        let expected = frame_len("batch frame", height, width, channels)?
            .checked_mul(frames as usize)
            .ok_or(CollageError::TooLarge {
                what: "batch",
                height,
                width,
                channels,
            })?;
        if data.len() != expected {
            return Err(CollageError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            frames,
            height,
            width,
            channels,
            data,
        })
    }

    /// Add a leading singleton batch dimension.
    pub fn from_image(image: ImageBuffer) -> Self {
        Self {
            frames: 1,
            height: image.height,
            width: image.width,
            channels: image.channels,
            data: image.data,
        }
    }

    pub fn len(&self) -> usize {
        self.frames as usize
    }

    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    /// `(frames, height, width, channels)`.
    pub fn shape(&self) -> (u32, u32, u32, u32) {
        (self.frames, self.height, self.width, self.channels)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Split into one [`ImageBuffer`] per frame, in batch order.
    pub fn into_frames(self) -> Vec<ImageBuffer> {
        let frame_len = self.data.len() / self.frames as usize;
        self.data
            .chunks_exact(frame_len)
            .map(|chunk| ImageBuffer {
                height: self.height,
                width: self.width,
                channels: self.channels,
                data: chunk.to_vec(),
            })
            .collect()
    }

    /// Drop the batch dimension of a singleton batch.
    pub fn squeeze(self) -> Option<ImageBuffer> {
        if self.frames != 1 {
            return None;
        }
        Some(ImageBuffer {
            height: self.height,
            width: self.width,
            channels: self.channels,
            data: self.data,
        })
    }
}
