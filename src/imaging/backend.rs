//! Resampling backend trait.
//!
//! Every resize in the pipeline goes through [`Resampler`], so the rest of
//! the crate is policy-agnostic. The production implementations live in
//! [`resample`](super::resample): [`NearestResampler`](super::NearestResampler)
//! (the default) and [`FilteredResampler`](super::FilteredResampler).

use super::buffer::ImageBuffer;
use crate::error::{CollageError, Result};

/// Resize an image to an exact `(height, width)`.
///
/// Implementations must never mutate the source and must fail with
/// [`CollageError::InvalidDimension`] when either target dimension is zero.
/// `Sync` so rows can be resized from rayon workers.
pub trait Resampler: Sync {
    fn resize(&self, image: &ImageBuffer, height: u32, width: u32) -> Result<ImageBuffer>;
}

/// Shared target validation for [`Resampler`] implementations.
pub fn check_target(height: u32, width: u32) -> Result<()> {
    if height == 0 || width == 0 {
        return Err(CollageError::InvalidDimension {
            what: "resize target",
            height,
            width,
        });
    }
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::NearestResampler;
    use std::sync::Mutex;

    /// Resampler that records every call, then delegates to nearest.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct RecordingResampler {
        pub operations: Mutex<Vec<RecordedResize>>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedResize {
        /// Source `(height, width)`.
        pub from: (u32, u32),
        /// Target `(height, width)`.
        pub to: (u32, u32),
    }

    impl RecordingResampler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn get_operations(&self) -> Vec<RecordedResize> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl Resampler for RecordingResampler {
        fn resize(&self, image: &ImageBuffer, height: u32, width: u32) -> Result<ImageBuffer> {
            self.operations.lock().unwrap().push(RecordedResize {
                from: (image.height(), image.width()),
                to: (height, width),
            });
            NearestResampler.resize(image, height, width)
        }
    }

    #[test]
    fn check_target_rejects_zero() {
        assert!(check_target(10, 10).is_ok());
        assert!(matches!(
            check_target(0, 10),
            Err(CollageError::InvalidDimension { height: 0, .. })
        ));
        assert!(matches!(
            check_target(10, 0),
            Err(CollageError::InvalidDimension { width: 0, .. })
        ));
    }

    #[test]
    fn recording_resampler_records_and_resizes() {
        let resampler = RecordingResampler::new();
        let img = ImageBuffer::new(4, 4, 1, vec![7; 16]).unwrap();

        let out = resampler.resize(&img, 2, 8).unwrap();
        assert_eq!(out.shape(), (2, 8, 1));

        let ops = resampler.get_operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(
            ops[0],
            RecordedResize {
                from: (4, 4),
                to: (2, 8)
            }
        );
    }
}
