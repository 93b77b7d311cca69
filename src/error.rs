//! Error taxonomy for the collage pipeline.
//!
//! Every failure is fatal: the pipeline is pure and deterministic, so a
//! retry with the same input fails the same way. Variants carry the row,
//! image, and dimension context needed to diagnose a failure from the
//! message alone.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollageError {
    #[error("No images provided")]
    EmptyInput,
    #[error("Invalid {what} dimension: {height}x{width} (height x width must both be > 0)")]
    InvalidDimension {
        what: &'static str,
        height: u32,
        width: u32,
    },
    #[error("{what} of {height}x{width}x{channels} samples is too large to address")]
    TooLarge {
        what: &'static str,
        height: u32,
        width: u32,
        channels: u32,
    },
    #[error("Image buffer must have at least one channel")]
    ZeroChannels,
    #[error("Pixel data length mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
    #[error("Channel mismatch at image {index}: expected {expected} channels, found {actual}")]
    ChannelMismatch {
        index: usize,
        expected: u32,
        actual: u32,
    },
    #[error("Row {row} image {index} is {actual}px high, row height is {expected}px")]
    HeightMismatch {
        row: usize,
        index: usize,
        expected: u32,
        actual: u32,
    },
    #[error("Row {row} width is {actual}px after reconciliation, canvas width is {expected}px")]
    WidthReconciliation {
        row: usize,
        expected: u32,
        actual: u32,
    },
}

pub type Result<T> = std::result::Result<T, CollageError>;
