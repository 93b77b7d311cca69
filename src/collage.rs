//! Collage pipeline entry point.
//!
//! ```text
//! images ─▶ distribute ─▶ rows ─▶ normalize ─▶ equal-width rows ─▶ compose ─▶ composite
//! ```
//!
//! Every input is validated up front: an empty list fails with
//! [`CollageError::EmptyInput`] and mixed channel counts fail with
//! [`CollageError::ChannelMismatch`] before a single pixel is resized. A lone
//! image skips the pipeline and comes back unchanged.
//!
//! ## Events
//!
//! Callers that want diagnostics pass a [`Sender<CollageEvent>`]. Events are
//! sent from the sequential parts of the pipeline in row order, so the stream
//! is identical from run to run even though rows are resized in parallel.
//! A dropped receiver is ignored.

use crate::compose::{check_channels, compose};
use crate::config::CollageConfig;
use crate::error::{CollageError, Result};
use crate::imaging::{
    Dimensions, ImageBatch, ImageBuffer, ResampleFilter, Resampler, RowHeight, resampler_for,
};
use crate::layout::{LayoutPlan, PlacedImage, RowPlan, distribute, plan_layout};
use crate::normalize::{NormalizedRows, normalize_rows};
use std::sync::mpsc::Sender;

/// Settings for one collage run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollageOptions {
    pub target_row_height: RowHeight,
    /// Never let a row be taller than `target_row_height`.
    pub cap_row_height: bool,
    pub filter: ResampleFilter,
}

impl CollageOptions {
    pub fn from_config(config: &CollageConfig) -> Self {
        Self {
            target_row_height: RowHeight::new(config.collage.target_row_height),
            cap_row_height: config.collage.cap_row_height,
            filter: config.resampling.filter,
        }
    }

    /// The row height limit, if capping is enabled.
    pub fn row_height_cap(&self) -> Option<u32> {
        self.cap_row_height
            .then_some(self.target_row_height.value())
    }
}

/// Progress and diagnostics emitted while a collage is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollageEvent {
    /// One image was given; it is returned as-is.
    SingleImagePassthrough {
        height: u32,
        width: u32,
        channels: u32,
    },
    /// Row assignments, before empty rows are dropped.
    Distributed { rows: Vec<Vec<usize>> },
    /// A row after step A: common height and per-image scaled widths.
    RowNormalized {
        row: usize,
        height: u32,
        widths: Vec<u32>,
    },
    CanvasWidth { width: u32 },
    /// A row whose widest image absorbed the width correction.
    RowReconciled {
        row: usize,
        image: usize,
        delta: i64,
        widths: Vec<u32>,
    },
    Composited {
        height: u32,
        width: u32,
        channels: u32,
    },
}

fn emit(events: Option<&Sender<CollageEvent>>, event: CollageEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}

/// A finished collage and the geometry it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collage {
    pub image: ImageBuffer,
    pub plan: LayoutPlan,
}

impl Collage {
    /// The composite with a leading singleton batch dimension.
    pub fn into_batch(self) -> ImageBatch {
        ImageBatch::from_image(self.image)
    }
}

/// Build a collage with the resampler selected by `options.filter`.
pub fn create_collage(
    images: &[ImageBuffer],
    options: &CollageOptions,
    events: Option<Sender<CollageEvent>>,
) -> Result<Collage> {
    let resampler = resampler_for(options.filter);
    create_collage_with(resampler.as_ref(), images, options, events)
}

/// Build a collage from every frame of a batch and return a singleton batch.
pub fn create_collage_from_batch(
    batch: ImageBatch,
    options: &CollageOptions,
    events: Option<Sender<CollageEvent>>,
) -> Result<ImageBatch> {
    let frames = batch.into_frames();
    create_collage(&frames, options, events).map(Collage::into_batch)
}

/// Build a collage using a specific resampler (allows testing with a mock).
#[tracing::instrument(skip_all, fields(images = images.len(), filter = %options.filter))]
pub fn create_collage_with(
    resampler: &dyn Resampler,
    images: &[ImageBuffer],
    options: &CollageOptions,
    events: Option<Sender<CollageEvent>>,
) -> Result<Collage> {
    let events = events.as_ref();
    if images.is_empty() {
        return Err(CollageError::EmptyInput);
    }
    let channels = check_channels(images)?;
    let dims: Vec<Dimensions> = images.iter().map(ImageBuffer::dimensions).collect();

    if let [only] = images {
        emit(
            events,
            CollageEvent::SingleImagePassthrough {
                height: only.height(),
                width: only.width(),
                channels,
            },
        );
        return Ok(Collage {
            image: only.clone(),
            plan: plan_layout(&dims, None)?,
        });
    }

    let rows = distribute(&dims)?;
    tracing::debug!(rows = rows.len(), "images distributed");
    emit(events, CollageEvent::Distributed { rows: rows.clone() });

    let normalized = normalize_rows(images, &rows, options.row_height_cap(), resampler)?;
    for (r, row) in normalized.rows.iter().enumerate() {
        emit(
            events,
            CollageEvent::RowNormalized {
                row: r,
                height: row.height,
                widths: row.scaled_widths.clone(),
            },
        );
    }
    emit(
        events,
        CollageEvent::CanvasWidth {
            width: normalized.canvas_width,
        },
    );
    for (r, row) in normalized.rows.iter().enumerate() {
        if let Some(adj) = row.adjustment {
            emit(
                events,
                CollageEvent::RowReconciled {
                    row: r,
                    image: adj.image,
                    delta: adj.delta,
                    widths: row.widths(),
                },
            );
        }
    }

    let image = compose(&normalized)?;
    emit(
        events,
        CollageEvent::Composited {
            height: image.height(),
            width: image.width(),
            channels: image.channels(),
        },
    );

    Ok(Collage {
        plan: describe(&normalized, &dims),
        image,
    })
}

/// The layout actually rendered.
fn describe(normalized: &NormalizedRows, dims: &[Dimensions]) -> LayoutPlan {
    let mut y = 0;
    let rows = normalized
        .rows
        .iter()
        .map(|row| {
            let mut x = 0;
            let images = row
                .sources
                .iter()
                .zip(&row.images)
                .map(|(&index, img)| {
                    let placed = PlacedImage {
                        index,
                        source: dims[index],
                        x,
                        width: img.width(),
                    };
                    x += img.width();
                    placed
                })
                .collect();
            let plan = RowPlan {
                y,
                height: row.height,
                images,
                adjustment: row.adjustment,
            };
            y += row.height;
            plan
        })
        .collect();

    LayoutPlan {
        canvas_width: normalized.canvas_width,
        height: y,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::NearestResampler;
    use crate::imaging::backend::tests::RecordingResampler;
    use crate::test_helpers::{four_image_scenario, gradient, solid};
    use std::sync::mpsc;

    fn run(images: &[ImageBuffer]) -> Result<Collage> {
        create_collage(images, &CollageOptions::default(), None)
    }

    // =========================================================================
    // Edge cases
    // =========================================================================

    #[test]
    fn empty_input_is_error() {
        assert_eq!(run(&[]), Err(CollageError::EmptyInput));
    }

    #[test]
    fn single_image_is_returned_unchanged() {
        let img = gradient(100, 100, 3);
        let resampler = RecordingResampler::new();

        let collage =
            create_collage_with(&resampler, &[img.clone()], &CollageOptions::default(), None)
                .unwrap();

        assert_eq!(collage.image, img);
        assert!(resampler.get_operations().is_empty());
    }

    #[test]
    fn channel_mismatch_fails_before_any_resize() {
        let images = vec![solid(100, 100, 3, 0), solid(100, 100, 4, 0)];
        let resampler = RecordingResampler::new();

        let result = create_collage_with(&resampler, &images, &CollageOptions::default(), None);

        assert_eq!(
            result,
            Err(CollageError::ChannelMismatch {
                index: 1,
                expected: 3,
                actual: 4
            })
        );
        assert!(resampler.get_operations().is_empty());
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    #[test]
    fn four_image_scenario_shares_canvas_width() {
        let collage = run(&four_image_scenario(3)).unwrap();

        assert_eq!(collage.plan.rows.len(), 2);
        let row_heights: u32 = collage.plan.rows.iter().map(|r| r.height).sum();
        assert_eq!(collage.image.height(), row_heights);
        assert_eq!(collage.plan.rows[0].width(), collage.plan.rows[1].width());
        assert_eq!(collage.image.width(), collage.plan.canvas_width);
        assert_eq!(collage.image.channels(), 3);
    }

    #[test]
    fn rendered_layout_matches_plan() {
        let images = vec![
            gradient(120, 340, 3),
            gradient(300, 90, 3),
            gradient(77, 77, 3),
            gradient(410, 205, 3),
            gradient(64, 256, 3),
        ];
        let dims: Vec<Dimensions> = images.iter().map(ImageBuffer::dimensions).collect();

        let collage = run(&images).unwrap();

        assert_eq!(collage.plan, plan_layout(&dims, None).unwrap());
    }

    #[test]
    fn cap_limits_row_height() {
        let images = vec![gradient(600, 600, 1), gradient(500, 800, 1)];
        let options = CollageOptions {
            target_row_height: RowHeight::new(200),
            cap_row_height: true,
            ..CollageOptions::default()
        };
        let collage = create_collage(&images, &options, None).unwrap();
        assert!(collage.plan.rows.iter().all(|r| r.height <= 200));
    }

    #[test]
    fn target_row_height_is_only_a_hint_by_default() {
        let images = vec![gradient(600, 600, 1), gradient(500, 800, 1)];
        let options = CollageOptions {
            target_row_height: RowHeight::new(200),
            ..CollageOptions::default()
        };
        let collage = create_collage(&images, &options, None).unwrap();
        let heights: Vec<u32> = collage.plan.rows.iter().map(|r| r.height).collect();
        assert_eq!(heights, vec![500, 600]);
    }

    #[test]
    fn pixels_come_from_sources() {
        // Two flat images: every composite pixel is one of the two values
        let images = vec![solid(40, 60, 1, 11), solid(30, 90, 1, 22)];
        let collage = run(&images).unwrap();
        assert!(collage.image.as_raw().iter().all(|&v| v == 11 || v == 22));
    }

    #[test]
    fn runs_are_bit_identical() {
        let images = vec![
            gradient(210, 330, 4),
            gradient(190, 95, 4),
            gradient(333, 444, 4),
        ];
        assert_eq!(run(&images).unwrap(), run(&images).unwrap());
    }

    #[test]
    fn explicit_nearest_matches_default() {
        let images = four_image_scenario(3);
        let a = run(&images).unwrap();
        let b = create_collage_with(&NearestResampler, &images, &CollageOptions::default(), None)
            .unwrap();
        assert_eq!(a, b);
    }

    // =========================================================================
    // Batches
    // =========================================================================

    #[test]
    fn output_batch_has_singleton_dimension() {
        let collage = run(&four_image_scenario(3)).unwrap();
        let (h, w, c) = collage.image.shape();
        assert_eq!(collage.into_batch().shape(), (1, h, w, c));
    }

    #[test]
    fn batch_input_is_split_into_frames() {
        let frame = gradient(50, 80, 3);
        let mut data = frame.as_raw().to_vec();
        data.extend_from_slice(frame.as_raw());
        let batch = ImageBatch::new(2, 50, 80, 3, data).unwrap();

        let out = create_collage_from_batch(batch, &CollageOptions::default(), None).unwrap();

        // Two identical frames land in two rows of the same size
        assert_eq!(out.shape(), (1, 100, 80, 3));
    }

    // =========================================================================
    // Events
    // =========================================================================

    #[test]
    fn events_describe_the_pipeline_in_order() {
        let (tx, rx) = mpsc::channel();
        let collage = create_collage(&four_image_scenario(3), &CollageOptions::default(), Some(tx))
            .unwrap();
        let events: Vec<CollageEvent> = rx.iter().collect();

        assert_eq!(
            events[0],
            CollageEvent::Distributed {
                rows: vec![vec![0, 2], vec![3, 1]]
            }
        );
        assert_eq!(
            events[1],
            CollageEvent::RowNormalized {
                row: 0,
                height: 200,
                widths: vec![300, 67]
            }
        );
        assert_eq!(
            events[2],
            CollageEvent::RowNormalized {
                row: 1,
                height: 250,
                widths: vec![250, 188]
            }
        );
        assert_eq!(events[3], CollageEvent::CanvasWidth { width: 438 });
        assert_eq!(
            events[4],
            CollageEvent::RowReconciled {
                row: 0,
                image: 0,
                delta: 71,
                widths: vec![371, 67]
            }
        );
        assert_eq!(
            events[5],
            CollageEvent::Composited {
                height: collage.image.height(),
                width: 438,
                channels: 3
            }
        );
        assert_eq!(events.len(), 6);
    }

    #[test]
    fn single_image_emits_passthrough_event() {
        let (tx, rx) = mpsc::channel();
        create_collage(&[solid(10, 20, 2, 0)], &CollageOptions::default(), Some(tx)).unwrap();
        let events: Vec<CollageEvent> = rx.iter().collect();
        assert_eq!(
            events,
            vec![CollageEvent::SingleImagePassthrough {
                height: 10,
                width: 20,
                channels: 2
            }]
        );
    }

    #[test]
    fn dropped_receiver_does_not_fail() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        assert!(create_collage(&four_image_scenario(1), &CollageOptions::default(), Some(tx)).is_ok());
    }
}
