//! CLI output formatting for the collage pipeline.
//!
//! # Output Format
//!
//! ## Build events
//!
//! ```text
//! Distributed 4 images into 2 rows
//!     001 images: 0, 2
//!     002 images: 3, 1
//! Normalized rows
//!     001 height 200px, widths: 300, 67 (367px)
//!     002 height 250px, widths: 250, 188 (438px)
//! Canvas width: 438px
//!     001 image 0 +71px, widths: 371, 67
//! Composite: 438x450px, 3 channels
//! ```
//!
//! ## Plan
//!
//! ```text
//! Canvas 438x450px (2 rows)
//! 001 y=0 height=200px
//!     #0 x=0 width=371px (source 300x200, +71px)
//!     #2 x=371 width=67px (source 150x450)
//! 002 y=200 height=250px
//!     #3 x=0 width=250px (source 250x250)
//!     #1 x=250 width=188px (source 300x400)
//! ```
//!
//! Rows are numbered from 1 like every positional index in the CLI; images
//! keep their 0-based input index so they can be matched to the argument
//! list. Sizes are printed as width x height.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::collage::CollageEvent;
use crate::layout::LayoutPlan;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn join_widths(widths: &[u32]) -> String {
    widths
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn signed_px(delta: i64) -> String {
    format!("{delta:+}px")
}

// ============================================================================
// Build events
// ============================================================================

/// Format a single pipeline event as display lines.
pub fn format_event(event: &CollageEvent) -> Vec<String> {
    match event {
        CollageEvent::SingleImagePassthrough {
            height,
            width,
            channels,
        } => vec![format!(
            "Single image {width}x{height}px, {channels} channels: returned unchanged"
        )],
        CollageEvent::Distributed { rows } => {
            let count: usize = rows.iter().map(Vec::len).sum();
            let mut lines = vec![format!(
                "Distributed {} images into {} rows",
                count,
                rows.len()
            )];
            for (r, row) in rows.iter().enumerate() {
                let indices = row
                    .iter()
                    .map(usize::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(format!("    {} images: {}", format_index(r + 1), indices));
            }
            lines
        }
        CollageEvent::RowNormalized { row, height, widths } => {
            let mut lines = Vec::new();
            if *row == 0 {
                lines.push("Normalized rows".to_string());
            }
            let total: u32 = widths.iter().sum();
            lines.push(format!(
                "    {} height {}px, widths: {} ({}px)",
                format_index(row + 1),
                height,
                join_widths(widths),
                total
            ));
            lines
        }
        CollageEvent::CanvasWidth { width } => vec![format!("Canvas width: {width}px")],
        CollageEvent::RowReconciled {
            row,
            image,
            delta,
            widths,
        } => vec![format!(
            "    {} image {} {}, widths: {}",
            format_index(row + 1),
            image,
            signed_px(*delta),
            join_widths(widths)
        )],
        CollageEvent::Composited {
            height,
            width,
            channels,
        } => vec![format!(
            "Composite: {width}x{height}px, {channels} channels"
        )],
    }
}

// ============================================================================
// Layout plan
// ============================================================================

/// Format a layout plan as a row-by-row inventory.
pub fn format_plan(plan: &LayoutPlan) -> Vec<String> {
    let mut lines = vec![format!(
        "Canvas {}x{}px ({} rows)",
        plan.canvas_width,
        plan.height,
        plan.rows.len()
    )];
    for (r, row) in plan.rows.iter().enumerate() {
        lines.push(format!(
            "{} y={} height={}px",
            format_index(r + 1),
            row.y,
            row.height
        ));
        for img in &row.images {
            let adjusted = row
                .adjustment
                .filter(|adj| adj.image == img.index)
                .map(|adj| format!(", {}", signed_px(adj.delta)))
                .unwrap_or_default();
            lines.push(format!(
                "    #{} x={} width={}px (source {}x{}{})",
                img.index, img.x, img.width, img.source.width, img.source.height, adjusted
            ));
        }
    }
    lines
}

/// Print a layout plan to stdout.
pub fn print_plan(plan: &LayoutPlan) {
    for line in format_plan(plan) {
        println!("{}", line);
    }
}
