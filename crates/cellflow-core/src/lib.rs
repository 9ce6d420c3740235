#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::suboptimal_flops)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Core primitives for the cellflow layout engine.
//!
//! - geometry: [`Point`], [`Size`], [`Rect`], [`Axis`]
//! - [`Alignment`] bit-flags and the single-cell solver [`Rect::align_pro`]
//! - the multi-cell solvers [`stacked_size`] and [`layout_cells_in_stack`]
//! - table harmonization for grids and grid-style stacks
//! - [`LayoutConfig`], [`KeyValueStore`] and [`TextMetricsCache`]

mod alignment;
mod config;
mod error;
mod geometry;
mod harmonize;
mod stacking;
mod storage;
mod text;

pub use alignment::{clamp_non_zero, Alignment, Anchor};
pub use config::LayoutConfig;
pub use error::LayoutError;
pub use geometry::{Axis, Point, Rect, Size};
pub use harmonize::{column_spans, harmonize_columns, harmonize_row_heights, table_size, CellRow};
pub use stacking::{layout_cells_in_stack, stacked_size, LayoutCell};
pub use storage::{load_f64, store_f64, KeyValueStore, MemoryStore};
pub use text::{FontKey, MonospaceMeasurer, TextMeasurer, TextMetricsCache};
