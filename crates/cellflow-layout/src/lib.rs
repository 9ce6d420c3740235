#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::manual_let_else)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! View tree arrangement for cellflow.
//!
//! A tree of [`View`]s is laid out by assigning the root a rect: every
//! container stores it and arranges its own cells, which in turn arrange
//! theirs. Parents are always placed before their children.
//!
//! - [`ContainerView`]: aligns each cell against the whole content rect
//! - [`Stack`]: linear flow along one axis, or a table of row containers
//! - [`Grid`]: two-dimensional table with harmonized column widths
//! - [`DividerView`]: draggable splitter inside a stack
//!
//! Views carry no parent pointers; [`ViewPath`] addresses a view from the
//! root and drives upward re-arrangement.

mod cell;
mod container;
mod custom;
mod divider;
mod grid;
mod label;
mod navigate;
mod stack;
mod view;

pub use cell::{Cell, CellId};
pub use container::{CellContainer, Container, ContainerView};
pub use custom::CustomView;
pub use divider::DividerView;
pub use grid::Grid;
pub use label::Label;
pub use navigate::{
    arrange_ancestor_container, arrange_children_at_root_container, child_view,
    container_is_loading, dispatch_pointer, find_ancestor_arranger, find_view_with_name,
    view_at, view_at_mut, view_range_children, Found, ViewPath,
};
pub use stack::Stack;
pub use view::{
    Arranger, CellsOwner, EventResponse, Layouter, PointerEvent, PointerPhase, View,
};
