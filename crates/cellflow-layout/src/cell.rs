//! A child view plus its layout metadata.

use crate::view::View;
use cellflow_core::LayoutCell;
use std::fmt;

/// Stable handle to a cell inside one container.
///
/// Handles survive insertion, removal and sorting of siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) u64);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}

/// Layout metadata bound to exactly one child view.
pub struct Cell {
    /// Alignment, margin, bounds and flags
    pub layout: LayoutCell,
    view: Box<dyn View>,
}

impl Cell {
    /// Wrap `view` with `layout`. The layout name follows the view's name.
    #[must_use]
    pub fn new(mut layout: LayoutCell, view: Box<dyn View>) -> Self {
        layout.name = view.object_name().to_string();
        Self { layout, view }
    }

    /// The owned view.
    #[must_use]
    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }

    /// The owned view, mutably.
    pub fn view_mut(&mut self) -> &mut dyn View {
        self.view.as_mut()
    }

    /// Swap in a new view, keeping the metadata. Returns the old view.
    pub(crate) fn replace_view(&mut self, view: Box<dyn View>) -> Box<dyn View> {
        self.layout.name = view.object_name().to_string();
        std::mem::replace(&mut self.view, view)
    }

    /// Give up the view.
    #[must_use]
    pub fn into_view(self) -> Box<dyn View> {
        self.view
    }

    /// Whether the cell is collapsed.
    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.layout.collapsed
    }

    /// Layout input with the intrinsic size measured against `total`.
    #[must_use]
    pub fn measured(&self, total: cellflow_core::Size) -> LayoutCell {
        let mut l = self.layout.clone();
        if l.is_flowed() || l.free {
            l.original_size = self.view.calculated_size(total);
        }
        l.divider = self.view.divider_weight();
        l
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("view", &self.view.object_name())
            .field("layout", &self.layout)
            .finish()
    }
}
