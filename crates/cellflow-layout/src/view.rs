//! View capability traits.
//!
//! Every node in a tree implements [`View`]. Containers additionally expose
//! [`CellsOwner`] and [`Arranger`] through the `as_*` accessors; any view may
//! expose [`Layouter`] hooks. A view either declares a capability statically
//! in its impl or the accessor returns `None`.

use crate::container::Container;
use cellflow_core::{Point, Rect, Size};
use std::any::Any;
use std::time::Instant;

/// A layoutable node.
pub trait View {
    /// Debug name, also used for path addressing.
    fn object_name(&self) -> &str;

    /// Rename the view.
    fn set_object_name(&mut self, name: &str);

    /// Preferred size given the offered space. Must not touch sibling layout state.
    fn calculated_size(&self, total: Size) -> Size;

    /// Assign the frame, in the parent's content coordinates.
    fn set_rect(&mut self, rect: Rect);

    /// Current frame.
    fn rect(&self) -> Rect;

    /// Whether the view is attached to the visible tree.
    fn is_visible(&self) -> bool;

    /// Attach or detach the view from the visible tree.
    fn set_visible(&mut self, visible: bool);

    /// Divider ratio biasing stack distribution; zero for ordinary views.
    fn divider_weight(&self) -> f32 {
        0.0
    }

    /// True while the view is still loading content (images and the like).
    fn is_loading(&self) -> bool {
        false
    }

    /// Handle a pointer event. `parent` is the parent's content rect.
    fn handle_pointer(&mut self, _event: &PointerEvent, _parent: Rect) -> EventResponse {
        EventResponse::Ignored
    }

    /// Cell ownership, for containers.
    fn as_cells_owner(&self) -> Option<&dyn CellsOwner> {
        None
    }

    /// Mutable cell ownership, for containers.
    fn as_cells_owner_mut(&mut self) -> Option<&mut dyn CellsOwner> {
        None
    }

    /// Arrangement capability, for containers.
    fn as_arranger_mut(&mut self) -> Option<&mut dyn Arranger> {
        None
    }

    /// Before/after layout hooks.
    fn as_layouter_mut(&mut self) -> Option<&mut dyn Layouter> {
        None
    }

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A view that owns an ordered list of cells.
pub trait CellsOwner {
    /// The owned cells.
    fn container(&self) -> &Container;

    /// The owned cells, mutably.
    fn container_mut(&mut self) -> &mut Container;
}

/// A view that can recompute and assign its children's rects.
pub trait Arranger {
    /// Lay out the children inside the current frame.
    fn arrange_children(&mut self);
}

/// Hooks run around an arrangement pass.
pub trait Layouter {
    /// Called before sizes are measured.
    fn handle_before_layout(&mut self) {}

    /// Called after children have their rects.
    fn handle_after_layout(&mut self) {}
}

/// Pointer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// Button pressed
    Down,
    /// Moved while pressed
    Move,
    /// Button released
    Up,
}

/// Pointer input routed to a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Phase
    pub phase: PointerPhase,
    /// Position in the parent's content coordinates
    pub pos: Point,
    /// Time of the event
    pub at: Instant,
}

impl PointerEvent {
    /// Press at `pos`.
    #[must_use]
    pub const fn down(pos: Point, at: Instant) -> Self {
        Self {
            phase: PointerPhase::Down,
            pos,
            at,
        }
    }

    /// Drag to `pos`.
    #[must_use]
    pub const fn moved(pos: Point, at: Instant) -> Self {
        Self {
            phase: PointerPhase::Move,
            pos,
            at,
        }
    }

    /// Release at `pos`.
    #[must_use]
    pub const fn up(pos: Point, at: Instant) -> Self {
        Self {
            phase: PointerPhase::Up,
            pos,
            at,
        }
    }
}

/// What a view did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// Not handled
    Ignored,
    /// Handled, nothing else to do
    Handled,
    /// Handled; the parent must re-arrange its children
    ArrangeParent,
}
