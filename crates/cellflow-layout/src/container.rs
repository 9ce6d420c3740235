//! Ordered cell ownership shared by every container view.
//!
//! [`Container`] holds the data: cells in insertion (z/tab) order, the list
//! of attached (visible) children, margin, min size and frame.
//! [`CellContainer`] layers the checked operations on top of any view that
//! owns a `Container` and can arrange it. [`ContainerView`] is the plain
//! container: each aligned cell is placed against the whole content rect.

use crate::cell::{Cell, CellId};
use crate::view::{Arranger, CellsOwner, EventResponse, Layouter, PointerEvent, View};
use cellflow_core::{Alignment, LayoutCell, LayoutError, Rect, Size};
use indexmap::IndexMap;
use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, trace, warn};

/// Cells of one container plus the container's own geometry.
pub struct Container {
    name: String,
    cells: IndexMap<CellId, Cell>,
    attached: Vec<CellId>,
    next_id: u64,
    margin: Rect,
    min_size: Size,
    rect: Rect,
    visible: bool,
    presented: bool,
    layout_handler: Option<Box<dyn Layouter>>,
}

impl Container {
    /// Create an empty container.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: IndexMap::new(),
            attached: Vec::new(),
            next_id: 0,
            margin: Rect::default(),
            min_size: Size::ZERO,
            rect: Rect::default(),
            visible: true,
            presented: false,
            layout_handler: None,
        }
    }

    /// Debug name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Number of cells, collapsed ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when there are no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell handles in order.
    pub fn ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.keys().copied()
    }

    /// Cells in order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().map(|(id, c)| (*id, c))
    }

    /// Cells in order, mutably.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = (CellId, &mut Cell)> {
        self.cells.iter_mut().map(|(id, c)| (*id, c))
    }

    /// Look up a cell.
    #[must_use]
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(&id)
    }

    /// Look up a cell mutably.
    pub fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(&id)
    }

    /// Position of `id` in the cell order.
    #[must_use]
    pub fn index_of(&self, id: CellId) -> Option<usize> {
        self.cells.get_index_of(&id)
    }

    /// Handle at position `index`.
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<CellId> {
        self.cells.get_index(index).map(|(id, _)| *id)
    }

    /// Handles of attached (non-collapsed) children, in cell order.
    #[must_use]
    pub fn attached(&self) -> &[CellId] {
        &self.attached
    }

    /// Margin rect; its size is the negated total inset.
    #[must_use]
    pub const fn margin(&self) -> Rect {
        self.margin
    }

    /// Set the margin rect.
    pub fn set_margin(&mut self, margin: Rect) {
        self.margin = margin;
    }

    /// Inset by `m` on every side.
    pub fn set_margin_uniform(&mut self, m: Size) {
        self.margin = Rect::new(m.width, m.height, -2.0 * m.width, -2.0 * m.height);
    }

    /// Minimum calculated size; zero components are ignored.
    #[must_use]
    pub const fn min_size(&self) -> Size {
        self.min_size
    }

    /// Set the minimum calculated size.
    pub fn set_min_size(&mut self, min: Size) {
        self.min_size = min;
    }

    /// Current frame.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Store the frame without arranging.
    pub fn set_frame(&mut self, rect: Rect) {
        self.rect = rect;
        self.presented = true;
    }

    /// True once the container has been given a frame.
    #[must_use]
    pub const fn is_presented(&self) -> bool {
        self.presented
    }

    /// Visibility of the container view itself.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set visibility of the container view itself.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Frame in local coordinates, inset by the margin.
    #[must_use]
    pub fn content_rect(&self) -> Rect {
        Rect::from_size(self.rect.size()).plus(&self.margin)
    }

    /// Turn a content extent into the container's calculated size: add the
    /// margin back and raise to the min size.
    #[must_use]
    pub fn finish_size(&self, content: Size) -> Size {
        let mut s = content - self.margin.size();
        s.maximize_non_zero(self.min_size);
        s
    }

    /// Install hooks that run around this container's own arrangement pass.
    pub fn set_layout_handler(&mut self, handler: Box<dyn Layouter>) {
        self.layout_handler = Some(handler);
    }

    /// Children's views, optionally including collapsed ones.
    #[must_use]
    pub fn get_children(&self, include_collapsed: bool) -> Vec<&dyn View> {
        self.cells
            .values()
            .filter(|c| include_collapsed || !c.is_collapsed())
            .map(Cell::view)
            .collect()
    }

    /// Cell owning `view`, compared by identity.
    #[must_use]
    pub fn find_cell_with_view(&self, view: &dyn View) -> Option<CellId> {
        let target = (view.as_any() as *const dyn Any).cast::<()>();
        self.cells
            .iter()
            .find(|(_, c)| (c.view().as_any() as *const dyn Any).cast::<()>() == target)
            .map(|(id, _)| *id)
    }

    /// First cell whose view has `name`.
    #[must_use]
    pub fn find_cell_with_name(&self, name: &str) -> Option<CellId> {
        self.cells
            .iter()
            .find(|(_, c)| c.view().object_name() == name)
            .map(|(id, _)| *id)
    }

    pub(crate) fn not_found(&self, id: CellId) -> LayoutError {
        LayoutError::CellNotFound(format!("{id} in '{}'", self.name))
    }

    /// Insert at `index`, appending when `index` is `None` or out of range.
    pub(crate) fn insert_cell(&mut self, cell: Cell, index: Option<usize>) -> CellId {
        let id = CellId(self.next_id);
        self.next_id += 1;
        let collapsed = cell.is_collapsed();
        match index {
            Some(i) if i < self.cells.len() => {
                self.cells.shift_insert(i, id, cell);
            }
            _ => {
                self.cells.insert(id, cell);
            }
        }
        if !collapsed {
            self.reattach(id);
        }
        id
    }

    /// Remove a cell, preserving the order of the rest.
    pub(crate) fn take_cell(&mut self, id: CellId) -> Option<Cell> {
        self.attached.retain(|a| *a != id);
        self.cells.shift_remove(&id)
    }

    fn reattach(&mut self, id: CellId) {
        if self.attached.contains(&id) {
            return;
        }
        let Some(index) = self.index_of(id) else {
            return;
        };
        let pos = self
            .attached
            .iter()
            .position(|a| self.cells.get_index_of(a).is_some_and(|i| i > index))
            .unwrap_or(self.attached.len());
        self.attached.insert(pos, id);
    }

    /// Flip the collapsed flag; the cell keeps its slot and metadata.
    ///
    /// Returns whether anything changed.
    pub fn set_collapsed(&mut self, id: CellId, collapse: bool) -> Result<bool, LayoutError> {
        let Some(cell) = self.cells.get_mut(&id) else {
            return Err(self.not_found(id));
        };
        if cell.layout.collapsed == collapse {
            return Ok(false);
        }
        cell.layout.collapsed = collapse;
        cell.view_mut().set_visible(!collapse);
        if collapse {
            self.attached.retain(|a| *a != id);
        } else {
            self.reattach(id);
        }
        debug!(container = %self.name, cell = %id, collapse, "collapse changed");
        Ok(true)
    }

    /// Swap the view in a cell, keeping its metadata.
    pub(crate) fn replace_view(
        &mut self,
        id: CellId,
        view: Box<dyn View>,
    ) -> Result<Box<dyn View>, LayoutError> {
        let Some(cell) = self.cells.get_mut(&id) else {
            warn!(container = %self.name, cell = %id, "replace: cell not found");
            return Err(self.not_found(id));
        };
        let collapsed = cell.is_collapsed();
        let mut view = view;
        view.set_visible(!collapsed);
        Ok(cell.replace_view(view))
    }

    /// Stable reorder by `less`; metadata is untouched.
    pub fn sort_by(&mut self, mut less: impl FnMut(&dyn View, &dyn View) -> bool) {
        self.cells.sort_by(|_, a, _, b| {
            if less(a.view(), b.view()) {
                Ordering::Less
            } else if less(b.view(), a.view()) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        });
        self.attached = self
            .cells
            .iter()
            .filter(|(_, c)| !c.is_collapsed())
            .map(|(id, _)| *id)
            .collect();
    }

    /// Run `arrange` between the before/after hooks of this container and of
    /// each child that has them.
    pub fn layout_pass(&mut self, arrange: impl FnOnce(&mut Self)) {
        if let Some(h) = self.layout_handler.as_mut() {
            h.handle_before_layout();
        }
        for cell in self.cells.values_mut() {
            if let Some(l) = cell.view_mut().as_layouter_mut() {
                l.handle_before_layout();
            }
        }
        arrange(self);
        if let Some(h) = self.layout_handler.as_mut() {
            h.handle_after_layout();
        }
        for cell in self.cells.values_mut() {
            if let Some(l) = cell.view_mut().as_layouter_mut() {
                l.handle_after_layout();
            }
        }
    }

    /// Place aligned cells against the whole content rect; with `free_only`
    /// only free cells are placed.
    pub fn arrange_advanced(&mut self, free_only: bool) {
        let content = self.content_rect();
        trace!(container = %self.name, ?content, free_only, "arrange");
        for cell in self.cells.values_mut() {
            let l = &cell.layout;
            if l.collapsed || l.alignment.is_none() || (free_only && !l.free) {
                continue;
            }
            let inner = content.expanded(l.margin.scale(-1.0));
            let size = cell.view().calculated_size(inner.size());
            cell.layout.original_size = size;
            let l = &cell.layout;
            let r = content.align_pro(size, l.alignment, l.margin, l.max_size, l.min_size);
            cell.view_mut().set_rect(r);
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.name)
            .field("cells", &self.cells.len())
            .field("attached", &self.attached.len())
            .field("rect", &self.rect)
            .field("margin", &self.margin)
            .finish_non_exhaustive()
    }
}

/// Checked cell operations for any view that owns and arranges a [`Container`].
///
/// `add_cell` and `remove_child` are the overridable insertion/removal
/// points; every other operation funnels through them.
pub trait CellContainer: CellsOwner + Arranger {
    /// Append `view` with `alignment` and no margin or max size.
    fn add(&mut self, view: Box<dyn View>, alignment: Alignment) -> Result<CellId, LayoutError> {
        self.add_advanced(view, alignment, Size::ZERO, Size::ZERO, None, false)
    }

    /// Insert `view` at `index` (appending when `None` or out of range).
    fn add_advanced(
        &mut self,
        view: Box<dyn View>,
        alignment: Alignment,
        margin: Size,
        max_size: Size,
        index: Option<usize>,
        free: bool,
    ) -> Result<CellId, LayoutError> {
        let alignment = alignment.validate()?;
        let mut layout = LayoutCell::new(alignment)
            .with_margin(margin)
            .with_max_size(max_size);
        layout.free = free;
        self.add_cell(Cell::new(layout, view), index)
    }

    /// Insert a prepared cell.
    fn add_cell(&mut self, cell: Cell, index: Option<usize>) -> Result<CellId, LayoutError> {
        cell.layout.alignment.validate()?;
        Ok(self.container_mut().insert_cell(cell, index))
    }

    /// Remove a cell and hand back its view.
    fn remove_child(&mut self, id: CellId) -> Result<Box<dyn View>, LayoutError> {
        let c = self.container_mut();
        match c.take_cell(id) {
            Some(cell) => Ok(cell.into_view()),
            None => Err(c.not_found(id)),
        }
    }

    /// Remove every cell.
    fn remove_all_children(&mut self) -> Vec<Box<dyn View>> {
        let ids: Vec<CellId> = self.container().ids().collect();
        ids.into_iter()
            .filter_map(|id| self.remove_child(id).ok())
            .collect()
    }

    /// Remove the first (or, with `all`, every) cell whose view is called `name`.
    fn remove_named_child(&mut self, name: &str, all: bool) -> usize {
        let mut removed = 0;
        while let Some(id) = self.container().find_cell_with_name(name) {
            if self.remove_child(id).is_ok() {
                removed += 1;
            }
            if !all {
                break;
            }
        }
        removed
    }

    /// Collapse or restore a cell. Re-arranges when `arrange_now` and presented.
    fn collapse_child(
        &mut self,
        id: CellId,
        collapse: bool,
        arrange_now: bool,
    ) -> Result<bool, LayoutError> {
        let changed = self.container_mut().set_collapsed(id, collapse)?;
        if arrange_now && self.container().is_presented() {
            self.arrange_children();
        }
        Ok(changed)
    }

    /// [`CellContainer::collapse_child`] addressed by view name.
    fn collapse_child_with_name(
        &mut self,
        name: &str,
        collapse: bool,
        arrange_now: bool,
    ) -> Result<bool, LayoutError> {
        let Some(id) = self.container().find_cell_with_name(name) else {
            warn!(container = %self.container().name(), name, "collapse: no such child");
            return Err(LayoutError::CellNotFound(name.to_string()));
        };
        self.collapse_child(id, collapse, arrange_now)
    }

    /// Swap the view of a cell, keeping its metadata.
    fn replace_child(&mut self, id: CellId, view: Box<dyn View>) -> Result<Box<dyn View>, LayoutError> {
        self.container_mut().replace_view(id, view)
    }

    /// Children's views, optionally including collapsed ones.
    fn get_children(&self, include_collapsed: bool) -> Vec<&dyn View> {
        self.container().get_children(include_collapsed)
    }

    /// Stable reorder by `less`.
    fn sort_children(&mut self, less: &mut dyn FnMut(&dyn View, &dyn View) -> bool) {
        self.container_mut().sort_by(less);
    }

    /// Number of cells, collapsed ones included.
    fn count_children(&self) -> usize {
        self.container().len()
    }

    /// Whether `id` is one of this container's cells.
    fn contains(&self, id: CellId) -> bool {
        self.container().cell(id).is_some()
    }

    /// Route a pointer event to a child; re-arrange if it asks.
    fn dispatch_pointer(
        &mut self,
        id: CellId,
        event: &PointerEvent,
    ) -> Result<EventResponse, LayoutError> {
        let c = self.container_mut();
        let content = c.content_rect();
        let response = match c.cell_mut(id) {
            Some(cell) => cell.view_mut().handle_pointer(event, content),
            None => return Err(c.not_found(id)),
        };
        if response == EventResponse::ArrangeParent {
            self.arrange_children();
        }
        Ok(response)
    }
}

/// Plain container: each aligned cell is aligned inside the whole content rect.
///
/// Calculated size is the min size.
#[derive(Debug)]
pub struct ContainerView {
    container: Container,
}

impl ContainerView {
    /// Create an empty container view.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            container: Container::new(name),
        }
    }
}

impl CellsOwner for ContainerView {
    fn container(&self) -> &Container {
        &self.container
    }

    fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }
}

impl Arranger for ContainerView {
    fn arrange_children(&mut self) {
        self.container.layout_pass(|c| c.arrange_advanced(false));
    }
}

impl CellContainer for ContainerView {}

impl View for ContainerView {
    fn object_name(&self) -> &str {
        self.container.name()
    }

    fn set_object_name(&mut self, name: &str) {
        self.container.set_name(name);
    }

    fn calculated_size(&self, _total: Size) -> Size {
        self.container.min_size()
    }

    fn set_rect(&mut self, rect: Rect) {
        self.container.set_frame(rect);
        self.arrange_children();
    }

    fn rect(&self) -> Rect {
        self.container.rect()
    }

    fn is_visible(&self) -> bool {
        self.container.is_visible()
    }

    fn set_visible(&mut self, visible: bool) {
        self.container.set_visible(visible);
    }

    fn as_cells_owner(&self) -> Option<&dyn CellsOwner> {
        Some(self)
    }

    fn as_cells_owner_mut(&mut self) -> Option<&mut dyn CellsOwner> {
        Some(self)
    }

    fn as_arranger_mut(&mut self) -> Option<&mut dyn Arranger> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
