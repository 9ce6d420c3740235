//! Linear stacking container with an optional grid-rows mode.
//!
//! In the default mode cells flow along one axis with uniform spacing (see
//! [`cellflow_core::layout_cells_in_stack`]). With a non-zero grid vertical
//! space the stack must be vertical and every row view must own cells: the
//! rows then share harmonized column widths while each keeps its own height.

use crate::cell::{Cell, CellId};
use crate::container::{CellContainer, Container};
use crate::view::{Arranger, CellsOwner, View};
use cellflow_core::{
    column_spans, harmonize_columns, harmonize_row_heights, layout_cells_in_stack, stacked_size,
    table_size, Axis, CellRow, LayoutCell, LayoutConfig, LayoutError, Rect, Size,
};
use std::any::Any;
use tracing::trace;

/// Container that stacks its cells along one axis.
#[derive(Debug)]
pub struct Stack {
    container: Container,
    axis: Axis,
    spacing: f32,
    grid_vertical_space: f32,
}

impl Stack {
    /// Create a stack with default spacing.
    #[must_use]
    pub fn new(name: impl Into<String>, axis: Axis) -> Self {
        Self::with_config(name, axis, &LayoutConfig::default())
    }

    /// Create a vertical stack.
    #[must_use]
    pub fn vertical(name: impl Into<String>) -> Self {
        Self::new(name, Axis::Vertical)
    }

    /// Create a horizontal stack.
    #[must_use]
    pub fn horizontal(name: impl Into<String>) -> Self {
        Self::new(name, Axis::Horizontal)
    }

    /// Create a stack whose spacing comes from `config`.
    #[must_use]
    pub fn with_config(name: impl Into<String>, axis: Axis, config: &LayoutConfig) -> Self {
        Self {
            container: Container::new(name),
            axis,
            spacing: config.stack_spacing,
            grid_vertical_space: 0.0,
        }
    }

    /// Stacking axis.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Gap between consecutive flowed cells (between columns in grid-rows mode).
    #[must_use]
    pub const fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Set the gap between consecutive flowed cells.
    pub fn set_spacing(&mut self, spacing: f32) {
        self.spacing = spacing;
    }

    /// Gap between rows in grid-rows mode; zero when the mode is off.
    #[must_use]
    pub const fn grid_vertical_space(&self) -> f32 {
        self.grid_vertical_space
    }

    /// Turn grid-rows mode on (non-zero) or off (zero).
    ///
    /// The stack must be vertical and every current row must own cells.
    pub fn set_grid_vertical_space(&mut self, space: f32) -> Result<(), LayoutError> {
        if space != 0.0 {
            if !self.axis.is_vertical() {
                return Err(LayoutError::GridRowsNeedVertical(
                    self.container.name().to_string(),
                ));
            }
            for (_, cell) in self.container.cells() {
                check_row(cell.view())?;
            }
        }
        self.grid_vertical_space = space;
        Ok(())
    }

    fn is_grid_rows(&self) -> bool {
        self.grid_vertical_space != 0.0
    }
}

fn check_row(view: &dyn View) -> Result<(), LayoutError> {
    if view.as_cells_owner().is_some() {
        Ok(())
    } else {
        Err(LayoutError::NotCellsOwner(view.object_name().to_string()))
    }
}

/// Rows of a grid-rows stack, measured against `total`.
struct GridRows {
    row_ids: Vec<CellId>,
    sub_ids: Vec<Vec<CellId>>,
    rows: Vec<CellRow>,
}

/// Collapsed, free and `NONE` rows are left out of the table; free rows are
/// placed afterwards by [`Container::arrange_advanced`].
///
/// # Panics
///
/// Panics if a row view does not own cells; insertion checks rule that out.
fn grid_rows(c: &Container, total: Size) -> GridRows {
    let mut g = GridRows {
        row_ids: Vec::new(),
        sub_ids: Vec::new(),
        rows: Vec::new(),
    };
    for (id, cell) in c.cells() {
        if !cell.layout.is_flowed() {
            continue;
        }
        let Some(owner) = cell.view().as_cells_owner() else {
            panic!(
                "grid row '{}' of stack '{}' does not own cells",
                cell.view().object_name(),
                c.name()
            );
        };
        let mut ids = Vec::new();
        let mut row = Vec::new();
        for (sid, sub) in owner.container().cells() {
            ids.push(sid);
            row.push(sub.layout.is_flowed().then(|| sub.measured(total)));
        }
        g.row_ids.push(id);
        g.sub_ids.push(ids);
        g.rows.push(row);
    }
    g
}

fn arrange_stack(c: &mut Container, axis: Axis, spacing: f32) {
    let content = c.content_rect();
    let cells: Vec<LayoutCell> = c
        .cells()
        .map(|(_, cell)| cell.measured(content.size()))
        .collect();
    let rects = layout_cells_in_stack(content, axis, spacing, &cells);
    trace!(stack = %c.name(), ?content, cells = cells.len(), "arrange stack");
    for ((_, cell), (l, r)) in c.cells_mut().zip(cells.into_iter().zip(rects)) {
        cell.layout.original_size = l.original_size;
        cell.layout.divider = l.divider;
        if let Some(r) = r {
            cell.view_mut().set_rect(r);
        }
    }
    c.arrange_advanced(true);
}

fn arrange_grid_rows(c: &mut Container, spacing: f32, row_gap: f32) {
    let content = c.content_rect();
    let g = grid_rows(c, content.size());
    let columns = harmonize_columns(&g.rows, 0);
    let heights = harmonize_row_heights(&g.rows);
    let spans = column_spans(content, spacing, &columns);
    trace!(stack = %c.name(), ?content, rows = g.rows.len(), "arrange grid rows");

    let mut y = content.y;
    for (j, row_id) in g.row_ids.iter().enumerate() {
        let h = heights[j];
        let Some(owner) = c
            .cell_mut(*row_id)
            .and_then(|cell| cell.view_mut().as_cells_owner_mut())
        else {
            continue;
        };
        let sub = owner.container_mut();
        sub.set_frame(Rect::new(content.x, y, content.width, h));
        for (i, sid) in g.sub_ids[j].iter().enumerate() {
            let Some(l) = &g.rows[j][i] else {
                continue;
            };
            let (x, w) = spans[i];
            let bx = Rect::new(x - content.x, 0.0, w, h);
            let ar = bx
                .align_pro(l.original_size, l.alignment, l.margin, l.max_size, l.min_size)
                .clipped(&bx);
            if let Some(cell) = sub.cell_mut(*sid) {
                cell.layout.original_size = l.original_size;
                cell.view_mut().set_rect(ar);
            }
        }
        y += h + row_gap;
    }
    c.arrange_advanced(true);
}

impl CellsOwner for Stack {
    fn container(&self) -> &Container {
        &self.container
    }

    fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }
}

impl Arranger for Stack {
    fn arrange_children(&mut self) {
        let (axis, spacing, gap) = (self.axis, self.spacing, self.grid_vertical_space);
        if gap == 0.0 {
            self.container
                .layout_pass(|c| arrange_stack(c, axis, spacing));
        } else {
            self.container
                .layout_pass(|c| arrange_grid_rows(c, spacing, gap));
        }
    }
}

impl CellContainer for Stack {
    fn add_cell(&mut self, cell: Cell, index: Option<usize>) -> Result<CellId, LayoutError> {
        cell.layout.alignment.validate()?;
        if self.is_grid_rows() {
            check_row(cell.view())?;
        }
        Ok(self.container.insert_cell(cell, index))
    }

    fn replace_child(
        &mut self,
        id: CellId,
        view: Box<dyn View>,
    ) -> Result<Box<dyn View>, LayoutError> {
        if self.is_grid_rows() {
            check_row(view.as_ref())?;
        }
        self.container.replace_view(id, view)
    }
}

impl View for Stack {
    fn object_name(&self) -> &str {
        self.container.name()
    }

    fn set_object_name(&mut self, name: &str) {
        self.container.set_name(name);
    }

    fn calculated_size(&self, total: Size) -> Size {
        let inner = total + self.container.margin().size();
        let content = if self.is_grid_rows() {
            let g = grid_rows(&self.container, inner);
            let columns = harmonize_columns(&g.rows, 0);
            let heights = harmonize_row_heights(&g.rows);
            table_size(
                &columns,
                &heights,
                Size::new(self.spacing, self.grid_vertical_space),
            )
        } else {
            let cells: Vec<LayoutCell> = self
                .container
                .cells()
                .map(|(_, c)| c.measured(inner))
                .collect();
            stacked_size(self.axis, self.spacing, &cells)
        };
        self.container.finish_size(content)
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
