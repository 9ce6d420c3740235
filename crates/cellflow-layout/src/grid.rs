//! Two-dimensional table container.
//!
//! Cells are addressed by `(column, row)` through a row-major slot table that
//! maps each occupied slot to the cell handle. Columns share the widest width
//! found in them, rows take the tallest height found in them.

use crate::cell::{Cell, CellId};
use crate::container::{CellContainer, Container};
use crate::view::{Arranger, CellsOwner, View};
use cellflow_core::{
    column_spans, harmonize_columns, harmonize_row_heights, table_size, Alignment, CellRow,
    LayoutConfig, LayoutError, Rect, Size,
};
use std::any::Any;
use tracing::{debug, trace};

/// Table container with a fixed column count.
#[derive(Debug)]
pub struct Grid {
    container: Container,
    columns: usize,
    spacing: Size,
    adding_to_column: Option<usize>,
    add_pos: (usize, usize),
    table: Vec<Option<CellId>>,
}

impl Grid {
    /// Create a grid with `columns` columns (at least one) and default spacing.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: usize) -> Self {
        Self::with_config(name, columns, &LayoutConfig::default())
    }

    /// Create a grid whose spacing comes from `config`.
    #[must_use]
    pub fn with_config(name: impl Into<String>, columns: usize, config: &LayoutConfig) -> Self {
        Self {
            container: Container::new(name),
            columns: columns.max(1),
            spacing: config.grid_spacing,
            adding_to_column: None,
            add_pos: (0, 0),
            table: Vec::new(),
        }
    }

    /// Column count.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Horizontal and vertical gaps.
    #[must_use]
    pub const fn spacing(&self) -> Size {
        self.spacing
    }

    /// Set the horizontal and vertical gaps.
    pub fn set_spacing(&mut self, spacing: Size) {
        self.spacing = spacing;
    }

    /// Append `view` at the next free slot with the default centre-left alignment.
    pub fn add_view(&mut self, view: Box<dyn View>) -> Result<CellId, LayoutError> {
        self.add(view, Alignment::CENTER_LEFT)
    }

    /// Send later appends down column `col`, starting at its first empty row.
    pub fn set_column_to_add_to(&mut self, col: usize) {
        let col = col.min(self.columns - 1);
        self.adding_to_column = Some(col);
        let row = (0..)
            .find(|&row| self.slot(col, row).is_none())
            .unwrap_or_default();
        self.add_pos = (col, row);
    }

    /// Go back to row-major appends, filling the first empty slot onwards.
    pub fn fill_row_major(&mut self) {
        self.adding_to_column = None;
        self.add_pos = (0, 0);
    }

    /// Number of rows: one past the last occupied row.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.table
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |i| i / self.columns + 1)
    }

    /// Cell at `(col, row)`.
    #[must_use]
    pub fn get_cell(&self, col: usize, row: usize) -> Option<&Cell> {
        self.slot(col, row).and_then(|id| self.container.cell(id))
    }

    /// Handle at `(col, row)`.
    #[must_use]
    pub fn slot(&self, col: usize, row: usize) -> Option<CellId> {
        if col >= self.columns {
            return None;
        }
        self.table.get(row * self.columns + col).copied().flatten()
    }

    /// Position of a cell.
    #[must_use]
    pub fn get_view_xy(&self, id: CellId) -> Option<(usize, usize)> {
        self.table
            .iter()
            .position(|s| *s == Some(id))
            .map(|i| (i % self.columns, i / self.columns))
    }

    fn set_slot(&mut self, col: usize, row: usize, id: Option<CellId>) {
        let index = row * self.columns + col;
        if self.table.len() <= index {
            self.table.resize((row + 1) * self.columns, None);
        }
        self.table[index] = id;
    }

    fn advance(&mut self) {
        if self.adding_to_column.is_some() {
            self.add_pos.1 += 1;
        } else {
            self.add_pos.0 += 1;
            if self.add_pos.0 >= self.columns {
                self.add_pos = (0, self.add_pos.1 + 1);
            }
        }
    }

    fn next_free_slot(&mut self) -> (usize, usize) {
        while self.slot(self.add_pos.0, self.add_pos.1).is_some() {
            self.advance();
        }
        self.add_pos
    }
}

/// Measured input rows plus the handle in each slot.
fn table_rows(
    c: &Container,
    table: &[Option<CellId>],
    columns: usize,
    total: Size,
) -> (Vec<CellRow>, Vec<Vec<Option<CellId>>>) {
    let mut rows = Vec::new();
    let mut ids = Vec::new();
    for handles in table.chunks(columns) {
        let mut cells = Vec::with_capacity(columns);
        for id in handles {
            let cell = id.and_then(|id| c.cell(id));
            cells.push(
                cell.filter(|cell| cell.layout.is_flowed())
                    .map(|cell| cell.measured(total)),
            );
        }
        rows.push(cells);
        ids.push(handles.to_vec());
    }
    (rows, ids)
}

impl CellsOwner for Grid {
    fn container(&self) -> &Container {
        &self.container
    }

    fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }
}

impl Arranger for Grid {
    fn arrange_children(&mut self) {
        let rows_used = self.row_count() * self.columns;
        let table = &self.table[..rows_used];
        let (columns, spacing) = (self.columns, self.spacing);

        self.container.layout_pass(|c| {
            let content = c.content_rect();
            let (rows, ids) = table_rows(c, table, columns, content.size());
            let col_cells = harmonize_columns(&rows, columns);
            let heights = harmonize_row_heights(&rows);
            let spans = column_spans(content, spacing.width, &col_cells);
            trace!(grid = %c.name(), ?content, rows = rows.len(), "arrange grid");

            let mut y = content.y;
            for (j, row) in rows.iter().enumerate() {
                let h = heights[j];
                for (i, l) in row.iter().enumerate() {
                    let (Some(l), Some(id)) = (l, ids[j][i]) else {
                        continue;
                    };
                    let (x, w) = spans[i];
                    let bx = Rect::new(x, y, w, h);
                    let ar = bx
                        .align_pro(l.original_size, l.alignment, l.margin, l.max_size, l.min_size)
                        .clipped(&bx);
                    if let Some(cell) = c.cell_mut(id) {
                        cell.layout.original_size = l.original_size;
                        cell.view_mut().set_rect(ar);
                    }
                }
                y += h + spacing.height;
            }
            c.arrange_advanced(true);
        });
    }
}

impl CellContainer for Grid {
    fn add_cell(&mut self, cell: Cell, index: Option<usize>) -> Result<CellId, LayoutError> {
        if let Some(index) = index {
            return Err(LayoutError::IndexedGridInsert {
                grid: self.container.name().to_string(),
                index,
            });
        }
        cell.layout.alignment.validate()?;
        let (col, row) = self.next_free_slot();
        let id = self.container.insert_cell(cell, None);
        self.set_slot(col, row, Some(id));
        debug!(grid = %self.container.name(), cell = %id, col, row, "placed");
        self.advance();
        Ok(id)
    }

    fn remove_child(&mut self, id: CellId) -> Result<Box<dyn View>, LayoutError> {
        if let Some((col, row)) = self.get_view_xy(id) {
            self.set_slot(col, row, None);
        }
        match self.container.take_cell(id) {
            Some(cell) => Ok(cell.into_view()),
            None => Err(self.container.not_found(id)),
        }
    }
}

impl View for Grid {
    fn object_name(&self) -> &str {
        self.container.name()
    }

    fn set_object_name(&mut self, name: &str) {
        self.container.set_name(name);
    }

    fn calculated_size(&self, total: Size) -> Size {
        let inner = total + self.container.margin().size();
        let table = &self.table[..self.row_count() * self.columns];
        let (rows, _) = table_rows(&self.container, table, self.columns, inner);
        let columns = harmonize_columns(&rows, self.columns);
        let heights = harmonize_row_heights(&rows);
        self.container
            .finish_size(table_size(&columns, &heights, self.spacing))
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
