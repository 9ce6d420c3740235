//! Column/row harmonization for tables of cells.
//!
//! Rows share one set of column widths; each row keeps its own height.
//! A `None` entry is an empty slot: it adds nothing to a column's width or
//! bounds and nothing to its row's height.

use crate::alignment::Alignment;
use crate::geometry::{Axis, Rect, Size};
use crate::stacking::{layout_cells_in_stack, stacked_size, LayoutCell};

/// One row of optional cells.
pub type CellRow = Vec<Option<LayoutCell>>;

/// Build the canonical column row for `rows`.
///
/// For column `i` the width is the widest clamped outer width in that column.
/// The max bound is the tightest non-zero max unless some cell has no max, in
/// which case the column is unconstrained. The min bound is the largest
/// non-zero min. A column expands when any of its cells expands horizontally.
#[must_use]
pub fn harmonize_columns(rows: &[CellRow], column_count: usize) -> Vec<LayoutCell> {
    let column_count = rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(column_count);

    (0..column_count)
        .map(|col| {
            let mut width: f32 = 0.0;
            let mut max: Option<f32> = None;
            let mut unbounded = false;
            let mut min: f32 = 0.0;
            let mut expands = false;

            for cell in rows.iter().filter_map(|r| r.get(col)).flatten() {
                let margin = 2.0 * cell.margin.width;
                width = width.max(cell.outer(Axis::Horizontal));
                if cell.max_size.width == 0.0 {
                    unbounded = true;
                } else {
                    let m = cell.max_size.width + margin;
                    max = Some(max.map_or(m, |cur| cur.min(m)));
                }
                if cell.min_size.width != 0.0 {
                    min = min.max(cell.min_size.width + margin);
                }
                expands |= cell.alignment.expands(Axis::Horizontal);
            }

            let mut alignment = Alignment::CENTER_LEFT;
            if expands {
                alignment |= Alignment::HOR_EXPAND;
            }
            let max = if unbounded { 0.0 } else { max.unwrap_or(0.0) };
            LayoutCell::new(alignment)
                .with_original_size(Size::new(width, 0.0))
                .with_max_size(Size::new(max, 0.0))
                .with_min_size(Size::new(min, 0.0))
                .named(format!("column{col}"))
        })
        .collect()
}

/// Height of each row: the tallest clamped outer height among its cells.
#[must_use]
pub fn harmonize_row_heights(rows: &[CellRow]) -> Vec<f32> {
    rows.iter()
        .map(|row| {
            row.iter()
                .flatten()
                .map(|c| c.outer(Axis::Vertical))
                .fold(0.0, f32::max)
        })
        .collect()
}

/// Measured size of a harmonized table, spacing included.
#[must_use]
pub fn table_size(columns: &[LayoutCell], heights: &[f32], spacing: Size) -> Size {
    let width = stacked_size(Axis::Horizontal, spacing.width, columns).width;
    let mut height: f32 = heights.iter().sum();
    if heights.len() > 1 {
        height += spacing.height * (heights.len() - 1) as f32;
    }
    Size::new(width, height)
}

/// Horizontal extents `(x, width)` of each canonical column inside `rect`.
#[must_use]
pub fn column_spans(rect: Rect, spacing: f32, columns: &[LayoutCell]) -> Vec<(f32, f32)> {
    layout_cells_in_stack(rect, Axis::Horizontal, spacing, columns)
        .into_iter()
        .map(|r| r.map_or((rect.x, 0.0), |r| (r.x, r.width)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(w: f32, h: f32) -> Option<LayoutCell> {
        Some(LayoutCell::new(Alignment::CENTER_LEFT).with_original_size(Size::new(w, h)))
    }

    #[test]
    fn test_columns_take_widest() {
        let rows = vec![
            vec![cell(50.0, 10.0), cell(20.0, 10.0)],
            vec![cell(80.0, 30.0), cell(10.0, 5.0)],
        ];
        let cols = harmonize_columns(&rows, 2);
        assert_eq!(cols[0].original_size.width, 80.0);
        assert_eq!(cols[1].original_size.width, 20.0);
        assert_eq!(harmonize_row_heights(&rows), vec![10.0, 30.0]);
    }

    #[test]
    fn test_columns_tightest_max_unless_unbounded() {
        let bounded = |w: f32, max: f32| {
            Some(
                LayoutCell::new(Alignment::LEFT)
                    .with_original_size(Size::new(w, 1.0))
                    .with_max_size(Size::new(max, 0.0)),
            )
        };
        let rows = vec![vec![bounded(10.0, 60.0)], vec![bounded(10.0, 40.0)]];
        assert_eq!(harmonize_columns(&rows, 1)[0].max_size.width, 40.0);

        let rows = vec![vec![bounded(10.0, 60.0)], vec![cell(10.0, 1.0)]];
        assert_eq!(harmonize_columns(&rows, 1)[0].max_size.width, 0.0);
    }

    #[test]
    fn test_columns_largest_min_and_expand() {
        let rows = vec![
            vec![Some(
                LayoutCell::new(Alignment::LEFT | Alignment::HOR_EXPAND)
                    .with_min_size(Size::new(30.0, 0.0)),
            )],
            vec![Some(LayoutCell::new(Alignment::LEFT).with_min_size(Size::new(45.0, 0.0)))],
        ];
        let col = &harmonize_columns(&rows, 1)[0];
        assert_eq!(col.min_size.width, 45.0);
        assert!(col.alignment.expands(Axis::Horizontal));
    }

    #[test]
    fn test_holes_contribute_nothing() {
        let rows = vec![vec![cell(50.0, 12.0), None], vec![None, cell(30.0, 8.0)]];
        let cols = harmonize_columns(&rows, 2);
        assert_eq!(cols[0].original_size.width, 50.0);
        assert_eq!(cols[1].original_size.width, 30.0);
        assert_eq!(harmonize_row_heights(&rows), vec![12.0, 8.0]);
    }

    #[test]
    fn test_table_size_and_spans() {
        let rows = vec![vec![cell(50.0, 10.0), cell(20.0, 10.0)]];
        let cols = harmonize_columns(&rows, 2);
        let heights = harmonize_row_heights(&rows);
        assert_eq!(
            table_size(&cols, &heights, Size::new(6.0, 4.0)),
            Size::new(76.0, 10.0)
        );
        let spans = column_spans(Rect::new(0.0, 0.0, 200.0, 10.0), 6.0, &cols);
        assert_eq!(spans, vec![(0.0, 50.0), (56.0, 20.0)]);
    }
}
