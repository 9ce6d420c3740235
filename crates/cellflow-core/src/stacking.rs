//! Multi-cell stacking solver.
//!
//! [`stacked_size`] measures a run of cells along one axis and
//! [`layout_cells_in_stack`] distributes a rect among them:
//!
//! 1. intrinsic sizes of flowed cells, clamped to their bounds
//! 2. spare space shared by expand-tagged cells (biased by a divider ratio)
//!    or a deficit taken from shrink-tagged cells
//! 3. leading, centred and trailing groups placed with uniform spacing
//! 4. each cell aligned on the cross axis inside the full band

use crate::alignment::{clamp_non_zero, Alignment, Anchor};
use crate::geometry::{Axis, Rect, Size};
use serde::{Deserialize, Serialize};

const EPSILON: f32 = 0.001;

/// Per-cell input to the solvers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutCell {
    /// Anchor and expand/shrink flags
    pub alignment: Alignment,
    /// Inset applied on both sides of each axis
    pub margin: Size,
    /// Upper clamp; zero components are unbounded
    pub max_size: Size,
    /// Lower clamp; zero components are unbounded
    pub min_size: Size,
    /// Intrinsic size, refreshed from the view on every pass
    pub original_size: Size,
    /// Excluded from flow while collapsed
    pub collapsed: bool,
    /// Excluded from flow, placed against the whole content rect
    pub free: bool,
    /// Divider ratio in `(0, 1]`; zero for ordinary cells
    pub divider: f32,
    /// Debug name
    pub name: String,
}

impl LayoutCell {
    /// Create a cell with the given alignment and nothing else set.
    #[must_use]
    pub fn new(alignment: Alignment) -> Self {
        Self {
            alignment,
            ..Self::default()
        }
    }

    /// Set the intrinsic size.
    #[must_use]
    pub const fn with_original_size(mut self, size: Size) -> Self {
        self.original_size = size;
        self
    }

    /// Set the margin.
    #[must_use]
    pub const fn with_margin(mut self, margin: Size) -> Self {
        self.margin = margin;
        self
    }

    /// Set the upper clamp.
    #[must_use]
    pub const fn with_max_size(mut self, max: Size) -> Self {
        self.max_size = max;
        self
    }

    /// Set the lower clamp.
    #[must_use]
    pub const fn with_min_size(mut self, min: Size) -> Self {
        self.min_size = min;
        self
    }

    /// Set the debug name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether this cell takes part in stacking.
    #[must_use]
    pub fn is_flowed(&self) -> bool {
        !self.collapsed && !self.free && !self.alignment.is_none()
    }

    /// Intrinsic size clamped to `[min_size, max_size]`.
    #[must_use]
    pub fn clamped_size(&self) -> Size {
        Size::new(
            clamp_non_zero(
                self.original_size.width,
                self.min_size.width,
                self.max_size.width,
            ),
            clamp_non_zero(
                self.original_size.height,
                self.min_size.height,
                self.max_size.height,
            ),
        )
    }

    /// Clamped extent plus margin on both sides.
    #[must_use]
    pub fn outer(&self, axis: Axis) -> f32 {
        2.0f32.mul_add(self.margin.along(axis), self.clamped_size().along(axis))
    }
}

/// Total extent of the flowed cells: primary sum plus spacing, cross maximum.
///
/// Expand flags do not change the measured size.
#[must_use]
pub fn stacked_size(axis: Axis, spacing: f32, cells: &[LayoutCell]) -> Size {
    let mut primary = 0.0;
    let mut cross: f32 = 0.0;
    let mut count = 0usize;
    for c in cells.iter().filter(|c| c.is_flowed()) {
        primary += c.outer(axis);
        cross = cross.max(c.outer(axis.cross()));
        count += 1;
    }
    if count > 1 {
        primary += spacing * (count - 1) as f32;
    }
    Size::from_axis(axis, primary, cross)
}

/// Compute one rect per input cell; `None` for cells outside the flow.
#[must_use]
pub fn layout_cells_in_stack(
    rect: Rect,
    axis: Axis,
    spacing: f32,
    cells: &[LayoutCell],
) -> Vec<Option<Rect>> {
    let mut out = vec![None; cells.len()];
    let flowed: Vec<usize> = (0..cells.len()).filter(|&i| cells[i].is_flowed()).collect();
    if flowed.is_empty() {
        return out;
    }

    let avail = rect.size().along(axis);
    let mut sizes: Vec<f32> = cells
        .iter()
        .map(|c| c.clamped_size().along(axis))
        .collect();
    let used = flowed
        .iter()
        .map(|&i| outer_with(cells, &sizes, i, axis))
        .sum::<f32>()
        + spacing * (flowed.len() - 1) as f32;
    let spare = avail - used;

    if spare > EPSILON {
        distribute_spare(cells, &mut sizes, &flowed, axis, spacing, avail, spare);
    } else if spare < -EPSILON {
        let shrinkers: Vec<usize> = flowed
            .iter()
            .copied()
            .filter(|&i| cells[i].alignment.shrinks(axis))
            .collect();
        shrink(cells, &mut sizes, &shrinkers, axis, -spare);
    }

    let group = |anchor: Option<Anchor>| -> Vec<usize> {
        flowed
            .iter()
            .copied()
            .filter(|&i| {
                let a = cells[i].alignment.anchor(axis);
                match anchor {
                    Some(Anchor::Start) => matches!(a, Some(Anchor::Start) | None),
                    other => a == other,
                }
            })
            .collect()
    };
    let leading = group(Some(Anchor::Start));
    let centered = group(Some(Anchor::Center));
    let trailing = group(Some(Anchor::End));

    let extent = |g: &[usize]| -> f32 {
        if g.is_empty() {
            return 0.0;
        }
        g.iter()
            .map(|&i| outer_with(cells, &sizes, i, axis))
            .sum::<f32>()
            + spacing * (g.len() - 1) as f32
    };

    let start = rect.start(axis);
    let end = rect.end(axis);
    let mut place = |g: &[usize], mut pos: f32| {
        for &i in g {
            let len = outer_with(cells, &sizes, i, axis);
            out[i] = Some(place_cell(rect, axis, &cells[i], sizes[i], pos, len));
            pos += len + spacing;
        }
    };

    let lead_extent = extent(&leading);
    let trail_extent = extent(&trailing);
    let center_extent = extent(&centered);

    place(&leading, start);
    let trail_start = end - trail_extent;
    place(&trailing, trail_start);

    let lead_limit = if leading.is_empty() {
        start
    } else {
        start + lead_extent + spacing
    };
    let trail_limit = if trailing.is_empty() {
        end
    } else {
        trail_start - spacing
    };
    let center_pos = (start + (avail - center_extent) / 2.0)
        .min(trail_limit - center_extent)
        .max(lead_limit);
    place(&centered, center_pos);

    out
}

fn outer_with(cells: &[LayoutCell], sizes: &[f32], i: usize, axis: Axis) -> f32 {
    2.0f32.mul_add(cells[i].margin.along(axis), sizes[i])
}

fn place_cell(rect: Rect, axis: Axis, cell: &LayoutCell, size: f32, pos: f32, len: f32) -> Rect {
    let cross = axis.cross();
    let band = Rect::from_axis(
        axis,
        pos,
        len,
        rect.start(cross),
        rect.size().along(cross),
    );
    let want = Size::from_axis(axis, size, cell.original_size.along(cross));
    band.align_pro(
        want,
        cell.alignment,
        cell.margin,
        cell.max_size,
        cell.min_size,
    )
}

/// Share `spare` among expanders, splitting at the first divider when there is one.
fn distribute_spare(
    cells: &[LayoutCell],
    sizes: &mut [f32],
    flowed: &[usize],
    axis: Axis,
    spacing: f32,
    avail: f32,
    spare: f32,
) {
    let expanders = |range: &[usize]| -> Vec<usize> {
        range
            .iter()
            .copied()
            .filter(|&i| cells[i].alignment.expands(axis))
            .collect()
    };

    let Some(dpos) = flowed.iter().position(|&i| cells[i].divider > 0.0) else {
        grow(cells, sizes, &expanders(flowed), axis, spare);
        return;
    };

    let before = expanders(&flowed[..dpos]);
    let after = expanders(&flowed[dpos + 1..]);
    let natural_pos = flowed[..dpos]
        .iter()
        .map(|&i| outer_with(cells, sizes, i, axis))
        .sum::<f32>()
        + spacing * dpos as f32;
    let target = cells[flowed[dpos]].divider * avail;

    let lead = if before.is_empty() {
        0.0
    } else if after.is_empty() {
        spare
    } else {
        (target - natural_pos).clamp(0.0, spare)
    };
    grow(cells, sizes, &before, axis, lead);
    grow(cells, sizes, &after, axis, spare - lead);
}

/// Equal shares of `extra`; a cell that hits its max is frozen and the rest re-share.
fn grow(cells: &[LayoutCell], sizes: &mut [f32], group: &[usize], axis: Axis, extra: f32) {
    let mut open = group.to_vec();
    let mut extra = extra;
    while extra > EPSILON && !open.is_empty() {
        let share = extra / open.len() as f32;
        let mut next = Vec::with_capacity(open.len());
        let mut consumed = 0.0;
        for &i in &open {
            let max = cells[i].max_size.along(axis);
            let target = sizes[i] + share;
            if max != 0.0 && target >= max {
                consumed += (max - sizes[i]).max(0.0);
                sizes[i] = sizes[i].max(max);
            } else {
                sizes[i] = target;
                consumed += share;
                next.push(i);
            }
        }
        extra -= consumed;
        if next.len() == open.len() || consumed <= 0.0 {
            break;
        }
        open = next;
    }
}

/// Equal cuts of `deficit`; a cell that hits its min (or zero) is frozen.
fn shrink(cells: &[LayoutCell], sizes: &mut [f32], group: &[usize], axis: Axis, deficit: f32) {
    let mut open = group.to_vec();
    let mut deficit = deficit;
    while deficit > EPSILON && !open.is_empty() {
        let cut = deficit / open.len() as f32;
        let mut next = Vec::with_capacity(open.len());
        let mut consumed = 0.0;
        for &i in &open {
            let floor = cells[i].min_size.along(axis).max(0.0);
            let target = sizes[i] - cut;
            if target <= floor {
                consumed += (sizes[i] - floor).max(0.0);
                sizes[i] = floor.min(sizes[i]);
            } else {
                sizes[i] = target;
                consumed += cut;
                next.push(i);
            }
        }
        deficit -= consumed;
        if next.len() == open.len() || consumed <= 0.0 {
            break;
        }
        open = next;
    }
}
