//! Alignment bit-flags and the single-cell alignment solver.

use crate::error::LayoutError;
use crate::geometry::{Axis, Rect, Size};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Where a child sits inside the box it is given, and whether it stretches
    /// or shrinks to that box.
    ///
    /// One horizontal anchor and one vertical anchor are normally combined,
    /// optionally with expand/shrink modifiers per axis.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Alignment: u32 {
        const LEFT = 1;
        const HOR_CENTER = 1 << 1;
        const RIGHT = 1 << 2;
        const TOP = 1 << 3;
        const VERT_CENTER = 1 << 4;
        const BOTTOM = 1 << 5;
        const HOR_EXPAND = 1 << 6;
        const VERT_EXPAND = 1 << 7;
        const HOR_SHRINK = 1 << 8;
        const VERT_SHRINK = 1 << 9;

        const CENTER = Self::HOR_CENTER.bits() | Self::VERT_CENTER.bits();
        const EXPAND = Self::HOR_EXPAND.bits() | Self::VERT_EXPAND.bits();
        const SHRINK = Self::HOR_SHRINK.bits() | Self::VERT_SHRINK.bits();
        const HORIZONTAL = Self::LEFT.bits()
            | Self::HOR_CENTER.bits()
            | Self::RIGHT.bits()
            | Self::HOR_EXPAND.bits()
            | Self::HOR_SHRINK.bits();
        const VERTICAL = Self::TOP.bits()
            | Self::VERT_CENTER.bits()
            | Self::BOTTOM.bits()
            | Self::VERT_EXPAND.bits()
            | Self::VERT_SHRINK.bits();

        const TOP_LEFT = Self::TOP.bits() | Self::LEFT.bits();
        const TOP_RIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        const BOTTOM_LEFT = Self::BOTTOM.bits() | Self::LEFT.bits();
        const BOTTOM_RIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();
        const CENTER_LEFT = Self::VERT_CENTER.bits() | Self::LEFT.bits();
        const CENTER_RIGHT = Self::VERT_CENTER.bits() | Self::RIGHT.bits();
        const TOP_CENTER = Self::TOP.bits() | Self::HOR_CENTER.bits();
        const BOTTOM_CENTER = Self::BOTTOM.bits() | Self::HOR_CENTER.bits();
    }
}

/// Where along one axis a child is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Left or top edge
    Start,
    /// Middle
    Center,
    /// Right or bottom edge
    End,
}

impl Alignment {
    /// No alignment: the cell takes no part in size or position computation.
    pub const NONE: Self = Self::empty();

    /// True for the `NONE` value.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.is_empty()
    }

    /// Check that a non-`NONE` alignment says something about at least one axis.
    pub fn validate(self) -> Result<Self, LayoutError> {
        if self.is_none() || self.intersects(Self::HORIZONTAL | Self::VERTICAL) {
            Ok(self)
        } else {
            Err(LayoutError::InvalidAlignment(self))
        }
    }

    /// The flags that concern `axis` only.
    #[must_use]
    pub const fn only(self, axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => self.intersection(Self::HORIZONTAL),
            Axis::Vertical => self.intersection(Self::VERTICAL),
        }
    }

    /// Anchor along `axis`, if one is set. Start wins over end, end over center.
    #[must_use]
    pub const fn anchor(self, axis: Axis) -> Option<Anchor> {
        let (start, center, end) = match axis {
            Axis::Horizontal => (Self::LEFT, Self::HOR_CENTER, Self::RIGHT),
            Axis::Vertical => (Self::TOP, Self::VERT_CENTER, Self::BOTTOM),
        };
        if self.contains(start) {
            Some(Anchor::Start)
        } else if self.contains(end) {
            Some(Anchor::End)
        } else if self.contains(center) {
            Some(Anchor::Center)
        } else {
            None
        }
    }

    /// Expand flag for `axis`.
    #[must_use]
    pub const fn expands(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Self::HOR_EXPAND),
            Axis::Vertical => self.contains(Self::VERT_EXPAND),
        }
    }

    /// Shrink flag for `axis`.
    #[must_use]
    pub const fn shrinks(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.contains(Self::HOR_SHRINK),
            Axis::Vertical => self.contains(Self::VERT_SHRINK),
        }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::NONE
    }
}

/// Clamp `v` to `[min, max]` where a zero bound means "no bound".
#[must_use]
pub fn clamp_non_zero(v: f32, min: f32, max: f32) -> f32 {
    let mut v = v;
    if max != 0.0 {
        v = v.min(max);
    }
    if min != 0.0 {
        v = v.max(min);
    }
    v
}

impl Rect {
    /// Place a child of intrinsic `size` inside this rect.
    ///
    /// The margin is inset on both sides of each axis. Expand stretches the child
    /// to the inset box, shrink caps it there, then `max_size`/`min_size` clamp
    /// the result (zero components are unbounded). Without an anchor an axis is
    /// centred.
    #[must_use]
    pub fn align_pro(
        &self,
        size: Size,
        alignment: Alignment,
        margin: Size,
        max_size: Size,
        min_size: Size,
    ) -> Self {
        let (x, w) = self.align_span(Axis::Horizontal, size, alignment, margin, max_size, min_size);
        let (y, h) = self.align_span(Axis::Vertical, size, alignment, margin, max_size, min_size);
        Self::new(x, y, w, h)
    }

    fn align_span(
        &self,
        axis: Axis,
        size: Size,
        alignment: Alignment,
        margin: Size,
        max_size: Size,
        min_size: Size,
    ) -> (f32, f32) {
        let start = self.start(axis);
        let len = self.size().along(axis);
        let marg = margin.along(axis);
        let avail = 2.0f32.mul_add(-marg, len).max(0.0);

        let mut s = size.along(axis);
        if alignment.expands(axis) && s < avail {
            s = avail;
        }
        if alignment.shrinks(axis) && s > avail {
            s = avail;
        }
        s = clamp_non_zero(s, min_size.along(axis), max_size.along(axis));

        let pos = match alignment.anchor(axis) {
            Some(Anchor::Start) => start + marg,
            Some(Anchor::End) => start + len - marg - s,
            Some(Anchor::Center) | None => start + marg + (avail - s) / 2.0,
        };
        (pos, s)
    }
}
