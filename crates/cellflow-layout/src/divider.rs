//! Draggable splitter between stack cells.
//!
//! The divider's ratio is the position of its leading edge as a fraction of
//! the parent's content extent. A stack gives spare space to the expanding
//! cells before and after the divider so that the edge lands there.
//!
//! Press/drag/release moves the edge. A second press within the double-click
//! window restores the default ratio instead; presses further apart than the
//! reset window start a new click sequence.

use crate::view::{EventResponse, PointerEvent, PointerPhase, View};
use cellflow_core::{load_f64, store_f64, Axis, KeyValueStore, LayoutConfig, LayoutError, Rect, Size};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Idle,
    /// Offset from the pointer to the divider's leading edge
    Dragging { grab: f32 },
}

/// Splitter view.
pub struct DividerView {
    name: String,
    axis: Axis,
    ratio: f32,
    default_ratio: f32,
    thickness: f32,
    drag: Drag,
    down_at: Option<Instant>,
    double_clicking: bool,
    double_click: Duration,
    click_reset: Duration,
    store: Option<(String, Arc<dyn KeyValueStore>)>,
    rect: Rect,
    visible: bool,
}

impl DividerView {
    /// Create a divider splitting along `axis` (the parent stack's axis).
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self::with_config(axis, &LayoutConfig::default())
    }

    /// Create a divider with thickness and click timings from `config`.
    #[must_use]
    pub fn with_config(axis: Axis, config: &LayoutConfig) -> Self {
        Self {
            name: "divider".to_string(),
            axis,
            ratio: 0.0,
            default_ratio: 0.0,
            thickness: config.divider_thickness,
            drag: Drag::Idle,
            down_at: None,
            double_clicking: false,
            double_click: config.double_click(),
            click_reset: config.click_reset(),
            store: None,
            rect: Rect::default(),
            visible: true,
        }
    }

    /// Persist the ratio under `key`.
    #[must_use]
    pub fn with_store(mut self, key: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some((key.into(), store));
        self
    }

    /// Ratio restored by a double-click; zero lets the stack share space evenly.
    #[must_use]
    pub fn with_default_ratio(mut self, ratio: f32) -> Self {
        self.default_ratio = ratio.clamp(0.0, 1.0);
        self.ratio = self.default_ratio;
        self
    }

    /// Splitting axis.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Current ratio.
    #[must_use]
    pub const fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, Drag::Dragging { .. })
    }

    /// Set and persist the ratio.
    pub fn set_ratio(&mut self, ratio: f32) -> Result<(), LayoutError> {
        self.ratio = ratio.clamp(0.0, 1.0);
        self.save()
    }

    /// Load the persisted ratio. Returns whether one was found.
    pub fn restore(&mut self) -> Result<bool, LayoutError> {
        let Some((key, store)) = &self.store else {
            return Ok(false);
        };
        match load_f64(store.as_ref(), key)? {
            Some(r) => {
                self.ratio = (r as f32).clamp(0.0, 1.0);
                debug!(divider = %self.name, ratio = self.ratio, "restored");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn save(&self) -> Result<(), LayoutError> {
        match &self.store {
            Some((key, store)) => store_f64(store.as_ref(), key, f64::from(self.ratio)),
            None => Ok(()),
        }
    }

    fn save_or_warn(&self) {
        if let Err(e) = self.save() {
            warn!(divider = %self.name, error = %e, "could not store ratio");
        }
    }

    fn press(&mut self, event: &PointerEvent) -> EventResponse {
        let since = self.down_at.map(|t| event.at.saturating_duration_since(t));
        if since.is_some_and(|s| s > self.click_reset) {
            self.down_at = None;
        }
        if since.is_some_and(|s| s < self.double_click) {
            self.double_clicking = true;
            self.down_at = None;
            self.drag = Drag::Idle;
            self.ratio = self.default_ratio;
            self.save_or_warn();
            debug!(divider = %self.name, ratio = self.ratio, "reset by double-click");
            return EventResponse::ArrangeParent;
        }
        self.double_clicking = false;
        self.down_at = match self.down_at {
            None => Some(event.at),
            Some(_) => None,
        };
        self.drag = Drag::Dragging {
            grab: self.rect.start(self.axis) - event.pos.along(self.axis),
        };
        EventResponse::Handled
    }

    fn drag_to(&mut self, event: &PointerEvent, parent: Rect, grab: f32) -> EventResponse {
        let extent = parent.size().along(self.axis);
        if extent <= 0.0 {
            return EventResponse::Handled;
        }
        let start = parent.start(self.axis);
        let edge = (event.pos.along(self.axis) + grab).max(start);
        self.ratio = ((edge - start) / extent).clamp(0.0, 1.0);
        self.save_or_warn();
        debug!(divider = %self.name, ratio = self.ratio, "dragged");
        EventResponse::ArrangeParent
    }
}

impl fmt::Debug for DividerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DividerView")
            .field("axis", &self.axis)
            .field("ratio", &self.ratio)
            .field("drag", &self.drag)
            .field("store_key", &self.store.as_ref().map(|(k, _)| k))
            .finish_non_exhaustive()
    }
}

impl View for DividerView {
    fn object_name(&self) -> &str {
        &self.name
    }

    fn set_object_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn calculated_size(&self, _total: Size) -> Size {
        Size::both(self.thickness)
    }

    fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    fn rect(&self) -> Rect {
        self.rect
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn divider_weight(&self) -> f32 {
        self.ratio
    }

    fn handle_pointer(&mut self, event: &PointerEvent, parent: Rect) -> EventResponse {
        match (event.phase, self.drag) {
            (PointerPhase::Down, _) => self.press(event),
            (PointerPhase::Move, Drag::Dragging { grab }) if !self.double_clicking => {
                self.drag_to(event, parent, grab)
            }
            (PointerPhase::Move, _) => EventResponse::Ignored,
            (PointerPhase::Up, _) => {
                self.drag = Drag::Idle;
                EventResponse::Handled
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
