//! Single-line text leaf measured through a shared metrics cache.

use crate::view::View;
use cellflow_core::{FontKey, Rect, Size, TextMeasurer, TextMetricsCache};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Text leaf. Its calculated size is the measured text plus padding.
pub struct Label {
    name: String,
    text: String,
    font: FontKey,
    padding: Size,
    cache: Rc<RefCell<TextMetricsCache>>,
    measurer: Rc<dyn TextMeasurer>,
    rect: Rect,
    visible: bool,
}

impl Label {
    /// Create a label sharing `cache` and `measurer` with other labels.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        font: FontKey,
        cache: Rc<RefCell<TextMetricsCache>>,
        measurer: Rc<dyn TextMeasurer>,
    ) -> Self {
        let text = text.into();
        Self {
            name: text.clone(),
            text,
            font,
            padding: Size::ZERO,
            cache,
            measurer,
            rect: Rect::default(),
            visible: true,
        }
    }

    /// Padding added on each side of the text.
    #[must_use]
    pub const fn with_padding(mut self, padding: Size) -> Self {
        self.padding = padding;
        self
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Label")
            .field("name", &self.name)
            .field("text", &self.text)
            .field("font", &self.font)
            .finish_non_exhaustive()
    }
}

impl View for Label {
    fn object_name(&self) -> &str {
        &self.name
    }

    fn set_object_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn calculated_size(&self, _total: Size) -> Size {
        let text = self
            .cache
            .borrow_mut()
            .measure(self.measurer.as_ref(), &self.font, &self.text);
        text + self.padding.scale(2.0)
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

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
