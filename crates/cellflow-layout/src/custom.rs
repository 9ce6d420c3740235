//! Fixed-size leaf view.

use crate::view::{Layouter, View};
use cellflow_core::{Rect, Size};
use std::any::Any;
use std::fmt;

/// Leaf view with a fixed intrinsic size.
///
/// Also carries an optional loading flag and [`Layouter`] hooks, which makes it
/// the usual stand-in for concrete widgets.
pub struct CustomView {
    name: String,
    size: Size,
    rect: Rect,
    visible: bool,
    loading: bool,
    layouter: Option<Box<dyn Layouter>>,
}

impl CustomView {
    /// Create a leaf of intrinsic `size`.
    #[must_use]
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            name: name.into(),
            size,
            rect: Rect::default(),
            visible: true,
            loading: false,
            layouter: None,
        }
    }

    /// Attach layout hooks.
    #[must_use]
    pub fn with_layouter(mut self, layouter: Box<dyn Layouter>) -> Self {
        self.layouter = Some(layouter);
        self
    }

    /// Change the intrinsic size.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Mark as loading or loaded.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

impl fmt::Debug for CustomView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomView")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("rect", &self.rect)
            .finish_non_exhaustive()
    }
}

impl View for CustomView {
    fn object_name(&self) -> &str {
        &self.name
    }

    fn set_object_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn calculated_size(&self, _total: Size) -> Size {
        self.size
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

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn as_layouter_mut(&mut self) -> Option<&mut dyn Layouter> {
        match self.layouter.as_mut() {
            Some(l) => Some(l.as_mut()),
            None => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Count(Rc<Cell<u32>>);

    impl Layouter for Count {
        fn handle_before_layout(&mut self) {
            self.0.set(self.0.get() + 1);
        }

        fn handle_after_layout(&mut self) {
            self.0.set(self.0.get() + 10);
        }
    }

    #[test]
    fn test_layouter_only_when_attached() {
        let mut bare = CustomView::new("bare", Size::new(4.0, 4.0));
        assert!(bare.as_layouter_mut().is_none());

        let calls = Rc::new(Cell::new(0));
        let mut hooked = CustomView::new("hooked", Size::new(4.0, 4.0))
            .with_layouter(Box::new(Count(calls.clone())));
        let layouter = hooked.as_layouter_mut().unwrap();
        layouter.handle_before_layout();
        layouter.handle_after_layout();
        assert_eq!(calls.get(), 11);
    }

    #[test]
    fn test_loading_flag() {
        let mut v = CustomView::new("image", Size::new(16.0, 16.0));
        assert!(!v.is_loading());
        v.set_loading(true);
        assert!(v.is_loading());
        v.set_loading(false);
        assert!(!v.is_loading());
    }
}
