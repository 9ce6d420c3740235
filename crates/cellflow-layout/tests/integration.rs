//! Integration tests for cellflow-layout.
//!
//! These tests build small view trees and check the geometry that a single
//! top-level `set_rect` produces.

use cellflow_core::{
    Alignment, Axis, FontKey, LayoutConfig, LayoutError, MemoryStore, MonospaceMeasurer, Point,
    Rect, Size, TextMeasurer, TextMetricsCache,
};
use cellflow_layout::{
    arrange_children_at_root_container, child_view, container_is_loading, dispatch_pointer,
    find_view_with_name, view_at, Arranger, CellContainer, CellsOwner, ContainerView, CustomView,
    DividerView, EventResponse, Grid, Label, Layouter, PointerEvent, Stack, View, ViewPath,
};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

// =============================================================================
// Helpers
// =============================================================================

fn leaf(name: &str, w: f32, h: f32) -> Box<dyn View> {
    Box::new(CustomView::new(name, Size::new(w, h)))
}

fn rect_of(owner: &dyn CellsOwner, name: &str) -> Rect {
    let c = owner.container();
    let id = c.find_cell_with_name(name).unwrap();
    c.cell(id).unwrap().view().rect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

/// Appends `tag:phase` to a shared log.
struct Recorder {
    tag: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl Layouter for Recorder {
    fn handle_before_layout(&mut self) {
        self.log.borrow_mut().push(format!("{}:before", self.tag));
    }

    fn handle_after_layout(&mut self) {
        self.log.borrow_mut().push(format!("{}:after", self.tag));
    }
}

// =============================================================================
// Stack
// =============================================================================

#[test]
fn test_vertical_stack_end_to_end() {
    let mut stack = Stack::vertical("form");
    for (name, h) in [("a", 20.0), ("b", 30.0), ("c", 20.0)] {
        stack.add(leaf(name, 50.0, h), Alignment::TOP_LEFT).unwrap();
    }
    assert_eq!(stack.calculated_size(Size::new(50.0, 100.0)).height, 82.0);

    stack.set_rect(Rect::new(0.0, 0.0, 50.0, 100.0));
    assert_eq!(rect_of(&stack, "a"), Rect::new(0.0, 0.0, 50.0, 20.0));
    assert_eq!(rect_of(&stack, "b"), Rect::new(0.0, 26.0, 50.0, 30.0));
    assert_eq!(rect_of(&stack, "c"), Rect::new(0.0, 62.0, 50.0, 20.0));
    let used = rect_of(&stack, "c").max_y();
    assert_eq!(used, 82.0);
    assert!(used <= 100.0);
}

#[test]
fn test_stack_sum_includes_margin() {
    let mut stack = Stack::horizontal("row");
    stack.set_spacing(4.0);
    stack.container_mut().set_margin_uniform(Size::new(3.0, 2.0));
    stack.add(leaf("a", 10.0, 5.0), Alignment::TOP_LEFT).unwrap();
    stack.add(leaf("b", 15.0, 8.0), Alignment::TOP_LEFT).unwrap();
    // 10 + 4 + 15 plus 3 on each side
    assert_eq!(stack.calculated_size(Size::ZERO), Size::new(35.0, 12.0));
}

#[test]
fn test_free_cell_takes_no_space() {
    let mut stack = Stack::vertical("list");
    stack.add(leaf("a", 40.0, 10.0), Alignment::TOP_LEFT).unwrap();
    stack.add(leaf("b", 40.0, 10.0), Alignment::TOP_LEFT).unwrap();
    let before = stack.calculated_size(Size::new(100.0, 100.0));

    stack
        .add_advanced(
            leaf("overlay", 20.0, 20.0),
            Alignment::BOTTOM_RIGHT | Alignment::VERT_EXPAND,
            Size::ZERO,
            Size::ZERO,
            Some(1),
            true,
        )
        .unwrap();
    assert_eq!(stack.calculated_size(Size::new(100.0, 100.0)), before);

    stack.set_rect(Rect::new(0.0, 0.0, 100.0, 60.0));
    assert_eq!(rect_of(&stack, "b").y, 16.0);
    assert_eq!(rect_of(&stack, "overlay"), Rect::new(80.0, 0.0, 20.0, 60.0));
}

#[test]
fn test_clamped_cell_is_idempotent() {
    let mut stack = Stack::horizontal("bar");
    let id = stack
        .add_advanced(
            leaf("a", 40.0, 10.0),
            Alignment::TOP_LEFT,
            Size::ZERO,
            Size::new(60.0, 0.0),
            None,
            false,
        )
        .unwrap();
    stack.container_mut().cell_mut(id).unwrap().layout.min_size = Size::new(20.0, 0.0);

    stack.set_rect(Rect::new(0.0, 0.0, 200.0, 30.0));
    let first = rect_of(&stack, "a");
    assert_eq!(first.width, 40.0);
    stack.arrange_children();
    assert_eq!(rect_of(&stack, "a"), first);
}

#[test]
fn test_collapse_round_trip_keeps_metadata() {
    let mut stack = Stack::vertical("list");
    stack.add(leaf("a", 10.0, 10.0), Alignment::TOP_LEFT).unwrap();
    let b = stack
        .add_advanced(
            leaf("b", 10.0, 10.0),
            Alignment::CENTER_LEFT,
            Size::new(2.0, 2.0),
            Size::new(30.0, 0.0),
            None,
            false,
        )
        .unwrap();
    stack.add(leaf("c", 10.0, 10.0), Alignment::TOP_LEFT).unwrap();
    stack.set_rect(Rect::new(0.0, 0.0, 50.0, 100.0));

    let layout = stack.container().cell(b).unwrap().layout.clone();
    assert!(stack.collapse_child(b, true, true).unwrap());
    assert_eq!(stack.get_children(false).len(), 2);
    assert_eq!(rect_of(&stack, "c").y, 16.0);

    assert!(stack.collapse_child(b, false, true).unwrap());
    let c = stack.container();
    assert_eq!(c.index_of(b), Some(1));
    assert_eq!(c.cell(b).unwrap().layout, layout);
    assert_eq!(c.attached().iter().filter(|id| **id == b).count(), 1);
    assert_eq!(stack.get_children(false).len(), 3);
    assert_eq!(rect_of(&stack, "c").y, 36.0);
}

#[test]
fn test_collapse_by_name() {
    let mut stack = Stack::vertical("list");
    stack.add(leaf("a", 10.0, 10.0), Alignment::TOP_LEFT).unwrap();
    assert!(stack.collapse_child_with_name("a", true, false).unwrap());
    assert!(matches!(
        stack.collapse_child_with_name("zz", true, false),
        Err(LayoutError::CellNotFound(_))
    ));
}

#[test]
fn test_stack_from_config() {
    let config = LayoutConfig::from_toml_str("stack_spacing = 2.0").unwrap();
    let mut stack = Stack::with_config("tight", Axis::Vertical, &config);
    stack.add(leaf("a", 10.0, 10.0), Alignment::TOP_LEFT).unwrap();
    stack.add(leaf("b", 10.0, 10.0), Alignment::TOP_LEFT).unwrap();
    assert_eq!(stack.calculated_size(Size::ZERO).height, 22.0);
}

#[test]
fn test_labels_share_metrics_cache() {
    let cache = Rc::new(RefCell::new(TextMetricsCache::new(64)));
    let measurer: Rc<dyn TextMeasurer> = Rc::new(MonospaceMeasurer);
    let font = FontKey::new("mono", 10.0);

    let mut stack = Stack::vertical("labels");
    stack.set_spacing(0.0);
    for _ in 0..3 {
        let label = Label::new("ok", font.clone(), cache.clone(), measurer.clone());
        stack.add(Box::new(label), Alignment::TOP_LEFT).unwrap();
    }
    assert_eq!(stack.calculated_size(Size::ZERO), Size::new(12.0, 36.0));
    assert_eq!(cache.borrow().misses(), 1);
}

// =============================================================================
// Grid
// =============================================================================

#[test]
fn test_grid_row_major_fill() {
    let mut grid = Grid::new("table", 2);
    let ids: Vec<_> = (0..5)
        .map(|i| grid.add_view(leaf(&format!("v{i}"), 10.0, 10.0)).unwrap())
        .collect();
    let positions: Vec<_> = ids.iter().map(|id| grid.get_view_xy(*id).unwrap()).collect();
    assert_eq!(positions, [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
    assert_eq!(grid.row_count(), 3);
}

#[test]
fn test_grid_column_harmonization() {
    let mut grid = Grid::new("table", 2);
    let wide = Alignment::TOP_LEFT | Alignment::HOR_EXPAND;
    grid.add(leaf("a", 50.0, 10.0), wide).unwrap();
    grid.add(leaf("b", 20.0, 12.0), Alignment::TOP_LEFT).unwrap();
    grid.add(leaf("c", 80.0, 30.0), wide).unwrap();
    grid.add(leaf("d", 20.0, 8.0), Alignment::TOP_LEFT).unwrap();

    let size = grid.calculated_size(Size::ZERO);
    assert_eq!(size, Size::new(106.0, 46.0));
    grid.set_rect(Rect::from_size(size));

    assert_eq!(rect_of(&grid, "a").width, 80.0);
    assert_eq!(rect_of(&grid, "c").width, 80.0);
    assert_eq!(rect_of(&grid, "b").x, rect_of(&grid, "d").x);
    // row heights stay independent
    assert_eq!(rect_of(&grid, "c").y, 16.0);
    assert_eq!(rect_of(&grid, "d").y, 16.0);
}

#[test]
fn test_grid_rows_stack_aligns_columns() {
    let mut table = Stack::vertical("rows");
    table.set_spacing(10.0);
    for (label, field) in [(30.0, 60.0), (70.0, 40.0)] {
        let mut row = ContainerView::new("row");
        row.add(leaf("label", label, 10.0), Alignment::CENTER_LEFT).unwrap();
        row.add(leaf("field", field, 10.0), Alignment::CENTER_LEFT).unwrap();
        table.add(Box::new(row), Alignment::TOP_LEFT).unwrap();
    }
    table.set_grid_vertical_space(5.0).unwrap();
    assert!(matches!(
        table.add(leaf("stray", 1.0, 1.0), Alignment::TOP_LEFT),
        Err(LayoutError::NotCellsOwner(_))
    ));

    assert_eq!(table.calculated_size(Size::ZERO), Size::new(140.0, 25.0));
    table.set_rect(Rect::new(0.0, 0.0, 140.0, 25.0));
    for row in table.get_children(false) {
        let owner = row.as_cells_owner().unwrap();
        assert_eq!(rect_of(owner, "field").x, 80.0);
    }
}

#[test]
fn test_grid_rows_collapsed_row_drops_out() {
    let mut table = Stack::vertical("rows");
    table.set_spacing(10.0);
    let mut ids = Vec::new();
    for (name, label, h) in [("first", 30.0, 10.0), ("wide", 120.0, 40.0), ("last", 50.0, 10.0)] {
        let mut row = ContainerView::new(name);
        row.add(leaf("label", label, h), Alignment::CENTER_LEFT).unwrap();
        row.add(leaf("field", 20.0, h), Alignment::CENTER_LEFT).unwrap();
        ids.push(table.add(Box::new(row), Alignment::TOP_LEFT).unwrap());
    }
    table.set_grid_vertical_space(5.0).unwrap();
    assert_eq!(table.calculated_size(Size::ZERO), Size::new(150.0, 70.0));

    table.collapse_child(ids[1], true, false).unwrap();
    assert_eq!(table.calculated_size(Size::ZERO), Size::new(80.0, 25.0));
    table.set_rect(Rect::new(0.0, 0.0, 80.0, 25.0));

    let last = find_view_with_name(&table, "last", false).unwrap().view;
    assert_eq!(last.rect(), Rect::new(0.0, 15.0, 80.0, 10.0));
    // the collapsed label no longer widens the first column
    assert_eq!(rect_of(last.as_cells_owner().unwrap(), "field").x, 60.0);
    let wide = find_view_with_name(&table, "wide", false).unwrap().view;
    assert!(!wide.is_visible());
    assert_eq!(wide.rect(), Rect::default());
}

#[test]
fn test_grid_free_and_none_cells_take_no_slot_space() {
    let three = || {
        let mut grid = Grid::new("table", 2);
        for name in ["a", "b", "c"] {
            grid.add(leaf(name, 20.0, 10.0), Alignment::TOP_LEFT).unwrap();
        }
        grid
    };
    let plain = three().calculated_size(Size::ZERO);
    assert_eq!(plain, Size::new(46.0, 24.0));

    let mut with_none = three();
    with_none.add(leaf("hidden", 300.0, 300.0), Alignment::NONE).unwrap();
    let hidden = with_none.container().find_cell_with_name("hidden").unwrap();
    assert_eq!(with_none.get_view_xy(hidden), Some((1, 1)));
    assert_eq!(with_none.calculated_size(Size::ZERO), plain);
    with_none.set_rect(Rect::new(0.0, 0.0, 100.0, 40.0));
    assert_eq!(rect_of(&with_none, "c"), Rect::new(0.0, 14.0, 20.0, 10.0));
    assert_eq!(rect_of(&with_none, "hidden"), Rect::default());

    let mut with_free = three();
    with_free
        .add_advanced(
            leaf("badge", 30.0, 30.0),
            Alignment::TOP_RIGHT,
            Size::ZERO,
            Size::ZERO,
            None,
            true,
        )
        .unwrap();
    assert_eq!(with_free.calculated_size(Size::ZERO), plain);
    with_free.set_rect(Rect::new(0.0, 0.0, 100.0, 40.0));
    assert_eq!(rect_of(&with_free, "b"), Rect::new(26.0, 0.0, 20.0, 10.0));
    // free cells are aligned against the whole content rect, not their slot
    assert_eq!(rect_of(&with_free, "badge"), Rect::new(70.0, 0.0, 30.0, 30.0));
}

// =============================================================================
// Protocol
// =============================================================================

#[test]
fn test_layout_hooks_wrap_arrangement() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let recorder = |tag| -> Box<dyn Layouter> {
        Box::new(Recorder {
            tag,
            log: log.clone(),
        })
    };

    let mut inner = Stack::vertical("inner");
    inner.container_mut().set_layout_handler(recorder("inner"));
    inner.add(leaf("x", 5.0, 5.0), Alignment::TOP_LEFT).unwrap();

    let mut root = Stack::vertical("root");
    root.container_mut().set_layout_handler(recorder("root"));
    let hooked = CustomView::new("leaf", Size::new(5.0, 5.0)).with_layouter(recorder("leaf"));
    root.add(Box::new(hooked), Alignment::TOP_LEFT).unwrap();
    root.add(Box::new(inner), Alignment::TOP_LEFT).unwrap();

    root.set_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(
        *log.borrow(),
        [
            "root:before",
            "leaf:before",
            "inner:before",
            "inner:after",
            "root:after",
            "leaf:after",
        ]
    );
}

#[test]
fn test_nested_containers_use_local_coordinates() {
    let mut inner = Stack::vertical("inner");
    inner.container_mut().set_margin_uniform(Size::new(4.0, 4.0));
    inner.add(leaf("x", 10.0, 10.0), Alignment::TOP_LEFT).unwrap();

    let mut root = Stack::vertical("root");
    root.add(leaf("top", 10.0, 30.0), Alignment::TOP_LEFT).unwrap();
    root.add(Box::new(inner), Alignment::TOP_LEFT).unwrap();
    root.set_rect(Rect::new(0.0, 0.0, 100.0, 100.0));

    let found = find_view_with_name(&root, "x", true).unwrap();
    assert_eq!(found.view.rect(), Rect::new(4.0, 4.0, 10.0, 10.0));
    assert_eq!(rect_of(&root, "inner"), Rect::new(0.0, 36.0, 18.0, 18.0));
}

#[test]
fn test_divider_drag_rearranges_parent() {
    let store = Arc::new(MemoryStore::new());
    let mut split = Stack::horizontal("split");
    split.set_spacing(0.0);
    let grow = Alignment::TOP_LEFT | Alignment::HOR_EXPAND;
    split.add(leaf("left", 0.0, 20.0), grow).unwrap();
    let mut divider = DividerView::new(Axis::Horizontal).with_store("split.ratio", store.clone());
    divider.set_ratio(0.7).unwrap();
    let div = split.add(Box::new(divider), Alignment::TOP_LEFT).unwrap();
    split.add(leaf("right", 0.0, 20.0), grow).unwrap();

    split.set_rect(Rect::new(0.0, 0.0, 110.0, 20.0));
    assert!(approx(rect_of(&split, "divider").x, 77.0));
    assert!(approx(rect_of(&split, "left").width, 77.0));

    let t = Instant::now();
    let down = PointerEvent::down(Point::new(80.0, 5.0), t);
    assert_eq!(split.dispatch_pointer(div, &down).unwrap(), EventResponse::Handled);
    let drag = PointerEvent::moved(Point::new(91.0, 5.0), t + Duration::from_millis(30));
    assert_eq!(split.dispatch_pointer(div, &drag).unwrap(), EventResponse::ArrangeParent);

    assert!(approx(rect_of(&split, "divider").x, 88.0));
    assert!(approx(rect_of(&split, "right").width, 12.0));
    assert!(!store.is_empty());
}

#[test]
fn test_divider_restored_from_store() {
    let store = Arc::new(MemoryStore::new());
    let mut first = DividerView::new(Axis::Vertical).with_store("pane", store.clone());
    first.set_ratio(0.25).unwrap();

    let mut second = DividerView::new(Axis::Vertical).with_store("pane", store);
    assert!(second.restore().unwrap());
    assert_eq!(second.ratio(), 0.25);
}

// =============================================================================
// Navigation
// =============================================================================

fn window() -> Stack {
    let mut toolbar = Stack::horizontal("toolbar");
    toolbar.add(leaf("open", 20.0, 10.0), Alignment::TOP_LEFT).unwrap();
    toolbar.add(leaf("save", 20.0, 10.0), Alignment::TOP_LEFT).unwrap();

    let mut split = Stack::horizontal("split");
    split.set_spacing(0.0);
    let grow = Alignment::TOP_LEFT | Alignment::EXPAND;
    split.add(leaf("tree", 0.0, 0.0), grow).unwrap();
    split
        .add(Box::new(DividerView::new(Axis::Horizontal)), Alignment::TOP_LEFT | Alignment::VERT_EXPAND)
        .unwrap();
    split.add(leaf("editor", 0.0, 0.0), grow).unwrap();

    let mut root = Stack::vertical("window");
    root.add(Box::new(toolbar), Alignment::TOP_LEFT).unwrap();
    root.add(Box::new(split), Alignment::TOP_LEFT | Alignment::EXPAND).unwrap();
    root.set_rect(Rect::new(0.0, 0.0, 210.0, 100.0));
    root
}

#[test]
fn test_path_navigation_and_pointer_routing() {
    let mut root = window();
    let divider = child_view(&root, &ViewPath::root(), "split/divider").unwrap();
    let editor = child_view(&root, &divider, "../editor").unwrap();
    assert_eq!(view_at(&root, editor.ids()).unwrap().object_name(), "editor");
    assert_eq!(child_view(&root, &ViewPath::root(), "*/save").unwrap().len(), 2);

    // no ratio yet: the expanders share the spare space evenly
    let x = view_at(&root, divider.ids()).unwrap().rect().x;
    assert_eq!(x, 100.0);

    let t = Instant::now();
    dispatch_pointer(&mut root, &divider, &PointerEvent::down(Point::new(101.0, 50.0), t)).unwrap();
    let moved = PointerEvent::moved(Point::new(51.0, 50.0), t + Duration::from_millis(20));
    assert_eq!(
        dispatch_pointer(&mut root, &divider, &moved).unwrap(),
        EventResponse::ArrangeParent
    );
    assert!(approx(view_at(&root, divider.ids()).unwrap().rect().x, 50.0));
    assert!(approx(view_at(&root, editor.ids()).unwrap().rect().width, 150.0));

    let top = arrange_children_at_root_container(&mut root, &editor).unwrap();
    assert!(top.is_root());
    assert!(approx(view_at(&root, divider.ids()).unwrap().rect().x, 50.0));
}

#[test]
fn test_loading_check_ignores_collapsed() {
    let mut root = ContainerView::new("page");
    let mut image = CustomView::new("image", Size::new(10.0, 10.0));
    image.set_loading(true);
    let mut panel = Stack::vertical("panel");
    panel.add(Box::new(image), Alignment::TOP_LEFT).unwrap();
    let id = root.add(Box::new(panel), Alignment::TOP_LEFT).unwrap();

    assert!(container_is_loading(&root));
    root.collapse_child(id, true, false).unwrap();
    assert!(!container_is_loading(&root));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_stack_size_is_sum_plus_spacing(
        heights in prop::collection::vec(1.0f32..100.0, 0..12),
        spacing in 0.0f32..10.0,
    ) {
        let mut stack = Stack::vertical("p");
        stack.set_spacing(spacing);
        for (i, h) in heights.iter().enumerate() {
            stack.add(leaf(&format!("c{i}"), 10.0, *h), Alignment::TOP_LEFT).unwrap();
        }
        let expected = heights.iter().sum::<f32>()
            + spacing * heights.len().saturating_sub(1) as f32;
        let got = stack.calculated_size(Size::ZERO).height;
        prop_assert!((got - expected).abs() < 1e-2);
    }

    #[test]
    fn prop_arrangement_is_repeatable(
        widths in prop::collection::vec(1.0f32..50.0, 1..8),
        extent in 10.0f32..400.0,
    ) {
        let mut stack = Stack::horizontal("p");
        for (i, w) in widths.iter().enumerate() {
            let align = if i % 2 == 0 { Alignment::TOP_LEFT } else { Alignment::TOP_LEFT | Alignment::HOR_EXPAND };
            stack.add(leaf(&format!("c{i}"), *w, 5.0), align).unwrap();
        }
        stack.set_rect(Rect::new(0.0, 0.0, extent, 20.0));
        let first: Vec<Rect> = stack.get_children(false).iter().map(|v| v.rect()).collect();
        stack.set_rect(Rect::new(0.0, 0.0, extent, 20.0));
        let second: Vec<Rect> = stack.get_children(false).iter().map(|v| v.rect()).collect();
        prop_assert_eq!(first, second);
    }
}
