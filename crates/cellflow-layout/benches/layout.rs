//! Benchmarks for arrangement passes.

use cellflow_core::{
    layout_cells_in_stack, Alignment, Axis, LayoutCell, Rect, Size,
};
use cellflow_layout::{CellContainer, CustomView, Grid, Stack, View};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn leaf(i: usize, w: f32, h: f32) -> Box<dyn View> {
    Box::new(CustomView::new(format!("c{i}"), Size::new(w, h)))
}

fn stack_with(n: usize) -> Stack {
    let mut stack = Stack::vertical("bench");
    for i in 0..n {
        let align = if i % 3 == 0 {
            Alignment::TOP_LEFT | Alignment::VERT_EXPAND
        } else {
            Alignment::TOP_LEFT
        };
        stack
            .add(leaf(i, 40.0, 12.0), align)
            .expect("valid alignment");
    }
    stack
}

fn bench_stack_solver(c: &mut Criterion) {
    let cells: Vec<LayoutCell> = (0..100)
        .map(|i| {
            let align = if i % 2 == 0 {
                Alignment::TOP_LEFT | Alignment::VERT_EXPAND
            } else {
                Alignment::TOP_LEFT
            };
            LayoutCell::new(align).with_original_size(Size::new(30.0, 10.0))
        })
        .collect();
    let rect = Rect::new(0.0, 0.0, 800.0, 2400.0);

    c.bench_function("layout_cells_in_stack_100", |b| {
        b.iter(|| layout_cells_in_stack(black_box(rect), Axis::Vertical, 6.0, black_box(&cells)))
    });
}

fn bench_stack_arrange(c: &mut Criterion) {
    let mut stack = stack_with(100);
    let rect = Rect::new(0.0, 0.0, 400.0, 3000.0);

    c.bench_function("stack_arrange_100_children", |b| {
        b.iter(|| stack.set_rect(black_box(rect)))
    });
}

fn bench_nested_stacks(c: &mut Criterion) {
    let mut root = Stack::horizontal("root");
    for _ in 0..10 {
        root.add(Box::new(stack_with(10)), Alignment::TOP_LEFT | Alignment::EXPAND)
            .expect("valid alignment");
    }
    let rect = Rect::new(0.0, 0.0, 1200.0, 800.0);

    c.bench_function("nested_stacks_10x10", |b| {
        b.iter(|| root.set_rect(black_box(rect)))
    });
}

fn bench_grid_arrange(c: &mut Criterion) {
    let mut grid = Grid::new("bench", 12);
    for i in 0..120 {
        grid.add_view(leaf(i, 20.0 + (i % 7) as f32 * 5.0, 14.0))
            .expect("row-major insert");
    }
    let size = grid.calculated_size(Size::ZERO);

    c.bench_function("grid_12x10_measure", |b| {
        b.iter(|| grid.calculated_size(black_box(Size::ZERO)))
    });
    c.bench_function("grid_12x10_arrange", |b| {
        b.iter(|| grid.set_rect(black_box(Rect::from_size(size))))
    });
}

criterion_group!(
    benches,
    bench_stack_solver,
    bench_stack_arrange,
    bench_nested_stacks,
    bench_grid_arrange,
);
criterion_main!(benches);
