use criterion::{Criterion, black_box, criterion_group, criterion_main};

use sill_core::geometry::{Point, Rect};
use sill_core::id::RowId;
use sill_core::registry::RowRegistry;

fn populated_registry(rows: usize) -> RowRegistry {
    let mut reg = RowRegistry::new();
    for i in 0..rows {
        reg.insert(
            RowId::item(format!("/bench/row/{i}")),
            Rect::new(0.0, i as f32 * 24.0, 320.0, 24.0),
        );
    }
    reg
}

fn bench_hit(c: &mut Criterion) {
    let reg = populated_registry(1000);
    c.bench_function("registry_hit_1000_rows", |b| {
        b.iter(|| reg.hit(black_box(Point::new(100.0, 12_345.0))))
    });
}

fn bench_intersecting(c: &mut Criterion) {
    let reg = populated_registry(1000);
    let marquee = Rect::new(50.0, 2_000.0, 200.0, 600.0);
    c.bench_function("registry_intersecting_1000_rows", |b| {
        b.iter(|| reg.intersecting(black_box(&marquee)))
    });
}

criterion_group!(benches, bench_hit, bench_intersecting);
criterion_main!(benches);
