use std::f64::consts::{PI, TAU};

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use orbis_sphere::*;

fn ring(ids: &mut PointIds, n: usize, phi: f64) -> Row {
    (0..n)
        .map(|k| Point::spherical(ids.allocate(), 1.0, -PI + TAU * k as f64 / n as f64, phi))
        .collect()
}

fn bench_walk_the_dog(c: &mut Criterion) {
    let mut ids = PointIds::default();
    let previous = ring(&mut ids, 300, 0.2);
    let current = ring(&mut ids, 280, 0.1);
    c.bench_function("walk_the_dog_300x280", |bencher| {
        bencher.iter(|| black_box(walk_the_dog(black_box(&previous), black_box(&current))))
    });
}

fn bench_pole_fan(c: &mut Criterion) {
    let mut ids = PointIds::default();
    let pole = vec![Point::new(ids.allocate(), glam::DVec3::Z)];
    let current = ring(&mut ids, 300, 1.5);
    c.bench_function("walk_the_dog_pole_fan", |bencher| {
        bencher.iter(|| black_box(walk_the_dog(black_box(&pole), black_box(&current))))
    });
}

fn bench_build_mesh(c: &mut Criterion) {
    let heights = Grid::from_fn(720, 360, |i, j| ((i * 31 + j * 17) % 97) as f64);
    let settings = MeshSettings {
        projection: ProjectionKind::Equirectangular,
        points: 20_000,
        caps: Caps::Angle(10.0),
        ..MeshSettings::default()
    };
    c.bench_function("build_mesh_720x360_20k", |bencher| {
        bencher.iter(|| black_box(build_mesh(black_box(&heights), &settings, &Logos::default())))
    });
}

criterion_group!(benches, bench_walk_the_dog, bench_pole_fan, bench_build_mesh);
criterion_main!(benches);
