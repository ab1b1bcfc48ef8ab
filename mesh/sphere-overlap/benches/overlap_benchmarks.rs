//! Benchmarks for overlap mesh generation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sphere_overlap::{generate_overlap, OverlapConfig};
use sphere_types::{cube_sphere, latlon_grid, subdivided_cube_sphere};

fn bench_cube_refinement(c: &mut Criterion) {
    let coarse = cube_sphere();
    let fine = subdivided_cube_sphere(4);
    let config = OverlapConfig::default();

    c.bench_function("overlap_cube_vs_refined", |b| {
        b.iter(|| generate_overlap(black_box(&coarse), black_box(&fine), &config).unwrap());
    });
}

fn bench_rotated_cubes(c: &mut Criterion) {
    let first = cube_sphere();
    let mut second = cube_sphere();
    second.rotate_z(0.5);
    let config = OverlapConfig::default();

    c.bench_function("overlap_rotated_cubes", |b| {
        b.iter(|| generate_overlap(black_box(&first), black_box(&second), &config).unwrap());
    });
}

fn bench_rotated_latlon(c: &mut Criterion) {
    let first = latlon_grid(16, 8);
    let mut second = latlon_grid(16, 8);
    second.rotate_z(11f64.to_radians());
    let config = OverlapConfig::default();

    c.bench_function("overlap_rotated_latlon_16x8", |b| {
        b.iter(|| generate_overlap(black_box(&first), black_box(&second), &config).unwrap());
    });
}

fn bench_exact_kernel(c: &mut Criterion) {
    let first = cube_sphere();
    let mut second = cube_sphere();
    second.rotate_z(0.5);
    let config = OverlapConfig::exact();

    c.bench_function("overlap_rotated_cubes_exact", |b| {
        b.iter(|| generate_overlap(black_box(&first), black_box(&second), &config).unwrap());
    });
}

criterion_group!(
    benches,
    bench_cube_refinement,
    bench_rotated_cubes,
    bench_rotated_latlon,
    bench_exact_kernel
);
criterion_main!(benches);
