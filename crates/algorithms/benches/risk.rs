//! Benchmarks for terrain derivatives and risk assembly

use avarisk_algorithms::risk::{assemble, GroupReduction, RiskModel};
use avarisk_algorithms::terrain::{slope_aspect, SlopeAspectParams};
use avarisk_core::{build_grid, Coordinate, Raster, SampleGrid, WeatherReading};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_dem(grid: &SampleGrid) -> Raster<f64> {
    let (rows, cols) = grid.shape();
    let mut dem = Raster::new(rows, cols);

    // Ridge and valley pattern on top of a tilted plane
    for row in 0..rows {
        for col in 0..cols {
            let base = 1500.0 + (rows - row) as f64 * 25.0;
            let variation = ((row * 7 + col * 13) % 100) as f64 * 3.0;
            dem.set(row, col, base + variation).unwrap();
        }
    }
    dem
}

fn grid_with_size(size: usize) -> SampleGrid {
    let spacing_km = 0.03;
    build_grid(Coordinate::new(46.5, 7.9), (size - 1) as f64 * spacing_km, spacing_km).unwrap()
}

fn bench_slope_aspect(c: &mut Criterion) {
    let mut group = c.benchmark_group("slope_aspect");

    for size in [11, 101, 501, 1001].iter() {
        let grid = grid_with_size(*size);
        let dem = create_dem(&grid);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| slope_aspect(black_box(&grid), black_box(&dem), &SlopeAspectParams::default()).unwrap())
        });
    }

    group.finish();
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    let model = RiskModel::new(GroupReduction::SMALL_GROUP_ADVANTAGE).unwrap();
    let weather = WeatherReading::new(25.0, 40.0).unwrap();

    for size in [11, 101, 501, 1001].iter() {
        let grid = grid_with_size(*size);
        let terrain = slope_aspect(&grid, &create_dem(&grid), &SlopeAspectParams::default()).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| assemble(black_box(&grid), black_box(&terrain), &weather, 4, &model).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_slope_aspect, bench_assemble);
criterion_main!(benches);
