//! Benchmarks for mesh generation and snapshot encoding.
//!
//! Run with: cargo bench --bench meshing

use cgmath::Point3;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use voxel_space::{
    meshing::mesh::{greedy, naive, VoxelMesh},
    serialization,
    voxels::{
        grid::VoxelGrid,
        space::VoxelSpace,
        voxel::{voxel_type::default_voxel_types, Voxel},
    },
};

const GRID_SIZE: usize = 32;

fn test_grids() -> Vec<(&'static str, VoxelGrid)> {
    let origin = Point3::new(0, 0, 0);
    let half = GRID_SIZE as f32 / 2.0;
    let mut rng = fastrand::Rng::with_seed(42);
    vec![
        ("solid", VoxelGrid::solid(1.0, GRID_SIZE, origin, Voxel::new(1))),
        (
            "sphere",
            VoxelGrid::sphere(
                1.0,
                GRID_SIZE,
                origin,
                Point3::new(half, half, half),
                half - 1.0,
                Voxel::new(5),
            ),
        ),
        ("random", VoxelGrid::random(&mut rng, 1.0, GRID_SIZE, origin, 0.5, 4, 1)),
        ("checkerboard", VoxelGrid::checkerboard(1.0, GRID_SIZE, origin, Voxel::new(3))),
    ]
}

fn benchmark_generators(c: &mut Criterion) {
    let types = default_voxel_types();
    let mut group = c.benchmark_group("generate_mesh");
    group.throughput(Throughput::Elements((GRID_SIZE * GRID_SIZE * GRID_SIZE) as u64));

    for (name, grid) in test_grids() {
        group.bench_with_input(BenchmarkId::new("greedy", name), &grid, |b, grid| {
            b.iter(|| black_box(greedy::generate_mesh(grid).count()))
        });
        group.bench_with_input(BenchmarkId::new("naive", name), &grid, |b, grid| {
            b.iter(|| black_box(naive::generate_mesh(grid, &types).count()))
        });
        group.bench_with_input(BenchmarkId::new("greedy_vertices", name), &grid, |b, grid| {
            b.iter(|| black_box(VoxelMesh::greedy(grid, &types)))
        });
    }

    group.finish();
}

fn benchmark_serialization(c: &mut Criterion) {
    let mut space = VoxelSpace::new(GRID_SIZE, 1.0);
    for (i, (_, grid)) in test_grids().into_iter().enumerate() {
        let coordinate = Point3::new(i as i32, 0, 0);
        let moved = VoxelGrid::from_voxels(1.0, GRID_SIZE, coordinate, grid.into_voxels())
            .expect("same size");
        space.add_grid(moved).expect("matching grid");
    }
    let bytes = serialization::serialize_space(&space).expect("encodable");

    let mut group = c.benchmark_group("serialization");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("serialize_space", |b| {
        b.iter(|| black_box(serialization::serialize_space(&space)))
    });
    group.bench_function("deserialize_space", |b| {
        b.iter(|| black_box(serialization::deserialize_space(&bytes)))
    });
    group.finish();
}

criterion_group!(benches, benchmark_generators, benchmark_serialization);
criterion_main!(benches);
