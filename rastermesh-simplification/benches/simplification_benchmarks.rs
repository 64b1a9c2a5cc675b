//! Benchmarks for indexing and edge collapse on raster-style grids

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rastermesh_core::{FacetMesh, Point3f};
use rastermesh_simplification::{EdgeCollapseSimplifier, MeshSimplifier, NeighborSelection};

/// Heightfield of `size` x `size` cells with a few terraces, like a
/// generator would emit for a stepped bitmap.
fn generate_grid_mesh(size: usize) -> FacetMesh {
    let height = |x: usize, y: usize| ((x / 8 + y / 8) % 3) as f32;
    let at = |x: usize, y: usize| Point3f::new(x as f32, -(y as f32), height(x, y));

    let mut mesh = FacetMesh::with_raster_size(size as u32, size as u32);
    for y in 0..size {
        for x in 0..size {
            let (a, b, c, d) = (at(x, y), at(x + 1, y), at(x + 1, y + 1), at(x, y + 1));
            mesh.add_facet(a, c, b).unwrap();
            mesh.add_facet(a, d, c).unwrap();
        }
    }
    mesh
}

fn bench_indexing(c: &mut Criterion) {
    let sizes = [16, 32, 64];
    let complexities = [0, 2, 10];

    let mut group = c.benchmark_group("indexing");

    for &size in &sizes {
        let mesh = generate_grid_mesh(size);
        let face_count = mesh.facet_count();

        for &complexity in &complexities {
            let name = if complexity == 0 { "exhaustive" } else { "bloom" };
            group.bench_with_input(
                BenchmarkId::new(name, format!("{}f_c{}", face_count, complexity)),
                &complexity,
                |b, &complexity| {
                    b.iter_batched(
                        || generate_grid_mesh(size),
                        |mut mesh| {
                            mesh.index_mesh(complexity).unwrap();
                            black_box(mesh);
                        },
                        criterion::BatchSize::LargeInput,
                    );
                },
            );
        }
    }

    group.finish();
}

fn bench_simplification(c: &mut Criterion) {
    let sizes = [16, 32, 64];
    let selections = [NeighborSelection::FirstValid, NeighborSelection::FewestFacets];

    let mut group = c.benchmark_group("simplification");

    for &size in &sizes {
        let face_count = generate_grid_mesh(size).facet_count();

        for &selection in &selections {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", selection), format!("{}f", face_count)),
                &selection,
                |b, &selection| {
                    let simplifier = EdgeCollapseSimplifier {
                        selection,
                        verify: false,
                        ..EdgeCollapseSimplifier::default()
                    };
                    b.iter_batched(
                        || generate_grid_mesh(size),
                        |mut mesh| {
                            let report = simplifier.simplify(black_box(&mut mesh)).unwrap();
                            black_box(report);
                        },
                        criterion::BatchSize::LargeInput,
                    );
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_indexing, bench_simplification);
criterion_main!(benches);
