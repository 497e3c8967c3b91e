//! Criterion benchmarks for the per-topology quadrature kernel.
//!
//! Runs the moment computation on batches of random vertex values for each
//! supported shape, so case-split costs show up per topology.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use isofront::mesh::CellTopology;
use isofront::vof::vof_moments;
use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn unit_cell(topology: CellTopology) -> Vec<Vector3<f64>> {
    match topology {
        CellTopology::Segment => vec![Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0)],
        CellTopology::Triangle => vec![
            Vector3::zeros(),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ],
        CellTopology::Quadrilateral => vec![
            Vector3::zeros(),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ],
        CellTopology::Tetrahedron => vec![
            Vector3::zeros(),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
        CellTopology::Hexahedron => vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(0.0, 1.0, 1.0),
        ],
    }
}

fn bench_moments(c: &mut Criterion) {
    let mut group = c.benchmark_group("vof_moments");
    let topologies = [
        ("segment", CellTopology::Segment),
        ("triangle", CellTopology::Triangle),
        ("quadrilateral", CellTopology::Quadrilateral),
        ("tetrahedron", CellTopology::Tetrahedron),
        ("hexahedron", CellTopology::Hexahedron),
    ];
    for (name, topology) in topologies {
        let coords = unit_cell(topology);
        let mut rng = StdRng::seed_from_u64(7);
        let batches: Vec<Vec<f64>> = (0..64)
            .map(|_| coords.iter().map(|_| rng.gen_range(-1.0..1.0)).collect())
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(name), &batches, |b, batches| {
            b.iter(|| {
                for values in batches {
                    let _ = black_box(vof_moments(topology, &coords, values));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_moments);
criterion_main!(benches);
