use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use forest_topology::algs::completion::complete_connectivity;
use forest_topology::algs::corner_transform::find_corner_transform;
use forest_topology::algs::edge_transform::find_edge_transform;
use forest_topology::algs::face_transform::find_face_transform;
use forest_topology::mesh_generation::brick;
use forest_topology::topology::connectivity::TopIdx;
use forest_topology::topology::tables::{CHILDREN, EDGES, FACES};

fn bench_resolvers(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolvers");

    for &side in &[4usize, 8usize] {
        let conn = brick(side, side, side, true, false, true).expect("valid brick");
        let trees = conn.num_trees() as TopIdx;

        group.bench_with_input(BenchmarkId::new("face", side), &side, |b, _| {
            b.iter(|| {
                for t in 0..trees {
                    for f in 0..FACES {
                        black_box(find_face_transform(&conn, t, f));
                    }
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("edge", side), &side, |b, _| {
            b.iter(|| {
                for t in 0..trees {
                    for e in 0..EDGES {
                        black_box(find_edge_transform(&conn, t, e));
                    }
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("corner", side), &side, |b, _| {
            b.iter(|| {
                for t in 0..trees {
                    for k in 0..CHILDREN {
                        black_box(find_corner_transform(&conn, t, k));
                    }
                }
            });
        });
    }

    group.finish();
}

fn bench_completion(c: &mut Criterion) {
    let mut group = c.benchmark_group("completion");

    for &side in &[4usize, 8usize, 16usize] {
        let conn = brick(side, side, side, false, false, false).expect("valid brick");
        group.bench_with_input(BenchmarkId::new("complete", side), &side, |b, _| {
            b.iter(|| {
                let mut work = conn.clone();
                complete_connectivity(&mut work).expect("vertices present");
                black_box(work);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolvers, bench_completion);
criterion_main!(benches);
