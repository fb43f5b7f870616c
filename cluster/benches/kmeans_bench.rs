use criterion::{black_box, criterion_group, criterion_main, Criterion};
use personalens_cluster::{kmeans_cosine, summarize_clusters};

fn random_unit_vec(dim: usize, seed: u64) -> Vec<f32> {
    let mut v = Vec::with_capacity(dim);
    let mut state = seed;
    for _ in 0..dim {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        v.push(((state >> 33) as f32) / (u32::MAX as f32) - 0.5);
    }
    normalize(&mut v);
    v
}

fn normalize(v: &mut [f32]) {
    let norm: f64 = v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();
    if norm > 0.0 {
        let s = (1.0 / norm) as f32;
        for x in v {
            *x *= s;
        }
    }
}

/// `n` noisy copies of `centroid`.
fn make_cluster(centroid: &[f32], n: usize, noise: f32, base_seed: u64) -> Vec<Vec<f32>> {
    (0..n)
        .map(|i| {
            let r = random_unit_vec(centroid.len(), base_seed.wrapping_add(i as u64 * 997));
            let mut v: Vec<f32> = centroid.iter().zip(&r).map(|(c, x)| c + x * noise).collect();
            normalize(&mut v);
            v
        })
        .collect()
}

fn dataset(dim: usize, clusters: usize, per_cluster: usize) -> Vec<Vec<f32>> {
    (0..clusters)
        .flat_map(|c| {
            let center = random_unit_vec(dim, c as u64 + 1);
            make_cluster(&center, per_cluster, 0.2, (c as u64 + 1) * 1000)
        })
        .collect()
}

fn bench_kmeans(c: &mut Criterion) {
    let small = dataset(256, 3, 20);
    c.bench_function("kmeans_256d_60points_k3", |b| {
        b.iter(|| black_box(kmeans_cosine(black_box(&small), 3, 42, 25)));
    });

    let large = dataset(1536, 8, 64);
    c.bench_function("kmeans_1536d_512points_k8", |b| {
        b.iter(|| black_box(kmeans_cosine(black_box(&large), 8, 42, 25)));
    });
}

fn bench_summaries(c: &mut Criterion) {
    let vectors = dataset(256, 4, 50);
    let Ok(km) = kmeans_cosine(&vectors, 4, 42, 25) else {
        return;
    };
    c.bench_function("summarize_200points_k4", |b| {
        b.iter(|| {
            black_box(summarize_clusters(&vectors, &km, 6, |i| {
                vec![format!("kw{}", i % 7), format!("kw{}", i % 5)]
            }))
        });
    });
}

criterion_group!(benches, bench_kmeans, bench_summaries);
criterion_main!(benches);
