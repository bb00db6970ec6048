use std::collections::VecDeque;
use std::f64::consts::PI;

use fastDbscan::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Three dense blobs far apart, plus isolated outliers at the end.
fn blobs(seed: u64) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::new();

    for center in [[0.0, 0.0], [40.0, 0.0], [0.0, 40.0]] {
        for _ in 0..200 {
            let r = 2.0 * rng.random_range(0.0f64..1.0).sqrt();
            let theta = rng.random_range(0.0..2.0 * PI);
            points.push([center[0] + r * theta.cos(), center[1] + r * theta.sin()]);
        }
    }
    for i in 0..10 {
        points.push([1000.0 + 100.0 * i as f64, -500.0]);
    }
    points
}

/// Single-threaded DBSCAN used as the reference partition.
fn sequential_labels(points: &[[f64; 2]], epsilon: f64, min_pts: usize) -> Vec<usize> {
    let eps_sq = epsilon * epsilon;
    let neighbors = |i: usize| -> Vec<usize> {
        (0..points.len())
            .filter(|&j| {
                let dx = points[i][0] - points[j][0];
                let dy = points[i][1] - points[j][1];
                dx * dx + dy * dy <= eps_sq
            })
            .collect()
    };

    let mut labels = vec![0; points.len()];
    let mut visited = vec![false; points.len()];
    let mut next = 0;

    for seed in 0..points.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let seeds = neighbors(seed);
        if seeds.len() < min_pts {
            continue;
        }

        next += 1;
        labels[seed] = next;
        let mut frontier: VecDeque<usize> = seeds.into_iter().collect();
        while let Some(q) = frontier.pop_front() {
            if labels[q] == 0 {
                labels[q] = next;
            }
            if visited[q] {
                continue;
            }
            visited[q] = true;
            let around = neighbors(q);
            if around.len() >= min_pts {
                frontier.extend(around);
            }
        }
    }
    labels
}

fn fit(points: &[[f64; 2]], epsilon: f64, min_pts: usize, workers: usize) -> DbscanResult<f64> {
    Dbscan::new()
        .epsilon(epsilon)
        .min_pts(min_pts)
        .max_concurrency(workers)
        .adapter(Batch)
        .build()
        .unwrap()
        .fit(points)
        .unwrap()
}

#[test]
fn test_one_and_sixteen_workers_agree() {
    init_tracing();
    let points = blobs(7);

    let single = fit(&points, 0.8, 4, 1);
    let pooled = fit(&points, 0.8, 4, 16);

    assert_eq!(single.n_clusters, 3);
    assert_eq!(single.n_noise, 10);
    assert!(single.same_partition(&pooled));
    assert_eq!(single.core, pooled.core);
    assert_eq!(single.diagnostics.clusters_merged, 0);
}

#[test]
fn test_matches_sequential_reference() {
    let points = blobs(11);
    let expected = sequential_labels(&points, 0.8, 4);

    let res = fit(&points, 0.8, 4, 8);

    assert!(same_partition(&res.labels, &expected));
}

#[test]
fn test_repeated_runs_give_the_same_partition() {
    let points = blobs(3);
    let model = Dbscan::new()
        .epsilon(0.8)
        .min_pts(4)
        .adapter(Batch)
        .max_concurrency(16)
        .build()
        .unwrap();

    let first = model.fit(&points).unwrap();
    for _ in 0..5 {
        let again = model.fit(&points).unwrap();
        assert!(first.same_partition(&again));
        assert_eq!(first.n_clusters, again.n_clusters);
    }
}

#[test]
fn test_long_chain_is_one_cluster_under_contention() {
    init_tracing();
    // Every worker seeds its own fragment of the same chain.
    let points: Vec<[f64; 2]> = (0..3000).map(|i| [i as f64 * 0.5, 0.0]).collect();

    for _ in 0..3 {
        let res = fit(&points, 0.6, 2, 16);
        assert_eq!(res.n_clusters, 1);
        assert_eq!(res.n_noise, 0);
        assert!(res.labels.iter().all(|&l| l == 1));
        assert_eq!(
            res.diagnostics.clusters_seeded - res.diagnostics.clusters_merged,
            1
        );
    }
}

#[test]
fn test_every_point_gets_a_label() {
    let points = blobs(19);

    let res = fit(&points, 0.8, 4, 4);

    assert_eq!(res.labels.len(), points.len());
    assert_eq!(
        res.labels.iter().filter(|&&l| l == NOISE).count(),
        res.n_noise
    );
    assert!(res.labels.iter().all(|&l| l <= res.n_clusters));
    assert_eq!(res.points, points);
}

#[test]
fn test_dense_blob_keeps_conflicts_linear() {
    let mut rng = StdRng::seed_from_u64(5);
    let points: Vec<[f64; 2]> = (0..3000)
        .map(|_| [rng.random_range(0.0..0.5), rng.random_range(0.0..0.5)])
        .collect();

    let res = Dbscan::new()
        .epsilon(1.0)
        .min_pts(2)
        .max_neighbors(points.len())
        .max_concurrency(16)
        .adapter(Batch)
        .build()
        .unwrap()
        .fit(&points)
        .unwrap();

    assert_eq!(res.n_clusters, 1);
    assert_eq!(res.n_noise, 0);
    assert!(res.diagnostics.conflicts <= points.len());
    assert!(res.diagnostics.clusters_merged < res.diagnostics.clusters_seeded);
    // Each point's neighborhood is computed exactly once.
    assert_eq!(res.diagnostics.neighbor_queries, points.len());
}

/// 300 well separated groups of 8 points.
fn groups() -> Vec<[f64; 2]> {
    let mut points = Vec::new();
    for g in 0..300 {
        let base = g as f64 * 10.0;
        for k in 0..8 {
            points.push([base + (k % 4) as f64 * 0.25, (k / 4) as f64 * 0.25]);
        }
    }
    points
}

#[test]
fn test_cancellation_from_another_thread() {
    let points = groups();
    let reference = fit(&points, 0.5, 3, 1);
    assert_eq!(reference.n_clusters, 300);

    let token = CancellationToken::new();
    let model = Dbscan::new()
        .epsilon(0.5)
        .min_pts(3)
        .adapter(Batch)
        .max_concurrency(4)
        .cancellation(token.clone())
        .build()
        .unwrap();

    let canceller = std::thread::spawn(move || token.cancel());
    let outcome = model.fit(&points);
    canceller.join().unwrap();

    // A run that beat the signal is complete; otherwise no labels escape.
    match outcome {
        Ok(res) => assert!(res.same_partition(&reference)),
        Err(err) => assert_eq!(err, DbscanError::Cancelled),
    }
}
