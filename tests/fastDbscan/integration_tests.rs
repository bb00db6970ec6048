use approx::assert_relative_eq;
use fastDbscan::internals::primitives::label::{AtomicLabel, Claim, ClusterId, Label};
use fastDbscan::prelude::*;
use ndarray::Array2;

fn batch(epsilon: f64, min_pts: usize) -> BatchDbscan<f64> {
    Dbscan::new()
        .epsilon(epsilon)
        .min_pts(min_pts)
        .adapter(Batch)
        .max_concurrency(4)
        .build()
        .unwrap()
}

#[test]
fn test_chained_reachability() {
    let points = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];

    let res = batch(1.5, 2).fit(&points).unwrap();

    assert_eq!(res.labels, vec![1, 1, 1]);
    assert_eq!(res.n_clusters, 1);
    assert_eq!(res.n_noise, 0);
    assert!(res.core.iter().all(|&c| c));
}

#[test]
fn test_disjoint_groups() {
    let offsets = [[0.0, 0.0], [0.3, 0.0], [0.0, 0.3], [0.3, 0.3], [0.15, 0.15]];
    let mut points = Vec::new();
    for [dx, dy] in offsets {
        points.push([dx, dy]);
    }
    for [dx, dy] in offsets {
        points.push([100.0 + dx, 100.0 + dy]);
    }

    let res = batch(1.0, 2).fit(&points).unwrap();

    assert_eq!(res.n_clusters, 2);
    assert_eq!(res.n_noise, 0);
    assert!(res.labels[..5].iter().all(|&l| l == 1));
    assert!(res.labels[5..].iter().all(|&l| l == 2));

    let clusters = res.clusters();
    assert_eq!(clusters, vec![vec![0, 1, 2, 3, 4], vec![5, 6, 7, 8, 9]]);
}

#[test]
fn test_outlier_is_noise() {
    let points = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [50.0, 50.0]];

    let res = batch(1.5, 2).fit(&points).unwrap();

    assert_eq!(res.labels, vec![1, 1, 1, NOISE]);
    assert_eq!(res.noise_indices(), vec![3]);
    assert!(!res.core[3]);
}

#[test]
fn test_degenerate_epsilon() {
    let points: Vec<[f64; 2]> = (0..12).map(|i| [i as f64, (i * i) as f64]).collect();

    // Every distinct point is its own cluster.
    let res = batch(0.0, 1).fit(&points).unwrap();
    assert_eq!(res.n_clusters, 12);
    assert_eq!(res.labels, (1..=12).collect::<Vec<_>>());

    // Nothing has a second neighbor.
    let res = batch(0.0, 2).fit(&points).unwrap();
    assert_eq!(res.n_clusters, 0);
    assert_eq!(res.n_noise, 12);
    assert!(res.labels.iter().all(|&l| l == NOISE));
}

#[test]
fn test_duplicates_at_zero_epsilon_share_a_cluster() {
    let points = [[1.0, 1.0], [1.0, 1.0], [2.0, 2.0]];

    let res = batch(0.0, 2).fit(&points).unwrap();

    assert_eq!(res.labels, vec![1, 1, NOISE]);
}

#[test]
fn test_core_point_boundary() {
    // Each point sees exactly min_pts - 1 neighbors.
    let pair = [[0.0, 0.0], [1.0, 0.0]];
    let res = batch(1.5, 3).fit(&pair).unwrap();
    assert_eq!(res.n_clusters, 0);
    assert_eq!(res.diagnostics.clusters_seeded, 0);

    // The ends never seed but are absorbed as border points.
    let triple = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
    let res = batch(1.5, 3).fit(&triple).unwrap();
    assert_eq!(res.labels, vec![1, 1, 1]);
    assert_eq!(res.core, vec![false, true, false]);
    assert_eq!(res.core_sample_indices(), vec![1]);
    assert_eq!(res.diagnostics.clusters_seeded, 1);
}

#[test]
fn test_point_at_origin_is_a_real_point() {
    let points = [[0.0, 0.0], [0.5, 0.0], [10.0, 0.0]];

    let res = batch(1.0, 2).fit(&points).unwrap();

    assert_eq!(res.labels, vec![1, 1, NOISE]);
    assert_relative_eq!(res.points[0][0], 0.0);
}

#[test]
fn test_label_transitions_are_monotone() {
    let a = ClusterId::new(1).unwrap();
    let b = ClusterId::new(2).unwrap();
    let label = AtomicLabel::new();

    assert_eq!(label.load(), Label::Unlabeled);
    assert!(label.mark_noise());
    assert_eq!(label.load(), Label::Noise);

    // Noise upgrades to a cluster.
    assert_eq!(label.try_claim(a), Claim::Won);
    assert_eq!(label.load(), Label::Cluster(a));

    // A cluster label is final.
    assert!(!label.mark_noise());
    assert_eq!(label.try_claim(b), Claim::Lost(a));
    assert_eq!(label.try_claim(a), Claim::AlreadyOwned);
    assert_eq!(label.load(), Label::Cluster(a));
}

#[test]
fn test_empty_input() {
    let points: Vec<[f64; 2]> = Vec::new();

    let res = batch(1.0, 2).fit(&points).unwrap();

    assert!(res.is_empty());
    assert_eq!(res.n_clusters, 0);
    assert_eq!(res.n_noise, 0);
}

#[test]
fn test_capacity_exceeded() {
    let points: Vec<[f64; 2]> = (0..30).map(|i| [i as f64 * 0.01, 0.0]).collect();

    let err = Dbscan::new()
        .epsilon(1.0)
        .min_pts(2)
        .max_neighbors(8)
        .adapter(Batch)
        .build()
        .unwrap()
        .fit(&points)
        .unwrap_err();

    assert!(matches!(
        err,
        DbscanError::CapacityExceeded { capacity: 8, .. }
    ));
    assert!(!err.is_config_error());
}

#[test]
fn test_invalid_configuration() {
    let err = Dbscan::new()
        .epsilon(-0.5)
        .adapter(Batch)
        .build()
        .unwrap_err();
    assert!(matches!(err, DbscanError::InvalidEpsilon(_)));
    assert!(err.is_config_error());

    let err = Dbscan::<f64>::new()
        .min_pts(0)
        .adapter(Batch)
        .build()
        .unwrap_err();
    assert_eq!(err, DbscanError::InvalidMinPts(0));

    let err = Dbscan::<f64>::new()
        .max_concurrency(0)
        .adapter(Batch)
        .build()
        .unwrap_err();
    assert_eq!(err, DbscanError::InvalidConcurrency(0));

    let err = Dbscan::<f64>::new()
        .max_neighbors(0)
        .adapter(Batch)
        .build()
        .unwrap_err();
    assert_eq!(err, DbscanError::InvalidNeighborCapacity(0));
}

#[test]
fn test_non_finite_coordinate_is_rejected() {
    let points = vec![[0.0, 0.0], [f64::NAN, 1.0]];

    let err = batch(1.0, 2).fit(&points).unwrap_err();

    assert_eq!(err, DbscanError::NonFiniteCoordinate { index: 1 });
}

#[test]
fn test_cancellation_before_fit() {
    let token = CancellationToken::new();
    let model = Dbscan::new()
        .epsilon(1.0)
        .adapter(Batch)
        .cancellation(token.clone())
        .build()
        .unwrap();
    let points: Vec<[f64; 2]> = (0..50).map(|i| [i as f64, 0.0]).collect();

    token.cancel();
    let err = model.fit(&points).unwrap_err();

    assert_eq!(err, DbscanError::Cancelled);
}

#[test]
fn test_ndarray_integration() {
    let points = Array2::from_shape_vec(
        (4, 2),
        vec![0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 50.0, 50.0],
    )
    .unwrap();

    let res = batch(1.5, 2).fit(&points).unwrap();
    assert_eq!(res.labels, vec![1, 1, 1, NOISE]);

    let wide = Array2::<f64>::zeros((3, 3));
    let err = batch(1.5, 2).fit(&wide).unwrap_err();
    assert!(matches!(err, DbscanError::InvalidInput(_)));
}

#[test]
fn test_columns_and_tuples() {
    let x = [0.0, 1.0, 2.0, 50.0];
    let y = [0.0, 0.0, 0.0, 50.0];
    let model = batch(1.5, 2);

    let from_columns = model.fit_columns(&x, &y).unwrap();
    let tuples: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    let from_tuples = model.fit(&tuples).unwrap();

    assert_eq!(from_columns.labels, from_tuples.labels);
    assert!(model.fit_columns(&x, &y[..2]).is_err());
}

#[test]
fn test_convenience_entry_point() {
    let points = vec![[0.0f32, 0.0], [0.5, 0.5], [9.0, 9.0], [9.5, 9.0]];

    let res = cluster(&points, 1.0f32, 2).unwrap();

    assert_eq!(res.labels, vec![1, 1, 2, 2]);
    assert_eq!(res.triples().count(), 4);
}

#[test]
fn test_profiled_adapter() {
    let points: Vec<[f64; 2]> = (0..20).map(|i| [i as f64 * 0.5, 0.0]).collect();

    let profiled = Dbscan::new()
        .epsilon(0.6)
        .min_pts(2)
        .max_concurrency(2)
        .adapter(Profiled)
        .build()
        .unwrap()
        .fit(&points)
        .unwrap();

    assert_eq!(profiled.result.n_clusters, 1);
    assert!(profiled.profile.memory.is_none());
    assert_eq!(profiled.result.diagnostics.workers, 2);
}
