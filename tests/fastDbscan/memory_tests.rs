use fastDbscan::prelude::*;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator::new();

#[test]
fn test_dense_blob_allocations_stay_linear() {
    // 3000 points, all mutually within epsilon.
    let points: Vec<[f64; 2]> = (0..3000)
        .map(|i| [(i % 60) as f64 * 0.01, (i / 60) as f64 * 0.01])
        .collect();

    for workers in [1, 16] {
        let profiled = Dbscan::new()
            .epsilon(1.0)
            .min_pts(2)
            .max_neighbors(points.len())
            .max_concurrency(workers)
            .adapter(Profiled)
            .allocator(&GLOBAL)
            .build()
            .unwrap()
            .fit(&points)
            .unwrap();

        assert_eq!(profiled.result.n_clusters, 1);
        let memory = profiled.profile.memory.unwrap();
        // Input is 48 KB; a frontier holding every neighborhood would need hundreds of MB.
        assert!(
            memory.allocated < 16 * 1024 * 1024,
            "workers={} allocated={} bytes",
            workers,
            memory.allocated
        );
    }
}
