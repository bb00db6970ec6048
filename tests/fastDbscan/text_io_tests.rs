use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};

use fastDbscan::prelude::*;

#[test]
fn test_read_cluster_write() {
    let input = "0 0\n1 0\n2 0\n\n50 50\n";

    let points: Vec<[f64; 2]> = read_points(Cursor::new(input)).unwrap();
    let res = cluster(&points, 1.5, 2).unwrap();

    let mut out = Vec::new();
    let written = write_labeled(&mut out, &res).unwrap();

    assert_eq!(written, 4);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "0 0 1\n1 0 1\n2 0 1\n50 50 0\n"
    );
}

#[test]
fn test_file_round_trip() {
    let dir = std::env::temp_dir().join(format!("fastdbscan-text-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input_path = dir.join("points.txt");
    let output_path = dir.join("clusters.txt");

    std::fs::write(&input_path, "0.5 0.5\n0.75 0.5\n10 10\n10.25 10\n-40 3\n").unwrap();

    let points: Vec<[f64; 2]> =
        read_points(BufReader::new(File::open(&input_path).unwrap())).unwrap();
    let res = Dbscan::new()
        .epsilon(0.5)
        .min_pts(2)
        .adapter(Batch)
        .build()
        .unwrap()
        .fit(&points)
        .unwrap();
    write_labeled(BufWriter::new(File::create(&output_path).unwrap()), &res).unwrap();

    let written = std::fs::read_to_string(&output_path).unwrap();
    let labels: Vec<usize> = written
        .lines()
        .map(|line| line.split_whitespace().nth(2).unwrap().parse().unwrap())
        .collect();
    assert_eq!(labels, vec![1, 1, 2, 2, 0]);

    // Labeled output parses back to the same coordinates.
    let reparsed: Vec<[f64; 2]> = written
        .lines()
        .map(|line| {
            let fields: Vec<f64> = line
                .split_whitespace()
                .take(2)
                .map(|f| f.parse().unwrap())
                .collect();
            [fields[0], fields[1]]
        })
        .collect();
    assert_eq!(reparsed, points);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_malformed_input_names_the_line() {
    let err = read_points::<f64, _>(Cursor::new("1 2\n3 4\nfive 6\n")).unwrap_err();

    match err {
        TextError::Parse { line, .. } => assert_eq!(line, 3),
        other => panic!("unexpected error: {other}"),
    }
}
