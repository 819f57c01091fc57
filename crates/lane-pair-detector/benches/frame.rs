//! Per-frame detector timing on a synthetic road frame.
//!
//! Run with: `cargo bench -p lane-pair-detector`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lane_pair_core::{GrayImage, Point};
use lane_pair_detector::{LaneDetector, Segment};

const W: usize = 640;
const H: usize = 480;

/// Two painted markings converging above the frame plus `clutter` short
/// diagonal segments that pass the length filter but never qualify.
fn scene(clutter: usize) -> (GrayImage, Vec<Segment>) {
    let lanes = [(-0.3077, 227.69, 1.0), (0.3077, 412.31, -1.0)];
    let mut img = GrayImage::filled(W, H, 50);
    for row in 0..H {
        for col in 0..W {
            let bright = lanes.iter().any(|&(a, b, dir)| {
                let off = (col as f64 - (a * row as f64 + b)) * dir;
                off > 0.0 && off < 30.0
            });
            if bright {
                if let Some(px) = img.pixel_mut(row, col) {
                    *px = 200;
                }
            }
        }
    }

    let mut segments: Vec<Segment> = (0..clutter)
        .map(|k| {
            let row = 20.0 + (k * 37 % 400) as f64;
            let col = 10.0 + (k * 53 % 600) as f64;
            Segment::new(Point::new(row, col), Point::new(row + 30.0, col + 5.0))
        })
        .collect();
    for (a, b, _) in lanes {
        segments.push(Segment::new(
            Point::new(100.0, a * 100.0 + b),
            Point::new(460.0, a * 460.0 + b),
        ));
    }
    (img, segments)
}

fn bench_detect(c: &mut Criterion) {
    let detector = LaneDetector::with_size(W as u32, H as u32).expect("detector");
    let mut group = c.benchmark_group("detect");
    for clutter in [0usize, 20, 60] {
        let (img, segments) = scene(clutter);
        group.bench_with_input(BenchmarkId::from_parameter(clutter), &segments, |b, segs| {
            b.iter(|| detector.detect(black_box(segs), black_box(&img)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_detect);
criterion_main!(benches);
