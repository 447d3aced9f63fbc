//! Benchmarks for per-frame lane detection.
//!
//! Run with: cargo bench -p lane-detect

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use lane_detect::{DetectorConfig, EdgeExtractor, LaneDetector};
use road_frame::VideoFrame;

/// Two painted markings converging above the horizon, scaled to `width` x `height`
fn road_frame(width: u32, height: u32) -> VideoFrame {
    let (w, h) = (width as f32, height as f32);
    let mut img = RgbImage::from_pixel(width, height, Rgb([40, 40, 40]));
    let vanish = (w * 0.5, h * 0.33);
    for base_x in [w * 0.05, w * 0.95] {
        for dx in -3..=3 {
            let dx = dx as f32;
            draw_line_segment_mut(
                &mut img,
                (base_x + dx, h - 1.0),
                (vanish.0 + dx, vanish.1),
                Rgb([235, 235, 235]),
            );
        }
    }
    VideoFrame::from(img)
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");

    for (width, height) in [(320u32, 240u32), (640, 480), (1280, 720)] {
        let frame = road_frame(width, height);
        let horizon = height / 2;
        group.throughput(Throughput::Elements(u64::from(width * height)));

        for (mode, config) in [
            ("bounded", DetectorConfig::new(horizon)),
            ("full", DetectorConfig::full_line(horizon)),
        ] {
            let detector = LaneDetector::new(config).expect("valid config");
            group.bench_with_input(
                BenchmarkId::new(mode, format!("{width}x{height}")),
                &frame,
                |b, frame| b.iter(|| detector.detect(black_box(frame))),
            );
        }
    }

    group.finish();
}

fn bench_edges(c: &mut Criterion) {
    let frame = road_frame(640, 480);
    let roi = frame.rows_from(240);
    let extractor = EdgeExtractor::default();

    c.bench_function("edges_640x240", |b| b.iter(|| extractor.extract(black_box(&roi))));
}

criterion_group!(benches, bench_detect, bench_edges);
criterion_main!(benches);
