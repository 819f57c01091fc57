use std::{
    env, fs,
    path::{Path, PathBuf},
};

use lane_pair_core::{GrayImage, GrayImageView, Line};
use lane_pair_detector::{
    EdgeBounds, LaneDetector, LaneFrame, LaneParams, Segment, SegmentDetectorHints,
};
use serde::{Deserialize, Serialize};

/// Configuration for the lane example, loaded from JSON.
#[derive(Debug, Deserialize)]
struct ExampleConfig {
    /// Grayscale frame to validate brightness against. Without it a flat
    /// mid-gray frame of `width` x `height` is used.
    #[serde(default)]
    image_path: Option<String>,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    /// Detector output rows `[x1, y1, x2, y2]` in image `(col, row)` order.
    segments: Vec<[f64; 4]>,
    #[serde(default)]
    params: LaneParams,
    /// Where to write the report JSON.
    #[serde(default)]
    output_path: Option<String>,
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

#[derive(Debug, Serialize)]
struct LaneReport {
    config_path: String,
    num_segments: usize,
    hints: SegmentDetectorHints,
    edge_bounds: Option<EdgeBounds>,
    lanes: LaneFrame,
    /// Bisector endpoints in drawing `(col, row)` order, per slot.
    bisector_overlays: Vec<Option<[[f64; 2]; 2]>>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config_path = parse_config_path();
    let cfg: ExampleConfig = {
        let raw = fs::read_to_string(&config_path)?;
        serde_json::from_str(&raw)?
    };

    let gray = match &cfg.image_path {
        Some(path) => load_gray(Path::new(path))?,
        None => GrayImage::filled(cfg.width as usize, cfg.height as usize, 128),
    };
    let view = GrayImageView::new(gray.width, gray.height, &gray.data)?;

    let frame = lane_pair_core::FrameSize::new(gray.width as u32, gray.height as u32)?;
    let mut detector = LaneDetector::new(frame, cfg.params)?;
    let segments: Vec<Segment> = cfg
        .segments
        .iter()
        .map(|&[x1, y1, x2, y2]| Segment::from_detector(x1, y1, x2, y2))
        .collect();

    let lanes = detector.process_frame(&segments, &view)?.clone();
    for index in 0..2 {
        if lanes.lanes_found(index) {
            println!(
                "pair {index}: deviation {:?} px",
                lanes.deviation_at(index, frame.height as f64 * 0.5)
            );
        }
    }

    let report = LaneReport {
        config_path: config_path.to_string_lossy().into_owned(),
        num_segments: segments.len(),
        hints: detector.segment_hints(),
        edge_bounds: detector.edge_bounds(&view, None),
        bisector_overlays: lanes.bisectors().iter().map(|b| b.as_ref().map(overlay)).collect(),
        lanes,
    };

    let output_path = cfg
        .output_path
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("testdata/lane_report.json"));

    let json = serde_json::to_string_pretty(&report)?;
    fs::write(&output_path, json)?;
    println!("wrote lane report to {}", output_path.display());

    Ok(())
}

fn parse_config_path() -> PathBuf {
    env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("testdata/lane_config.json"))
}

fn load_gray(path: &Path) -> Result<GrayImage, Box<dyn std::error::Error>> {
    let img = image::ImageReader::open(path)?.decode()?.to_luma8();
    Ok(GrayImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.into_raw(),
    })
}

fn overlay(line: &Line) -> [[f64; 2]; 2] {
    let p1 = line.edge1.axis_swapped();
    let p2 = line.edge2.axis_swapped();
    [[p1.x, p1.y], [p2.x, p2.y]]
}
