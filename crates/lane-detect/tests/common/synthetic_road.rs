//! Synthetic road frames drawn with imageproc

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use road_frame::VideoFrame;

pub const WIDTH: u32 = 400;
pub const HEIGHT: u32 = 300;
pub const HORIZON: u32 = 150;

const ASPHALT: Rgb<u8> = Rgb([40, 40, 40]);
const PAINT: Rgb<u8> = Rgb([235, 235, 235]);

/// Uniform frame of the given color
pub fn uniform(width: u32, height: u32, level: u8) -> VideoFrame {
    VideoFrame::from(RgbImage::from_pixel(width, height, Rgb([level; 3])))
}

/// Painted stripe `half_width` pixels either side of the centerline, horizontally
pub fn draw_stripe(img: &mut RgbImage, from: (f32, f32), to: (f32, f32), half_width: i32) {
    for dx in -half_width..=half_width {
        let dx = dx as f32;
        draw_line_segment_mut(img, (from.0 + dx, from.1), (to.0 + dx, to.1), PAINT);
    }
}

/// Two lane markings converging on a vanishing point above the horizon
pub fn two_lane_road() -> VideoFrame {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, ASPHALT);
    draw_stripe(&mut img, (20.0, 299.0), (200.0, 100.0), 3);
    draw_stripe(&mut img, (380.0, 299.0), (200.0, 100.0), 3);
    VideoFrame::from(img)
}

/// Lane marking centerlines of `two_lane_road`: x at row `y`
pub fn left_marking_x(y: f64) -> f64 {
    20.0 + (y - 299.0) * (180.0 / -199.0)
}

pub fn right_marking_x(y: f64) -> f64 {
    380.0 + (y - 299.0) * (-180.0 / -199.0)
}

/// Scattered dashes, each too short to form a candidate
pub fn short_dashes() -> VideoFrame {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, ASPHALT);
    let dashes = [
        ((40.0, 200.0), (55.0, 225.0)),
        ((120.0, 260.0), (140.0, 240.0)),
        ((230.0, 170.0), (245.0, 195.0)),
        ((300.0, 280.0), (325.0, 265.0)),
        ((350.0, 180.0), (352.0, 208.0)),
    ];
    for (from, to) in dashes {
        draw_stripe(&mut img, from, to, 1);
    }
    VideoFrame::from(img)
}

/// Bright road surface below row `edge_row`, dark above
pub fn horizontal_edge(edge_row: u32) -> VideoFrame {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, ASPHALT);
    for y in edge_row..HEIGHT {
        for x in 0..WIDTH {
            img.put_pixel(x, y, PAINT);
        }
    }
    VideoFrame::from(img)
}
