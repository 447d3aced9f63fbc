//! Edge extraction: luminance, fixed-size smoothing, median-adaptive Canny

use image::GrayImage;
use imageproc::edges::canny;
use imageproc::filter::separable_filter_equal;
use road_frame::VideoFrame;
use tracing::debug;

/// Intensity value written for edge pixels
pub const EDGE: u8 = 255;

/// Smallest usable hysteresis threshold; a zero gradient never seeds or extends an edge
const MIN_EDGE_THRESHOLD: f32 = 1.0;

/// Binary edge raster in ROI coordinates
#[derive(Debug, Clone)]
pub struct EdgeMap {
    image: GrayImage,
}

impl EdgeMap {
    /// Wrap a raster where any non-zero pixel is an edge
    pub fn from_image(image: GrayImage) -> Self {
        Self { image }
    }

    /// Edge map with no edges
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height() && self.image.get_pixel(x, y)[0] != 0
    }

    /// Edge pixel coordinates in raster order
    pub fn edge_points(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.image
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] != 0)
            .map(|(x, y, _)| (x, y))
    }

    pub fn edge_count(&self) -> usize {
        self.image.pixels().filter(|p| p[0] != 0).count()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }
}

/// Hysteresis thresholds derived from the blurred image's median
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannyThresholds {
    pub lower: f32,
    pub upper: f32,
}

impl CannyThresholds {
    /// `lower = 0.66 v`, `upper = 1.33 v`, clamped to `[0, 255]` and truncated
    pub fn from_median(v: f64) -> Self {
        let lower = (0.66 * v).max(0.0).trunc() as f32;
        let upper = (1.33 * v).min(255.0).trunc() as f32;
        Self {
            lower: lower.max(MIN_EDGE_THRESHOLD),
            upper: upper.max(MIN_EDGE_THRESHOLD),
        }
    }
}

/// Median intensity; the mean of the two middle values for an even pixel count
pub fn median_intensity(image: &GrayImage) -> f64 {
    let mut histogram = [0usize; 256];
    for p in image.pixels() {
        histogram[p[0] as usize] += 1;
    }

    let n = image.width() as usize * image.height() as usize;
    if n == 0 {
        return 0.0;
    }

    let nth = |k: usize| -> u8 {
        let mut seen = 0;
        for (value, &count) in histogram.iter().enumerate() {
            seen += count;
            if seen > k {
                return value as u8;
            }
        }
        u8::MAX
    };

    if n % 2 == 1 {
        f64::from(nth(n / 2))
    } else {
        (f64::from(nth(n / 2 - 1)) + f64::from(nth(n / 2))) / 2.0
    }
}

/// 1-D Gaussian taps for a square smoothing kernel of the given odd size.
///
/// Sizes up to 7 use the fixed binomial tables; larger sizes use
/// `sigma = 0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    match size {
        1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
        _ => {
            let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
            let center = (size / 2) as f64;
            let taps: Vec<f64> = (0..size)
                .map(|i| {
                    let d = i as f64 - center;
                    (-(d * d) / (2.0 * sigma * sigma)).exp()
                })
                .collect();
            let sum: f64 = taps.iter().sum();
            taps.into_iter().map(|t| (t / sum) as f32).collect()
        }
    }
}

/// Converts ROI frames to edge maps
#[derive(Debug, Clone)]
pub struct EdgeExtractor {
    kernel: Vec<f32>,
}

impl EdgeExtractor {
    pub fn new(kernel_size: u32) -> Self {
        Self {
            kernel: gaussian_kernel(kernel_size),
        }
    }

    /// Separable smoothing with the configured kernel
    pub fn blur(&self, gray: &GrayImage) -> GrayImage {
        separable_filter_equal(gray, &self.kernel)
    }

    /// Run the full edge stage on an ROI
    pub fn extract(&self, roi: &VideoFrame) -> EdgeMap {
        if roi.width == 0 || roi.height == 0 {
            return EdgeMap::empty(roi.width, roi.height);
        }

        let gray = roi.to_grayscale();
        let blurred = self.blur(&gray);
        let median = median_intensity(&blurred);
        let thresholds = CannyThresholds::from_median(median);

        let edges = canny(&blurred, thresholds.lower, thresholds.upper);
        let map = EdgeMap::from_image(edges);

        debug!(
            median,
            lower = thresholds.lower,
            upper = thresholds.upper,
            edge_pixels = map.edge_count(),
            "edge stage on {}x{} roi",
            roi.width,
            roi.height
        );

        map
    }
}

impl Default for EdgeExtractor {
    fn default() -> Self {
        Self::new(7)
    }
}

/// Edge map with the given pixels set
#[cfg(test)]
pub(crate) fn edge_map_from_points(width: u32, height: u32, points: &[(u32, u32)]) -> EdgeMap {
    let mut raster = GrayImage::new(width, height);
    for &(x, y) in points {
        if x < width && y < height {
            raster.put_pixel(x, y, image::Luma([EDGE]));
        }
    }
    EdgeMap::from_image(raster)
}
