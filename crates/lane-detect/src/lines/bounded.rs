//! Progressive probabilistic Hough transform

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::{LineExtractor, ANGLE_BINS};
use crate::{DetectorConfig, EdgeMap, LineSegment};

/// Fixed-point fraction bits used while walking along a line
const SHIFT: u32 = 16;
const ONE: i64 = 1 << SHIFT;
const HALF: i64 = 1 << (SHIFT - 1);

/// Bounded-segment line extraction.
///
/// Edge points are drawn in random order (seeded, so runs are repeatable).
/// Each drawn point votes in the accumulator; once a (rho, theta) bin reaches
/// `vote_threshold` the line is walked from that point in both directions,
/// bridging gaps of up to `max_gap` pixels. Walked pixels leave the edge pool,
/// and when the resulting segment is long enough their votes are withdrawn and
/// the segment is reported.
#[derive(Debug, Clone)]
pub struct BoundedSegmentExtractor {
    vote_threshold: u32,
    min_length: u32,
    max_gap: u32,
    seed: u64,
    trig: Vec<(f64, f64)>,
}

impl BoundedSegmentExtractor {
    pub fn new(vote_threshold: u32, min_length: u32, max_gap: u32, seed: u64) -> Self {
        let trig = (0..ANGLE_BINS)
            .map(|n| {
                let theta = (n as f64).to_radians();
                (theta.cos(), theta.sin())
            })
            .collect();

        Self {
            vote_threshold,
            min_length,
            max_gap,
            seed,
            trig,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(
            config.vote_threshold,
            config.min_segment_length,
            config.max_segment_gap,
            config.sampling_seed,
        )
    }
}

/// Accumulator plus the pool of edge pixels not yet claimed by a line
struct Workspace {
    width: i64,
    height: i64,
    num_rho: usize,
    rho_offset: i64,
    votes: Vec<i32>,
    pool: Vec<bool>,
}

impl Workspace {
    fn new(edges: &EdgeMap) -> Self {
        let width = i64::from(edges.width());
        let height = i64::from(edges.height());
        let num_rho = ((width + height) * 2 + 1) as usize;
        let mut pool = vec![false; (width * height) as usize];
        for (x, y) in edges.edge_points() {
            pool[(i64::from(y) * width + i64::from(x)) as usize] = true;
        }

        Self {
            width,
            height,
            num_rho,
            rho_offset: (num_rho as i64 - 1) / 2,
            votes: vec![0; ANGLE_BINS * num_rho],
            pool,
        }
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn in_pool(&self, x: i64, y: i64) -> bool {
        self.pool[(y * self.width + x) as usize]
    }

    fn take(&mut self, x: i64, y: i64) {
        self.pool[(y * self.width + x) as usize] = false;
    }

    fn bin(&self, trig: &[(f64, f64)], n: usize, x: i64, y: i64) -> usize {
        let (cos, sin) = trig[n];
        let rho = (x as f64 * cos + y as f64 * sin).round() as i64;
        n * self.num_rho + (rho + self.rho_offset) as usize
    }

    /// Add the point's votes; returns the best (votes, angle bin) among its bins
    fn vote(&mut self, trig: &[(f64, f64)], x: i64, y: i64) -> (i32, usize) {
        let mut best = (0, 0);
        for n in 0..ANGLE_BINS {
            let idx = self.bin(trig, n, x, y);
            self.votes[idx] += 1;
            if self.votes[idx] > best.0 {
                best = (self.votes[idx], n);
            }
        }
        best
    }

    fn unvote(&mut self, trig: &[(f64, f64)], x: i64, y: i64) {
        for n in 0..ANGLE_BINS {
            let idx = self.bin(trig, n, x, y);
            self.votes[idx] -= 1;
        }
    }
}

/// Fixed-point walk along a line direction, one pixel per step on the major axis
#[derive(Debug, Clone, Copy)]
struct Walker {
    x_major: bool,
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
}

impl Walker {
    fn new(x: i64, y: i64, cos: f64, sin: f64) -> Self {
        // Direction along the line is the normal rotated by 90 degrees
        let (a, b) = (-sin, cos);
        if a.abs() > b.abs() {
            Self {
                x_major: true,
                x,
                y: (y << SHIFT) + HALF,
                dx: if a > 0.0 { 1 } else { -1 },
                dy: (b * ONE as f64 / a.abs()).round() as i64,
            }
        } else {
            Self {
                x_major: false,
                x: (x << SHIFT) + HALF,
                y,
                dx: (a * ONE as f64 / b.abs()).round() as i64,
                dy: if b > 0.0 { 1 } else { -1 },
            }
        }
    }

    fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
            ..self
        }
    }

    fn pixel(&self) -> (i64, i64) {
        if self.x_major {
            (self.x, self.y >> SHIFT)
        } else {
            (self.x >> SHIFT, self.y)
        }
    }

    fn step(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
    }
}

impl LineExtractor for BoundedSegmentExtractor {
    fn extract_candidates(&self, edges: &EdgeMap) -> Vec<LineSegment> {
        if edges.width() == 0 || edges.height() == 0 {
            return Vec::new();
        }

        let mut ws = Workspace::new(edges);
        let mut points: Vec<(i64, i64)> = edges
            .edge_points()
            .map(|(x, y)| (i64::from(x), i64::from(y)))
            .collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let threshold = i32::try_from(self.vote_threshold).unwrap_or(i32::MAX);
        let max_gap = i64::from(self.max_gap);
        let min_length = i64::from(self.min_length);
        let mut segments = Vec::new();

        while !points.is_empty() {
            let (x, y) = points.swap_remove(rng.gen_range(0..points.len()));

            // Already claimed by an earlier line
            if !ws.in_pool(x, y) {
                continue;
            }

            let (max_votes, max_n) = ws.vote(&self.trig, x, y);
            if max_votes < threshold {
                continue;
            }

            let (cos, sin) = self.trig[max_n];
            let start = Walker::new(x, y, cos, sin);
            let walkers = [start, start.reversed()];

            let mut ends = [(x, y); 2];
            for (end, walker) in ends.iter_mut().zip(walkers) {
                let mut walker = walker;
                let mut gap = 0;
                loop {
                    let (px, py) = walker.pixel();
                    if !ws.contains(px, py) {
                        break;
                    }
                    if ws.in_pool(px, py) {
                        gap = 0;
                        *end = (px, py);
                    } else {
                        gap += 1;
                        if gap > max_gap {
                            break;
                        }
                    }
                    walker.step();
                }
            }

            let good = (ends[1].0 - ends[0].0).abs() >= min_length
                || (ends[1].1 - ends[0].1).abs() >= min_length;

            for (end, walker) in ends.iter().zip(walkers) {
                let mut walker = walker;
                loop {
                    let (px, py) = walker.pixel();
                    if !ws.contains(px, py) {
                        break;
                    }
                    if ws.in_pool(px, py) {
                        if good {
                            ws.unvote(&self.trig, px, py);
                        }
                        ws.take(px, py);
                    }
                    if (px, py) == *end {
                        break;
                    }
                    walker.step();
                }
            }

            if good {
                let [(x1, y1), (x2, y2)] = ends;
                segments.push(LineSegment::new(x1 as f64, y1 as f64, x2 as f64, y2 as f64));
            }
        }

        trace!("{} bounded segments", segments.len());
        segments
    }

    fn name(&self) -> &'static str {
        "bounded-segment"
    }
}
