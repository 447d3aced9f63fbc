//! Multi-frame detection pipeline
//!
//! Frames are independent, so several detections run at once on the blocking
//! pool. Results come back in input order.

use std::collections::VecDeque;
use std::sync::Arc;

use road_frame::VideoFrame;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{LaneBounds, LaneDetector, LaneError};

/// Detection outcome for one frame
#[derive(Debug)]
pub struct FrameDetection {
    pub sequence: u32,
    pub timestamp_ns: u64,
    pub result: Result<LaneBounds, LaneError>,
}

struct Pending {
    sequence: u32,
    timestamp_ns: u64,
    handle: JoinHandle<Result<LaneBounds, LaneError>>,
}

impl Pending {
    async fn finish(self) -> FrameDetection {
        let result = match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(LaneError::Worker(e.to_string())),
        };
        if let Err(e) = &result {
            warn!("Frame {} failed: {}", self.sequence, e);
        }
        FrameDetection {
            sequence: self.sequence,
            timestamp_ns: self.timestamp_ns,
            result,
        }
    }
}

/// Runs a shared detector over many frames with bounded concurrency
pub struct FramePipeline {
    detector: Arc<LaneDetector>,
    max_in_flight: usize,
}

impl FramePipeline {
    /// Create a pipeline running at most `max_in_flight` detections at once
    pub fn new(detector: LaneDetector, max_in_flight: usize) -> Self {
        let max_in_flight = max_in_flight.max(1);
        info!("Creating frame pipeline: max_in_flight={}", max_in_flight);
        Self {
            detector: Arc::new(detector),
            max_in_flight,
        }
    }

    pub fn detector(&self) -> &LaneDetector {
        &self.detector
    }

    fn spawn(&self, frame: VideoFrame) -> Pending {
        let detector = Arc::clone(&self.detector);
        Pending {
            sequence: frame.sequence,
            timestamp_ns: frame.timestamp_ns,
            handle: tokio::task::spawn_blocking(move || detector.detect(&frame)),
        }
    }

    /// Detect every frame in a batch; output order matches input order
    pub async fn detect_batch(&self, frames: Vec<VideoFrame>) -> Vec<FrameDetection> {
        let mut results = Vec::with_capacity(frames.len());
        let mut in_flight: VecDeque<Pending> = VecDeque::with_capacity(self.max_in_flight);

        for frame in frames {
            if in_flight.len() >= self.max_in_flight {
                if let Some(pending) = in_flight.pop_front() {
                    results.push(pending.finish().await);
                }
            }
            in_flight.push_back(self.spawn(frame));
        }

        while let Some(pending) = in_flight.pop_front() {
            results.push(pending.finish().await);
        }

        debug!("Batch of {} frames complete", results.len());
        results
    }

    /// Consume frames from a channel and publish detections in arrival order.
    ///
    /// Returns when the frame channel closes and all work has drained, or when
    /// the result receiver is dropped.
    pub async fn run(&self, mut frames: mpsc::Receiver<VideoFrame>, results: mpsc::Sender<FrameDetection>) {
        info!("Starting frame pipeline");
        let mut in_flight: VecDeque<Pending> = VecDeque::with_capacity(self.max_in_flight);
        let mut processed = 0usize;

        while let Some(frame) = frames.recv().await {
            if in_flight.len() >= self.max_in_flight {
                if let Some(pending) = in_flight.pop_front() {
                    if results.send(pending.finish().await).await.is_err() {
                        debug!("Result channel closed");
                        return;
                    }
                    processed += 1;
                }
            }
            in_flight.push_back(self.spawn(frame));
        }

        while let Some(pending) = in_flight.pop_front() {
            if results.send(pending.finish().await).await.is_err() {
                debug!("Result channel closed");
                return;
            }
            processed += 1;
        }

        info!("Frame pipeline stopped after {} frames", processed);
    }
}
