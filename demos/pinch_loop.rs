//! Simulated camera loop: a synthetic hand pinches and releases while the
//! tracker draws the skeleton and distance overlay.
//!
//! Real deployments implement [`HandDetector`] on top of an actual landmark
//! model; this demo scripts the detector so it runs anywhere, and saves a few
//! annotated frames as PNGs for inspection.

use handspan::detection::{DetectionResult, DetectorConfig, Hand, HandDetector};
use handspan::frame::{Color, Frame};
use handspan::landmark::{Landmark, LandmarkIdx, NUM_LANDMARKS};
use handspan::timer::FpsCounter;
use handspan::tracker::{AnnotateOptions, HandTracker};

const FRAMES: u32 = 120;
const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;

/// Rough anatomical layout of a right hand, palm towards the camera.
const BASE_POSE: [(f32, f32); NUM_LANDMARKS] = [
    (0.50, 0.85), // wrist
    (0.42, 0.80),
    (0.36, 0.74),
    (0.32, 0.68),
    (0.29, 0.62), // thumb
    (0.42, 0.62),
    (0.41, 0.52),
    (0.40, 0.45),
    (0.39, 0.38), // index
    (0.48, 0.60),
    (0.48, 0.49),
    (0.48, 0.41),
    (0.48, 0.34), // middle
    (0.54, 0.61),
    (0.55, 0.51),
    (0.56, 0.44),
    (0.57, 0.38), // ring
    (0.60, 0.64),
    (0.63, 0.56),
    (0.65, 0.50),
    (0.67, 0.45), // pinky
];

/// Scripted detector: moves the thumb and index tips towards each other and
/// back on a fixed cycle, and "loses" the hand for a few frames mid-run.
struct SyntheticHand {
    frame_counter: u32,
}

impl HandDetector for SyntheticHand {
    fn process(
        &mut self,
        _frame: &Frame,
        _config: &DetectorConfig,
    ) -> anyhow::Result<DetectionResult> {
        let t = self.frame_counter;
        self.frame_counter += 1;

        // Simulate a short tracking dropout.
        if (70..75).contains(&t) {
            return Ok(DetectionResult::default());
        }

        // 0 = fully open, 1 = fully pinched.
        let phase = (t as f32 / 30.0 * std::f32::consts::PI).sin().abs();

        let mut landmarks: Vec<Landmark> = BASE_POSE
            .iter()
            .map(|&(x, y)| Landmark::new(x, y, 0.0))
            .collect();

        let thumb = LandmarkIdx::ThumbTip as usize;
        let index = LandmarkIdx::IndexFingerTip as usize;
        let (tx, ty) = BASE_POSE[thumb];
        let (ix, iy) = BASE_POSE[index];
        let (mx, my) = ((tx + ix) / 2.0, (ty + iy) / 2.0);
        landmarks[thumb] = Landmark::new(tx + (mx - tx) * phase, ty + (my - ty) * phase, 0.0);
        landmarks[index] = Landmark::new(ix + (mx - ix) * phase, iy + (my - iy) * phase, 0.0);

        Ok(DetectionResult::new(vec![Hand::from_landmarks(landmarks)?]))
    }
}

fn camera_frame() -> Frame {
    // Gradient background standing in for camera input.
    let mut frame = Frame::new(WIDTH, HEIGHT);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let r = (x * 96 / WIDTH) as u8;
            let b = (y * 96 / HEIGHT) as u8;
            frame.set(x, y, Color::from_rgb8(r, 32, b));
        }
    }
    frame
}

fn main() -> anyhow::Result<()> {
    handspan::init_logger!();

    let out_dir = std::path::Path::new("pinch_frames");
    std::fs::create_dir_all(out_dir)?;

    let mut tracker = HandTracker::new(
        SyntheticHand { frame_counter: 0 },
        DetectorConfig::default().with_detection_confidence(0.7),
    );
    let options = AnnotateOptions::default()
        .with_landmarks(LandmarkIdx::ThumbTip, LandmarkIdx::IndexFingerTip)
        .with_click_threshold(30)
        .with_distance_logging(true);

    let mut fps = FpsCounter::new("pinch loop");
    for i in 0..FRAMES {
        let mut frame = camera_frame();
        let result = tracker.detect(&mut frame)?;

        if result.is_empty() {
            log::info!("frame {i}: no hand");
        } else {
            tracker.annotate(&mut frame, &result, &options)?;
            let sample = tracker.last_distance_sample().unwrap();
            let pinched = sample.distance <= 30;
            log::info!(
                "frame {i}: distance {}px at ({}, {}){}",
                sample.distance,
                sample.midpoint_x,
                sample.midpoint_y,
                if pinched { " [pinch]" } else { "" },
            );
        }

        if i % 30 == 0 {
            let path = out_dir.join(format!("frame_{i:03}.png"));
            frame.save(&path)?;
            log::info!("saved {}", path.display());
        }

        fps.tick_with(tracker.timers());
    }

    Ok(())
}
