//! The frame hand-landmark adapter: per-frame detection and annotation.
//!
//! [`HandTracker`] ties the pieces together for the camera loop: it feeds BGR
//! frames to the detector in the RGB order it expects, restores the frame
//! afterwards, draws skeleton and pinch overlays, and retains the most recent
//! [`DistanceSample`] per hand for the gesture layer to poll.

use crate::detection::{DetectionResult, DetectorConfig, Hand, HandDetector};
use crate::draw;
use crate::error::Error;
use crate::frame::{ChannelOrder, Color, Frame};
use crate::landmark::{LandmarkIdx, CONNECTIVITY};
use crate::timer::Timer;

/// Overlay color while the two landmarks are further apart than the click
/// threshold.
const RELEASED_COLOR: Color = Color::MAGENTA;

/// Overlay color once the two landmarks close to within the click threshold.
const PINCHED_COLOR: Color = Color::from_rgb8(100, 255, 100);

const SKELETON_COLOR: Color = Color::GREEN;

const ENDPOINT_DIAMETER: u32 = 20;
const MIDPOINT_DIAMETER: u32 = 14;
const DISTANCE_LINE_WIDTH: u32 = 2;

/// Options controlling what [`HandTracker::annotate`] draws and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotateOptions {
    draw_skeleton: bool,
    landmark_a: usize,
    landmark_b: usize,
    log_distance: bool,
    draw_overlay: bool,
    click_threshold: u32,
}

/// The default options draw the skeleton and the pinch overlay between thumb
/// tip and index finger tip, with a click threshold of 40 pixels and distance
/// logging off.
impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            draw_skeleton: true,
            landmark_a: LandmarkIdx::ThumbTip as usize,
            landmark_b: LandmarkIdx::IndexFingerTip as usize,
            log_distance: false,
            draw_overlay: true,
            click_threshold: 40,
        }
    }
}

impl AnnotateOptions {
    /// Enables or disables drawing the full hand skeleton.
    pub fn with_skeleton(mut self, draw_skeleton: bool) -> Self {
        self.draw_skeleton = draw_skeleton;
        self
    }

    /// Selects the two landmarks to measure, by name.
    pub fn with_landmarks(mut self, a: LandmarkIdx, b: LandmarkIdx) -> Self {
        self.landmark_a = a as usize;
        self.landmark_b = b as usize;
        self
    }

    /// Selects the two landmarks to measure, by raw detector index.
    ///
    /// Indices are validated by [`HandTracker::annotate`], which fails with
    /// [`Error::InvalidLandmarkIndex`] when either is outside of `0..=20`.
    pub fn with_landmark_indices(mut self, a: usize, b: usize) -> Self {
        self.landmark_a = a;
        self.landmark_b = b;
        self
    }

    /// Enables or disables logging the measured distance to the diagnostic
    /// log (at *debug* level).
    pub fn with_distance_logging(mut self, log_distance: bool) -> Self {
        self.log_distance = log_distance;
        self
    }

    /// Enables or disables the distance overlay: filled circles on both
    /// landmarks and their midpoint, plus a connecting line.
    pub fn with_overlay(mut self, draw_overlay: bool) -> Self {
        self.draw_overlay = draw_overlay;
        self
    }

    /// Sets the pinch threshold in pixels.
    ///
    /// The overlay switches from magenta to light green when the distance
    /// drops to the threshold or below; a distance *equal* to the threshold
    /// already counts as pinched.
    pub fn with_click_threshold(mut self, threshold: u32) -> Self {
        self.click_threshold = threshold;
        self
    }
}

/// The distance measurement taken from one hand in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceSample {
    /// Euclidean distance between the two selected landmarks, in pixels.
    pub distance: u32,
    /// X coordinate of the midpoint between the two landmarks.
    pub midpoint_x: i32,
    /// Y coordinate of the midpoint between the two landmarks.
    pub midpoint_y: i32,
}

/// Adapter around a [`HandDetector`] that handles color conversion, drawing,
/// and distance measurement for one frame at a time.
///
/// All calls are synchronous and process exactly one frame to completion. The
/// retained distance samples are unsynchronized state; wrap the tracker in a
/// lock before sharing it across threads.
pub struct HandTracker {
    detector: Box<dyn HandDetector>,
    config: DetectorConfig,
    samples: Vec<DistanceSample>,
    t_convert: Timer,
    t_detect: Timer,
}

impl HandTracker {
    /// Creates a tracker driving `detector` with the given configuration.
    ///
    /// The configuration is fixed for the tracker's lifetime; create a new
    /// tracker to change it.
    pub fn new<D: HandDetector + 'static>(detector: D, config: DetectorConfig) -> Self {
        Self {
            detector: Box::new(detector),
            config,
            samples: Vec::new(),
            t_convert: Timer::new("convert"),
            t_detect: Timer::new("detect"),
        }
    }

    /// Returns the detector configuration passed to [`HandTracker::new`].
    #[inline]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Returns profiling timers for the color conversion and detection
    /// phases.
    pub fn timers(&self) -> impl Iterator<Item = &Timer> + '_ {
        [&self.t_convert, &self.t_detect].into_iter()
    }

    /// Runs hand detection on `frame`.
    ///
    /// The frame is swapped to RGB in place for the duration of detection and
    /// restored to BGR before returning, even when the detector fails. Pixel
    /// content is byte-identical afterwards.
    ///
    /// Zero detected hands is a normal outcome and yields an empty
    /// [`DetectionResult`]. The result never contains more than
    /// [`DetectorConfig::max_hands`] hands.
    ///
    /// # Panics
    ///
    /// Panics if `frame` is not in BGR channel order, which means a previous
    /// conversion leaked or the caller swapped the frame itself.
    pub fn detect(&mut self, frame: &mut Frame) -> Result<DetectionResult, Error> {
        assert_eq!(
            frame.order(),
            ChannelOrder::Bgr,
            "detect expects frames in BGR order"
        );

        self.t_convert.time(|| frame.swap_channels());
        let result = self
            .t_detect
            .time(|| self.detector.process(frame, &self.config));
        self.t_convert.time(|| frame.swap_channels());

        let mut result = result.map_err(Error::Detector)?;
        result.truncate(self.config.max_hands());
        log::trace!("detected {} hand(s)", result.hands().len());
        Ok(result)
    }

    /// Draws landmark visualizations onto `frame` and records one
    /// [`DistanceSample`] per hand.
    ///
    /// Landmark indices in `options` are validated up front; out-of-range
    /// values fail with [`Error::InvalidLandmarkIndex`] before anything is
    /// drawn.
    ///
    /// A `result` with zero hands is fine as long as no landmark-dependent
    /// output was requested. If distance logging or the overlay is enabled,
    /// an empty result fails with [`Error::NoHandDetected`]; callers should
    /// check [`DetectionResult::is_empty`] before asking for a measurement.
    ///
    /// Hands are processed in detector order, and the retained samples are
    /// replaced as a whole whenever at least one hand is processed.
    pub fn annotate(
        &mut self,
        frame: &mut Frame,
        result: &DetectionResult,
        options: &AnnotateOptions,
    ) -> Result<(), Error> {
        let a = LandmarkIdx::from_index(options.landmark_a).ok_or(Error::InvalidLandmarkIndex {
            index: options.landmark_a,
        })?;
        let b = LandmarkIdx::from_index(options.landmark_b).ok_or(Error::InvalidLandmarkIndex {
            index: options.landmark_b,
        })?;

        if result.is_empty() {
            if options.log_distance || options.draw_overlay {
                return Err(Error::NoHandDetected);
            }
            return Ok(());
        }

        self.samples.clear();
        for hand in result.hands() {
            self.annotate_hand(frame, hand, a, b, options);
        }
        Ok(())
    }

    fn annotate_hand(
        &mut self,
        frame: &mut Frame,
        hand: &Hand,
        a: LandmarkIdx,
        b: LandmarkIdx,
        options: &AnnotateOptions,
    ) {
        let pixels = hand.pixel_landmarks(frame.resolution());

        if options.draw_skeleton {
            for &(from, to) in CONNECTIVITY {
                let (from, to) = (pixels[from as usize], pixels[to as usize]);
                draw::line(frame, from.x(), from.y(), to.x(), to.y()).color(SKELETON_COLOR);
            }
            for px in &pixels {
                draw::marker(frame, px.x(), px.y());
            }
        }

        let (pa, pb) = (pixels[a as usize], pixels[b as usize]);
        let distance = pa.distance_to(pb);
        let midpoint = pa.midpoint(pb);

        if options.log_distance {
            log::debug!("{a:?} to {b:?}: {distance}px");
        }

        if options.draw_overlay {
            let color = if distance > options.click_threshold {
                RELEASED_COLOR
            } else {
                PINCHED_COLOR
            };
            draw::circle(frame, pa.x(), pa.y(), ENDPOINT_DIAMETER)
                .color(color)
                .fill();
            draw::circle(frame, pb.x(), pb.y(), ENDPOINT_DIAMETER)
                .color(color)
                .fill();
            draw::line(frame, pa.x(), pa.y(), pb.x(), pb.y())
                .color(color)
                .stroke_width(DISTANCE_LINE_WIDTH);
            draw::circle(frame, midpoint.x(), midpoint.y(), MIDPOINT_DIAMETER)
                .color(color)
                .fill();
        }

        self.samples.push(DistanceSample {
            distance,
            midpoint_x: midpoint.x(),
            midpoint_y: midpoint.y(),
        });
    }

    /// Returns the distance samples from the most recent [`annotate`] call
    /// that processed at least one hand, indexed by hand.
    ///
    /// Samples are *not* invalidated by frames without hands: if detection
    /// comes up empty on a later frame, the previous samples stay observable.
    /// Callers that care must track hand presence via
    /// [`DetectionResult::is_empty`] themselves.
    ///
    /// [`annotate`]: HandTracker::annotate
    #[inline]
    pub fn distance_samples(&self) -> &[DistanceSample] {
        &self.samples
    }

    /// Returns the last hand's sample from the most recent [`annotate`] call
    /// that processed at least one hand, or [`None`] if no hand has ever been
    /// measured.
    ///
    /// The same staleness caveat as [`distance_samples`] applies.
    ///
    /// [`annotate`]: HandTracker::annotate
    /// [`distance_samples`]: HandTracker::distance_samples
    #[inline]
    pub fn last_distance_sample(&self) -> Option<DistanceSample> {
        self.samples.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::landmark::{Landmark, NUM_LANDMARKS};

    /// Plays back a fixed sequence of detection results, then reports empty
    /// frames forever.
    struct ScriptedDetector {
        results: VecDeque<DetectionResult>,
    }

    impl ScriptedDetector {
        fn new<I: IntoIterator<Item = DetectionResult>>(results: I) -> Self {
            Self {
                results: results.into_iter().collect(),
            }
        }
    }

    impl HandDetector for ScriptedDetector {
        fn process(
            &mut self,
            frame: &Frame,
            _config: &DetectorConfig,
        ) -> anyhow::Result<DetectionResult> {
            assert_eq!(frame.order(), ChannelOrder::Rgb);
            Ok(self.results.pop_front().unwrap_or_default())
        }
    }

    struct FailingDetector;

    impl HandDetector for FailingDetector {
        fn process(
            &mut self,
            _frame: &Frame,
            _config: &DetectorConfig,
        ) -> anyhow::Result<DetectionResult> {
            anyhow::bail!("model exploded")
        }
    }

    /// A hand with thumb tip at `a` and index finger tip at `b` (normalized
    /// coordinates); every other landmark sits at the origin.
    fn pinch_hand(a: (f32, f32), b: (f32, f32)) -> Hand {
        let mut landmarks = vec![Landmark::default(); NUM_LANDMARKS];
        landmarks[LandmarkIdx::ThumbTip as usize] = Landmark::new(a.0, a.1, 0.0);
        landmarks[LandmarkIdx::IndexFingerTip as usize] = Landmark::new(b.0, b.1, 0.0);
        Hand::from_landmarks(landmarks).unwrap()
    }

    fn one_hand(a: (f32, f32), b: (f32, f32)) -> DetectionResult {
        DetectionResult::new(vec![pinch_hand(a, b)])
    }

    /// Overlay only; measurement stays on the default thumb/index pair.
    fn overlay_options() -> AnnotateOptions {
        AnnotateOptions::default().with_skeleton(false)
    }

    #[test]
    fn detect_restores_frame() {
        let mut tracker = HandTracker::new(
            ScriptedDetector::new([DetectionResult::default()]),
            DetectorConfig::default(),
        );

        let mut frame = Frame::new(8, 8);
        frame.set(3, 3, Color::from_rgb8(12, 34, 56));
        let original = frame.data().to_vec();

        let result = tracker.detect(&mut frame).unwrap();
        assert!(result.is_empty());
        assert_eq!(frame.order(), ChannelOrder::Bgr);
        assert_eq!(frame.data(), &original[..]);
    }

    #[test]
    fn detect_restores_frame_on_detector_failure() {
        let mut tracker = HandTracker::new(FailingDetector, DetectorConfig::default());

        let mut frame = Frame::new(4, 4);
        frame.set(1, 2, Color::CYAN);
        let original = frame.data().to_vec();

        match tracker.detect(&mut frame) {
            Err(Error::Detector(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(frame.order(), ChannelOrder::Bgr);
        assert_eq!(frame.data(), &original[..]);
    }

    #[test]
    fn detect_truncates_to_max_hands() {
        let two_hands = DetectionResult::new(vec![
            pinch_hand((0.1, 0.1), (0.2, 0.2)),
            pinch_hand((0.6, 0.6), (0.7, 0.7)),
        ]);
        let mut tracker =
            HandTracker::new(ScriptedDetector::new([two_hands]), DetectorConfig::default());

        let mut frame = Frame::new(16, 16);
        let result = tracker.detect(&mut frame).unwrap();
        assert_eq!(result.hands().len(), 1);
    }

    #[test]
    fn annotate_empty_result() {
        let mut tracker = HandTracker::new(
            ScriptedDetector::new(Vec::new()),
            DetectorConfig::default(),
        );
        let mut frame = Frame::new(16, 16);
        let empty = DetectionResult::default();

        // Nothing landmark-dependent requested: fine.
        let quiet = AnnotateOptions::default()
            .with_skeleton(false)
            .with_overlay(false);
        tracker.annotate(&mut frame, &empty, &quiet).unwrap();

        // Skeleton over zero hands is a no-op, not an error.
        let skeleton_only = AnnotateOptions::default().with_overlay(false);
        tracker.annotate(&mut frame, &empty, &skeleton_only).unwrap();

        // Asking for a measurement without a hand is.
        match tracker.annotate(&mut frame, &empty, &overlay_options()) {
            Err(Error::NoHandDetected) => {}
            other => panic!("unexpected result: {other:?}"),
        }
        let logging = quiet.with_distance_logging(true);
        assert!(matches!(
            tracker.annotate(&mut frame, &empty, &logging),
            Err(Error::NoHandDetected)
        ));
    }

    #[test]
    fn invalid_index_fails_before_hand_check() {
        let mut tracker = HandTracker::new(ScriptedDetector::new(Vec::new()), DetectorConfig::default());
        let mut frame = Frame::new(16, 16);

        let options = overlay_options().with_landmark_indices(4, 21);
        match tracker.annotate(&mut frame, &DetectionResult::default(), &options) {
            Err(Error::InvalidLandmarkIndex { index }) => assert_eq!(index, 21),
            other => panic!("unexpected result: {other:?}"),
        }

        let options = overlay_options().with_landmark_indices(42, 8);
        let result = one_hand((0.25, 0.25), (0.5, 0.5));
        assert!(matches!(
            tracker.annotate(&mut frame, &result, &options),
            Err(Error::InvalidLandmarkIndex { index: 42 })
        ));
    }

    #[test]
    fn threshold_boundary_picks_near_color() {
        let mut tracker = HandTracker::new(ScriptedDetector::new(Vec::new()), DetectorConfig::default());

        // 256x256 so the normalized coordinates below are exact: thumb tip at
        // (64, 64), index tip at (104, 64) -> distance 40 == threshold.
        let mut frame = Frame::new(256, 256);
        let result = one_hand((0.25, 0.25), (0.40625, 0.25));
        tracker
            .annotate(&mut frame, &result, &overlay_options())
            .unwrap();

        assert_eq!(
            tracker.last_distance_sample(),
            Some(DistanceSample {
                distance: 40,
                midpoint_x: 84,
                midpoint_y: 64,
            })
        );
        // Strict greater-than: equal distance counts as pinched.
        assert_eq!(frame.get(84, 64), PINCHED_COLOR);
        assert_eq!(frame.get(64, 64), PINCHED_COLOR);
    }

    #[test]
    fn distance_above_threshold_picks_far_color() {
        let mut tracker = HandTracker::new(ScriptedDetector::new(Vec::new()), DetectorConfig::default());

        // Index tip at (105, 64) -> distance 41, one pixel past the threshold.
        let mut frame = Frame::new(256, 256);
        let result = one_hand((0.25, 0.25), (0.41015625, 0.25));
        tracker
            .annotate(&mut frame, &result, &overlay_options())
            .unwrap();

        assert_eq!(tracker.last_distance_sample().unwrap().distance, 41);
        assert_eq!(frame.get(84, 64), RELEASED_COLOR);
    }

    #[test]
    fn one_sample_per_hand() {
        let mut tracker = HandTracker::new(ScriptedDetector::new(Vec::new()), DetectorConfig::default());

        let mut frame = Frame::new(256, 256);
        let result = DetectionResult::new(vec![
            pinch_hand((0.25, 0.25), (0.25, 0.5)),
            pinch_hand((0.5, 0.5), (0.5, 0.75)),
        ]);
        tracker
            .annotate(&mut frame, &result, &overlay_options())
            .unwrap();

        let samples = tracker.distance_samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].distance, 64);
        assert_eq!(samples[1].distance, 64);
        assert_eq!(samples[0].midpoint_x, 64);
        assert_eq!(samples[1].midpoint_x, 128);
        assert_eq!(tracker.last_distance_sample(), Some(samples[1]));
    }

    #[test]
    fn samples_survive_handless_frames() {
        let mut tracker = HandTracker::new(
            ScriptedDetector::new([one_hand((0.25, 0.25), (0.40625, 0.25))]),
            DetectorConfig::default(),
        );

        let mut frame = Frame::new(256, 256);
        let result = tracker.detect(&mut frame).unwrap();
        tracker
            .annotate(&mut frame, &result, &overlay_options())
            .unwrap();
        let sample = tracker.last_distance_sample().unwrap();

        // Next frame: the scripted detector reports no hands.
        let mut frame = Frame::new(256, 256);
        let result = tracker.detect(&mut frame).unwrap();
        assert!(result.is_empty());

        // No drawing requested, so annotate is a no-op and the previous
        // sample stays observable.
        let quiet = AnnotateOptions::default()
            .with_skeleton(false)
            .with_overlay(false);
        tracker.annotate(&mut frame, &result, &quiet).unwrap();
        assert_eq!(tracker.last_distance_sample(), Some(sample));
        assert_eq!(tracker.distance_samples().len(), 1);
    }

    #[test]
    fn skeleton_draws_on_request() {
        let mut tracker = HandTracker::new(ScriptedDetector::new(Vec::new()), DetectorConfig::default());

        // All landmarks at the frame center: the skeleton collapses to a dot,
        // which is enough to observe that it drew.
        let landmarks = vec![Landmark::new(0.5, 0.5, 0.0); NUM_LANDMARKS];
        let result = DetectionResult::new(vec![Hand::from_landmarks(landmarks).unwrap()]);

        let mut frame = Frame::new(64, 64);
        let options = AnnotateOptions::default().with_overlay(false);
        tracker.annotate(&mut frame, &result, &options).unwrap();
        // Markers draw over the skeleton lines at the shared position.
        assert_eq!(frame.get(32, 32), Color::RED);

        let mut untouched = Frame::new(64, 64);
        let options = options.with_skeleton(false);
        tracker.annotate(&mut untouched, &result, &options).unwrap();
        assert_eq!(untouched.get(32, 32), Color::BLACK);
    }
}
