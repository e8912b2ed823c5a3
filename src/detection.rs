//! The detector boundary: configuration, detection results, and the trait an
//! external hand-landmark detector is bound behind.
//!
//! Detection and landmark regression are deliberately not implemented in this
//! crate. Implement [`HandDetector`] on top of whatever model or library the
//! target platform provides and hand it to
//! [`HandTracker::new`][crate::tracker::HandTracker::new]; everything above
//! the trait only sees the [`DetectionResult`] value type.

use crate::error::Error;
use crate::frame::Frame;
use crate::landmark::{Landmark, LandmarkIdx, PixelLandmark, NUM_LANDMARKS};
use crate::resolution::Resolution;

/// Detector configuration, fixed at [`HandTracker`] construction.
///
/// The tracker passes the same configuration to every
/// [`HandDetector::process`] call; nothing mutates it after construction.
///
/// [`HandTracker`]: crate::tracker::HandTracker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    static_image_mode: bool,
    max_hands: usize,
    detection_confidence: f32,
    tracking_confidence: f32,
}

/// The default configuration: video mode, a single hand, and a confidence
/// threshold of 0.8 for both detection and tracking.
impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            static_image_mode: false,
            max_hands: 1,
            detection_confidence: 0.8,
            tracking_confidence: 0.8,
        }
    }
}

impl DetectorConfig {
    /// Treats every frame as an unrelated still image instead of a video
    /// stream, disabling landmark tracking across frames.
    pub fn with_static_image_mode(mut self, static_image_mode: bool) -> Self {
        self.static_image_mode = static_image_mode;
        self
    }

    /// Sets the maximum number of hands the detector reports per frame.
    ///
    /// # Panics
    ///
    /// This method panics when `max_hands` is 0.
    pub fn with_max_hands(mut self, max_hands: usize) -> Self {
        assert!(max_hands > 0, "max_hands must be at least 1");
        self.max_hands = max_hands;
        self
    }

    /// Sets the confidence threshold for accepting a frame region as a hand.
    ///
    /// # Panics
    ///
    /// This method panics when `confidence` is not in `0.0..=1.0`.
    pub fn with_detection_confidence(mut self, confidence: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&confidence),
            "detection confidence must be in 0.0..=1.0"
        );
        self.detection_confidence = confidence;
        self
    }

    /// Sets the confidence threshold for continuing to track a hand across
    /// frames. Ignored in static image mode.
    ///
    /// # Panics
    ///
    /// This method panics when `confidence` is not in `0.0..=1.0`.
    pub fn with_tracking_confidence(mut self, confidence: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&confidence),
            "tracking confidence must be in 0.0..=1.0"
        );
        self.tracking_confidence = confidence;
        self
    }

    #[inline]
    pub fn static_image_mode(&self) -> bool {
        self.static_image_mode
    }

    #[inline]
    pub fn max_hands(&self) -> usize {
        self.max_hands
    }

    #[inline]
    pub fn detection_confidence(&self) -> f32 {
        self.detection_confidence
    }

    #[inline]
    pub fn tracking_confidence(&self) -> f32 {
        self.tracking_confidence
    }
}

/// A detected hand: exactly [`NUM_LANDMARKS`] landmarks in detector index
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    landmarks: [Landmark; NUM_LANDMARKS],
}

impl Hand {
    /// Builds a [`Hand`] from a landmark list.
    ///
    /// Fails with [`Error::MalformedHand`] unless `landmarks` contains exactly
    /// [`NUM_LANDMARKS`] entries. Detector bindings should funnel their raw
    /// output through this instead of assuming the model behaved.
    pub fn from_landmarks(landmarks: Vec<Landmark>) -> Result<Self, Error> {
        let count = landmarks.len();
        let landmarks = <[Landmark; NUM_LANDMARKS]>::try_from(landmarks)
            .map_err(|_| Error::MalformedHand { landmarks: count })?;
        Ok(Self { landmarks })
    }

    /// Returns all landmarks in detector index order.
    #[inline]
    pub fn landmarks(&self) -> &[Landmark; NUM_LANDMARKS] {
        &self.landmarks
    }

    /// Returns a single landmark by name.
    #[inline]
    pub fn landmark(&self, idx: LandmarkIdx) -> Landmark {
        self.landmarks[idx as usize]
    }

    /// Converts all landmarks to pixel coordinates in a frame of the given
    /// [`Resolution`].
    ///
    /// Computed fresh on every call; pixel positions are only meaningful for
    /// the frame the landmarks were detected in.
    pub fn pixel_landmarks(&self, res: Resolution) -> [PixelLandmark; NUM_LANDMARKS] {
        self.landmarks.map(|lm| lm.to_pixels(res))
    }
}

/// The outcome of running hand detection on one frame.
///
/// Contains zero or more [`Hand`]s in the order the detector reported them.
/// Zero hands is a normal outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    hands: Vec<Hand>,
}

impl DetectionResult {
    pub fn new(hands: Vec<Hand>) -> Self {
        Self { hands }
    }

    /// The detected hands, in detector order.
    #[inline]
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    /// Returns `true` if no hands were detected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    /// Drops all hands beyond the first `max`.
    ///
    /// [`HandTracker::detect`][crate::tracker::HandTracker::detect] applies
    /// this with the configured hand limit, so results never exceed it even
    /// if a detector binding ignores [`DetectorConfig::max_hands`].
    pub fn truncate(&mut self, max: usize) {
        self.hands.truncate(max);
    }
}

/// The external hand-landmark detector boundary.
///
/// Implementations wrap a concrete detection/tracking library or model. The
/// contract, from the adapter's point of view:
///
/// - `frame` is in [`Rgb`][crate::frame::ChannelOrder::Rgb] channel order and
///   must be treated as read-only.
/// - `config` is the same value on every call for a given tracker.
/// - Reporting zero hands is a normal result, not an error. Errors are
///   reserved for the detector itself failing.
pub trait HandDetector: Send {
    /// Runs hand detection and landmark regression on one frame.
    fn process(&mut self, frame: &Frame, config: &DetectorConfig)
        -> anyhow::Result<DetectionResult>;
}
