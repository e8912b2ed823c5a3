use crate::resolution::Resolution;

/// Errors reported by frame construction and the tracking operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A frame buffer did not match its declared resolution, or the resolution
    /// had a zero dimension.
    #[error("invalid {resolution} frame: expected {expected} bytes, got {actual}")]
    InvalidFrame {
        resolution: Resolution,
        expected: usize,
        actual: usize,
    },

    /// A landmark index outside of `0..=20` was passed in.
    #[error("landmark index {index} is out of range (must be 0..=20)")]
    InvalidLandmarkIndex { index: usize },

    /// A landmark-dependent operation was requested on a detection result that
    /// contains no hands.
    #[error("no hand detected")]
    NoHandDetected,

    /// A hand was constructed from a landmark list that does not contain
    /// exactly 21 entries.
    #[error("malformed hand: expected 21 landmarks, got {landmarks}")]
    MalformedHand { landmarks: usize },

    /// The underlying hand detector failed.
    #[error("hand detector failed")]
    Detector(#[source] anyhow::Error),
}
