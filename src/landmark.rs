//! Hand landmark data model: normalized landmarks, pixel-space positions, and
//! the canonical hand topology.

use crate::resolution::Resolution;

/// Number of landmarks a hand pose consists of.
pub const NUM_LANDMARKS: usize = 21;

/// A single hand landmark as reported by the detector.
///
/// `x` and `y` are normalized to `[0, 1]` relative to the frame's width and
/// height. `z` is the depth relative to the wrist, with negative values closer
/// to the camera; it uses roughly the same scale as `x`.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct Landmark {
    x: f32,
    y: f32,
    z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.z
    }

    /// Converts this landmark to integer pixel coordinates in a frame of the
    /// given [`Resolution`].
    ///
    /// Coordinates are truncated, not rounded, matching how landmark pixels
    /// are conventionally computed from normalized detector output.
    pub fn to_pixels(&self, res: Resolution) -> PixelLandmark {
        PixelLandmark {
            x: (self.x * res.width() as f32) as i32,
            y: (self.y * res.height() as f32) as i32,
        }
    }
}

/// A landmark converted to frame-space pixel coordinates.
///
/// Pixel positions are derived fresh from the normalized landmarks for every
/// frame and hand; they are never cached across frames.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PixelLandmark {
    x: i32,
    y: i32,
}

impl PixelLandmark {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Euclidean distance to `other`, rounded to the nearest
    /// whole pixel.
    pub fn distance_to(&self, other: PixelLandmark) -> u32 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt().round() as u32
    }

    /// Computes the integer midpoint between `self` and `other`.
    ///
    /// Coordinates are floor-divided, so the midpoint of an odd span leans
    /// towards `self`'s side of the origin.
    pub fn midpoint(&self, other: PixelLandmark) -> PixelLandmark {
        PixelLandmark {
            x: (self.x + other.x).div_euclid(2),
            y: (self.y + other.y).div_euclid(2),
        }
    }
}

/// Names for the hand pose landmarks.
///
/// The discriminants match the index order the detector reports landmarks in,
/// so `LandmarkIdx::ThumbTip as usize` indexes a hand's landmark list.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl LandmarkIdx {
    /// Every landmark, in detector index order.
    pub const ALL: [LandmarkIdx; NUM_LANDMARKS] = {
        use LandmarkIdx::*;
        [
            Wrist,
            ThumbCmc,
            ThumbMcp,
            ThumbIp,
            ThumbTip,
            IndexFingerMcp,
            IndexFingerPip,
            IndexFingerDip,
            IndexFingerTip,
            MiddleFingerMcp,
            MiddleFingerPip,
            MiddleFingerDip,
            MiddleFingerTip,
            RingFingerMcp,
            RingFingerPip,
            RingFingerDip,
            RingFingerTip,
            PinkyMcp,
            PinkyPip,
            PinkyDip,
            PinkyTip,
        ]
    };

    /// Looks up the landmark with the given detector index.
    ///
    /// Returns [`None`] when `index` is not in `0..=20`; callers validating
    /// untrusted indices should map that to
    /// [`Error::InvalidLandmarkIndex`][crate::Error::InvalidLandmarkIndex].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// The canonical hand topology: which landmark pairs are connected when
/// drawing a hand skeleton.
pub const CONNECTIVITY: &[(LandmarkIdx, LandmarkIdx)] = {
    use LandmarkIdx::*;
    &[
        // Surround the palm:
        (Wrist, ThumbCmc),
        (ThumbCmc, IndexFingerMcp),
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, PinkyMcp),
        (PinkyMcp, Wrist),
        // Thumb:
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        // Index:
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        // Middle:
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        // Ring:
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        // Pinky:
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};
