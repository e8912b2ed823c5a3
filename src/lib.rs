//! Hand landmark extraction and pinch distance measurement for video frames.
//!
//! This crate wraps an external hand-landmark detector behind the
//! [`HandDetector`] trait and turns its output into something a gesture layer
//! can act on: pixel-space landmark positions, a drawn hand skeleton, and the
//! distance between two chosen landmarks (the "pinch" signal used for
//! click-style interaction).
//!
//! The per-frame flow mirrors a typical camera loop: pull a BGR frame from the
//! video source, call [`HandTracker::detect`], call [`HandTracker::annotate`],
//! hand the frame to the display, repeat. Detection itself is *not*
//! implemented here; bind whatever landmark model your platform provides
//! behind [`HandDetector`].
//!
//! # Coordinates
//!
//! The detector reports landmarks as normalized coordinates in `[0, 1]` with X
//! pointing right and Y pointing *down*, matching image coordinates. Pixel
//! positions derived from them use the same orientation.
//!
//! [`HandDetector`]: detection::HandDetector
//! [`HandTracker`]: tracker::HandTracker
//! [`HandTracker::detect`]: tracker::HandTracker::detect
//! [`HandTracker::annotate`]: tracker::HandTracker::annotate

use log::LevelFilter;

pub mod detection;
pub mod draw;
mod error;
pub mod frame;
pub mod landmark;
pub mod resolution;
pub mod timer;
pub mod tracker;

pub use error::Error;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and handspan will
/// log at *trace* level. Otherwise, they will log at *debug* level.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
