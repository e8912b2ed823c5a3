//! Video frame buffers and color handling.
//!
//! This module provides:
//!
//! - The [`Frame`] type, an owned interleaved 3-channel pixel buffer.
//! - [`ChannelOrder`], the tag describing how the bytes of each pixel are laid
//!   out. Video sources typically deliver BGR (the OpenCV convention), while
//!   landmark detectors consume RGB.
//! - The [`Color`] type used by the [`draw`][crate::draw] functions.

use std::fmt;

use embedded_graphics::{pixelcolor::raw::RawU24, prelude::PixelColor};
use image::RgbImage;

use crate::error::Error;
use crate::resolution::Resolution;

/// Byte layout of a [`Frame`]'s pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Blue, green, red. The order video sources hand frames over in.
    Bgr,
    /// Red, green, blue. The order detectors consume.
    Rgb,
}

/// An owned video frame: interleaved 3-bytes-per-pixel data plus a
/// [`ChannelOrder`] tag.
///
/// Frames are created in BGR order and stay that way except while a detector
/// is looking at them; [`HandTracker::detect`] swaps to RGB for the duration
/// of detection and restores BGR before returning.
///
/// [`HandTracker::detect`]: crate::tracker::HandTracker::detect
#[derive(Clone)]
pub struct Frame {
    buf: Vec<u8>,
    res: Resolution,
    order: ChannelOrder,
}

impl Frame {
    /// Creates a black BGR frame of the given size.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is 0.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "frame dimensions must be non-zero (got {width}x{height})"
        );
        let res = Resolution::new(width, height);
        Self {
            buf: vec![0; res.num_pixels() as usize * 3],
            res,
            order: ChannelOrder::Bgr,
        }
    }

    /// Wraps a raw interleaved BGR buffer in a [`Frame`].
    ///
    /// Fails with [`Error::InvalidFrame`] if either dimension is 0 or if the
    /// buffer length does not equal `width * height * 3`.
    pub fn from_bgr8(res: Resolution, data: &[u8]) -> Result<Self, Error> {
        let expected = res.num_pixels() as usize * 3;
        if res.width() == 0 || res.height() == 0 || data.len() != expected {
            return Err(Error::InvalidFrame {
                resolution: res,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            buf: data.to_vec(),
            res,
            order: ChannelOrder::Bgr,
        })
    }

    /// Converts an [`RgbImage`] into a BGR [`Frame`].
    ///
    /// # Panics
    ///
    /// Panics if the image has a zero dimension.
    pub fn from_image(image: &RgbImage) -> Self {
        let mut frame = Frame::new(image.width(), image.height());
        for (x, y, pixel) in image.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            frame.set(x, y, Color::from_rgb8(r, g, b));
        }
        frame
    }

    /// Returns the width of this frame, in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.res.width()
    }

    /// Returns the height of this frame, in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.res.height()
    }

    /// Returns the size of this frame.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.res
    }

    /// Returns the current byte layout of the pixel data.
    #[inline]
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Swaps the first and third byte of every pixel and flips the
    /// [`ChannelOrder`] tag.
    ///
    /// The swap is involutive: applying it twice restores the exact original
    /// bytes.
    pub fn swap_channels(&mut self) {
        for pixel in self.buf.chunks_exact_mut(3) {
            pixel.swap(0, 2);
        }
        self.order = match self.order {
            ChannelOrder::Bgr => ChannelOrder::Rgb,
            ChannelOrder::Rgb => ChannelOrder::Bgr,
        };
    }

    /// Gets the color at the given pixel coordinates.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this frame.
    pub fn get(&self, x: u32, y: u32) -> Color {
        let i = self.pixel_index(x, y);
        let px = &self.buf[i..i + 3];
        match self.order {
            ChannelOrder::Bgr => Color([px[2], px[1], px[0]]),
            ChannelOrder::Rgb => Color([px[0], px[1], px[2]]),
        }
    }

    /// Sets the color at the given pixel coordinates.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this frame.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.pixel_index(x, y);
        let px = &mut self.buf[i..i + 3];
        match self.order {
            ChannelOrder::Bgr => {
                px[0] = color.b();
                px[1] = color.g();
                px[2] = color.r();
            }
            ChannelOrder::Rgb => {
                px[0] = color.r();
                px[1] = color.g();
                px[2] = color.b();
            }
        }
    }

    fn pixel_index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width() && y < self.height(),
            "pixel ({x}, {y}) out of bounds for {} frame",
            self.res,
        );
        (y as usize * self.width() as usize + x as usize) * 3
    }

    /// Returns the raw interleaved pixel data in the current channel order.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the frame and returns the raw pixel buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.buf
    }

    /// Copies this frame into an [`RgbImage`], regardless of the current
    /// channel order.
    pub fn to_image(&self) -> RgbImage {
        let mut image = RgbImage::new(self.width(), self.height());
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let color = self.get(x, y);
            pixel.0 = [color.r(), color.g(), color.b()];
        }
        image
    }

    /// Saves a frame to the file system, mostly useful for debugging.
    ///
    /// The path must have a supported file extension (`jpeg`, `jpg` or `png`).
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        Ok(self.to_image().save(path.as_ref())?)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} Frame", self.res, self.order)
    }
}

/// An 8-bit RGB color.
///
/// [`Frame`] pixel accessors translate to and from the frame's current
/// [`ChannelOrder`], so a `Color` always means the same thing no matter which
/// state the frame is in.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct Color(pub(crate) [u8; 3]);

impl Color {
    pub const BLACK: Self = Self([0, 0, 0]);
    pub const WHITE: Self = Self([255, 255, 255]);
    pub const RED: Self = Self([255, 0, 0]);
    pub const GREEN: Self = Self([0, 255, 0]);
    pub const BLUE: Self = Self([0, 0, 255]);
    pub const YELLOW: Self = Self([255, 255, 0]);
    pub const MAGENTA: Self = Self([255, 0, 255]);
    pub const CYAN: Self = Self([0, 255, 255]);

    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }
}

impl PixelColor for Color {
    type Raw = RawU24;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_round_trip_is_byte_exact() {
        // Solid orange, asymmetric across channels so a missed swap shows up.
        let mut frame = Frame::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                frame.set(x, y, Color::from_rgb8(200, 100, 50));
            }
        }
        let original = frame.data().to_vec();

        frame.swap_channels();
        assert_eq!(frame.order(), ChannelOrder::Rgb);
        assert_ne!(frame.data(), &original[..]);

        frame.swap_channels();
        assert_eq!(frame.order(), ChannelOrder::Bgr);
        assert_eq!(frame.data(), &original[..]);
    }

    #[test]
    fn accessors_respect_channel_order() {
        let mut frame = Frame::new(2, 1);
        frame.set(0, 0, Color::from_rgb8(10, 20, 30));
        // BGR layout on disk.
        assert_eq!(&frame.data()[..3], &[30, 20, 10]);
        assert_eq!(frame.get(0, 0), Color::from_rgb8(10, 20, 30));

        frame.swap_channels();
        // Same logical color, RGB layout.
        assert_eq!(&frame.data()[..3], &[10, 20, 30]);
        assert_eq!(frame.get(0, 0), Color::from_rgb8(10, 20, 30));

        frame.set(1, 0, Color::from_rgb8(1, 2, 3));
        assert_eq!(&frame.data()[3..], &[1, 2, 3]);
    }

    #[test]
    fn from_bgr8_validates_buffer() {
        let res = Resolution::new(2, 2);
        let frame = Frame::from_bgr8(res, &[7; 12]).unwrap();
        assert_eq!(frame.order(), ChannelOrder::Bgr);
        assert_eq!(frame.into_raw(), vec![7; 12]);

        match Frame::from_bgr8(res, &[0; 11]) {
            Err(Error::InvalidFrame {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 12);
                assert_eq!(actual, 11);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        assert!(Frame::from_bgr8(Resolution::new(0, 2), &[]).is_err());
    }

    #[test]
    fn image_round_trip() {
        let mut frame = Frame::new(3, 2);
        frame.set(2, 1, Color::MAGENTA);
        frame.set(0, 0, Color::from_rgb8(7, 8, 9));

        let image = frame.to_image();
        assert_eq!(image.get_pixel(2, 1).0, [255, 0, 255]);

        let back = Frame::from_image(&image);
        assert_eq!(back.data(), frame.data());
        assert_eq!(back.order(), ChannelOrder::Bgr);
    }
}
