//! Frame sharpening.
//!
//! Extracted frames tend to be slightly soft from video compression, which
//! hurts both readability and downstream OCR on the persisted pages. The
//! enhancer applies a fixed-intensity sharpen: smooth the image with a 3x3
//! kernel, then push each pixel away from its smoothed value.
//!
//! `sharpened = smooth + factor * (original - smooth)`
//!
//! A factor of 1.0 is the identity; the pipeline runs at 2.0. The transform
//! is a pure function of the input pixels: same input, same output, every
//! time.

use image::{Rgb, RgbImage};
use imageproc::filter::filter3x3;

use crate::sampler::{Enhancement, Frame};

/// 3x3 smoothing kernel (center-weighted box blur, normalized to 1).
const SMOOTH_KERNEL: [f32; 9] = [
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    5.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
];

/// Sharpens `image` by the given factor.
///
/// Deterministic and side-effect free. Factors above 1.0 sharpen, 1.0
/// returns the input pixels unchanged, and factors between 0 and 1 soften.
pub fn sharpen(image: &RgbImage, factor: f32) -> RgbImage {
    let smooth: RgbImage = filter3x3(image, &SMOOTH_KERNEL);

    let mut out = RgbImage::new(image.width(), image.height());
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let orig = image.get_pixel(x, y);
        let blur = smooth.get_pixel(x, y);
        let mut channels = [0u8; 3];
        for c in 0..3 {
            let o = orig.0[c] as f32;
            let s = blur.0[c] as f32;
            channels[c] = (s + factor * (o - s)).round().clamp(0.0, 255.0) as u8;
        }
        *pixel = Rgb(channels);
    }
    out
}

/// Sharpens a frame in place and marks it enhanced.
pub fn enhance_frame(frame: &mut Frame, factor: f32) {
    frame.image = sharpen(&frame.image, factor);
    frame.enhancement = Enhancement::Enhanced;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image() -> RgbImage {
        RgbImage::from_fn(8, 8, |x, y| {
            Rgb([(x * 32) as u8, (y * 32) as u8, ((x + y) * 16) as u8])
        })
    }

    #[test]
    fn sharpen_is_deterministic() {
        let image = gradient_image();
        let a = sharpen(&image, 2.0);
        let b = sharpen(&image, 2.0);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn factor_one_is_the_identity() {
        let image = gradient_image();
        let out = sharpen(&image, 1.0);
        assert_eq!(out.as_raw(), image.as_raw());
    }

    #[test]
    fn sharpening_amplifies_an_edge() {
        // Dark left half, bright right half: sharpening should push the
        // pixels flanking the edge further apart.
        let image = RgbImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgb([50, 50, 50])
            } else {
                Rgb([200, 200, 200])
            }
        });
        let out = sharpen(&image, 2.0);
        assert!(out.get_pixel(3, 4).0[0] < 50);
        assert!(out.get_pixel(4, 4).0[0] > 200);
    }

    #[test]
    fn enhance_frame_flips_the_state() {
        let mut frame = Frame {
            page_index: 1,
            timestamp_secs: 0.0,
            image: gradient_image(),
            enhancement: Enhancement::Raw,
        };
        enhance_frame(&mut frame, 2.0);
        assert_eq!(frame.enhancement, Enhancement::Enhanced);
    }
}
