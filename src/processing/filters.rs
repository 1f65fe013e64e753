//! # Filter/Tone Transform
//!
//! The algorithmic core of the scanner: a pure per-pixel mapping from
//! an input bitmap and a parameter set to a fresh output bitmap.
//!
//! ## Pipeline
//!
//! Per pixel, channels R/G/B (alpha passes through):
//! 1. The selected [`FilterMode`] tone mapping
//! 2. A global grade in fixed order: contrast pivoted at mid-gray
//!    (128), then additive brightness
//! 3. A single final clamp to `[0, 255]`, rounded to nearest at the
//!    8-bit write
//!
//! Mode mappings run before the global grade so brightness/contrast act
//! as a uniform final grade regardless of which creative filter was
//! chosen. Each pixel is independent; the transform is a total
//! function — any finite brightness/contrast saturates via the final
//! clamp instead of erroring.
//!
//! Callers always re-derive the output from the held original, never
//! from a previous derivation, so repeated slider adjustments do not
//! accumulate rounding drift (see [`crate::session::ScanSession`]).

use crate::bitmap::{Bitmap, CHANNELS};

/// Mid-gray pivot for contrast scaling.
const PIVOT: f32 = 128.0;

/// BT.601 luma weights used by the grayscale and black-and-white modes.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Named tone mappings. Closed set; exactly one is active per scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Identity: leave pixels unchanged before the global grade.
    #[default]
    Original,
    /// BT.601 luminance, written to all three channels.
    Grayscale,
    /// Hard luminance threshold at 128 to pure black or white.
    BlackAndWhite,
    /// Brightening boost: each channel scaled by 1.2 plus 10.
    Enhance,
    /// Saturation boost: push each channel 50% away from the pixel mean.
    Vivid,
}

impl FilterMode {
    /// Map a mode name to a [`FilterMode`].
    ///
    /// Unrecognized names fall back to `Original`: the mode set is a
    /// closed internal enum, so an unknown name is treated as the
    /// identity rather than an error.
    pub fn from_name(name: &str) -> Self {
        match name {
            "grayscale" => Self::Grayscale,
            "bw" | "black-and-white" => Self::BlackAndWhite,
            "enhance" => Self::Enhance,
            "vivid" => Self::Vivid,
            _ => Self::Original,
        }
    }

    /// Canonical name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Grayscale => "grayscale",
            Self::BlackAndWhite => "bw",
            Self::Enhance => "enhance",
            Self::Vivid => "vivid",
        }
    }
}

/// Immutable parameter set for one transform run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Active tone mapping.
    pub mode: FilterMode,
    /// Additive brightness offset, applied after contrast. UI range is
    /// [-100, 100] but any finite value is accepted.
    pub brightness: i32,
    /// Contrast multiplier around the mid-gray pivot. UI range is
    /// [0.0, 3.0] with 1.0 meaning no change.
    pub contrast: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            mode: FilterMode::Original,
            brightness: 0,
            contrast: 1.0,
        }
    }
}

impl FilterParams {
    /// Build parameters from UI wire values: the contrast slider sends
    /// an integer that is divided by 100 (wire 100 = multiplier 1.0).
    pub fn from_wire(mode: FilterMode, brightness: i32, contrast_wire: i32) -> Self {
        Self {
            mode,
            brightness,
            contrast: contrast_wire as f32 / 100.0,
        }
    }

    /// True when this parameter set is the identity transform.
    pub fn is_identity(&self) -> bool {
        self.mode == FilterMode::Original && self.brightness == 0 && self.contrast == 1.0
    }
}

/// Apply the filter/tone transform to `original`, returning a fresh
/// bitmap of identical dimensions. The input is never modified.
pub fn transform(original: &Bitmap, params: FilterParams) -> Bitmap {
    let mut out = original.data().to_vec();

    let brightness = params.brightness as f32;
    let contrast = params.contrast;

    for pixel in out.chunks_exact_mut(CHANNELS) {
        let (r, g, b) = apply_mode(
            params.mode,
            pixel[0] as f32,
            pixel[1] as f32,
            pixel[2] as f32,
        );

        // Contrast pivots at mid-gray, then brightness; one final clamp.
        pixel[0] = grade(r, contrast, brightness);
        pixel[1] = grade(g, contrast, brightness);
        pixel[2] = grade(b, contrast, brightness);
        // pixel[3] (alpha) untouched
    }

    Bitmap::from_rgba8(original.width(), original.height(), out)
        .expect("transform preserves buffer dimensions")
}

/// Mode-specific tone mapping. No intermediate clamping: values may
/// leave [0, 255] here and are saturated only by the final clamp in
/// [`grade`].
fn apply_mode(mode: FilterMode, r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    match mode {
        FilterMode::Original => (r, g, b),
        FilterMode::Grayscale => {
            let y = LUMA_R * r + LUMA_G * g + LUMA_B * b;
            (y, y, y)
        }
        FilterMode::BlackAndWhite => {
            let y = LUMA_R * r + LUMA_G * g + LUMA_B * b;
            let v = if y > PIVOT { 255.0 } else { 0.0 };
            (v, v, v)
        }
        FilterMode::Enhance => (r * 1.2 + 10.0, g * 1.2 + 10.0, b * 1.2 + 10.0),
        FilterMode::Vivid => {
            let avg = (r + g + b) / 3.0;
            (
                r + (r - avg) * 0.5,
                g + (g - avg) * 0.5,
                b + (b - avg) * 0.5,
            )
        }
    }
}

/// Global grade and 8-bit write: `(c - 128) * contrast + 128 +
/// brightness`, clamped to [0, 255] and rounded to nearest.
fn grade(channel: f32, contrast: f32, brightness: f32) -> u8 {
    let graded = (channel - PIVOT) * contrast + PIVOT + brightness;
    graded.clamp(0.0, 255.0).round() as u8
}
