//! # Scan Session Management
//!
//! A [`ScanSession`] owns the immutable original bitmap captured once
//! per acquire and the current filter parameters. Every parameter
//! change re-derives a fresh output from the original — never from a
//! previous derivation — so repeated slider adjustments cannot
//! accumulate rounding drift. The derived bitmap is transient: it is
//! recomputed on demand and handed straight to the encoder.
//!
//! The transform runs synchronously on the calling thread; callers
//! driving interactive controls should debounce rapid changes so at
//! most one derivation runs per user gesture.

use crate::bitmap::Bitmap;
use crate::encode::{self, EncodedScan, OutputFormat};
use crate::error::ScanResult;
use crate::processing::{FilterMode, FilterParams, transform};

/// One capture/selection event and its adjustable filter state.
pub struct ScanSession {
    original: Bitmap,
    params: FilterParams,
}

impl ScanSession {
    /// Start a session around a freshly acquired bitmap.
    pub fn new(original: Bitmap) -> Self {
        Self {
            original,
            params: FilterParams::default(),
        }
    }

    /// The untouched original.
    pub fn original(&self) -> &Bitmap {
        &self.original
    }

    /// Current filter parameters.
    pub fn params(&self) -> FilterParams {
        self.params
    }

    /// Select a filter mode.
    pub fn set_mode(&mut self, mode: FilterMode) {
        self.params.mode = mode;
    }

    /// Set the brightness offset.
    pub fn set_brightness(&mut self, brightness: i32) {
        self.params.brightness = brightness;
    }

    /// Set contrast from the UI wire value (100 = multiplier 1.0).
    pub fn set_contrast_wire(&mut self, contrast_wire: i32) {
        self.params.contrast = contrast_wire as f32 / 100.0;
    }

    /// Replace the whole parameter set at once.
    pub fn set_params(&mut self, params: FilterParams) {
        self.params = params;
    }

    /// Back to identity parameters (the retake/reset control).
    pub fn reset(&mut self) {
        self.params = FilterParams::default();
    }

    /// Derive the current output bitmap from the original.
    pub fn current(&self) -> Bitmap {
        transform(&self.original, self.params)
    }

    /// Derive and encode the current output in one step.
    pub fn encode_current(&self, format: OutputFormat, quality: u8) -> ScanResult<EncodedScan> {
        encode::encode(&self.current(), format, quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_rederives_from_original() {
        let original = Bitmap::filled(2, 2, [100, 100, 100, 255]);
        let mut session = ScanSession::new(original.clone());

        // Two successive contrast changes must not compound.
        session.set_contrast_wire(200);
        let first = session.current();
        assert_eq!(first.pixel(0, 0), [72, 72, 72, 255]);

        session.set_contrast_wire(200);
        let second = session.current();
        assert_eq!(second, first);

        assert_eq!(session.original(), &original);
    }

    #[test]
    fn test_reset_restores_identity() {
        let mut session = ScanSession::new(Bitmap::filled(1, 1, [42, 42, 42, 255]));
        session.set_mode(FilterMode::Vivid);
        session.set_brightness(30);
        session.set_contrast_wire(150);
        session.reset();

        assert!(session.params().is_identity());
        assert_eq!(session.current(), *session.original());
    }

    #[test]
    fn test_encode_current_produces_stream() {
        let mut session = ScanSession::new(Bitmap::filled(4, 4, [10, 20, 30, 255]));
        session.set_mode(FilterMode::Grayscale);
        let encoded = session.encode_current(OutputFormat::Png, 95).unwrap();
        assert!(!encoded.bytes.is_empty());
    }
}
