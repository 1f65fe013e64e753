//! # Configuration Module
//!
//! Configuration structures and validation for scan runs. This is the
//! common interface between the CLI binary and the core pipeline
//! library.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `input` | `String` | Any valid path | Image file to scan |
//! | `filter` | `String` | mode name | Tone mapping; unknown names mean `original` |
//! | `brightness` | `i32` | -100..=100 | Additive brightness offset |
//! | `contrast_wire` | `i32` | 0..=300 | Contrast slider value, /100 = multiplier |
//! | `quality` | `u8` | 1..=100 | JPEG quality factor |
//! | `retention_days` | `u32` | 0..=365 | Upload auto-expiry, 0 = keep forever |

use serde::{Deserialize, Serialize};

use crate::ScanOptions;
use crate::encode::OutputFormat;
use crate::error::ScanResult;
use crate::processing::{FilterMode, FilterParams};
use crate::upload::RetentionPolicy;

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    /// Directory on the local filesystem.
    Local,
    /// Google Drive `Scans` folder.
    Drive,
    /// Hosted storage API.
    Hosted,
}

impl BackendKind {
    /// Parse a backend name.
    pub fn from_name(name: &str) -> Result<Self, String> {
        match name {
            "local" => Ok(Self::Local),
            "drive" => Ok(Self::Drive),
            "hosted" => Ok(Self::Hosted),
            other => Err(format!(
                "Unknown backend '{}'. Use: local, drive, hosted",
                other
            )),
        }
    }
}

/// Configuration for one scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Path of the image to scan.
    pub input: String,
    /// Optional alternate image tried when the primary cannot be
    /// acquired.
    pub fallback: Option<String>,
    /// Directory scans are written to (local backend) and default
    /// upload staging area.
    pub output_dir: String,
    /// Filter mode name. Unrecognized names select `original`.
    pub filter: String,
    /// Brightness offset, CLI range [-100, 100].
    pub brightness: i32,
    /// Contrast slider wire value; 100 means multiplier 1.0.
    pub contrast_wire: i32,
    /// Output format name: `jpeg` or `png`.
    pub format: String,
    /// JPEG quality factor, 1-100.
    pub quality: u8,
    /// Storage backend name: `local`, `drive` or `hosted`.
    pub backend: String,
    /// Days until uploaded scans expire; 0 keeps them forever.
    pub retention_days: u32,
    /// Drive folder or hosted bucket scans are stored under.
    pub folder: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            input: String::new(),
            fallback: None,
            output_dir: "scans".to_string(),
            filter: "original".to_string(),
            brightness: 0,
            contrast_wire: 100,
            format: "jpeg".to_string(),
            quality: 95,
            backend: "local".to_string(),
            retention_days: 7,
            folder: "Scans".to_string(),
        }
    }
}

impl ScanConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.is_empty() {
            return Err("Input path must not be empty".to_string());
        }
        if self.quality == 0 || self.quality > 100 {
            return Err("Quality must be between 1 and 100".to_string());
        }
        if !(-100..=100).contains(&self.brightness) {
            return Err("Brightness must be between -100 and 100".to_string());
        }
        if !(0..=300).contains(&self.contrast_wire) {
            return Err("Contrast must be between 0 and 300 (100 = no change)".to_string());
        }
        if self.retention_days > 365 {
            return Err("Retention must be at most 365 days".to_string());
        }
        OutputFormat::from_name(&self.format).map_err(|e| e.to_string())?;
        BackendKind::from_name(&self.backend)?;
        Ok(())
    }

    /// Filter parameters derived from the wire values.
    pub fn filter_params(&self) -> FilterParams {
        FilterParams::from_wire(
            FilterMode::from_name(&self.filter),
            self.brightness,
            self.contrast_wire,
        )
    }

    /// Selected storage backend.
    pub fn backend_kind(&self) -> Result<BackendKind, String> {
        BackendKind::from_name(&self.backend)
    }

    /// Convert to ScanOptions for use with the pipeline library.
    pub fn to_scan_options(&self) -> ScanResult<ScanOptions> {
        Ok(ScanOptions {
            input: self.input.clone().into(),
            fallback: self.fallback.clone().map(Into::into),
            params: self.filter_params(),
            format: OutputFormat::from_name(&self.format)?,
            quality: self.quality,
            retention: RetentionPolicy {
                days: self.retention_days,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.filter, "original");
        assert_eq!(config.contrast_wire, 100);
        assert_eq!(config.quality, 95);
        assert_eq!(config.backend, "local");
        assert_eq!(config.retention_days, 7);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ScanConfig {
            input: "page.jpg".to_string(),
            ..ScanConfig::default()
        };

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Invalid quality
        config.quality = 0;
        assert!(config.validate().is_err());
        config.quality = 95; // Reset

        // Invalid brightness
        config.brightness = 150;
        assert!(config.validate().is_err());
        config.brightness = 0; // Reset

        // Invalid contrast
        config.contrast_wire = 301;
        assert!(config.validate().is_err());
        config.contrast_wire = 100; // Reset

        // Invalid format
        config.format = "webp".to_string();
        assert!(config.validate().is_err());
        config.format = "png".to_string();

        // Invalid backend
        config.backend = "ftp".to_string();
        assert!(config.validate().is_err());
        config.backend = "drive".to_string();

        // Valid again
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_filter_name_is_identity() {
        let config = ScanConfig {
            input: "page.jpg".to_string(),
            filter: "sepia".to_string(),
            ..ScanConfig::default()
        };
        assert_eq!(config.filter_params().mode, FilterMode::Original);
    }

    #[test]
    fn test_to_scan_options_maps_wire_values() {
        let config = ScanConfig {
            input: "page.jpg".to_string(),
            filter: "grayscale".to_string(),
            brightness: -20,
            contrast_wire: 150,
            format: "png".to_string(),
            retention_days: 0,
            ..ScanConfig::default()
        };
        let options = config.to_scan_options().unwrap();
        assert_eq!(options.format, OutputFormat::Png);
        assert_eq!(options.params.mode, FilterMode::Grayscale);
        assert!((options.params.contrast - 1.5).abs() < f32::EPSILON);
        assert_eq!(options.retention, RetentionPolicy::keep_forever());
    }
}
