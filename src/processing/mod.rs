//! # Processing Module
//!
//! This module contains the per-pixel filter/tone transform applied to
//! scanned bitmaps.

pub mod filters;

// Re-export commonly used types for convenience
pub use filters::{FilterMode, FilterParams, transform};
