#![forbid(unsafe_code)]

//! Tuning constants for the gallery, overridable from JSON.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Minimum absolute swipe distance in CSS pixels.
pub const DEFAULT_SWIPE_MIN_PX: f64 = 40.0;
/// Swipe distance as a fraction of the container width.
pub const DEFAULT_SWIPE_RATIO: f64 = 0.12;
/// Overlay opacity used for any non-black swatch.
pub const DEFAULT_TINT_OPACITY: f64 = 0.28;
/// Thumbnail nav buttons scroll the strip by this fraction of its width.
pub const DEFAULT_THUMB_SCROLL_RATIO: f64 = 0.6;
/// Strip width assumed when the browser reports a zero client width.
pub const DEFAULT_THUMB_FALLBACK_WIDTH: f64 = 200.0;

/// Gallery configuration.
///
/// Every field has a default, so a host may pass a partial JSON object such as
/// `{"swipe_min_px": 24}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Absolute component of the swipe threshold.
    pub swipe_min_px: f64,
    /// Relative component of the swipe threshold.
    pub swipe_ratio: f64,
    /// Overlay opacity for tinted swatches.
    pub tint_opacity: f64,
    /// Strip scroll step for the thumbnail nav buttons.
    pub thumb_scroll_ratio: f64,
    /// Strip width used when the measured width is zero.
    pub thumb_fallback_width: f64,
    /// Return to the first slide whenever a swatch is selected.
    pub reset_on_swatch: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            swipe_min_px: DEFAULT_SWIPE_MIN_PX,
            swipe_ratio: DEFAULT_SWIPE_RATIO,
            tint_opacity: DEFAULT_TINT_OPACITY,
            thumb_scroll_ratio: DEFAULT_THUMB_SCROLL_RATIO,
            thumb_fallback_width: DEFAULT_THUMB_FALLBACK_WIDTH,
            reset_on_swatch: true,
        }
    }
}

impl GalleryConfig {
    /// Parse and validate a JSON configuration object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every tuning value against its legal range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(
            "swipe_min_px",
            self.swipe_min_px,
            self.swipe_min_px > 0.0,
        )?;
        check(
            "swipe_ratio",
            self.swipe_ratio,
            (0.0..=1.0).contains(&self.swipe_ratio),
        )?;
        check(
            "tint_opacity",
            self.tint_opacity,
            (0.0..=1.0).contains(&self.tint_opacity),
        )?;
        check(
            "thumb_scroll_ratio",
            self.thumb_scroll_ratio,
            self.thumb_scroll_ratio > 0.0 && self.thumb_scroll_ratio <= 1.0,
        )?;
        check(
            "thumb_fallback_width",
            self.thumb_fallback_width,
            self.thumb_fallback_width > 0.0,
        )?;
        Ok(())
    }

    /// Swipe threshold for a container of `width` pixels.
    #[must_use]
    pub fn swipe_threshold(&self, width: f64) -> f64 {
        self.swipe_min_px.max(width.max(0.0) * self.swipe_ratio)
    }
}

fn check(field: &'static str, value: f64, in_range: bool) -> Result<(), ConfigError> {
    if value.is_finite() && in_range {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

/// Configuration rejected at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The JSON text did not deserialize.
    Parse(String),
    /// A numeric field is non-finite or outside its legal range.
    OutOfRange { field: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid gallery config: {msg}"),
            Self::OutOfRange { field, value } => {
                write!(f, "gallery config field `{field}` out of range (got {value})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
