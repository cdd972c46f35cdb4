#![forbid(unsafe_code)]

//! Colour swatches and the tint overlay they drive.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GalleryConfig;

/// Overlay state applied uniformly to every `.img-tint` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tint", rename_all = "snake_case")]
pub enum Tint {
    /// No visible overlay.
    Clear,
    /// Semi-transparent colour wash.
    Overlay { color: String, opacity: f64 },
}

impl Tint {
    /// Map a swatch colour to its overlay. Black, or no colour at all, clears
    /// the overlay instead of darkening the product.
    #[must_use]
    pub fn for_color(color: Option<&str>, opacity: f64) -> Self {
        match color.map(str::trim) {
            Some(color) if !is_black(color) => Self::Overlay {
                color: color.to_owned(),
                opacity,
            },
            _ => Self::Clear,
        }
    }

    /// CSS `background` value.
    #[must_use]
    pub fn background(&self) -> &str {
        match self {
            Self::Clear => "transparent",
            Self::Overlay { color, .. } => color,
        }
    }

    /// CSS `opacity` value.
    #[must_use]
    pub fn opacity(&self) -> String {
        match self {
            Self::Clear => "0".to_owned(),
            Self::Overlay { opacity, .. } => opacity.to_string(),
        }
    }
}

fn is_black(color: &str) -> bool {
    color.is_empty()
        || ["#000", "#000000", "black"]
            .iter()
            .any(|black| color.eq_ignore_ascii_case(black))
}

/// One selectable colour option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    /// `data-color`.
    pub color: Option<String>,
    /// `data-img`: replacement source for the first slide image.
    pub image: Option<String>,
    /// `aria-label`.
    pub label: Option<String>,
}

/// What the host must do after a swatch is chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct SwatchSelection {
    pub index: usize,
    pub tint: Tint,
    pub image: Option<String>,
    /// Return the carousel to slide 0 so a swapped image is visible.
    pub reset_carousel: bool,
}

/// The page's swatches with at most one active.
#[derive(Debug, Clone)]
pub struct SwatchSet {
    swatches: Vec<Swatch>,
    active: Option<usize>,
    tint_opacity: f64,
    reset_on_select: bool,
}

impl SwatchSet {
    /// `initially_active` is the swatch already marked `.active` in markup.
    #[must_use]
    pub fn new(swatches: Vec<Swatch>, initially_active: Option<usize>, config: &GalleryConfig) -> Self {
        let active = initially_active.filter(|&index| index < swatches.len());
        Self {
            swatches,
            active,
            tint_opacity: config.tint_opacity,
            reset_on_select: config.reset_on_swatch,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    /// Tint for the swatch marked active at mount, if any.
    #[must_use]
    pub fn initial_tint(&self) -> Option<Tint> {
        let swatch = self.swatches.get(self.active?)?;
        Some(Tint::for_color(swatch.color.as_deref(), self.tint_opacity))
    }

    /// Make `index` the only active swatch. Returns `None` for an unknown
    /// index and leaves the current selection untouched.
    pub fn select(&mut self, index: usize) -> Option<SwatchSelection> {
        let swatch = self.swatches.get(index)?;
        let tint = Tint::for_color(swatch.color.as_deref(), self.tint_opacity);
        let image = swatch.image.clone().filter(|src| !src.is_empty());
        debug!(
            index,
            label = ?swatch.label,
            ?tint,
            swap_image = image.is_some(),
            "swatch selected"
        );
        self.active = Some(index);
        Some(SwatchSelection {
            index,
            tint,
            image,
            reset_carousel: self.reset_on_select,
        })
    }
}
