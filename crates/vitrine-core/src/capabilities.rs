#![forbid(unsafe_code)]

//! Feature detection performed once when the gallery mounts.
//!
//! The host counts what it found in the page into a [`PageInventory`];
//! [`Capabilities::detect`] turns that into either a flag set of optional
//! features or a [`MountError`] when a required element is missing.

use core::fmt;

use bitflags::bitflags;

bitflags! {
    /// Optional gallery features backed by elements present in the page.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Scrollable thumbnail strip (`.thumb-slider`).
        const THUMB_STRIP   = 0b0000_0001;
        /// At least one main prev/next button.
        const SLIDE_NAV     = 0b0000_0010;
        /// At least one strip scroll button (requires the strip).
        const THUMB_NAV     = 0b0000_0100;
        /// One or more `.swatch` options.
        const SWATCHES      = 0b0000_1000;
        /// One or more `.img-tint` overlays.
        const TINT_OVERLAYS = 0b0001_0000;
        /// First slide carries a swappable `.slide-img`.
        const PRIMARY_IMAGE = 0b0010_0000;
    }
}

/// Counts and presence bits measured from the page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageInventory {
    pub has_container: bool,
    pub has_wrapper: bool,
    pub slide_count: usize,
    pub thumb_count: usize,
    pub has_thumb_strip: bool,
    pub has_prev_button: bool,
    pub has_next_button: bool,
    pub has_thumb_prev_button: bool,
    pub has_thumb_next_button: bool,
    pub swatch_count: usize,
    pub tint_count: usize,
    pub has_primary_image: bool,
}

impl Capabilities {
    /// Resolve optional features, or fail if the carousel cannot run at all.
    pub fn detect(inventory: &PageInventory) -> Result<Self, MountError> {
        if !inventory.has_container {
            return Err(MountError::MissingContainer);
        }
        if !inventory.has_wrapper {
            return Err(MountError::MissingWrapper);
        }
        if inventory.slide_count == 0 {
            return Err(MountError::NoSlides);
        }

        let mut caps = Self::empty();
        caps.set(Self::THUMB_STRIP, inventory.has_thumb_strip);
        caps.set(
            Self::SLIDE_NAV,
            inventory.has_prev_button || inventory.has_next_button,
        );
        caps.set(
            Self::THUMB_NAV,
            inventory.has_thumb_strip
                && (inventory.has_thumb_prev_button || inventory.has_thumb_next_button),
        );
        caps.set(Self::SWATCHES, inventory.swatch_count > 0);
        caps.set(Self::TINT_OVERLAYS, inventory.tint_count > 0);
        caps.set(Self::PRIMARY_IMAGE, inventory.has_primary_image);
        Ok(caps)
    }
}

/// A required element is absent, so the gallery stays inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountError {
    MissingContainer,
    MissingWrapper,
    NoSlides,
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContainer => write!(f, "carousel container `.main-slider` not found"),
            Self::MissingWrapper => write!(f, "slide wrapper `.swiper-wrapper` not found"),
            Self::NoSlides => write!(f, "carousel has no slides"),
        }
    }
}

impl std::error::Error for MountError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> PageInventory {
        PageInventory {
            has_container: true,
            has_wrapper: true,
            slide_count: 3,
            ..PageInventory::default()
        }
    }

    #[test]
    fn required_elements_gate_mounting() {
        assert_eq!(
            Capabilities::detect(&PageInventory::default()),
            Err(MountError::MissingContainer)
        );
        let no_wrapper = PageInventory {
            has_wrapper: false,
            ..minimal()
        };
        assert_eq!(
            Capabilities::detect(&no_wrapper),
            Err(MountError::MissingWrapper)
        );
        let no_slides = PageInventory {
            slide_count: 0,
            ..minimal()
        };
        assert_eq!(Capabilities::detect(&no_slides), Err(MountError::NoSlides));
    }

    #[test]
    fn bare_carousel_has_no_optional_features() {
        assert_eq!(Capabilities::detect(&minimal()), Ok(Capabilities::empty()));
    }

    #[test]
    fn thumb_nav_requires_strip() {
        let buttons_only = PageInventory {
            has_thumb_prev_button: true,
            has_thumb_next_button: true,
            ..minimal()
        };
        let caps = Capabilities::detect(&buttons_only).expect("mountable");
        assert!(!caps.contains(Capabilities::THUMB_NAV));

        let with_strip = PageInventory {
            has_thumb_strip: true,
            ..buttons_only
        };
        let caps = Capabilities::detect(&with_strip).expect("mountable");
        assert!(caps.contains(Capabilities::THUMB_STRIP | Capabilities::THUMB_NAV));
    }

    #[test]
    fn single_nav_button_enables_slide_nav() {
        let inventory = PageInventory {
            has_next_button: true,
            swatch_count: 2,
            tint_count: 1,
            ..minimal()
        };
        let caps = Capabilities::detect(&inventory).expect("mountable");
        assert!(caps.contains(Capabilities::SLIDE_NAV));
        assert!(caps.contains(Capabilities::SWATCHES | Capabilities::TINT_OVERLAYS));
        assert!(!caps.contains(Capabilities::PRIMARY_IMAGE));
    }
}
