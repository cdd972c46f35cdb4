#![forbid(unsafe_code)]

//! `vitrine-web` binds [`vitrine_core`] to a product page through
//! `wasm-bindgen`.
//!
//! The host page loads the generated module and calls
//! `mountProductGallery(configJson?)` once the DOM is ready. Mounting queries
//! the class hooks listed in [`selectors`], wires pointer/keyboard/click
//! listeners, and applies the render plans produced by the core controllers.
//!
//! Only the DOM glue is wasm32-specific; selector names and config resolution
//! compile everywhere so they can be tested natively.

pub mod selectors;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{ProductGallery, mount_product_gallery};

use tracing::warn;
use vitrine_core::GalleryConfig;

/// Resolve the optional host-supplied config, falling back to defaults when
/// it is absent, blank, or rejected.
#[must_use]
pub fn resolve_config(config_json: Option<&str>) -> GalleryConfig {
    let Some(json) = config_json.map(str::trim).filter(|json| !json.is_empty()) else {
        return GalleryConfig::default();
    };
    GalleryConfig::from_json(json).unwrap_or_else(|err| {
        warn!(error = %err, "ignoring gallery config");
        GalleryConfig::default()
    })
}
