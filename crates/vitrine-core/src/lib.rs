#![forbid(unsafe_code)]

//! `vitrine-core` holds the deterministic state behind a product-page gallery.
//!
//! Design goals:
//! - **Host-driven**: the embedding layer (DOM/JS) pushes measured geometry and
//!   input events; nothing here touches the page.
//! - **Render plans, not side effects**: every operation returns a value that
//!   describes the DOM mutation to apply, so behaviour is testable natively.
//! - **One pointer per gesture**: drag tracking follows a single captured
//!   pointer and ignores everything else.
//!
//! `vitrine-web` wraps these building blocks with `wasm-bindgen` listeners.

pub mod capabilities;
pub mod carousel;
pub mod config;
pub mod gesture;
pub mod input;
pub mod swatch;
pub mod thumbs;

pub use capabilities::{Capabilities, MountError, PageInventory};
pub use carousel::{
    CarouselController, CarouselDispatch, CarouselInput, CarouselPhase, Render, Selection,
    SlideChange, TrackTransform,
};
pub use config::{ConfigError, GalleryConfig};
pub use gesture::{
    CancelReason, CaptureCommand, GestureDispatch, GestureEvent, GestureLogEntry, GestureOutcome,
    GesturePhase, GestureTracker, IgnoredReason,
};
pub use input::{NavKey, PointerButton, PointerKind, is_activation_key};
pub use swatch::{Swatch, SwatchSelection, SwatchSet, Tint};
pub use thumbs::{DragSurface, ScrollDirection, StripDrag, ThumbStrip, center_target};
