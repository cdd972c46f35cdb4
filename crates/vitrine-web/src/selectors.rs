#![forbid(unsafe_code)]

//! DOM contract: class hooks, attributes and style properties the gallery
//! reads or writes.

/// Carousel viewport; receives `pointerdown` and the `grabbing` class.
pub const CONTAINER: &str = ".main-slider";
/// Track translated to show the current slide.
pub const WRAPPER: &str = ".main-slider .swiper-wrapper";
pub const SLIDES: &str = ".main-slider .swiper-slide";
/// First slide image replaced when a swatch carries `data-img`.
pub const PRIMARY_IMAGE: &str = ".main-slider .swiper-slide:first-child .slide-img";

/// Horizontally scrollable thumbnail strip.
pub const THUMB_STRIP: &str = ".thumb-slider";
pub const THUMBS: &str = ".thumb-slider .swiper-slide";

pub const SLIDE_PREV: &str = ".slider-nav-left";
pub const SLIDE_NEXT: &str = ".slider-nav-right";
pub const THUMB_PREV: &str = ".thumb-nav-left";
pub const THUMB_NEXT: &str = ".thumb-nav-right";

pub const SWATCHES: &str = ".swatch";
pub const TINTS: &str = ".img-tint";

pub const ACTIVE_CLASS: &str = "active";
pub const GRABBING_CLASS: &str = "grabbing";

pub const DATA_COLOR: &str = "data-color";
pub const DATA_IMG: &str = "data-img";
pub const ARIA_LABEL: &str = "aria-label";
pub const ARIA_HIDDEN: &str = "aria-hidden";

pub const STYLE_TRANSFORM: &str = "transform";
pub const STYLE_TRANSITION: &str = "transition";
pub const STYLE_BACKGROUND: &str = "background";
pub const STYLE_OPACITY: &str = "opacity";
