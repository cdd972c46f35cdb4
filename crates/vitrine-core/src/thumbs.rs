#![forbid(unsafe_code)]

//! Thumbnail strip scrolling.
//!
//! The strip is a native horizontally scrollable element. This module only
//! computes scroll positions: centring on the active thumbnail, fixed steps for
//! the strip's nav buttons, and drag-to-scroll with its own pointer tracker.
//! At most one of the strip drag and the carousel drag is active at a time;
//! [`DragSurface::admits`] decides which pointerdown may start one.

use crate::carousel::CarouselController;
use crate::config::GalleryConfig;
use crate::gesture::{CaptureCommand, GestureDispatch, GestureEvent, GestureTracker};
use crate::input::{PointerButton, PointerKind};

/// Direction of a strip nav button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Back,
    Forward,
}

/// Page surface a drag can start on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSurface {
    Carousel,
    Strip,
}

impl DragSurface {
    /// Whether a pointerdown on this surface may start a drag while the other
    /// surface's drag state is as given.
    #[must_use]
    pub fn admits(self, carousel: &CarouselController, strip: &ThumbStrip) -> bool {
        match self {
            Self::Carousel => !strip.is_dragging(),
            Self::Strip => !carousel.is_dragging(),
        }
    }
}

/// Scroll-left value that centres a thumbnail inside the strip.
#[must_use]
pub fn center_target(thumb_offset_left: f64, thumb_width: f64, strip_client_width: f64) -> f64 {
    thumb_offset_left + thumb_width / 2.0 - strip_client_width / 2.0
}

/// Result of a strip drag dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripDrag {
    /// New `scrollLeft` to assign directly (no smoothing).
    pub scroll_left: Option<f64>,
    pub capture_command: Option<CaptureCommand>,
    pub gesture: GestureDispatch,
}

impl StripDrag {
    fn from_gesture(gesture: GestureDispatch, scroll_left: Option<f64>) -> Self {
        Self {
            scroll_left,
            capture_command: gesture.capture_command,
            gesture,
        }
    }
}

/// Scroll arithmetic and drag state for the thumbnail strip.
#[derive(Debug, Clone)]
pub struct ThumbStrip {
    scroll_ratio: f64,
    fallback_width: f64,
    tracker: GestureTracker,
    start_scroll: f64,
}

impl ThumbStrip {
    #[must_use]
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            scroll_ratio: config.thumb_scroll_ratio,
            fallback_width: config.thumb_fallback_width,
            tracker: GestureTracker::new(),
            start_scroll: 0.0,
        }
    }

    /// Signed `scrollBy` amount for a nav button press.
    #[must_use]
    pub fn step(&self, direction: ScrollDirection, client_width: f64) -> f64 {
        let width = if client_width > 0.0 {
            client_width
        } else {
            self.fallback_width
        };
        let amount = (width * self.scroll_ratio).round();
        match direction {
            ScrollDirection::Back => -amount,
            ScrollDirection::Forward => amount,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.tracker.is_active()
    }

    /// Start a drag-to-scroll from the strip's current `scroll_left`.
    pub fn pointer_down(
        &mut self,
        pointer_id: i32,
        x: f64,
        scroll_left: f64,
        kind: PointerKind,
        button: PointerButton,
    ) -> StripDrag {
        let gesture = self.tracker.pointer_down(pointer_id, x, kind, button);
        if gesture.is_forwarded() {
            self.start_scroll = if scroll_left.is_finite() { scroll_left } else { 0.0 };
        }
        StripDrag::from_gesture(gesture, None)
    }

    pub fn capture_acquired(&mut self, pointer_id: i32) -> StripDrag {
        StripDrag::from_gesture(self.tracker.capture_acquired(pointer_id), None)
    }

    /// Content follows the pointer: dragging right scrolls back.
    pub fn pointer_move(&mut self, pointer_id: i32, x: f64) -> StripDrag {
        let gesture = self.tracker.pointer_move(pointer_id, x);
        let scroll_left = match gesture.event {
            Some(GestureEvent::Moved { delta_x, .. }) => Some(self.start_scroll - delta_x),
            _ => None,
        };
        StripDrag::from_gesture(gesture, scroll_left)
    }

    pub fn pointer_up(&mut self, pointer_id: i32, x: f64) -> StripDrag {
        StripDrag::from_gesture(self.tracker.pointer_up(pointer_id, x), None)
    }

    pub fn pointer_cancel(&mut self, pointer_id: Option<i32>) -> StripDrag {
        StripDrag::from_gesture(self.tracker.pointer_cancel(pointer_id), None)
    }

    pub fn lost_pointer_capture(&mut self, pointer_id: i32) -> StripDrag {
        StripDrag::from_gesture(self.tracker.lost_pointer_capture(pointer_id), None)
    }

    pub fn blur(&mut self) -> StripDrag {
        StripDrag::from_gesture(self.tracker.blur(), None)
    }

    /// Viewport resize: a drag in progress is cancelled.
    pub fn resize(&mut self) -> StripDrag {
        StripDrag::from_gesture(self.tracker.interrupt_for_resize(), None)
    }
}
