#![forbid(unsafe_code)]

//! Carousel controller: slide index, render contract and swipe recognition.
//!
//! The controller is an explicit `{Idle, Dragging}` state machine driven by
//! named [`CarouselInput`] values. It never touches the DOM; every input yields
//! a [`CarouselDispatch`] that carries the [`Render`] plan and any pointer
//! capture command for the host to apply.

use tracing::{debug, warn};

use crate::capabilities::{Capabilities, MountError};
use crate::config::GalleryConfig;
use crate::gesture::{
    CaptureCommand, GestureDispatch, GestureEvent, GestureLogEntry, GestureTracker,
};
use crate::input::{NavKey, PointerButton, PointerKind};

/// Horizontal transform applied to the slide wrapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackTransform {
    /// Resting position, `-index * 100%`, animated by the stylesheet.
    Percent { index: usize },
    /// Pixel offset tracking an active drag 1:1, no transition.
    Pixels { offset: f64 },
}

impl TrackTransform {
    /// CSS `transform` value.
    #[must_use]
    pub fn css(&self) -> String {
        match self {
            Self::Percent { index } => format!("translateX({}%)", -(*index as i64) * 100),
            Self::Pixels { offset } => format!("translateX({offset}px)"),
        }
    }

    /// CSS `transition` value; empty restores the stylesheet transition.
    #[must_use]
    pub const fn transition(&self) -> &'static str {
        match self {
            Self::Percent { .. } => "",
            Self::Pixels { .. } => "none",
        }
    }
}

/// Which slide and thumbnail are marked current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    /// Scroll the thumbnail strip so the active thumbnail is centred.
    pub center_thumb: bool,
}

impl Selection {
    /// Value for a slide's `aria-hidden` attribute.
    #[must_use]
    pub const fn slide_aria_hidden(&self, slide: usize) -> &'static str {
        if slide == self.index { "false" } else { "true" }
    }

    #[must_use]
    pub const fn thumb_active(&self, thumb: usize) -> bool {
        thumb == self.index
    }
}

/// DOM mutations for one render.
///
/// Drag moves carry only a transform; everything else carries a full
/// selection sync as well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Render {
    pub transform: TrackTransform,
    pub selection: Option<Selection>,
}

/// Current phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselPhase {
    Idle,
    Dragging { pointer_id: i32, delta_x: f64 },
}

/// Index transition caused by one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChange {
    pub from: usize,
    pub to: usize,
}

/// Named inputs accepted by [`CarouselController::handle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselInput {
    Next,
    Prev,
    GoTo(usize),
    Key(NavKey),
    PointerDown {
        pointer_id: i32,
        x: f64,
        kind: PointerKind,
        button: PointerButton,
        container_width: f64,
    },
    CaptureAcquired {
        pointer_id: i32,
    },
    PointerMove {
        pointer_id: i32,
        x: f64,
    },
    PointerUp {
        pointer_id: i32,
        x: f64,
    },
    PointerCancel {
        pointer_id: Option<i32>,
    },
    LostPointerCapture {
        pointer_id: i32,
    },
    Blur,
    Resize {
        container_width: f64,
    },
}

/// Everything the host needs to apply after one input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarouselDispatch {
    pub render: Option<Render>,
    pub change: Option<SlideChange>,
    pub capture_command: Option<CaptureCommand>,
    /// `Some(true)` when a drag starts, `Some(false)` when it ends.
    pub grabbing: Option<bool>,
    pub gesture: Option<GestureLogEntry>,
    /// A `GoTo` target was out of range and got clamped.
    pub clamped: bool,
}

impl CarouselDispatch {
    fn rendered(render: Render, change: Option<SlideChange>) -> Self {
        Self {
            render: Some(render),
            change,
            ..Self::default()
        }
    }

    fn with_gesture(mut self, gesture: &GestureDispatch) -> Self {
        self.capture_command = gesture.capture_command;
        self.gesture = Some(gesture.log);
        self
    }
}

/// Owns the slide index and the drag gesture for one carousel.
#[derive(Debug, Clone)]
pub struct CarouselController {
    index: usize,
    slide_count: usize,
    thumb_count: usize,
    container_width: f64,
    config: GalleryConfig,
    capabilities: Capabilities,
    tracker: GestureTracker,
}

impl CarouselController {
    /// Build a controller at slide 0.
    pub fn new(
        slide_count: usize,
        thumb_count: usize,
        container_width: f64,
        config: GalleryConfig,
        capabilities: Capabilities,
    ) -> Result<Self, MountError> {
        if slide_count == 0 {
            return Err(MountError::NoSlides);
        }
        Ok(Self {
            index: 0,
            slide_count,
            thumb_count,
            container_width: sanitize_width(container_width).unwrap_or(0.0),
            config,
            capabilities,
            tracker: GestureTracker::new(),
        })
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn slide_count(&self) -> usize {
        self.slide_count
    }

    #[must_use]
    pub const fn container_width(&self) -> f64 {
        self.container_width
    }

    #[must_use]
    pub const fn config(&self) -> &GalleryConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> CarouselPhase {
        match (self.tracker.active_pointer_id(), self.tracker.delta_x()) {
            (Some(pointer_id), Some(delta_x)) => CarouselPhase::Dragging {
                pointer_id,
                delta_x,
            },
            _ => CarouselPhase::Idle,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.tracker.is_active()
    }

    /// Minimum horizontal travel that turns a drag into a slide change.
    #[must_use]
    pub fn swipe_threshold(&self) -> f64 {
        self.config.swipe_threshold(self.container_width)
    }

    /// Resting pixel offset of slide `index`.
    fn base_offset(&self, index: usize) -> f64 {
        -(index as f64) * self.container_width
    }

    /// Full render for the current state.
    #[must_use]
    pub fn update(&self) -> Render {
        let transform = match self.phase() {
            CarouselPhase::Idle => TrackTransform::Percent { index: self.index },
            CarouselPhase::Dragging { delta_x, .. } => TrackTransform::Pixels {
                offset: self.base_offset(self.index) + delta_x,
            },
        };
        Render {
            transform,
            selection: Some(Selection {
                index: self.index,
                center_thumb: self.capabilities.contains(Capabilities::THUMB_STRIP)
                    && self.index < self.thumb_count,
            }),
        }
    }

    /// Dispatch a named input.
    pub fn handle(&mut self, input: CarouselInput) -> CarouselDispatch {
        match input {
            CarouselInput::Next => self.next(),
            CarouselInput::Prev => self.prev(),
            CarouselInput::GoTo(index) => self.go_to(index),
            CarouselInput::Key(NavKey::Next) => self.next(),
            CarouselInput::Key(NavKey::Prev) => self.prev(),
            CarouselInput::PointerDown {
                pointer_id,
                x,
                kind,
                button,
                container_width,
            } => self.pointer_down(pointer_id, x, kind, button, container_width),
            CarouselInput::CaptureAcquired { pointer_id } => self.capture_acquired(pointer_id),
            CarouselInput::PointerMove { pointer_id, x } => self.pointer_move(pointer_id, x),
            CarouselInput::PointerUp { pointer_id, x } => self.pointer_up(pointer_id, x),
            CarouselInput::PointerCancel { pointer_id } => self.pointer_cancel(pointer_id),
            CarouselInput::LostPointerCapture { pointer_id } => {
                self.lost_pointer_capture(pointer_id)
            }
            CarouselInput::Blur => self.blur(),
            CarouselInput::Resize { container_width } => self.recalc(container_width),
        }
    }

    /// Advance one slide, wrapping to the first.
    pub fn next(&mut self) -> CarouselDispatch {
        self.move_to((self.index + 1) % self.slide_count)
    }

    /// Retreat one slide, wrapping to the last.
    pub fn prev(&mut self) -> CarouselDispatch {
        self.move_to((self.index + self.slide_count - 1) % self.slide_count)
    }

    /// Jump to `index`, clamping out-of-range targets to the last slide.
    pub fn go_to(&mut self, index: usize) -> CarouselDispatch {
        let last = self.slide_count - 1;
        if index > last {
            warn!(requested = index, slide_count = self.slide_count, "slide index clamped");
            let mut dispatch = self.move_to(last);
            dispatch.clamped = true;
            return dispatch;
        }
        self.move_to(index)
    }

    fn move_to(&mut self, to: usize) -> CarouselDispatch {
        let from = self.index;
        self.index = to;
        let change = (from != to).then_some(SlideChange { from, to });
        if change.is_some() {
            debug!(from, to, "slide change");
        }
        CarouselDispatch::rendered(self.update(), change)
    }

    /// Begin a drag. `container_width` is re-measured by the host at press
    /// time so responsive layout changes are absorbed.
    pub fn pointer_down(
        &mut self,
        pointer_id: i32,
        x: f64,
        kind: PointerKind,
        button: PointerButton,
        container_width: f64,
    ) -> CarouselDispatch {
        let gesture = self.tracker.pointer_down(pointer_id, x, kind, button);
        log_gesture(&gesture);
        if !gesture.is_forwarded() {
            return CarouselDispatch::default().with_gesture(&gesture);
        }
        if let Some(width) = sanitize_width(container_width) {
            self.container_width = width;
        }
        CarouselDispatch {
            grabbing: Some(true),
            ..CarouselDispatch::default()
        }
        .with_gesture(&gesture)
    }

    /// Host confirmation that `setPointerCapture` succeeded.
    pub fn capture_acquired(&mut self, pointer_id: i32) -> CarouselDispatch {
        let gesture = self.tracker.capture_acquired(pointer_id);
        log_gesture(&gesture);
        CarouselDispatch::default().with_gesture(&gesture)
    }

    /// Track the drag with a pixel transform.
    pub fn pointer_move(&mut self, pointer_id: i32, x: f64) -> CarouselDispatch {
        let gesture = self.tracker.pointer_move(pointer_id, x);
        let Some(GestureEvent::Moved { delta_x, .. }) = gesture.event else {
            return CarouselDispatch::default().with_gesture(&gesture);
        };
        let render = Render {
            transform: TrackTransform::Pixels {
                offset: self.base_offset(self.index) + delta_x,
            },
            selection: None,
        };
        CarouselDispatch {
            render: Some(render),
            ..CarouselDispatch::default()
        }
        .with_gesture(&gesture)
    }

    /// Finish the drag: swipe right goes back, swipe left goes forward,
    /// anything shorter than the threshold snaps back.
    pub fn pointer_up(&mut self, pointer_id: i32, x: f64) -> CarouselDispatch {
        let gesture = self.tracker.pointer_up(pointer_id, x);
        log_gesture(&gesture);
        let Some(GestureEvent::Ended { delta_x, .. }) = gesture.event else {
            return CarouselDispatch::default().with_gesture(&gesture);
        };

        // A release where the pointer never moved is a tap, never a swipe.
        let threshold = self.swipe_threshold();
        let mut dispatch = if delta_x != 0.0 && delta_x >= threshold {
            self.prev()
        } else if delta_x != 0.0 && delta_x <= -threshold {
            self.next()
        } else {
            CarouselDispatch::rendered(self.update(), None)
        };
        dispatch.grabbing = Some(false);
        dispatch.with_gesture(&gesture)
    }

    /// Browser `pointercancel`: abandon the drag and snap back.
    pub fn pointer_cancel(&mut self, pointer_id: Option<i32>) -> CarouselDispatch {
        let gesture = self.tracker.pointer_cancel(pointer_id);
        self.snap_back(&gesture)
    }

    /// Browser `lostpointercapture`: abandon the drag and snap back.
    pub fn lost_pointer_capture(&mut self, pointer_id: i32) -> CarouselDispatch {
        let gesture = self.tracker.lost_pointer_capture(pointer_id);
        self.snap_back(&gesture)
    }

    /// Window blur: abandon the drag and snap back.
    pub fn blur(&mut self) -> CarouselDispatch {
        let gesture = self.tracker.blur();
        self.snap_back(&gesture)
    }

    fn snap_back(&mut self, gesture: &GestureDispatch) -> CarouselDispatch {
        log_gesture(gesture);
        if !gesture.is_forwarded() {
            return CarouselDispatch::default().with_gesture(gesture);
        }
        CarouselDispatch {
            grabbing: Some(false),
            ..CarouselDispatch::rendered(self.update(), None)
        }
        .with_gesture(gesture)
    }

    /// Viewport resize: re-measure and re-render at the current index.
    ///
    /// A drag in progress was measured against the old width, so it is
    /// cancelled rather than resumed.
    pub fn recalc(&mut self, container_width: f64) -> CarouselDispatch {
        let interrupted = self
            .tracker
            .is_active()
            .then(|| self.tracker.interrupt_for_resize());
        if let Some(width) = sanitize_width(container_width) {
            self.container_width = width;
        }
        let dispatch = CarouselDispatch::rendered(self.update(), None);
        match interrupted {
            Some(gesture) => {
                log_gesture(&gesture);
                CarouselDispatch {
                    grabbing: Some(false),
                    ..dispatch
                }
                .with_gesture(&gesture)
            }
            None => dispatch,
        }
    }
}

fn sanitize_width(width: f64) -> Option<f64> {
    width.is_finite().then(|| width.max(0.0))
}

fn log_gesture(gesture: &GestureDispatch) {
    debug!(entry = %gesture.log.to_jsonl(), "carousel gesture");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{GestureOutcome, IgnoredReason};
    use pretty_assertions::assert_eq;

    fn controller(slides: usize, width: f64) -> CarouselController {
        CarouselController::new(
            slides,
            slides,
            width,
            GalleryConfig::default(),
            Capabilities::THUMB_STRIP,
        )
        .expect("non-empty carousel")
    }

    fn touch_down(c: &mut CarouselController, id: i32, x: f64) -> CarouselDispatch {
        let width = c.container_width();
        c.pointer_down(id, x, PointerKind::Touch, PointerButton::Primary, width)
    }

    #[test]
    fn empty_carousel_is_rejected() {
        let result = CarouselController::new(
            0,
            0,
            800.0,
            GalleryConfig::default(),
            Capabilities::empty(),
        );
        assert_eq!(result.err(), Some(MountError::NoSlides));
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut c = controller(3, 600.0);
        let dispatch = c.prev();
        assert_eq!(c.index(), 2);
        assert_eq!(dispatch.change, Some(SlideChange { from: 0, to: 2 }));
        c.next();
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn single_slide_navigation_is_a_no_change_render() {
        let mut c = controller(1, 600.0);
        let dispatch = c.next();
        assert_eq!(c.index(), 0);
        assert_eq!(dispatch.change, None);
        assert!(dispatch.render.is_some());
    }

    #[test]
    fn go_to_renders_percent_transform_and_selection() {
        let mut c = controller(5, 600.0);
        let render = c.go_to(3).render.expect("render");
        assert_eq!(render.transform, TrackTransform::Percent { index: 3 });
        assert_eq!(render.transform.css(), "translateX(-300%)");
        assert_eq!(render.transform.transition(), "");
        assert_eq!(TrackTransform::Percent { index: 0 }.css(), "translateX(0%)");
        let selection = render.selection.expect("selection");
        assert!(selection.thumb_active(3));
        assert!(!selection.thumb_active(2));
        assert_eq!(selection.slide_aria_hidden(3), "false");
        assert_eq!(selection.slide_aria_hidden(0), "true");
        assert!(selection.center_thumb);
    }

    #[test]
    fn go_to_out_of_range_clamps() {
        let mut c = controller(4, 600.0);
        let dispatch = c.go_to(99);
        assert!(dispatch.clamped);
        assert_eq!(c.index(), 3);
    }

    #[test]
    #[tracing_test::traced_test]
    fn clamped_go_to_is_logged() {
        let mut c = controller(2, 600.0);
        c.go_to(7);
        assert!(logs_contain("slide index clamped"));
        c.go_to(0);
        assert!(logs_contain("slide change"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn gesture_dispatches_are_logged_as_jsonl() {
        let mut c = controller(3, 500.0);
        touch_down(&mut c, 4, 120.0);
        assert!(logs_contain("carousel gesture"));
        assert!(logs_contain(r#""phase":"pointer_down""#));
        assert!(logs_contain(r#""command":"acquire""#));
    }

    #[test]
    fn tap_never_changes_slide_even_with_zero_threshold() {
        let config = GalleryConfig {
            swipe_min_px: 0.0,
            swipe_ratio: 0.0,
            ..GalleryConfig::default()
        };
        let mut c =
            CarouselController::new(3, 3, 500.0, config, Capabilities::empty()).expect("slides");
        assert_eq!(c.swipe_threshold(), 0.0);
        touch_down(&mut c, 1, 100.0);
        let up = c.pointer_up(1, 100.0);
        assert_eq!(up.change, None);
        assert_eq!(c.index(), 0);
        assert_eq!(
            up.render.map(|render| render.transform),
            Some(TrackTransform::Percent { index: 0 })
        );

        touch_down(&mut c, 1, 100.0);
        c.pointer_up(1, 99.0);
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn drag_move_renders_pixels_without_selection() {
        let mut c = controller(3, 500.0);
        c.go_to(1);
        let down = touch_down(&mut c, 7, 300.0);
        assert_eq!(down.grabbing, Some(true));
        assert_eq!(down.capture_command, Some(CaptureCommand::Acquire { pointer_id: 7 }));
        assert_eq!(
            c.phase(),
            CarouselPhase::Dragging {
                pointer_id: 7,
                delta_x: 0.0
            }
        );

        let render = c.pointer_move(7, 280.0).render.expect("render");
        assert_eq!(render.transform, TrackTransform::Pixels { offset: -520.0 });
        assert_eq!(render.transform.css(), "translateX(-520px)");
        assert_eq!(render.transform.transition(), "none");
        assert_eq!(render.selection, None);
    }

    #[test]
    fn foreign_pointer_move_is_ignored() {
        let mut c = controller(3, 500.0);
        touch_down(&mut c, 1, 0.0);
        let dispatch = c.pointer_move(2, 400.0);
        assert_eq!(dispatch.render, None);
        assert_eq!(
            dispatch.gesture.map(|log| log.outcome),
            Some(GestureOutcome::Ignored(IgnoredReason::PointerMismatch))
        );
    }

    #[test]
    fn swipe_left_advances_and_swipe_right_retreats() {
        let mut c = controller(4, 500.0);
        touch_down(&mut c, 1, 400.0);
        let up = c.pointer_up(1, 300.0);
        assert_eq!(up.change, Some(SlideChange { from: 0, to: 1 }));
        assert_eq!(up.grabbing, Some(false));
        assert_eq!(c.phase(), CarouselPhase::Idle);

        touch_down(&mut c, 1, 100.0);
        let up = c.pointer_up(1, 250.0);
        assert_eq!(up.change, Some(SlideChange { from: 1, to: 0 }));
    }

    #[test]
    fn short_drag_snaps_back() {
        let mut c = controller(4, 500.0);
        c.go_to(2);
        touch_down(&mut c, 1, 200.0);
        c.pointer_move(1, 180.0);
        let up = c.pointer_up(1, 180.0);
        assert_eq!(up.change, None);
        assert_eq!(c.index(), 2);
        assert_eq!(
            up.render.map(|r| r.transform),
            Some(TrackTransform::Percent { index: 2 })
        );
    }

    #[test]
    fn resize_mid_drag_cancels_gesture() {
        let mut c = controller(3, 500.0);
        touch_down(&mut c, 3, 0.0);
        c.capture_acquired(3);
        c.pointer_move(3, -300.0);
        let dispatch = c.recalc(800.0);
        assert!(!c.is_dragging());
        assert_eq!(c.index(), 0);
        assert_eq!(c.container_width(), 800.0);
        assert_eq!(dispatch.grabbing, Some(false));
        assert_eq!(
            dispatch.capture_command,
            Some(CaptureCommand::Release { pointer_id: 3 })
        );
        // The abandoned pointer's release no longer swipes.
        let up = c.pointer_up(3, -300.0);
        assert_eq!(up.change, None);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn update_while_dragging_uses_pixels() {
        let mut c = controller(3, 400.0);
        touch_down(&mut c, 1, 100.0);
        c.pointer_move(1, 130.0);
        let dispatch = c.next();
        assert_eq!(
            dispatch.render.map(|r| r.transform),
            Some(TrackTransform::Pixels { offset: -370.0 })
        );
    }

    #[test]
    fn handle_routes_named_inputs() {
        let mut c = controller(3, 400.0);
        c.handle(CarouselInput::Key(NavKey::Next));
        c.handle(CarouselInput::Key(NavKey::Next));
        assert_eq!(c.index(), 2);
        c.handle(CarouselInput::PointerDown {
            pointer_id: 5,
            x: 0.0,
            kind: PointerKind::Mouse,
            button: PointerButton::Primary,
            container_width: 400.0,
        });
        let dispatch = c.handle(CarouselInput::PointerUp {
            pointer_id: 5,
            x: -60.0,
        });
        assert_eq!(dispatch.change, Some(SlideChange { from: 2, to: 0 }));
    }

    #[test]
    fn center_thumb_requires_strip_and_matching_thumb() {
        let mut c = CarouselController::new(
            3,
            2,
            400.0,
            GalleryConfig::default(),
            Capabilities::THUMB_STRIP,
        )
        .expect("non-empty carousel");
        c.go_to(2);
        let selection = c.update().selection.expect("selection");
        assert!(!selection.center_thumb);

        let c = CarouselController::new(
            3,
            3,
            400.0,
            GalleryConfig::default(),
            Capabilities::empty(),
        )
        .expect("non-empty carousel");
        assert!(!c.update().selection.expect("selection").center_thumb);
    }
}
