#![forbid(unsafe_code)]

//! End-to-end gesture scenarios replayed against the public controller API.
//!
//! Each scenario is a script of host inputs; the assertions cover what a DOM
//! host would observe: transforms, selection sync, capture commands and the
//! `grabbing` class toggle.
//!
//! Run:
//!   cargo test -p vitrine-core --test gesture_scenarios

use pretty_assertions::assert_eq;
use vitrine_core::{
    Capabilities, CaptureCommand, CarouselController, CarouselInput, DragSurface, GalleryConfig,
    GestureOutcome, NavKey, PointerButton, PointerKind, SlideChange, SwatchSet, Swatch, ThumbStrip,
    TrackTransform,
};

const WIDTH: f64 = 500.0;

fn gallery(slides: usize) -> CarouselController {
    CarouselController::new(
        slides,
        slides,
        WIDTH,
        GalleryConfig::default(),
        Capabilities::THUMB_STRIP | Capabilities::SLIDE_NAV,
    )
    .expect("non-empty carousel")
}

fn down(pointer_id: i32, x: f64) -> CarouselInput {
    CarouselInput::PointerDown {
        pointer_id,
        x,
        kind: PointerKind::Touch,
        button: PointerButton::Primary,
        container_width: WIDTH,
    }
}

fn transforms(controller: &mut CarouselController, script: &[CarouselInput]) -> Vec<String> {
    script
        .iter()
        .filter_map(|input| controller.handle(*input).render)
        .map(|render| render.transform.css())
        .collect()
}

#[test]
fn full_swipe_tracks_finger_then_settles_on_next_slide() {
    let mut c = gallery(3);
    let script = [
        down(1, 400.0),
        CarouselInput::CaptureAcquired { pointer_id: 1 },
        CarouselInput::PointerMove {
            pointer_id: 1,
            x: 350.0,
        },
        CarouselInput::PointerMove {
            pointer_id: 1,
            x: 250.0,
        },
        CarouselInput::PointerUp {
            pointer_id: 1,
            x: 250.0,
        },
    ];
    assert_eq!(
        transforms(&mut c, &script),
        vec![
            "translateX(-50px)".to_owned(),
            "translateX(-150px)".to_owned(),
            "translateX(-100%)".to_owned(),
        ]
    );
    assert_eq!(c.index(), 1);
}

#[test]
fn capture_lifecycle_is_symmetric() {
    let mut c = gallery(3);
    let pressed = c.handle(down(9, 100.0));
    assert_eq!(
        pressed.capture_command,
        Some(CaptureCommand::Acquire { pointer_id: 9 })
    );
    assert_eq!(pressed.grabbing, Some(true));
    c.handle(CarouselInput::CaptureAcquired { pointer_id: 9 });
    let released = c.handle(CarouselInput::PointerUp {
        pointer_id: 9,
        x: 100.0,
    });
    assert_eq!(
        released.capture_command,
        Some(CaptureCommand::Release { pointer_id: 9 })
    );
    assert_eq!(released.grabbing, Some(false));
}

#[test]
fn second_finger_is_ignored_during_swipe() {
    let mut c = gallery(4);
    c.handle(down(1, 300.0));
    let intruder = c.handle(down(2, 0.0));
    assert_eq!(intruder.render, None);
    assert_eq!(intruder.capture_command, None);
    c.handle(CarouselInput::PointerUp {
        pointer_id: 2,
        x: 500.0,
    });
    assert_eq!(c.index(), 0);
    assert!(c.is_dragging());
    let done = c.handle(CarouselInput::PointerUp {
        pointer_id: 1,
        x: 200.0,
    });
    assert_eq!(done.change, Some(SlideChange { from: 0, to: 1 }));
}

#[test]
fn pointercancel_snaps_back_without_changing_slide() {
    let mut c = gallery(3);
    c.handle(CarouselInput::GoTo(2));
    c.handle(down(4, 0.0));
    c.handle(CarouselInput::PointerMove {
        pointer_id: 4,
        x: -400.0,
    });
    let cancelled = c.handle(CarouselInput::PointerCancel {
        pointer_id: Some(4),
    });
    assert_eq!(cancelled.change, None);
    assert_eq!(
        cancelled.render.map(|r| r.transform),
        Some(TrackTransform::Percent { index: 2 })
    );
    assert_eq!(cancelled.grabbing, Some(false));
}

#[test]
fn blur_and_lost_capture_end_drags() {
    let mut c = gallery(3);
    c.handle(down(1, 0.0));
    c.handle(CarouselInput::Blur);
    assert!(!c.is_dragging());

    c.handle(down(2, 0.0));
    c.handle(CarouselInput::LostPointerCapture { pointer_id: 2 });
    assert!(!c.is_dragging());
    assert_eq!(c.index(), 0);
}

#[test]
fn resize_rerenders_current_slide_by_percent() {
    let mut c = gallery(4);
    c.handle(CarouselInput::Key(NavKey::Next));
    c.handle(CarouselInput::Key(NavKey::Next));
    let resized = c.handle(CarouselInput::Resize {
        container_width: 320.0,
    });
    assert_eq!(c.index(), 2);
    assert_eq!(
        resized.render.map(|r| r.transform.css()),
        Some("translateX(-200%)".to_owned())
    );
    assert_eq!(resized.capture_command, None);
    // Narrow viewport: 12% of 320 is below the 40px floor.
    assert_eq!(c.swipe_threshold(), 40.0);
}

#[test]
fn narrow_viewport_short_swipe_still_registers() {
    let mut c = gallery(3);
    c.handle(CarouselInput::Resize {
        container_width: 300.0,
    });
    c.handle(CarouselInput::PointerDown {
        pointer_id: 1,
        x: 200.0,
        kind: PointerKind::Touch,
        button: PointerButton::Primary,
        container_width: 300.0,
    });
    let up = c.handle(CarouselInput::PointerUp {
        pointer_id: 1,
        x: 155.0,
    });
    assert_eq!(up.change, Some(SlideChange { from: 0, to: 1 }));
}

#[test]
fn swatch_pick_resets_carousel_to_first_slide() {
    let mut c = gallery(3);
    let mut swatches = SwatchSet::new(
        vec![
            Swatch {
                color: Some("#000000".to_owned()),
                ..Swatch::default()
            },
            Swatch {
                color: Some("#c0392b".to_owned()),
                image: Some("img/red.jpg".to_owned()),
                label: Some("Red".to_owned()),
            },
        ],
        Some(0),
        &GalleryConfig::default(),
    );
    c.handle(CarouselInput::GoTo(2));
    let selection = swatches.select(1).expect("known swatch");
    if selection.reset_carousel {
        c.handle(CarouselInput::GoTo(0));
    }
    assert_eq!(c.index(), 0);
    assert_eq!(selection.tint.opacity(), "0.28");
    assert_eq!(selection.tint.background(), "#c0392b");

    let black = swatches.select(0).expect("known swatch");
    assert_eq!(black.tint.opacity(), "0");
    assert_eq!(black.tint.background(), "transparent");
}

#[test]
fn mouse_pointer_zero_swipes_to_next_slide() {
    let mut c = gallery(3);
    let down = c.handle(CarouselInput::PointerDown {
        pointer_id: 0,
        x: 400.0,
        kind: PointerKind::Mouse,
        button: PointerButton::Primary,
        container_width: WIDTH,
    });
    assert_eq!(
        down.gesture.map(|log| log.outcome),
        Some(GestureOutcome::Forwarded)
    );
    assert_eq!(
        down.capture_command,
        Some(CaptureCommand::Acquire { pointer_id: 0 })
    );
    c.handle(CarouselInput::CaptureAcquired { pointer_id: 0 });

    let up = c.handle(CarouselInput::PointerUp {
        pointer_id: 0,
        x: 300.0,
    });
    assert_eq!(up.change, Some(SlideChange { from: 0, to: 1 }));
    assert_eq!(
        up.capture_command,
        Some(CaptureCommand::Release { pointer_id: 0 })
    );
    assert_eq!(c.index(), 1);
}

#[test]
fn strip_and_carousel_drags_exclude_each_other() {
    let config = GalleryConfig::default();
    let mut c = gallery(3);
    let mut strip = ThumbStrip::new(&config);

    c.handle(down(1, 300.0));
    assert!(!DragSurface::Strip.admits(&c, &strip));
    assert!(DragSurface::Carousel.admits(&c, &strip));

    c.handle(CarouselInput::PointerUp {
        pointer_id: 1,
        x: 300.0,
    });
    assert!(DragSurface::Strip.admits(&c, &strip));
    let strip_down = strip.pointer_down(2, 50.0, 0.0, PointerKind::Mouse, PointerButton::Primary);
    assert!(strip_down.gesture.is_forwarded());
    assert_eq!(strip.pointer_move(2, 20.0).scroll_left, Some(30.0));

    assert!(!DragSurface::Carousel.admits(&c, &strip));
    let carousel_move = c.handle(CarouselInput::PointerMove {
        pointer_id: 2,
        x: 20.0,
    });
    assert_eq!(carousel_move.render, None);

    strip.pointer_up(2, 20.0);
    assert!(DragSurface::Carousel.admits(&c, &strip));
    assert!(!c.is_dragging());
}

#[test]
fn resize_ends_strip_drag_too() {
    let mut strip = ThumbStrip::new(&GalleryConfig::default());
    strip.pointer_down(3, 80.0, 40.0, PointerKind::Touch, PointerButton::Primary);
    strip.capture_acquired(3);
    let resized = strip.resize();
    assert_eq!(
        resized.capture_command,
        Some(CaptureCommand::Release { pointer_id: 3 })
    );
    assert!(!strip.is_dragging());
    assert_eq!(strip.pointer_move(3, 10.0).scroll_left, None);
}
