#![no_main]

use libfuzzer_sys::fuzz_target;
use vitrine_core::{
    Capabilities, CarouselController, CarouselInput, CarouselPhase, GalleryConfig, NavKey,
    PointerButton, PointerKind, TrackTransform,
};

fn decode(op: u8, arg: u8) -> CarouselInput {
    let pointer_id = i32::from(arg % 4);
    let x = f64::from(arg) * 8.0 - 1024.0;
    match op % 12 {
        0 => CarouselInput::Next,
        1 => CarouselInput::Prev,
        2 => CarouselInput::GoTo(usize::from(arg)),
        3 => CarouselInput::Key(if arg & 1 == 0 { NavKey::Prev } else { NavKey::Next }),
        4 => CarouselInput::PointerDown {
            pointer_id,
            x,
            kind: if arg & 0x10 == 0 { PointerKind::Mouse } else { PointerKind::Touch },
            button: PointerButton::from_dom(i16::from(arg >> 6)),
            container_width: f64::from(arg) * 6.0,
        },
        5 => CarouselInput::CaptureAcquired { pointer_id },
        6 => CarouselInput::PointerMove { pointer_id, x },
        7 => CarouselInput::PointerUp { pointer_id, x },
        8 => CarouselInput::PointerCancel {
            pointer_id: (arg & 0x80 == 0).then_some(pointer_id),
        },
        9 => CarouselInput::LostPointerCapture { pointer_id },
        10 => CarouselInput::Blur,
        _ => CarouselInput::Resize {
            container_width: f64::from(arg) * 6.0,
        },
    }
}

fuzz_target!(|data: &[u8]| {
    // First byte picks the slide count (1..=16).
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let slides = usize::from(first % 16) + 1;
    let Ok(mut carousel) = CarouselController::new(
        slides,
        slides,
        640.0,
        GalleryConfig::default(),
        Capabilities::THUMB_STRIP,
    ) else {
        return;
    };

    for pair in rest.chunks_exact(2) {
        let dispatch = carousel.handle(decode(pair[0], pair[1]));
        assert!(carousel.index() < slides, "index out of range");
        if let Some(change) = dispatch.change {
            assert!(change.to < slides && change.from < slides);
        }
        if let Some(render) = dispatch.render {
            if let TrackTransform::Pixels { offset } = render.transform {
                assert!(offset.is_finite(), "non-finite drag offset");
            }
        }
    }

    carousel.blur();
    assert_eq!(carousel.phase(), CarouselPhase::Idle);
});
