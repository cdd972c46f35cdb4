#![forbid(unsafe_code)]

//! `wasm-bindgen` exports and DOM listeners for the product gallery.
//!
//! All page state lives in one [`Gallery`] behind `Rc<RefCell<_>>`; every
//! listener closure borrows it for the duration of one event and applies the
//! dispatch returned by the core controllers. Only compiled on `wasm32`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use tracing::{debug, info, warn};
use vitrine_core::{
    Capabilities, CaptureCommand, CarouselController, CarouselDispatch, CarouselInput,
    DragSurface, GalleryConfig, MountError, NavKey, PageInventory, PointerButton, PointerKind,
    Render, ScrollDirection, StripDrag, Swatch, SwatchSet, ThumbStrip, Tint, center_target,
    is_activation_key,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement, KeyboardEvent,
    PointerEvent, ScrollBehavior, ScrollToOptions, Window,
};

use crate::resolve_config;
use crate::selectors;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn query<T: JsCast>(document: &Document, selector: &str) -> Option<T> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<T>().ok())
}

fn query_all<T: JsCast>(document: &Document, selector: &str) -> Vec<T> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

fn toggle_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

fn scroll_left(element: &Element) -> f64 {
    Reflect::get(element, &"scrollLeft".into())
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0)
}

fn set_scroll_left(element: &Element, left: f64) {
    let _ = Reflect::set(element, &"scrollLeft".into(), &JsValue::from_f64(left));
}

fn smooth_scroll_options(left: f64) -> ScrollToOptions {
    let options = ScrollToOptions::new();
    options.set_left(left);
    options.set_behavior(ScrollBehavior::Smooth);
    options
}

/// Apply a capture command; returns the pointer id when capture was acquired.
fn apply_capture(target: &Element, command: CaptureCommand) -> Option<i32> {
    match command {
        CaptureCommand::Acquire { pointer_id } => target
            .set_pointer_capture(pointer_id)
            .ok()
            .map(|()| pointer_id),
        CaptureCommand::Release { pointer_id } => {
            let _ = target.release_pointer_capture(pointer_id);
            None
        }
    }
}

fn pointer_kind(event: &PointerEvent) -> PointerKind {
    PointerKind::from_dom(&event.pointer_type())
}

fn pointer_x(event: &PointerEvent) -> f64 {
    f64::from(event.client_x())
}

/// Elements found on the page at mount time.
struct Page {
    container: HtmlElement,
    wrapper: HtmlElement,
    slides: Vec<Element>,
    thumbs: Vec<HtmlElement>,
    thumb_strip: Option<HtmlElement>,
    slide_prev: Option<Element>,
    slide_next: Option<Element>,
    thumb_prev: Option<Element>,
    thumb_next: Option<Element>,
    swatches: Vec<Element>,
    tints: Vec<HtmlElement>,
    primary_image: Option<HtmlImageElement>,
}

/// Mounted gallery: page handles plus the core controllers.
struct Gallery {
    page: Page,
    capabilities: Capabilities,
    carousel: CarouselController,
    strip: ThumbStrip,
    swatches: SwatchSet,
}

impl Gallery {
    fn mount(document: &Document, config: GalleryConfig) -> Result<Self, MountError> {
        use selectors::*;

        let container = query::<HtmlElement>(document, CONTAINER);
        let wrapper = query::<HtmlElement>(document, WRAPPER);
        let slides = query_all::<Element>(document, SLIDES);
        let thumbs = query_all::<HtmlElement>(document, THUMBS);
        let thumb_strip = query::<HtmlElement>(document, THUMB_STRIP);
        let slide_prev = query::<Element>(document, SLIDE_PREV);
        let slide_next = query::<Element>(document, SLIDE_NEXT);
        let thumb_prev = query::<Element>(document, THUMB_PREV);
        let thumb_next = query::<Element>(document, THUMB_NEXT);
        let swatches = query_all::<Element>(document, SWATCHES);
        let tints = query_all::<HtmlElement>(document, TINTS);
        let primary_image = query::<HtmlImageElement>(document, PRIMARY_IMAGE);

        let inventory = PageInventory {
            has_container: container.is_some(),
            has_wrapper: wrapper.is_some(),
            slide_count: slides.len(),
            thumb_count: thumbs.len(),
            has_thumb_strip: thumb_strip.is_some(),
            has_prev_button: slide_prev.is_some(),
            has_next_button: slide_next.is_some(),
            has_thumb_prev_button: thumb_prev.is_some(),
            has_thumb_next_button: thumb_next.is_some(),
            swatch_count: swatches.len(),
            tint_count: tints.len(),
            has_primary_image: primary_image.is_some(),
        };
        let capabilities = Capabilities::detect(&inventory)?;
        let container = container.ok_or(MountError::MissingContainer)?;
        let wrapper = wrapper.ok_or(MountError::MissingWrapper)?;

        let carousel = CarouselController::new(
            slides.len(),
            thumbs.len(),
            f64::from(container.client_width()),
            config,
            capabilities,
        )?;
        let swatch_models = swatches
            .iter()
            .map(|element| Swatch {
                color: element.get_attribute(DATA_COLOR),
                image: element.get_attribute(DATA_IMG),
                label: element.get_attribute(ARIA_LABEL),
            })
            .collect();
        let initially_active = swatches
            .iter()
            .position(|element| element.class_list().contains(ACTIVE_CLASS));

        Ok(Self {
            page: Page {
                container,
                wrapper,
                slides,
                thumbs,
                thumb_strip,
                slide_prev,
                slide_next,
                thumb_prev,
                thumb_next,
                swatches,
                tints,
                primary_image,
            },
            capabilities,
            carousel,
            strip: ThumbStrip::new(&config),
            swatches: SwatchSet::new(swatch_models, initially_active, &config),
        })
    }

    fn container_width(&self) -> f64 {
        f64::from(self.page.container.client_width())
    }

    fn initial_render(&mut self) {
        let render = self.carousel.update();
        self.apply_render(&render);
        if let Some(tint) = self.swatches.initial_tint() {
            self.apply_tint(&tint);
        }
    }

    fn dispatch(&mut self, input: CarouselInput) {
        let dispatch = self.carousel.handle(input);
        self.apply_carousel(dispatch);
    }

    fn apply_carousel(&mut self, dispatch: CarouselDispatch) {
        if let Some(grabbing) = dispatch.grabbing {
            if grabbing {
                set_style(&self.page.wrapper, selectors::STYLE_TRANSITION, "none");
            }
            toggle_class(&self.page.container, selectors::GRABBING_CLASS, grabbing);
        }
        if let Some(render) = dispatch.render {
            self.apply_render(&render);
        }
        if let Some(command) = dispatch.capture_command
            && let Some(pointer_id) = apply_capture(&self.page.container, command)
        {
            self.carousel.capture_acquired(pointer_id);
        }
    }

    fn apply_render(&self, render: &Render) {
        let wrapper = &self.page.wrapper;
        set_style(wrapper, selectors::STYLE_TRANSITION, render.transform.transition());
        set_style(wrapper, selectors::STYLE_TRANSFORM, &render.transform.css());

        let Some(selection) = render.selection else {
            return;
        };
        for (i, thumb) in self.page.thumbs.iter().enumerate() {
            toggle_class(thumb, selectors::ACTIVE_CLASS, selection.thumb_active(i));
        }
        for (i, slide) in self.page.slides.iter().enumerate() {
            let _ = slide.set_attribute(selectors::ARIA_HIDDEN, selection.slide_aria_hidden(i));
        }
        if selection.center_thumb {
            self.center_thumb(selection.index);
        }
    }

    fn center_thumb(&self, index: usize) {
        let (Some(strip), Some(thumb)) = (self.page.thumb_strip.as_ref(), self.page.thumbs.get(index))
        else {
            return;
        };
        let target = center_target(
            f64::from(thumb.offset_left()),
            f64::from(thumb.offset_width()),
            f64::from(strip.client_width()),
        );
        strip.scroll_to_with_scroll_to_options(&smooth_scroll_options(target));
    }

    fn scroll_strip(&self, direction: ScrollDirection) {
        let Some(strip) = self.page.thumb_strip.as_ref() else {
            return;
        };
        let amount = self.strip.step(direction, f64::from(strip.client_width()));
        strip.scroll_by_with_scroll_to_options(&smooth_scroll_options(amount));
    }

    fn apply_strip(&mut self, drag: StripDrag) {
        let Some(strip) = self.page.thumb_strip.as_ref() else {
            return;
        };
        if let Some(left) = drag.scroll_left {
            set_scroll_left(strip, left);
        }
        if let Some(command) = drag.capture_command
            && let Some(pointer_id) = apply_capture(strip, command)
        {
            self.strip.capture_acquired(pointer_id);
        }
    }

    fn apply_tint(&self, tint: &Tint) {
        let opacity = tint.opacity();
        for overlay in &self.page.tints {
            set_style(overlay, selectors::STYLE_BACKGROUND, tint.background());
            set_style(overlay, selectors::STYLE_OPACITY, &opacity);
        }
    }

    fn select_swatch(&mut self, index: usize) -> bool {
        let Some(selection) = self.swatches.select(index) else {
            return false;
        };
        for (i, swatch) in self.page.swatches.iter().enumerate() {
            toggle_class(swatch, selectors::ACTIVE_CLASS, i == index);
        }
        self.apply_tint(&selection.tint);
        if let (Some(src), Some(image)) = (selection.image.as_deref(), &self.page.primary_image) {
            image.set_src(src);
        }
        if selection.reset_carousel {
            self.dispatch(CarouselInput::GoTo(0));
        }
        true
    }

    fn admits(&self, surface: DragSurface) -> bool {
        let admitted = surface.admits(&self.carousel, &self.strip);
        if !admitted {
            debug!(?surface, "pointerdown ignored, other drag active");
        }
        admitted
    }

    fn on_container_pointer_down(&mut self, event: &PointerEvent) {
        if !self.admits(DragSurface::Carousel) {
            return;
        }
        let width = self.container_width();
        self.dispatch(CarouselInput::PointerDown {
            pointer_id: event.pointer_id(),
            x: pointer_x(event),
            kind: pointer_kind(event),
            button: PointerButton::from_dom(event.button()),
            container_width: width,
        });
    }

    fn on_strip_pointer_down(&mut self, event: &PointerEvent) {
        if !self.admits(DragSurface::Strip) {
            return;
        }
        let Some(strip) = self.page.thumb_strip.as_ref() else {
            return;
        };
        let drag = self.strip.pointer_down(
            event.pointer_id(),
            pointer_x(event),
            scroll_left(strip),
            pointer_kind(event),
            PointerButton::from_dom(event.button()),
        );
        self.apply_strip(drag);
    }

    fn on_pointer_move(&mut self, event: &PointerEvent) {
        let (pointer_id, x) = (event.pointer_id(), pointer_x(event));
        self.dispatch(CarouselInput::PointerMove { pointer_id, x });
        let drag = self.strip.pointer_move(pointer_id, x);
        self.apply_strip(drag);
    }

    fn on_pointer_up(&mut self, event: &PointerEvent) {
        let (pointer_id, x) = (event.pointer_id(), pointer_x(event));
        self.dispatch(CarouselInput::PointerUp { pointer_id, x });
        let drag = self.strip.pointer_up(pointer_id, x);
        self.apply_strip(drag);
    }

    fn on_pointer_cancel(&mut self, event: &PointerEvent) {
        let pointer_id = Some(event.pointer_id());
        self.dispatch(CarouselInput::PointerCancel { pointer_id });
        let drag = self.strip.pointer_cancel(pointer_id);
        self.apply_strip(drag);
    }

    fn on_blur(&mut self) {
        self.dispatch(CarouselInput::Blur);
        let drag = self.strip.blur();
        self.apply_strip(drag);
    }

    fn on_resize(&mut self) {
        let container_width = self.container_width();
        self.dispatch(CarouselInput::Resize { container_width });
        let drag = self.strip.resize();
        self.apply_strip(drag);
    }
}

type Shared = Rc<RefCell<Gallery>>;

/// A registered DOM listener, kept so it can be detached on destroy.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

struct Wiring {
    shared: Shared,
    listeners: Vec<Listener>,
}

impl Wiring {
    fn on<E, F>(&mut self, target: &EventTarget, event: &'static str, mut handler: F)
    where
        E: JsCast + 'static,
        F: FnMut(&mut Gallery, E) + 'static,
    {
        let shared = Rc::clone(&self.shared);
        let callback = Closure::<dyn FnMut(Event)>::new(move |raw: Event| {
            let Ok(typed) = raw.dyn_into::<E>() else {
                return;
            };
            match shared.try_borrow_mut() {
                Ok(mut gallery) => handler(&mut gallery, typed),
                Err(_) => debug!(event, "gallery busy, event dropped"),
            }
        });
        match target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
            Ok(()) => self.listeners.push(Listener {
                target: target.clone(),
                event,
                callback,
            }),
            Err(_) => warn!(event, "failed to register listener"),
        }
    }
}

/// Element handles needed for wiring, cloned out of the gallery so no borrow
/// is held while listeners are registered.
struct Targets {
    capabilities: Capabilities,
    container: Element,
    thumb_strip: Option<Element>,
    slide_prev: Option<Element>,
    slide_next: Option<Element>,
    thumb_prev: Option<Element>,
    thumb_next: Option<Element>,
    thumbs: Vec<Element>,
    swatches: Vec<Element>,
}

impl Targets {
    fn of(gallery: &Gallery) -> Self {
        let page = &gallery.page;
        Self {
            capabilities: gallery.capabilities,
            container: page.container.clone().into(),
            thumb_strip: page.thumb_strip.clone().map(Into::into),
            slide_prev: page.slide_prev.clone(),
            slide_next: page.slide_next.clone(),
            thumb_prev: page.thumb_prev.clone(),
            thumb_next: page.thumb_next.clone(),
            thumbs: page.thumbs.iter().cloned().map(Into::into).collect(),
            swatches: page.swatches.clone(),
        }
    }
}

fn wire(wiring: &mut Wiring, window: &Window, document: &Document, targets: Targets) {
    let caps = targets.capabilities;

    if caps.contains(Capabilities::SLIDE_NAV) {
        if let Some(prev) = &targets.slide_prev {
            wiring.on(prev, "click", |gallery, event: Event| {
                event.prevent_default();
                gallery.dispatch(CarouselInput::Prev);
            });
        }
        if let Some(next) = &targets.slide_next {
            wiring.on(next, "click", |gallery, event: Event| {
                event.prevent_default();
                gallery.dispatch(CarouselInput::Next);
            });
        }
    }

    for (index, thumb) in targets.thumbs.iter().enumerate() {
        wiring.on(thumb, "click", move |gallery, _: Event| {
            gallery.dispatch(CarouselInput::GoTo(index));
        });
        wiring.on(thumb, "keypress", move |gallery, event: KeyboardEvent| {
            if is_activation_key(&event.key()) {
                gallery.dispatch(CarouselInput::GoTo(index));
            }
        });
    }

    if caps.contains(Capabilities::THUMB_NAV) {
        if let Some(prev) = &targets.thumb_prev {
            wiring.on(prev, "click", |gallery, _: Event| {
                gallery.scroll_strip(ScrollDirection::Back);
            });
        }
        if let Some(next) = &targets.thumb_next {
            wiring.on(next, "click", |gallery, _: Event| {
                gallery.scroll_strip(ScrollDirection::Forward);
            });
        }
    }

    if let Some(strip) = &targets.thumb_strip {
        wiring.on(strip, "pointerdown", |gallery, event: PointerEvent| {
            gallery.on_strip_pointer_down(&event);
        });
        wiring.on(strip, "lostpointercapture", |gallery, event: PointerEvent| {
            let drag = gallery.strip.lost_pointer_capture(event.pointer_id());
            gallery.apply_strip(drag);
        });
    }

    wiring.on(&targets.container, "pointerdown", |gallery, event: PointerEvent| {
        gallery.on_container_pointer_down(&event);
    });
    wiring.on(&targets.container, "lostpointercapture", |gallery, event: PointerEvent| {
        gallery.dispatch(CarouselInput::LostPointerCapture {
            pointer_id: event.pointer_id(),
        });
    });

    wiring.on(window, "pointermove", |gallery, event: PointerEvent| {
        gallery.on_pointer_move(&event);
    });
    wiring.on(window, "pointerup", |gallery, event: PointerEvent| {
        gallery.on_pointer_up(&event);
    });
    wiring.on(window, "pointercancel", |gallery, event: PointerEvent| {
        gallery.on_pointer_cancel(&event);
    });
    wiring.on(window, "blur", |gallery, _: Event| gallery.on_blur());
    wiring.on(window, "resize", |gallery, _: Event| gallery.on_resize());

    wiring.on(document, "keydown", |gallery, event: KeyboardEvent| {
        if let Some(key) = NavKey::from_dom_key(&event.key()) {
            gallery.dispatch(CarouselInput::Key(key));
        }
    });

    if caps.contains(Capabilities::SWATCHES) {
        for (index, swatch) in targets.swatches.iter().enumerate() {
            wiring.on(swatch, "click", move |gallery, _: Event| {
                gallery.select_swatch(index);
            });
            wiring.on(swatch, "keypress", move |gallery, event: KeyboardEvent| {
                if is_activation_key(&event.key()) {
                    gallery.select_swatch(index);
                }
            });
        }
    }
}

/// Mount the gallery on the current document.
///
/// Returns `undefined` when a required element (`.main-slider`,
/// `.swiper-wrapper`, at least one slide) is missing; the page is left
/// untouched in that case. Keep the returned handle alive for as long as the
/// gallery should respond to input.
#[wasm_bindgen(js_name = mountProductGallery)]
pub fn mount_product_gallery(config_json: Option<String>) -> Option<ProductGallery> {
    install_panic_hook();
    let window = web_sys::window()?;
    let document = window.document()?;
    let config = resolve_config(config_json.as_deref());

    let mut gallery = match Gallery::mount(&document, config) {
        Ok(gallery) => gallery,
        Err(err) => {
            warn!(error = %err, "product gallery not mounted");
            return None;
        }
    };
    info!(
        slides = gallery.carousel.slide_count(),
        thumbs = gallery.page.thumbs.len(),
        swatches = gallery.swatches.len(),
        capabilities = ?gallery.capabilities,
        "product gallery mounted"
    );
    gallery.initial_render();

    let targets = Targets::of(&gallery);
    let shared = Rc::new(RefCell::new(gallery));
    let mut wiring = Wiring {
        shared: Rc::clone(&shared),
        listeners: Vec::new(),
    };
    wire(&mut wiring, &window, &document, targets);

    Some(ProductGallery {
        shared,
        listeners: wiring.listeners,
    })
}

/// JS handle for a mounted gallery.
#[wasm_bindgen]
pub struct ProductGallery {
    shared: Shared,
    listeners: Vec<Listener>,
}

impl ProductGallery {
    fn with<R>(&self, f: impl FnOnce(&mut Gallery) -> R) -> Option<R> {
        let mut gallery = self.shared.try_borrow_mut().ok()?;
        Some(f(&mut gallery))
    }
}

#[wasm_bindgen]
impl ProductGallery {
    pub fn next(&self) {
        self.with(|gallery| gallery.dispatch(CarouselInput::Next));
    }

    pub fn prev(&self) {
        self.with(|gallery| gallery.dispatch(CarouselInput::Prev));
    }

    /// Jump to a slide; out-of-range indices land on the last slide.
    #[wasm_bindgen(js_name = goTo)]
    pub fn go_to(&self, index: u32) {
        let index = usize::try_from(index).unwrap_or(usize::MAX);
        self.with(|gallery| gallery.dispatch(CarouselInput::GoTo(index)));
    }

    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> u32 {
        self.with(|gallery| gallery.carousel.index())
            .and_then(|index| u32::try_from(index).ok())
            .unwrap_or(0)
    }

    #[wasm_bindgen(js_name = slideCount)]
    pub fn slide_count(&self) -> u32 {
        self.with(|gallery| gallery.carousel.slide_count())
            .and_then(|count| u32::try_from(count).ok())
            .unwrap_or(0)
    }

    /// Select a swatch as if it were clicked. Returns `false` for an unknown
    /// index.
    #[wasm_bindgen(js_name = selectSwatch)]
    pub fn select_swatch(&self, index: u32) -> bool {
        let index = usize::try_from(index).unwrap_or(usize::MAX);
        self.with(|gallery| gallery.select_swatch(index))
            .unwrap_or(false)
    }

    /// Detach every listener. The page keeps its last rendered state.
    pub fn destroy(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        debug!("product gallery destroyed");
    }
}
