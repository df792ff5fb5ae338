//! `Page` over the real document.

use std::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Reflect};
use web_sys::{
    AudioContext, CssStyleDeclaration, Document, Element, ErrorEvent, Event, EventTarget,
    HtmlElement, HtmlImageElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, SvgElement, Window,
};

use crate::error::{Error, Result};
use crate::page::{
    AudioOutput, EntriesHandler, EventInfo, Handler, Intersection, ObserverOptions, Page, Rect,
    Target,
};

const TONE_START_GAIN: f32 = 0.1;
const TONE_END_GAIN: f32 = 0.01;

type Listener = (Target<Element>, String, Closure<dyn FnMut(Event)>);
type Observer = (IntersectionObserver, Closure<dyn FnMut(Array, IntersectionObserver)>);

pub struct BrowserPage {
    window: Window,
    document: Document,
    // callbacks stay alive until teardown
    listeners: RefCell<Vec<Listener>>,
    observers: RefCell<Vec<Observer>>,
}

impl BrowserPage {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| Error::Js("no global window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| Error::Js("window has no document".into()))?;
        Ok(Self {
            window,
            document,
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
        })
    }

    fn style(&self, node: &Element) -> Option<CssStyleDeclaration> {
        if let Some(html) = node.dyn_ref::<HtmlElement>() {
            return Some(html.style());
        }
        node.dyn_ref::<SvgElement>().map(|svg| svg.style())
    }

    fn event_target<'a>(&'a self, target: &'a Target<Element>) -> &'a EventTarget {
        match target {
            Target::Node(node) => node,
            Target::Window => &self.window,
            Target::Document => &self.document,
        }
    }
}

fn event_info(event: &Event) -> EventInfo {
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        return EventInfo::at(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
    }
    if let Some(error) = event.dyn_ref::<ErrorEvent>() {
        return EventInfo { message: Some(error.message()), ..EventInfo::default() };
    }
    EventInfo::default()
}

impl Page for BrowserPage {
    type Node = Element;
    type Audio = WebAudio;

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("Bad selector {}: {:?}", selector, err);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().add_1(class) {
            log::warn!("Could not add class {}: {:?}", class, err);
        }
    }

    fn remove_class(&self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().remove_1(class) {
            log::warn!("Could not remove class {}: {:?}", class, err);
        }
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        let Some(style) = self.style(node) else {
            return;
        };
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            log::warn!("Could not set {}: {:?}", property, err);
        }
    }

    fn set_css_text(&self, node: &Element, css: &str) {
        if let Some(style) = self.style(node) {
            style.set_css_text(css);
        }
    }

    fn create_element(&self, tag: &str) -> Result<Element> {
        Ok(self.document.create_element(tag)?)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<()> {
        parent.append_child(child)?;
        Ok(())
    }

    fn append_to_head(&self, node: &Element) -> Result<()> {
        let head = self.document.head().ok_or_else(|| Error::MissingElement("head".into()))?;
        head.append_child(node)?;
        Ok(())
    }

    fn append_to_body(&self, node: &Element) -> Result<()> {
        let body = self.document.body().ok_or_else(|| Error::MissingElement("body".into()))?;
        body.append_child(node)?;
        Ok(())
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect { left: rect.left(), top: rect.top(), width: rect.width(), height: rect.height() }
    }

    fn client_size(&self, node: &Element) -> (f64, f64) {
        (f64::from(node.client_width()), f64::from(node.client_height()))
    }

    fn viewport_height(&self) -> f64 {
        self.window.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(0.0)
    }

    fn document_hidden(&self) -> bool {
        self.document.hidden()
    }

    fn image_complete(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlImageElement>().map(|img| img.complete()).unwrap_or(false)
    }

    fn heap_used(&self) -> Option<f64> {
        // performance.memory is Chromium-only
        let performance = self.window.performance()?;
        let memory = Reflect::get(&performance, &JsValue::from_str("memory")).ok()?;
        if memory.is_undefined() {
            return None;
        }
        Reflect::get(&memory, &JsValue::from_str("usedJSHeapSize")).ok()?.as_f64()
    }

    fn listen(&self, target: Target<Element>, event: &str, mut handler: Handler) -> Result<()> {
        let callback = Closure::wrap(Box::new(move |e: Event| {
            handler(&event_info(&e));
        }) as Box<dyn FnMut(Event)>);

        self.event_target(&target)
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        self.listeners.borrow_mut().push((target, event.to_string(), callback));
        Ok(())
    }

    fn observe(
        &self,
        targets: &[Element],
        options: &ObserverOptions,
        mut on_entries: EntriesHandler<Element>,
    ) -> Result<()> {
        let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
            let batch = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| Intersection {
                    target: entry.target(),
                    is_intersecting: entry.is_intersecting(),
                })
                .collect();
            on_entries(batch);
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        for target in targets {
            observer.observe(target);
        }
        self.observers.borrow_mut().push((observer, callback));
        Ok(())
    }

    fn open_audio(&self) -> Result<WebAudio> {
        AudioContext::new()
            .map(WebAudio)
            .map_err(|err| Error::AudioUnavailable(format!("{:?}", err)))
    }

    fn teardown(&self) {
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        for (target, event, callback) in &listeners {
            let removed = self
                .event_target(target)
                .remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
            if let Err(err) = removed {
                log::warn!("Could not remove {} listener: {:?}", event, err);
            }
        }
        let observers = std::mem::take(&mut *self.observers.borrow_mut());
        for (observer, _) in &observers {
            observer.disconnect();
        }
        log::debug!("Tore down {} listeners and {} observers", listeners.len(), observers.len());
    }
}

/// Oscillator tones through a Web Audio context.
pub struct WebAudio(AudioContext);

impl AudioOutput for WebAudio {
    fn tone(&self, frequency: f32, duration: f64) -> Result<()> {
        let context = &self.0;
        let oscillator = context.create_oscillator()?;
        let gain = context.create_gain()?;
        oscillator.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&context.destination())?;

        oscillator.frequency().set_value(frequency);
        let start = context.current_time();
        gain.gain().set_value_at_time(TONE_START_GAIN, start)?;
        gain.gain().exponential_ramp_to_value_at_time(TONE_END_GAIN, start + duration)?;

        oscillator.start()?;
        oscillator.stop_with_when(start + duration)?;
        Ok(())
    }
}
