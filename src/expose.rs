//! Debug handles on `window` for poking at the statistics page from the
//! console.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;
use web_sys::js_sys::{Object, Reflect};

use crate::app::StatsApp;
use crate::error::{Error, Result};
use crate::format::format_counter;
use crate::page::Page;
use crate::timers::Timers;

pub const APP_HANDLE: &str = "appEstadisticas";
pub const HELPERS_HANDLE: &str = "EstadisticasAnimadas";
const DEFAULT_TONE_SECONDS: f64 = 0.1;

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<()> {
    Reflect::set(target, &JsValue::from_str(key), value)?;
    Ok(())
}

/// Install `window.appEstadisticas` and `window.EstadisticasAnimadas`.
pub fn install<P: Page + 'static, T: Timers + 'static>(
    app: &Rc<StatsApp<P, T>>,
    separator: char,
) -> Result<()> {
    let window = web_sys::window().ok_or_else(|| Error::Js("no global window".into()))?;

    let handle = Object::new();
    let weak = Rc::downgrade(app);
    let state = Closure::wrap(Box::new(move || {
        weak.upgrade().map(|app| app.state().to_string()).unwrap_or_default()
    }) as Box<dyn FnMut() -> String>);
    set(&handle, "estado", &state.into_js_value())?;

    let weak = Rc::downgrade(app);
    let report = Closure::wrap(Box::new(move || {
        if let Some(app) = weak.upgrade() {
            app.report().log();
        }
    }) as Box<dyn FnMut()>);
    set(&handle, "reporte", &report.into_js_value())?;

    let weak = Rc::downgrade(app);
    let entries = Closure::wrap(Box::new(move || {
        let Some(app) = weak.upgrade() else {
            return JsValue::NULL;
        };
        serde_wasm_bindgen::to_value(&app.entries()).unwrap_or_else(|err| {
            log::warn!("Could not export performance entries: {}", err);
            JsValue::NULL
        })
    }) as Box<dyn FnMut() -> JsValue>);
    set(&handle, "eventos", &entries.into_js_value())?;

    let weak = Rc::downgrade(app);
    let tone = Closure::wrap(Box::new(move |frequency: f32| {
        if let Some(app) = weak.upgrade() {
            app.sound().play_tone(frequency, DEFAULT_TONE_SECONDS);
        }
    }) as Box<dyn FnMut(f32)>);
    set(&handle, "sonido", &tone.into_js_value())?;

    set(&window, APP_HANDLE, &handle)?;

    let helpers = Object::new();
    let formatter = Closure::wrap(Box::new(move |value: f64, target: f64| {
        format_counter(value, target.max(0.0) as u64, separator)
    }) as Box<dyn FnMut(f64, f64) -> String>);
    set(&helpers, "formatearContador", &formatter.into_js_value())?;
    set(&window, HELPERS_HANDLE, &helpers)?;

    log::debug!("Installed window.{} and window.{}", APP_HANDLE, HELPERS_HANDLE);
    Ok(())
}

/// Drop both handles again once the statistics page goes away.
pub fn uninstall() {
    let Some(window) = web_sys::window() else {
        return;
    };
    for key in [APP_HANDLE, HELPERS_HANDLE] {
        if let Err(err) = Reflect::delete_property(&window, &JsValue::from_str(key)) {
            log::warn!("Could not remove window.{}: {:?}", key, err);
        }
    }
}
