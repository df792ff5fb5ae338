use std::rc::Rc;

use crate::error::Result;
use crate::page::{Page, Target};
use crate::timers::Timers;

pub const IMAGE_SELECTOR: &str = ".imagen-categoria img";
pub const UNAVAILABLE_LABEL: &str = "Imagen no disponible";
const FADE_IN_MS: u32 = 300;
const PARALLAX_SPEED: f64 = 0.3;
const PARALLAX_DAMPING: f64 = 0.1;

/// Vertical parallax shift in px for an element whose top edge sits at
/// `top` in a viewport `viewport_height` tall.
pub fn parallax_offset(viewport_height: f64, top: f64) -> f64 {
    (viewport_height - top) * PARALLAX_SPEED * PARALLAX_DAMPING
}

pub fn show<P: Page + 'static, T: Timers>(page: &Rc<P>, timers: &T, image: &P::Node) {
    let (page, image) = (page.clone(), image.clone());
    timers.after(FADE_IN_MS, Box::new(move || page.set_style(&image, "opacity", "1")));
}

pub fn fallback<P: Page>(page: &P, image: &P::Node) -> Result<()> {
    log::warn!(
        "Could not load image: {}",
        page.attribute(image, "src").unwrap_or_default()
    );
    page.set_style(image, "opacity", "1");
    page.set_style(image, "filter", "grayscale(100%)");

    let Some(parent) = page.parent(image) else {
        return Ok(());
    };
    let notice = page.create_element("div")?;
    page.set_text(&notice, UNAVAILABLE_LABEL);
    page.set_css_text(
        &notice,
        "position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); \
         color: #e74c3c; font-family: 'Poppins', sans-serif; font-size: 0.9rem; \
         text-align: center;",
    );
    page.append_child(&parent, &notice)
}

pub fn apply_parallax<P: Page>(page: &P, image: &P::Node) {
    let rect = page.bounding_rect(image);
    let offset = parallax_offset(page.viewport_height(), rect.top);
    page.set_style(image, "transform", &format!("translateY({}px)", offset));
}

/// Category images: fade in once loaded, fall back on error, drift with
/// scrolling.
pub struct ImageEffects<P: Page, T: Timers> {
    page: Rc<P>,
    timers: Rc<T>,
}

impl<P: Page + 'static, T: Timers + 'static> ImageEffects<P, T> {
    pub fn new(page: Rc<P>, timers: Rc<T>) -> Self {
        Self { page, timers }
    }

    pub fn init(&self) -> Result<()> {
        for image in self.page.query_all(IMAGE_SELECTOR) {
            self.page.set_style(&image, "opacity", "0");
            self.page.set_style(&image, "transition", "opacity 0.5s ease, transform 0.5s ease");

            if self.page.image_complete(&image) {
                show(&self.page, self.timers.as_ref(), &image);
            } else {
                let (page, timers, node) = (self.page.clone(), self.timers.clone(), image.clone());
                self.page.listen(
                    Target::Node(image.clone()),
                    "load",
                    Box::new(move |_| show(&page, timers.as_ref(), &node)),
                )?;
                let (page, node) = (self.page.clone(), image.clone());
                self.page.listen(
                    Target::Node(image.clone()),
                    "error",
                    Box::new(move |_| {
                        if let Err(err) = fallback(page.as_ref(), &node) {
                            log::warn!("Image fallback failed: {}", err);
                        }
                    }),
                )?;
            }

            let (page, node) = (self.page.clone(), image);
            self.page.listen(
                Target::Window,
                "scroll",
                Box::new(move |_| apply_parallax(page.as_ref(), &node)),
            )?;
        }

        log::info!("Image effects initialized");
        Ok(())
    }
}
