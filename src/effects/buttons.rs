use std::rc::Rc;

use crate::config::Config;
use crate::error::Result;
use crate::page::{EventInfo, Page, Target};
use crate::timers::Timers;

use super::ripple::{self, MISSION_RIPPLE};

pub const BUTTON_SELECTOR: &str = ".boton-mision";

pub fn hover<P: Page>(page: &P, button: &P::Node) {
    page.set_style(button, "transform", "translateY(-3px)");
    if let Some(icon) = page.query_within(button, "i") {
        page.set_style(&icon, "transform", "translateX(5px)");
    }
}

pub fn unhover<P: Page>(page: &P, button: &P::Node) {
    page.set_style(button, "transform", "translateY(0)");
    if let Some(icon) = page.query_within(button, "i") {
        page.set_style(&icon, "transform", "translateX(0)");
    }
}

/// Call-to-action buttons: lift on hover, ripple on click.
pub struct MissionButtons<P: Page, T: Timers> {
    page: Rc<P>,
    timers: Rc<T>,
    config: Rc<Config>,
}

impl<P: Page + 'static, T: Timers + 'static> MissionButtons<P, T> {
    pub fn new(page: Rc<P>, timers: Rc<T>, config: Rc<Config>) -> Self {
        Self { page, timers, config }
    }

    pub fn init(&self) -> Result<()> {
        for button in self.page.query_all(BUTTON_SELECTOR) {
            let (page, timers, node) = (self.page.clone(), self.timers.clone(), button.clone());
            let lifetime = self.config.ripple_ms;
            self.page.listen(
                Target::Node(button.clone()),
                "click",
                Box::new(move |event: &EventInfo| {
                    let (width, height) = page.client_size(&node);
                    let diameter = width.max(height);
                    if let Err(err) = ripple::spawn(
                        &page,
                        timers.as_ref(),
                        &node,
                        event,
                        diameter,
                        &MISSION_RIPPLE,
                        lifetime,
                    ) {
                        log::warn!("Ripple failed: {}", err);
                    }
                }),
            )?;

            let (page, node) = (self.page.clone(), button.clone());
            self.page.listen(
                Target::Node(button.clone()),
                "mouseenter",
                Box::new(move |_| hover(page.as_ref(), &node)),
            )?;
            let (page, node) = (self.page.clone(), button.clone());
            self.page.listen(
                Target::Node(button),
                "mouseleave",
                Box::new(move |_| unhover(page.as_ref(), &node)),
            )?;
        }

        log::info!("Interactive buttons initialized");
        Ok(())
    }
}
