use std::rc::Rc;

use crate::error::Result;
use crate::page::{Page, Target};

pub const CARD_SELECTOR: &str = ".tarjeta-estadistica";
pub const CATEGORY_SELECTOR: &str = ".categoria-estadistica";
const GLOW_CLASS: &str = "brillo-hover";

pub fn enter_card<P: Page>(page: &P, card: &P::Node) -> Result<()> {
    page.set_style(card, "transform", "translateY(-10px) scale(1.02)");
    page.set_style(card, "box-shadow", "0 15px 30px rgba(0, 0, 0, 0.4)");
    page.set_style(card, "z-index", "10");

    let glow = page.create_element("div")?;
    page.add_class(&glow, GLOW_CLASS);
    page.set_css_text(
        &glow,
        "position: absolute; top: 0; left: 0; right: 0; bottom: 0; \
         background: radial-gradient(circle at center, rgba(255,255,255,0.1) 0%, transparent 70%); \
         pointer-events: none; border-radius: 15px;",
    );
    page.append_child(card, &glow)
}

pub fn leave_card<P: Page>(page: &P, card: &P::Node) {
    page.set_style(card, "transform", "translateY(0) scale(1)");
    page.set_style(card, "box-shadow", "");
    page.set_style(card, "z-index", "");
    if let Some(glow) = page.query_within(card, &format!(".{}", GLOW_CLASS)) {
        page.remove(&glow);
    }
}

pub fn enter_category<P: Page>(page: &P, category: &P::Node) {
    if let Some(icon) = page.query_within(category, ".icono-categoria") {
        page.set_style(&icon, "transform", "scale(1.1) rotate(5deg)");
    }
}

pub fn leave_category<P: Page>(page: &P, category: &P::Node) {
    if let Some(icon) = page.query_within(category, ".icono-categoria") {
        page.set_style(&icon, "transform", "scale(1) rotate(0deg)");
    }
}

/// Hover handling for statistic cards and whole categories.
pub struct HoverEffects<P: Page> {
    page: Rc<P>,
}

impl<P: Page + 'static> HoverEffects<P> {
    pub fn new(page: Rc<P>) -> Self {
        Self { page }
    }

    pub fn init(&self) -> Result<()> {
        for card in self.page.query_all(CARD_SELECTOR) {
            let (page, node) = (self.page.clone(), card.clone());
            self.page.listen(
                Target::Node(card.clone()),
                "mouseenter",
                Box::new(move |_| {
                    if let Err(err) = enter_card(page.as_ref(), &node) {
                        log::warn!("Card glow failed: {}", err);
                    }
                }),
            )?;
            let (page, node) = (self.page.clone(), card.clone());
            self.page.listen(
                Target::Node(card),
                "mouseleave",
                Box::new(move |_| leave_card(page.as_ref(), &node)),
            )?;
        }

        for category in self.page.query_all(CATEGORY_SELECTOR) {
            let (page, node) = (self.page.clone(), category.clone());
            self.page.listen(
                Target::Node(category.clone()),
                "mouseenter",
                Box::new(move |_| enter_category(page.as_ref(), &node)),
            )?;
            let (page, node) = (self.page.clone(), category.clone());
            self.page.listen(
                Target::Node(category),
                "mouseleave",
                Box::new(move |_| leave_category(page.as_ref(), &node)),
            )?;
        }

        log::info!("Hover effects initialized");
        Ok(())
    }
}
