use std::rc::Rc;

use crate::error::Result;
use crate::page::{EventInfo, Page};
use crate::timers::Timers;

/// How a ripple looks and whether it carries its own keyframes.
#[derive(Debug, Clone, PartialEq)]
pub struct RippleStyle {
    pub animation: &'static str,
    pub color: &'static str,
    /// Inject a keyframes block with each ripple and drop it afterwards.
    pub inline_keyframes: bool,
}

pub const MISSION_RIPPLE: RippleStyle = RippleStyle {
    animation: "onda-efecto",
    color: "rgba(255, 255, 255, 0.6)",
    inline_keyframes: true,
};

pub const HERO_RIPPLE: RippleStyle = RippleStyle {
    animation: "ripple-animation",
    color: "rgba(255, 255, 255, 0.3)",
    inline_keyframes: false,
};

pub fn keyframes(animation: &str) -> String {
    format!(
        "@keyframes {} {{ to {{ transform: scale(4); opacity: 0; }} }}",
        animation
    )
}

/// Spawn a ripple inside `host` centred on the click, removed after
/// `lifetime_ms`. `diameter` is the host's larger side.
pub fn spawn<P: Page + 'static, T: Timers>(
    page: &Rc<P>,
    timers: &T,
    host: &P::Node,
    event: &EventInfo,
    diameter: f64,
    style: &RippleStyle,
    lifetime_ms: u32,
) -> Result<()> {
    let rect = page.bounding_rect(host);
    let radius = diameter / 2.0;
    let left = event.client_x - rect.left - radius;
    let top = event.client_y - rect.top - radius;

    let ripple = page.create_element("span")?;
    page.set_css_text(
        &ripple,
        &format!(
            "position: absolute; border-radius: 50%; background: {}; transform: scale(0); \
             animation: {} 0.6s linear; width: {}px; height: {}px; left: {}px; top: {}px; \
             pointer-events: none;",
            style.color, style.animation, diameter, diameter, left, top
        ),
    );

    let keyframes_block = if style.inline_keyframes {
        let block = page.create_element("style")?;
        page.set_text(&block, &keyframes(style.animation));
        Some(block)
    } else {
        None
    };

    // nothing is attached unless both parts are
    page.append_child(host, &ripple)?;
    if let Some(block) = &keyframes_block {
        if let Err(err) = page.append_to_head(block) {
            page.remove(&ripple);
            return Err(err);
        }
    }

    let page = page.clone();
    timers.after(
        lifetime_ms,
        Box::new(move || {
            page.remove(&ripple);
            if let Some(block) = keyframes_block {
                page.remove(&block);
            }
        }),
    );
    Ok(())
}
