//! Landing hero: the "+N" counter, hover lifts, button ripple, staggered
//! entrance, background particles and a time-on-page tick.

use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::rc::Rc;

use rand::Rng;

use crate::config::Config;
use crate::effects::ripple::{self, HERO_RIPPLE};
use crate::error::Result;
use crate::format::parse_count;
use crate::page::{EventInfo, Page, Target};
use crate::timers::Timers;

pub const NUMBER_SELECTOR: &str = ".number";
pub const CARD_SELECTOR: &str = ".info-card";
pub const BUTTON_SELECTOR: &str = ".hero-button";
pub const ENTRANCE_SELECTOR: &str =
    ".hero-stats, .hero-title, .hero-subtitle, .hero-description, .hero-button, .info-card";
pub const PARTICLES_CLASS: &str = "particles-container";

const NUMBER_DELAY_MS: u32 = 300;
const NUMBER_START_MS: u32 = 500;
const NUMBER_FRAMES: u32 = 60;
const PULSE_MS: u32 = 300;
const ENTRANCE_DELAY_MS: u32 = 500;
const PARTICLE_COUNT: usize = 30;
const TICK_MS: u32 = 1000;
const TIME_MILESTONE_S: u32 = 10;

const BUTTON_REST_SHADOW: &str = "0 10px 30px rgba(138, 43, 226, 0.4)";

/// Frame-stepped count towards the hero number.
#[derive(Debug, Clone, PartialEq)]
pub struct HeroCount {
    current: f64,
    target: u64,
    increment: f64,
}

impl HeroCount {
    pub fn new(target: u64, frames: u32) -> Self {
        Self { current: 0.0, target, increment: target as f64 / f64::from(frames.max(1)) }
    }

    /// Text for the next frame, or `None` once the target is reached.
    pub fn step(&mut self) -> Option<String> {
        self.current += self.increment;
        if self.current < self.target as f64 {
            Some(format!("+{}", self.current.floor() as u64))
        } else {
            None
        }
    }
}

/// One decorative dot. Sizes in px, positions in percent, times in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub left: f64,
    pub top: f64,
    pub duration: f64,
    pub delay: f64,
}

impl Particle {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            width: rng.gen_range(1.0..5.0),
            height: rng.gen_range(1.0..5.0),
            opacity: rng.gen_range(0.1..0.4),
            left: rng.gen_range(0.0..100.0),
            top: rng.gen_range(0.0..100.0),
            duration: rng.gen_range(10.0..30.0),
            delay: rng.gen_range(0.0..5.0),
        }
    }

    pub fn css(&self) -> String {
        format!(
            "position: absolute; width: {}px; height: {}px; \
             background: radial-gradient(circle, #8A2BE2, transparent); border-radius: 50%; \
             opacity: {}; left: {}%; top: {}%; \
             animation: float {}s ease-in-out {}s infinite alternate;",
            self.width, self.height, self.opacity, self.left, self.top, self.duration, self.delay
        )
    }
}

/// The shared `float` keyframes with three random waypoints.
pub fn float_keyframes<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut waypoint = || (rng.gen_range(-25.0..25.0), rng.gen_range(-25.0..25.0));
    let (a, b, c) = (waypoint(), waypoint(), waypoint());
    format!(
        "@keyframes float {{ \
         0%, 100% {{ transform: translate(0, 0) scale(1); opacity: 0.1; }} \
         25% {{ transform: translate({}px, {}px) scale(1.2); opacity: 0.3; }} \
         50% {{ transform: translate({}px, {}px) scale(0.8); opacity: 0.2; }} \
         75% {{ transform: translate({}px, {}px) scale(1.1); opacity: 0.25; }} }}",
        a.0, a.1, b.0, b.1, c.0, c.1
    )
}

fn number_frame<P: Page + 'static, T: Timers + 'static>(
    page: Rc<P>,
    timers: Rc<T>,
    node: P::Node,
    original: String,
    mut count: HeroCount,
) {
    match count.step() {
        Some(text) => {
            page.set_text(&node, &text);
            let next = timers.clone();
            next.next_frame(Box::new(move || number_frame(page, timers, node, original, count)));
        }
        None => {
            page.set_text(&node, &original);
            page.set_style(&node, "transform", "scale(1.1)");
            timers.after(
                PULSE_MS,
                Box::new(move || page.set_style(&node, "transform", "scale(1)")),
            );
        }
    }
}

pub struct HeroIntro<P: Page, T: Timers> {
    page: Rc<P>,
    timers: Rc<T>,
    config: Rc<Config>,
    seconds_on_page: Rc<Cell<u32>>,
    initialized: Cell<bool>,
    stopped: Rc<Cell<bool>>,
    // particle layer and style blocks added outside the rendered markup
    injected: RefCell<Vec<P::Node>>,
}

impl<P: Page + 'static, T: Timers + 'static> HeroIntro<P, T> {
    pub fn new(page: Rc<P>, timers: Rc<T>, config: Rc<Config>) -> Self {
        Self {
            page,
            timers,
            config,
            seconds_on_page: Rc::new(Cell::new(0)),
            initialized: Cell::new(false),
            stopped: Rc::new(Cell::new(false)),
            injected: RefCell::new(Vec::new()),
        }
    }

    pub fn seconds_on_page(&self) -> u32 {
        self.seconds_on_page.get()
    }

    pub fn init<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<()> {
        if self.initialized.replace(true) {
            return Ok(());
        }

        self.prepare_entrance();
        self.schedule_number();
        self.schedule_entrance();
        self.spawn_particles(rng)?;
        self.wire_cards()?;
        self.wire_button()?;
        self.track_time_on_page();

        log::info!("Hero intro initialized");
        Ok(())
    }

    /// Undo `init`: drop injected nodes, listeners and pending work so the
    /// page can mount a fresh intro.
    pub fn teardown(&self) {
        if self.stopped.replace(true) {
            return;
        }
        for node in self.injected.borrow_mut().drain(..) {
            self.page.remove(&node);
        }
        self.page.teardown();
        log::debug!("Hero intro torn down");
    }

    fn inject_into_head(&self, node: P::Node) -> Result<()> {
        self.page.append_to_head(&node)?;
        self.injected.borrow_mut().push(node);
        Ok(())
    }

    fn prepare_entrance(&self) {
        for element in self.page.query_all(ENTRANCE_SELECTOR) {
            self.page.set_style(&element, "opacity", "0");
            self.page.set_style(&element, "transform", "translateY(20px)");
            self.page.set_style(&element, "transition", "opacity 0.6s ease, transform 0.6s ease");
        }
    }

    fn schedule_entrance(&self) {
        let (page, timers) = (self.page.clone(), self.timers.clone());
        let (stagger, stopped) = (self.config.stagger_ms, self.stopped.clone());
        self.timers.after(
            ENTRANCE_DELAY_MS,
            Box::new(move || {
                if stopped.get() {
                    return;
                }
                for (index, element) in page.query_all(ENTRANCE_SELECTOR).into_iter().enumerate() {
                    let page = page.clone();
                    let delay = u32::try_from(index).unwrap_or(u32::MAX).saturating_mul(stagger);
                    timers.after(
                        delay,
                        Box::new(move || {
                            page.set_style(&element, "opacity", "1");
                            page.set_style(&element, "transform", "translateY(0)");
                        }),
                    );
                }
            }),
        );
    }

    fn schedule_number(&self) {
        let (page, timers) = (self.page.clone(), self.timers.clone());
        let stopped = self.stopped.clone();
        self.timers.after(
            NUMBER_DELAY_MS,
            Box::new(move || {
                if stopped.get() {
                    return;
                }
                let Some(node) = page.query_all(NUMBER_SELECTOR).into_iter().next() else {
                    return;
                };
                let original = page.text(&node);
                let Some(digits) = original.strip_prefix('+') else {
                    return;
                };
                let Some(target) = parse_count(digits) else {
                    log::warn!("Hero number {:?} is not a count", original);
                    return;
                };

                let count = HeroCount::new(target, NUMBER_FRAMES);
                let later = timers.clone();
                later.after(
                    NUMBER_START_MS,
                    Box::new(move || number_frame(page, timers, node, original, count)),
                );
            }),
        );
    }

    fn spawn_particles<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<()> {
        let container = self.page.create_element("div")?;
        self.page.add_class(&container, PARTICLES_CLASS);
        self.page.set_css_text(
            &container,
            "position: fixed; top: 0; left: 80px; width: calc(100% - 80px); height: 100vh; \
             pointer-events: none; z-index: -1; overflow: hidden;",
        );
        self.page.append_to_body(&container)?;
        self.injected.borrow_mut().push(container.clone());

        for _ in 0..PARTICLE_COUNT {
            let particle = self.page.create_element("div")?;
            self.page.set_css_text(&particle, &Particle::random(rng).css());
            self.page.append_child(&container, &particle)?;
        }

        let keyframes = self.page.create_element("style")?;
        self.page.set_text(&keyframes, &float_keyframes(rng));
        self.inject_into_head(keyframes)
    }

    fn wire_cards(&self) -> Result<()> {
        for card in self.page.query_all(CARD_SELECTOR) {
            let (page, node) = (self.page.clone(), card.clone());
            self.page.listen(
                Target::Node(card.clone()),
                "mouseenter",
                Box::new(move |_| {
                    page.set_style(&node, "transform", "translateY(-10px) scale(1.02)");
                    page.set_style(&node, "box-shadow", "0 25px 50px rgba(138, 43, 226, 0.4)");
                }),
            )?;
            let (page, node) = (self.page.clone(), card.clone());
            self.page.listen(
                Target::Node(card),
                "mouseleave",
                Box::new(move |_| {
                    page.set_style(&node, "transform", "translateY(0) scale(1)");
                    page.set_style(&node, "box-shadow", "none");
                }),
            )?;
        }
        Ok(())
    }

    fn wire_button(&self) -> Result<()> {
        let Some(button) = self.page.query_all(BUTTON_SELECTOR).into_iter().next() else {
            log::debug!("No hero button on this page");
            return Ok(());
        };

        let (page, node) = (self.page.clone(), button.clone());
        self.page.listen(
            Target::Node(button.clone()),
            "mouseenter",
            Box::new(move |_| {
                page.set_style(&node, "transform", "translateY(-8px) scale(1.08)");
                page.set_style(&node, "box-shadow", "0 25px 50px rgba(138, 43, 226, 0.6)");
            }),
        )?;
        let (page, node) = (self.page.clone(), button.clone());
        self.page.listen(
            Target::Node(button.clone()),
            "mouseleave",
            Box::new(move |_| {
                page.set_style(&node, "transform", "translateY(0) scale(1)");
                page.set_style(&node, "box-shadow", BUTTON_REST_SHADOW);
            }),
        )?;

        let (page, timers, node) = (self.page.clone(), self.timers.clone(), button.clone());
        let lifetime = self.config.ripple_ms;
        self.page.listen(
            Target::Node(button),
            "click",
            Box::new(move |event: &EventInfo| {
                let rect = page.bounding_rect(&node);
                let diameter = rect.width.max(rect.height);
                let timers = timers.as_ref();
                let spawned =
                    ripple::spawn(&page, timers, &node, event, diameter, &HERO_RIPPLE, lifetime);
                if let Err(err) = spawned {
                    log::warn!("Ripple failed: {}", err);
                }
            }),
        )?;

        let keyframes = self.page.create_element("style")?;
        self.page.set_text(&keyframes, &ripple::keyframes(HERO_RIPPLE.animation));
        self.inject_into_head(keyframes)
    }

    fn track_time_on_page(&self) {
        let (seconds, stopped) = (self.seconds_on_page.clone(), self.stopped.clone());
        self.timers.every(
            TICK_MS,
            Box::new(move || {
                if stopped.get() {
                    return ControlFlow::Break(());
                }
                seconds.set(seconds.get() + 1);
                if seconds.get() >= TIME_MILESTONE_S {
                    log::info!("Usuario lleva {} segundos en la página", TIME_MILESTONE_S);
                    return ControlFlow::Break(());
                }
                ControlFlow::Continue(())
            }),
        );
    }
}
