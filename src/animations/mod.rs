//! Scroll-triggered reveal animations and the counters and charts they
//! kick off.

pub mod charts;
pub mod counter;

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use crate::config::Config;
use crate::error::Result;
use crate::format::parse_count;
use crate::page::{Intersection, ObserverOptions, Page};
use crate::timers::Timers;

use self::counter::Counter;

pub const MARKER_SELECTOR: &str = "[data-aos]";
pub const COUNTER_SELECTOR: &str = ".contador-animado, .contador-grande";
pub const DELAY_ATTRIBUTE: &str = "data-aos-delay";
pub const REVEALED_CLASS: &str = "aos-animate";

/// What a revealed element does beyond getting [`REVEALED_CLASS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Counter,
    LargeCounter,
    CircularChart,
    BarChart,
    RadialChart,
    RevealOnly,
}

impl AnimationKind {
    /// First match wins, in declaration order.
    pub fn classify<P: Page>(page: &P, element: &P::Node) -> Self {
        if page.has_class(element, "contador-animado") {
            AnimationKind::Counter
        } else if page.has_class(element, "contador-grande") {
            AnimationKind::LargeCounter
        } else if page.query_within(element, ".grafico-circular").is_some() {
            AnimationKind::CircularChart
        } else if page.query_within(element, ".barra-progreso").is_some() {
            AnimationKind::BarChart
        } else if page.query_within(element, ".grafico-radial").is_some() {
            AnimationKind::RadialChart
        } else {
            AnimationKind::RevealOnly
        }
    }
}

/// Reveal `element` and start whatever animation it carries.
pub fn run_animation<P: Page + 'static, T: Timers + 'static>(
    page: &Rc<P>,
    timers: &Rc<T>,
    config: &Config,
    element: &P::Node,
) -> Result<AnimationKind> {
    page.add_class(element, REVEALED_CLASS);

    let kind = AnimationKind::classify(page.as_ref(), element);
    match kind {
        AnimationKind::Counter => {
            Counter::new(page.clone(), timers.clone(), config, element.clone())?.animate();
        }
        AnimationKind::LargeCounter => {
            Counter::new(page.clone(), timers.clone(), config, element.clone())?
                .with_pulse()
                .animate();
        }
        AnimationKind::CircularChart => {
            charts::animate_circular(page, timers.as_ref(), config, element)?;
        }
        AnimationKind::BarChart => charts::animate_bar(page, timers.as_ref(), config, element)?,
        AnimationKind::RadialChart => {
            charts::animate_radial(page, timers.as_ref(), config, element)?;
        }
        AnimationKind::RevealOnly => {}
    }
    Ok(kind)
}

/// Watches marked elements and animates each one the first time it scrolls
/// into view.
pub struct ScrollAnimator<P: Page, T: Timers> {
    page: Rc<P>,
    timers: Rc<T>,
    config: Rc<Config>,
    watched: RefCell<Vec<P::Node>>,
    animated: RefCell<HashSet<usize>>,
    initialized: Cell<bool>,
}

impl<P: Page + 'static, T: Timers + 'static> ScrollAnimator<P, T> {
    pub fn new(page: Rc<P>, timers: Rc<T>, config: Rc<Config>) -> Rc<Self> {
        Rc::new(Self {
            page,
            timers,
            config,
            watched: RefCell::new(Vec::new()),
            animated: RefCell::new(HashSet::new()),
            initialized: Cell::new(false),
        })
    }

    pub fn init(self: &Rc<Self>) -> Result<()> {
        if self.initialized.get() {
            return Ok(());
        }

        let mut targets = self.page.query_all(MARKER_SELECTOR);
        for counter in self.page.query_all(COUNTER_SELECTOR) {
            if !targets.contains(&counter) {
                targets.push(counter);
            }
        }

        let options = ObserverOptions {
            threshold: self.config.scroll_threshold,
            root_margin: self.config.root_margin.clone(),
        };
        let animator = Rc::downgrade(self);
        self.page.observe(
            &targets,
            &options,
            Box::new(move |entries| {
                if let Some(animator) = animator.upgrade() {
                    animator.process_entries(entries);
                }
            }),
        )?;

        log::info!("Scroll animations initialized ({} elements)", targets.len());
        *self.watched.borrow_mut() = targets;
        self.initialized.set(true);
        Ok(())
    }

    /// Handle one observer batch, in the order the browser reported it.
    pub fn process_entries(&self, entries: Vec<Intersection<P::Node>>) {
        for entry in entries.into_iter().filter(|e| e.is_intersecting) {
            let Some(index) = self.index_of(&entry.target) else {
                continue;
            };
            if self.animated.borrow_mut().insert(index) {
                self.schedule(entry.target);
            }
        }
    }

    fn index_of(&self, node: &P::Node) -> Option<usize> {
        self.watched.borrow().iter().position(|watched| watched == node)
    }

    fn schedule(&self, element: P::Node) {
        let delay = self
            .page
            .attribute(&element, DELAY_ATTRIBUTE)
            .and_then(|raw| parse_count(&raw))
            .and_then(|ms| u32::try_from(ms).ok())
            .unwrap_or(0);

        let page = self.page.clone();
        let timers = self.timers.clone();
        let config = self.config.clone();
        self.timers.after(
            delay,
            Box::new(move || {
                if let Err(err) = run_animation(&page, &timers, &config, &element) {
                    log::warn!("Skipping animation: {}", err);
                }
            }),
        );
    }

    /// Forget which elements already fired so they can fire again.
    pub fn reset(&self) {
        self.animated.borrow_mut().clear();
    }

    pub fn animated_count(&self) -> usize {
        self.animated.borrow().len()
    }
}
