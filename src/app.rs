//! Statistics page orchestrator: builds every component, initializes them in
//! a fixed order and routes page-level events.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::animations::counter::Counter;
use crate::animations::{ScrollAnimator, MARKER_SELECTOR, REVEALED_CLASS};
use crate::config::Config;
use crate::effects::{HoverEffects, ImageEffects, MissionButtons};
use crate::error::Result;
use crate::page::{Page, Target};
use crate::perf::{PerfEntry, PerfReport, PerformanceMonitor};
use crate::sound::SoundEffects;
use crate::timers::Timers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initialized,
    Failed,
    Stopped,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::Initialized => "initialized",
            Lifecycle::Failed => "failed",
            Lifecycle::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Resize,
    VisibilityChange { hidden: bool },
    Error { message: String },
}

pub struct StatsApp<P: Page, T: Timers> {
    page: Rc<P>,
    timers: Rc<T>,
    config: Rc<Config>,
    monitor: RefCell<PerformanceMonitor>,
    scroll: Rc<ScrollAnimator<P, T>>,
    hover: HoverEffects<P>,
    images: ImageEffects<P, T>,
    buttons: MissionButtons<P, T>,
    sound: Rc<SoundEffects<P>>,
    state: Cell<Lifecycle>,
    scheduled_report: RefCell<Option<PerfReport>>,
}

impl<P: Page + 'static, T: Timers + 'static> StatsApp<P, T> {
    pub fn new(page: Rc<P>, timers: Rc<T>, config: Config) -> Rc<Self> {
        let config = Rc::new(config);
        Rc::new(Self {
            monitor: RefCell::new(PerformanceMonitor::new(timers.now())),
            scroll: ScrollAnimator::new(page.clone(), timers.clone(), config.clone()),
            hover: HoverEffects::new(page.clone()),
            images: ImageEffects::new(page.clone(), timers.clone()),
            buttons: MissionButtons::new(page.clone(), timers.clone(), config.clone()),
            sound: SoundEffects::new(page.clone()),
            page,
            timers,
            config,
            state: Cell::new(Lifecycle::Uninitialized),
            scheduled_report: RefCell::new(None),
        })
    }

    pub fn state(&self) -> Lifecycle {
        self.state.get()
    }

    pub fn sound(&self) -> &SoundEffects<P> {
        &self.sound
    }

    pub fn entries(&self) -> Vec<PerfEntry> {
        self.monitor.borrow().entries().to_vec()
    }

    fn record(&self, label: impl Into<String>) {
        let now = self.timers.now();
        let heap = self.page.heap_used();
        self.monitor.borrow_mut().record(label, now, heap);
    }

    pub fn report(&self) -> PerfReport {
        self.monitor.borrow().report(self.timers.now(), self.page.heap_used())
    }

    /// The report logged automatically after start-up, once it has run.
    pub fn scheduled_report(&self) -> Option<PerfReport> {
        self.scheduled_report.borrow().clone()
    }

    fn running(&self) -> bool {
        self.state.get() == Lifecycle::Initialized
    }

    /// Detach from the page: every listener and observer goes away and
    /// pending reveals and the start-up report are skipped.
    pub fn teardown(&self) {
        if self.state.replace(Lifecycle::Stopped) == Lifecycle::Stopped {
            return;
        }
        self.page.teardown();
        log::info!("Statistics app stopped");
    }

    /// Bring the page to life. Runs at most once; a failed attempt is final.
    pub fn init(self: &Rc<Self>) {
        if self.state.get() != Lifecycle::Uninitialized {
            return;
        }
        self.record("Inicio inicialización");

        match self.init_components() {
            Ok(()) => {
                self.state.set(Lifecycle::Initialized);
                self.record("Inicialización completada");
                log::info!("Statistics app initialized");

                let app = Rc::downgrade(self);
                self.timers.after(
                    self.config.report_delay_ms,
                    Box::new(move || {
                        let Some(app) = app.upgrade().filter(|app| app.running()) else {
                            return;
                        };
                        let report = app.report();
                        report.log();
                        *app.scheduled_report.borrow_mut() = Some(report);
                    }),
                );
            }
            Err(err) => {
                log::error!("Statistics app failed to initialize: {}", err);
                self.record(format!("Error: {}", err));
                self.state.set(Lifecycle::Failed);
            }
        }
    }

    fn init_components(self: &Rc<Self>) -> Result<()> {
        self.scroll.init()?;
        self.hover.init()?;
        self.images.init()?;
        self.buttons.init()?;
        self.sound.init()?;
        self.listen_page_events()?;

        let app = Rc::downgrade(self);
        self.timers.after(
            self.config.initial_reveal_ms,
            Box::new(move || {
                if let Some(app) = app.upgrade().filter(|app| app.running()) {
                    app.reveal_visible();
                }
            }),
        );
        Ok(())
    }

    fn listen_page_events(self: &Rc<Self>) -> Result<()> {
        let app = Rc::downgrade(self);
        self.page.listen(
            Target::Window,
            "resize",
            Box::new(move |_| {
                if let Some(app) = app.upgrade() {
                    app.handle(PageEvent::Resize);
                }
            }),
        )?;

        let app = Rc::downgrade(self);
        self.page.listen(
            Target::Document,
            "visibilitychange",
            Box::new(move |_| {
                if let Some(app) = app.upgrade() {
                    let hidden = app.page.document_hidden();
                    app.handle(PageEvent::VisibilityChange { hidden });
                }
            }),
        )?;

        let app = Rc::downgrade(self);
        self.page.listen(
            Target::Window,
            "error",
            Box::new(move |event| {
                if let Some(app) = app.upgrade() {
                    let message = event.message.clone().unwrap_or_default();
                    app.handle(PageEvent::Error { message });
                }
            }),
        )
    }

    pub fn handle(self: &Rc<Self>, event: PageEvent) {
        match event {
            PageEvent::Resize => self.recompute(),
            PageEvent::VisibilityChange { hidden } => {
                let state = if hidden { "paused" } else { "running" };
                for element in self.page.query_all(&revealed_selector()) {
                    self.page.set_style(&element, "animation-play-state", state);
                }
            }
            PageEvent::Error { message } => {
                log::error!("Uncaught error: {}", message);
                self.record(format!("Error no controlado: {}", message));
            }
        }
    }

    /// Clear reveal state and, once layout settles, re-reveal whatever is on
    /// screen. Counters run again; charts do not.
    fn recompute(self: &Rc<Self>) {
        self.scroll.reset();
        for element in self.page.query_all(&revealed_selector()) {
            self.page.remove_class(&element, REVEALED_CLASS);
        }

        let app = Rc::downgrade(self);
        self.timers.after(
            self.config.resize_settle_ms,
            Box::new(move || {
                if let Some(app) = app.upgrade().filter(|app| app.running()) {
                    app.reveal_visible();
                }
            }),
        );
    }

    /// Reveal marked elements already in view without waiting for a scroll.
    pub fn reveal_visible(&self) {
        let cutoff = self.page.viewport_height() * self.config.visible_fraction;
        for element in self.page.query_all(MARKER_SELECTOR) {
            if self.page.bounding_rect(&element).top >= cutoff {
                continue;
            }
            self.page.add_class(&element, REVEALED_CLASS);

            let Some(counter) = self.page.query_within(&element, ".contador-animado") else {
                continue;
            };
            match Counter::new(self.page.clone(), self.timers.clone(), &self.config, counter) {
                Ok(counter) => counter.animate(),
                Err(err) => log::warn!("Skipping counter: {}", err),
            }
        }
    }
}

fn revealed_selector() -> String {
    format!("{}.{}", MARKER_SELECTOR, REVEALED_CLASS)
}
