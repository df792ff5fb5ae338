use std::f64::consts::PI;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::parse_count;
use crate::page::Page;
use crate::timers::Timers;

pub const PERCENT_ATTRIBUTE: &str = "data-porcentaje";
pub const PERCENT_PROPERTY: &str = "--porcentaje";
pub const RADIAL_RADIUS: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Circular,
    Bar,
    Radial,
}

impl ChartKind {
    /// Label for step `count` of a fill heading to `target`. Only the
    /// circular chart drops the percent sign, and only for full targets.
    pub fn label(self, count: u32, target: u32) -> String {
        match self {
            ChartKind::Circular if target >= 100 => count.to_string(),
            _ => format!("{}%", count),
        }
    }
}

/// Integer fill progress: one unit per tick from 1 up to the target.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartProgress {
    kind: ChartKind,
    target: u32,
    count: u32,
}

impl ChartProgress {
    pub fn new(kind: ChartKind, target: u32) -> Self {
        Self { kind, target, count: 0 }
    }

    /// Tick length that spreads the fill over `total_ms`. A zero target has
    /// no meaningful interval and gets none.
    pub fn tick_interval(total_ms: u32, target: u32) -> Option<u32> {
        if target == 0 {
            return None;
        }
        Some((total_ms / target).max(1))
    }

    pub fn step(&mut self) -> (String, bool) {
        self.count += 1;
        (self.kind.label(self.count, self.target), self.count >= self.target)
    }
}

/// SVG stroke set-up for the radial chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialStroke {
    pub circumference: f64,
    pub final_offset: f64,
}

impl RadialStroke {
    pub fn new(radius: f64, percent: u32) -> Self {
        let circumference = 2.0 * PI * radius;
        let final_offset = circumference - (f64::from(percent) / 100.0) * circumference;
        Self { circumference, final_offset }
    }
}

fn read_percent(raw: Option<String>, attribute: &str) -> Result<u32> {
    let raw = raw.unwrap_or_default();
    parse_count(&raw)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| Error::InvalidNumber { attribute: attribute.to_string(), value: raw })
}

/// Drive `label` from 1 to `target`, spread over the configured duration.
fn run_fill<P: Page + 'static, T: Timers>(
    page: Rc<P>,
    timers: &T,
    config: &Config,
    kind: ChartKind,
    target: u32,
    label: Option<P::Node>,
) {
    let Some(interval) = ChartProgress::tick_interval(config.chart_duration_ms, target) else {
        log::warn!("{:?} chart with a 0% target, skipping the fill", kind);
        if let Some(label) = &label {
            page.set_text(label, &kind.label(0, target));
        }
        return;
    };

    let mut progress = ChartProgress::new(kind, target);
    timers.every(
        interval,
        Box::new(move || {
            let (text, done) = progress.step();
            if let Some(label) = &label {
                page.set_text(label, &text);
            }
            if done {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }),
    );
}

/// Fill the `.grafico-circular` inside `container`. Does nothing if there
/// is none.
pub fn animate_circular<P: Page + 'static, T: Timers>(
    page: &Rc<P>,
    timers: &T,
    config: &Config,
    container: &P::Node,
) -> Result<()> {
    let Some(chart) = page.query_within(container, ".grafico-circular") else {
        return Ok(());
    };
    let percent = read_percent(page.attribute(&chart, PERCENT_ATTRIBUTE), PERCENT_ATTRIBUTE)?;
    let label = page
        .query_within(&chart, ".porcentaje")
        .ok_or_else(|| Error::MissingElement(".grafico-circular .porcentaje".to_string()))?;

    page.set_style(&chart, PERCENT_PROPERTY, &format!("{}%", percent));
    run_fill(page.clone(), timers, config, ChartKind::Circular, percent, Some(label));
    Ok(())
}

/// Fill the `.barra-progreso` inside `container`. The `.valor-barra` label
/// is optional.
pub fn animate_bar<P: Page + 'static, T: Timers>(
    page: &Rc<P>,
    timers: &T,
    config: &Config,
    container: &P::Node,
) -> Result<()> {
    let Some(bar) = page.query_within(container, ".barra-progreso") else {
        return Ok(());
    };
    let percent = read_percent(page.attribute(&bar, PERCENT_ATTRIBUTE), PERCENT_ATTRIBUTE)?;
    let label = page.query_within(container, ".valor-barra");

    page.set_style(&bar, PERCENT_PROPERTY, &format!("{}%", percent));
    run_fill(page.clone(), timers, config, ChartKind::Bar, percent, label);
    Ok(())
}

/// Set up the radial stroke and count its `.valor-radial` label up to the
/// percentage the label starts with.
pub fn animate_radial<P: Page + 'static, T: Timers>(
    page: &Rc<P>,
    timers: &T,
    config: &Config,
    container: &P::Node,
) -> Result<()> {
    let circle = page
        .query_within(container, "svg")
        .and_then(|svg| page.query_within(&svg, ".progreso"));
    let label = page.query_within(container, ".valor-radial");
    let (Some(circle), Some(label)) = (circle, label) else {
        return Ok(());
    };

    let percent = read_percent(Some(page.text(&label)), ".valor-radial")?;
    let stroke = RadialStroke::new(RADIAL_RADIUS, percent);

    let circumference = stroke.circumference.to_string();
    page.set_style(&circle, "stroke-dasharray", &circumference);
    page.set_style(&circle, "stroke-dashoffset", &circumference);
    page.set_style(&circle, PERCENT_PROPERTY, &percent.to_string());
    page.set_style(&circle, "--offset-final", &stroke.final_offset.to_string());

    run_fill(page.clone(), timers, config, ChartKind::Radial, percent, Some(label));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeNode, FakePage, VirtualClock};

    fn setup() -> (Rc<FakePage>, Rc<VirtualClock>, FakeNode) {
        let page = Rc::new(FakePage::new());
        let clock = Rc::new(VirtualClock::new());
        let container = page.element("div", &["tarjeta-estadistica"], None);
        (page, clock, container)
    }

    fn circular(page: &FakePage, container: FakeNode, percent: &str) -> FakeNode {
        let chart = page.element("div", &["grafico-circular"], Some(container));
        page.set_attr(chart, PERCENT_ATTRIBUTE, percent);
        page.element("span", &["porcentaje"], Some(chart))
    }

    #[test]
    fn labels_by_kind() {
        assert_eq!(ChartKind::Circular.label(25, 25), "25%");
        assert_eq!(ChartKind::Circular.label(40, 100), "40");
        assert_eq!(ChartKind::Circular.label(100, 100), "100");
        assert_eq!(ChartKind::Bar.label(100, 100), "100%");
        assert_eq!(ChartKind::Radial.label(25, 25), "25%");
    }

    #[test]
    fn interval_spreads_over_duration() {
        assert_eq!(ChartProgress::tick_interval(2000, 25), Some(80));
        assert_eq!(ChartProgress::tick_interval(2000, 100), Some(20));
        assert_eq!(ChartProgress::tick_interval(2000, 3), Some(666));
        assert_eq!(ChartProgress::tick_interval(2000, 0), None);
    }

    #[test]
    fn progress_steps_from_one() {
        let mut progress = ChartProgress::new(ChartKind::Bar, 2);
        assert_eq!(progress.step(), ("1%".to_string(), false));
        assert_eq!(progress.step(), ("2%".to_string(), true));
    }

    #[test]
    fn circular_fill_completes_in_two_seconds() {
        let (page, clock, container) = setup();
        let label = circular(&page, container, "25");
        animate_circular(&page, clock.as_ref(), &Config::default(), &container).unwrap();

        let chart = page.query_within(&container, ".grafico-circular").unwrap();
        assert_eq!(page.style_of(chart, PERCENT_PROPERTY).as_deref(), Some("25%"));

        clock.advance(80);
        assert_eq!(page.text_of(label), "1%");
        clock.advance(80 * 23);
        assert_eq!(page.text_of(label), "24%");
        clock.advance(80);
        assert_eq!(page.text_of(label), "25%");
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn full_circular_drops_percent_sign() {
        let (page, clock, container) = setup();
        let label = circular(&page, container, "100");
        animate_circular(&page, clock.as_ref(), &Config::default(), &container).unwrap();
        clock.advance(2_000);
        assert_eq!(page.text_of(label), "100");
    }

    #[test]
    fn circular_without_label_is_an_error() {
        let (page, clock, container) = setup();
        let chart = page.element("div", &["grafico-circular"], Some(container));
        page.set_attr(chart, PERCENT_ATTRIBUTE, "50");
        let result = animate_circular(&page, clock.as_ref(), &Config::default(), &container);
        assert!(matches!(result, Err(Error::MissingElement(_))));
    }

    #[test]
    fn bar_keeps_percent_sign_and_tolerates_missing_label() {
        let (page, clock, container) = setup();
        let bar = page.element("div", &["barra-progreso"], Some(container));
        page.set_attr(bar, PERCENT_ATTRIBUTE, "25");
        let label = page.element("span", &["valor-barra"], Some(container));
        animate_bar(&page, clock.as_ref(), &Config::default(), &container).unwrap();
        clock.advance(2_000);
        assert_eq!(page.text_of(label), "25%");
        assert_eq!(page.style_of(bar, PERCENT_PROPERTY).as_deref(), Some("25%"));

        let (page, clock, container) = setup();
        let bar = page.element("div", &["barra-progreso"], Some(container));
        page.set_attr(bar, PERCENT_ATTRIBUTE, "60");
        animate_bar(&page, clock.as_ref(), &Config::default(), &container).unwrap();
        clock.advance(2_000);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn radial_sets_up_stroke_from_label() {
        let (page, clock, container) = setup();
        let svg = page.element("svg", &[], Some(container));
        let circle = page.element("circle", &["progreso"], Some(svg));
        let label = page.element("span", &["valor-radial"], Some(container));
        page.set_text_raw(label, "75%");

        animate_radial(&page, clock.as_ref(), &Config::default(), &container).unwrap();

        let stroke = RadialStroke::new(RADIAL_RADIUS, 75);
        let circumference = stroke.circumference.to_string();
        assert_eq!(page.style_of(circle, "stroke-dasharray"), Some(circumference.clone()));
        assert_eq!(page.style_of(circle, "stroke-dashoffset"), Some(circumference));
        assert_eq!(page.style_of(circle, PERCENT_PROPERTY).as_deref(), Some("75"));
        assert!((stroke.final_offset - stroke.circumference * 0.25).abs() < 1e-9);

        clock.advance(2_000);
        assert_eq!(page.text_of(label), "75%");
    }

    #[test]
    fn radial_without_circle_does_nothing() {
        let (page, clock, container) = setup();
        let label = page.element("span", &["valor-radial"], Some(container));
        page.set_text_raw(label, "75%");
        animate_radial(&page, clock.as_ref(), &Config::default(), &container).unwrap();
        assert_eq!(clock.pending(), 0);
        assert_eq!(page.text_of(label), "75%");
    }

    #[test]
    fn zero_target_sets_final_label_without_ticking() {
        let (page, clock, container) = setup();
        let label = circular(&page, container, "0");
        animate_circular(&page, clock.as_ref(), &Config::default(), &container).unwrap();
        assert_eq!(clock.pending(), 0);
        assert_eq!(page.text_of(label), "0%");
    }
}
