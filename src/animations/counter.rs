use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{format_counter, parse_count};
use crate::page::Page;
use crate::timers::Timers;

pub const VALUE_ATTRIBUTE: &str = "data-valor";
const PULSE_MS: u32 = 300;

/// Stepping state for one counter run: `steps` equal increments from 0,
/// clamped to the target on the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterState {
    current: f64,
    target: u64,
    increment: f64,
    ticks: u32,
}

impl CounterState {
    pub fn new(target: u64, steps: u32) -> Self {
        Self {
            current: 0.0,
            target,
            increment: target as f64 / f64::from(steps.max(1)),
            ticks: 0,
        }
    }

    /// Advance one tick. Returns the value to show and whether this was the
    /// final tick.
    pub fn step(&mut self) -> (f64, bool) {
        self.ticks += 1;
        self.current += self.increment;
        let target = self.target as f64;
        if self.current >= target {
            self.current = target;
            return (self.current, true);
        }
        (self.current, false)
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }
}

/// A counter bound to one element. The displayed value lives in the
/// element's `.valor` child, or in the element itself when there is none.
pub struct Counter<P: Page, T: Timers> {
    page: Rc<P>,
    timers: Rc<T>,
    element: P::Node,
    value_node: P::Node,
    target: u64,
    prefix: String,
    steps: u32,
    tick_ms: u32,
    separator: char,
    pulse: bool,
    animated: Cell<bool>,
}

impl<P: Page + 'static, T: Timers + 'static> Counter<P, T> {
    pub fn new(page: Rc<P>, timers: Rc<T>, config: &Config, element: P::Node) -> Result<Self> {
        let raw = page.attribute(&element, VALUE_ATTRIBUTE).unwrap_or_default();
        let target = parse_count(&raw).ok_or_else(|| Error::InvalidNumber {
            attribute: VALUE_ATTRIBUTE.to_string(),
            value: raw.clone(),
        })?;
        let prefix = page
            .query_within(&element, ".prefijo")
            .map(|node| page.text(&node))
            .unwrap_or_default();
        let value_node = page
            .query_within(&element, ".valor")
            .unwrap_or_else(|| element.clone());

        Ok(Self {
            page,
            timers,
            element,
            value_node,
            target,
            prefix,
            steps: config.counter_steps,
            tick_ms: config.counter_tick_ms,
            separator: config.thousands_separator,
            pulse: false,
            animated: Cell::new(false),
        })
    }

    /// Scale the element up briefly once the final value lands.
    pub fn with_pulse(mut self) -> Self {
        self.pulse = true;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Start the count. Only the first call on an instance does anything.
    pub fn animate(&self) {
        if self.animated.replace(true) {
            return;
        }

        let page = self.page.clone();
        let timers = self.timers.clone();
        let element = self.element.clone();
        let value_node = self.value_node.clone();
        let target = self.target;
        let separator = self.separator;
        let pulse = self.pulse;
        let mut state = CounterState::new(target, self.steps);

        self.timers.every(
            self.tick_ms,
            Box::new(move || {
                let (value, done) = state.step();
                page.set_text(&value_node, &format_counter(value, target, separator));
                if !done {
                    return ControlFlow::Continue(());
                }
                if pulse {
                    page.set_style(&element, "transform", "scale(1.1)");
                    let page = page.clone();
                    let element = element.clone();
                    timers.after(
                        PULSE_MS,
                        Box::new(move || page.set_style(&element, "transform", "scale(1)")),
                    );
                }
                ControlFlow::Break(())
            }),
        );
    }
}
