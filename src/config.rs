use log::Level;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::page::Page;

/// Element whose JSON body overrides the defaults below.
pub const CONFIG_SELECTOR: &str = "#landing-config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Envelope for every chart fill, whatever its target.
    pub chart_duration_ms: u32,
    /// Gap between staggered entrance reveals.
    pub stagger_ms: u32,
    pub scroll_threshold: f64,
    pub root_margin: String,
    pub counter_steps: u32,
    pub counter_tick_ms: u32,
    /// Fraction of the viewport height above which an element counts as
    /// already on screen.
    pub visible_fraction: f64,
    pub resize_settle_ms: u32,
    pub initial_reveal_ms: u32,
    pub report_delay_ms: u32,
    pub ripple_ms: u32,
    pub thousands_separator: char,
    pub category_colors: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chart_duration_ms: 2000,
            stagger_ms: 100,
            scroll_threshold: 0.1,
            root_margin: "0px 0px -100px 0px".to_string(),
            counter_steps: 50,
            counter_tick_ms: 30,
            visible_fraction: 0.8,
            resize_settle_ms: 100,
            initial_reveal_ms: 500,
            report_delay_ms: 3000,
            ripple_ms: 600,
            thousands_separator: ',',
            category_colors: vec![
                "#e74c3c".to_string(), // red
                "#f1c40f".to_string(), // yellow
                "#3498db".to_string(), // blue
                "#2ecc71".to_string(), // green
                "#9b59b6".to_string(), // purple
            ],
        }
    }
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn category_color(&self, index: usize) -> &str {
        if self.category_colors.is_empty() {
            return "#8A2BE2";
        }
        &self.category_colors[index % self.category_colors.len()]
    }
}

/// Read overrides from the page, falling back to defaults.
pub fn load<P: Page>(page: &P) -> Config {
    let Some(node) = page.query_all(CONFIG_SELECTOR).into_iter().next() else {
        return Config::default();
    };
    match Config::from_json(&page.text(&node)) {
        Ok(config) => {
            log::debug!("Loaded landing config overrides");
            config
        }
        Err(err) => {
            log::warn!("Ignoring {}: {}", CONFIG_SELECTOR, err);
            Config::default()
        }
    }
}

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // verbose while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}
