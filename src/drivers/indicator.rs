//! Indicator LED driver.
//!
//! Stateless pass-throughs to the platform's output lines.  Main-loop
//! only: an unmapped indicator is reported through `log`.

use heapless::Vec;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::MAX_INDICATORS;
use crate::error::{ConfigError, Result};
use crate::interrupts::Line;
use crate::ports::Platform;

/// Board indicator outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Led1,
    Led2Red,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub indicator: Indicator,
    pub line: Line,
    /// `true` when driving the line high lights the LED.
    #[serde(default = "default_active_high")]
    pub active_high: bool,
}

fn default_active_high() -> bool {
    true
}

/// Every configured indicator.
#[derive(Debug)]
pub struct IndicatorBank {
    entries: Vec<IndicatorConfig, MAX_INDICATORS>,
}

impl IndicatorBank {
    pub fn from_configs(configs: &[IndicatorConfig]) -> Result<Self> {
        let entries = Vec::from_slice(configs).map_err(|_| ConfigError::TooMany)?;
        Ok(Self { entries })
    }

    /// Configure every line as an output, LED off.
    pub fn configure<P: Platform>(&self, platform: &P) -> Result<()> {
        for entry in &self.entries {
            platform.configure_output(entry.line, !entry.active_high)?;
            debug!("indicator: {:?} on {}", entry.indicator, entry.line);
        }
        Ok(())
    }

    pub fn turn_on<P: Platform>(&self, platform: &P, indicator: Indicator) {
        if let Some(entry) = self.find(indicator) {
            platform.write_line(entry.line, entry.active_high);
        }
    }

    pub fn turn_off<P: Platform>(&self, platform: &P, indicator: Indicator) {
        if let Some(entry) = self.find(indicator) {
            platform.write_line(entry.line, !entry.active_high);
        }
    }

    pub fn toggle<P: Platform>(&self, platform: &P, indicator: Indicator) {
        if let Some(entry) = self.find(indicator) {
            platform.toggle_line(entry.line);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, indicator: Indicator) -> Option<&IndicatorConfig> {
        let entry = self.entries.iter().find(|e| e.indicator == indicator);
        if entry.is_none() {
            warn!("indicator: {:?} not mapped on this board", indicator);
        }
        entry
    }
}
