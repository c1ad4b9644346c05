//! Board configuration
//!
//! Describes every interrupt source and indicator the HAL drives.  Fixed
//! at init time; not reconfigurable at runtime.  The compiled-in board map
//! comes from [`crate::pins`]; board variants can be loaded from JSON.

use heapless::Vec;
use log::info;
use serde::{Deserialize, Serialize};

use crate::drivers::debounce::{BOOSTERPACK_COOLDOWN_MS, LAUNCHPAD_COOLDOWN_MS};
use crate::drivers::indicator::{Indicator, IndicatorConfig};
use crate::error::ConfigError;
use crate::events::EventKind;
use crate::interrupts::{Edge, Line, Pull};
use crate::pins;

/// Capacity of the source table.
pub const MAX_SOURCES: usize = 8;
/// Capacity of the indicator table.
pub const MAX_INDICATORS: usize = 4;
/// Longest accepted debounce window.
pub const MAX_COOLDOWN_MS: u32 = 60_000;

/// One interrupt-driven input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Event reported when this input is pressed.
    pub kind: EventKind,
    /// Physical port and pin.
    pub line: Line,
    #[serde(default)]
    pub edge: Edge,
    #[serde(default)]
    pub pull: Pull,
    /// Debounce window (milliseconds).
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u32,
}

fn default_cooldown_ms() -> u32 {
    LAUNCHPAD_COOLDOWN_MS
}

impl SourceConfig {
    /// Active-low button on a falling edge with the internal pull-up.
    pub const fn button(kind: EventKind, line: Line, cooldown_ms: u32) -> Self {
        Self {
            kind,
            line,
            edge: Edge::Falling,
            pull: Pull::Up,
            cooldown_ms,
        }
    }
}

/// Complete HAL configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalConfig {
    pub sources: Vec<SourceConfig, MAX_SOURCES>,
    #[serde(default)]
    pub indicators: Vec<IndicatorConfig, MAX_INDICATORS>,
}

impl Default for HalConfig {
    fn default() -> Self {
        let sources = [
            SourceConfig::button(EventKind::LaunchpadS1, pins::LAUNCHPAD_S1, LAUNCHPAD_COOLDOWN_MS),
            SourceConfig::button(EventKind::LaunchpadS2, pins::LAUNCHPAD_S2, LAUNCHPAD_COOLDOWN_MS),
            SourceConfig::button(EventKind::BoosterpackS1, pins::BOOSTERPACK_S1, BOOSTERPACK_COOLDOWN_MS),
            SourceConfig::button(EventKind::BoosterpackS2, pins::BOOSTERPACK_S2, BOOSTERPACK_COOLDOWN_MS),
            SourceConfig::button(
                EventKind::BoosterpackJoystick,
                pins::BOOSTERPACK_JOYSTICK,
                BOOSTERPACK_COOLDOWN_MS,
            ),
        ];
        let indicators = [
            IndicatorConfig { indicator: Indicator::Led1, line: pins::LED1, active_high: true },
            IndicatorConfig { indicator: Indicator::Led2Red, line: pins::LED2_RED, active_high: true },
        ];

        Self {
            sources: sources.into_iter().collect(),
            indicators: indicators.into_iter().collect(),
        }
    }
}

impl HalConfig {
    /// Parse and validate a JSON board description.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| {
            log::warn!("config: parse failed: {e}");
            ConfigError::Parse
        })?;
        config.validate()?;
        info!(
            "config: loaded {} sources, {} indicators",
            config.sources.len(),
            config.indicators.len()
        );
        Ok(config)
    }

    /// Reject configurations the HAL cannot drive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }

        let mut lines: Vec<Line, { MAX_SOURCES + MAX_INDICATORS }> = Vec::new();
        let mut claim = |line: Line| -> Result<(), ConfigError> {
            if !line.is_valid() {
                return Err(ConfigError::InvalidLine(line));
            }
            if lines.contains(&line) {
                return Err(ConfigError::DuplicateLine(line));
            }
            lines.push(line).map_err(|_| ConfigError::TooMany)
        };

        for (i, source) in self.sources.iter().enumerate() {
            claim(source.line)?;
            if source.cooldown_ms > MAX_COOLDOWN_MS {
                return Err(ConfigError::CooldownOutOfRange(source.cooldown_ms));
            }
            if self.sources[..i].iter().any(|s| s.kind == source.kind) {
                return Err(ConfigError::DuplicateKind(source.kind));
            }
        }

        for (i, entry) in self.indicators.iter().enumerate() {
            claim(entry.line)?;
            if self.indicators[..i].iter().any(|e| e.indicator == entry.indicator) {
                return Err(ConfigError::DuplicateIndicator(entry.indicator));
            }
        }

        Ok(())
    }

    pub fn source(&self, kind: EventKind) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.kind == kind)
    }
}
