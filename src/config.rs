use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Gesture thresholds, normalized to [0,1] of frame width/diagonal.
/// Optimal values depend on camera geometry and hand size, so none of
/// these are compiled in.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Tight index–middle pinch gap that counts as a click pose.
    pub click_distance: f32,
    /// Looser index–middle gap that counts as a scroll pose.
    pub scroll_distance: f32,
    /// Index–ring gap keeping the three pinch fingers grouped.
    pub pinch_group_distance: f32,
    pub left_zone_fraction: f32,
    pub right_zone_fraction: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            click_distance: 0.05,
            scroll_distance: 0.10,
            pinch_group_distance: 0.10,
            left_zone_fraction: 0.20,
            right_zone_fraction: 0.80,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Cooldowns {
    pub click_secs: f32,
    pub zone_secs: f32,
}

impl Default for Cooldowns {
    fn default() -> Self {
        Cooldowns {
            click_secs: 1.0,
            zone_secs: 1.5,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Pointer {
    /// First-order IIR low-pass divisor; 1 disables smoothing, larger
    /// trades lag for less jitter.
    pub smoothing_factor: u32,
    /// Inset margin in frame pixels so the hand reaches the screen
    /// edge before the literal frame edge.
    pub mapping_buffer_px: u32,
}

impl Default for Pointer {
    fn default() -> Self {
        Pointer {
            smoothing_factor: 7,
            mapping_buffer_px: 10,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            width: 1920,
            height: 1080,
        }
    }
}

/// Keys sent for the edge zones. Defaults are YouTube's transport
/// keys: `j` skips back, `l` skips forward.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Keys {
    pub zone_left: char,
    pub zone_right: char,
}

impl Default for Keys {
    fn default() -> Self {
        Keys {
            zone_left: 'j',
            zone_right: 'l',
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: Thresholds,
    pub cooldowns: Cooldowns,
    pub pointer: Pointer,
    pub screen: Screen,
    pub keys: Keys,
    /// Signed scroll magnitude per active frame.
    pub scroll_step: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            thresholds: Thresholds::default(),
            cooldowns: Cooldowns::default(),
            pointer: Pointer::default(),
            screen: Screen::default(),
            keys: Keys::default(),
            scroll_step: 5,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<EngineConfig, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast at startup rather than misbehave mid-session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        check_fraction("thresholds.click_distance", t.click_distance)?;
        check_fraction("thresholds.scroll_distance", t.scroll_distance)?;
        check_fraction("thresholds.pinch_group_distance", t.pinch_group_distance)?;
        check_fraction("thresholds.left_zone_fraction", t.left_zone_fraction)?;
        check_fraction("thresholds.right_zone_fraction", t.right_zone_fraction)?;

        if t.left_zone_fraction >= t.right_zone_fraction {
            return Err(ConfigError::Invalid(format!(
                "left zone fraction {} must be below right zone fraction {}",
                t.left_zone_fraction, t.right_zone_fraction
            )));
        }
        if self.pointer.smoothing_factor < 1 {
            return Err(ConfigError::Invalid(
                "pointer.smoothing_factor must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("cooldowns.click_secs", self.cooldowns.click_secs),
            ("cooldowns.zone_secs", self.cooldowns.zone_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(ConfigError::Invalid(
                "screen dimensions must be non-zero".to_string(),
            ));
        }
        if self.scroll_step == 0 {
            return Err(ConfigError::Invalid(
                "scroll_step must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_fraction(name: &str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{name} must lie in [0, 1], got {value}"
        )));
    }
    Ok(())
}
