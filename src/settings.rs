//! Game settings and preferences
//!
//! Plain data, loaded from JSON by the host. The simulation only reads it.

use serde::{Deserialize, Serialize};

use crate::consts::SELECTABLE_LEVELS;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum hit particles alive at once
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 256,
            QualityPreset::High => 1024,
        }
    }

    /// Number of points in the aiming trajectory preview
    pub fn preview_points(&self) -> usize {
        match self {
            QualityPreset::Low => 10,
            QualityPreset::Medium => 20,
            QualityPreset::High => 30,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for terrain noise and every random draw in a session
    pub seed: u64,
    /// Level a new game starts on (level selector)
    pub start_level: u32,
    /// Quality preset
    pub quality: QualityPreset,
    /// Hit particle effects
    pub particles: bool,
    /// Predicted arrow path while aiming
    pub trajectory_preview: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED_A7C4,
            start_level: 1,
            quality: QualityPreset::Medium,
            particles: true,
            trajectory_preview: true,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective preview length (0 when disabled)
    pub fn preview_points(&self) -> usize {
        if !self.trajectory_preview {
            0
        } else {
            self.quality.preview_points()
        }
    }

    /// Start level clamped to the selectable range
    pub fn clamped_start_level(&self) -> u32 {
        self.start_level.clamp(1, SELECTABLE_LEVELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "quality": "Low" }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.start_level, 1);
        assert!(settings.particles);
        assert_eq!(settings.max_particles(), 64);
    }

    #[test]
    fn test_disabled_effects() {
        let settings = Settings {
            particles: false,
            trajectory_preview: false,
            ..Settings::default()
        };
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.preview_points(), 0);
    }

    #[test]
    fn test_start_level_clamped() {
        let settings = Settings {
            start_level: 42,
            ..Settings::default()
        };
        assert_eq!(settings.clamped_start_level(), SELECTABLE_LEVELS);
        let settings = Settings {
            start_level: 0,
            ..Settings::default()
        };
        assert_eq!(settings.clamped_start_level(), 1);
    }

    #[test]
    fn test_saved_json_loads_back() {
        let settings = Settings {
            seed: 99,
            start_level: 3,
            particles: false,
            ..Settings::from_preset(QualityPreset::High)
        };
        let json = settings.to_json().unwrap();
        assert!(json.contains(QualityPreset::High.as_str()));
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(Settings::from_json("{ seed: }").is_err());
        assert_eq!(QualityPreset::parse("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }
}
