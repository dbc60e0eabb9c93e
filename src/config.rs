//! Game tunables and difficulty presets
//!
//! A single `GameConfig` is built once at startup, validated, and passed by
//! reference into every system. Nothing reads tunables from globals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Pipe scroll speed multiplier
    pub fn speed_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.85,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.2,
        }
    }

    /// Spawn interval multiplier (larger = more room between pipes)
    pub fn interval_scale(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.15,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.85,
        }
    }

    /// Base gap height multiplier
    pub fn gap_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.15,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.9,
        }
    }
}

/// Configuration rejected at load time
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be finite and positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be a probability in [0, 1] (got {value})")]
    Probability { field: &'static str, value: f32 },
    #[error("moving and pulse chances sum to {total}, which exceeds 1")]
    ChanceSum { total: f32 },
    #[error("{field} range is inverted ({min} > {max})")]
    InvertedRange { field: &'static str, min: f32, max: f32 },
    #[error("largest gap {gap} does not fit in the {available}px between margins")]
    GapTooLarge { gap: f32, available: f32 },
    #[error("speed limits must satisfy max_rise <= 0 <= max_fall (got {max_rise}, {max_fall})")]
    SpeedLimits { max_rise: f32, max_fall: f32 },
    #[error("bird start height {start_y} is outside the playable band")]
    BirdOutOfBounds { start_y: f32 },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Screen geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
    /// Height of the ground strip at the bottom of the screen
    pub ground_height: f32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 600.0,
            ground_height: 80.0,
        }
    }
}

impl PlayfieldConfig {
    /// Y coordinate of the ground collision plane
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.height - self.ground_height
    }
}

/// Bird physics tunables (pixels, seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdConfig {
    pub x: f32,
    pub start_y: f32,
    pub radius: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Velocity set by a flap (negative = up)
    pub flap_velocity: f32,
    /// Most negative velocity allowed
    pub max_rise_speed: f32,
    /// Most positive velocity allowed
    pub max_fall_speed: f32,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            x: 120.0,
            start_y: 260.0,
            radius: 14.0,
            gravity: 1500.0,
            flap_velocity: -440.0,
            max_rise_speed: -520.0,
            max_fall_speed: 720.0,
        }
    }
}

/// Obstacle pair tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    pub width: f32,
    /// Base gap height before variant multipliers
    pub gap: f32,
    /// Scroll speed (px/s)
    pub speed: f32,
    pub spawn_interval_ms: f64,
    pub top_margin: f32,
    pub bottom_margin: f32,
    /// Distance past the right screen edge where new pipes appear
    pub spawn_offset: f32,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            width: 70.0,
            gap: 170.0,
            speed: 150.0,
            spawn_interval_ms: 1500.0,
            top_margin: 60.0,
            bottom_margin: 60.0,
            spawn_offset: 30.0,
        }
    }
}

/// Obstacle variant tunables. Speeds are radians per millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantConfig {
    pub moving_chance: f32,
    pub pulse_chance: f32,
    /// Spawns that must pass before another dynamic variant
    pub dynamic_cooldown: u32,
    pub gap_multiplier_min: f32,
    pub gap_multiplier_max: f32,
    /// Added to the gap multiplier of moving/pulse variants
    pub dynamic_gap_bonus: f32,
    pub offset_amplitude_min: f32,
    pub offset_amplitude_max: f32,
    pub offset_speed_min: f32,
    pub offset_speed_max: f32,
    pub gap_pulse_amplitude_min: f32,
    pub gap_pulse_amplitude_max: f32,
    pub gap_pulse_speed_min: f32,
    pub gap_pulse_speed_max: f32,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            moving_chance: 0.18,
            pulse_chance: 0.12,
            dynamic_cooldown: 1,
            gap_multiplier_min: 0.92,
            gap_multiplier_max: 1.06,
            dynamic_gap_bonus: 0.08,
            offset_amplitude_min: 18.0,
            offset_amplitude_max: 42.0,
            offset_speed_min: 0.0015,
            offset_speed_max: 0.003,
            gap_pulse_amplitude_min: 0.05,
            gap_pulse_amplitude_max: 0.12,
            gap_pulse_speed_min: 0.002,
            gap_pulse_speed_max: 0.004,
        }
    }
}

/// Bonus coins granted once a run reaches `score`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub score: u32,
    pub bonus: f32,
}

/// Coin reward tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub base_coins: f32,
    pub coins_per_score: f32,
    pub milestones: Vec<Milestone>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            base_coins: 1.0,
            coins_per_score: 0.5,
            milestones: vec![
                Milestone { score: 10, bonus: 5.0 },
                Milestone { score: 25, bonus: 10.0 },
                Milestone { score: 50, bonus: 25.0 },
                Milestone { score: 100, bonus: 50.0 },
            ],
        }
    }
}

/// Complete immutable game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield: PlayfieldConfig,
    pub bird: BirdConfig,
    pub pipes: PipeConfig,
    pub variants: VariantConfig,
    pub economy: EconomyConfig,
}

impl GameConfig {
    /// Default tunables scaled by a difficulty preset
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let mut config = Self::default();
        config.apply_difficulty(difficulty);
        config
    }

    /// Scale pipe speed, spawn interval and gap by a preset
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        self.pipes.speed *= difficulty.speed_scale();
        self.pipes.spawn_interval_ms *= difficulty.interval_scale();
        self.pipes.gap *= difficulty.gap_scale();
    }

    /// Parse a (possibly partial) JSON config over the defaults and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Largest gap any variant can open (multiplier, dynamic bonus and pulse peak)
    pub fn max_gap(&self) -> f32 {
        let v = &self.variants;
        self.pipes.gap
            * (v.gap_multiplier_max + v.dynamic_gap_bonus)
            * (1.0 + v.gap_pulse_amplitude_max)
    }

    /// Vertical room between the top margin and the ground-side margin
    pub fn available_gap_span(&self) -> f32 {
        self.playfield.floor_y() - self.pipes.top_margin - self.pipes.bottom_margin
    }

    /// Reject configurations the simulation cannot run sanely
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.playfield;
        let b = &self.bird;
        let pipes = &self.pipes;
        let v = &self.variants;

        positive("playfield.width", p.width as f64)?;
        positive("playfield.height", p.height as f64)?;
        positive("playfield.floor_y", p.floor_y() as f64)?;
        positive("bird.radius", b.radius as f64)?;
        positive("bird.gravity", b.gravity as f64)?;
        positive("pipes.width", pipes.width as f64)?;
        positive("pipes.gap", pipes.gap as f64)?;
        positive("pipes.speed", pipes.speed as f64)?;
        positive("pipes.spawn_interval_ms", pipes.spawn_interval_ms)?;
        non_negative("pipes.top_margin", pipes.top_margin)?;
        non_negative("pipes.bottom_margin", pipes.bottom_margin)?;
        positive("variants.gap_multiplier_min", v.gap_multiplier_min as f64)?;

        if !(b.max_rise_speed <= 0.0 && b.max_fall_speed >= 0.0) || !b.flap_velocity.is_finite() {
            return Err(ConfigError::SpeedLimits {
                max_rise: b.max_rise_speed,
                max_fall: b.max_fall_speed,
            });
        }
        if !(b.start_y >= b.radius && b.start_y <= p.floor_y() - b.radius) {
            return Err(ConfigError::BirdOutOfBounds { start_y: b.start_y });
        }

        probability("variants.moving_chance", v.moving_chance)?;
        probability("variants.pulse_chance", v.pulse_chance)?;
        let total = v.moving_chance + v.pulse_chance;
        if total > 1.0 {
            return Err(ConfigError::ChanceSum { total });
        }
        non_negative("variants.dynamic_gap_bonus", v.dynamic_gap_bonus)?;
        ordered("variants.gap_multiplier", v.gap_multiplier_min, v.gap_multiplier_max)?;
        ordered("variants.offset_amplitude", v.offset_amplitude_min, v.offset_amplitude_max)?;
        ordered("variants.offset_speed", v.offset_speed_min, v.offset_speed_max)?;
        ordered(
            "variants.gap_pulse_amplitude",
            v.gap_pulse_amplitude_min,
            v.gap_pulse_amplitude_max,
        )?;
        ordered("variants.gap_pulse_speed", v.gap_pulse_speed_min, v.gap_pulse_speed_max)?;
        if v.gap_pulse_amplitude_max >= 1.0 {
            return Err(ConfigError::Probability {
                field: "variants.gap_pulse_amplitude_max",
                value: v.gap_pulse_amplitude_max,
            });
        }

        let gap = self.max_gap();
        let available = self.available_gap_span();
        if gap.is_nan() || gap >= available {
            return Err(ConfigError::GapTooLarge { gap, available });
        }

        for m in &self.economy.milestones {
            non_negative("economy.milestone.bonus", m.bonus)?;
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            field,
            value: value as f64,
        })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ConfigError::NonPositive {
            field,
            value: f64::NAN,
        });
    }
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn test_every_preset_is_valid() {
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            GameConfig::for_difficulty(d).validate().unwrap();
        }
    }

    #[test]
    fn test_difficulty_round_trip_names() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("norm"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("nightmare"), None);
        assert_eq!(Difficulty::Easy.as_str(), "easy");
    }

    #[test]
    fn test_oversized_gap_rejected() {
        let mut config = GameConfig::default();
        config.pipes.gap = 390.0;
        assert!(matches!(config.validate(), Err(ConfigError::GapTooLarge { .. })));
    }

    #[test]
    fn test_chance_sum_rejected() {
        let mut config = GameConfig::default();
        config.variants.moving_chance = 0.7;
        config.variants.pulse_chance = 0.4;
        assert!(matches!(config.validate(), Err(ConfigError::ChanceSum { .. })));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = GameConfig::default();
        config.variants.gap_multiplier_min = 1.2;
        config.variants.gap_multiplier_max = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_from_json_partial_override() {
        let config = GameConfig::from_json(r#"{"pipes": {"speed": 200.0}}"#).unwrap();
        assert_eq!(config.pipes.speed, 200.0);
        assert_eq!(config.pipes.gap, PipeConfig::default().gap);
        assert_eq!(config.bird, BirdConfig::default());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            GameConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
