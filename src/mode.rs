//! Game modes and run seeds
//!
//! Classic runs draw a fresh seed every run. Seeded and daily runs reuse one
//! seed so every attempt faces the same obstacle course.

use serde::{Deserialize, Serialize};

use crate::sim::RandomSource;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Which board a run counts towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Classic,
    Daily,
    Seeded,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Daily => "daily",
            GameMode::Seeded => "seeded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "daily" => Some(GameMode::Daily),
            "seeded" | "seed" => Some(GameMode::Seeded),
            _ => None,
        }
    }
}

/// Where the seed for each run comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SeedSpec {
    /// New host-random seed every run
    #[default]
    Random,
    /// Same seed every run
    Fixed(u32),
    /// Seed derived from a date key such as `2026-10-18`
    Daily(String),
}

impl SeedSpec {
    /// Daily challenge for the current UTC date
    pub fn today() -> Self {
        SeedSpec::Daily(date_key(crate::platform::epoch_ms()))
    }

    pub fn mode(&self) -> GameMode {
        match self {
            SeedSpec::Random => GameMode::Classic,
            SeedSpec::Fixed(_) => GameMode::Seeded,
            SeedSpec::Daily(_) => GameMode::Daily,
        }
    }

    /// Seed shared by every run, `None` for random play
    pub fn fixed_seed(&self) -> Option<u32> {
        match self {
            SeedSpec::Random => None,
            SeedSpec::Fixed(seed) => Some(*seed),
            SeedSpec::Daily(key) => Some(seed_from_key(key)),
        }
    }

    /// Seed for the next run
    pub fn next_seed(&self, host: &mut dyn RandomSource) -> u32 {
        self.fixed_seed()
            .unwrap_or_else(|| (host.next() * u32::MAX as f64).floor() as u32)
    }

    /// Human readable label shown next to scores
    pub fn label(&self) -> String {
        match self {
            SeedSpec::Random => "random".to_string(),
            SeedSpec::Fixed(seed) => format!("#{}", seed),
            SeedSpec::Daily(key) => format!("daily {}", key),
        }
    }

    /// Storage id for best score and best replay.
    ///
    /// Seeded and daily boards are kept apart per seed so a ghost always
    /// belongs to the course being played.
    pub fn mode_id(&self) -> String {
        match self {
            SeedSpec::Random => GameMode::Classic.as_str().to_string(),
            SeedSpec::Fixed(seed) => format!("{}-{}", GameMode::Seeded.as_str(), seed),
            SeedSpec::Daily(key) => format!("{}-{}", GameMode::Daily.as_str(), key),
        }
    }
}

/// 32-bit FNV-1a hash of a text seed
pub fn seed_from_key(key: &str) -> u32 {
    key.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ byte as u32).wrapping_mul(FNV_PRIME)
    })
}

/// Parse a user-supplied seed: decimal numbers are used as-is, any other
/// text is hashed. Blank input means no seed.
pub fn parse_seed_param(param: &str) -> Option<u32> {
    let param = param.trim();
    if param.is_empty() {
        return None;
    }
    Some(param.parse::<u32>().unwrap_or_else(|_| seed_from_key(param)))
}

/// UTC calendar date (`YYYY-MM-DD`) of a Unix timestamp in milliseconds
pub fn date_key(epoch_ms: f64) -> String {
    let days = (epoch_ms / MS_PER_DAY).floor() as i64;

    // Civil-from-days over 400-year eras
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };

    format!("{:04}-{:02}-{:02}", year, month, day)
}
