//! Replay format and load-time validation
//!
//! Stored replays are untrusted. Anything that fails validation is treated
//! as "no replay" and never partially played.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_REPLAY_FLAPS, MAX_REPLAY_LABEL_LEN, REPLAY_VERSION};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("replay JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported replay version {0}")]
    UnsupportedVersion(u32),
    #[error("{0} is not a finite number")]
    NonFinite(&'static str),
    #[error("replay holds {0} flaps, more than the allowed maximum")]
    TooManyFlaps(usize),
    #[error("flap {index} goes back in time")]
    FlapsOutOfOrder { index: usize },
    #[error("flap {index} at {offset}ms is past the {duration}ms run")]
    FlapPastEnd {
        index: usize,
        offset: u32,
        duration: u32,
    },
    #[error("{0} label is too long")]
    LabelTooLong(&'static str),
}

/// Who and what a recording belongs to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayMeta {
    pub seed: u32,
    pub seed_label: String,
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
}

/// A finished run: seed plus flap timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayData {
    pub version: u32,
    /// Wall-clock creation time (ms since the Unix epoch)
    pub created_at: f64,
    pub seed: u32,
    pub seed_label: String,
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    pub score: u32,
    pub duration_ms: u32,
    /// Millisecond offsets from run start, non-decreasing
    pub flaps: Vec<u32>,
}

impl ReplayData {
    pub fn meta(&self) -> ReplayMeta {
        ReplayMeta {
            seed: self.seed,
            seed_label: self.seed_label.clone(),
            mode: self.mode.clone(),
            preset: self.preset.clone(),
        }
    }

    /// Check every structural invariant
    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.version != REPLAY_VERSION {
            return Err(ReplayError::UnsupportedVersion(self.version));
        }
        if !self.created_at.is_finite() {
            return Err(ReplayError::NonFinite("createdAt"));
        }
        if self.flaps.len() > MAX_REPLAY_FLAPS {
            return Err(ReplayError::TooManyFlaps(self.flaps.len()));
        }
        for (label, value) in [
            ("seedLabel", Some(&self.seed_label)),
            ("mode", Some(&self.mode)),
            ("preset", self.preset.as_ref()),
        ] {
            if value.is_some_and(|v| v.len() > MAX_REPLAY_LABEL_LEN) {
                return Err(ReplayError::LabelTooLong(label));
            }
        }
        let mut previous = 0;
        for (index, &offset) in self.flaps.iter().enumerate() {
            if offset < previous {
                return Err(ReplayError::FlapsOutOfOrder { index });
            }
            if offset > self.duration_ms {
                return Err(ReplayError::FlapPastEnd {
                    index,
                    offset,
                    duration: self.duration_ms,
                });
            }
            previous = offset;
        }
        Ok(())
    }

    /// Parse and validate stored JSON
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let replay: ReplayData = serde_json::from_str(json)?;
        replay.validate()?;
        Ok(replay)
    }

    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse stored JSON, falling back to no replay on any violation
    pub fn load(json: &str) -> Option<Self> {
        match Self::from_json(json) {
            Ok(replay) => Some(replay),
            Err(e) => {
                log::warn!("Discarding stored replay: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReplayData {
        ReplayData {
            version: REPLAY_VERSION,
            created_at: 1_700_000_000_000.0,
            seed: 1234,
            seed_label: "#1234".to_string(),
            mode: "classic".to_string(),
            preset: Some("normal".to_string()),
            score: 3,
            duration_ms: 5000,
            flaps: vec![0, 250, 250, 900],
        }
    }

    #[test]
    fn test_valid_replay_passes() {
        sample().validate().unwrap();
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"seedLabel\""));
        assert!(json.contains("\"durationMs\""));
        assert!(json.contains("\"createdAt\""));
        assert_eq!(ReplayData::from_json(&json).unwrap(), sample());
    }

    #[test]
    fn test_preset_is_optional() {
        let json = r##"{"version":1,"createdAt":0,"seed":9,"seedLabel":"#9","mode":"daily",
            "score":0,"durationMs":100,"flaps":[]}"##;
        let replay = ReplayData::from_json(json).unwrap();
        assert_eq!(replay.preset, None);
    }

    #[test]
    fn test_rejects_wrong_version() {
        let mut r = sample();
        r.version = 99;
        assert!(matches!(r.validate(), Err(ReplayError::UnsupportedVersion(99))));
    }

    #[test]
    fn test_rejects_unordered_flaps() {
        let mut r = sample();
        r.flaps = vec![0, 300, 200];
        assert!(matches!(
            r.validate(),
            Err(ReplayError::FlapsOutOfOrder { index: 2 })
        ));
    }

    #[test]
    fn test_rejects_flap_after_end() {
        let mut r = sample();
        r.flaps.push(6000);
        assert!(matches!(r.validate(), Err(ReplayError::FlapPastEnd { .. })));
    }

    #[test]
    fn test_rejects_oversized_flap_list() {
        let mut r = sample();
        r.duration_ms = u32::MAX;
        r.flaps = (0..(MAX_REPLAY_FLAPS as u32 + 1)).collect();
        assert!(matches!(r.validate(), Err(ReplayError::TooManyFlaps(_))));
    }

    #[test]
    fn test_rejects_long_labels() {
        let mut r = sample();
        r.mode = "x".repeat(MAX_REPLAY_LABEL_LEN + 1);
        assert!(matches!(r.validate(), Err(ReplayError::LabelTooLong("mode"))));
    }

    #[test]
    fn test_load_falls_back_to_none() {
        assert!(ReplayData::load("").is_none());
        assert!(ReplayData::load("{\"version\":1}").is_none());
        // Negative and fractional offsets are schema violations
        let json = r##"{"version":1,"createdAt":0,"seed":9,"seedLabel":"#9","mode":"daily",
            "score":0,"durationMs":100,"flaps":[-5]}"##;
        assert!(ReplayData::load(json).is_none());
        let json = json.replace("-5", "1.5");
        assert!(ReplayData::load(&json).is_none());
        assert!(ReplayData::load(&sample().to_json().unwrap()).is_some());
    }
}
