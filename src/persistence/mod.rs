//! Save/load of player progress and best replays
//!
//! Features:
//! - Versioned JSON snapshot (coins, per-mode best scores, lifetime stats)
//! - Forward migration of version 1 saves
//! - Corrupt or unknown payloads fall back to defaults
//! - Best replay per mode, replaced only by a higher score

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mode::GameMode;
use crate::platform::{self, Storage, StorageError};
use crate::replay::{ReplayData, ReplayError};

/// Current snapshot format version
pub const SAVE_VERSION: u32 = 2;

const SNAPSHOT_KEY: &str = "flappy_sim_save";
const REPLAY_KEY_PREFIX: &str = "flappy_sim_replay_";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save payload is not a JSON object")]
    NotAnObject,
    #[error("unsupported save version {0}")]
    UnsupportedVersion(u64),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Totals across every run ever played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifetimeStats {
    pub runs: u64,
    pub total_score: u64,
    pub total_flaps: u64,
}

/// Everything persisted between sessions except replays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveSnapshot {
    pub version: u32,
    pub coins: u64,
    /// Best score keyed by mode id
    pub best_scores: BTreeMap<String, u32>,
    pub lifetime: LifetimeStats,
}

impl Default for SaveSnapshot {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            coins: 0,
            best_scores: BTreeMap::new(),
            lifetime: LifetimeStats::default(),
        }
    }
}

/// First save format: a single best score and a coin balance
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SaveV1 {
    best_score: u32,
    coins: u64,
}

impl From<SaveV1> for SaveSnapshot {
    fn from(v1: SaveV1) -> Self {
        let mut snapshot = SaveSnapshot {
            coins: v1.coins,
            ..Default::default()
        };
        if v1.best_score > 0 {
            let classic = GameMode::Classic.as_str().to_string();
            snapshot.best_scores.insert(classic, v1.best_score);
        }
        snapshot
    }
}

impl SaveSnapshot {
    /// Parse any known save version, migrating older ones forward
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let version = value
            .as_object()
            .ok_or(SaveError::NotAnObject)?
            .get("version")
            .map(|v| v.as_u64().unwrap_or(0))
            .unwrap_or(1);

        match version {
            1 => {
                let v1: SaveV1 = serde_json::from_value(value)?;
                log::info!("Migrating version 1 save");
                Ok(v1.into())
            }
            2 => {
                let mut snapshot: SaveSnapshot = serde_json::from_value(value)?;
                snapshot.version = SAVE_VERSION;
                Ok(snapshot)
            }
            other => Err(SaveError::UnsupportedVersion(other)),
        }
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse stored JSON, falling back to a fresh save on any error
    pub fn load(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Discarding unreadable save: {}", e);
                Self::default()
            }
        }
    }

    pub fn best_score(&self, mode_id: &str) -> u32 {
        self.best_scores.get(mode_id).copied().unwrap_or(0)
    }

    /// Fold a finished run into the totals. Returns true for a new best.
    pub fn record_run(&mut self, mode_id: &str, score: u32, flaps: usize, coins: u64) -> bool {
        self.coins = self.coins.saturating_add(coins);
        self.lifetime.runs += 1;
        self.lifetime.total_score += score as u64;
        self.lifetime.total_flaps += flaps as u64;

        let best = self.best_scores.entry(mode_id.to_string()).or_insert(0);
        if score > *best {
            *best = score;
            true
        } else {
            false
        }
    }
}

/// Typed access to persisted progress on top of a `Storage` backend
#[derive(Debug)]
pub struct ProgressStore {
    storage: Box<dyn Storage>,
}

impl ProgressStore {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Store backed by the platform default storage
    pub fn open() -> Self {
        Self::new(platform::default_storage())
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn load_snapshot(&self) -> SaveSnapshot {
        match self.storage.get(SNAPSHOT_KEY) {
            Some(json) => SaveSnapshot::load(&json),
            None => {
                log::info!("No save found, starting fresh");
                SaveSnapshot::default()
            }
        }
    }

    pub fn save_snapshot(&mut self, snapshot: &SaveSnapshot) -> Result<(), SaveError> {
        let json = snapshot.to_json()?;
        self.storage.set(SNAPSHOT_KEY, &json)?;
        log::debug!("Save written ({} bytes)", json.len());
        Ok(())
    }

    /// Best replay for `mode_id`, if one is stored and valid
    pub fn load_replay(&self, mode_id: &str) -> Option<ReplayData> {
        let json = self.storage.get(&replay_key(mode_id))?;
        ReplayData::load(&json)
    }

    /// Store `replay` if it beats the stored best. Returns true when written.
    pub fn save_replay(&mut self, mode_id: &str, replay: &ReplayData) -> Result<bool, SaveError> {
        if let Some(current) = self.load_replay(mode_id) {
            if current.score >= replay.score {
                return Ok(false);
            }
        }
        replay.validate()?;
        let json = replay.to_json()?;
        self.storage.set(&replay_key(mode_id), &json)?;
        log::info!("New best replay for {}: score {}", mode_id, replay.score);
        Ok(true)
    }
}

fn replay_key(mode_id: &str) -> String {
    format!("{}{}", REPLAY_KEY_PREFIX, mode_id)
}
