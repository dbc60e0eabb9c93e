//! Capture of a live run's flap timeline

use super::data::{ReplayData, ReplayMeta};
use crate::consts::{MAX_REPLAY_FLAPS, REPLAY_VERSION};
use crate::platform;

#[derive(Debug, Clone, Default)]
pub struct ReplayRecorder {
    meta: ReplayMeta,
    start_ms: Option<f64>,
    flaps: Vec<u32>,
    dropped: usize,
}

impl ReplayRecorder {
    pub fn new(meta: ReplayMeta) -> Self {
        Self {
            meta,
            ..Default::default()
        }
    }

    /// Metadata stamped on the next finished replay
    pub fn set_meta(&mut self, meta: ReplayMeta) {
        self.meta = meta;
    }

    pub fn meta(&self) -> &ReplayMeta {
        &self.meta
    }

    pub fn is_recording(&self) -> bool {
        self.start_ms.is_some()
    }

    pub fn flaps(&self) -> &[u32] {
        &self.flaps
    }

    /// Every flap of the current run, including those past the limit
    pub fn total_flaps(&self) -> usize {
        self.flaps.len() + self.dropped
    }

    /// Flaps were dropped, so the timeline no longer reproduces the run
    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }

    /// Begin a run at `now_ms`, discarding any previous flaps
    pub fn start(&mut self, now_ms: f64) {
        self.start_ms = Some(now_ms);
        self.flaps.clear();
        self.dropped = 0;
    }

    /// Record a flap at `now_ms` as a rounded, non-negative offset
    pub fn record_flap(&mut self, now_ms: f64) {
        let Some(start) = self.start_ms else {
            return;
        };
        if self.flaps.len() >= MAX_REPLAY_FLAPS {
            if self.dropped == 0 {
                log::warn!("Replay flap limit reached, further flaps are not recorded");
            }
            self.dropped += 1;
            return;
        }
        self.flaps.push(offset_ms(start, now_ms));
    }

    /// Freeze the run. `None` if `start` was never called or the timeline
    /// was truncated at the flap limit.
    pub fn finish(&mut self, now_ms: f64, score: u32) -> Option<ReplayData> {
        let start = self.start_ms.take()?;
        if self.is_truncated() {
            log::warn!(
                "Discarding replay: {} of {} flaps were not recorded",
                self.dropped,
                self.total_flaps()
            );
            return None;
        }
        let replay = ReplayData {
            version: REPLAY_VERSION,
            created_at: platform::epoch_ms(),
            seed: self.meta.seed,
            seed_label: self.meta.seed_label.clone(),
            mode: self.meta.mode.clone(),
            preset: self.meta.preset.clone(),
            score,
            duration_ms: offset_ms(start, now_ms),
            flaps: self.flaps.clone(),
        };
        log::info!(
            "Recorded replay: score {}, {} flaps over {}ms",
            replay.score,
            replay.flaps.len(),
            replay.duration_ms
        );
        Some(replay)
    }
}

#[inline]
fn offset_ms(start: f64, now: f64) -> u32 {
    let offset = (now - start).max(0.0).round();
    if offset.is_finite() {
        offset.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ReplayMeta {
        ReplayMeta {
            seed: 42,
            seed_label: "#42".to_string(),
            mode: "classic".to_string(),
            preset: None,
        }
    }

    #[test]
    fn test_records_offsets_from_start() {
        let mut rec = ReplayRecorder::new(meta());
        rec.start(1000.0);
        rec.record_flap(1000.0);
        rec.record_flap(1300.0);
        let replay = rec.finish(1600.0, 5).unwrap();

        assert_eq!(replay.flaps, vec![0, 300]);
        assert_eq!(replay.duration_ms, 600);
        assert_eq!(replay.score, 5);
        assert_eq!(replay.seed, 42);
        assert_eq!(replay.mode, "classic");
        replay.validate().unwrap();
    }

    #[test]
    fn test_offsets_clamped_and_rounded() {
        let mut rec = ReplayRecorder::new(meta());
        rec.start(500.0);
        rec.record_flap(400.0);
        rec.record_flap(516.6);
        rec.record_flap(533.4);
        assert_eq!(rec.flaps(), &[0, 17, 33]);
    }

    #[test]
    fn test_finish_without_start_is_none() {
        let mut rec = ReplayRecorder::new(meta());
        rec.record_flap(10.0);
        assert!(rec.finish(100.0, 1).is_none());
        assert!(rec.flaps().is_empty());
    }

    #[test]
    fn test_finish_stops_recording() {
        let mut rec = ReplayRecorder::new(meta());
        rec.start(0.0);
        assert!(rec.is_recording());
        rec.finish(100.0, 0).unwrap();
        assert!(!rec.is_recording());
        assert!(rec.finish(200.0, 0).is_none());
    }

    #[test]
    fn test_start_clears_previous_run() {
        let mut rec = ReplayRecorder::new(meta());
        rec.start(0.0);
        rec.record_flap(10.0);
        rec.start(100.0);
        assert!(rec.flaps().is_empty());
    }

    #[test]
    fn test_flap_limit() {
        let mut rec = ReplayRecorder::new(meta());
        rec.start(0.0);
        for i in 0..(MAX_REPLAY_FLAPS + 10) {
            rec.record_flap(i as f64);
        }
        assert_eq!(rec.flaps().len(), MAX_REPLAY_FLAPS);
        assert_eq!(rec.total_flaps(), MAX_REPLAY_FLAPS + 10);
        assert!(rec.is_truncated());
    }

    #[test]
    fn test_truncated_run_yields_no_replay() {
        let mut rec = ReplayRecorder::new(meta());
        rec.start(0.0);
        for i in 0..(MAX_REPLAY_FLAPS + 50) {
            rec.record_flap(i as f64);
        }
        assert!(rec.finish(60_000.0, 12).is_none());
        assert!(!rec.is_recording());

        // The next run records normally again
        rec.start(0.0);
        rec.record_flap(0.0);
        assert!(!rec.is_truncated());
        assert_eq!(rec.finish(100.0, 0).unwrap().flaps, vec![0]);
    }
}
