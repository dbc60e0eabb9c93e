//! Headless play session
//!
//! Ties the state machine, flap input, the simulation world, replay
//! recording, ghost playback and persisted progress together behind one
//! `frame(dt_ms)` call. Host frame time is clamped, accumulated and drained
//! in fixed steps, so a run is identical at any frame rate and its replay
//! verifies exactly.

use serde::Serialize;

use crate::config::{ConfigError, Difficulty, GameConfig};
use crate::consts::{FIXED_STEP_MS, MAX_FRAME_MS, MAX_SUBSTEPS};
use crate::economy::coins_for_score;
use crate::mode::SeedSpec;
use crate::persistence::{ProgressStore, SaveSnapshot};
use crate::replay::{ReplayData, ReplayMeta, ReplayPlayer, ReplayRecorder};
use crate::sim::{
    Bird, GameEvent, GameState, GameStateMachine, HostRandom, InputSystem, RandomSource,
    TickInput, World, tick,
};

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub seed: u32,
    pub score: u32,
    pub coins: u64,
    pub steps: u64,
    /// Beat the stored best score for this mode
    pub new_best: bool,
    pub replay: Option<ReplayData>,
}

/// Bird data for drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BirdView {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    pub radius: f32,
    pub tilt: f32,
}

impl From<&Bird> for BirdView {
    fn from(bird: &Bird) -> Self {
        Self {
            x: bird.x,
            y: bird.y,
            velocity: bird.velocity,
            radius: bird.radius,
            tilt: bird.tilt(),
        }
    }
}

/// One pipe pair for drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipeView {
    pub x: f32,
    pub width: f32,
    pub top_height: f32,
    pub bottom_y: f32,
    pub bottom_height: f32,
}

/// Plain snapshot of everything a renderer or HUD needs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderView {
    pub state: GameState,
    pub score: u32,
    pub best_score: u32,
    pub coins: u64,
    pub seed_label: String,
    pub ground_y: f32,
    pub bird: BirdView,
    pub ghost: Option<BirdView>,
    pub pipes: Vec<PipeView>,
}

pub struct Session {
    config: GameConfig,
    preset: Option<Difficulty>,
    seeds: SeedSpec,
    host_rng: Box<dyn RandomSource>,
    machine: GameStateMachine,
    input: InputSystem,
    world: World,
    recorder: ReplayRecorder,
    ghost: ReplayPlayer,
    store: ProgressStore,
    snapshot: SaveSnapshot,
    best_replay: Option<ReplayData>,
    accumulator_ms: f64,
    run_seed: u32,
    last_result: Option<RunResult>,
}

impl Session {
    /// Session with a difficulty preset applied to the default tunables
    pub fn new(difficulty: Difficulty, seeds: SeedSpec, store: ProgressStore) -> Self {
        let mut session = Self::build(GameConfig::for_difficulty(difficulty), seeds, store);
        session.preset = Some(difficulty);
        session
    }

    /// Session with custom tunables, rejected if they cannot produce a valid gap
    pub fn with_config(
        config: GameConfig,
        seeds: SeedSpec,
        store: ProgressStore,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seeds, store))
    }

    fn build(config: GameConfig, seeds: SeedSpec, store: ProgressStore) -> Self {
        let mut host_rng: Box<dyn RandomSource> = Box::new(HostRandom::new());
        let run_seed = seeds.next_seed(&mut *host_rng);
        Self {
            world: World::new(&config, run_seed),
            ghost: ReplayPlayer::new(&config.bird),
            config,
            preset: None,
            seeds,
            host_rng,
            machine: GameStateMachine::new(),
            input: InputSystem::new(),
            recorder: ReplayRecorder::default(),
            store,
            snapshot: SaveSnapshot::default(),
            best_replay: None,
            accumulator_ms: 0.0,
            run_seed,
            last_result: None,
        }
    }

    /// Replace the source of per-run seeds for random play
    pub fn with_host_rng(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.host_rng = rng;
        self
    }

    /// Load persisted progress and move to READY
    pub fn boot(&mut self) {
        if self.machine.state() != GameState::Boot {
            return;
        }
        self.snapshot = self.store.load_snapshot();
        self.best_replay = self.store.load_replay(&self.seeds.mode_id());
        log::info!(
            "Booted {}: best {}, {} coins, ghost {}",
            self.seeds.label(),
            self.best_score(),
            self.snapshot.coins,
            if self.best_replay.is_some() { "available" } else { "none" }
        );
        self.machine.transition(GameEvent::BootComplete);
    }

    /// Switch mode or seed. Ignored during a run.
    pub fn select_seeds(&mut self, seeds: SeedSpec) {
        if self.machine.state() == GameState::Playing {
            return;
        }
        self.seeds = seeds;
        self.best_replay = self.store.load_replay(&self.seeds.mode_id());
        self.run_seed = self.seeds.next_seed(&mut *self.host_rng);
        self.world.reset(self.run_seed);
    }

    pub fn request_flap(&mut self) {
        self.input.request_flap();
    }

    /// Advance by one host frame. Returns the number of fixed steps taken.
    pub fn frame(&mut self, dt_ms: f64) -> u32 {
        let dt_ms = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };

        match self.machine.state() {
            GameState::Boot => {
                self.input.clear();
                0
            }
            GameState::Ready => {
                if !self.input.has_pending_flap() {
                    return 0;
                }
                self.start_run();
                self.accumulator_ms += dt_ms;
                self.drain()
            }
            GameState::Playing => {
                self.accumulator_ms += dt_ms;
                self.drain()
            }
            GameState::GameOver => {
                self.input.clear();
                0
            }
        }
    }

    /// GAME_OVER back to READY with a fresh world
    pub fn restart(&mut self) {
        if self.machine.state() != GameState::GameOver {
            return;
        }
        self.machine.transition(GameEvent::Restart);
        self.input.clear();
        self.ghost.stop();
        self.accumulator_ms = 0.0;
        self.world.reset(self.run_seed);
    }

    fn start_run(&mut self) {
        self.run_seed = self.seeds.next_seed(&mut *self.host_rng);
        self.world.reset(self.run_seed);
        self.accumulator_ms = 0.0;
        self.last_result = None;

        self.recorder.set_meta(ReplayMeta {
            seed: self.run_seed,
            seed_label: self.seeds.label(),
            mode: self.seeds.mode().as_str().to_string(),
            preset: self.preset.map(|d| d.as_str().to_string()),
        });
        self.recorder.start(0.0);

        match &self.best_replay {
            Some(best) => self.ghost.start(best.clone()),
            None => self.ghost.stop(),
        }

        self.machine.transition(GameEvent::Start);
        log::info!("Run started: seed {} ({})", self.run_seed, self.seeds.label());
    }

    fn drain(&mut self) -> u32 {
        let ground_y = self.world.ground().y;
        let mut substeps = 0;
        while self.accumulator_ms >= FIXED_STEP_MS && substeps < MAX_SUBSTEPS {
            self.accumulator_ms -= FIXED_STEP_MS;
            substeps += 1;

            let flap = self.input.consume_flap();
            if flap {
                self.recorder.record_flap(self.world.elapsed_ms());
            }
            let outcome = tick(&mut self.world, &TickInput { flap });
            self.ghost.update(FIXED_STEP_MS, ground_y);

            if outcome.points > 0 {
                log::debug!("Score {}", self.world.score());
            }
            if outcome.hit() {
                log::debug!("Collision: {:?}", outcome.collision);
                self.end_run();
                break;
            }
        }
        substeps
    }

    fn end_run(&mut self) {
        let score = self.world.score();
        let flaps = self.recorder.total_flaps();
        let replay = self.recorder.finish(self.world.elapsed_ms(), score);
        let coins = coins_for_score(score, &self.config.economy);
        let mode_id = self.seeds.mode_id();

        let new_best = self.snapshot.record_run(&mode_id, score, flaps, coins);
        if let Err(e) = self.store.save_snapshot(&self.snapshot) {
            log::warn!("Failed to save progress: {}", e);
        }
        if let Some(replay) = &replay {
            match self.store.save_replay(&mode_id, replay) {
                Ok(true) => self.best_replay = Some(replay.clone()),
                Ok(false) => {}
                Err(e) => log::warn!("Failed to save replay: {}", e),
            }
        }

        self.input.clear();
        self.ghost.stop();
        self.accumulator_ms = 0.0;
        self.machine.transition(GameEvent::Hit);
        log::info!(
            "Run over: score {}, +{} coins{}",
            score,
            coins,
            if new_best { " (new best)" } else { "" }
        );

        self.last_result = Some(RunResult {
            seed: self.run_seed,
            score,
            coins,
            steps: self.world.steps(),
            new_best,
            replay,
        });
    }

    pub fn state(&self) -> GameState {
        self.machine.state()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seeds(&self) -> &SeedSpec {
        &self.seeds
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn run_seed(&self) -> u32 {
        self.run_seed
    }

    pub fn snapshot(&self) -> &SaveSnapshot {
        &self.snapshot
    }

    pub fn best_score(&self) -> u32 {
        self.snapshot.best_score(&self.seeds.mode_id())
    }

    pub fn best_replay(&self) -> Option<&ReplayData> {
        self.best_replay.as_ref()
    }

    pub fn ghost(&self) -> &ReplayPlayer {
        &self.ghost
    }

    pub fn last_result(&self) -> Option<&RunResult> {
        self.last_result.as_ref()
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn render_view(&self) -> RenderView {
        let ghost = (self.machine.state() == GameState::Playing && self.ghost.is_active())
            .then(|| BirdView::from(self.ghost.bird()));
        RenderView {
            state: self.machine.state(),
            score: self.world.score(),
            best_score: self.best_score(),
            coins: self.snapshot.coins,
            seed_label: self.seeds.label(),
            ground_y: self.world.ground().y,
            bird: BirdView::from(self.world.bird()),
            ghost,
            pipes: self
                .world
                .pipes()
                .iter()
                .map(|p| PipeView {
                    x: p.x,
                    width: p.width,
                    top_height: p.top_height(),
                    bottom_y: p.bottom_y(),
                    bottom_height: p.bottom_height(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_REPLAY_FLAPS;
    use crate::platform::{MemoryStorage, Storage};
    use crate::replay::verify_replay;
    use crate::sim::ScriptedRandom;

    fn session(seeds: SeedSpec) -> Session {
        let store = ProgressStore::new(Box::new(MemoryStorage::new()));
        let mut session = Session::new(Difficulty::Normal, seeds, store);
        session.boot();
        session
    }

    /// Flap when below the next gap centre, like a cautious player
    fn autopilot(session: &mut Session) {
        let view = session.render_view();
        let bird = view.bird;
        let target = view
            .pipes
            .iter()
            .find(|p| p.x + p.width + bird.radius >= bird.x)
            .map(|p| p.top_height + (p.bottom_y - p.top_height) * 0.65)
            .unwrap_or(session.config().bird.start_y);
        if bird.y > target && bird.velocity > -50.0 {
            session.request_flap();
        }
    }

    /// Play one run with uneven frame times, giving up after a few pipes
    fn play_run(session: &mut Session) -> RunResult {
        session.request_flap();
        let frames = [7.0, 16.0, 33.0, 12.5, 16.7];
        let mut i = 0;
        while session.state() != GameState::GameOver {
            if session.world().score() < 5 {
                autopilot(session);
            }
            session.frame(frames[i % frames.len()]);
            i += 1;
            assert!(i < 200_000, "run never ended");
        }
        session.last_result().cloned().unwrap()
    }

    #[test]
    fn test_boot_moves_to_ready() {
        let store = ProgressStore::new(Box::new(MemoryStorage::new()));
        let mut session = Session::new(Difficulty::Normal, SeedSpec::Fixed(1), store);
        assert_eq!(session.state(), GameState::Boot);
        session.request_flap();
        assert_eq!(session.frame(16.0), 0);
        session.boot();
        assert_eq!(session.state(), GameState::Ready);
        // The flap pressed while booting does not start a run
        assert_eq!(session.frame(16.7), 0);
        assert_eq!(session.state(), GameState::Ready);
        assert_eq!(session.world().steps(), 0);
    }

    #[test]
    fn test_ready_waits_for_flap() {
        let mut session = session(SeedSpec::Fixed(1));
        for _ in 0..10 {
            assert_eq!(session.frame(16.0), 0);
        }
        assert_eq!(session.state(), GameState::Ready);
        assert_eq!(session.world().steps(), 0);
    }

    #[test]
    fn test_first_flap_starts_run_and_is_recorded_at_zero() {
        let mut session = session(SeedSpec::Fixed(5));
        session.request_flap();
        assert_eq!(session.frame(20.0), 1);
        assert_eq!(session.state(), GameState::Playing);
        assert!(session.world().bird().velocity < 0.0);
        assert_eq!(session.recorder.flaps(), &[0]);
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut session = session(SeedSpec::Fixed(5));
        session.request_flap();
        let steps = session.frame(1000.0);
        assert!(steps <= 3);
        assert!(session.world().elapsed_ms() <= MAX_FRAME_MS + 1e-9);
        assert_eq!(session.frame(f64::NAN), 0);
        assert_eq!(session.frame(-5.0), 0);
    }

    #[test]
    fn test_falling_bird_ends_run() {
        let mut session = session(SeedSpec::Fixed(3));
        session.request_flap();
        session.frame(16.0);
        assert_eq!(session.state(), GameState::Playing);
        while session.state() == GameState::Playing {
            session.frame(16.0);
        }
        assert_eq!(session.state(), GameState::GameOver);
        assert_eq!(session.snapshot().lifetime.total_flaps, 1);
        let result = session.last_result().unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.coins, 1);
        assert_eq!(session.snapshot().coins, 1);
        assert_eq!(session.snapshot().lifetime.runs, 1);
        assert_eq!(result.replay.as_ref().unwrap().flaps, vec![0]);
    }

    #[test]
    fn test_game_over_drops_flaps_until_restart() {
        let mut session = session(SeedSpec::Fixed(3));
        play_run(&mut session);
        session.request_flap();
        assert_eq!(session.frame(16.0), 0);
        assert_eq!(session.state(), GameState::GameOver);

        session.restart();
        assert_eq!(session.state(), GameState::Ready);
        assert_eq!(session.world().steps(), 0);
        assert!(session.world().pipes().is_empty());
        session.frame(16.0);
        assert_eq!(session.state(), GameState::Ready);
    }

    #[test]
    fn test_restart_ignored_outside_game_over() {
        let mut session = session(SeedSpec::Fixed(3));
        session.restart();
        assert_eq!(session.state(), GameState::Ready);
        session.request_flap();
        session.frame(16.0);
        session.restart();
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn test_recorded_run_verifies() {
        let mut session = session(SeedSpec::Fixed(2024));
        let result = play_run(&mut session);
        let replay = result.replay.unwrap();
        assert_eq!(replay.seed, 2024);
        assert_eq!(replay.seed_label, "#2024");
        assert_eq!(replay.mode, "seeded");
        assert_eq!(replay.preset.as_deref(), Some("normal"));

        let verified = verify_replay(&replay, session.config());
        assert!(verified.matches(&replay), "{verified:?} vs score {}", replay.score);
        assert_eq!(verified.steps, result.steps);
    }

    #[test]
    fn test_best_replay_kept_across_runs() {
        let mut session = session(SeedSpec::Fixed(77));
        let first = play_run(&mut session);
        assert!(session.best_replay().is_some());

        // Second run crashes immediately and must not replace the best
        session.restart();
        session.request_flap();
        session.frame(16.0);
        assert_eq!(session.state(), GameState::Playing);
        while session.state() == GameState::Playing {
            session.frame(16.0);
        }
        let second = session.last_result().unwrap();
        assert!(second.replay.is_some());
        assert_eq!(second.score, 0);
        assert_eq!(session.best_replay().unwrap().score, first.score);
        assert_eq!(session.best_score(), first.score);
        assert_eq!(session.snapshot().lifetime.runs, 2);
    }

    #[test]
    fn test_truncated_run_is_not_saved_as_best() {
        let mut session = session(SeedSpec::Fixed(3));
        session.request_flap();
        session.frame(16.0);
        assert_eq!(session.state(), GameState::Playing);
        // Fill the timeline past the limit, then let the bird fall
        let now = session.world().elapsed_ms();
        for _ in 0..MAX_REPLAY_FLAPS {
            session.recorder.record_flap(now);
        }
        while session.state() == GameState::Playing {
            session.frame(16.0);
        }

        let result = session.last_result().unwrap();
        assert!(result.replay.is_none());
        assert!(session.best_replay().is_none());
        assert!(session.store().load_replay("seeded-3").is_none());
        assert_eq!(session.snapshot().lifetime.runs, 1);
        assert_eq!(
            session.snapshot().lifetime.total_flaps,
            MAX_REPLAY_FLAPS as u64 + 1
        );
    }

    #[test]
    fn test_progress_survives_new_session() {
        let mut session = session(SeedSpec::Fixed(8));
        let result = play_run(&mut session);
        let storage = session.store().storage();
        let mut copy = MemoryStorage::new();
        for key in ["flappy_sim_save", "flappy_sim_replay_seeded-8"] {
            if let Some(value) = storage.get(key) {
                copy.set(key, &value).unwrap();
            }
        }

        let store = ProgressStore::new(Box::new(copy));
        let mut reopened = Session::new(Difficulty::Normal, SeedSpec::Fixed(8), store);
        reopened.boot();
        assert_eq!(reopened.snapshot().coins, result.coins);
        assert_eq!(reopened.best_replay().map(|r| r.score), Some(result.score));
    }

    #[test]
    fn test_ghost_follows_best_run() {
        let mut session = session(SeedSpec::Fixed(12));
        play_run(&mut session);
        session.restart();
        session.request_flap();
        session.frame(16.7);
        let view = session.render_view();
        let ghost = view.ghost.expect("ghost is shown during a run");
        // Both runs flap on step 0 from the same start height
        assert_eq!(ghost.y.to_bits(), view.bird.y.to_bits());
    }

    #[test]
    fn test_random_seeds_come_from_host() {
        let store = ProgressStore::new(Box::new(MemoryStorage::new()));
        let mut session = Session::new(Difficulty::Normal, SeedSpec::Random, store)
            .with_host_rng(Box::new(ScriptedRandom::new(vec![0.25, 0.75])));
        session.boot();
        session.request_flap();
        session.frame(16.7);
        assert_eq!(session.run_seed(), (0.25 * u32::MAX as f64).floor() as u32);
        assert_eq!(session.render_view().seed_label, "random");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GameConfig::default();
        config.pipes.gap = config.playfield.height * 2.0;
        let store = ProgressStore::new(Box::new(MemoryStorage::new()));
        assert!(Session::with_config(config, SeedSpec::Random, store).is_err());
    }

    #[test]
    fn test_render_view_matches_world() {
        let mut session = session(SeedSpec::Fixed(4));
        session.request_flap();
        for _ in 0..200 {
            autopilot(&mut session);
            session.frame(16.7);
        }
        let view = session.render_view();
        assert_eq!(view.pipes.len(), session.world().pipes().len());
        for (v, p) in view.pipes.iter().zip(session.world().pipes()) {
            assert_eq!(v.x, p.x);
            assert!((v.bottom_y - v.top_height - p.gap).abs() < 1e-3);
            assert!((v.bottom_y + v.bottom_height - view.ground_y).abs() < 1e-3);
        }
        assert_eq!(view.score, session.world().score());
    }
}
