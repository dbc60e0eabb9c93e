//! Game flow state machine
//!
//! BOOT → READY → PLAYING → GAME_OVER → READY. Illegal events are no-ops.

use serde::{Deserialize, Serialize};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Loading persisted data
    #[default]
    Boot,
    /// Waiting for the first flap
    Ready,
    /// Active run
    Playing,
    /// Run ended, waiting for restart
    GameOver,
}

/// Events that drive transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    BootComplete,
    Start,
    Hit,
    Restart,
}

impl GameState {
    pub const ALL: [GameState; 4] = [
        GameState::Boot,
        GameState::Ready,
        GameState::Playing,
        GameState::GameOver,
    ];

    /// Legal successor for `event`, if any
    pub fn next(self, event: GameEvent) -> Option<GameState> {
        match (self, event) {
            (GameState::Boot, GameEvent::BootComplete) => Some(GameState::Ready),
            (GameState::Ready, GameEvent::Start) => Some(GameState::Playing),
            (GameState::Playing, GameEvent::Hit) => Some(GameState::GameOver),
            (GameState::GameOver, GameEvent::Restart) => Some(GameState::Ready),
            _ => None,
        }
    }
}

impl GameEvent {
    pub const ALL: [GameEvent; 4] = [
        GameEvent::BootComplete,
        GameEvent::Start,
        GameEvent::Hit,
        GameEvent::Restart,
    ];
}

#[derive(Debug, Clone, Default)]
pub struct GameStateMachine {
    state: GameState,
}

impl GameStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Apply `event` and return the resulting state (unchanged if illegal)
    pub fn transition(&mut self, event: GameEvent) -> GameState {
        match self.state.next(event) {
            Some(next) => {
                log::debug!("{:?} --{:?}--> {:?}", self.state, event, next);
                self.state = next;
            }
            None => log::trace!("Ignored {:?} in {:?}", event, self.state),
        }
        self.state
    }

    /// Force back to BOOT (teardown / tests)
    pub fn reset(&mut self) {
        self.state = GameState::Boot;
    }
}
