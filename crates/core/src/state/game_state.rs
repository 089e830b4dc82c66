//! Game-state machine
//!
//! While inactive ("browsing") the operator cycles through the game states
//! with the bumpers and arms the selection with start. While active the
//! selection is frozen and dispatched every tick; start returns to browsing
//! without changing the selection.

use crate::input::{Buttons, Edges};
use crate::ordinal::Ordinal;

/// Top-level op-mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    TeleOp,
    Autonomous,
    AutonomousDiagnostic,
    ManualDiagnostic,
    BackAndForth,
    Square,
}

impl Ordinal for GameState {
    const ALL: &'static [Self] = &[
        GameState::TeleOp,
        GameState::Autonomous,
        GameState::AutonomousDiagnostic,
        GameState::ManualDiagnostic,
        GameState::BackAndForth,
        GameState::Square,
    ];
}

impl GameState {
    /// Driver-facing display name
    pub const fn name(self) -> &'static str {
        match self {
            GameState::TeleOp => "Tele-Op",
            GameState::Autonomous => "Autonomous",
            GameState::AutonomousDiagnostic => "Autonomous Diagnostic",
            GameState::ManualDiagnostic => "Manual Diagnostic",
            GameState::BackAndForth => "Back And Forth",
            GameState::Square => "Square",
        }
    }
}

/// Activation latch
///
/// `initializing` is true only until the match starts; it gates the
/// pre-start behavior (pose seeding, vision polling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationLatch {
    pub active: bool,
    pub initializing: bool,
}

impl Default for ActivationLatch {
    fn default() -> Self {
        Self {
            active: false,
            initializing: true,
        }
    }
}

/// What a state-switch evaluation changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateSwitch {
    /// Selection moved while browsing
    pub browsed: bool,
    /// Activation toggled to `true`
    pub activated: bool,
    /// Activation toggled to `false`
    pub deactivated: bool,
}

/// Game-state machine
#[derive(Debug, Clone, Copy, Default)]
pub struct GameStateMachine {
    state: GameState,
    latch: ActivationLatch,
}

impl GameStateMachine {
    /// TeleOp, inactive, initializing
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Position of the current state in [`GameState::ALL`]
    pub fn index(&self) -> usize {
        self.state.ordinal()
    }

    pub fn is_active(&self) -> bool {
        self.latch.active
    }

    pub fn is_initializing(&self) -> bool {
        self.latch.initializing
    }

    pub fn latch(&self) -> ActivationLatch {
        self.latch
    }

    /// Evaluate bumper and start edges from either controller
    ///
    /// Bumpers only move the selection while inactive; pressing both in
    /// the same tick cancels out. Start always toggles activation.
    pub fn handle_state_switch(&mut self, edges: &Edges) -> StateSwitch {
        let mut result = StateSwitch::default();

        if !self.latch.active {
            let mut delta = 0;
            if edges.either(Buttons::LEFT_BUMPER) {
                delta -= 1;
            }
            if edges.either(Buttons::RIGHT_BUMPER) {
                delta += 1;
            }
            if delta != 0 {
                self.state = self.state.step(delta);
                result.browsed = true;
                crate::log_info!("Selected game state {}", self.state.name());
            }
        }

        if edges.either(Buttons::START) {
            self.latch.active = !self.latch.active;
            if self.latch.active {
                result.activated = true;
                crate::log_info!("Activated {}", self.state.name());
            } else {
                result.deactivated = true;
                crate::log_info!("Deactivated {}", self.state.name());
            }
        }

        result
    }

    /// Return to browsing on TeleOp (autonomous finished)
    pub fn force_teleop(&mut self) {
        self.state = GameState::TeleOp;
        self.latch.active = false;
        crate::log_info!("Autonomous complete, returning to {}", GameState::TeleOp.name());
    }

    /// Return to browsing, keeping the selection
    pub fn deactivate(&mut self) {
        self.latch.active = false;
    }

    /// Leave the pre-start phase
    pub fn finish_initializing(&mut self) {
        self.latch.initializing = false;
    }

    /// Jump straight to a state (leaves activation untouched)
    pub fn select(&mut self, state: GameState) {
        self.state = state;
    }
}
