//! 交互会话：以显式有限状态机驱动令牌游戏。
//!
//! `Idle -> GraphLoaded -> GameRunning <-> TransitionSelected`，
//! `EndGame` 复位标识并回到 `GraphLoaded`。
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::GameConfig;
use crate::game::{FireError, FireOutcome, NotFiredReason, TokenGame, TransitionOptions};
use crate::net::{Graph, Marking};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    GraphLoaded,
    GameRunning,
    TransitionSelected {
        transition: String,
        options: TransitionOptions,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::GraphLoaded => "graph-loaded",
            SessionState::GameRunning => "game-running",
            SessionState::TransitionSelected { .. } => "transition-selected",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::TransitionSelected { transition, .. } => {
                write!(f, "{} ({})", self.name(), transition)
            }
            _ => f.write_str(self.name()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    LoadGraph(Graph),
    StartGame,
    SelectTransition(String),
    FireTransition { output: Option<String> },
    ResetGame,
    EndGame,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::LoadGraph(_) => "load-graph",
            SessionEvent::StartGame => "start-game",
            SessionEvent::SelectTransition(_) => "select-transition",
            SessionEvent::FireTransition { .. } => "fire-transition",
            SessionEvent::ResetGame => "reset-game",
            SessionEvent::EndGame => "end-game",
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("event {event} is not accepted in state {state}")]
    InvalidEvent {
        event: &'static str,
        state: &'static str,
    },
    #[error("transition {0:?} is not enabled")]
    NotEnabled(String),
    #[error(transparent)]
    Fire(#[from] FireError),
}

/// What the caller needs to redraw after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    pub state: SessionState,
    pub enabled: Vec<String>,
    pub fired: Option<FireOutcome>,
}

impl SessionUpdate {
    pub fn marking(&self) -> Option<&Marking> {
        self.fired.as_ref().and_then(FireOutcome::marking)
    }
}

pub struct Session {
    config: GameConfig,
    state: SessionState,
    game: Option<TokenGame>,
    enabled: Vec<String>,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            game: None,
            enabled: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn game(&self) -> Option<&TokenGame> {
        self.game.as_ref()
    }

    pub fn enabled_transitions(&self) -> &[String] {
        &self.enabled
    }

    pub fn marking(&self) -> Option<Marking> {
        self.game.as_ref().map(TokenGame::current_marking)
    }

    /// Applies one event. On error the session is left exactly as it was.
    pub fn handle(&mut self, event: SessionEvent) -> Result<SessionUpdate, SessionError> {
        let event_name = event.name();
        let mut fired = None;

        match (self.state.clone(), event) {
            (SessionState::Idle | SessionState::GraphLoaded, SessionEvent::LoadGraph(graph)) => {
                self.game = Some(TokenGame::new(graph));
                self.enabled.clear();
                self.state = SessionState::GraphLoaded;
            }
            (SessionState::GraphLoaded, SessionEvent::StartGame) => {
                self.enter_running();
                log::info!("game started");
            }
            (
                SessionState::GameRunning | SessionState::TransitionSelected { .. },
                SessionEvent::SelectTransition(transition),
            ) => {
                fired = self.select(transition)?;
            }
            (
                SessionState::TransitionSelected {
                    transition,
                    options,
                },
                SessionEvent::FireTransition { output },
            ) => {
                let output = if options.requires_selection {
                    output
                } else {
                    None
                };
                let outcome = self.game_mut()?.fire_transition(&transition, output.as_deref())?;
                if outcome != FireOutcome::NotFired(NotFiredReason::SelectionRequired) {
                    self.enter_running();
                }
                fired = Some(outcome);
            }
            (
                SessionState::GameRunning | SessionState::TransitionSelected { .. },
                SessionEvent::ResetGame,
            ) => {
                self.game_mut()?.reset();
                self.enter_running();
                log::info!("game reset");
            }
            (
                SessionState::GameRunning | SessionState::TransitionSelected { .. },
                SessionEvent::EndGame,
            ) => {
                self.game_mut()?.reset();
                self.enabled.clear();
                self.state = SessionState::GraphLoaded;
                log::info!("game ended");
            }
            (state, _) => {
                return Err(SessionError::InvalidEvent {
                    event: event_name,
                    state: state.name(),
                });
            }
        }

        log::debug!("{} -> {}", event_name, self.state);
        Ok(SessionUpdate {
            state: self.state.clone(),
            enabled: self.enabled.clone(),
            fired,
        })
    }

    fn select(&mut self, transition: String) -> Result<Option<FireOutcome>, SessionError> {
        if !self.enabled.contains(&transition) {
            return Err(SessionError::NotEnabled(transition));
        }
        let auto_fire = self.config.auto_fire;
        let game = self.game_mut()?;
        let options = game.transition_options(&transition);

        if !options.requires_selection && auto_fire {
            let outcome = game.fire_transition(&transition, None)?;
            self.enter_running();
            return Ok(Some(outcome));
        }

        self.state = SessionState::TransitionSelected {
            transition,
            options,
        };
        Ok(None)
    }

    fn enter_running(&mut self) {
        self.enabled = self
            .game
            .as_ref()
            .map(TokenGame::enabled_transitions)
            .unwrap_or_default();
        self.state = SessionState::GameRunning;
    }

    fn game_mut(&mut self) -> Result<&mut TokenGame, SessionError> {
        let state = self.state.name();
        self.game.as_mut().ok_or(SessionError::InvalidEvent {
            event: "game-access",
            state,
        })
    }
}
