//! Token game engine for workflow Petri nets.
//!
//! [`TokenGame`] owns the marking of one loaded [`Graph`] and fires plain
//! transitions as well as the AND/XOR join/split gateways described in
//! [`gateway`]. [`Session`] wraps a game in the interactive
//! load/start/select/fire state machine.

pub mod config;
pub mod game;
pub mod gateway;
pub mod net;
pub mod options;
pub mod repl;
pub mod session;

pub use config::GameConfig;
pub use game::{FireError, FireOutcome, NotFiredReason, OutputOption, TokenGame, TransitionOptions};
pub use gateway::{GatewayBehavior, GatewayError, GatewayKind, GatewayRegistry};
pub use net::{Arc, Graph, Marking, Node, Place, Transition, Weight};
pub use session::{Session, SessionError, SessionEvent, SessionState, SessionUpdate};
