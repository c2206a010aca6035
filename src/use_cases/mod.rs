// Use cases layer: simulation engine, session flow and the world tick loop.

pub mod client_view;
pub mod engine;
pub mod flavor;
pub mod game;
pub mod session;
pub mod types;

pub use client_view::{ClientView, ViewChange};
pub use engine::Simulation;
pub use session::{HOST_PLAYER_ID, Session, SessionSettings};
pub use types::{GameEvent, Role, SessionState, WorldUpdate};
