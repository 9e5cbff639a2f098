//! Solar Aegis simulation core.
//!
//! A tick-driven model of a Dyson-shell battlefield: the Obsidian Wing flies
//! inside the shell while a self-replicating corroder swarm eats through it.
//! Rendering, audio and key capture live elsewhere; this crate consumes an
//! [`input::InputSnapshot`] per tick and hands back events and a
//! [`WorldSnapshot`].

pub mod combat;
pub mod config;
pub mod corroder;
pub mod effects;
pub mod error;
pub mod events;
pub mod flight;
pub mod neighbors;
pub mod shell;
pub mod ship;
pub mod simulation;
pub mod snapshot;
pub mod spawner;
pub mod swarm;
pub mod zone;

pub use config::SimConfig;
pub use corroder::CorroderKind;
pub use error::ConfigError;
pub use events::SimEvent;
pub use simulation::{Simulation, TickReport};
pub use snapshot::WorldSnapshot;
pub use zone::Zone;
