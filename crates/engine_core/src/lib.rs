//! Core engine types and utilities for Solar Aegis.
//!
//! This crate provides the foundational types used across all simulation crates:
//! - Transform and orientation basis
//! - Frame timing (simulation delta vs wall clock)
//! - Common component types for the agent ECS

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec3};
pub use hecs::{Entity, World};
