//! Collision primitives for the Solar Aegis simulation.
//!
//! Everything here is a pure function over positions; the resolvers in the
//! game crate decide what a contact means.

pub mod collision;

pub use collision::*;
