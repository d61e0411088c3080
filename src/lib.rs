//! Gridwarden - Deterministic Tick-Based Multi-Agent Grid Engine

pub mod actor;
pub mod coordinator;
pub mod core;
pub mod director;
pub mod engine;
pub mod moderator;
pub mod radar;
pub mod solver;
pub mod world;
