//! Hex Arbiter - movement and engagement legality for hex-grid wargames

pub mod battle;
pub mod core;
