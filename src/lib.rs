//! Warband - army, duel and war engine for a chat-platform strategy game

pub mod army;
pub mod combat;
pub mod core;
pub mod progression;
pub mod service;
pub mod session;
pub mod store;
pub mod sweep;
pub mod tables;
