//! Simulation kernel for a turn-based hex-grid cave crawler.
//!
//! Three pieces share one axial coordinate system: the cave generator,
//! the shadowcasting field of view, and the virtual-time turn scheduler.
//! `engine::SimEngine` composes them into one tick per player command.

pub mod actor;
pub mod cave_generator;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod hex;
pub mod level;
pub mod rng;
pub mod schedule;
pub mod session;
pub mod types;
pub mod visibility;
