//! Trufoso Library
//!
//! Core modules for the Trufoso dog-training coach.

pub mod animation;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod host;
pub mod journal;
pub mod mic;
pub mod scheduler;
pub mod script;
pub mod sequencer;
pub mod speech;
pub mod ui;
