//! quizclock-core — Exam session controller, countdown, and scoring.
//!
//! This crate defines the question model, the per-attempt session state,
//! the controller that drives it, and the seams (`Renderer`, `Ticker`) that
//! front ends plug into.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod scoring;
pub mod session;
pub mod timer;
