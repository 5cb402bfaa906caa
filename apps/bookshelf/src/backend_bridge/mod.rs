//! Backend side of the terminal front end: command queue and worker runtime.

pub mod commands;
pub mod runtime;
