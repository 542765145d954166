//! CLI commands

pub mod check;
pub mod ship;
