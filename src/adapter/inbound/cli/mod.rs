//! CLI module graph.

pub mod command;
pub mod compare;
pub mod config;
pub mod output;
pub mod paths;
pub mod portfolio;
pub mod screen;
